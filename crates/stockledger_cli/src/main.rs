use std::process::ExitCode;

fn main() -> ExitCode {
    stockledger_cli::run()
}
