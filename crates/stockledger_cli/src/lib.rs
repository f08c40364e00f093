pub mod commands;
pub mod config;

use clap::{Parser, Subcommand};
use commands::movement::MovementCommand;
use commands::product::ProductCommand;
use commands::CommandResult;
use config::{AppConfig, GlobalArgs};
use log::{error, info};
use std::process::ExitCode;
use stockledger_core::db::open_db;
use stockledger_core::init_logging;

#[derive(Debug, Parser)]
#[command(
    name = "stockledger",
    version = stockledger_core::core_version(),
    about = "Stock ledger operator CLI",
    long_about = "Manage products, register stock movements, and derive per-product profitability.",
    after_help = "Examples:\n  stockledger product create --code TV-55 --description \"55 inch TV\" --category electronic --supplier-cost 100.00\n  stockledger movement register --product <ID> --kind incoming --quantity 10\n  stockledger product profit <ID>"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create, inspect, edit, and report on products
    #[command(subcommand)]
    Product(ProductCommand),
    /// Register and inspect stock movements
    #[command(subcommand)]
    Movement(MovementCommand),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Product(command) => command.name(),
            Self::Movement(command) => command.name(),
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let result = execute(cli);

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Resolves configuration, opens the ledger, and runs one command.
pub fn execute(cli: Cli) -> CommandResult {
    let name = cli.command.name();

    let config = match AppConfig::resolve(&cli.global) {
        Ok(config) => config,
        Err(err) => {
            return CommandResult::failure(name, "config_validation", err.to_string(), 2);
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            return CommandResult::failure(name, "logging_init", err, 1);
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=cli_command module=cli status=error command={name:?} error_class=storage_failure error={err}"
            );
            return CommandResult::failure(name, "storage_failure", err.to_string(), 1);
        }
    };

    let result = match cli.command {
        Command::Product(command) => commands::product::run(&conn, command),
        Command::Movement(command) => commands::movement::run(&conn, command),
    };

    info!(
        "event=cli_command module=cli status={} command={name:?} exit_code={}",
        if result.exit_code == 0 { "ok" } else { "error" },
        result.exit_code
    );
    result
}
