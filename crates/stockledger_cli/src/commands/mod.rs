pub mod movement;
pub mod product;

use serde::Serialize;
use serde_json::Value;
use stockledger_core::ServiceError;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self {
            exit_code: 0,
            output: serialize_payload(payload),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self {
            exit_code,
            output: serialize_payload(payload),
        }
    }

    pub fn from_service_error(command: &str, error: &ServiceError) -> Self {
        let code = error.error_code();
        Self::failure(command, code, error.to_string(), exit_code_for(code))
    }
}

/// Maps a service `error_code()` to the process exit code.
pub fn exit_code_for(error_code: &str) -> u8 {
    match error_code {
        "product_not_found" | "movement_not_found" => 3,
        "storage_failure" | "clock_failure" => 1,
        _ => 2,
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\",\"data\":null}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
