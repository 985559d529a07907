//! REPL command parsing.

use std::path::PathBuf;

/// One parsed REPL input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Login,
    Register,
    Logout,
    Whoami,
    Datasets,
    Upload {
        path: PathBuf,
        target_column: String,
        run_auto_ml: bool,
    },
    ClearCache,
    Dashboard(Option<String>),
    Predict(Option<String>),
    Report(Option<String>),
    Quit,
    /// Recognized command with bad arguments; carries the usage line.
    Invalid(&'static str),
    Unknown(String),
}

/// Commands offered by completion and `/help`.
pub const COMMAND_NAMES: [&str; 11] = [
    "/help",
    "/login",
    "/register",
    "/logout",
    "/whoami",
    "/datasets",
    "/upload",
    "/clear-cache",
    "/dashboard",
    "/predict",
    "/report",
];

impl Command {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            return Command::Quit;
        }

        let mut parts = trimmed.split_whitespace();
        let head = parts.next().unwrap_or_default();
        match head {
            "/help" => Command::Help,
            "/login" => Command::Login,
            "/register" => Command::Register,
            "/logout" => Command::Logout,
            "/whoami" => Command::Whoami,
            "/datasets" => Command::Datasets,
            "/clear-cache" => Command::ClearCache,
            "/dashboard" => Command::Dashboard(parts.next().map(str::to_string)),
            "/predict" => Command::Predict(parts.next().map(str::to_string)),
            "/report" => Command::Report(parts.next().map(str::to_string)),
            "/upload" => match (parts.next(), parts.next()) {
                (Some(path), Some(target)) => Command::Upload {
                    path: PathBuf::from(path),
                    target_column: target.to_string(),
                    run_auto_ml: parts.next() != Some("--no-automl"),
                },
                _ => Command::Invalid("usage: /upload <file> <target-column> [--no-automl]"),
            },
            other => Command::Unknown(other.to_string()),
        }
    }
}
