// salesflow/src/commands/mod.rs

pub mod check;
pub mod preprocess;
pub mod train;

use std::process::ExitCode;

// Exit codes shared by every job
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MISSING_INPUT: u8 = 2;

pub fn failure() -> ExitCode {
    ExitCode::from(EXIT_FAILURE)
}

pub fn missing_input() -> ExitCode {
    ExitCode::from(EXIT_MISSING_INPUT)
}
