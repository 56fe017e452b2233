mod command;
mod runner;

pub use command::Command;
pub use runner::{OutputMode, parse_output_mode, run, run_with_format};
