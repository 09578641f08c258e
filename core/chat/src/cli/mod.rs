//! CLI: 引数解析と対話モード

mod args;
pub mod repl;
pub mod view;

pub use args::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
#[cfg(test)]
pub use args::parse_args_from;
