mod args;
mod commands;
mod files;
mod output;

pub use args::{Cli, Commands, ConfigSubcommands, StatusSubcommands};
pub use commands::run;
pub use files::detect_language;
pub use output::Printer;
