//! One module per subcommand.

pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod rules;
