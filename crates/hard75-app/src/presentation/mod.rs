pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod runner;
pub mod terminal;

pub use cli::Cli;
pub use error::CommandError;
