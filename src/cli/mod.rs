pub mod cli;

pub use cli::{CommandArgs, Commands, EcosystemArgs, ServeArgs, StreamArgs};
