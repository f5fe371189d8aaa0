pub mod cim;
pub mod cli;
pub mod commands;
pub mod config;
pub mod connection;
pub mod mock;
pub mod shrub;
pub mod ui;
pub mod utils;

pub use cim::ObjectPath;
pub use cli::Cli;
pub use config::Config;
pub use connection::{ServerDefinition, WbemConnection};
pub use mock::MockRepository;
pub use shrub::AssociationShrub;
