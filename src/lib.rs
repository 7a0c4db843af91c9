pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod runner;
pub mod stats;
pub mod transport;
pub mod worker;

pub use config::Config;
pub use error::{ ConfigError, LoadError };
pub use report::RunReport;
pub use runner::Runner;
