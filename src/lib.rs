pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::ForwarderConfig;
pub use crate::core::{
    factory_fn, invoke_event, Application, ApplicationFactory, Forwarder, InvokeOutput, LoadFailure,
    Registry, Resolution,
};
pub use domain::model::LoadErrorBody;
pub use utils::error::{ForwarderError, Result};
