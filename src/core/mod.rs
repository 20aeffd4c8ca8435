pub mod forwarder;
pub mod invoke;
pub mod registry;

pub use crate::domain::model::LoadErrorBody;
pub use crate::domain::ports::{factory_fn, Application, ApplicationFactory};
pub use crate::utils::error::Result;
pub use forwarder::{Forwarder, LoadFailure, Resolution};
pub use invoke::{invoke_event, InvokeOutput};
pub use registry::Registry;
