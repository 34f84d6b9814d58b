pub mod agents;
pub mod api;
pub mod config;
pub mod definitions;
pub mod engine;
pub mod errors;
pub mod factory;
pub mod normalizer;
pub mod providers;
pub mod session;
pub mod storage;
pub mod tools;
pub mod types;

pub use config::Config;
pub use engine::{DispatchOutcome, Dispatcher, Route};
pub use types::*;
