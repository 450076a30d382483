pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod storage;
pub mod store;

pub use config::{Config, StorageBackend};
pub use error::{PlotlineError, Result};
pub use storage::{KeyValueStore, Persistence};
pub use store::{DomainStore, SessionStore};
