// spyder-api: Async Rust client for the Spyder controller's raw status endpoint.

pub mod client;
pub mod error;
pub mod model;
pub mod source;
pub mod transport;

pub use client::SpyderClient;
pub use error::Error;
pub use model::{OutputStatus, StatusDocument, SystemStatus};
pub use source::StatusSource;
pub use transport::TransportConfig;
