// spyder-core: Polling layer between spyder-api and consumers (CLI).

pub mod error;
pub mod monitor;
pub mod sensor;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use monitor::Monitor;
pub use sensor::{
    DeviceClass, Sensor, SensorKind, SensorScope, SensorValue, StateClass, Unit, build_sensors,
};
pub use store::StatusStore;

// Re-export the wire types consumers read through the store.
pub use spyder_api::{OutputStatus, StatusDocument, StatusSource, SystemStatus};
