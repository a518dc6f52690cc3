pub mod error;
pub mod service;
pub mod status;

pub use error::BuildingError;
pub use service::{BuildingService, CreateBuilding};
pub use status::{determine_status, HvacStatus};
