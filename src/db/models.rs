use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::buildings::status::HvacStatus;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Building {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    /// Degrees Celsius, last known sensor reading
    pub current_temperature: f64,
    /// Degrees Celsius
    pub target_temperature: f64,
    /// Always derived from the two temperatures above.
    pub status: HvacStatus,
    pub last_updated: DateTime<Utc>,
    pub create_time: DateTime<Utc>,
}

/// A building that has not been stored yet; the store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBuilding {
    pub name: String,
    pub location: String,
    pub current_temperature: f64,
    pub target_temperature: f64,
    pub status: HvacStatus,
    pub last_updated: DateTime<Utc>,
    pub create_time: DateTime<Utc>,
}

impl NewBuilding {
    pub fn with_id(self, id: Uuid) -> Building {
        Building {
            id,
            name: self.name,
            location: self.location,
            current_temperature: self.current_temperature,
            target_temperature: self.target_temperature,
            status: self.status,
            last_updated: self.last_updated,
            create_time: self.create_time,
        }
    }
}
