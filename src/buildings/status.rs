use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest gap between current and target temperature (inclusive) for which
/// the HVAC system only holds the temperature.
pub const MAINTAIN_THRESHOLD: f64 = 0.5;

/// Mirrors the `hvac_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "hvac_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HvacStatus {
    Heating,
    Cooling,
    Maintaining,
}

impl fmt::Display for HvacStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HvacStatus::Heating => "HEATING",
            HvacStatus::Cooling => "COOLING",
            HvacStatus::Maintaining => "MAINTAINING",
        };
        f.write_str(s)
    }
}

/// Derives the operating status from the gap between `current` and `target`.
///
/// Both inputs must be finite; `BuildingService` rejects anything else before
/// calling this.
pub fn determine_status(current: f64, target: f64) -> HvacStatus {
    if (current - target).abs() <= MAINTAIN_THRESHOLD {
        HvacStatus::Maintaining
    } else if current < target {
        HvacStatus::Heating
    } else {
        HvacStatus::Cooling
    }
}
