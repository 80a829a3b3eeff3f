//! Garden rule violations.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// A garden action was rejected by the progression rules.
///
/// None of these are server faults: each one describes a state the user can
/// fix by waiting, earning more Star Seeds, or picking a different action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GardenError {
    /// Balance is below the price of the action.
    #[error("insufficient star seeds: need {required}, have {available}")]
    InsufficientStarSeeds { required: i32, available: i32 },

    /// The garden level is below the unlock level of the plant or theme.
    #[error("garden level {current} is below required level {required}")]
    LevelTooLow { required: i32, current: i32 },

    /// The plant or garden was watered too recently.
    #[error("watering is on cooldown until {next_water_at}")]
    WateringCooldown { next_water_at: DateTime<Utc> },

    /// The plant reached its final stage and can only be harvested.
    #[error("plant is fully grown")]
    AlreadyFullyGrown,

    /// The plant is not at its final stage yet.
    #[error("plant is not ready to harvest")]
    NotHarvestable,

    /// Another active plant already sits on this grid cell.
    #[error("position ({x}, {y}) is already taken")]
    PositionTaken { x: i32, y: i32 },

    /// Challenge progress increments must be positive.
    #[error("challenge increment must be positive, got {0}")]
    InvalidIncrement(i32),

    /// The challenge belongs to an earlier or later day than today.
    #[error("challenge for {date} can no longer be progressed")]
    ChallengeExpired { date: NaiveDate },

    /// No theme with this key exists.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// The plant was paired with a catalog entry of a different type.
    #[error("plant type does not match the plant")]
    PlantTypeMismatch,

    /// A catalog entry failed validation.
    #[error("invalid catalog entry: {0}")]
    InvalidCatalog(String),
}
