//! Garden themes.
//!
//! The theme catalog is fixed. `default` is always available. The others are
//! bought once with Star Seeds after reaching their unlock level and can then
//! be switched to freely.

use serde::{Deserialize, Serialize};

use super::GardenError;
use super::model::UserGarden;

pub const DEFAULT_THEME: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub key: &'static str,
    pub name: &'static str,
    pub cost: i32,
    pub unlock_level: i32,
}

pub const THEMES: [Theme; 4] = [
    Theme {
        key: DEFAULT_THEME,
        name: "สวนธรรมชาติ",
        cost: 0,
        unlock_level: 1,
    },
    Theme {
        key: "sakura",
        name: "สวนซากุระ",
        cost: 300,
        unlock_level: 3,
    },
    Theme {
        key: "tropical",
        name: "สวนทรอปิคอล",
        cost: 500,
        unlock_level: 5,
    },
    Theme {
        key: "zen",
        name: "สวนเซน",
        cost: 800,
        unlock_level: 8,
    },
];

#[must_use]
pub fn find_theme(key: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.key == key)
}

/// What selecting a theme did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThemeChange {
    /// The theme was already owned. No Star Seeds were spent.
    Selected,
    /// The theme was bought and selected.
    Unlocked { cost: i32 },
}

/// Theme as listed to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeView {
    pub key: String,
    pub name: String,
    pub cost: i32,
    pub unlock_level: i32,
    pub unlocked: bool,
    pub selected: bool,
}

/// Whether the garden owns `key`.
#[must_use]
pub fn is_unlocked(garden: &UserGarden, key: &str) -> bool {
    key == DEFAULT_THEME || garden.unlocked_themes.iter().any(|t| t == key)
}

/// Switch the garden to `key`, buying it first if needed.
///
/// # Errors
///
/// - `GardenError::UnknownTheme` if no theme has this key
/// - `GardenError::LevelTooLow` if the garden has not reached the unlock level
/// - `GardenError::InsufficientStarSeeds` if the balance is below the cost
pub fn unlock_theme(garden: &mut UserGarden, key: &str) -> Result<ThemeChange, GardenError> {
    let theme = find_theme(key).ok_or_else(|| GardenError::UnknownTheme(key.to_owned()))?;

    if is_unlocked(garden, theme.key) {
        garden.theme = Some(theme.key.to_owned());
        return Ok(ThemeChange::Selected);
    }

    if garden.level < theme.unlock_level {
        return Err(GardenError::LevelTooLow {
            required: theme.unlock_level,
            current: garden.level,
        });
    }
    garden.spend(theme.cost)?;
    garden.unlocked_themes.push(theme.key.to_owned());
    garden.theme = Some(theme.key.to_owned());
    Ok(ThemeChange::Unlocked { cost: theme.cost })
}

/// The full catalog with per-garden ownership flags.
#[must_use]
pub fn theme_views(garden: &UserGarden) -> Vec<ThemeView> {
    let selected = garden.theme.as_deref().unwrap_or(DEFAULT_THEME);
    THEMES
        .iter()
        .map(|t| ThemeView {
            key: t.key.to_owned(),
            name: t.name.to_owned(),
            cost: t.cost,
            unlock_level: t.unlock_level,
            unlocked: is_unlocked(garden, t.key),
            selected: t.key == selected,
        })
        .collect()
}
