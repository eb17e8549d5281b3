//! Household dietary preference.
//!
//! The preference is only consumed by the AI assistant when building prompts.
//! It is persisted as its ordinal so the slider-style ordering survives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DietPreference {
    Vegan = 0,
    Vegetarian = 1,
    Pescatarian = 2,
    #[default]
    Flexitarian = 3,
    Carnivore = 4,
}

impl DietPreference {
    /// All preferences ordered from most to least restrictive.
    pub const ALL: [DietPreference; 5] = [
        DietPreference::Vegan,
        DietPreference::Vegetarian,
        DietPreference::Pescatarian,
        DietPreference::Flexitarian,
        DietPreference::Carnivore,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Short human label.
    pub fn label(self) -> &'static str {
        match self {
            DietPreference::Vegan => "Vegan",
            DietPreference::Vegetarian => "Vegetarian",
            DietPreference::Pescatarian => "Pescatarian",
            DietPreference::Flexitarian => "Flexitarian",
            DietPreference::Carnivore => "Carnivore",
        }
    }

    /// Description used inside AI prompts.
    pub fn description(self) -> &'static str {
        match self {
            DietPreference::Vegan => "strictly vegan (no animal products)",
            DietPreference::Vegetarian => "vegetarian (no meat or fish, but dairy/eggs are okay)",
            DietPreference::Pescatarian => {
                "pescatarian (vegetarian, but includes fish and seafood)"
            }
            DietPreference::Flexitarian => {
                "flexitarian (mostly plant-based, but occasionally includes meat)"
            }
            DietPreference::Carnivore => {
                "carnivore (includes all types of meat and animal products)"
            }
        }
    }
}

impl TryFrom<u8> for DietPreference {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DietPreference::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("Invalid diet preference ordinal {}", value))
    }
}

impl From<DietPreference> for u8 {
    fn from(value: DietPreference) -> Self {
        value.ordinal()
    }
}

impl fmt::Display for DietPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DietPreference {
    type Err = String;

    /// Accepts a name (case-insensitive) or an ordinal 0-4.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ordinal) = s.parse::<u8>() {
            return DietPreference::try_from(ordinal);
        }
        DietPreference::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Invalid diet preference '{}'. Valid options: vegan, vegetarian, pescatarian, flexitarian, carnivore",
                    s
                )
            })
    }
}
