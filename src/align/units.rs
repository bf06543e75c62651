use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MM_PER_FOOT: f64 = 304.8;
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Unit a user-entered length is given in. Model space is measured in feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "in")]
    Inches,
    #[serde(rename = "ft")]
    Feet,
}

impl LengthUnit {
    /// Convert `value` in this unit to model feet.
    #[must_use]
    pub fn to_feet(self, value: f64) -> f64 {
        match self {
            Self::Millimeters => value / MM_PER_FOOT,
            Self::Inches => value / INCHES_PER_FOOT,
            Self::Feet => value,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Inches => "in",
            Self::Feet => "ft",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown length unit: {0}")]
pub struct UnknownUnit(pub String);

impl FromStr for LengthUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeters" | "millimetres" => Ok(Self::Millimeters),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            "ft" | "feet" | "foot" => Ok(Self::Feet),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}
