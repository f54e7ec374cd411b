//! Flavor and weight reference entities shared by many variants.

use crate::ids::{FlavorId, WeightId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A flavor (e.g. "Double Rich Chocolate").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Flavor {
    pub id: FlavorId,
    pub name: String,
}

impl Flavor {
    pub fn new(id: impl Into<FlavorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A pack weight (e.g. `1 kg`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Weight {
    pub id: WeightId,
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Weight {
    pub fn new(id: impl Into<WeightId>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value,
            unit: unit.into(),
            name: None,
        }
    }

    /// Display label, e.g. `1 kg` or `2.5 lb`.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if self.value.fract() == 0.0 {
            format!("{} {}", self.value as i64, self.unit)
        } else {
            format!("{} {}", self.value, self.unit)
        }
    }

    /// Weight in grams, for units the store is known to use.
    pub fn grams(&self) -> Option<f64> {
        let factor = match self.unit.trim().to_lowercase().as_str() {
            "mg" => 0.001,
            "g" | "gm" | "gms" | "gram" | "grams" => 1.0,
            "kg" | "kgs" => 1000.0,
            "lb" | "lbs" => 453.592,
            "oz" => 28.3495,
            _ => return None,
        };
        Some(self.value * factor)
    }

    /// Order by physical magnitude; unknown units sort after known ones.
    pub fn cmp_magnitude(&self, other: &Weight) -> Ordering {
        match (self.grams(), other.grams()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .value
                .partial_cmp(&other.value)
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
