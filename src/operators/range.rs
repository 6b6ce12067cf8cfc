use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// What an operator can do to a particular scene, for driving client controls.
pub struct VariationRange {
    /// Accepted intensity bounds.
    pub intensity: [f64; 2],
    /// Operator-specific options keyed by their `extra` name.
    pub params: BTreeMap<String, ParamRange>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Bounds for one operator option.
pub enum ParamRange {
    /// One of a closed set of names.
    Choice {
        /// Accepted names.
        options: Vec<String>,
        /// Value detected on the scene, when meaningful.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current: Option<String>,
    },
    /// A number within `[min, max]`.
    Numeric {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Value detected on the scene, when meaningful.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current: Option<f64>,
    },
}

impl Default for VariationRange {
    fn default() -> Self {
        Self {
            intensity: [0.0, 1.0],
            params: BTreeMap::new(),
        }
    }
}

impl VariationRange {
    pub(crate) fn choice(
        mut self,
        name: &str,
        options: Vec<&'static str>,
        current: Option<&str>,
    ) -> Self {
        self.params.insert(
            name.to_string(),
            ParamRange::Choice {
                options: options.into_iter().map(str::to_string).collect(),
                current: current.map(str::to_string),
            },
        );
        self
    }

    pub(crate) fn numeric(mut self, name: &str, min: f64, max: f64, current: Option<f64>) -> Self {
        self.params.insert(
            name.to_string(),
            ParamRange::Numeric { min, max, current },
        );
        self
    }

    /// Look up one option.
    pub fn param(&self, name: &str) -> Option<&ParamRange> {
        self.params.get(name)
    }
}
