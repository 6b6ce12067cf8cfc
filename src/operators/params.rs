use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::foundation::error::{VaryError, VaryResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
/// Knobs for one operator application.
///
/// `intensity` is validated on construction (including deserialization); the value is
/// never modified afterwards, builder methods consume and return a new value.
pub struct VariationParams {
    intensity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawParams {
    #[serde(default = "default_intensity")]
    intensity: f64,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    extra: Map<String, Value>,
}

fn default_intensity() -> f64 {
    0.5
}

impl TryFrom<RawParams> for VariationParams {
    type Error = VaryError;

    fn try_from(raw: RawParams) -> VaryResult<Self> {
        Ok(Self::new(raw.intensity)?
            .with_seed_opt(raw.seed)
            .with_extras(raw.extra))
    }
}

impl Default for VariationParams {
    fn default() -> Self {
        Self {
            intensity: default_intensity(),
            seed: None,
            extra: Map::new(),
        }
    }
}

impl VariationParams {
    /// Params at the given intensity, which must lie in `[0, 1]`.
    pub fn new(intensity: f64) -> VaryResult<Self> {
        if !(0.0..=1.0).contains(&intensity) {
            return Err(VaryError::validation(format!(
                "intensity must be within [0, 1], got {intensity}"
            )));
        }
        Ok(Self {
            intensity,
            ..Self::default()
        })
    }

    /// Params for an internally computed intensity, clamped into `[0, 1]` (NaN becomes 0).
    pub(crate) fn from_unit(intensity: f64) -> Self {
        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        Self {
            intensity,
            ..Self::default()
        }
    }

    /// Fix the RNG seed.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_seed_opt(Some(seed))
    }

    /// Fix (or clear) the RNG seed.
    pub fn with_seed_opt(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set one operator-specific option.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Merge operator-specific options, later keys winning.
    pub fn with_extras(mut self, extras: Map<String, Value>) -> Self {
        self.extra.extend(extras);
        self
    }

    /// Strength in `[0, 1]`.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// RNG seed, when reproducibility was requested.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Operator-specific options.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Fresh RNG for one application: seeded when `seed` is set, OS entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub(crate) fn get_str(&self, key: &str) -> VaryResult<Option<&str>> {
        match self.extra.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(VaryError::validation(format!(
                "option '{key}' must be a string"
            ))),
        }
    }

    pub(crate) fn get_f64(&self, key: &str) -> VaryResult<Option<f64>> {
        match self.extra.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => {
                let n = v.as_f64().ok_or_else(|| {
                    VaryError::validation(format!("option '{key}' must be a number"))
                })?;
                if !n.is_finite() {
                    return Err(VaryError::validation(format!(
                        "option '{key}' must be finite"
                    )));
                }
                Ok(Some(n))
            }
        }
    }

    pub(crate) fn get_option<T: OptionName>(&self, key: &str) -> VaryResult<Option<T>> {
        match self.get_str(key)? {
            None => Ok(None),
            Some(s) => T::parse(s).map(Some).ok_or_else(|| {
                VaryError::validation(format!(
                    "unknown {key} '{s}' (expected one of: {})",
                    T::names().join(", ")
                ))
            }),
        }
    }
}

/// Closed set of named choices an operator accepts through `extra`.
pub(crate) trait OptionName: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.iter().copied().find(|v| v.as_str() == key)
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.as_str()).collect()
    }
}

pub(crate) fn random_sign(rng: &mut StdRng) -> f64 {
    if rng.gen_bool(0.5) { 1.0 } else { -1.0 }
}

pub(crate) fn pick<T: Copy>(rng: &mut StdRng, options: &[T]) -> T {
    options[rng.gen_range(0..options.len())]
}

#[cfg(test)]
#[path = "../../tests/unit/operators/params.rs"]
mod tests;
