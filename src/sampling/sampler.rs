use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{VaryError, VaryResult};
use crate::operators::registry::OperatorRegistry;
use crate::operators::{OperatorFamily, VariationOperator, VariationParams};
use crate::scene::model::Scene;

const EXTREME_BAND: f64 = 0.2;
const CENTER_BAND: [f64; 2] = [0.4, 0.6];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// How a batch of samples is drawn.
pub enum SamplingStrategy {
    /// Weighted operator choice with a uniform intensity.
    Random,
    /// Operators crossed with evenly spaced intensities.
    Grid,
    /// Rotate through operator families with extreme or centred intensities.
    Diverse,
    /// Several distinct operators per variation at damped intensity.
    Combination,
}

impl SamplingStrategy {
    /// Every strategy.
    pub const ALL: [Self; 4] = [Self::Random, Self::Grid, Self::Diverse, Self::Combination];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Grid => "grid",
            Self::Diverse => "diverse",
            Self::Combination => "combination",
        }
    }

    /// Parse a strategy name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// Parse a strategy name, falling back to [`SamplingStrategy::Random`].
    pub fn parse_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(strategy = s, "unknown sampling strategy, using random");
            Self::Random
        })
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Sampler tuning.
pub struct SamplerConfig {
    /// Intensities are drawn from `[lo, hi]`, a sub-range of `[0, 1]`.
    pub intensity_range: [f64; 2],
    /// Relative operator weights by name; missing names weigh 1.0, zero disables.
    pub weights: BTreeMap<String, f64>,
    /// Number of intensities per operator in grid mode.
    pub grid_steps: usize,
    /// Above 0.5 diverse mode favours extreme intensities.
    pub diversity: f64,
    /// Operators per variation in combination mode.
    pub combination_size: usize,
    /// Intensity multiplier applied to every step of a combination.
    pub combination_damping: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            intensity_range: [0.2, 0.9],
            weights: BTreeMap::new(),
            grid_steps: 5,
            diversity: 0.7,
            combination_size: 2,
            combination_damping: 0.7,
        }
    }
}

impl SamplerConfig {
    /// Check ranges.
    pub fn validate(&self) -> VaryResult<()> {
        let [lo, hi] = self.intensity_range;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return Err(VaryError::validation(format!(
                "intensity_range must satisfy 0 <= lo <= hi <= 1, got [{lo}, {hi}]"
            )));
        }
        if let Some((name, w)) = self
            .weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(VaryError::validation(format!(
                "weight for '{name}' must be finite and >= 0, got {w}"
            )));
        }
        let total = self.weights.values().sum::<f64>();
        if !total.is_finite() {
            return Err(VaryError::validation(format!(
                "operator weights must have a finite sum, got {total}"
            )));
        }
        if self.grid_steps == 0 {
            return Err(VaryError::validation("grid_steps must be > 0"));
        }
        if self.combination_size == 0 {
            return Err(VaryError::validation("combination_size must be > 0"));
        }
        for (name, v) in [
            ("diversity", self.diversity),
            ("combination_damping", self.combination_damping),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(VaryError::validation(format!(
                    "{name} must be within [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Weight for an operator name.
    pub fn weight(&self, name: &str) -> f64 {
        self.weights.get(name).copied().unwrap_or(1.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One operator application chosen by the sampler.
pub struct VariationSample {
    /// Operator name.
    pub operator: String,
    /// Parameters, always carrying a seed.
    pub params: VariationParams,
}

/// Picks operators and parameters for batch generation.
///
/// The sampler owns no RNG; every method draws from the one passed in, so a seeded
/// caller gets a reproducible batch.
#[derive(Clone, Debug, Default)]
pub struct VariationSampler {
    config: SamplerConfig,
}

impl VariationSampler {
    /// Sampler with validated configuration.
    pub fn new(config: SamplerConfig) -> VaryResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Operators of `registry` that may be used on `scene`.
    pub fn applicable<'a>(
        &self,
        registry: &'a OperatorRegistry,
        scene: &Scene,
    ) -> Vec<&'a dyn VariationOperator> {
        registry.applicable(scene)
    }

    /// `count` weighted picks, each with a uniform intensity.
    pub fn random(
        &self,
        registry: &OperatorRegistry,
        scene: &Scene,
        count: usize,
        rng: &mut StdRng,
    ) -> Vec<VariationSample> {
        let ops = self.applicable(registry, scene);
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(idx) = self.weighted_index(&ops, rng) else {
                break;
            };
            let intensity = self.uniform_intensity(rng);
            out.push(sample(ops[idx], intensity, rng));
        }
        tracing::debug!(requested = count, drawn = out.len(), "random samples");
        out
    }

    /// Applicable operators (restricted to `only` when given) crossed with `grid_steps`
    /// evenly spaced intensities, operator-major, truncated to `count`.
    pub fn grid(
        &self,
        registry: &OperatorRegistry,
        scene: &Scene,
        only: Option<&[&str]>,
        count: usize,
        rng: &mut StdRng,
    ) -> Vec<VariationSample> {
        let ops = self
            .applicable(registry, scene)
            .into_iter()
            .filter(|op| only.is_none_or(|names| names.contains(&op.name())))
            .collect::<Vec<_>>();
        let steps = self.grid_intensities();
        let mut out = Vec::with_capacity(count.min(ops.len() * steps.len()));
        'outer: for op in &ops {
            for &intensity in &steps {
                if out.len() >= count {
                    break 'outer;
                }
                out.push(sample(*op, intensity, rng));
            }
        }
        tracing::debug!(operators = ops.len(), steps = steps.len(), drawn = out.len(), "grid samples");
        out
    }

    /// Weighted picks that avoid repeating a family until every available family was used.
    pub fn diverse(
        &self,
        registry: &OperatorRegistry,
        scene: &Scene,
        count: usize,
        rng: &mut StdRng,
    ) -> Vec<VariationSample> {
        let ops = self.applicable(registry, scene);
        let mut used: BTreeSet<OperatorFamily> = BTreeSet::new();
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let mut fresh = ops
                .iter()
                .copied()
                .filter(|op| !used.contains(&op.family()))
                .collect::<Vec<_>>();
            if !self.any_weighted(&fresh) {
                used.clear();
                fresh = ops.clone();
            }
            let Some(idx) = self.weighted_index(&fresh, rng) else {
                break;
            };
            let op = fresh[idx];
            used.insert(op.family());
            if used.len() == OperatorFamily::ALL.len() {
                used.clear();
            }
            let intensity = self.diverse_intensity(rng);
            out.push(sample(op, intensity, rng));
        }
        tracing::debug!(requested = count, drawn = out.len(), "diverse samples");
        out
    }

    /// `count` chains of `size` distinct operators (default `combination_size`), each step at
    /// `combination_damping` times a uniform intensity.
    pub fn combinations(
        &self,
        registry: &OperatorRegistry,
        scene: &Scene,
        count: usize,
        size: Option<usize>,
        rng: &mut StdRng,
    ) -> Vec<Vec<VariationSample>> {
        let ops = self.applicable(registry, scene);
        let size = size.unwrap_or(self.config.combination_size);
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let mut pool = ops.clone();
            let mut chain = Vec::with_capacity(size);
            while chain.len() < size {
                let Some(idx) = self.weighted_index(&pool, rng) else {
                    break;
                };
                let op = pool.remove(idx);
                let intensity = self.config.combination_damping * self.uniform_intensity(rng);
                chain.push(sample(op, intensity, rng));
            }
            if chain.is_empty() {
                break;
            }
            out.push(chain);
        }
        tracing::debug!(requested = count, size, drawn = out.len(), "combination samples");
        out
    }

    /// Cumulative-weight inverse-CDF pick. `None` when nothing has positive weight.
    fn weighted_index(&self, ops: &[&dyn VariationOperator], rng: &mut StdRng) -> Option<usize> {
        let weights = ops
            .iter()
            .map(|op| self.config.weight(op.name()))
            .collect::<Vec<_>>();
        let total = weights.iter().filter(|w| **w > 0.0).sum::<f64>();
        if total <= 0.0 {
            return None;
        }
        bucket(&weights, rng.gen_range(0.0..total))
    }

    fn any_weighted(&self, ops: &[&dyn VariationOperator]) -> bool {
        ops.iter().any(|op| self.config.weight(op.name()) > 0.0)
    }

    fn uniform_intensity(&self, rng: &mut StdRng) -> f64 {
        let [lo, hi] = self.config.intensity_range;
        uniform(rng, lo, hi)
    }

    fn grid_intensities(&self) -> Vec<f64> {
        let [lo, hi] = self.config.intensity_range;
        let k = self.config.grid_steps;
        if k == 1 {
            return vec![(lo + hi) / 2.0];
        }
        (0..k)
            .map(|j| lo + (hi - lo) * j as f64 / (k - 1) as f64)
            .collect()
    }

    fn diverse_intensity(&self, rng: &mut StdRng) -> f64 {
        let [lo, hi] = self.config.intensity_range;
        if self.config.diversity > 0.5 {
            if rng.gen_bool(0.5) {
                uniform(rng, lo, (lo + EXTREME_BAND).min(hi))
            } else {
                uniform(rng, (hi - EXTREME_BAND).max(lo), hi)
            }
        } else {
            uniform(rng, CENTER_BAND[0], CENTER_BAND[1])
        }
    }
}

/// Index of the bucket containing `r`, skipping non-positive weights. A draw past every
/// bucket resolves to the last positively weighted index.
fn bucket(weights: &[f64], r: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    let mut last = None;
    for (i, w) in weights.iter().enumerate() {
        if *w <= 0.0 {
            continue;
        }
        cumulative += w;
        if r <= cumulative {
            return Some(i);
        }
        last = Some(i);
    }
    last
}

fn uniform(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}

fn sample(op: &dyn VariationOperator, intensity: f64, rng: &mut StdRng) -> VariationSample {
    VariationSample {
        operator: op.name().to_string(),
        params: VariationParams::from_unit(intensity).with_seed(rng.next_u64()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/sampler.rs"]
mod tests;
