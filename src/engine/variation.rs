use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::constraints::checker::{BrandConstraintChecker, ConstraintViolation};
use crate::constraints::guidelines::{BrandGuidelines, ScorePolicy};
use crate::engine::presets::{self, DEFAULT_PRESET, PRESET_NAMES};
use crate::foundation::error::{VaryError, VaryResult};
use crate::operators::registry::OperatorRegistry;
use crate::operators::{OperatorFamily, VariationOperator, VariationParams, VariationRange};
use crate::sampling::sampler::{SamplerConfig, SamplingStrategy, VariationSample, VariationSampler};
use crate::scene::model::Scene;

/// Seed used by [`VariationEngine::preview_variation`].
pub const PREVIEW_SEED: u64 = 42;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Engine options beyond the brand guidelines.
pub struct EngineConfig {
    /// Batch sampling options.
    pub sampler: SamplerConfig,
    /// Violation weights used for the compliance score.
    pub score: ScorePolicy,
    /// Repair invalid results before returning them.
    pub auto_enforce: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            score: ScorePolicy::default(),
            auto_enforce: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate options from JSON text.
    pub fn from_json_str(s: &str) -> VaryResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the nested sampler and score options.
    pub fn validate(&self) -> VaryResult<()> {
        self.sampler.validate()?;
        self.score.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A varied scene with its compliance report.
pub struct VariationResult {
    /// The resulting scene, repaired when auto-enforce is on and it was invalid.
    pub scene: Scene,
    /// Operators applied, in order.
    pub operators_applied: Vec<String>,
    /// Compliance score in `[0, 1]`.
    pub score: f64,
    /// True iff no error-severity violation remains.
    pub is_valid: bool,
    /// Seed the result can be reproduced with, when one was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Violations remaining on `scene`.
    #[serde(default)]
    pub violations: Vec<ConstraintViolation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Description of one operator applicable to a scene, for driving client controls.
pub struct OperatorInfo {
    /// Dispatch name.
    pub name: String,
    /// Operator family.
    pub family: OperatorFamily,
    /// One-line description.
    pub description: String,
    /// Options available for the scene it was computed for.
    pub range: VariationRange,
}

/// Orchestrates operators, sampling and brand checking.
///
/// The engine only holds construction-time configuration, so one instance can serve
/// concurrent callers; every call works on its own scene value.
#[derive(Debug)]
pub struct VariationEngine {
    registry: OperatorRegistry,
    checker: BrandConstraintChecker,
    sampler: VariationSampler,
    auto_enforce: bool,
}

impl Default for VariationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl VariationEngine {
    /// Engine with the built-in operators and permissive guidelines.
    pub fn new() -> Self {
        Self {
            registry: OperatorRegistry::with_builtins(),
            checker: BrandConstraintChecker::default(),
            sampler: VariationSampler::default(),
            auto_enforce: true,
        }
    }

    /// Engine checking against `guidelines`.
    pub fn with_guidelines(guidelines: BrandGuidelines) -> VaryResult<Self> {
        Self::with_config(guidelines, EngineConfig::default())
    }

    /// Engine with explicit guidelines and options.
    pub fn with_config(guidelines: BrandGuidelines, config: EngineConfig) -> VaryResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: OperatorRegistry::with_builtins(),
            checker: BrandConstraintChecker::with_policy(guidelines, config.score)?,
            sampler: VariationSampler::new(config.sampler)?,
            auto_enforce: config.auto_enforce,
        })
    }

    /// Add or replace an operator.
    pub fn register(&mut self, op: Box<dyn VariationOperator>) {
        self.registry.register(op);
    }

    /// Operator registry.
    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Brand checker.
    pub fn checker(&self) -> &BrandConstraintChecker {
        &self.checker
    }

    /// Batch sampler.
    pub fn sampler(&self) -> &VariationSampler {
        &self.sampler
    }

    /// Apply one operator, then check (and repair) the result.
    #[tracing::instrument(skip(self, scene, params))]
    pub fn apply_variation(
        &self,
        scene: &Scene,
        op: &str,
        params: &VariationParams,
    ) -> VaryResult<VariationResult> {
        let operator = self.registry.get(op)?;
        let varied = operator.apply(scene, params)?;
        Ok(self.finish(varied, vec![op.to_string()], params.seed()))
    }

    /// Apply several operators in order to one scene value, checking once at the end.
    ///
    /// All names are resolved before anything is applied. The reported seed is the first
    /// seed found among the steps.
    #[tracing::instrument(skip_all, fields(steps = steps.len()))]
    pub fn apply_chain<S: AsRef<str>>(
        &self,
        scene: &Scene,
        steps: &[(S, VariationParams)],
    ) -> VaryResult<VariationResult> {
        let resolved = steps
            .iter()
            .map(|(name, params)| -> VaryResult<_> {
                Ok((self.registry.get(name.as_ref())?, params))
            })
            .collect::<VaryResult<Vec<_>>>()?;

        let mut current = scene.clone();
        let mut applied = Vec::with_capacity(resolved.len());
        for (op, params) in resolved {
            current = op.apply(&current, params)?;
            applied.push(op.name().to_string());
        }
        let seed = steps.iter().find_map(|(_, p)| p.seed());
        Ok(self.finish(current, applied, seed))
    }

    /// Generate up to `count` variations with a sampling strategy.
    ///
    /// Unknown strategy names fall back to `random`; `combination` uses the configured
    /// combination size. Samples whose operator fails are dropped, so fewer than `count`
    /// results may come back.
    #[tracing::instrument(skip(self, scene))]
    pub fn generate_variations(
        &self,
        scene: &Scene,
        count: usize,
        strategy: &str,
        seed: Option<u64>,
    ) -> Vec<VariationResult> {
        let mut rng = batch_rng(seed);
        let samples = match SamplingStrategy::parse_lossy(strategy) {
            SamplingStrategy::Random => {
                self.sampler.random(&self.registry, scene, count, &mut rng)
            }
            SamplingStrategy::Grid => self.sampler.grid(&self.registry, scene, None, count, &mut rng),
            SamplingStrategy::Diverse => {
                self.sampler.diverse(&self.registry, scene, count, &mut rng)
            }
            SamplingStrategy::Combination => {
                let chains = self
                    .sampler
                    .combinations(&self.registry, scene, count, None, &mut rng);
                return self.apply_chains(scene, chains);
            }
        };

        samples
            .into_iter()
            .filter_map(|s| {
                self.apply_variation(scene, &s.operator, &s.params)
                    .map_err(|err| {
                        tracing::warn!(operator = %s.operator, %err, "dropping failed variation");
                    })
                    .ok()
            })
            .collect()
    }

    /// Generate up to `count` variations, each chaining `ops_per_variation` distinct
    /// operators at damped intensity.
    #[tracing::instrument(skip(self, scene))]
    pub fn generate_combination_variations(
        &self,
        scene: &Scene,
        count: usize,
        ops_per_variation: usize,
        seed: Option<u64>,
    ) -> Vec<VariationResult> {
        let mut rng = batch_rng(seed);
        let chains = self.sampler.combinations(
            &self.registry,
            scene,
            count,
            Some(ops_per_variation.max(1)),
            &mut rng,
        );
        self.apply_chains(scene, chains)
    }

    /// Run a named preset chain; unknown names run `modern`.
    #[tracing::instrument(skip(self, scene))]
    pub fn apply_preset(
        &self,
        scene: &Scene,
        name: &str,
        seed: Option<u64>,
    ) -> VaryResult<VariationResult> {
        let steps = match presets::preset_steps(name) {
            Some(steps) => steps,
            None => {
                tracing::warn!(preset = name, "unknown preset, using {DEFAULT_PRESET}");
                presets::preset_steps(DEFAULT_PRESET).ok_or_else(|| {
                    VaryError::validation(format!("preset '{DEFAULT_PRESET}' is missing"))
                })?
            }
        };
        let chain = steps
            .iter()
            .map(|step| (step.kind.name(), step.params(seed)))
            .collect::<Vec<_>>();
        self.apply_chain(scene, &chain)
    }

    /// Operators applicable to `scene`, with their options for it.
    pub fn available_operators(&self, scene: &Scene) -> Vec<OperatorInfo> {
        self.registry
            .applicable(scene)
            .into_iter()
            .map(|op| OperatorInfo {
                name: op.name().to_string(),
                family: op.family(),
                description: op.description().to_string(),
                range: op.variation_range(scene),
            })
            .collect()
    }

    /// Apply one operator at each intensity with the fixed [`PREVIEW_SEED`].
    #[tracing::instrument(skip(self, scene))]
    pub fn preview_variation(
        &self,
        scene: &Scene,
        op: &str,
        intensities: &[f64],
    ) -> VaryResult<Vec<VariationResult>> {
        self.registry.get(op)?;
        intensities
            .iter()
            .map(|&i| {
                let params = VariationParams::new(i)?.with_seed(PREVIEW_SEED);
                self.apply_variation(scene, op, &params)
            })
            .collect()
    }

    /// Names accepted by [`VariationEngine::apply_preset`].
    pub fn preset_names() -> &'static [&'static str] {
        &PRESET_NAMES
    }

    /// Registered operator names.
    pub fn operator_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    fn apply_chains(
        &self,
        scene: &Scene,
        chains: Vec<Vec<VariationSample>>,
    ) -> Vec<VariationResult> {
        chains
            .into_iter()
            .filter_map(|chain| {
                let steps = chain
                    .into_iter()
                    .map(|s| (s.operator, s.params))
                    .collect::<Vec<_>>();
                self.apply_chain(scene, &steps)
                    .map_err(|err| {
                        tracing::warn!(%err, "dropping failed combination");
                    })
                    .ok()
            })
            .collect()
    }

    fn finish(
        &self,
        mut scene: Scene,
        operators_applied: Vec<String>,
        seed: Option<u64>,
    ) -> VariationResult {
        let mut result = self.checker.check(&scene);
        if !result.is_valid && self.auto_enforce {
            let (fixed, fixed_result) = self.checker.enforce(&scene);
            tracing::debug!(
                before = result.violations.len(),
                after = fixed_result.violations.len(),
                "auto-enforced"
            );
            scene = fixed;
            result = fixed_result;
        }
        VariationResult {
            scene,
            operators_applied,
            score: result.score,
            is_valid: result.is_valid,
            seed,
            violations: result.violations,
        }
    }
}

fn batch_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/variation.rs"]
mod tests;
