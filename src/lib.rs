//! scenevary is a constrained generative variation engine for diagram scenes.
//!
//! Given a declarative [`Scene`] (canvas, shapes, theme colors and an archetype label) the
//! engine produces structural and stylistic variations and heals violations of a client
//! [`BrandGuidelines`] policy:
//!
//! - Pick an operator directly ([`VariationEngine::apply_variation`]), chain several
//!   ([`VariationEngine::apply_chain`]) or run a named preset
//!   ([`VariationEngine::apply_preset`])
//! - Generate batches with a [`SamplingStrategy`]
//!   ([`VariationEngine::generate_variations`])
//! - Inspect each [`VariationResult`] for its compliance score and remaining violations
//!
//! Operators never mutate their input: they borrow a scene and return a new one. All
//! randomness comes from explicit seeds.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod constraints;
pub(crate) mod engine;
pub mod operators;
pub(crate) mod sampling;
pub(crate) mod scene;

pub use crate::foundation::color::{HslColor, MAX_RGB_DISTANCE, Rgb8, normalize_hex};
pub use crate::foundation::error::{VaryError, VaryResult};

pub use crate::constraints::checker::{
    BrandConstraintChecker, ConstraintResult, ConstraintViolation, Severity, ViolationCategory,
};
pub use crate::constraints::guidelines::{BrandGuidelines, ScorePolicy};
pub use crate::engine::presets::PRESET_NAMES;
pub use crate::engine::variation::{
    EngineConfig, OperatorInfo, PREVIEW_SEED, VariationEngine, VariationResult,
};
pub use crate::operators::color::PaletteVariation;
pub use crate::operators::geometry::{ScaleVariation, SpacingVariation, TaperVariation};
pub use crate::operators::layout::{
    AlignmentVariation, LabelPlacementVariation, OrientationVariation,
};
pub use crate::operators::registry::OperatorRegistry;
pub use crate::operators::style::{AccentStyleVariation, CornerRadiusVariation, DepthVariation};
pub use crate::operators::{
    OperatorFamily, OperatorKind, ParamRange, VariationOperator, VariationParams, VariationRange,
};
pub use crate::sampling::sampler::{
    SamplerConfig, SamplingStrategy, VariationSample, VariationSampler,
};
pub use crate::scene::model::{
    ACCENT_KEYS, ArcAccent, BBox, Bevel, Canvas, CornerRadius, DEFAULT_FILL_COLOR, Effects, Fill,
    FillKind, Glow, GradientOverlay, GradientStop, Offset, Ring, Scene, Shadow, Shape, TextBlock,
    Theme,
};
