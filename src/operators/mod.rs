//! Scene variation operators.
//!
//! Every operator is a pure function `(&Scene, &VariationParams) -> Scene`: the input is
//! borrowed immutably and a new scene value is returned. Operators are grouped into four
//! families that the diverse sampling strategy rotates through.

pub(crate) mod color;
pub(crate) mod geometry;
pub(crate) mod layout;
pub(crate) mod params;
pub(crate) mod range;
pub(crate) mod registry;
pub(crate) mod style;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::VaryResult;
use crate::scene::model::Scene;

pub use params::VariationParams;
pub use range::{ParamRange, VariationRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Operator grouping.
pub enum OperatorFamily {
    /// Theme palette changes.
    Color,
    /// Size and position changes.
    Geometry,
    /// Effects and corner treatment.
    Style,
    /// Arrangement and label placement.
    Layout,
}

impl OperatorFamily {
    /// All families in canonical order.
    pub const ALL: [Self; 4] = [Self::Color, Self::Geometry, Self::Style, Self::Layout];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Geometry => "geometry",
            Self::Style => "style",
            Self::Layout => "layout",
        }
    }
}

impl fmt::Display for OperatorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, pure scene transform.
pub trait VariationOperator: fmt::Debug + Send + Sync {
    /// Stable snake_case name used for dispatch.
    fn name(&self) -> &'static str;

    /// Family used by diverse sampling.
    fn family(&self) -> OperatorFamily;

    /// One-line human description.
    fn description(&self) -> &'static str;

    /// Archetypes this operator is designed for; empty means any.
    fn applicable_archetypes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Structural applicability check beyond the archetype allow-list.
    fn validate(&self, scene: &Scene) -> bool {
        archetype_allowed(self.applicable_archetypes(), scene)
    }

    /// Whether sampling may pick this operator for `scene`.
    fn is_applicable(&self, scene: &Scene) -> bool {
        archetype_allowed(self.applicable_archetypes(), scene) || self.validate(scene)
    }

    /// Produce a varied copy of `scene`.
    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene>;

    /// Concrete options available for `scene`, without applying anything.
    fn variation_range(&self, scene: &Scene) -> VariationRange;
}

fn archetype_allowed(allowed: &[&str], scene: &Scene) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| *a == scene.archetype)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// The built-in operators.
pub enum OperatorKind {
    /// [`PaletteVariation`](color::PaletteVariation).
    Palette,
    /// [`TaperVariation`](geometry::TaperVariation).
    Taper,
    /// [`ScaleVariation`](geometry::ScaleVariation).
    Scale,
    /// [`SpacingVariation`](geometry::SpacingVariation).
    Spacing,
    /// [`AccentStyleVariation`](style::AccentStyleVariation).
    AccentStyle,
    /// [`DepthVariation`](style::DepthVariation).
    Depth,
    /// [`CornerRadiusVariation`](style::CornerRadiusVariation).
    CornerRadius,
    /// [`LabelPlacementVariation`](layout::LabelPlacementVariation).
    LabelPlacement,
    /// [`OrientationVariation`](layout::OrientationVariation).
    Orientation,
    /// [`AlignmentVariation`](layout::AlignmentVariation).
    Alignment,
}

impl OperatorKind {
    /// All built-in operators.
    pub const ALL: [Self; 10] = [
        Self::Palette,
        Self::Taper,
        Self::Scale,
        Self::Spacing,
        Self::AccentStyle,
        Self::Depth,
        Self::CornerRadius,
        Self::LabelPlacement,
        Self::Orientation,
        Self::Alignment,
    ];

    /// Dispatch name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Palette => "palette",
            Self::Taper => "taper",
            Self::Scale => "scale",
            Self::Spacing => "spacing",
            Self::AccentStyle => "accent_style",
            Self::Depth => "depth",
            Self::CornerRadius => "corner_radius",
            Self::LabelPlacement => "label_placement",
            Self::Orientation => "orientation",
            Self::Alignment => "alignment",
        }
    }

    /// Family of the operator.
    pub fn family(self) -> OperatorFamily {
        match self {
            Self::Palette => OperatorFamily::Color,
            Self::Taper | Self::Scale | Self::Spacing => OperatorFamily::Geometry,
            Self::AccentStyle | Self::Depth | Self::CornerRadius => OperatorFamily::Style,
            Self::LabelPlacement | Self::Orientation | Self::Alignment => OperatorFamily::Layout,
        }
    }

    /// Look up by dispatch name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Instantiate the operator with its default configuration.
    pub fn build(self) -> Box<dyn VariationOperator> {
        match self {
            Self::Palette => Box::new(color::PaletteVariation),
            Self::Taper => Box::new(geometry::TaperVariation::default()),
            Self::Scale => Box::new(geometry::ScaleVariation),
            Self::Spacing => Box::new(geometry::SpacingVariation),
            Self::AccentStyle => Box::new(style::AccentStyleVariation),
            Self::Depth => Box::new(style::DepthVariation),
            Self::CornerRadius => Box::new(style::CornerRadiusVariation),
            Self::LabelPlacement => Box::new(layout::LabelPlacementVariation),
            Self::Orientation => Box::new(layout::OrientationVariation),
            Self::Alignment => Box::new(layout::AlignmentVariation),
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operators/kinds.rs"]
mod tests;
