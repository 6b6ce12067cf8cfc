use crate::foundation::error::VaryResult;
use crate::operators::params::{OptionName, pick};
use crate::operators::{OperatorFamily, VariationOperator, VariationParams, VariationRange};
use crate::scene::model::{
    ArcAccent, Bevel, CornerRadius, Glow, GradientOverlay, Ring, Scene, Shadow,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AccentStyle {
    Ring,
    Arc,
    Glow,
    GradientOverlay,
    None,
}

impl OptionName for AccentStyle {
    const ALL: &'static [Self] = &[
        Self::Ring,
        Self::Arc,
        Self::Glow,
        Self::GradientOverlay,
        Self::None,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Arc => "arc",
            Self::Glow => "glow",
            Self::GradientOverlay => "gradient_overlay",
            Self::None => "none",
        }
    }
}

impl AccentStyle {
    /// Candidates for an unspecified style, biased by intensity.
    fn band(intensity: f64) -> &'static [Self] {
        if intensity < 0.33 {
            &[Self::None, Self::Glow]
        } else if intensity < 0.66 {
            Self::ALL
        } else {
            &[Self::Ring, Self::Arc, Self::GradientOverlay]
        }
    }
}

/// Replaces each shape's decorative accent (ring, arc, glow, gradient overlay) with a single
/// style. Shadows and bevels are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccentStyleVariation;

impl VariationOperator for AccentStyleVariation {
    fn name(&self) -> &'static str {
        "accent_style"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Style
    }

    fn description(&self) -> &'static str {
        "Swap decorative accents: ring, arc, glow, gradient overlay or none"
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        let i = params.intensity();
        let style = match params.get_option::<AccentStyle>("style")? {
            Some(s) => s,
            None => pick(&mut params.rng(), AccentStyle::band(i)),
        };
        tracing::debug!(style = style.as_str(), "accent style");

        for shape in &mut out.shapes {
            let color = Some(shape.fill.color.clone());
            let fx = &mut shape.effects;
            fx.clear_accents();
            match style {
                AccentStyle::Ring => {
                    fx.ring = Some(Ring {
                        width: 2.0 + 6.0 * i,
                        offset: 4.0,
                        color,
                    })
                }
                AccentStyle::Arc => {
                    fx.arc = Some(ArcAccent {
                        width: 3.0 + 5.0 * i,
                        start_degrees: 0.0,
                        sweep_degrees: 90.0 + 180.0 * i,
                        color,
                    })
                }
                AccentStyle::Glow => {
                    fx.glow = Some(Glow {
                        radius: 4.0 + 16.0 * i,
                        color,
                        opacity: 0.3 + 0.4 * i,
                    })
                }
                AccentStyle::GradientOverlay => {
                    fx.gradient_overlay = Some(GradientOverlay {
                        angle: 90.0,
                        opacity: 0.15 + 0.35 * i,
                    })
                }
                AccentStyle::None => {}
            }
        }
        Ok(out)
    }

    fn variation_range(&self, scene: &Scene) -> VariationRange {
        let current = scene.shapes.first().map(|s| {
            let fx = &s.effects;
            if fx.ring.is_some() {
                AccentStyle::Ring
            } else if fx.arc.is_some() {
                AccentStyle::Arc
            } else if fx.glow.is_some() {
                AccentStyle::Glow
            } else if fx.gradient_overlay.is_some() {
                AccentStyle::GradientOverlay
            } else {
                AccentStyle::None
            }
            .as_str()
        });
        VariationRange::default().choice("style", AccentStyle::names(), current)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DepthPreset {
    Flat,
    Subtle,
    Soft,
    Elevated,
    ThreeD,
}

impl OptionName for DepthPreset {
    const ALL: &'static [Self] = &[
        Self::Flat,
        Self::Subtle,
        Self::Soft,
        Self::Elevated,
        Self::ThreeD,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Subtle => "subtle",
            Self::Soft => "soft",
            Self::Elevated => "elevated",
            Self::ThreeD => "3d",
        }
    }
}

impl DepthPreset {
    fn from_intensity(i: f64) -> Self {
        if i < 0.2 {
            Self::Flat
        } else if i < 0.4 {
            Self::Subtle
        } else if i < 0.6 {
            Self::Soft
        } else if i < 0.8 {
            Self::Elevated
        } else {
            Self::ThreeD
        }
    }

    fn shadow(self) -> Option<Shadow> {
        let (blur, offset_x, offset_y, opacity) = match self {
            Self::Flat => return None,
            Self::Subtle => (4.0, 0.0, 1.0, 0.10),
            Self::Soft => (12.0, 0.0, 4.0, 0.15),
            Self::Elevated => (24.0, 0.0, 8.0, 0.20),
            Self::ThreeD => (16.0, 4.0, 6.0, 0.30),
        };
        Some(Shadow {
            blur,
            offset_x,
            offset_y,
            color: "#000000".to_string(),
            opacity,
        })
    }

    fn bevel(self) -> Option<Bevel> {
        match self {
            Self::ThreeD => Some(Bevel::default()),
            _ => None,
        }
    }
}

/// Applies one of five ordered depth presets (shadow, plus bevel for `3d`) to every shape.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthVariation;

impl VariationOperator for DepthVariation {
    fn name(&self) -> &'static str {
        "depth"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Style
    }

    fn description(&self) -> &'static str {
        "Set the depth treatment from flat to 3D"
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        let preset = params
            .get_option::<DepthPreset>("depth")?
            .unwrap_or_else(|| DepthPreset::from_intensity(params.intensity()));
        tracing::debug!(depth = preset.as_str(), "depth");

        for shape in &mut out.shapes {
            shape.effects.shadow = preset.shadow();
            shape.effects.bevel = preset.bevel();
        }
        Ok(out)
    }

    fn variation_range(&self, scene: &Scene) -> VariationRange {
        let current = scene.shapes.first().and_then(|s| {
            DepthPreset::ALL
                .iter()
                .find(|p| p.shadow() == s.effects.shadow && p.bevel() == s.effects.bevel)
                .map(|p| p.as_str())
        });
        VariationRange::default().choice("depth", DepthPreset::names(), current)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CornerPreset {
    Sharp,
    Subtle,
    Rounded,
    Pill,
}

impl OptionName for CornerPreset {
    const ALL: &'static [Self] = &[Self::Sharp, Self::Subtle, Self::Rounded, Self::Pill];

    fn as_str(self) -> &'static str {
        match self {
            Self::Sharp => "sharp",
            Self::Subtle => "subtle",
            Self::Rounded => "rounded",
            Self::Pill => "pill",
        }
    }
}

impl CornerPreset {
    fn from_intensity(i: f64) -> Self {
        if i < 0.25 {
            Self::Sharp
        } else if i < 0.5 {
            Self::Subtle
        } else if i < 0.75 {
            Self::Rounded
        } else {
            Self::Pill
        }
    }

    fn radius(self) -> CornerRadius {
        match self {
            Self::Sharp => CornerRadius::Units(0.0),
            Self::Subtle => CornerRadius::Units(4.0),
            Self::Rounded => CornerRadius::Units(8.0),
            Self::Pill => CornerRadius::Relative("50%".to_string()),
        }
    }

    fn auto_shape_type(self) -> &'static str {
        match self {
            Self::Sharp => "rect",
            _ => "roundRect",
        }
    }
}

/// Sets a uniform corner treatment and keeps `auto_shape_type` consistent with it.
#[derive(Clone, Copy, Debug, Default)]
pub struct CornerRadiusVariation;

impl VariationOperator for CornerRadiusVariation {
    fn name(&self) -> &'static str {
        "corner_radius"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Style
    }

    fn description(&self) -> &'static str {
        "Set corners to sharp, subtle, rounded or pill"
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        let preset = params
            .get_option::<CornerPreset>("preset")?
            .unwrap_or_else(|| CornerPreset::from_intensity(params.intensity()));
        tracing::debug!(preset = preset.as_str(), "corner radius");

        for shape in &mut out.shapes {
            shape.corner_radius = Some(preset.radius());
            shape.auto_shape_type = Some(preset.auto_shape_type().to_string());
        }
        Ok(out)
    }

    fn variation_range(&self, scene: &Scene) -> VariationRange {
        let current = scene.shapes.first().and_then(|s| {
            let r = s.corner_radius.as_ref()?;
            CornerPreset::ALL
                .iter()
                .find(|p| &p.radius() == r)
                .map(|p| p.as_str())
        });
        VariationRange::default().choice("preset", CornerPreset::names(), current)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operators/style.rs"]
mod tests;
