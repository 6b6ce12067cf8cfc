use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb8;
use crate::foundation::error::{VaryError, VaryResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Client brand policy checked against every produced scene.
///
/// Every field defaults to the permissive choice, so `BrandGuidelines::default()` accepts any
/// scene apart from layout warnings.
pub struct BrandGuidelines {
    /// Colors the brand expects to see used somewhere in the scene.
    pub primary_colors: Vec<String>,
    /// Additional colors shapes may use; empty disables palette-membership checks.
    pub allowed_colors: Vec<String>,
    /// Colors no shape may use.
    pub forbidden_colors: Vec<String>,
    /// Font families allowed for text; empty allows any.
    pub allowed_fonts: Vec<String>,
    /// Smallest corner radius in layout units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_corner_radius: Option<f64>,
    /// Largest corner radius in layout units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_corner_radius: Option<f64>,
    /// Whether drop shadows are permitted.
    pub allow_shadows: bool,
    /// Whether gradient fills and overlays are permitted.
    pub allow_gradients: bool,
    /// Whether glow effects are permitted.
    pub allow_glow: bool,
    /// Largest shadow blur radius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_shadow_blur: Option<f64>,
    /// Color match tolerance as a fraction of the maximum RGB distance, in `[0, 1]`.
    pub color_tolerance: f64,
}

impl Default for BrandGuidelines {
    fn default() -> Self {
        Self {
            primary_colors: Vec::new(),
            allowed_colors: Vec::new(),
            forbidden_colors: Vec::new(),
            allowed_fonts: Vec::new(),
            min_corner_radius: None,
            max_corner_radius: None,
            allow_shadows: true,
            allow_gradients: true,
            allow_glow: true,
            max_shadow_blur: None,
            color_tolerance: 0.1,
        }
    }
}

impl BrandGuidelines {
    /// Parse and validate guidelines from JSON text.
    pub fn from_json_str(s: &str) -> VaryResult<Self> {
        let guidelines: Self = serde_json::from_str(s)?;
        guidelines.validate()?;
        Ok(guidelines)
    }

    /// Guidelines that only forbid the given colors.
    pub fn forbidding<S: AsRef<str>>(colors: &[S]) -> Self {
        Self {
            forbidden_colors: colors.iter().map(|c| c.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    /// Check ranges and color syntax.
    pub fn validate(&self) -> VaryResult<()> {
        if !(0.0..=1.0).contains(&self.color_tolerance) {
            return Err(VaryError::validation(format!(
                "color_tolerance must be within [0, 1], got {}",
                self.color_tolerance
            )));
        }
        if let (Some(lo), Some(hi)) = (self.min_corner_radius, self.max_corner_radius) {
            if lo > hi {
                return Err(VaryError::validation(format!(
                    "min_corner_radius ({lo}) exceeds max_corner_radius ({hi})"
                )));
            }
        }
        if self.max_shadow_blur.is_some_and(|b| b < 0.0) {
            return Err(VaryError::validation("max_shadow_blur must be >= 0"));
        }
        for (field, list) in [
            ("primary_colors", &self.primary_colors),
            ("allowed_colors", &self.allowed_colors),
            ("forbidden_colors", &self.forbidden_colors),
        ] {
            if let Some(bad) = list.iter().find(|c| Rgb8::parse_hex(c).is_none()) {
                return Err(VaryError::validation(format!(
                    "{field} contains '{bad}', which is not a hex color"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn primary_rgb(&self) -> Vec<(&str, Rgb8)> {
        parse_all(&self.primary_colors)
    }

    pub(crate) fn allowed_rgb(&self) -> Vec<(&str, Rgb8)> {
        parse_all(&self.allowed_colors)
    }

    pub(crate) fn forbidden_rgb(&self) -> Vec<(&str, Rgb8)> {
        parse_all(&self.forbidden_colors)
    }

    pub(crate) fn font_allowed(&self, font: &str) -> bool {
        self.allowed_fonts.is_empty()
            || self
                .allowed_fonts
                .iter()
                .any(|f| f.trim().eq_ignore_ascii_case(font.trim()))
    }
}

fn parse_all(colors: &[String]) -> Vec<(&str, Rgb8)> {
    colors
        .iter()
        .filter_map(|c| Rgb8::parse_hex(c).map(|rgb| (c.as_str(), rgb)))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Weights turning a violation count into a compliance score.
///
/// `score = clamp(1 - scale * (error_weight * errors + warning_weight * warnings), 0, 1)`
pub struct ScorePolicy {
    /// Cost of one error.
    pub error_weight: f64,
    /// Cost of one warning.
    pub warning_weight: f64,
    /// Overall multiplier.
    pub scale: f64,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            error_weight: 1.0,
            warning_weight: 0.3,
            scale: 0.1,
        }
    }
}

impl ScorePolicy {
    /// All weights must be finite and non-negative.
    pub fn validate(&self) -> VaryResult<()> {
        for (name, v) in [
            ("error_weight", self.error_weight),
            ("warning_weight", self.warning_weight),
            ("scale", self.scale),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(VaryError::validation(format!(
                    "score policy {name} must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Score for the given violation counts, in `[0, 1]`.
    pub fn score(&self, errors: usize, warnings: usize) -> f64 {
        let penalty =
            self.scale * (self.error_weight * errors as f64 + self.warning_weight * warnings as f64);
        let score = 1.0 - penalty;
        if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/constraints/guidelines.rs"]
mod tests;
