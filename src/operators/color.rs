use crate::foundation::color::{HslColor, Rgb8};
use crate::foundation::error::{VaryError, VaryResult};
use crate::operators::params::{OptionName, pick, random_sign};
use crate::operators::{OperatorFamily, VariationOperator, VariationParams, VariationRange};
use crate::scene::model::{ACCENT_KEYS, DEFAULT_FILL_COLOR, Scene};

const MAX_HUE_SHIFT: f64 = 180.0;
const ANALOGOUS_STEP: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PaletteMode {
    HueShift,
    Complementary,
    Analogous,
    Monochromatic,
    Preset,
}

impl OptionName for PaletteMode {
    const ALL: &'static [Self] = &[
        Self::HueShift,
        Self::Complementary,
        Self::Analogous,
        Self::Monochromatic,
        Self::Preset,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::HueShift => "hue_shift",
            Self::Complementary => "complementary",
            Self::Analogous => "analogous",
            Self::Monochromatic => "monochromatic",
            Self::Preset => "preset",
        }
    }
}

/// Named six-color palettes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PalettePreset {
    Corporate,
    Vibrant,
    Ocean,
    Forest,
    Sunset,
    Pastel,
    Earth,
    Monochrome,
}

impl OptionName for PalettePreset {
    const ALL: &'static [Self] = &[
        Self::Corporate,
        Self::Vibrant,
        Self::Ocean,
        Self::Forest,
        Self::Sunset,
        Self::Pastel,
        Self::Earth,
        Self::Monochrome,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Corporate => "corporate",
            Self::Vibrant => "vibrant",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
            Self::Sunset => "sunset",
            Self::Pastel => "pastel",
            Self::Earth => "earth",
            Self::Monochrome => "monochrome",
        }
    }
}

impl PalettePreset {
    pub(crate) fn colors(self) -> [&'static str; 6] {
        match self {
            Self::Corporate => ["#1E3A8A", "#3B82F6", "#64748B", "#0EA5E9", "#1E293B", "#94A3B8"],
            Self::Vibrant => ["#EC4899", "#8B5CF6", "#F59E0B", "#10B981", "#EF4444", "#3B82F6"],
            Self::Ocean => ["#0EA5E9", "#0284C7", "#06B6D4", "#0891B2", "#67E8F9", "#155E75"],
            Self::Forest => ["#166534", "#22C55E", "#4D7C0F", "#84CC16", "#15803D", "#A3E635"],
            Self::Sunset => ["#F97316", "#EF4444", "#F59E0B", "#DB2777", "#FB923C", "#FBBF24"],
            Self::Pastel => ["#FBCFE8", "#BFDBFE", "#BBF7D0", "#FDE68A", "#DDD6FE", "#FED7AA"],
            Self::Earth => ["#92400E", "#A16207", "#78716C", "#65A30D", "#B45309", "#57534E"],
            Self::Monochrome => ["#111827", "#374151", "#4B5563", "#6B7280", "#9CA3AF", "#D1D5DB"],
        }
    }
}

/// Rewrites the theme's six accents. Shapes keep their fills, so anything that references
/// a theme token follows the new palette while hex literals stay as they are.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaletteVariation;

impl PaletteVariation {
    fn base_color(scene: &Scene, params: &VariationParams) -> VaryResult<HslColor> {
        if let Some(s) = params.get_str("base_color")? {
            let rgb = Rgb8::parse_hex(s).ok_or_else(|| {
                VaryError::validation(format!("base_color '{s}' is not a hex color"))
            })?;
            return Ok(rgb.to_hsl());
        }
        let rgb = scene
            .theme
            .accent(1)
            .and_then(Rgb8::parse_hex)
            .or_else(|| Rgb8::parse_hex(DEFAULT_FILL_COLOR))
            .unwrap_or(Rgb8::new(0x0D, 0x94, 0x88));
        Ok(rgb.to_hsl())
    }
}

impl VariationOperator for PaletteVariation {
    fn name(&self) -> &'static str {
        "palette"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Color
    }

    fn description(&self) -> &'static str {
        "Recolor the theme by hue shift, color harmony or a named palette"
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        let mut rng = params.rng();
        let i = params.intensity();
        let mode = match params.get_option::<PaletteMode>("mode")? {
            Some(m) => m,
            None => pick(&mut rng, PaletteMode::ALL),
        };
        let base = Self::base_color(scene, params)?;

        let colors: Vec<(&'static str, String)> = match mode {
            PaletteMode::HueShift => {
                let degrees = match params.get_f64("degrees")? {
                    Some(d) => d.clamp(-MAX_HUE_SHIFT, MAX_HUE_SHIFT),
                    None => random_sign(&mut rng) * MAX_HUE_SHIFT * i,
                };
                tracing::debug!(degrees, "palette hue shift");
                let accents = out.theme.accents();
                if accents.is_empty() {
                    keyed([base.rotate(degrees).to_hex()])
                } else {
                    // rotated in place, so sparse themes keep their token positions
                    accents
                        .iter()
                        .map(|&(key, c)| {
                            let shifted = match Rgb8::parse_hex(c) {
                                Some(rgb) => rgb.to_hsl().rotate(degrees).to_hex(),
                                None => c.to_string(),
                            };
                            (key, shifted)
                        })
                        .collect()
                }
            }
            PaletteMode::Complementary => {
                let spread = 0.1 + 0.15 * i;
                let steps = [(1.0, 0.0), (0.85, spread), (0.7, -spread)];
                keyed([0.0, 180.0].iter().flat_map(|&rot| {
                    steps
                        .iter()
                        .map(move |&(s, l)| base.rotate(rot).adjust(s, l).to_hex())
                }))
            }
            PaletteMode::Analogous => {
                let lift = 0.08 + 0.12 * i;
                keyed([0.0, -ANALOGOUS_STEP, ANALOGOUS_STEP].iter().flat_map(|&rot| {
                    let hue = base.rotate(rot);
                    [hue.to_hex(), hue.adjust(0.8, lift).to_hex()]
                }))
            }
            PaletteMode::Monochromatic => {
                let spread = 0.5 + 0.5 * i;
                let steps = [
                    (1.0, 0.0),
                    (1.0, -0.2),
                    (0.9, -0.1),
                    (0.85, 0.1),
                    (0.75, 0.2),
                    (0.6, 0.3),
                ];
                keyed(steps.iter().map(|&(s, l)| base.adjust(s, l * spread).to_hex()))
            }
            PaletteMode::Preset => {
                let preset = match params.get_option::<PalettePreset>("preset")? {
                    Some(p) => p,
                    None => pick(&mut rng, PalettePreset::ALL),
                };
                tracing::debug!(preset = preset.as_str(), "palette preset");
                keyed(preset.colors().iter().map(|c| c.to_string()))
            }
        };

        tracing::debug!(mode = mode.as_str(), ?colors, "palette");
        for (key, color) in colors {
            out.theme.set(key, color);
        }
        Ok(out)
    }

    fn variation_range(&self, scene: &Scene) -> VariationRange {
        let current = PalettePreset::ALL
            .iter()
            .find(|p| {
                let accents = scene.theme.accents();
                accents.len() == 6
                    && accents
                        .iter()
                        .zip(p.colors())
                        .all(|((_, a), b)| a.eq_ignore_ascii_case(b))
            })
            .map(|p| p.as_str());
        VariationRange::default()
            .choice("mode", PaletteMode::names(), None)
            .choice("preset", PalettePreset::names(), current)
            .numeric("degrees", -MAX_HUE_SHIFT, MAX_HUE_SHIFT, None)
    }
}

fn keyed(colors: impl IntoIterator<Item = String>) -> Vec<(&'static str, String)> {
    ACCENT_KEYS.iter().copied().zip(colors).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/operators/color.rs"]
mod tests;
