use crate::operators::{OperatorKind, VariationParams};

/// One step of a preset chain.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PresetStep {
    pub(crate) kind: OperatorKind,
    pub(crate) intensity: f64,
    pub(crate) extra: &'static [(&'static str, &'static str)],
}

impl PresetStep {
    const fn new(
        kind: OperatorKind,
        intensity: f64,
        extra: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            kind,
            intensity,
            extra,
        }
    }

    pub(crate) fn params(&self, seed: Option<u64>) -> VariationParams {
        self.extra
            .iter()
            .fold(VariationParams::from_unit(self.intensity), |p, (k, v)| {
                p.with_extra(*k, *v)
            })
            .with_seed_opt(seed)
    }
}

/// Preset used when a requested name is unknown.
pub(crate) const DEFAULT_PRESET: &str = "modern";

/// Preset names in declaration order.
pub const PRESET_NAMES: [&str; 5] = ["modern", "vibrant", "minimal", "corporate", "playful"];

const MODERN: &[PresetStep] = &[
    PresetStep::new(OperatorKind::CornerRadius, 0.6, &[("preset", "rounded")]),
    PresetStep::new(OperatorKind::Depth, 0.5, &[("depth", "soft")]),
    PresetStep::new(OperatorKind::AccentStyle, 0.2, &[("style", "none")]),
    PresetStep::new(OperatorKind::LabelPlacement, 0.1, &[("placement", "inside")]),
];

const VIBRANT: &[PresetStep] = &[
    PresetStep::new(
        OperatorKind::Palette,
        0.8,
        &[("mode", "preset"), ("preset", "vibrant")],
    ),
    PresetStep::new(OperatorKind::AccentStyle, 0.6, &[("style", "glow")]),
    PresetStep::new(OperatorKind::Depth, 0.7, &[("depth", "elevated")]),
];

const MINIMAL: &[PresetStep] = &[
    PresetStep::new(
        OperatorKind::Palette,
        0.3,
        &[("mode", "preset"), ("preset", "monochrome")],
    ),
    PresetStep::new(OperatorKind::Depth, 0.0, &[("depth", "flat")]),
    PresetStep::new(OperatorKind::AccentStyle, 0.0, &[("style", "none")]),
    PresetStep::new(OperatorKind::CornerRadius, 0.0, &[("preset", "sharp")]),
];

const CORPORATE: &[PresetStep] = &[
    PresetStep::new(
        OperatorKind::Palette,
        0.5,
        &[("mode", "preset"), ("preset", "corporate")],
    ),
    PresetStep::new(OperatorKind::CornerRadius, 0.3, &[("preset", "subtle")]),
    PresetStep::new(OperatorKind::Depth, 0.3, &[("depth", "subtle")]),
    PresetStep::new(OperatorKind::AccentStyle, 0.2, &[("style", "none")]),
];

const PLAYFUL: &[PresetStep] = &[
    PresetStep::new(
        OperatorKind::Palette,
        0.7,
        &[("mode", "preset"), ("preset", "pastel")],
    ),
    PresetStep::new(OperatorKind::CornerRadius, 0.9, &[("preset", "pill")]),
    PresetStep::new(OperatorKind::AccentStyle, 0.7, &[("style", "ring")]),
    PresetStep::new(OperatorKind::Depth, 0.9, &[("depth", "3d")]),
];

/// Steps for a named preset, `None` when the name is unknown.
pub(crate) fn preset_steps(name: &str) -> Option<&'static [PresetStep]> {
    match name.trim().to_ascii_lowercase().as_str() {
        "modern" => Some(MODERN),
        "vibrant" => Some(VIBRANT),
        "minimal" => Some(MINIMAL),
        "corporate" => Some(CORPORATE),
        "playful" => Some(PLAYFUL),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/presets.rs"]
mod tests;
