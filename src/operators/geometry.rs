use rand::Rng;

use crate::foundation::error::{VaryError, VaryResult};
use crate::foundation::geometry::span;
use crate::operators::layout::RADIAL_ARCHETYPES;
use crate::operators::params::{OptionName, random_sign};
use crate::operators::{OperatorFamily, VariationOperator, VariationParams, VariationRange};
use crate::scene::model::{BBox, Scene};

const TAPER_SWING: f64 = 0.3;
const TAPER_MIN: f64 = 0.3;
const TAPER_MAX: f64 = 0.9;

const SCALE_SWING: f64 = 0.3;
const SCALE_MIN: f64 = 0.7;
const SCALE_MAX: f64 = 1.3;
const SCALE_JITTER: f64 = 0.1;

const SPACING_SWING: f64 = 0.5;
const SPACING_MIN: f64 = 0.5;
const SPACING_MAX: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaperDirection {
    Narrower,
    Wider,
}

impl OptionName for TaperDirection {
    const ALL: &'static [Self] = &[Self::Narrower, Self::Wider];

    fn as_str(self) -> &'static str {
        match self {
            Self::Narrower => "narrower",
            Self::Wider => "wider",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stack {
    /// Wide at the top, narrowing downwards.
    Funnel,
    /// Narrow at the top, widening downwards.
    Pyramid,
}

/// Adjusts the narrow/wide width ratio of stacked archetypes.
///
/// The ratio is `narrowest / widest` layer. Widths are interpolated linearly from the anchor
/// layer (top of a funnel, bottom of a pyramid) and every layer is re-centred on the anchor.
#[derive(Clone, Copy, Debug)]
pub struct TaperVariation {
    /// Ratio used at zero intensity when `extra.base_taper` is absent.
    pub base_taper: f64,
}

impl Default for TaperVariation {
    fn default() -> Self {
        Self { base_taper: 0.6 }
    }
}

impl TaperVariation {
    /// Operator with a custom base ratio.
    pub fn new(base_taper: f64) -> Self {
        Self { base_taper }
    }
}

impl VariationOperator for TaperVariation {
    fn name(&self) -> &'static str {
        "taper"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Geometry
    }

    fn description(&self) -> &'static str {
        "Change how sharply stacked layers narrow from top to bottom"
    }

    fn applicable_archetypes(&self) -> &'static [&'static str] {
        &["funnel", "pyramid"]
    }

    /// Outside the allow-list, only a vertical stack with one shape per row qualifies.
    fn validate(&self, scene: &Scene) -> bool {
        if scene.shapes.len() < 2 || RADIAL_ARCHETYPES.contains(&scene.archetype.as_str()) {
            return false;
        }
        let order = sorted_by(scene, |b| b.y);
        dominant_axis(scene) == Axis::Vertical
            && order
                .windows(2)
                .all(|w| scene.shapes[w[1]].bbox.y > scene.shapes[w[0]].bbox.y)
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        if out.shapes.len() < 2 {
            return Ok(out);
        }

        let base = params.get_f64("base_taper")?.unwrap_or(self.base_taper);
        if !(0.0..=1.0).contains(&base) {
            return Err(VaryError::validation(format!(
                "base_taper must be within [0, 1], got {base}"
            )));
        }
        let mut rng = params.rng();
        let sign = match params.get_option::<TaperDirection>("direction")? {
            Some(TaperDirection::Narrower) => -1.0,
            Some(TaperDirection::Wider) => 1.0,
            None => random_sign(&mut rng),
        };
        let ratio = (base + sign * TAPER_SWING * params.intensity()).clamp(TAPER_MIN, TAPER_MAX);

        let order = sorted_by(&out, |b| b.y);
        let stack = detect_stack(&out, &order);
        let n = order.len();
        let anchor = match stack {
            Stack::Funnel => out.shapes[order[0]].bbox,
            Stack::Pyramid => out.shapes[order[n - 1]].bbox,
        };
        let anchor_cx = anchor.center().x;
        let wide = anchor.width;
        let narrow = wide * ratio;

        tracing::debug!(?stack, ratio, layers = n, "taper");

        for (rank, &idx) in order.iter().enumerate() {
            let t = rank as f64 / (n - 1) as f64;
            let width = match stack {
                Stack::Funnel => wide + (narrow - wide) * t,
                Stack::Pyramid => narrow + (wide - narrow) * t,
            };
            let bbox = &mut out.shapes[idx].bbox;
            bbox.width = width;
            bbox.x = anchor_cx - width / 2.0;
        }
        Ok(out)
    }

    fn variation_range(&self, scene: &Scene) -> VariationRange {
        let current = (scene.shapes.len() >= 2).then(|| {
            let order = sorted_by(scene, |b| b.y);
            let first = scene.shapes[order[0]].bbox.width;
            let last = scene.shapes[order[order.len() - 1]].bbox.width;
            let (lo, hi) = if first >= last { (last, first) } else { (first, last) };
            if hi > 0.0 { lo / hi } else { 1.0 }
        });
        VariationRange::default()
            .numeric("base_taper", TAPER_MIN, TAPER_MAX, current)
            .choice("direction", TaperDirection::names(), None)
    }
}

fn detect_stack(scene: &Scene, order: &[usize]) -> Stack {
    match scene.archetype.as_str() {
        "funnel" => Stack::Funnel,
        "pyramid" => Stack::Pyramid,
        _ => {
            let first = scene.shapes[order[0]].bbox.width;
            let last = scene.shapes[order[order.len() - 1]].bbox.width;
            if first >= last {
                Stack::Funnel
            } else {
                Stack::Pyramid
            }
        }
    }
}

/// Shape indices ordered by a bbox key; ties keep document order.
pub(crate) fn sorted_by(scene: &Scene, key: impl Fn(&BBox) -> f64) -> Vec<usize> {
    let mut order = (0..scene.shapes.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| key(&scene.shapes[a].bbox).total_cmp(&key(&scene.shapes[b].bbox)));
    order
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScaleMode {
    Uniform,
    Differential,
}

impl OptionName for ScaleMode {
    const ALL: &'static [Self] = &[Self::Uniform, Self::Differential];

    fn as_str(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Differential => "differential",
        }
    }
}

/// Resizes shapes, either together about the shared centroid or each about its own center.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScaleVariation;

impl VariationOperator for ScaleVariation {
    fn name(&self) -> &'static str {
        "scale"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Geometry
    }

    fn description(&self) -> &'static str {
        "Scale shapes uniformly around their centroid or jitter each shape's size"
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        let mut rng = params.rng();
        let mode = params
            .get_option::<ScaleMode>("mode")?
            .unwrap_or(ScaleMode::Uniform);

        match mode {
            ScaleMode::Uniform => {
                let factor = match params.get_f64("factor")? {
                    Some(f) => f,
                    None => 1.0 + random_sign(&mut rng) * SCALE_SWING * params.intensity(),
                }
                .clamp(SCALE_MIN, SCALE_MAX);
                let Some(c) = out.shape_centroid() else {
                    return Ok(out);
                };
                tracing::debug!(factor, "uniform scale");
                for shape in &mut out.shapes {
                    let center = c + (shape.bbox.center() - c) * factor;
                    shape.bbox = scaled(shape.bbox, factor).centered_at(center);
                }
            }
            ScaleMode::Differential => {
                for shape in &mut out.shapes {
                    let jitter = rng.gen_range(-1.0..=1.0) * SCALE_JITTER * params.intensity();
                    let center = shape.bbox.center();
                    shape.bbox = scaled(shape.bbox, 1.0 + jitter).centered_at(center);
                }
            }
        }
        Ok(out)
    }

    fn variation_range(&self, _scene: &Scene) -> VariationRange {
        VariationRange::default()
            .choice("mode", ScaleMode::names(), Some(ScaleMode::Uniform.as_str()))
            .numeric("factor", SCALE_MIN, SCALE_MAX, Some(1.0))
    }
}

fn scaled(b: BBox, factor: f64) -> BBox {
    BBox {
        width: b.width * factor,
        height: b.height * factor,
        ..b
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    Horizontal,
    Vertical,
}

impl OptionName for Axis {
    const ALL: &'static [Self] = &[Self::Horizontal, Self::Vertical];

    fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl Axis {
    fn pos(self, b: &BBox) -> f64 {
        match self {
            Self::Horizontal => b.x,
            Self::Vertical => b.y,
        }
    }

    fn size(self, b: &BBox) -> f64 {
        match self {
            Self::Horizontal => b.width,
            Self::Vertical => b.height,
        }
    }

    fn set_pos(self, b: &mut BBox, v: f64) {
        match self {
            Self::Horizontal => b.x = v,
            Self::Vertical => b.y = v,
        }
    }
}

/// Axis along which the shapes are spread out the most.
pub(crate) fn dominant_axis(scene: &Scene) -> Axis {
    let xs = span(scene.shapes.iter().map(|s| s.bbox.center().x));
    let ys = span(scene.shapes.iter().map(|s| s.bbox.center().y));
    if ys > xs {
        Axis::Vertical
    } else {
        Axis::Horizontal
    }
}

/// Stretches or compresses the gaps between consecutive shapes along the dominant axis.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpacingVariation;

impl VariationOperator for SpacingVariation {
    fn name(&self) -> &'static str {
        "spacing"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Geometry
    }

    fn description(&self) -> &'static str {
        "Tighten or loosen the gaps between shapes along the main axis"
    }

    fn validate(&self, scene: &Scene) -> bool {
        scene.shapes.len() >= 2
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        if out.shapes.len() < 2 {
            return Ok(out);
        }
        let mut rng = params.rng();
        let axis = match params.get_option::<Axis>("axis")? {
            Some(a) => a,
            None => dominant_axis(&out),
        };
        let multiplier = match params.get_f64("multiplier")? {
            Some(m) => m,
            None => 1.0 + random_sign(&mut rng) * SPACING_SWING * params.intensity(),
        }
        .clamp(SPACING_MIN, SPACING_MAX);

        tracing::debug!(?axis, multiplier, "spacing");

        let order = sorted_by(&out, |b| axis.pos(b));
        let mut prev = out.shapes[order[0]].bbox;
        let mut prev_new_pos = axis.pos(&prev);
        for &idx in &order[1..] {
            let cur = out.shapes[idx].bbox;
            let gap = axis.pos(&cur) - (axis.pos(&prev) + axis.size(&prev));
            let new_pos = prev_new_pos + axis.size(&prev) + gap * multiplier;
            axis.set_pos(&mut out.shapes[idx].bbox, new_pos);
            prev = cur;
            prev_new_pos = new_pos;
        }
        Ok(out)
    }

    fn variation_range(&self, scene: &Scene) -> VariationRange {
        let axis = (!scene.shapes.is_empty()).then(|| dominant_axis(scene).as_str());
        VariationRange::default()
            .numeric("multiplier", SPACING_MIN, SPACING_MAX, Some(1.0))
            .choice("axis", Axis::names(), axis)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operators/geometry.rs"]
mod tests;
