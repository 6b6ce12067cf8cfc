use kurbo::Point;

use crate::foundation::error::VaryResult;
use crate::foundation::geometry::{clock_point, span};
use crate::operators::geometry::sorted_by;
use crate::operators::params::{OptionName, pick};
use crate::operators::{OperatorFamily, VariationOperator, VariationParams, VariationRange};
use crate::scene::model::{Offset, Scene};

/// Edge margin used by alignment and linear re-layout.
pub(crate) const MARGIN: f64 = 50.0;
const LINEAR_GAP: f64 = 40.0;
const RADIUS_FACTOR: f64 = 1.5;
const ORIENTATION_BIAS: f64 = 1.5;
pub(crate) const RADIAL_ARCHETYPES: [&str; 3] = ["cycle", "hub_spoke", "radial"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    Inside,
    CalloutLeft,
    CalloutRight,
    Above,
    Below,
}

impl OptionName for Placement {
    const ALL: &'static [Self] = &[
        Self::Inside,
        Self::CalloutLeft,
        Self::CalloutRight,
        Self::Above,
        Self::Below,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::CalloutLeft => "callout_left",
            Self::CalloutRight => "callout_right",
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

impl Placement {
    fn alignment(self) -> &'static str {
        match self {
            Self::CalloutLeft => "right",
            Self::CalloutRight => "left",
            Self::Inside | Self::Above | Self::Below => "center",
        }
    }

    fn offset(self) -> Offset {
        let (x, y) = match self {
            Self::Inside => (0.0, 0.0),
            Self::CalloutLeft => (-40.0, 0.0),
            Self::CalloutRight => (40.0, 0.0),
            Self::Above => (0.0, -30.0),
            Self::Below => (0.0, 30.0),
        };
        Offset { x, y }
    }
}

/// Moves every label to one placement, each with a fixed alignment and callout offset.
#[derive(Clone, Copy, Debug, Default)]
pub struct LabelPlacementVariation;

impl VariationOperator for LabelPlacementVariation {
    fn name(&self) -> &'static str {
        "label_placement"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Layout
    }

    fn description(&self) -> &'static str {
        "Place labels inside, beside, above or below their shapes"
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        let placement = match params.get_option::<Placement>("placement")? {
            Some(p) => p,
            None if params.intensity() < 0.3 => Placement::Inside,
            None => pick(&mut params.rng(), Placement::ALL),
        };
        tracing::debug!(placement = placement.as_str(), "label placement");

        for text in out.shapes.iter_mut().filter_map(|s| s.text.as_mut()) {
            text.placement = Some(placement.as_str().to_string());
            text.alignment = Some(placement.alignment().to_string());
            text.callout_offset = Some(placement.offset());
        }
        Ok(out)
    }

    fn variation_range(&self, scene: &Scene) -> VariationRange {
        let current = scene
            .shapes
            .iter()
            .find_map(|s| s.text.as_ref()?.placement.as_deref());
        VariationRange::default().choice("placement", Placement::names(), current)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Orientation {
    Horizontal,
    Vertical,
    Radial,
}

impl OptionName for Orientation {
    const ALL: &'static [Self] = &[Self::Horizontal, Self::Vertical, Self::Radial];

    fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Radial => "radial",
        }
    }
}

pub(crate) fn detect_orientation(scene: &Scene) -> Orientation {
    if RADIAL_ARCHETYPES.contains(&scene.archetype.as_str()) {
        return Orientation::Radial;
    }
    let xr = span(scene.shapes.iter().map(|s| s.bbox.center().x));
    let yr = span(scene.shapes.iter().map(|s| s.bbox.center().y));
    if yr > ORIENTATION_BIAS * xr {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

/// Re-arranges the diagram horizontally, vertically or around a circle.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrientationVariation;

impl VariationOperator for OrientationVariation {
    fn name(&self) -> &'static str {
        "orientation"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Layout
    }

    fn description(&self) -> &'static str {
        "Switch between horizontal, vertical and radial arrangements"
    }

    fn validate(&self, scene: &Scene) -> bool {
        scene.shapes.len() >= 2
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        if out.shapes.is_empty() {
            return Ok(out);
        }
        let current = detect_orientation(&out);
        let target = match params.get_option::<Orientation>("orientation")? {
            Some(t) => t,
            None => {
                let others = Orientation::ALL
                    .iter()
                    .copied()
                    .filter(|o| *o != current)
                    .collect::<Vec<_>>();
                pick(&mut params.rng(), &others)
            }
        };
        tracing::debug!(
            from = current.as_str(),
            to = target.as_str(),
            "orientation"
        );

        match (current, target) {
            (Orientation::Horizontal, Orientation::Vertical)
            | (Orientation::Vertical, Orientation::Horizontal) => {
                for shape in &mut out.shapes {
                    shape.bbox = shape.bbox.transposed();
                }
            }
            (Orientation::Radial, Orientation::Radial) => {}
            (_, Orientation::Radial) => arrange_radial(&mut out),
            (Orientation::Radial, linear) => arrange_linear(&mut out, linear),
            // already in the requested linear orientation
            _ => {}
        }
        Ok(out)
    }

    fn variation_range(&self, scene: &Scene) -> VariationRange {
        let current = (!scene.shapes.is_empty()).then(|| detect_orientation(scene).as_str());
        VariationRange::default().choice("orientation", Orientation::names(), current)
    }
}

/// Evenly around a circle about the centroid, from 12 o'clock clockwise.
fn arrange_radial(scene: &mut Scene) {
    let Some(center) = scene.shape_centroid() else {
        return;
    };
    let max_dim = scene
        .shapes
        .iter()
        .map(|s| s.bbox.width.max(s.bbox.height))
        .fold(0.0, f64::max);
    let radius = RADIUS_FACTOR * max_dim;
    let n = scene.shapes.len() as f64;
    for (i, shape) in scene.shapes.iter_mut().enumerate() {
        let at = clock_point(center, radius, 360.0 * i as f64 / n);
        shape.bbox = shape.bbox.centered_at(at);
    }
}

/// Fixed-gap row or column from the margin, centred on the cross axis of the canvas.
fn arrange_linear(scene: &mut Scene, target: Orientation) {
    let (cw, ch) = (scene.canvas.width, scene.canvas.height);
    let mut cursor = MARGIN;
    for shape in &mut scene.shapes {
        let b = &mut shape.bbox;
        if target == Orientation::Vertical {
            b.x = (cw - b.width) / 2.0;
            b.y = cursor;
            cursor += b.height + LINEAR_GAP;
        } else {
            b.x = cursor;
            b.y = (ch - b.height) / 2.0;
            cursor += b.width + LINEAR_GAP;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Alignment {
    Left,
    Center,
    Right,
    Distributed,
}

impl OptionName for Alignment {
    const ALL: &'static [Self] = &[Self::Left, Self::Center, Self::Right, Self::Distributed];

    fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Distributed => "distributed",
        }
    }
}

/// Horizontal alignment of every shape against the canvas.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlignmentVariation;

impl VariationOperator for AlignmentVariation {
    fn name(&self) -> &'static str {
        "alignment"
    }

    fn family(&self) -> OperatorFamily {
        OperatorFamily::Layout
    }

    fn description(&self) -> &'static str {
        "Align shapes left, center or right, or distribute them across the canvas"
    }

    fn apply(&self, scene: &Scene, params: &VariationParams) -> VaryResult<Scene> {
        let mut out = scene.clone();
        let alignment = match params.get_option::<Alignment>("alignment")? {
            Some(a) => a,
            None => pick(&mut params.rng(), Alignment::ALL),
        };
        tracing::debug!(alignment = alignment.as_str(), "alignment");

        let cw = out.canvas.width;
        match alignment {
            Alignment::Left => {
                for s in &mut out.shapes {
                    s.bbox.x = MARGIN;
                }
            }
            Alignment::Right => {
                for s in &mut out.shapes {
                    s.bbox.x = cw - MARGIN - s.bbox.width;
                }
            }
            Alignment::Center => {
                for s in &mut out.shapes {
                    s.bbox.x = (cw - s.bbox.width) / 2.0;
                }
            }
            Alignment::Distributed => distribute(&mut out),
        }
        Ok(out)
    }

    fn variation_range(&self, scene: &Scene) -> VariationRange {
        VariationRange::default().choice("alignment", Alignment::names(), detect_alignment(scene))
    }
}

fn distribute(scene: &mut Scene) {
    let n = scene.shapes.len();
    if n == 0 {
        return;
    }
    let order = sorted_by(scene, |b| b.x);
    let total_width = scene.shapes.iter().map(|s| s.bbox.width).sum::<f64>();
    let available = scene.canvas.width - 2.0 * MARGIN;
    let gap = if n > 1 {
        (available - total_width) / (n - 1) as f64
    } else {
        0.0
    };
    let mut x = MARGIN;
    for idx in order {
        let b = &mut scene.shapes[idx].bbox;
        b.x = x;
        x += b.width + gap;
    }
}

fn detect_alignment(scene: &Scene) -> Option<&'static str> {
    if scene.shapes.is_empty() {
        return None;
    }
    let cw = scene.canvas.width;
    let all = |f: &dyn Fn(Point, f64, f64) -> bool| {
        scene
            .shapes
            .iter()
            .all(|s| f(s.bbox.center(), s.bbox.x, s.bbox.width))
    };
    if all(&|_, x, _| (x - MARGIN).abs() < 1e-6) {
        Some(Alignment::Left.as_str())
    } else if all(&|_, x, w| (x + w - (cw - MARGIN)).abs() < 1e-6) {
        Some(Alignment::Right.as_str())
    } else if all(&|c, _, _| (c.x - cw / 2.0).abs() < 1e-6) {
        Some(Alignment::Center.as_str())
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/operators/layout.rs"]
mod tests;
