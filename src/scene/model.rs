use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::foundation::color::Rgb8;
use crate::foundation::error::VaryResult;
use crate::foundation::geometry;

/// Fill color used when a shape arrives without one.
pub const DEFAULT_FILL_COLOR: &str = "#0D9488";

/// Theme token names, in order.
pub const ACCENT_KEYS: [&str; 6] = ["accent1", "accent2", "accent3", "accent4", "accent5", "accent6"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A declarative diagram document.
///
/// The model is lenient on input: missing fields fall back to defaults and keys the
/// engine does not understand are carried through untouched in `extra`.
pub struct Scene {
    /// Drawing surface.
    #[serde(default)]
    pub canvas: Canvas,
    /// Accent palette (`accent1..accent6`), plus any other theme keys.
    #[serde(default)]
    pub theme: Theme,
    /// Structural classification label (funnel, pyramid, timeline, ...).
    #[serde(default)]
    pub archetype: String,
    /// Scene-level font family, when the document sets one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Ordered shapes; order matters for geometric inference.
    #[serde(default)]
    pub shapes: Vec<Shape>,
    /// Unrecognized top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Scene {
    /// Parse a scene from JSON text.
    pub fn from_json_str(s: &str) -> VaryResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Convert a nested JSON map into a scene.
    pub fn from_value(value: Value) -> VaryResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Convert back into a nested JSON map.
    pub fn to_value(&self) -> VaryResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Canvas as a rectangle anchored at the origin.
    pub fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.canvas.width, self.canvas.height)
    }

    /// Centroid of all shape centers; `None` without shapes.
    pub fn shape_centroid(&self) -> Option<Point> {
        geometry::centroid(self.shapes.iter().map(|s| s.bbox.center()))
    }

    /// Union of all shape boxes; `None` without shapes.
    pub fn shape_bounds(&self) -> Option<Rect> {
        geometry::union_bounds(self.shapes.iter().map(|s| s.bbox.to_rect()))
    }

    /// Resolve a fill/stroke color (hex literal or theme token) to RGB.
    pub fn resolve_color(&self, color: &str) -> Option<Rgb8> {
        self.theme.resolve(color)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Canvas dimensions.
pub struct Canvas {
    /// Width in layout units.
    #[serde(default = "default_canvas_width")]
    pub width: f64,
    /// Height in layout units.
    #[serde(default = "default_canvas_height")]
    pub height: f64,
    /// Optional background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            background: None,
        }
    }
}

fn default_canvas_width() -> f64 {
    1920.0
}

fn default_canvas_height() -> f64 {
    1080.0
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Theme mapping from token names (`accent1`..`accent6`) to hex colors.
pub struct Theme(pub Map<String, Value>);

impl Theme {
    /// Build a theme from six accent colors.
    pub fn from_accents<S: AsRef<str>>(colors: &[S]) -> Self {
        let mut theme = Self::default();
        theme.set_accents(colors);
        theme
    }

    /// Color string for a theme key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Color for accent `n` (1-based).
    pub fn accent(&self, n: usize) -> Option<&str> {
        ACCENT_KEYS.get(n.checked_sub(1)?).and_then(|k| self.get(k))
    }

    /// Set one theme key.
    pub fn set(&mut self, key: &str, color: impl Into<String>) {
        self.0.insert(key.to_string(), Value::String(color.into()));
    }

    /// Overwrite `accent1..` with the given colors (at most six).
    pub fn set_accents<S: AsRef<str>>(&mut self, colors: &[S]) {
        for (key, color) in ACCENT_KEYS.iter().zip(colors) {
            self.set(key, color.as_ref());
        }
    }

    /// Accent colors present in the theme, in token order.
    pub fn accents(&self) -> Vec<(&'static str, &str)> {
        ACCENT_KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|c| (*k, c)))
            .collect()
    }

    /// Resolve a hex literal or a theme token to RGB.
    pub fn resolve(&self, color: &str) -> Option<Rgb8> {
        if let Some(rgb) = Rgb8::parse_hex(color) {
            return Some(rgb);
        }
        self.get(color.trim()).and_then(Rgb8::parse_hex)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One diagram element.
pub struct Shape {
    /// Identifier, unique within the scene.
    #[serde(default)]
    pub id: String,
    /// Bounding box.
    #[serde(default)]
    pub bbox: BBox,
    /// Fill paint.
    #[serde(default)]
    pub fill: Fill,
    /// Optional stroke paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Fill>,
    /// Optional label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBlock>,
    /// Decorative effects.
    #[serde(default, skip_serializing_if = "Effects::is_empty")]
    pub effects: Effects,
    /// Corner radius, in units or as a percentage of the shorter side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<CornerRadius>,
    /// Preset geometry name used by exporters (`rect`, `roundRect`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_shape_type: Option<String>,
    /// Unrecognized shape keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Shape {
    /// A solid-filled shape with the given box.
    pub fn new(id: impl Into<String>, bbox: BBox) -> Self {
        Self {
            id: id.into(),
            bbox,
            fill: Fill::default(),
            stroke: None,
            text: None,
            effects: Effects::default(),
            corner_radius: None,
            auto_shape_type: None,
            extra: Map::new(),
        }
    }

    /// Builder-style fill override.
    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Fill::solid(color);
        self
    }

    /// Builder-style label.
    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.text = Some(TextBlock::new(content));
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
/// Axis-aligned box in canvas units.
pub struct BBox {
    /// Left edge.
    #[serde(default)]
    pub x: f64,
    /// Top edge.
    #[serde(default)]
    pub y: f64,
    /// Width.
    #[serde(default = "default_bbox_width")]
    pub width: f64,
    /// Height.
    #[serde(default = "default_bbox_height")]
    pub height: f64,
}

impl Default for BBox {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: default_bbox_width(),
            height: default_bbox_height(),
        }
    }
}

fn default_bbox_width() -> f64 {
    100.0
}

fn default_bbox_height() -> f64 {
    50.0
}

impl BBox {
    /// Construct from position and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// As a kurbo rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Center point.
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Same size, moved so that its center is `c`.
    pub fn centered_at(self, c: Point) -> Self {
        Self {
            x: c.x - self.width / 2.0,
            y: c.y - self.height / 2.0,
            ..self
        }
    }

    /// Swap the axes (x↔y, width↔height).
    pub fn transposed(self) -> Self {
        Self::new(self.y, self.x, self.height, self.width)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Paint type.
pub enum FillKind {
    /// Single color.
    #[default]
    Solid,
    /// Multi-stop gradient.
    Gradient,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Fill or stroke paint.
pub struct Fill {
    /// Paint type.
    #[serde(rename = "type", default)]
    pub kind: FillKind,
    /// Hex color or theme token (`accentN`).
    #[serde(default = "default_fill_color")]
    pub color: String,
    /// Gradient stops (gradient paints only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stops: Vec<GradientStop>,
    /// Gradient angle in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Unrecognized paint keys (stroke width, opacity, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_fill_color() -> String {
    DEFAULT_FILL_COLOR.to_string()
}

impl Default for Fill {
    fn default() -> Self {
        Self::solid(DEFAULT_FILL_COLOR)
    }
}

impl Fill {
    /// Solid paint.
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            kind: FillKind::Solid,
            color: color.into(),
            stops: Vec::new(),
            angle: None,
            extra: Map::new(),
        }
    }

    /// Gradient paint through the given colors, evenly spaced.
    pub fn gradient<S: AsRef<str>>(colors: &[S]) -> Self {
        let n = colors.len();
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, c)| GradientStop {
                color: c.as_ref().to_string(),
                position: if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 },
            })
            .collect::<Vec<_>>();
        let color = stops
            .first()
            .map(|s| s.color.clone())
            .unwrap_or_else(default_fill_color);
        Self {
            kind: FillKind::Gradient,
            color,
            stops,
            angle: None,
            extra: Map::new(),
        }
    }

    /// Whether this paint is a gradient.
    pub fn is_gradient(&self) -> bool {
        self.kind == FillKind::Gradient
    }

    /// Every color string this paint references (main color first, then stops).
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.color.as_str()).chain(self.stops.iter().map(|s| s.color.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Gradient color stop.
pub struct GradientStop {
    /// Hex color or theme token.
    pub color: String,
    /// Offset along the gradient in `[0, 1]`.
    #[serde(default)]
    pub position: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Shape label.
pub struct TextBlock {
    /// Label text.
    #[serde(default)]
    pub content: String,
    /// Font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Label placement (`inside`, `callout_left`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    /// Horizontal text alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    /// Label offset relative to the shape for callout placements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callout_offset: Option<Offset>,
    /// Unrecognized text keys (size, weight, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextBlock {
    /// Label with content only.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
/// 2D offset.
pub struct Offset {
    /// Horizontal offset.
    #[serde(default)]
    pub x: f64,
    /// Vertical offset.
    #[serde(default)]
    pub y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Decorative effects attached to a shape.
pub struct Effects {
    /// Drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Outer glow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow: Option<Glow>,
    /// Concentric ring outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring: Option<Ring>,
    /// Partial arc accent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc: Option<ArcAccent>,
    /// Translucent gradient laid over the fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_overlay: Option<GradientOverlay>,
    /// Bevel edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bevel: Option<Bevel>,
    /// Unrecognized effects.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Effects {
    /// True when no effect is set.
    pub fn is_empty(&self) -> bool {
        self.shadow.is_none()
            && self.glow.is_none()
            && self.ring.is_none()
            && self.arc.is_none()
            && self.gradient_overlay.is_none()
            && self.bevel.is_none()
            && self.extra.is_empty()
    }

    /// Drop ring, arc, glow and gradient overlay; depth effects stay.
    pub fn clear_accents(&mut self) {
        self.ring = None;
        self.arc = None;
        self.glow = None;
        self.gradient_overlay = None;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Drop shadow descriptor.
pub struct Shadow {
    /// Blur radius.
    pub blur: f64,
    /// Horizontal offset.
    pub offset_x: f64,
    /// Vertical offset.
    pub offset_y: f64,
    /// Shadow color.
    pub color: String,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            blur: 8.0,
            offset_x: 0.0,
            offset_y: 2.0,
            color: "#000000".to_string(),
            opacity: 0.15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Outer glow descriptor.
pub struct Glow {
    /// Glow radius.
    pub radius: f64,
    /// Glow color; the shape's fill when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for Glow {
    fn default() -> Self {
        Self {
            radius: 8.0,
            color: None,
            opacity: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Ring outline descriptor.
pub struct Ring {
    /// Stroke width of the ring.
    pub width: f64,
    /// Gap between the shape edge and the ring.
    pub offset: f64,
    /// Ring color; the shape's fill when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Default for Ring {
    fn default() -> Self {
        Self {
            width: 4.0,
            offset: 4.0,
            color: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Arc accent descriptor.
pub struct ArcAccent {
    /// Stroke width of the arc.
    pub width: f64,
    /// Start angle, clockwise from 12 o'clock.
    pub start_degrees: f64,
    /// Angular extent.
    pub sweep_degrees: f64,
    /// Arc color; the shape's fill when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Default for ArcAccent {
    fn default() -> Self {
        Self {
            width: 4.0,
            start_degrees: 0.0,
            sweep_degrees: 180.0,
            color: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Gradient overlay descriptor.
pub struct GradientOverlay {
    /// Gradient direction in degrees.
    pub angle: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for GradientOverlay {
    fn default() -> Self {
        Self {
            angle: 90.0,
            opacity: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Bevel descriptor.
pub struct Bevel {
    /// Bevel depth.
    pub depth: f64,
    /// Bevel profile name.
    pub style: String,
}

impl Default for Bevel {
    fn default() -> Self {
        Self {
            depth: 4.0,
            style: "soft_round".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Corner radius: absolute units or a `"N%"` string relative to the shorter side.
pub enum CornerRadius {
    /// Absolute radius.
    Units(f64),
    /// Relative radius such as `"50%"`.
    Relative(String),
}

impl CornerRadius {
    /// Radius in canvas units for a box of the given size, `None` if the string form does not
    /// parse.
    pub fn resolve(&self, bbox: BBox) -> Option<f64> {
        match self {
            Self::Units(v) => Some(*v),
            Self::Relative(s) => {
                let s = s.trim();
                match s.strip_suffix('%') {
                    Some(pct) => {
                        let pct = pct.trim().parse::<f64>().ok()?;
                        Some(pct / 100.0 * bbox.width.min(bbox.height))
                    }
                    None => s.parse::<f64>().ok(),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
