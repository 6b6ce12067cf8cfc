use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constraints::guidelines::{BrandGuidelines, ScorePolicy};
use crate::foundation::color::{Rgb8, within_tolerance};
use crate::foundation::error::VaryResult;
use crate::foundation::geometry::contains_rect;
use crate::scene::model::{Fill, FillKind, Scene, Shape, Theme};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// How serious a violation is. Only errors make a scene invalid.
pub enum Severity {
    /// Scene is non-compliant.
    Error,
    /// Scene is compliant but off-brand in some way.
    Warning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Rule group that produced a violation.
pub enum ViolationCategory {
    /// Forbidden, missing or off-palette colors.
    Color,
    /// Fonts outside the allow-list.
    Font,
    /// Corner radius, shadow, glow and gradient policy.
    Style,
    /// Shapes leaving the canvas.
    Layout,
}

impl ViolationCategory {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Font => "font",
            Self::Style => "style",
            Self::Layout => "layout",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// One detected deviation from the brand guidelines.
pub struct ConstraintViolation {
    /// Error or warning.
    pub severity: Severity,
    /// Rule group.
    pub category: ViolationCategory,
    /// Human-readable description.
    pub message: String,
    /// Offending shape, `None` for scene-level findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<String>,
    /// What `enforce` would do (or what a human should do) about it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl ConstraintViolation {
    fn new(severity: Severity, category: ViolationCategory, message: impl Into<String>) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            shape_id: None,
            suggested_fix: None,
        }
    }

    fn error(category: ViolationCategory, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, message)
    }

    fn warning(category: ViolationCategory, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, message)
    }

    fn on(mut self, shape: &Shape) -> Self {
        self.shape_id = Some(shape.id.clone());
        self
    }

    fn fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    /// Whether this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Outcome of checking one scene.
pub struct ConstraintResult {
    /// True iff no error-severity violation was found.
    pub is_valid: bool,
    /// Every violation, in rule-group order (color, font, style, layout).
    pub violations: Vec<ConstraintViolation>,
    /// Compliance score in `[0, 1]`.
    pub score: f64,
}

impl ConstraintResult {
    fn from_violations(violations: Vec<ConstraintViolation>, policy: &ScorePolicy) -> Self {
        let errors = violations.iter().filter(|v| v.is_error()).count();
        let warnings = violations.len() - errors;
        Self {
            is_valid: errors == 0,
            score: policy.score(errors, warnings),
            violations,
        }
    }

    /// Error-severity violations.
    pub fn errors(&self) -> impl Iterator<Item = &ConstraintViolation> {
        self.violations.iter().filter(|v| v.is_error())
    }

    /// Warning-severity violations.
    pub fn warnings(&self) -> impl Iterator<Item = &ConstraintViolation> {
        self.violations.iter().filter(|v| !v.is_error())
    }
}

/// Validates scenes against [`BrandGuidelines`] and repairs what can be repaired
/// mechanically.
#[derive(Clone, Debug, Default)]
pub struct BrandConstraintChecker {
    guidelines: BrandGuidelines,
    policy: ScorePolicy,
}

impl BrandConstraintChecker {
    /// Checker with the default score policy.
    pub fn new(guidelines: BrandGuidelines) -> VaryResult<Self> {
        Self::with_policy(guidelines, ScorePolicy::default())
    }

    /// Checker with a custom score policy.
    pub fn with_policy(guidelines: BrandGuidelines, policy: ScorePolicy) -> VaryResult<Self> {
        guidelines.validate()?;
        policy.validate()?;
        Ok(Self { guidelines, policy })
    }

    /// Active guidelines.
    pub fn guidelines(&self) -> &BrandGuidelines {
        &self.guidelines
    }

    /// Active score policy.
    pub fn policy(&self) -> &ScorePolicy {
        &self.policy
    }

    /// Run every rule group and score the scene.
    pub fn check(&self, scene: &Scene) -> ConstraintResult {
        let mut violations = Vec::new();
        self.check_colors(scene, &mut violations);
        self.check_fonts(scene, &mut violations);
        self.check_style(scene, &mut violations);
        self.check_layout(scene, &mut violations);
        ConstraintResult::from_violations(violations, &self.policy)
    }

    /// Repair a copy of `scene` and re-check it.
    ///
    /// Unused primary colors, corner radius bounds and layout findings are left for a human.
    pub fn enforce(&self, scene: &Scene) -> (Scene, ConstraintResult) {
        let mut fixed = scene.clone();
        let g = &self.guidelines;

        let theme = fixed.theme.clone();
        for shape in &mut fixed.shapes {
            self.fix_paint(&theme, &mut shape.fill);
            if let Some(stroke) = shape.stroke.as_mut() {
                self.fix_paint(&theme, stroke);
            }
        }

        if let Some(first) = g.allowed_fonts.first() {
            if let Some(font) = fixed.font_family.as_mut() {
                if !g.font_allowed(font) {
                    *font = first.clone();
                }
            }
            for text in fixed.shapes.iter_mut().filter_map(|s| s.text.as_mut()) {
                if let Some(font) = text.font_family.as_mut() {
                    if !g.font_allowed(font) {
                        *font = first.clone();
                    }
                }
            }
        }

        for shape in &mut fixed.shapes {
            let fx = &mut shape.effects;
            if !g.allow_shadows {
                fx.shadow = None;
            } else if let (Some(shadow), Some(max)) = (fx.shadow.as_mut(), g.max_shadow_blur) {
                shadow.blur = shadow.blur.min(max);
            }
            if !g.allow_glow {
                fx.glow = None;
            }
            if !g.allow_gradients {
                fx.gradient_overlay = None;
                flatten_gradient(&mut shape.fill);
                if let Some(stroke) = shape.stroke.as_mut() {
                    flatten_gradient(stroke);
                }
            }
        }

        let result = self.check(&fixed);
        tracing::debug!(
            shapes = fixed.shapes.len(),
            remaining = result.violations.len(),
            valid = result.is_valid,
            "enforced brand guidelines"
        );
        (fixed, result)
    }

    fn is_forbidden(&self, rgb: Rgb8) -> Option<&str> {
        let tol = self.guidelines.color_tolerance;
        self.guidelines
            .forbidden_rgb()
            .into_iter()
            .find(|(_, f)| within_tolerance(rgb, *f, tol))
            .map(|(hex, _)| hex)
    }

    /// Nearest allowed or primary color that is not itself forbidden.
    fn replacement(&self, rgb: Rgb8) -> Option<Rgb8> {
        let g = &self.guidelines;
        g.allowed_rgb()
            .into_iter()
            .chain(g.primary_rgb())
            .map(|(_, c)| c)
            .filter(|c| self.is_forbidden(*c).is_none())
            .min_by(|a, b| rgb.distance(*a).total_cmp(&rgb.distance(*b)))
    }

    fn fix_paint(&self, theme: &Theme, paint: &mut Fill) {
        let fix = |color: &mut String| {
            let Some(rgb) = theme.resolve(color.as_str()) else {
                return;
            };
            if self.is_forbidden(rgb).is_some() {
                if let Some(to) = self.replacement(rgb) {
                    *color = to.to_hex();
                }
            }
        };
        fix(&mut paint.color);
        for stop in &mut paint.stops {
            fix(&mut stop.color);
        }
    }

    fn check_colors(&self, scene: &Scene, out: &mut Vec<ConstraintViolation>) {
        let g = &self.guidelines;
        let tol = g.color_tolerance;
        let palette = g
            .allowed_rgb()
            .into_iter()
            .chain(g.primary_rgb())
            .map(|(_, c)| c)
            .collect::<Vec<_>>();
        let mut used = Vec::new();

        for shape in &scene.shapes {
            let paints = std::iter::once(("fill", &shape.fill))
                .chain(shape.stroke.as_ref().map(|s| ("stroke", s)));
            for (role, paint) in paints {
                let mut seen: Vec<&str> = Vec::new();
                for color in paint.colors() {
                    if seen.contains(&color) {
                        continue;
                    }
                    seen.push(color);
                    let Some(rgb) = scene.resolve_color(color) else {
                        continue;
                    };
                    used.push(rgb);
                    let hex = rgb.to_hex();

                    if let Some(forbidden) = self.is_forbidden(rgb) {
                        let mut v = ConstraintViolation::error(
                            ViolationCategory::Color,
                            format!("{role} color {hex} matches forbidden color {forbidden}"),
                        )
                        .on(shape);
                        if let Some(to) = self.replacement(rgb) {
                            v = v.fix(format!("replace with {}", to.to_hex()));
                        }
                        out.push(v);
                    } else if !g.allowed_colors.is_empty()
                        && !palette.iter().any(|p| within_tolerance(rgb, *p, tol))
                    {
                        out.push(
                            ConstraintViolation::warning(
                                ViolationCategory::Color,
                                format!("{role} color {hex} is not in the brand palette"),
                            )
                            .on(shape),
                        );
                    }
                }
            }
        }

        for (hex, primary) in g.primary_rgb() {
            if !used.iter().any(|u| within_tolerance(*u, primary, tol)) {
                out.push(
                    ConstraintViolation::warning(
                        ViolationCategory::Color,
                        format!("primary color {hex} is not used by any shape"),
                    )
                    .fix(format!("use {hex} on a prominent shape")),
                );
            }
        }
    }

    fn check_fonts(&self, scene: &Scene, out: &mut Vec<ConstraintViolation>) {
        let g = &self.guidelines;
        let Some(first) = g.allowed_fonts.first() else {
            return;
        };
        let fix = format!("use font '{first}'");

        if let Some(font) = scene.font_family.as_deref() {
            if !g.font_allowed(font) {
                out.push(
                    ConstraintViolation::error(
                        ViolationCategory::Font,
                        format!("scene font '{font}' is not an allowed font"),
                    )
                    .fix(fix.clone()),
                );
            }
        }
        for shape in &scene.shapes {
            let Some(font) = shape.text.as_ref().and_then(|t| t.font_family.as_deref()) else {
                continue;
            };
            if !g.font_allowed(font) {
                out.push(
                    ConstraintViolation::error(
                        ViolationCategory::Font,
                        format!("label font '{font}' is not an allowed font"),
                    )
                    .on(shape)
                    .fix(fix.clone()),
                );
            }
        }
    }

    fn check_style(&self, scene: &Scene, out: &mut Vec<ConstraintViolation>) {
        let g = &self.guidelines;
        for shape in &scene.shapes {
            if let Some(radius) = shape
                .corner_radius
                .as_ref()
                .and_then(|r| r.resolve(shape.bbox))
            {
                if let Some(min) = g.min_corner_radius.filter(|m| radius < *m) {
                    out.push(
                        ConstraintViolation::warning(
                            ViolationCategory::Style,
                            format!("corner radius {radius} is below the minimum {min}"),
                        )
                        .on(shape)
                        .fix(format!("use a corner radius of at least {min}")),
                    );
                }
                if let Some(max) = g.max_corner_radius.filter(|m| radius > *m) {
                    out.push(
                        ConstraintViolation::warning(
                            ViolationCategory::Style,
                            format!("corner radius {radius} exceeds the maximum {max}"),
                        )
                        .on(shape)
                        .fix(format!("use a corner radius of at most {max}")),
                    );
                }
            }

            let fx = &shape.effects;
            if let Some(shadow) = fx.shadow.as_ref() {
                if !g.allow_shadows {
                    out.push(
                        ConstraintViolation::error(
                            ViolationCategory::Style,
                            "shadows are not allowed",
                        )
                        .on(shape)
                        .fix("remove the shadow"),
                    );
                } else if let Some(max) = g.max_shadow_blur.filter(|m| shadow.blur > *m) {
                    out.push(
                        ConstraintViolation::error(
                            ViolationCategory::Style,
                            format!("shadow blur {} exceeds the maximum {max}", shadow.blur),
                        )
                        .on(shape)
                        .fix(format!("reduce the shadow blur to {max}")),
                    );
                }
            }
            if fx.glow.is_some() && !g.allow_glow {
                out.push(
                    ConstraintViolation::error(ViolationCategory::Style, "glow is not allowed")
                        .on(shape)
                        .fix("remove the glow"),
                );
            }
            if !g.allow_gradients {
                let gradient_paint = shape.fill.is_gradient()
                    || shape.stroke.as_ref().is_some_and(Fill::is_gradient);
                if gradient_paint {
                    out.push(
                        ConstraintViolation::error(
                            ViolationCategory::Style,
                            "gradient paints are not allowed",
                        )
                        .on(shape)
                        .fix("use a solid color from the first gradient stop"),
                    );
                }
                if fx.gradient_overlay.is_some() {
                    out.push(
                        ConstraintViolation::error(
                            ViolationCategory::Style,
                            "gradient overlays are not allowed",
                        )
                        .on(shape)
                        .fix("remove the gradient overlay"),
                    );
                }
            }
        }
    }

    fn check_layout(&self, scene: &Scene, out: &mut Vec<ConstraintViolation>) {
        let canvas = scene.canvas_rect();
        for shape in &scene.shapes {
            if !contains_rect(canvas, shape.bbox.to_rect()) {
                out.push(
                    ConstraintViolation::warning(
                        ViolationCategory::Layout,
                        format!(
                            "shape extends outside the {}x{} canvas",
                            scene.canvas.width, scene.canvas.height
                        ),
                    )
                    .on(shape)
                    .fix("move or shrink the shape to fit the canvas"),
                );
            }
        }
    }
}

fn flatten_gradient(paint: &mut Fill) {
    if !paint.is_gradient() {
        return;
    }
    if let Some(first) = paint.stops.first() {
        paint.color = first.color.clone();
    }
    paint.kind = FillKind::Solid;
    paint.stops.clear();
    paint.angle = None;
}

#[cfg(test)]
#[path = "../../tests/unit/constraints/checker.rs"]
mod tests;
