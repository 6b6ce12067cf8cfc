use super::*;
use crate::constraints::guidelines::BrandGuidelines;
use crate::scene::model::{BBox, CornerRadius, Glow, GradientOverlay, Shadow, TextBlock};

fn scene_with(fills: &[&str]) -> Scene {
    let mut scene = Scene::from_json_str(
        r##"{ "canvas": { "width": 1000, "height": 600 },
              "theme": { "accent1": "#0D9488", "accent2": "#FF0000" } }"##,
    )
    .unwrap();
    for (i, fill) in fills.iter().enumerate() {
        scene.shapes.push(
            Shape::new(format!("s{i}"), BBox::new(50.0 + 200.0 * i as f64, 100.0, 150.0, 80.0))
                .with_fill(*fill),
        );
    }
    scene
}

fn checker(g: BrandGuidelines) -> BrandConstraintChecker {
    BrandConstraintChecker::new(g).unwrap()
}

#[test]
fn forbidden_fill_is_a_color_error() {
    let c = checker(BrandGuidelines::forbidding(&["#FF0000"]));
    let r = c.check(&scene_with(&["#FF0000"]));
    assert!(!r.is_valid);
    let err = r.errors().next().unwrap();
    assert_eq!(err.category, ViolationCategory::Color);
    assert_eq!(err.shape_id.as_deref(), Some("s0"));
}

#[test]
fn forbidden_match_uses_tolerance_and_tokens() {
    let c = checker(BrandGuidelines::forbidding(&["#FF0000"]));
    // within 10% of the max distance
    assert!(!c.check(&scene_with(&["#F80505"])).is_valid);
    // theme token resolving to red
    assert!(!c.check(&scene_with(&["accent2"])).is_valid);
    assert!(c.check(&scene_with(&["#0000FF"])).is_valid);
}

#[test]
fn default_guidelines_accept_contained_scene() {
    let r = checker(BrandGuidelines::default()).check(&scene_with(&["#123456", "accent1"]));
    assert!(r.is_valid);
    assert!(r.violations.is_empty());
    assert_eq!(r.score, 1.0);
}

#[test]
fn unused_primary_is_a_scene_warning() {
    let g = BrandGuidelines {
        primary_colors: vec!["#1E3A8A".into()],
        ..BrandGuidelines::default()
    };
    let r = checker(g).check(&scene_with(&["#0D9488"]));
    assert!(r.is_valid);
    let w = r.warnings().next().unwrap();
    assert_eq!(w.category, ViolationCategory::Color);
    assert!(w.shape_id.is_none());
}

#[test]
fn off_palette_colors_warn_only_with_allow_list() {
    let g = BrandGuidelines {
        allowed_colors: vec!["#0D9488".into()],
        ..BrandGuidelines::default()
    };
    let r = checker(g).check(&scene_with(&["#0D9488", "#7C3AED"]));
    assert!(r.is_valid);
    assert_eq!(r.warnings().count(), 1);
    assert_eq!(r.warnings().next().unwrap().shape_id.as_deref(), Some("s1"));
}

#[test]
fn fonts_are_checked_at_scene_and_shape_level() {
    let mut scene = scene_with(&["#0D9488"]);
    scene.font_family = Some("Papyrus".into());
    scene.shapes[0].text = Some(TextBlock {
        font_family: Some("Comic Sans MS".into()),
        ..TextBlock::new("hello")
    });
    let g = BrandGuidelines {
        allowed_fonts: vec!["Inter".into()],
        ..BrandGuidelines::default()
    };
    let r = checker(g).check(&scene);
    let fonts = r
        .errors()
        .filter(|v| v.category == ViolationCategory::Font)
        .collect::<Vec<_>>();
    assert_eq!(fonts.len(), 2);
    assert!(fonts[0].shape_id.is_none());
    assert_eq!(fonts[1].shape_id.as_deref(), Some("s0"));
}

#[test]
fn style_rules() {
    let mut scene = scene_with(&["#0D9488"]);
    let s = &mut scene.shapes[0];
    s.corner_radius = Some(CornerRadius::Relative("50%".into()));
    s.effects.shadow = Some(Shadow {
        blur: 30.0,
        ..Shadow::default()
    });
    s.effects.glow = Some(Glow::default());
    s.effects.gradient_overlay = Some(GradientOverlay::default());
    s.fill = Fill::gradient(&["#0D9488", "#14B8A6"]);

    let g = BrandGuidelines {
        max_corner_radius: Some(16.0),
        max_shadow_blur: Some(12.0),
        allow_glow: false,
        allow_gradients: false,
        ..BrandGuidelines::default()
    };
    let r = checker(g).check(&scene);
    // radius 40 > 16 is a warning; blur, glow, gradient paint and overlay are errors
    assert_eq!(r.warnings().count(), 1);
    assert_eq!(r.errors().count(), 4);
    assert!(r.violations.iter().all(|v| v.category == ViolationCategory::Style));
}

#[test]
fn disallowed_shadow_is_an_error() {
    let mut scene = scene_with(&["#0D9488"]);
    scene.shapes[0].effects.shadow = Some(Shadow::default());
    let g = BrandGuidelines {
        allow_shadows: false,
        ..BrandGuidelines::default()
    };
    assert!(!checker(g).check(&scene).is_valid);
}

#[test]
fn out_of_canvas_is_a_layout_warning() {
    let mut scene = scene_with(&["#0D9488"]);
    scene.shapes[0].bbox.x = 900.0;
    let r = checker(BrandGuidelines::default()).check(&scene);
    assert!(r.is_valid);
    let w = r.warnings().next().unwrap();
    assert_eq!(w.category, ViolationCategory::Layout);
    assert!((r.score - 0.97).abs() < 1e-12);
}

#[test]
fn enforce_replaces_forbidden_with_nearest_allowed() {
    let g = BrandGuidelines {
        forbidden_colors: vec!["#FF0000".into()],
        allowed_colors: vec!["#0000FF".into(), "#CC3333".into()],
        ..BrandGuidelines::default()
    };
    let scene = scene_with(&["#FF0000", "accent2"]);
    let (fixed, r) = checker(g).enforce(&scene);
    assert!(r.is_valid, "{:?}", r.violations);
    assert_eq!(fixed.shapes[0].fill.color, "#CC3333");
    assert_eq!(fixed.shapes[1].fill.color, "#CC3333");
    // input untouched
    assert_eq!(scene.shapes[0].fill.color, "#FF0000");
}

#[test]
fn enforce_repairs_fonts_and_effects() {
    let mut scene = scene_with(&["#0D9488"]);
    scene.font_family = Some("Papyrus".into());
    let s = &mut scene.shapes[0];
    s.text = Some(TextBlock {
        font_family: Some("Arial".into()),
        ..TextBlock::new("x")
    });
    s.effects.shadow = Some(Shadow {
        blur: 40.0,
        ..Shadow::default()
    });
    s.effects.glow = Some(Glow::default());
    s.effects.gradient_overlay = Some(GradientOverlay::default());
    s.fill = Fill::gradient(&["#14B8A6", "#0D9488"]);

    let g = BrandGuidelines {
        allowed_fonts: vec!["Inter".into(), "Roboto".into()],
        max_shadow_blur: Some(12.0),
        allow_glow: false,
        allow_gradients: false,
        ..BrandGuidelines::default()
    };
    let (fixed, r) = checker(g).enforce(&scene);
    assert!(r.is_valid, "{:?}", r.violations);
    let s = &fixed.shapes[0];
    assert_eq!(fixed.font_family.as_deref(), Some("Inter"));
    assert_eq!(
        s.text.as_ref().unwrap().font_family.as_deref(),
        Some("Inter")
    );
    assert_eq!(s.effects.shadow.as_ref().unwrap().blur, 12.0);
    assert!(s.effects.glow.is_none());
    assert!(s.effects.gradient_overlay.is_none());
    assert!(!s.fill.is_gradient());
    assert_eq!(s.fill.color, "#14B8A6");
    assert!(s.fill.stops.is_empty());
}

#[test]
fn enforce_leaves_primary_and_layout_warnings() {
    let mut scene = scene_with(&["#0D9488"]);
    scene.shapes[0].bbox.x = -40.0;
    let g = BrandGuidelines {
        primary_colors: vec!["#1E3A8A".into()],
        ..BrandGuidelines::default()
    };
    let (fixed, r) = checker(g).enforce(&scene);
    assert_eq!(fixed, scene);
    assert_eq!(r.warnings().count(), 2);
}

#[test]
fn enforcing_twice_never_adds_violations() {
    let mut scene = scene_with(&["#FF0000", "#00FF00", "accent1"]);
    scene.shapes[2].bbox.width = 5000.0;
    scene.shapes[1].effects.shadow = Some(Shadow::default());
    let g = BrandGuidelines {
        forbidden_colors: vec!["#FF0000".into(), "#00FF00".into()],
        allowed_colors: vec!["#00EE11".into()],
        primary_colors: vec!["#222222".into()],
        allow_shadows: false,
        ..BrandGuidelines::default()
    };
    let c = checker(g);
    let (once, first) = c.enforce(&scene);
    let (_, second) = c.enforce(&once);
    assert!(
        second
            .violations
            .iter()
            .all(|v| first.violations.contains(v))
    );
}

#[test]
fn score_stays_in_unit_interval() {
    let fills = vec!["#FF0000"; 30];
    let r = checker(BrandGuidelines::forbidding(&["#FF0000"])).check(&scene_with(&fills));
    assert_eq!(r.score, 0.0);
    assert_eq!(r.is_valid, r.errors().count() == 0);
}
