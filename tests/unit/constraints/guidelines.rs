use super::*;

#[test]
fn defaults_are_permissive() {
    let g = BrandGuidelines::default();
    assert!(g.allow_shadows && g.allow_gradients && g.allow_glow);
    assert_eq!(g.color_tolerance, 0.1);
    assert!(g.font_allowed("Comic Sans MS"));
    g.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let g = BrandGuidelines::from_json_str(
        r##"{ "forbidden_colors": ["#FF0000"], "allow_glow": false, "allowed_fonts": ["Inter"] }"##,
    )
    .unwrap();
    assert_eq!(g.forbidden_colors, vec!["#FF0000".to_string()]);
    assert!(!g.allow_glow);
    assert!(g.allow_shadows);
    assert!(g.font_allowed("inter"));
    assert!(!g.font_allowed("Arial"));
}

#[test]
fn tolerance_outside_unit_interval_is_rejected() {
    let err = BrandGuidelines::from_json_str(r#"{ "color_tolerance": 1.5 }"#).unwrap_err();
    assert!(matches!(err, VaryError::Validation(_)));
}

#[test]
fn bad_hex_and_inverted_radius_bounds_are_rejected() {
    let g = BrandGuidelines {
        primary_colors: vec!["teal".into()],
        ..BrandGuidelines::default()
    };
    assert!(g.validate().is_err());

    let g = BrandGuidelines {
        min_corner_radius: Some(10.0),
        max_corner_radius: Some(2.0),
        ..BrandGuidelines::default()
    };
    assert!(g.validate().is_err());
}

#[test]
fn score_is_clamped() {
    let p = ScorePolicy::default();
    assert_eq!(p.score(0, 0), 1.0);
    assert!((p.score(1, 1) - 0.87).abs() < 1e-12);
    assert_eq!(p.score(50, 0), 0.0);
}

#[test]
fn negative_weights_are_rejected() {
    let p = ScorePolicy {
        warning_weight: -1.0,
        ..ScorePolicy::default()
    };
    assert!(p.validate().is_err());
}
