use super::*;
use serde_json::json;

#[test]
fn missing_fields_fall_back_to_defaults() {
    let scene = Scene::from_value(json!({
        "shapes": [{ "id": "a" }, { "id": "b", "bbox": { "x": 10, "y": 20 } }]
    }))
    .unwrap();

    assert_eq!(scene.canvas.width, 1920.0);
    assert_eq!(scene.archetype, "");
    let a = &scene.shapes[0];
    assert_eq!(a.bbox, BBox::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(a.fill.kind, FillKind::Solid);
    assert_eq!(a.fill.color, DEFAULT_FILL_COLOR);
    assert_eq!(scene.shapes[1].bbox, BBox::new(10.0, 20.0, 100.0, 50.0));
}

#[test]
fn unknown_keys_survive_a_roundtrip() {
    let input = json!({
        "canvas": { "width": 800, "height": 600 },
        "theme": { "accent1": "#0D9488", "font_heading": "Inter" },
        "archetype": "funnel",
        "version": 3,
        "shapes": [{
            "id": "s1",
            "bbox": { "x": 0, "y": 0, "width": 200, "height": 80 },
            "fill": { "type": "solid", "color": "accent1", "opacity": 0.9 },
            "stroke": { "type": "solid", "color": "#000000", "width": 2 },
            "z_index": 4
        }]
    });
    let scene = Scene::from_value(input).unwrap();
    assert_eq!(scene.extra.get("version"), Some(&json!(3)));
    assert_eq!(scene.shapes[0].extra.get("z_index"), Some(&json!(4)));
    assert_eq!(scene.shapes[0].fill.extra.get("opacity"), Some(&json!(0.9)));
    assert_eq!(scene.theme.get("font_heading"), Some("Inter"));

    let back = Scene::from_value(scene.to_value().unwrap()).unwrap();
    assert_eq!(back, scene);
}

#[test]
fn theme_tokens_resolve_through_the_theme() {
    let theme = Theme::from_accents(&["#FF0000", "#00FF00"]);
    assert_eq!(theme.accent(1), Some("#FF0000"));
    assert_eq!(theme.accent(7), None);
    assert_eq!(theme.accent(0), None);
    assert_eq!(theme.resolve("accent2"), Some(Rgb8::new(0, 255, 0)));
    assert_eq!(theme.resolve("#0000ff"), Some(Rgb8::new(0, 0, 255)));
    assert_eq!(theme.resolve("accent5"), None);
    assert_eq!(theme.accents().len(), 2);
}

#[test]
fn corner_radius_accepts_numbers_and_percentages() {
    let r: CornerRadius = serde_json::from_value(json!(8)).unwrap();
    assert_eq!(r, CornerRadius::Units(8.0));
    let r: CornerRadius = serde_json::from_value(json!("50%")).unwrap();
    assert_eq!(r, CornerRadius::Relative("50%".to_string()));

    let bbox = BBox::new(0.0, 0.0, 200.0, 60.0);
    assert_eq!(r.resolve(bbox), Some(30.0));
    assert_eq!(CornerRadius::Relative("12".into()).resolve(bbox), Some(12.0));
    assert_eq!(CornerRadius::Relative("wide".into()).resolve(bbox), None);
}

#[test]
fn bbox_helpers() {
    let b = BBox::new(10.0, 20.0, 100.0, 40.0);
    assert_eq!(b.center(), Point::new(60.0, 40.0));
    assert_eq!(b.centered_at(Point::new(0.0, 0.0)), BBox::new(-50.0, -20.0, 100.0, 40.0));
    assert_eq!(b.transposed(), BBox::new(20.0, 10.0, 40.0, 100.0));
    assert_eq!(b.to_rect(), Rect::new(10.0, 20.0, 110.0, 60.0));
}

#[test]
fn gradient_fill_lists_stop_colors() {
    let f = Fill::gradient(&["#111111", "#222222", "#333333"]);
    assert!(f.is_gradient());
    assert_eq!(f.color, "#111111");
    assert_eq!(f.stops[1].position, 0.5);
    assert_eq!(f.colors().count(), 4);
}

#[test]
fn empty_effects_are_not_serialized() {
    let shape = Shape::new("a", BBox::default());
    let v = serde_json::to_value(&shape).unwrap();
    assert!(v.get("effects").is_none());
    assert!(v.get("stroke").is_none());
}
