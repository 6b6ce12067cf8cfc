use super::*;
use crate::scene::model::{BBox, Shape};

fn row(archetype: &str, n: usize) -> Scene {
    let mut scene = Scene::from_json_str(r#"{ "canvas": { "width": 1200, "height": 600 } }"#)
        .unwrap();
    scene.archetype = archetype.to_string();
    for i in 0..n {
        scene.shapes.push(
            Shape::new(
                format!("s{i}"),
                BBox::new(100.0 + 250.0 * i as f64, 250.0, 200.0, 100.0),
            )
            .with_text(format!("Step {i}")),
        );
    }
    scene
}

fn params(intensity: f64) -> VariationParams {
    VariationParams::new(intensity).unwrap().with_seed(3)
}

#[test]
fn label_placement_sets_alignment_and_offset() {
    let out = LabelPlacementVariation
        .apply(&row("process", 3), &params(0.8).with_extra("placement", "callout_right"))
        .unwrap();
    for s in &out.shapes {
        let t = s.text.as_ref().unwrap();
        assert_eq!(t.placement.as_deref(), Some("callout_right"));
        assert_eq!(t.alignment.as_deref(), Some("left"));
        assert_eq!(t.callout_offset, Some(Offset { x: 40.0, y: 0.0 }));
    }
}

#[test]
fn label_placement_low_intensity_defaults_inside_and_skips_unlabeled() {
    let mut scene = row("process", 2);
    scene.shapes[1].text = None;
    let out = LabelPlacementVariation.apply(&scene, &params(0.1)).unwrap();
    let t = out.shapes[0].text.as_ref().unwrap();
    assert_eq!(t.placement.as_deref(), Some("inside"));
    assert!(out.shapes[1].text.is_none());
}

#[test]
fn orientation_detection() {
    assert_eq!(detect_orientation(&row("process", 3)), Orientation::Horizontal);
    assert_eq!(detect_orientation(&row("cycle", 3)), Orientation::Radial);

    let mut tall = row("process", 3);
    for s in &mut tall.shapes {
        s.bbox = s.bbox.transposed();
    }
    assert_eq!(detect_orientation(&tall), Orientation::Vertical);
}

#[test]
fn horizontal_to_vertical_transposes_boxes() {
    let scene = row("process", 3);
    let out = OrientationVariation
        .apply(&scene, &params(0.5).with_extra("orientation", "vertical"))
        .unwrap();
    for (a, b) in scene.shapes.iter().zip(&out.shapes) {
        assert_eq!(b.bbox, a.bbox.transposed());
    }
    assert_eq!(detect_orientation(&out), Orientation::Vertical);
}

#[test]
fn linear_to_radial_places_shapes_on_a_circle() {
    let scene = row("process", 4);
    let center = scene.shape_centroid().unwrap();
    let out = OrientationVariation
        .apply(&scene, &params(0.5).with_extra("orientation", "radial"))
        .unwrap();
    // 1.5 * max(200, 100)
    let radius = 300.0;
    for s in &out.shapes {
        let d = (s.bbox.center() - center).hypot();
        assert!((d - radius).abs() < 1e-6);
        assert_eq!(s.bbox.width, 200.0);
    }
    // first at 12 o'clock, second at 3 o'clock
    let first = out.shapes[0].bbox.center();
    assert!((first.x - center.x).abs() < 1e-6 && first.y < center.y);
    let second = out.shapes[1].bbox.center();
    assert!(second.x > center.x && (second.y - center.y).abs() < 1e-6);
}

#[test]
fn radial_to_linear_discards_prior_positions() {
    let scene = row("cycle", 3);
    let out = OrientationVariation
        .apply(&scene, &params(0.5).with_extra("orientation", "horizontal"))
        .unwrap();
    let xs = out.shapes.iter().map(|s| s.bbox.x).collect::<Vec<_>>();
    assert_eq!(xs, vec![50.0, 290.0, 530.0]);
    assert!(out.shapes.iter().all(|s| s.bbox.y == 250.0));
}

#[test]
fn same_orientation_is_a_no_op() {
    let scene = row("process", 3);
    let out = OrientationVariation
        .apply(&scene, &params(0.5).with_extra("orientation", "horizontal"))
        .unwrap();
    assert_eq!(out, scene);
}

#[test]
fn random_orientation_target_differs_from_current() {
    let scene = row("process", 3);
    for seed in 0..10 {
        let p = VariationParams::new(0.5).unwrap().with_seed(seed);
        let out = OrientationVariation.apply(&scene, &p).unwrap();
        assert_ne!(out, scene);
    }
}

#[test]
fn alignment_left_pins_margin() {
    let out = AlignmentVariation
        .apply(&row("process", 3), &params(0.5).with_extra("alignment", "left"))
        .unwrap();
    assert!(out.shapes.iter().all(|s| s.bbox.x == 50.0));
    assert_eq!(
        AlignmentVariation.variation_range(&out).param("alignment"),
        Some(&crate::operators::ParamRange::Choice {
            options: Alignment::names().into_iter().map(String::from).collect(),
            current: Some("left".to_string()),
        })
    );
}

#[test]
fn alignment_right_and_center() {
    let right = AlignmentVariation
        .apply(&row("process", 2), &params(0.5).with_extra("alignment", "right"))
        .unwrap();
    assert!(right.shapes.iter().all(|s| s.bbox.x == 950.0));

    let center = AlignmentVariation
        .apply(&row("process", 2), &params(0.5).with_extra("alignment", "center"))
        .unwrap();
    assert!(center.shapes.iter().all(|s| s.bbox.x == 500.0));
}

#[test]
fn alignment_distributed_spans_canvas_minus_margins() {
    let out = AlignmentVariation
        .apply(&row("process", 3), &params(0.5).with_extra("alignment", "distributed"))
        .unwrap();
    let xs = out.shapes.iter().map(|s| s.bbox.x).collect::<Vec<_>>();
    // (1100 - 600) / 2 = 250 gap
    assert_eq!(xs, vec![50.0, 500.0, 950.0]);
    let last = out.shapes[2].bbox;
    assert_eq!(last.x + last.width, 1150.0);
}
