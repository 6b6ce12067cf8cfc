use super::*;

#[test]
fn centroid_of_square_corners() {
    let c = centroid([
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ])
    .unwrap();
    assert_eq!(c, Point::new(5.0, 5.0));
    assert!(centroid(std::iter::empty()).is_none());
}

#[test]
fn span_and_bounds() {
    assert_eq!(span([3.0, -1.0, 7.0]), 8.0);
    assert_eq!(span(std::iter::empty()), 0.0);

    let b = union_bounds([
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(20.0, 5.0, 30.0, 40.0),
    ])
    .unwrap();
    assert_eq!(b, Rect::new(0.0, 0.0, 30.0, 40.0));
}

#[test]
fn clock_point_starts_at_twelve_and_turns_clockwise() {
    let c = Point::new(100.0, 100.0);
    let top = clock_point(c, 10.0, 0.0);
    assert!((top.x - 100.0).abs() < 1e-9 && (top.y - 90.0).abs() < 1e-9);
    let three = clock_point(c, 10.0, 90.0);
    assert!((three.x - 110.0).abs() < 1e-9 && (three.y - 100.0).abs() < 1e-9);
}

#[test]
fn containment_is_edge_inclusive() {
    let canvas = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert!(contains_rect(canvas, Rect::new(0.0, 0.0, 100.0, 100.0)));
    assert!(!contains_rect(canvas, Rect::new(-1.0, 0.0, 50.0, 50.0)));
    assert!(!contains_rect(canvas, Rect::new(60.0, 60.0, 101.0, 90.0)));
}
