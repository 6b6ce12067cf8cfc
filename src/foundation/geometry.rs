use kurbo::{Point, Rect, Vec2};

/// Mean of a set of points; `None` for an empty set.
pub(crate) fn centroid<I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = Point>,
{
    let mut sum = Vec2::ZERO;
    let mut n = 0usize;
    for p in points {
        sum += p.to_vec2();
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some((sum / n as f64).to_point())
}

/// Smallest rectangle containing every input rectangle; `None` for an empty set.
pub(crate) fn union_bounds<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

/// `max - min` over the values, 0 for an empty set.
pub(crate) fn span<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() {
        hi - lo
    } else {
        0.0
    }
}

/// Point on a circle, angle measured clockwise from 12 o'clock in a y-down space.
pub(crate) fn clock_point(center: Point, radius: f64, clockwise_deg: f64) -> Point {
    let theta = (clockwise_deg - 90.0).to_radians();
    center + Vec2::from_angle(theta) * radius
}

/// Whether `inner` lies fully inside `outer` (edges inclusive).
pub(crate) fn contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
