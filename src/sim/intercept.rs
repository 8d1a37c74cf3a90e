//! Time-of-impact solver
//!
//! The tricky part of the match: the ball and the paddle both move during a
//! turn, so overlap checks at turn boundaries miss fast balls. Instead we solve
//! for the normalized time `t ∈ [0, 1]` at which the ball's edge touches the
//! paddle, in closed form.
//!
//! Degenerate inputs (zero-length segments, grazing tangents) fall out as
//! NaN/∞ roots and are treated as "no intercept" or handed to the endpoint
//! fallback, never as errors.

use glam::DVec2;

/// A circle translating at constant velocity over one turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingCircle {
    pub center: DVec2,
    /// Displacement over the whole turn
    pub velocity: DVec2,
    pub radius: f64,
}

impl MovingCircle {
    pub fn at(&self, time: f64) -> DVec2 {
        self.center + self.velocity * time
    }
}

/// A point translating at constant velocity over one turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingPoint {
    pub position: DVec2,
    pub velocity: DVec2,
}

impl MovingPoint {
    pub fn at(&self, time: f64) -> DVec2 {
        self.position + self.velocity * time
    }
}

/// A rigid segment translating at constant velocity (a paddle face)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingSegment {
    pub start: DVec2,
    pub end: DVec2,
    pub velocity: DVec2,
}

impl MovingSegment {
    /// Segment of the given length centred on `center`, parallel to y
    pub fn vertical(center: DVec2, length: f64, velocity: DVec2) -> Self {
        let half = DVec2::new(0.0, length / 2.0);
        Self {
            start: center - half,
            end: center + half,
            velocity,
        }
    }

    pub fn midpoint_at(&self, time: f64) -> DVec2 {
        (self.start + self.end) / 2.0 + self.velocity * time
    }

    fn endpoints(&self) -> [MovingPoint; 2] {
        [self.start, self.end].map(|position| MovingPoint {
            position,
            velocity: self.velocity,
        })
    }
}

/// First contact between a circle and a paddle during a turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    /// Normalized turn time of contact
    pub time: f64,
    /// Contact point on the paddle
    pub point: DVec2,
    /// Resolved against a segment endpoint rather than the face
    pub edge: bool,
}

/// Smaller root of `a t² + b t + c = 0`, if it lies in `[0, 1]`.
///
/// `a` is the squared closing speed. With no relative motion the gap never
/// changes: the shapes touch for the whole turn (`t = 0`) or never. Negative
/// discriminants and non-finite inputs produce NaN roots which fail the range
/// check.
fn earliest_root(a: f64, b: f64, c: f64) -> Option<f64> {
    if a == 0.0 {
        return (c <= 0.0).then_some(0.0);
    }

    let discriminant = b * b - 4.0 * a * c;
    let time = (-b - discriminant.sqrt()) / (2.0 * a);

    (time.is_finite() && (0.0..=1.0).contains(&time)).then_some(time)
}

/// When does the moving point first touch the circle's boundary?
///
/// A moving circle already overlapping the point at `t = 0` has a negative
/// first root and reports no intercept.
pub fn circle_point_intercept(circle: &MovingCircle, point: &MovingPoint) -> Option<Intercept> {
    let offset = circle.center - point.position;
    let relative = circle.velocity - point.velocity;

    let time = earliest_root(
        relative.length_squared(),
        2.0 * offset.dot(relative),
        offset.length_squared() - circle.radius * circle.radius,
    )?;

    Some(Intercept {
        time,
        point: point.at(time),
        edge: true,
    })
}

/// Earliest endpoint contact, used when the face solve does not apply
fn edge_intercept(circle: &MovingCircle, segment: &MovingSegment) -> Option<Intercept> {
    let [first, second] = segment
        .endpoints()
        .map(|endpoint| circle_point_intercept(circle, &endpoint));

    match (first, second) {
        (Some(a), Some(b)) => Some(if a.time < b.time { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// When does the circle first touch the moving segment?
///
/// Solves for the circle centre being exactly `radius` from the segment's
/// line. The segment only translates, so its direction is fixed and the
/// signed distance is linear in `t`; squaring gives a quadratic. A segment
/// that also rotated would need the general quartic, which pure translation
/// reduces to this quadratic.
///
/// A face contact outside the segment's extent means the ball passed beside
/// the paddle, in which case only the endpoints can still be hit.
pub fn circle_segment_intercept(
    circle: &MovingCircle,
    segment: &MovingSegment,
) -> Option<Intercept> {
    let axis = segment.end - segment.start;
    let length = axis.length();
    let normal = (axis / length).perp();

    let offset = circle.center - segment.start;
    let relative = circle.velocity - segment.velocity;
    let distance = normal.dot(offset);
    let closing = normal.dot(relative);

    let Some(time) = earliest_root(
        closing * closing,
        2.0 * distance * closing,
        distance * distance - circle.radius * circle.radius,
    ) else {
        return edge_intercept(circle, segment);
    };

    // Foot of the perpendicular from the centre onto the line
    let signed_distance = distance + closing * time;
    let point = circle.at(time) - normal * signed_distance;

    if !point.is_finite() || point.distance(segment.midpoint_at(time)) > length / 2.0 {
        return edge_intercept(circle, segment);
    }

    Some(Intercept {
        time,
        point,
        edge: false,
    })
}
