//! Flight arc height
//!
//! The ball's height is not simulated; renderers draw it along a bouncing
//! parabola through the last contact and the aim point. The physics step only
//! needs the height at a new contact so the next arc starts where the
//! previous one left off.

use super::state::Hit;
use crate::consts::Z_MULTIPLIER;

/// Apex height (in field units) the steepest usable arc must clear
const MIN_APEX: f64 = 4.0;

/// Height of a repeating bounce parabola at `x`.
///
/// The parabola with curvature `a` passes through `(hit_x, hit_z)` and lands
/// at `(land_x, 0)`; past the landing point it repeats with the same width.
/// Arcs heading toward +x are mirrored about the contact so the same
/// left-going formula applies.
fn bounce_height(a: f64, mut x: f64, hit_x: f64, hit_z: f64, land_x: f64) -> f64 {
    let (x1, y1) = (hit_x, hit_z);
    let mut x2 = land_x;
    let y2 = 0.0;

    if land_x > hit_x {
        x2 = hit_x - (land_x - hit_x);
        x = hit_x - (x - hit_x);
    }

    let slope = (y2 - y1) / (x2 - x1);
    let b = slope - a * (x1 + x2);
    let c = y1 - x1 * slope + a * x1 * x2;
    let width = 2.0 * (-b / (2.0 * a) - x2);
    let bounded = (x - x2).abs() % width + x2;

    a * bounded * bounded + b * bounded + c
}

/// Ball height at horizontal position `ball_x` along the arc described by `hit`.
///
/// Picks the gentlest curvature (from 1/20 down to 1/5) whose apex clears
/// `MIN_APEX`, then evaluates a slightly flatter parabola. Degenerate hits
/// (contact and landing at the same x) yield 0.
pub fn flight_height(ball_x: f64, hit: &Hit) -> f64 {
    let arc = |a: f64, x: f64| bounce_height(a, x, hit.hit_x, hit.hit_z, hit.land_x) / Z_MULTIPLIER;

    let mut denominator = 20.0;
    while denominator > 0.0 {
        if arc(-1.0 / denominator, 0.0) > MIN_APEX {
            break;
        }
        denominator -= 5.0;
    }

    let z = arc(-1.0 / f64::max(1.0, denominator - 0.6), ball_x);

    if z.is_finite() { z } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serve_hit() -> Hit {
        Hit {
            hit_x: -20.0,
            hit_z: 1.5,
            land_x: 20.0,
        }
    }

    #[test]
    fn test_height_at_contact_matches_hit() {
        let hit = serve_hit();
        let z = flight_height(hit.hit_x, &hit) * Z_MULTIPLIER;
        assert!((z - hit.hit_z).abs() < 1e-9);
    }

    #[test]
    fn test_height_at_landing_is_zero() {
        let hit = serve_hit();
        assert!(flight_height(hit.land_x, &hit).abs() < 1e-9);
    }

    #[test]
    fn test_arc_rises_between_contact_and_landing() {
        let hit = serve_hit();
        assert!(flight_height(0.0, &hit) > flight_height(hit.hit_x, &hit));
    }

    #[test]
    fn test_mirrored_arcs_agree() {
        let west = serve_hit();
        let east = Hit {
            hit_x: 20.0,
            hit_z: 1.5,
            land_x: -20.0,
        };
        for x in [-15.0, -5.0, 0.0, 7.5] {
            let a = flight_height(x, &west);
            let b = flight_height(-x, &east);
            assert!((a - b).abs() < 1e-9, "x={x}: {a} vs {b}");
        }
    }

    #[test]
    fn test_degenerate_hit_is_flat() {
        let hit = Hit {
            hit_x: 10.0,
            hit_z: 1.0,
            land_x: 10.0,
        };
        assert_eq!(flight_height(3.0, &hit), 0.0);
    }
}
