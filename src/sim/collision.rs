//! Paddle hit detection and rebound
//!
//! Works on read-only views of the match and returns the rebounded ball; the
//! turn engine decides what to write back.

use glam::DVec2;
use rand::Rng;

use super::arc::flight_height;
use super::intercept::{Intercept, MovingCircle, MovingSegment, circle_segment_intercept};
use super::state::{Ball, Hit, Point, Side, State};
use crate::consts::*;
use crate::polar_to_cartesian;

/// A resolved paddle hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleHit {
    pub side: Side,
    /// Where and when within the turn the ball met the paddle
    pub intercept: Intercept,
    /// Target the ball was redirected toward
    pub aim: Point,
    /// Paddle was moving toward the opponent at contact
    pub attacking: bool,
    /// Ball after the rebound, already advanced for the rest of the turn
    pub ball: Ball,
}

/// Check one paddle against the ball's path for this turn.
///
/// A ball travelling away from the paddle's side is never checked.
pub fn resolve_paddle_hit<R: Rng>(
    ball: &Ball,
    side: Side,
    paddle: Point,
    paddle_velocity: DVec2,
    rng: &mut R,
) -> Option<PaddleHit> {
    let velocity = ball.velocity();
    if velocity.x * side.forward() > 0.0 {
        return None;
    }

    let intercept = circle_segment_intercept(
        &MovingCircle {
            center: ball.position,
            velocity,
            radius: BALL_RADIUS,
        },
        &MovingSegment::vertical(paddle, PADDLE_LENGTH, paddle_velocity),
    )?;

    let attacking = paddle_velocity.x * side.forward() > 0.0;

    let mut window = AIM_Y_WINDOW;
    if paddle.x.abs() < NEAR_NET {
        window *= AIM_Y_WIDEN;
    }
    if attacking {
        window *= AIM_Y_WIDEN;
    }

    let aim_x = (rng.random::<f64>() * AIM_X_SPAN + AIM_X_MIN) * side.forward();
    let aim_y = rng.random::<f64>() * window - window / 2.0;
    let aim = DVec2::new(aim_x, aim_y);

    let contact = ball.position + velocity * intercept.time;
    let height = flight_height(contact.x, &ball.hit) * Z_MULTIPLIER;

    let speed = ball.speed * if attacking { ATTACK_BOOST } else { BLOCK_BOOST };
    let to_aim = aim - contact;
    let angle = to_aim.y.atan2(to_aim.x);
    let remaining = speed * (1.0 - intercept.time);

    log::debug!(
        "{side} hit at t={:.3} ({:.2}, {:.2}){} speed {:.2} -> {:.2}, aiming ({:.2}, {:.2})",
        intercept.time,
        contact.x,
        contact.y,
        if intercept.edge { " off the edge" } else { "" },
        ball.speed,
        speed,
        aim.x,
        aim.y,
    );

    Some(PaddleHit {
        side,
        intercept,
        aim,
        attacking,
        ball: Ball {
            speed,
            angle,
            position: contact + polar_to_cartesian(remaining, angle),
            hit: Hit {
                hit_x: contact.x,
                hit_z: height,
                land_x: aim.x,
            },
            intercept: Some(contact),
        },
    })
}

/// Resolve at most one hit for the turn, player 1 first
pub fn first_paddle_hit<R: Rng>(
    state: &State,
    paddle_velocities: [DVec2; 2],
    rng: &mut R,
) -> Option<PaddleHit> {
    Side::BOTH.into_iter().find_map(|side| {
        resolve_paddle_hit(
            &state.ball,
            side,
            state.player(side).position,
            paddle_velocities[side.index()],
            rng,
        )
    })
}
