use crate::r#match::engine::context::MatchContext;
use crate::r#match::engine::events::{BallEvent, EventCollection};
use crate::r#match::engine::geometry::{FieldGeometry, WALL_MARGIN};
use crate::r#match::engine::player::TeamSide;
use log::debug;
use nalgebra::Vector3;

/// A non-owning player inside this radius may capture a loose ball.
pub const CAPTURE_RADIUS: f32 = 22.0;
/// A ball above this height cannot be captured.
pub const CAPTURE_MAX_HEIGHT: f32 = 30.0;
/// How far in front of its owner a carried ball sits.
pub const HELD_OFFSET: f32 = 12.0;

const WALL_REBOUND: f32 = 0.3;

/// The match ball. `position.z` is the height above the pitch and
/// `velocity.z` the vertical speed. While owned the ball is pinned to
/// its owner every step and none of its own velocity is integrated.
pub struct Ball {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub owner: Option<u32>,
    pub last_owner_side: Option<TeamSide>,
}

impl Ball {
    pub fn at_center(geometry: &FieldGeometry) -> Self {
        Ball {
            position: geometry.center(),
            velocity: Vector3::zeros(),
            owner: None,
            last_owner_side: None,
        }
    }

    /// One free-flight step: integrate, bounce, decay, then check the
    /// goal mouths and rebound off the walls. A goal halts the step so
    /// the ball does not also rebound off the back wall.
    pub fn update(&mut self, dt: f32, context: &MatchContext, events: &mut EventCollection) {
        if self.owner.is_some() {
            return;
        }

        let settings = &context.settings;

        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;
        self.position.z += self.velocity.z * dt;
        self.velocity.z -= settings.ball_gravity * dt;

        if self.position.z < 0.0 {
            self.position.z = 0.0;
            self.velocity.z = -self.velocity.z * settings.ball_bounciness;
        }

        // Surface friction is a per-step decay, not scaled by dt.
        self.velocity.x *= settings.ball_friction;
        self.velocity.y *= settings.ball_friction;

        if let Some(side) = context.geometry.goal_at(self.position) {
            events.add_ball_event(BallEvent::Goal(side));
            return;
        }

        self.rebound_at_walls(&context.geometry);
    }

    /// Inverts an outward-pointing velocity component near the field
    /// edge, heavily damped, so a missed shot rolls back into play
    /// instead of leaving the pitch.
    fn rebound_at_walls(&mut self, geometry: &FieldGeometry) {
        if (self.position.x < WALL_MARGIN && self.velocity.x < 0.0)
            || (self.position.x > geometry.width - WALL_MARGIN && self.velocity.x > 0.0)
        {
            self.velocity.x *= -WALL_REBOUND;
        }

        if (self.position.y < WALL_MARGIN && self.velocity.y < 0.0)
            || (self.position.y > geometry.height - WALL_MARGIN && self.velocity.y > 0.0)
        {
            self.velocity.y *= -WALL_REBOUND;
        }
    }

    /// Pins a held ball in front of its owner.
    pub fn hold_at(&mut self, owner_position: Vector3<f32>, heading: Vector3<f32>) {
        self.position.x = owner_position.x + heading.x * HELD_OFFSET;
        self.position.y = owner_position.y + heading.y * HELD_OFFSET;
        self.position.z = 0.0;
    }

    pub fn capture(&mut self, player_id: u32, side: TeamSide) {
        debug!("ball captured by player {player_id}");

        self.owner = Some(player_id);
        self.last_owner_side = Some(side);
        self.velocity.x = 0.0;
        self.velocity.y = 0.0;
    }

    pub fn release(&mut self) {
        self.owner = None;
    }

    pub fn reset(&mut self, geometry: &FieldGeometry) {
        self.position = geometry.center();
        self.velocity = Vector3::zeros();
        self.owner = None;
        self.last_owner_side = None;
    }
}
