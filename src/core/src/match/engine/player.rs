use crate::r#match::engine::ball::{Ball, CAPTURE_MAX_HEIGHT, CAPTURE_RADIUS};
use crate::r#match::engine::context::MatchContext;
use crate::r#match::engine::events::{BallEvent, EventCollection};
use crate::r#match::engine::geometry::{FieldGeometry, PLAYER_MARGIN};
use crate::r#match::result::VectorExtensions;
use nalgebra::Vector3;
use rand::Rng;
use rand::RngExt;
use rand::rngs::SmallRng;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Shoot/pass choices are re-evaluated at most this often per player.
pub const DECISION_COOLDOWN_MS: f64 = 500.0;

const SHOOTING_RANGE: f32 = 280.0;
const PASS_SPEED: f32 = 11.0;
const DRIBBLE_BOOST: f32 = 1.08;
const SKILL_BASELINE: f32 = 75.0;
const OFF_BALL_JOG_FACTOR: f32 = 0.85;
const SPRINT_DISTANCE: f32 = 30.0;
const KEEPER_RUSH_RADIUS: f32 = 140.0;
const KEEPER_BALL_TRACKING: f32 = 0.45;
const UNIVERSAL_CHASE_THRESHOLD: f32 = 1.4;
const ARRIVAL_DEADZONE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opposite(&self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    /// Unit vector toward the goal this side attacks.
    pub fn attack_direction(&self) -> Vector3<f32> {
        match self {
            TeamSide::Home => Vector3::new(1.0, 0.0, 0.0),
            TeamSide::Away => Vector3::new(-1.0, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayerRole {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PlayerRole {
    /// Ball distance within which an off-ball outfield player abandons
    /// its formation anchor and chases.
    pub fn engagement_radius(&self) -> f32 {
        match self {
            PlayerRole::Forward => 450.0,
            PlayerRole::Midfielder => 350.0,
            PlayerRole::Defender => 250.0,
            PlayerRole::Goalkeeper => 0.0,
        }
    }
}

impl Display for PlayerRole {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            PlayerRole::Goalkeeper => write!(f, "GK"),
            PlayerRole::Defender => write!(f, "DEF"),
            PlayerRole::Midfielder => write!(f, "MID"),
            PlayerRole::Forward => write!(f, "FWD"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchPlayer {
    pub id: u32,
    pub display_name: String,
    pub side: TeamSide,
    pub role: PlayerRole,
    pub skill: u8,
    pub slot: usize,
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub anchor: Vector3<f32>,
    pub last_decision_ms: f64,
}

impl MatchPlayer {
    pub fn new(
        id: u32,
        display_name: String,
        side: TeamSide,
        role: PlayerRole,
        skill: u8,
        slot: usize,
        anchor: Vector3<f32>,
    ) -> Self {
        MatchPlayer {
            id,
            display_name,
            side,
            role,
            skill,
            slot,
            position: anchor,
            velocity: Vector3::zeros(),
            anchor,
            last_decision_ms: 0.0,
        }
    }

    /// One AI step: either carry the ball toward the opposing goal or
    /// steer toward the off-ball target, then clamp to the field.
    pub fn update(
        &mut self,
        dt: f32,
        ball: &mut Ball,
        context: &MatchContext,
        rng: &mut SmallRng,
        events: &mut EventCollection,
    ) {
        if ball.owner == Some(self.id) {
            self.update_in_possession(dt, ball, context, rng, events);
        } else {
            self.update_off_ball(dt, ball, context, events);
        }

        self.clamp_to_field(&context.geometry);
    }

    fn base_speed(&self, context: &MatchContext) -> f32 {
        (self.skill as f32 / SKILL_BASELINE)
            * context.multipliers.speed
            * context.settings.ai_aggressiveness
    }

    fn update_in_possession(
        &mut self,
        dt: f32,
        ball: &mut Ball,
        context: &MatchContext,
        rng: &mut SmallRng,
        events: &mut EventCollection,
    ) {
        let goal = context.geometry.attack_target(self.side);
        let to_goal = Vector3::new(goal.x - self.position.x, goal.y - self.position.y, 0.0);
        let distance_to_goal = to_goal.length();

        let direction = if distance_to_goal > f32::EPSILON {
            to_goal / distance_to_goal
        } else {
            self.side.attack_direction()
        };

        let speed = self.base_speed(context) * dt * DRIBBLE_BOOST;
        self.velocity = direction * speed;
        self.apply_velocity();

        ball.hold_at(self.position, direction);

        if context.time.elapsed_ms - self.last_decision_ms < DECISION_COOLDOWN_MS {
            return;
        }
        self.last_decision_ms = context.time.elapsed_ms;

        if distance_to_goal < SHOOTING_RANGE {
            self.shoot(ball, direction, context, rng, events);
        } else if rng.random_range(0.0..1.0f32) < context.settings.ai_pass_frequency {
            self.pass(ball, direction, events);
        }
    }

    /// Releases the ball toward the goal: shot power scales with skill,
    /// the lateral sway shrinks as the difficulty precision rises, and
    /// the ball is launched into the air.
    fn shoot(
        &self,
        ball: &mut Ball,
        direction: Vector3<f32>,
        context: &MatchContext,
        rng: &mut SmallRng,
        events: &mut EventCollection,
    ) {
        let power = 16.0 + self.skill as f32 / 18.0;
        let sway = rng.random_range(-0.75..0.75f32) / context.multipliers.precision;

        ball.release();
        ball.velocity = Vector3::new(
            direction.x * power,
            direction.y * power + sway,
            4.0 + rng.random_range(0.0..3.5f32),
        );

        events.add_ball_event(BallEvent::Shot(self.id));
    }

    /// Releases the ball flat along the current heading.
    fn pass(&self, ball: &mut Ball, direction: Vector3<f32>, events: &mut EventCollection) {
        ball.release();
        ball.velocity = Vector3::new(direction.x * PASS_SPEED, direction.y * PASS_SPEED, 0.0);

        events.add_ball_event(BallEvent::Pass(self.id));
    }

    fn update_off_ball(
        &mut self,
        dt: f32,
        ball: &mut Ball,
        context: &MatchContext,
        events: &mut EventCollection,
    ) {
        let ball_distance = self.position.planar_distance_to(&ball.position);
        let target = self.off_ball_target(ball, context, ball_distance);

        let to_target = Vector3::new(target.x - self.position.x, target.y - self.position.y, 0.0);
        let distance = to_target.length();

        // Sprint only once close to the ball, jog otherwise.
        let speed = self.base_speed(context) * dt;
        let move_speed = if ball_distance < SPRINT_DISTANCE {
            speed
        } else {
            speed * OFF_BALL_JOG_FACTOR
        };

        self.velocity = if distance > ARRIVAL_DEADZONE {
            to_target / distance * move_speed
        } else {
            Vector3::zeros()
        };
        self.apply_velocity();

        self.try_capture(ball, events);
    }

    fn off_ball_target(
        &self,
        ball: &Ball,
        context: &MatchContext,
        ball_distance: f32,
    ) -> Vector3<f32> {
        let geometry = &context.geometry;

        match self.role {
            PlayerRole::Goalkeeper => {
                // Rush a loose ball inside the area, otherwise hold the
                // line and track a fraction of the ball's offset.
                if ball.owner.is_none() && ball_distance < KEEPER_RUSH_RADIUS {
                    return Vector3::new(ball.position.x, ball.position.y, 0.0);
                }

                let center_y = geometry.height / 2.0;
                Vector3::new(
                    geometry.keeper_line_x(self.side),
                    center_y + (ball.position.y - center_y) * KEEPER_BALL_TRACKING,
                    0.0,
                )
            }
            _ => {
                let engaged = ball_distance < self.role.engagement_radius()
                    || context.settings.ai_aggressiveness > UNIVERSAL_CHASE_THRESHOLD;

                if engaged {
                    Vector3::new(ball.position.x, ball.position.y, 0.0)
                } else {
                    self.anchor
                }
            }
        }
    }

    fn try_capture(&self, ball: &mut Ball, events: &mut EventCollection) {
        if ball.owner.is_some() || ball.position.z >= CAPTURE_MAX_HEIGHT {
            return;
        }

        if self.position.planar_distance_to(&ball.position) < CAPTURE_RADIUS {
            ball.capture(self.id, self.side);
            events.add_ball_event(BallEvent::Claimed(self.id));
        }
    }

    fn apply_velocity(&mut self) {
        if !self.velocity.x.is_nan() {
            self.position.x += self.velocity.x;
        }

        if !self.velocity.y.is_nan() {
            self.position.y += self.velocity.y;
        }
    }

    fn clamp_to_field(&mut self, geometry: &FieldGeometry) {
        self.position.x = self
            .position
            .x
            .clamp(PLAYER_MARGIN, geometry.width - PLAYER_MARGIN);
        self.position.y = self
            .position
            .y
            .clamp(PLAYER_MARGIN, geometry.height - PLAYER_MARGIN);
    }

    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }
}
