use crate::r#match::engine::context::MatchContext;
use crate::r#match::engine::field::MatchField;
use crate::r#match::engine::geometry::FieldGeometry;
use crate::r#match::engine::player::{PlayerRole, TeamSide};
use crate::r#match::engine::state::MatchPhase;
use itertools::Itertools;
use nalgebra::Vector3;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub id: u32,
    pub name: String,
    pub side: TeamSide,
    pub role: PlayerRole,
    pub slot: usize,
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BallSnapshot {
    pub position: Vector3<f32>,
    pub owner: Option<u32>,
}

/// Read-only view of the whole match for a renderer, captured between
/// steps. Players come out in painter's order (top of the field first)
/// so a 2D view can draw them back to front.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSnapshot {
    pub minute: u8,
    pub phase: MatchPhase,
    pub home_goals: u8,
    pub away_goals: u8,
    pub players: Vec<PlayerSnapshot>,
    pub ball: BallSnapshot,
}

impl MatchSnapshot {
    pub fn capture(field: &MatchField, context: &MatchContext) -> Self {
        let players = field
            .players
            .iter()
            .sorted_by(|a, b| a.position.y.total_cmp(&b.position.y))
            .map(|player| PlayerSnapshot {
                id: player.id,
                name: player.display_name.clone(),
                side: player.side,
                role: player.role,
                slot: player.slot,
                position: player.position,
                velocity: player.velocity,
                color: context.team(player.side).color.clone(),
            })
            .collect();

        MatchSnapshot {
            minute: context.minute,
            phase: context.phase.phase(),
            home_goals: context.score.home.get(),
            away_goals: context.score.away.get(),
            players,
            ball: BallSnapshot {
                position: field.ball.position,
                owner: field.ball.owner,
            },
        }
    }
}

/// Maps field positions into a fixed-size minimap rectangle.
#[derive(Debug, Clone, Copy)]
pub struct RadarView {
    pub width: f32,
    pub height: f32,
}

impl RadarView {
    pub fn project(&self, geometry: &FieldGeometry, position: Vector3<f32>) -> (f32, f32) {
        (
            position.x / geometry.width * self.width,
            position.y / geometry.height * self.height,
        )
    }
}

/// Zoom about the field center, from the presentation-only camera
/// setting.
#[derive(Debug, Clone, Copy)]
pub struct CameraTransform {
    pub zoom: f32,
    pub center: Vector3<f32>,
}

impl CameraTransform {
    pub fn new(zoom: f32, geometry: &FieldGeometry) -> Self {
        CameraTransform {
            zoom,
            center: geometry.center(),
        }
    }

    pub fn apply(&self, position: Vector3<f32>) -> Vector3<f32> {
        self.center + (position - self.center) * self.zoom
    }
}
