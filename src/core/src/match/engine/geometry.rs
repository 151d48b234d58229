use crate::r#match::engine::player::TeamSide;
use nalgebra::Vector3;

/// Outer grass border around the playable pitch rectangle.
pub const PITCH_MARGIN: f32 = 60.0;
/// Distance from the field edge at which a loose ball rebounds.
pub const WALL_MARGIN: f32 = 15.0;
/// Players are clamped this far inside the field bounds.
pub const PLAYER_MARGIN: f32 = 5.0;
/// Distance from the field edge to the goal line plane.
pub const GOAL_LINE_OFFSET: f32 = 60.0;
/// Half of the goal mouth opening along the y axis.
pub const GOAL_MOUTH_HALF_HEIGHT: f32 = 70.0;
/// A ball above this height flies over the crossbar.
pub const GOAL_MAX_HEIGHT: f32 = 50.0;

const KEEPER_ANCHOR_DEPTH: f32 = 30.0;
const KEEPER_LINE_DEPTH: f32 = 15.0;
const PENALTY_AREA_DEPTH: f32 = 100.0;
const PENALTY_AREA_HALF_HEIGHT: f32 = 140.0;

/// All position-dependent constants of the pitch, derived from the
/// current field dimensions. Rebuilt wholesale whenever the field is
/// resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    pub width: f32,
    pub height: f32,
}

impl FieldGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        FieldGeometry { width, height }
    }

    pub fn center(&self) -> Vector3<f32> {
        Vector3::new(self.width / 2.0, self.height / 2.0, 0.0)
    }

    /// Center of the goal mouth the given side attacks toward.
    pub fn attack_target(&self, side: TeamSide) -> Vector3<f32> {
        let x = match side {
            TeamSide::Home => self.width - GOAL_LINE_OFFSET,
            TeamSide::Away => GOAL_LINE_OFFSET,
        };

        Vector3::new(x, self.height / 2.0, 0.0)
    }

    /// Formation anchor x for the goalkeeper of the given side.
    pub fn keeper_anchor_x(&self, side: TeamSide) -> f32 {
        match side {
            TeamSide::Home => PITCH_MARGIN + KEEPER_ANCHOR_DEPTH,
            TeamSide::Away => self.width - PITCH_MARGIN - KEEPER_ANCHOR_DEPTH,
        }
    }

    /// In-play goal line the goalkeeper of the given side patrols.
    pub fn keeper_line_x(&self, side: TeamSide) -> f32 {
        match side {
            TeamSide::Home => PITCH_MARGIN + KEEPER_LINE_DEPTH,
            TeamSide::Away => self.width - PITCH_MARGIN - KEEPER_LINE_DEPTH,
        }
    }

    /// Goal detection: returns the scoring side if the ball position is
    /// low enough, inside the goal mouth vertically, and past a goal
    /// line. A ball through the right goal scores for the home side.
    pub fn goal_at(&self, position: Vector3<f32>) -> Option<TeamSide> {
        if position.z >= GOAL_MAX_HEIGHT {
            return None;
        }

        if (position.y - self.height / 2.0).abs() >= GOAL_MOUTH_HALF_HEIGHT {
            return None;
        }

        if position.x > self.width - GOAL_LINE_OFFSET {
            return Some(TeamSide::Home);
        }

        if position.x < GOAL_LINE_OFFSET {
            return Some(TeamSide::Away);
        }

        None
    }

    pub fn penalty_area(&self, side: TeamSide) -> PenaltyArea {
        let center_y = self.height / 2.0;

        match side {
            TeamSide::Home => PenaltyArea::new(
                Vector3::new(PITCH_MARGIN, center_y - PENALTY_AREA_HALF_HEIGHT, 0.0),
                Vector3::new(
                    PITCH_MARGIN + PENALTY_AREA_DEPTH,
                    center_y + PENALTY_AREA_HALF_HEIGHT,
                    0.0,
                ),
            ),
            TeamSide::Away => PenaltyArea::new(
                Vector3::new(
                    self.width - PITCH_MARGIN - PENALTY_AREA_DEPTH,
                    center_y - PENALTY_AREA_HALF_HEIGHT,
                    0.0,
                ),
                Vector3::new(
                    self.width - PITCH_MARGIN,
                    center_y + PENALTY_AREA_HALF_HEIGHT,
                    0.0,
                ),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PenaltyArea {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl PenaltyArea {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        PenaltyArea { min, max }
    }

    pub fn contains(&self, point: &Vector3<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_inside_right_goal_mouth_scores_for_home() {
        let geometry = FieldGeometry::new(840.0, 545.0);
        let position = Vector3::new(830.0, 545.0 / 2.0, 10.0);

        assert_eq!(geometry.goal_at(position), Some(TeamSide::Home));
    }

    #[test]
    fn ball_outside_goal_mouth_does_not_score() {
        let geometry = FieldGeometry::new(840.0, 545.0);
        let wide = Vector3::new(830.0, 545.0 / 2.0 + 200.0, 10.0);
        let high = Vector3::new(830.0, 545.0 / 2.0, 80.0);

        assert_eq!(geometry.goal_at(wide), None);
        assert_eq!(geometry.goal_at(high), None);
    }

    #[test]
    fn ball_past_left_goal_line_scores_for_away() {
        let geometry = FieldGeometry::new(840.0, 545.0);
        let position = Vector3::new(30.0, 545.0 / 2.0 - 20.0, 0.0);

        assert_eq!(geometry.goal_at(position), Some(TeamSide::Away));
    }

    #[test]
    fn penalty_areas_abut_their_own_pitch_margin() {
        let geometry = FieldGeometry::new(840.0, 545.0);

        let home_area = geometry.penalty_area(TeamSide::Home);
        assert!(home_area.contains(&Vector3::new(100.0, 272.5, 0.0)));
        assert!(!home_area.contains(&Vector3::new(300.0, 272.5, 0.0)));

        let away_area = geometry.penalty_area(TeamSide::Away);
        assert!(away_area.contains(&Vector3::new(740.0, 272.5, 0.0)));
        assert!(!away_area.contains(&Vector3::new(540.0, 272.5, 0.0)));
    }
}
