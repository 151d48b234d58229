use crate::r#match::engine::events::MatchEventRecord;
use crate::r#match::engine::player::TeamSide;
use nalgebra::Vector3;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TeamScore {
    pub team_id: u32,
    goals: u8,
}

impl TeamScore {
    pub fn new(team_id: u32) -> Self {
        TeamScore { team_id, goals: 0 }
    }

    pub fn get(&self) -> u8 {
        self.goals
    }

    fn add(&mut self) {
        self.goals += 1;
    }
}

/// The two independent goal counters. They only ever move up, one goal
/// at a time.
#[derive(Debug, Clone, Serialize)]
pub struct Score {
    pub home: TeamScore,
    pub away: TeamScore,
}

impl Score {
    pub fn new(home_team_id: u32, away_team_id: u32) -> Self {
        Score {
            home: TeamScore::new(home_team_id),
            away: TeamScore::new(away_team_id),
        }
    }

    pub fn increment(&mut self, side: TeamSide) {
        match side {
            TeamSide::Home => self.home.add(),
            TeamSide::Away => self.away.add(),
        }
    }

    pub fn get(&self, side: TeamSide) -> u8 {
        match side {
            TeamSide::Home => self.home.get(),
            TeamSide::Away => self.away.get(),
        }
    }
}

/// Everything a caller needs after full time: the final score and the
/// goal log, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResultRaw {
    pub score: Score,
    pub events: Vec<MatchEventRecord>,
}

/// Receives the final score exactly once, on full time or on an
/// external abort.
pub trait ResultSink {
    fn match_finished(&mut self, home_goals: u8, away_goals: u8);
}

pub trait VectorExtensions {
    fn length(&self) -> f32;
    fn distance_to(&self, other: &Vector3<f32>) -> f32;
    fn planar_distance_to(&self, other: &Vector3<f32>) -> f32;
}

impl VectorExtensions for Vector3<f32> {
    #[inline]
    fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[inline]
    fn distance_to(&self, other: &Vector3<f32>) -> f32 {
        let diff = self - other;
        diff.dot(&diff).sqrt()
    }

    /// Ground-plane distance, ignoring ball height.
    #[inline]
    fn planar_distance_to(&self, other: &Vector3<f32>) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
