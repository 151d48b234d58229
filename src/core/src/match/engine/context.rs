use crate::r#match::engine::events::MatchEventLog;
use crate::r#match::engine::geometry::FieldGeometry;
use crate::r#match::engine::player::TeamSide;
use crate::r#match::engine::state::PhaseManager;
use crate::r#match::result::Score;
use crate::settings::{Difficulty, DifficultyMultipliers, MatchPhysicsSettings};

/// Nominal frame interval the delta-time scalar is normalized against:
/// `dt = 1.0` advances sim time by one 60 Hz frame.
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

/// Accumulated simulation time. Only advances while the match is
/// actually stepping, so deferred deadlines compose with pause and the
/// half-time freeze for free.
pub struct MatchTime {
    pub elapsed_ms: f64,
}

impl MatchTime {
    pub fn new() -> Self {
        MatchTime { elapsed_ms: 0.0 }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed_ms += dt as f64 * NOMINAL_FRAME_MS;
    }
}

impl Default for MatchTime {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct TeamMeta {
    pub id: u32,
    pub name: String,
    pub color: String,
}

/// Match-scoped shared state: everything the ball, the players and the
/// event dispatcher read or mutate besides the entities themselves.
pub struct MatchContext {
    pub geometry: FieldGeometry,
    pub settings: MatchPhysicsSettings,
    pub multipliers: DifficultyMultipliers,
    pub score: Score,
    pub minute: u8,
    pub time: MatchTime,
    pub phase: PhaseManager,
    pub events: MatchEventLog,
    pub home: TeamMeta,
    pub away: TeamMeta,
}

impl MatchContext {
    pub fn new(
        geometry: FieldGeometry,
        settings: MatchPhysicsSettings,
        difficulty: Difficulty,
        home: TeamMeta,
        away: TeamMeta,
    ) -> Self {
        MatchContext {
            geometry,
            settings,
            multipliers: difficulty.multipliers(),
            score: Score::new(home.id, away.id),
            minute: 0,
            time: MatchTime::new(),
            phase: PhaseManager::new(),
            events: MatchEventLog::new(),
            home,
            away,
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamMeta {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }
}
