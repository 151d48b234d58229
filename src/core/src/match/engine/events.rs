use crate::r#match::engine::context::MatchContext;
use crate::r#match::engine::player::TeamSide;
use crate::r#match::narrator::Narrator;
use log::{debug, info};
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BallEvent {
    Goal(TeamSide),
    Claimed(u32),
    Shot(u32),
    Pass(u32),
}

/// Events raised while stepping the entities, applied in one batch after
/// every entity has moved.
pub struct EventCollection {
    events: Vec<BallEvent>,
}

impl EventCollection {
    pub fn new() -> Self {
        EventCollection { events: Vec::new() }
    }

    pub fn add_ball_event(&mut self, event: BallEvent) {
        self.events.push(event);
    }

    pub fn to_vec(&self) -> Vec<BallEvent> {
        self.events.clone()
    }
}

impl Default for EventCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchEventKind {
    Goal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchEventRecord {
    pub minute: u8,
    pub kind: MatchEventKind,
    pub side: TeamSide,
    pub team_id: u32,
    pub description: String,
}

/// Append-only match event log, newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchEventLog {
    records: VecDeque<MatchEventRecord>,
}

impl MatchEventLog {
    pub fn new() -> Self {
        MatchEventLog {
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: MatchEventRecord) {
        self.records.push_front(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&MatchEventRecord> {
        self.records.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchEventRecord> {
        self.records.iter()
    }
}

pub struct EventDispatcher;

impl EventDispatcher {
    pub fn dispatch(events: EventCollection, context: &mut MatchContext, narrator: &dyn Narrator) {
        for event in events.events {
            debug!("ball event: {:?}", event);

            match event {
                BallEvent::Goal(side) => Self::handle_goal(side, context, narrator),
                BallEvent::Claimed(_) | BallEvent::Shot(_) | BallEvent::Pass(_) => {}
            }
        }
    }

    /// Scores the goal exactly once: bump the counter, append the log
    /// record, fire the best-effort narration and start the celebration.
    fn handle_goal(side: TeamSide, context: &mut MatchContext, narrator: &dyn Narrator) {
        let (team_id, team_name) = {
            let team = context.team(side);
            (team.id, team.name.clone())
        };

        context.score.increment(side);

        let record = MatchEventRecord {
            minute: context.minute,
            kind: MatchEventKind::Goal,
            side,
            team_id,
            description: format!("Goal! {} find the net!", team_name),
        };
        info!("{}' {}", record.minute, record.description);
        context.events.push(record);

        narrator.goal(&team_name);

        let now_ms = context.time.elapsed_ms;
        context.phase.begin_celebration(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::engine::context::TeamMeta;
    use crate::r#match::engine::geometry::FieldGeometry;
    use crate::r#match::engine::state::MatchPhase;
    use crate::r#match::narrator::NullNarrator;
    use crate::settings::{Difficulty, MatchPhysicsSettings};

    fn context() -> MatchContext {
        MatchContext::new(
            FieldGeometry::new(840.0, 545.0),
            MatchPhysicsSettings::default(),
            Difficulty::Professional,
            TeamMeta {
                id: 1,
                name: String::from("Home"),
                color: String::from("#ffffff"),
            },
            TeamMeta {
                id: 2,
                name: String::from("Away"),
                color: String::from("#000000"),
            },
        )
    }

    #[test]
    fn goal_event_scores_logs_and_starts_the_celebration() {
        let mut context = context();
        context.phase.take_due(0.0);
        context.phase.resume_play();
        context.minute = 23;

        let mut events = EventCollection::new();
        events.add_ball_event(BallEvent::Goal(TeamSide::Home));
        EventDispatcher::dispatch(events, &mut context, &NullNarrator);

        assert_eq!(context.score.home.get(), 1);
        assert_eq!(context.score.away.get(), 0);
        assert_eq!(context.events.len(), 1);
        assert_eq!(context.phase.phase(), MatchPhase::Celebrate);

        let record = context.events.latest().unwrap();
        assert_eq!(record.minute, 23);
        assert_eq!(record.side, TeamSide::Home);
        assert_eq!(record.team_id, 1);
    }

    #[test]
    fn log_keeps_newest_record_first() {
        let mut log = MatchEventLog::new();
        for minute in [3u8, 40, 77] {
            log.push(MatchEventRecord {
                minute,
                kind: MatchEventKind::Goal,
                side: TeamSide::Away,
                team_id: 2,
                description: String::from("Goal!"),
            });
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.latest().unwrap().minute, 77);

        let minutes: Vec<u8> = log.iter().map(|record| record.minute).collect();
        assert_eq!(minutes, vec![77, 40, 3]);
    }

    #[test]
    fn non_goal_events_leave_score_and_log_untouched() {
        let mut context = context();

        let mut events = EventCollection::new();
        events.add_ball_event(BallEvent::Claimed(5));
        events.add_ball_event(BallEvent::Pass(5));
        EventDispatcher::dispatch(events, &mut context, &NullNarrator);

        assert_eq!(context.score.home.get(), 0);
        assert!(context.events.is_empty());
    }
}
