use crate::r#match::engine::context::{MatchContext, TeamMeta};
use crate::r#match::engine::events::{EventCollection, EventDispatcher};
use crate::r#match::engine::field::MatchField;
use crate::r#match::engine::geometry::FieldGeometry;
use crate::r#match::engine::player::TeamSide;
use crate::r#match::engine::snapshot::MatchSnapshot;
use crate::r#match::engine::state::{DeferredTransition, MatchPeriod, MatchPhase};
use crate::r#match::narrator::{Narrator, NullNarrator};
use crate::r#match::result::{MatchResultRaw, ResultSink};
use crate::r#match::squad::MatchSquad;
use crate::settings::{Difficulty, MatchPhysicsSettings};
use log::info;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// A stalled frame is capped at two nominal frames so the ball cannot
/// tunnel through boundaries after the driver was suspended.
pub const MAX_DELTA: f32 = 2.0;

/// The real-time minute clock ticks once per second; the fixed-step
/// driver maps that to one minute per 60 unit steps.
pub const STEPS_PER_MINUTE: u64 = 60;

const HALF_TIME_MINUTE: u8 = 45;
const FULL_TIME_MINUTE: u8 = 90;

#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub width: f32,
    pub height: f32,
    pub settings: MatchPhysicsSettings,
    pub difficulty: Difficulty,
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            width: 840.0,
            height: 545.0,
            settings: MatchPhysicsSettings::default(),
            difficulty: Difficulty::Professional,
            seed: 0,
        }
    }
}

/// The match simulation. A driver feeds it `step` calls with a
/// delta-time scalar plus independent `advance_minute` ticks; everything
/// else (phases, goals, the final report) happens internally.
pub struct MatchEngine {
    pub field: MatchField,
    pub context: MatchContext,
    rng: SmallRng,
    narrator: Box<dyn Narrator>,
    result_sink: Option<Box<dyn ResultSink>>,
    paused: bool,
    result_reported: bool,
}

impl MatchEngine {
    pub fn new(home: &MatchSquad, away: &MatchSquad, config: MatchConfig) -> Self {
        let geometry = FieldGeometry::new(config.width, config.height);
        let field = MatchField::new(&geometry, home, away);

        let context = MatchContext::new(
            geometry,
            config.settings,
            config.difficulty,
            TeamMeta {
                id: home.team_id,
                name: home.team_name.clone(),
                color: home.color.clone(),
            },
            TeamMeta {
                id: away.team_id,
                name: away.team_name.clone(),
                color: away.color.clone(),
            },
        );

        MatchEngine {
            field,
            context,
            rng: SmallRng::seed_from_u64(config.seed),
            narrator: Box::new(NullNarrator),
            result_sink: None,
            paused: false,
            result_reported: false,
        }
    }

    pub fn with_narrator(mut self, narrator: Box<dyn Narrator>) -> Self {
        self.narrator = narrator;
        self
    }

    pub fn with_result_sink(mut self, sink: Box<dyn ResultSink>) -> Self {
        self.result_sink = Some(sink);
        self
    }

    /// One simulation step. Advances sim time, fires due deferred
    /// transitions through their phase guards, then integrates the ball
    /// and every player while the match is in open play. Never panics;
    /// a non-finite delta is discarded.
    pub fn step(&mut self, dt: f32) {
        if self.paused || self.context.phase.is_frozen() || !dt.is_finite() {
            return;
        }

        let dt = dt.clamp(0.0, MAX_DELTA);
        self.context.time.advance(dt);

        let now_ms = self.context.time.elapsed_ms;
        for transition in self.context.phase.take_due(now_ms) {
            match transition {
                DeferredTransition::EndCelebration => {
                    if self.context.phase.end_celebration(now_ms) {
                        self.field.reset_positions(&self.context.geometry);
                    }
                }
                DeferredTransition::ResumePlay => {
                    self.context.phase.resume_play();
                }
            }
        }

        if self.context.phase.phase() != MatchPhase::Play {
            return;
        }

        let mut events = EventCollection::new();

        self.field.ball.update(dt, &self.context, &mut events);

        let MatchField { players, ball } = &mut self.field;
        for player in players.iter_mut() {
            player.update(dt, ball, &self.context, &mut self.rng, &mut events);
        }

        EventDispatcher::dispatch(events, &mut self.context, self.narrator.as_ref());
    }

    /// Independent minute clock tick. Only mutates the minute and the
    /// phase, never entity positions.
    pub fn advance_minute(&mut self) {
        if self.paused || self.context.phase.is_frozen() {
            return;
        }

        self.context.minute += 1;

        if self.context.minute == HALF_TIME_MINUTE
            && self.context.phase.period() == MatchPeriod::FirstHalf
        {
            info!(
                "half time {}-{}",
                self.score(TeamSide::Home),
                self.score(TeamSide::Away)
            );
            self.context.phase.engage_half_time();
            self.narrator.half_time();
            return;
        }

        if self.context.minute >= FULL_TIME_MINUTE {
            self.finish();
        }
    }

    /// External trigger that ends the half-time freeze: both line-ups
    /// reform, the ball returns to the center spot and play resumes
    /// after a short kickoff freeze.
    pub fn start_second_half(&mut self) {
        let now_ms = self.context.time.elapsed_ms;
        if self.context.phase.begin_second_half(now_ms) {
            self.field.reset_positions(&self.context.geometry);
            self.narrator.second_half();
        }
    }

    /// Freezes stepping and the minute clock without touching the phase.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Re-derives every position-dependent constant for new field
    /// dimensions and reforms both line-ups inside them.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.context.geometry = FieldGeometry::new(width, height);
        self.field.reset_positions(&self.context.geometry);
    }

    /// Settings may be swapped between matches; a swap mid-match is
    /// tolerated and simply applies from the next step.
    pub fn update_settings(&mut self, settings: MatchPhysicsSettings) {
        self.context.settings = settings;
    }

    /// External teardown: reports the current score (once) and parks the
    /// phase machine in its terminal state.
    pub fn abort(&mut self) {
        self.context.phase.finish();
        self.report_result_once();
    }

    fn finish(&mut self) {
        if self.context.phase.phase() == MatchPhase::Finished {
            return;
        }

        self.context.phase.finish();
        self.narrator.full_time();
        self.report_result_once();
    }

    fn report_result_once(&mut self) {
        if self.result_reported {
            return;
        }
        self.result_reported = true;

        let home_goals = self.context.score.home.get();
        let away_goals = self.context.score.away.get();
        info!("full time {}-{}", home_goals, away_goals);

        if let Some(sink) = self.result_sink.as_mut() {
            sink.match_finished(home_goals, away_goals);
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.context.phase.phase()
    }

    pub fn minute(&self) -> u8 {
        self.context.minute
    }

    pub fn score(&self, side: TeamSide) -> u8 {
        self.context.score.get(side)
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(&self.field, &self.context)
    }

    pub fn result(&self) -> MatchResultRaw {
        MatchResultRaw {
            score: self.context.score.clone(),
            events: self.context.events.iter().cloned().collect(),
        }
    }
}

/// Deterministic driver for tests and headless simulation: unit steps
/// with a minute tick every 60 steps, so 5400 steps cover a 90 minute
/// match. Resumes the second half automatically.
pub struct FixedStepDriver {
    pub engine: MatchEngine,
    steps: u64,
}

impl FixedStepDriver {
    pub fn new(engine: MatchEngine) -> Self {
        FixedStepDriver { engine, steps: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn step(&mut self) {
        if self.engine.phase() == MatchPhase::HalfTime {
            self.engine.start_second_half();
        }

        self.engine.step(1.0);
        self.steps += 1;

        if self.steps % STEPS_PER_MINUTE == 0 {
            self.engine.advance_minute();
        }
    }

    /// Runs until full time, bounded by `max_steps`. Returns true if the
    /// match finished.
    pub fn run_to_finish(&mut self, max_steps: u64) -> bool {
        for _ in 0..max_steps {
            if self.engine.phase() == MatchPhase::Finished {
                return true;
            }
            self.step();
        }

        self.engine.phase() == MatchPhase::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::TeamGenerator;
    use crate::r#match::engine::geometry::PLAYER_MARGIN;
    use crate::r#match::squad::MatchSquad;
    use nalgebra::Vector3;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingSink {
        calls: u32,
        last: Option<(u8, u8)>,
    }

    struct SharedSink(Rc<RefCell<CountingSink>>);

    impl ResultSink for SharedSink {
        fn match_finished(&mut self, home_goals: u8, away_goals: u8) {
            let mut sink = self.0.borrow_mut();
            sink.calls += 1;
            sink.last = Some((home_goals, away_goals));
        }
    }

    fn squads(seed: u64) -> (MatchSquad, MatchSquad) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let home = TeamGenerator::generate(1, "Reds", "#ff0000", 18, &mut rng);
        let away = TeamGenerator::generate(2, "Blues", "#0000ff", 18, &mut rng);
        (MatchSquad::from_team(&home), MatchSquad::from_team(&away))
    }

    fn engine_with_sink(seed: u64) -> (MatchEngine, Rc<RefCell<CountingSink>>) {
        let (home, away) = squads(seed);
        let sink = Rc::new(RefCell::new(CountingSink::default()));
        let engine = MatchEngine::new(
            &home,
            &away,
            MatchConfig {
                seed,
                ..MatchConfig::default()
            },
        )
        .with_result_sink(Box::new(SharedSink(Rc::clone(&sink))));

        (engine, sink)
    }

    fn transition_is_legal(from: MatchPhase, to: MatchPhase) -> bool {
        matches!(
            (from, to),
            (MatchPhase::Kickoff, MatchPhase::Play)
                | (MatchPhase::Play, MatchPhase::Celebrate)
                | (MatchPhase::Play, MatchPhase::HalfTime)
                | (MatchPhase::Play, MatchPhase::Finished)
                | (MatchPhase::Celebrate, MatchPhase::Kickoff)
                | (MatchPhase::Celebrate, MatchPhase::HalfTime)
                | (MatchPhase::Celebrate, MatchPhase::Finished)
                | (MatchPhase::Kickoff, MatchPhase::HalfTime)
                | (MatchPhase::Kickoff, MatchPhase::Finished)
                | (MatchPhase::HalfTime, MatchPhase::Kickoff)
        )
    }

    #[test]
    fn full_match_scenario_holds_every_invariant() {
        let (engine, sink) = engine_with_sink(42);
        let mut driver = FixedStepDriver::new(engine);

        let mut previous_phase = driver.engine.phase();
        let mut previous_score = (0u8, 0u8);
        let mut half_times = 0;

        for _ in 0..20_000 {
            if driver.engine.phase() == MatchPhase::Finished {
                break;
            }
            driver.step();

            let engine = &driver.engine;

            // Bounds containment, every step, both axes.
            let geometry = &engine.context.geometry;
            for player in &engine.field.players {
                assert!(player.position.x >= PLAYER_MARGIN);
                assert!(player.position.x <= geometry.width - PLAYER_MARGIN);
                assert!(player.position.y >= PLAYER_MARGIN);
                assert!(player.position.y <= geometry.height - PLAYER_MARGIN);
            }

            // Ownership exclusivity: the owner, if any, is on the field.
            if let Some(owner) = engine.field.ball.owner {
                assert!(engine.field.player(owner).is_some());
            }

            // Score monotonicity, one goal at a time, log in lockstep.
            let score = (
                engine.score(TeamSide::Home),
                engine.score(TeamSide::Away),
            );
            let home_gained = score.0 as i32 - previous_score.0 as i32;
            let away_gained = score.1 as i32 - previous_score.1 as i32;
            assert!(home_gained >= 0 && away_gained >= 0);
            assert!(home_gained + away_gained <= 1);
            assert_eq!(
                engine.context.events.len(),
                score.0 as usize + score.1 as usize
            );
            previous_score = score;

            // Phase ordering.
            let phase = engine.phase();
            if phase != previous_phase {
                assert!(
                    transition_is_legal(previous_phase, phase),
                    "illegal transition {:?} -> {:?}",
                    previous_phase,
                    phase
                );
                if phase == MatchPhase::HalfTime {
                    half_times += 1;
                }
                previous_phase = phase;
            }
        }

        assert_eq!(driver.engine.phase(), MatchPhase::Finished);
        assert!(driver.engine.minute() >= 90);
        assert_eq!(half_times, 1);
        // 90 minutes at 60 steps per minute, plus restart slack.
        assert!(driver.steps() <= 5600, "match ran long: {}", driver.steps());

        let sink = sink.borrow();
        assert_eq!(sink.calls, 1);
        let (home_goals, away_goals) = sink.last.unwrap();
        assert_eq!(home_goals, driver.engine.score(TeamSide::Home));
        assert_eq!(away_goals, driver.engine.score(TeamSide::Away));
        assert_eq!(
            driver.engine.context.events.len(),
            home_goals as usize + away_goals as usize
        );
    }

    #[test]
    fn finish_report_is_idempotent() {
        let (engine, sink) = engine_with_sink(7);
        let mut driver = FixedStepDriver::new(engine);
        assert!(driver.run_to_finish(20_000));

        driver.engine.abort();
        driver.engine.abort();

        assert_eq!(sink.borrow().calls, 1);
    }

    #[test]
    fn abort_reports_the_current_score_once() {
        let (mut engine, sink) = engine_with_sink(7);
        engine.step(1.0);

        engine.abort();
        engine.abort();

        assert_eq!(engine.phase(), MatchPhase::Finished);
        assert_eq!(sink.borrow().calls, 1);
        assert_eq!(sink.borrow().last, Some((0, 0)));
    }

    #[test]
    fn pause_freezes_stepping_and_the_clock() {
        let (home, away) = squads(3);
        let mut engine = MatchEngine::new(&home, &away, MatchConfig::default());

        engine.step(1.0);
        assert_eq!(engine.phase(), MatchPhase::Play);
        let elapsed = engine.context.time.elapsed_ms;

        engine.set_paused(true);
        engine.step(1.0);
        engine.advance_minute();

        assert_eq!(engine.context.time.elapsed_ms, elapsed);
        assert_eq!(engine.minute(), 0);

        engine.set_paused(false);
        engine.step(1.0);
        engine.advance_minute();

        assert!(engine.context.time.elapsed_ms > elapsed);
        assert_eq!(engine.minute(), 1);
    }

    #[test]
    fn goal_just_before_half_time_cannot_resume_play_after_the_freeze() {
        let (home, away) = squads(11);
        let mut engine = MatchEngine::new(&home, &away, MatchConfig::default());
        engine.context.minute = 44;

        // Enter open play, then push the ball over the home goal line.
        engine.step(1.0);
        assert_eq!(engine.phase(), MatchPhase::Play);
        engine.field.ball.reset(&engine.context.geometry);
        engine.field.ball.position =
            Vector3::new(engine.context.geometry.width - 10.0, 545.0 / 2.0, 0.0);
        engine.step(1.0);
        assert_eq!(engine.phase(), MatchPhase::Celebrate);
        assert_eq!(engine.score(TeamSide::Home), 1);

        // The half-time whistle lands mid-celebration.
        engine.advance_minute();
        assert_eq!(engine.phase(), MatchPhase::HalfTime);

        // However long the driver keeps stepping, the stale celebration
        // deadline must never force play back on.
        for _ in 0..1000 {
            engine.step(1.0);
        }
        assert_eq!(engine.phase(), MatchPhase::HalfTime);

        engine.start_second_half();
        assert_eq!(engine.phase(), MatchPhase::Kickoff);
        for _ in 0..120 {
            engine.step(1.0);
        }
        assert_eq!(engine.phase(), MatchPhase::Play);
    }

    #[test]
    fn resize_rebuilds_geometry_and_line_ups() {
        let (home, away) = squads(5);
        let mut engine = MatchEngine::new(&home, &away, MatchConfig::default());
        engine.step(1.0);

        engine.resize(1280.0, 720.0);

        assert_eq!(engine.context.geometry.width, 1280.0);
        for player in &engine.field.players {
            assert!(player.position.x < 1280.0);
            assert!(player.position.y < 720.0);
        }
        assert_eq!(
            engine.field.ball.position,
            engine.context.geometry.center()
        );
    }

    #[test]
    fn short_rosters_still_play_a_full_match() {
        let mut rng = SmallRng::seed_from_u64(9);
        let home = TeamGenerator::generate(1, "Reds", "#ff0000", 7, &mut rng);
        let away = TeamGenerator::generate(2, "Blues", "#0000ff", 18, &mut rng);

        let engine = MatchEngine::new(
            &MatchSquad::from_team(&home),
            &MatchSquad::from_team(&away),
            MatchConfig::default(),
        );
        let mut driver = FixedStepDriver::new(engine);

        assert_eq!(driver.engine.field.players.len(), 18);
        assert!(driver.run_to_finish(20_000));
    }

    #[test]
    fn non_finite_delta_is_discarded() {
        let (home, away) = squads(13);
        let mut engine = MatchEngine::new(&home, &away, MatchConfig::default());
        engine.step(1.0);
        let elapsed = engine.context.time.elapsed_ms;

        engine.step(f32::NAN);
        engine.step(f32::INFINITY);

        assert_eq!(engine.context.time.elapsed_ms, elapsed);

        // An absurd frame gap is clamped to two nominal frames.
        engine.step(1000.0);
        assert!(engine.context.time.elapsed_ms - elapsed < 3.0 * 1000.0 / 60.0);
    }
}
