use log::{debug, info};
use serde::Serialize;

/// Sim-time hold on the goal overlay before players line back up.
pub const CELEBRATION_MS: f64 = 3000.0;
/// Line-up freeze between a post-goal kickoff and open play.
pub const RESTART_FREEZE_MS: f64 = 1500.0;
/// Line-up freeze at the start of the second half.
pub const SECOND_HALF_FREEZE_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchPhase {
    Kickoff,
    Play,
    Celebrate,
    HalfTime,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchPeriod {
    FirstHalf,
    SecondHalf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTransition {
    EndCelebration,
    ResumePlay,
}

#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    due_ms: f64,
    transition: DeferredTransition,
}

/// The single authoritative match phase plus its queue of deferred
/// transitions. Deferred entries carry a sim-time deadline and are
/// re-validated against the current phase when they fire, so a stale
/// celebration timer can never force play back on after half time or
/// full time has engaged.
pub struct PhaseManager {
    phase: MatchPhase,
    period: MatchPeriod,
    pending: Vec<PendingTransition>,
}

impl Default for PhaseManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseManager {
    /// Starts at kickoff with an immediate resume deadline, so the first
    /// transition into open play goes through the same guarded path as
    /// every later restart.
    pub fn new() -> Self {
        PhaseManager {
            phase: MatchPhase::Kickoff,
            period: MatchPeriod::FirstHalf,
            pending: vec![PendingTransition {
                due_ms: 0.0,
                transition: DeferredTransition::ResumePlay,
            }],
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn period(&self) -> MatchPeriod {
        self.period
    }

    /// Half time and full time freeze stepping entirely.
    pub fn is_frozen(&self) -> bool {
        matches!(self.phase, MatchPhase::HalfTime | MatchPhase::Finished)
    }

    pub fn schedule(&mut self, transition: DeferredTransition, due_ms: f64) {
        self.pending.push(PendingTransition { due_ms, transition });
    }

    /// Removes and returns every deferred transition whose deadline has
    /// passed. Callers apply them through the guarded methods below.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<DeferredTransition> {
        let mut due = Vec::new();

        self.pending.retain(|pending| {
            if pending.due_ms <= now_ms {
                due.push(pending.transition);
                false
            } else {
                true
            }
        });

        due
    }

    /// Play -> Celebrate, with the line-up reset scheduled for later.
    pub fn begin_celebration(&mut self, now_ms: f64) -> bool {
        if self.phase != MatchPhase::Play {
            return false;
        }

        self.set_phase(MatchPhase::Celebrate);
        self.schedule(DeferredTransition::EndCelebration, now_ms + CELEBRATION_MS);
        true
    }

    /// Celebrate -> Kickoff. Returns false for a stale timer that fired
    /// after the phase already moved on.
    pub fn end_celebration(&mut self, now_ms: f64) -> bool {
        if self.phase != MatchPhase::Celebrate {
            debug!("dropping stale end-of-celebration transition in {:?}", self.phase);
            return false;
        }

        self.set_phase(MatchPhase::Kickoff);
        self.schedule(DeferredTransition::ResumePlay, now_ms + RESTART_FREEZE_MS);
        true
    }

    /// Kickoff -> Play. Returns false for a stale timer.
    pub fn resume_play(&mut self) -> bool {
        if self.phase != MatchPhase::Kickoff {
            debug!("dropping stale resume-play transition in {:?}", self.phase);
            return false;
        }

        self.set_phase(MatchPhase::Play);
        true
    }

    /// Engages the half-time freeze and drops every pending transition.
    pub fn engage_half_time(&mut self) {
        self.pending.clear();
        self.set_phase(MatchPhase::HalfTime);
    }

    /// HalfTime -> Kickoff for the second half.
    pub fn begin_second_half(&mut self, now_ms: f64) -> bool {
        if self.phase != MatchPhase::HalfTime {
            return false;
        }

        self.period = MatchPeriod::SecondHalf;
        self.set_phase(MatchPhase::Kickoff);
        self.schedule(DeferredTransition::ResumePlay, now_ms + SECOND_HALF_FREEZE_MS);
        true
    }

    /// Terminal: Finished is never left and cancels all pending work.
    pub fn finish(&mut self) {
        self.pending.clear();
        self.set_phase(MatchPhase::Finished);
    }

    fn set_phase(&mut self, phase: MatchPhase) {
        if self.phase != phase {
            info!("match phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_manager_starts_at_kickoff_with_immediate_resume() {
        let mut manager = PhaseManager::new();

        assert_eq!(manager.phase(), MatchPhase::Kickoff);
        assert_eq!(manager.period(), MatchPeriod::FirstHalf);
        assert_eq!(manager.take_due(0.0), vec![DeferredTransition::ResumePlay]);
        assert!(manager.resume_play());
        assert_eq!(manager.phase(), MatchPhase::Play);
    }

    #[test]
    fn goal_cycle_returns_to_play_through_kickoff() {
        let mut manager = PhaseManager::new();
        manager.take_due(0.0);
        manager.resume_play();

        assert!(manager.begin_celebration(1000.0));
        assert_eq!(manager.phase(), MatchPhase::Celebrate);
        assert!(manager.take_due(1000.0 + CELEBRATION_MS - 1.0).is_empty());

        let due = manager.take_due(1000.0 + CELEBRATION_MS);
        assert_eq!(due, vec![DeferredTransition::EndCelebration]);
        assert!(manager.end_celebration(4000.0));
        assert_eq!(manager.phase(), MatchPhase::Kickoff);

        let due = manager.take_due(4000.0 + RESTART_FREEZE_MS);
        assert_eq!(due, vec![DeferredTransition::ResumePlay]);
        assert!(manager.resume_play());
        assert_eq!(manager.phase(), MatchPhase::Play);
    }

    #[test]
    fn half_time_drops_pending_celebration_resume() {
        let mut manager = PhaseManager::new();
        manager.take_due(0.0);
        manager.resume_play();

        // Goal scored just before the half-time whistle.
        manager.begin_celebration(1000.0);
        manager.engage_half_time();

        assert_eq!(manager.phase(), MatchPhase::HalfTime);
        assert!(manager.take_due(f64::MAX).is_empty());

        // A stale timer that somehow survived must still be rejected.
        assert!(!manager.end_celebration(10_000.0));
        assert!(!manager.resume_play());
        assert_eq!(manager.phase(), MatchPhase::HalfTime);
    }

    #[test]
    fn second_half_resumes_through_kickoff() {
        let mut manager = PhaseManager::new();
        manager.take_due(0.0);
        manager.resume_play();
        manager.engage_half_time();

        assert!(manager.begin_second_half(5000.0));
        assert_eq!(manager.period(), MatchPeriod::SecondHalf);
        assert_eq!(manager.phase(), MatchPhase::Kickoff);

        let due = manager.take_due(5000.0 + SECOND_HALF_FREEZE_MS);
        assert_eq!(due, vec![DeferredTransition::ResumePlay]);
        assert!(manager.resume_play());
        assert_eq!(manager.phase(), MatchPhase::Play);
    }

    #[test]
    fn finished_is_terminal() {
        let mut manager = PhaseManager::new();
        manager.take_due(0.0);
        manager.resume_play();
        manager.finish();

        assert_eq!(manager.phase(), MatchPhase::Finished);
        assert!(!manager.resume_play());
        assert!(!manager.begin_celebration(0.0));
        assert!(!manager.begin_second_half(0.0));
        assert_eq!(manager.phase(), MatchPhase::Finished);
    }

    #[test]
    fn celebration_is_only_entered_from_open_play() {
        let mut manager = PhaseManager::new();

        assert!(!manager.begin_celebration(0.0));
        assert_eq!(manager.phase(), MatchPhase::Kickoff);
    }
}
