use log::info;

/// Fire-and-forget commentary side channel. Implementations must handle
/// their own failures internally; nothing here returns a result and the
/// simulation never waits on a narrator. The engine runs identically
/// with the no-op implementation.
pub trait Narrator {
    fn goal(&self, team_name: &str);
    fn half_time(&self);
    fn second_half(&self);
    fn full_time(&self);
}

/// Silent narrator for tests and headless runs.
pub struct NullNarrator;

impl Narrator for NullNarrator {
    fn goal(&self, _team_name: &str) {}
    fn half_time(&self) {}
    fn second_half(&self) {}
    fn full_time(&self) {}
}

/// Narrator that shouts into the log.
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn goal(&self, team_name: &str) {
        info!("GOAL! {} find the net! What a strike!", team_name);
    }

    fn half_time(&self) {
        info!("Half time! The players catch their breath.");
    }

    fn second_half(&self) {
        info!("The ball is rolling for the second half!");
    }

    fn full_time(&self) {
        info!("Full time! What a match!");
    }
}
