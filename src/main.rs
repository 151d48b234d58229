use color_eyre::Result;
use env_logger::Env;
use golazo_core::r#match::{
    FixedStepDriver, LogNarrator, MatchConfig, MatchEngine, MatchPhase, MatchSquad, ResultSink,
    TeamSide,
};
use golazo_core::{Difficulty, MatchPhysicsSettings, TeamGenerator};
use log::info;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::env;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::time::{Duration, MissedTickBehavior, interval, sleep};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;
const HALF_TIME_BREAK: Duration = Duration::from_millis(1500);

struct StdoutSink;

impl ResultSink for StdoutSink {
    fn match_finished(&mut self, home_goals: u8, away_goals: u8) {
        println!("FULL TIME {home_goals}-{away_goals}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let seed = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or(0)
        });
    let fast_forward = env::var("MODE") == Ok(String::from("FAST"));

    info!("seed {seed}");

    let mut rng = SmallRng::seed_from_u64(seed);
    let home = TeamGenerator::generate(1, "Red Albion", "#ff0000", 18, &mut rng);
    let away = TeamGenerator::generate(2, "Blue Rovers", "#0000ff", 18, &mut rng);

    let config = MatchConfig {
        settings: MatchPhysicsSettings::default(),
        difficulty: Difficulty::Professional,
        seed,
        ..MatchConfig::default()
    };

    let engine = MatchEngine::new(
        &MatchSquad::from_team(&home),
        &MatchSquad::from_team(&away),
        config,
    )
    .with_narrator(Box::new(LogNarrator))
    .with_result_sink(Box::new(StdoutSink));

    info!("{} vs {}", home.name, away.name);

    let mut engine = if fast_forward {
        run_fixed_step(engine)
    } else {
        run_real_time(engine).await
    };

    // Teardown also covers an interrupted match: the report only fires
    // once no matter how the run ended.
    engine.abort();

    for event in engine.result().events {
        info!("{}' {}", event.minute, event.description);
    }

    Ok(())
}

/// Simulate the whole match as fast as possible.
fn run_fixed_step(engine: MatchEngine) -> MatchEngine {
    let mut driver = FixedStepDriver::new(engine);
    driver.run_to_finish(20_000);
    driver.engine
}

/// Real-time driving: a ~60 Hz frame loop stepping the simulation with
/// the measured delta, and an independent one-second interval mapping a
/// real second to a match minute.
async fn run_real_time(mut engine: MatchEngine) -> MatchEngine {
    let mut frame = interval(FRAME_INTERVAL);
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut minute = interval(Duration::from_secs(1));
    minute.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_frame = Instant::now();

    loop {
        tokio::select! {
            _ = frame.tick() => {
                let elapsed = last_frame.elapsed();
                last_frame = Instant::now();

                let dt = elapsed.as_secs_f32() * 1000.0 / NOMINAL_FRAME_MS;
                engine.step(dt);
            }
            _ = minute.tick() => {
                engine.advance_minute();

                if engine.minute() % 15 == 0 {
                    let snapshot = engine.snapshot();
                    info!(
                        "{}' {}-{} (ball at {:.0},{:.0})",
                        snapshot.minute,
                        snapshot.home_goals,
                        snapshot.away_goals,
                        snapshot.ball.position.x,
                        snapshot.ball.position.y
                    );
                }
            }
        }

        match engine.phase() {
            MatchPhase::Finished => break,
            MatchPhase::HalfTime => {
                sleep(HALF_TIME_BREAK).await;
                engine.start_second_half();
                last_frame = Instant::now();
            }
            _ => {}
        }
    }

    info!(
        "final whistle: {} {} - {} {}",
        engine.context.home.name,
        engine.score(TeamSide::Home),
        engine.score(TeamSide::Away),
        engine.context.away.name
    );

    engine
}
