//! Fixed-step run loop.

use sentinel_common::SentinelError;
use std::fs::File;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::report::{EventLog, Summary};
use crate::world::World;

/// Runs a scenario to completion and returns what happened.
///
/// Stops early when `stop_on_strike` is set and a strike lands. Events are
/// streamed to `events_path` when one is configured.
pub fn run(config: &SimConfig) -> Result<Summary, SentinelError> {
    config.validate()?;
    let mut world = World::from_config(config)?;
    let mut log = match &config.events_path {
        Some(path) => Some(EventLog::<File>::create(path)?),
        None => None,
    };

    let dt = config.tick_seconds();
    let ticks = config.tick_count();
    info!(guards = world.guards().len(), ticks, dt, "Running scenario");

    let mut summary = Summary::default();
    for _ in 0..ticks {
        let records = world.step(dt);
        summary.ticks += 1;

        for record in &records {
            debug!(time = record.time, guard = %record.guard, event = ?record.event, "event");
            summary.record(record);
            if let Some(log) = log.as_mut() {
                log.write(record)?;
            }
        }

        if config.stop_on_strike && summary.caught() {
            info!("Intruder caught at {:.2}s", world.elapsed());
            break;
        }
    }
    summary.elapsed = world.elapsed();

    if let Some(log) = log {
        let written = log.written();
        log.finish()?;
        if let Some(path) = &config.events_path {
            info!("Wrote {written} events to {}", path.display());
        }
    }

    for guard in world.guards() {
        info!(guard = %guard.name, state = %guard.agent.current_state(), "final state");
    }
    Ok(summary)
}
