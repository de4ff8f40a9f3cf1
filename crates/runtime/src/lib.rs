//! Headless driver shared by the `boxdyn` binary and its tests.

use anyhow::{Context, Result};
use dynamics::{StepReport, World};
use tracing::info;

/// How long to run and how often to report.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub frames: usize,
    pub frame_dt: f32,
    /// Log body poses every this many frames; 0 disables progress logs.
    pub log_every: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 300,
            frame_dt: 1.0 / 30.0,
            log_every: 50,
        }
    }
}

/// Advances `world` frame by frame and returns the combined step report.
///
/// # Errors
///
/// Fails if the world rejects the frame time.
pub fn simulate(world: &mut World, options: &RunOptions) -> Result<StepReport> {
    info!(
        frames = options.frames,
        frame_dt = options.frame_dt,
        substeps = world.config().substeps,
        "starting simulation"
    );
    let mut total = StepReport::default();
    for frame in 1..=options.frames {
        let report = world
            .advance(options.frame_dt)
            .with_context(|| format!("frame {frame}"))?;
        total += report;
        if options.log_every > 0 && frame % options.log_every == 0 {
            log_frame(world, frame, &report);
        }
    }
    info!(
        substeps = total.substeps,
        retries = total.retries,
        contacts = total.contacts,
        fallbacks = total.fallbacks,
        "simulation finished"
    );
    Ok(total)
}

fn log_frame(world: &World, frame: usize, report: &StepReport) {
    info!(
        frame,
        contacts = report.contacts,
        retries = report.retries,
        "frame complete"
    );
    for (index, body) in world.bodies().iter().enumerate() {
        if body.is_fixed() {
            continue;
        }
        let p = body.position;
        let v = body.velocity();
        info!(
            body = index,
            x = p.x,
            y = p.y,
            z = p.z,
            speed = v.length(),
            "pose"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamics::{Mat3, Vec3, WorldConfig};

    #[test]
    fn runs_requested_frames() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        world
            .add_box(Vec3::ONE, 1.0, Vec3::new(0.0, 50.0, 0.0), Mat3::IDENTITY)
            .unwrap();
        let options = RunOptions {
            frames: 6,
            frame_dt: 0.02,
            log_every: 2,
        };
        let report = simulate(&mut world, &options).unwrap();
        assert_eq!(report.substeps, 60);
        assert!(world.bodies()[0].position.y < 50.0);
    }

    #[test]
    fn negative_frame_time_is_an_error() {
        let mut world = World::default();
        let options = RunOptions {
            frame_dt: -1.0,
            ..RunOptions::default()
        };
        assert!(simulate(&mut world, &options).is_err());
    }
}
