use crate::controller::SimulationController;
use lattice_gas_common::{FrameSample, RunConfig, ScheduledCommand, Snapshot};
use log::{debug, info, trace};
use std::time::Instant;

/// Everything the headless frame loop produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub samples: Vec<FrameSample>,
    pub snapshots: Vec<Snapshot>,
    pub elapsed_secs: f64,
}

/// Drives `controller` the way a presentation layer would: per frame, replay
/// any scheduled commands, `tick()`, then sample the observables.
///
/// Snapshots are collected only when `collect_snapshots` is set.
pub fn run(
    controller: &mut SimulationController,
    run_config: &RunConfig,
    collect_snapshots: bool,
    snapshot_lattice: bool,
) -> RunReport {
    let mut schedule: Vec<ScheduledCommand> = run_config.schedule.clone();
    schedule.sort_by_key(|s| s.frame);
    let mut pending = schedule.into_iter().peekable();

    if !run_config.start_paused && controller.is_paused() {
        controller.toggle_pause();
    }

    let total_frames = run_config.frames;
    let log_interval = run_config.log_interval_frames.max(1);
    let mut report = RunReport {
        samples: Vec::with_capacity(total_frames as usize),
        ..RunReport::default()
    };

    info!("Starting frame loop for {} frames...", total_frames);
    let start_time = Instant::now();

    for frame in 0..total_frames {
        while let Some(scheduled) = pending.next_if(|s| s.frame <= frame) {
            debug!("Frame {}: applying {:?}", frame, scheduled.command);
            controller.apply(scheduled.command);
        }

        let frame_start = Instant::now();
        controller.tick();
        let sample = controller.sample_frame();

        let is_last_frame = frame + 1 == total_frames;
        if (frame + 1) % log_interval == 0 || is_last_frame {
            let counters = controller.counters();
            info!(
                "Frame [{}/{}] | N/site: {:.4} | E/site: {:.4} | H/site: {:.4} | T: {:.2} | mu: {:.2} | acc: {:.3} | Elapsed: {:.2} s",
                frame + 1,
                total_frames,
                sample.number_per_site,
                sample.energy_per_site,
                sample.hamiltonian_per_site,
                sample.temperature,
                sample.chemical_potential,
                counters.acceptance_rate(),
                start_time.elapsed().as_secs_f64()
            );
        } else {
            trace!(
                "Frame [{}/{}] completed in {:.3} ms",
                frame + 1,
                total_frames,
                frame_start.elapsed().as_secs_f64() * 1000.0
            );
        }

        if collect_snapshots {
            report.snapshots.push(controller.snapshot(sample.clone(), snapshot_lattice));
        }
        report.samples.push(sample);
    }

    report.elapsed_secs = start_time.elapsed().as_secs_f64();
    info!("Frame loop finished in {:.3} seconds.", report.elapsed_secs);
    report
}
