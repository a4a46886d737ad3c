//! Per-agent CSV time series.

use std::fs::File;
use std::path::Path;

use crate::error::{OutputError, OutputResult};
use murmur_core::{ticks_for, FlockId};
use murmur_sim::{Observer, SimEvent, Simulation};

const HEADER: [&str; 15] = [
    "time", "species", "id", "pos_x", "pos_y", "pos_z", "dir_x", "dir_y", "speed", "accel_x",
    "accel_y", "ang_vel", "state", "stress", "flock",
];

/// Samples every awake agent into a CSV file.
///
/// Rows are written at initialization and then every `interval` simulated
/// seconds (at least every tick).  Sleeping agents are skipped — they carry
/// no fresh kinematics.  The file is flushed on [`SimEvent::Finished`], which
/// fires on early termination too.
pub struct TimeSeriesObserver {
    writer:   csv::Writer<File>,
    interval: f32,
    /// Sampling interval in ticks; resolved once the run's `dt` is known.
    every: u64,
    error: Option<OutputError>,
}

impl TimeSeriesObserver {
    /// Create the output file and write the header.  `interval` is in
    /// simulated seconds; zero samples every tick.
    pub fn create<P: AsRef<Path>>(path: P, interval: f32) -> OutputResult<Self> {
        if interval < 0.0 {
            return Err(OutputError::Config(format!(
                "sampling interval must be non-negative, got {interval}"
            )));
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(HEADER)?;
        Ok(TimeSeriesObserver {
            writer,
            interval,
            every: 1,
            error: None,
        })
    }

    /// Flush and surface the first error hit during the run, if any.
    pub fn finish(mut self) -> OutputResult<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(())
    }

    fn sample(&mut self, sim: &Simulation) -> OutputResult<()> {
        let time = sim.elapsed_secs();
        let mut row: Result<(), csv::Error> = Ok(());
        sim.visit_all(|v| {
            if row.is_err() || !v.awake {
                return;
            }
            let flock = if v.flock == FlockId::INVALID {
                -1
            } else {
                v.flock.index() as i64
            };
            let a = v.agent;
            row = self.writer.write_record([
                format!("{time:.4}"),
                v.species.to_string(),
                v.index.to_string(),
                a.pos.x.to_string(),
                a.pos.y.to_string(),
                a.pos.z.to_string(),
                a.dir.x.to_string(),
                a.dir.y.to_string(),
                a.speed.to_string(),
                a.accel.x.to_string(),
                a.accel.y.to_string(),
                a.ang_vel.to_string(),
                a.current_state.0.to_string(),
                a.stress.to_string(),
                flock.to_string(),
            ]);
        });
        row?;
        Ok(())
    }
}

impl Observer for TimeSeriesObserver {
    fn notify(&mut self, event: SimEvent, sim: &Simulation) {
        if self.error.is_some() {
            return;
        }
        let result = match event {
            SimEvent::Initialized => {
                self.every = ticks_for(self.interval, sim.dt()).max(1);
                self.sample(sim)
            }
            SimEvent::Tick => {
                if sim.current_tick().0 % self.every == 0 {
                    self.sample(sim)
                } else {
                    Ok(())
                }
            }
            SimEvent::Finished => self.writer.flush().map_err(OutputError::from),
            SimEvent::PreTick => Ok(()),
        };
        if let Err(e) = result {
            self.error = Some(e);
        }
    }
}
