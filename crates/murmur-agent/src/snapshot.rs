//! Point-in-time agent state for save/restore and restarts.

use std::path::Path;

use glam::Vec3;

use crate::error::{AgentError, AgentResult};

/// The restorable part of an agent: kinematics plus stress.  Everything else
/// (schedule, state machine, RNG stream) is reconstructed from config.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AgentSnapshot {
    pub pos:    Vec3,
    pub dir:    Vec3,
    pub speed:  f32,
    pub accel:  Vec3,
    pub stress: f32,
}

const CSV_HEADER: [&str; 11] = [
    "id", "pos_x", "pos_y", "pos_z", "dir_x", "dir_y", "dir_z", "speed", "accel_x", "accel_y",
    "stress",
];

impl AgentSnapshot {
    /// Read one population's snapshots from a CSV file written by
    /// [`write_csv`][Self::write_csv] (or by the time-series exporter's
    /// snapshot mode).  Rows are ordered by index; the `id` column is
    /// ignored on read.
    pub fn read_csv(path: &Path) -> AgentResult<Vec<AgentSnapshot>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut out = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() < CSV_HEADER.len() {
                return Err(AgentError::Config(format!(
                    "snapshot row has {} fields, expected {}",
                    record.len(),
                    CSV_HEADER.len()
                )));
            }
            let field = |i: usize| -> AgentResult<f32> {
                record[i].trim().parse::<f32>().map_err(|e| {
                    AgentError::Config(format!("bad snapshot field '{}': {e}", &record[i]))
                })
            };
            out.push(AgentSnapshot {
                pos:    Vec3::new(field(1)?, field(2)?, field(3)?),
                dir:    Vec3::new(field(4)?, field(5)?, field(6)?),
                speed:  field(7)?,
                accel:  Vec3::new(field(8)?, field(9)?, 0.0),
                stress: field(10)?,
            });
        }
        Ok(out)
    }

    /// Write one population's snapshots, ordered by index.
    pub fn write_csv(path: &Path, snapshots: &[AgentSnapshot]) -> AgentResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(CSV_HEADER)?;
        for (id, s) in snapshots.iter().enumerate() {
            writer.write_record(&[
                id.to_string(),
                s.pos.x.to_string(),
                s.pos.y.to_string(),
                s.pos.z.to_string(),
                s.dir.x.to_string(),
                s.dir.y.to_string(),
                s.dir.z.to_string(),
                s.speed.to_string(),
                s.accel.x.to_string(),
                s.accel.y.to_string(),
                s.stress.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}
