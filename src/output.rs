use crate::lattice::Lattice;
use anyhow::{Context, Result};
use lattice_gas_common::{FrameSample, Snapshot};
use log::{error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Serialization format for the snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Bincode,
    MessagePack,
}

impl SnapshotFormat {
    /// Parses the configured format name. Unknown names fall back to JSON.
    pub fn from_config(format: Option<&str>) -> Self {
        match format.unwrap_or("json") {
            "json" => Self::Json,
            "bincode" => Self::Bincode,
            "messagepack" => Self::MessagePack,
            other => {
                error!("Unknown output format: {}. Using JSON instead.", other);
                Self::Json
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Bincode => "bin",
            Self::MessagePack => "msgpack",
        }
    }
}

/// Writes one CSV row per frame sample to `{base}_series.csv`.
pub fn write_series_csv(base_filename: &str, samples: &[FrameSample]) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_series.csv", base_filename));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create series file '{}'", path.display()))?;
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    info!("{} frame samples saved to {}", samples.len(), path.display());
    Ok(path)
}

/// Writes all snapshots to `{base}_snapshots.{ext}` in the requested format.
pub fn write_snapshots(base_filename: &str, snapshots: &[Snapshot], format: SnapshotFormat) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_snapshots.{}", base_filename, format.extension()));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create snapshot file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        SnapshotFormat::Json => {
            serde_json::to_writer(&mut writer, snapshots).context("Error serializing snapshots to JSON")?;
        }
        SnapshotFormat::Bincode => {
            bincode::serialize_into(&mut writer, snapshots).context("Error serializing snapshots to bincode")?;
        }
        SnapshotFormat::MessagePack => {
            rmp_serde::encode::write(&mut writer, snapshots).context("Error serializing snapshots to MessagePack")?;
        }
    }
    writer.flush()?;
    info!("{} snapshots saved to {} ({:?} format)", snapshots.len(), path.display(), format);
    Ok(path)
}

/// Writes the occupation of every site to `{base}_final_lattice.csv`.
pub fn write_lattice_csv(base_filename: &str, lattice: &Lattice) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_final_lattice.csv", base_filename));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create lattice file '{}'", path.display()))?;
    writer.write_record(["x", "y", "occupied"])?;
    for (x, y, occupied) in lattice.iter() {
        writer.write_record(&[x.to_string(), y.to_string(), occupied.to_string()])?;
    }
    writer.flush()?;
    info!("Final lattice saved to {}", path.display());
    Ok(path)
}
