use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use smartdoc_core::{DoctorProfile, SmartDocError};

/// Number of profiles copied into the sample file.
pub const SAMPLE_SIZE: usize = 10;

/// Read a dataset JSON array, rejecting duplicate doctor ids.
pub fn load_profiles(path: impl AsRef<Path>) -> Result<Vec<DoctorProfile>, SmartDocError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let profiles: Vec<DoctorProfile> = serde_json::from_reader(reader)?;

    let mut seen = HashSet::with_capacity(profiles.len());
    for p in &profiles {
        if !seen.insert(p.doctor_id.as_str()) {
            return Err(SmartDocError::Dataset(format!(
                "duplicate doctor_id {} in {}",
                p.doctor_id,
                path.display()
            )));
        }
    }

    tracing::info!(path = %path.display(), count = profiles.len(), "Loaded dataset");
    Ok(profiles)
}

pub fn save_profiles(path: impl AsRef<Path>, profiles: &[DoctorProfile]) -> Result<(), SmartDocError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, profiles)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    tracing::info!(path = %path.display(), count = profiles.len(), "Saved dataset");
    Ok(())
}

/// Write the full dataset and a sample of its first profiles.
pub fn write_dataset(
    data_path: impl AsRef<Path>,
    sample_path: impl AsRef<Path>,
    profiles: &[DoctorProfile],
) -> Result<(), SmartDocError> {
    save_profiles(data_path, profiles)?;
    save_profiles(sample_path, &profiles[..profiles.len().min(SAMPLE_SIZE)])
}

/// Specialty and location distribution of a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetStats {
    pub total: usize,
    pub by_specialty: BTreeMap<String, usize>,
    pub by_location: BTreeMap<String, usize>,
}

impl DatasetStats {
    pub fn from_profiles(profiles: &[DoctorProfile]) -> Self {
        let mut stats = Self {
            total: profiles.len(),
            ..Self::default()
        };
        for p in profiles {
            *stats
                .by_specialty
                .entry(p.primary_specialty.clone())
                .or_default() += 1;
            *stats.by_location.entry(p.location.clone()).or_default() += 1;
        }
        stats
    }

    pub fn log(&self) {
        tracing::info!(total = self.total, "Dataset statistics");
        for (specialty, count) in &self.by_specialty {
            tracing::info!(%specialty, count, "Specialty distribution");
        }
        for (location, count) in &self.by_location {
            tracing::info!(%location, count, "Location distribution");
        }
    }
}
