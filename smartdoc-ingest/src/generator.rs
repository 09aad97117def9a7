//! Synthetic doctor corpus.
//!
//! Every profile is drawn independently from the catalog tables. Seeding the
//! generator makes the whole corpus reproducible, which the ingestion tests
//! and `smartdoc-ingest generate --seed` rely on.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use smartdoc_core::catalog::{
    EXPERTISE_STATEMENTS, FIRST_NAMES, HOSPITALS_BY_LOCATION, LANGUAGE_SETS, LAST_NAMES,
    SPECIALTIES, SURGERY_SUMMARIES,
};
use smartdoc_core::DoctorProfile;

pub const MIN_YEARS: u32 = 5;
pub const MAX_YEARS: u32 = 35;

/// Mid-career heavy weighting: ramps up to a plateau at 10..=20, tapers to 30.
fn experience_weight(years: u32) -> u32 {
    match years {
        y if y < 10 => y - 4,
        y if y <= 20 => 6,
        y if y <= 30 => 36 - y,
        _ => 1,
    }
}

pub struct DoctorGenerator {
    rng: StdRng,
    /// `(years, cumulative weight)` pairs.
    years: Vec<(u32, u32)>,
}

impl DoctorGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let years = (MIN_YEARS..=MAX_YEARS)
            .scan(0, |total, y| {
                *total += experience_weight(y);
                Some((y, *total))
            })
            .collect();
        Self { rng, years }
    }

    fn years_of_experience(&mut self) -> u32 {
        let total = self.years.last().map_or(1, |(_, w)| *w);
        let roll = self.rng.gen_range(0..total);
        self.years
            .iter()
            .find(|(_, cumulative)| roll < *cumulative)
            .map_or(MAX_YEARS, |(y, _)| *y)
    }

    /// Profile number `index` (1-based), rendered as `DOC-00001`.
    pub fn profile(&mut self, index: usize) -> DoctorProfile {
        let years_of_experience = self.years_of_experience();
        let rng = &mut self.rng;

        let first = *pick(rng, FIRST_NAMES);
        let last = *pick(rng, LAST_NAMES);

        let (specialty, subs) = *pick(rng, SPECIALTIES);
        let sub_specialty = *pick(rng, subs);

        let (location, hospitals) = *pick(rng, HOSPITALS_BY_LOCATION);
        let hospital = *pick(rng, hospitals);

        let languages = *pick(rng, LANGUAGE_SETS);

        let surgery = lookup(SURGERY_SUMMARIES, specialty)
            .map(|s| *pick(rng, s))
            .unwrap_or("treated a broad range of patients");
        let expertise = lookup(EXPERTISE_STATEMENTS, specialty)
            .map(|s| *pick(rng, s))
            .unwrap_or_default();

        DoctorProfile {
            doctor_id: format!("DOC-{index:05}"),
            name: format!("Dr. {first} {last}"),
            primary_specialty: specialty.to_string(),
            sub_specialty: sub_specialty.to_string(),
            location: location.to_string(),
            hospital_affiliation: hospital.to_string(),
            years_of_experience,
            language_fluency: languages.iter().map(|l| l.to_string()).collect(),
            critical_surgeries_summary: format!(
                "Dr. {last} has {surgery}. Maintains active involvement in clinical research \
                 and medical education, mentoring residents and fellows in advanced {} techniques.",
                sub_specialty.to_lowercase()
            ),
            special_interests_and_expertise: expertise.to_string(),
        }
    }
}

/// Uniform choice; catalog tables are non-empty constants.
fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn lookup(
    table: &'static [(&'static str, &'static [&'static str])],
    key: &str,
) -> Option<&'static [&'static str]> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Generate `count` profiles with ids `DOC-00001..`.
pub fn generate_profiles(count: usize, seed: Option<u64>) -> Vec<DoctorProfile> {
    let mut generator = DoctorGenerator::new(seed);
    let mut profiles = Vec::with_capacity(count);
    for index in 1..=count {
        profiles.push(generator.profile(index));
        if index % 1000 == 0 {
            tracing::debug!(generated = index, total = count, "Generating profiles");
        }
    }
    profiles
}
