use serde::{Deserialize, Serialize};

use super::doctor::{DoctorMetadata, DoctorProfile};

/// A stored embedding plus the metadata and text it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub metadata: DoctorMetadata,
    pub document: String,
}

impl VectorRecord {
    pub fn from_profile(profile: &DoctorProfile, embedding: Vec<f32>) -> Self {
        Self {
            id: profile.doctor_id.clone(),
            embedding,
            metadata: profile.metadata(),
            document: profile.embedding_text(),
        }
    }
}

/// Exact-match metadata filter. Blank strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub location: Option<String>,
    pub specialty: Option<String>,
}

impl SearchFilter {
    pub fn new(location: Option<String>, specialty: Option<String>) -> Self {
        Self {
            location: non_blank(location),
            specialty: non_blank(specialty),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.specialty.is_none()
    }

    pub fn matches(&self, metadata: &DoctorMetadata) -> bool {
        let location_ok = self
            .location
            .as_deref()
            .map_or(true, |l| metadata.location == l);
        let specialty_ok = self
            .specialty
            .as_deref()
            .map_or(true, |s| metadata.primary_specialty == s);
        location_ok && specialty_ok
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Raw k-NN hit as returned by a vector store.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub id: String,
    pub metadata: DoctorMetadata,
    pub document: String,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub doctor: DoctorMetadata,
    pub similarity_score: f64,
    pub distance: f64,
}

impl From<ScoredRecord> for SearchResult {
    /// A non-finite distance (pgvector returns NaN for a zero vector) is
    /// read as orthogonal, matching the in-memory store.
    fn from(record: ScoredRecord) -> Self {
        let distance = if record.distance.is_finite() {
            record.distance
        } else {
            1.0
        };
        Self {
            doctor: record.metadata,
            similarity_score: 1.0 - distance,
            distance,
        }
    }
}
