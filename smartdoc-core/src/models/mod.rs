pub mod doctor;
pub mod recommendation;
pub mod search;

pub use doctor::{DoctorMetadata, DoctorProfile};
pub use recommendation::{ExplanationSource, PatientQueryResponse, Recommendation, SearchMetadata};
pub use search::{ScoredRecord, SearchFilter, SearchResult, VectorRecord};
