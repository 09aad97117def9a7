pub mod dataset;
pub mod generator;
pub mod inspect;
pub mod pipeline;

pub use dataset::DatasetStats;
pub use generator::generate_profiles;
pub use pipeline::{ingest_profiles, IngestError, IngestReport};
