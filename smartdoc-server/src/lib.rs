pub mod bootstrap;
pub mod http;
pub mod rag;

pub use rag::RagService;
