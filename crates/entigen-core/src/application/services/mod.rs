//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "extract an entity" or "generate a batch".

pub mod extraction_service;
pub mod generation_service;
pub mod output_writer;
pub mod render_service;

pub use extraction_service::ExtractionService;
pub use generation_service::{
    FailurePolicy, GenerationOptions, GenerationReport, GenerationService, ItemFailure, ItemKind,
};
pub use output_writer::{DEFAULT_OUTPUT_EXTENSION, OutputCategory, OutputWriter};
pub use render_service::RenderService;
