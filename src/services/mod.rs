pub mod content_normalizer;
pub mod llm_service;
pub mod router;
pub mod rubric_resolver;

pub use content_normalizer::normalize;
pub use llm_service::{LlmService, LlmVerdict};
pub use router::route;
pub use rubric_resolver::{resolve_rubric, ResolvedRubric, RubricSource, DEFAULT_RUBRIC};
