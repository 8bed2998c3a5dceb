pub mod evaluation_ctx;
pub mod orchestrator;

pub use evaluation_ctx::EvaluationCtx;
pub use orchestrator::Orchestrator;
