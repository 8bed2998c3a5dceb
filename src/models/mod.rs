pub mod agent;
pub mod evaluation;
pub mod input;
pub mod loaders;
pub mod submission;

pub use agent::EvaluatorIdentity;
pub use evaluation::{DetailValue, Details, ErrorResponse, EvaluationRequest, EvaluationResult, Score};
pub use input::{DocumentKind, EvaluationInput, UploadedDocument};
pub use loaders::{load_all_toml_files, load_toml_to_submission, read_submission_input};
pub use submission::{Submission, SubmissionOutcome, SubmissionRecord};
