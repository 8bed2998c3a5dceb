pub mod document_extractor;

pub use document_extractor::{DocumentExtractor, FileExtractor};
