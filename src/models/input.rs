//! 调用方提交的原始输入

use std::path::Path;

use crate::error::{AppError, AppResult};

/// 上传的文档（文件名 + 原始字节）
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// 根据扩展名判断文档类型
    pub fn kind(&self) -> AppResult<DocumentKind> {
        DocumentKind::from_filename(&self.filename)
    }
}

/// 支持的文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// 从文件名解析（扩展名不区分大小写）
    pub fn from_filename(filename: &str) -> AppResult<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" => Ok(DocumentKind::PlainText),
            _ => Err(AppError::unsupported_format(filename, extension)),
        }
    }
}

/// 一次评估的全部输入
///
/// 原始文本、内容文件、评估标准文件、指令均为可选，
/// 但原始文本与内容文件至少要有一个提供非空内容
#[derive(Debug, Clone, Default)]
pub struct EvaluationInput {
    pub text_input: Option<String>,
    pub prompt: Option<String>,
    pub script_file: Option<UploadedDocument>,
    pub rubric_file: Option<UploadedDocument>,
}

impl EvaluationInput {
    /// 只包含原始文本的输入
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text_input: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_script_file(mut self, document: UploadedDocument) -> Self {
        self.script_file = Some(document);
        self
    }

    pub fn with_rubric_file(mut self, document: UploadedDocument) -> Self {
        self.rubric_file = Some(document);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_from_filename() {
        assert_eq!(DocumentKind::from_filename("pilot.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::from_filename("notes.txt").unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = DocumentKind::from_filename("script.docx").unwrap_err();
        assert!(matches!(
            err,
            AppError::UnsupportedFormat { ref extension, .. } if extension == "docx"
        ));

        let err = DocumentKind::from_filename("no_extension").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_input_builder() {
        let input = EvaluationInput::from_text("INT. OFFICE - DAY.")
            .with_prompt("check pacing")
            .with_rubric_file(UploadedDocument::new("rubric.txt", "Focus on pacing"));
        assert_eq!(input.text_input.as_deref(), Some("INT. OFFICE - DAY."));
        assert_eq!(input.prompt.as_deref(), Some("check pacing"));
        assert!(input.script_file.is_none());
        assert_eq!(input.rubric_file.unwrap().filename, "rubric.txt");
    }
}
