//! 文档提取器 - 基础设施层
//!
//! 只暴露"从上传文件中取出文本"的能力

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AppResult, ExtractionError};
use crate::models::{DocumentKind, UploadedDocument};

/// 文档提取能力
///
/// 实现方可能很慢（PDF 解析、远程服务），编排层每个文件只调用一次，不重试
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// 提取文档文本
    ///
    /// 不支持的类型返回 `UnsupportedFormat`，解析失败返回 `Extraction`
    async fn extract(&self, document: &UploadedDocument) -> AppResult<String>;
}

/// 基于文件扩展名的提取器：支持 `.txt` 与 `.pdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for FileExtractor {
    async fn extract(&self, document: &UploadedDocument) -> AppResult<String> {
        // 先检查类型，不支持的文件不进入解析
        let kind = document.kind()?;
        debug!(
            "提取文档: {} ({:?}, {} 字节)",
            document.filename,
            kind,
            document.bytes.len()
        );

        let text = match kind {
            DocumentKind::PlainText => decode_text(&document.bytes),
            DocumentKind::Pdf => extract_pdf(document).await?,
        };
        Ok(text.trim().to_string())
    }
}

/// UTF-8 解码，失败时按 Latin-1 逐字节解码
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

async fn extract_pdf(document: &UploadedDocument) -> AppResult<String> {
    let filename = document.filename.clone();
    let bytes = document.bytes.clone();

    let task_filename = filename.clone();
    let parsed = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractionError::Pdf {
            filename: task_filename,
            reason: e.to_string(),
        })
    })
    .await
    .map_err(|e| ExtractionError::TaskFailed {
        filename,
        reason: e.to_string(),
    })?;

    Ok(parsed?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_extract_plain_text() {
        let doc = UploadedDocument::new("scene.txt", "  INT. OFFICE - DAY.\n");
        let text = FileExtractor::new().extract(&doc).await.unwrap();
        assert_eq!(text, "INT. OFFICE - DAY.");
    }

    #[test]
    fn test_latin1_fallback() {
        // 0xE9 在 Latin-1 中是 'é'，单独出现不是合法 UTF-8
        let bytes = [b'c', b'a', b'f', 0xE9];
        assert_eq!(decode_text(&bytes), "café");
    }

    #[tokio::test]
    async fn test_unsupported_rejected_before_parsing() {
        let doc = UploadedDocument::new("script.docx", vec![0u8; 16]);
        let err = FileExtractor::new().extract(&doc).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_broken_pdf_surfaces_extraction_error() {
        let doc = UploadedDocument::new("broken.pdf", b"this is not a pdf".to_vec());
        let err = FileExtractor::new().extract(&doc).await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
