use thiserror::Error;

use crate::models::EvaluatorIdentity;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 归一化后没有可评估的内容
    #[error("无效输入: {reason}")]
    InvalidInput { reason: String },
    /// 文件类型不在支持范围内（在提取之前拒绝）
    #[error("不支持的文件类型: {extension}，仅支持 PDF 和 TXT")]
    UnsupportedFormat { filename: String, extension: String },
    /// 文档提取错误
    #[error("文档提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 评估器内部错误
    #[error("评估错误: {0}")]
    Evaluation(#[from] EvaluationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 文档提取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// PDF 解析失败
    #[error("无法读取 PDF ({filename}): {reason}")]
    Pdf { filename: String, reason: String },
    /// 提取任务异常终止
    #[error("提取任务失败 ({filename}): {reason}")]
    TaskFailed { filename: String, reason: String },
}

/// 评估器错误
///
/// 任何评估失败都必须以错误形式返回，不能伪造分数
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// 评估结果缺少明细字段
    #[error("评估结果缺少明细字段 (评估器: {agent})")]
    MissingDetails { agent: EvaluatorIdentity },
    /// 分数不是有限数值
    #[error("评估分数无效: {value}")]
    InvalidScore { value: f64 },
    /// 评估器返回的身份与路由结果不一致
    #[error("评估器身份不一致: 期望 {expected}，实际 {actual}")]
    IdentityMismatch {
        expected: EvaluatorIdentity,
        actual: EvaluatorIdentity,
    },
    /// LLM 返回内容无法解析
    #[error("无法解析 LLM 返回的评估结果 (响应: {response}): {reason}")]
    MalformedResponse { response: String, reason: String },
    /// LLM 调用失败
    #[error("LLM API调用失败 (模型: {model}): {reason}")]
    Llm { model: String, reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量取值无效
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 必需的配置缺失
    #[error("缺少配置项 {var_name}: {reason}")]
    Missing { var_name: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建无效输入错误
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        AppError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// 创建不支持的文件类型错误
    pub fn unsupported_format(filename: impl Into<String>, extension: impl Into<String>) -> Self {
        AppError::UnsupportedFormat {
            filename: filename.into(),
            extension: extension.into(),
        }
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 对应的 HTTP 状态码（供传输层使用）
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput { .. }
            | AppError::UnsupportedFormat { .. }
            | AppError::Extraction(_) => 400,
            AppError::Evaluation(_) | AppError::Config(_) | AppError::File(_) => 500,
        }
    }

    /// 是否属于调用方输入问题
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(AppError::invalid_input("空内容").status_code(), 400);
        assert_eq!(
            AppError::unsupported_format("notes.docx", "docx").status_code(),
            400
        );
        let extraction = AppError::from(ExtractionError::Pdf {
            filename: "a.pdf".to_string(),
            reason: "broken xref".to_string(),
        });
        assert!(extraction.is_client_error());

        let evaluation = AppError::from(EvaluationError::InvalidScore { value: f64::NAN });
        assert_eq!(evaluation.status_code(), 500);
        assert!(!evaluation.is_client_error());
    }

    #[test]
    fn test_display_keeps_source_message() {
        let err = AppError::from(ExtractionError::Pdf {
            filename: "pilot.pdf".to_string(),
            reason: "invalid header".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.contains("pilot.pdf"));
        assert!(msg.contains("invalid header"));
    }
}
