use serde::{Deserialize, Serialize};

use crate::models::{ErrorResponse, EvaluationResult};

/// 提交文件（TOML）
///
/// ```toml
/// name = "Pilot draft"
/// text_input = "INT. OFFICE - DAY. Two colleagues argue about a merger."
/// prompt = "Assess social impact and representation concerns"
/// script_file = "scripts/pilot.pdf"
/// rubric_file = "rubrics/studio.txt"
/// ```
///
/// 文件路径相对于 TOML 文件所在目录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text_input: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub script_file: Option<String>,
    #[serde(default)]
    pub rubric_file: Option<String>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl Submission {
    /// 日志与输出中使用的名称，未设置时使用文件路径
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.file_path.clone())
            .unwrap_or_else(|| "<unnamed>".to_string())
    }
}

/// 输出文件中的一行
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    pub submission: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub outcome: SubmissionOutcome,
}

/// 单个提交的处理结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Ok { result: EvaluationResult },
    Error { detail: String },
}

impl From<ErrorResponse> for SubmissionOutcome {
    fn from(error: ErrorResponse) -> Self {
        SubmissionOutcome::Error {
            detail: error.detail,
        }
    }
}

impl SubmissionRecord {
    pub fn new(submission: impl Into<String>, outcome: SubmissionOutcome) -> Self {
        Self {
            submission: submission.into(),
            timestamp: chrono::Local::now().to_rfc3339(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Ok { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submission_toml() {
        let submission: Submission = toml::from_str(
            r#"
            name = "Pilot"
            text_input = "INT. OFFICE - DAY."
            rubric_file = "rubric.txt"
            "#,
        )
        .unwrap();
        assert_eq!(submission.display_name(), "Pilot");
        assert_eq!(submission.rubric_file.as_deref(), Some("rubric.txt"));
        assert!(submission.prompt.is_none());
        assert!(submission.file_path.is_none());
    }

    #[test]
    fn test_error_record_shape() {
        let record = SubmissionRecord::new(
            "empty.toml",
            ErrorResponse::new("无效输入").into(),
        );
        assert!(!record.is_success());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["submission"], "empty.toml");
        assert_eq!(json["status"], "error");
        assert_eq!(json["detail"], "无效输入");
    }
}
