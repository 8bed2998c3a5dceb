//! 评估请求与评估结果
//!
//! 无论哪个评估器运行，返回给调用方的都是同一个 `EvaluationResult` 结构

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::EvaluationError;
use crate::models::EvaluatorIdentity;

/// 单次评估请求（归一化之后）
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    /// 待评估内容，保证非空
    pub content: String,
    /// 评估标准，保证存在（未提供时为默认标准）
    pub rubric: String,
    /// 调用方的自由文本指令
    pub prompt: Option<String>,
}

/// 评估分数，范围 [0.0, 1.0]，保留两位小数
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    /// 创建分数，超出范围的有限值会被截断到 [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self, EvaluationError> {
        if !value.is_finite() {
            return Err(EvaluationError::InvalidScore { value });
        }
        let clamped = value.clamp(0.0, 1.0);
        Ok(Self((clamped * 100.0).round() / 100.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Score::new(value).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// 明细字段的值：文本、数值或文本列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        DetailValue::Text(value.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        DetailValue::Text(value)
    }
}

impl From<f64> for DetailValue {
    fn from(value: f64) -> Self {
        DetailValue::Number(value)
    }
}

impl From<usize> for DetailValue {
    fn from(value: usize) -> Self {
        DetailValue::Number(value as f64)
    }
}

impl From<Vec<String>> for DetailValue {
    fn from(value: Vec<String>) -> Self {
        DetailValue::List(value)
    }
}

/// 明细字段表（按字段名排序，输出稳定）
pub type Details = BTreeMap<String, DetailValue>;

/// 评估结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub agent_used: EvaluatorIdentity,
    pub summary: String,
    pub score: Score,
    pub details: Details,
}

impl EvaluationResult {
    /// 创建评估结果
    ///
    /// 明细为空的结果无法审计，直接拒绝
    pub fn new(
        agent_used: EvaluatorIdentity,
        summary: impl Into<String>,
        score: Score,
        details: Details,
    ) -> Result<Self, EvaluationError> {
        if details.is_empty() {
            return Err(EvaluationError::MissingDetails { agent: agent_used });
        }
        Ok(Self {
            agent_used,
            summary: summary.into(),
            score,
            details,
        })
    }

    /// 读取文本明细
    pub fn detail_text(&self, key: &str) -> Option<&str> {
        match self.details.get(key) {
            Some(DetailValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// 读取列表明细
    pub fn detail_list(&self, key: &str) -> Option<&[String]> {
        match self.details.get(key) {
            Some(DetailValue::List(items)) => Some(items),
            _ => None,
        }
    }
}

/// 失败时返回给调用方的结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl From<&crate::error::AppError> for ErrorResponse {
    fn from(err: &crate::error::AppError) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_clamps_and_rounds() {
        assert_eq!(Score::new(1.7).unwrap().value(), 1.0);
        assert_eq!(Score::new(-0.3).unwrap().value(), 0.0);
        assert_eq!(Score::new(0.456).unwrap().value(), 0.46);
    }

    #[test]
    fn test_score_rejects_non_finite() {
        assert!(Score::new(f64::NAN).is_err());
        assert!(Score::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_result_requires_details() {
        let score = Score::new(0.5).unwrap();
        let err = EvaluationResult::new(
            EvaluatorIdentity::ScriptReviewer,
            "摘要",
            score,
            Details::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EvaluationError::MissingDetails { .. }));
    }

    #[test]
    fn test_result_wire_shape() {
        let mut details = Details::new();
        details.insert("verdict".to_string(), "Good fit".into());
        details.insert("content_length".to_string(), 42usize.into());
        details.insert(
            "strengths".to_string(),
            vec!["clear structure".to_string()].into(),
        );

        let result = EvaluationResult::new(
            EvaluatorIdentity::ScriptReviewer,
            "Looks good.",
            Score::new(0.8).unwrap(),
            details,
        )
        .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["agent_used"], "script_reviewer");
        assert_eq!(json["score"], 0.8);
        assert_eq!(json["details"]["verdict"], "Good fit");
        assert_eq!(json["details"]["content_length"], 42.0);
        assert_eq!(json["details"]["strengths"][0], "clear structure");

        let parsed: EvaluationResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_score_deserialize_clamps() {
        let score: Score = serde_json::from_str("1.5").unwrap();
        assert_eq!(score.value(), 1.0);
    }
}
