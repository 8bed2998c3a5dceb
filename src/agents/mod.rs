//! 评估器层
//!
//! 所有评估器实现同一个 `Evaluator` 契约，编排层只按路由结果取用，不区分具体类型：
//! - `ScriptReviewer` - 叙事与创作技巧
//! - `ImpactAgent` - 社会/文化影响与敏感性

pub mod impact_agent;
pub mod script_reviewer;

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::config::{Config, EvaluationBackend};
use crate::error::EvaluationError;
use crate::models::{EvaluationResult, EvaluatorIdentity};
use crate::services::LlmService;

pub use impact_agent::ImpactAgent;
pub use script_reviewer::ScriptReviewer;

/// 评估器契约
///
/// - `content` 保证非空（由归一化保证）
/// - 返回的分数在 [0.0, 1.0] 内，明细至少有一个字段
/// - 相同输入下启发式评分结果相同
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// 评估器身份
    fn identity(&self) -> EvaluatorIdentity;

    /// 执行评估
    async fn evaluate(
        &self,
        content: &str,
        rubric: &str,
        prompt: Option<&str>,
    ) -> Result<EvaluationResult, EvaluationError>;
}

/// 评分后端
#[derive(Clone)]
pub enum ScoringBackend {
    /// 确定性启发式评分
    Heuristic,
    /// LLM 评分
    Llm(Arc<LlmService>),
}

impl ScoringBackend {
    pub fn from_config(config: &Config) -> Self {
        match config.evaluation_backend {
            EvaluationBackend::Heuristic => ScoringBackend::Heuristic,
            EvaluationBackend::Llm => ScoringBackend::Llm(Arc::new(LlmService::new(config))),
        }
    }
}

/// 评估器集合：每个身份恰好对应一个评估器
#[derive(Clone)]
pub struct EvaluatorSet {
    script_reviewer: Arc<dyn Evaluator>,
    impact_agent: Arc<dyn Evaluator>,
}

impl EvaluatorSet {
    /// 使用指定评分后端创建所有评估器
    pub fn new(backend: ScoringBackend) -> Self {
        Self {
            script_reviewer: Arc::new(ScriptReviewer::new(backend.clone())),
            impact_agent: Arc::new(ImpactAgent::new(backend)),
        }
    }

    pub fn heuristic() -> Self {
        Self::new(ScoringBackend::Heuristic)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ScoringBackend::from_config(config))
    }

    /// 替换与 `evaluator.identity()` 对应的评估器
    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        match evaluator.identity() {
            EvaluatorIdentity::ScriptReviewer => self.script_reviewer = evaluator,
            EvaluatorIdentity::ImpactAgent => self.impact_agent = evaluator,
        }
        self
    }

    pub fn get(&self, identity: EvaluatorIdentity) -> &Arc<dyn Evaluator> {
        match identity {
            EvaluatorIdentity::ScriptReviewer => &self.script_reviewer,
            EvaluatorIdentity::ImpactAgent => &self.impact_agent,
        }
    }
}

impl Default for EvaluatorSet {
    fn default() -> Self {
        Self::heuristic()
    }
}

static CRITERION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:[-*•]|\d+[.)])\s+\S").expect("criterion pattern is valid")
});

/// 统计评估标准中的条目数（列表项）
///
/// 自由文本形式的标准视为一条
pub(crate) fn count_rubric_criteria(rubric: &str) -> usize {
    let count = CRITERION_LINE.find_iter(rubric).count();
    if count == 0 && !rubric.trim().is_empty() {
        1
    } else {
        count
    }
}

/// 把非空列表原样返回，空列表换成占位说明
pub(crate) fn or_none_identified(items: Vec<String>) -> Vec<String> {
    if items.is_empty() {
        vec!["None identified".to_string()]
    } else {
        items
    }
}
