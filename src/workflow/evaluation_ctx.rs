//! 评估上下文
//!
//! 封装"我正在处理第几个提交"这一信息，只用于日志

use std::fmt::Display;

/// 评估上下文
#[derive(Debug, Clone)]
pub struct EvaluationCtx {
    /// 提交名称
    pub submission: String,

    /// 提交索引（从1开始，仅用于日志显示）
    pub index: usize,
}

impl EvaluationCtx {
    /// 创建新的评估上下文
    pub fn new(submission: impl Into<String>, index: usize) -> Self {
        Self {
            submission: submission.into(),
            index,
        }
    }

    /// 单次调用（非批量）时使用的上下文
    pub fn single() -> Self {
        Self::new("request", 1)
    }
}

impl Display for EvaluationCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[提交 #{} {}]", self.index, self.submission)
    }
}
