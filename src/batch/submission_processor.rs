//! 单个提交处理器 - 批处理层
//!
//! 读取提交引用的文件，交给编排器评估，把结果或错误包装成输出记录。
//! 单个提交失败不影响其它提交

use anyhow::Result;
use std::path::Path;
use tracing::error;

use crate::models::{read_submission_input, ErrorResponse, Submission, SubmissionOutcome, SubmissionRecord};
use crate::workflow::{EvaluationCtx, Orchestrator};

/// 处理单个提交
///
/// # 参数
/// - `orchestrator`: 评估编排器
/// - `path`: 提交文件路径
/// - `loaded`: 提交文件的解析结果
/// - `index`: 提交索引（用于日志）
///
/// # 返回
/// 返回输出记录（成功或失败都会产生一条记录）
pub async fn process_submission(
    orchestrator: &Orchestrator,
    path: &Path,
    loaded: Result<Submission>,
    index: usize,
) -> SubmissionRecord {
    let fallback_name = path.display().to_string();

    let submission = match loaded {
        Ok(submission) => submission,
        Err(e) => {
            error!("[提交 #{} {}] ❌ 无法加载提交文件: {:#}", index, fallback_name, e);
            return SubmissionRecord::new(
                fallback_name,
                ErrorResponse::new(format!("{:#}", e)).into(),
            );
        }
    };

    let name = submission.display_name();
    let ctx = EvaluationCtx::new(name.clone(), index);

    let input = match read_submission_input(&submission).await {
        Ok(input) => input,
        Err(e) => {
            error!("{} ❌ 读取引用文件失败: {}", ctx, e);
            return SubmissionRecord::new(name, ErrorResponse::from(&e).into());
        }
    };

    match orchestrator.handle_in(&ctx, input).await {
        Ok(result) => SubmissionRecord::new(name, SubmissionOutcome::Ok { result }),
        Err(e) => {
            error!("{} ❌ 评估失败 (HTTP {}): {}", ctx, e.status_code(), e);
            SubmissionRecord::new(name, ErrorResponse::from(&e).into())
        }
    }
}
