//! 评估编排 - 流程层
//!
//! 核心职责：定义"一次评估"的完整流程
//!
//! 流程顺序：
//! 1. 提取内容文件与标准文件（并发，各一次）
//! 2. 内容归一化（失败直接返回，不进入评估）
//! 3. 解析评估标准
//! 4. 路由
//! 5. 调用评估器并校验结果

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::agents::EvaluatorSet;
use crate::config::Config;
use crate::error::{AppResult, EvaluationError};
use crate::infrastructure::{DocumentExtractor, FileExtractor};
use crate::models::{DetailValue, EvaluationInput, EvaluationRequest, EvaluationResult, UploadedDocument};
use crate::services::{normalize, resolve_rubric, route, router};
use crate::utils::logging::truncate_text;
use crate::workflow::evaluation_ctx::EvaluationCtx;

/// 评估编排器
///
/// - 不持有跨请求的可变状态，可在多个任务间共享
/// - 不做重试，协作方的失败原样返回
/// - 除调用评估器外没有副作用
#[derive(Clone)]
pub struct Orchestrator {
    extractor: Arc<dyn DocumentExtractor>,
    evaluators: EvaluatorSet,
}

impl Orchestrator {
    /// 创建新的编排器
    pub fn new(extractor: Arc<dyn DocumentExtractor>, evaluators: EvaluatorSet) -> Self {
        Self {
            extractor,
            evaluators,
        }
    }

    /// 按配置创建（文件提取器 + 配置指定的评分后端）
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(FileExtractor::new()), EvaluatorSet::from_config(config))
    }

    /// 处理一次评估请求
    pub async fn handle(&self, input: EvaluationInput) -> AppResult<EvaluationResult> {
        self.handle_in(&EvaluationCtx::single(), input).await
    }

    /// 在指定上下文中处理一次评估请求（上下文只影响日志）
    pub async fn handle_in(
        &self,
        ctx: &EvaluationCtx,
        input: EvaluationInput,
    ) -> AppResult<EvaluationResult> {
        // ========== 1. 提取文件 ==========
        // 并发提取；错误按 剧本文件 → 内容 → 标准文件 的顺序报告
        let (script_text, rubric_text) = futures::join!(
            self.extract_optional(ctx, input.script_file.as_ref()),
            self.extract_optional(ctx, input.rubric_file.as_ref()),
        );

        // ========== 2. 归一化内容 ==========
        let content = normalize(input.text_input.as_deref(), script_text?.as_deref())
            .inspect_err(|e| warn!("{} ⚠️ 拒绝请求: {}", ctx, e))?;

        // ========== 3. 解析评估标准 ==========
        let rubric = resolve_rubric(rubric_text?.as_deref());
        let rubric_label = rubric.source.label();

        let request = EvaluationRequest {
            content,
            rubric: rubric.text.into_owned(),
            prompt: input.prompt,
        };

        // ========== 4. 路由 ==========
        let identity = route(request.prompt.as_deref());
        info!(
            "{} 🧭 路由到 {} (内容 {} 字符, 标准: {})",
            ctx,
            identity,
            request.content.chars().count(),
            rubric_label
        );
        if let Some(prompt) = request.prompt.as_deref() {
            debug!(
                "{} 指令: {} | 命中关键词: {:?}",
                ctx,
                truncate_text(prompt, 80),
                router::matched_keywords(prompt)
            );
        }

        // ========== 5. 评估 ==========
        let evaluator = self.evaluators.get(identity);
        let mut result = evaluator
            .evaluate(&request.content, &request.rubric, request.prompt.as_deref())
            .await
            .inspect_err(|e| warn!("{} ❌ 评估失败: {}", ctx, e))?;

        if result.agent_used != identity {
            return Err(EvaluationError::IdentityMismatch {
                expected: identity,
                actual: result.agent_used,
            }
            .into());
        }

        result
            .details
            .entry("rubric_source".to_string())
            .or_insert(DetailValue::Text(rubric_label));

        info!("{} ✓ 评估完成: {} 分数 {}", ctx, identity, result.score);

        Ok(result)
    }

    /// 提取可选文件，未提供文件时返回 None
    async fn extract_optional(
        &self,
        ctx: &EvaluationCtx,
        document: Option<&UploadedDocument>,
    ) -> AppResult<Option<String>> {
        let Some(document) = document else {
            return Ok(None);
        };
        let text = self
            .extractor
            .extract(document)
            .await
            .inspect_err(|e| warn!("{} ⚠️ 文件 {} 提取失败: {}", ctx, document.filename, e))?;
        debug!("{} 📄 {} 提取到 {} 字符", ctx, document.filename, text.chars().count());
        Ok(Some(text))
    }
}
