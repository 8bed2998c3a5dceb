//! LLM 服务 - 业务能力层
//!
//! 只负责"LLM 评估"能力，不关心路由与流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::EvaluationError;
use crate::models::{Details, EvaluatorIdentity, Score};
use crate::utils::logging::truncate_text;

/// LLM 返回的评估结论
#[derive(Debug, Clone, Deserialize)]
pub struct LlmVerdict {
    pub summary: String,
    pub score: f64,
    #[serde(default)]
    pub details: Details,
}

impl LlmVerdict {
    /// 校验分数并返回 `Score`
    pub fn checked_score(&self) -> Result<Score, EvaluationError> {
        if self.score.is_finite() && !(0.0..=1.0).contains(&self.score) {
            warn!("LLM 返回的分数 {} 超出范围 [0, 1]，已截断", self.score);
        }
        Score::new(self.score)
    }
}

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 按评估标准给内容打分
/// - 提供通用的 LLM 调用接口
/// - 不做路由，不做重试
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(1024u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }

    /// 按评估标准评估内容
    ///
    /// `persona` 是评估器的系统提示词，决定评估视角
    pub async fn evaluate(
        &self,
        agent: EvaluatorIdentity,
        persona: &str,
        content: &str,
        rubric: &str,
        prompt: Option<&str>,
    ) -> Result<LlmVerdict, EvaluationError> {
        let user_message = build_evaluation_message(content, rubric, prompt);

        let response = self
            .send_to_llm(&user_message, Some(persona))
            .await
            .map_err(|e| EvaluationError::Llm {
                model: self.model_name.clone(),
                reason: e.to_string(),
            })?;

        parse_verdict(agent, &response)
    }
}

/// 构建评估用的用户消息
fn build_evaluation_message(content: &str, rubric: &str, prompt: Option<&str>) -> String {
    let instruction = prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("No additional instruction.");

    format!(
        r#"Evaluate the submission below against the rubric.

RUBRIC:
{rubric}

INSTRUCTION FROM THE REQUESTER:
{instruction}

SUBMISSION:
{content}

Respond with a single JSON object and nothing else:
{{"summary": "<one paragraph>", "score": <number between 0.0 and 1.0>, "details": {{"<field>": "<text>" | <number> | ["<text>", ...]}}}}
The details object must contain at least one field that justifies the score."#
    )
}

/// 解析 LLM 返回的评估结论
///
/// 允许外层包裹 Markdown 代码块；无法解析或明细为空时返回错误，不伪造分数
pub fn parse_verdict(agent: EvaluatorIdentity, response: &str) -> Result<LlmVerdict, EvaluationError> {
    let body = strip_code_fence(response);

    let verdict: LlmVerdict =
        serde_json::from_str(body).map_err(|e| EvaluationError::MalformedResponse {
            response: truncate_text(response, 200),
            reason: e.to_string(),
        })?;

    if verdict.details.is_empty() {
        return Err(EvaluationError::MissingDetails { agent });
    }

    Ok(verdict)
}

fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过语言标记（如 ```json）
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DetailValue;

    #[test]
    fn test_parse_plain_json() {
        let verdict = parse_verdict(
            EvaluatorIdentity::ScriptReviewer,
            r#"{"summary": "Tight scene.", "score": 0.72, "details": {"pacing": "brisk", "strengths": ["voice"]}}"#,
        )
        .unwrap();
        assert_eq!(verdict.summary, "Tight scene.");
        assert_eq!(verdict.checked_score().unwrap().value(), 0.72);
        assert_eq!(
            verdict.details.get("strengths"),
            Some(&DetailValue::List(vec!["voice".to_string()]))
        );
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "```json\n{\"summary\": \"ok\", \"score\": 0.5, \"details\": {\"notes\": \"fine\"}}\n```";
        let verdict = parse_verdict(EvaluatorIdentity::ScriptReviewer, response).unwrap();
        assert_eq!(verdict.summary, "ok");
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let verdict = parse_verdict(
            EvaluatorIdentity::ScriptReviewer,
            r#"{"summary": "great", "score": 7, "details": {"notes": "scored out of ten"}}"#,
        )
        .unwrap();
        assert_eq!(verdict.checked_score().unwrap().value(), 1.0);
    }

    #[test]
    fn test_rejects_malformed_response() {
        let agent = EvaluatorIdentity::ScriptReviewer;
        let err = parse_verdict(agent, "I think it deserves a 7/10").unwrap_err();
        assert!(matches!(err, EvaluationError::MalformedResponse { .. }));

        let err = parse_verdict(agent, r#"{"summary": "no score", "details": {"a": "b"}}"#).unwrap_err();
        assert!(matches!(err, EvaluationError::MalformedResponse { .. }));
    }

    #[test]
    fn test_rejects_empty_details() {
        let err = parse_verdict(
            EvaluatorIdentity::ImpactAgent,
            r#"{"summary": "bare", "score": 0.4, "details": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::MissingDetails {
                agent: EvaluatorIdentity::ImpactAgent
            }
        ));
    }

    #[test]
    fn test_evaluation_message_contains_inputs() {
        let message = build_evaluation_message("INT. OFFICE", "Focus on pacing", None);
        assert!(message.contains("INT. OFFICE"));
        assert!(message.contains("Focus on pacing"));
        assert!(message.contains("No additional instruction."));
    }

    /// 测试真实 LLM 评估
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_live_evaluation -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_evaluation() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = LlmService::new(&Config::from_env());
        let verdict = service
            .evaluate(
                EvaluatorIdentity::ScriptReviewer,
                "You are a script reviewer.",
                "INT. OFFICE - DAY. Two colleagues argue about a merger.",
                "Focus on pacing",
                None,
            )
            .await
            .expect("LLM 评估失败");

        println!("{:#?}", verdict);
        assert!(verdict.checked_score().is_ok());
    }
}
