use crate::error::{AppResult, ConfigError};

/// 评分后端
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationBackend {
    /// 本地确定性启发式评分
    Heuristic,
    /// 调用兼容 OpenAI API 的 LLM 服务
    Llm,
}

impl EvaluationBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "heuristic" | "mock" => Some(Self::Heuristic),
            "llm" => Some(Self::Llm),
            _ => None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的提交数量
    pub max_concurrent_requests: usize,
    /// 提交文件（TOML）存放目录
    pub submission_folder: String,
    /// 评估结果输出文件（每行一个 JSON）
    pub output_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 评分后端
    pub evaluation_backend: EvaluationBackend,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 8,
            submission_folder: "submissions".to_string(),
            output_file: "evaluations.jsonl".to_string(),
            verbose_logging: false,
            evaluation_backend: EvaluationBackend::Heuristic,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_requests: std::env::var("MAX_CONCURRENT_REQUESTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_requests),
            submission_folder: std::env::var("SUBMISSION_FOLDER").unwrap_or(default.submission_folder),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            evaluation_backend: std::env::var("EVALUATION_BACKEND").ok().and_then(|v| EvaluationBackend::parse(&v)).unwrap_or(default.evaluation_backend),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::EnvVarParseFailed {
                var_name: "MAX_CONCURRENT_REQUESTS".to_string(),
                value: "0".to_string(),
                expected_type: "正整数".to_string(),
            }
            .into());
        }
        if self.evaluation_backend == EvaluationBackend::Llm && self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                var_name: "LLM_API_KEY".to_string(),
                reason: "EVALUATION_BACKEND=llm 时必须提供".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
