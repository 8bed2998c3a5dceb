//! # Creative Eval
//!
//! 对剧本、笔记等创作内容进行结构化评估：摘要、分数（0.0 - 1.0）与明细
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 文档提取能力（TXT / PDF）
//!
//! ### ② 业务能力层（Services）
//! - `normalize` - 合并原始文本与文件文本
//! - `resolve_rubric` - 解析评估标准，缺省时使用默认标准
//! - `route` - 根据指令选择评估器
//! - `LlmService` - LLM 评分能力
//!
//! ### ③ 评估器层（Agents）
//! - `Evaluator` - 统一的评估契约
//! - `ScriptReviewer` / `ImpactAgent` - 两个评估器
//!
//! ### ④ 流程层（Workflow）
//! - `Orchestrator` - 一次评估的完整流程（归一化 → 标准 → 路由 → 评估）
//!
//! ### ⑤ 批处理层（Batch）
//! - `App` - 从目录加载提交、并发评估、写出结果
//!
//! 编排核心不持有跨请求状态，可以任意并发调用。

pub mod agents;
pub mod batch;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use agents::{Evaluator, EvaluatorSet, ImpactAgent, ScoringBackend, ScriptReviewer};
pub use batch::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{DocumentExtractor, FileExtractor};
pub use models::{EvaluationInput, EvaluationResult, EvaluatorIdentity, UploadedDocument};
pub use workflow::{EvaluationCtx, Orchestrator};
