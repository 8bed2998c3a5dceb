//! 批处理层（应用外壳）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量提交处理器
//! - 管理应用生命周期（初始化、运行）
//! - 加载提交目录中的所有 TOML 文件
//! - 控制并发数量（Semaphore）
//! - 写出结果文件并输出统计信息
//!
//! ### `submission_processor` - 单个提交处理器
//! - 读取提交引用的文件
//! - 调用 `workflow::Orchestrator`
//! - 把结果或错误包装成输出记录
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Submission>)
//!     ↓
//! submission_processor (处理单个 Submission)
//!     ↓
//! workflow::Orchestrator (归一化 → 标准 → 路由 → 评估)
//!     ↓
//! services / agents / infrastructure
//! ```

pub mod batch_processor;
pub mod submission_processor;

pub use batch_processor::{App, ProcessingStats};
pub use submission_processor::process_submission;
