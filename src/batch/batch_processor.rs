//! 批量提交处理器 - 批处理层
//!
//! 管理应用生命周期：加载提交、控制并发、写出结果、输出统计

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tracing::{error, warn};

use crate::batch::submission_processor::process_submission;
use crate::config::Config;
use crate::error::{AppError, FileError};
use crate::models::{load_all_toml_files, Submission, SubmissionRecord};
use crate::utils::logging::{
    log_batch_complete, log_batch_start, log_startup, log_submissions_loaded, print_final_stats,
};
use crate::workflow::Orchestrator;

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: Arc<Orchestrator>,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        let orchestrator = Arc::new(Orchestrator::from_config(&config));
        Self::with_orchestrator(config, orchestrator).await
    }

    /// 使用指定编排器初始化（测试或嵌入时使用）
    pub async fn with_orchestrator(config: Config, orchestrator: Arc<Orchestrator>) -> Result<Self> {
        init_output_file(&config.output_file).await?;
        log_startup(&config);
        Ok(Self {
            config,
            orchestrator,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let all_submissions = load_all_toml_files(&self.config.submission_folder)
            .await
            .context("加载提交失败")?;

        if all_submissions.is_empty() {
            warn!("⚠️ 没有找到待评估的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        let total = all_submissions.len();
        log_submissions_loaded(total, self.config.max_concurrent_requests);

        let stats = self.process_all(all_submissions).await?;

        print_final_stats(stats.success, stats.failed, stats.total, &self.config.output_file);

        Ok(stats)
    }

    /// 分批处理所有提交
    async fn process_all(
        &self,
        all_submissions: Vec<(PathBuf, Result<Submission>)>,
    ) -> Result<ProcessingStats> {
        let batch_size = self.config.max_concurrent_requests;
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = all_submissions.len();
        let total_batches = total.div_ceil(batch_size);
        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        let mut remaining = all_submissions.into_iter();
        for batch_num in 1..=total_batches {
            let batch: Vec<_> = remaining.by_ref().take(batch_size).collect();
            let batch_start = (batch_num - 1) * batch_size;
            let batch_end = batch_start + batch.len();

            log_batch_start(batch_num, total_batches, batch_start + 1, batch_end, total);

            let records = self.process_batch(batch, batch_start, semaphore.clone()).await?;
            let success = records.iter().filter(|r| r.is_success()).count();

            append_records(&self.config.output_file, &records).await?;

            stats.success += success;
            stats.failed += records.len() - success;

            log_batch_complete(batch_num, success, records.len());
        }

        Ok(stats)
    }

    /// 并发处理单个批次，结果按提交顺序返回
    async fn process_batch(
        &self,
        batch: Vec<(PathBuf, Result<Submission>)>,
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<Vec<SubmissionRecord>> {
        let mut handles = Vec::with_capacity(batch.len());

        for (idx, (path, loaded)) in batch.into_iter().enumerate() {
            let index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let orchestrator = self.orchestrator.clone();
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                process_submission(&orchestrator, &task_path, loaded, index).await
            });
            handles.push((index, path, handle));
        }

        let mut records = Vec::with_capacity(handles.len());
        for (index, path, handle) in handles {
            match handle.await {
                Ok(record) => records.push(record),
                Err(e) => {
                    error!("[提交 #{}] 任务执行失败: {}", index, e);
                    records.push(SubmissionRecord::new(
                        path.display().to_string(),
                        crate::models::ErrorResponse::new(format!("任务执行失败: {}", e)).into(),
                    ));
                }
            }
        }

        Ok(records)
    }
}

// ========== 输出文件 ==========

async fn init_output_file(path: &str) -> Result<(), AppError> {
    tokio::fs::write(path, b"")
        .await
        .map_err(|source| FileError::WriteFailed {
            path: path.to_string(),
            source,
        })?;
    Ok(())
}

async fn append_records(path: &str, records: &[SubmissionRecord]) -> Result<(), AppError> {
    let write_failed = |source| FileError::WriteFailed {
        path: path.to_string(),
        source,
    };

    let mut buffer = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(|e| {
            write_failed(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        buffer.push_str(&line);
        buffer.push('\n');
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(write_failed)?;
    file.write_all(buffer.as_bytes()).await.map_err(write_failed)?;
    file.flush().await.map_err(write_failed)?;
    Ok(())
}
