use crate::error::{AppError, AppResult};
use crate::models::{EvaluationInput, Submission, UploadedDocument};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载提交
pub async fn load_toml_to_submission(toml_file_path: &Path) -> Result<Submission> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let mut submission: Submission = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    // 设置文件路径
    submission.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(submission)
}

/// 从文件夹中加载所有提交文件，按文件名排序
///
/// 解析失败的文件不会中断加载，而是作为 `Err` 返回给调用方统计
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<(PathBuf, Result<Submission>)>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut submissions = Vec::with_capacity(toml_files.len());
    for path in toml_files {
        tracing::debug!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        let loaded = load_toml_to_submission(&path).await;
        if let Err(e) = &loaded {
            tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
        }
        submissions.push((path, loaded));
    }

    Ok(submissions)
}

/// 把提交转换为评估输入，读取其中引用的文件
pub async fn read_submission_input(submission: &Submission) -> AppResult<EvaluationInput> {
    let base_dir = submission
        .file_path
        .as_deref()
        .and_then(|p| Path::new(p).parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let script_file = match &submission.script_file {
        Some(relative) => Some(read_document(&base_dir, relative).await?),
        None => None,
    };
    let rubric_file = match &submission.rubric_file {
        Some(relative) => Some(read_document(&base_dir, relative).await?),
        None => None,
    };

    Ok(EvaluationInput {
        text_input: submission.text_input.clone(),
        prompt: submission.prompt.clone(),
        script_file,
        rubric_file,
    })
}

async fn read_document(base_dir: &Path, relative: &str) -> AppResult<UploadedDocument> {
    let path = base_dir.join(relative);
    let bytes = fs::read(&path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| relative.to_string());
    Ok(UploadedDocument::new(filename, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_folder_sorted_with_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.toml"), "text_input = \"second\"").unwrap();
        std::fs::write(dir.path().join("a.toml"), "text_input = \"first\"").unwrap();
        std::fs::write(dir.path().join("broken.toml"), "text_input = ").unwrap();
        std::fs::write(dir.path().join("ignored.md"), "# not a submission").unwrap();

        let loaded = load_all_toml_files(dir.path().to_str().unwrap()).await.unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(
            loaded[0].1.as_ref().unwrap().text_input.as_deref(),
            Some("first")
        );
        assert_eq!(
            loaded[1].1.as_ref().unwrap().text_input.as_deref(),
            Some("second")
        );
        assert!(loaded[2].1.is_err());
    }

    #[tokio::test]
    async fn test_missing_folder() {
        assert!(load_all_toml_files("/definitely/not/here").await.is_err());
    }

    #[tokio::test]
    async fn test_relative_files_resolved_against_submission() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("rubrics")).unwrap();
        std::fs::write(dir.path().join("rubrics/pacing.txt"), "Focus on pacing").unwrap();
        let toml_path = dir.path().join("pilot.toml");
        std::fs::write(
            &toml_path,
            "text_input = \"INT. OFFICE - DAY.\"\nrubric_file = \"rubrics/pacing.txt\"\n",
        )
        .unwrap();

        let submission = load_toml_to_submission(&toml_path).await.unwrap();
        let input = read_submission_input(&submission).await.unwrap();
        let rubric = input.rubric_file.unwrap();
        assert_eq!(rubric.filename, "pacing.txt");
        assert_eq!(rubric.bytes, b"Focus on pacing");
        assert!(input.script_file.is_none());
    }

    #[tokio::test]
    async fn test_missing_referenced_file() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("pilot.toml");
        std::fs::write(&toml_path, "script_file = \"missing.txt\"\n").unwrap();

        let submission = load_toml_to_submission(&toml_path).await.unwrap();
        let err = read_submission_input(&submission).await.unwrap_err();
        assert!(matches!(err, AppError::File(_)));
    }
}
