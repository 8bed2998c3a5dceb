//! 内容归一化 - 业务能力层
//!
//! 把粘贴的原始文本与文件提取的文本合并为一个可评估的字符串

use crate::error::{AppError, AppResult};

/// 原始文本与文件文本之间的分隔
pub const CONTENT_SEPARATOR: &str = "\n\n";

/// 合并原始文本与文件文本
///
/// 两者都提供时按"原始文本在前、文件文本在后"拼接，不丢弃任何非空输入；
/// 两者去除空白后都为空则返回 `InvalidInput`
pub fn normalize(raw_text: Option<&str>, extracted_text: Option<&str>) -> AppResult<String> {
    let parts: Vec<&str> = [raw_text, extracted_text]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        return Err(AppError::invalid_input(
            "no content provided: supply text_input or a script_file",
        ));
    }

    Ok(parts.join(CONTENT_SEPARATOR))
}
