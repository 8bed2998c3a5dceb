//! 评估标准解析 - 业务能力层
//!
//! 调用方提供了标准就原样使用，否则回落到内置的默认标准

use std::borrow::Cow;

/// 默认标准版本
pub const DEFAULT_RUBRIC_VERSION: &str = "2024.1";

/// 默认评估标准
///
/// 分为两部分：叙事与创作技巧、社会影响与敏感性，对应两个评估器
pub const DEFAULT_RUBRIC: &str = "\
Creative Evaluation Standard (v2024.1)

The studio merges arts, technology, and social impact to unite and inspire audiences \
through entertaining and transformative storytelling. Each project is judged on its craft \
and on the change it can motivate in the real world.

Part A - Narrative and Craft
- Does the story have a clear structure with a setup, escalation, and resolution?
- Is the dialogue distinct, purposeful, and true to each character?
- Is the pacing controlled, with scenes that earn their length?
- Is the premise original, and does the voice feel specific rather than generic?
- Does the story uplift and inspire, and does it align with the Heroine's Journey?
- Is the story commercially viable? (not a deciding factor alone)

Part B - Social Impact and Sensitivity
- Does the story have a positive message and address a critical problem worth solving?
- Is there potential for measurable impact, such as partnerships or community engagement?
- Are people and communities represented with accuracy, depth, and dignity?
- Are sensitive topics (violence, abuse, discrimination) handled without sensationalism?
- Could any element cause unintended harm, and how could it be mitigated?
- Do the author(s) align with the studio's mission of actionable hope?";

/// 标准来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RubricSource {
    /// 内置默认标准
    Default { version: &'static str },
    /// 调用方提供
    Supplied,
}

impl RubricSource {
    /// 写入评估明细的标签
    pub fn label(self) -> String {
        match self {
            RubricSource::Default { version } => format!("default@{}", version),
            RubricSource::Supplied => "supplied".to_string(),
        }
    }
}

/// 解析后的评估标准
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRubric {
    pub text: Cow<'static, str>,
    pub source: RubricSource,
}

impl ResolvedRubric {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_default(&self) -> bool {
        matches!(self.source, RubricSource::Default { .. })
    }
}

/// 解析评估标准
///
/// 去除空白后非空则原样返回，否则返回默认标准；不会失败
pub fn resolve_rubric(extracted_rubric: Option<&str>) -> ResolvedRubric {
    match extracted_rubric {
        Some(text) if !text.trim().is_empty() => ResolvedRubric {
            text: Cow::Owned(text.to_string()),
            source: RubricSource::Supplied,
        },
        _ => ResolvedRubric {
            text: Cow::Borrowed(DEFAULT_RUBRIC),
            source: RubricSource::Default {
                version: DEFAULT_RUBRIC_VERSION,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_back_to_default() {
        let first = resolve_rubric(Some(""));
        let second = resolve_rubric(None);
        let third = resolve_rubric(Some("   \n"));

        assert!(!first.as_str().is_empty());
        assert_eq!(first.as_str(), DEFAULT_RUBRIC);
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert!(first.is_default());
        assert_eq!(first.source.label(), "default@2024.1");
    }

    #[test]
    fn test_supplied_rubric_verbatim() {
        let rubric = resolve_rubric(Some("Focus on pacing"));
        assert_eq!(rubric.as_str(), "Focus on pacing");
        assert_eq!(rubric.source, RubricSource::Supplied);
        assert!(!rubric.is_default());
    }

    #[test]
    fn test_default_covers_both_axes() {
        assert!(DEFAULT_RUBRIC.contains("Narrative and Craft"));
        assert!(DEFAULT_RUBRIC.contains("Social Impact and Sensitivity"));
    }
}
