//! 路由 - 业务能力层
//!
//! 根据指令文本选择唯一的评估器。路由是全函数：同样的指令总是得到同样的评估器，
//! 没有信号时回落到默认评估器

use phf::phf_set;

use crate::models::EvaluatorIdentity;

/// 命中任一关键词即路由到影响评估
pub static IMPACT_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "impact",
    "sensitivity",
    "sensitive",
    "social",
    "cultural",
    "representation",
    "diversity",
    "inclusion",
    "harmful",
    "offensive",
    "appropriate",
    "suitable",
    "concerns",
    "risks",
    "ethical",
};

/// 默认评估器
pub const DEFAULT_EVALUATOR: EvaluatorIdentity = EvaluatorIdentity::ScriptReviewer;

/// 选择评估器（不区分大小写的子串匹配）
pub fn route(prompt: Option<&str>) -> EvaluatorIdentity {
    let prompt_lower = match prompt {
        Some(p) if !p.trim().is_empty() => p.to_lowercase(),
        _ => return DEFAULT_EVALUATOR,
    };

    if IMPACT_KEYWORDS
        .iter()
        .any(|keyword| prompt_lower.contains(keyword))
    {
        EvaluatorIdentity::ImpactAgent
    } else {
        DEFAULT_EVALUATOR
    }
}

/// 返回指令中命中的关键词（用于日志）
pub fn matched_keywords(prompt: &str) -> Vec<&'static str> {
    let prompt_lower = prompt.to_lowercase();
    let mut matched: Vec<&'static str> = IMPACT_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| prompt_lower.contains(keyword))
        .collect();
    matched.sort_unstable();
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_default() {
        assert_eq!(route(Some("")), EvaluatorIdentity::ScriptReviewer);
        assert_eq!(route(None), EvaluatorIdentity::ScriptReviewer);
        assert_eq!(
            route(Some("write a scene about two friends")),
            EvaluatorIdentity::ScriptReviewer
        );
    }

    #[test]
    fn test_route_impact() {
        assert_eq!(
            route(Some("Evaluate the cultural impact and representation here")),
            EvaluatorIdentity::ImpactAgent
        );
        assert_eq!(
            route(Some("Is this SUITABLE for teens?")),
            EvaluatorIdentity::ImpactAgent
        );
    }

    #[test]
    fn test_route_deterministic() {
        let prompts = [
            "Assess social impact and representation concerns",
            "tighten the second act",
            "",
        ];
        for prompt in prompts {
            let first = route(Some(prompt));
            for _ in 0..10 {
                assert_eq!(route(Some(prompt)), first);
            }
        }
    }

    #[test]
    fn test_matched_keywords() {
        assert_eq!(
            matched_keywords("Assess social impact and representation concerns"),
            vec!["concerns", "impact", "representation", "social"]
        );
        assert!(matched_keywords("pacing notes").is_empty());
    }
}
