//! 影响评估器
//!
//! 评估社会/文化影响与敏感性：代表性、潜在伤害、文化准确性

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::{count_rubric_criteria, or_none_identified, Evaluator, ScoringBackend};
use crate::error::EvaluationError;
use crate::models::{Details, EvaluationResult, EvaluatorIdentity, Score};

const PERSONA: &str = "You are a social impact and sensitivity reviewer at a story studio. \
Judge representation, potential harm, and cultural accuracy against the rubric. \
Report flagged concerns together with concrete mitigations.";

/// 敏感主题：名称、匹配模式、关注点、缓解建议
struct SensitiveTopic {
    name: &'static str,
    pattern: &'static str,
    concern: &'static str,
    mitigation: &'static str,
}

const SENSITIVE_TOPICS: [SensitiveTopic; 3] = [
    SensitiveTopic {
        name: "violence",
        pattern: r"(?i)\b(?:violen\w*|fight\w*|attack\w*|wars?|warfare|wartime)\b",
        concern: "Depictions of violence may read as gratuitous without narrative consequence.",
        mitigation: "Show the cost of violence on characters and add a content warning.",
    },
    SensitiveTopic {
        name: "discrimination",
        pattern: r"(?i)\b(?:discriminat\w*|prejudic\w*|bias\w*|stereotyp\w*)",
        concern: "Portrayals of discrimination risk reinforcing the stereotypes they depict.",
        mitigation: "Give affected characters agency and consult members of the depicted community.",
    },
    SensitiveTopic {
        name: "sensitive_content",
        pattern: r"(?i)\b(?:trauma\w*|abus\w*|harass\w*|exploit\w*)",
        concern: "Trauma and abuse content can harm audiences with lived experience.",
        mitigation: "Run a sensitivity read and link support resources alongside the release.",
    },
];

static TOPIC_MATCHERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SENSITIVE_TOPICS
        .iter()
        .map(|topic| Regex::new(topic.pattern).expect("topic pattern is valid"))
        .collect()
});

/// 正面指标：名称与匹配模式（按名称排序）
const POSITIVE_INDICATORS: [(&str, &str); 5] = [
    ("awareness", r"(?i)\bawareness\b"),
    ("diversity", r"(?i)\bdivers(?:e|ity|ities)\b"),
    ("empowerment", r"(?i)\bempower\w*"),
    ("inclusion", r"(?i)\binclusi(?:on|ons|ve|vity)\b"),
    ("representation", r"(?i)\brepresentations?\b"),
];

static INDICATOR_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    POSITIVE_INDICATORS
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).expect("indicator pattern is valid")))
        .collect()
});

/// 影响评估
pub struct ImpactAgent {
    backend: ScoringBackend,
}

impl ImpactAgent {
    pub fn new(backend: ScoringBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Evaluator for ImpactAgent {
    fn identity(&self) -> EvaluatorIdentity {
        EvaluatorIdentity::ImpactAgent
    }

    async fn evaluate(
        &self,
        content: &str,
        rubric: &str,
        prompt: Option<&str>,
    ) -> Result<EvaluationResult, EvaluationError> {
        match &self.backend {
            ScoringBackend::Heuristic => heuristic_impact(content, rubric),
            ScoringBackend::Llm(llm) => {
                let verdict = llm.evaluate(self.identity(), PERSONA, content, rubric, prompt).await?;
                let score = verdict.checked_score()?;
                EvaluationResult::new(self.identity(), verdict.summary, score, verdict.details)
            }
        }
    }
}

fn impact_level(score: f64) -> &'static str {
    if score >= 0.7 {
        "Positive"
    } else if score >= 0.5 {
        "Mixed"
    } else {
        "Needs Review"
    }
}

/// 启发式影响评估（确定性）
///
/// 分数越高代表正面影响越大、顾虑越少
fn heuristic_impact(content: &str, rubric: &str) -> Result<EvaluationResult, EvaluationError> {
    let detected: Vec<&SensitiveTopic> = SENSITIVE_TOPICS
        .iter()
        .zip(TOPIC_MATCHERS.iter())
        .filter(|(_, matcher)| matcher.is_match(content))
        .map(|(topic, _)| topic)
        .collect();

    let indicators: Vec<String> = INDICATOR_MATCHERS
        .iter()
        .filter(|(_, matcher)| matcher.is_match(content))
        .map(|(name, _)| name.to_string())
        .collect();

    let mut raw = 0.7;
    if !detected.is_empty() {
        raw = (raw - 0.2 * detected.len() as f64).max(0.2);
    }
    raw = (raw + indicators.len() as f64 * 0.05).min(0.95);

    let score = Score::new(raw)?;
    let level = impact_level(score.value());

    debug!(
        "影响评估: 敏感主题 {} 个 | 正面指标 {} 个 | 分数 {}",
        detected.len(),
        indicators.len(),
        score
    );

    let topic_names: Vec<String> = detected.iter().map(|t| t.name.to_string()).collect();
    let concerns: Vec<String> = detected.iter().map(|t| t.concern.to_string()).collect();
    let mitigations: Vec<String> = if detected.is_empty() {
        vec!["Continue the current approach; add content notes if scenes intensify.".to_string()]
    } else {
        detected.iter().map(|t| t.mitigation.to_string()).collect()
    };

    let mut details = Details::new();
    details.insert("impact_level".to_string(), level.into());
    details.insert(
        "detected_topics".to_string(),
        if topic_names.is_empty() {
            vec!["None detected".to_string()].into()
        } else {
            topic_names.into()
        },
    );
    details.insert("positive_indicators".to_string(), or_none_identified(indicators).into());
    details.insert("concerns".to_string(), or_none_identified(concerns).into());
    details.insert("mitigations".to_string(), mitigations.into());
    details.insert(
        "rubric_criteria".to_string(),
        count_rubric_criteria(rubric).into(),
    );
    details.insert(
        "evaluation_notes".to_string(),
        "Heuristic impact screen; switch EVALUATION_BACKEND to llm for model-backed judgments.".into(),
    );

    let summary = format!(
        "Impact evaluation completed. Detected {} sensitive topic categories. Impact level: {}.",
        detected.len(),
        level.to_lowercase()
    );

    EvaluationResult::new(EvaluatorIdentity::ImpactAgent, summary, score, details)
}
