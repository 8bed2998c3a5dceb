//! 剧本评审评估器
//!
//! 评估叙事与创作技巧：结构、对白、节奏、原创性

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::{count_rubric_criteria, or_none_identified, Evaluator, ScoringBackend};
use crate::error::EvaluationError;
use crate::models::{DetailValue, Details, EvaluationResult, EvaluatorIdentity, Score};

const PERSONA: &str = "You are a senior script reviewer at a story studio. \
Judge narrative and creative craft: structure, dialogue, pacing, and originality. \
Ground every judgment in the rubric and report per-dimension notes, strengths, and concerns.";

const POSITIVE_CRAFT_WORDS: [&str; 5] = ["creative", "innovative", "compelling", "engaging", "unique"];
const NEGATIVE_CRAFT_WORDS: [&str; 4] = ["generic", "boring", "unclear", "confusing"];

static SCENE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:INT\./EXT|INT/EXT|I/E|INT|EXT)\.?\s").expect("scene heading pattern is valid")
});

/// 单独成行的大写角色名，可带 (V.O.) 之类的标注
static CHARACTER_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[A-Z][A-Z0-9 .'\-]{1,30}(?:\([A-Z. ]+\))?[ \t]*$").expect("character cue pattern is valid")
});

static QUOTED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"\n]{2,}""#).expect("quote pattern is valid"));

/// 剧本评审
pub struct ScriptReviewer {
    backend: ScoringBackend,
}

impl ScriptReviewer {
    pub fn new(backend: ScoringBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Evaluator for ScriptReviewer {
    fn identity(&self) -> EvaluatorIdentity {
        EvaluatorIdentity::ScriptReviewer
    }

    async fn evaluate(
        &self,
        content: &str,
        rubric: &str,
        prompt: Option<&str>,
    ) -> Result<EvaluationResult, EvaluationError> {
        match &self.backend {
            ScoringBackend::Heuristic => heuristic_review(content, rubric, prompt),
            ScoringBackend::Llm(llm) => {
                let verdict = llm.evaluate(self.identity(), PERSONA, content, rubric, prompt).await?;
                let score = verdict.checked_score()?;
                EvaluationResult::new(self.identity(), verdict.summary, score, verdict.details)
            }
        }
    }
}

/// 单个维度的评分与说明
struct Dimension {
    name: &'static str,
    score: f64,
    note: String,
}

/// 文本统计
struct ScriptStats {
    length: usize,
    scene_headings: usize,
    dialogue_markers: usize,
    avg_sentence_words: f64,
    positive_words: usize,
    negative_words: usize,
}

impl ScriptStats {
    fn collect(content: &str) -> Self {
        let lower = content.to_lowercase();

        let sentences: Vec<&str> = content
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let words = content.split_whitespace().count();
        let avg_sentence_words = if sentences.is_empty() {
            words as f64
        } else {
            words as f64 / sentences.len() as f64
        };

        let scene_headings = SCENE_HEADING.find_iter(content).count();
        let cues = CHARACTER_CUE
            .find_iter(content)
            .filter(|m| !SCENE_HEADING.is_match(m.as_str()))
            .count();

        Self {
            length: content.chars().count(),
            scene_headings,
            dialogue_markers: cues + QUOTED_LINE.find_iter(content).count(),
            avg_sentence_words,
            positive_words: POSITIVE_CRAFT_WORDS.iter().filter(|w| lower.contains(*w)).count(),
            negative_words: NEGATIVE_CRAFT_WORDS.iter().filter(|w| lower.contains(*w)).count(),
        }
    }
}

fn score_dimensions(stats: &ScriptStats) -> Vec<Dimension> {
    let structure = if stats.scene_headings == 0 {
        Dimension {
            name: "structure",
            score: 0.45,
            note: "No scene headings found; structure is hard to follow.".to_string(),
        }
    } else {
        Dimension {
            name: "structure",
            score: 0.6 + stats.scene_headings.min(5) as f64 * 0.06,
            note: format!("{} scene heading(s) give the piece a readable shape.", stats.scene_headings),
        }
    };

    let dialogue = if stats.dialogue_markers == 0 {
        Dimension {
            name: "dialogue",
            score: 0.5,
            note: "Dialogue is summarized rather than dramatized.".to_string(),
        }
    } else {
        Dimension {
            name: "dialogue",
            score: 0.6 + stats.dialogue_markers.min(10) as f64 * 0.03,
            note: format!("{} dialogue marker(s) found.", stats.dialogue_markers),
        }
    };

    let length_factor = (stats.length as f64 / 2000.0).min(1.0) * 0.3;
    let (rhythm, rhythm_note) = match stats.avg_sentence_words {
        w if w < 6.0 => (-0.05, "very short sentences read as clipped"),
        w if w <= 22.0 => (0.1, "sentence length keeps the read moving"),
        _ => (-0.1, "long sentences slow the read"),
    };
    let pacing = Dimension {
        name: "pacing",
        score: 0.5 + length_factor + rhythm,
        note: format!(
            "{} characters, {:.1} words per sentence; {}.",
            stats.length, stats.avg_sentence_words, rhythm_note
        ),
    };

    let originality = Dimension {
        name: "originality",
        score: 0.6 + stats.positive_words as f64 * 0.05 - stats.negative_words as f64 * 0.1,
        note: format!(
            "{} distinctive and {} generic craft signal(s).",
            stats.positive_words, stats.negative_words
        ),
    };

    vec![structure, dialogue, pacing, originality]
        .into_iter()
        .map(|d| Dimension {
            score: d.score.clamp(0.0, 1.0),
            ..d
        })
        .collect()
}

fn verdict_for(score: f64) -> &'static str {
    if score >= 0.7 {
        "Good fit"
    } else if score >= 0.5 {
        "Needs revision"
    } else {
        "Requires significant work"
    }
}

/// 启发式评审（确定性）
fn heuristic_review(
    content: &str,
    rubric: &str,
    prompt: Option<&str>,
) -> Result<EvaluationResult, EvaluationError> {
    let stats = ScriptStats::collect(content);
    let dimensions = score_dimensions(&stats);

    let mean = dimensions.iter().map(|d| d.score).sum::<f64>() / dimensions.len() as f64;
    let score = Score::new(mean.clamp(0.1, 0.95))?;
    let verdict = verdict_for(score.value());

    debug!(
        "剧本评审: 长度 {} | 场景 {} | 对白 {} | 分数 {}",
        stats.length, stats.scene_headings, stats.dialogue_markers, score
    );

    let strengths = dimensions
        .iter()
        .filter(|d| d.score >= 0.7)
        .map(|d| format!("{}: {}", d.name, d.note))
        .collect();
    let concerns = dimensions
        .iter()
        .filter(|d| d.score < 0.55)
        .map(|d| format!("{}: {}", d.name, d.note))
        .collect();

    let mut details = Details::new();
    details.insert("verdict".to_string(), verdict.into());
    for dimension in &dimensions {
        details.insert(dimension.name.to_string(), dimension.note.clone().into());
    }
    details.insert("strengths".to_string(), or_none_identified(strengths).into());
    details.insert("concerns".to_string(), or_none_identified(concerns).into());
    details.insert("content_length".to_string(), stats.length.into());
    details.insert(
        "rubric_criteria".to_string(),
        count_rubric_criteria(rubric).into(),
    );
    if let Some(focus) = prompt.map(str::trim).filter(|p| !p.is_empty()) {
        details.insert("requested_focus".to_string(), DetailValue::Text(focus.to_string()));
    }
    details.insert(
        "evaluation_notes".to_string(),
        "Heuristic craft review; switch EVALUATION_BACKEND to llm for model-backed judgments.".into(),
    );

    let summary = format!(
        "Script evaluation completed. Content length: {} characters. Overall assessment: {}.",
        stats.length,
        verdict.to_lowercase()
    );

    EvaluationResult::new(EvaluatorIdentity::ScriptReviewer, summary, score, details)
}
