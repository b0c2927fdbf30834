//! Review result types and generation-output parsing.
//!
//! The generation collaborator returns free text that is *expected* to be a
//! JSON document of a known shape. Models drift, wrap output in code
//! fences, or return prose; all of that is a first-class, non-fatal outcome
//! here, never a panic or an opaque 500.

use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// Minimum submission length in characters.
///
/// Feedback is not useful below this floor.
pub const MIN_TEXT_LEN: usize = 80;

/// Maximum submission length in characters (cost/abuse control).
pub const MAX_TEXT_LEN: usize = 15_000;

/// How much of the submission the quick-assessment prompt includes.
pub const SCORE_EXCERPT_CHARS: usize = 5_000;

/// Score used by the degraded assessment when generation output was unusable.
const DEGRADED_SCORE: u32 = 42;

/// Check a submission against the length bounds.
///
/// # Errors
///
/// Returns `TextTooShort` or `TextTooLong`; both are rejected before any
/// side effect occurs.
pub fn validate_submission(text: &str) -> Result<(), ReviewError> {
    let len = text.chars().count();
    if len < MIN_TEXT_LEN {
        return Err(ReviewError::TextTooShort {
            len,
            min: MIN_TEXT_LEN,
        });
    }
    if len > MAX_TEXT_LEN {
        return Err(ReviewError::TextTooLong {
            len,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

/// The quick free-tier assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Overall score, 0-100.
    #[serde(default)]
    pub score: u32,
    /// Specific critique points.
    #[serde(default)]
    pub critiques: Vec<String>,
    /// One-line summary.
    #[serde(default)]
    pub summary: String,
}

impl Assessment {
    /// Parse generation output into an assessment.
    ///
    /// # Errors
    ///
    /// Returns `MalformedGeneration` when the output is not JSON of the
    /// expected shape. Callers on the free path recover with
    /// [`Assessment::degraded`].
    pub fn parse(raw: &str) -> Result<Self, ReviewError> {
        let stripped = strip_code_fences(raw);
        let mut assessment: Self = serde_json::from_str(stripped)
            .map_err(|e| ReviewError::MalformedGeneration(e.to_string()))?;
        assessment.score = assessment.score.min(100);
        Ok(assessment)
    }

    /// The canned degraded-but-honest assessment.
    ///
    /// The caller already waited for a response; an unusable generation
    /// result becomes this fixed answer rather than an error.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            score: DEGRADED_SCORE,
            critiques: vec![
                "Our reviewer could not produce a structured assessment of this document."
                    .to_string(),
                "That usually means the text arrived garbled, often from a copy-paste out of a PDF."
                    .to_string(),
                "Try pasting the plain text content only, without layout artifacts.".to_string(),
                "Shorter, cleaner sections score more reliably than one dense wall of text."
                    .to_string(),
                "Submit again with clean text and you will get a proper review.".to_string(),
            ],
            summary: "We could not fully assess this document; please resubmit it as plain text."
                .to_string(),
        }
    }
}

/// One rewritten experience entry in the full rewrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    /// Role title.
    #[serde(default)]
    pub title: String,
    /// Organization and location.
    #[serde(default)]
    pub company: String,
    /// Date range.
    #[serde(default)]
    pub dates: String,
    /// Achievement bullets.
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// The rewritten document's profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewrittenDocument {
    /// Full name.
    #[serde(default)]
    pub name: String,
    /// Professional title line.
    #[serde(default)]
    pub title: String,
    /// City/region.
    #[serde(default)]
    pub location: String,
    /// Phone number, if present in the source.
    #[serde(default)]
    pub phone: String,
    /// Email address, if present in the source.
    #[serde(default)]
    pub email: String,
    /// Rewritten professional summary.
    #[serde(default)]
    pub summary: String,
    /// Keyword-optimized skills.
    #[serde(default)]
    pub key_skills: Vec<String>,
    /// Certifications, existing and recommended.
    #[serde(default)]
    pub certifications: Vec<String>,
    /// References line.
    #[serde(default)]
    pub references: String,
    /// Rewritten experience entries.
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
}

/// A single improvement tip in the full rewrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImprovementTip {
    /// The actionable tip.
    #[serde(default)]
    pub tip: String,
    /// Why it matters.
    #[serde(default)]
    pub why: String,
}

/// The paid full-rewrite result.
///
/// Unlike [`Assessment`], a malformed rewrite is a hard failure: the claim
/// is released and nothing partial is ever delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteResult {
    /// The rewritten document. Required; output without it is malformed.
    pub document: RewrittenDocument,
    /// Estimated score of the original.
    #[serde(default)]
    pub score_before: u32,
    /// Estimated score after the rewrite.
    #[serde(default)]
    pub score_after: u32,
    /// Summary of the improvements made.
    #[serde(default)]
    pub changes_made: Vec<String>,
    /// Further improvements only the owner can make.
    #[serde(default)]
    pub tips: Vec<ImprovementTip>,
}

impl RewriteResult {
    /// Parse generation output into a rewrite result.
    ///
    /// # Errors
    ///
    /// Returns `MalformedGeneration` when the output is not JSON carrying a
    /// `document` object.
    pub fn parse(raw: &str) -> Result<Self, ReviewError> {
        let stripped = strip_code_fences(raw);
        let mut result: Self = serde_json::from_str(stripped)
            .map_err(|e| ReviewError::MalformedGeneration(e.to_string()))?;
        result.score_before = result.score_before.min(100);
        result.score_after = result.score_after.min(100);
        Ok(result)
    }
}

/// Strip a surrounding markdown code fence, if any.
///
/// Models frequently wrap JSON in ```` ```json ... ``` ```` despite
/// instructions not to.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence line (which may carry a language tag) and the closing fence.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    let body = body.rsplit_once("```").map_or(body, |(body, _)| body);
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_short_text() {
        let err = validate_submission("too short").unwrap_err();
        assert!(matches!(err, ReviewError::TextTooShort { .. }));
    }

    #[test]
    fn validate_rejects_long_text() {
        let text = "x".repeat(MAX_TEXT_LEN + 1);
        let err = validate_submission(&text).unwrap_err();
        assert!(matches!(err, ReviewError::TextTooLong { .. }));
    }

    #[test]
    fn validate_accepts_bounds() {
        assert!(validate_submission(&"x".repeat(MIN_TEXT_LEN)).is_ok());
        assert!(validate_submission(&"x".repeat(MAX_TEXT_LEN)).is_ok());
    }

    #[test]
    fn assessment_parses_plain_json() {
        let raw = r#"{"score": 55, "critiques": ["vague bullets"], "summary": "needs metrics"}"#;
        let assessment = Assessment::parse(raw).unwrap();
        assert_eq!(assessment.score, 55);
        assert_eq!(assessment.critiques.len(), 1);
    }

    #[test]
    fn assessment_parses_fenced_json() {
        let raw = "```json\n{\"score\": 40, \"critiques\": [], \"summary\": \"ok\"}\n```";
        let assessment = Assessment::parse(raw).unwrap();
        assert_eq!(assessment.score, 40);
        assert_eq!(assessment.summary, "ok");
    }

    #[test]
    fn assessment_clamps_score() {
        let raw = r#"{"score": 250}"#;
        let assessment = Assessment::parse(raw).unwrap();
        assert_eq!(assessment.score, 100);
    }

    #[test]
    fn assessment_rejects_prose() {
        let err = Assessment::parse("I think this document is pretty good overall.").unwrap_err();
        assert!(matches!(err, ReviewError::MalformedGeneration(_)));
    }

    #[test]
    fn degraded_assessment_is_complete() {
        let degraded = Assessment::degraded();
        assert_eq!(degraded.score, 42);
        assert_eq!(degraded.critiques.len(), 5);
        assert!(!degraded.summary.is_empty());
    }

    #[test]
    fn rewrite_parses_full_shape() {
        let raw = r#"{
            "document": {
                "name": "A. Person",
                "title": "Operations Lead",
                "summary": "Seasoned operations professional.",
                "key_skills": ["Scheduling", "Vendor Management"],
                "experience": [
                    {"title": "Lead", "company": "Acme, Springfield", "dates": "2019 - 2024",
                     "bullets": ["Cut turnaround time by 30%"]}
                ]
            },
            "score_before": 34,
            "score_after": 78,
            "changes_made": ["Added metrics"],
            "tips": [{"tip": "Add a certification", "why": "Only you know which apply"}]
        }"#;
        let result = RewriteResult::parse(raw).unwrap();
        assert_eq!(result.document.name, "A. Person");
        assert_eq!(result.score_after, 78);
        assert_eq!(result.document.experience.len(), 1);
    }

    #[test]
    fn rewrite_requires_document() {
        let err = RewriteResult::parse(r#"{"score_before": 30}"#).unwrap_err();
        assert!(matches!(err, ReviewError::MalformedGeneration(_)));
    }

    #[test]
    fn rewrite_rejects_non_json() {
        assert!(RewriteResult::parse("Here is your rewritten document: ...").is_err());
    }

    #[test]
    fn code_fence_stripping_variants() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }
}
