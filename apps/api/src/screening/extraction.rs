//! Candidate extraction — structured facts pulled from a CV relative to a JD.
//!
//! The LLM does the reading; this module owns the data shape and the
//! defaulting rules. Every list field degrades to empty when the producer
//! omits it, so downstream scoring never sees an absent field.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::screening::prompts::EXTRACTION_PROMPT_TEMPLATE;

/// Structured candidate facts extracted against a job description.
///
/// `years_of_experience` and `education_level` are `None` under the older
/// extraction profile that does not track them — the fallback scorer
/// switches blends on that distinction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateExtraction {
    /// Skills present in both the JD and the CV.
    #[serde(default)]
    pub matched_skills: Vec<String>,
    /// JD skills absent from the CV.
    #[serde(default)]
    pub missing_skills: Vec<String>,
    /// Degrees, certifications, licenses.
    #[serde(default)]
    pub top_qualifications: Vec<String>,
    /// Achievements carrying numbers, percentages, currency, or metrics.
    #[serde(default)]
    pub quantifiable_achievements: Vec<String>,
    #[serde(default)]
    pub relevant_experience_summary: String,
    #[serde(default)]
    pub years_of_experience: Option<f64>,
    #[serde(default)]
    pub education_level: Option<String>,
}

impl CandidateExtraction {
    /// The all-empty extraction substituted when the extraction call fails.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Runs the LLM extraction step for one candidate.
///
/// Total: any LLM or decode failure is logged and replaced with
/// `CandidateExtraction::empty()`, so the evaluation pipeline always has
/// a well-formed extraction to score.
pub async fn extract_candidate(
    llm: &LlmClient,
    jd_text: &str,
    cv_text: &str,
) -> CandidateExtraction {
    let prompt = EXTRACTION_PROMPT_TEMPLATE
        .replace("{jd_text}", jd_text)
        .replace("{cv_text}", cv_text);

    match llm.call_json::<CandidateExtraction>(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!("Candidate extraction failed, substituting empty extraction: {e}");
            CandidateExtraction::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        // A producer that only emits two fields still yields a full struct.
        let json = r#"{
            "matched_skills": ["Rust", "SQL"],
            "relevant_experience_summary": "Five years of backend work"
        }"#;
        let extraction: CandidateExtraction = serde_json::from_str(json).unwrap();

        assert_eq!(extraction.matched_skills.len(), 2);
        assert!(extraction.missing_skills.is_empty());
        assert!(extraction.top_qualifications.is_empty());
        assert!(extraction.quantifiable_achievements.is_empty());
        assert_eq!(extraction.years_of_experience, None);
        assert_eq!(extraction.education_level, None);
    }

    #[test]
    fn test_full_extraction_deserializes() {
        let json = r#"{
            "matched_skills": ["Python"],
            "missing_skills": ["AWS"],
            "top_qualifications": ["MBA"],
            "quantifiable_achievements": ["Grew revenue 15%"],
            "relevant_experience_summary": "Senior analyst roles",
            "years_of_experience": 5,
            "education_level": "Master's"
        }"#;
        let extraction: CandidateExtraction = serde_json::from_str(json).unwrap();

        assert_eq!(extraction.years_of_experience, Some(5.0));
        assert_eq!(extraction.education_level.as_deref(), Some("Master's"));
        assert_eq!(extraction.quantifiable_achievements[0], "Grew revenue 15%");
    }

    #[test]
    fn test_empty_extraction_has_safe_defaults() {
        let empty = CandidateExtraction::empty();
        assert!(empty.matched_skills.is_empty());
        assert!(empty.missing_skills.is_empty());
        assert!(empty.relevant_experience_summary.is_empty());
        assert_eq!(empty.years_of_experience, None);
        assert_eq!(empty.education_level, None);
    }

    #[test]
    fn test_empty_object_deserializes_to_empty_extraction() {
        let extraction: CandidateExtraction = serde_json::from_str("{}").unwrap();
        assert_eq!(extraction, CandidateExtraction::empty());
    }
}
