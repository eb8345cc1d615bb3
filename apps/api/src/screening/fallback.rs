//! Deterministic fallback scorer.
//!
//! When the LLM evaluation is unavailable or its table output cannot be
//! parsed, this module computes a reproducible score/fit/rationale triple
//! directly from the extracted candidate data. Pure function, no I/O —
//! identical inputs always produce identical output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::screening::extraction::CandidateExtraction;

/// Strict scoring profile. A perfect composite maps to 10.0, a zero
/// composite to 1.0, before penalties and the final clamp.
const SCORE_BASE: f64 = 1.0;
const SCORE_RANGE: f64 = 9.0;

const PENALTY_PER_MISSING_SKILL: f64 = 0.4;
const MAX_MISSING_SKILL_PENALTY: f64 = 2.5;

/// Hard ceiling applied when any critical skill is absent, in place of
/// an additive penalty.
pub const CRITICAL_SKILL_CEILING: f64 = 4.5;

const HIGH_FIT_THRESHOLD: f64 = 8.0;
const MEDIUM_FIT_THRESHOLD: f64 = 5.5;

const SENIORITY_KEYWORDS: [&str; 10] = [
    "senior",
    "lead",
    "manager",
    "principal",
    "head",
    "director",
    "vp",
    "vice president",
    "cto",
    "ceo",
];

// ────────────────────────────────────────────────────────────────────────────
// Rubric and output types
// ────────────────────────────────────────────────────────────────────────────

/// User-tunable rubric weights, each a percentage in [0, 100].
///
/// Weights are not required to sum to 100 — each is normalized to a
/// fraction independently, so a non-100 sum only rescales the composite's
/// dynamic range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RubricWeights {
    pub matched_skills: f64,
    pub experience_relevance: f64,
    pub qualifications: f64,
    pub seniority: f64,
    pub cv_clarity: f64,
}

impl Default for RubricWeights {
    fn default() -> Self {
        Self {
            matched_skills: 50.0,
            experience_relevance: 20.0,
            qualifications: 15.0,
            seniority: 10.0,
            cv_clarity: 5.0,
        }
    }
}

/// Categorical fit bucket derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fit {
    High,
    Medium,
    Low,
}

impl Fit {
    /// Thresholds partition [0, 10] with no gaps: >= 8.0 High,
    /// >= 5.5 Medium, else Low.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_FIT_THRESHOLD {
            Fit::High
        } else if score >= MEDIUM_FIT_THRESHOLD {
            Fit::Medium
        } else {
            Fit::Low
        }
    }
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fit::High => write!(f, "High"),
            Fit::Medium => write!(f, "Medium"),
            Fit::Low => write!(f, "Low"),
        }
    }
}

/// Output of the deterministic scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackEvaluation {
    pub score: f64,
    pub fit: Fit,
    pub rationale: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Computes the deterministic fallback evaluation.
///
/// Total over its input domain: absent or degenerate fields fall back to
/// safe defaults instead of failing. `cv_text` is used only for the
/// length-based clarity proxy.
pub fn compute_fallback_score(
    extraction: &CandidateExtraction,
    cv_text: &str,
    weights: &RubricWeights,
    critical_skills: &[String],
) -> FallbackEvaluation {
    let matched_count = extraction.matched_skills.len();
    let missing_count = extraction.missing_skills.len();
    let total_skills = matched_count + missing_count;

    // No skills extracted at all reads as an extraction failure, not a
    // skill gap: neutral 0.0, no penalty.
    let matched_ratio = if total_skills > 0 {
        matched_count as f64 / total_skills as f64
    } else {
        0.0
    };

    // Both saturate at 2 entries.
    let qual_score = (extraction.top_qualifications.len() as f64 / 2.0).min(1.0);
    let ach_score = (extraction.quantifiable_achievements.len() as f64 / 2.0).min(1.0);

    let summary = extraction.relevant_experience_summary.to_lowercase();
    let exp_presence = if summary.trim().is_empty() { 0.0 } else { 1.0 };

    let seniority_score = if SENIORITY_KEYWORDS.iter().any(|k| summary.contains(k)) {
        1.0
    } else {
        0.0
    };

    // Older extraction profiles do not track years; there the summary
    // presence signal stands alone.
    let comp_experience = match extraction.years_of_experience {
        Some(years) => exp_presence * 0.4 + (years.max(0.0) / 10.0).min(1.0) * 0.6,
        None => exp_presence,
    };

    let education = extraction
        .education_level
        .as_deref()
        .map(|e| e.trim().to_lowercase());
    let comp_qualifications = match &education {
        Some(level) => qual_score * 0.5 + ach_score * 0.3 + education_tier(level) * 0.2,
        None => (qual_score + ach_score) / 2.0,
    };

    let comp_clarity = clarity_score(cv_text.chars().count());

    let weighted_percent = matched_ratio * (weights.matched_skills / 100.0)
        + comp_experience * (weights.experience_relevance / 100.0)
        + comp_qualifications * (weights.qualifications / 100.0)
        + seniority_score * (weights.seniority / 100.0)
        + comp_clarity * (weights.cv_clarity / 100.0);

    let mut score = SCORE_BASE + weighted_percent * SCORE_RANGE;

    let missing_penalty =
        (missing_count as f64 * PENALTY_PER_MISSING_SKILL).min(MAX_MISSING_SKILL_PENALTY);
    score -= missing_penalty;

    let missing_criticals = missing_critical_skills(&extraction.matched_skills, critical_skills);
    if !missing_criticals.is_empty() {
        score = score.min(CRITICAL_SKILL_CEILING);
    }

    let score = score.clamp(0.0, 10.0);
    let fit = Fit::from_score(score);

    let rationale = build_rationale(RationaleInputs {
        matched_count,
        total_skills,
        matched_ratio,
        years_of_experience: extraction.years_of_experience,
        education: education.as_deref(),
        qualification_count: extraction.top_qualifications.len(),
        achievement_count: extraction.quantifiable_achievements.len(),
        missing_count,
        missing_criticals: &missing_criticals,
    });

    FallbackEvaluation {
        score,
        fit,
        rationale,
    }
}

/// Critical skills (trimmed, lower-cased) with no case-insensitive
/// substring match among the matched skills. Blank entries are ignored.
pub fn missing_critical_skills(matched_skills: &[String], critical_skills: &[String]) -> Vec<String> {
    let matched_lower: Vec<String> = matched_skills.iter().map(|s| s.to_lowercase()).collect();
    critical_skills
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .filter(|c| !matched_lower.iter().any(|m| m.contains(c.as_str())))
        .collect()
}

/// Monotone education tier. Unknown levels land on the neutral 0.5.
fn education_tier(level: &str) -> f64 {
    if level.contains("phd") || level.contains("doctorate") {
        1.0
    } else if level.contains("master") || level.contains("mba") {
        0.85
    } else if level.contains("bachelor") {
        0.7
    } else {
        0.5
    }
}

/// Step function of raw CV character length, monotone non-decreasing.
fn clarity_score(cv_len: usize) -> f64 {
    if cv_len > 2000 {
        1.0
    } else if cv_len > 800 {
        0.7
    } else if cv_len > 300 {
        0.4
    } else {
        0.15
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rationale assembly
// ────────────────────────────────────────────────────────────────────────────

struct RationaleInputs<'a> {
    matched_count: usize,
    total_skills: usize,
    matched_ratio: f64,
    years_of_experience: Option<f64>,
    education: Option<&'a str>,
    qualification_count: usize,
    achievement_count: usize,
    missing_count: usize,
    missing_criticals: &'a [String],
}

/// Deterministic sentence assembly in a fixed order. No randomness —
/// identical inputs always yield identical text.
fn build_rationale(inputs: RationaleInputs<'_>) -> String {
    let mut parts = Vec::new();

    parts.push(format!(
        "Matched {}/{} JD skills ({}%).",
        inputs.matched_count,
        inputs.total_skills,
        (inputs.matched_ratio * 100.0).round() as i64
    ));

    if let Some(years) = inputs.years_of_experience {
        if years > 0.0 {
            parts.push(format!("{years} years experience."));
        }
    }

    if let Some(education) = inputs.education {
        if !education.is_empty() && education != "unknown" {
            parts.push(format!("Education: {education}."));
        }
    }

    if inputs.qualification_count > 0 {
        parts.push(format!("{} qualifications.", inputs.qualification_count));
    }

    if inputs.achievement_count > 0 {
        parts.push(format!(
            "{} quantifiable achievements.",
            inputs.achievement_count
        ));
    }

    if inputs.missing_count > 0 {
        parts.push(format!(
            "Penalty for {} missing skills.",
            inputs.missing_count
        ));
    }

    if !inputs.missing_criticals.is_empty() {
        parts.push(format!(
            "Critical skills missing: {} - score capped.",
            inputs.missing_criticals.join(", ")
        ));
    }

    parts.join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn extraction(matched: &[&str], missing: &[&str]) -> CandidateExtraction {
        CandidateExtraction {
            matched_skills: matched.iter().map(|s| s.to_string()).collect(),
            missing_skills: missing.iter().map(|s| s.to_string()).collect(),
            ..CandidateExtraction::empty()
        }
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let ext = CandidateExtraction {
            matched_skills: vec!["Python".to_string(), "SQL".to_string()],
            missing_skills: vec!["AWS".to_string()],
            top_qualifications: vec!["MBA".to_string()],
            relevant_experience_summary: "Senior data analyst for 5 years".to_string(),
            years_of_experience: Some(5.0),
            education_level: Some("Master's".to_string()),
            ..CandidateExtraction::empty()
        };
        let weights = RubricWeights::default();
        let cv = "x".repeat(1500);

        let a = compute_fallback_score(&ext, &cv, &weights, &[]);
        let b = compute_fallback_score(&ext, &cv, &weights, &[]);
        assert_eq!(a.score, b.score);
        assert_eq!(a.fit, b.fit);
        assert_eq!(a.rationale, b.rationale);
    }

    #[test]
    fn test_worked_example_medium_fit() {
        // 2/3 matched, MBA, 5 years, Master's, 1500-char CV.
        let ext = CandidateExtraction {
            matched_skills: vec!["Python".to_string(), "SQL".to_string()],
            missing_skills: vec!["AWS".to_string()],
            top_qualifications: vec!["MBA".to_string()],
            relevant_experience_summary: "Five years of analytics work aligned with the JD"
                .to_string(),
            years_of_experience: Some(5.0),
            education_level: Some("Master's".to_string()),
            ..CandidateExtraction::empty()
        };
        let result =
            compute_fallback_score(&ext, &"x".repeat(1500), &RubricWeights::default(), &[]);

        assert_eq!(result.fit, Fit::Medium, "score was {}", result.score);
        assert!(result.rationale.contains("Matched 2/3 JD skills (67%)."));
        assert!(result.rationale.contains("5 years experience."));
        assert!(result.rationale.contains("Education: master's."));
        assert!(result.rationale.contains("1 qualifications."));
        assert!(result.rationale.contains("Penalty for 1 missing skills."));
    }

    #[test]
    fn test_no_extracted_skills_is_neutral_not_penalizing() {
        let result = compute_fallback_score(
            &extraction(&[], &[]),
            "",
            &RubricWeights::default(),
            &[],
        );
        assert!(result.rationale.contains("Matched 0/0 JD skills (0%)."));
        // No penalty sentence when nothing is missing.
        assert!(!result.rationale.contains("Penalty"));
    }

    #[test]
    fn test_score_always_clamped_to_0_10() {
        // Out-of-range weights are not rejected — the clamp contains them.
        let oversized = RubricWeights {
            matched_skills: 500.0,
            experience_relevance: 500.0,
            qualifications: 500.0,
            seniority: 500.0,
            cv_clarity: 500.0,
        };
        let ext = CandidateExtraction {
            matched_skills: vec!["Rust".to_string()],
            relevant_experience_summary: "Principal engineer".to_string(),
            years_of_experience: Some(20.0),
            education_level: Some("PhD".to_string()),
            ..CandidateExtraction::empty()
        };
        let high = compute_fallback_score(&ext, &"x".repeat(3000), &oversized, &[]);
        assert!(high.score <= 10.0);

        let many_missing: Vec<&str> = vec!["a", "b", "c", "d", "e", "f", "g", "h"];
        let low = compute_fallback_score(
            &extraction(&[], &many_missing),
            "",
            &RubricWeights::default(),
            &[],
        );
        assert!(low.score >= 0.0);
    }

    #[test]
    fn test_more_matched_skills_never_lowers_score() {
        let weights = RubricWeights::default();
        let mut previous = f64::MIN;
        for n in 0..8 {
            let matched: Vec<String> = (0..n).map(|i| format!("skill-{i}")).collect();
            let ext = CandidateExtraction {
                matched_skills: matched,
                missing_skills: vec!["AWS".to_string(), "Go".to_string()],
                ..CandidateExtraction::empty()
            };
            let result = compute_fallback_score(&ext, "", &weights, &[]);
            assert!(
                result.score >= previous,
                "score dropped from {previous} to {} at n={n}",
                result.score
            );
            previous = result.score;
        }
    }

    #[test]
    fn test_missing_critical_skill_caps_score() {
        // Strong candidate in every dimension, but the must-have is absent.
        let ext = CandidateExtraction {
            matched_skills: vec!["Rust".to_string(), "Go".to_string(), "SQL".to_string()],
            missing_skills: vec![],
            top_qualifications: vec!["PhD".to_string(), "PMP".to_string()],
            quantifiable_achievements: vec![
                "Cut costs 30%".to_string(),
                "Scaled to 1M users".to_string(),
            ],
            relevant_experience_summary: "Senior principal director of engineering".to_string(),
            years_of_experience: Some(15.0),
            education_level: Some("PhD".to_string()),
        };
        let criticals = vec!["Kubernetes".to_string()];
        let result = compute_fallback_score(
            &ext,
            &"x".repeat(5000),
            &RubricWeights::default(),
            &criticals,
        );
        assert!(
            result.score <= CRITICAL_SKILL_CEILING,
            "score was {}",
            result.score
        );
        assert!(result
            .rationale
            .contains("Critical skills missing: kubernetes - score capped."));
    }

    #[test]
    fn test_critical_skill_substring_match_is_case_insensitive() {
        let matched = vec!["Advanced PYTHON scripting".to_string()];
        assert!(missing_critical_skills(&matched, &["python".to_string()]).is_empty());
        assert!(missing_critical_skills(&matched, &["  Python  ".to_string()]).is_empty());
        assert_eq!(
            missing_critical_skills(&matched, &["java".to_string()]),
            vec!["java".to_string()]
        );
        // Blank entries are ignored, not reported missing.
        assert!(missing_critical_skills(&matched, &["   ".to_string()]).is_empty());
    }

    #[test]
    fn test_missing_skill_penalty_saturates() {
        let weights = RubricWeights::default();
        let few = compute_fallback_score(
            &extraction(&["a"], &["m1", "m2", "m3", "m4", "m5", "m6"]),
            "",
            &weights,
            &[],
        );
        let more = compute_fallback_score(
            &extraction(&["a"], &["m1", "m2", "m3", "m4", "m5", "m6", "m7", "m8"]),
            "",
            &weights,
            &[],
        );
        // Past the 2.5 cap, extra missing skills only move the ratio term.
        assert!(more.score <= few.score);
    }

    #[test]
    fn test_fit_thresholds_partition_score_range() {
        assert_eq!(Fit::from_score(10.0), Fit::High);
        assert_eq!(Fit::from_score(8.0), Fit::High);
        assert_eq!(Fit::from_score(7.999), Fit::Medium);
        assert_eq!(Fit::from_score(5.5), Fit::Medium);
        assert_eq!(Fit::from_score(5.499), Fit::Low);
        assert_eq!(Fit::from_score(0.0), Fit::Low);
    }

    #[test]
    fn test_years_absent_falls_back_to_presence_signal() {
        let with_summary = CandidateExtraction {
            relevant_experience_summary: "Relevant backend work".to_string(),
            years_of_experience: None,
            ..CandidateExtraction::empty()
        };
        let without_summary = CandidateExtraction {
            years_of_experience: None,
            ..CandidateExtraction::empty()
        };
        let weights = RubricWeights {
            matched_skills: 0.0,
            experience_relevance: 100.0,
            qualifications: 0.0,
            seniority: 0.0,
            cv_clarity: 0.0,
        };
        let a = compute_fallback_score(&with_summary, "", &weights, &[]);
        let b = compute_fallback_score(&without_summary, "", &weights, &[]);
        // Pure presence: full experience component vs none.
        assert!((a.score - 10.0).abs() < 1e-9, "score was {}", a.score);
        assert!((b.score - 1.0).abs() < 1e-9, "score was {}", b.score);
    }

    #[test]
    fn test_education_absent_uses_plain_average() {
        let ext = CandidateExtraction {
            top_qualifications: vec!["BSc".to_string(), "AWS SA".to_string()],
            education_level: None,
            ..CandidateExtraction::empty()
        };
        let weights = RubricWeights {
            matched_skills: 0.0,
            experience_relevance: 0.0,
            qualifications: 100.0,
            seniority: 0.0,
            cv_clarity: 0.0,
        };
        // qual_score=1.0, ach_score=0.0 → (1.0 + 0.0)/2 = 0.5 → 1 + 0.5*9 = 5.5
        let result = compute_fallback_score(&ext, "", &weights, &[]);
        assert!((result.score - 5.5).abs() < 1e-9, "score was {}", result.score);
    }

    #[test]
    fn test_education_tiers_are_monotone() {
        assert_eq!(education_tier("phd in economics"), 1.0);
        assert_eq!(education_tier("doctorate"), 1.0);
        assert_eq!(education_tier("master of science"), 0.85);
        assert_eq!(education_tier("mba"), 0.85);
        assert_eq!(education_tier("bachelor's"), 0.7);
        assert_eq!(education_tier("high school"), 0.5);
        assert_eq!(education_tier(""), 0.5);
    }

    #[test]
    fn test_clarity_steps_are_monotone() {
        assert_eq!(clarity_score(0), 0.15);
        assert_eq!(clarity_score(300), 0.15);
        assert_eq!(clarity_score(301), 0.4);
        assert_eq!(clarity_score(800), 0.4);
        assert_eq!(clarity_score(801), 0.7);
        assert_eq!(clarity_score(2000), 0.7);
        assert_eq!(clarity_score(2001), 1.0);
    }

    #[test]
    fn test_seniority_keyword_detection() {
        let senior = CandidateExtraction {
            relevant_experience_summary: "Was a Team Lead on the platform group".to_string(),
            ..CandidateExtraction::empty()
        };
        let junior = CandidateExtraction {
            relevant_experience_summary: "Junior developer on internal tools".to_string(),
            ..CandidateExtraction::empty()
        };
        let weights = RubricWeights {
            matched_skills: 0.0,
            experience_relevance: 0.0,
            qualifications: 0.0,
            seniority: 100.0,
            cv_clarity: 0.0,
        };
        let a = compute_fallback_score(&senior, "", &weights, &[]);
        let b = compute_fallback_score(&junior, "", &weights, &[]);
        assert!(a.score > b.score);
    }

    #[test]
    fn test_fit_display_strings() {
        assert_eq!(Fit::High.to_string(), "High");
        assert_eq!(Fit::Medium.to_string(), "Medium");
        assert_eq!(Fit::Low.to_string(), "Low");
    }

    #[test]
    fn test_default_weights_match_rubric_defaults() {
        let w = RubricWeights::default();
        assert_eq!(w.matched_skills, 50.0);
        assert_eq!(w.experience_relevance, 20.0);
        assert_eq!(w.qualifications, 15.0);
        assert_eq!(w.seniority, 10.0);
        assert_eq!(w.cv_clarity, 5.0);
    }
}
