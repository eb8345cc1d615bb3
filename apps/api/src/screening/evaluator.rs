//! Candidate evaluation — pluggable, trait-based evaluator with a
//! deterministic degradation path.
//!
//! Default backend: `LlmEvaluator` (rubric-parameterized table prompt,
//! parsed by the tolerant table parser). When the backend fails — LLM
//! unavailable, empty response, unusable table — the orchestrator answers
//! with the deterministic fallback scorer, which cannot fail.
//!
//! `AppState` holds an `Arc<dyn Evaluator>`, swapped at startup.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::screening::extraction::{extract_candidate, CandidateExtraction};
use crate::screening::fallback::{compute_fallback_score, RubricWeights};
use crate::screening::prompts::{
    build_evaluation_prompt, ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, EVALUATION_SYSTEM,
};
use crate::screening::report::CandidateRecord;
use crate::screening::table_parser::parse_markdown_table;

/// One fully evaluated candidate, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateEvaluation {
    pub record: CandidateRecord,
    pub extraction: CandidateExtraction,
    /// Best-effort strengths/weaknesses prose; absent when the analysis
    /// call failed.
    pub analysis: Option<String>,
    pub used_fallback: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The primary evaluation backend. Implement this to swap backends
/// without touching the orchestrator or handlers.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        extraction: &CandidateExtraction,
        weights: &RubricWeights,
        critical_skills: &[String],
        filename: &str,
    ) -> Result<CandidateRecord, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmEvaluator — default backend
// ────────────────────────────────────────────────────────────────────────────

/// Evaluates via the LLM: table prompt in, markdown table out, parsed into
/// a `CandidateRecord`. Any failure along that path is an `Err` — the
/// orchestrator decides what to do with it.
pub struct LlmEvaluator {
    llm: LlmClient,
}

impl LlmEvaluator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Evaluator for LlmEvaluator {
    async fn evaluate(
        &self,
        extraction: &CandidateExtraction,
        weights: &RubricWeights,
        critical_skills: &[String],
        filename: &str,
    ) -> Result<CandidateRecord, AppError> {
        let candidate_data_json = serde_json::to_string_pretty(extraction)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize extraction: {e}")))?;
        let prompt = build_evaluation_prompt(&candidate_data_json, weights, critical_skills);

        let response = self
            .llm
            .call(&prompt, EVALUATION_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Evaluation LLM call failed: {e}")))?;

        let table = response
            .text()
            .ok_or_else(|| AppError::Llm("Evaluation returned empty content".to_string()))?;

        parse_markdown_table(table, filename)
            .map_err(|e| AppError::Llm(format!("Evaluation table unusable: {e}")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Runs the primary evaluator and degrades to the deterministic fallback
/// scorer on any failure. The bool is true when the fallback answered.
pub async fn evaluate_extracted(
    evaluator: &dyn Evaluator,
    extraction: &CandidateExtraction,
    cv_text: &str,
    weights: &RubricWeights,
    critical_skills: &[String],
    filename: &str,
) -> (CandidateRecord, bool) {
    match evaluator
        .evaluate(extraction, weights, critical_skills, filename)
        .await
    {
        Ok(record) => (record, false),
        Err(e) => {
            warn!("LLM evaluation unusable for '{filename}', using deterministic fallback: {e}");
            (
                fallback_record(extraction, cv_text, weights, critical_skills, filename),
                true,
            )
        }
    }
}

/// Full per-candidate pipeline: extraction → primary evaluation (with
/// fallback) → best-effort strengths/weaknesses analysis.
pub async fn evaluate_candidate(
    llm: &LlmClient,
    evaluator: &dyn Evaluator,
    jd_text: &str,
    cv_text: &str,
    filename: &str,
    weights: &RubricWeights,
    critical_skills: &[String],
) -> CandidateEvaluation {
    let extraction = extract_candidate(llm, jd_text, cv_text).await;

    let (record, used_fallback) = evaluate_extracted(
        evaluator,
        &extraction,
        cv_text,
        weights,
        critical_skills,
        filename,
    )
    .await;

    info!(
        "Evaluated '{filename}': score={} fit={} fallback={used_fallback}",
        record.score, record.fit
    );

    let analysis = analyze_strengths_weaknesses(llm, &extraction, jd_text).await;

    CandidateEvaluation {
        record,
        extraction,
        analysis,
        used_fallback,
    }
}

/// Assembles a display record from the deterministic scorer's output.
pub fn fallback_record(
    extraction: &CandidateExtraction,
    cv_text: &str,
    weights: &RubricWeights,
    critical_skills: &[String],
    filename: &str,
) -> CandidateRecord {
    let evaluation = compute_fallback_score(extraction, cv_text, weights, critical_skills);
    CandidateRecord {
        filename: filename.to_string(),
        score: format!("{:.1}", evaluation.score),
        fit: evaluation.fit.to_string(),
        rationale: evaluation.rationale,
        matched_skills: extraction.matched_skills.join(", "),
        missing_skills: extraction.missing_skills.join(", "),
        top_qualifications: extraction.top_qualifications.join(", "),
        quantifiable_achievements: extraction.quantifiable_achievements.join(", "),
    }
}

/// Strengths/weaknesses prose for one candidate. Best-effort: failures are
/// logged and surface as `None`, never as an error.
async fn analyze_strengths_weaknesses(
    llm: &LlmClient,
    extraction: &CandidateExtraction,
    jd_text: &str,
) -> Option<String> {
    let candidate_data_json = serde_json::to_string_pretty(extraction).ok()?;
    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{candidate_data_json}", &candidate_data_json)
        .replace("{jd_text}", jd_text);

    match llm.call(&prompt, ANALYSIS_SYSTEM).await {
        Ok(response) => response.text().map(str::to_string),
        Err(e) => {
            warn!("Strengths/weaknesses analysis failed: {e}");
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
