//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::ingest::extract_document_text;
use crate::models::evaluation::EvaluationRow;
use crate::screening::evaluator::{evaluate_candidate, CandidateEvaluation};
use crate::screening::fallback::RubricWeights;
use crate::screening::report::{fit_counts, score_value, to_csv_string, FitCounts};
use crate::screening::store::{
    evaluations_by_job, recent_evaluations, save_evaluation, top_candidates,
};
use crate::state::AppState;

const DEFAULT_TOP_LIMIT: i64 = 10;
const DEFAULT_RECENT_LIMIT: i64 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub job_title: String,
    /// Evaluated candidates, best score first.
    pub candidates: Vec<CandidateEvaluation>,
    pub fit_counts: FitCounts,
}

#[derive(Debug, Deserialize)]
pub struct JobQuery {
    pub job_title: String,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub job_title: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// One uploaded file: multipart filename plus raw bytes.
struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

/// Everything collected from the multipart form before evaluation starts.
struct EvaluateForm {
    jd: Option<UploadedFile>,
    cvs: Vec<UploadedFile>,
    weights: RubricWeights,
    critical_skills: Vec<String>,
    job_title: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings/evaluate
///
/// Multipart form: one `jd` file field, one or more `cv` file fields,
/// optional rubric weight fields (`matched_skills_w`, …), an optional
/// comma-separated `critical_skills` field, and an optional `job_title`.
/// Evaluates every readable CV against the JD and returns the ranked
/// report. Unreadable CVs are skipped with a warning, not failed.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let form = collect_form(multipart).await?;

    let jd = form
        .jd
        .ok_or_else(|| AppError::Validation("a 'jd' file field is required".to_string()))?;
    let jd_text = extract_document_text(&jd.filename, &jd.bytes)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation(format!("could not read job description '{}'", jd.filename))
        })?;

    if form.cvs.is_empty() {
        return Err(AppError::Validation(
            "at least one 'cv' file field is required".to_string(),
        ));
    }

    let total = form.cvs.len();
    let mut candidates = Vec::with_capacity(total);

    for (i, cv) in form.cvs.iter().enumerate() {
        info!("Processing CV {}/{}: {}", i + 1, total, cv.filename);

        let Some(cv_text) = extract_document_text(&cv.filename, &cv.bytes) else {
            warn!("Skipping unreadable CV '{}'", cv.filename);
            continue;
        };
        if cv_text.trim().is_empty() {
            warn!("Skipping empty CV '{}'", cv.filename);
            continue;
        }

        let evaluation = evaluate_candidate(
            &state.llm,
            state.evaluator.as_ref(),
            &jd_text,
            &cv_text,
            &cv.filename,
            &form.weights,
            &form.critical_skills,
        )
        .await;

        // Persistence failures never fail the run.
        if let Err(e) = save_evaluation(&state.db, &form.job_title, &evaluation.record).await {
            warn!("Failed to persist evaluation for '{}': {e}", cv.filename);
        }

        candidates.push(evaluation);
    }

    candidates.sort_by(|a, b| {
        score_value(&b.record.score).total_cmp(&score_value(&a.record.score))
    });

    let counts = fit_counts(candidates.iter().map(|c| &c.record));

    Ok(Json(ScreeningResponse {
        job_title: form.job_title,
        candidates,
        fit_counts: counts,
    }))
}

/// GET /api/v1/screenings?job_title=
///
/// Stored evaluations for one job title, best score first.
pub async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<Vec<EvaluationRow>>, AppError> {
    let rows = evaluations_by_job(&state.db, &query.job_title).await?;
    Ok(Json(rows))
}

/// GET /api/v1/screenings/recent?limit=
pub async fn handle_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<EvaluationRow>>, AppError> {
    let rows = recent_evaluations(&state.db, query.limit.unwrap_or(DEFAULT_RECENT_LIMIT)).await?;
    Ok(Json(rows))
}

/// GET /api/v1/screenings/top?job_title=&limit=
pub async fn handle_top(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<EvaluationRow>>, AppError> {
    let rows = top_candidates(
        &state.db,
        query.job_title.as_deref(),
        query.limit.unwrap_or(DEFAULT_TOP_LIMIT),
    )
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/screenings/export?job_title=
///
/// Stored evaluations for one job title as CSV, in the fixed report
/// column order.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = evaluations_by_job(&state.db, &query.job_title).await?;
    let records: Vec<_> = rows.into_iter().map(EvaluationRow::into_record).collect();
    let csv = to_csv_string(&records).map_err(AppError::Internal)?;

    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart collection
// ────────────────────────────────────────────────────────────────────────────

async fn collect_form(mut multipart: Multipart) -> Result<EvaluateForm, AppError> {
    let mut form = EvaluateForm {
        jd: None,
        cvs: Vec::new(),
        weights: RubricWeights::default(),
        critical_skills: Vec::new(),
        job_title: String::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "jd" => {
                let filename = field.file_name().unwrap_or("jd").to_string();
                let bytes = read_field_bytes(&name, field).await?;
                form.jd = Some(UploadedFile { filename, bytes });
            }
            "cv" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("cv_{}", form.cvs.len() + 1));
                let bytes = read_field_bytes(&name, field).await?;
                form.cvs.push(UploadedFile { filename, bytes });
            }
            "matched_skills_w" => form.weights.matched_skills = read_weight(&name, field).await?,
            "experience_relevance_w" => {
                form.weights.experience_relevance = read_weight(&name, field).await?
            }
            "qualifications_w" => form.weights.qualifications = read_weight(&name, field).await?,
            "seniority_w" => form.weights.seniority = read_weight(&name, field).await?,
            "cv_clarity_w" => form.weights.cv_clarity = read_weight(&name, field).await?,
            "critical_skills" => {
                form.critical_skills = read_field_text(&name, field)
                    .await?
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "job_title" => form.job_title = read_field_text(&name, field).await?,
            other => {
                warn!("Ignoring unknown multipart field '{other}'");
            }
        }
    }

    Ok(form)
}

async fn read_field_bytes(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<Vec<u8>, AppError> {
    Ok(field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read field '{name}': {e}")))?
        .to_vec())
}

async fn read_field_text(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read field '{name}': {e}")))
}

async fn read_weight(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<f64, AppError> {
    let text = read_field_text(name, field).await?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| AppError::Validation(format!("field '{name}' must be a number, got '{text}'")))
}
