//! Evaluation logging sidecar.
//!
//! Every evaluated candidate is inserted into `candidate_evaluations`;
//! the read paths back the stored-report listings and CSV export. Callers
//! treat insert failures as warnings — persistence never blocks a
//! screening run.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::evaluation::EvaluationRow;
use crate::screening::report::{score_value, CandidateRecord};

/// Inserts one evaluation row. The record's display score is parsed to a
/// float; unparseable scores are stored as 0.0.
pub async fn save_evaluation(
    pool: &PgPool,
    job_title: &str,
    record: &CandidateRecord,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let score = score_value(&record.score).max(0.0);

    sqlx::query(
        r#"
        INSERT INTO candidate_evaluations
            (id, job_title, candidate_name, score, fit_level, rationale,
             matched_skills, missing_skills, qualifications, achievements, evaluated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
        "#,
    )
    .bind(id)
    .bind(job_title)
    .bind(&record.filename)
    .bind(score)
    .bind(&record.fit)
    .bind(&record.rationale)
    .bind(&record.matched_skills)
    .bind(&record.missing_skills)
    .bind(&record.top_qualifications)
    .bind(&record.quantifiable_achievements)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Stored evaluations for one job title, best score first.
pub async fn evaluations_by_job(
    pool: &PgPool,
    job_title: &str,
) -> Result<Vec<EvaluationRow>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationRow>(
        "SELECT * FROM candidate_evaluations WHERE job_title = $1 ORDER BY score DESC",
    )
    .bind(job_title)
    .fetch_all(pool)
    .await
}

/// Most recent evaluations across all jobs.
pub async fn recent_evaluations(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<EvaluationRow>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationRow>(
        "SELECT * FROM candidate_evaluations ORDER BY evaluated_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Top candidates by score, optionally restricted to one job title.
pub async fn top_candidates(
    pool: &PgPool,
    job_title: Option<&str>,
    limit: i64,
) -> Result<Vec<EvaluationRow>, sqlx::Error> {
    match job_title {
        Some(job_title) => {
            sqlx::query_as::<_, EvaluationRow>(
                "SELECT * FROM candidate_evaluations WHERE job_title = $1 \
                 ORDER BY score DESC LIMIT $2",
            )
            .bind(job_title)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, EvaluationRow>(
                "SELECT * FROM candidate_evaluations ORDER BY score DESC LIMIT $1",
            )
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
}
