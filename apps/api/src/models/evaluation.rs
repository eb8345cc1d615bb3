use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::screening::report::CandidateRecord;

/// One logged evaluation in `candidate_evaluations`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationRow {
    pub id: Uuid,
    pub job_title: String,
    pub candidate_name: String,
    pub score: f64,
    pub fit_level: String,
    pub rationale: String,
    pub matched_skills: String,
    pub missing_skills: String,
    pub qualifications: String,
    pub achievements: String,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationRow {
    /// Rebuilds the flat report record for CSV export, with the candidate
    /// name standing in as the filename column.
    pub fn into_record(self) -> CandidateRecord {
        CandidateRecord {
            filename: self.candidate_name,
            score: format!("{:.1}", self.score),
            fit: self.fit_level,
            rationale: self.rationale,
            matched_skills: self.matched_skills,
            missing_skills: self.missing_skills,
            top_qualifications: self.qualifications,
            quantifiable_achievements: self.achievements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_record_maps_columns() {
        let row = EvaluationRow {
            id: Uuid::new_v4(),
            job_title: "Backend Engineer".to_string(),
            candidate_name: "cv_alice.pdf".to_string(),
            score: 7.25,
            fit_level: "Medium".to_string(),
            rationale: "Matched 4/6 JD skills (67%).".to_string(),
            matched_skills: "Rust, SQL".to_string(),
            missing_skills: "Kubernetes".to_string(),
            qualifications: "BSc".to_string(),
            achievements: "Cut p99 latency 40%".to_string(),
            evaluated_at: Utc::now(),
        };
        let record = row.into_record();
        assert_eq!(record.filename, "cv_alice.pdf");
        assert_eq!(record.score, "7.2");
        assert_eq!(record.fit, "Medium");
        assert_eq!(record.top_qualifications, "BSc");
        assert_eq!(record.quantifiable_achievements, "Cut p99 latency 40%");
    }
}
