//! Report assembly — the flat per-candidate record, ranking helpers, fit
//! tallies, and CSV export in the fixed column order consumed by
//! spreadsheet tooling.

use serde::{Deserialize, Serialize};

/// CSV column order. `filename` first, then the seven evaluation columns.
pub const CSV_COLUMNS: [&str; 8] = [
    "filename",
    "Score",
    "Fit",
    "Rationale",
    "Matched Skills",
    "Missing Skills",
    "Top Qualifications",
    "Quantifiable Achievements",
];

/// The unit record of an evaluation run: one row per candidate, created
/// once and immutable after. All values are display strings — either
/// table cells from the LLM evaluation or formatted fallback output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub filename: String,
    pub score: String,
    pub fit: String,
    pub rationale: String,
    pub matched_skills: String,
    pub missing_skills: String,
    pub top_qualifications: String,
    pub quantifiable_achievements: String,
}

/// Per-fit summary counts shown at the top of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Numeric value of a display score for ranking. Unparseable scores sink
/// below every real score.
pub fn score_value(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NEG_INFINITY)
}

/// Tallies High/Medium/Low fits. Unrecognized labels count as nothing.
pub fn fit_counts<'a>(records: impl IntoIterator<Item = &'a CandidateRecord>) -> FitCounts {
    let mut counts = FitCounts::default();
    for record in records {
        match record.fit.trim() {
            "High" => counts.high += 1,
            "Medium" => counts.medium += 1,
            "Low" => counts.low += 1,
            _ => {}
        }
    }
    counts
}

/// Serializes records to CSV in `CSV_COLUMNS` order. Empty input yields
/// an empty string, not a lone header row.
pub fn to_csv_string(records: &[CandidateRecord]) -> anyhow::Result<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.write_record([
            record.filename.as_str(),
            record.score.as_str(),
            record.fit.as_str(),
            record.rationale.as_str(),
            record.matched_skills.as_str(),
            record.missing_skills.as_str(),
            record.top_qualifications.as_str(),
            record.quantifiable_achievements.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSV writer flush failed: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}
