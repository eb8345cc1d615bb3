//! Tolerant markdown-table parser for LLM evaluation output.
//!
//! The evaluation model is asked for a single one-row markdown table, but
//! real responses arrive wrapped in code fences, padded with prose, or
//! with ragged column counts. This parser absorbs that noise; anything it
//! cannot absorb comes back as an error the caller answers with the
//! deterministic fallback scorer. It never panics.

use std::collections::HashMap;

use thiserror::Error;

use crate::screening::report::CandidateRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableParseError {
    #[error("evaluation text is empty")]
    Empty,
    #[error("no markdown table found in evaluation text")]
    NoTable,
}

/// Extracts the seven canonical evaluation fields from `text`.
///
/// Canonical keys absent from the parsed row default to empty strings —
/// the returned record always has every field.
pub fn parse_markdown_table(
    text: &str,
    filename: &str,
) -> Result<CandidateRecord, TableParseError> {
    if text.trim().is_empty() {
        return Err(TableParseError::Empty);
    }

    let unfenced = strip_code_fences(text);
    let lines: Vec<&str> = unfenced
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let (header_line, data_line) = locate_table(&lines).ok_or(TableParseError::NoTable)?;

    let headers = split_row(header_line);
    let mut cells = split_row(data_line);
    // The data row is always reconciled to the header's cardinality.
    cells.resize(headers.len(), String::new());

    let by_header: HashMap<String, String> = headers
        .iter()
        .map(|h| normalize_header(h))
        .zip(cells)
        .collect();

    Ok(CandidateRecord {
        filename: filename.to_string(),
        score: canonical_value(&by_header, "Score"),
        fit: canonical_value(&by_header, "Fit"),
        rationale: canonical_value(&by_header, "Rationale"),
        matched_skills: canonical_value(&by_header, "Matched Skills"),
        missing_skills: canonical_value(&by_header, "Missing Skills"),
        top_qualifications: canonical_value(&by_header, "Top Qualifications"),
        quantifiable_achievements: canonical_value(&by_header, "Quantifiable Achievements"),
    })
}

/// Drops fence marker lines (``` with or without a language tag) anywhere
/// in the text, unwrapping each fenced block to its inner content.
fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Finds the header and data rows of the first usable table block.
///
/// Primary form: a line containing `|` followed by a markdown separator
/// row, with the data row immediately after the separator. Fallback: the
/// first three lines as header/separator/data when the first and third
/// contain `|`.
fn locate_table<'a>(lines: &[&'a str]) -> Option<(&'a str, &'a str)> {
    for i in 0..lines.len() {
        if lines[i].contains('|') && i + 2 < lines.len() && is_separator_row(lines[i + 1]) {
            return Some((lines[i], lines[i + 2]));
        }
    }
    if lines.len() >= 3 && lines[0].contains('|') && lines[2].contains('|') {
        return Some((lines[0], lines[2]));
    }
    None
}

/// A separator row consists only of vertical bars, dashes, colons, and
/// whitespace, with at least one dash.
fn is_separator_row(line: &str) -> bool {
    line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

/// Splits a table row on `|`, trimming cells and discarding the empty
/// fragments produced by leading/trailing delimiters.
fn split_row(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strips everything but letters, digits, and spaces, then trims —
/// absorbs emphasis markers and stray punctuation around header names.
fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Looks up a canonical key: exact normalized header first, then the
/// no-space variant. Missing keys default to empty.
fn canonical_value(by_header: &HashMap<String, String>, key: &str) -> String {
    by_header
        .get(key)
        .or_else(|| by_header.get(&key.replace(' ', "")))
        .cloned()
        .unwrap_or_default()
}
