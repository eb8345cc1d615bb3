#![allow(dead_code)]

// All LLM prompt constants for the Screening module.
// Cross-cutting fragments live in llm_client::prompts.

use crate::screening::fallback::RubricWeights;

/// Extraction prompt template. Replace `{jd_text}` and `{cv_text}` before
/// sending. Field names match `CandidateExtraction` exactly.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are a meticulous data extraction assistant. Analyze a candidate's CV against a job description (JD) and extract every piece of relevant information. Do NOT perform any scoring or filtering.

Return a JSON object with this EXACT schema (no extra fields):
{
  "matched_skills": ["skill present in both JD and CV"],
  "missing_skills": ["JD skill absent from the CV"],
  "top_qualifications": ["degree, certification, or license"],
  "quantifiable_achievements": ["achievement with numbers, percentages, currency, or metrics"],
  "relevant_experience_summary": "1-2 paragraph summary of work history as it relates to the JD",
  "years_of_experience": 5,
  "education_level": "Bachelor's | Master's | PhD | ..."
}

Rules:
1. matched_skills: list ALL skills from the JD present in the CV.
2. missing_skills: list ALL skills from the JD not present in the CV.
3. top_qualifications: list ALL relevant degrees, certifications, and licenses.
4. quantifiable_achievements: find ALL achievements carrying a number, percentage, currency amount, or metric (e.g. "managed a team of 10", "increased revenue by 15%").
5. years_of_experience: total years of professional experience, as a number.
6. education_level: highest degree earned.

JD:
{jd_text}

CV:
{cv_text}"#;

/// System prompt for the evaluation step — the response must be a single
/// markdown table, nothing else.
pub const EVALUATION_SYSTEM: &str = "You are a strict HR evaluation engine. \
    You MUST respond with a single Markdown table and nothing else. \
    Do NOT include any prose before or after the table. \
    Do NOT wrap the table in code fences.";

/// Evaluation prompt template. Weight placeholders are filled by
/// `build_evaluation_prompt`.
const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate a candidate from the complete set of extracted data below and produce a final, summarized evaluation in a Markdown table. Apply heuristics to ensure the score is highly accurate and does not miss any critical connections.

Evaluation hierarchy:
1. Prioritize full-time work experience — the most important factor.
2. Next, consider relevant internships.
3. Finally, use projects, open-source work, and certifications as supporting evidence.

Evaluation rubric (scoring 1-10), weighted as follows:
* Matched Skills ({matched_skills_w}%)
* Experience Relevance ({experience_relevance_w}%)
* Qualifications & Achievements ({qualifications_w}%)
* Depth & Seniority ({seniority_w}%)
* CV Clarity ({cv_clarity_w}%)

* Fit: High (>=8), Medium (5-7), Low (<=4).
* Rationale: a single, concise, factual sentence that directly explains why the score is high or low.
* Matched Skills: the top 3-5 most important matched skills.
* Missing Skills: the top 3-5 most critical missing skills.
* Top Qualifications: the top 2 most impressive qualifications.
* Quantifiable Achievements: the top 2-3 most impactful achievements.

Candidate data:
{candidate_data_json}

Output a single Markdown table with these headers in this exact order: `Score`, `Fit`, `Rationale`, `Matched Skills`, `Missing Skills`, `Top Qualifications`, `Quantifiable Achievements`.

| Score | Fit | Rationale | Matched Skills | Missing Skills | Top Qualifications | Quantifiable Achievements |
|---|---|---|---|---|---|---|"#;

/// Appended when the user supplied critical skills.
const CRITICAL_SKILL_HEURISTIC_TEMPLATE: &str = r#"

Critical skill heuristic:
* A candidate missing any of the following skills must be severely penalized regardless of other factors. The score must be 4 or lower if any of these are missing: {critical_skills}."#;

/// Builds the rubric-parameterized evaluation prompt for one candidate.
pub fn build_evaluation_prompt(
    candidate_data_json: &str,
    weights: &RubricWeights,
    critical_skills: &[String],
) -> String {
    let mut prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{matched_skills_w}", &weights.matched_skills.to_string())
        .replace(
            "{experience_relevance_w}",
            &weights.experience_relevance.to_string(),
        )
        .replace("{qualifications_w}", &weights.qualifications.to_string())
        .replace("{seniority_w}", &weights.seniority.to_string())
        .replace("{cv_clarity_w}", &weights.cv_clarity.to_string())
        .replace("{candidate_data_json}", candidate_data_json);

    if !critical_skills.is_empty() {
        prompt.push_str(
            &CRITICAL_SKILL_HEURISTIC_TEMPLATE
                .replace("{critical_skills}", &critical_skills.join(", ")),
        );
    }

    prompt
}

/// System prompt for the strengths/weaknesses analysis — plain prose.
pub const ANALYSIS_SYSTEM: &str = "You are an expert HR analyst. \
    Respond with concise, professional prose. No markdown tables.";

/// Strengths/weaknesses prompt template. Replace `{candidate_data_json}`
/// and `{jd_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Based on the following candidate data and JD, provide a concise, professional analysis of the candidate's strengths and weaknesses.

* Strengths: a single paragraph (2-3 sentences) summarizing the candidate's top strengths — their most relevant skills, experience, and quantifiable achievements.
* Weaknesses: a single paragraph (2-3 sentences) summarizing key weaknesses — critical missing skills, lack of relevant experience for the role, or other significant gaps.

Candidate data:
{candidate_data_json}

JD:
{jd_text}"#;
