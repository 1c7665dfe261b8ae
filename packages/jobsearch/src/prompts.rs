//! Instruction templates for the four stages.
//!
//! Templates use `{name}` placeholders filled from the run's parameter
//! bindings. A placeholder left unresolved after substitution is a
//! configuration error, raised before the capability is invoked.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{PipelineError, Result};

/// Stage 1: generate search-engine queries.
pub const QUERY_GENERATION_PROMPT: &str = "\
You are an expert at constructing search engine queries that maximize the \
relevancy of job search results.

Generate up to {query_budget} Google job search queries for the following \
job titles: {job_titles}. Focus on jobs in {country}, in {language}. \
Leverage Google search operators (quotes, OR, intitle:, inurl:) and best \
practices. Every query must be non-empty.";

/// Stage 2: collect search results through the search tool.
pub const SEARCH_COLLECTION_PROMPT: &str = "\
You are a specialist in gathering and filtering job postings from multiple \
sources.

Using the suggested search queries from the prior stage, call the `search` \
tool for each query and collect at least {min_hits} job postings in \
{country}. For each result include its title, URL, snippet, and the exact \
originating query that surfaced it. Prefer direct job posting pages over \
aggregator landing pages.";

/// Stage 3: extract structured details through the scrape tool.
pub const JOB_EXTRACTION_PROMPT: &str = "\
You are an expert at parsing job details for candidate decision-making.

For each collected posting URL from the prior stage, call the `scrape` tool \
to extract structured details: title, company, location, posting date, \
salary (only if the posting discloses one), and up to 5 notable \
specifications such as seniority or remote policy. Rank each job with a \
small positive ordinal (1 = strongest recommendation) and add \
recommendation notes for the candidate. If a scrape returns an error \
field, skip that posting and move on.";

/// Stage 4: compose the recruitment report.
pub const REPORT_PROMPT: &str = "\
You are an expert in creating clear, actionable recruitment reports.

Create a Bootstrap-styled HTML page summarizing the extracted job postings \
for {job_titles} in {country}, written in {language}. Include a responsive \
table with job title, company, location, posting date, salary where \
available, a direct link to each posting, and a short summary per job. \
Order rows by recommendation rank. Return only the HTML document.";

/// Render a template by substituting `{name}` placeholders.
///
/// Fails fast when a placeholder has no binding; the error names the
/// placeholder so the misconfiguration is obvious.
pub fn render(template: &str, bindings: &HashMap<String, String>) -> Result<String> {
    let mut rendered = template.to_string();
    for (name, value) in bindings {
        rendered = rendered.replace(&format!("{{{name}}}"), value);
    }

    // Leftover {lower_snake} markers are unbound placeholders. JSON braces
    // in rendered content never match this shape.
    let placeholder =
        Regex::new(r"\{([a-z_]+)\}").map_err(|e| PipelineError::config(e.to_string()))?;
    if let Some(captures) = placeholder.captures(&rendered) {
        return Err(PipelineError::config(format!(
            "unresolved placeholder '{{{}}}' in instruction template",
            &captures[1]
        )));
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_all_placeholders() {
        let rendered = render(
            QUERY_GENERATION_PROMPT,
            &bindings(&[
                ("query_budget", "5"),
                ("job_titles", "Data Engineer"),
                ("country", "France"),
                ("language", "French"),
            ]),
        )
        .unwrap();
        assert!(rendered.contains("up to 5 Google job search queries"));
        assert!(rendered.contains("Data Engineer"));
        assert!(!rendered.contains('{'));
    }

    #[test]
    fn missing_binding_is_a_config_error() {
        let err = render(
            QUERY_GENERATION_PROMPT,
            &bindings(&[("query_budget", "5"), ("job_titles", "Data Engineer")]),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));
        assert!(err.to_string().contains("{country}"));
    }

    #[test]
    fn json_braces_in_substituted_values_are_not_placeholders() {
        let rendered = render(
            "Schema: {schema}",
            &bindings(&[("schema", r#"{"type": "object", "properties": {}}"#)]),
        )
        .unwrap();
        assert!(rendered.contains(r#"{"type": "object""#));
    }

    #[test]
    fn all_stage_templates_render_with_standard_bindings() {
        let all = bindings(&[
            ("query_budget", "10"),
            ("job_titles", "AI Engineer"),
            ("country", "Egypt"),
            ("language", "English"),
            ("min_hits", "20"),
        ]);
        for template in [
            QUERY_GENERATION_PROMPT,
            SEARCH_COLLECTION_PROMPT,
            JOB_EXTRACTION_PROMPT,
            REPORT_PROMPT,
        ] {
            assert!(render(template, &all).is_ok());
        }
    }
}
