//! Text heuristics used by the pipeline, pluggable so locale-specific rules can be swapped.
//!
//! Default: `MarkerDetectionPolicy` (plain substring matching, Dutch + English markers).
//! The orchestrator holds an `Arc<dyn DetectionPolicy>`.

/// Inputs longer than this many characters are treated as job postings.
const JOB_DESCRIPTION_MIN_CHARS: usize = 200;

/// Matched case-sensitively.
const JOB_DESCRIPTION_MARKERS: &[&str] = &[
    "functie",
    "vacature",
    "job description",
    "requirements",
    "qualifications",
    "verantwoordelijkheden",
    "wij bieden",
    "wij zoeken",
    "must have",
    "nice to have",
];

/// Phrases that give away a preamble or template instead of a query. Lowercase;
/// matched case-insensitively.
const PLACEHOLDER_MARKERS: &[&str] = &["hier is", "[boolean", "boolean string", "zoekstring"];

pub trait DetectionPolicy: Send + Sync {
    /// Whether the user pasted a job posting rather than a short candidate description.
    fn is_job_description(&self, input: &str) -> bool;

    /// Whether a response line is filler text instead of a query.
    fn is_placeholder(&self, line: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct MarkerDetectionPolicy {
    pub min_job_description_chars: usize,
    pub job_description_markers: Vec<String>,
    pub placeholder_markers: Vec<String>,
}

impl Default for MarkerDetectionPolicy {
    fn default() -> Self {
        Self {
            min_job_description_chars: JOB_DESCRIPTION_MIN_CHARS,
            job_description_markers: JOB_DESCRIPTION_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            placeholder_markers: PLACEHOLDER_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl DetectionPolicy for MarkerDetectionPolicy {
    fn is_job_description(&self, input: &str) -> bool {
        input.chars().count() > self.min_job_description_chars
            || self
                .job_description_markers
                .iter()
                .any(|marker| input.contains(marker.as_str()))
    }

    fn is_placeholder(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.placeholder_markers
            .iter()
            .any(|marker| lower.contains(&marker.to_lowercase()))
    }
}
