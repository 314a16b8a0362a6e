//! Generation Orchestrator: owns the query pipeline.
//!
//! Flow: validating → rate-limiting → composing → generating → parsing →
//!       correcting → length-checking → done.
//!
//! Every stage can end the request with a tagged `ErrorResult`; nothing escapes this
//! boundary as a panic or an untyped error. The model call is never retried.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SearchSettings;
use crate::llm_client::prompts::QUERY_ONLY_INSTRUCTION;
use crate::llm_client::{strip_code_fences, LlmError, ModelParams, TextGenerator};
use crate::search::cache::ResponseCache;
use crate::search::composer::compose_prompt;
use crate::search::detection::DetectionPolicy;
use crate::search::models::{
    CompanyXray, ErrorResult, GeneratedResult, Platform, RefinedQuery, SearchMode, SearchRequest,
    SITE_MARKER,
};
use crate::search::prompts::{
    COMPANY_XRAY_PROMPT_TEMPLATE, COMPANY_XRAY_SYSTEM, REFINE_PROMPT_TEMPLATE,
    REFINE_SYSTEM_TEMPLATE,
};
use crate::search::rate_limiter::RateLimiter;
use crate::search::simplifier::simplify_query;
use crate::search::validator::{validate_input, validate_query};
use crate::search::word_count::{count_query_words, is_query_too_long};

/// Company X-ray queries are structural; a low temperature keeps them stable.
const COMPANY_XRAY_TEMPERATURE: f32 = 0.3;
const MAX_DOMAIN_CHARS: usize = 253;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validating,
    RateLimiting,
    Composing,
    Generating,
    Parsing,
    Correcting,
    LengthChecking,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::RateLimiting => "rate-limiting",
            Stage::Composing => "composing",
            Stage::Generating => "generating",
            Stage::Parsing => "parsing",
            Stage::Correcting => "correcting",
            Stage::LengthChecking => "length-checking",
        };
        f.write_str(name)
    }
}

/// Outcome of the mode-specific correction pass.
#[derive(Debug, PartialEq)]
enum Correction {
    /// X-ray: line 2 carried the real query. Final; no further checks.
    Promoted {
        query: String,
        explanation: Option<String>,
    },
    /// Query (possibly rewritten) that still has to pass validation.
    Query(String),
}

/// A `site:` filter token: starts at a word boundary, its value stops at grouping
/// punctuation.
fn site_filter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\bsite:[^\s()"]*\s*"#).expect("Invalid regex"))
}

/// Rewrites applied after a filter is removed, so the operator it was attached to
/// does not dangle. Applied in order.
fn dangling_operator_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            // empty group
            (r"\(\s*\)", ""),
            // operator right after an opening parenthesis
            (r"\(\s*(?:AND|OR)\b\s*", "("),
            // operator right before a closing parenthesis
            (r"\s*\b(?:AND|OR|NOT)\s*\)", ")"),
            // operator run such as `AND OR`
            (r"\b(AND|OR)(?:\s+(?:AND|OR)\b)+", "$1"),
            (r"^\s*(?:AND|OR)\b\s*", ""),
            (r"\s*\b(?:AND|OR|NOT)\s*$", ""),
        ]
        .into_iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).expect("Invalid regex"), replacement))
        .collect()
    })
}

/// The pipeline service. Rate-limit and cache state live here, so separate instances
/// are fully isolated.
pub struct QueryOrchestrator {
    settings: SearchSettings,
    generator: Arc<dyn TextGenerator>,
    policy: Arc<dyn DetectionPolicy>,
    rate_limiter: RateLimiter,
    cache: ResponseCache,
}

impl QueryOrchestrator {
    pub fn new(
        settings: SearchSettings,
        generator: Arc<dyn TextGenerator>,
        policy: Arc<dyn DetectionPolicy>,
    ) -> Self {
        Self {
            rate_limiter: RateLimiter::new(
                settings.rate_limit_window_ms,
                settings.rate_limit_max_requests,
            ),
            cache: ResponseCache::new(settings.cache_ttl_ms, settings.cache_max_entries),
            settings,
            generator,
            policy,
        }
    }

    fn model_params(&self) -> ModelParams {
        ModelParams {
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_output_tokens,
        }
    }

    /// Turns a candidate description or job posting into a Boolean query.
    pub async fn generate(&self, request: &SearchRequest) -> Result<GeneratedResult, ErrorResult> {
        let request_id = Uuid::new_v4();
        info!(
            "[{request_id}] Generating {:?} query for {} ({} chars)",
            request.mode,
            request.platform.as_str(),
            request.raw_input.chars().count()
        );

        let result = self.run_generate(request_id, request).await;
        match &result {
            Ok(generated) => info!(
                "[{request_id}] Generated query with {} words",
                count_query_words(&generated.query)
            ),
            Err(err) => warn!(
                "[{request_id}] Generation failed ({}): {}",
                err.kind.as_str(),
                err.message
            ),
        }
        result
    }

    async fn run_generate(
        &self,
        request_id: Uuid,
        request: &SearchRequest,
    ) -> Result<GeneratedResult, ErrorResult> {
        let mode = request.mode;
        let max_words = self.settings.max_query_words;

        enter(request_id, Stage::Validating);
        validate_input(&request.raw_input).map_err(|e| ErrorResult::validation(e.to_string()))?;
        self.require_credential()?;

        enter(request_id, Stage::RateLimiting);
        if !self.rate_limiter.check(&request.identity) {
            return Err(ErrorResult::rate_limited());
        }

        enter(request_id, Stage::Composing);
        let is_job_description = self.policy.is_job_description(&request.raw_input);
        let prompt = compose_prompt(
            &request.raw_input,
            request.platform,
            mode,
            is_job_description,
            max_words,
        );

        enter(request_id, Stage::Generating);
        let text = self
            .cache
            .cached_call(
                self.generator.as_ref(),
                &prompt.system,
                &prompt.user,
                self.model_params(),
            )
            .await
            .map_err(upstream_failure)?;

        enter(request_id, Stage::Parsing);
        let lines = self.parse_lines(&text)?;

        enter(request_id, Stage::Correcting);
        let query = match correct_for_mode(&lines, mode) {
            Correction::Promoted { query, explanation } => {
                debug!("[{request_id}] Promoted second line to query");
                return Ok(GeneratedResult { query, explanation });
            }
            Correction::Query(query) => query,
        };

        if !validate_query(&query, mode) {
            return Err(ErrorResult::upstream("query does not look valid"));
        }

        let mut explanation = compose_explanation(&lines, is_job_description);

        if mode == SearchMode::Native {
            return Ok(GeneratedResult { query, explanation });
        }

        enter(request_id, Stage::LengthChecking);
        if !is_query_too_long(&query, max_words) {
            return Ok(GeneratedResult { query, explanation });
        }

        let original_words = count_query_words(&query);
        let simplified = simplify_query(&query, max_words);
        let new_words = count_query_words(&simplified);

        let note = if is_query_too_long(&simplified, max_words) {
            warn!(
                "[{request_id}] Query still too long after simplification: {original_words} -> {new_words} words"
            );
            format!(
                "Warning: the query is still too long after automatic shortening \
                ({new_words} words, originally {original_words}). The search engine only uses \
                the first {max_words} words, so the last criteria may be ignored."
            )
        } else {
            info!("[{request_id}] Query shortened: {original_words} -> {new_words} words");
            format!(
                "Note: the query was shortened automatically from {original_words} to \
                {new_words} words to stay within the {max_words}-word limit."
            )
        };
        append_note(&mut explanation, note);

        Ok(GeneratedResult {
            query: simplified,
            explanation,
        })
    }

    /// Improves an existing query. No rate limiting, length limiting or job-description
    /// handling; the mode is inferred from the query itself.
    pub async fn refine(
        &self,
        existing_query: &str,
        platform: Platform,
    ) -> Result<RefinedQuery, ErrorResult> {
        let request_id = Uuid::new_v4();
        let mode = SearchMode::infer_from_query(existing_query);
        info!(
            "[{request_id}] Refining {:?} query for {}",
            mode,
            platform.as_str()
        );

        validate_input(existing_query).map_err(|e| ErrorResult::validation(e.to_string()))?;
        self.require_credential()?;

        let system = format!(
            "{}\n\n{QUERY_ONLY_INSTRUCTION}",
            REFINE_SYSTEM_TEMPLATE.replace("{platform}", platform.as_str())
        );
        let prompt = REFINE_PROMPT_TEMPLATE.replace("{query}", existing_query.trim());

        let text = self
            .cache
            .cached_call(self.generator.as_ref(), &system, &prompt, self.model_params())
            .await
            .map_err(upstream_failure)?;

        let lines = self.parse_lines(&text)?;
        let query = match correct_for_mode(&lines, mode) {
            Correction::Promoted { query, .. } => query,
            Correction::Query(query) => {
                if !validate_query(&query, mode) {
                    return Err(ErrorResult::upstream("query does not look valid"));
                }
                query
            }
        };

        info!("[{request_id}] Refined query");
        Ok(RefinedQuery { query })
    }

    /// Builds an X-ray query that surfaces a company's team or staff pages.
    pub async fn company_xray(&self, domain: &str) -> Result<CompanyXray, ErrorResult> {
        let domain = normalize_domain(domain)?;
        self.require_credential()?;
        info!("Generating company X-ray query for {domain}");

        let prompt = format!(
            "{}\n\n{QUERY_ONLY_INSTRUCTION}",
            COMPANY_XRAY_PROMPT_TEMPLATE.replace("{domain}", &domain)
        );
        let params = ModelParams {
            temperature: COMPANY_XRAY_TEMPERATURE,
            max_tokens: self.settings.max_output_tokens,
        };

        let text = self
            .cache
            .cached_call(self.generator.as_ref(), COMPANY_XRAY_SYSTEM, &prompt, params)
            .await
            .map_err(upstream_failure)?;

        let query = clean_bare_query(&text);
        if !query.contains(SITE_MARKER) {
            return Err(ErrorResult::upstream("invalid query returned"));
        }

        Ok(CompanyXray { domain, query })
    }

    fn require_credential(&self) -> Result<(), ErrorResult> {
        if self.generator.has_credential() {
            Ok(())
        } else {
            Err(ErrorResult::missing_credential())
        }
    }

    /// Splits a response into trimmed, non-empty lines and rejects filler text.
    fn parse_lines(&self, text: &str) -> Result<Vec<String>, ErrorResult> {
        let lines: Vec<String> = strip_code_fences(text)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let first = lines
            .first()
            .ok_or_else(|| ErrorResult::upstream("no output"))?;
        if self.policy.is_placeholder(first) {
            return Err(ErrorResult::upstream("invalid query returned"));
        }
        Ok(lines)
    }
}

fn enter(request_id: Uuid, stage: Stage) {
    debug!("[{request_id}] -> {stage}");
}

fn upstream_failure(err: LlmError) -> ErrorResult {
    ErrorResult::from_failure_message(err.to_string())
}

fn correct_for_mode(lines: &[String], mode: SearchMode) -> Correction {
    let first = lines.first().map(String::as_str).unwrap_or_default();
    match mode {
        SearchMode::Xray => match lines.get(1) {
            Some(second) if !first.contains(SITE_MARKER) && second.contains(SITE_MARKER) => {
                Correction::Promoted {
                    query: second.clone(),
                    explanation: lines.get(2).cloned(),
                }
            }
            _ => Correction::Query(first.to_string()),
        },
        SearchMode::Native => Correction::Query(strip_site_filters(first)),
    }
}

/// Removes every `site:` filter together with the whitespace that follows it, then
/// drops any operator or group the removal left empty. Parentheses stay balanced.
pub fn strip_site_filters(query: &str) -> String {
    let stripped = match site_filter_regex().replace_all(query, "") {
        Cow::Borrowed(_) => return query.to_string(),
        Cow::Owned(stripped) => stripped,
    };

    let tidied = dangling_operator_rules()
        .iter()
        .fold(stripped, |acc, (rule, replacement)| {
            rule.replace_all(&acc, *replacement).into_owned()
        });
    tidied.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compose_explanation(lines: &[String], is_job_description: bool) -> Option<String> {
    let mut explanation = lines.get(1).cloned()?;
    if is_job_description && lines.len() > 2 {
        explanation.push_str("\n\n");
        explanation.push_str(&lines[2..].join("\n"));
    }
    Some(explanation)
}

fn append_note(explanation: &mut Option<String>, note: String) {
    *explanation = Some(match explanation.take() {
        Some(existing) => format!("{existing}\n\n{note}"),
        None => note,
    });
}

fn normalize_domain(raw: &str) -> Result<String, ErrorResult> {
    let lowered = raw.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let domain = without_scheme
        .trim_end_matches('/')
        .trim_start_matches("www.")
        .to_string();

    if domain.is_empty() {
        return Err(ErrorResult::validation("Domain cannot be empty"));
    }
    if domain.chars().any(char::is_whitespace) || domain.chars().count() > MAX_DOMAIN_CHARS {
        return Err(ErrorResult::validation(format!(
            "'{}' is not a valid domain",
            raw.trim()
        )));
    }
    Ok(domain)
}

/// Takes the first line of a bare-query answer, without code fences or wrapping quotes.
fn clean_bare_query(text: &str) -> String {
    let unfenced = strip_code_fences(text);
    let line = unfenced
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    // A wrapping pair is only removed when that quote appears nowhere else; otherwise
    // the first and last characters belong to quoted phrases of the query itself.
    let cleaned = ['"', '\'', '`']
        .iter()
        .find_map(|&quote| {
            line.strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
                .filter(|inner| !inner.contains(quote))
        })
        .unwrap_or(line);
    cleaned.trim().to_string()
}
