//! Prompt Composer: builds the system/user prompt pair for a search request.
//!
//! System prompt layout:
//!   persona → platform/mode instructions → engine limitations →
//!   [job-description guidance] → checklist → shared syntax rules → output format

use crate::llm_client::prompts::BOOLEAN_SYNTAX_RULES;
use crate::search::models::{Platform, SearchMode};
use crate::search::prompts::{
    CHECKLIST_JOB_DESCRIPTION, CHECKLIST_NATIVE, CHECKLIST_XRAY, FACEBOOK_NATIVE_INSTRUCTIONS,
    FACEBOOK_NATIVE_LIMITATIONS, FACEBOOK_XRAY_INSTRUCTIONS, JOB_DESCRIPTION_NATIVE,
    JOB_DESCRIPTION_XRAY, LINKEDIN_NATIVE_INSTRUCTIONS, LINKEDIN_NATIVE_LIMITATIONS,
    LINKEDIN_XRAY_INSTRUCTIONS, OUTPUT_FORMAT, OUTPUT_FORMAT_JOB_DESCRIPTION, PERSONA,
    XRAY_LIMITATIONS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub system: String,
    pub user: String,
}

pub fn instruction_block(platform: Platform, mode: SearchMode) -> &'static str {
    match (platform, mode) {
        (Platform::Linkedin, SearchMode::Xray) => LINKEDIN_XRAY_INSTRUCTIONS,
        (Platform::Linkedin, SearchMode::Native) => LINKEDIN_NATIVE_INSTRUCTIONS,
        (Platform::Facebook, SearchMode::Xray) => FACEBOOK_XRAY_INSTRUCTIONS,
        (Platform::Facebook, SearchMode::Native) => FACEBOOK_NATIVE_INSTRUCTIONS,
    }
}

pub fn limitation_block(platform: Platform, mode: SearchMode) -> &'static str {
    match (platform, mode) {
        (_, SearchMode::Xray) => XRAY_LIMITATIONS,
        (Platform::Linkedin, SearchMode::Native) => LINKEDIN_NATIVE_LIMITATIONS,
        (Platform::Facebook, SearchMode::Native) => FACEBOOK_NATIVE_LIMITATIONS,
    }
}

/// Builds the prompts for one generation. The raw input is the user turn verbatim.
pub fn compose_prompt(
    raw_input: &str,
    platform: Platform,
    mode: SearchMode,
    is_job_description: bool,
    max_words: usize,
) -> ComposedPrompt {
    let mut sections: Vec<&str> = vec![
        PERSONA,
        instruction_block(platform, mode),
        limitation_block(platform, mode),
    ];

    if is_job_description {
        sections.push(match mode {
            SearchMode::Native => JOB_DESCRIPTION_NATIVE,
            SearchMode::Xray => JOB_DESCRIPTION_XRAY,
        });
    }

    let checklist = match mode {
        SearchMode::Native => CHECKLIST_NATIVE,
        SearchMode::Xray => CHECKLIST_XRAY,
    };
    let checklist = if is_job_description {
        format!("{checklist}\n{CHECKLIST_JOB_DESCRIPTION}")
    } else {
        checklist.to_string()
    };

    let output_format = if is_job_description {
        format!("{OUTPUT_FORMAT}\n{OUTPUT_FORMAT_JOB_DESCRIPTION}")
    } else {
        OUTPUT_FORMAT.to_string()
    };

    let system = sections
        .into_iter()
        .chain([
            checklist.as_str(),
            BOOLEAN_SYNTAX_RULES,
            output_format.as_str(),
        ])
        .collect::<Vec<_>>()
        .join("\n\n")
        .replace("{site_filter}", platform.site_filter())
        .replace("{max_words}", &max_words.to_string());

    ComposedPrompt {
        system,
        user: raw_input.to_string(),
    }
}
