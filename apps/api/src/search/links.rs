//! Ready-to-open search URLs for a generated query.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::search::models::Platform;

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search?q=";
const LINKEDIN_TALENT_SEARCH_URL: &str = "https://www.linkedin.com/talent/search?keywords=";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchLink {
    pub name: String,
    pub url: String,
}

fn linkedin_site_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)site:linkedin\.com/in\s*").expect("Invalid regex"))
}

/// Google X-ray link for every platform; LinkedIn also gets a Recruiter link with the
/// `site:` filter removed, since Recruiter does not understand it.
pub fn search_links(platform: Platform, query: &str) -> Vec<SearchLink> {
    let query = query.trim();
    let mut links = vec![SearchLink {
        name: "Google X-ray Search".to_string(),
        url: format!("{GOOGLE_SEARCH_URL}{}", urlencoding::encode(query)),
    }];

    if platform == Platform::Linkedin {
        let keywords = linkedin_site_regex().replacen(query, 1, "");
        links.push(SearchLink {
            name: "LinkedIn Recruiter".to_string(),
            url: format!(
                "{LINKEDIN_TALENT_SEARCH_URL}{}",
                urlencoding::encode(keywords.trim())
            ),
        });
    }

    links
}
