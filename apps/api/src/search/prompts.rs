// All LLM prompt constants for the Search module.
// Reuses cross-cutting fragments from llm_client::prompts.
// Placeholders are replaced by the composer: {max_words}, {site_filter}, {platform}, {domain}.

/// Opening statement of every generation system prompt.
pub const PERSONA: &str = "You are an expert sourcing assistant that turns candidate \
    descriptions and job postings into precise Boolean search strings for recruiters.";

/// Google X-ray search on LinkedIn profiles.
pub const LINKEDIN_XRAY_INSTRUCTIONS: &str = r#"TARGET: Google X-ray search on LinkedIn profiles.

- The query MUST start with "{site_filter}" so only public profile pages match
- Group job-title synonyms in parentheses with OR: ("software engineer" OR "software developer")
- Join required criteria (title, core skills, location) with AND
- Wildcards are allowed inside quotes: "java develop*"
- Nested groups are allowed: (("data engineer" OR "ml engineer") AND (python OR scala))
- Exclude noise with a minus sign and no space: -recruiter -"talent acquisition"
- intitle: may be used for the most important job title
- Stay within {max_words} words in total; operators and the site: filter count as words

Good examples:
- site:linkedin.com/in ("software engineer" OR "software developer") AND (java OR kotlin) AND amsterdam -recruiter -"talent acquisition"
- site:linkedin.com/in intitle:developer AND (python OR javascript) AND "5+ years" -intern -internship"#;

/// LinkedIn's own people search box.
pub const LINKEDIN_NATIVE_INSTRUCTIONS: &str = r#"TARGET: LinkedIn native people search.

- NEVER use site:, intitle:, inurl: or any other search-engine filter
- NEVER use wildcards (*); LinkedIn does not support them
- Use NOT instead of a minus sign to exclude terms: NOT recruiter
- Keep it short: 10 to 15 words at most
- One level of parentheses only: ("product owner" OR "product manager") AND agile
- Prefer the job title plus two or three decisive skills; LinkedIn filters handle location and company

Good examples:
- ("java developer" OR "java engineer") AND spring NOT recruiter
- ("data scientist" OR "machine learning engineer") AND python"#;

/// Google X-ray search on public Facebook pages.
pub const FACEBOOK_XRAY_INSTRUCTIONS: &str = r#"TARGET: Google X-ray search on Facebook.

- The query MUST start with "{site_filter}"
- Facebook profiles rarely list skills; focus on job title, employer and city
- Group job-title synonyms in parentheses with OR and join criteria with AND
- Quote employer and city names: "Albert Heijn" AND "Utrecht"
- Exclude noise with a minus sign and no space: -jobs -vacatures
- Stay within {max_words} words in total; operators and the site: filter count as words

Good example:
- site:facebook.com ("verpleegkundige" OR "nurse") AND ("UMC Utrecht" OR "Antonius") AND Utrecht -vacature"#;

/// Facebook's own search box.
pub const FACEBOOK_NATIVE_INSTRUCTIONS: &str = r#"TARGET: Facebook native search.

- NEVER use site:, intitle:, inurl: or any other search-engine filter
- NEVER use wildcards (*)
- Use NOT instead of a minus sign to exclude terms
- Keep it very short: 10 words at most
- Focus on job title, employer and city

Good example:
- ("nurse" OR "verpleegkundige") AND Utrecht"#;

/// Google truncates long queries.
pub const XRAY_LIMITATIONS: &str = "ENGINE LIMITATIONS: Google ignores every word past its \
    word limit, including operators and the site: filter. A query that is too long silently loses \
    its last criteria, so put the must-have criteria first and keep the whole query within \
    {max_words} words.";

pub const LINKEDIN_NATIVE_LIMITATIONS: &str = "ENGINE LIMITATIONS: LinkedIn search prefers \
    short, simple queries. Long or deeply nested queries return few or no results, and \
    unsupported operators are treated as plain keywords.";

pub const FACEBOOK_NATIVE_LIMITATIONS: &str = "ENGINE LIMITATIONS: Facebook search matches \
    names, employers and places far better than skills. Complex Boolean logic is partly \
    ignored, so keep the query minimal.";

/// Added when the input looks like a job posting (native search).
pub const JOB_DESCRIPTION_NATIVE: &str = r#"The input is a job description. First separate the MUST-HAVE criteria from the NICE-TO-HAVE criteria.
Keep only the 3 to 5 most critical must-haves in the query; drop every nice-to-have."#;

/// Added when the input looks like a job posting (X-ray search).
pub const JOB_DESCRIPTION_XRAY: &str = r#"The input is a job description. First separate the MUST-HAVE criteria from the NICE-TO-HAVE criteria.
- Must-haves are the primary terms: join them with AND and put them first
- Nice-to-haves are secondary terms: group them with OR in a single parenthesized group after the must-haves
- Leave out nice-to-haves entirely if the query would exceed the word limit"#;

pub const CHECKLIST_NATIVE: &str = r#"Before answering, check:
- no site: filter and no wildcards
- 15 words or fewer
- operators in UPPERCASE"#;

pub const CHECKLIST_XRAY: &str = r#"Before answering, check:
- the query starts with the site: filter
- every group of synonyms is in parentheses and every exact phrase is in quotes
- operators are UPPERCASE and separated from terms by spaces
- no space between a minus sign and the excluded term
- the query stays within {max_words} words, with the most important criteria first
- no duplicate terms and no synonyms that add nothing"#;

pub const CHECKLIST_JOB_DESCRIPTION: &str =
    "- the must-haves from the job description are all represented";

pub const OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT:
Line 1: the bare Boolean query and nothing else. No preamble such as "Here is the query".
Line 2 (optional): one sentence explaining the strategy."#;

pub const OUTPUT_FORMAT_JOB_DESCRIPTION: &str =
    "Line 3 and further (optional): the identified must-haves and nice-to-haves, one list per line.";

/// Refine prompt. Replace `{platform}` before sending.
pub const REFINE_SYSTEM_TEMPLATE: &str = r#"You are an assistant that refines Boolean search queries for {platform}.
You receive a Boolean query and return an improved version of it.

Tips for refining:
- Use more specific search terms
- Add useful synonyms
- Optimise the Boolean operators (AND, OR, NOT)
- Remove irrelevant terms
- Keep any site:, intitle: or inurl: filters that are already present; do not add site: when it is absent
- Group related terms with parentheses and quote exact phrases
- Fix syntax and spacing"#;

pub const REFINE_PROMPT_TEMPLATE: &str = "Refine the following Boolean query: {query}";

pub const COMPANY_XRAY_SYSTEM: &str = "You are an expert in Google X-ray queries. \
    You return ONLY the bare query without any extra text.";

/// Company team page discovery. Replace `{domain}` before sending.
pub const COMPANY_XRAY_PROMPT_TEMPLATE: &str = r#"Generate a Google X-ray query that finds the team or staff pages of the company with this website: {domain}
Use only structural filters such as inurl: and intitle:. Do not add job titles or e-mail addresses.

Example:
site:teamleader.eu (intitle:"team" OR intitle:"about us" OR inurl:team OR inurl:about OR inurl:staff OR inurl:people OR inurl:company)"#;
