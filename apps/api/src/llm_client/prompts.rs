// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction appended to every prompt whose answer is a bare search query.
pub const QUERY_ONLY_INSTRUCTION: &str = "\
    Return ONLY the search query. No introduction, no explanation, \
    no Markdown, no code fences, no surrounding quotes.";

/// Operator syntax every Boolean prompt repeats.
pub const BOOLEAN_SYNTAX_RULES: &str = "\
Boolean syntax rules:
- Operators AND, OR, NOT are always UPPERCASE
- Put a space between operators and terms
- Use double quotes for exact phrases: \"software engineer\"
- Use parentheses to group alternatives: (java OR kotlin)";
