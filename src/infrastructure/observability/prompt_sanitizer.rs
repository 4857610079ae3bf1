const MAX_VISIBLE_CHARS: usize = 100;

const SENSITIVE_PATTERNS: [&str; 6] = [
    "Bearer ",
    "api_key=",
    "key=",
    "password=",
    "secret=",
    "token=",
];

/// Shortens user text or prompts for logs and masks credential-looking values.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    let sanitized = if total_chars > MAX_VISIBLE_CHARS {
        let visible: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", visible, total_chars)
    } else {
        trimmed.to_string()
    };

    redact_sensitive_patterns(&sanitized)
}

fn redact_sensitive_patterns(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in SENSITIVE_PATTERNS {
        let pattern = pattern.to_ascii_lowercase();
        let mut search_from = 0;
        // ASCII lowercasing keeps byte offsets aligned with `result`.
        while let Some(found) = result.to_ascii_lowercase()[search_from..].find(&pattern) {
            let value_start = search_from + found + pattern.len();
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result.replace_range(value_start..value_end, "[REDACTED]");
            search_from = value_start + "[REDACTED]".len();
        }
    }
    result
}
