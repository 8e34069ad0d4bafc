const MAX_VISIBLE_CHARS: usize = 80;

const SECRET_MARKERS: [&str; 4] = ["Bearer ", "api_key=", "api-key: ", "token="];

/// Bounded, single-line excerpt of user text or a transcript for log lines.
///
/// Dictations carry patient data, so logs only ever see the head of the text
/// plus its length. Credential-looking tokens are masked.
pub fn log_excerpt(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = collapsed.chars().count();
    let excerpt = if total > MAX_VISIBLE_CHARS {
        let head: String = collapsed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", head, total)
    } else {
        collapsed
    };

    mask_secrets(&excerpt)
}

fn mask_secrets(text: &str) -> String {
    let mut result = text.to_string();
    for marker in SECRET_MARKERS {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(marker) {
            let value_start = search_from + found + marker.len();
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
