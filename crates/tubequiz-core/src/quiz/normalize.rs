/// Remove whitespace and a surrounding markdown code fence (```` ``` ```` or
/// ```` ```json ````) from a model response. Text without fences is only trimmed.
pub fn strip_code_fences(response: &str) -> &str {
    let mut body = response.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // The opening fence line may carry a language tag.
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }

    body = body.trim_end();
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"questions\": []}\n```";
        assert_eq!(strip_code_fences(raw), "{\"questions\": []}");
    }

    #[test]
    fn strips_bare_fence_and_surrounding_whitespace() {
        let raw = "\n\n```\nQuestion 1: Why?\n```  \n";
        assert_eq!(strip_code_fences(raw), "Question 1: Why?");
    }

    #[test]
    fn single_line_fence() {
        assert_eq!(strip_code_fences("```json{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fences(""), "");
    }
}
