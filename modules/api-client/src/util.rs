use crate::types::ParamValue;

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Append percent-encoded `params` to `url`, joining with `&` when the URL
/// already carries a query string.
pub fn with_query(url: &str, params: &[(String, ParamValue)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let query = params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_char_boundary() {
        let text = "Hello 世界";
        let truncated = truncate_to_char_boundary(text, 8);
        assert!(truncated.len() <= 8);
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn test_truncate_within_bounds() {
        assert_eq!(truncate_to_char_boundary("Hello", 100), "Hello");
    }

    #[test]
    fn no_params_leaves_url_alone() {
        assert_eq!(with_query("http://x/api", &[]), "http://x/api");
    }

    #[test]
    fn params_are_encoded_in_order() {
        let params = vec![
            ("q".to_string(), ParamValue::from("cats & dogs")),
            ("page".to_string(), ParamValue::from(2)),
            ("safe".to_string(), ParamValue::from(false)),
        ];
        assert_eq!(
            with_query("http://x/api/search", &params),
            "http://x/api/search?q=cats%20%26%20dogs&page=2&safe=false"
        );
    }

    #[test]
    fn existing_query_string_is_extended() {
        let params = vec![("lang".to_string(), ParamValue::from("zh"))];
        assert_eq!(
            with_query("http://x/api/search?v=1", &params),
            "http://x/api/search?v=1&lang=zh"
        );
    }

    #[test]
    fn keys_are_encoded_too() {
        let params = vec![("a b".to_string(), ParamValue::from("é"))];
        assert_eq!(with_query("http://x", &params), "http://x?a%20b=%C3%A9");
    }
}
