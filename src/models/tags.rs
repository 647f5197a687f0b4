/// Splits a free-text tag string on runs of whitespace.
///
/// Empty tokens are dropped and repeated names keep only their first
/// occurrence, so the result can be stored as-is in `post_tags`.
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    for token in raw.split_whitespace() {
        if !tags.iter().any(|tag| tag == token) {
            tags.push(token.to_string());
        }
    }

    tags
}
