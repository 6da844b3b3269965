//! Text parsing for positionally-addressed listing cells

/// Splits a newline-joined metric cell into its value and delta
///
/// The volume and timing cells render as a triple: value, delta icon,
/// delta text. Malformed or missing parts degrade to empty strings; this
/// never fails.
///
/// # Example
///
/// ```
/// use trendlens::extract::parse_triple_cell;
///
/// let (value, delta) = parse_triple_cell("200K+\narrow_upward\n1,000%");
/// assert_eq!(value, "200K+");
/// assert_eq!(delta, "1,000%");
/// ```
pub fn parse_triple_cell(text: &str) -> (String, String) {
    let parts: Vec<&str> = text.split('\n').collect();
    let value = parts
        .first()
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let delta = parts
        .get(2)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    (value, delta)
}

/// Splits an article's "time ● source" block
///
/// Returns `(source, published_at)`; both degrade to empty strings when
/// the separator is missing.
pub fn parse_source_and_time(text: &str) -> (String, String) {
    match text.split_once(" ● ") {
        Some((time, source)) => (source.trim().to_string(), time.trim().to_string()),
        None => (String::new(), String::new()),
    }
}
