//! index specification parsing for frame selection.

/// outcome of parsing an index specification string.
///
/// the distinction between an empty result and a failed parse matters to
/// callers: an empty specification selects nothing, while an unparseable one
/// falls back to selecting everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIndices {
    /// every token parsed as an integer, kept in input order. an empty or
    /// whitespace-only specification yields an empty list.
    Explicit(Vec<i64>),
    /// at least one token failed to parse. the whole specification is
    /// discarded, never partially recovered.
    Unparseable,
}

/// splits a comma-separated integer specification. tokens are trimmed and
/// empty tokens are dropped, so `"0, 2,"` parses the same as `"0,2"`.
pub fn parse_index_spec(spec: &str) -> ParsedIndices {
    let mut indices = Vec::new();
    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse::<i64>() {
            Ok(index) => indices.push(index),
            Err(_) => return ParsedIndices::Unparseable,
        }
    }
    ParsedIndices::Explicit(indices)
}

/// resolves a specification against a concrete frame count. a parse failure
/// falls back to selecting every frame, and indices outside
/// `[0, frame_count)` are dropped without error.
pub fn resolve_indices(spec: &str, frame_count: usize) -> Vec<usize> {
    match parse_index_spec(spec) {
        ParsedIndices::Explicit(indices) => indices
            .into_iter()
            .filter(|&index| index >= 0 && (index as usize) < frame_count)
            .map(|index| index as usize)
            .collect(),
        ParsedIndices::Unparseable => {
            log::debug!(
                "unparseable index spec {:?}, selecting all {} frames",
                spec,
                frame_count
            );
            (0..frame_count).collect()
        }
    }
}
