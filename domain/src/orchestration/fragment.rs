//! Splitting finished text into stream fragments

/// Split `text` into fragments on paragraph boundaries.
///
/// Each fragment keeps its trailing blank-line separator, so concatenating
/// the fragments yields `text` exactly. Empty input yields no fragments.
pub fn fragments(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("\n\n") {
        let mut end = pos + 2;
        while rest[end..].starts_with('\n') {
            end += 1;
        }
        out.push(&rest[..end]);
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}
