//! Filename sanitization for saving downloads.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Sanitizes a candidate filename so it is a single safe path component.
///
/// - Replaces NUL, `/`, `\`, control characters, whitespace and the
///   characters Windows reserves (`: * ? " < > |`) with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots, spaces and underscores (no hidden files,
///   no `..`)
/// - Limits length to 255 bytes on a char boundary
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let unsafe_char = c == '\0'
            || c == '/'
            || c == '\\'
            || c.is_control()
            || c.is_whitespace()
            || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|');
        if unsafe_char || c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
