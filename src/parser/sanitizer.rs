//! Repair of unescaped operator names in metrix++ reports.
//!
//! metrix++ writes C++ operator names such as `operator<<` straight into XML
//! attributes, which is not well-formed XML. The sanitizer escapes the markup
//! characters of those names so the structural parse can succeed.

use crate::utils::config::OPERATOR_TOKENS;

const OPERATOR_KEYWORD: &str = "operator";

/// Escape every known operator token in the raw report
///
/// **Public** - used by the report reader on the retry path
///
/// Covers `operator<<`, `operator>>`, `operator<`, `operator>`, `operator<=`,
/// `operator>=`, `operator&`, `operator&&`, and the same names with one space
/// after the keyword. Tokens that are already escaped are left alone, so
/// `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let mut sanitized = String::with_capacity(raw.len() + 32);
    let mut rest = raw;

    while let Some(pos) = rest.find(OPERATOR_KEYWORD) {
        let after_keyword = pos + OPERATOR_KEYWORD.len();
        sanitized.push_str(&rest[..after_keyword]);
        rest = &rest[after_keyword..];

        let (space, tail) = match rest.strip_prefix(' ') {
            Some(tail) => (" ", tail),
            None => ("", rest),
        };

        if let Some(token) = match_operator_token(tail) {
            sanitized.push_str(space);
            push_escaped(&mut sanitized, token);
            rest = &tail[token.len()..];
        }
    }

    sanitized.push_str(rest);
    sanitized
}

/// Longest operator token at the start of `text`, unless it is already an entity
fn match_operator_token(text: &str) -> Option<&'static str> {
    if starts_with_entity(text) {
        return None;
    }
    OPERATOR_TOKENS
        .iter()
        .copied()
        .find(|token| text.starts_with(token))
}

/// True if `text` starts with a character or entity reference like `&lt;` or `&#60;`
fn starts_with_entity(text: &str) -> bool {
    let Some(body) = text.strip_prefix('&') else {
        return false;
    };
    let name_len = body
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'#')
        .count();
    name_len > 0 && body[name_len..].starts_with(';')
}

fn push_escaped(out: &mut String, token: &str) {
    for c in token.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            other => out.push(other),
        }
    }
}
