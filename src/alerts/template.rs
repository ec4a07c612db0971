//! Alert message templating.
//!
//! `$name` / `${name}` placeholder substitution with relaxed semantics:
//! a placeholder with no matching value is left verbatim and `$$` escapes
//! a literal dollar sign. Substitution can never fail — a missing field in
//! one feed record must not crash alert delivery for the rest.

use std::collections::BTreeMap;

/// The per-connection alert template sent to the main channel.
pub const CONNECTION_ALERT_TEMPLATE: &str = "Source system signature $signatureId:\n\
     $sourceSolarSystem\n\
     Destination system signature $wormholeDestinationSignatureId:\n\
     $destinationSolarSystem";

/// Substitute `$name` and `${name}` placeholders from `values`.
///
/// Unknown placeholders stay verbatim; `$$` renders a literal `$`; a `$`
/// not introducing a valid placeholder is passed through unchanged.
pub fn format_message(template: &str, values: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some((_, '$')) => {
                chars.next();
                out.push('$');
            }
            Some((brace_start, '{')) => {
                chars.next();
                let name_start = brace_start + 1;
                let mut name_end = name_start;
                let mut closed = false;
                for (idx, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        name_end = idx;
                        break;
                    }
                }
                let name = &template[name_start..name_end.max(name_start)];
                if closed && is_identifier(name) {
                    match values.get(name) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&template[start..name_end + 1]),
                    }
                } else if closed {
                    out.push_str(&template[start..name_end + 1]);
                } else {
                    out.push_str(&template[start..]);
                    break;
                }
            }
            _ => {
                let name_start = start + 1;
                let mut name_end = name_start;
                while let Some(&(idx, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        chars.next();
                        name_end = idx + c.len_utf8();
                    } else {
                        break;
                    }
                }
                let name = &template[name_start..name_end];
                if is_identifier(name) {
                    match values.get(name) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&template[start..name_end]),
                    }
                } else {
                    out.push('$');
                }
            }
        }
    }

    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
