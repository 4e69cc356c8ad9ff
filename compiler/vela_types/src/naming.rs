//! Enum constant lookup by text.

use std::rc::Rc;

/// `darkBlue` -> `DARK_BLUE`
///
/// An underscore goes before every uppercase letter that follows a
/// lowercase letter or a digit; everything is then uppercased.
pub fn constant_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    for c in name.chars() {
        if c.is_uppercase() && previous.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push('_');
        }
        out.extend(c.to_uppercase());
        previous = Some(c);
    }
    out
}

/// Find the constant `text` names.
///
/// Tried in order: exact match, ASCII case-insensitive match, exact match
/// of the constant-case form of `text`.
pub fn match_enum_constant<'a>(constants: &'a [Rc<str>], text: &str) -> Option<&'a Rc<str>> {
    constants
        .iter()
        .find(|c| &***c == text)
        .or_else(|| constants.iter().find(|c| c.eq_ignore_ascii_case(text)))
        .or_else(|| {
            let wanted = constant_case(text);
            constants.iter().find(|c| ***c == *wanted)
        })
}

#[cfg(test)]
mod tests;
