//! Input predicates used to gate form submission.
//!
//! All functions are pure and total.

use once_cell::sync::Lazy;
use regex::Regex;

/// Local parts that may not be registered.
pub const RESERVED_LOCAL_PARTS: [&str; 9] = [
    "abuse",
    "admin",
    "administrator",
    "hostmaster",
    "majordomo",
    "postmaster",
    "root",
    "ssl-admin",
    "webmaster",
];

const MAX_DOMAIN_LEN: usize = 253;

// Anchored at the end of the text preceding '@', so the leftmost match is the
// longest allowed run (at most 64 chars) that touches the '@'.
static LOCAL_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9\-_'.]{1,64}$").expect("local part pattern"));

static DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9\-]+\.[a-z.]{2,}").expect("domain pattern"));

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern"));

/// Email check following Google's username and domain guidelines.
///
/// The match is unanchored: `User@example.com` passes on `ser@example.com`.
/// Everything after the `@` must start with a lowercase letter, be at most
/// 253 chars, hold no line terminator and not end with a dot.
pub fn is_valid_email(email: &str) -> bool {
    for (at, _) in email.match_indices('@') {
        let Some(local) = LOCAL_PART.find(&email[..at]) else {
            continue;
        };
        let rest = &email[at + 1..];
        if !domain_shape_ok(rest) {
            continue;
        }
        let Some(domain) = DOMAIN.find(rest) else {
            continue;
        };

        let user_name = local.as_str();
        if user_name.starts_with('.') || user_name.ends_with('.') {
            return false;
        }
        if RESERVED_LOCAL_PARTS.contains(&user_name) {
            return false;
        }
        tracing::trace!(user_name, domain = domain.as_str(), "Email accepted");
        return true;
    }
    false
}

fn domain_shape_ok(rest: &str) -> bool {
    let len = rest.chars().count();
    rest.starts_with(|c: char| c.is_ascii_lowercase())
        && (2..=MAX_DOMAIN_LEN).contains(&len)
        && !rest.contains(is_line_terminator)
        && !rest.ends_with('.')
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// True only for the empty string; whitespace counts as content.
pub fn is_empty(value: &str) -> bool {
    value.is_empty()
}

pub fn is_equal(a: &str, b: &str) -> bool {
    a == b
}

/// `YYYY-MM-DD` digits only. `2024-99-99` passes.
pub fn is_valid_date(date: &str) -> bool {
    DATE.is_match(date)
}

/// Field-level format hint: empty fields are never flagged as malformed.
pub fn field_format_ok(value: &str, check: impl Fn(&str) -> bool) -> bool {
    is_empty(value) || check(value)
}

/// Autocomplete candidates: every ticker containing `input`.
pub fn suggest_tickers<'a, I>(tickers: I, input: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if input.is_empty() {
        return Vec::new();
    }
    tickers
        .into_iter()
        .filter(|ticker| ticker.contains(input))
        .map(str::to_string)
        .collect()
}
