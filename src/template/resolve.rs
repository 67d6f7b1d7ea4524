use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::TemplateContext;

/// Matches `[[token]]` where the token is made of word characters or slashes.
/// Anything else, including unbalanced brackets, is not a placeholder.
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[\[([\w/]+)\]\]").expect("invalid placeholder regex"))
}

/// Substitute every recognized `[[token]]` placeholder in `template`.
///
/// Tokens absent from the context stay verbatim in the output, which allows
/// staged resolution: a first pass may fill in `profile` while a later one
/// supplies `extension`. Resolution is deterministic and side-effect-free,
/// and re-resolving an already fully resolved string is a no-op.
pub fn resolve_template(template: &str, context: &TemplateContext) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            match context.get(name) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
