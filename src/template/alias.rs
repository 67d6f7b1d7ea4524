use std::collections::BTreeMap;

/// Expand a leading path or URL alias before placeholder substitution.
///
/// Only the start of the template is considered. When several aliases match,
/// the longest one wins so that `@webroot/uploads` takes precedence over
/// `@webroot`. Templates that start with no known alias are returned
/// unchanged.
pub fn expand_aliases(template: &str, aliases: &BTreeMap<String, String>) -> String {
    let mut best: Option<(&str, &str)> = None;
    for (alias, value) in aliases {
        if template.starts_with(alias.as_str())
            && best.is_none_or(|(current, _)| alias.len() > current.len())
        {
            best = Some((alias, value));
        }
    }

    match best {
        Some((alias, value)) => format!("{}{}", value, &template[alias.len()..]),
        None => template.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("@webroot".into(), "/var/www/public".into());
        map.insert("@webroot/uploads".into(), "/mnt/uploads".into());
        map
    }

    #[test]
    fn expands_leading_alias() {
        let result = expand_aliases("@webroot/images/[[pk]].jpg", &aliases());
        assert_eq!(result, "/var/www/public/images/[[pk]].jpg");
    }

    #[test]
    fn prefers_the_longest_matching_alias() {
        let result = expand_aliases("@webroot/uploads/[[pk]].jpg", &aliases());
        assert_eq!(result, "/mnt/uploads/[[pk]].jpg");
    }

    #[test]
    fn leaves_unaliased_templates_unchanged() {
        let result = expand_aliases("/images/[[pk]].jpg", &aliases());
        assert_eq!(result, "/images/[[pk]].jpg");
    }

    #[test]
    fn empty_alias_map_is_a_no_op() {
        let result = expand_aliases("@webroot/x", &BTreeMap::new());
        assert_eq!(result, "@webroot/x");
    }
}
