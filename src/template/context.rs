use std::collections::BTreeMap;

/// Token values available during one resolution pass.
///
/// The well-known tokens (`pk`, `extension`, `profile`) have dedicated
/// constructors but are stored like any other token; callers are free to
/// supply additional names.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    tokens: BTreeMap<String, String>,
}

impl TemplateContext {
    /// Empty context. Resolving against it leaves every placeholder intact.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `pk` token.
    pub fn with_pk(self, pk: impl Into<String>) -> Self {
        self.with_token("pk", pk)
    }

    /// Set the `extension` token.
    pub fn with_extension(self, extension: impl Into<String>) -> Self {
        self.with_token("extension", extension)
    }

    /// Set the `profile` token.
    pub fn with_profile(self, profile: impl Into<String>) -> Self {
        self.with_token("profile", profile)
    }

    /// Set an arbitrary token.
    pub fn with_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(name.into(), value.into());
        self
    }

    /// Value for a token, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }
}
