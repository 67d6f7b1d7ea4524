//! Placeholder template resolution for asset paths and URLs.
//!
//! Templates are plain strings containing `[[token]]` placeholders. The
//! resolver is pure string transformation: recognized tokens are substituted
//! from a [`TemplateContext`], everything else (unknown tokens, unbalanced
//! brackets) passes through verbatim so that templates can be resolved in
//! stages. Prefix aliases are expanded separately, before substitution.

mod alias;
mod context;
mod resolve;

pub use alias::expand_aliases;
pub use context::TemplateContext;
pub use resolve::resolve_template;
