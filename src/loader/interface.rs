use crate::error::Result;

/// Trait for resolving theme templates from different stores.
///
/// Implementations may be backed by the filesystem, an embedded bundle,
/// or a remote store; the engine only sees template text.
pub trait TemplateSource {
    /// Resolves a template by theme and name, walking the fallback chain.
    ///
    /// # Arguments
    /// * `theme` - Active theme name
    /// * `template` - Template name, with or without extension
    ///
    /// # Returns
    /// * `Result<String>` - Raw template text, or `Error::TemplateNotFound`
    ///   when the whole chain is exhausted
    fn resolve(&self, theme: &str, template: &str) -> Result<String>;

    /// Reads a module file from the theme's template directory.
    ///
    /// Modules are lenient: a missing file is `None`, never an error.
    fn load_module(&self, theme: &str, name: &str) -> Option<String>;
}
