//! The template rendering engine: context construction, directive
//! processing, and the orchestrating [`ThemeRenderer`] entry point.

pub mod context;
mod directives;
pub mod interface;

pub use context::{
    build_context, is_truthy, normalize_theme_options, RenderContext, ThemeOptions,
};
pub use interface::{
    MenuRenderer, NullMenuRenderer, NullWidgetRenderer, WidgetRenderer,
};

use crate::error::Result;
use crate::loader::TemplateSource;
use directives::DirectiveProcessor;
use log::debug;
use serde_json::{Map, Value};

/// Renders theme templates for one site configuration.
///
/// Holds the active theme name, the normalized theme options, and the
/// collaborators the directive language reaches into. Template text and
/// the render context are constructed fresh per call; the renderer itself
/// never mutates between calls, so one instance can serve many renders.
pub struct ThemeRenderer<'a> {
    theme: String,
    options: ThemeOptions,
    source: &'a dyn TemplateSource,
    menus: &'a dyn MenuRenderer,
    widgets: &'a dyn WidgetRenderer,
}

impl<'a> ThemeRenderer<'a> {
    /// Creates a renderer for the given theme.
    ///
    /// # Arguments
    /// * `theme` - Active theme name
    /// * `options` - Theme options as persisted; normalized here
    /// * `source` - Template store the theme resolves against
    /// * `menus` - Menu rendering collaborator
    /// * `widgets` - Sidebar rendering collaborator
    pub fn new(
        theme: impl Into<String>,
        options: &ThemeOptions,
        source: &'a dyn TemplateSource,
        menus: &'a dyn MenuRenderer,
        widgets: &'a dyn WidgetRenderer,
    ) -> Self {
        Self {
            theme: theme.into(),
            options: normalize_theme_options(options),
            source,
            menus,
            widgets,
        }
    }

    /// Renders a template to final HTML.
    ///
    /// Resolves the template through the fallback chain, builds the render
    /// context (caller data wins every merge collision), and rewrites all
    /// directives. Serves ordinary pages, the 404 page, plugin fragments,
    /// and previews alike.
    ///
    /// # Returns
    /// * `Result<String>` - Final HTML, or `Error::TemplateNotFound` when
    ///   the whole fallback chain fails
    pub fn render(&self, template: &str, data: &Map<String, Value>) -> Result<String> {
        let text = self.source.resolve(&self.theme, template)?;
        debug!("Rendering template '{template}' with theme '{}'", self.theme);
        let context = build_context(&self.theme, data, &self.options, self.menus);
        Ok(self.processor().process(&text, &context))
    }

    /// Re-stamps already-rendered HTML with a fresh context.
    ///
    /// The data map is used directly as the context, without the default
    /// seeding of [`render`](Self::render). This is the preview path: page
    /// content rendered earlier gets its remaining directives resolved
    /// against up-to-date values. Never fails; unresolved directives
    /// degrade exactly as during a full render.
    pub fn replace_variables(&self, text: &str, data: &Map<String, Value>) -> String {
        self.processor().process(text, data)
    }

    fn processor(&self) -> DirectiveProcessor<'_> {
        DirectiveProcessor {
            source: self.source,
            menus: self.menus,
            widgets: self.widgets,
            theme: &self.theme,
            options: &self.options,
        }
    }
}
