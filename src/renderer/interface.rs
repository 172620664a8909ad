/// Trait for menu rendering collaborators.
///
/// The engine never inspects menu structure; it splices whatever HTML the
/// collaborator returns for a menu id.
pub trait MenuRenderer {
    /// Renders the menu with the given id to HTML.
    ///
    /// # Arguments
    /// * `id` - Menu identifier, e.g. `"main"`
    ///
    /// # Returns
    /// * `String` - Menu HTML; empty when the id is unknown
    fn render_menu(&self, id: &str) -> String;
}

/// Trait for sidebar/widget rendering collaborators.
pub trait WidgetRenderer {
    /// Renders the sidebar with the given id to HTML.
    ///
    /// # Arguments
    /// * `id` - Sidebar identifier
    ///
    /// # Returns
    /// * `String` - Sidebar HTML; empty when nothing is registered
    fn render_sidebar(&self, id: &str) -> String;
}

/// Menu renderer that renders every menu as the empty string.
///
/// Used by previews and tests where no menu store is wired up.
pub struct NullMenuRenderer;

impl MenuRenderer for NullMenuRenderer {
    fn render_menu(&self, _id: &str) -> String {
        String::new()
    }
}

/// Widget renderer that renders every sidebar as the empty string.
pub struct NullWidgetRenderer;

impl WidgetRenderer for NullWidgetRenderer {
    fn render_sidebar(&self, _id: &str) -> String {
        String::new()
    }
}
