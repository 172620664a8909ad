use crate::constants::{
    DEFAULT_THEME, FALLBACK_TEMPLATE, TEMPLATES_SUBDIR, TEMPLATE_EXTENSION,
};
use crate::error::{Error, Result};
use crate::loader::interface::TemplateSource;
use log::debug;
use std::path::{Path, PathBuf};

/// Template source backed by a themes directory on the local filesystem.
///
/// Layout: `<themes_dir>/<theme>/templates/<name>.html`.
#[derive(Debug)]
pub struct FilesystemTemplates {
    themes_dir: PathBuf,
}

impl FilesystemTemplates {
    /// Creates a new FilesystemTemplates instance rooted at `themes_dir`.
    pub fn new<P: AsRef<Path>>(themes_dir: P) -> Result<Self> {
        let themes_dir = themes_dir.as_ref();
        if !themes_dir.exists() {
            return Err(Error::ThemesDirDoesNotExistError {
                themes_dir: themes_dir.display().to_string(),
            });
        }
        Ok(Self { themes_dir: themes_dir.to_path_buf() })
    }

    fn template_path(&self, theme: &str, name: &str) -> PathBuf {
        self.themes_dir.join(theme).join(TEMPLATES_SUBDIR).join(name)
    }

    /// Appends `.html` when the name carries no extension.
    fn with_extension(name: &str) -> String {
        if Path::new(name).extension().is_some() {
            name.to_string()
        } else {
            format!("{name}{TEMPLATE_EXTENSION}")
        }
    }

    fn read(&self, theme: &str, name: &str) -> Option<String> {
        let path = self.template_path(theme, name);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!("Resolved template '{}'", path.display());
                Some(text)
            }
            Err(_) => None,
        }
    }
}

impl TemplateSource for FilesystemTemplates {
    /// Resolves a template through the fallback chain: the name as given,
    /// the name with `.html` appended, the theme's `page.html`, and finally
    /// the default theme's `page.html`.
    fn resolve(&self, theme: &str, template: &str) -> Result<String> {
        if let Some(text) = self.read(theme, template) {
            return Ok(text);
        }
        let with_ext = Self::with_extension(template);
        if with_ext != template {
            if let Some(text) = self.read(theme, &with_ext) {
                return Ok(text);
            }
        }

        let fallback = Self::with_extension(FALLBACK_TEMPLATE);
        debug!("Template '{template}' missing in theme '{theme}', trying '{fallback}'");
        if let Some(text) = self.read(theme, &fallback) {
            return Ok(text);
        }
        if let Some(text) = self.read(DEFAULT_THEME, &fallback) {
            return Ok(text);
        }

        Err(Error::TemplateNotFound {
            theme: theme.to_string(),
            template: template.to_string(),
        })
    }

    fn load_module(&self, theme: &str, name: &str) -> Option<String> {
        self.read(theme, &Self::with_extension(name))
    }
}
