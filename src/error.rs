use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON data. Original error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// The requested template could not be resolved through the whole
    /// fallback chain. This is the engine's only fatal rendering error.
    #[error("Template not found: '{template}' (theme '{theme}').")]
    TemplateNotFound { theme: String, template: String },

    #[error("Cannot proceed: themes directory '{themes_dir}' does not exist.")]
    ThemesDirDoesNotExistError { themes_dir: String },

    #[error("Invalid data: {0}.")]
    InvalidDataError(String),
}

/// Convenience type alias for Results with the engine Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
