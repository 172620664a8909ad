/// Handles argument parsing.
pub mod cli;

/// Constants shared across the engine.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// An abstraction that allows implementing a source for theme templates.
pub mod loader;

/// Template parsing and rendering functionality.
pub mod renderer;
