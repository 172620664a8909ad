//! Constants used throughout the template engine

/// Template file extension appended when a name carries none
pub const TEMPLATE_EXTENSION: &str = ".html";

/// Templates subdirectory inside a theme
pub const TEMPLATES_SUBDIR: &str = "templates";

/// Template every unresolved name falls back to
pub const FALLBACK_TEMPLATE: &str = "page";

/// Theme consulted when the active theme cannot satisfy the fallback
pub const DEFAULT_THEME: &str = "default";

/// Menu id rendered into the `mainMenu` context default
pub const MAIN_MENU_ID: &str = "main";

/// Site name used when the caller supplies none
pub const DEFAULT_SITE_NAME: &str = "FearlessCMS";

/// Maximum rewrite passes over nested if/else blocks
pub const IF_PASS_LIMIT: usize = 5;

/// Maximum module-include nesting before inclusion is truncated
pub const MODULE_DEPTH_LIMIT: usize = 16;

/// Substring whose presence marks the CSS framework as already loaded
pub const FRAMEWORK_MARKER: &str = "tailwindcss";

/// Loader tag inserted before `</head>` when the framework is missing
pub const FRAMEWORK_LOADER: &str =
    r#"<script src="https://cdn.tailwindcss.com"></script>"#;

/// Context keys never substituted as plain variables
pub const RESERVED_KEYS: &[&str] = &["sidebar", "menu"];

/// Context keys whose values get `\/` unescaped before substitution
pub const UNESCAPED_PATH_KEYS: &[&str] = &["logo", "heroBanner", "hero_banner"];

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
