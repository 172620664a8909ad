use crate::constants::{exit_codes, verbosity, DEFAULT_THEME, STDIN_INDICATOR};
use crate::error::{Error, Result};
use crate::loader::FilesystemTemplates;
use crate::renderer::{
    NullMenuRenderer, NullWidgetRenderer, ThemeOptions, ThemeRenderer,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use log::LevelFilter;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// CLI arguments for the template preview renderer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the site's themes.
    #[arg(value_name = "THEMES_DIR")]
    pub themes_dir: PathBuf,

    /// Template name to render, with or without extension.
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Theme to render with.
    #[arg(short, long, default_value = DEFAULT_THEME)]
    pub theme: String,

    /// Path to a theme_options.json file.
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Page data as a JSON object, or `-` to read from stdin.
    #[arg(short, long)]
    pub data: Option<String>,

    /// Write the rendered HTML to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse command line arguments with custom handling for missing required inputs.
pub fn parse_cli() -> Args {
    Args::try_parse().unwrap_or_else(|e| {
        if e.kind() == ErrorKind::MissingRequiredArgument {
            let mut command = Args::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}

fn load_theme_options(path: &Path) -> Result<ThemeOptions> {
    let buf = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&buf)?)
}

fn parse_page_data(arg: Option<&str>) -> Result<Map<String, Value>> {
    let Some(raw) = arg else {
        return Ok(Map::new());
    };
    let buf = if raw == STDIN_INDICATOR {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        raw.to_string()
    };

    match serde_json::from_str(&buf)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidDataError("page data must be a JSON object".into())),
    }
}

/// Renders one template and writes the HTML to the requested destination.
pub fn run(args: Args) -> Result<()> {
    let source = FilesystemTemplates::new(&args.themes_dir)?;
    let options = match &args.options {
        Some(path) => load_theme_options(path)?,
        None => ThemeOptions::new(),
    };
    let data = parse_page_data(args.data.as_deref())?;

    let renderer = ThemeRenderer::new(
        &args.theme,
        &options,
        &source,
        &NullMenuRenderer,
        &NullWidgetRenderer,
    );
    let html = renderer.render(&args.template, &data)?;

    match &args.output {
        Some(path) => std::fs::write(path, html)?,
        None => println!("{html}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_verbose_flags_to_log_filters() {
        use crate::constants::verbosity;
        assert_eq!(get_log_level_from_verbose(verbosity::OFF), LevelFilter::Error);
        assert_eq!(get_log_level_from_verbose(verbosity::INFO), LevelFilter::Info);
        assert_eq!(get_log_level_from_verbose(verbosity::DEBUG), LevelFilter::Debug);
        assert_eq!(get_log_level_from_verbose(verbosity::TRACE), LevelFilter::Trace);
        assert_eq!(get_log_level_from_verbose(verbosity::TRACE + 1), LevelFilter::Trace);
    }

    #[test]
    fn parses_minimal_args() {
        let args = Args::parse_from(["fcms-render", "themes", "page"]);
        assert_eq!(args.themes_dir, PathBuf::from("themes"));
        assert_eq!(args.template, "page");
        assert_eq!(args.theme, "default");
        assert!(args.data.is_none());
    }

    #[test]
    fn parses_full_feature_flags() {
        let args = Args::parse_from([
            "fcms-render",
            "themes",
            "blog",
            "--theme",
            "minimal",
            "--options",
            "config/theme_options.json",
            "--data",
            "{\"title\":\"Hello\"}",
            "--output",
            "out.html",
            "-vvv",
        ]);
        assert_eq!(args.theme, "minimal");
        assert_eq!(args.options, Some(PathBuf::from("config/theme_options.json")));
        assert_eq!(args.data, Some("{\"title\":\"Hello\"}".to_string()));
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert_eq!(args.verbose, 3);
    }

    #[test]
    fn page_data_must_be_an_object() {
        assert!(parse_page_data(None).unwrap().is_empty());
        assert_eq!(
            parse_page_data(Some("{\"a\":1}")).unwrap().len(),
            1
        );
        assert!(matches!(
            parse_page_data(Some("[1,2]")),
            Err(Error::InvalidDataError(_))
        ));
        assert!(matches!(
            parse_page_data(Some("not json")),
            Err(Error::JsonParseError(_))
        ));
    }
}
