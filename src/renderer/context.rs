use crate::constants::{DEFAULT_SITE_NAME, MAIN_MENU_ID};
use crate::renderer::interface::MenuRenderer;
use chrono::{Datelike, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Persisted site customization values, as loaded from `theme_options.json`.
///
/// Ordered so that flattening and loops are deterministic.
pub type ThemeOptions = IndexMap<String, Value>;

/// The merged key-value namespace available during one render call.
pub type RenderContext = Map<String, Value>;

/// Invariant keys present under both casings; the pair must agree within
/// a single render.
const ALIAS_PAIRS: &[(&str, &str)] = &[
    ("siteName", "site_name"),
    ("heroBanner", "hero_banner"),
    ("currentYear", "current_year"),
];

/// Returns a copy of the options in which every entry additionally appears
/// under its all-lowercase key. Templates written against either casing
/// keep resolving.
pub fn normalize_theme_options(options: &ThemeOptions) -> ThemeOptions {
    let mut normalized = ThemeOptions::new();
    for (key, value) in options {
        normalized.insert(key.clone(), value.clone());
        normalized.insert(key.to_lowercase(), value.clone());
    }
    normalized
}

/// Whether a context value counts as "set" for conditionals and coercion.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Builds the render context for one call.
///
/// Merge order: engine defaults, then every normalized theme option under
/// both casings, then the caller's data. The caller wins every collision.
///
/// # Arguments
/// * `theme` - Active theme name
/// * `data` - Caller-supplied page data
/// * `options` - Theme options, already normalized
/// * `menus` - Collaborator rendering the `mainMenu` default
pub fn build_context(
    theme: &str,
    data: &Map<String, Value>,
    options: &ThemeOptions,
    menus: &dyn MenuRenderer,
) -> RenderContext {
    let mut context = RenderContext::new();

    let option = |key: &str| options.get(key).cloned();
    let data_or = |key: &str, default: Value| data.get(key).cloned().unwrap_or(default);

    let site_name = data_or("siteName", Value::from(DEFAULT_SITE_NAME));
    let hero_banner = option("herobanner")
        .or_else(|| data.get("heroBanner").cloned())
        .unwrap_or(Value::Null);
    let current_year = Value::from(Utc::now().year());
    let options_value =
        Value::Object(options.iter().map(|(k, v)| (k.clone(), v.clone())).collect());

    context.insert("theme".into(), Value::from(theme));
    context.insert("siteName".into(), site_name.clone());
    context.insert("site_name".into(), site_name);
    context.insert("title".into(), data_or("title", Value::from("")));
    context.insert("content".into(), data_or("content", Value::from("")));
    context.insert("logo".into(), option("logo").unwrap_or(Value::Null));
    context.insert("heroBanner".into(), hero_banner.clone());
    context.insert("hero_banner".into(), hero_banner);
    context.insert("currentYear".into(), current_year.clone());
    context.insert("current_year".into(), current_year);
    context.insert("mainMenu".into(), Value::from(menus.render_menu(MAIN_MENU_ID)));
    context.insert("custom_css".into(), option("custom_css").unwrap_or(Value::from("")));
    context.insert("custom_js".into(), option("custom_js").unwrap_or(Value::from("")));
    context.insert("themeOptions".into(), options_value.clone());
    context.insert("theme_options".into(), options_value);

    // Flatten options directly into the namespace; the normalized map
    // already carries both the original and the lowercase key.
    for (key, value) in options {
        context.insert(key.clone(), value.clone());
    }

    for (key, value) in data {
        context.insert(key.clone(), value.clone());
    }

    // A caller override of an invariant key lands on the camelCase form;
    // mirror it so both casings render the caller's value.
    for (camel, snake) in ALIAS_PAIRS {
        if let Some(value) = data.get(*camel) {
            context.insert((*snake).into(), value.clone());
        }
    }

    if let Some(sidebar) = data.get("sidebar") {
        context.insert("sidebar".into(), Value::Bool(is_truthy(sidebar)));
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::interface::NullMenuRenderer;
    use serde_json::json;

    fn options_from(pairs: &[(&str, Value)]) -> ThemeOptions {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn data_from(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn normalization_adds_lowercase_aliases() {
        let options = options_from(&[("HeroBanner", json!("x.png"))]);
        let normalized = normalize_theme_options(&options);
        assert_eq!(normalized.get("HeroBanner"), Some(&json!("x.png")));
        assert_eq!(normalized.get("herobanner"), Some(&json!("x.png")));
    }

    #[test]
    fn defaults_are_dual_cased() {
        let options = normalize_theme_options(&ThemeOptions::new());
        let context = build_context("default", &Map::new(), &options, &NullMenuRenderer);
        assert_eq!(context["siteName"], context["site_name"]);
        assert_eq!(context["heroBanner"], context["hero_banner"]);
        assert_eq!(context["currentYear"], context["current_year"]);
        assert_eq!(context["siteName"], json!("FearlessCMS"));
    }

    #[test]
    fn hero_banner_defaults_to_theme_option() {
        let options =
            normalize_theme_options(&options_from(&[("HeroBanner", json!("opt.png"))]));
        let context = build_context("default", &Map::new(), &options, &NullMenuRenderer);
        assert_eq!(context["heroBanner"], json!("opt.png"));
        assert_eq!(context["hero_banner"], json!("opt.png"));
    }

    #[test]
    fn caller_override_keeps_alias_pairs_in_step() {
        let options =
            normalize_theme_options(&options_from(&[("HeroBanner", json!("opt.png"))]));
        let data = data_from(json!({
            "heroBanner": "data.png",
            "siteName": "Override",
            "currentYear": 1999,
        }));
        let context = build_context("default", &data, &options, &NullMenuRenderer);
        assert_eq!(context["heroBanner"], context["hero_banner"]);
        assert_eq!(context["hero_banner"], json!("data.png"));
        assert_eq!(context["site_name"], json!("Override"));
        assert_eq!(context["current_year"], json!(1999));
    }

    #[test]
    fn caller_data_wins_collisions() {
        let options = normalize_theme_options(&options_from(&[("logo", json!("a.png"))]));
        let data = data_from(json!({ "logo": "b.png", "title": "Home" }));
        let context = build_context("default", &data, &options, &NullMenuRenderer);
        assert_eq!(context["logo"], json!("b.png"));
        assert_eq!(context["title"], json!("Home"));
    }

    #[test]
    fn options_flatten_under_both_casings() {
        let options =
            normalize_theme_options(&options_from(&[("AccentColor", json!("#f00"))]));
        let context = build_context("default", &Map::new(), &options, &NullMenuRenderer);
        assert_eq!(context["AccentColor"], json!("#f00"));
        assert_eq!(context["accentcolor"], json!("#f00"));
        assert_eq!(context["themeOptions"]["accentcolor"], json!("#f00"));
    }

    #[test]
    fn sidebar_is_coerced_to_boolean() {
        let options = ThemeOptions::new();
        for (raw, expected) in
            [(json!("left"), true), (json!(""), false), (json!(0), false)]
        {
            let data = data_from(json!({ "sidebar": raw }));
            let context = build_context("default", &data, &options, &NullMenuRenderer);
            assert_eq!(context["sidebar"], Value::Bool(expected));
        }
    }

    #[test]
    fn truthiness_matches_loose_semantics() {
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!(true)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!(["a"])));
    }
}
