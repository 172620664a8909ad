use crate::constants::{
    FRAMEWORK_LOADER, FRAMEWORK_MARKER, IF_PASS_LIMIT, MODULE_DEPTH_LIMIT,
    RESERVED_KEYS, UNESCAPED_PATH_KEYS,
};
use crate::loader::TemplateSource;
use crate::renderer::context::{is_truthy, RenderContext, ThemeOptions};
use crate::renderer::interface::{MenuRenderer, WidgetRenderer};
use log::{debug, warn};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{module=([^}]+)\}\}").expect("module pattern"));
static SIDEBAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{sidebar=([^}]+)\}\}").expect("sidebar pattern"));
static MENU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{menu=([^}]+)\}\}").expect("menu pattern"));
static THEME_OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{themeOptions\.([^}]+)\}\}").expect("themeOptions pattern")
});
static EACH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#each\s+([^}]+)\}\}(.*?)\{\{/each\}\}").expect("each pattern")
});
static IF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#if\s+([^}]+)\}\}(.*?)(?:\{\{else\}\}(.*?))?\{\{/if\}\}")
        .expect("if pattern")
});

/// Rewrites every directive in a template, in a fixed precedence order:
/// module includes, sidebar embeds, menu embeds, themeOptions accessors,
/// each-loops, if/else blocks, plain variables, framework loader.
///
/// Directive failures never propagate; each directive degrades to an empty
/// string or an inline comment marker. The only I/O is module-file reads.
pub(crate) struct DirectiveProcessor<'a> {
    pub source: &'a dyn TemplateSource,
    pub menus: &'a dyn MenuRenderer,
    pub widgets: &'a dyn WidgetRenderer,
    pub theme: &'a str,
    /// Theme options, already normalized to carry lowercase aliases.
    pub options: &'a ThemeOptions,
}

impl DirectiveProcessor<'_> {
    pub fn process(&self, text: &str, context: &RenderContext) -> String {
        self.process_at_depth(text, context, 0)
    }

    fn process_at_depth(
        &self,
        text: &str,
        context: &RenderContext,
        depth: usize,
    ) -> String {
        let text = self.expand_modules(text, context, depth);
        let text = self.embed_sidebars(&text);
        let text = self.embed_menus(&text);
        let text = self.resolve_theme_option_accessors(&text);
        let text = self.expand_each_blocks(&text, context);
        let text = self.resolve_conditionals(&text, context, depth);
        let text = substitute_variables(&text, context);
        ensure_framework_loader(text)
    }

    /// `{{module=NAME}}`: inline the module file and run the full processor
    /// over it with the same context. A depth counter truncates runaway
    /// self-inclusion; the marker comment documents what happened.
    fn expand_modules(
        &self,
        text: &str,
        context: &RenderContext,
        depth: usize,
    ) -> String {
        MODULE_RE
            .replace_all(text, |caps: &Captures| {
                let name = caps[1].trim();
                if depth >= MODULE_DEPTH_LIMIT {
                    warn!("module '{name}' skipped at include depth {depth}");
                    return format!("<!-- module '{name}' skipped: include depth limit -->");
                }
                match self.source.load_module(self.theme, name) {
                    Some(content) => {
                        self.process_at_depth(&content, context, depth + 1)
                    }
                    None => {
                        warn!("module '{name}' not found in theme '{}'", self.theme);
                        format!("<!-- module '{name}' not found -->")
                    }
                }
            })
            .into_owned()
    }

    fn embed_sidebars(&self, text: &str) -> String {
        SIDEBAR_RE
            .replace_all(text, |caps: &Captures| {
                self.widgets.render_sidebar(caps[1].trim())
            })
            .into_owned()
    }

    fn embed_menus(&self, text: &str) -> String {
        MENU_RE
            .replace_all(text, |caps: &Captures| self.menus.render_menu(caps[1].trim()))
            .into_owned()
    }

    /// `{{themeOptions.KEY}}`: direct lookup in the normalized options map;
    /// an absent key renders as the empty string.
    fn resolve_theme_option_accessors(&self, text: &str) -> String {
        THEME_OPTION_RE
            .replace_all(text, |caps: &Captures| {
                self.options
                    .get(caps[1].trim())
                    .and_then(scalar_to_string)
                    .unwrap_or_default()
            })
            .into_owned()
    }

    /// `{{#each KEY}}BODY{{/each}}`: one body copy per list element, with
    /// `{{field}}` tokens filled from the element's scalar fields. A
    /// non-list target empties the whole block.
    fn expand_each_blocks(&self, text: &str, context: &RenderContext) -> String {
        EACH_RE
            .replace_all(text, |caps: &Captures| {
                let key = caps[1].trim();
                let body = &caps[2];
                let value = match key.strip_prefix("themeOptions.") {
                    Some(option) => self.options.get(option),
                    None => context.get(key),
                };
                let Some(Value::Array(items)) = value else {
                    debug!("each target '{key}' is not a list; dropping block");
                    return String::new();
                };
                items.iter().map(|item| expand_loop_body(body, item)).collect()
            })
            .into_owned()
    }

    /// `{{#if COND}}A{{else}}B{{/if}}`: the chosen branch is re-run through
    /// the whole processor. Nested blocks resolve one level per pass; the
    /// pass loop stops when the text stabilizes or after the cap, and any
    /// stray `{{/if}}` tokens are stripped afterwards.
    fn resolve_conditionals(
        &self,
        text: &str,
        context: &RenderContext,
        depth: usize,
    ) -> String {
        let mut current = text.to_string();
        for pass in 1..=IF_PASS_LIMIT {
            let rewritten = IF_RE
                .replace_all(&current, |caps: &Captures| {
                    let condition = caps[1].trim();
                    let branch = if self.condition_holds(condition, context) {
                        caps.get(2).map_or("", |m| m.as_str())
                    } else {
                        caps.get(3).map_or("", |m| m.as_str())
                    };
                    self.process_at_depth(branch, context, depth)
                })
                .into_owned();
            if rewritten == current {
                break;
            }
            debug!("if/else pass {pass} rewrote the template");
            current = rewritten;
        }
        current.replace("{{/if}}", "")
    }

    /// A condition holds when any resolution is non-empty: the
    /// `themeOptions.X` form, the condition as an exact context key, or its
    /// snake_case conversion as a context key.
    fn condition_holds(&self, condition: &str, context: &RenderContext) -> bool {
        if let Some(option) = condition.strip_prefix("themeOptions.") {
            if self.options.get(option).is_some_and(is_truthy) {
                return true;
            }
        }
        if context.get(condition).is_some_and(is_truthy) {
            return true;
        }
        context.get(&to_snake_case(condition)).is_some_and(is_truthy)
    }
}

/// Substitutes `{{key}}` and `{{{key}}}` for every scalar context entry.
/// Lists and maps are skipped, as are the reserved `sidebar`/`menu` keys.
/// Path-carrying keys get their JSON-escaped slashes restored first.
fn substitute_variables(text: &str, context: &RenderContext) -> String {
    let mut out = text.to_string();
    for (key, value) in context {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let Some(mut rendered) = scalar_to_string(value) else {
            continue;
        };
        if UNESCAPED_PATH_KEYS.contains(&key.as_str()) {
            rendered = rendered.replace("\\/", "/");
        }
        // Triple braces first, or the double pass would leave stray braces.
        let triple = ["{{{", key, "}}}"].concat();
        let double = ["{{", key, "}}"].concat();
        out = out.replace(&triple, &rendered);
        out = out.replace(&double, &rendered);
    }
    out
}

/// Fills `{{field}}` tokens in a loop body from one list element. Only
/// scalar fields substitute; nothing else in the body is processed.
fn expand_loop_body(body: &str, item: &Value) -> String {
    let Some(fields) = item.as_object() else {
        return body.to_string();
    };
    let mut out = body.to_string();
    for (field, value) in fields {
        if let Some(rendered) = scalar_to_string(value) {
            let token = ["{{", field, "}}"].concat();
            out = out.replace(&token, &rendered);
        }
    }
    out
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Converts camelCase to snake_case: an underscore before every internal
/// capital, then lowercase.
fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Guarantees the CSS framework loader is present, splicing it in before
/// the closing head tag when the template never references the framework.
fn ensure_framework_loader(text: String) -> String {
    if text.contains(FRAMEWORK_MARKER) {
        return text;
    }
    text.replace("</head>", &format!("{FRAMEWORK_LOADER}\n</head>"))
}
