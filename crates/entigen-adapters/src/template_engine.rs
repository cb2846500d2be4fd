//! Template engine adapter backed by `tera`.
//!
//! Templates are compiled once per (name, source) pair and reused; a
//! different source under the same name replaces the compiled template.
//! Auto-escaping is off: the output is source code, not HTML.
//!
//! Extra filter: `raw_ident` turns a Rust keyword into a raw identifier
//! (`type` → `r#type`) and leaves every other name untouched.

use std::collections::HashMap;
use std::error::Error as _;
use std::sync::RwLock;

use tera::{Context, Tera, Value};
use tracing::{debug, instrument};

use entigen_core::{
    application::{ApplicationError, ports::TemplateEngine},
    domain::RenderContext,
    error::EntigenResult,
};

/// `TemplateEngine` implementation on top of tera.
pub struct TeraEngine {
    registry: RwLock<Registry>,
}

struct Registry {
    tera: Tera,
    sources: HashMap<String, String>,
}

impl TeraEngine {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.register_filter("raw_ident", raw_ident_filter);
        Self {
            registry: RwLock::new(Registry {
                tera,
                sources: HashMap::new(),
            }),
        }
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for TeraEngine {
    #[instrument(skip(self, source, context), fields(template = name))]
    fn render(&self, name: &str, source: &str, context: &RenderContext) -> EntigenResult<String> {
        let context = Context::from_value(context.clone().into_value())
            .map_err(|e| render_error(name, &e))?;

        {
            let registry = self.registry.read().map_err(|_| unavailable())?;
            if registry.sources.get(name).is_some_and(|s| s == source) {
                return Ok(registry
                    .tera
                    .render(name, &context)
                    .map_err(|e| render_error(name, &e))?);
            }
        }

        let mut registry = self.registry.write().map_err(|_| unavailable())?;
        registry
            .tera
            .add_raw_template(name, source)
            .map_err(|e| render_error(name, &e))?;
        registry.sources.insert(name.to_string(), source.to_string());
        debug!("Template compiled");

        Ok(registry
            .tera
            .render(name, &context)
            .map_err(|e| render_error(name, &e))?)
    }
}

fn raw_ident_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("raw_ident expects a string"))?;
    Ok(Value::String(raw_ident(name)))
}

/// `name`, or `r#name` when `name` is a keyword that a raw identifier can
/// spell. `self`, `Self`, `super` and `crate` have no raw form.
pub fn raw_ident(name: &str) -> String {
    const NO_RAW_FORM: [&str; 4] = ["self", "Self", "super", "crate"];

    let plain_ok = syn::parse_str::<syn::Ident>(name).is_ok();
    if plain_ok || NO_RAW_FORM.contains(&name) {
        return name.to_string();
    }

    let raw = format!("r#{name}");
    if syn::parse_str::<syn::Ident>(&raw).is_ok() {
        raw
    } else {
        name.to_string()
    }
}

/// Flatten tera's error chain; the top-level message alone rarely says
/// which variable or line was at fault.
fn render_error(template: &str, error: &tera::Error) -> ApplicationError {
    let mut reason = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }

    ApplicationError::RenderError {
        template: template.to_string(),
        reason,
    }
}

fn unavailable() -> ApplicationError {
    ApplicationError::AdapterUnavailable {
        name: "template registry",
    }
}
