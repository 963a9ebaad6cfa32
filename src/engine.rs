//! The Twig engine adapter.
//!
//! [`TwigEngine`] translates a logical template name and a render-time data
//! mapping into a call against an embedded MiniJinja environment. The
//! environment is built lazily on the first render, configured once from the
//! module options, and reused for the lifetime of the adapter. Consumers can
//! extend the environment (custom functions, filters, globals) through hooks
//! registered before the first render.
//!
//! # Name normalization
//!
//! Leading path separators are stripped and the configured suffix is
//! appended when missing, so `render("blog/post", ...)` resolves
//! `blog/post.html.twig` under the templates root. Suffix detection looks at
//! the caller-supplied name before stripping; the suffix is appended to the
//! stripped name. Normalization is purely textual and never touches the
//! filesystem.

use std::sync::{Mutex, MutexGuard, OnceLock};

use minijinja::value::Rest;
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value, path_loader};
use serde_json::Map;

use crate::config::EngineConfig;
use crate::error::RenderError;
use crate::host::HostContext;

/// Customization hook run once on the environment after construction.
pub type EngineHook = dyn Fn(&mut Environment<'static>) + Send + Sync;

/// Twig-syntax template engine backed by MiniJinja.
///
/// One adapter owns one lazily built engine instance. Configuration and the
/// host context are fixed at construction; a different configuration means a
/// new adapter and a new engine instance.
///
/// The adapter is `Send + Sync` and safe to share behind an [`std::sync::Arc`]:
/// construction is guarded by a build-once cell, and renders are serialized
/// on the environment.
pub struct TwigEngine {
    config: EngineConfig,
    host: HostContext,
    /// The configured suffix with its leading dot, precomputed for the
    /// per-render suffix check.
    dotted_suffix: String,
    hooks: Vec<Box<EngineHook>>,
    env: OnceLock<Mutex<Environment<'static>>>,
}

impl TwigEngine {
    /// Create an adapter from host-supplied values and module options.
    ///
    /// No engine instance is built yet; that happens on the first
    /// [`render`](Self::render) call.
    pub fn new(host: HostContext, config: EngineConfig) -> Self {
        let dotted_suffix = format!(".{}", config.template_files_suffix);
        Self { config, host, dotted_suffix, hooks: Vec::new(), env: OnceLock::new() }
    }

    /// Register a customization hook.
    ///
    /// All hooks run exactly once, in registration order, immediately after
    /// the engine instance is built and before any template is compiled.
    /// Hooks registered after the first render never run; the engine
    /// instance is already configured at that point.
    pub fn add_hook(&mut self, hook: impl Fn(&mut Environment<'static>) + Send + Sync + 'static) {
        if self.env.get().is_some() {
            tracing::warn!("hook registered after the engine instance was built; ignoring");
            return;
        }
        self.hooks.push(Box::new(hook));
    }

    /// The options this adapter was constructed with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render a template with the given data.
    ///
    /// The name is normalized (leading separators stripped, suffix appended
    /// when missing) and resolved under the templates root. When the
    /// `api_vars_available` option is on, framework globals are merged into
    /// the data first.
    ///
    /// # Errors
    ///
    /// Engine failures surface unchanged as [`RenderError`]: a name that
    /// resolves to no file, invalid template syntax, an undefined variable
    /// under `strict_variables`, or any other evaluation failure. No
    /// fallback content is produced.
    pub fn render(
        &self,
        template: &str,
        data: &Map<String, serde_json::Value>,
    ) -> Result<String, RenderError> {
        let name = self.normalize_template(template);
        let data = self.assemble_data(data);
        tracing::debug!(template = %name, vars = data.len(), "rendering template");

        let mut env = self.environment();
        if self.config.auto_reload {
            // Drop compiled templates so edited sources are picked up.
            env.clear_templates();
        }

        let tmpl = env.get_template(&name).map_err(|e| RenderError::from_engine(&name, e))?;
        tmpl.render(Value::from_serialize(&data))
            .map_err(|e| RenderError::from_engine(&name, e))
    }

    /// Fetch the engine instance, building it on first use.
    fn environment(&self) -> MutexGuard<'_, Environment<'static>> {
        let cell = self.env.get_or_init(|| Mutex::new(self.build_environment()));
        match cell.lock() {
            Ok(guard) => guard,
            // A panicked render leaves the environment itself intact.
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Build and configure the engine instance. Runs at most once per adapter.
    fn build_environment(&self) -> Environment<'static> {
        let debug_enabled = self.config.debug.resolve(self.host.debug());
        tracing::debug!(
            root = %self.host.templates_root().display(),
            debug = debug_enabled,
            auto_reload = self.config.auto_reload,
            auto_escape = self.config.auto_escape,
            strict_variables = self.config.strict_variables,
            "building template environment"
        );

        let mut env = Environment::new();
        env.set_loader(path_loader(self.host.templates_root()));
        // Template sources render verbatim; a trailing newline in the file
        // stays in the output.
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(if self.config.strict_variables {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Lenient
        });
        if self.config.auto_escape {
            env.set_auto_escape_callback(auto_escape_by_name);
        } else {
            env.set_auto_escape_callback(|_| AutoEscape::None);
        }
        env.set_debug(debug_enabled);
        if debug_enabled {
            env.add_function("dump", dump);
        }

        for hook in &self.hooks {
            hook(&mut env);
        }

        env
    }

    /// Normalize a logical template name.
    ///
    /// Suffix detection is checked against the original un-stripped name
    /// while the suffix is appended to the stripped one; a leading separator
    /// never affects detection.
    fn normalize_template(&self, template: &str) -> String {
        let stripped = template.trim_start_matches(['/', '\\']);

        if template.ends_with(&self.dotted_suffix) {
            stripped.to_string()
        } else {
            format!("{stripped}{}", self.dotted_suffix)
        }
    }

    /// Merge framework globals into the caller's data when enabled.
    ///
    /// Globals overwrite caller-supplied keys on collision, matching the
    /// merge order of the host's render call sites.
    fn assemble_data(
        &self,
        data: &Map<String, serde_json::Value>,
    ) -> Map<String, serde_json::Value> {
        if !self.config.api_vars_available {
            return data.clone();
        }

        let mut merged = data.clone();
        for (name, value) in self.host.api_vars() {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }
}

/// Escaping strategy derived from the template name, ignoring a trailing
/// `.twig`: `page.html.twig` escapes as HTML, `feed.json.twig` as JSON.
fn auto_escape_by_name(name: &str) -> AutoEscape {
    let name = name.strip_suffix(".twig").unwrap_or(name);
    if name.ends_with(".html") || name.ends_with(".htm") || name.ends_with(".xml") {
        AutoEscape::Html
    } else if name.ends_with(".json") {
        AutoEscape::Json
    } else {
        AutoEscape::None
    }
}

/// The `dump(...)` template function, registered in debug mode only.
fn dump(args: Rest<Value>) -> String {
    args.iter().map(|value| format!("{value:#?}")).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: EngineConfig) -> TwigEngine {
        TwigEngine::new(HostContext::new("/srv/site/templates"), config)
    }

    #[test]
    fn normalize_appends_suffix() {
        let engine = engine(EngineConfig::default());
        assert_eq!(engine.normalize_template("home"), "home.html.twig");
        assert_eq!(engine.normalize_template("blog/post"), "blog/post.html.twig");
    }

    #[test]
    fn normalize_keeps_existing_suffix() {
        let engine = engine(EngineConfig::default());
        assert_eq!(engine.normalize_template("home.html.twig"), "home.html.twig");
    }

    #[test]
    fn normalize_strips_leading_separators() {
        let engine = engine(EngineConfig::default());
        assert_eq!(engine.normalize_template("/home"), "home.html.twig");
        assert_eq!(engine.normalize_template("\\home"), "home.html.twig");
        assert_eq!(engine.normalize_template("/home.html.twig"), "home.html.twig");
    }

    #[test]
    fn normalize_honors_configured_suffix() {
        let engine = engine(EngineConfig {
            template_files_suffix: "twig".to_string(),
            ..EngineConfig::default()
        });
        assert_eq!(engine.normalize_template("home"), "home.twig");
        assert_eq!(engine.normalize_template("home.twig"), "home.twig");
        // The default suffix is no longer recognized as one.
        assert_eq!(engine.normalize_template("home.html"), "home.html.twig");
    }

    #[test]
    fn assemble_merges_api_vars_with_global_precedence() {
        let host = HostContext::new("/srv/site/templates")
            .with_api_var("site", serde_json::json!("host"))
            .with_api_var("user", serde_json::json!("guest"));
        let engine = TwigEngine::new(host, EngineConfig::default());

        let mut data = Map::new();
        data.insert("site".to_string(), serde_json::json!("caller"));
        data.insert("title".to_string(), serde_json::json!("Welcome"));

        let merged = engine.assemble_data(&data);
        assert_eq!(merged["site"], serde_json::json!("host"));
        assert_eq!(merged["user"], serde_json::json!("guest"));
        assert_eq!(merged["title"], serde_json::json!("Welcome"));
    }

    #[test]
    fn assemble_leaves_data_unchanged_when_api_vars_disabled() {
        let host = HostContext::new("/srv/site/templates")
            .with_api_var("site", serde_json::json!("host"));
        let engine = TwigEngine::new(
            host,
            EngineConfig { api_vars_available: false, ..EngineConfig::default() },
        );

        let mut data = Map::new();
        data.insert("site".to_string(), serde_json::json!("caller"));

        let merged = engine.assemble_data(&data);
        assert_eq!(merged["site"], serde_json::json!("caller"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn auto_escape_strategy_follows_template_name() {
        assert!(matches!(auto_escape_by_name("page.html.twig"), AutoEscape::Html));
        assert!(matches!(auto_escape_by_name("page.html"), AutoEscape::Html));
        assert!(matches!(auto_escape_by_name("feed.xml.twig"), AutoEscape::Html));
        assert!(matches!(auto_escape_by_name("feed.json.twig"), AutoEscape::Json));
        assert!(matches!(auto_escape_by_name("mail.txt.twig"), AutoEscape::None));
    }
}
