//! Twig-style templates for a pluggable template-engine registry.
//!
//! This crate is glue: it adapts [MiniJinja](https://docs.rs/minijinja), a
//! Jinja2/Twig-family template engine, to the narrow rendering interface a
//! content-management host dispatches through. The adapter resolves logical
//! template names under a configured templates root, applies a small set of
//! module options, injects host-provided globals into the render context,
//! and returns the rendered string. There is deliberately no algorithmic
//! work here beyond name normalization and configuration translation; the
//! engine's loader, compiler and template cache are MiniJinja's own.
//!
//! # Architecture
//!
//! - [`config`] - module options with defaults, loading helpers, and the
//!   admin configuration form description
//! - [`host`] - values supplied by the host framework (templates root,
//!   debug flag, framework globals)
//! - [`engine`] - the [`TwigEngine`] adapter with lazy build-once engine
//!   construction and customization hooks
//! - [`registry`] - the [`TemplateEngine`] rendering trait, the engine
//!   registry, and registration under the `"Twig"` name
//! - [`error`] - the [`RenderError`] taxonomy; engine failures surface
//!   unchanged, no retries and no fallback content
//!
//! # Rendering
//!
//! `render("blog/post", data)` strips leading separators, appends the
//! configured suffix when the name lacks it, and resolves
//! `blog/post.html.twig` under the templates root. On the first call the
//! engine instance is built from the options: auto-reload, auto-escape,
//! strict-variables, and a debug mode that can either be forced or inherit
//! the host-wide debug flag. Registered hooks then run once, in order,
//! before any template is compiled.
//!
//! # Example
//!
//! ```no_run
//! use template_engine_twig::{EngineConfig, EngineRegistry, HostContext, registry};
//!
//! # fn main() -> anyhow::Result<()> {
//! let host = HostContext::new("/srv/site/templates")
//!     .with_debug(false)
//!     .with_api_var("site", serde_json::json!({ "name": "Acme" }));
//!
//! let mut engines = EngineRegistry::new();
//! let twig = registry::register(&mut engines, host, EngineConfig::default());
//!
//! let mut data = serde_json::Map::new();
//! data.insert("headline".to_string(), serde_json::json!("Hello"));
//! let html = twig.render("home", &data)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod registry;

pub use config::{ConfigField, ConfigFieldKind, DebugMode, EngineConfig, config_form};
pub use engine::{EngineHook, TwigEngine};
pub use error::RenderError;
pub use host::HostContext;
pub use registry::{ENGINE_NAME, EngineRegistry, TemplateEngine};
