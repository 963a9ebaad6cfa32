//! Engine registration.
//!
//! The host framework dispatches render calls by logical engine name through
//! a registry of [`TemplateEngine`] implementations. This module provides
//! that narrow rendering interface, the registry itself, and the shim that
//! registers a configured [`TwigEngine`] under the fixed name
//! [`ENGINE_NAME`] at host initialization time.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Map;

use crate::config::EngineConfig;
use crate::engine::TwigEngine;
use crate::error::RenderError;
use crate::host::HostContext;

/// Name this module registers its engine under.
pub const ENGINE_NAME: &str = "Twig";

/// The rendering interface the host dispatches through.
///
/// Implementations take a logical template name plus a data mapping and
/// return the rendered string; everything else (name normalization, engine
/// configuration, global injection) is the implementation's business.
pub trait TemplateEngine: Send + Sync {
    /// Render the named template with the given data.
    fn render(
        &self,
        template: &str,
        data: &Map<String, serde_json::Value>,
    ) -> Result<String, RenderError>;
}

impl TemplateEngine for TwigEngine {
    fn render(
        &self,
        template: &str,
        data: &Map<String, serde_json::Value>,
    ) -> Result<String, RenderError> {
        TwigEngine::render(self, template, data)
    }
}

/// Registry of template engines keyed by logical engine name.
///
/// Registering a second engine under an existing name replaces the first,
/// mirroring how reinstalling a module replaces its registration.
#[derive(Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Arc<dyn TemplateEngine>>,
}

impl EngineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine under the given name.
    pub fn register_engine(&mut self, name: impl Into<String>, engine: Arc<dyn TemplateEngine>) {
        let name = name.into();
        tracing::debug!(engine = %name, "registering template engine");
        self.engines.insert(name, engine);
    }

    /// Look up an engine by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn TemplateEngine>> {
        self.engines.get(name).cloned()
    }

    /// Names of all registered engines, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.engines.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Construct a Twig engine and register it under [`ENGINE_NAME`].
///
/// The returned handle can be used to render directly, or to keep a typed
/// reference next to the type-erased one held by the registry. Consumers
/// needing customization hooks should build the [`TwigEngine`] themselves,
/// add hooks, and call [`EngineRegistry::register_engine`].
pub fn register(
    registry: &mut EngineRegistry,
    host: HostContext,
    config: EngineConfig,
) -> Arc<TwigEngine> {
    let engine = Arc::new(TwigEngine::new(host, config));
    registry.register_engine(ENGINE_NAME, engine.clone());
    engine
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_exposes_engine_under_fixed_name() {
        let mut registry = EngineRegistry::new();
        register(&mut registry, HostContext::new("/srv/site/templates"), EngineConfig::default());

        assert!(registry.get(ENGINE_NAME).is_some());
        assert!(registry.get("Smarty").is_none());
        assert_eq!(registry.names(), vec!["Twig"]);
    }

    #[test]
    fn reregistering_replaces_previous_engine() {
        let mut registry = EngineRegistry::new();
        let first =
            register(&mut registry, HostContext::new("/srv/a"), EngineConfig::default());
        let second =
            register(&mut registry, HostContext::new("/srv/b"), EngineConfig::default());

        // The registry dropped its reference to the first engine.
        assert_eq!(Arc::strong_count(&first), 1);
        assert_eq!(Arc::strong_count(&second), 2);
        assert_eq!(registry.names(), vec!["Twig"]);
    }
}
