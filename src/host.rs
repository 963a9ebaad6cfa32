//! Values supplied by the host framework.
//!
//! The adapter does not talk to the host's dependency-injection container
//! directly; everything it needs from the host is captured in a
//! [`HostContext`] at construction time: the templates root, the global
//! debug flag, and the registry of framework globals ("API variables")
//! exposed to every render.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Host-framework inputs to one adapter instance.
///
/// Built once by the host at registration time and owned by the adapter
/// afterwards. The API variables are a name-to-value map enumerated into
/// render data when the `api_vars_available` option is on.
#[derive(Debug, Clone)]
pub struct HostContext {
    templates_root: PathBuf,
    debug: bool,
    api_vars: Map<String, Value>,
}

impl HostContext {
    /// Create a context rooted at the given templates directory.
    ///
    /// Debug defaults to off and the API variable map starts empty.
    pub fn new(templates_root: impl Into<PathBuf>) -> Self {
        Self {
            templates_root: templates_root.into(),
            debug: false,
            api_vars: Map::new(),
        }
    }

    /// Set the host-wide debug flag.
    ///
    /// Consulted only when the engine's `debug` option is set to inherit.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Expose one framework global to templates.
    #[must_use]
    pub fn with_api_var(mut self, name: impl Into<String>, value: Value) -> Self {
        self.api_vars.insert(name.into(), value);
        self
    }

    /// Replace the whole framework-globals map.
    #[must_use]
    pub fn with_api_vars(mut self, api_vars: Map<String, Value>) -> Self {
        self.api_vars = api_vars;
        self
    }

    /// Base directory under which all template names are resolved.
    pub fn templates_root(&self) -> &Path {
        &self.templates_root
    }

    /// The host-wide debug flag.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// The framework globals exposed to templates.
    pub fn api_vars(&self) -> &Map<String, Value> {
        &self.api_vars
    }
}
