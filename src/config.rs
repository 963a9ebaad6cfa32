//! Module configuration for the Twig engine adapter.
//!
//! The host framework persists a small set of options per installed engine
//! and hands them back as a map when the engine is constructed. This module
//! defines that option set with its documented defaults, the deserialization
//! helpers that seed defaults for options absent from persisted data, and the
//! configuration form description surfaced to the host's admin UI.
//!
//! # Options
//!
//! | option | default | effect |
//! |---|---|---|
//! | `template_files_suffix` | `"html.twig"` | appended to template names lacking it |
//! | `api_vars_available` | `true` | merge framework globals into render data |
//! | `auto_reload` | `true` | recompile templates when sources change |
//! | `auto_escape` | `false` | escape output based on the template name |
//! | `strict_variables` | `false` | undefined variables are errors instead of null |
//! | `debug` | `"config"` | inherit the host debug flag, or force on/off |

use std::fmt;

use anyhow::{Context, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

fn default_template_files_suffix() -> String {
    "html.twig".to_string()
}

const fn default_api_vars_available() -> bool {
    true
}

const fn default_auto_reload() -> bool {
    true
}

/// Debug mode of the engine.
///
/// The persisted representation keeps compatibility with configurations
/// written by earlier module versions: the string `"config"` means
/// [`DebugMode::Inherit`], while booleans and the integers `0`/`1` force the
/// mode unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugMode {
    /// Defer to the host framework's global debug flag.
    #[default]
    Inherit,
    /// Debug mode on, regardless of the host flag.
    Enabled,
    /// Debug mode off, regardless of the host flag.
    Disabled,
}

impl DebugMode {
    /// Resolve the effective debug flag against the host's global one.
    ///
    /// The host flag is consulted only in the [`DebugMode::Inherit`] case.
    pub fn resolve(self, host_debug: bool) -> bool {
        match self {
            Self::Inherit => host_debug,
            Self::Enabled => true,
            Self::Disabled => false,
        }
    }
}

impl Serialize for DebugMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Inherit => serializer.serialize_str("config"),
            Self::Enabled => serializer.serialize_bool(true),
            Self::Disabled => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for DebugMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DebugModeVisitor;

        impl Visitor<'_> for DebugModeVisitor {
            type Value = DebugMode;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("\"config\", a boolean, or 0/1")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<DebugMode, E> {
                Ok(if value { DebugMode::Enabled } else { DebugMode::Disabled })
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<DebugMode, E> {
                Ok(if value != 0 { DebugMode::Enabled } else { DebugMode::Disabled })
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<DebugMode, E> {
                Ok(if value != 0 { DebugMode::Enabled } else { DebugMode::Disabled })
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<DebugMode, E> {
                match value {
                    "config" => Ok(DebugMode::Inherit),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(DebugModeVisitor)
    }
}

/// Options of one installed Twig engine.
///
/// Immutable for the lifetime of an adapter instance: changing an option
/// means constructing a new adapter, and with it a new engine instance.
/// Missing fields fall back to the documented defaults during
/// deserialization, so partially persisted configurations load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// File extension appended to logical template names lacking it.
    pub template_files_suffix: String,
    /// Whether framework globals are merged into every render's data.
    pub api_vars_available: bool,
    /// Whether templates are recompiled when their source changes.
    pub auto_reload: bool,
    /// Whether output is auto-escaped based on the template name.
    pub auto_escape: bool,
    /// Whether referencing an undefined variable is an error.
    pub strict_variables: bool,
    /// Debug mode, possibly deferred to the host flag.
    pub debug: DebugMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            template_files_suffix: default_template_files_suffix(),
            api_vars_available: default_api_vars_available(),
            auto_reload: default_auto_reload(),
            auto_escape: false,
            strict_variables: false,
            debug: DebugMode::Inherit,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a persisted JSON value.
    ///
    /// Options absent from the value are seeded with their defaults, so a
    /// configuration persisted by an older module version still loads.
    pub fn from_persisted(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).context("invalid persisted template engine configuration")
    }

    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid template engine configuration")
    }
}

/// Kind of an admin configuration form field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ConfigFieldKind {
    Text,
    Checkbox,
    Select { options: Vec<SelectOption> },
}

/// One choice of a select field.
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: serde_json::Value,
    pub label: &'static str,
}

/// One field of the admin configuration form.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub required: bool,
    pub default: serde_json::Value,
    #[serde(flatten)]
    pub kind: ConfigFieldKind,
}

/// Describe the configuration form surfaced to the host's admin UI.
///
/// Field order, labels and descriptions mirror the module's configuration
/// screen; defaults are the ones of [`EngineConfig::default`].
pub fn config_form() -> Vec<ConfigField> {
    vec![
        ConfigField {
            name: "template_files_suffix",
            label: "Template files suffix",
            description: None,
            required: true,
            default: serde_json::json!(default_template_files_suffix()),
            kind: ConfigFieldKind::Text,
        },
        ConfigField {
            name: "api_vars_available",
            label: "Provide API variables in Twig templates",
            description: Some(
                "API variables (`pages`, `input`, `config`...) are accessible in Twig, \
                 e.g. `{{ config }}` for the config API variable.",
            ),
            required: false,
            default: serde_json::json!(true),
            kind: ConfigFieldKind::Checkbox,
        },
        ConfigField {
            name: "debug",
            label: "Debug",
            description: None,
            required: false,
            default: serde_json::json!("config"),
            kind: ConfigFieldKind::Select {
                options: vec![
                    SelectOption { value: serde_json::json!("config"), label: "Inherit from host" },
                    SelectOption { value: serde_json::json!(false), label: "No" },
                    SelectOption { value: serde_json::json!(true), label: "Yes" },
                ],
            },
        },
        ConfigField {
            name: "auto_reload",
            label: "Auto reload templates (recompile)",
            description: Some(
                "If enabled, templates are recompiled whenever the source code changes",
            ),
            required: false,
            default: serde_json::json!(true),
            kind: ConfigFieldKind::Checkbox,
        },
        ConfigField {
            name: "strict_variables",
            label: "Strict variables",
            description: Some(
                "If set to `false`, Twig will silently ignore invalid variables (variables \
                 and or attributes/methods that do not exist) and replace them with a `null` \
                 value. When set to `true`, Twig throws an exception instead",
            ),
            required: false,
            default: serde_json::json!(false),
            kind: ConfigFieldKind::Checkbox,
        },
        ConfigField {
            name: "auto_escape",
            label: "Auto escape variables",
            description: Some(
                "If enabled, templates will auto-escape variables. If you are using host-side \
                 text formatters to escape field values, do not enable this feature.",
            ),
            required: false,
            default: serde_json::json!(false),
            kind: ConfigFieldKind::Checkbox,
        },
    ]
}
