//! Error types for template rendering.
//!
//! The adapter performs no local recovery: every failure reported by the
//! underlying engine surfaces to the caller as a [`RenderError`], classified
//! by failure mode but otherwise unchanged. The original engine error stays
//! reachable through [`std::error::Error::source`] for callers that want the
//! full report, including MiniJinja's debug rendering of the failing
//! template when debug mode is on.

use minijinja::ErrorKind;
use thiserror::Error;

/// A failed render call.
///
/// Variants follow the failure taxonomy of the rendering contract:
/// missing template file, malformed template source, undefined-variable
/// reference under strict mode, and any other runtime evaluation failure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The normalized template name does not resolve to a file under the
    /// templates root.
    #[error("template '{name}' not found under the templates root")]
    TemplateNotFound {
        /// Normalized template name that failed to resolve.
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// The template source failed to parse.
    #[error("syntax error in template '{name}': {source}")]
    Syntax {
        /// Normalized name of the template that failed to parse.
        name: String,
        /// Line reported by the engine, when available.
        line: Option<usize>,
        #[source]
        source: minijinja::Error,
    },

    /// A template referenced an undefined variable while the
    /// `strict_variables` option is on.
    #[error("undefined variable while rendering template '{name}': {source}")]
    UndefinedVariable {
        /// Normalized name of the template being rendered.
        name: String,
        /// Line reported by the engine, when available.
        line: Option<usize>,
        #[source]
        source: minijinja::Error,
    },

    /// Any other failure during template evaluation, e.g. a filter applied
    /// to an incompatible type or an unknown function.
    #[error("failed to render template '{name}': {source}")]
    Render {
        /// Normalized name of the template being rendered.
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

impl RenderError {
    /// Classify an engine error for the given normalized template name.
    pub(crate) fn from_engine(name: &str, error: minijinja::Error) -> Self {
        // The engine reports the failing template itself for errors raised
        // inside includes; prefer that name when present.
        let name = error.name().unwrap_or(name).to_string();

        match error.kind() {
            ErrorKind::TemplateNotFound => Self::TemplateNotFound { name, source: error },
            ErrorKind::SyntaxError => Self::Syntax { name, line: error.line(), source: error },
            ErrorKind::UndefinedError => {
                Self::UndefinedVariable { name, line: error.line(), source: error }
            }
            _ => Self::Render { name, source: error },
        }
    }

    /// Normalized name of the template the error was raised for.
    pub fn template(&self) -> &str {
        match self {
            Self::TemplateNotFound { name, .. }
            | Self::Syntax { name, .. }
            | Self::UndefinedVariable { name, .. }
            | Self::Render { name, .. } => name,
        }
    }
}
