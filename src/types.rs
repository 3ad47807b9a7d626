#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};

use crate::options::ConvertOptions;

// ═══════════════════════════════════════════════════════════════════════════════
// RESULT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Aggregate outcome of one `convert` call.
///
/// `success` is true iff `errors` is empty. `code` is only empty on the failure
/// path; a degraded conversion still carries its best-effort output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub success: bool,
    pub code: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub components: Vec<ComponentInfo>,
}

/// Metadata recorded once per recognised component definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub name: String,
    /// Prop names in first-seen order, without duplicates.
    pub props: Vec<String>,
    /// `"name (type)"` entries.
    pub state: Vec<String>,
    /// Human-readable effect summaries.
    pub effects: Vec<String>,
    pub is_class: bool,
}

impl ComponentInfo {
    pub fn new(name: &str, is_class: bool) -> Self {
        ComponentInfo {
            name: name.to_string(),
            is_class,
            ..Default::default()
        }
    }

    pub fn add_prop(&mut self, prop: &str) {
        let prop = prop.trim();
        if !prop.is_empty() && !self.props.iter().any(|p| p == prop) {
            self.props.push(prop.to_string());
        }
    }
}

/// One `useState` declaration, alive only while its component is converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVariable {
    pub name: String,
    pub setter_name: String,
    pub inferred_type: String,
    pub initial_value: String,
}

impl StateVariable {
    /// Metadata form: `count (number)`.
    pub fn describe(&self) -> String {
        format!("{} ({})", self.name, self.inferred_type)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONVERSION CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// Call-scoped accumulators threaded by reference through every stage.
/// A fresh context is created for each conversion; nothing is shared between calls.
#[derive(Debug)]
pub struct ConversionContext<'o> {
    pub options: &'o ConvertOptions,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub components: Vec<ComponentInfo>,
}

impl<'o> ConversionContext<'o> {
    pub fn new(options: &'o ConvertOptions) -> Self {
        ConversionContext {
            options,
            errors: Vec::new(),
            warnings: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(warning = %message, "conversion warning");
        self.warnings.push(message);
    }
}
