//! Conversion options.
//!
//! Hosts pass these as JSON (camelCase keys). Every field has a default, so
//! `{}` is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_IMPORT_PATH: &str = "../horizon_ui";

/// How `useState` state is represented on the generated class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StateConvention {
    /// `private count: Binding<number> = new Binding(0);` with `this.count.set(v)`.
    #[default]
    Binding,
    /// `private count: number = 0;` with `this.count = v`.
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    pub state_convention: StateConvention,
    /// Prepend the Horizon import preamble to the output.
    pub include_preamble: bool,
    /// Module the preamble imports the Horizon UI symbols from.
    pub import_path: String,
    /// Emit `interface <Name>Props` for functional components that lack one.
    pub generate_props_interface: bool,
    /// Warn whenever an element is left unconverted.
    pub warn_on_passthrough: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            state_convention: StateConvention::Binding,
            include_preamble: true,
            import_path: DEFAULT_IMPORT_PATH.to_string(),
            generate_props_interface: true,
            warn_on_passthrough: true,
        }
    }
}

impl ConvertOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Stable fingerprint used to key cached results.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
