//! Conversion facade.
//!
//! Strips source imports, runs the component converter and prepends the
//! Horizon preamble. This is the one place errors are caught: the first
//! failure anywhere below becomes a single `ConversionFailure` entry and an
//! empty `code`.

#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use serde::{Deserialize, Serialize};

use crate::component::convert_components;
use crate::error::Result;
use crate::mapping::PREAMBLE_SYMBOLS;
use crate::options::ConvertOptions;
use crate::parse;
use crate::types::{ConversionContext, ConversionResult};

pub const NO_COMPONENTS_WARNING: &str = "No React components found - output is the input without its imports";

const PREAMBLE_HEADER: &str = "// Meta Horizon Worlds UIComponent\n// Generated from React component - manual verification required";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Reusable converter holding one set of options. Every `convert` call starts
/// from a fresh context; only the last outcome is remembered in `state`.
#[derive(Debug, Clone)]
pub struct ConversionPipeline {
    options: ConvertOptions,
    state: PipelineState,
}

impl ConversionPipeline {
    pub fn new(options: ConvertOptions) -> Self {
        ConversionPipeline {
            options,
            state: PipelineState::Idle,
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn convert(&mut self, source: &str) -> ConversionResult {
        self.state = PipelineState::Running;
        let result = convert(source, &self.options);
        self.state = if result.success {
            PipelineState::Completed
        } else {
            PipelineState::Failed
        };
        result
    }
}

impl Default for ConversionPipeline {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

/// Converts one source text. Never panics and never returns an error: a
/// failure is reported inside the result.
pub fn convert(source: &str, options: &ConvertOptions) -> ConversionResult {
    let mut ctx = ConversionContext::new(options);
    match run(source, &mut ctx) {
        Ok(code) => {
            if ctx.components.is_empty() {
                ctx.warn(NO_COMPONENTS_WARNING);
            }
            ConversionResult {
                success: ctx.errors.is_empty(),
                code,
                errors: ctx.errors,
                warnings: ctx.warnings,
                components: ctx.components,
            }
        }
        Err(err) => {
            tracing::debug!(error = %err, "conversion failed");
            ctx.errors.push(err.report_entry());
            ConversionResult {
                success: false,
                code: String::new(),
                errors: ctx.errors,
                warnings: ctx.warnings,
                components: Vec::new(),
            }
        }
    }
}

fn run(source: &str, ctx: &mut ConversionContext) -> Result<String> {
    let stripped = strip_imports(source)?;
    let converted = convert_components(&stripped, ctx)?;
    let body = converted.trim();
    if ctx.options.include_preamble {
        Ok(format!("{}\n\n{}\n", preamble(&ctx.options.import_path), body))
    } else {
        Ok(format!("{}\n", body))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMPORTS
// ═══════════════════════════════════════════════════════════════════════════════

/// React, alias (`@/`) and relative or nested module imports have no meaning
/// in the generated file.
fn is_stripped_import(path: &str) -> bool {
    path == "react" || path.starts_with("react/") || path.starts_with("@/") || path.contains('/')
}

/// Removes stripped import declarations together with the rest of their
/// line.
pub fn strip_imports(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let program = parse::parse_program(&allocator, source)?;
    let bytes = source.as_bytes();

    let mut replacements = Vec::new();
    for stmt in &program.body {
        let import = match stmt {
            Statement::ImportDeclaration(import) => import,
            _ => continue,
        };
        if !is_stripped_import(import.source.value.as_str()) {
            continue;
        }
        let mut start = import.span.start as usize;
        while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
            start -= 1;
        }
        let mut end = import.span.end as usize;
        while end < bytes.len() && matches!(bytes[end], b' ' | b'\t') {
            end += 1;
        }
        if bytes[end..].starts_with(b"\r\n") {
            end += 2;
        } else if bytes[end..].starts_with(b"\n") {
            end += 1;
        }
        tracing::debug!(path = %import.source.value, "stripping import");
        replacements.push((start as u32, end as u32, String::new()));
    }
    Ok(parse::splice(source, parse::full_span(source), replacements))
}

pub fn preamble(import_path: &str) -> String {
    format!(
        "{}\nimport {{\n  {}\n}} from '{}';",
        PREAMBLE_HEADER,
        PREAMBLE_SYMBOLS.join(", "),
        import_path
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi]
pub fn convert_react_native(source: String, options_json: Option<String>) -> napi::Result<ConversionResult> {
    let options = ConvertOptions::from_json(options_json.as_deref().unwrap_or(""))
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(convert(&source, &options))
}
