//! # React → Horizon UIComponent converter
//!
//! Rewrites React components (JSX, functional or class, hooks-style state and
//! effects) into Meta Horizon Worlds `UIComponent` classes whose
//! `initializeUI()` returns nested constructor calls such as
//! `View({ children: Text({ text: "Hi" }) })`.
//!
//! ## Conversion Invariants
//!
//! 1. **Best effort, honest report**: anything the converter cannot express
//!    is left as written and reported as a warning. Only structurally broken
//!    input fails, with a single `ConversionFailure` entry.
//!
//! 2. **Call-scoped state**: every conversion owns a fresh
//!    [`types::ConversionContext`]. Nothing is shared between calls, so
//!    conversions are deterministic and may run in parallel.
//!
//! 3. **One mapping table**: attribute and tag semantics live in
//!    [`mapping`] and nowhere else.
//!
//! 4. **Qualification**: inside the generated class, props become
//!    `this.props.x`, state becomes `this.x` and setters become `this.setX`.
//!    References are resolved with `oxc_semantic`, so a local declaration or
//!    parameter shadows a member only inside its own scope. Every pass is
//!    idempotent.
//!
//! 5. **Parsed, never scanned**: every stage parses its input with
//!    `oxc_parser` and edits the text through AST spans, so strings, comments,
//!    regular expressions and non-ASCII text are never misread. Input that
//!    does not parse fails the whole conversion.
//!
//! ## Pipeline
//!
//! `strip imports → locate components → extract hooks → lower markup →
//! qualify references → assemble class → prepend preamble`

mod attributes;
mod cache;
mod component;
mod discovery;
mod error;
mod hooks;
mod jsx_lowerer;
mod mapping;
mod options;
mod parse;
mod pipeline;
mod renamer;
mod types;

#[cfg(test)]
mod parse_tests;
#[cfg(test)]
mod safety_tests;

pub use attributes::parse_attributes;
pub use cache::{ConversionCache, DEFAULT_CACHE_DIR};
pub use discovery::{convert_directory, convert_file, discover_sources, FileConversion};
pub use error::{ConversionError, ErrorKind, ERR_CONVERSION_FAILURE};
pub use hooks::{extract_hooks, EffectInfo, HookExtraction};
pub use jsx_lowerer::{lower_expression, lower_markup, lower_statements};
pub use options::{ConvertOptions, StateConvention, DEFAULT_IMPORT_PATH};
pub use parse::{contains_markup, split_children};
pub use pipeline::{convert, strip_imports, ConversionPipeline, PipelineState};
pub use renamer::{qualify_expression, qualify_references, Bindings};
pub use types::{ComponentInfo, ConversionContext, ConversionResult, StateVariable};

#[cfg(feature = "napi")]
pub use discovery::convert_directory_native;
#[cfg(feature = "napi")]
pub use pipeline::convert_react_native;
