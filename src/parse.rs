//! Parser front-end.
//!
//! Every stage of the pipeline works on source text and edits it through
//! spans: it parses its input with oxc, collects `(start, end, replacement)`
//! edits while visiting the tree, and splices them back into the text. Spans
//! always fall on character boundaries, so the splice never cuts a multi-byte
//! character in half.

use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, JSXChild, JSXElement, JSXFragment, Program};
use oxc_ast_visit::Visit;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::{GetSpan, SourceType, Span};

use crate::error::{ConversionError, Result};

/// `(start, end, replacement)` over byte offsets of the parsed text.
pub type Replacement = (u32, u32, String);

pub fn source_type() -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true)
}

/// Parses a whole module.
pub fn parse_program<'a>(allocator: &'a Allocator, text: &'a str) -> Result<Program<'a>> {
    let ret = Parser::new(allocator, text, source_type()).parse();
    if ret.panicked || !ret.errors.is_empty() {
        return Err(ConversionError::syntax(&ret.errors));
    }
    Ok(ret.program)
}

/// Parses the statements of a function body lifted out of its function, so a
/// top-level `return` is accepted.
pub fn parse_body<'a>(allocator: &'a Allocator, text: &'a str) -> Result<Program<'a>> {
    let options = ParseOptions {
        allow_return_outside_function: true,
        ..ParseOptions::default()
    };
    let ret = Parser::new(allocator, text, source_type())
        .with_options(options)
        .parse();
    if ret.panicked || !ret.errors.is_empty() {
        return Err(ConversionError::syntax(&ret.errors));
    }
    Ok(ret.program)
}

pub fn parse_expression<'a>(allocator: &'a Allocator, text: &'a str) -> Result<Expression<'a>> {
    Parser::new(allocator, text, source_type())
        .parse_expression()
        .map_err(|errors| ConversionError::syntax(&errors))
}

pub fn slice(text: &str, span: Span) -> &str {
    &text[span.start as usize..span.end as usize]
}

/// Text of `span` with `replacements` applied. Edits outside the span, or
/// inside an edit that was already applied, are dropped.
pub fn splice(text: &str, span: Span, mut replacements: Vec<Replacement>) -> String {
    replacements.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut out = String::with_capacity((span.end - span.start) as usize);
    let mut copied = span.start;
    for (start, end, replacement) in replacements {
        if start < copied || end > span.end {
            continue;
        }
        out.push_str(&text[copied as usize..start as usize]);
        out.push_str(&replacement);
        copied = end;
    }
    out.push_str(&text[copied as usize..span.end as usize]);
    out
}

/// Span covering all of `text`.
pub fn full_span(text: &str) -> Span {
    Span::new(0, text.len() as u32)
}

// ═══════════════════════════════════════════════════════════════════════════════
// MARKUP
// ═══════════════════════════════════════════════════════════════════════════════

/// Set when a walk reaches any element or fragment.
#[derive(Debug, Default)]
pub struct MarkupDetector {
    pub found: bool,
}

impl<'a> Visit<'a> for MarkupDetector {
    fn visit_jsx_element(&mut self, _it: &JSXElement<'a>) {
        self.found = true;
    }

    fn visit_jsx_fragment(&mut self, _it: &JSXFragment<'a>) {
        self.found = true;
    }
}

pub fn contains_markup(code: &str) -> bool {
    let allocator = Allocator::default();
    match parse_body(&allocator, code) {
        Ok(program) => {
            let mut detector = MarkupDetector::default();
            detector.visit_program(&program);
            detector.found
        }
        Err(_) => false,
    }
}

/// Source text of each top-level sibling in a run of markup children.
/// Whitespace-only text between siblings is dropped and text runs are
/// trimmed.
pub fn split_children(text: &str) -> Result<Vec<String>> {
    let wrapped = format!("<>{}</>", text);
    let allocator = Allocator::default();
    let fragment = match parse_expression(&allocator, &wrapped)? {
        Expression::JSXFragment(fragment) => fragment,
        other => {
            return Err(ConversionError::Syntax {
                message: format!("expected markup children, found {}", slice(&wrapped, other.span())),
            })
        }
    };

    let mut units = Vec::new();
    for child in &fragment.children {
        let unit = match child {
            JSXChild::Text(t) => slice(&wrapped, t.span).trim(),
            other => slice(&wrapped, other.span()),
        };
        if !unit.is_empty() {
            units.push(unit.to_string());
        }
    }
    Ok(units)
}

/// Capitalised or dotted tag names refer to components.
pub fn is_component_tag(tag_name: &str) -> bool {
    tag_name.contains('.')
        || tag_name
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_uppercase())
}
