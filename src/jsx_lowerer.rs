//! Markup lowering for the Horizon UI model.
//!
//! Turns markup into nested constructor calls (`View({ ... })`,
//! `Text({ ... })`, `DynamicList({ ... })`). Elements are looked up in the tag
//! table in [`crate::mapping`]; anything without a rule is left as written and
//! reported.
//!
//! The [`Lowerer`] walks parsed code and records a replacement for every
//! outermost element, fragment and `.map(...)` call that renders markup; the
//! code around them is copied through untouched.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    CallExpression, Expression, JSXChild, JSXElement, JSXFragment, ParenthesizedExpression,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};

use crate::attributes::{self, quote_string};
use crate::error::Result;
use crate::mapping::{self, TagKind};
use crate::parse::{self, MarkupDetector, Replacement};
use crate::types::ConversionContext;

const MAP_WARNING: &str = "Converting array.map to DynamicList";

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Lowers a run of markup children (or a leaf of text and `{expr}` pieces).
///
/// With no element among the siblings the run is text content; otherwise one
/// sibling lowers alone and several become a list literal.
pub fn lower_markup(text: &str, ctx: &mut ConversionContext) -> Result<String> {
    let wrapped = format!("<>{}</>", text.trim());
    let allocator = Allocator::default();
    let expr = parse::parse_expression(&allocator, &wrapped)?;
    let mut lowerer = Lowerer::new(&wrapped, ctx);

    let children = match &expr {
        Expression::JSXFragment(fragment) => &fragment.children,
        other => return Ok(lowerer.render(other)),
    };
    let has_elements = children
        .iter()
        .any(|c| matches!(c, JSXChild::Element(_) | JSXChild::Fragment(_)));
    if !has_elements {
        return Ok(lowerer.text_content(children).into_expression());
    }
    let lowered = lowerer.lower_children(children);
    Ok(collapse(lowered).unwrap_or_else(empty_view))
}

/// Lowers every piece of markup embedded in an expression, leaving the
/// surrounding code as written. `xs.map(x => <li/>)` becomes a `DynamicList`.
pub fn lower_expression(code: &str, ctx: &mut ConversionContext) -> Result<String> {
    let code = code.trim();
    let allocator = Allocator::default();
    let expr = parse::parse_expression(&allocator, code)?;
    Ok(Lowerer::new(code, ctx).render(&expr))
}

/// Lowers the markup in a run of statements, e.g. a component body.
pub fn lower_statements(body: &str, ctx: &mut ConversionContext) -> Result<String> {
    let allocator = Allocator::default();
    let program = parse::parse_body(&allocator, body)?;
    let mut lowerer = Lowerer::new(body, ctx);
    Ok(lowerer.render_with(parse::full_span(body), |l| l.visit_program(&program)))
}

pub fn empty_view() -> String {
    format!("{}({{}})", mapping::VIEW)
}

/// One child stays as-is, several become a list literal.
fn collapse(mut lowered: Vec<String>) -> Option<String> {
    match lowered.len() {
        0 => None,
        1 => lowered.pop(),
        _ => Some(format!("[{}]", lowered.join(", "))),
    }
}

fn call(constructor: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        format!("{}({{}})", constructor)
    } else {
        format!("{}({{ {} }})", constructor, attributes::join_entries(entries))
    }
}

/// The element or fragment inside any number of parentheses.
fn markup_inside<'e, 'a>(expr: &'e Expression<'a>) -> Option<&'e Expression<'a>> {
    match expr {
        Expression::JSXElement(_) | Expression::JSXFragment(_) => Some(expr),
        Expression::ParenthesizedExpression(paren) => markup_inside(&paren.expression),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOWERER
// ═══════════════════════════════════════════════════════════════════════════════

pub(crate) struct Lowerer<'s, 'c, 'o> {
    source: &'s str,
    pub(crate) ctx: &'c mut ConversionContext<'o>,
    /// One frame per span being rendered.
    frames: Vec<Vec<Replacement>>,
}

impl<'s, 'c, 'o> Lowerer<'s, 'c, 'o> {
    pub(crate) fn new(source: &'s str, ctx: &'c mut ConversionContext<'o>) -> Self {
        Self {
            source,
            ctx,
            frames: Vec::new(),
        }
    }

    pub(crate) fn text(&self, span: Span) -> &'s str {
        parse::slice(self.source, span)
    }

    fn replace(&mut self, span: Span, lowered: String) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push((span.start, span.end, lowered));
        }
    }

    /// Source of `span` with the markup reached by `walk` lowered.
    fn render_with<F>(&mut self, span: Span, walk: F) -> String
    where
        F: FnOnce(&mut Self),
    {
        self.frames.push(Vec::new());
        walk(self);
        let replacements = self.frames.pop().unwrap_or_default();
        parse::splice(self.source, span, replacements)
    }

    pub(crate) fn render(&mut self, expr: &Expression<'_>) -> String {
        self.render_with(expr.span(), |l| l.visit_expression(expr))
    }

    /// Lowers an element or fragment; any other expression is rendered.
    pub(crate) fn lower_markup_expression(&mut self, expr: &Expression<'_>) -> String {
        match expr {
            Expression::JSXElement(el) => self.lower_element(el),
            Expression::JSXFragment(fragment) => self.lower_fragment(fragment),
            other => self.render(other),
        }
    }

    /// `source.map(params => markup)` as a `DynamicList`.
    fn dynamic_list(&mut self, call: &CallExpression<'_>) -> Option<String> {
        let member = match &call.callee {
            Expression::StaticMemberExpression(member)
                if member.property.name.as_str() == "map" =>
            {
                member
            }
            _ => return None,
        };
        let arrow = match call.arguments.first().and_then(|arg| arg.as_expression()) {
            Some(Expression::ArrowFunctionExpression(arrow)) => arrow,
            _ => return None,
        };
        let mut detector = MarkupDetector::default();
        detector.visit_function_body(&arrow.body);
        if !detector.found {
            return None;
        }
        self.ctx.warn(MAP_WARNING);

        let data = self.render(&member.object);
        let params = self.text(arrow.params.span).trim();
        let params = if params.starts_with('(') {
            params.to_string()
        } else {
            format!("({})", params)
        };
        let render_item = match arrow.get_expression() {
            Some(expr) => match markup_inside(expr) {
                Some(markup) => self.lower_markup_expression(markup),
                None => self.render(expr),
            },
            None => self.render_with(arrow.body.span, |l| l.visit_function_body(&arrow.body)),
        };

        Some(format!(
            "{}({{ data: {}, renderItem: {} => {} }})",
            mapping::DYNAMIC_LIST,
            data,
            params,
            render_item
        ))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // NODES
    // ═══════════════════════════════════════════════════════════════════════════

    fn lower_child(&mut self, child: &JSXChild<'_>) -> Option<String> {
        match child {
            JSXChild::Text(text) => {
                let text = normalize_text(self.text(text.span));
                let text = text.trim();
                (!text.is_empty()).then(|| quote_string(text))
            }
            JSXChild::Element(el) => Some(self.lower_element(el)),
            JSXChild::Fragment(fragment) => Some(self.lower_fragment(fragment)),
            // `{/* comment */}` holds an empty expression.
            JSXChild::ExpressionContainer(container) => {
                container.expression.as_expression().map(|e| self.render(e))
            }
            JSXChild::Spread(spread) => Some(format!("...{}", self.render(&spread.expression))),
        }
    }

    fn lower_children(&mut self, children: &[JSXChild<'_>]) -> Vec<String> {
        children.iter().filter_map(|c| self.lower_child(c)).collect()
    }

    pub(crate) fn lower_fragment(&mut self, fragment: &JSXFragment<'_>) -> String {
        let mut lowered = self.lower_children(&fragment.children);
        match lowered.len() {
            0 => empty_view(),
            1 => lowered.pop().unwrap_or_else(empty_view),
            _ => call(mapping::VIEW, &[format!("children: [{}]", lowered.join(", "))]),
        }
    }

    fn lower_container(
        &mut self,
        constructor: &str,
        mut entries: Vec<String>,
        children: &[JSXChild<'_>],
    ) -> String {
        if let Some(children) = collapse(self.lower_children(children)) {
            entries.push(format!("children: {}", children));
        }
        call(constructor, &entries)
    }

    pub(crate) fn lower_element(&mut self, el: &JSXElement<'_>) -> String {
        let tag = self.text(el.opening_element.name.span());
        let rule = match mapping::tag_rule(tag) {
            Some(rule) => rule,
            None => return self.pass_through(el, tag),
        };
        if let Some(warning) = rule.warning {
            self.ctx.warn(warning);
        }
        let attrs = attributes::collect_attributes(self, &el.opening_element.attributes);
        let mut entries = attributes::attribute_entries(attrs, self.ctx);

        match rule.kind {
            TagKind::Container => self.lower_container(rule.constructor, entries, &el.children),
            TagKind::Landmark => format!(
                "/* TODO: <{}> has no Horizon equivalent - review layout */ {}",
                tag,
                self.lower_container(rule.constructor, entries, &el.children)
            ),
            TagKind::Text => match self.text_content(&el.children) {
                TextContent::Nested => {
                    self.ctx.warn(format!(
                        "Text element <{}> contains nested elements - converted to View",
                        tag
                    ));
                    self.lower_container(mapping::VIEW, entries, &el.children)
                }
                content => {
                    entries.insert(0, format!("text: {}", content.into_expression()));
                    call(rule.constructor, &entries)
                }
            },
            TagKind::Pressable => {
                match self.text_content(&el.children) {
                    TextContent::Empty => {}
                    TextContent::Nested => {
                        if let Some(children) = collapse(self.lower_children(&el.children)) {
                            entries.push(format!("children: {}", children));
                        }
                    }
                    TextContent::Lowered(text) => {
                        entries.push(format!("children: {}({{ text: {} }})", mapping::TEXT, text));
                    }
                }
                call(rule.constructor, &entries)
            }
            TagKind::Image => call(rule.constructor, &entries),
        }
    }

    fn pass_through(&mut self, el: &JSXElement<'_>, tag: &str) -> String {
        if self.ctx.options.warn_on_passthrough {
            if parse::is_component_tag(tag) {
                self.ctx.warn(format!(
                    "Component <{}> left unconverted - manual conversion needed",
                    tag
                ));
            } else {
                self.ctx.warn(format!(
                    "Unsupported element <{}> left unconverted - manual conversion needed",
                    tag
                ));
            }
        }
        self.text(el.span).to_string()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TEXT
    // ═══════════════════════════════════════════════════════════════════════════

    fn text_content(&mut self, children: &[JSXChild<'_>]) -> TextContent {
        let nested = children
            .iter()
            .any(|c| matches!(c, JSXChild::Element(_) | JSXChild::Fragment(_)));
        if nested {
            return TextContent::Nested;
        }

        let mut pieces = Vec::new();
        for child in children {
            match child {
                JSXChild::Text(text) => {
                    let text = normalize_text(self.text(text.span));
                    if !text.is_empty() {
                        pieces.push(Piece::Text(text));
                    }
                }
                JSXChild::ExpressionContainer(container) => {
                    if let Some(expr) = container.expression.as_expression() {
                        pieces.push(Piece::Expr(self.render(expr)));
                    }
                }
                JSXChild::Spread(spread) => {
                    pieces.push(Piece::Expr(self.render(&spread.expression)));
                }
                JSXChild::Element(_) | JSXChild::Fragment(_) => {}
            }
        }

        if let Some(Piece::Text(t)) = pieces.first_mut() {
            *t = t.trim_start().to_string();
        }
        if let Some(Piece::Text(t)) = pieces.last_mut() {
            *t = t.trim_end().to_string();
        }
        pieces.retain(|p| !matches!(p, Piece::Text(t) if t.is_empty()));

        let content = match pieces.as_slice() {
            [] => return TextContent::Empty,
            [Piece::Expr(expr)] => expr.clone(),
            _ if pieces.iter().all(|p| matches!(p, Piece::Text(_))) => {
                let joined: String = pieces
                    .iter()
                    .map(|p| match p {
                        Piece::Text(t) | Piece::Expr(t) => t.as_str(),
                    })
                    .collect();
                quote_string(&joined)
            }
            _ => {
                let mut template = String::from("`");
                for piece in &pieces {
                    match piece {
                        Piece::Text(t) => template.push_str(&escape_template(t)),
                        Piece::Expr(e) => {
                            template.push_str("${");
                            template.push_str(e);
                            template.push('}');
                        }
                    }
                }
                template.push('`');
                template
            }
        };
        TextContent::Lowered(content)
    }
}

impl<'a> Visit<'a> for Lowerer<'_, '_, '_> {
    fn visit_jsx_element(&mut self, it: &JSXElement<'a>) {
        let lowered = self.lower_element(it);
        self.replace(it.span, lowered);
    }

    fn visit_jsx_fragment(&mut self, it: &JSXFragment<'a>) {
        let lowered = self.lower_fragment(it);
        self.replace(it.span, lowered);
    }

    fn visit_parenthesized_expression(&mut self, it: &ParenthesizedExpression<'a>) {
        match markup_inside(&it.expression) {
            Some(markup) => {
                let lowered = self.lower_markup_expression(markup);
                self.replace(it.span, lowered);
            }
            None => walk::walk_parenthesized_expression(self, it),
        }
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        match self.dynamic_list(it) {
            Some(list) => self.replace(it.span, list),
            None => walk::walk_call_expression(self, it),
        }
    }
}

enum TextContent {
    Empty,
    /// A quoted string, a raw expression or a template literal.
    Lowered(String),
    /// Children include elements; not representable as `text:`.
    Nested,
}

impl TextContent {
    fn into_expression(self) -> String {
        match self {
            TextContent::Lowered(s) => s,
            _ => quote_string(""),
        }
    }
}

enum Piece {
    Text(String),
    Expr(String),
}

/// Whitespace rules for markup text: lines are trimmed where they meet a line
/// break, blank lines vanish, and the remaining lines are joined by one space.
pub fn normalize_text(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len() - 1;
    let is_blank = |c: char| c == ' ' || c == '\t' || c == '\r';
    let mut kept = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let mut line: &str = line;
        if i > 0 {
            line = line.trim_start_matches(is_blank);
        }
        if i < last {
            line = line.trim_end_matches(is_blank);
        }
        if !line.is_empty() {
            kept.push(line);
        }
    }
    kept.join(" ")
}

fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
