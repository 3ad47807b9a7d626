//! Hook extraction.
//!
//! Pulls `useState` declarations out of a component body (they become class
//! fields plus setter accessors), lifts `useEffect` calls into commented
//! lifecycle blocks, and rewrites the remaining memo/ref hooks in place.
//! Hooks are recognised as calls, bare or through `React.`, so text that only
//! looks like a hook (in a string or a comment) is never touched.

use lazy_static::lazy_static;
use regex::Regex;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, BindingPattern, CallExpression, Expression, ExpressionStatement, FunctionBody,
    Statement, VariableDeclaration,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};

use crate::error::Result;
use crate::options::StateConvention;
use crate::parse::{self, Replacement};
use crate::types::{ConversionContext, StateVariable};

lazy_static! {
    static ref NUMBER_RE: Regex = Regex::new(r"^-?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap();
}

const EFFECT_WARNING: &str = "Converting useEffect - consider using component lifecycle methods";
const SUMMARY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectInfo {
    /// Contents of the dependency array; `None` when no array was given.
    pub deps: Option<String>,
    pub body: String,
    pub has_cleanup: bool,
}

impl EffectInfo {
    fn deps_label(&self) -> &str {
        match self.deps.as_deref() {
            None => "every render",
            Some("") => "no deps",
            Some(deps) => deps,
        }
    }

    /// `Effect [count]: document.title = ...`
    pub fn summary(&self) -> String {
        summarize(self.deps_label(), &self.body)
    }

    /// Commented block for `start()`, one entry per line, unindented.
    pub fn lifecycle_comment(&self) -> Vec<String> {
        let mut lines = vec![
            "// TODO: Move this useEffect logic into the appropriate lifecycle method".to_string(),
        ];
        match self.deps.as_deref() {
            None => lines.push("// Dependencies: none (runs after every render)".to_string()),
            Some(deps) => lines.push(format!("// Dependencies: [{}]", deps)),
        }
        for line in dedent(&self.body).lines() {
            if line.trim().is_empty() {
                lines.push("//".to_string());
            } else {
                lines.push(format!("// {}", line.trim_end()));
            }
        }
        lines
    }
}

#[derive(Debug, Clone, Default)]
pub struct HookExtraction {
    pub state: Vec<StateVariable>,
    pub effects: Vec<EffectInfo>,
    /// The body with state and effect declarations removed and the remaining
    /// hooks rewritten.
    pub body: String,
}

impl HookExtraction {
    pub fn state_names(&self) -> Vec<String> {
        self.state.iter().map(|s| s.name.clone()).collect()
    }

    pub fn setters(&self) -> Vec<String> {
        self.state.iter().map(|s| s.setter_name.clone()).collect()
    }
}

pub fn extract_hooks(body: &str, ctx: &mut ConversionContext) -> Result<HookExtraction> {
    let allocator = Allocator::default();
    let program = parse::parse_body(&allocator, body)?;

    let mut collector = HookCollector {
        source: body,
        ctx,
        state: Vec::new(),
        effects: Vec::new(),
        replacements: Vec::new(),
    };
    collector.visit_program(&program);

    let HookCollector {
        state,
        effects,
        replacements,
        ..
    } = collector;
    Ok(HookExtraction {
        state,
        effects,
        body: parse::splice(body, parse::full_span(body), replacements),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// TYPES & TEMPLATES
// ═══════════════════════════════════════════════════════════════════════════════

/// Type of a literal initialiser.
pub fn infer_type(value: &str) -> &'static str {
    let value = value.trim();
    if value.is_empty() || value == "null" || value == "undefined" {
        return "any";
    }
    if value.starts_with('\'') || value.starts_with('"') || value.starts_with('`') {
        return "string";
    }
    if NUMBER_RE.is_match(value) {
        return "number";
    }
    if value == "true" || value == "false" {
        return "boolean";
    }
    if value.starts_with('[') {
        return "any[]";
    }
    if value.starts_with('{') {
        return "object";
    }
    "any"
}

pub fn state_field(var: &StateVariable, convention: StateConvention) -> String {
    match convention {
        StateConvention::Binding => format!(
            "private {}: Binding<{}> = new Binding({});",
            var.name, var.inferred_type, var.initial_value
        ),
        StateConvention::Field => format!(
            "private {}: {} = {};",
            var.name, var.inferred_type, var.initial_value
        ),
    }
}

/// Setter accessor, unindented.
pub fn state_accessor(var: &StateVariable, convention: StateConvention) -> String {
    let update = match convention {
        StateConvention::Binding => format!("this.{}.set(newValue);", var.name),
        StateConvention::Field => format!("this.{} = newValue;", var.name),
    };
    format!(
        "private {} = (newValue: {}) => {{\n  {}\n}};",
        var.setter_name, var.inferred_type, update
    )
}

/// `Effect [label]: <first line, truncated>...`
pub fn summarize(label: &str, body: &str) -> String {
    let first_line = body.trim().lines().next().unwrap_or("").trim();
    let head: String = first_line.chars().take(SUMMARY_LIMIT).collect();
    format!("Effect [{}]: {}...", label, head)
}

/// Removes the indentation shared by every non-blank line.
pub fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    text.lines()
        .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

// ═══════════════════════════════════════════════════════════════════════════════
// CALL SITES
// ═══════════════════════════════════════════════════════════════════════════════

/// `useX` for `useX(...)` and `React.useX(...)`.
fn hook_name<'c>(call: &'c CallExpression<'_>) -> Option<&'c str> {
    let name = match &call.callee {
        Expression::Identifier(id) => id.name.as_str(),
        Expression::StaticMemberExpression(member) => match &member.object {
            Expression::Identifier(object) if object.name.as_str() == "React" => {
                member.property.name.as_str()
            }
            _ => return None,
        },
        _ => return None,
    };
    name.starts_with("use").then_some(name)
}

/// `[value, setValue]`.
fn state_pair(pattern: &BindingPattern<'_>) -> Option<(String, String)> {
    match pattern {
        BindingPattern::ArrayPattern(arr) if arr.rest.is_none() && arr.elements.len() == 2 => {
            match (&arr.elements[0], &arr.elements[1]) {
                (
                    Some(BindingPattern::BindingIdentifier(value)),
                    Some(BindingPattern::BindingIdentifier(setter)),
                ) => Some((value.name.to_string(), setter.name.to_string())),
                _ => None,
            }
        }
        _ => None,
    }
}

fn has_cleanup(body: &FunctionBody<'_>) -> bool {
    body.statements
        .iter()
        .any(|s| matches!(s, Statement::ReturnStatement(_)))
}

struct HookCollector<'s, 'c, 'o> {
    source: &'s str,
    ctx: &'c mut ConversionContext<'o>,
    state: Vec<StateVariable>,
    effects: Vec<EffectInfo>,
    replacements: Vec<Replacement>,
}

impl<'s> HookCollector<'s, '_, '_> {
    fn text(&self, span: Span) -> &'s str {
        parse::slice(self.source, span)
    }

    /// Text between the first and last character of `span`, e.g. inside
    /// brackets or braces.
    fn inner_text(&self, span: Span) -> &'s str {
        self.text(Span::new(span.start + 1, span.end.saturating_sub(1).max(span.start + 1)))
    }

    fn argument(&self, call: &CallExpression<'_>, index: usize) -> Option<&'s str> {
        call.arguments.get(index).map(|arg| self.text(arg.span()).trim())
    }

    /// Contents of a dependency array; other expressions are kept whole.
    fn deps(&self, arg: Option<&Argument<'_>>) -> Option<String> {
        let arg = arg?;
        Some(match arg.as_expression() {
            Some(Expression::ArrayExpression(arr)) => self.inner_text(arr.span).trim().to_string(),
            _ => self.text(arg.span()).trim().to_string(),
        })
    }

    fn replace(&mut self, span: Span, replacement: String) {
        self.replacements.push((span.start, span.end, replacement));
    }

    fn extract_state(&mut self, value: String, setter: String, call: &CallExpression<'_>) {
        let initial = self.argument(call, 0).unwrap_or("");
        let declared = call
            .type_arguments
            .as_ref()
            .map(|args| self.inner_text(args.span).trim().to_string());
        let var = StateVariable {
            name: value,
            setter_name: setter,
            inferred_type: declared.unwrap_or_else(|| infer_type(initial).to_string()),
            initial_value: if initial.is_empty() {
                "undefined".to_string()
            } else {
                initial.to_string()
            },
        };
        self.ctx.warn(format!(
            "Converting useState for {} - implement state management for Meta Horizon",
            var.name
        ));
        tracing::debug!(state = %var.name, ty = %var.inferred_type, "extracted state");
        self.state.push(var);
    }

    fn extract_effect(&mut self, call: &CallExpression<'_>) {
        let callback = call.arguments.first().and_then(|arg| arg.as_expression());
        let (body, cleanup) = match callback {
            Some(Expression::ArrowFunctionExpression(arrow)) => match arrow.get_expression() {
                Some(expr) => (self.text(expr.span()).trim(), false),
                None => (self.inner_text(arrow.body.span), has_cleanup(&arrow.body)),
            },
            Some(Expression::FunctionExpression(func)) => match &func.body {
                Some(body) => (self.inner_text(body.span), has_cleanup(body)),
                None => ("", false),
            },
            Some(other) => (self.text(other.span()).trim(), false),
            None => ("", false),
        };

        let effect = EffectInfo {
            deps: self.deps(call.arguments.get(1)),
            body: body.trim_matches('\n').to_string(),
            has_cleanup: cleanup,
        };
        self.ctx.warn(EFFECT_WARNING);
        if effect.has_cleanup {
            self.ctx
                .warn("useEffect cleanup function needs manual conversion - no Horizon teardown equivalent");
        }
        self.effects.push(effect);
    }

    /// `(value) /* Memoized, deps: [...] */`; a block factory is invoked
    /// in place.
    fn memo(&self, call: &CallExpression<'_>) -> String {
        let factory = call.arguments.first().and_then(|arg| arg.as_expression());
        let value = match factory {
            Some(Expression::ArrowFunctionExpression(arrow)) => match arrow.get_expression() {
                Some(expr) => self.text(expr.span()).trim().to_string(),
                None => format!("({})()", self.text(arrow.span)),
            },
            Some(other) => format!("{}()", self.text(other.span())),
            None => "undefined".to_string(),
        };
        let deps = self.deps(call.arguments.get(1)).unwrap_or_default();
        format!("({}) /* Memoized, deps: [{}] */", value, deps)
    }

    fn ref_object(&self, call: &CallExpression<'_>) -> String {
        format!("{{ current: {} }}", self.argument(call, 0).unwrap_or("undefined"))
    }
}

impl<'a> Visit<'a> for HookCollector<'_, '_, '_> {
    fn visit_variable_declaration(&mut self, decl: &VariableDeclaration<'a>) {
        if decl.declarations.len() == 1 {
            let declarator = &decl.declarations[0];
            if let Some(Expression::CallExpression(call)) = &declarator.init {
                match hook_name(call) {
                    Some("useState") => {
                        if let Some((value, setter)) = state_pair(&declarator.id) {
                            self.extract_state(value, setter, call);
                            self.replace(decl.span, String::new());
                            return;
                        }
                    }
                    Some("useRef") => {
                        if let BindingPattern::BindingIdentifier(id) = &declarator.id {
                            self.ctx.warn(format!(
                                "Converting useRef for {} - refs have no Horizon equivalent",
                                id.name
                            ));
                            let mut line = format!(
                                "const {} = {}; // TODO: Convert to Horizon equivalent",
                                id.name,
                                self.ref_object(call)
                            );
                            let rest = &self.source[decl.span.end as usize..];
                            if !rest.split('\n').next().unwrap_or("").trim().is_empty() {
                                line.push('\n');
                            }
                            self.replace(decl.span, line);
                            return;
                        }
                    }
                    _ => {}
                }
            }
        }
        walk::walk_variable_declaration(self, decl);
    }

    fn visit_expression_statement(&mut self, stmt: &ExpressionStatement<'a>) {
        if let Expression::CallExpression(call) = &stmt.expression {
            if hook_name(call) == Some("useEffect") {
                self.extract_effect(call);
                self.replace(stmt.span, String::new());
                return;
            }
        }
        walk::walk_expression_statement(self, stmt);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        match hook_name(call) {
            Some("useCallback") => {
                self.ctx.warn("Converting useCallback - dependency list kept as a comment");
                let callback = self.argument(call, 0).unwrap_or("undefined");
                let deps = self.deps(call.arguments.get(1)).unwrap_or_default();
                let replacement = format!("({}) /* Dependencies: [{}] */", callback, deps);
                self.replace(call.span, replacement);
            }
            Some("useMemo") => {
                self.ctx.warn("Converting useMemo - value is recomputed on every render");
                let replacement = self.memo(call);
                self.replace(call.span, replacement);
            }
            Some("useRef") => {
                self.ctx.warn("Converting useRef - refs have no Horizon equivalent");
                let replacement = self.ref_object(call);
                self.replace(call.span, replacement);
            }
            Some("useState") => {
                self.ctx.warn(
                    "useState call left unconverted - expected const [value, setValue] = useState(...)",
                );
                walk::walk_call_expression(self, call);
            }
            _ => walk::walk_call_expression(self, call),
        }
    }
}
