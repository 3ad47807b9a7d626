//! Reference qualification.
//!
//! Inside the generated class, props, state and setters are members, so bare
//! references to them gain a `this.` receiver. The code is parsed and its
//! scopes resolved first; only references that resolve to no declaration in
//! the code itself are candidates, so a parameter or a local in any nested
//! scope shadows a member exactly where JavaScript says it does. The pass is
//! idempotent because every rewritten name ends up behind a `.`.

use lazy_static::lazy_static;
use std::collections::HashSet;

use oxc_allocator::Allocator;
use oxc_ast::ast::{CallExpression, Expression, IdentifierReference, ObjectProperty, TSTypeName};
use oxc_ast_visit::{walk, Visit};
use oxc_semantic::{Scoping, SemanticBuilder};
use oxc_span::Span;

use crate::error::Result;
use crate::parse::{self, Replacement};

lazy_static! {
    /// Setter-shaped globals that are never component setters.
    static ref GLOBAL_SETTERS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("setTimeout");
        s.insert("setInterval");
        s.insert("setImmediate");
        s
    };
}

/// Names the pass qualifies.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    /// Name of the props parameter when it is not destructured.
    pub props_param: Option<String>,
    /// `(local, prop)` pairs from a destructured props parameter.
    pub destructured_props: Vec<(String, String)>,
    pub state_names: Vec<String>,
    pub setters: Vec<String>,
}

impl Bindings {
    /// Member expression standing in for a free reference to `name`.
    fn member_for(&self, name: &str, called: bool) -> Option<String> {
        if self.props_param.as_deref() == Some(name) {
            return Some("this.props".to_string());
        }
        if let Some((_, prop)) = self.destructured_props.iter().find(|(local, _)| local == name) {
            return Some(format!("this.props.{}", prop));
        }
        let known = self.state_names.iter().any(|s| s == name) || self.setters.iter().any(|s| s == name);
        (known || (called && is_setter_shaped(name))).then(|| format!("this.{}", name))
    }
}

/// Qualifies free references in a run of statements. A top-level `return`
/// is allowed.
pub fn qualify_references(code: &str, bindings: &Bindings) -> Result<String> {
    qualify_range(code, parse::full_span(code), bindings)
}

/// Qualifies free references in a single expression, such as a field
/// initialiser.
pub fn qualify_expression(code: &str, bindings: &Bindings) -> Result<String> {
    let wrapped = format!("({}\n)", code);
    qualify_range(&wrapped, Span::new(1, 1 + code.len() as u32), bindings)
}

fn qualify_range(text: &str, span: Span, bindings: &Bindings) -> Result<String> {
    let allocator = Allocator::default();
    let program = parse::parse_body(&allocator, text)?;
    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();

    let mut qualifier = Qualifier {
        scoping: &scoping,
        bindings,
        replacements: Vec::new(),
    };
    qualifier.visit_program(&program);
    Ok(parse::splice(text, span, qualifier.replacements))
}

/// `setX` where `X` is uppercase, excluding timer globals.
pub fn is_setter_shaped(name: &str) -> bool {
    name.strip_prefix("set")
        .and_then(|rest| rest.chars().next())
        .map_or(false, |c| c.is_ascii_uppercase())
        && !GLOBAL_SETTERS.contains(name)
}

struct Qualifier<'s> {
    scoping: &'s Scoping,
    bindings: &'s Bindings,
    replacements: Vec<Replacement>,
}

impl Qualifier<'_> {
    fn member_for(&self, ident: &IdentifierReference, called: bool) -> Option<String> {
        let declared = ident
            .reference_id
            .get()
            .and_then(|id| self.scoping.get_reference(id).symbol_id())
            .is_some();
        if declared {
            return None;
        }
        self.bindings.member_for(ident.name.as_str(), called)
    }
}

impl<'a> Visit<'a> for Qualifier<'_> {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        if let Some(member) = self.member_for(ident, false) {
            self.replacements.push((ident.span.start, ident.span.end, member));
        }
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(callee) = &call.callee {
            if let Some(member) = self.member_for(callee, true) {
                self.replacements.push((callee.span.start, callee.span.end, member));
                for arg in &call.arguments {
                    self.visit_argument(arg);
                }
                return;
            }
        }
        walk::walk_call_expression(self, call);
    }

    fn visit_object_property(&mut self, prop: &ObjectProperty<'a>) {
        if prop.shorthand {
            if let Expression::Identifier(ident) = &prop.value {
                if let Some(member) = self.member_for(ident, false) {
                    self.replacements
                        .push((prop.span.start, prop.span.end, format!("{}: {}", ident.name, member)));
                    return;
                }
            }
        }
        walk::walk_object_property(self, prop);
    }

    // Type positions never name members.
    fn visit_ts_type_name(&mut self, _name: &TSTypeName<'a>) {}
}
