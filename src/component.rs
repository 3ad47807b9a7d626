//! Component recognition and class assembly.
//!
//! The module is parsed once and its top-level statements inspected.
//! Capitalised functions whose bodies render markup are rewritten into
//! `UIComponent` subclasses; classes extending `React.Component` only get
//! their base class and render method renamed. Definitions nested inside
//! other code are left alone. Every recognised definition records exactly one
//! [`ComponentInfo`], in source order.

use std::collections::HashMap;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrowFunctionExpression, AssignmentExpression, AssignmentTarget, BindingPattern, Class,
    ClassElement, Declaration, ExportDefaultDeclarationKind, Expression, FormalParameter,
    FormalParameters, Function, FunctionBody, ObjectExpression, ObjectPropertyKind, Program,
    PropertyKey, ReturnStatement, Statement, StaticMemberExpression, TSSignature, TSType,
    TSInterfaceDeclaration, TSTypeAliasDeclaration, TSTypeAnnotation, TSTypeName,
    VariableDeclaration,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};
use oxc_syntax::scope::ScopeFlags;

use crate::error::{ConversionError, Result};
use crate::hooks::{self, HookExtraction};
use crate::jsx_lowerer;
use crate::options::StateConvention;
use crate::parse::{self, MarkupDetector};
use crate::renamer::{self, Bindings};
use crate::types::{ComponentInfo, ConversionContext};

const BASE_CLASS: &str = "UIComponent";

const LIFECYCLE_METHODS: &[&str] = &["componentDidMount", "componentDidUpdate", "componentWillUnmount"];

/// Member names of every interface and type alias declared at the top level.
/// Aliases of anything but an object type map to no members.
type TypeDecls = HashMap<String, Vec<String>>;

// ═══════════════════════════════════════════════════════════════════════════════
// DEFINITIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Export {
    None,
    Named,
    Default,
}

impl Export {
    fn class_keyword(self) -> &'static str {
        match self {
            Export::Default => "export default class",
            Export::Named | Export::None => "export class",
        }
    }
}

#[derive(Debug)]
struct FunctionalDef {
    name: String,
    export: Export,
    props: PropsShape,
    /// Block contents; an expression body is wrapped in a `return`.
    body: String,
    has_return: bool,
    span: Span,
}

#[derive(Debug)]
struct ClassDef {
    name: String,
    props: Vec<String>,
    state: Vec<String>,
    effects: Vec<String>,
    /// The base class name, e.g. `React.Component`.
    base: Span,
    /// `render()` up to its opening brace.
    render_head: Option<Span>,
    span: Span,
}

#[derive(Debug)]
enum Definition {
    Functional(FunctionalDef),
    Class(ClassDef),
}

impl Definition {
    fn name(&self) -> &str {
        match self {
            Definition::Functional(f) => &f.name,
            Definition::Class(c) => &c.name,
        }
    }

    fn span(&self) -> Span {
        match self {
            Definition::Functional(f) => f.span,
            Definition::Class(c) => c.span,
        }
    }
}

fn is_component_name(name: &str) -> bool {
    name.chars().next().map_or(false, |c| c.is_ascii_uppercase())
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// Rewrites every component definition in `source`; code between
/// definitions is copied through unchanged.
pub fn convert_components(source: &str, ctx: &mut ConversionContext) -> Result<String> {
    let allocator = Allocator::default();
    let program = parse::parse_program(&allocator, source)?;
    let locator = Locator {
        source,
        decls: collect_type_decls(&program),
        generate: ctx.options.generate_props_interface,
    };

    let mut replacements = Vec::new();
    for def in locator.locate(&program) {
        let converted = match &def {
            Definition::Functional(f) => convert_functional(f, ctx),
            Definition::Class(c) => Ok(convert_class(c, source, ctx)),
        }
        .map_err(|e| ConversionError::in_component(def.name(), e))?;
        let span = def.span();
        replacements.push((span.start, span.end, converted));
    }
    Ok(parse::splice(source, parse::full_span(source), replacements))
}

enum Candidate<'b, 'a> {
    Variable(&'b VariableDeclaration<'a>),
    Function(&'b Function<'a>),
    Class(&'b Class<'a>),
}

fn candidate<'b, 'a>(stmt: &'b Statement<'a>) -> Option<(Export, Candidate<'b, 'a>)> {
    match stmt {
        Statement::VariableDeclaration(decl) => Some((Export::None, Candidate::Variable(decl))),
        Statement::FunctionDeclaration(func) => Some((Export::None, Candidate::Function(func))),
        Statement::ClassDeclaration(class) => Some((Export::None, Candidate::Class(class))),
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::VariableDeclaration(decl)) => {
                Some((Export::Named, Candidate::Variable(decl)))
            }
            Some(Declaration::FunctionDeclaration(func)) => {
                Some((Export::Named, Candidate::Function(func)))
            }
            Some(Declaration::ClassDeclaration(class)) => Some((Export::Named, Candidate::Class(class))),
            _ => None,
        },
        Statement::ExportDefaultDeclaration(export) => match &export.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                Some((Export::Default, Candidate::Function(func)))
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                Some((Export::Default, Candidate::Class(class)))
            }
            _ => None,
        },
        _ => None,
    }
}

fn collect_type_decls(program: &Program<'_>) -> TypeDecls {
    let mut decls = TypeDecls::new();
    for stmt in &program.body {
        let (name, members) = match stmt {
            Statement::TSInterfaceDeclaration(interface) => interface_members(interface),
            Statement::TSTypeAliasDeclaration(alias) => alias_members(alias),
            Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(Declaration::TSInterfaceDeclaration(interface)) => interface_members(interface),
                Some(Declaration::TSTypeAliasDeclaration(alias)) => alias_members(alias),
                _ => continue,
            },
            _ => continue,
        };
        decls.insert(name, members);
    }
    decls
}

fn interface_members(interface: &TSInterfaceDeclaration<'_>) -> (String, Vec<String>) {
    (interface.id.name.to_string(), signature_names(&interface.body.body))
}

fn alias_members(alias: &TSTypeAliasDeclaration<'_>) -> (String, Vec<String>) {
    let members = match &alias.type_annotation {
        TSType::TSTypeLiteral(literal) => signature_names(&literal.members),
        _ => Vec::new(),
    };
    (alias.id.name.to_string(), members)
}

fn property_key_name(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(id.name.to_string()),
        PropertyKey::StringLiteral(s) => Some(s.value.to_string()),
        _ => None,
    }
}

/// Property and method names of an object type, first-seen order.
fn signature_names(signatures: &[TSSignature<'_>]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for signature in signatures {
        let key = match signature {
            TSSignature::TSPropertySignature(prop) => &prop.key,
            TSSignature::TSMethodSignature(method) => &method.key,
            _ => continue,
        };
        if let Some(name) = property_key_name(key) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOCATING
// ═══════════════════════════════════════════════════════════════════════════════

struct FunctionParts<'b, 'a> {
    params: &'b FormalParameters<'a>,
    body: &'b FunctionBody<'a>,
    /// Body expression of an expression-bodied arrow.
    expression: Option<Span>,
}

struct Locator<'s> {
    source: &'s str,
    decls: TypeDecls,
    generate: bool,
}

impl<'s> Locator<'s> {
    fn text(&self, span: Span) -> &'s str {
        parse::slice(self.source, span)
    }

    fn block_text(&self, body: &FunctionBody<'_>) -> &'s str {
        let span = body.span;
        self.text(Span::new(span.start + 1, span.end.saturating_sub(1).max(span.start + 1)))
    }

    fn locate(&self, program: &Program<'_>) -> Vec<Definition> {
        let mut found = Vec::new();
        for stmt in &program.body {
            let (export, candidate) = match candidate(stmt) {
                Some(c) => c,
                None => continue,
            };
            let def = match candidate {
                Candidate::Variable(decl) => self.variable_component(decl, export, stmt.span()),
                Candidate::Function(func) => self.function_component(func, export, stmt.span()),
                Candidate::Class(class) => self.class_component(class, stmt.span()),
            };
            if let Some(def) = def {
                tracing::debug!(component = %def.name(), "located component");
                found.push(def);
            }
        }
        found
    }

    fn variable_component(
        &self,
        decl: &VariableDeclaration<'_>,
        export: Export,
        span: Span,
    ) -> Option<Definition> {
        if decl.declarations.len() != 1 {
            return None;
        }
        let declarator = &decl.declarations[0];
        let name = match &declarator.id {
            BindingPattern::BindingIdentifier(id) => id.name.as_str(),
            _ => return None,
        };
        let mut annotation = AnnotationFinder {
            source: self.source,
            type_argument: true,
            found: None,
        };
        annotation.visit_variable_declarator(declarator);

        let parts = match &declarator.init {
            Some(Expression::ArrowFunctionExpression(arrow)) => FunctionParts {
                params: &arrow.params,
                body: &arrow.body,
                expression: arrow.get_expression().map(|expr| expr.span()),
            },
            Some(Expression::FunctionExpression(func)) => FunctionParts {
                params: &func.params,
                body: func.body.as_ref()?,
                expression: None,
            },
            _ => return None,
        };
        self.functional(name, export, span, parts, annotation.found)
    }

    fn function_component(&self, func: &Function<'_>, export: Export, span: Span) -> Option<Definition> {
        let name = func.id.as_ref()?.name.as_str();
        let parts = FunctionParts {
            params: &func.params,
            body: func.body.as_ref()?,
            expression: None,
        };
        self.functional(name, export, span, parts, None)
    }

    fn functional(
        &self,
        name: &str,
        export: Export,
        span: Span,
        parts: FunctionParts<'_, '_>,
        declared: Option<DeclaredType>,
    ) -> Option<Definition> {
        if !is_component_name(name) {
            return None;
        }
        let mut markup = MarkupDetector::default();
        markup.visit_function_body(parts.body);
        if !markup.found {
            return None;
        }

        let (body, has_return) = match parts.expression {
            Some(expr) => (format!("\n  return {};\n", self.text(expr).trim()), true),
            None => {
                let mut returns = ReturnFinder::default();
                returns.visit_function_body(parts.body);
                (self.block_text(parts.body).to_string(), returns.found)
            }
        };

        Some(Definition::Functional(FunctionalDef {
            name: name.to_string(),
            export,
            props: self.analyze_props(name, parts.params.items.first(), parts.body, declared),
            body,
            has_return,
            span,
        }))
    }

    fn class_component(&self, class: &Class<'_>, span: Span) -> Option<Definition> {
        let name = class.id.as_ref()?.name.to_string();
        let base = class.super_class.as_ref()?;
        if !is_component_name(&name) || !is_component_base(base) {
            return None;
        }

        let props = class
            .super_type_arguments
            .as_ref()
            .and_then(|args| args.params.first())
            .map(|ty| self.class_props(ty))
            .unwrap_or_default();

        let mut state = None;
        let mut effects = Vec::new();
        let mut render_head = None;
        for element in &class.body.body {
            match element {
                ClassElement::PropertyDefinition(prop) => {
                    if let (Some("state"), Some(Expression::ObjectExpression(obj))) =
                        (property_key_name(&prop.key).as_deref(), &prop.value)
                    {
                        if state.is_none() {
                            state = Some(state_entries(self.source, obj));
                        }
                    }
                }
                ClassElement::MethodDefinition(method) => {
                    let body = match &method.value.body {
                        Some(body) => body,
                        None => continue,
                    };
                    match property_key_name(&method.key).as_deref() {
                        Some("render") => {
                            render_head = Some(Span::new(method.key.span().start, body.span.start));
                        }
                        Some(lifecycle) if LIFECYCLE_METHODS.contains(&lifecycle) => {
                            effects.push(hooks::summarize(lifecycle, self.block_text(body)));
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        let state = state.unwrap_or_else(|| {
            let mut assignment = StateAssignment {
                source: self.source,
                entries: None,
            };
            assignment.visit_class_body(&class.body);
            assignment.entries.unwrap_or_default()
        });

        Some(Definition::Class(ClassDef {
            name,
            props,
            state,
            effects,
            base: base.span(),
            render_head,
            span,
        }))
    }

    /// Prop names for a class's props type argument. An unresolvable type
    /// is reported as `Props (Name)`.
    fn class_props(&self, ty: &TSType<'_>) -> Vec<String> {
        match classify(self.source, ty) {
            DeclaredType::Literal { members, .. } => members,
            DeclaredType::Named(name) => match self.decls.get(&name) {
                Some(members) if !members.is_empty() => members.clone(),
                _ => vec![format!("Props ({})", name)],
            },
            DeclaredType::Other(text) => vec![format!("Props ({})", text)],
        }
    }
}

/// `Component`, `PureComponent` and their `React.` forms.
fn is_component_base(expr: &Expression<'_>) -> bool {
    let name = match expr {
        Expression::Identifier(id) => id.name.as_str(),
        Expression::StaticMemberExpression(member) => match &member.object {
            Expression::Identifier(object) if object.name.as_str() == "React" => {
                member.property.name.as_str()
            }
            _ => return false,
        },
        _ => return false,
    };
    matches!(name, "Component" | "PureComponent")
}

/// `key (type)` for each property of a state object literal.
fn state_entries(source: &str, obj: &ObjectExpression<'_>) -> Vec<String> {
    obj.properties
        .iter()
        .filter_map(|prop| match prop {
            ObjectPropertyKind::ObjectProperty(p) => {
                let key = property_key_name(&p.key)?;
                let ty = if p.shorthand {
                    "any"
                } else {
                    hooks::infer_type(parse::slice(source, p.value.span()).trim())
                };
                Some(format!("{} ({})", key, ty))
            }
            ObjectPropertyKind::SpreadProperty(_) => None,
        })
        .collect()
}

/// First `this.state = { ... }` in a class body.
struct StateAssignment<'s> {
    source: &'s str,
    entries: Option<Vec<String>>,
}

impl<'a> Visit<'a> for StateAssignment<'_> {
    fn visit_assignment_expression(&mut self, it: &AssignmentExpression<'a>) {
        if self.entries.is_none() {
            if let (AssignmentTarget::StaticMemberExpression(member), Expression::ObjectExpression(obj)) =
                (&it.left, &it.right)
            {
                if matches!(member.object, Expression::ThisExpression(_))
                    && member.property.name.as_str() == "state"
                {
                    self.entries = Some(state_entries(self.source, obj));
                }
            }
        }
        walk::walk_assignment_expression(self, it);
    }
}

#[derive(Debug, Default)]
struct ReturnFinder {
    found: bool,
}

impl<'a> Visit<'a> for ReturnFinder {
    fn visit_return_statement(&mut self, _it: &ReturnStatement<'a>) {
        self.found = true;
    }

    fn visit_function(&mut self, _it: &Function<'a>, _flags: ScopeFlags) {}

    fn visit_arrow_function_expression(&mut self, _it: &ArrowFunctionExpression<'a>) {}

    fn visit_class(&mut self, _it: &Class<'a>) {}
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
enum DeclaredType {
    /// A plain type name, e.g. `CardProps`.
    Named(String),
    /// An object type written in place.
    Literal { text: String, members: Vec<String> },
    Other(String),
}

fn classify(source: &str, ty: &TSType<'_>) -> DeclaredType {
    let text = parse::slice(source, ty.span()).trim().to_string();
    match ty {
        TSType::TSTypeLiteral(literal) => DeclaredType::Literal {
            members: signature_names(&literal.members),
            text,
        },
        TSType::TSTypeReference(reference)
            if reference.type_arguments.is_none()
                && matches!(reference.type_name, TSTypeName::IdentifierReference(_)) =>
        {
            DeclaredType::Named(text)
        }
        _ => DeclaredType::Other(text),
    }
}

/// First type annotation on a parameter or declarator, ignoring any inside
/// nested functions. With `type_argument` set, `React.FC<P>` yields `P`.
struct AnnotationFinder<'s> {
    source: &'s str,
    type_argument: bool,
    found: Option<DeclaredType>,
}

impl<'a> Visit<'a> for AnnotationFinder<'_> {
    fn visit_ts_type_annotation(&mut self, it: &TSTypeAnnotation<'a>) {
        if self.found.is_some() {
            return;
        }
        let ty = &it.type_annotation;
        self.found = if self.type_argument {
            match ty {
                TSType::TSTypeReference(reference) => reference
                    .type_arguments
                    .as_ref()
                    .and_then(|args| args.params.first())
                    .map(|arg| classify(self.source, arg)),
                _ => None,
            }
        } else {
            Some(classify(self.source, ty))
        };
    }

    fn visit_function(&mut self, _it: &Function<'a>, _flags: ScopeFlags) {}

    fn visit_arrow_function_expression(&mut self, _it: &ArrowFunctionExpression<'a>) {}
}

/// `x` for every `param.x`, first-seen order.
struct MemberAccesses<'p> {
    param: &'p str,
    names: Vec<String>,
}

impl<'a> Visit<'a> for MemberAccesses<'_> {
    fn visit_static_member_expression(&mut self, it: &StaticMemberExpression<'a>) {
        if let Expression::Identifier(object) = &it.object {
            let name = it.property.name.as_str();
            if object.name.as_str() == self.param && !self.names.iter().any(|n| n == name) {
                self.names.push(name.to_string());
            }
        }
        walk::walk_static_member_expression(self, it);
    }
}

#[derive(Debug, Default)]
struct PropsShape {
    bindings: Bindings,
    names: Vec<String>,
    type_name: String,
    interface: Option<String>,
}

impl Locator<'_> {
    fn analyze_props(
        &self,
        component: &str,
        param: Option<&FormalParameter<'_>>,
        body: &FunctionBody<'_>,
        declarator_type: Option<DeclaredType>,
    ) -> PropsShape {
        let default_name = format!("{}Props", component);
        let mut shape = PropsShape::default();
        let mut members = Vec::new();
        let mut destructured = false;
        let mut declared = None;
        if let Some(param) = param {
            let mut finder = AnnotationFinder {
                source: self.source,
                type_argument: false,
                found: None,
            };
            finder.visit_formal_parameter(param);
            declared = finder.found;
            destructured = self.read_pattern(&param.pattern, &mut shape, &mut members);
        }

        let (type_name, interface) = match declared.or(declarator_type) {
            Some(DeclaredType::Named(ty)) => {
                if !destructured {
                    shape.names.extend(self.decls.get(&ty).cloned().unwrap_or_default());
                }
                (ty, None)
            }
            Some(DeclaredType::Literal { text, members }) => {
                if !destructured {
                    shape.names.extend(members);
                }
                let interface = format!("interface {} {}", default_name, text);
                (default_name, Some(interface))
            }
            Some(DeclaredType::Other(ty)) => (ty, None),
            None => {
                let interface = render_interface(&default_name, &members);
                (default_name, Some(interface))
            }
        };

        if let Some(param) = shape.bindings.props_param.clone() {
            let mut accesses = MemberAccesses {
                param: &param,
                names: Vec::new(),
            };
            accesses.visit_function_body(body);
            shape.names.extend(accesses.names);
        }
        shape.interface = interface.filter(|_| self.generate && !self.decls.contains_key(&type_name));
        shape.type_name = type_name;
        shape
    }

    /// Records the bindings and interface members a props parameter
    /// introduces. True when the parameter is destructured.
    fn read_pattern(
        &self,
        pattern: &BindingPattern<'_>,
        shape: &mut PropsShape,
        members: &mut Vec<String>,
    ) -> bool {
        match pattern {
            BindingPattern::AssignmentPattern(assign) => self.read_pattern(&assign.left, shape, members),
            BindingPattern::BindingIdentifier(id) => {
                members.push("  [key: string]: any;".to_string());
                shape.bindings.props_param = Some(id.name.to_string());
                false
            }
            BindingPattern::ObjectPattern(obj) => {
                for prop in &obj.properties {
                    let key = match property_key_name(&prop.key) {
                        Some(key) => key,
                        None => continue,
                    };
                    let (local, default) = match &prop.value {
                        BindingPattern::BindingIdentifier(id) => (Some(id.name.to_string()), None),
                        BindingPattern::AssignmentPattern(assign) => {
                            let local = match &assign.left {
                                BindingPattern::BindingIdentifier(id) => Some(id.name.to_string()),
                                _ => None,
                            };
                            (local, Some(self.text(assign.right.span()).trim()))
                        }
                        _ => (None, None),
                    };
                    let ty = default.map_or("any", hooks::infer_type);
                    let optional = if default.is_some() { "?" } else { "" };
                    members.push(format!("  {}{}: {};", key, optional, ty));
                    if let Some(local) = local {
                        shape.bindings.destructured_props.push((local, key.clone()));
                    }
                    shape.names.push(key);
                }
                if let Some(rest) = &obj.rest {
                    if let BindingPattern::BindingIdentifier(id) = &rest.argument {
                        shape.bindings.props_param = Some(id.name.to_string());
                    }
                }
                true
            }
            _ => false,
        }
    }
}

fn render_interface(name: &str, members: &[String]) -> String {
    if members.is_empty() {
        format!("interface {} {{}}", name)
    } else {
        format!("interface {} {{\n{}\n}}", name, members.join("\n"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FUNCTIONAL COMPONENTS
// ═══════════════════════════════════════════════════════════════════════════════

fn convert_functional(def: &FunctionalDef, ctx: &mut ConversionContext) -> Result<String> {
    tracing::debug!(component = %def.name, "converting functional component");
    ctx.warn(format!("Converting functional component: {}", def.name));

    let mut hooks = hooks::extract_hooks(&def.body, ctx)?;
    let lowered = jsx_lowerer::lower_statements(&hooks.body, ctx)?;

    let mut bindings = def.props.bindings.clone();
    bindings.state_names = hooks.state_names();
    bindings.setters = hooks.setters();
    let body = renamer::qualify_references(&lowered, &bindings)?;
    // Field initialisers run inside the class too.
    for var in &mut hooks.state {
        var.initial_value = renamer::qualify_expression(&var.initial_value, &def.props.bindings)?;
    }

    let mut info = ComponentInfo::new(&def.name, false);
    for name in &def.props.names {
        info.add_prop(name);
    }
    info.state = hooks.state.iter().map(|s| s.describe()).collect();
    info.effects = hooks.effects.iter().map(|e| e.summary()).collect();
    ctx.components.push(info);

    Ok(assemble_class(
        def,
        &hooks,
        &ensure_return(tidy(&body), def.has_return),
        ctx.options.state_convention,
    ))
}

fn ensure_return(body: String, has_return: bool) -> String {
    if has_return {
        return body;
    }
    let fallback = format!("return {};", jsx_lowerer::empty_view());
    if body.is_empty() {
        fallback
    } else {
        format!("{}\n{}", body, fallback)
    }
}
/// Dedented, with runs of blank lines collapsed.
fn tidy(body: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let dedented = hooks::dedent(body);
    for line in dedented.lines() {
        let blank = line.trim().is_empty();
        if blank && lines.last().map_or(true, |l| l.trim().is_empty()) {
            continue;
        }
        lines.push(if blank { "" } else { line.trim_end() });
    }
    while lines.last().map_or(false, |l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|l| if l.trim().is_empty() { String::new() } else { format!("{}{}", pad, l) })
        .collect::<Vec<_>>()
        .join("\n")
}

fn assemble_class(
    def: &FunctionalDef,
    hooks: &HookExtraction,
    body: &str,
    convention: StateConvention,
) -> String {
    let mut out = String::new();
    let props = &def.props;
    if let Some(interface) = &props.interface {
        out.push_str(interface);
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "{} {} extends {} {{\n",
        def.export.class_keyword(),
        def.name,
        BASE_CLASS
    ));
    out.push_str(&format!("  private props: {};\n", props.type_name));
    for var in &hooks.state {
        out.push_str(&format!("  {}\n", hooks::state_field(var, convention)));
    }

    out.push_str(&format!(
        "\n  constructor(props: {}) {{\n    super();\n    this.props = props;\n  }}\n",
        props.type_name
    ));
    for var in &hooks.state {
        out.push('\n');
        out.push_str(&indent(&hooks::state_accessor(var, convention), 2));
        out.push('\n');
    }

    out.push_str("\n  initializeUI(): UINode {\n");
    out.push_str(&indent(body, 4));
    out.push_str("\n  }\n");

    out.push_str("\n  prestart(): void {\n    // TODO: Setup logic before the component starts\n  }\n");

    out.push_str("\n  start(): void {\n");
    if hooks.effects.is_empty() {
        out.push_str("    // TODO: Move useEffect logic here\n");
    }
    for (i, effect) in hooks.effects.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for line in effect.lifecycle_comment() {
            out.push_str(&format!("    {}\n", line));
        }
    }
    out.push_str("  }\n}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConvertOptions;

    fn convert_with(source: &str, options: &ConvertOptions) -> (String, ConversionContext<'static>) {
        let options: &'static ConvertOptions = Box::leak(Box::new(options.clone()));
        let mut ctx = ConversionContext::new(options);
        let out = convert_components(source, &mut ctx).unwrap();
        (out, ctx)
    }

    fn convert(source: &str) -> (String, ConversionContext<'static>) {
        convert_with(source, &ConvertOptions::default())
    }

    #[test]
    fn test_welcome_component() {
        let (out, ctx) = convert(
            "const Welcome = ({ name }) => { return (<div><h1>Hello, {name}!</h1></div>); }",
        );
        assert!(out.starts_with("interface WelcomeProps {\n  name: any;\n}\n\nexport class Welcome extends UIComponent {"));
        assert!(out.contains("  private props: WelcomeProps;\n\n  constructor(props: WelcomeProps) {"));
        assert!(out.contains(
            "    return View({ children: Text({ text: `Hello, ${this.props.name}!` }) });"
        ));
        assert!(ctx.errors.is_empty());
        assert_eq!(ctx.components.len(), 1);
        assert_eq!(ctx.components[0].props, vec!["name"]);
        assert!(ctx.components[0].state.is_empty());
        assert_eq!(ctx.warnings[0], "Converting functional component: Welcome");
    }

    #[test]
    fn test_counter_component() {
        let src = r#"export default function Counter() {
  const [count, setCount] = useState(0);
  const increment = () => setCount(count + 1);
  return (
    <div>
      <p>Count: {count}</p>
      <button onClick={increment}>Increment</button>
    </div>
  );
}"#;
        let (out, ctx) = convert(src);
        assert!(out.starts_with("interface CounterProps {}\n\nexport default class Counter extends UIComponent {"));
        assert!(out.contains("  private count: Binding<number> = new Binding(0);\n"));
        assert!(out.contains(
            "  private setCount = (newValue: number) => {\n    this.count.set(newValue);\n  };"
        ));
        assert!(out.contains("    const increment = () => this.setCount(this.count + 1);"));
        assert!(out.contains("onPress: increment"));
        assert!(out.contains("Text({ text: `Count: ${this.count}` })"));
        assert_eq!(ctx.components[0].state, vec!["count (number)"]);
        assert!(ctx
            .warnings
            .iter()
            .any(|w| w.starts_with("Converting useState for count")));
    }

    #[test]
    fn test_field_convention() {
        let options = ConvertOptions {
            state_convention: StateConvention::Field,
            ..Default::default()
        };
        let (out, _) = convert_with(
            "function Toggle() {\n  const [on, setOn] = useState(false);\n  return <button onClick={() => setOn(!on)}>Flip</button>;\n}",
            &options,
        );
        assert!(out.contains("  private on: boolean = false;\n"));
        assert!(out.contains("    this.on = newValue;"));
        assert!(out.contains("onPress: () => this.setOn(!this.on)"));
    }

    #[test]
    fn test_expression_body_and_fc_annotation() {
        let src = "interface CardProps { title: string; body?: string }\n\nexport const Card: React.FC<CardProps> = ({ title }) => (\n  <section><h2>{title}</h2></section>\n);\n";
        let (out, ctx) = convert(src);
        assert!(out.starts_with("interface CardProps { title: string; body?: string }\n\nexport class Card extends UIComponent {"));
        assert!(out.contains("  private props: CardProps;"));
        assert!(out.contains("    return View({ children: Text({ text: this.props.title }) });"));
        assert!(!out.contains("interface CardProps {\n"));
        assert_eq!(ctx.components[0].props, vec!["title"]);
    }

    #[test]
    fn test_props_parameter() {
        let (out, ctx) = convert("const Badge = (props) => <span>{props.label}</span>;\n");
        assert!(out.contains("interface BadgeProps {\n  [key: string]: any;\n}"));
        assert!(out.contains("return Text({ text: this.props.label });"));
        assert_eq!(ctx.components[0].props, vec!["label"]);
    }

    #[test]
    fn test_default_props_become_optional() {
        let (out, ctx) = convert(
            "const Tag = ({ label = 'new', size: tagSize = 2, onClick }) => <p onClick={onClick}>{label} {tagSize}</p>;",
        );
        assert!(out.contains("  label?: string;\n  size?: number;\n  onClick: any;"));
        assert!(out.contains("`${this.props.label} ${this.props.size}`"));
        assert!(out.contains("onPress: this.props.onClick"));
        assert_eq!(ctx.components[0].props, vec!["label", "size", "onClick"]);
    }

    #[test]
    fn test_existing_props_interface_is_not_duplicated() {
        let src = "type PanelProps = { open: boolean };\nfunction Panel({ open }) {\n  return <div>{open && <p>Open</p>}</div>;\n}";
        let (out, _) = convert(src);
        assert_eq!(out.matches("PanelProps =").count(), 1);
        assert!(!out.contains("interface PanelProps"));
        assert!(out.contains("this.props.open && Text({ text: \"Open\" })"));
    }

    #[test]
    fn test_props_interface_can_be_disabled() {
        let options = ConvertOptions {
            generate_props_interface: false,
            ..Default::default()
        };
        let (out, _) = convert_with("const Empty = () => <div />;", &options);
        assert!(out.starts_with("export class Empty extends UIComponent {"));
        assert!(out.contains("return View({});"));
    }

    #[test]
    fn test_effects_land_in_start() {
        let src = "function Title({ count }) {\n  useEffect(() => {\n    document.title = `${count}`;\n  }, [count]);\n  return <h1>{count}</h1>;\n}";
        let (out, ctx) = convert(src);
        assert!(out.contains(
            "  start(): void {\n    // TODO: Move this useEffect logic into the appropriate lifecycle method\n    // Dependencies: [count]\n"
        ));
        assert!(!out.contains("    useEffect("));
        assert_eq!(ctx.components[0].effects, vec!["Effect [count]: document.title = `${count}`;..."]);
    }

    #[test]
    fn test_start_placeholder_without_effects() {
        let (out, _) = convert("const A = () => <div />;");
        assert!(out.contains("  start(): void {\n    // TODO: Move useEffect logic here\n  }\n}"));
        assert!(out.contains("  prestart(): void {"));
    }

    #[test]
    fn test_lowercase_and_markup_free_functions_are_skipped() {
        let src = "const helper = () => <div />;\nconst Total = (a, b) => a + b;\nfunction format(x) { return x; }\n";
        let (out, ctx) = convert(src);
        assert_eq!(out, src);
        assert!(ctx.components.is_empty());
    }

    #[test]
    fn test_nested_definitions_are_not_converted_separately() {
        let src = "const List = ({ items }) => {\n  const Row = ({ item }) => <li>{item}</li>;\n  return <ul>{items.length}</ul>;\n};\n";
        let (_, ctx) = convert(src);
        assert_eq!(ctx.components.len(), 1);
        assert_eq!(ctx.components[0].name, "List");
    }

    #[test]
    fn test_code_between_components_is_kept() {
        let src = "const A = () => <div />;\n\nconst LIMIT = 3;\n\nfunction B() {\n  return <p>b</p>;\n}\n";
        let (out, ctx) = convert(src);
        assert!(out.contains("\n\nconst LIMIT = 3;\n\n"));
        let names: Vec<_> = ctx.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_body_without_return_gets_empty_view() {
        let src = "function Note() {\n  const view = <p>note</p>;\n}";
        let (out, _) = convert(src);
        assert!(out.contains("    const view = Text({ text: \"note\" });\n    return View({});"));
    }

    #[test]
    fn test_broken_markup_fails_the_module() {
        let options = ConvertOptions::default();
        let mut ctx = ConversionContext::new(&options);
        let err = convert_components("const Broken = () => {\n  return <div><p>x</div>;\n};", &mut ctx)
            .unwrap_err();
        assert!(err.to_string().starts_with("syntax error:"), "{}", err);
        assert!(ctx.components.is_empty());
    }

    #[test]
    fn test_conversion_errors_name_the_component() {
        let options = ConvertOptions::default();
        let mut ctx = ConversionContext::new(&options);
        let err = ConversionError::in_component("Broken", ConversionError::syntax(&["Unexpected token"]));
        assert_eq!(err.to_string(), "in component Broken: syntax error: Unexpected token");
        assert!(convert_components("const Fine = () => <p>ok</p>;", &mut ctx).is_ok());
    }

    #[test]
    fn test_class_component() {
        let src = r#"interface ProfileProps {
  user: string;
  avatar?: string;
}

export class Profile extends React.Component<ProfileProps> {
  constructor(props) {
    super(props);
    this.state = { loading: true, retries: 0, label: 'x', cache };
  }

  componentDidMount() {
    this.load();
  }

  render() {
    return <div>{this.props.user}</div>;
  }
}"#;
        let (out, ctx) = convert(src);
        assert!(out.contains("export class Profile extends UIComponent<ProfileProps> {"));
        assert!(out.contains("  initializeUI(): UINode {\n    return <div>{this.props.user}</div>;"));
        let info = &ctx.components[0];
        assert!(info.is_class);
        assert_eq!(info.props, vec!["user", "avatar"]);
        assert_eq!(
            info.state,
            vec!["loading (boolean)", "retries (number)", "label (string)", "cache (any)"]
        );
        assert_eq!(info.effects, vec!["Effect [componentDidMount]: this.load();..."]);
        assert!(ctx
            .warnings
            .iter()
            .any(|w| w == "Class component Profile: render() body left unconverted - manual conversion needed"));
    }

    #[test]
    fn test_class_props_fallback_and_state_field() {
        let src = "class Clock extends PureComponent<ClockProps, ClockState> {\n  state = { ticks: 0 };\n  render() { return null; }\n}";
        let (out, ctx) = convert(src);
        assert!(out.starts_with("class Clock extends UIComponent<ClockProps, ClockState> {"));
        assert_eq!(ctx.components[0].props, vec!["Props (ClockProps)"]);
        assert_eq!(ctx.components[0].state, vec!["ticks (number)"]);
    }

    #[test]
    fn test_class_inline_props_type() {
        let (_, ctx) = convert("class Note extends Component<{ text: string, pinned: boolean }> {}");
        assert_eq!(ctx.components[0].props, vec!["text", "pinned"]);
        assert!(ctx.components[0].effects.is_empty());
    }

    #[test]
    fn test_destructured_props_with_rest() {
        let (out, ctx) = convert(
            "const Item = ({ id, label: text = 'x', ...rest }) => <p title={rest.hint}>{text}</p>;",
        );
        assert!(out.contains("interface ItemProps {\n  id: any;\n  label?: string;\n}"));
        assert!(out.contains("title: this.props.hint"));
        assert!(out.contains("Text({ text: this.props.label"));
        assert_eq!(ctx.components[0].props, vec!["id", "label", "hint"]);
    }

    #[test]
    fn test_inline_parameter_type() {
        let (out, ctx) = convert("function Chip(props: { text: string; tone?: number }) {\n  return <span>{props.text}</span>;\n}");
        assert!(out.starts_with("interface ChipProps { text: string; tone?: number }\n\nexport class Chip"));
        assert_eq!(ctx.components[0].props, vec!["text", "tone"]);
    }

    #[test]
    fn test_type_declarations() {
        let src = "interface A { x: number; 'y-z': string; go(): void }\nexport type B = { b: boolean };\ntype C = A | B;\n";
        let allocator = Allocator::default();
        let program = parse::parse_program(&allocator, src).unwrap();
        let decls = collect_type_decls(&program);
        assert_eq!(decls["A"], vec!["x", "y-z", "go"]);
        assert_eq!(decls["B"], vec!["b"]);
        assert!(decls["C"].is_empty());
    }
}
