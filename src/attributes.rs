//! Attribute parsing and mapping.
//!
//! Element attributes (`className="card" onClick={go} disabled`) become a
//! list of target property entries, ordered and renamed by the rules in
//! [`crate::mapping`]. Expression values have their markup lowered before
//! ranking. Mapping never fails: anything without a rule passes through
//! under its own name.

use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, JSXAttributeItem, JSXAttributeValue};
use oxc_span::GetSpan;

use crate::error::Result;
use crate::jsx_lowerer::Lowerer;
use crate::mapping::{self, AttributeTransform, DEFAULT_RANK};
use crate::parse;
use crate::types::ConversionContext;

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Quoted literal, quotes removed.
    Str(String),
    /// Code of a `{...}` value with its markup lowered.
    Expr(String),
    /// Attribute written without a value.
    Flag,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Named { name: String, value: AttrValue },
    /// `{...expr}`; holds `expr`.
    Spread(String),
}

/// Reads the attributes of one opening element, in source order.
pub(crate) fn collect_attributes(
    lowerer: &mut Lowerer<'_, '_, '_>,
    items: &[JSXAttributeItem<'_>],
) -> Vec<Attribute> {
    let mut attrs = Vec::with_capacity(items.len());
    for item in items {
        match item {
            JSXAttributeItem::Attribute(attr) => {
                let name = lowerer.text(attr.name.span()).to_string();
                let value = match &attr.value {
                    None => AttrValue::Flag,
                    Some(JSXAttributeValue::StringLiteral(s)) => AttrValue::Str(s.value.to_string()),
                    Some(JSXAttributeValue::ExpressionContainer(container)) => {
                        match container.expression.as_expression() {
                            Some(expr) => AttrValue::Expr(lowerer.render(expr)),
                            None => AttrValue::Flag,
                        }
                    }
                    Some(JSXAttributeValue::Element(el)) => AttrValue::Expr(lowerer.lower_element(el)),
                    Some(JSXAttributeValue::Fragment(fragment)) => {
                        AttrValue::Expr(lowerer.lower_fragment(fragment))
                    }
                };
                attrs.push(Attribute::Named { name, value });
            }
            JSXAttributeItem::SpreadAttribute(spread) => {
                attrs.push(Attribute::Spread(lowerer.render(&spread.argument)));
            }
        }
    }
    attrs
}

/// Parses bare attribute text, e.g. `a="1" b={2} c`.
pub fn read_attributes(text: &str, ctx: &mut ConversionContext) -> Result<Vec<Attribute>> {
    let wrapped = format!("<x {} />", text);
    let allocator = Allocator::default();
    let expr = parse::parse_expression(&allocator, &wrapped)?;
    let mut lowerer = Lowerer::new(&wrapped, ctx);
    Ok(match &expr {
        Expression::JSXElement(el) => collect_attributes(&mut lowerer, &el.opening_element.attributes),
        _ => Vec::new(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENDERING
// ═══════════════════════════════════════════════════════════════════════════════

/// Double-quoted string literal.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .map_or(false, |c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn render_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        quote_string(name)
    }
}

fn raw_value(value: &AttrValue) -> &str {
    match value {
        AttrValue::Str(s) | AttrValue::Expr(s) => s,
        AttrValue::Flag => "true",
    }
}

fn render_value(value: AttrValue) -> String {
    match value {
        AttrValue::Str(s) => quote_string(&s),
        AttrValue::Flag => "true".to_string(),
        AttrValue::Expr(code) => code,
    }
}

/// Target property entries in emission order. Placeholder entries are block
/// comments; join them with [`join_entries`].
pub fn attribute_entries(attrs: Vec<Attribute>, ctx: &mut ConversionContext) -> Vec<String> {
    let mut ranked: Vec<(u8, String)> = Vec::new();

    for attr in attrs {
        match attr {
            Attribute::Spread(expr) => ranked.push((DEFAULT_RANK, format!("...{}", expr))),
            Attribute::Named { name, value } => match mapping::attribute_rule(&name) {
                Some(rule) => match rule.transform {
                    AttributeTransform::StylePlaceholder => {
                        let raw = raw_value(&value);
                        if let Some(warning) = rule.warning {
                            ctx.warn(mapping::fill(warning, raw));
                        }
                        if let Some(placeholder) = rule.placeholder {
                            ranked.push((rule.rank, mapping::fill_comment(placeholder, raw)));
                        }
                    }
                    AttributeTransform::Identity => {
                        let key = rule.target.unwrap_or(rule.source);
                        ranked.push((rule.rank, format!("{}: {}", key, render_value(value))));
                    }
                },
                None => {
                    let key = render_key(&name);
                    ranked.push((DEFAULT_RANK, format!("{}: {}", key, render_value(value))));
                }
            },
        }
    }

    // Stable: equal ranks keep source order.
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, entry)| entry).collect()
}

/// Joins property entries with `, `. A comment entry is followed by a space
/// only, so a placeholder never leaves a dangling comma.
pub fn join_entries(entries: &[String]) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            if entries[i - 1].ends_with("*/") {
                out.push(' ');
            } else {
                out.push_str(", ");
            }
        }
        out.push_str(entry);
    }
    out
}

/// Maps bare attribute text to joined property entries. Text that does not
/// parse is reported and yields no entries.
pub fn parse_attributes(text: &str, ctx: &mut ConversionContext) -> String {
    match read_attributes(text, ctx) {
        Ok(attrs) => join_entries(&attribute_entries(attrs, ctx)),
        Err(err) => {
            ctx.warn(format!(
                "Attributes left unconverted ({}) - manual conversion needed",
                err
            ));
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::ATTRIBUTE_RULES;
    use crate::options::ConvertOptions;

    fn run(text: &str) -> (String, Vec<String>) {
        let options = ConvertOptions::default();
        let mut ctx = ConversionContext::new(&options);
        let out = parse_attributes(text, &mut ctx);
        (out, ctx.warnings)
    }

    #[test]
    fn test_every_rule_is_applied() {
        for rule in ATTRIBUTE_RULES {
            let (out, warnings) = run(&format!("{}=\"v\"", rule.source));
            match rule.target {
                Some(target) => {
                    assert_eq!(out, format!("{}: \"v\"", target), "rule {}", rule.source);
                    assert!(warnings.is_empty(), "rule {}", rule.source);
                }
                None => {
                    assert_eq!(out, "/* TODO: Convert className \"v\" to Horizon style */");
                    assert_eq!(
                        warnings,
                        vec!["Converting className \"v\" to style object - manual conversion needed"]
                    );
                }
            }
        }
    }

    #[test]
    fn test_click_handler_becomes_press_handler() {
        let (out, warnings) = run("onClick={increment}");
        assert_eq!(out, "onPress: increment");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_image_attributes() {
        let (out, _) = run("src={logo} alt=\"Company logo\"");
        assert_eq!(out, "source: logo, accessibilityLabel: \"Company logo\"");
    }

    #[test]
    fn test_emission_order() {
        let (out, warnings) =
            run("id=\"main\" onClick={go} className=\"card\" style={{ padding: 4 }} title='t'");
        assert_eq!(
            out,
            "/* TODO: Convert className \"card\" to Horizon style */ style: { padding: 4 }, onPress: go, id: \"main\", title: \"t\""
        );
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unmapped_attributes_pass_through() {
        let (out, warnings) = run("aria-label=\"Close\" disabled {...rest} key={item.id}");
        assert_eq!(out, "\"aria-label\": \"Close\", disabled: true, ...rest, key: item.id");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_expression_values_keep_nested_braces() {
        let (out, _) = run("onClick={() => { setOpen(!open); }}");
        assert_eq!(out, "onPress: () => { setOpen(!open); }");
    }

    #[test]
    fn test_markup_values_are_lowered() {
        let (out, _) = run("icon={<img src=\"a.png\" />}");
        assert_eq!(out, "icon: Image({ source: \"a.png\" })");
        let (out, _) = run("badge=<span>new</span>");
        assert_eq!(out, "badge: Text({ text: \"new\" })");
    }

    #[test]
    fn test_class_name_cannot_close_the_placeholder() {
        let (out, warnings) = run("className={cx('a') /* */ + \" b */\"}");
        assert_eq!(
            out,
            "/* TODO: Convert className \"cx('a') /* * / + \" b * /\"\" to Horizon style */"
        );
        assert_eq!(out.matches("*/").count(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(run("   ").0, "");
    }

    #[test]
    fn test_unparsable_text_is_reported() {
        let (out, warnings) = run("a={");
        assert_eq!(out, "");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Attributes left unconverted (syntax error:"));
    }

    #[test]
    fn test_attribute_shapes() {
        let options = ConvertOptions::default();
        let mut ctx = ConversionContext::new(&options);
        let attrs = read_attributes("a=\"1\" b={2} c {...d}", &mut ctx).unwrap();
        assert_eq!(
            attrs,
            vec![
                Attribute::Named {
                    name: "a".to_string(),
                    value: AttrValue::Str("1".to_string())
                },
                Attribute::Named {
                    name: "b".to_string(),
                    value: AttrValue::Expr("2".to_string())
                },
                Attribute::Named {
                    name: "c".to_string(),
                    value: AttrValue::Flag
                },
                Attribute::Spread("d".to_string()),
            ]
        );
    }
}
