//! Declarative React → Horizon mapping tables.
//!
//! Both the attribute parser and the markup lowerer consult these tables;
//! adding a mapping is a table edit, not a code change.

use lazy_static::lazy_static;
use std::collections::HashMap;

pub const VIEW: &str = "View";
pub const TEXT: &str = "Text";
pub const PRESSABLE: &str = "Pressable";
pub const IMAGE: &str = "Image";
pub const DYNAMIC_LIST: &str = "DynamicList";

/// Symbols the generated preamble imports from the Horizon UI module.
pub const PREAMBLE_SYMBOLS: &[&str] = &[
    "UIComponent",
    "UINode",
    VIEW,
    TEXT,
    PRESSABLE,
    IMAGE,
    "ScrollView",
    DYNAMIC_LIST,
    "Binding",
];

// ═══════════════════════════════════════════════════════════════════════════════
// ATTRIBUTES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTransform {
    /// Value copied unchanged under the target key.
    Identity,
    /// No target key; a placeholder comment is emitted instead.
    StylePlaceholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRule {
    pub source: &'static str,
    pub target: Option<&'static str>,
    pub transform: AttributeTransform,
    /// `{value}` is replaced by the attribute's value.
    pub placeholder: Option<&'static str>,
    /// `{value}` is replaced by the attribute's value.
    pub warning: Option<&'static str>,
    /// Emission order; equal ranks keep source order.
    pub rank: u8,
}

/// Rank given to every attribute without a rule.
pub const DEFAULT_RANK: u8 = 3;

pub static ATTRIBUTE_RULES: &[AttributeRule] = &[
    AttributeRule {
        source: "className",
        target: None,
        transform: AttributeTransform::StylePlaceholder,
        placeholder: Some("/* TODO: Convert className \"{value}\" to Horizon style */"),
        warning: Some("Converting className \"{value}\" to style object - manual conversion needed"),
        rank: 0,
    },
    AttributeRule {
        source: "class",
        target: None,
        transform: AttributeTransform::StylePlaceholder,
        placeholder: Some("/* TODO: Convert className \"{value}\" to Horizon style */"),
        warning: Some("Converting className \"{value}\" to style object - manual conversion needed"),
        rank: 0,
    },
    AttributeRule {
        source: "style",
        target: Some("style"),
        transform: AttributeTransform::Identity,
        placeholder: None,
        warning: None,
        rank: 1,
    },
    AttributeRule {
        source: "onClick",
        target: Some("onPress"),
        transform: AttributeTransform::Identity,
        placeholder: None,
        warning: None,
        rank: 2,
    },
    AttributeRule {
        source: "src",
        target: Some("source"),
        transform: AttributeTransform::Identity,
        placeholder: None,
        warning: None,
        rank: DEFAULT_RANK,
    },
    AttributeRule {
        source: "alt",
        target: Some("accessibilityLabel"),
        transform: AttributeTransform::Identity,
        placeholder: None,
        warning: None,
        rank: DEFAULT_RANK,
    },
];

// ═══════════════════════════════════════════════════════════════════════════════
// TAGS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Structural wrapper with no target semantics.
    Container,
    /// Page landmark; lowered to a container with a follow-up comment.
    Landmark,
    Text,
    Pressable,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRule {
    pub tag: &'static str,
    pub kind: TagKind,
    pub constructor: &'static str,
    pub warning: Option<&'static str>,
}

const fn tag(tag: &'static str, kind: TagKind, constructor: &'static str) -> TagRule {
    TagRule {
        tag,
        kind,
        constructor,
        warning: None,
    }
}

const fn landmark(tag: &'static str, warning: &'static str) -> TagRule {
    TagRule {
        tag,
        kind: TagKind::Landmark,
        constructor: VIEW,
        warning: Some(warning),
    }
}

pub static TAG_RULES: &[TagRule] = &[
    tag("div", TagKind::Container, VIEW),
    tag("section", TagKind::Container, VIEW),
    tag("article", TagKind::Container, VIEW),
    tag("form", TagKind::Container, VIEW),
    tag("ul", TagKind::Container, VIEW),
    tag("ol", TagKind::Container, VIEW),
    tag("li", TagKind::Container, VIEW),
    landmark("header", "Converting header to View - consider appropriate Horizon component"),
    landmark("footer", "Converting footer to View - consider appropriate Horizon component"),
    landmark("nav", "Converting nav to View - consider appropriate Horizon component"),
    landmark("main", "Converting main to View - consider appropriate Horizon component"),
    landmark("aside", "Converting aside to View - consider appropriate Horizon component"),
    tag("h1", TagKind::Text, TEXT),
    tag("h2", TagKind::Text, TEXT),
    tag("h3", TagKind::Text, TEXT),
    tag("h4", TagKind::Text, TEXT),
    tag("h5", TagKind::Text, TEXT),
    tag("h6", TagKind::Text, TEXT),
    tag("p", TagKind::Text, TEXT),
    tag("label", TagKind::Text, TEXT),
    tag("strong", TagKind::Text, TEXT),
    tag("em", TagKind::Text, TEXT),
    tag("small", TagKind::Text, TEXT),
    TagRule {
        tag: "span",
        kind: TagKind::Text,
        constructor: TEXT,
        warning: Some("Converting span to Text - verify if appropriate"),
    },
    tag("button", TagKind::Pressable, PRESSABLE),
    tag("img", TagKind::Image, IMAGE),
];

lazy_static! {
    static ref ATTRIBUTE_TABLE: HashMap<&'static str, &'static AttributeRule> =
        ATTRIBUTE_RULES.iter().map(|r| (r.source, r)).collect();
    static ref TAG_TABLE: HashMap<&'static str, &'static TagRule> =
        TAG_RULES.iter().map(|r| (r.tag, r)).collect();
}

pub fn attribute_rule(name: &str) -> Option<&'static AttributeRule> {
    ATTRIBUTE_TABLE.get(name).copied()
}

pub fn tag_rule(tag: &str) -> Option<&'static TagRule> {
    TAG_TABLE.get(tag).copied()
}

pub fn fill(template: &str, value: &str) -> String {
    template.replace("{value}", value)
}

/// [`fill`] for a template that is itself a block comment: a `*/` in the
/// value would end the comment early, so it is broken up.
pub fn fill_comment(template: &str, value: &str) -> String {
    fill(template, &value.replace("*/", "* /"))
}
