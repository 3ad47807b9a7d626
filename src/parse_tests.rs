#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_span::Span;

    use crate::error::ConversionError;
    use crate::parse::{
        contains_markup, full_span, is_component_tag, parse_body, parse_expression, parse_program,
        slice, splice, split_children,
    };

    // ═══════════════════════════════════════════════════════════════════════════════
    // PARSING
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_body_accepts_top_level_return() {
        let allocator = Allocator::default();
        let src = "const a = 1;\nreturn <p>{a}</p>;";
        assert!(parse_body(&allocator, src).is_ok());
        assert!(parse_program(&allocator, src).is_err());
    }

    #[test]
    fn test_syntax_errors_are_reported() {
        let allocator = Allocator::default();
        match parse_program(&allocator, "const A = () => <div><p>x</div>;") {
            Err(ConversionError::Syntax { message }) => assert!(!message.is_empty()),
            other => panic!("expected a syntax error, got {:?}", other.map(|_| ())),
        }
        assert!(parse_expression(&allocator, "<img src=\"a.png\">").is_err());
    }

    #[test]
    fn test_typed_module() {
        let allocator = Allocator::default();
        let src = "interface P { a?: string }\nexport const C: React.FC<P> = ({ a }) => <p>{a as string}</p>;";
        let program = parse_program(&allocator, src).unwrap();
        assert_eq!(program.body.len(), 2);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SPLICING
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_splice_applies_edits_in_order() {
        let src = "let a = b + c;";
        let edits = vec![(12, 13, "y".to_string()), (8, 9, "x".to_string())];
        assert_eq!(splice(src, full_span(src), edits), "let a = x + y;");
    }

    #[test]
    fn test_splice_drops_nested_and_outside_edits() {
        let src = "f(g(h))";
        let edits = vec![
            (2, 6, "G".to_string()),
            (4, 5, "H".to_string()),
            (0, 1, "F".to_string()),
        ];
        assert_eq!(splice(src, Span::new(2, 6), edits), "G");
    }

    #[test]
    fn test_slices_fall_on_character_boundaries() {
        let allocator = Allocator::default();
        let src = "'Olá'.toUpperCase() + /[àéü]/.source";
        parse_expression(&allocator, src).unwrap();
        let start = src.find('/').unwrap() as u32;
        assert_eq!(slice(src, Span::new(start, start + 10)), "/[àéü]/");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // MARKUP
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_contains_markup() {
        assert!(contains_markup("return <div/>;"));
        assert!(contains_markup("const x = cond && <><p>a</p></>;"));
        assert!(!contains_markup("if (a < b) f(a > c);"));
        assert!(!contains_markup("const n = useState<number>(0);"));
        assert!(!contains_markup("const s = '<p>';"));
        assert!(!contains_markup("return <div>;"));
    }

    #[test]
    fn test_split_children_siblings() {
        let units = split_children("\n  <h1>Title</h1>\n  text\n  {value}\n  <br />\n").unwrap();
        assert_eq!(units, vec!["<h1>Title</h1>", "text", "{value}", "<br />"]);
    }

    #[test]
    fn test_split_children_braces_hide_markup() {
        let src = "<p>a</p>{cond ? <span>{x > 1}</span> : <em>no</em>}<div><div></div></div>";
        let units = split_children(src).unwrap();
        assert_eq!(
            units,
            vec![
                "<p>a</p>",
                "{cond ? <span>{x > 1}</span> : <em>no</em>}",
                "<div><div></div></div>",
            ]
        );
    }

    #[test]
    fn test_split_children_single_and_empty() {
        assert_eq!(split_children("<div>only</div>").unwrap(), vec!["<div>only</div>"]);
        assert!(split_children("   \n  ").unwrap().is_empty());
    }

    #[test]
    fn test_split_children_unbalanced() {
        assert!(split_children("<div><p></p>").is_err());
        assert!(split_children("</div>").is_err());
    }

    #[test]
    fn test_component_tags() {
        assert!(is_component_tag("Card"));
        assert!(is_component_tag("ui.Button"));
        assert!(!is_component_tag("div"));
        assert!(!is_component_tag(""));
    }
}
