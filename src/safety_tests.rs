//! Containment tests: malformed or hostile input must come back as a
//! report, never as a panic, and results must not depend on call order or
//! scheduling.

#[cfg(test)]
mod tests {
    use rayon::prelude::*;

    use crate::error::{ConversionError, ErrorKind};
    use crate::options::ConvertOptions;
    use crate::pipeline::convert;
    use crate::renamer::{qualify_references, Bindings};

    fn quiet() -> ConvertOptions {
        ConvertOptions {
            include_preamble: false,
            ..Default::default()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // FAILURE CONTAINMENT
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_syntax_error_fails_the_whole_file() {
        let src = "const Good = () => <p>ok</p>;\n\nconst Bad = () => {\n  return <div><span>x</div></span>;\n};\n";
        let result = convert(src, &quiet());
        assert!(!result.success);
        assert!(result.code.is_empty());
        assert!(result.components.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("ConversionFailure: Conversion failed: syntax error:"));
    }

    #[test]
    fn test_odd_inputs_do_not_panic() {
        let inputs = [
            "",
            "<",
            ">",
            "{",
            "}",
            "()",
            "const A = () =>",
            "const A = (",
            "function B(",
            "function B() {",
            "class C extends Component {",
            "const D = () => <div>",
            "const E = () => <div>{/*/}</div>;",
            "const F = () => <p>{'}'}</p>;",
            "export default",
            "import",
            "'unterminated",
            "`${",
        ];
        for input in inputs {
            let result = convert(input, &quiet());
            assert_eq!(
                result.success,
                result.errors.is_empty(),
                "inconsistent result for {:?}",
                input
            );
            if !result.success {
                assert!(result.code.is_empty(), "failed conversion kept code for {:?}", input);
            }
        }
    }

    #[test]
    fn test_unicode_text_survives() {
        let result = convert("const Café = () => <p>héllo ✓ 日本</p>;\n", &quiet());
        assert!(result.success, "{:?}", result.errors);
        assert!(result.code.contains("Text({ text: \"héllo ✓ 日本\" })"));
        assert_eq!(result.components[0].name, "Café");
    }

    #[test]
    fn test_invalid_options_json() {
        let err = ConvertOptions::from_json("{ \"stateConvention\": 7 }").unwrap_err();
        assert!(matches!(err, ConversionError::InvalidOptions(_)));
        assert_eq!(err.kind(), ErrorKind::ConversionFailure);
        assert_eq!(ConvertOptions::from_json("  ").unwrap(), ConvertOptions::default());
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // NON-ASCII CODE
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_member_access_on_non_ascii_string() {
        let result = convert("const Greet = () => <p>{'Olá'.toUpperCase()}</p>;\n", &quiet());
        assert!(result.success, "{:?}", result.errors);
        assert!(result.code.contains("Text({ text: 'Olá'.toUpperCase() })"));
    }

    #[test]
    fn test_non_ascii_regex_literal() {
        let src = "function Accent({ word }) {\n  const accented = /[àéü]/.test(word);\n  return <p>{accented}</p>;\n}\n";
        let result = convert(src, &quiet());
        assert!(result.success, "{:?}", result.errors);
        assert!(result.code.contains("const accented = /[àéü]/.test(this.props.word);"));
        assert!(result.code.contains("Text({ text: accented })"));
    }

    #[test]
    fn test_non_ascii_template_literal() {
        let src = "const Tag = ({ año }) => {\n  const [niño, setNiño] = useState('ñ');\n  return <button onClick={() => setNiño(`${niño}ñ`)}>{`Año ${año}: ${niño}`}</button>;\n};\n";
        let result = convert(src, &quiet());
        assert!(result.success, "{:?}", result.errors);
        assert!(result.code.contains("onPress: () => this.setNiño(`${this.niño}ñ`)"));
        assert!(result.code.contains("`Año ${this.props.año}: ${this.niño}`"));
        assert_eq!(result.components[0].state, vec!["niño (string)"]);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SCOPES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_local_in_map_callback_does_not_shadow_outer_prop() {
        let src = "function List({ name, items }) {\n  const rows = items.map(i => {\n    const name = i.label;\n    return name;\n  });\n  return <div><h1>{name}</h1><p>{rows.length}</p></div>;\n}\n";
        let result = convert(src, &quiet());
        assert!(result.success, "{:?}", result.errors);
        assert!(result.code.contains("const rows = this.props.items.map(i => {"));
        assert!(result.code.contains("      const name = i.label;\n      return name;"));
        assert!(result.code.contains("Text({ text: this.props.name })"));
    }

    #[test]
    fn test_block_local_does_not_shadow_outer_state() {
        let src = "function Counter() {\n  const [count, setCount] = useState(0);\n  const reset = () => {\n    let count = 0;\n    setCount(count);\n  };\n  return <button onClick={reset}>{count}</button>;\n}\n";
        let result = convert(src, &quiet());
        assert!(result.success, "{:?}", result.errors);
        assert!(result.code.contains("      let count = 0;\n      this.setCount(count);"));
        assert!(result.code.contains("Text({ text: this.count })"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // DETERMINISM
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_qualification_is_idempotent() {
        let bindings = Bindings {
            props_param: None,
            destructured_props: vec![("title".to_string(), "title".to_string())],
            state_names: vec!["count".to_string()],
            setters: vec!["setCount".to_string()],
        };
        let code = "return Text({ text: `${title}: ${count}`, onPress: () => setCount(count + 1) });";
        let once = qualify_references(code, &bindings).unwrap();
        assert_eq!(
            once,
            "return Text({ text: `${this.props.title}: ${this.count}`, onPress: () => this.setCount(this.count + 1) });"
        );
        assert_eq!(qualify_references(&once, &bindings).unwrap(), once);
    }

    #[test]
    fn test_parallel_conversions_match_sequential() {
        let sources: Vec<String> = (0..32)
            .map(|i| {
                format!(
                    "function Item{i}({{ label }}) {{\n  const [n{i}, setN{i}] = useState({i});\n  return <button onClick={{() => setN{i}(n{i} + 1)}}>{{label}}</button>;\n}}\n"
                )
            })
            .collect();
        let options = ConvertOptions::default();

        let sequential: Vec<_> = sources.iter().map(|s| convert(s, &options)).collect();
        let parallel: Vec<_> = sources.par_iter().map(|s| convert(s, &options)).collect();
        assert_eq!(sequential, parallel);
        assert!(sequential.iter().all(|r| r.success && r.components.len() == 1));
        assert_eq!(sequential[7].components[0].state, vec!["n7 (number)"]);
    }
}
