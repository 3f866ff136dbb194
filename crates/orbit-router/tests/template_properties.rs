//! Property tests for template compilation and tokenization.

use orbit_router::{CompiledTemplate, TemplateError};
use proptest::prelude::*;

/// A literal path piece that contains no braces.
fn literal() -> impl Strategy<Value = String> {
    "[a-z0-9./+*?()\\[\\]$^|-]{1,8}".prop_map(|s| format!("/{s}/"))
}

fn placeholder_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,12}"
}

/// Builds `(template, path, expected values)` from alternating literals and
/// placeholder values. Names are positional so they never collide.
fn template_case() -> impl Strategy<Value = (String, String, Vec<String>)> {
    prop::collection::vec((literal(), placeholder_value()), 0..5).prop_flat_map(|pieces| {
        literal().prop_map(move |tail| {
            let mut template = String::new();
            let mut path = String::new();
            let mut values = Vec::new();
            for (idx, (lit, value)) in pieces.iter().enumerate() {
                template.push_str(lit);
                template.push_str(&format!("{{p{idx}}}"));
                path.push_str(lit);
                path.push_str(value);
                values.push(value.clone());
            }
            template.push_str(&tail);
            path.push_str(&tail);
            (template, path, values)
        })
    })
}

proptest! {
    #[test]
    fn tokenize_recovers_substituted_values((template, path, values) in template_case()) {
        let compiled = CompiledTemplate::compile(&template).unwrap();
        let params = compiled.tokenize(&path).unwrap();

        let recovered: Vec<String> = params.values().map(str::to_string).collect();
        prop_assert_eq!(recovered, values);

        let names: Vec<&str> = params.names().collect();
        let expected: Vec<&str> = compiled.param_names().iter().map(String::as_str).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn one_extra_trailing_slash_is_tolerated((template, path, values) in template_case()) {
        let compiled = CompiledTemplate::compile(&template).unwrap();

        let single = format!("{path}/");
        let params = compiled.tokenize(&single).unwrap();
        prop_assert_eq!(params.len(), values.len());

        let doubled = format!("{path}//");
        prop_assert!(compiled.tokenize(&doubled).is_err());
    }

    #[test]
    fn unbalanced_braces_always_fail(
        prefix in "[a-z/]{0,6}",
        middle in "[a-z/]{0,6}",
        which in 0usize..3,
    ) {
        let template = match which {
            0 => format!("{prefix}{{{middle}{{x}}"),
            1 => format!("{prefix}}}{middle}"),
            _ => format!("{prefix}{{{middle}"),
        };
        let err = CompiledTemplate::compile(&template).unwrap_err();
        prop_assert!(err.is_unbalanced(), "unexpected error: {err:?}");
    }

    #[test]
    fn balanced_distinct_names_always_compile(count in 0usize..6, sep in "[a-z/]{0,3}") {
        let template: String = (0..count).map(|i| format!("{sep}{{n{i}}}")).collect();
        prop_assert!(CompiledTemplate::compile(&template).is_ok());
    }
}

#[test]
fn empty_placeholder_is_rejected() {
    assert!(matches!(
        CompiledTemplate::compile("/a/{}"),
        Err(TemplateError::EmptyName { .. })
    ));
}
