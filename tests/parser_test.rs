use dialogue_math::{
    eval::{ArgKind, Value},
    subject::NullSubject,
    timestamp::TimePoint,
    EvalContext, ExpressionEngine, ExpressionParser, FunctionDescriptor, FunctionRegistry,
    SyntaxError,
};
use proptest::prelude::*;

extern crate dialogue_math;

fn parser() -> ExpressionParser {
    ExpressionParser::new(FunctionRegistry::builtin())
}

/// Registry with a function taking two keywords, for order-independence checks.
fn weighted_registry() -> std::sync::Arc<FunctionRegistry> {
    FunctionRegistry::builder()
        .with_builtins()
        .unwrap()
        .register(
            FunctionDescriptor::new("weighted", |args| {
                args.number(0) * args.keyword_number("scale") + args.keyword_number("offset")
            })
            .with_args(&[ArgKind::Number])
            .with_keyword("scale", Value::Number(1.0))
            .with_keyword("offset", Value::Number(0.0)),
        )
        .unwrap()
        .build()
}

#[test]
fn it_rejects_unknown_functions_before_evaluation() {
    let err = parser().parse("u_hunger > 1 && teleport('home')").unwrap_err();
    assert_eq!(
        err,
        SyntaxError::UnknownFunction {
            name: "teleport".to_string(),
            position: 16
        }
    );
}

#[test]
fn it_reports_arity_with_expected_range() {
    match parser().parse("clamp(1, 2)") {
        Err(SyntaxError::ArityMismatch {
            function,
            expected,
            found,
            position,
        }) => {
            assert_eq!(function, "clamp");
            assert_eq!(expected, "3");
            assert_eq!(found, 2);
            assert_eq!(position, 0);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        parser().parse("min()"),
        Err(SyntaxError::ArityMismatch { .. })
    ));
}

#[test]
fn it_positions_argument_errors_at_the_argument() {
    let err = parser()
        .parse("consumption_count('butter', 'days': 2)")
        .unwrap_err();
    assert_eq!(err.position(), Some(28));

    let err = parser().parse("max(1, 'two')").unwrap_err();
    assert!(matches!(
        err,
        SyntaxError::ArgumentKind {
            expected: ArgKind::Number,
            found: ArgKind::String,
            position: 7,
            ..
        }
    ));
}

#[test]
fn it_accepts_both_quote_styles() {
    let single = parser().parse("consumption_count('butter')").unwrap();
    let double = parser().parse("consumption_count(\"butter\")").unwrap();
    assert_eq!(single, double);
}

#[test]
fn it_keeps_negative_literals_and_subtraction_apart() {
    let engine = ExpressionEngine::default();
    let nobody = NullSubject::new();
    let context = EvalContext::new(&nobody, TimePoint::from_turns(0));

    assert_eq!(engine.evaluate("5-3", &context).unwrap(), 2.0);
    assert_eq!(engine.evaluate("5 - -3", &context).unwrap(), 8.0);
    assert_eq!(engine.evaluate("-2 * 3", &context).unwrap(), -6.0);
    assert_eq!(engine.evaluate("-(2 + 3)", &context).unwrap(), -5.0);
    assert_eq!(engine.evaluate("max(-1, -7)", &context).unwrap(), -1.0);
}

#[test]
fn it_parses_with_a_custom_registry() {
    let registry = weighted_registry();
    let engine = ExpressionEngine::new(registry.clone(), Default::default());
    let nobody = NullSubject::new();
    let context = EvalContext::new(&nobody, TimePoint::from_turns(0));

    assert_eq!(
        engine
            .evaluate("weighted(3, 'scale': 2, 'offset': 1)", &context)
            .unwrap(),
        7.0
    );
    assert_eq!(engine.evaluate("weighted(3)", &context).unwrap(), 3.0);
    // the builtin registry does not know it
    assert!(parser().parse("weighted(3)").is_err());
}

proptest! {
    #[test]
    fn test_keyword_order_does_not_matter(scale in 0u32..100, offset in 0u32..100, swap in any::<bool>()) {
        let parser = ExpressionParser::new(weighted_registry());
        let (first, second) = if swap {
            (format!("'offset': {}", offset), format!("'scale': {}", scale))
        } else {
            (format!("'scale': {}", scale), format!("'offset': {}", offset))
        };
        let left = parser.parse(&format!("weighted(4, {}, {})", first, second)).unwrap();
        let right = parser.parse(&format!("weighted(4, 'scale': {}, 'offset': {})", scale, offset)).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn test_integer_arithmetic_matches_rust(a in 0i64..1000, b in 0i64..1000, c in 1i64..1000) {
        let engine = ExpressionEngine::default();
        let nobody = NullSubject::new();
        let context = EvalContext::new(&nobody, TimePoint::from_turns(0));

        let value = engine.evaluate(&format!("{} + {} * {} - {} % {}", a, b, c, a, c), &context).unwrap();
        prop_assert_eq!(value, (a + b * c - a % c) as f64);

        let compared = engine.evaluate(&format!("{} < {} || {} == {}", a, b, a, b), &context).unwrap();
        prop_assert_eq!(compared, if a <= b { 1.0 } else { 0.0 });
    }

    #[test]
    fn test_display_reparses_to_same_tree(a in 0u32..50, b in 0u32..50, hours in 1u32..100) {
        let parser = parser();
        let source = format!(
            "!(u_x > {}) && n_consumption_count('tea', 'hours': {}) <= {} || -g_day",
            a, hours, b
        );
        let parsed = parser.parse(&source).unwrap();
        let reparsed = parser.parse(&parsed.to_string()).unwrap();
        prop_assert_eq!(parsed, reparsed);
    }
}
