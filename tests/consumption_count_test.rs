use dialogue_math::{
    subject::{Character, NullSubject},
    timestamp::{TimeDuration, TimePoint},
    EvalContext, ExpressionEngine,
};

extern crate dialogue_math;

fn hours(h: f64) -> TimeDuration {
    TimeDuration::from_hours(h)
}

fn eval(engine: &ExpressionEngine, source: &str, context: &EvalContext<'_>) -> f64 {
    engine.evaluate(source, context).unwrap()
}

#[test]
fn it_counts_zero_for_empty_history() {
    let engine = ExpressionEngine::default();
    let guy = Character::avatar("guy");
    let now = TimePoint::from_turns(0) + hours(100.0);
    let context = EvalContext::new(&guy, now);

    assert_eq!(eval(&engine, "consumption_count('butter')", &context), 0.0);
    assert_eq!(eval(&engine, "u_consumption_count('butter')", &context), 0.0);
}

#[test]
fn it_counts_matching_items_only() {
    let engine = ExpressionEngine::default();
    let now = TimePoint::from_turns(0) + hours(100.0);
    let mut guy = Character::avatar("guy");
    for offset in [1.0, 2.0, 3.0] {
        guy.consume("butter", now - hours(offset));
    }
    let context = EvalContext::new(&guy, now);

    assert_eq!(eval(&engine, "u_consumption_count('butter')", &context), 3.0);
    assert_eq!(eval(&engine, "u_consumption_count('apple')", &context), 0.0);
    // item ids match exactly
    assert_eq!(eval(&engine, "u_consumption_count('Butter')", &context), 0.0);
}

#[test]
fn it_counts_every_event_at_now() {
    let engine = ExpressionEngine::default();
    let now = TimePoint::from_turns(0) + hours(100.0);
    let mut guy = Character::avatar("guy");
    for _ in 0..3 {
        guy.consume("butter", now);
    }
    let context = EvalContext::new(&guy, now);

    assert_eq!(eval(&engine, "u_consumption_count('butter')", &context), 3.0);
    assert_eq!(
        eval(&engine, "u_consumption_count('butter', 'hours': 0)", &context),
        3.0
    );
    assert_eq!(eval(&engine, "u_consumption_count('apple')", &context), 0.0);
}

#[test]
fn it_respects_the_hours_keyword() {
    let engine = ExpressionEngine::default();
    let now = TimePoint::from_turns(0) + hours(100.0);
    let mut guy = Character::avatar("guy");
    guy.consume("butter", now);
    guy.consume("butter", now - hours(10.0));
    let context = EvalContext::new(&guy, now);

    assert_eq!(eval(&engine, "u_consumption_count('butter')", &context), 2.0);
    assert_eq!(
        eval(&engine, "u_consumption_count('butter', 'hours': 6)", &context),
        1.0
    );
    assert_eq!(
        eval(&engine, "u_consumption_count('butter', 'hours': 12)", &context),
        2.0
    );
    assert_eq!(
        eval(&engine, "u_consumption_count('butter', 'hours': 0.5)", &context),
        1.0
    );
    assert!(engine
        .evaluate("u_consumption_count('hours': 12, 'butter')", &context)
        .unwrap_err()
        .is_parse_error());
}

#[test]
fn it_includes_both_window_edges() {
    let engine = ExpressionEngine::default();
    let now = TimePoint::from_turns(0) + hours(100.0);

    let mut on_edge = Character::avatar("edge");
    on_edge.consume("butter", now - hours(6.0));
    let context = EvalContext::new(&on_edge, now);
    assert_eq!(
        eval(&engine, "u_consumption_count('butter', 'hours': 6)", &context),
        1.0
    );

    let mut past_edge = Character::avatar("past");
    past_edge.consume("butter", now - hours(6.0) - TimeDuration::from_turns(1));
    let context = EvalContext::new(&past_edge, now);
    assert_eq!(
        eval(&engine, "u_consumption_count('butter', 'hours': 6)", &context),
        0.0
    );

    // events in the future relative to now are outside the window
    let mut future = Character::avatar("future");
    future.consume("butter", now + TimeDuration::from_turns(1));
    let context = EvalContext::new(&future, now);
    assert_eq!(eval(&engine, "u_consumption_count('butter')", &context), 0.0);
}

#[test]
fn it_reads_the_secondary_subject() {
    let engine = ExpressionEngine::default();
    let now = TimePoint::from_turns(0) + hours(100.0);
    let guy = Character::avatar("guy");
    let mut baker = Character::npc("baker");
    baker.consume("bread", now - hours(1.0));
    baker.consume("bread", now - hours(2.0));
    let context = EvalContext::new(&guy, now).with_secondary(&baker);

    assert_eq!(eval(&engine, "n_consumption_count('bread')", &context), 2.0);
    assert_eq!(eval(&engine, "u_consumption_count('bread')", &context), 0.0);
    assert_eq!(
        eval(
            &engine,
            "n_consumption_count('bread') - u_consumption_count('bread') == 2",
            &context
        ),
        1.0
    );
}

#[test]
fn it_counts_zero_for_subjects_without_history() {
    let engine = ExpressionEngine::default();
    let nobody = NullSubject::new();
    let context = EvalContext::new(&nobody, TimePoint::from_turns(0));

    assert_eq!(eval(&engine, "u_consumption_count('butter')", &context), 0.0);
}
