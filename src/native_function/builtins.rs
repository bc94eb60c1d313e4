//! Functions available in every expression.

use crate::eval::{ArgKind, Value};
use crate::timestamp::TimeDuration;

use super::types::{CallArgs, FunctionDescriptor};

pub const CONSUMPTION_COUNT: &str = "consumption_count";
pub const HOURS: &str = "hours";
pub const DEFAULT_WINDOW_HOURS: f64 = 48.0;

pub(crate) fn descriptors() -> Vec<FunctionDescriptor> {
    vec![
        FunctionDescriptor::new(CONSUMPTION_COUNT, consumption_count)
            .scoped()
            .with_args(&[ArgKind::String])
            .with_keyword(HOURS, Value::Number(DEFAULT_WINDOW_HOURS)),
        FunctionDescriptor::new("min", min).with_variadic(ArgKind::Number, 1),
        FunctionDescriptor::new("max", max).with_variadic(ArgKind::Number, 1),
        FunctionDescriptor::new("abs", |args| args.number(0).abs()).with_args(&[ArgKind::Number]),
        FunctionDescriptor::new("clamp", clamp).with_args(&[ArgKind::Number; 3]),
    ]
}

/// `consumption_count(item_id, 'hours': 48)`: how many `item_id` the subject
/// consumed in the last `hours`, counting both window edges.
fn consumption_count(args: &CallArgs<'_, '_>) -> f64 {
    let Some(history) = args.subject.and_then(|s| s.consumption_history()) else {
        return 0.0;
    };
    let window = TimeDuration::from_hours(args.keyword_number(HOURS));
    history.consumption_count(args.string(0), args.context.now(), window) as f64
}

fn min(args: &CallArgs<'_, '_>) -> f64 {
    args.numbers().reduce(f64::min).unwrap_or(0.0)
}

fn max(args: &CallArgs<'_, '_>) -> f64 {
    args.numbers().reduce(f64::max).unwrap_or(0.0)
}

fn clamp(args: &CallArgs<'_, '_>) -> f64 {
    let (value, lo, hi) = (args.number(0), args.number(1), args.number(2));
    if lo > hi {
        return lo;
    }
    value.max(lo).min(hi)
}
