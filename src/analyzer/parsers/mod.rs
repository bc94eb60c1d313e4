pub mod common;
pub mod expression;

pub use expression::parse_expression;
