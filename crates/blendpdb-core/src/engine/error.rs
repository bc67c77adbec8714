use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SolveError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Substance '{substance}' has a non-positive or undefined coefficient ({coefficient:?})")]
    NonPositiveCoefficient {
        substance: String,
        coefficient: Option<Decimal>,
    },

    #[error("Search for integer molecule counts did not converge after {iterations} iterations")]
    NonTerminatingSearch { iterations: u64 },

    #[error("Decimal arithmetic overflowed while solving molecule counts")]
    ArithmeticOverflow,
}
