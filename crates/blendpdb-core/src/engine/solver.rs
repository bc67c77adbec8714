use crate::core::models::substance::Substance;
use crate::engine::config::{DEFAULT_MIN_TOTAL, SolverConfig};
use crate::engine::error::SolveError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, info, instrument, warn};

/// Largest accepted distance between the ideal count and its rounded value.
pub const ROUNDING_TOLERANCE: Decimal = dec!(0.1);

const SLOW_SEARCH_ITERATIONS: u64 = 1_000_000;

/// Molecule counts of a binary mixture, in the order the substances were given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MixtureCounts {
    pub count_a: u64,
    pub count_b: u64,
}

impl MixtureCounts {
    pub fn total(&self) -> u64 {
        self.count_a + self.count_b
    }

    pub fn swapped(self) -> Self {
        Self {
            count_a: self.count_b,
            count_b: self.count_a,
        }
    }
}

/// A request for `percentage` (v/v) of `b` blended with `a`.
#[derive(Debug, Clone, Copy)]
pub struct MixtureRequest<'a> {
    pub a: &'a Substance,
    pub b: &'a Substance,
    pub percentage: Decimal,
    pub min_total: u64,
}

impl<'a> MixtureRequest<'a> {
    pub fn new(a: &'a Substance, b: &'a Substance, percentage: Decimal) -> Self {
        Self {
            a,
            b,
            percentage,
            min_total: DEFAULT_MIN_TOTAL,
        }
    }

    pub fn min_total(mut self, total: u64) -> Self {
        self.min_total = total;
        self
    }
}

/// Solves the molecule counts for `percentage` (v/v) of `b` with `a`.
///
/// Uses the default iteration cap; see [`solve_request`] for the algorithm.
pub fn solve(
    a: &Substance,
    b: &Substance,
    percentage: Decimal,
    min_total: u64,
) -> Result<MixtureCounts, SolveError> {
    let config = SolverConfig {
        min_total,
        ..SolverConfig::default()
    };
    solve_with_config(a, b, percentage, &config)
}

pub fn solve_with_config(
    a: &Substance,
    b: &Substance,
    percentage: Decimal,
    config: &SolverConfig,
) -> Result<MixtureCounts, SolveError> {
    let request = MixtureRequest::new(a, b, percentage).min_total(config.min_total);
    solve_request(&request, config.max_iterations)
}

/// Finds integer molecule counts realizing the requested volume fraction.
///
/// The substance with the larger molar concentration is the reference
/// (`lhs`); its count is increased one molecule at a time while the other
/// count follows as `rhs_n = k * m * lhs_n`, with `k = (100 - p) / p` and
/// `m = rhs.coefficient / lhs.coefficient`. The first candidate whose
/// `rhs_n` lies within [`ROUNDING_TOLERANCE`] of an integer and whose total
/// exceeds `min_total` is accepted.
///
/// # Errors
///
/// - [`SolveError::InvalidInput`] if the percentage is outside `(0, 100)` or
///   `min_total` is zero.
/// - [`SolveError::NonPositiveCoefficient`] if either substance has no
///   positive coefficient.
/// - [`SolveError::NonTerminatingSearch`] after `max_iterations` rejected
///   candidates. Percentages very close to 0 or 100 can need long searches.
/// - [`SolveError::ArithmeticOverflow`] if a candidate leaves the decimal range.
#[instrument(skip_all, name = "ratio_solver", fields(a = %request.a.name(), b = %request.b.name(), percentage = %request.percentage))]
pub fn solve_request(
    request: &MixtureRequest,
    max_iterations: u64,
) -> Result<MixtureCounts, SolveError> {
    validate_percentage(request.percentage)?;
    if request.min_total == 0 {
        return Err(SolveError::InvalidInput(
            "minimum total number of molecules must be at least 1".to_string(),
        ));
    }
    let coefficient_a = positive_coefficient(request.a)?;
    let coefficient_b = positive_coefficient(request.b)?;

    // The percentage always refers to `b`; swapping the roles inverts it.
    let (lhs, rhs, percentage, reverse) = if coefficient_a > coefficient_b {
        (coefficient_a, coefficient_b, request.percentage, false)
    } else {
        (
            coefficient_b,
            coefficient_a,
            Decimal::ONE_HUNDRED - request.percentage,
            true,
        )
    };

    let k = (Decimal::ONE_HUNDRED - percentage)
        .checked_div(percentage)
        .ok_or(SolveError::ArithmeticOverflow)?;
    let m = rhs.checked_div(lhs).ok_or(SolveError::ArithmeticOverflow)?;
    let ratio = k.checked_mul(m).ok_or(SolveError::ArithmeticOverflow)?;
    debug!(%k, %m, reverse, "Starting molecule count search.");

    let min_total = Decimal::from(request.min_total);
    let mut lhs_n: u64 = 1;
    let rhs_n = loop {
        let lhs_count = Decimal::from(lhs_n);
        let candidate = ratio
            .checked_mul(lhs_count)
            .ok_or(SolveError::ArithmeticOverflow)?;
        let total = candidate
            .checked_add(lhs_count)
            .ok_or(SolveError::ArithmeticOverflow)?;

        if rounding_error(candidate) < ROUNDING_TOLERANCE && total > min_total {
            break round_half_away(candidate);
        }
        if lhs_n >= max_iterations {
            return Err(SolveError::NonTerminatingSearch {
                iterations: max_iterations,
            });
        }
        if lhs_n == SLOW_SEARCH_ITERATIONS {
            warn!(
                iterations = lhs_n,
                "Molecule count search is converging slowly; the percentage may be too close to 0 or 100."
            );
        }
        lhs_n += 1;
    };

    let rhs_n = rhs_n.to_u64().ok_or(SolveError::ArithmeticOverflow)?;
    let counts = MixtureCounts {
        count_a: lhs_n,
        count_b: rhs_n,
    };
    let counts = if reverse { counts.swapped() } else { counts };
    info!(
        count_a = counts.count_a,
        count_b = counts.count_b,
        iterations = lhs_n,
        "Molecule counts solved."
    );
    Ok(counts)
}

fn validate_percentage(percentage: Decimal) -> Result<(), SolveError> {
    if percentage <= Decimal::ZERO || percentage >= Decimal::ONE_HUNDRED {
        return Err(SolveError::InvalidInput(format!(
            "percentage must lie strictly between 0 and 100, found {}",
            percentage
        )));
    }
    Ok(())
}

fn positive_coefficient(substance: &Substance) -> Result<Decimal, SolveError> {
    match substance.coefficient() {
        Some(coefficient) if coefficient > Decimal::ZERO => Ok(coefficient),
        coefficient => Err(SolveError::NonPositiveCoefficient {
            substance: substance.name().to_string(),
            coefficient,
        }),
    }
}

fn round_half_away(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn rounding_error(value: Decimal) -> Decimal {
    (round_half_away(value) - value).abs()
}
