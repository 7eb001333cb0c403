use snafu::Snafu;

#[derive(Snafu, Debug, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum SchedulerError {
    #[snafu(display("ease bounds must satisfy 0 < min ({min}) <= max ({max})"))]
    InvalidEaseBounds { min: f64, max: f64 },
    #[snafu(display("initial ease {initial} lies outside the ease bounds"))]
    InvalidInitialEase { initial: f64 },
    InvalidIntervals,
    InvalidMasteryThresholds,
    #[snafu(display("batch item has no identifier"))]
    MissingItemId,
    #[snafu(display("item {id} has a non-finite ease factor"))]
    NonFiniteEase { id: i64 },
    #[snafu(display("item {id} has negative {field}: {value}"))]
    NegativeField {
        id: i64,
        field: &'static str,
        value: i64,
    },
    #[snafu(display("item {id} would fall due after the last representable date"))]
    DueDateOutOfRange { id: i64 },
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
