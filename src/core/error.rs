use chrono::ParseError;

/// Failures of the price window selection.
///
/// Cases like a zero count or filters that leave nothing eligible are not errors,
/// they produce an empty selection instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed timestamp `{timestamp}`")]
    MalformedTimestamp {
        timestamp: String,

        #[source]
        source: ParseError,
    },

    #[error("`{time}` cannot be compared with the price series timestamps")]
    IncomparableTime { time: String },

    #[error("cutoff hour {0} is out of range, expected 0 to 23")]
    InvalidCutoffHour(u32),
}
