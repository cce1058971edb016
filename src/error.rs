use thiserror::Error;

/// Errors raised while building or rebinding a table.
///
/// Item operations never fail: misses return the default value and
/// out-of-range resizes are clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown hasher `{name}`, expected one of: naive, djb2, fnv1, fnv1a")]
    UnknownHasher { name: String },

    #[error("bucket_count must be at least 1")]
    ZeroBucketCount,

    #[error("{which} must be at least 1")]
    ZeroResizeFactor { which: &'static str },

    #[error("{which} must be a finite, non-negative number, got {value}")]
    InvalidThreshold { which: &'static str, value: f64 },
}
