//! Construction-time configuration for [`HashTable`](crate::HashTable).

use crate::error::ConfigError;
use crate::hasher::HasherKind;

pub const DEFAULT_BUCKET_COUNT: usize = 64;
pub const DEFAULT_MIN_BUCKET_COUNT: usize = 8;
pub const DEFAULT_MAX_BUCKET_COUNT: usize = 32_768;
pub const DEFAULT_RESIZE_FACTOR: usize = 2;
pub const DEFAULT_LOAD_BEFORE_RESIZE_UP: f64 = 0.75;
pub const DEFAULT_LOAD_BEFORE_RESIZE_DOWN: f64 = 0.25;
pub const DEFAULT_HASHER: &str = "fnv1a";

/// Immutable table configuration.
///
/// Built with `TableConfig::default()` and the `with_*` methods, then
/// handed to [`HashTable::with_config`](crate::HashTable::with_config),
/// which validates it once. Nothing here can be changed on a live table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig<V> {
    pub bucket_count: usize,
    /// Lower clamp. `None` pins the floor at `bucket_count`.
    pub min_bucket_count: Option<usize>,
    /// Upper clamp. `None` pins the ceiling at `bucket_count`.
    pub max_bucket_count: Option<usize>,
    pub resize_up_factor: usize,
    pub resize_down_factor: usize,
    pub load_before_resize_up: f64,
    pub load_before_resize_down: f64,
    /// Returned by lookups that miss.
    pub default_value: V,
    /// Registry name of the hasher, see [`HasherKind::from_name`].
    pub hasher: String,
}

impl<V: Default> Default for TableConfig<V> {
    fn default() -> Self {
        Self::with_default_value(V::default())
    }
}

impl<V> TableConfig<V> {
    /// Default configuration with an explicit miss value, for `V` without
    /// a `Default` impl.
    pub fn with_default_value(default_value: V) -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            min_bucket_count: Some(DEFAULT_MIN_BUCKET_COUNT),
            max_bucket_count: Some(DEFAULT_MAX_BUCKET_COUNT),
            resize_up_factor: DEFAULT_RESIZE_FACTOR,
            resize_down_factor: DEFAULT_RESIZE_FACTOR,
            load_before_resize_up: DEFAULT_LOAD_BEFORE_RESIZE_UP,
            load_before_resize_down: DEFAULT_LOAD_BEFORE_RESIZE_DOWN,
            default_value,
            hasher: DEFAULT_HASHER.to_owned(),
        }
    }

    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    pub fn with_min_bucket_count(mut self, min: Option<usize>) -> Self {
        self.min_bucket_count = min;
        self
    }

    pub fn with_max_bucket_count(mut self, max: Option<usize>) -> Self {
        self.max_bucket_count = max;
        self
    }

    /// Set both the growth and the shrink factor.
    pub fn with_resize_factor(mut self, factor: usize) -> Self {
        self.resize_up_factor = factor;
        self.resize_down_factor = factor;
        self
    }

    pub fn with_resize_up_factor(mut self, factor: usize) -> Self {
        self.resize_up_factor = factor;
        self
    }

    pub fn with_resize_down_factor(mut self, factor: usize) -> Self {
        self.resize_down_factor = factor;
        self
    }

    pub fn with_load_before_resize_up(mut self, load: f64) -> Self {
        self.load_before_resize_up = load;
        self
    }

    pub fn with_load_before_resize_down(mut self, load: f64) -> Self {
        self.load_before_resize_down = load;
        self
    }

    pub fn with_default(mut self, default_value: V) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn with_hasher(mut self, name: impl Into<String>) -> Self {
        self.hasher = name.into();
        self
    }

    pub fn with_hasher_kind(mut self, kind: HasherKind) -> Self {
        self.hasher = kind.name().to_owned();
        self
    }

    /// Check every knob and resolve the hasher and the effective clamps.
    pub(crate) fn validate(self) -> Result<Resolved<V>, ConfigError> {
        if self.bucket_count == 0 {
            return Err(ConfigError::ZeroBucketCount);
        }
        if self.resize_up_factor == 0 {
            return Err(ConfigError::ZeroResizeFactor {
                which: "resize_up_factor",
            });
        }
        if self.resize_down_factor == 0 {
            return Err(ConfigError::ZeroResizeFactor {
                which: "resize_down_factor",
            });
        }
        check_threshold("load_before_resize_up", self.load_before_resize_up)?;
        check_threshold("load_before_resize_down", self.load_before_resize_down)?;
        let hasher = HasherKind::from_name(&self.hasher)?;

        // The initial capacity always lies inside the clamps, and the floor
        // never drops below one bucket. An absent clamp allows no movement
        // in its direction.
        let min_bucket_count = self
            .min_bucket_count
            .map_or(self.bucket_count, |m| m.min(self.bucket_count))
            .max(1);
        let max_bucket_count = self
            .max_bucket_count
            .map_or(self.bucket_count, |m| m.max(self.bucket_count));

        Ok(Resolved {
            bucket_count: self.bucket_count,
            limits: ResizeLimits {
                min_bucket_count,
                max_bucket_count,
                resize_up_factor: self.resize_up_factor,
                resize_down_factor: self.resize_down_factor,
                load_before_resize_up: self.load_before_resize_up,
                load_before_resize_down: self.load_before_resize_down,
            },
            default_value: self.default_value,
            hasher,
        })
    }
}

fn check_threshold(which: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { which, value })
    }
}

/// Resize policy knobs after validation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct ResizeLimits {
    pub min_bucket_count: usize,
    pub max_bucket_count: usize,
    pub resize_up_factor: usize,
    pub resize_down_factor: usize,
    pub load_before_resize_up: f64,
    pub load_before_resize_down: f64,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self {
            min_bucket_count: DEFAULT_MIN_BUCKET_COUNT.min(DEFAULT_BUCKET_COUNT),
            max_bucket_count: DEFAULT_MAX_BUCKET_COUNT.max(DEFAULT_BUCKET_COUNT),
            resize_up_factor: DEFAULT_RESIZE_FACTOR,
            resize_down_factor: DEFAULT_RESIZE_FACTOR,
            load_before_resize_up: DEFAULT_LOAD_BEFORE_RESIZE_UP,
            load_before_resize_down: DEFAULT_LOAD_BEFORE_RESIZE_DOWN,
        }
    }
}

impl ResizeLimits {
    /// Bucket count a resize-up would move to, clamped to the maximum.
    pub fn grown(&self, bucket_count: usize) -> usize {
        bucket_count
            .saturating_mul(self.resize_up_factor)
            .min(self.max_bucket_count)
    }

    /// Bucket count a resize-down would move to, clamped to the minimum.
    pub fn shrunk(&self, bucket_count: usize) -> usize {
        (bucket_count / self.resize_down_factor).max(self.min_bucket_count)
    }
}

pub(crate) struct Resolved<V> {
    pub bucket_count: usize,
    pub limits: ResizeLimits,
    pub default_value: V,
    pub hasher: HasherKind,
}
