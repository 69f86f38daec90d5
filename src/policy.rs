use crate::error::Error;

/// Thresholds governing when the bucket index is rebuilt.
///
/// With `n` stored elements and `m` buckets the table keeps
///
/// - `n <= m * grow_ratio` and `m <= n * shrink_ratio` while
///   `n >= min_buckets`,
/// - `m == min_buckets` while `n < min_buckets`.
///
/// Whenever one of these breaks, the index is rebuilt with
/// `max(n, min_buckets)` buckets. Both ratios must be at least 2 so that a
/// rebuild is always followed by a run of mutations that need none.
///
/// The [`Default`] policy is selected by cargo feature:
///
/// | feature            | `min_buckets` | `grow_ratio` | `shrink_ratio` |
/// |--------------------|---------------|--------------|----------------|
/// | `density-balanced` | 3             | 2            | 3              |
/// | `density-compact`  | 3             | 4            | 2              |
/// | `density-sparse`   | 8             | 2            | 6              |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPolicy {
    min_buckets: usize,
    grow_ratio: usize,
    shrink_ratio: usize,
}

cfg_if::cfg_if! {
    if #[cfg(feature = "density-compact")] {
        const DEFAULT_POLICY: LoadPolicy = LoadPolicy {
            min_buckets: 3,
            grow_ratio: 4,
            shrink_ratio: 2,
        };
    } else if #[cfg(feature = "density-sparse")] {
        const DEFAULT_POLICY: LoadPolicy = LoadPolicy {
            min_buckets: 8,
            grow_ratio: 2,
            shrink_ratio: 6,
        };
    } else {
        const DEFAULT_POLICY: LoadPolicy = LoadPolicy {
            min_buckets: 3,
            grow_ratio: 2,
            shrink_ratio: 3,
        };
    }
}

impl Default for LoadPolicy {
    fn default() -> Self {
        DEFAULT_POLICY
    }
}

impl LoadPolicy {
    /// Creates a policy from explicit thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPolicy`] if `min_buckets` is zero or either
    /// ratio is below 2.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dense_hash::policy::LoadPolicy;
    /// #
    /// let policy = LoadPolicy::new(4, 2, 3).unwrap();
    /// assert_eq!(policy.min_buckets(), 4);
    /// assert!(LoadPolicy::new(4, 1, 3).is_err());
    /// ```
    pub const fn new(
        min_buckets: usize,
        grow_ratio: usize,
        shrink_ratio: usize,
    ) -> Result<Self, Error> {
        if min_buckets == 0 {
            return Err(Error::InvalidPolicy("min_buckets must be non-zero"));
        }
        if grow_ratio < 2 {
            return Err(Error::InvalidPolicy("grow_ratio must be at least 2"));
        }
        if shrink_ratio < 2 {
            return Err(Error::InvalidPolicy("shrink_ratio must be at least 2"));
        }
        Ok(Self {
            min_buckets,
            grow_ratio,
            shrink_ratio,
        })
    }

    /// The bucket count of an empty table, and the floor under which the
    /// ratios are not enforced.
    pub const fn min_buckets(&self) -> usize {
        self.min_buckets
    }

    /// Maximum average number of elements per bucket.
    pub const fn grow_ratio(&self) -> usize {
        self.grow_ratio
    }

    /// Maximum number of buckets per element.
    pub const fn shrink_ratio(&self) -> usize {
        self.shrink_ratio
    }

    /// Returns `true` if an index of `bucket_count` buckets over `len`
    /// elements violates this policy.
    #[inline]
    pub const fn needs_rehash(&self, bucket_count: usize, len: usize) -> bool {
        if len < self.min_buckets {
            return bucket_count != self.min_buckets;
        }
        bucket_count.saturating_mul(self.grow_ratio) < len
            || len.saturating_mul(self.shrink_ratio) < bucket_count
    }

    /// Bucket count a rebuild over `len` elements should produce.
    #[inline]
    pub const fn target_buckets(&self, len: usize) -> usize {
        if len > self.min_buckets {
            len
        } else {
            self.min_buckets
        }
    }
}
