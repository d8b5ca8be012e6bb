use parquet::file::statistics::Statistics;

/// Chunk-level prefix match over byte-ordered min/max statistics.
///
/// Embedded in a [`crate::Predicate::Prefix`] leaf; the scan calls
/// [`can_drop`](Self::can_drop) (and [`inverse_can_drop`](Self::inverse_can_drop)
/// when the leaf sits under a negation) per column chunk, and
/// [`keep`](Self::keep) per value when it evaluates residuals.
///
/// All comparisons are unsigned byte-lexicographic, matching the Parquet
/// sort order for BINARY and string columns. Signed comparison would break
/// pruning for any byte ≥ 0x80.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixPruner {
    prefix: Vec<u8>,
}

impl PrefixPruner {
    /// Build a pruner for the given prefix bytes.
    pub fn new(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix this pruner matches.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// True iff no value in a chunk with these statistics can start with
    /// the prefix.
    ///
    /// Each endpoint is truncated to the prefix length before comparing:
    /// if even the truncated max sorts before the prefix, every value does;
    /// if the truncated min sorts after it, every value does. Anything else
    /// keeps the chunk.
    pub fn can_drop(&self, min: &[u8], max: &[u8]) -> bool {
        let head = |stat: &[u8]| stat.len().min(self.prefix.len());
        if &max[..head(max)] < self.prefix.as_slice() {
            return true;
        }
        &min[..head(min)] > self.prefix.as_slice()
    }

    /// True iff the negation of "starts with prefix" can be dropped for a
    /// chunk with these statistics.
    ///
    /// Holds exactly when both truncated endpoints equal the prefix: chunk
    /// ordering then bounds every value inside the prefix range.
    pub fn inverse_can_drop(&self, min: &[u8], max: &[u8]) -> bool {
        let head = |stat: &[u8]| stat.len().min(self.prefix.len());
        &min[..head(min)] == self.prefix.as_slice() && &max[..head(max)] == self.prefix.as_slice()
    }

    /// Exact per-value predicate.
    pub fn keep(&self, value: &[u8]) -> bool {
        value.starts_with(&self.prefix)
    }

    /// [`can_drop`](Self::can_drop) applied to a chunk's Parquet statistics.
    ///
    /// Missing or non-byte-array statistics keep the chunk.
    pub fn can_drop_chunk(&self, statistics: &Statistics) -> bool {
        match byte_stats(statistics) {
            Some((min, max)) => self.can_drop(min, max),
            None => false,
        }
    }

    /// [`inverse_can_drop`](Self::inverse_can_drop) applied to a chunk's
    /// Parquet statistics.
    ///
    /// Missing or non-byte-array statistics keep the chunk.
    pub fn inverse_can_drop_chunk(&self, statistics: &Statistics) -> bool {
        match byte_stats(statistics) {
            Some((min, max)) => self.inverse_can_drop(min, max),
            None => false,
        }
    }
}

fn byte_stats(statistics: &Statistics) -> Option<(&[u8], &[u8])> {
    let Statistics::ByteArray(stats) = statistics else {
        return None;
    };
    Some((stats.min_opt()?.data(), stats.max_opt()?.data()))
}
