use std::collections::VecDeque;

/// Ordered set of buffer row indices that are currently free (all zero).
///
/// Insertion always consumes the lowest-ordered free row. Taking and returning the front row is O(1).
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FreeRows {
    indices: VecDeque<usize>,
}

impl FreeRows {
    /// Creates a sequence holding every row index of a buffer with `rows` rows.
    pub fn all(rows: usize) -> Self {
        Self {
            indices: (0..rows).collect(),
        }
    }

    /// Creates a sequence from row indices, which must already be in ascending order.
    pub fn from_sorted<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let indices: VecDeque<usize> = indices.into_iter().collect();
        debug_assert!(indices.iter().zip(indices.iter().skip(1)).all(|(a, b)| a < b));
        Self { indices }
    }

    /// Removes and returns the first free row index.
    pub fn take_first(&mut self) -> Option<usize> {
        self.indices.pop_front()
    }

    /// Returns a previously taken row index to the front of the sequence.
    pub fn restore_first(&mut self, index: usize) {
        debug_assert!(self.indices.front().map_or(true, |&front| index < front));
        self.indices.push_front(index);
    }

    /// Returns the number of free rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no row is free.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}
