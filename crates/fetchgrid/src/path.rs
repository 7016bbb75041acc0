//! Index paths for addressing rows in sectioned lists.
//!
//! The `IndexPath` type is the fundamental way to reference a row within an
//! observed result set or a grid view. It contains a section and a row within
//! that section.

use std::fmt;

/// A section+row coordinate identifying a row in a sectioned list.
///
/// Index paths order section-major: all rows of section 0 come before any row
/// of section 1.
///
/// # Path Validity
///
/// Index paths should be used immediately and not stored long-term. After a
/// change batch (insertions, deletions, moves), previously obtained paths may
/// no longer refer to the same row.
///
/// # Example
///
/// ```
/// use fetchgrid::IndexPath;
///
/// let first = IndexPath::new(0, 0);
/// let third = IndexPath::new(0, 2);
/// assert!(first < third);
/// assert_eq!(third.row(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    /// The section within the list.
    section: usize,
    /// The row within the section.
    row: usize,
}

impl IndexPath {
    /// Creates a new index path.
    #[inline]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }

    /// Creates a path addressing a row in the first section.
    ///
    /// Convenience for the common flat-list case.
    #[inline]
    pub const fn row_in_first_section(row: usize) -> Self {
        Self::new(0, row)
    }

    /// Returns the section of this path.
    #[inline]
    pub const fn section(&self) -> usize {
        self.section
    }

    /// Returns the row within the section.
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Creates a path at the same section but a different row.
    #[inline]
    pub const fn with_row(&self, row: usize) -> Self {
        Self::new(self.section, row)
    }
}

impl fmt::Debug for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexPath({}, {})", self.section, self.row)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let path = IndexPath::new(2, 7);
        assert_eq!(path.section(), 2);
        assert_eq!(path.row(), 7);
    }

    #[test]
    fn test_row_in_first_section() {
        let path = IndexPath::row_in_first_section(4);
        assert_eq!(path.section(), 0);
        assert_eq!(path.row(), 4);
    }

    #[test]
    fn test_ordering_is_section_major() {
        let a = IndexPath::new(0, 9);
        let b = IndexPath::new(1, 0);
        let c = IndexPath::new(1, 3);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_with_row() {
        let path = IndexPath::new(1, 2).with_row(5);
        assert_eq!(path, IndexPath::new(1, 5));
    }

    #[test]
    fn test_display() {
        assert_eq!(IndexPath::new(0, 3).to_string(), "[0, 3]");
    }
}
