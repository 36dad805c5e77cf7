//! Errors for positional operations.
//!
//! Capacity errors live next to the storage traits as
//! [`Full`](crate::storage::Full); the types here cover index arguments.
//! Every bounds check runs before any mutation, so a returned error means
//! the structure is unchanged.

use core::fmt;

/// Error returned when an index argument is outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    /// The offending index.
    pub index: usize,
    /// The structure's length at the time of the call.
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} out of range for length {}",
            self.index, self.len
        )
    }
}

impl std::error::Error for OutOfRange {}

/// Error returned when a value could not be placed into a structure.
///
/// Operations that consume a value hand it back inside the error, so a
/// failed call never drops caller data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError<T> {
    /// The backing storage has no free slot.
    Full(T),
    /// The index exceeds the current length.
    OutOfRange(T, OutOfRange),
}

impl<T> InsertError<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        match self {
            InsertError::Full(value) => value,
            InsertError::OutOfRange(value, _) => value,
        }
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::Full(_) => write!(f, "storage is full"),
            InsertError::OutOfRange(_, range) => fmt::Display::fmt(range, f),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for InsertError<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display() {
        let err = OutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range for length 3");
    }

    #[test]
    fn insert_error_returns_value() {
        let err: InsertError<u64> = InsertError::Full(42);
        assert_eq!(err.into_inner(), 42);

        let err = InsertError::OutOfRange(7u64, OutOfRange { index: 9, len: 2 });
        assert_eq!(err.into_inner(), 7);
    }
}
