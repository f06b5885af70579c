//! Request generations

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Monotonic stamp attached to an outstanding request.
///
/// Only a response carrying the latest issued generation may be applied; anything older
/// belongs to a superseded request and is dropped on arrival.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The generation issued after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}
