//! Time-ordered record identifiers.
//!
//! Ids are UUIDv7: a millisecond timestamp prefix followed by random bits, so
//! their natural byte order follows creation time. Within one process the
//! generator also guarantees strict increase, even when several ids are
//! minted inside the same millisecond or the wall clock steps backwards.

use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

#[derive(Debug)]
pub struct IdGenerator {
    last: Mutex<Uuid>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(Uuid::nil()),
        }
    }

    /// Next identifier, strictly greater than every id this generator has
    /// returned before.
    pub fn next_id(&self) -> Uuid {
        let candidate = Uuid::now_v7();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);

        let id = if candidate > *last {
            candidate
        } else {
            // Bump the random tail; the timestamp prefix and version bits stay put.
            Uuid::from_u128(last.as_u128().wrapping_add(1))
        };

        *last = id;
        id
    }
}
