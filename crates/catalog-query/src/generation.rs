//! Query generations.
//!
//! Every initiated query takes the next generation from a shared counter.
//! Only the latest generation may update displayed state, regardless of the
//! order in which queries complete.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic id of an initiated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared generation counter. Clones observe the same sequence.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    latest: Arc<AtomicU64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query, superseding every earlier one.
    pub fn begin(&self) -> QueryToken {
        let generation = Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        QueryToken {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Most recently initiated generation.
    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_latest(&self, generation: Generation) -> bool {
        self.latest() == generation
    }
}

/// Handle carried by an in-flight query.
#[derive(Debug, Clone)]
pub struct QueryToken {
    generation: Generation,
    latest: Arc<AtomicU64>,
}

impl QueryToken {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Check if a newer query has been initiated since this one.
    pub fn is_superseded(&self) -> bool {
        self.latest.load(Ordering::SeqCst) != self.generation.0
    }

    pub fn is_current(&self) -> bool {
        !self.is_superseded()
    }
}
