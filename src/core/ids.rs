//! Generators for view `external_id`s.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use super::config::ViewIdStrategy;

pub trait ViewIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// `view-1`, `view-2`, ... for the lifetime of the generator.
#[derive(Debug)]
pub struct SequentialViewIds {
    next: AtomicU64,
}

impl SequentialViewIds {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialViewIds {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewIdGenerator for SequentialViewIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("view-{n}")
    }
}

/// Random ids; safe across restarts and concurrent instances.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidViewIds;

impl ViewIdGenerator for UuidViewIds {
    fn next_id(&self) -> String {
        format!("view-{}", Uuid::new_v4())
    }
}

#[must_use]
pub fn generator_for(strategy: ViewIdStrategy) -> Box<dyn ViewIdGenerator> {
    match strategy {
        ViewIdStrategy::Sequential => Box::new(SequentialViewIds::new()),
        ViewIdStrategy::Uuid => Box::new(UuidViewIds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_increase() {
        let ids = SequentialViewIds::new();
        assert_eq!(ids.next_id(), "view-1");
        assert_eq!(ids.next_id(), "view-2");
        assert_eq!(ids.next_id(), "view-3");
    }

    #[test]
    fn test_uuid_ids_are_distinct() {
        let ids = UuidViewIds;
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(a.starts_with("view-"));
        assert_ne!(a, b);
    }
}
