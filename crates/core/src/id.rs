//! Identifier allocation.
//!
//! Record identifiers are handed out by an explicit allocator owned by the
//! session that loads the records, so two sessions never share a counter.

/// Allocates unique numeric identifiers for one session.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator starting at 0.
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Creates an allocator whose first identifier is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }

    /// Returns the next unique identifier.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Reserves `count` consecutive identifiers and returns the first one.
    pub fn reserve(&mut self, count: u64) -> u64 {
        let start = self.next;
        self.next += count;
        start
    }

    /// Moves the counter past `id` if it is not already beyond it.
    pub fn set_if_greater(&mut self, id: u64) {
        if id >= self.next {
            self.next = id + 1;
        }
    }

    /// Returns the identifier the next call to `next_id` will hand out.
    #[inline]
    pub fn peek(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_is_sequential() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.peek(), 2);
    }

    #[test]
    fn test_reserve() {
        let mut ids = IdAllocator::starting_at(10);
        assert_eq!(ids.reserve(5), 10);
        assert_eq!(ids.next_id(), 15);
    }

    #[test]
    fn test_set_if_greater() {
        let mut ids = IdAllocator::new();
        ids.set_if_greater(41);
        assert_eq!(ids.next_id(), 42);

        ids.set_if_greater(3);
        assert_eq!(ids.next_id(), 43);
    }

    #[test]
    fn test_allocators_are_independent() {
        let mut a = IdAllocator::new();
        let mut b = IdAllocator::new();
        a.next_id();
        a.next_id();
        assert_eq!(b.next_id(), 0);
    }
}
