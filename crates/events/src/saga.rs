//! Saga mechanics: an explicit, ordered undo stack (framework only, no business rules).
//!
//! A saga here is a sequence of local atomic operations, each paired with a
//! compensating action recorded *after* the operation succeeded. On the first
//! failure the stack is unwound last-in-first-out so that every successful step
//! is undone exactly once.
//!
//! - The stack only ever holds compensations for steps that actually committed
//! - `unwind` yields compensations in reverse order of registration
//! - `commit` discards the compensations once the whole saga succeeded
//!
//! Executing the compensations (IO, retries, logging) is the runner's job; this
//! type only guarantees ordering and completeness.

/// Ordered undo stack of compensating actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompensationStack<C> {
    entries: Vec<C>,
}

impl<C> CompensationStack<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record the compensation for a step that just succeeded.
    pub fn push(&mut self, compensation: C) {
        self.entries.push(compensation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending compensations, oldest first.
    pub fn pending(&self) -> &[C] {
        &self.entries
    }

    /// Take every pending compensation in LIFO order, leaving the stack empty.
    pub fn unwind(&mut self) -> Vec<C> {
        let mut out = Vec::with_capacity(self.entries.len());
        while let Some(c) = self.entries.pop() {
            out.push(c);
        }
        out
    }

    /// The saga completed; nothing will ever be compensated.
    pub fn commit(mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }
}

impl<C> Default for CompensationStack<C> {
    fn default() -> Self {
        Self::new()
    }
}
