//! Merging a sequence of inner diff streams into one diff stream.
//!
//! Every inner stream reports full snapshots alongside its own diffs. The
//! merged output is always computed as `differ(baseline, snapshot)`, where
//! `baseline` is whatever the merged output last described. When a new inner
//! stream takes over, its first snapshot diffed against the old baseline
//! retracts what the previous inner stream contributed and inserts what the
//! new one contributes. Ids present in both come out as updates.

/// Identifies which inner stream is active.
pub type Generation = u64;

/// State of a switch-with-cleanup merge.
pub struct DiffSwitch<S, F> {
    baseline: S,
    differ: F,
    generation: Generation,
}

impl<S, D, F> DiffSwitch<S, F>
where
    S: Clone,
    F: Fn(&S, &S) -> D,
{
    /// Creates a merge whose downstream starts out believing `initial`.
    pub fn new(initial: S, differ: F) -> Self {
        Self {
            baseline: initial,
            differ,
            generation: 0,
        }
    }

    /// Retires the active inner stream and returns the generation of the
    /// one replacing it.
    pub fn switch(&mut self) -> Generation {
        self.generation += 1;
        log::debug!("switching to inner stream generation {}", self.generation);
        self.generation
    }

    /// Returns the generation of the active inner stream.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns what downstream currently believes the merged dataset is.
    #[inline]
    pub fn baseline(&self) -> &S {
        &self.baseline
    }

    /// Handles a snapshot from the inner stream of `generation`.
    ///
    /// Returns `None` for snapshots from a retired inner stream.
    pub fn on_inner(&mut self, generation: Generation, snapshot: &S) -> Option<D> {
        if generation != self.generation {
            log::trace!(
                "dropping snapshot of retired generation {} (active {})",
                generation,
                self.generation
            );
            return None;
        }
        let diff = (self.differ)(&self.baseline, snapshot);
        self.baseline = snapshot.clone();
        Some(diff)
    }
}
