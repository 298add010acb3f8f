use std::collections::VecDeque;

use image::RgbaImage;

use crate::surface::Surface;

/// Maximum number of durable snapshots kept for undo.
pub const HISTORY_CAPACITY: usize = 30;

/// Bitmap undo/redo history for the drawing surface.
///
/// Durable snapshots live in a bounded deque with a cursor pointing at the snapshot
/// that matches the surface. A single temporary slot sits "just after" the cursor and
/// holds the baseline used by live previews; it is never an undo or redo target.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    snapshots: VecDeque<RgbaImage>,
    /// Index of the snapshot matching the surface. `None` only when empty.
    step: Option<usize>,
    temporary: Option<RgbaImage>,
    capacity: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl SnapshotHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            step: None,
            temporary: None,
            capacity: capacity.max(1),
        }
    }

    /// Records the surface as a new undo step.
    ///
    /// Anything after the cursor (the redo branch) is dropped first, and the oldest
    /// snapshot is evicted once the stack is over capacity.
    pub fn commit(&mut self, surface: &Surface) {
        let keep = self.step.map_or(0, |step| step + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push_back(surface.snapshot());
        self.temporary = None;

        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
        self.step = Some(self.snapshots.len() - 1);
        log::debug!("history commit, step {} of {}", self.snapshots.len() - 1, self.snapshots.len());
    }

    /// Stores the surface in the temporary slot, replacing any earlier temporary write.
    pub fn commit_temporary(&mut self, surface: &Surface) {
        match &mut self.temporary {
            Some(slot) if slot.dimensions() == surface.image().dimensions() => {
                slot.copy_from_slice(surface.image().as_raw());
            }
            slot => *slot = Some(surface.snapshot()),
        }
    }

    /// Copies the temporary snapshot back onto the surface. Returns false if none is held.
    pub fn restore_temporary(&self, surface: &mut Surface) -> bool {
        match &self.temporary {
            Some(snapshot) => {
                surface.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn discard_temporary(&mut self) {
        self.temporary = None;
    }

    pub fn has_temporary(&self) -> bool {
        self.temporary.is_some()
    }

    /// Copies snapshot `step` onto the surface without moving the cursor.
    pub fn restore(&self, step: usize, surface: &mut Surface) -> bool {
        match self.snapshots.get(step) {
            Some(snapshot) => {
                surface.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Restores the snapshot at the cursor.
    pub fn restore_current(&self, surface: &mut Surface) -> bool {
        self.step.is_some_and(|step| self.restore(step, surface))
    }

    pub fn undo(&mut self, surface: &mut Surface) -> bool {
        match self.step {
            Some(step) if step > 0 => {
                self.step = Some(step - 1);
                self.restore(step - 1, surface)
            }
            _ => false,
        }
    }

    pub fn redo(&mut self, surface: &mut Surface) -> bool {
        match self.step {
            Some(step) if step + 1 < self.snapshots.len() => {
                self.step = Some(step + 1);
                self.restore(step + 1, surface)
            }
            _ => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.step.is_some_and(|step| step > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.step.is_some_and(|step| step + 1 < self.snapshots.len())
    }

    /// Number of undo steps available from the cursor.
    pub fn undo_count(&self) -> usize {
        self.step.unwrap_or(0)
    }

    pub fn redo_count(&self) -> usize {
        self.step.map_or(0, |step| self.snapshots.len() - step - 1)
    }

    /// Number of durable snapshots. The temporary slot is not counted.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn step(&self) -> Option<usize> {
        self.step
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> Option<&RgbaImage> {
        self.step.and_then(|step| self.snapshots.get(step))
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.step = None;
        self.temporary = None;
    }
}
