use alloc::vec::Vec;

use crate::handle::Handle;

/// One side of a registered pair together with the number of occurrences it
/// replaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Operand {
    pub(crate) handle: Handle,
    pub(crate) count: usize,
}

/// Ordered operands in registration order.
///
/// The logical length is tracked separately from the backing `Vec` so that a
/// reset keeps every slot around for the next build cycle: pushes overwrite
/// old slots up to the high-water mark before the `Vec` grows again.
#[derive(Debug, Default)]
pub(crate) struct OperandQueue {
    slots: Vec<Operand>,
    len: usize,
    accumulated: usize,
}

impl OperandQueue {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            len: 0,
            accumulated: 0,
        }
    }

    pub(crate) fn push(&mut self, handle: Handle, count: usize) {
        let count = count.max(1);
        self.accumulated += handle.len() * count;

        let operand = Operand { handle, count };
        if self.len < self.slots.len() {
            self.slots[self.len] = operand;
        } else {
            self.slots.push(operand);
        }
        self.len += 1;
    }

    pub(crate) fn get(&self, index: usize) -> Operand {
        self.as_slice()[index]
    }

    pub(crate) fn as_slice(&self) -> &[Operand] {
        &self.slots[..self.len]
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sum of `len × count` over every live operand.
    pub(crate) fn accumulated(&self) -> usize {
        self.accumulated
    }

    pub(crate) fn reset(&mut self) {
        for slot in &mut self.slots[..self.len] {
            slot.handle.reset();
            slot.count = 0;
        }
        self.len = 0;
        self.accumulated = 0;
    }

    #[cfg(test)]
    pub(crate) fn slot_capacity(&self) -> usize {
        self.slots.len()
    }
}
