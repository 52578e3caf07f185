//! Arena that owns every live item stack.
//!
//! Slots and the drag state refer to stacks through [`StackId`] handles. A
//! handle carries the generation of its entry, so a handle to a destroyed
//! stack never resolves to a stack created later in the same entry.

use super::{ItemStack, StackId};

#[derive(Clone, Debug, Default)]
struct Entry {
    generation: u32,
    stack: Option<ItemStack>,
}

/// Generational arena of [`ItemStack`]s.
#[derive(Clone, Debug, Default)]
pub struct StackPool {
    entries: Vec<Entry>,
    free: Vec<u32>,
    live: usize,
}

impl StackPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live stacks.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn insert(&mut self, stack: ItemStack) -> StackId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.stack = Some(stack);
            return StackId {
                index,
                generation: entry.generation,
            };
        }

        let index = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            stack: Some(stack),
        });
        StackId {
            index,
            generation: 0,
        }
    }

    pub fn contains(&self, id: StackId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: StackId) -> Option<&ItemStack> {
        self.entries
            .get(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.stack.as_ref())
    }

    pub fn get_mut(&mut self, id: StackId) -> Option<&mut ItemStack> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.stack.as_mut())
    }

    /// Mutable access to two distinct stacks at once.
    pub fn pair_mut(&mut self, a: StackId, b: StackId) -> Option<(&mut ItemStack, &mut ItemStack)> {
        if a.index == b.index {
            return None;
        }
        let (low, high, flipped) = if a.index < b.index {
            (a, b, false)
        } else {
            (b, a, true)
        };

        let (head, tail) = self.entries.split_at_mut(high.index as usize);
        let low_entry = head.get_mut(low.index as usize)?;
        let high_entry = tail.first_mut()?;
        if low_entry.generation != low.generation || high_entry.generation != high.generation {
            return None;
        }
        let low_stack = low_entry.stack.as_mut()?;
        let high_stack = high_entry.stack.as_mut()?;

        if flipped {
            Some((high_stack, low_stack))
        } else {
            Some((low_stack, high_stack))
        }
    }

    /// Destroys a stack and returns it. The handle is dead afterwards.
    pub fn remove(&mut self, id: StackId) -> Option<ItemStack> {
        let entry = self.entries.get_mut(id.index as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        let stack = entry.stack.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(stack)
    }

    /// Iterates over live stacks in entry order.
    pub fn iter(&self) -> impl Iterator<Item = (StackId, &ItemStack)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            entry.stack.as_ref().map(|stack| {
                (
                    StackId {
                        index: index as u32,
                        generation: entry.generation,
                    },
                    stack,
                )
            })
        })
    }
}
