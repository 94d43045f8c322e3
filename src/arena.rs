use crate::node::TagData;

/// A handle to a tag stored in a [`crate::Document`].
///
/// Handles stay valid until the tag, or one of its ancestors, is deleted.
/// Slots are reused, but each reuse bumps the slot generation, so a stale handle never resolves to a different tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    tag: Option<TagData>,
}

/// A generational arena owning every tag of a document.
///
/// Deleting a tag frees its slot, and the slots of its whole subtree, for reuse.
/// Parent and child links between tags are stored as [`TagId`]s, so the arena is the only owner.
#[derive(Debug, Clone, Default)]
pub(crate) struct TagArena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}
impl TagArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves a tag into the arena and returns its handle.
    pub fn alloc(&mut self, tag: TagData) -> TagId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.tag = Some(tag);
            return TagId {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            tag: Some(tag),
        });
        TagId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    pub fn get(&self, id: TagId) -> Option<&TagData> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.tag.as_ref())
    }

    pub fn get_mut(&mut self, id: TagId) -> Option<&mut TagData> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.tag.as_mut())
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.get(id).is_some()
    }

    /// Frees a tag and everything below it. Does not touch the parent's child list.
    /// Returns the number of slots freed.
    pub fn free_subtree(&mut self, id: TagId) -> usize {
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(slot) = self.slots.get_mut(next.index) else {
                continue;
            };
            if slot.generation != next.generation {
                continue;
            }
            let Some(tag) = slot.tag.take() else {
                continue;
            };

            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(next.index);
            stack.extend(tag.children);
            freed += 1;
        }

        self.live -= freed;
        freed
    }

    /// Number of tags currently alive.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Number of slots allocated, live or free.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
impl std::ops::Index<TagId> for TagArena {
    type Output = TagData;

    /// # Panics
    /// Panics if the tag was deleted. Handles borrowing the document cannot outlive their tag.
    fn index(&self, id: TagId) -> &Self::Output {
        match self.get(id) {
            Some(tag) => tag,
            None => panic!("{id:?} refers to a deleted tag"),
        }
    }
}
impl std::ops::IndexMut<TagId> for TagArena {
    fn index_mut(&mut self, id: TagId) -> &mut Self::Output {
        match self.get_mut(id) {
            Some(tag) => tag,
            None => panic!("{id:?} refers to a deleted tag"),
        }
    }
}
