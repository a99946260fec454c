use crate::render::mirror::{DirtyArray, StorageMirror};

use super::{OutlineSlot, SlotStore, EMPTY_ENTITY, MAX_ENTITIES};

/// Floats per slot in the slot buffer: `[r, g, b, count]`.
pub const SLOT_STRIDE: usize = 4;

/// Writes the flat GPU layout of `slots`.
///
/// `slots_out` receives `[r, g, b, count]` per slot and `entities_out` every
/// slot's full entity list back to back, sentinels included.
pub fn project_slots(slots: &[OutlineSlot], slots_out: &mut [f32], entities_out: &mut [i32]) {
    debug_assert_eq!(slots_out.len(), slots.len() * SLOT_STRIDE);
    debug_assert_eq!(entities_out.len(), slots.len() * MAX_ENTITIES);

    let packed = slots_out.chunks_exact_mut(SLOT_STRIDE);
    let lists = entities_out.chunks_exact_mut(MAX_ENTITIES);
    for ((slot, packed), list) in slots.iter().zip(packed).zip(lists) {
        let [r, g, b] = slot.color().to_array();
        packed.copy_from_slice(&[r, g, b, slot.count() as f32]);
        list.copy_from_slice(slot.entities());
    }
}

/// GPU copies of a [`SlotStore`]: the slot buffer and the entity buffer.
///
/// Both buffers are sized once from the store's slot count and rewritten in
/// full whenever the store reports a change.
pub struct SlotBuffers {
    slots: StorageMirror<f32>,
    entities: StorageMirror<i32>,
    uploads: u64,
}

impl SlotBuffers {
    /// Creates both buffers holding the store's current contents.
    ///
    /// Does not consume the store's dirty flag; a pending change is uploaded
    /// again by the next [`flush_if_dirty`](Self::flush_if_dirty).
    pub fn new(device: &wgpu::Device, store: &SlotStore) -> Self {
        let slot_count = store.slot_count();
        let mut slots = DirtyArray::new(slot_count * SLOT_STRIDE, 0.0f32);
        let mut entities = DirtyArray::new(slot_count * MAX_ENTITIES, EMPTY_ENTITY);
        project_slots(store.slots(), slots.as_mut_slice(), entities.as_mut_slice());

        log::debug!("outline slot buffers created for {slot_count} slots");

        Self {
            slots: StorageMirror::new(device, "lumen outline slots", slots),
            entities: StorageMirror::new(device, "lumen outline entities", entities),
            uploads: 0,
        }
    }

    /// Uploads the store if it changed since the last fetch.
    pub fn flush_if_dirty(&mut self, queue: &wgpu::Queue, store: &mut SlotStore) -> bool {
        let fetch = store.fetch_and_clear_dirty();
        if !fetch.dirty {
            return false;
        }

        project_slots(fetch.slots, self.slots.as_mut_slice(), self.entities.as_mut_slice());
        self.slots.flush(queue);
        self.entities.flush(queue);
        self.uploads += 1;

        log::trace!("outline slots uploaded ({} total)", self.uploads);
        true
    }

    #[inline]
    pub fn slots_buffer(&self) -> &wgpu::Buffer {
        self.slots.buffer()
    }

    #[inline]
    pub fn entities_buffer(&self) -> &wgpu::Buffer {
        self.entities.buffer()
    }

    /// CPU mirror of the slot buffer.
    #[inline]
    pub fn slots_array(&self) -> &[f32] {
        self.slots.array().as_slice()
    }

    /// CPU mirror of the entity buffer.
    #[inline]
    pub fn entities_array(&self) -> &[i32] {
        self.entities.array().as_slice()
    }

    /// Number of uploads performed by [`flush_if_dirty`](Self::flush_if_dirty).
    #[inline]
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}
