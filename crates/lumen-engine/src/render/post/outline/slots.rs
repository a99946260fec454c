use crate::settings::{OutlineSettings, MAX_OUTLINE_GROUPS};

use super::OutlineError;

/// Entities one slot can hold.
pub const MAX_ENTITIES: usize = 16;

/// Numeric id of an outlinable scene entity.
pub type EntityIndex = i32;

/// Marks an unused entry in a slot's entity list.
pub const EMPTY_ENTITY: EntityIndex = -1;

/// Linear RGB outline color. Channels are nominally `[0, 1]` but not clamped.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct OutlineColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl OutlineColor {
    /// Cyan-ish color slots start with and return to on clear.
    pub const DEFAULT: Self = Self::new(0.2, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// One outline color group.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineSlot {
    color: OutlineColor,
    entities: [EntityIndex; MAX_ENTITIES],
    count: usize,
}

impl OutlineSlot {
    fn empty(color: OutlineColor) -> Self {
        Self { color, entities: [EMPTY_ENTITY; MAX_ENTITIES], count: 0 }
    }

    #[inline]
    pub fn color(&self) -> OutlineColor {
        self.color
    }

    /// Full fixed-capacity list, unused entries included.
    #[inline]
    pub fn entities(&self) -> &[EntityIndex; MAX_ENTITIES] {
        &self.entities
    }

    /// The `count` meaningful entries.
    #[inline]
    pub fn active_entities(&self) -> &[EntityIndex] {
        &self.entities[..self.count]
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, entity: EntityIndex) -> bool {
        self.active_entities().contains(&entity)
    }

    fn reset(&mut self, color: OutlineColor) {
        self.color = color;
        self.entities.fill(EMPTY_ENTITY);
        self.count = 0;
    }
}

/// Result of [`SlotStore::fetch_and_clear_dirty`].
#[derive(Debug)]
pub struct SlotFetch<'a> {
    /// Whether anything changed since the previous fetch.
    pub dirty: bool,
    pub slots: &'a [OutlineSlot],
}

/// CPU-side authority for outline slots.
///
/// The slot count is fixed at construction. Edits only set a dirty flag; the
/// single consumer picks them up through [`fetch_and_clear_dirty`], so any
/// number of edits between two frames costs at most one upload.
///
/// [`fetch_and_clear_dirty`]: SlotStore::fetch_and_clear_dirty
#[derive(Debug, Clone)]
pub struct SlotStore {
    slots: Vec<OutlineSlot>,
    default_color: OutlineColor,
    dirty: bool,
}

impl SlotStore {
    /// Creates `group_count` slots, clamped to `[1, 8]`.
    pub fn new(group_count: u32) -> Self {
        let slot_count = group_count.clamp(1, MAX_OUTLINE_GROUPS) as usize;
        let default_color = OutlineColor::DEFAULT;
        Self {
            slots: vec![OutlineSlot::empty(default_color); slot_count],
            default_color,
            dirty: false,
        }
    }

    pub fn from_settings(settings: &OutlineSettings) -> Self {
        Self::new(settings.group_count)
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub const fn max_entities(&self) -> usize {
        MAX_ENTITIES
    }

    #[inline]
    pub fn default_color(&self) -> OutlineColor {
        self.default_color
    }

    #[inline]
    pub fn slot(&self, slot: usize) -> Option<&OutlineSlot> {
        self.slots.get(slot)
    }

    #[inline]
    pub fn slots(&self) -> &[OutlineSlot] {
        &self.slots
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Resets every slot to the default color and no entities.
    pub fn clear(&mut self) {
        let color = self.default_color;
        self.slots.iter_mut().for_each(|s| s.reset(color));
        self.dirty = true;
    }

    /// Resets one slot.
    pub fn clear_at(&mut self, slot: usize) -> Result<(), OutlineError> {
        let slot_count = self.slots.len();
        let color = self.default_color;
        let target = self
            .slots
            .get_mut(slot)
            .ok_or(OutlineError::SlotOutOfRange { slot, slot_count })?;
        target.reset(color);
        self.dirty = true;
        Ok(())
    }

    /// Replaces the entities and color of `slot`.
    ///
    /// An unknown `slot` is ignored so callers may pass selection state that
    /// was configured for more groups than this store has. A list longer than
    /// [`MAX_ENTITIES`] is rejected without touching the slot.
    pub fn fill_slot(
        &mut self,
        slot: usize,
        entities: &[EntityIndex],
        color: OutlineColor,
    ) -> Result<(), OutlineError> {
        let Some(target) = self.slots.get_mut(slot) else {
            log::trace!("fill_slot: slot {slot} does not exist; ignored");
            return Ok(());
        };
        if entities.len() > MAX_ENTITIES {
            return Err(OutlineError::CapacityExceeded {
                slot,
                len: entities.len(),
                max: MAX_ENTITIES,
            });
        }

        target.entities.fill(EMPTY_ENTITY);
        target.entities[..entities.len()].copy_from_slice(entities);
        target.count = entities.len();
        target.color = color;
        self.dirty = true;
        Ok(())
    }

    /// Returns the dirty flag and the slots, clearing the flag.
    ///
    /// This is the only place the flag is cleared. Exactly one consumer per
    /// frame may call it.
    pub fn fetch_and_clear_dirty(&mut self) -> SlotFetch<'_> {
        let dirty = std::mem::replace(&mut self.dirty, false);
        SlotFetch { dirty, slots: &self.slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: OutlineColor = OutlineColor::new(1.0, 0.0, 0.0);
    const BLUE: OutlineColor = OutlineColor::new(0.0, 0.0, 1.0);

    fn assert_cleared(slot: &OutlineSlot) {
        assert_eq!(slot.count(), 0);
        assert!(slot.entities().iter().all(|&e| e == EMPTY_ENTITY));
        assert_eq!(slot.color(), OutlineColor::DEFAULT);
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_store_is_clean() {
        let store = SlotStore::new(8);
        assert!(!store.is_dirty());
        assert_eq!(store.slot_count(), 8);
        store.slots().iter().for_each(assert_cleared);
    }

    #[test]
    fn group_count_is_clamped() {
        assert_eq!(SlotStore::new(20).slot_count(), 8);
        assert_eq!(SlotStore::new(0).slot_count(), 1);
        assert_eq!(SlotStore::from_settings(&OutlineSettings::default()).slot_count(), 4);
    }

    // ── fill ──────────────────────────────────────────────────────────────

    #[test]
    fn fill_then_fetch_reports_dirty_once() {
        let mut store = SlotStore::new(8);
        store.fill_slot(0, &[3, 7, 12], RED).unwrap();

        let fetch = store.fetch_and_clear_dirty();
        assert!(fetch.dirty);
        let slot = &fetch.slots[0];
        assert_eq!(slot.count(), 3);
        assert_eq!(slot.color(), RED);
        let mut expected = [EMPTY_ENTITY; MAX_ENTITIES];
        expected[..3].copy_from_slice(&[3, 7, 12]);
        assert_eq!(slot.entities(), &expected);

        assert!(!store.fetch_and_clear_dirty().dirty);
        assert!(!store.fetch_and_clear_dirty().dirty);
    }

    #[test]
    fn refill_with_shorter_list_pads_with_sentinel() {
        let mut store = SlotStore::new(2);
        store.fill_slot(1, &[1, 2, 3, 4], RED).unwrap();
        store.fill_slot(1, &[9], BLUE).unwrap();
        let slot = store.slot(1).unwrap();
        assert_eq!(slot.active_entities(), &[9]);
        assert_eq!(slot.entities()[1..], [EMPTY_ENTITY; MAX_ENTITIES - 1]);
        assert!(slot.contains(9));
        assert!(!slot.contains(2));
    }

    #[test]
    fn fill_full_capacity_is_accepted() {
        let mut store = SlotStore::new(1);
        let all: Vec<EntityIndex> = (0..MAX_ENTITIES as i32).collect();
        store.fill_slot(0, &all, RED).unwrap();
        assert_eq!(store.slot(0).unwrap().count(), MAX_ENTITIES);
    }

    #[test]
    fn fill_unknown_slot_is_a_no_op() {
        let mut store = SlotStore::new(8);
        let before = store.clone();
        store.fill_slot(99, &[1], BLUE).unwrap();
        assert!(!store.is_dirty());
        assert_eq!(store.slots(), before.slots());

        // Dirty flag is left as it was, not cleared.
        store.fill_slot(2, &[5], RED).unwrap();
        store.fill_slot(99, &[1], BLUE).unwrap();
        assert!(store.is_dirty());
    }

    #[test]
    fn fill_over_capacity_fails_without_change() {
        let mut store = SlotStore::new(4);
        store.fill_slot(0, &[1, 2], RED).unwrap();
        store.fetch_and_clear_dirty();

        let too_many = vec![0; MAX_ENTITIES + 1];
        let err = store.fill_slot(0, &too_many, BLUE).unwrap_err();
        assert_eq!(err, OutlineError::CapacityExceeded { slot: 0, len: 17, max: 16 });
        assert_eq!(store.slot(0).unwrap().active_entities(), &[1, 2]);
        assert_eq!(store.slot(0).unwrap().color(), RED);
        assert!(!store.is_dirty());
    }

    #[test]
    fn fill_empty_list_clears_entities_keeps_color() {
        let mut store = SlotStore::new(1);
        store.fill_slot(0, &[4], RED).unwrap();
        store.fill_slot(0, &[], BLUE).unwrap();
        let slot = store.slot(0).unwrap();
        assert!(slot.is_empty());
        assert_eq!(slot.color(), BLUE);
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_resets_every_slot() {
        let mut store = SlotStore::new(3);
        for i in 0..3 {
            store.fill_slot(i, &[i as i32, 10], RED).unwrap();
        }
        store.fetch_and_clear_dirty();

        store.clear();
        assert!(store.is_dirty());
        store.slots().iter().for_each(assert_cleared);
    }

    #[test]
    fn clear_at_resets_only_that_slot() {
        let mut store = SlotStore::new(3);
        store.fill_slot(0, &[1], RED).unwrap();
        store.fill_slot(1, &[2], BLUE).unwrap();
        store.fetch_and_clear_dirty();

        store.clear_at(1).unwrap();
        assert!(store.is_dirty());
        assert_cleared(store.slot(1).unwrap());
        assert_eq!(store.slot(0).unwrap().active_entities(), &[1]);
    }

    #[test]
    fn clear_at_out_of_range_fails() {
        let mut store = SlotStore::new(8);
        assert_eq!(
            store.clear_at(8),
            Err(OutlineError::SlotOutOfRange { slot: 8, slot_count: 8 })
        );
        assert!(!store.is_dirty());
    }

    #[test]
    fn clear_on_clean_store_still_marks_dirty() {
        let mut store = SlotStore::new(2);
        store.clear_at(0).unwrap();
        assert!(store.fetch_and_clear_dirty().dirty);
        store.clear();
        assert!(store.fetch_and_clear_dirty().dirty);
    }
}
