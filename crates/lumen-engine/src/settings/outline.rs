use serde::{Deserialize, Serialize};

/// Upper bound on outline slot groups.
pub const MAX_OUTLINE_GROUPS: u32 = 8;

/// Upper bound for both the outline and the fade radius, in pixels.
pub const MAX_OUTLINE_PIXEL: f32 = 8.0;

/// Outline effect configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutlineSettings {
    /// Toggled by the post stack on attach/detach.
    pub enable: bool,
    /// Number of color slots. Read once when the effect is constructed.
    pub group_count: u32,
    /// Radius drawn at full slot color, `[0, 8]`.
    pub outline_pixel: f32,
    /// Extra radius over which the outline fades out, `[0, 8]`.
    pub fade_outline_pixel: f32,
    /// Blend strength, `[0, 1]`.
    pub strength: f32,
    /// Add the outline onto the scene instead of alpha blending it.
    pub use_add_mode: bool,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            enable: false,
            group_count: 4,
            outline_pixel: 2.0,
            fade_outline_pixel: 4.0,
            strength: 1.0,
            use_add_mode: false,
        }
    }
}

/// A single requested edit of [`OutlineSettings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineChange {
    Enable(bool),
    OutlinePixel(f32),
    FadeOutlinePixel(f32),
    Strength(f32),
    UseAddMode(bool),
}

impl OutlineSettings {
    /// Slot count derived from `group_count`, clamped to `[1, 8]`.
    pub fn slot_count(&self) -> usize {
        self.group_count.clamp(1, MAX_OUTLINE_GROUPS) as usize
    }

    /// Applies `change` after clamping it to its documented range.
    ///
    /// Returns `false` when the clamped value equals the current one (or is
    /// NaN); nothing is written in that case.
    pub fn apply(&mut self, change: OutlineChange) -> bool {
        match change {
            OutlineChange::Enable(v) => replace(&mut self.enable, v),
            OutlineChange::UseAddMode(v) => replace(&mut self.use_add_mode, v),
            OutlineChange::OutlinePixel(v) => {
                replace_clamped(&mut self.outline_pixel, v, 0.0, MAX_OUTLINE_PIXEL)
            }
            OutlineChange::FadeOutlinePixel(v) => {
                replace_clamped(&mut self.fade_outline_pixel, v, 0.0, MAX_OUTLINE_PIXEL)
            }
            OutlineChange::Strength(v) => replace_clamped(&mut self.strength, v, 0.0, 1.0),
        }
    }

    /// Copy with every ranged field clamped. Used on the snapshot an effect
    /// renders with, since hand-edited JSON may hold anything.
    pub fn sanitized(&self) -> Self {
        let clamp = |v: f32, hi: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, hi) };
        Self {
            outline_pixel: clamp(self.outline_pixel, MAX_OUTLINE_PIXEL),
            fade_outline_pixel: clamp(self.fade_outline_pixel, MAX_OUTLINE_PIXEL),
            strength: clamp(self.strength, 1.0),
            ..*self
        }
    }
}

fn replace<T: PartialEq>(field: &mut T, value: T) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}

fn replace_clamped(field: &mut f32, value: f32, lo: f32, hi: f32) -> bool {
    if value.is_nan() {
        log::warn!("ignoring NaN outline setting");
        return false;
    }
    replace(field, value.clamp(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_count_clamps_group_count() {
        let mut s = OutlineSettings::default();
        s.group_count = 20;
        assert_eq!(s.slot_count(), 8);
        s.group_count = 0;
        assert_eq!(s.slot_count(), 1);
        s.group_count = 5;
        assert_eq!(s.slot_count(), 5);
    }

    #[test]
    fn outline_pixel_clamps_to_eight() {
        let mut s = OutlineSettings::default();
        assert!(s.apply(OutlineChange::OutlinePixel(10.0)));
        assert_eq!(s.outline_pixel, 8.0);
    }

    #[test]
    fn negative_strength_clamps_to_zero() {
        let mut s = OutlineSettings::default();
        assert!(s.apply(OutlineChange::Strength(-1.0)));
        assert_eq!(s.strength, 0.0);
    }

    #[test]
    fn fade_pixel_clamps_below_zero() {
        let mut s = OutlineSettings::default();
        assert!(s.apply(OutlineChange::FadeOutlinePixel(-3.0)));
        assert_eq!(s.fade_outline_pixel, 0.0);
    }

    #[test]
    fn same_value_is_not_a_change() {
        let mut s = OutlineSettings::default();
        assert!(!s.apply(OutlineChange::UseAddMode(false)));
        assert!(!s.apply(OutlineChange::Strength(1.0)));
        // Clamps to the current value.
        assert!(!s.apply(OutlineChange::Strength(3.0)));
    }

    #[test]
    fn nan_is_ignored() {
        let mut s = OutlineSettings::default();
        assert!(!s.apply(OutlineChange::OutlinePixel(f32::NAN)));
        assert_eq!(s.outline_pixel, 2.0);
    }

    #[test]
    fn sanitized_clamps_out_of_range_fields() {
        let s = OutlineSettings {
            outline_pixel: 50.0,
            fade_outline_pixel: f32::NAN,
            strength: 2.0,
            ..OutlineSettings::default()
        }
        .sanitized();
        assert_eq!(s.outline_pixel, 8.0);
        assert_eq!(s.fade_outline_pixel, 0.0);
        assert_eq!(s.strength, 1.0);
    }
}
