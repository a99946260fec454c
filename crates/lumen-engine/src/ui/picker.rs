use glam::Vec2;

use super::{Interactive, InteractiveStyle, PickHit, Ray};

/// Finds the element under the cursor and maintains hover/press styles.
///
/// Indices refer to the element slice passed to the last [`pick`](Self::pick);
/// callers that reorder their elements should pick again before pressing.
#[derive(Debug, Default)]
pub struct Picker {
    hovered: Option<usize>,
    pressed: bool,
}

impl Picker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Tests every element and returns the topmost hit with its index.
    ///
    /// Topmost means smallest distance; on a tie the later element wins, as it
    /// is drawn on top. Styles are updated afterwards: the hit element shows
    /// `Over` (or `Down` while pressed), disabled elements show `Disable` and
    /// everything else returns to `Normal`.
    pub fn pick(
        &mut self,
        elements: &mut [Box<dyn Interactive>],
        ray: &Ray,
        screen_pos: Vec2,
        screen_size: Vec2,
    ) -> Option<(usize, PickHit)> {
        let mut best: Option<(usize, PickHit)> = None;
        for (i, element) in elements.iter().enumerate() {
            let Some(hit) = element.ray_pick(ray, screen_pos, screen_size) else {
                continue;
            };
            if best.as_ref().is_none_or(|(_, b)| hit.distance <= b.distance) {
                best = Some((i, hit));
            }
        }

        let hovered = best.as_ref().map(|(i, _)| *i);
        if hovered != self.hovered {
            log::trace!("hover {:?} -> {:?}", self.hovered, hovered);
            self.hovered = hovered;
        }
        self.apply_styles(elements);
        best
    }

    /// Records the primary button state and restyles the hovered element.
    pub fn set_pressed(&mut self, elements: &mut [Box<dyn Interactive>], pressed: bool) {
        self.pressed = pressed;
        self.apply_styles(elements);
    }

    /// Forgets the hovered element and resets every live element's style.
    pub fn reset(&mut self, elements: &mut [Box<dyn Interactive>]) {
        self.hovered = None;
        self.pressed = false;
        self.apply_styles(elements);
    }

    fn apply_styles(&self, elements: &mut [Box<dyn Interactive>]) {
        for (i, element) in elements.iter_mut().enumerate() {
            if element.is_destroyed() {
                continue;
            }
            let style = if !element.enabled() {
                InteractiveStyle::Disable
            } else if self.hovered == Some(i) {
                if self.pressed { InteractiveStyle::Down } else { InteractiveStyle::Over }
            } else {
                InteractiveStyle::Normal
            };
            if element.mouse_style() != style {
                element.set_mouse_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::ui::{InteractiveRect, NodeId, ScreenRect};

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn ray() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::Z)
    }

    fn rect(x: f32, y: f32, w: f32, h: f32, id: u64) -> Box<dyn Interactive> {
        Box::new(InteractiveRect::new(ScreenRect::new(x, y, w, h)).with_owner(NodeId(id)))
    }

    fn styles(elements: &[Box<dyn Interactive>]) -> Vec<InteractiveStyle> {
        elements.iter().map(|e| e.mouse_style()).collect()
    }

    #[test]
    fn picks_nothing_on_empty_space() {
        let mut elements = vec![rect(0.0, 0.0, 10.0, 10.0, 1)];
        let mut picker = Picker::new();
        assert!(picker.pick(&mut elements, &ray(), Vec2::new(50.0, 50.0), SCREEN).is_none());
        assert_eq!(picker.hovered(), None);
        assert_eq!(styles(&elements), [InteractiveStyle::Normal]);
    }

    #[test]
    fn later_element_wins_a_tie() {
        let mut elements = vec![rect(0.0, 0.0, 100.0, 100.0, 1), rect(10.0, 10.0, 20.0, 20.0, 2)];
        let mut picker = Picker::new();

        let (index, hit) = picker.pick(&mut elements, &ray(), Vec2::new(15.0, 15.0), SCREEN).unwrap();
        assert_eq!(index, 1);
        assert_eq!(hit.owner, Some(NodeId(2)));
        assert_eq!(styles(&elements), [InteractiveStyle::Normal, InteractiveStyle::Over]);
    }

    #[test]
    fn closer_element_wins() {
        let mut elements: Vec<Box<dyn Interactive>> = vec![
            Box::new(InteractiveRect::new(ScreenRect::new(0.0, 0.0, 100.0, 100.0)).with_depth(1.0)),
            Box::new(InteractiveRect::new(ScreenRect::new(0.0, 0.0, 100.0, 100.0)).with_depth(3.0)),
        ];
        let mut picker = Picker::new();
        let (index, _) = picker.pick(&mut elements, &ray(), Vec2::new(5.0, 5.0), SCREEN).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn hover_moves_between_elements() {
        let mut elements = vec![rect(0.0, 0.0, 10.0, 10.0, 1), rect(20.0, 0.0, 10.0, 10.0, 2)];
        let mut picker = Picker::new();

        picker.pick(&mut elements, &ray(), Vec2::new(5.0, 5.0), SCREEN);
        assert_eq!(styles(&elements), [InteractiveStyle::Over, InteractiveStyle::Normal]);

        picker.pick(&mut elements, &ray(), Vec2::new(25.0, 5.0), SCREEN);
        assert_eq!(picker.hovered(), Some(1));
        assert_eq!(styles(&elements), [InteractiveStyle::Normal, InteractiveStyle::Over]);

        picker.pick(&mut elements, &ray(), Vec2::new(100.0, 100.0), SCREEN);
        assert_eq!(styles(&elements), [InteractiveStyle::Normal, InteractiveStyle::Normal]);
    }

    #[test]
    fn skips_disabled_non_interactive_and_destroyed() {
        let mut elements = vec![
            rect(0.0, 0.0, 10.0, 10.0, 1),
            rect(0.0, 0.0, 10.0, 10.0, 2),
            rect(0.0, 0.0, 10.0, 10.0, 3),
            rect(0.0, 0.0, 10.0, 10.0, 4),
        ];
        elements[1].set_enabled(false);
        elements[2].set_interactive(false);
        elements[3].destroy();

        let mut picker = Picker::new();
        let (index, _) = picker.pick(&mut elements, &ray(), Vec2::new(5.0, 5.0), SCREEN).unwrap();
        assert_eq!(index, 0);
        assert_eq!(elements[0].mouse_style(), InteractiveStyle::Over);
        assert_eq!(elements[1].mouse_style(), InteractiveStyle::Disable);
        assert_eq!(elements[2].mouse_style(), InteractiveStyle::Normal);
    }

    #[test]
    fn press_shows_down_on_hovered() {
        let mut elements = vec![rect(0.0, 0.0, 10.0, 10.0, 1)];
        let mut picker = Picker::new();
        picker.pick(&mut elements, &ray(), Vec2::new(5.0, 5.0), SCREEN);

        picker.set_pressed(&mut elements, true);
        assert!(picker.is_pressed());
        assert_eq!(elements[0].mouse_style(), InteractiveStyle::Down);

        picker.set_pressed(&mut elements, false);
        assert_eq!(elements[0].mouse_style(), InteractiveStyle::Over);
    }

    #[test]
    fn reenabled_element_leaves_disable() {
        let mut elements = vec![rect(0.0, 0.0, 10.0, 10.0, 1)];
        elements[0].set_enabled(false);
        let mut picker = Picker::new();
        picker.pick(&mut elements, &ray(), Vec2::new(50.0, 50.0), SCREEN);
        assert_eq!(elements[0].mouse_style(), InteractiveStyle::Disable);

        elements[0].set_enabled(true);
        picker.reset(&mut elements);
        assert_eq!(picker.hovered(), None);
        assert_eq!(elements[0].mouse_style(), InteractiveStyle::Normal);
    }
}
