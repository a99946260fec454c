use glam::{Vec2, Vec3};

use super::Ray;

/// Identifies the scene node an element belongs to. Not an owning handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Cursor feedback shown by an element.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum InteractiveStyle {
    #[default]
    Normal,
    Down,
    Over,
    Disable,
}

/// Result of a successful [`Interactive::ray_pick`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    /// Distance along the ray; smaller is closer to the viewer.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    pub screen_pos: Vec2,
    pub owner: Option<NodeId>,
}

/// Something the pointer can hit.
///
/// Picking must be deterministic: the same ray and cursor against the same
/// element state yield the same result. Elements that are not interactive,
/// disabled or destroyed never hit.
pub trait Interactive {
    fn interactive(&self) -> bool;
    fn set_interactive(&mut self, value: bool);

    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, value: bool);

    fn owner(&self) -> Option<NodeId>;

    fn is_destroyed(&self) -> bool;

    /// Whether [`ray_pick`](Self::ray_pick) may report a hit at all.
    #[inline]
    fn is_pickable(&self) -> bool {
        self.interactive() && self.enabled() && !self.is_destroyed()
    }

    /// Tests the element against `ray`. `screen_pos` and `screen_size` are in
    /// pixels, for elements that live in screen space.
    fn ray_pick(&self, ray: &Ray, screen_pos: Vec2, screen_size: Vec2) -> Option<PickHit>;

    /// Releases the element's registrations. Calling it again does nothing.
    fn destroy(&mut self);

    fn mouse_style(&self) -> InteractiveStyle;
    fn set_mouse_style(&mut self, style: InteractiveStyle);
}
