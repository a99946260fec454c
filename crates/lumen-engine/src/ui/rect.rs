use glam::{Vec2, Vec3};

use super::{Interactive, InteractiveStyle, NodeId, PickHit, Ray};

/// Axis-aligned rectangle in pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScreenRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl ScreenRect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }
}

/// A screen-space rectangle that reacts to the pointer.
///
/// Hit when the cursor lies inside [`bounds`](Self::bounds); the reported
/// distance is [`depth`](Self::depth), so among overlapping rects the one with
/// the smallest depth wins.
#[derive(Debug, Clone)]
pub struct InteractiveRect {
    pub bounds: ScreenRect,
    pub depth: f32,
    owner: Option<NodeId>,
    interactive: bool,
    enabled: bool,
    destroyed: bool,
    style: InteractiveStyle,
}

impl InteractiveRect {
    pub fn new(bounds: ScreenRect) -> Self {
        Self {
            bounds,
            depth: 0.0,
            owner: None,
            interactive: true,
            enabled: true,
            destroyed: false,
            style: InteractiveStyle::Normal,
        }
    }

    pub fn with_owner(mut self, owner: NodeId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }
}

impl Interactive for InteractiveRect {
    fn interactive(&self) -> bool {
        self.interactive
    }

    fn set_interactive(&mut self, value: bool) {
        self.interactive = value;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, value: bool) {
        self.enabled = value;
    }

    fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ray_pick(&self, ray: &Ray, screen_pos: Vec2, _screen_size: Vec2) -> Option<PickHit> {
        if !self.is_pickable() || self.bounds.is_empty() || !self.bounds.contains(screen_pos) {
            return None;
        }
        let point = if ray.direction == Vec3::ZERO { ray.origin } else { ray.at(self.depth) };
        Some(PickHit { distance: self.depth, point, screen_pos, owner: self.owner })
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        log::trace!("interactive rect {:?} destroyed", self.owner);
        self.destroyed = true;
        self.owner = None;
    }

    fn mouse_style(&self) -> InteractiveStyle {
        self.style
    }

    fn set_mouse_style(&mut self, style: InteractiveStyle) {
        self.style = style;
    }
}
