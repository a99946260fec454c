use glam::{Mat4, Vec2, Vec3};

/// A half-line in world space. `direction` is unit length or zero.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Normalizes `direction`; a zero direction stays zero.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Unprojects a cursor position into a world-space ray.
    ///
    /// `screen_pos` is in pixels with a top-left origin. Clip-space depth is
    /// `[0, 1]` as in wgpu; the ray starts on the near plane. Returns `None`
    /// for an empty screen or a degenerate matrix.
    pub fn from_screen(screen_pos: Vec2, screen_size: Vec2, inv_view_proj: Mat4) -> Option<Self> {
        if screen_size.x <= 0.0 || screen_size.y <= 0.0 {
            return None;
        }

        let ndc = Vec2::new(
            screen_pos.x / screen_size.x * 2.0 - 1.0,
            1.0 - screen_pos.y / screen_size.y * 2.0,
        );
        let near = inv_view_proj.project_point3(ndc.extend(0.0));
        let far = inv_view_proj.project_point3(ndc.extend(1.0));

        let direction = (far - near).normalize_or_zero();
        if !near.is_finite() || direction == Vec3::ZERO {
            return None;
        }
        Some(Self { origin: near, direction })
    }
}
