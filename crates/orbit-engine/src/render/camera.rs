use glam::{Mat4, Vec4};

/// Orthographic 2D camera.
///
/// Bounds are in world units; anything inside `[left, right] x [bottom, top]`
/// is visible. The view matrix is kept separate so it can be uploaded
/// alongside the projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2d {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
    pub view: Mat4,
}

impl Camera2d {
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            near,
            far,
            view: Mat4::IDENTITY,
        }
    }

    /// Projection matrix mapping the bounds to wgpu clip space (z in `[0, 1]`).
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }

    /// Maps a world-space point to normalized device coordinates.
    pub fn world_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let clip = self.projection() * self.view * Vec4::new(x, y, 0.0, 1.0);
        (clip.x / clip.w, clip.y / clip.w)
    }
}

impl Default for Camera2d {
    /// A 4:3 view ten units wide, centered on the origin.
    fn default() -> Self {
        Self::orthographic(-5.0, 5.0, -3.75, 3.75, -1.0, 1.0)
    }
}
