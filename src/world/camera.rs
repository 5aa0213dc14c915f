use glam::{Vec2, Vec3, vec2};

use crate::world::geometry::SectorId;

/// Player view-point in world space.
///
/// * Yaw turns the view, `yaw_shear` slides the horizon up/down to fake
///   looking up/down without tilting walls.
/// * `pos.z` is the absolute eye height.
/// * `sector` must be kept current by whoever moves the camera.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec3,
    yaw: f32, // radians (0 = east, counter-clockwise)
    sin: f32,
    cos: f32,
    yaw_shear: f32,
    fov: f32, // horizontal FoV (radians, typical 90–110°)
    light_distance: f32,
    sector: SectorId,
}

impl Camera {
    /// Create a new camera at `pos` inside `sector`, facing `yaw`, with
    /// horizontal FoV `fov`.
    pub fn new(pos: Vec3, yaw: f32, fov: f32, sector: SectorId) -> Self {
        let (sin, cos) = yaw.sin_cos();
        Self {
            pos,
            yaw,
            sin,
            cos,
            yaw_shear: 0.0,
            fov,
            light_distance: 0.0,
            sector,
        }
    }

    /// Light falls off as `1 - depth * light_distance`; zero keeps everything lit.
    pub fn with_light_distance(mut self, light_distance: f32) -> Self {
        self.light_distance = light_distance.max(0.0);
        self
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn sin_cos(&self) -> (f32, f32) {
        (self.sin, self.cos)
    }

    #[inline]
    pub fn yaw_shear(&self) -> f32 {
        self.yaw_shear
    }

    #[inline]
    pub fn light_distance(&self) -> f32 {
        self.light_distance
    }

    #[inline]
    pub fn sector(&self) -> SectorId {
        self.sector
    }

    pub fn set_sector(&mut self, sector: SectorId) {
        self.sector = sector;
    }

    pub fn set_pos(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    /// Transform an X–Y point `p` into camera‐local coords:
    ///  .x = lateral offset (+ right)
    ///  .y = depth along forward axis
    #[inline]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let dx = p.x - self.pos.x;
        let dy = p.y - self.pos.y;
        // Rotate by -yaw: align world so camera forward is +depth
        let depth = dx * self.cos + dy * self.sin;
        let lateral = dx * self.sin - dy * self.cos;
        vec2(lateral, depth)
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks on the X-Y plane.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.cos, self.sin) // 0 rad = +X (east), CCW positive
    }

    /// Unit vector pointing to the camera's right on the X-Y plane.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        Vec2::new(self.sin, -self.cos)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe), preserving eye-height.
    pub fn step(&mut self, forward: f32, side: f32) {
        let f = self.forward();
        let r = self.right();
        self.pos.x += f.x * forward + r.x * side;
        self.pos.y += f.y * forward + r.y * side;
    }

    /// Rotate around Z-axis (positive = turn left).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        (self.sin, self.cos) = self.yaw.sin_cos();
    }

    /// Shift the horizon (positive = look up), clamped to a sane range.
    pub fn look(&mut self, delta_shear: f32) {
        self.yaw_shear = (self.yaw_shear - delta_shear).clamp(-1.5, 1.5);
    }

    /*───────────────── projection / frustum helpers ─────────────────*/

    /// Pixel-per-map-unit scale for viewport width `w`.
    ///
    /// ```text
    /// focal = w / (2 * tan(fov/2))
    /// ```
    #[inline]
    pub fn screen_scale(&self, w: usize) -> f32 {
        (w as f32) * 0.5 / (self.fov * 0.5).tan()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn forward_and_right_are_orthonormal() {
        let cam = Camera::new(Vec3::ZERO, 0.3, 1.57, 0);
        let f = cam.forward();
        let r = cam.right();
        assert_relative_eq!(f.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(r.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(f.dot(r), 0.0, epsilon = 1e-5);
        // right is clockwise from forward
        assert!(f.perp_dot(r) < 0.0);
    }

    #[test]
    fn screen_scale_at_90_deg() {
        let cam = Camera::new(Vec3::ZERO, 0.0, FRAC_PI_2, 0);
        assert_relative_eq!(cam.screen_scale(640), 320.0, epsilon = 1e-3);
    }

    #[test]
    fn to_cam_axes_align() {
        let cam = Camera::new(Vec3::ZERO, 0.0, FRAC_PI_2, 0);
        // Point straight ahead at (10, 0) → (lateral=0, forward=10)
        assert!((cam.to_cam(vec2(10.0, 0.0)) - vec2(0.0, 10.0)).length() < 1e-5);
        // Point to the right at (0, -5) → (lateral=5, forward=0)
        assert!((cam.to_cam(vec2(0.0, -5.0)) - vec2(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn to_cam_rotated_yaw() {
        let cam = Camera::new(Vec3::ZERO, FRAC_PI_2, FRAC_PI_2, 0);
        // Yaw = 90°: forward is +Y; (0,10) → (lateral=0, forward=10)
        assert!((cam.to_cam(vec2(0.0, 10.0)) - vec2(0.0, 10.0)).length() < 1e-5);
    }

    #[test]
    fn step_keeps_eye_height() {
        let mut cam = Camera::new(vec3(1.0, 2.0, 6.0), FRAC_PI_2, FRAC_PI_2, 0);
        cam.step(3.0, 1.0);
        let p = cam.pos();
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-5);
        assert_eq!(p.z, 6.0);
    }

    #[test]
    fn turn_keeps_sin_cos_in_sync() {
        let mut cam = Camera::new(Vec3::ZERO, 0.0, FRAC_PI_2, 0);
        cam.turn(FRAC_PI_2);
        let (s, c) = cam.sin_cos();
        assert_relative_eq!(s, 1.0, epsilon = 1e-5);
        assert_relative_eq!(c, 0.0, epsilon = 1e-5);
    }
}
