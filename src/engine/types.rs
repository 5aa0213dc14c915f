use glam::Vec2;

use crate::world::Camera;

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_h: f32, // pre-derived for speed
    pub half_w: f32, // pre-derived for speed
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_w: w as f32 * 0.5,
            half_h: h as f32 * 0.5,
        }
    }
}

/// Camera state reused by the compiler and every raster unit.
#[derive(Clone, Copy, Debug)]
pub struct Viewer {
    pub focal: f32,
    pub eye_z: f32,
    pub shear: f32,
    pub light_distance: f32,
    pub origin: Vec2,
    pub forward: Vec2,
    pub right: Vec2,
    pub screen: Screen,
}

impl Viewer {
    pub fn new(cam: &Camera, screen: Screen) -> Self {
        Self {
            focal: cam.screen_scale(screen.w),
            eye_z: cam.pos().z,
            shear: cam.yaw_shear(),
            light_distance: cam.light_distance(),
            origin: cam.pos().truncate(),
            forward: cam.forward(),
            right: cam.right(),
            screen,
        }
    }

    /// World X-Y to camera space (`lateral`, `depth`).
    #[inline(always)]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let d = p - self.origin;
        Vec2::new(d.dot(self.right), d.dot(self.forward))
    }

    /// Screen X of a camera-space point (`lateral`, `depth`).
    #[inline(always)]
    pub fn project_x(&self, p: Vec2) -> f32 {
        self.screen.half_w + p.x * self.focal / p.y
    }

    /// Screen Y of world height `h` seen at camera-space depth `z`.
    #[inline(always)]
    pub fn project_y(&self, h: f32, z: f32) -> f32 {
        self.screen.half_h - ((h - self.eye_z) / z + self.shear) * self.focal
    }

    /// Depth at which a plane of world height `h` is seen at screen row `sy`.
    ///
    /// `None` on the wrong side of the horizon (the plane is not there).
    #[inline(always)]
    pub fn plane_depth(&self, h: f32, sy: f32) -> Option<f32> {
        let slope = (self.screen.half_h - sy) / self.focal - self.shear;
        let z = (h - self.eye_z) / slope;
        (z.is_finite() && z > 0.0).then_some(z)
    }

    /// World X-Y under screen column `sx` at depth `z`.
    #[inline(always)]
    pub fn unproject(&self, sx: f32, z: f32) -> Vec2 {
        let lateral = (sx - self.screen.half_w) * z / self.focal;
        self.origin + self.forward * z + self.right * lateral
    }

    /// Linear distance fade, `1 − z·light_distance` clamped to `[0, 1]`.
    #[inline(always)]
    pub fn light(&self, z: f32) -> f32 {
        (1.0 - z * self.light_distance).clamp(0.0, 1.0)
    }
}
