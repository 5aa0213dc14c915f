//! Column scan conversion of compiled polygons.
//!
//! Each integer column inside the clamped bounding box is sampled at its
//! pixel centre. The polygon edges crossing that vertical line give the
//! even-odd *nodes*; rows whose centres fall in `[n0, n1)` between
//! consecutive pairs are filled. Two polygons sharing an edge therefore
//! never both paint, nor both miss, a pixel along it.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::engine::MAX_VERTICES;

/// Integer pixel rectangle `x0..x1 × y0..y1` (end exclusive).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// Reusable scan converter; holds no pixels, only the current polygon.
#[derive(Default)]
pub struct PolygonRaster {
    pts: SmallVec<[Vec2; MAX_VERTICES]>,
    nodes: SmallVec<[f32; 16]>,
    rect: PixelRect,
    height: i32,
    valid: bool,
}

impl PolygonRaster {
    /// Load `verts` and clamp their bounding box to a `w × h` surface.
    ///
    /// Returns [`PolygonRaster::verify`].
    pub fn setup(&mut self, verts: &[Vec3], w: usize, h: usize) -> bool {
        self.pts.clear();
        self.pts.extend(verts.iter().map(|v| v.truncate()));
        self.height = h as i32;
        self.valid = false;
        if self.pts.len() < 3 {
            return false;
        }

        let (lo, hi) = self
            .pts
            .iter()
            .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            });
        if !lo.is_finite() || !hi.is_finite() {
            return false;
        }
        self.rect = PixelRect {
            x0: (lo.x.floor() as i32).max(0),
            y0: (lo.y.floor() as i32).max(0),
            x1: (hi.x.ceil() as i32).min(w as i32),
            y1: (hi.y.ceil() as i32).min(h as i32),
        };
        self.valid = self.rect.x1 - self.rect.x0 >= 1 && self.rect.y1 - self.rect.y0 >= 1;
        self.valid
    }

    /// `false` if the clamped box is under one pixel in either axis.
    #[inline]
    pub fn verify(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn bounds(&self) -> PixelRect {
        self.rect
    }

    /// Polygon outline of the current setup, in screen space.
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.pts
    }

    /// Call `fill(x, y_start, y_end)` for every filled run, end exclusive.
    pub fn spans(&mut self, mut fill: impl FnMut(i32, i32, i32)) {
        if !self.valid {
            return;
        }
        let n = self.pts.len();
        for x in self.rect.x0..self.rect.x1 {
            let fx = x as f32 + 0.5;

            self.nodes.clear();
            let mut prev = self.pts[n - 1];
            for &cur in &self.pts {
                if (prev.x <= fx) != (cur.x <= fx) {
                    let t = (fx - prev.x) / (cur.x - prev.x);
                    self.nodes.push(prev.y + (cur.y - prev.y) * t);
                }
                prev = cur;
            }
            self.nodes.sort_unstable_by(f32::total_cmp);

            for pair in self.nodes.chunks_exact(2) {
                let ys = ((pair[0] - 0.5).ceil() as i32).max(0);
                let ye = ((pair[1] - 0.5).ceil() as i32).min(self.height);
                // wholly above or below the surface
                if ys >= ye {
                    continue;
                }
                fill(x, ys, ye);
            }
        }
    }
}
