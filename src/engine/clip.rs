//! Clipping helpers for the portal compiler.
//!
//! * [`clip_near`]: parametric near-plane clip in camera space that drags the
//!   texture U along with the position.
//! * [`SegmentProjection`]: a near-clipped segment after the perspective
//!   divide, with perspective-correct depth/U lookups by screen X.
//! * [`clip_polygon`]: keep the part of a screen-space polygon on one side
//!   of a slanted screen line (one Sutherland–Hodgman pass).

use glam::{Vec2, Vec3, vec3};
use smallvec::SmallVec;

/// Scratch polygon used while clipping; spills to the heap past 8 vertices.
pub type ScratchPoly = SmallVec<[Vec3; 8]>;

/// One camera-space endpoint: `p = (lateral, depth)` plus its texture U.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    pub p: Vec2,
    pub u: f32,
}

/// Clip a segment to the near plane `depth = near`.
///
/// Returns `false` if completely behind. The same parametric fraction moves
/// both the position and U, so a clipped endpoint stays consistent and a
/// second clip against the same plane is a no-op.
pub fn clip_near(a: &mut ClipVertex, b: &mut ClipVertex, near: f32) -> bool {
    if a.p.y <= near && b.p.y <= near {
        return false;
    }
    if a.p.y < near {
        let t = (near - a.p.y) / (b.p.y - a.p.y);
        a.p += (b.p - a.p) * t;
        a.p.y = near;
        a.u += (b.u - a.u) * t;
    }
    if b.p.y < near {
        let t = (near - b.p.y) / (a.p.y - b.p.y);
        b.p += (a.p - b.p) * t;
        b.p.y = near;
        b.u += (a.u - b.u) * t;
    }
    true
}

/// A segment after near clip and perspective divide.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SegmentProjection {
    pub x1: f32,
    pub x2: f32,
    pub z1: f32,
    pub z2: f32,
    pub u0: f32,
    pub u1: f32,
}

impl SegmentProjection {
    /// Hyperbolic blend weights for screen column `x`: `(w1, w2)` with
    /// `w1 = (x2 − x)·z2`, `w2 = (x − x1)·z1`.
    #[inline(always)]
    fn weights(&self, x: f32) -> (f32, f32) {
        ((self.x2 - x) * self.z2, (x - self.x1) * self.z1)
    }

    /// Perspective-correct texture U at screen column `x`.
    ///
    /// `u(x) = (u0·(x2−x)·z2 + u1·(x−x1)·z1) / ((x2−x)·z2 + (x−x1)·z1)`
    #[inline(always)]
    pub fn u_at(&self, x: f32) -> f32 {
        let (w1, w2) = self.weights(x);
        let den = w1 + w2;
        if den.abs() <= f32::EPSILON {
            return self.u0;
        }
        (self.u0 * w1 + self.u1 * w2) / den
    }

    /// Camera-space depth of the segment at screen column `x` (linear in 1/z).
    #[inline(always)]
    pub fn depth_at(&self, x: f32) -> f32 {
        let (w1, w2) = self.weights(x);
        let den = w1 + w2;
        if den.abs() <= f32::EPSILON {
            return self.z1;
        }
        // z(x) = z1·z2·(x2−x1) / ((x2−x)·z2 + (x−x1)·z1)
        self.z1 * self.z2 * (self.x2 - self.x1) / den
    }
}

/// A screen-space line given by its Y at two X positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl ScreenLine {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline(always)]
    pub fn y_at(&self, x: f32) -> f32 {
        let dx = self.x2 - self.x1;
        if dx.abs() <= f32::EPSILON {
            return self.y1;
        }
        self.y1 + (self.y2 - self.y1) * (x - self.x1) / dx
    }
}

/// Which side of a [`ScreenLine`] survives a clip. Screen Y grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keep {
    /// Keep `y <= line(x)`: everything on screen above the line.
    Above,
    /// Keep `y >= line(x)`: everything on screen below the line.
    Below,
}

/// Intersection of segment `a`–`b` with the infinite line through `c`–`d`.
///
/// Returns the parametric position along `a`–`b`, or `None` if parallel.
pub fn intersect_lines(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<f32> {
    let r = b - a;
    let s = d - c;
    let den = r.perp_dot(s);
    if den.abs() <= f32::EPSILON {
        return None;
    }
    Some((c - a).perp_dot(s) / den)
}

/// Clip `src` against `line`, writing the surviving polygon into `dst`.
///
/// New vertices take their depth from `depth_at`, so every vertex keeps the
/// exact depth of the originating segment at its own X.
pub fn clip_polygon(
    src: &[Vec3],
    line: ScreenLine,
    keep: Keep,
    depth_at: impl Fn(f32) -> f32,
    dst: &mut ScratchPoly,
) {
    dst.clear();
    if src.is_empty() {
        return;
    }
    let side = |p: Vec3| {
        let d = p.y - line.y_at(p.x);
        match keep {
            Keep::Above => -d,
            Keep::Below => d,
        }
    };
    let c = Vec2::new(line.x1, line.y1);
    let d = Vec2::new(line.x2, line.y2);

    let mut prev = src[src.len() - 1];
    let mut prev_in = side(prev) >= 0.0;
    for &cur in src {
        let cur_in = side(cur) >= 0.0;
        if cur_in != prev_in {
            let t = intersect_lines(prev.truncate(), cur.truncate(), c, d)
                .unwrap_or(0.0)
                .clamp(0.0, 1.0);
            let p = prev.truncate() + (cur.truncate() - prev.truncate()) * t;
            push_distinct(dst, vec3(p.x, p.y, depth_at(p.x)));
        }
        if cur_in {
            push_distinct(dst, cur);
        }
        prev = cur;
        prev_in = cur_in;
    }
    if dst.len() > 1 && same_point(dst[0], dst[dst.len() - 1]) {
        dst.pop();
    }
}

#[inline]
fn same_point(a: Vec3, b: Vec3) -> bool {
    a.truncate().distance_squared(b.truncate()) <= 1e-8
}

/// Vertices that land on the clip line would otherwise appear twice.
#[inline]
fn push_distinct(dst: &mut ScratchPoly, v: Vec3) {
    if dst.last().is_some_and(|&last| same_point(last, v)) {
        return;
    }
    dst.push(v);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::vec2;

    #[test]
    fn near_clip_moves_u_with_position() {
        let mut a = ClipVertex {
            p: vec2(-2.0, -1.0),
            u: 0.0,
        };
        let mut b = ClipVertex {
            p: vec2(2.0, 3.0),
            u: 8.0,
        };
        assert!(clip_near(&mut a, &mut b, 1.0));
        // halfway along the edge in both position and U
        assert_relative_eq!(a.p.y, 1.0);
        assert_relative_eq!(a.p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(a.u, 4.0, epsilon = 1e-6);
        assert_eq!(b.u, 8.0);
    }

    #[test]
    fn near_clip_is_idempotent() {
        let mut a = ClipVertex {
            p: vec2(3.0, 0.25),
            u: 1.0,
        };
        let mut b = ClipVertex {
            p: vec2(-1.0, 7.0),
            u: 5.0,
        };
        assert!(clip_near(&mut a, &mut b, 0.5));
        let (a1, b1) = (a, b);
        assert!(clip_near(&mut a, &mut b, 0.5));
        assert_eq!(a, a1);
        assert_eq!(b, b1);
        assert_eq!(a.p.y, 0.5);
    }

    #[test]
    fn near_clip_rejects_fully_behind() {
        let mut a = ClipVertex {
            p: vec2(1.0, 0.0),
            u: 0.0,
        };
        let mut b = ClipVertex {
            p: vec2(2.0, -4.0),
            u: 1.0,
        };
        assert!(!clip_near(&mut a, &mut b, 0.1));
    }

    #[test]
    fn fronto_parallel_u_is_linear() {
        let proj = SegmentProjection {
            x1: 10.0,
            x2: 110.0,
            z1: 7.0,
            z2: 7.0,
            u0: 2.0,
            u1: 12.0,
        };
        for x in [10.0, 35.0, 60.0, 97.5, 110.0] {
            let t = (x - 10.0) / 100.0;
            assert_relative_eq!(proj.u_at(x), 2.0 + 10.0 * t, epsilon = 1e-4);
            assert_relative_eq!(proj.depth_at(x), 7.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn slanted_u_hits_endpoints_and_bends_toward_near_end() {
        let proj = SegmentProjection {
            x1: 0.0,
            x2: 100.0,
            z1: 1.0,
            z2: 4.0,
            u0: 0.0,
            u1: 1.0,
        };
        assert_relative_eq!(proj.u_at(0.0), 0.0);
        assert_relative_eq!(proj.u_at(100.0), 1.0);
        // the near end takes more screen space per texel
        assert!(proj.u_at(50.0) < 0.5);
        assert_relative_eq!(proj.depth_at(0.0), 1.0, epsilon = 1e-5);
        assert_relative_eq!(proj.depth_at(100.0), 4.0, epsilon = 1e-5);
        // 1/z is linear in screen space
        assert_relative_eq!(1.0 / proj.depth_at(50.0), 0.5 * (1.0 + 0.25), epsilon = 1e-5);
    }

    #[test]
    fn intersect_lines_parallel_is_none() {
        let t = intersect_lines(vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0), vec2(5.0, 1.0));
        assert!(t.is_none());
        let t = intersect_lines(vec2(0.0, 0.0), vec2(0.0, 4.0), vec2(-1.0, 1.0), vec2(1.0, 1.0));
        assert_relative_eq!(t.unwrap(), 0.25);
    }

    #[test]
    fn clip_square_against_diagonal() {
        let sq = [
            vec3(0.0, 0.0, 1.0),
            vec3(10.0, 0.0, 1.0),
            vec3(10.0, 10.0, 1.0),
            vec3(0.0, 10.0, 1.0),
        ];
        let mut out = ScratchPoly::new();
        // keep the part below y = x
        clip_polygon(
            &sq,
            ScreenLine::new(0.0, 0.0, 10.0, 10.0),
            Keep::Below,
            |_| 1.0,
            &mut out,
        );
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| v.y >= v.x - 1e-4));

        clip_polygon(
            &sq,
            ScreenLine::new(0.0, 20.0, 10.0, 20.0),
            Keep::Below,
            |_| 1.0,
            &mut out,
        );
        assert!(out.is_empty());
    }
}
