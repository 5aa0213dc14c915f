//! Untextured views: outlines, vertex dots and bounding boxes.
//!
//! Every routine goes through the same [`PolygonRaster`] setup as the
//! textured path, so a polygon that is rejected there draws nothing here.

use glam::Vec2;

use crate::renderer::{PixelSurface, Rgba, software::raster::PolygonRaster};

/// Clip `a`–`b` to the rectangle `[-1, w] × [-1, h]` (Liang–Barsky).
///
/// Keeps Bresenham bounded for window-sized vertices far off screen.
fn clip_line(a: Vec2, b: Vec2, w: f32, h: f32) -> Option<(Vec2, Vec2)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [
        (-d.x, a.x + 1.0),
        (d.x, w - a.x),
        (-d.y, a.y + 1.0),
        (d.y, h - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + d * t0, a + d * t1))
}

/// Bresenham line; off-surface pixels are skipped.
pub fn draw_line<S: PixelSurface + ?Sized>(surface: &mut S, a: Vec2, b: Vec2, col: Rgba) {
    let (w, h) = (surface.width() as i32, surface.height() as i32);
    let Some((a, b)) = clip_line(a, b, w as f32, h as f32) else {
        return;
    };
    let (mut x0, mut y0) = (a.x.floor() as i32, a.y.floor() as i32);
    let (x1, y1) = (b.x.floor() as i32, b.y.floor() as i32);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if (0..w).contains(&x0) && (0..h).contains(&y0) {
            surface.put(x0 as usize, y0 as usize, col);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Closed outline of the polygon loaded in `raster`.
pub fn draw_outline<S: PixelSurface + ?Sized>(raster: &PolygonRaster, surface: &mut S, col: Rgba) {
    if !raster.verify() {
        return;
    }
    let pts = raster.points();
    let mut prev = pts[pts.len() - 1];
    for &cur in pts {
        draw_line(surface, prev, cur, col);
        prev = cur;
    }
}

/// A 3×3 dot on every on-screen vertex.
pub fn draw_points<S: PixelSurface + ?Sized>(raster: &PolygonRaster, surface: &mut S, col: Rgba) {
    if !raster.verify() {
        return;
    }
    let (w, h) = (surface.width() as i32, surface.height() as i32);
    for p in raster.points() {
        let (cx, cy) = (p.x.floor() as i32, p.y.floor() as i32);
        for y in cy - 1..=cy + 1 {
            for x in cx - 1..=cx + 1 {
                if (0..w).contains(&x) && (0..h).contains(&y) {
                    surface.put(x as usize, y as usize, col);
                }
            }
        }
    }
}

/// Outline of the clamped integer bounding box.
pub fn draw_bounds<S: PixelSurface + ?Sized>(raster: &PolygonRaster, surface: &mut S, col: Rgba) {
    if !raster.verify() {
        return;
    }
    let r = raster.bounds();
    let (x0, y0) = (r.x0 as usize, r.y0 as usize);
    let (x1, y1) = (r.x1 as usize - 1, r.y1 as usize - 1);
    for x in x0..=x1 {
        surface.put(x, y0, col);
        surface.put(x, y1, col);
    }
    for y in y0..=y1 {
        surface.put(x0, y, col);
        surface.put(x1, y, col);
    }
}
