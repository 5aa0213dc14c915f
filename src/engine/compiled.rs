//! Frame-scoped arena of compiled sectors and their polygons.
//!
//! Both tables are allocated once at their full capacity. A frame starts with
//! [`CompiledPool::reset`], which only rewinds two cursors; records are
//! overwritten in place as the compiler emits them.

use glam::Vec3;

use crate::engine::clip::SegmentProjection;
use crate::engine::queue::{ClipWindow, PortalRef};
use crate::world::{SectorId, SegmentId};

/// Hard cap on vertices in one compiled polygon.
pub const MAX_VERTICES: usize = 32;

/// Which surface a compiled polygon paints; decides the texture source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolygonKind {
    Ceiling,
    Floor,
    Wall,
    UpperStep,
    LowerStep,
}

/// One screen-space polygon to rasterise.
///
/// Vertices are `(x, y, depth)`. `span`, `light`, `edge_top` and
/// `edge_bottom` are sampled at the polygon's left/right X bounds; `proj`
/// keeps the camera-space parameters of the segment for perspective U.
#[derive(Clone, Copy, Debug)]
pub struct CompiledPolygon {
    pub(crate) vertices: [Vec3; MAX_VERTICES],
    pub(crate) len: u8,
    pub kind: PolygonKind,
    pub sector: SectorId,
    pub neighbor: Option<SectorId>,
    pub segment: SegmentId,
    pub span: [f32; 2],
    pub light: [f32; 2],
    /// Unclipped top/bottom of the surface (wall, step) at `span`.
    pub edge_top: [f32; 2],
    pub edge_bottom: [f32; 2],
    pub proj: SegmentProjection,
}

impl Default for CompiledPolygon {
    fn default() -> Self {
        Self {
            vertices: [Vec3::ZERO; MAX_VERTICES],
            len: 0,
            kind: PolygonKind::Wall,
            sector: 0,
            neighbor: None,
            segment: 0,
            span: [0.0; 2],
            light: [1.0; 2],
            edge_top: [0.0; 2],
            edge_bottom: [0.0; 2],
            proj: SegmentProjection::default(),
        }
    }
}

impl CompiledPolygon {
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices[..self.len as usize]
    }

    /// Copy `verts` in; anything past [`MAX_VERTICES`] is dropped.
    ///
    /// Returns `false` if the polygon had to be truncated.
    pub fn set_vertices(&mut self, verts: &[Vec3]) -> bool {
        let n = verts.len().min(MAX_VERTICES);
        self.vertices[..n].copy_from_slice(&verts[..n]);
        self.len = n as u8;
        n == verts.len()
    }

    /// Light at screen column `x`, linear between the two span edges.
    #[inline]
    pub fn light_at(&self, x: f32) -> f32 {
        lerp_span(self.span, self.light, x)
    }

    /// Unclipped surface top and bottom at screen column `x`.
    #[inline]
    pub fn edges_at(&self, x: f32) -> (f32, f32) {
        (
            lerp_span(self.span, self.edge_top, x),
            lerp_span(self.span, self.edge_bottom, x),
        )
    }
}

#[inline(always)]
fn lerp_span(span: [f32; 2], val: [f32; 2], x: f32) -> f32 {
    let w = span[1] - span[0];
    if w.abs() <= f32::EPSILON {
        return val[0];
    }
    let t = ((x - span[0]) / w).clamp(0.0, 1.0);
    val[0] + (val[1] - val[0]) * t
}

/// A sector as seen through one window this frame, with its polygon slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompiledSector {
    pub sector: SectorId,
    pub window: ClipWindow,
    pub via: Option<PortalRef>,
    first: usize,
    len: usize,
}

/// Index-reset arena for one frame of compiler output.
pub struct CompiledPool {
    sectors: Vec<CompiledSector>,
    polygons: Vec<CompiledPolygon>,
    sector_len: usize,
    polygon_len: usize,
}

impl CompiledPool {
    pub fn new(max_sectors: usize, max_polygons: usize) -> Self {
        let blank = CompiledSector {
            sector: 0,
            window: ClipWindow::full(0, 0.0),
            via: None,
            first: 0,
            len: 0,
        };
        Self {
            sectors: vec![blank; max_sectors],
            polygons: vec![CompiledPolygon::default(); max_polygons],
            sector_len: 0,
            polygon_len: 0,
        }
    }

    pub fn reset(&mut self) {
        self.sector_len = 0;
        self.polygon_len = 0;
    }

    /// Start a compiled sector; its polygon cursor begins at the current end.
    ///
    /// Returns `false` once the sector table is exhausted.
    pub fn bind(&mut self, sector: SectorId, window: ClipWindow, via: Option<PortalRef>) -> bool {
        let Some(slot) = self.sectors.get_mut(self.sector_len) else {
            return false;
        };
        *slot = CompiledSector {
            sector,
            window,
            via,
            first: self.polygon_len,
            len: 0,
        };
        self.sector_len += 1;
        true
    }

    /// Next polygon record for the most recently bound sector.
    ///
    /// `None` when the polygon table is exhausted or nothing is bound.
    pub fn push_polygon(&mut self) -> Option<&mut CompiledPolygon> {
        if self.sector_len == 0 || self.polygon_len >= self.polygons.len() {
            return None;
        }
        let owner = &mut self.sectors[self.sector_len - 1];
        owner.len += 1;
        let poly = &mut self.polygons[self.polygon_len];
        self.polygon_len += 1;
        Some(poly)
    }

    /// Compiled sectors in traversal (breadth-first) order.
    #[inline]
    pub fn sectors(&self) -> &[CompiledSector] {
        &self.sectors[..self.sector_len]
    }

    #[inline]
    pub fn polygons(&self, cs: &CompiledSector) -> &[CompiledPolygon] {
        &self.polygons[cs.first..cs.first + cs.len]
    }

    /// Every polygon emitted this frame, in emission order.
    #[inline]
    pub fn all_polygons(&self) -> &[CompiledPolygon] {
        &self.polygons[..self.polygon_len]
    }

    #[inline]
    pub fn sector_capacity(&self) -> usize {
        self.sectors.len()
    }

    #[inline]
    pub fn polygon_capacity(&self) -> usize {
        self.polygons.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    fn window() -> ClipWindow {
        ClipWindow::full(100, 50.0)
    }

    #[test]
    fn bind_slices_polygons_per_sector() {
        let mut pool = CompiledPool::new(4, 8);
        assert!(pool.push_polygon().is_none(), "nothing bound yet");

        assert!(pool.bind(3, window(), None));
        pool.push_polygon().unwrap().kind = PolygonKind::Ceiling;
        pool.push_polygon().unwrap().kind = PolygonKind::Floor;
        assert!(pool.bind(5, window(), None));
        pool.push_polygon().unwrap().kind = PolygonKind::Wall;

        let s = pool.sectors();
        assert_eq!(s.len(), 2);
        let kinds: Vec<_> = pool.polygons(&s[0]).iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PolygonKind::Ceiling, PolygonKind::Floor]);
        assert_eq!(pool.polygons(&s[1]).len(), 1);
        assert_eq!(pool.all_polygons().len(), 3);
    }

    #[test]
    fn reset_rewinds_without_reallocating() {
        let mut pool = CompiledPool::new(2, 2);
        assert!(pool.bind(0, window(), None));
        assert!(pool.bind(1, window(), None));
        assert!(!pool.bind(2, window(), None));
        assert!(pool.push_polygon().is_some());
        assert!(pool.push_polygon().is_some());
        assert!(pool.push_polygon().is_none());

        pool.reset();
        assert!(pool.sectors().is_empty());
        assert_eq!(pool.sector_capacity(), 2);
        assert_eq!(pool.polygon_capacity(), 2);
        assert!(pool.bind(7, window(), None));
        assert_eq!(pool.polygons(&pool.sectors()[0]).len(), 0);
    }

    #[test]
    fn vertices_are_capped() {
        let mut poly = CompiledPolygon::default();
        let many: Vec<_> = (0..40).map(|i| vec3(i as f32, 0.0, 1.0)).collect();
        assert!(!poly.set_vertices(&many));
        assert_eq!(poly.vertices().len(), MAX_VERTICES);
        assert!(poly.set_vertices(&many[..4]));
        assert_eq!(poly.vertices().len(), 4);
    }

    #[test]
    fn light_interpolates_across_span() {
        let poly = CompiledPolygon {
            span: [10.0, 20.0],
            light: [1.0, 0.5],
            ..CompiledPolygon::default()
        };
        assert_eq!(poly.light_at(10.0), 1.0);
        assert_eq!(poly.light_at(15.0), 0.75);
        assert_eq!(poly.light_at(40.0), 0.5);
    }
}
