// ──────────────────────────────────────────────────────────────────────────
// world/builder.rs
//
//  *   polygon outlines + heights        ──╮
//  *   shared edges (auto-linked)          │   --->  world::geometry::Level
//  *   optional Void markers               │
//                                          ╯
// ──────────────────────────────────────────────────────────────────────────

use glam::Vec2;

use crate::world::geometry::{Level, LevelError, Sector, SectorId, Segment, SegmentKind};

/// Endpoints closer than this are considered the same vertex when linking.
const LINK_EPSILON: f32 = 1e-3;

/// Assembles a [`Level`] from sector outlines.
///
/// * Outlines may be given in either winding; they are stored clockwise
///   (+Y up) so boundaries read left-to-right from inside.
/// * An edge that appears reversed in another sector becomes a `Join`
///   portal on both sides, or a `Void` pair if marked with [`void_edge`].
///
/// [`void_edge`]: LevelBuilder::void_edge
pub struct LevelBuilder {
    name: String,
    sectors: Vec<Sector>,
    voids: Vec<(Vec2, Vec2)>,
}

impl LevelBuilder {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            sectors: Vec::new(),
            voids: Vec::new(),
        }
    }

    /// Add a sector with the given outline and heights; returns its id.
    pub fn sector(&mut self, outline: &[Vec2], floor: f32, ceil: f32) -> SectorId {
        let mut pts = outline.to_vec();
        if signed_area(&pts) > 0.0 {
            pts.reverse(); // counter-clockwise → clockwise
        }
        let mut sector = Sector::new(floor, ceil);
        for (i, &a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            sector.segments.push(Segment::new(a, b));
        }
        self.sectors.push(sector);
        (self.sectors.len() - 1) as SectorId
    }

    /// Mutable access for textures and per-segment overrides.
    ///
    /// # Panics
    /// If `id` was not returned by [`LevelBuilder::sector`].
    pub fn sector_mut(&mut self, id: SectorId) -> &mut Sector {
        &mut self.sectors[id as usize]
    }

    /// Mark the shared edge `a`–`b` (either direction) as see-through.
    pub fn void_edge(&mut self, a: Vec2, b: Vec2) -> &mut Self {
        self.voids.push((a, b));
        self
    }

    /// Link shared edges and validate against a bank of `texture_count`.
    pub fn build(mut self, texture_count: usize) -> Result<Level, LevelError> {
        self.link();
        let level = Level {
            name: self.name,
            sectors: self.sectors,
        };
        level.validate(texture_count)?;
        Ok(level)
    }

    fn link(&mut self) {
        let edges: Vec<(usize, Vec2, Vec2)> = self
            .sectors
            .iter()
            .enumerate()
            .flat_map(|(si, s)| s.segments.iter().map(move |g| (si, g.start, g.end)))
            .collect();

        for (si, sector) in self.sectors.iter_mut().enumerate() {
            for seg in sector.segments.iter_mut() {
                if seg.neighbor.is_some() {
                    continue;
                }
                let twin = edges.iter().find(|(oi, a, b)| {
                    *oi != si && same(*a, seg.end) && same(*b, seg.start)
                });
                let Some(&(other, _, _)) = twin else {
                    continue;
                };
                let is_void = self.voids.iter().any(|&(a, b)| {
                    (same(a, seg.start) && same(b, seg.end))
                        || (same(a, seg.end) && same(b, seg.start))
                });
                seg.neighbor = Some(other as SectorId);
                seg.kind = if is_void {
                    SegmentKind::Void
                } else {
                    SegmentKind::Join
                };
            }
        }
    }
}

#[inline]
fn same(a: Vec2, b: Vec2) -> bool {
    a.distance_squared(b) <= LINK_EPSILON * LINK_EPSILON
}

/// Shoelace area: positive for counter-clockwise (+Y up).
fn signed_area(pts: &[Vec2]) -> f32 {
    let n = pts.len();
    (0..n)
        .map(|i| pts[i].perp_dot(pts[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}
