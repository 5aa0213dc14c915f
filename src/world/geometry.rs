use glam::Vec2;
use thiserror::Error;

use crate::world::texture::TextureId;

pub type SectorId = u16;
pub type SegmentId = u16;

/// Runtime snapshot of one level (immutable while rendering).
#[derive(Clone, Debug, Default)]
pub struct Level {
    pub name: String,
    pub sectors: Vec<Sector>,
}

/*--------------------------- segments -------------------------------*/

/// How a boundary edge behaves when the traversal reaches it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    /// Solid boundary, never a portal even if a neighbor is recorded.
    Wall,
    /// Not resolved to anything opaque: an open edge between two halves of
    /// the same room, or an edge whose neighbor was never linked.
    Void,
    /// Passable edge into the neighbor sector.
    Join,
    /// Resolved edge: a portal when it has a neighbor, a wall otherwise.
    Valid,
}

/// Oriented boundary edge of a sector.
///
/// `neighbor` is a non-owning back-link: an index into `Level::sectors`.
#[derive(Clone, Debug)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    pub kind: SegmentKind,
    pub neighbor: Option<SectorId>,
    /* per-segment overrides, fall back to the sector's textures */
    pub upper: Option<TextureId>,
    pub middle: Option<TextureId>,
    pub lower: Option<TextureId>,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Wall,
            neighbor: None,
            upper: None,
            middle: None,
            lower: None,
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// Neighbor to traverse into, if this edge is a portal at all.
    #[inline]
    pub fn portal(&self) -> Option<SectorId> {
        match self.kind {
            SegmentKind::Wall => None,
            SegmentKind::Void | SegmentKind::Join | SegmentKind::Valid => self.neighbor,
        }
    }
}

/*---------------------------- sectors -------------------------------*/

#[derive(Clone, Debug)]
pub struct Sector {
    pub floor: f32,
    pub ceil: f32,
    pub segments: Vec<Segment>,
    pub floor_tex: Option<TextureId>,
    pub ceil_tex: Option<TextureId>,
    pub upper_tex: Option<TextureId>,
    pub lower_tex: Option<TextureId>,
    pub wall_tex: Option<TextureId>,
}

impl Sector {
    pub fn new(floor: f32, ceil: f32) -> Self {
        Self {
            floor,
            ceil,
            segments: Vec::new(),
            floor_tex: None,
            ceil_tex: None,
            upper_tex: None,
            lower_tex: None,
            wall_tex: None,
        }
    }

    /// Same floor and ceiling heights: no step geometry between the two.
    #[inline]
    pub fn same_heights(&self, other: &Sector) -> bool {
        self.floor == other.floor && self.ceil == other.ceil
    }

    /// Containment test for a convex, clockwise footprint.
    pub fn contains(&self, p: Vec2) -> bool {
        self.segments.len() >= 3
            && self.segments.iter().all(|s| {
                let edge = s.end - s.start;
                // clockwise winding keeps the interior on the right of every edge
                edge.perp_dot(p - s.start) <= 0.0
            })
    }
}

/*----------------------------- errors -------------------------------*/

#[derive(Error, Debug, PartialEq)]
pub enum LevelError {
    #[error("sector {sector} segment {segment} points at missing sector {neighbor}")]
    BadNeighbor {
        sector: SectorId,
        segment: SegmentId,
        neighbor: SectorId,
    },

    #[error("sector {0} needs at least 3 segments")]
    Degenerate(SectorId),

    #[error("sector {0} has floor above ceiling")]
    Inverted(SectorId),

    #[error("sector {sector} references texture {texture}, bank holds {available}")]
    BadTexture {
        sector: SectorId,
        texture: TextureId,
        available: usize,
    },

    #[error("level holds {0} sectors, more than a SectorId can address")]
    TooManySectors(usize),
}

impl Level {
    pub fn sector(&self, id: SectorId) -> Option<&Sector> {
        self.sectors.get(id as usize)
    }

    /// Sector whose footprint contains `p`, preferring `hint` when it does.
    pub fn sector_at(&self, p: Vec2, hint: Option<SectorId>) -> Option<SectorId> {
        if let Some(h) = hint {
            if self.sector(h).is_some_and(|s| s.contains(p)) {
                return Some(h);
            }
        }
        self.sectors
            .iter()
            .position(|s| s.contains(p))
            .map(|i| i as SectorId)
    }

    /// Every neighbor reference must be valid or explicitly absent.
    pub fn validate(&self, texture_count: usize) -> Result<(), LevelError> {
        if self.sectors.len() > SectorId::MAX as usize {
            return Err(LevelError::TooManySectors(self.sectors.len()));
        }
        for (si, sector) in self.sectors.iter().enumerate() {
            let sid = si as SectorId;
            if sector.segments.len() < 3 {
                return Err(LevelError::Degenerate(sid));
            }
            if sector.floor > sector.ceil {
                return Err(LevelError::Inverted(sid));
            }
            let sector_tex = [
                sector.floor_tex,
                sector.ceil_tex,
                sector.upper_tex,
                sector.lower_tex,
                sector.wall_tex,
            ];
            let seg_tex = sector
                .segments
                .iter()
                .flat_map(|s| [s.upper, s.middle, s.lower]);
            for tex in sector_tex.into_iter().chain(seg_tex).flatten() {
                if tex as usize >= texture_count {
                    return Err(LevelError::BadTexture {
                        sector: sid,
                        texture: tex,
                        available: texture_count,
                    });
                }
            }
            for (gi, seg) in sector.segments.iter().enumerate() {
                if let Some(n) = seg.neighbor {
                    if n as usize >= self.sectors.len() {
                        return Err(LevelError::BadNeighbor {
                            sector: sid,
                            segment: gi as SegmentId,
                            neighbor: n,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    /// Unit square wound clockwise (+Y up).
    fn square(floor: f32, ceil: f32) -> Sector {
        let pts = [vec2(0.0, 0.0), vec2(0.0, 1.0), vec2(1.0, 1.0), vec2(1.0, 0.0)];
        let mut s = Sector::new(floor, ceil);
        for i in 0..4 {
            s.segments.push(Segment::new(pts[i], pts[(i + 1) % 4]));
        }
        s
    }

    #[test]
    fn contains_inside_and_outside() {
        let s = square(0.0, 1.0);
        assert!(s.contains(vec2(0.5, 0.5)));
        assert!(!s.contains(vec2(1.5, 0.5)));
        assert!(!s.contains(vec2(0.5, -0.1)));
    }

    #[test]
    fn wall_kind_is_never_a_portal() {
        let mut seg = Segment::new(Vec2::ZERO, Vec2::X);
        seg.neighbor = Some(3);
        assert_eq!(seg.portal(), None);
        seg.kind = SegmentKind::Join;
        assert_eq!(seg.portal(), Some(3));
    }

    #[test]
    fn validate_catches_dangling_neighbor() {
        let mut s = square(0.0, 1.0);
        s.segments[2].kind = SegmentKind::Join;
        s.segments[2].neighbor = Some(7);
        let level = Level {
            name: "t".into(),
            sectors: vec![s],
        };
        assert_eq!(
            level.validate(0),
            Err(LevelError::BadNeighbor {
                sector: 0,
                segment: 2,
                neighbor: 7
            })
        );
    }

    #[test]
    fn validate_catches_bad_texture() {
        let mut s = square(0.0, 1.0);
        s.floor_tex = Some(4);
        let level = Level {
            name: "t".into(),
            sectors: vec![s],
        };
        assert!(matches!(
            level.validate(2),
            Err(LevelError::BadTexture { texture: 4, .. })
        ));
    }

    #[test]
    fn sector_at_uses_hint_first() {
        let level = Level {
            name: "t".into(),
            sectors: vec![square(0.0, 1.0), square(0.0, 2.0)],
        };
        assert_eq!(level.sector_at(vec2(0.5, 0.5), Some(1)), Some(1));
        assert_eq!(level.sector_at(vec2(0.5, 0.5), None), Some(0));
        assert_eq!(level.sector_at(vec2(5.0, 5.0), None), None);
    }
}
