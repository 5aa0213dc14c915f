use smallvec::SmallVec;

use crate::world::SectorId;

/// Horizontal screen interval `[x1, x2]` already handed to a sector this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VisSpan {
    pub x1: f32,
    pub x2: f32,
}

impl VisSpan {
    #[inline]
    pub fn contains(&self, other: &VisSpan) -> bool {
        self.x1 <= other.x1 && other.x2 <= self.x2
    }
}

/// Per-sector spans recorded this frame, used to stop re-expanding a sector
/// through overlapping portals.
///
/// Lists are kept sorted by `x1`. Only the sectors touched in a frame are
/// cleared on [`VisibilityCache::reset`], their storage is reused.
#[derive(Default)]
pub struct VisibilityCache {
    spans: Vec<SmallVec<[VisSpan; 4]>>,
    touched: Vec<SectorId>,
}

impl VisibilityCache {
    pub fn new(sector_count: usize) -> Self {
        let mut cache = Self::default();
        cache.reset(sector_count);
        cache
    }

    /// Start a new frame; grows the table if the level got bigger.
    pub fn reset(&mut self, sector_count: usize) {
        for &s in &self.touched {
            if let Some(list) = self.spans.get_mut(s as usize) {
                list.clear();
            }
        }
        self.touched.clear();
        if self.spans.len() < sector_count {
            self.spans.resize_with(sector_count, SmallVec::new);
        }
    }

    /// Spans recorded for `sector` this frame.
    pub fn spans(&self, sector: SectorId) -> &[VisSpan] {
        self.spans.get(sector as usize).map_or(&[][..], |l| l.as_slice())
    }

    /// Record `[x1, x2]` for `sector` unless an earlier span already covers it.
    ///
    /// Returns `true` when the span is new and the caller should go ahead.
    pub fn try_insert(&mut self, sector: SectorId, x1: f32, x2: f32) -> bool {
        let Some(list) = self.spans.get_mut(sector as usize) else {
            return false;
        };
        let span = VisSpan { x1, x2 };
        if list.iter().any(|s| s.contains(&span)) {
            return false;
        }
        if list.is_empty() {
            self.touched.push(sector);
        }
        // earlier spans swallowed by the new one can never reject anything
        // the new one would not
        list.retain(|s| !span.contains(s));
        let at = list.partition_point(|s| s.x1 < span.x1);
        list.insert(at, span);
        true
    }
}
