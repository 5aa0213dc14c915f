use smallvec::SmallVec;

use crate::engine::queue::PortalRef;
use crate::world::SectorId;

/// Per-sector bookkeeping valid for one compile pass.
#[derive(Clone, Debug, Default)]
struct SectorStamp {
    compile_id: u32,
    usage: u32,
    entries: SmallVec<[Option<PortalRef>; 4]>,
}

/// Explicit per-frame traversal state.
///
/// Sectors are entered by index through this context only; a stamp whose
/// `compile_id` lags behind the current one is stale and reads as unused,
/// so starting a frame never walks the whole table.
#[derive(Default)]
pub struct FrameContext {
    compile_id: u32,
    stamps: Vec<SectorStamp>,
}

impl FrameContext {
    /// Advance the generation counter for a new frame.
    pub fn begin(&mut self, sector_count: usize) -> u32 {
        self.compile_id = self.compile_id.wrapping_add(1);
        if self.compile_id == 0 {
            // wrapped: old stamps could alias the new generation
            self.stamps.iter_mut().for_each(|s| *s = SectorStamp::default());
            self.compile_id = 1;
        }
        if self.stamps.len() < sector_count {
            self.stamps.resize_with(sector_count, SectorStamp::default);
        }
        self.compile_id
    }

    #[inline]
    pub fn compile_id(&self) -> u32 {
        self.compile_id
    }

    /// Mark `sector` as referenced through `via` this frame.
    ///
    /// The first reference in a frame resets the sector's usage bookkeeping.
    /// Returns how many times the sector has now been entered this frame.
    pub fn enter(&mut self, sector: SectorId, via: Option<PortalRef>) -> u32 {
        let id = self.compile_id;
        let Some(stamp) = self.stamps.get_mut(sector as usize) else {
            return 0;
        };
        if stamp.compile_id != id {
            stamp.compile_id = id;
            stamp.usage = 0;
            stamp.entries.clear();
        }
        stamp.usage += 1;
        stamp.entries.push(via);
        stamp.usage
    }

    /// Whether `sector` was already entered through `via` this frame.
    pub fn entered_via(&self, sector: SectorId, via: PortalRef) -> bool {
        match self.stamps.get(sector as usize) {
            Some(s) if s.compile_id == self.compile_id => s.entries.contains(&Some(via)),
            _ => false,
        }
    }
}

/// Counters for one compile pass, for logging and the viewer's overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub sectors: usize,
    pub polygons: usize,
    pub enqueued: usize,
    pub see_through: usize,
    /// Sectors entered again through a portal already crossed this frame.
    pub reentered: usize,
    pub dropped_covered: usize,
    pub dropped_queue_full: usize,
    pub dropped_polygons: usize,
    pub pool_exhausted: bool,
}
