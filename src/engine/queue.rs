use crate::engine::clip::ScreenLine;
use crate::world::SectorId;

/// Screen-space trapezoid inherited from the portal that exposed a sector.
///
/// Horizontal bounds `x1 ≤ x2`; top and bottom are slanted lines given by
/// their Y at `x1` and `x2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipWindow {
    pub x1: f32,
    pub x2: f32,
    pub y1t: f32,
    pub y2t: f32,
    pub y1b: f32,
    pub y2b: f32,
}

impl ClipWindow {
    /// Whole viewport: columns `[0, w]`, rows `±bound`.
    pub fn full(w: usize, bound: f32) -> Self {
        Self {
            x1: 0.0,
            x2: w as f32,
            y1t: -bound,
            y2t: -bound,
            y1b: bound,
            y2b: bound,
        }
    }

    #[inline]
    pub fn top(&self) -> ScreenLine {
        ScreenLine::new(self.x1, self.y1t, self.x2, self.y2t)
    }

    #[inline]
    pub fn bottom(&self) -> ScreenLine {
        ScreenLine::new(self.x1, self.y1b, self.x2, self.y2b)
    }

    /// Nothing can be seen through a window that is closed at both ends.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.x1 < self.x2 && (self.y1t < self.y1b || self.y2t < self.y2b)
    }
}

/// One pending traversal task.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueueItem {
    pub sector: SectorId,
    pub window: ClipWindow,
    /// Portal this item came through; `None` for the camera's own sector.
    pub via: Option<PortalRef>,
}

/// The (sector, segment index) a traversal step crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PortalRef {
    pub sector: SectorId,
    pub segment: u16,
}

/// Bounded circular FIFO of [`QueueItem`]s.
///
/// Storage is allocated once; `clear` is an index reset. A push on a full
/// queue is refused, the caller decides whether that matters.
pub struct RenderQueue {
    items: Vec<QueueItem>,
    head: usize,
    len: usize,
}

impl RenderQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        let blank = QueueItem {
            sector: 0,
            window: ClipWindow::full(0, 0.0),
            via: None,
        };
        Self {
            items: vec![blank; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.items.len()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Returns `false` (and drops `item`) when the queue is full.
    pub fn push(&mut self, item: QueueItem) -> bool {
        if self.is_full() {
            return false;
        }
        let tail = (self.head + self.len) % self.items.len();
        self.items[tail] = item;
        self.len += 1;
        true
    }

    pub fn pop(&mut self) -> Option<QueueItem> {
        if self.len == 0 {
            return None;
        }
        let item = self.items[self.head];
        self.head = (self.head + 1) % self.items.len();
        self.len -= 1;
        Some(item)
    }
}
