//! Breadth-first portal traversal.
//!
//! Starting from the camera's sector with a full-screen window, every
//! front-facing segment is projected, clipped to the inherited window and
//! turned into screen-space polygons. Portals hand a narrower window to the
//! neighbor sector, which is queued unless the [`VisibilityCache`] shows the
//! span was already covered this frame.

use glam::vec3;
use log::{debug, trace, warn};
use smallvec::SmallVec;

use crate::{
    config::RenderConfig,
    engine::{
        clip::{ClipVertex, Keep, ScratchPoly, ScreenLine, SegmentProjection, clip_near, clip_polygon},
        compiled::{CompiledPool, PolygonKind},
        frame::{FrameContext, FrameStats},
        queue::{ClipWindow, PortalRef, QueueItem, RenderQueue},
        types::{Screen, Viewer},
        visibility::VisibilityCache,
    },
    world::{Camera, Level, Sector, SectorId, Segment, SegmentKind},
};

/// One segment after near clip, projection and horizontal window clip.
struct SpanCtx {
    proj: SegmentProjection,
    cx1: f32,
    cx2: f32,
    light: [f32; 2],
    ceil: ScreenLine,
    floor: ScreenLine,
}

impl SpanCtx {
    #[inline]
    fn at_bounds(&self, line: ScreenLine) -> [f32; 2] {
        [line.y_at(self.cx1), line.y_at(self.cx2)]
    }
}

pub struct Compiler {
    config: RenderConfig,
    screen: Screen,
    queue: RenderQueue,
    visibility: VisibilityCache,
    frame: FrameContext,
    pool: CompiledPool,
    stats: FrameStats,
    /* per-segment scratch, reused across frames */
    region: ScratchPoly,
    scratch: ScratchPoly,
    out: ScratchPoly,
}

impl Compiler {
    pub fn new(config: RenderConfig, w: usize, h: usize) -> Self {
        Self {
            queue: RenderQueue::with_capacity(config.queue_capacity),
            pool: CompiledPool::new(config.max_sectors, config.max_polygons),
            screen: Screen::new(w, h),
            visibility: VisibilityCache::default(),
            frame: FrameContext::default(),
            stats: FrameStats::default(),
            region: ScratchPoly::new(),
            scratch: ScratchPoly::new(),
            out: ScratchPoly::new(),
            config,
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.screen = Screen::new(w, h);
    }

    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Statistics of the most recent [`Compiler::compile`].
    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Output of the most recent compile, without recompiling.
    #[inline]
    pub fn pool(&self) -> &CompiledPool {
        &self.pool
    }

    /// Walk the sector graph from the camera's sector and fill the pool.
    ///
    /// The returned sectors are in traversal order; paint them in reverse.
    pub fn compile(&mut self, level: &Level, camera: &Camera) -> &CompiledPool {
        let sector_count = level.sectors.len();
        self.pool.reset();
        self.queue.clear();
        self.visibility.reset(sector_count);
        self.frame.begin(sector_count);
        self.stats = FrameStats::default();

        let view = Viewer::new(camera, self.screen);
        let root = camera.sector();
        if level.sector(root).is_none() {
            warn!("camera sector {root} is not part of level '{}'", level.name);
            return &self.pool;
        }

        let window = ClipWindow::full(self.screen.w, self.config.window_y_bound);
        self.visibility.try_insert(root, window.x1, window.x2);
        self.queue.push(QueueItem {
            sector: root,
            window,
            via: None,
        });

        while let Some(item) = self.queue.pop() {
            let Some(sector) = level.sector(item.sector) else {
                continue;
            };
            if let Some(via) = item.via {
                if self.frame.entered_via(item.sector, via) {
                    self.stats.reentered += 1;
                    trace!("sector {} entered again via {via:?}", item.sector);
                }
            }
            let usage = self.frame.enter(item.sector, item.via);
            if usage > 1 {
                trace!("sector {} entered {usage} times", item.sector);
            }
            if !self.pool.bind(item.sector, item.window, item.via) {
                self.stats.pool_exhausted = true;
                break;
            }
            self.stats.sectors += 1;

            for (idx, seg) in sector.segments.iter().enumerate() {
                self.compile_segment(level, &view, &item, sector, idx as u16, seg);
            }
        }

        self.report();
        &self.pool
    }

    fn report(&self) {
        let s = &self.stats;
        if s.pool_exhausted {
            warn!(
                "compiled sector pool exhausted after {} sectors, {} left queued",
                s.sectors,
                self.queue.len()
            );
        }
        if s.dropped_queue_full > 0 {
            warn!(
                "render queue full (capacity {}), dropped {} portal(s)",
                self.queue.capacity(),
                s.dropped_queue_full
            );
        }
        if s.dropped_polygons > 0 {
            warn!(
                "polygon pool full (capacity {}), dropped {} polygon(s)",
                self.pool.polygon_capacity(),
                s.dropped_polygons
            );
        }
        debug!(
            "frame {}: {} sectors ({} re-entered), {} polygons, {} enqueued ({} see-through), {} covered",
            self.frame.compile_id(),
            s.sectors,
            s.reentered,
            s.polygons,
            s.enqueued,
            s.see_through,
            s.dropped_covered
        );
    }

    fn compile_segment(
        &mut self,
        level: &Level,
        view: &Viewer,
        item: &QueueItem,
        sector: &Sector,
        idx: u16,
        seg: &Segment,
    ) {
        let via = PortalRef {
            sector: item.sector,
            segment: idx,
        };
        let portal = seg.portal();
        if portal == Some(item.sector) {
            return;
        }
        let neighbor = portal.and_then(|n| level.sector(n).map(|s| (n, s)));

        if let Some((n, nb)) = neighbor {
            if seg.kind == SegmentKind::Void && sector.same_heights(nb) {
                if self.enqueue(n, item.window, via) {
                    self.stats.see_through += 1;
                }
                return;
            }
        }

        let Some(span) = self.project(view, item, sector, seg) else {
            return;
        };
        self.build_region(&span, &item.window);
        if self.region.len() < 3 {
            return;
        }

        let ceil_edges = (item.window.top(), span.ceil);
        let floor_edges = (span.floor, item.window.bottom());
        self.emit(PolygonKind::Ceiling, &span, item.sector, None, idx, None, Some(span.ceil), ceil_edges);
        self.emit(PolygonKind::Floor, &span, item.sector, None, idx, Some(span.floor), None, floor_edges);

        let Some((n, nb)) = neighbor else {
            self.emit(
                PolygonKind::Wall,
                &span,
                item.sector,
                None,
                idx,
                Some(span.ceil),
                Some(span.floor),
                (span.ceil, span.floor),
            );
            return;
        };

        let nb_ceil = height_line(view, &span.proj, nb.ceil);
        let nb_floor = height_line(view, &span.proj, nb.floor);
        if nb.ceil < sector.ceil {
            self.emit(
                PolygonKind::UpperStep,
                &span,
                item.sector,
                Some(n),
                idx,
                Some(span.ceil),
                Some(nb_ceil),
                (span.ceil, nb_ceil),
            );
        }
        if nb.floor > sector.floor {
            self.emit(
                PolygonKind::LowerStep,
                &span,
                item.sector,
                Some(n),
                idx,
                Some(nb_floor),
                Some(span.floor),
                (nb_floor, span.floor),
            );
        }

        for window in child_windows(&item.window, &span, nb_ceil, nb_floor) {
            self.enqueue(n, window, via);
        }
    }

    /// Near clip, perspective divide and horizontal clip against `item`.
    fn project(&self, view: &Viewer, item: &QueueItem, sector: &Sector, seg: &Segment) -> Option<SpanCtx> {
        let mut a = ClipVertex {
            p: view.to_cam(seg.start),
            u: 0.0,
        };
        let mut b = ClipVertex {
            p: view.to_cam(seg.end),
            u: seg.length(),
        };
        if !clip_near(&mut a, &mut b, self.config.near_z) {
            return None;
        }

        let x1 = view.project_x(a.p);
        let x2 = view.project_x(b.p);
        // reversed: seen from behind, or edge-on
        if !(x1 < x2) {
            return None;
        }
        let cx1 = x1.max(item.window.x1);
        let cx2 = x2.min(item.window.x2);
        if cx1 >= cx2 {
            return None;
        }

        let proj = SegmentProjection {
            x1,
            x2,
            z1: a.p.y,
            z2: b.p.y,
            u0: a.u,
            u1: b.u,
        };
        let light = [view.light(proj.depth_at(cx1)), view.light(proj.depth_at(cx2))];
        Some(SpanCtx {
            ceil: height_line(view, &proj, sector.ceil),
            floor: height_line(view, &proj, sector.floor),
            proj,
            cx1,
            cx2,
            light,
        })
    }

    /// The inherited window restricted to the segment's clipped columns.
    fn build_region(&mut self, span: &SpanCtx, window: &ClipWindow) {
        let bound = self.config.window_y_bound;
        let depth = |x| span.proj.depth_at(x);
        let rect = [
            vec3(span.cx1, -bound, depth(span.cx1)),
            vec3(span.cx2, -bound, depth(span.cx2)),
            vec3(span.cx2, bound, depth(span.cx2)),
            vec3(span.cx1, bound, depth(span.cx1)),
        ];
        clip_polygon(&rect, window.top(), Keep::Below, depth, &mut self.scratch);
        clip_polygon(&self.scratch, window.bottom(), Keep::Above, depth, &mut self.region);
    }

    /// Clip the current region between `top` and `bottom` and store it.
    #[allow(clippy::too_many_arguments)]
    fn emit(
        &mut self,
        kind: PolygonKind,
        span: &SpanCtx,
        sector: SectorId,
        neighbor: Option<SectorId>,
        segment: u16,
        top: Option<ScreenLine>,
        bottom: Option<ScreenLine>,
        edges: (ScreenLine, ScreenLine),
    ) {
        let Self {
            region,
            scratch,
            out,
            pool,
            stats,
            ..
        } = self;
        let depth = |x| span.proj.depth_at(x);

        out.clear();
        out.extend_from_slice(region);
        if let Some(line) = top {
            clip_polygon(out, line, Keep::Below, depth, scratch);
            std::mem::swap(out, scratch);
        }
        if let Some(line) = bottom {
            clip_polygon(out, line, Keep::Above, depth, scratch);
            std::mem::swap(out, scratch);
        }
        if out.len() < 3 {
            return;
        }

        let Some(poly) = pool.push_polygon() else {
            stats.dropped_polygons += 1;
            return;
        };
        if !poly.set_vertices(out) {
            trace!("{kind:?} polygon of sector {sector} truncated from {} vertices", out.len());
        }
        poly.kind = kind;
        poly.sector = sector;
        poly.neighbor = neighbor;
        poly.segment = segment;
        poly.span = [span.cx1, span.cx2];
        poly.light = span.light;
        poly.edge_top = span.at_bounds(edges.0);
        poly.edge_bottom = span.at_bounds(edges.1);
        poly.proj = span.proj;
        stats.polygons += 1;
    }

    /// Queue `sector` behind `window` unless its span was already covered.
    fn enqueue(&mut self, sector: SectorId, window: ClipWindow, via: PortalRef) -> bool {
        if !window.is_open() {
            return false;
        }
        if self.queue.is_full() {
            self.stats.dropped_queue_full += 1;
            trace!("queue full, dropping sector {sector} via {via:?}");
            return false;
        }
        if !self.visibility.try_insert(sector, window.x1, window.x2) {
            self.stats.dropped_covered += 1;
            trace!("sector {sector} span [{}, {}] already covered", window.x1, window.x2);
            return false;
        }
        self.queue.push(QueueItem {
            sector,
            window,
            via: Some(via),
        });
        self.stats.enqueued += 1;
        true
    }
}

/// Screen line of world height `h` along the projected segment.
///
/// `1/z` is linear in screen X, so the projected height is too.
#[inline]
fn height_line(view: &Viewer, proj: &SegmentProjection, h: f32) -> ScreenLine {
    ScreenLine::new(proj.x1, view.project_y(h, proj.z1), proj.x2, view.project_y(h, proj.z2))
}

/// X in `(lo, hi)` where `a` and `b` cross, if they do.
fn crossing(a: ScreenLine, b: ScreenLine, lo: f32, hi: f32) -> Option<f32> {
    let d_lo = a.y_at(lo) - b.y_at(lo);
    let d_hi = a.y_at(hi) - b.y_at(hi);
    if d_lo * d_hi >= 0.0 {
        return None;
    }
    Some(lo + (hi - lo) * d_lo / (d_lo - d_hi))
}

/// Windows handed to the neighbor through a portal.
///
/// Top is the lower of both ceilings and the parent top, bottom the higher of
/// both floors and the parent bottom. The span is split wherever the parent
/// window crosses a surface line so each piece stays a single trapezoid.
fn child_windows(
    parent: &ClipWindow,
    span: &SpanCtx,
    nb_ceil: ScreenLine,
    nb_floor: ScreenLine,
) -> SmallVec<[ClipWindow; 3]> {
    let (top, bottom) = (parent.top(), parent.bottom());
    let mut cuts: SmallVec<[f32; 6]> = SmallVec::new();
    cuts.push(span.cx1);
    cuts.extend(
        [
            crossing(top, span.ceil, span.cx1, span.cx2),
            crossing(top, nb_ceil, span.cx1, span.cx2),
            crossing(bottom, span.floor, span.cx1, span.cx2),
            crossing(bottom, nb_floor, span.cx1, span.cx2),
        ]
        .into_iter()
        .flatten(),
    );
    cuts.push(span.cx2);
    cuts.sort_by(f32::total_cmp);
    cuts.dedup();

    let top_at = |x| top.y_at(x).max(span.ceil.y_at(x)).max(nb_ceil.y_at(x));
    let bottom_at = |x| bottom.y_at(x).min(span.floor.y_at(x)).min(nb_floor.y_at(x));

    cuts.windows(2)
        .map(|w| ClipWindow {
            x1: w[0],
            x2: w[1],
            y1t: top_at(w[0]),
            y2t: top_at(w[1]),
            y1b: bottom_at(w[0]),
            y2b: bottom_at(w[1]),
        })
        .filter(ClipWindow::is_open)
        .collect()
}
