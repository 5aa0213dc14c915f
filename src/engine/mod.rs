//! Portal traversal: camera pose + sector graph → compiled polygons.

mod clip;
mod compiled;
mod compiler;
mod frame;
mod queue;
mod types;
mod visibility;

pub use clip::{
    ClipVertex, Keep, ScratchPoly, ScreenLine, SegmentProjection, clip_near, clip_polygon,
    intersect_lines,
};
pub use compiled::{CompiledPolygon, CompiledPool, CompiledSector, MAX_VERTICES, PolygonKind};
pub use compiler::Compiler;
pub use frame::FrameStats;
pub use queue::{ClipWindow, PortalRef, QueueItem, RenderQueue};
pub use types::{Screen, Viewer};
