//! Portal-visibility sector renderer.
//!
//! ```text
//!  Camera ──► engine::Compiler ──► CompiledPool ──► renderer::software::Software ──► PixelSurface
//!                 ▲    ▲
//!          world::Level │
//!              VisibilityCache
//! ```
//!
//! * [`world`] holds the static sector graph, the camera and textures.
//! * [`engine`] walks the graph breadth-first through portals and emits
//!   clipped screen-space polygons into a frame-scoped pool.
//! * [`renderer`] paints that pool back-to-front into a pixel surface.

pub mod config;
pub mod engine;
pub mod renderer;
pub mod world;

pub use config::RenderConfig;
