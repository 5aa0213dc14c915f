mod builder;
mod camera;
mod geometry;
mod texture;

pub mod demo;

pub use builder::LevelBuilder;

pub use geometry::{Level, LevelError, Sector, SectorId, Segment, SegmentId, SegmentKind};

pub use camera::Camera;

pub use texture::{Texture, TextureBank, TextureError, TextureId};
