//! Small hand-made level used by the viewer, the benches and the tests.
//!
//! ```text
//!  y 60 ┌────┬────┐
//!       │ S3 │ S4 │
//!    40 ├╌╌╌╌┼────┼──────┬──────┐
//!       │         │  S1  │      │
//!       │   S0    ├──────┤  S2  │   S1 spans y 10..30
//!     0 └─────────┴──────┴──────┘
//!       0   20    40     60     90  x
//! ```
//!
//! * S0↔S3 is a `Void` edge (same heights → see-through).
//! * S0→S1→S2 steps down from the ceiling and up from the floor.
//! * S0, S3 and S4 form a cycle.

use glam::{Vec2, Vec3, vec2, vec3};

use crate::world::{
    Camera, Level, LevelBuilder, LevelError, SectorId, Texture, TextureBank, TextureError,
};

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

pub struct Demo {
    pub level: Level,
    pub bank: TextureBank,
    pub spawn: Vec3,
    pub spawn_yaw: f32,
    pub spawn_sector: SectorId,
}

impl Demo {
    pub fn camera(&self, fov: f32) -> Camera {
        Camera::new(self.spawn, self.spawn_yaw, fov, self.spawn_sector)
    }
}

fn outline(pts: &[(f32, f32)]) -> Vec<Vec2> {
    pts.iter().map(|&(x, y)| vec2(x, y)).collect()
}

pub fn build() -> Result<Demo, DemoError> {
    let mut bank = TextureBank::new();
    let floor = bank.insert(Texture::checker("FLOOR", 64, 16, 0xFF_806040, 0xFF_604830)?)?;
    let ceil = bank.insert(Texture::checker("CEIL", 32, 8, 0xFF_B0B0B0, 0xFF_909090)?)?;
    let brick = bank.insert(Texture::bricks("BRICK", 64, 0xFF_A04030, 0xFF_C0C0B0)?)?;
    let step = bank.insert(Texture::bricks("STEP", 32, 0xFF_4060A0, 0xFF_202020)?)?;
    let metal = bank.insert(Texture::checker("METAL", 16, 4, 0xFF_5A6A5A, 0xFF_3A4A3A)?)?;

    let mut b = LevelBuilder::new("DEMO");
    let s0 = b.sector(
        &outline(&[
            (0.0, 0.0),
            (40.0, 0.0),
            (40.0, 10.0),
            (40.0, 30.0),
            (40.0, 40.0),
            (20.0, 40.0),
            (0.0, 40.0),
        ]),
        0.0,
        20.0,
    );
    let s1 = b.sector(
        &outline(&[(40.0, 10.0), (60.0, 10.0), (60.0, 30.0), (40.0, 30.0)]),
        4.0,
        12.0,
    );
    let s2 = b.sector(
        &outline(&[
            (60.0, 0.0),
            (90.0, 0.0),
            (90.0, 40.0),
            (60.0, 40.0),
            (60.0, 30.0),
            (60.0, 10.0),
        ]),
        2.0,
        24.0,
    );
    let s3 = b.sector(
        &outline(&[(0.0, 40.0), (20.0, 40.0), (20.0, 60.0), (0.0, 60.0)]),
        0.0,
        20.0,
    );
    let s4 = b.sector(
        &outline(&[(20.0, 40.0), (40.0, 40.0), (40.0, 60.0), (20.0, 60.0)]),
        1.0,
        16.0,
    );
    b.void_edge(vec2(0.0, 40.0), vec2(20.0, 40.0));

    for id in [s0, s1, s2, s3, s4] {
        let s = b.sector_mut(id);
        s.floor_tex = Some(floor);
        s.ceil_tex = Some(ceil);
        s.upper_tex = Some(step);
        s.lower_tex = Some(step);
        s.wall_tex = Some(brick);
    }
    b.sector_mut(s2).wall_tex = Some(metal);
    // leave one surface untextured so the wireframe fallback stays visible
    b.sector_mut(s4).ceil_tex = None;

    let level = b.build(bank.len())?;
    Ok(Demo {
        level,
        bank,
        spawn: vec3(10.0, 20.0, 6.0),
        spawn_yaw: 0.0,
        spawn_sector: s0,
    })
}
