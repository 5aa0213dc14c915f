use glam::{Vec2, vec2};
use proptest::prelude::*;
use std::f32::consts::{FRAC_PI_2, TAU};

use portal_rs::{
    RenderConfig,
    engine::{CompiledPool, Compiler},
    world::{Camera, Level, LevelBuilder, SectorId},
};

const CELL: f32 = 10.0;
const W: usize = 160;
const H: usize = 120;

/// `nx × ny` square cells, row major, each with its own floor and ceiling.
fn grid(nx: usize, ny: usize, heights: &[(u8, u8)]) -> Level {
    let mut b = LevelBuilder::new("grid");
    for j in 0..ny {
        for i in 0..nx {
            let (x0, y0) = (i as f32 * CELL, j as f32 * CELL);
            let (floor, extra) = heights[j * nx + i];
            let floor = floor as f32;
            b.sector(
                &[
                    vec2(x0, y0),
                    vec2(x0 + CELL, y0),
                    vec2(x0 + CELL, y0 + CELL),
                    vec2(x0, y0 + CELL),
                ],
                floor,
                floor + 6.0 + extra as f32,
            );
        }
    }
    b.build(0).unwrap()
}

fn scene() -> impl Strategy<Value = (usize, usize, Vec<(u8, u8)>, usize, Vec2, f32, f32)> {
    (
        2usize..5,
        2usize..5,
        prop::collection::vec((0u8..4, 0u8..10), 16),
        0usize..16,
        (0.1f32..0.9, 0.1f32..0.9),
        0.0f32..TAU,
        -0.3f32..0.3,
    )
        .prop_map(|(nx, ny, h, cell, (ox, oy), yaw, look)| {
            (nx, ny, h, cell % (nx * ny), vec2(ox, oy), yaw, look)
        })
}

fn compile(
    nx: usize,
    ny: usize,
    heights: &[(u8, u8)],
    cell: usize,
    offset: Vec2,
    yaw: f32,
    look: f32,
) -> (Level, Compiler) {
    let level = grid(nx, ny, heights);
    let origin = vec2((cell % nx) as f32, (cell / nx) as f32) * CELL;
    let floor = level.sectors[cell].floor;
    let mut cam = Camera::new(
        (origin + offset * CELL).extend(floor + 3.0),
        yaw,
        FRAC_PI_2,
        cell as SectorId,
    );
    cam.look(look);
    let mut c = Compiler::new(RenderConfig::default(), W, H);
    c.compile(&level, &cam);
    (level, c)
}

fn overlap(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[1].min(b[1]) - a[0].max(b[0])
}

fn assert_disjoint_spans(pool: &CompiledPool) -> Result<(), TestCaseError> {
    // per sector, across every window it was compiled through this frame
    let polys = pool.all_polygons();
    for (i, a) in polys.iter().enumerate() {
        for b in &polys[i + 1..] {
            if a.sector == b.sector && a.kind == b.kind {
                prop_assert!(
                    overlap(a.span, b.span) <= 1e-3,
                    "{:?} spans {:?} and {:?} overlap in sector {}",
                    a.kind,
                    a.span,
                    b.span,
                    a.sector
                );
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn traversal_terminates_within_bounds((nx, ny, h, cell, off, yaw, look) in scene()) {
        let (_, c) = compile(nx, ny, &h, cell, off, yaw, look);
        let pool = c.pool();
        let stats = c.stats();
        prop_assert!(pool.sectors().len() <= c.config().max_sectors);
        prop_assert_eq!(stats.sectors, pool.sectors().len());
        prop_assert_eq!(stats.polygons, pool.all_polygons().len());
        prop_assert_eq!(pool.sectors()[0].sector as usize, cell);
        prop_assert!(stats.reentered < stats.sectors);
        prop_assert!(pool.sectors()[0].via.is_none());
    }

    #[test]
    fn same_kind_polygons_never_share_columns((nx, ny, h, cell, off, yaw, look) in scene()) {
        let (_, c) = compile(nx, ny, &h, cell, off, yaw, look);
        assert_disjoint_spans(c.pool())?;
    }

    #[test]
    fn later_windows_are_never_inside_earlier_ones((nx, ny, h, cell, off, yaw, look) in scene()) {
        let (_, c) = compile(nx, ny, &h, cell, off, yaw, look);
        let sectors = c.pool().sectors();
        for (i, a) in sectors.iter().enumerate() {
            for b in &sectors[i + 1..] {
                if a.sector != b.sector {
                    continue;
                }
                let (wa, wb) = (a.window, b.window);
                prop_assert!(
                    !(wa.x1 <= wb.x1 && wb.x2 <= wa.x2),
                    "sector {} re-entered inside an earlier window", a.sector
                );
            }
        }
    }

    #[test]
    fn polygons_stay_inside_their_window((nx, ny, h, cell, off, yaw, look) in scene()) {
        let (level, c) = compile(nx, ny, &h, cell, off, yaw, look);
        let pool = c.pool();
        for cs in pool.sectors() {
            prop_assert!((cs.sector as usize) < level.sectors.len());
            for poly in pool.polygons(cs) {
                prop_assert!(poly.vertices().len() >= 3);
                prop_assert_eq!(poly.sector, cs.sector);
                for v in poly.vertices() {
                    prop_assert!(v.x >= cs.window.x1 - 1e-2 && v.x <= cs.window.x2 + 1e-2);
                    prop_assert!(v.z >= c.config().near_z - 1e-4);
                }
            }
        }
    }
}
