//! Interactive viewer for the built-in demo level.
//!
//! ```bash
//! cargo run --release -- --width 960 --height 600 --mode wireframe
//! ```
//!
//! | key            | action                                 |
//! |----------------|----------------------------------------|
//! | W/S, ↑/↓       | move                                   |
//! | A/D            | strafe                                 |
//! | ←/→            | turn                                   |
//! | PgUp/PgDn      | look up/down                           |
//! | M              | next render mode                       |
//! | H              | highlight next sector                  |
//! | F1 … F4        | wireframe / points / bounds / isolate  |

use clap::Parser;
use log::{info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use simplelog::TermLogger;
use std::time::{Duration, Instant};

use portal_rs::{
    RenderConfig,
    engine::Compiler,
    renderer::{CLEAR_COLOR, DebugFlags, DebugView, FrameBuffer, RenderMode, software::Software},
    world::{Camera, Level, demo},
};

const EYE_HEIGHT: f32 = 6.0;
const MOVE_SPEED: f32 = 0.5;
const TURN_SPEED: f32 = 0.05;
const LOOK_SPEED: f32 = 0.02;

#[derive(Parser, Debug)]
#[command(version, about = "Portal sector renderer demo")]
struct Args {
    #[arg(long, default_value_t = 960)]
    width: usize,
    #[arg(long, default_value_t = 600)]
    height: usize,
    /// Horizontal field of view in degrees.
    #[arg(long, default_value_t = 90.0)]
    fov: f32,
    /// Light falloff per world unit of depth.
    #[arg(long, default_value_t = 0.008)]
    light_distance: f32,
    /// off, error, warn, info, debug or trace.
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: log::LevelFilter,
    #[arg(long, value_enum, default_value_t = RenderMode::Textured)]
    mode: RenderMode,
}

fn parse_level(s: &str) -> Result<log::LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level '{s}'"))
}

/// Move the camera unless that would leave every sector.
fn try_move(camera: &mut Camera, level: &Level, forward: f32, side: f32) {
    let before = camera.pos();
    camera.step(forward, side);
    match level.sector_at(camera.pos().truncate(), Some(camera.sector())) {
        Some(s) => {
            camera.set_sector(s);
            if let Some(sector) = level.sector(s) {
                let mut pos = camera.pos();
                pos.z = sector.floor + EYE_HEIGHT;
                camera.set_pos(pos);
            }
        }
        None => camera.set_pos(before),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    TermLogger::init(
        args.log_level,
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let demo = demo::build()?;
    info!(
        "level {}: {} sectors, {} textures",
        demo.level.name,
        demo.level.sectors.len(),
        demo.bank.len()
    );

    let (w, h) = (args.width, args.height);
    let config = RenderConfig::default();
    let mut camera = demo
        .camera(args.fov.to_radians())
        .with_light_distance(args.light_distance);
    let mut compiler = Compiler::new(config.clone(), w, h);
    let mut renderer = Software::new(&config).with_view(DebugView {
        mode: args.mode,
        ..DebugView::default()
    });
    let mut fb = FrameBuffer::new(w, h);

    let mut win = Window::new("portal_rs", w, h, WindowOptions::default())?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* movement --------------------------------------------------------- */
        let mut forward = 0.0;
        let mut side = 0.0;
        if win.is_key_down(Key::W) || win.is_key_down(Key::Up) {
            forward += MOVE_SPEED;
        }
        if win.is_key_down(Key::S) || win.is_key_down(Key::Down) {
            forward -= MOVE_SPEED;
        }
        if win.is_key_down(Key::A) {
            side -= MOVE_SPEED;
        }
        if win.is_key_down(Key::D) {
            side += MOVE_SPEED;
        }
        if forward != 0.0 || side != 0.0 {
            try_move(&mut camera, &demo.level, forward, side);
        }
        if win.is_key_down(Key::Left) {
            camera.turn(TURN_SPEED);
        }
        if win.is_key_down(Key::Right) {
            camera.turn(-TURN_SPEED);
        }
        if win.is_key_down(Key::PageUp) {
            camera.look(LOOK_SPEED);
        }
        if win.is_key_down(Key::PageDown) {
            camera.look(-LOOK_SPEED);
        }

        /* debug toggles ---------------------------------------------------- */
        let view = &mut renderer.view;
        if win.is_key_pressed(Key::M, KeyRepeat::No) {
            view.mode = view.mode.next();
            info!("render mode {:?}", view.mode);
        }
        if win.is_key_pressed(Key::H, KeyRepeat::No) {
            view.highlight_next(demo.level.sectors.len());
            info!("highlight {:?}", view.highlight);
        }
        for (key, flag) in [
            (Key::F1, DebugFlags::WIREFRAME),
            (Key::F2, DebugFlags::POINTS),
            (Key::F3, DebugFlags::BOUNDS),
            (Key::F4, DebugFlags::ISOLATE),
        ] {
            if win.is_key_pressed(key, KeyRepeat::No) {
                view.flags.toggle(flag);
                info!("debug flags {:?}", view.flags);
            }
        }

        /* draw ------------------------------------------------------------- */
        fb.clear(CLEAR_COLOR);
        let pool = compiler.compile(&demo.level, &camera);
        renderer.render(&mut fb, &camera, &demo.level, &demo.bank, pool);
        acc_time += t0.elapsed();
        acc_frames += 1;
        fb.present(|px, w, h| win.update_with_buffer(px, w, h))?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            let stats = compiler.stats();
            info!(
                "avg frame {avg_ms:.2} ms, sector {}, {} sectors / {} polygons compiled",
                camera.sector(),
                stats.sectors,
                stats.polygons
            );
            if stats.dropped_queue_full > 0 || stats.pool_exhausted {
                warn!("frame budget exceeded: {stats:?}");
            }
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
