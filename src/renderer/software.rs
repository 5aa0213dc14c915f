//! ---------------------------------------------------------------------------
//! Software (CPU) polygon renderer
//!
//! * Paints a compiled frame into any [`PixelSurface`].
//! * Compiled sectors are walked in **reverse** traversal order, so farther
//!   sectors are painted first and nearer ones overwrite them. No Z-buffer.
//! * Polygon kind decides the texture and sampling path: walls and steps
//!   interpolate U per column, floors and ceilings un-project per pixel.
//! ---------------------------------------------------------------------------

pub mod debug;
pub mod raster;
pub mod textured;

use crate::{
    config::RenderConfig,
    engine::{CompiledPolygon, CompiledPool, PolygonKind, Screen, Viewer},
    renderer::{
        DebugFlags, DebugView, HIGHLIGHT_COLOR, PixelSurface, RenderMode, Rgba, WIRE_COLOR,
    },
    world::{Camera, Level, Sector, TextureBank, TextureId},
};

use raster::PolygonRaster;

/// Flat-mode colour per polygon kind.
fn kind_color(kind: PolygonKind) -> Rgba {
    match kind {
        PolygonKind::Ceiling => 0xFF_60_70_90,
        PolygonKind::Floor => 0xFF_70_60_40,
        PolygonKind::Wall => 0xFF_B0_B0_B0,
        PolygonKind::UpperStep => 0xFF_C0_60_60,
        PolygonKind::LowerStep => 0xFF_60_C0_60,
    }
}

/// Texture to sample for `poly` and the world height its V spans.
///
/// Segment overrides win over sector textures. Steps fall back to the
/// neighbor's step texture before the owning sector's.
pub fn surface_texture(
    poly: &CompiledPolygon,
    sector: &Sector,
    level: &Level,
) -> (Option<TextureId>, f32) {
    let seg = sector.segments.get(poly.segment as usize);
    let nb = poly.neighbor.and_then(|n| level.sector(n));
    match poly.kind {
        PolygonKind::Ceiling => (sector.ceil_tex, 0.0),
        PolygonKind::Floor => (sector.floor_tex, 0.0),
        PolygonKind::Wall => (
            seg.and_then(|s| s.middle).or(sector.wall_tex),
            sector.ceil - sector.floor,
        ),
        PolygonKind::UpperStep => (
            seg.and_then(|s| s.upper)
                .or(nb.and_then(|n| n.upper_tex))
                .or(sector.upper_tex),
            nb.map_or(0.0, |n| sector.ceil - n.ceil),
        ),
        PolygonKind::LowerStep => (
            seg.and_then(|s| s.lower)
                .or(nb.and_then(|n| n.lower_tex))
                .or(sector.lower_tex),
            nb.map_or(0.0, |n| n.floor - sector.floor),
        ),
    }
}

/// Orchestrates one frame of rasterisation.
pub struct Software {
    raster: PolygonRaster,
    texture_scale: f32,
    pub view: DebugView,
}

impl Default for Software {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl Software {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            raster: PolygonRaster::default(),
            texture_scale: config.texture_scale,
            view: DebugView::default(),
        }
    }

    pub fn with_view(mut self, view: DebugView) -> Self {
        self.view = view;
        self
    }

    /// Paint `pool` (compiled for `camera`) into `surface`.
    ///
    /// The surface is not cleared; callers clear when they need to.
    pub fn render<S: PixelSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        camera: &Camera,
        level: &Level,
        bank: &TextureBank,
        pool: &CompiledPool,
    ) {
        let (w, h) = (surface.width(), surface.height());
        let view = Viewer::new(camera, Screen::new(w, h));

        for cs in pool.sectors().iter().rev() {
            if !self.view.shows(cs.sector) {
                continue;
            }
            let Some(sector) = level.sector(cs.sector) else {
                continue;
            };
            for poly in pool.polygons(cs) {
                if !self.raster.setup(poly.vertices(), w, h) {
                    continue;
                }
                self.draw_polygon(surface, &view, level, sector, bank, poly);
                self.draw_overlays(surface);
            }
        }

        let Some(hl) = self.view.highlight else {
            return;
        };
        for cs in pool.sectors().iter().filter(|cs| cs.sector == hl) {
            for poly in pool.polygons(cs) {
                if self.raster.setup(poly.vertices(), w, h) {
                    debug::draw_outline(&self.raster, surface, HIGHLIGHT_COLOR);
                }
            }
        }
    }

    fn draw_polygon<S: PixelSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        view: &Viewer,
        level: &Level,
        sector: &Sector,
        bank: &TextureBank,
        poly: &CompiledPolygon,
    ) {
        match self.view.mode {
            RenderMode::Textured => self.draw_textured(surface, view, level, sector, bank, poly),
            RenderMode::Flat => {
                textured::draw_flat(&mut self.raster, surface, poly, kind_color(poly.kind))
            }
            RenderMode::Wireframe => debug::draw_outline(&self.raster, surface, WIRE_COLOR),
            RenderMode::Points => debug::draw_points(&self.raster, surface, WIRE_COLOR),
            RenderMode::Bounds => debug::draw_bounds(&self.raster, surface, WIRE_COLOR),
        }
    }

    fn draw_textured<S: PixelSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        view: &Viewer,
        level: &Level,
        sector: &Sector,
        bank: &TextureBank,
        poly: &CompiledPolygon,
    ) {
        let (tex_id, v_range) = surface_texture(poly, sector, level);
        let Some(tex) = bank.resolve(tex_id) else {
            debug::draw_outline(&self.raster, surface, WIRE_COLOR);
            return;
        };
        let scale = self.texture_scale;
        let raster = &mut self.raster;
        match poly.kind {
            PolygonKind::Ceiling => {
                textured::draw_perspective_texture(raster, surface, view, tex, sector.ceil, scale)
            }
            PolygonKind::Floor => {
                textured::draw_perspective_texture(raster, surface, view, tex, sector.floor, scale)
            }
            PolygonKind::Wall | PolygonKind::UpperStep | PolygonKind::LowerStep => {
                textured::draw_texture(raster, surface, poly, tex, v_range, scale)
            }
        }
    }

    fn draw_overlays<S: PixelSurface + ?Sized>(&self, surface: &mut S) {
        let flags = self.view.flags;
        if flags.contains(DebugFlags::BOUNDS) {
            debug::draw_bounds(&self.raster, surface, 0xFF_00_80_FF);
        }
        if flags.contains(DebugFlags::WIREFRAME) {
            debug::draw_outline(&self.raster, surface, WIRE_COLOR);
        }
        if flags.contains(DebugFlags::POINTS) {
            debug::draw_points(&self.raster, surface, 0xFF_FF_40_40);
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
