use crate::{
    engine::{CompiledPolygon, Viewer},
    renderer::{PixelSurface, Rgba, pack_rgba, unpack_rgba},
    renderer::software::raster::PolygonRaster,
    world::Texture,
};

/// Scale each colour channel by `light`, truncating; alpha is kept.
#[inline(always)]
pub fn shade(c: Rgba, light: f32) -> Rgba {
    let [r, g, b, a] = unpack_rgba(c);
    let l = light.clamp(0.0, 1.0);
    pack_rgba(
        (r as f32 * l) as u8,
        (g as f32 * l) as u8,
        (b as f32 * l) as u8,
        a,
    )
}

/// Walls and steps: perspective-correct U per column, linear V per row.
///
/// `v_range` is the world height the unclipped surface spans; V runs from 0
/// at its top edge to `v_range` at its bottom edge, so clipping by a portal
/// window never shifts the texture.
pub fn draw_texture<S: PixelSurface + ?Sized>(
    raster: &mut PolygonRaster,
    surface: &mut S,
    poly: &CompiledPolygon,
    tex: &Texture,
    v_range: f32,
    texture_scale: f32,
) {
    raster.spans(|x, y0, y1| {
        let fx = x as f32 + 0.5;
        let tu = (poly.proj.u_at(fx) * texture_scale).floor() as i32;
        let light = poly.light_at(fx);
        let (top, bottom) = poly.edges_at(fx);
        let height = bottom - top;
        if height <= f32::EPSILON {
            return;
        }
        let dv = v_range * texture_scale / height;
        let mut v = (y0 as f32 + 0.5 - top) * dv;
        for y in y0..y1 {
            let texel = tex.sample(tu, v.floor() as i32);
            surface.put(x as usize, y as usize, shade(texel, light));
            v += dv;
        }
    });
}

/// Floors and ceilings: every pixel is un-projected onto the plane at
/// world height `plane_h` and the world X-Y picks the texel.
pub fn draw_perspective_texture<S: PixelSurface + ?Sized>(
    raster: &mut PolygonRaster,
    surface: &mut S,
    view: &Viewer,
    tex: &Texture,
    plane_h: f32,
    texture_scale: f32,
) {
    raster.spans(|x, y0, y1| {
        let fx = x as f32 + 0.5;
        for y in y0..y1 {
            // rows on the far side of the horizon never meet the plane
            let Some(z) = view.plane_depth(plane_h, y as f32 + 0.5) else {
                continue;
            };
            let w = view.unproject(fx, z) * texture_scale;
            let texel = tex.sample(w.x.floor() as i32, w.y.floor() as i32);
            surface.put(x as usize, y as usize, shade(texel, view.light(z)));
        }
    });
}

/// One colour for the whole polygon, lit per column.
pub fn draw_flat<S: PixelSurface + ?Sized>(
    raster: &mut PolygonRaster,
    surface: &mut S,
    poly: &CompiledPolygon,
    color: Rgba,
) {
    raster.spans(|x, y0, y1| {
        let c = shade(color, poly.light_at(x as f32 + 0.5));
        for y in y0..y1 {
            surface.put(x as usize, y as usize, c);
        }
    });
}
