//! Pixel targets and view settings for the software back-end.
//!
//! *The compiler never touches a pixel.* It fills a
//! [`CompiledPool`](crate::engine::CompiledPool) which
//! [`software::Software`] paints into anything implementing
//! [`PixelSurface`].
//!
//! * [`FrameBuffer`] is the stock surface: a `Vec<u32>` in **0xAARRGGBB**
//!   that hands itself to the window layer through [`FrameBuffer::present`].
//! * [`DebugView`] selects a render mode, overlay flags and an optional
//!   sector to highlight.

use bitflags::bitflags;

use crate::world::SectorId;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Background of a freshly cleared frame (dark grey).
pub const CLEAR_COLOR: Rgba = 0xFF_20_20_20;
/// Outline colour of the highlighted sector.
pub const HIGHLIGHT_COLOR: Rgba = 0xFF_FF_E0_00;
/// Outline colour for wireframe views and missing textures.
pub const WIRE_COLOR: Rgba = 0xFF_E0_E0_E0;

#[inline(always)]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// `[r, g, b, a]`
#[inline(always)]
pub const fn unpack_rgba(c: Rgba) -> [u8; 4] {
    [(c >> 16) as u8, (c >> 8) as u8, c as u8, (c >> 24) as u8]
}

/// Write-only pixel target of known size.
pub trait PixelSurface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Coordinates outside the surface are ignored.
    fn set_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8, a: u8);

    #[inline]
    fn put(&mut self, x: usize, y: usize, c: Rgba) {
        let [r, g, b, a] = unpack_rgba(c);
        self.set_pixel(x, y, r, g, b, a);
    }
}

/// CPU frame-buffer owned by the caller across frames.
pub struct FrameBuffer {
    pixels: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![CLEAR_COLOR; width * height],
            width,
            height,
        }
    }

    /// (Re)allocate only if the resolution changed.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels.resize(width * height, CLEAR_COLOR);
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// **Loan** the finished frame to `submit(&[Rgba], w, h)`.
    ///
    /// The window layer typically passes
    /// `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    pub fn present<F, R>(&self, submit: F) -> R
    where
        F: FnOnce(&[Rgba], usize, usize) -> R,
    {
        submit(&self.pixels, self.width, self.height)
    }
}

impl PixelSurface for FrameBuffer {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8, a: u8) {
        self.put(x, y, pack_rgba(r, g, b, a));
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, c: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = c;
        }
    }
}

/// How compiled polygons are painted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    #[default]
    Textured,
    /// One shaded colour per polygon kind.
    Flat,
    Wireframe,
    Points,
    /// Clamped bounding rectangle of every polygon.
    Bounds,
}

impl RenderMode {
    pub fn next(self) -> Self {
        match self {
            RenderMode::Textured => RenderMode::Flat,
            RenderMode::Flat => RenderMode::Wireframe,
            RenderMode::Wireframe => RenderMode::Points,
            RenderMode::Points => RenderMode::Bounds,
            RenderMode::Bounds => RenderMode::Textured,
        }
    }
}

bitflags! {
    /// Overlays drawn on top of the selected [`RenderMode`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DebugFlags: u8 {
        const WIREFRAME = 1 << 0;
        const POINTS    = 1 << 1;
        const BOUNDS    = 1 << 2;
        /// Paint only the highlighted sector.
        const ISOLATE   = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebugView {
    pub mode: RenderMode,
    pub flags: DebugFlags,
    pub highlight: Option<SectorId>,
}

impl DebugView {
    /// Step the highlight through `None, 0, 1, …, sector_count - 1, None`.
    pub fn highlight_next(&mut self, sector_count: usize) {
        self.highlight = match self.highlight {
            None if sector_count > 0 => Some(0),
            Some(s) if (s as usize) + 1 < sector_count => Some(s + 1),
            _ => None,
        };
    }

    /// Whether polygons of `sector` are painted at all.
    #[inline]
    pub fn shows(&self, sector: SectorId) -> bool {
        !self.flags.contains(DebugFlags::ISOLATE) || self.highlight.is_none_or(|h| h == sector)
    }
}

pub mod software;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_agree() {
        let c = pack_rgba(0x12, 0x34, 0x56, 0xFF);
        assert_eq!(c, 0xFF_12_34_56);
        assert_eq!(unpack_rgba(c), [0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn framebuffer_ignores_out_of_range_writes() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.set_pixel(1, 2, 0xFF, 0, 0, 0xFF);
        fb.put(4, 0, 0xFF_00_FF_00);
        fb.put(0, 3, 0xFF_00_FF_00);
        assert_eq!(fb.pixel(1, 2), Some(0xFF_FF_00_00));
        assert_eq!(fb.pixels().iter().filter(|&&p| p != CLEAR_COLOR).count(), 1);
        let len = fb.present(|px, w, h| {
            assert_eq!((w, h), (4, 3));
            px.len()
        });
        assert_eq!(len, 12);
    }

    #[test]
    fn highlight_cycles_through_sectors() {
        let mut v = DebugView::default();
        v.highlight_next(2);
        assert_eq!(v.highlight, Some(0));
        v.highlight_next(2);
        assert_eq!(v.highlight, Some(1));
        v.highlight_next(2);
        assert_eq!(v.highlight, None);
    }

    #[test]
    fn isolate_hides_other_sectors() {
        let mut v = DebugView {
            highlight: Some(3),
            ..DebugView::default()
        };
        assert!(v.shows(1));
        v.flags |= DebugFlags::ISOLATE;
        assert!(!v.shows(1));
        assert!(v.shows(3));
        assert_eq!(RenderMode::Bounds.next(), RenderMode::Textured);
    }
}
