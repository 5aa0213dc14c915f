// Format-agnostic repository of textures handed over by the asset provider.
// The compiler and the renderer interact through `TextureId` only.

use std::collections::HashMap;

use crate::renderer::{Rgba, pack_rgba};

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
///
/// Both sides are powers of two so sampling wraps with a mask instead of
/// a division, which is what makes floors and walls tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    w: usize,
    h: usize,
    pixels: Vec<Rgba>,
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    #[error("texture `{name}` is {w}x{h}, both sides must be powers of two")]
    NotPowerOfTwo { name: String, w: usize, h: usize },

    #[error("texture `{name}` expects {expected} pixels, got {got}")]
    PixelCount {
        name: String,
        expected: usize,
        got: usize,
    },
}

impl Texture {
    pub fn new<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        if !w.is_power_of_two() || !h.is_power_of_two() {
            return Err(TextureError::NotPowerOfTwo { name, w, h });
        }
        if pixels.len() != w * h {
            return Err(TextureError::PixelCount {
                name,
                expected: w * h,
                got: pixels.len(),
            });
        }
        Ok(Self { name, w, h, pixels })
    }

    /// Two-colour checkerboard with `cell`-sized squares on a `size`² grid.
    pub fn checker<S: Into<String>>(
        name: S,
        size: usize,
        cell: usize,
        a: Rgba,
        b: Rgba,
    ) -> Result<Self, TextureError> {
        let cell = cell.max(1);
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if ((x / cell) ^ (y / cell)) & 1 == 0 { a } else { b }
            })
            .collect();
        Self::new(name, size, size, pixels)
    }

    /// Brick-like pattern: mortar lines every `course` rows, staggered joints.
    pub fn bricks<S: Into<String>>(
        name: S,
        size: usize,
        brick: Rgba,
        mortar: Rgba,
    ) -> Result<Self, TextureError> {
        let course = (size / 4).max(2);
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                let row = y / course;
                let shift = if row & 1 == 0 { 0 } else { course };
                if y % course == 0 || (x + shift) % (course * 2) == 0 {
                    mortar
                } else {
                    brick
                }
            })
            .collect();
        Self::new(name, size, size, pixels)
    }

    /// Solid single colour (1×1).
    pub fn solid<S: Into<String>>(name: S, r: u8, g: u8, b: u8) -> Self {
        Self {
            name: name.into(),
            w: 1,
            h: 1,
            pixels: vec![pack_rgba(r, g, b, 0xFF)],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    /// Texel lookup with built-in wraparound (tiling, never clamping).
    #[inline(always)]
    pub fn sample(&self, x: i32, y: i32) -> Rgba {
        let u = (x & (self.w as i32 - 1)) as usize;
        let v = (y & (self.h as i32 - 1)) as usize;
        self.pixels[v * self.w + u]
    }
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about image files or on-disk caches, that's the
///   provider's job.
/// * Stores exactly one copy of every name.
#[derive(Default)]
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Obtain the id for a *loaded* texture by name.
    /// Returns `None` if the name is unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Resolve an optional handle; `None` for a null handle or a bad id.
    #[inline]
    pub fn resolve(&self, id: Option<TextureId>) -> Option<&Texture> {
        id.and_then(|id| self.texture(id).ok())
    }

    /// Insert a texture under its own name.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert(&mut self, tex: Texture) -> Result<TextureId, TextureError> {
        if self.by_name.contains_key(&tex.name) {
            return Err(TextureError::Duplicate(tex.name));
        }
        let id = self.data.len() as TextureId;
        self.by_name.insert(tex.name.clone(), id);
        self.data.push(tex);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(name: &str, color: Rgba) -> Texture {
        Texture::new(name, 2, 2, vec![color; 4]).unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::new();
        let red = bank.insert(dummy_tex("RED", 0xFF_FF0000)).unwrap();
        let blue = bank.insert(dummy_tex("BLUE", 0xFF_0000FF)).unwrap();

        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);

        assert_eq!(bank.texture(red).unwrap().sample(0, 0), 0xFF_FF0000);
        assert_eq!(bank.texture(blue).unwrap().sample(1, 1), 0xFF_0000FF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::new();
        bank.insert(dummy_tex("WOOD", 1)).unwrap();
        let err = bank.insert(dummy_tex("WOOD", 2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::new();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert!(bank.resolve(Some(bad)).is_none());
        assert!(bank.resolve(None).is_none());
    }

    #[test]
    fn non_power_of_two_rejected() {
        let err = Texture::new("ODD", 3, 4, vec![0; 12]).unwrap_err();
        assert!(matches!(err, TextureError::NotPowerOfTwo { w: 3, h: 4, .. }));
    }

    #[test]
    fn sampling_wraps_in_both_directions() {
        let tex = Texture::new("GRAD", 4, 2, (0..8).collect()).unwrap();
        assert_eq!(tex.sample(0, 0), 0);
        assert_eq!(tex.sample(4, 0), 0);
        assert_eq!(tex.sample(-1, 0), 3);
        assert_eq!(tex.sample(5, 3), 5);
        assert_eq!(tex.sample(-4, -2), 0);
    }
}
