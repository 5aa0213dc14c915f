/// Tunables shared by the compiler and the software renderer.
///
/// Resource bounds (`queue_capacity`, `max_sectors`, `max_polygons`) fail
/// open: work past them is dropped, the frame still renders.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Camera-space depth of the near clipping plane.
    pub near_z: f32,
    /// Pending traversal items held by the circular queue.
    pub queue_capacity: usize,
    /// Compiled sectors per frame (one per dequeued item).
    pub max_sectors: usize,
    /// Compiled polygons per frame, across all compiled sectors.
    pub max_polygons: usize,
    /// Top/bottom of the initial full-screen clip window, in pixels.
    pub window_y_bound: f32,
    /// Texels per world unit, for both U/V on walls and world X/Y on flats.
    pub texture_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            near_z: 0.1,
            queue_capacity: 64,
            max_sectors: 256,
            max_polygons: 4096,
            window_y_bound: 1.0e5,
            texture_scale: 8.0,
        }
    }
}
