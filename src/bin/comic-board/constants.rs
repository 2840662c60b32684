/// Width of the artwork sidebar in pixels.
pub const SIDEBAR_WIDTH: f32 = 220.0;

/// Longest edge of a sidebar thumbnail in pixels.
pub const THUMBNAIL_SIZE: f32 = 96.0;

/// Width multiplier applied per wheel step when zooming placed artwork.
pub const ZOOM_STEP: f32 = 1.1;

/// Minimum sliver of placed artwork that must stay inside its panel, in
/// screen pixels. Artwork may be dragged mostly out of view, but never
/// further than this.
pub const EDGE_MARGIN: f32 = 20.0;

/// Filename of the composed page written to the output directory.
pub const OUTPUT_FILENAME: &str = "planche.png";

/// Change in displayed scale that forces the drop zones to be rebuilt.
pub const SCALE_REBUILD_EPSILON: f32 = 1e-4;
