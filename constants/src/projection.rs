/// World units added to x and z before scaling, so that the floor's
/// [-10, 10] range lands on positive pixels.
pub const WORLD_OFFSET: f32 = 10.0;

/// Pixels per world unit along x.
pub const SCALE_X: f32 = 20.0;

/// Pixels per world unit along z.
pub const SCALE_Y: f32 = 15.0;

/// Half the side length of a chair marker, in pixels.
pub const CHAIR_MARKER_HALF_SIZE: f32 = 10.0;

/// Radius of a table marker, in pixels.
pub const TABLE_MARKER_RADIUS: f32 = 10.0;

/// Overlay canvas width; covers the full floor at SCALE_X.
pub const CANVAS_WIDTH: u32 = 400;

/// Overlay canvas height; covers the full floor at SCALE_Y.
pub const CANVAS_HEIGHT: u32 = 300;

/// Background the overlay is cleared to (RGBA, 0..255).
pub const CANVAS_BACKGROUND: [u8; 4] = [255, 255, 255, 200];

/// Element id of the page canvas mirrored on wasm builds.
pub const PAGE_CANVAS_ID: &str = "canvas2d";
