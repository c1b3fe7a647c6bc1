/// Edge length of the chair cube proxy.
pub const CHAIR_CUBE_SIZE: f32 = 1.0;

/// Chair proxy colour as sRGB components in 0..1, red.
pub const CHAIR_COLOUR: [f32; 3] = [1.0, 0.0, 0.0];

/// Table cylinder radius.
pub const TABLE_RADIUS: f32 = 1.0;

/// Table cylinder height.
pub const TABLE_HEIGHT: f32 = 0.3;

/// Table proxy colour, blue.
pub const TABLE_COLOUR: [f32; 3] = [0.0, 0.0, 1.0];
