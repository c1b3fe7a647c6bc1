use std::f32::consts::FRAC_PI_4;

/// Storage key holding the serialised layout.
pub const LAYOUT_STORAGE_KEY: &str = "furniture3d";

/// Directory used for key/value files on native builds.
pub const NATIVE_STORAGE_DIR: &str = ".furniture-editor";

/// Grid cell size that dropped items snap to.
pub const SNAP_STEP: f32 = 1.0;

/// Rotation applied per rotate command (45 degrees).
pub const ROTATE_STEP: f32 = FRAC_PI_4;

/// New items without an explicit position land in [-SPAWN_EXTENT, SPAWN_EXTENT) on x and z.
pub const SPAWN_EXTENT: f32 = 5.0;

/// Optional catalog override asset, relative to the asset root.
pub const CATALOG_ASSET_PATH: &str = "furniture.catalog.json";

/// Page the browser build navigates to after logout.
pub const LOGIN_PAGE: &str = "login.html";
