use std::path::PathBuf;

use bevy::prelude::*;
use constants::layout::{
    CATALOG_ASSET_PATH, LAYOUT_STORAGE_KEY, LOGIN_PAGE, NATIVE_STORAGE_DIR, ROTATE_STEP,
    SNAP_STEP, SPAWN_EXTENT,
};

use crate::tools::furniture::projection::ProjectionSettings;

/// Editor configuration shared by every system.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EditorSettings {
    /// Key the layout is persisted under.
    pub storage_key: String,
    /// Directory holding key/value files on native builds.
    pub storage_dir: PathBuf,
    /// Grid cell size dropped items snap to. Non-positive disables snapping.
    pub snap_step: f32,
    /// Radians added by one rotate command.
    pub rotate_step: f32,
    pub spawn_extent: f32,
    pub projection: ProjectionSettings,
    /// Optional catalog override asset.
    pub catalog_path: String,
    pub login_page: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            storage_key: LAYOUT_STORAGE_KEY.to_string(),
            storage_dir: PathBuf::from(NATIVE_STORAGE_DIR),
            snap_step: SNAP_STEP,
            rotate_step: ROTATE_STEP,
            spawn_extent: SPAWN_EXTENT,
            projection: ProjectionSettings::default(),
            catalog_path: CATALOG_ASSET_PATH.to_string(),
            login_page: LOGIN_PAGE.to_string(),
        }
    }
}
