//! Shared tuning constants for the furniture editor.

/// Proxy geometry and colours for each furniture type.
pub mod furniture;

/// Persistence key, snap grid and command step sizes.
pub mod layout;

/// Top-down 2D overlay transform and canvas dimensions.
pub mod projection;

/// Camera, lighting and floor settings for the 3D view.
pub mod render_settings;
