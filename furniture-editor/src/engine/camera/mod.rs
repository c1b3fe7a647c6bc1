//! Viewport camera for the furniture scene.
//!
//! A fixed perspective camera looking at the floor centre, plus the
//! screen-to-world ray casting the pointer controller picks with.

/// Camera spawn and the Bevy `RayCaster` implementation.
pub mod viewport_camera;
