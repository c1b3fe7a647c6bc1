//! Static scene content around the furniture.

/// Floor plane with snap grid lines.
///
/// One line per grid step across the floor, lifted just above it.
pub mod floor;

/// Ambient and directional lighting, and the clear colour.
pub mod lighting;
