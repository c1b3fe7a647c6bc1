//! Interactive editing tools.
//!
//! ## Furniture Tool
//!
//! The only tool in the editor. Items are added from the side panel (native)
//! or the host page over JSON-RPC (wasm), then manipulated directly in the 3D
//! view:
//!
//! ```text
//! Pointer down on item ─> select + begin drag (offset recorded)
//! Pointer move         ─> item follows floor intersection minus offset
//! Pointer up           ─> snap to grid, persist, clear selection
//! Delete               ─> remove selected item
//! R                    ─> rotate selected item by 45°
//! ```
//!
//! Every committed change is written to the layout store and redrawn in the
//! top-down overlay.

/// Furniture placement, manipulation, overlay and persistence.
pub mod furniture;
