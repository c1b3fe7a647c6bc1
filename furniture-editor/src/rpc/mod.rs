//! JSON-RPC 2.0 bridge between the editor and its host page.
//!
//! On wasm builds the editor runs inside a page (usually an iframe) that
//! sends layout commands over `postMessage` and listens for notifications.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Editor (wasm)
//!        │                                          │
//!        ├─ Request (with ID) ────────────────────> │
//!        │                                          ├─ EditorCommand / read session
//!        │ <─────────────────── Response (with ID) ─┤
//!        │                                          │
//!        │ <──── layout_changed notification ───────┤
//! ```
//!
//! ## Methods
//!
//! | Method          | Params                              | Result                     |
//! |-----------------|-------------------------------------|----------------------------|
//! | `add_furniture` | `{type, x?, z?, rotationY?}`        | `{success, type}`          |
//! | `clear_layout`  | none                                | `{success}`                |
//! | `logout`        | none                                | `{success}`                |
//! | `get_layout`    | none                                | `[{type, x, z, rotationY}]`|
//!
//! `x` and `z` must be given together; without them the item is placed at a
//! random spot near the origin. An unknown `type` yields error `-32602` and
//! changes nothing.
//!
//! After every change that reaches storage the editor sends
//! `layout_changed {count}`.
//!
//! Native builds register the same systems but never receive messages.

/// Message types, listener and request dispatch.
pub mod web_rpc;
