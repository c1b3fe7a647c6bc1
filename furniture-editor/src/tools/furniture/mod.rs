//! Furniture placement and manipulation.
//!
//! Chairs and tables live in an [`EditorSession`] resource: the registry of
//! placed items plus the current selection and drag. Each item owns one Bevy
//! entity as its visual proxy, tagged with a [`FurnitureProxy`] back-reference.
//!
//! ## Change Flow
//!
//! ```text
//! pointer / keyboard / EditorCommand
//!   └─> EditorSession mutated
//!         └─> LayoutChanged event
//!               ├─> sync_proxy_transforms  (3D proxies follow items)
//!               ├─> persist_layout         (Commit only)
//!               ├─> redraw_overlay         (top-down 2D view)
//!               └─> rpc notification       (wasm host page)
//! ```
//!
//! Loading a catalog override fires `RebuildProxiesEvent`, which respawns every
//! proxy with the new geometry and colours.

/// Furniture types and the proxy descriptor table.
pub mod catalog;

/// Add, clear and logout commands plus layout restore/persist systems.
pub mod commands;

/// Pointer picking, dragging and grid snapping.
pub mod interaction;

/// Side panel button handlers (native only).
pub mod interactions;

/// Delete and rotate commands for the selected item.
pub mod keyboard;

/// Top-down 2D overlay drawing.
pub mod projection;

/// Bevy entities backing each placed item.
pub mod proxy;

/// Ray tests against the floor and proxy shapes.
pub mod ray;

/// Session registry, selection and drag state.
pub mod state;

/// Layout persistence over key/value storage.
pub mod store;

/// Side panel spawning and status display (native only).
pub mod ui;

use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

pub use state::{EditorSession, FurnitureProxy, LayoutChanged, RebuildProxiesEvent};

use catalog::{CatalogFile, CatalogLoader, FurnitureCatalog, load_catalog_override};
use commands::{EditorCommand, apply_editor_commands, persist_layout, restore_layout};
use interaction::handle_pointer_input;
use keyboard::handle_keyboard_commands;
use projection::{OverlayCanvas, redraw_overlay, spawn_overlay};
use proxy::{ProxyAssets, rebuild_proxies_on_event, sync_proxy_transforms};
use store::LayoutStore;

use crate::settings::EditorSettings;

pub struct FurniturePlugin;

impl Plugin for FurniturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorSettings>();
        if !app.world().contains_resource::<LayoutStore>() {
            let store = LayoutStore::platform_default(app.world().resource::<EditorSettings>());
            app.insert_resource(store);
        }
        let canvas = OverlayCanvas::from_settings(&app.world().resource::<EditorSettings>().projection);

        app.add_plugins(JsonAssetPlugin::<CatalogFile>::new(&["catalog.json"]))
            .insert_resource(canvas)
            .init_resource::<EditorSession>()
            .init_resource::<FurnitureCatalog>()
            .init_resource::<CatalogLoader>()
            .init_resource::<ProxyAssets>()
            .add_event::<LayoutChanged>()
            .add_event::<RebuildProxiesEvent>()
            .add_event::<EditorCommand>()
            .add_systems(Startup, (spawn_overlay, restore_layout))
            .add_systems(
                Update,
                (
                    handle_pointer_input,
                    handle_keyboard_commands,
                    apply_editor_commands,
                    load_catalog_override,
                    rebuild_proxies_on_event,
                    sync_proxy_transforms,
                    persist_layout,
                    redraw_overlay,
                )
                    .chain(),
            );

        // Side panel only for native builds; the host page drives wasm builds.
        #[cfg(not(target_arch = "wasm32"))]
        {
            use interactions::{collapse_button_interaction, panel_button_interaction};
            use ui::{PanelState, apply_collapse_state, reflect_status_label, spawn_editor_panel};

            app.init_resource::<PanelState>()
                .add_systems(Startup, spawn_editor_panel)
                .add_systems(
                    Update,
                    (
                        collapse_button_interaction,
                        apply_collapse_state,
                        panel_button_interaction.before(apply_editor_commands),
                        reflect_status_label.after(apply_editor_commands),
                    ),
                );
        }
    }
}
