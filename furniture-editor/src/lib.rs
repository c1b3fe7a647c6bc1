//! Browser and desktop furniture placement editor built on Bevy.
//!
//! Chairs and tables are placed on a floor plane, picked and dragged with the
//! pointer, rotated and deleted from the keyboard, mirrored into a top-down 2D
//! overlay and persisted to key/value storage after every committed change.

/// Camera, lighting and floor scaffolding for the 3D view.
pub mod engine;

/// JSON-RPC bridge to the host page (wasm) for layout commands.
pub mod rpc;

/// Runtime configuration assembled from the shared constants.
pub mod settings;

/// Interactive editing tools.
pub mod tools;

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::window::PresentMode;

use engine::EnginePlugin;
use rpc::web_rpc::WebRpcPlugin;
use settings::EditorSettings;
use tools::furniture::FurniturePlugin;

/// Create the editor application. Storage is chosen per platform by
/// [`FurniturePlugin`] unless a `LayoutStore` is inserted beforehand.
pub fn create_app() -> App {
    let mut app = App::new();
    app.add_plugins(create_default_plugins())
        .insert_resource(EditorSettings::default())
        .add_plugins(EnginePlugin)
        .add_plugins(FurniturePlugin)
        .add_plugins(WebRpcPlugin);

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            title: "Furniture Editor".into(),
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Furniture Editor".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
