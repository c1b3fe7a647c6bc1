use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use super::state::{EditorSession, LayoutChanged, PlacedItem, SceneGraph};
use super::proxy::ProxySpawner;
use crate::settings::EditorSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Delete,
    Rotate,
}

impl KeyCommand {
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Delete => Some(Self::Delete),
            Key::Character(text) if text.as_str() == "r" || text.as_str() == "R" => Some(Self::Rotate),
            _ => None,
        }
    }
}

impl EditorSession {
    /// Remove the selected item. `None` when nothing is selected.
    pub fn delete_selected(&mut self, scene: &mut impl SceneGraph) -> Option<PlacedItem> {
        let id = self.selection?;
        let item = *self.registry.get(id)?;
        self.remove(id, scene);
        Some(item)
    }

    /// Add `step` radians to the selected item's rotation, returning the new angle.
    pub fn rotate_selected(&mut self, step: f32) -> Option<f32> {
        let id = self.selection?;
        let item = self.registry.get_mut(id)?;
        item.rotation_y += step;
        Some(item.rotation_y)
    }
}

pub fn handle_keyboard_commands(
    mut keys: EventReader<KeyboardInput>,
    settings: Res<EditorSettings>,
    mut session: ResMut<EditorSession>,
    mut scene: ProxySpawner,
    mut changes: EventWriter<LayoutChanged>,
) {
    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        let Some(command) = KeyCommand::from_key(&event.logical_key) else {
            continue;
        };

        match command {
            KeyCommand::Delete => {
                if let Some(item) = session.delete_selected(&mut scene) {
                    info!("Deleted {} at ({}, {})", item.furniture_type, item.position.x, item.position.y);
                    changes.write(LayoutChanged::Commit);
                }
            }
            KeyCommand::Rotate => {
                if session.rotate_selected(settings.rotate_step).is_some() {
                    changes.write(LayoutChanged::Commit);
                }
            }
        }
    }
}
