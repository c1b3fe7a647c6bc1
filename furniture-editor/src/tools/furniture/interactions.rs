use bevy::prelude::*;

use super::commands::EditorCommand;
use super::ui::{CollapseButton, PanelButton, PanelState};

// Chevron toggles the panel between open and collapsed
pub fn collapse_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<CollapseButton>)>,
    mut state: ResMut<PanelState>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                state.collapsed = !state.collapsed;
                *bg = BackgroundColor(Color::srgb(0.18, 0.20, 0.24));
            }
            Interaction::Hovered => *bg = BackgroundColor(Color::srgb(0.26, 0.28, 0.32)),
            Interaction::None => *bg = BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
        }
    }
}

impl PanelButton {
    pub fn command(self) -> EditorCommand {
        match self {
            Self::AddChair => EditorCommand::add("chair"),
            Self::AddTable => EditorCommand::add("table"),
            Self::ClearLayout => EditorCommand::ClearLayout,
            Self::Logout => EditorCommand::Logout,
        }
    }
}

// Each press issues the button's editor command
pub fn panel_button_interaction(
    mut q: Query<(&Interaction, &PanelButton, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
    mut commands: EventWriter<EditorCommand>,
) {
    for (interaction, button, mut bg) in &mut q {
        let [idle, hovered, pressed] = button.palette();
        match *interaction {
            Interaction::Pressed => {
                commands.write(button.command());
                *bg = BackgroundColor(pressed);
            }
            Interaction::Hovered => *bg = BackgroundColor(hovered),
            Interaction::None => *bg = BackgroundColor(idle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_buttons_spawn_at_random_positions() {
        assert_eq!(
            PanelButton::AddTable.command(),
            EditorCommand::Add {
                tag: "table".to_string(),
                position: None,
                rotation_y: 0.0,
            }
        );
        assert_eq!(PanelButton::Logout.command(), EditorCommand::Logout);
    }
}
