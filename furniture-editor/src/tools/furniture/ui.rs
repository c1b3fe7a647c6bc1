use bevy::prelude::*;

use super::state::EditorSession;

#[derive(Resource)]
pub struct PanelState {
    pub collapsed: bool,
    pub open_width: f32,
    pub closed_width: f32,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            collapsed: false,
            open_width: 220.0,
            closed_width: 32.0,
        }
    }
}

#[derive(Component)]
pub struct PanelRoot;
#[derive(Component)]
pub struct PanelBody;
#[derive(Component)]
pub struct HeaderNode;
#[derive(Component)]
pub struct TitleText;
#[derive(Component)]
pub struct CollapseButton;
#[derive(Component)]
pub struct CollapseLabel;
#[derive(Component)]
pub struct StatusLabel;

/// Command buttons in the panel body.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelButton {
    AddChair,
    AddTable,
    ClearLayout,
    Logout,
}

impl PanelButton {
    pub const ALL: [Self; 4] = [Self::AddChair, Self::AddTable, Self::ClearLayout, Self::Logout];

    pub fn label(self) -> &'static str {
        match self {
            Self::AddChair => "Add Chair",
            Self::AddTable => "Add Table",
            Self::ClearLayout => "Clear Layout",
            Self::Logout => "Log Out",
        }
    }

    /// Idle, hovered and pressed background colours.
    pub fn palette(self) -> [Color; 3] {
        match self {
            Self::AddChair | Self::AddTable => [
                Color::srgb(0.22, 0.24, 0.28),
                Color::srgb(0.26, 0.28, 0.32),
                Color::srgb(0.18, 0.20, 0.24),
            ],
            Self::ClearLayout | Self::Logout => [
                Color::srgb(0.28, 0.10, 0.10),
                Color::srgb(0.34, 0.14, 0.14),
                Color::srgb(0.20, 0.12, 0.12),
            ],
        }
    }
}

// Side panel with a collapsible header, command buttons and a status line
pub fn spawn_editor_panel(mut commands: Commands, state: Res<PanelState>) {
    let width = if state.collapsed { state.closed_width } else { state.open_width };
    let body_display = if state.collapsed { Display::None } else { Display::Flex };

    commands
        .spawn((
            PanelRoot,
            Interaction::default(),
            Name::new("EditorPanel"),
            BackgroundColor(Color::srgb(0.10, 0.11, 0.13)),
            Node {
                width: Val::Px(width),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Stretch,
                overflow: Overflow::clip(),
                ..default()
            },
        ))
        .with_children(|parent| {
            let (pad, btn) = if state.collapsed { (4.0, 24.0) } else { (12.0, 28.0) };

            parent
                .spawn((
                    HeaderNode,
                    Name::new("Header"),
                    BackgroundColor(Color::srgb(0.14, 0.16, 0.20)),
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::all(Val::Px(pad)),
                        align_items: AlignItems::Center,
                        justify_content: if state.collapsed { JustifyContent::FlexEnd } else { JustifyContent::SpaceBetween },
                        ..default()
                    },
                ))
                .with_children(|header| {
                    header.spawn((
                        TitleText,
                        Name::new("Title"),
                        Text::new("Furniture"),
                        TextFont { font_size: 18.0, ..default() },
                        TextColor(Color::WHITE),
                        Node { display: body_display, ..default() },
                    ));

                    header
                        .spawn((
                            CollapseButton,
                            Name::new("CollapseButton"),
                            Button,
                            BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
                            BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                            Node {
                                width: Val::Px(btn),
                                height: Val::Px(btn),
                                align_items: AlignItems::Center,
                                justify_content: JustifyContent::Center,
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                        ))
                        .with_children(|chevron| {
                            chevron.spawn((
                                CollapseLabel,
                                Text::new(if state.collapsed { "<" } else { ">" }),
                                TextFont { font_size: 18.0, ..default() },
                                TextColor(Color::WHITE),
                            ));
                        });
                });

            parent
                .spawn((
                    PanelBody,
                    Name::new("Body"),
                    BackgroundColor(Color::srgb(0.12, 0.13, 0.15)),
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                        row_gap: Val::Px(8.0),
                        display: body_display,
                        flex_direction: FlexDirection::Column,
                        ..default()
                    },
                ))
                .with_children(|body| {
                    for button in PanelButton::ALL {
                        body.spawn((
                            button,
                            Button,
                            Name::new(button.label()),
                            BackgroundColor(button.palette()[0]),
                            BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                            Node {
                                width: Val::Percent(100.0),
                                height: Val::Px(36.0),
                                align_items: AlignItems::Center,
                                justify_content: JustifyContent::Center,
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                        ))
                        .with_children(|label| {
                            label.spawn((
                                Text::new(button.label()),
                                TextFont { font_size: 16.0, ..default() },
                                TextColor(Color::WHITE),
                            ));
                        });
                    }

                    body.spawn((
                        StatusLabel,
                        Text::new(""),
                        TextFont { font_size: 14.0, ..default() },
                        TextColor(Color::srgb(0.75, 0.77, 0.80)),
                    ));
                });
        });
}

pub fn apply_collapse_state(
    state: Res<PanelState>,
    mut nodes: ParamSet<(
        Query<&mut Node, With<PanelRoot>>,
        Query<&mut Node, With<PanelBody>>,
        Query<&mut Node, With<HeaderNode>>,
        Query<&mut Node, With<TitleText>>,
    )>,
    mut chevrons: Query<&mut Text, With<CollapseLabel>>,
) {
    if !state.is_changed() {
        return;
    }

    let shown = if state.collapsed { Display::None } else { Display::Flex };
    if let Ok(mut n) = nodes.p0().single_mut() {
        n.width = Val::Px(if state.collapsed { state.closed_width } else { state.open_width });
    }
    if let Ok(mut n) = nodes.p1().single_mut() {
        n.display = shown;
    }
    if let Ok(mut n) = nodes.p2().single_mut() {
        n.padding = UiRect::all(Val::Px(if state.collapsed { 4.0 } else { 12.0 }));
        n.justify_content = if state.collapsed { JustifyContent::FlexEnd } else { JustifyContent::SpaceBetween };
    }
    if let Ok(mut n) = nodes.p3().single_mut() {
        n.display = shown;
    }
    for mut t in &mut chevrons {
        *t = Text::new(if state.collapsed { "<" } else { ">" });
    }
}

/// Text for the status line under the buttons.
pub fn status_text(session: &EditorSession) -> String {
    let count = session.registry().len();
    let noun = if count == 1 { "item" } else { "items" };
    match session.selected_item() {
        Some(item) => format!(
            "{} {}\nSelected: {} at ({:.1}, {:.1})\nR rotates, Delete removes",
            count, noun, item.furniture_type, item.position.x, item.position.y
        ),
        None => format!("{} {}", count, noun),
    }
}

pub fn reflect_status_label(session: Res<EditorSession>, mut q: Query<&mut Text, With<StatusLabel>>) {
    if !session.is_changed() {
        return;
    }
    let label = status_text(&session);
    if let Ok(mut t) = q.single_mut() {
        if t.0 != label {
            *t = Text::new(label);
        }
    }
}
