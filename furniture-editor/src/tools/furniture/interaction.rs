use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::catalog::FurnitureCatalog;
use super::ray::{FloorPlane, ray_hits_proxy};
use super::state::{DragState, EditorSession, ItemId, LayoutChanged};
use crate::engine::camera::viewport_camera::{CameraRays, ViewportCamera};
use crate::settings::EditorSettings;

/// Turns normalised device coordinates into world-space rays.
pub trait RayCaster {
    fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray3d>;
}

/// Pointer position relative to the 3D viewport, in device pixels with a
/// top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub offset: Vec2,
    pub viewport: Vec2,
}

impl PointerSample {
    pub fn new(offset: Vec2, viewport: Vec2) -> Self {
        Self { offset, viewport }
    }

    /// Centre origin, y up, [-1, 1] on both axes. `None` for an empty viewport.
    pub fn ndc(&self) -> Option<Vec2> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (self.offset.x / self.viewport.x) * 2.0 - 1.0,
            -(self.offset.y / self.viewport.y) * 2.0 + 1.0,
        ))
    }

    pub fn ray(&self, caster: &impl RayCaster) -> Option<Ray3d> {
        caster.ray_from_ndc(self.ndc()?)
    }
}

/// What a pointer event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Ignored,
    /// An item was selected; a drag started if the floor could be hit.
    Picked(ItemId),
    Moved(ItemId),
    /// Drag finished and the item was snapped to the grid.
    Dropped(ItemId),
    /// Pointer released with no drag in progress.
    Released,
}

/// Round to the nearest multiple of `step`, exact halves toward positive infinity.
pub fn snap_to_grid(value: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    let cells = value / step;
    let nearest = cells.round();
    // `round` sends negative halves away from zero.
    let snapped = if (nearest - cells).abs() == 0.5 { cells.floor() + 1.0 } else { nearest };
    snapped * step
}

/// Whether the pointer is over a UI node that captures presses.
pub fn pointer_over_ui<'a>(interactions: impl IntoIterator<Item = &'a Interaction>) -> bool {
    interactions
        .into_iter()
        .any(|interaction| *interaction != Interaction::None)
}

impl EditorSession {
    /// Nearest item whose proxy the ray hits.
    pub fn pick(&self, ray: Ray3d, catalog: &FurnitureCatalog) -> Option<ItemId> {
        self.registry
            .entries()
            .iter()
            .filter_map(|entry| {
                let descriptor = catalog.descriptor(entry.item.furniture_type);
                ray_hits_proxy(ray, &entry.item, descriptor).map(|t| (entry.id, t))
            })
            .filter(|(_, t)| *t > 0.0)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn pointer_down(
        &mut self,
        sample: PointerSample,
        caster: &impl RayCaster,
        catalog: &FurnitureCatalog,
    ) -> PointerOutcome {
        let Some(ray) = sample.ray(caster) else {
            return PointerOutcome::Ignored;
        };
        let Some(id) = self.pick(ray, catalog) else {
            return PointerOutcome::Ignored;
        };
        let Some(item) = self.registry.get(id) else {
            return PointerOutcome::Ignored;
        };

        self.selection = Some(id);
        let plane = FloorPlane::GROUND;
        self.drag = match plane.intersect(ray) {
            Some(hit) => DragState::Dragging {
                item: id,
                plane,
                offset: Vec2::new(hit.x, hit.z) - item.position,
            },
            None => DragState::Idle,
        };
        PointerOutcome::Picked(id)
    }

    pub fn pointer_move(&mut self, sample: PointerSample, caster: &impl RayCaster) -> PointerOutcome {
        let DragState::Dragging { item, plane, offset } = self.drag else {
            return PointerOutcome::Ignored;
        };
        let Some(ray) = sample.ray(caster) else {
            return PointerOutcome::Ignored;
        };
        // Parallel to the floor: keep the last position for this event.
        let Some(hit) = plane.intersect(ray) else {
            return PointerOutcome::Ignored;
        };
        let Some(placed) = self.registry.get_mut(item) else {
            return PointerOutcome::Ignored;
        };

        placed.position = Vec2::new(hit.x, hit.z) - offset;
        PointerOutcome::Moved(item)
    }

    /// Finish any drag. Selection and drag state are cleared either way.
    pub fn pointer_up(&mut self, snap_step: f32) -> PointerOutcome {
        let outcome = match self.drag {
            DragState::Dragging { item, .. } => match self.registry.get_mut(item) {
                Some(placed) => {
                    placed.position = Vec2::new(
                        snap_to_grid(placed.position.x, snap_step),
                        snap_to_grid(placed.position.y, snap_step),
                    );
                    PointerOutcome::Dropped(item)
                }
                None => PointerOutcome::Released,
            },
            DragState::Idle => PointerOutcome::Released,
        };

        self.selection = None;
        self.drag = DragState::Idle;
        outcome
    }
}

/// Feed primary mouse button and cursor motion into the session.
pub fn handle_pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<ViewportCamera>>,
    ui_nodes: Query<&Interaction, With<Node>>,
    catalog: Res<FurnitureCatalog>,
    settings: Res<EditorSettings>,
    mut session: ResMut<EditorSession>,
    mut changes: EventWriter<LayoutChanged>,
) {
    let moved_to = cursor_moved.read().last().map(|event| event.position);

    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let viewport = camera
        .logical_viewport_rect()
        .unwrap_or_else(|| Rect::new(0.0, 0.0, window.width(), window.height()));
    let sample_at = |cursor: Vec2| PointerSample::new(cursor - viewport.min, viewport.size());
    let rays = CameraRays::new(camera, camera_transform);

    let over_ui = pointer_over_ui(&ui_nodes);

    if buttons.just_pressed(MouseButton::Left) && !over_ui {
        if let Some(cursor) = window.cursor_position().or(moved_to) {
            if let PointerOutcome::Picked(id) = session.pointer_down(sample_at(cursor), &rays, &catalog) {
                debug!("Picked furniture {}", id);
            }
        }
    }

    if let Some(cursor) = moved_to {
        if let PointerOutcome::Moved(_) = session.pointer_move(sample_at(cursor), &rays) {
            changes.write(LayoutChanged::Redraw);
        }
    }

    if buttons.just_released(MouseButton::Left) {
        if let PointerOutcome::Dropped(id) = session.pointer_up(settings.snap_step) {
            if let Some(item) = session.registry().get(id) {
                info!(
                    "Dropped {} {} at ({}, {})",
                    item.furniture_type, id, item.position.x, item.position.y
                );
            }
            changes.write(LayoutChanged::Commit);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Orthographic top-down caster: NDC (u, v) maps to world (u * extent, -v * extent)
    /// with rays pointing straight down from y = 10.
    pub struct TopDownRays {
        pub extent: f32,
    }

    impl RayCaster for TopDownRays {
        fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray3d> {
            let origin = Vec3::new(ndc.x * self.extent, 10.0, -ndc.y * self.extent);
            Some(Ray3d::new(origin, Dir3::NEG_Y))
        }
    }

    pub const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    /// Pointer sample whose top-down ray lands on world (x, z).
    pub fn sample_at(x: f32, z: f32, extent: f32) -> PointerSample {
        let ndc = Vec2::new(x / extent, -z / extent);
        let offset = Vec2::new((ndc.x + 1.0) * 0.5 * VIEWPORT.x, (1.0 - ndc.y) * 0.5 * VIEWPORT.y);
        PointerSample::new(offset, VIEWPORT)
    }

    /// Caster whose rays never reach the floor.
    pub struct LevelRays;

    impl RayCaster for LevelRays {
        fn ray_from_ndc(&self, _: Vec2) -> Option<Ray3d> {
            Some(Ray3d::new(Vec3::new(0.0, 1.0, 0.0), Dir3::X))
        }
    }
}
