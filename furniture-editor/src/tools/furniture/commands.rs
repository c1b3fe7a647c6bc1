use bevy::prelude::*;
use rand::Rng;

use super::catalog::{CatalogError, FurnitureCatalog};
use super::proxy::ProxySpawner;
use super::state::{EditorSession, ItemId, LayoutChanged, SceneGraph};
use super::store::{LayoutStore, PersistedRecord};
use crate::settings::EditorSettings;

/// Layout commands issued by the side panel or the host page.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Place a new item. Without a position it lands somewhere random near the origin.
    Add {
        tag: String,
        position: Option<Vec2>,
        rotation_y: f32,
    },
    ClearLayout,
    /// Wipe all stored state and leave the editor.
    Logout,
}

impl EditorCommand {
    pub fn add(tag: impl Into<String>) -> Self {
        Self::Add {
            tag: tag.into(),
            position: None,
            rotation_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Added(ItemId),
    Rejected(CatalogError),
    Cleared,
    LoggedOut,
}

/// Uniform point in `[-extent, extent)` on both floor axes.
pub fn spawn_position(rng: &mut impl Rng, extent: f32) -> Vec2 {
    if extent <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(rng.gen_range(-extent..extent), rng.gen_range(-extent..extent))
}

impl EditorSession {
    /// Run one command against the session and the store. Navigation after a
    /// logout is left to the caller.
    pub fn apply_command(
        &mut self,
        command: &EditorCommand,
        catalog: &FurnitureCatalog,
        scene: &mut impl SceneGraph,
        store: &mut LayoutStore,
        spawn_extent: f32,
        rng: &mut impl Rng,
    ) -> CommandOutcome {
        match command {
            EditorCommand::Add {
                tag,
                position,
                rotation_y,
            } => {
                let at = position.unwrap_or_else(|| spawn_position(rng, spawn_extent));
                match self.create_instance(tag, at.x, at.y, *rotation_y, catalog, scene) {
                    Ok(id) => CommandOutcome::Added(id),
                    Err(err) => CommandOutcome::Rejected(err),
                }
            }
            EditorCommand::ClearLayout => {
                self.clear(scene);
                if let Err(err) = store.clear() {
                    error!("Failed to remove stored layout: {}", err);
                }
                CommandOutcome::Cleared
            }
            EditorCommand::Logout => {
                if let Err(err) = store.clear_all() {
                    error!("Failed to clear stored state on logout: {}", err);
                }
                CommandOutcome::LoggedOut
            }
        }
    }
}

pub fn apply_editor_commands(
    mut commands: EventReader<EditorCommand>,
    catalog: Res<FurnitureCatalog>,
    settings: Res<EditorSettings>,
    mut session: ResMut<EditorSession>,
    mut scene: ProxySpawner,
    mut store: ResMut<LayoutStore>,
    mut changes: EventWriter<LayoutChanged>,
    mut exit: EventWriter<AppExit>,
) {
    let mut rng = rand::thread_rng();

    for command in commands.read() {
        let outcome = session.apply_command(
            command,
            &catalog,
            &mut scene,
            &mut store,
            settings.spawn_extent,
            &mut rng,
        );

        match outcome {
            CommandOutcome::Added(id) => {
                if let Some(item) = session.registry().get(id) {
                    info!(
                        "Added {} {} at ({:.2}, {:.2})",
                        item.furniture_type, id, item.position.x, item.position.y
                    );
                }
                changes.write(LayoutChanged::Commit);
            }
            CommandOutcome::Rejected(err) => warn!("Add rejected: {}", err),
            CommandOutcome::Cleared => {
                info!("Layout cleared");
                changes.write(LayoutChanged::Cleared);
            }
            CommandOutcome::LoggedOut => {
                info!("Logged out, leaving for {}", settings.login_page);
                leave_editor(&settings.login_page, &mut exit);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn leave_editor(login_page: &str, _exit: &mut EventWriter<AppExit>) {
    let navigated = web_sys::window().map(|window| window.location().set_href(login_page));
    if !matches!(navigated, Some(Ok(()))) {
        error!("Could not navigate to {}", login_page);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn leave_editor(_login_page: &str, exit: &mut EventWriter<AppExit>) {
    exit.write(AppExit::Success);
}

impl EditorSession {
    /// Place every stored record whose type is known, returning how many were placed.
    pub fn restore(
        &mut self,
        records: &[PersistedRecord],
        catalog: &FurnitureCatalog,
        scene: &mut impl SceneGraph,
    ) -> usize {
        let mut restored = 0;
        for record in records {
            match record.to_item() {
                Ok(item) => {
                    self.place(item, catalog, scene);
                    restored += 1;
                }
                Err(err) => warn!("Skipping stored furniture: {}", err),
            }
        }
        restored
    }
}

/// Load the stored layout once at startup. Restoring does not write back.
pub fn restore_layout(
    store: Res<LayoutStore>,
    catalog: Res<FurnitureCatalog>,
    mut session: ResMut<EditorSession>,
    mut scene: ProxySpawner,
    mut changes: EventWriter<LayoutChanged>,
) {
    let records = store.load();
    let restored = session.restore(&records, &catalog, &mut scene);

    info!("Restored {} of {} stored furniture items", restored, records.len());
    changes.write(LayoutChanged::Redraw);
}

/// Whether a frame's changes leave a layout to write. A clear already removed
/// the slot, so only a commit after it writes again.
pub fn needs_save<'a>(changes: impl IntoIterator<Item = &'a LayoutChanged>) -> bool {
    changes.into_iter().fold(false, |commit, change| match change {
        LayoutChanged::Commit => true,
        LayoutChanged::Cleared => false,
        LayoutChanged::Redraw => commit,
    })
}

/// Write the registry to storage after committed edits.
pub fn persist_layout(
    mut changes: EventReader<LayoutChanged>,
    session: Res<EditorSession>,
    mut store: ResMut<LayoutStore>,
) {
    if needs_save(changes.read()) {
        if let Err(err) = store.save(&session.records()) {
            error!("Failed to save layout: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::tools::furniture::state::test_support::CountingScene;
    use crate::tools::furniture::store::MemoryStorage;

    const KEY: &str = "furniture3d";

    struct Harness {
        session: EditorSession,
        catalog: FurnitureCatalog,
        scene: CountingScene,
        store: LayoutStore,
        rng: StdRng,
    }

    impl Harness {
        fn new(storage: MemoryStorage) -> Self {
            Self {
                session: EditorSession::default(),
                catalog: FurnitureCatalog::default(),
                scene: CountingScene::default(),
                store: LayoutStore::new(storage, KEY),
                rng: StdRng::seed_from_u64(7),
            }
        }

        fn run(&mut self, command: EditorCommand) -> CommandOutcome {
            self.session.apply_command(
                &command,
                &self.catalog,
                &mut self.scene,
                &mut self.store,
                5.0,
                &mut self.rng,
            )
        }
    }

    #[test]
    fn random_spawn_stays_inside_extent() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let position = spawn_position(&mut rng, 5.0);
            assert!((-5.0..5.0).contains(&position.x));
            assert!((-5.0..5.0).contains(&position.y));
        }
        assert_eq!(spawn_position(&mut rng, 0.0), Vec2::ZERO);
    }

    #[test]
    fn add_uses_explicit_position_and_rotation() {
        let mut harness = Harness::new(MemoryStorage::default());

        let outcome = harness.run(EditorCommand::Add {
            tag: "table".to_string(),
            position: Some(Vec2::new(3.0, -4.0)),
            rotation_y: 0.5,
        });

        let CommandOutcome::Added(id) = outcome else {
            panic!("unexpected outcome {:?}", outcome);
        };
        let item = harness.session.registry().get(id).unwrap();
        assert_eq!(item.position, Vec2::new(3.0, -4.0));
        assert_eq!(item.rotation_y, 0.5);
    }

    #[test]
    fn add_with_unknown_tag_is_rejected() {
        let mut harness = Harness::new(MemoryStorage::default());

        let outcome = harness.run(EditorCommand::add("lamp"));

        assert_eq!(outcome, CommandOutcome::Rejected(CatalogError::InvalidType("lamp".to_string())));
        assert!(harness.session.registry().is_empty());
    }

    #[test]
    fn clear_layout_empties_registry_and_storage_slot() {
        let stored = r#"[{"type":"chair","x":1,"z":1,"rotationY":0}]"#;
        let mut harness = Harness::new(MemoryStorage::with_value(KEY, stored));
        harness.run(EditorCommand::add("chair"));
        harness.run(EditorCommand::add("table"));

        assert_eq!(harness.run(EditorCommand::ClearLayout), CommandOutcome::Cleared);

        assert!(harness.session.registry().is_empty());
        assert_eq!(harness.scene.live(), 0);
        assert_eq!(harness.store.load(), Vec::<PersistedRecord>::new());
    }

    #[test]
    fn logout_wipes_storage_but_keeps_scene() {
        let stored = r#"[{"type":"chair","x":1,"z":1,"rotationY":0}]"#;
        let mut harness = Harness::new(MemoryStorage::with_value(KEY, stored));
        harness.run(EditorCommand::add("chair"));

        assert_eq!(harness.run(EditorCommand::Logout), CommandOutcome::LoggedOut);

        assert!(harness.store.load().is_empty());
        assert_eq!(harness.session.registry().len(), 1);
    }

    #[test]
    fn restore_skips_unknown_types_and_leaves_storage_alone() {
        let stored = r#"[{"type":"chair","x":1,"z":2,"rotationY":0.5},{"type":"sofa","x":0,"z":0},{"type":"table","x":-3,"z":4}]"#;
        let mut harness = Harness::new(MemoryStorage::with_value(KEY, stored));
        let records = harness.store.load();

        let restored = harness.session.restore(&records, &harness.catalog, &mut harness.scene);

        assert_eq!(restored, 2);
        assert_eq!(harness.scene.live(), 2);
        let kinds: Vec<&str> = harness
            .session
            .registry()
            .all()
            .map(|item| item.furniture_type.as_str())
            .collect();
        assert_eq!(kinds, ["chair", "table"]);
        assert_eq!(harness.session.registry().entries()[0].item.rotation_y, 0.5);
        assert_eq!(harness.store.load(), records);
        assert_eq!(harness.store.load().len(), 3);
    }

    #[test]
    fn clear_after_commit_in_one_frame_writes_nothing() {
        assert!(!needs_save(&[LayoutChanged::Commit, LayoutChanged::Cleared]));
        assert!(needs_save(&[LayoutChanged::Cleared, LayoutChanged::Commit]));
        assert!(needs_save(&[LayoutChanged::Commit, LayoutChanged::Redraw]));
        assert!(!needs_save(&[LayoutChanged::Redraw]));
        assert!(!needs_save(&[] as &[LayoutChanged]));
    }
}
