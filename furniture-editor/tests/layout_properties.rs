use bevy::prelude::*;
use furniture_editor::tools::furniture::catalog::{FurnitureCatalog, ProxyDescriptor};
use furniture_editor::tools::furniture::interaction::{PointerOutcome, PointerSample, RayCaster, snap_to_grid};
use furniture_editor::tools::furniture::state::{EditorSession, ItemId, PlacedItem, SceneGraph};
use furniture_editor::tools::furniture::store::{LayoutStore, MemoryStorage, PersistedRecord};
use proptest::prelude::*;

#[derive(Default)]
struct CountingScene {
    next: u32,
    live: usize,
}

impl SceneGraph for CountingScene {
    fn add_proxy(&mut self, _: ItemId, _: &PlacedItem, _: &ProxyDescriptor) -> Entity {
        self.next += 1;
        self.live += 1;
        Entity::from_raw(self.next)
    }

    fn remove_proxy(&mut self, _: Entity) {
        self.live -= 1;
    }
}

/// Straight-down rays over a 20x20 floor: NDC (u, v) hits world (10u, -10v).
struct TopDownRays;

impl RayCaster for TopDownRays {
    fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray3d> {
        Some(Ray3d::new(Vec3::new(ndc.x * 10.0, 10.0, -ndc.y * 10.0), Dir3::NEG_Y))
    }
}

fn sample_at(x: f32, z: f32) -> PointerSample {
    let viewport = Vec2::new(1000.0, 1000.0);
    let offset = Vec2::new((x / 10.0 + 1.0) * 0.5, (z / 10.0 + 1.0) * 0.5) * viewport;
    PointerSample::new(offset, viewport)
}

#[derive(Debug, Clone)]
enum Op {
    Add(bool),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![any::<bool>().prop_map(Op::Add), (0usize..16).prop_map(Op::Remove)]
}

fn record() -> impl Strategy<Value = PersistedRecord> {
    (
        prop_oneof![Just("chair"), Just("table")],
        -10.0f32..10.0,
        -10.0f32..10.0,
        -20.0f32..20.0,
    )
        .prop_map(|(tag, x, z, rotation_y)| PersistedRecord {
            furniture_type: tag.to_string(),
            x,
            z,
            rotation_y,
        })
}

proptest! {
    #[test]
    fn registry_size_tracks_matched_operations(ops in prop::collection::vec(op(), 0..40)) {
        let catalog = FurnitureCatalog::default();
        let mut scene = CountingScene::default();
        let mut session = EditorSession::default();
        let mut ids = Vec::new();
        let mut expected = 0usize;

        for op in ops {
            match op {
                Op::Add(chair) => {
                    let tag = if chair { "chair" } else { "table" };
                    ids.push(session.create_instance(tag, 0.0, 0.0, 0.0, &catalog, &mut scene).unwrap());
                    expected += 1;
                }
                Op::Remove(index) => {
                    // Indices past the end and repeated ids are unmatched removals.
                    if let Some(id) = ids.get(index).copied() {
                        if session.remove(id, &mut scene) {
                            expected -= 1;
                        }
                    }
                }
            }
            prop_assert_eq!(session.registry().len(), expected);
            prop_assert_eq!(scene.live, expected);
        }
    }

    #[test]
    fn snapped_coordinates_are_whole(value in -1000.0f32..1000.0) {
        let snapped = snap_to_grid(value, 1.0);
        prop_assert_eq!(snapped, snapped.trunc());
        prop_assert!((snapped - value).abs() <= 0.5 + 1e-3);
    }

    #[test]
    fn dropped_items_land_on_the_grid(
        start in (-4.0f32..4.0, -4.0f32..4.0),
        target in (-9.0f32..9.0, -9.0f32..9.0),
    ) {
        let catalog = FurnitureCatalog::default();
        let mut scene = CountingScene::default();
        let mut session = EditorSession::default();
        let id = session.create_instance("chair", start.0, start.1, 0.0, &catalog, &mut scene).unwrap();

        prop_assert_eq!(session.pointer_down(sample_at(start.0, start.1), &TopDownRays, &catalog), PointerOutcome::Picked(id));
        session.pointer_move(sample_at(target.0, target.1), &TopDownRays);
        prop_assert_eq!(session.pointer_up(1.0), PointerOutcome::Dropped(id));

        let position = session.registry().get(id).unwrap().position;
        prop_assert_eq!(position.x, position.x.trunc());
        prop_assert_eq!(position.y, position.y.trunc());
        prop_assert!((position.x - target.0).abs() <= 0.5 + 1e-3);
        prop_assert!((position.y - target.1).abs() <= 0.5 + 1e-3);
    }

    #[test]
    fn saved_layout_loads_back_in_order(records in prop::collection::vec(record(), 0..20)) {
        let mut store = LayoutStore::new(MemoryStorage::default(), "furniture3d");

        store.save(&records).unwrap();
        let loaded = store.load();

        prop_assert_eq!(loaded.len(), records.len());
        for (loaded, saved) in loaded.iter().zip(&records) {
            prop_assert_eq!(&loaded.furniture_type, &saved.furniture_type);
            prop_assert!((loaded.x - saved.x).abs() < 1e-5);
            prop_assert!((loaded.z - saved.z).abs() < 1e-5);
            prop_assert!((loaded.rotation_y - saved.rotation_y).abs() < 1e-5);
        }
    }
}
