use std::collections::HashMap;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::catalog::{FurnitureCatalog, FurnitureType, ProxyDescriptor};
use super::state::{EditorSession, FurnitureProxy, ItemId, PlacedItem, RebuildProxiesEvent, SceneGraph};

/// Mesh and material handles shared by every proxy of one type.
#[derive(Resource, Default)]
pub struct ProxyAssets {
    handles: HashMap<FurnitureType, (Handle<Mesh>, Handle<StandardMaterial>)>,
}

/// Bevy scene graph: proxies are entities with a mesh, a material and a
/// back-reference to their item.
#[derive(SystemParam)]
pub struct ProxySpawner<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    cache: ResMut<'w, ProxyAssets>,
}

impl ProxySpawner<'_, '_> {
    fn handles(
        &mut self,
        furniture_type: FurnitureType,
        descriptor: &ProxyDescriptor,
    ) -> (Handle<Mesh>, Handle<StandardMaterial>) {
        if let Some(handles) = self.cache.handles.get(&furniture_type) {
            return handles.clone();
        }
        let handles = (
            self.meshes.add(descriptor.geometry.mesh()),
            self.materials.add(descriptor.material()),
        );
        self.cache.handles.insert(furniture_type, handles.clone());
        handles
    }

    /// Forget cached handles so the next proxies pick up new descriptors.
    pub fn invalidate(&mut self) {
        self.cache.handles.clear();
    }
}

impl SceneGraph for ProxySpawner<'_, '_> {
    fn add_proxy(&mut self, id: ItemId, item: &PlacedItem, descriptor: &ProxyDescriptor) -> Entity {
        let (mesh, material) = self.handles(item.furniture_type, descriptor);
        self.commands
            .spawn((
                Name::new(format!("{} {}", item.furniture_type, id)),
                Mesh3d(mesh),
                MeshMaterial3d(material),
                item.transform(descriptor),
                FurnitureProxy { item: id },
            ))
            .id()
    }

    fn remove_proxy(&mut self, proxy: Entity) {
        self.commands.entity(proxy).try_despawn();
    }
}

/// Copy item positions and rotations onto their proxies.
pub fn sync_proxy_transforms(
    session: Res<EditorSession>,
    catalog: Res<FurnitureCatalog>,
    mut proxies: Query<(&FurnitureProxy, &mut Transform)>,
) {
    if !session.is_changed() {
        return;
    }

    for (proxy, mut transform) in &mut proxies {
        if let Some(item) = session.registry().get(proxy.item) {
            let target = item.transform(catalog.descriptor(item.furniture_type));
            if *transform != target {
                *transform = target;
            }
        }
    }
}

pub fn rebuild_proxies_on_event(
    mut events: EventReader<RebuildProxiesEvent>,
    catalog: Res<FurnitureCatalog>,
    mut session: ResMut<EditorSession>,
    mut scene: ProxySpawner,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    scene.invalidate();
    session.rebuild_proxies(&catalog, &mut scene);
    info!("Rebuilt {} furniture proxies", session.registry().len());
}
