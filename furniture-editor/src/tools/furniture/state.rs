use std::fmt;

use bevy::prelude::*;

use super::catalog::{CatalogError, FurnitureCatalog, FurnitureType, ProxyDescriptor};
use super::ray::FloorPlane;
use super::store::PersistedRecord;

/// Session-unique identity of a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One furniture instance on the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedItem {
    pub furniture_type: FurnitureType,
    /// Floor coordinates: `x` is world X, `y` is world Z. Height comes from the catalog.
    pub position: Vec2,
    /// Radians about the vertical axis, never normalised.
    pub rotation_y: f32,
}

impl PlacedItem {
    pub fn new(furniture_type: FurnitureType, x: f32, z: f32, rotation_y: f32) -> Self {
        Self {
            furniture_type,
            position: Vec2::new(x, z),
            rotation_y,
        }
    }

    pub fn transform(&self, descriptor: &ProxyDescriptor) -> Transform {
        Transform::from_xyz(self.position.x, descriptor.vertical_offset(), self.position.y)
            .with_rotation(Quat::from_rotation_y(self.rotation_y))
    }

    pub fn record(&self) -> PersistedRecord {
        PersistedRecord {
            furniture_type: self.furniture_type.as_str().to_string(),
            x: self.position.x,
            z: self.position.y,
            rotation_y: self.rotation_y,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub id: ItemId,
    /// Visual proxy entity in the scene graph.
    pub proxy: Entity,
    pub item: PlacedItem,
}

/// Ordered list of placed items. Insertion order is draw order only.
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    entries: Vec<RegistryEntry>,
    next_id: u64,
}

impl SceneRegistry {
    /// Append `item`; `spawn_proxy` receives the new id so the proxy can refer back to it.
    pub fn add(
        &mut self,
        item: PlacedItem,
        spawn_proxy: impl FnOnce(ItemId, &PlacedItem) -> Entity,
    ) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        let proxy = spawn_proxy(id, &item);
        self.entries.push(RegistryEntry { id, proxy, item });
        id
    }

    /// Remove by identity. Absent ids are not an error.
    pub fn remove(&mut self, id: ItemId) -> Option<RegistryEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) -> Vec<RegistryEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn all(&self) -> impl Iterator<Item = &PlacedItem> {
        self.entries.iter().map(|entry| &entry.item)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn get(&self, id: ItemId) -> Option<&PlacedItem> {
        self.entries.iter().find(|entry| entry.id == id).map(|entry| &entry.item)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut PlacedItem> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| &mut entry.item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The scene graph visual proxies live in.
pub trait SceneGraph {
    fn add_proxy(&mut self, id: ItemId, item: &PlacedItem, descriptor: &ProxyDescriptor) -> Entity;
    fn remove_proxy(&mut self, proxy: Entity);
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        item: ItemId,
        plane: FloorPlane,
        /// Floor hit minus item position at pick-up.
        offset: Vec2,
    },
}

/// Registry, selection and drag state for one editing session.
#[derive(Resource, Debug, Default)]
pub struct EditorSession {
    pub(super) registry: SceneRegistry,
    pub(super) selection: Option<ItemId>,
    pub(super) drag: DragState,
}

impl EditorSession {
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn selection(&self) -> Option<ItemId> {
        self.selection
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn selected_item(&self) -> Option<&PlacedItem> {
        self.selection.and_then(|id| self.registry.get(id))
    }

    /// Parse `tag` and place a new item. Unknown tags change nothing.
    pub fn create_instance(
        &mut self,
        tag: &str,
        x: f32,
        z: f32,
        rotation_y: f32,
        catalog: &FurnitureCatalog,
        scene: &mut impl SceneGraph,
    ) -> Result<ItemId, CatalogError> {
        let furniture_type = tag.parse::<FurnitureType>()?;
        Ok(self.place(PlacedItem::new(furniture_type, x, z, rotation_y), catalog, scene))
    }

    pub fn place(
        &mut self,
        item: PlacedItem,
        catalog: &FurnitureCatalog,
        scene: &mut impl SceneGraph,
    ) -> ItemId {
        let descriptor = catalog.descriptor(item.furniture_type);
        self.registry
            .add(item, |id, item| scene.add_proxy(id, item, descriptor))
    }

    /// Remove one item and its proxy. Returns false when `id` is not registered.
    pub fn remove(&mut self, id: ItemId, scene: &mut impl SceneGraph) -> bool {
        let Some(entry) = self.registry.remove(id) else {
            return false;
        };
        scene.remove_proxy(entry.proxy);
        if self.selection == Some(id) {
            self.selection = None;
        }
        if matches!(self.drag, DragState::Dragging { item, .. } if item == id) {
            self.drag = DragState::Idle;
        }
        true
    }

    /// Remove every item and proxy, dropping selection and drag state.
    pub fn clear(&mut self, scene: &mut impl SceneGraph) {
        for entry in self.registry.clear() {
            scene.remove_proxy(entry.proxy);
        }
        self.selection = None;
        self.drag = DragState::Idle;
    }

    /// Swap every proxy for a fresh one built from the current catalog.
    pub fn rebuild_proxies(&mut self, catalog: &FurnitureCatalog, scene: &mut impl SceneGraph) {
        for entry in &mut self.registry.entries {
            scene.remove_proxy(entry.proxy);
            let descriptor = catalog.descriptor(entry.item.furniture_type);
            entry.proxy = scene.add_proxy(entry.id, &entry.item, descriptor);
        }
    }

    pub fn records(&self) -> Vec<PersistedRecord> {
        self.registry.all().map(PlacedItem::record).collect()
    }
}

/// Visual proxy back-reference to its registry item.
#[derive(Component, Debug, Clone, Copy)]
pub struct FurnitureProxy {
    pub item: ItemId,
}

/// Emitted after the registry changes so the proxies and overlay can follow.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChanged {
    /// Mid-drag movement or a restored layout; nothing to store.
    Redraw,
    /// A finished edit that must be written to storage.
    Commit,
    /// Layout emptied and its storage slot removed.
    Cleared,
}

impl LayoutChanged {
    /// Whether storage now reflects the registry.
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Commit | Self::Cleared)
    }
}

/// Emitted when proxy meshes must be rebuilt from the catalog.
#[derive(Event, Debug, Clone, Copy)]
pub struct RebuildProxiesEvent;

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Scene graph double that hands out sequential entities and records removals.
    #[derive(Debug, Default)]
    pub struct CountingScene {
        pub spawned: u32,
        pub removed: Vec<Entity>,
    }

    impl CountingScene {
        pub fn live(&self) -> usize {
            self.spawned as usize - self.removed.len()
        }
    }

    impl SceneGraph for CountingScene {
        fn add_proxy(&mut self, _: ItemId, _: &PlacedItem, _: &ProxyDescriptor) -> Entity {
            self.spawned += 1;
            Entity::from_raw(self.spawned)
        }

        fn remove_proxy(&mut self, proxy: Entity) {
            self.removed.push(proxy);
        }
    }
}
