use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::furniture::{
    CHAIR_COLOUR, CHAIR_CUBE_SIZE, TABLE_COLOUR, TABLE_HEIGHT, TABLE_RADIUS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ray::{ray_aabb_hit_t, ray_cylinder_hit_t};
use super::state::RebuildProxiesEvent;
use crate::settings::EditorSettings;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown furniture type {0:?}")]
    InvalidType(String),
}

/// Kinds of furniture the editor can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FurnitureType {
    Chair,
    Table,
}

const TYPE_COUNT: usize = 2;

impl FurnitureType {
    pub const ALL: [FurnitureType; TYPE_COUNT] = [Self::Chair, Self::Table];

    /// Tag used in storage and RPC payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chair => "chair",
            Self::Table => "table",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for FurnitureType {
    type Err = CatalogError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "chair" => Ok(Self::Chair),
            "table" => Ok(Self::Table),
            _ => Err(CatalogError::InvalidType(tag.to_string())),
        }
    }
}

impl fmt::Display for FurnitureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proxy geometry, centred on the item's origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ProxyShape {
    Cuboid { width: f32, height: f32, depth: f32 },
    /// Upright cylinder around the local Y axis.
    Cylinder { radius: f32, height: f32 },
}

impl ProxyShape {
    pub fn height(&self) -> f32 {
        match *self {
            Self::Cuboid { height, .. } | Self::Cylinder { height, .. } => height,
        }
    }

    pub fn mesh(&self) -> Mesh {
        match *self {
            Self::Cuboid { width, height, depth } => Mesh::from(Cuboid::new(width, height, depth)),
            Self::Cylinder { radius, height } => Mesh::from(Cylinder::new(radius, height)),
        }
    }

    /// Ray distance to the shape surface, with the ray already in shape-local space.
    pub fn ray_hit(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        match *self {
            Self::Cuboid { width, height, depth } => {
                let half = Vec3::new(width, height, depth) * 0.5;
                ray_aabb_hit_t(origin, direction, -half, half)
            }
            Self::Cylinder { radius, height } => {
                ray_cylinder_hit_t(origin, direction, radius, height * 0.5)
            }
        }
    }
}

/// Marker drawn for an item in the top-down overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayMarker {
    Square,
    Circle,
}

/// Everything needed to show one furniture type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProxyDescriptor {
    pub geometry: ProxyShape,
    /// sRGB components in 0..1.
    pub colour: [f32; 3],
    pub marker: OverlayMarker,
}

impl ProxyDescriptor {
    /// Height of the proxy centre above the floor, so that it rests on y = 0.
    pub fn vertical_offset(&self) -> f32 {
        self.geometry.height() * 0.5
    }

    pub fn srgba(&self) -> Srgba {
        let [r, g, b] = self.colour;
        Srgba::rgb(r, g, b)
    }

    pub fn material(&self) -> StandardMaterial {
        StandardMaterial {
            base_color: Color::from(self.srgba()),
            ..default()
        }
    }
}

/// Lookup table from furniture type to proxy descriptor.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FurnitureCatalog {
    descriptors: [ProxyDescriptor; TYPE_COUNT],
}

impl Default for FurnitureCatalog {
    fn default() -> Self {
        Self {
            descriptors: [
                ProxyDescriptor {
                    geometry: ProxyShape::Cuboid {
                        width: CHAIR_CUBE_SIZE,
                        height: CHAIR_CUBE_SIZE,
                        depth: CHAIR_CUBE_SIZE,
                    },
                    colour: CHAIR_COLOUR,
                    marker: OverlayMarker::Square,
                },
                ProxyDescriptor {
                    geometry: ProxyShape::Cylinder {
                        radius: TABLE_RADIUS,
                        height: TABLE_HEIGHT,
                    },
                    colour: TABLE_COLOUR,
                    marker: OverlayMarker::Circle,
                },
            ],
        }
    }
}

impl FurnitureCatalog {
    pub fn descriptor(&self, furniture_type: FurnitureType) -> &ProxyDescriptor {
        &self.descriptors[furniture_type.index()]
    }

    pub fn set(&mut self, furniture_type: FurnitureType, descriptor: ProxyDescriptor) {
        self.descriptors[furniture_type.index()] = descriptor;
    }

    /// Replace descriptors named in `file`. Entries with unknown tags are left
    /// out and returned.
    pub fn apply(&mut self, file: &CatalogFile) -> Vec<CatalogError> {
        let mut rejected = Vec::new();
        for (tag, descriptor) in &file.furniture {
            match tag.parse::<FurnitureType>() {
                Ok(furniture_type) => self.set(furniture_type, *descriptor),
                Err(err) => rejected.push(err),
            }
        }
        rejected
    }
}

/// JSON catalog override, keyed by furniture tag.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub furniture: BTreeMap<String, ProxyDescriptor>,
}

#[derive(Resource, Default)]
pub struct CatalogLoader {
    handle: Option<Handle<CatalogFile>>,
    finished: bool,
}

/// Load the catalog override and rebuild proxies once it arrives.
pub fn load_catalog_override(
    mut loader: ResMut<CatalogLoader>,
    settings: Res<EditorSettings>,
    asset_server: Res<AssetServer>,
    files: Res<Assets<CatalogFile>>,
    mut catalog: ResMut<FurnitureCatalog>,
    mut rebuild: EventWriter<RebuildProxiesEvent>,
) {
    if loader.finished {
        return;
    }

    let Some(handle) = loader.handle.clone() else {
        info!("Loading furniture catalog from: {}", settings.catalog_path);
        loader.handle = Some(asset_server.load(settings.catalog_path.clone()));
        return;
    };

    if let Some(file) = files.get(&handle) {
        for err in catalog.apply(file) {
            warn!("Ignoring catalog entry: {}", err);
        }
        info!("Applied furniture catalog ({} entries)", file.furniture.len());
        loader.finished = true;
        rebuild.write(RebuildProxiesEvent);
    } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        warn!("Furniture catalog unavailable, keeping built-in proxies: {}", err);
        loader.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags_only() {
        assert_eq!("chair".parse::<FurnitureType>(), Ok(FurnitureType::Chair));
        assert_eq!("table".parse::<FurnitureType>(), Ok(FurnitureType::Table));
        assert_eq!(
            "sofa".parse::<FurnitureType>(),
            Err(CatalogError::InvalidType("sofa".to_string()))
        );
        // Tags are case-sensitive, as they are in stored layouts.
        assert!("Chair".parse::<FurnitureType>().is_err());
    }

    #[test]
    fn default_proxies_rest_on_the_floor() {
        let catalog = FurnitureCatalog::default();

        let chair = catalog.descriptor(FurnitureType::Chair);
        assert_eq!(chair.vertical_offset(), 0.5);
        assert_eq!(chair.marker, OverlayMarker::Square);
        assert_eq!(chair.colour, [1.0, 0.0, 0.0]);

        let table = catalog.descriptor(FurnitureType::Table);
        assert!((table.vertical_offset() - 0.15).abs() < 1e-6);
        assert_eq!(table.marker, OverlayMarker::Circle);
        assert_eq!(
            table.geometry,
            ProxyShape::Cylinder {
                radius: 1.0,
                height: 0.3
            }
        );
    }

    #[test]
    fn override_file_replaces_known_entries_and_reports_unknown() {
        let file: CatalogFile = serde_json::from_str(
            r#"{
                "furniture": {
                    "chair": {
                        "geometry": { "shape": "cuboid", "width": 0.6, "height": 0.9, "depth": 0.6 },
                        "colour": [0.5, 0.2, 0.1],
                        "marker": "square"
                    },
                    "lamp": {
                        "geometry": { "shape": "cylinder", "radius": 0.2, "height": 1.5 },
                        "colour": [1.0, 1.0, 0.0],
                        "marker": "circle"
                    }
                }
            }"#,
        )
        .unwrap();

        let mut catalog = FurnitureCatalog::default();
        let rejected = catalog.apply(&file);

        assert_eq!(rejected, vec![CatalogError::InvalidType("lamp".to_string())]);
        let chair = catalog.descriptor(FurnitureType::Chair);
        assert!((chair.vertical_offset() - 0.45).abs() < 1e-6);
        assert_eq!(chair.colour, [0.5, 0.2, 0.1]);
        assert_eq!(
            catalog.descriptor(FurnitureType::Table),
            FurnitureCatalog::default().descriptor(FurnitureType::Table)
        );
    }
}
