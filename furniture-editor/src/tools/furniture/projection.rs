use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use constants::projection::{
    CANVAS_BACKGROUND, CANVAS_HEIGHT, CANVAS_WIDTH, CHAIR_MARKER_HALF_SIZE, PAGE_CANVAS_ID,
    SCALE_X, SCALE_Y, TABLE_MARKER_RADIUS, WORLD_OFFSET,
};

use super::catalog::{FurnitureCatalog, OverlayMarker};
use super::state::{EditorSession, LayoutChanged, PlacedItem};
use crate::settings::EditorSettings;

/// Raster target for the top-down overlay, in pixels with a top-left origin.
pub trait DrawSurface {
    /// Reset every pixel to the surface background.
    fn clear(&mut self);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, colour: Srgba);
    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Srgba);
}

/// Affine floor-to-pixel mapping and marker sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSettings {
    pub world_offset: f32,
    pub scale: Vec2,
    pub square_half_size: f32,
    pub circle_radius: f32,
    pub canvas_size: UVec2,
    pub background: [u8; 4],
    /// Page element mirrored on wasm builds.
    pub page_canvas_id: String,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            world_offset: WORLD_OFFSET,
            scale: Vec2::new(SCALE_X, SCALE_Y),
            square_half_size: CHAIR_MARKER_HALF_SIZE,
            circle_radius: TABLE_MARKER_RADIUS,
            canvas_size: UVec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            background: CANVAS_BACKGROUND,
            page_canvas_id: PAGE_CANVAS_ID.to_string(),
        }
    }
}

impl ProjectionSettings {
    /// Floor `(x, z)` to overlay pixel coordinates.
    pub fn project(&self, position: Vec2) -> Vec2 {
        (position + Vec2::splat(self.world_offset)) * self.scale
    }
}

/// Redraw the whole overlay from `items`. Holds no state between calls.
pub fn draw_projection<'a>(
    items: impl IntoIterator<Item = &'a PlacedItem>,
    catalog: &FurnitureCatalog,
    settings: &ProjectionSettings,
    surface: &mut impl DrawSurface,
) {
    surface.clear();
    for item in items {
        let descriptor = catalog.descriptor(item.furniture_type);
        let centre = settings.project(item.position);
        match descriptor.marker {
            OverlayMarker::Square => {
                let half = Vec2::splat(settings.square_half_size);
                surface.fill_rect(centre - half, half * 2.0, descriptor.srgba());
            }
            OverlayMarker::Circle => {
                surface.fill_circle(centre, settings.circle_radius, descriptor.srgba());
            }
        }
    }
}

fn to_rgba8(colour: Srgba) -> [u8; 4] {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        channel(colour.red),
        channel(colour.green),
        channel(colour.blue),
        channel(colour.alpha),
    ]
}

/// In-memory RGBA8 overlay, uploaded to a UI image after each redraw.
#[derive(Resource, Debug, Clone)]
pub struct OverlayCanvas {
    size: UVec2,
    background: [u8; 4],
    pixels: Vec<[u8; 4]>,
}

impl OverlayCanvas {
    pub fn new(size: UVec2, background: [u8; 4]) -> Self {
        Self {
            size,
            background,
            pixels: vec![background; (size.x * size.y) as usize],
        }
    }

    pub fn from_settings(settings: &ProjectionSettings) -> Self {
        Self::new(settings.canvas_size, settings.background)
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        Some(self.pixels[(y * self.size.x + x) as usize])
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    /// Fill every pixel whose centre satisfies `covers`, limited to `min..max`.
    fn fill_where(&mut self, min: Vec2, max: Vec2, colour: Srgba, covers: impl Fn(Vec2) -> bool) {
        let rgba = to_rgba8(colour);
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.size.x);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.size.y);

        for y in y0..y1 {
            for x in x0..x1 {
                if covers(Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.pixels[(y * self.size.x + x) as usize] = rgba;
                }
            }
        }
    }
}

impl DrawSurface for OverlayCanvas {
    fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, colour: Srgba) {
        let max = min + size;
        self.fill_where(min, max, colour, |p| {
            p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y
        });
    }

    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Srgba) {
        let extent = Vec2::splat(radius);
        self.fill_where(centre - extent, centre + extent, colour, |p| {
            p.distance_squared(centre) <= radius * radius
        });
    }
}

/// UI image showing the overlay canvas.
#[derive(Resource)]
pub struct OverlayImage {
    pub handle: Handle<Image>,
}

#[derive(Component)]
pub struct OverlayPanel;

pub fn spawn_overlay(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    canvas: Res<OverlayCanvas>,
) {
    let size = canvas.size();
    let image = Image::new(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        canvas.to_bytes(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    let handle = images.add(image);

    commands.spawn((
        Name::new("Top-down Overlay"),
        ImageNode::new(handle.clone()),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(10.0),
            width: Val::Px(size.x as f32),
            height: Val::Px(size.y as f32),
            ..default()
        },
        OverlayPanel,
        Interaction::default(),
    ));
    commands.insert_resource(OverlayImage { handle });
}

/// Redraw the overlay whenever the layout or the catalog changed.
pub fn redraw_overlay(
    mut changes: EventReader<LayoutChanged>,
    session: Res<EditorSession>,
    catalog: Res<FurnitureCatalog>,
    settings: Res<EditorSettings>,
    mut canvas: ResMut<OverlayCanvas>,
    overlay: Option<Res<OverlayImage>>,
    mut images: ResMut<Assets<Image>>,
) {
    if changes.is_empty() && !catalog.is_changed() {
        return;
    }
    changes.clear();

    draw_projection(session.registry().all(), &catalog, &settings.projection, &mut *canvas);

    if let Some(image) = overlay.and_then(|overlay| images.get_mut(&overlay.handle)) {
        image.data = Some(canvas.to_bytes());
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Some(mut page) = page_canvas::PageCanvas::find(&settings.projection.page_canvas_id) {
            draw_projection(session.registry().all(), &catalog, &settings.projection, &mut page);
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod page_canvas {
    use std::f64::consts::TAU;

    use bevy::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use super::{DrawSurface, to_rgba8};

    /// `<canvas>` element on the host page, drawn with its 2D context.
    pub struct PageCanvas {
        canvas: HtmlCanvasElement,
        context: CanvasRenderingContext2d,
    }

    impl PageCanvas {
        pub fn find(id: &str) -> Option<Self> {
            let canvas = web_sys::window()?
                .document()?
                .get_element_by_id(id)?
                .dyn_into::<HtmlCanvasElement>()
                .ok()?;
            let context = canvas
                .get_context("2d")
                .ok()??
                .dyn_into::<CanvasRenderingContext2d>()
                .ok()?;
            Some(Self { canvas, context })
        }

        fn set_fill(&self, colour: Srgba) {
            let [r, g, b, a] = to_rgba8(colour);
            let css = format!("rgba({}, {}, {}, {})", r, g, b, a as f32 / 255.0);
            self.context.set_fill_style_str(&css);
        }
    }

    impl DrawSurface for PageCanvas {
        fn clear(&mut self) {
            let (width, height) = (self.canvas.width() as f64, self.canvas.height() as f64);
            self.context.clear_rect(0.0, 0.0, width, height);
        }

        fn fill_rect(&mut self, min: Vec2, size: Vec2, colour: Srgba) {
            self.set_fill(colour);
            self.context
                .fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
        }

        fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Srgba) {
            self.set_fill(colour);
            self.context.begin_path();
            if self
                .context
                .arc(centre.x as f64, centre.y as f64, radius as f64, 0.0, TAU)
                .is_ok()
            {
                self.context.fill();
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Clear,
        Rect { min: Vec2, size: Vec2, colour: Srgba },
        Circle { centre: Vec2, radius: f32, colour: Srgba },
    }

    /// Surface that records every primitive it is asked to draw.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub ops: Vec<DrawOp>,
    }

    impl DrawSurface for RecordingSurface {
        fn clear(&mut self) {
            self.ops.push(DrawOp::Clear);
        }

        fn fill_rect(&mut self, min: Vec2, size: Vec2, colour: Srgba) {
            self.ops.push(DrawOp::Rect { min, size, colour });
        }

        fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Srgba) {
            self.ops.push(DrawOp::Circle { centre, radius, colour });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{DrawOp, RecordingSurface};
    use super::*;
    use crate::tools::furniture::catalog::FurnitureType;

    fn layout() -> Vec<PlacedItem> {
        vec![
            PlacedItem::new(FurnitureType::Chair, 0.0, 0.0, 0.0),
            PlacedItem::new(FurnitureType::Table, 5.0, 5.0, 1.0),
        ]
    }

    #[test]
    fn projects_floor_to_pixels() {
        let settings = ProjectionSettings::default();
        assert_eq!(settings.project(Vec2::new(-10.0, -10.0)), Vec2::ZERO);
        assert_eq!(settings.project(Vec2::ZERO), Vec2::new(200.0, 150.0));
        assert_eq!(settings.project(Vec2::new(10.0, 10.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn draws_square_for_chair_and_circle_for_table() {
        let mut surface = RecordingSurface::default();
        draw_projection(&layout(), &FurnitureCatalog::default(), &ProjectionSettings::default(), &mut surface);

        assert_eq!(
            surface.ops,
            vec![
                DrawOp::Clear,
                DrawOp::Rect {
                    min: Vec2::new(190.0, 140.0),
                    size: Vec2::new(20.0, 20.0),
                    colour: Srgba::rgb(1.0, 0.0, 0.0),
                },
                DrawOp::Circle {
                    centre: Vec2::new(300.0, 225.0),
                    radius: 10.0,
                    colour: Srgba::rgb(0.0, 0.0, 1.0),
                },
            ]
        );
    }

    #[test]
    fn redrawing_unchanged_layout_is_idempotent() {
        let catalog = FurnitureCatalog::default();
        let settings = ProjectionSettings::default();
        let items = layout();

        let mut surface = RecordingSurface::default();
        draw_projection(&items, &catalog, &settings, &mut surface);
        let first = std::mem::take(&mut surface.ops);
        draw_projection(&items, &catalog, &settings, &mut surface);
        assert_eq!(surface.ops, first);

        let mut canvas = OverlayCanvas::from_settings(&settings);
        draw_projection(&items, &catalog, &settings, &mut canvas);
        let once = canvas.pixels().to_vec();
        draw_projection(&items, &catalog, &settings, &mut canvas);
        assert_eq!(canvas.pixels(), once.as_slice());
    }

    #[test]
    fn canvas_pixels_follow_markers() {
        let settings = ProjectionSettings::default();
        let mut canvas = OverlayCanvas::from_settings(&settings);

        draw_projection(&layout(), &FurnitureCatalog::default(), &settings, &mut canvas);

        assert_eq!(canvas.pixel(200, 150), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(190, 140), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(210, 150), Some(CANVAS_BACKGROUND));
        assert_eq!(canvas.pixel(300, 225), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(300, 236), Some(CANVAS_BACKGROUND));
        assert_eq!(canvas.pixel(0, 0), Some(CANVAS_BACKGROUND));
        assert_eq!(canvas.pixel(400, 0), None);
    }

    #[test]
    fn empty_layout_clears_previous_markers() {
        let settings = ProjectionSettings::default();
        let catalog = FurnitureCatalog::default();
        let mut canvas = OverlayCanvas::from_settings(&settings);

        draw_projection(&layout(), &catalog, &settings, &mut canvas);
        draw_projection(Vec::<PlacedItem>::new().iter(), &catalog, &settings, &mut canvas);

        assert!(canvas.pixels().iter().all(|pixel| *pixel == CANVAS_BACKGROUND));
    }

    #[test]
    fn markers_past_the_edge_are_clipped() {
        let settings = ProjectionSettings::default();
        let mut canvas = OverlayCanvas::from_settings(&settings);
        let items = [
            PlacedItem::new(FurnitureType::Chair, 40.0, -40.0, 0.0),
            PlacedItem::new(FurnitureType::Table, 9.9, 9.9, 0.0),
        ];

        draw_projection(&items, &FurnitureCatalog::default(), &settings, &mut canvas);

        assert_eq!(canvas.pixel(399, 299), Some([0, 0, 255, 255]));
    }
}
