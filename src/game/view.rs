use bevy::prelude::*;

use crate::game::config::{ViewConfig, ViewConfigHandle};
use crate::game::fixed_math::FixedVec2;
use crate::game::maze::{CellGeometry, Tile};
use crate::game::motion::ChaseController;
use crate::game::pickups::Pickups;
use crate::game::simulation::ChaseStartup;

pub struct ViewPlugin;

impl Plugin for ViewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, build_wall_shapes.after(ChaseStartup::BuildWorld)))
            .add_systems(Update, draw_chase.run_if(resource_exists::<WallShapes>));
    }
}

/// Wall rectangles in screen space, computed once from the maze.
#[derive(Resource, Debug, Clone, Default)]
pub struct WallShapes {
    pub rects: Vec<Rect>,
    /// Full maze size in world units.
    pub extent: Vec2,
}

impl WallShapes {
    pub fn from_chase(chase: &ChaseController) -> Self {
        let geometry = chase.geometry();
        let map = chase.map();
        let size = geometry.cell_size.to_num::<f32>();
        let extent = Vec2::new(map.cols() as f32 * size, map.rows() as f32 * size);

        let rects = map
            .cells_of(Tile::Wall)
            .map(|cell| {
                let min = to_screen(geometry.origin(cell), extent);
                Rect::from_corners(min, min + Vec2::new(size, -size))
            })
            .collect();

        Self { rects, extent }
    }
}

/// Maze coordinates grow right and down from the top-left corner; Bevy's 2D
/// world grows up from the window center.
pub fn to_screen(pos: FixedVec2, extent: Vec2) -> Vec2 {
    let p = pos.to_vec2();
    Vec2::new(p.x - extent.x / 2.0, extent.y / 2.0 - p.y)
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn build_wall_shapes(mut commands: Commands, chase: Option<Res<ChaseController>>) {
    let Some(chase) = chase else {
        warn!("[VIEW] No chase to draw");
        return;
    };
    let shapes = WallShapes::from_chase(&chase);
    info!("[VIEW] {} wall tiles, maze extent {:?}", shapes.rects.len(), shapes.extent);
    commands.insert_resource(shapes);
}

fn rgb([r, g, b]: [f32; 3]) -> Color {
    Color::srgb(r, g, b)
}

fn draw_chase(
    mut gizmos: Gizmos,
    walls: Res<WallShapes>,
    chase: Res<ChaseController>,
    pickups: Res<Pickups>,
    view_handle: Option<Res<ViewConfigHandle>>,
    view_configs: Res<Assets<ViewConfig>>,
) {
    let fallback = ViewConfig::default();
    let view = view_handle
        .as_ref()
        .and_then(|handle| view_configs.get(&handle.0))
        .unwrap_or(&fallback);

    let wall_color = rgb(view.wall_color);
    for rect in &walls.rects {
        gizmos.rect_2d(Isometry2d::from_translation(rect.center()), rect.size(), wall_color);
    }

    let pickup_color = rgb(view.pickup_color);
    let pickup_radius = pickups.radius().to_num::<f32>();
    for &pos in pickups.positions() {
        gizmos.circle_2d(Isometry2d::from_translation(to_screen(pos, walls.extent)), pickup_radius, pickup_color);
    }

    let agent = chase.agent();
    gizmos.circle_2d(
        Isometry2d::from_translation(to_screen(agent.position, walls.extent)),
        agent.radius.to_num::<f32>(),
        rgb(view.ghost_color),
    );

    if view.show_path {
        let geometry: CellGeometry = chase.geometry();
        let points = std::iter::once(to_screen(agent.position, walls.extent))
            .chain(chase.path().iter().map(|cell| to_screen(geometry.center(cell), walls.extent)));
        gizmos.linestrip_2d(points, rgb(view.path_color));
    }
}
