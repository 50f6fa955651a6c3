use macroquad::prelude::*;
use macroquad::miniquad::window::dpi_scale as screen_dpi_scale;
use shared::{EntityKind, EntitySnapshot, WorldSnapshot};

const BACKGROUND_COLOR: u32 = 0x282828;
const ARENA_COLOR: u32 = 0x3c3836;
const NEST_COLOR: u32 = 0xd65d0e;
const FOOD_COLOR: u32 = 0x98971a;
const OUTBOUND_COLOR: u32 = 0xebdbb2;
const CARRYING_COLOR: u32 = 0xfabd2f;
const EMPTY_RETURN_COLOR: u32 = 0x83a598;

/// Draws world snapshots. Holds no simulation state of its own.
pub struct Renderer {
    camera: Camera2D,
    arena_width: f32,
    arena_height: f32,
}

impl Renderer {
    pub fn new(arena_width: f64, arena_height: f64) -> Self {
        let arena_width = arena_width as f32;
        let arena_height = arena_height as f32;
        Self {
            camera: Camera2D::from_display_rect(Rect::new(0.0, 0.0, arena_width, arena_height)),
            arena_width,
            arena_height,
        }
    }

    /// Main rendering function, draws one frame from a committed snapshot.
    pub fn render(&mut self, snapshot: &WorldSnapshot) {
        clear_background(Color::from_hex(BACKGROUND_COLOR));
        self.fit_viewport();
        set_camera(&self.camera);

        draw_rectangle(
            0.0,
            0.0,
            self.arena_width,
            self.arena_height,
            Color::from_hex(ARENA_COLOR),
        );

        for nest in snapshot.entities.iter().filter(|e| e.kind == EntityKind::Nest) {
            draw_square(nest, Color::from_hex(NEST_COLOR));
        }
        for food in snapshot.food() {
            draw_square(food, Color::from_hex(FOOD_COLOR));
        }
        for ant in snapshot.ants() {
            draw_ant(ant);
        }

        set_default_camera();
    }

    /// Letterboxes the arena so it keeps its aspect ratio in any window size.
    fn fit_viewport(&mut self) {
        let (sw, sh) = (screen_width(), screen_height());
        let scale = (sw / self.arena_width).min(sh / self.arena_height);
        let w = self.arena_width * scale;
        let h = self.arena_height * scale;
        let dpi = screen_dpi_scale();
        self.camera.viewport = Some((
            (((sw - w) / 2.0) * dpi) as i32,
            (((sh - h) / 2.0) * dpi) as i32,
            (w * dpi) as i32,
            (h * dpi) as i32,
        ));
    }
}

fn draw_square(entity: &EntitySnapshot, color: Color) {
    let size = entity.size as f32;
    draw_rectangle(
        entity.x as f32 - size / 2.0,
        entity.y as f32 - size / 2.0,
        size,
        size,
        color,
    );
}

fn draw_ant(ant: &EntitySnapshot) {
    let color = match ant.kind {
        EntityKind::AntReturningWithFood => Color::from_hex(CARRYING_COLOR),
        EntityKind::AntReturningEmpty => Color::from_hex(EMPTY_RETURN_COLOR),
        _ => Color::from_hex(OUTBOUND_COLOR),
    };
    let radius = ant.size as f32 / 2.0;
    let (x, y) = (ant.x as f32, ant.y as f32);
    draw_circle(x, y, radius, color);

    // Heading marker
    let (sin, cos) = (ant.heading as f32).sin_cos();
    draw_line(
        x,
        y,
        x + cos * radius * 1.8,
        y + sin * radius * 1.8,
        1.5,
        color,
    );
}
