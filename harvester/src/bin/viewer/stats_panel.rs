use new_egui_macroquad::egui;
use shared::WorldSnapshot;

pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 20.0;

/// Colony counters and the playback controls.
pub struct StatsPanel {
    pub speed: f64,
    pub paused: bool,
}

impl StatsPanel {
    pub fn new() -> Self {
        Self {
            speed: 1.0,
            paused: false,
        }
    }

    pub fn draw(&mut self, egui_ctx: &egui::Context, snapshot: &WorldSnapshot, finished: bool) {
        let s = &snapshot.sample;

        egui::Window::new("Colony")
            .resizable(false)
            .collapsible(true)
            .default_pos(egui::pos2(12.0, 12.0))
            .show(egui_ctx, |ui| {
                egui::Grid::new("colony_stats")
                    .num_columns(2)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Time:");
                        ui.label(format!("{:.1}s (tick {})", s.time, s.tick));
                        ui.end_row();

                        ui.label("Alpha:");
                        ui.label(format!("{:.4}", s.alpha));
                        ui.end_row();

                        ui.label("Foragers:");
                        ui.label(format!("{}", s.population));
                        ui.end_row();

                        ui.label("Food available:");
                        ui.label(format!("{}", s.food_available));
                        ui.end_row();

                        ui.label("Arrivals:");
                        ui.label(format!("{}", s.cumulative_arrivals));
                        ui.end_row();

                        ui.label("Departures:");
                        ui.label(format!("{}", s.cumulative_departures));
                        ui.end_row();
                    });

                ui.separator();
                ui.add(
                    egui::Slider::new(&mut self.speed, MIN_SPEED..=MAX_SPEED)
                        .logarithmic(true)
                        .text("speed")
                        .custom_formatter(|n, _decimals| format!("{:.2}x", n)),
                );
                ui.checkbox(&mut self.paused, "Paused (space)");

                if finished {
                    ui.label(
                        egui::RichText::new("Run budget exhausted")
                            .color(egui::Color32::from_rgb(220, 180, 70)),
                    );
                }
            });
    }
}
