use bevy::diagnostic::{
    DiagnosticsStore, EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::audio::UiChirp;
use crate::input::InputAxes;
use crate::player::{CameraMode, Player};
use crate::station::{ActiveModule, Settings};
use crate::world::Npc;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 255, 170);

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Update, hud_system);
    }
}

fn hold_button(ui: &mut egui::Ui, label: &str) -> bool {
    ui.add_sized([48.0, 48.0], egui::Button::new(label))
        .is_pointer_button_down_on()
}

fn hud_system(
    mut contexts: EguiContexts,
    mut settings: ResMut<Settings>,
    active: Res<ActiveModule>,
    mode: Res<State<CameraMode>>,
    mut next_mode: ResMut<NextState<CameraMode>>,
    mut axes: ResMut<InputAxes>,
    mut chirp: EventWriter<UiChirp>,
    mut touch_held: Local<bool>,
    diagnostics: Res<DiagnosticsStore>,
    player_q: Query<(&Transform, &Player)>,
    crew_q: Query<&Npc>,
) {
    // Top bar: title, status, camera + settings buttons
    egui::Area::new(egui::Id::new("top-bar"))
        .anchor(egui::Align2::LEFT_TOP, [16.0, 16.0])
        .show(contexts.ctx_mut(), |ui| {
            ui.heading(egui::RichText::new("ISS METAVERSE").strong());
            ui.label(
                egui::RichText::new("ORBITAL STATUS: STABLE")
                    .color(ACCENT)
                    .monospace(),
            );
        });

    egui::Area::new(egui::Id::new("top-buttons"))
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal(|ui| {
                let label = match mode.get() {
                    CameraMode::FirstPerson => "VIEW: FIRST PERSON",
                    CameraMode::ThirdPerson => "VIEW: THIRD PERSON",
                };
                if ui.button(label).clicked() {
                    next_mode.set(mode.get().toggled());
                    chirp.send(UiChirp::TOGGLE);
                }
                if ui.button("⚙").clicked() {
                    settings.show_settings = !settings.show_settings;
                }
            });
        });

    // Module info panel, only while a module is active
    if let Some(info) = active.info() {
        egui::Window::new("module-info")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -96.0])
            .show(contexts.ctx_mut(), |ui| {
                ui.horizontal(|ui| {
                    ui.heading(egui::RichText::new(info.name).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                        ui.monospace(format!("ID: {}", info.id.to_uppercase()));
                    });
                });
                ui.label(
                    egui::RichText::new("SYSTEM ONLINE")
                        .color(ACCENT)
                        .monospace()
                        .small(),
                );
                ui.separator();
                ui.label(info.description_ja);
                ui.weak(info.description_en);
                ui.add_space(8.0);
                if ui.button("VIEW DETAILED ANALYTICS").clicked() {
                    info!("open:{}", info.id);
                    chirp.send(UiChirp::CONFIRM);
                }
            });
    }

    // Touch controls: directional pad bottom-left, ascent buttons bottom-right
    let mut held = InputAxes::default();
    let mut any_held = false;

    egui::Area::new(egui::Id::new("touch-move"))
        .anchor(egui::Align2::LEFT_BOTTOM, [16.0, -16.0])
        .show(contexts.ctx_mut(), |ui| {
            egui::Grid::new("move-pad").show(ui, |ui| {
                ui.label("");
                if hold_button(ui, "▲") {
                    held.move_forward = 1.0;
                    any_held = true;
                }
                ui.label("");
                ui.end_row();

                if hold_button(ui, "◀") {
                    held.rotate_y = -1.0;
                    any_held = true;
                }
                if hold_button(ui, "▼") {
                    held.move_forward = -1.0;
                    any_held = true;
                }
                if hold_button(ui, "▶") {
                    held.rotate_y = 1.0;
                    any_held = true;
                }
                ui.end_row();
            });
        });

    egui::Area::new(egui::Id::new("touch-ascend"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(contexts.ctx_mut(), |ui| {
            ui.vertical(|ui| {
                if hold_button(ui, "UP") {
                    held.ascend = 1.0;
                    any_held = true;
                }
                if hold_button(ui, "DWN") {
                    held.ascend = -1.0;
                    any_held = true;
                }
            });
        });

    if any_held {
        if !*touch_held {
            chirp.send(UiChirp::PRESS);
        }
        *touch_held = true;
        axes.move_forward = held.move_forward;
        axes.rotate_y = held.rotate_y;
        axes.ascend = held.ascend;
    } else if *touch_held {
        // Mirrors the touch-end reset: strafe is keyboard-only and untouched.
        *touch_held = false;
        axes.move_forward = 0.0;
        axes.rotate_y = 0.0;
        axes.ascend = 0.0;
    }

    if settings.show_help {
        egui::Window::new("Help").show(contexts.ctx_mut(), |ui| {
            ui.label("W/S: Move Forward/Back");
            ui.label("A/D: Turn Left/Right");
            ui.label("Left/Right Arrows: Strafe");
            ui.label("Space / Shift: Ascend / Descend");
            ui.label("V: Toggle Camera View");
            ui.label("H: Toggle Help");
            ui.label("F3: Toggle Diagnostics");
        });
    }

    if settings.show_diagnostics {
        egui::Window::new("Diagnostics").show(contexts.ctx_mut(), |ui| {
            if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                if let Some(value) = fps.smoothed() {
                    ui.label(format!("FPS: {:.1}", value));
                }
            }
            if let Some(entity_count) = diagnostics.get(&EntityCountDiagnosticsPlugin::ENTITY_COUNT)
            {
                if let Some(value) = entity_count.value() {
                    ui.label(format!("Entities: {}", value));
                }
            }
            if let Ok((transform, player)) = player_q.get_single() {
                let p = transform.translation;
                ui.label(format!(
                    "Player: ({:.1}, {:.1}, {:.1})  yaw {:.2}",
                    p.x, p.y, p.z, player.yaw
                ));
            }
            ui.label(format!("Camera: {:?}", mode.get()));
            ui.label(format!(
                "Active module: {}",
                active.info().map(|m| m.id).unwrap_or("none")
            ));
            ui.separator();
            ui.label("Crew on EVA:");
            for npc in &crew_q {
                ui.monospace(&npc.name);
            }
        });
    }

    if settings.show_settings {
        egui::Window::new("Settings").show(contexts.ctx_mut(), |ui| {
            ui.add(egui::Slider::new(&mut settings.player_speed, 0.5..=20.0).text("Move Speed"));
            ui.add(egui::Slider::new(&mut settings.rotation_speed, 0.5..=6.0).text("Turn Speed"));
            ui.add(
                egui::Slider::new(&mut settings.activation_radius, 2.0..=20.0)
                    .text("Activation Radius"),
            );
            ui.add(egui::Slider::new(&mut settings.earth_spin, 0.0..=0.05).text("Earth Spin"));
            ui.add(egui::Slider::new(&mut settings.cloud_spin, 0.0..=0.05).text("Cloud Spin"));
            ui.separator();
            ui.checkbox(&mut settings.show_help, "Show Help");
            ui.checkbox(&mut settings.show_diagnostics, "Show Diagnostics");
        });
    }
}
