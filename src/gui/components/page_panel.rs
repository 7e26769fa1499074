// src/gui/components/page_panel.rs
//
// Editors for the simulated host page. Typing counts as a DOM mutation;
// "Go" and "Back" count as history navigation.

use eframe::egui;
use crate::gui::app::App;
use crate::page::Trigger;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Host page");

    let mut mutated = false;
    let mut go = false;
    let mut back = false;

    egui::Grid::new("page_fields")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("URL");
            ui.horizontal(|ui| {
                let r = ui.add(egui::TextEdit::singleline(&mut app.fields.url).desired_width(420.0));
                go |= r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                go |= ui.button("Go").clicked();
                back = ui
                    .add_enabled(app.history.len() > 1, egui::Button::new("Back"))
                    .clicked();
            });
            ui.end_row();

            ui.label("document.title");
            mutated |= ui
                .add(egui::TextEdit::singleline(&mut app.fields.doc_title).desired_width(420.0))
                .changed();
            ui.end_row();

            ui.label("<h2>");
            mutated |= ui
                .add(egui::TextEdit::singleline(&mut app.fields.heading).desired_width(420.0))
                .changed();
            ui.end_row();
        });

    if back {
        app.back();
    } else if go {
        app.navigate();
    } else if mutated {
        app.apply_fields(Trigger::Mutation);
    }
}
