// src/gui/components/badge_panel.rs
//
// Draws whatever the watcher currently shows. Links open in a new browser
// tab and never touch the preview's own state.

use eframe::egui::{self, Color32, RichText};

use crate::config::consts::*;
use crate::gui::app::App;
use crate::page::{BadgeView, Document};
use crate::protocol::MatchKind;

const MUTED: Color32 = Color32::from_rgb(0x8b, 0x95, 0xa5);
const THUMB_MAX_H: f32 = 96.0;

pub fn draw(ui: &mut egui::Ui, app: &App) {
    ui.heading("Badge");

    let doc = app.watcher.doc();
    let placement = match app.watcher.state().badge {
        Some(b) if doc.parent_element(b) == Some(doc.body()) => "appended to body",
        Some(b) if doc.is_connected(b) => "inline after title",
        Some(_) => "detached",
        None => "none",
    };
    ui.weak(format!("placement: {placement}"));

    egui::Frame::group(ui.style()).show(ui, |ui| match app.watcher.badge_view() {
        None => {
            ui.weak("No badge on this page");
        }
        Some(BadgeView::Loading) => {
            ui.horizontal(|ui| {
                ui.strong(BADGE_LABEL);
                ui.spinner();
                ui.label(LOADING_TEXT);
            });
        }
        Some(BadgeView::NoScore) => {
            ui.horizontal(|ui| {
                ui.strong(BADGE_LABEL);
                ui.label(RichText::new(NO_SCORE_TEXT).color(MUTED).size(12.0));
            });
        }
        Some(BadgeView::Scored(card)) => {
            ui.horizontal(|ui| {
                if let Some(thumb) = &card.thumbnail {
                    ui.add(egui::Image::new(thumb.as_str()).max_height(THUMB_MAX_H));
                }
                ui.vertical(|ui| {
                    let main = RichText::new(format!("{BADGE_LABEL} {STAR} {}", card.score)).strong().size(16.0);
                    if ui.link(main).clicked() {
                        ui.ctx().open_url(egui::OpenUrl::new_tab(&card.movie_url));
                    }
                    if let Some(title) = &card.title {
                        ui.label(title);
                    }
                    if card.matched == MatchKind::Fallback {
                        ui.label(RichText::new("closest guess").color(MUTED).italics());
                    }
                    if ui.link(SEARCH_LINK_TEXT).clicked() {
                        ui.ctx().open_url(egui::OpenUrl::new_tab(&card.search_url));
                    }
                });
            });
        }
    });
}
