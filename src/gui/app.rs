// src/gui/app.rs
use std::{error::Error, time::{Duration, Instant}};

use eframe::egui;

use crate::{
    background::BackgroundWorker,
    config::WatchOptions,
    core::HttpFetch,
    page::{BadgeView, Document, MemoryDocument, NodeId, Trigger, Watcher},
};

use super::components::{badge_panel, page_panel};

const SAMPLE_URL: &str = "https://video.unext.jp/title/SID0012345";
const SAMPLE_TITLE: &str = "シド・アンド・ナンシー(洋画 / 1986) - 動画配信 | U-NEXT";
const SAMPLE_HEADING: &str = "シド・アンド・ナンシー";

// Repaint cadence while a lookup is in flight.
const PENDING_REPAINT: Duration = Duration::from_millis(100);

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Filmarks Badge Preview",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(App::new(WatchOptions::default())))
        }),
    )?;
    Ok(())
}

/// What the simulated host page currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageFields {
    pub url: String,
    pub doc_title: String,
    pub heading: String,
}

pub struct App {
    pub watcher: Watcher<MemoryDocument, BackgroundWorker<HttpFetch>>,

    // editors (UI thread only)
    pub fields: PageFields,
    pub history: Vec<PageFields>,
    heading_node: NodeId,

    pub status: String,
}

impl App {
    pub fn new(options: WatchOptions) -> Self {
        let fields = PageFields {
            url: s!(SAMPLE_URL),
            doc_title: s!(SAMPLE_TITLE),
            heading: s!(SAMPLE_HEADING),
        };

        let mut doc = MemoryDocument::new(&fields.url, &fields.doc_title);
        let body = doc.body();
        let main = doc.element(body, "main");
        let heading_node = doc.element(main, "h2");
        doc.text(heading_node, &fields.heading);
        let synopsis = doc.element(main, "p");
        doc.text(synopsis, "あらすじ");

        let channel = BackgroundWorker::new(HttpFetch::default());
        let watcher = Watcher::new(doc, channel, options, Instant::now());
        log::info!("Init: preview page {}", fields.url);

        Self {
            watcher,
            history: vec![fields.clone()],
            fields,
            heading_node,
            status: s!("Waiting for first check…"),
        }
    }

    /// Push edited fields into the simulated document.
    pub fn apply_fields(&mut self, trigger: Trigger) {
        let node = self.heading_node;
        let doc = self.watcher.doc_mut();
        doc.set_location(&self.fields.url);
        doc.set_title(&self.fields.doc_title);
        doc.set_text(node, &self.fields.heading);
        self.watcher.notify(trigger, Instant::now());
    }

    pub fn navigate(&mut self) {
        self.history.push(self.fields.clone());
        self.apply_fields(Trigger::PushState);
    }

    pub fn back(&mut self) {
        if self.history.len() < 2 {
            return;
        }
        self.history.pop();
        if let Some(prev) = self.history.last() {
            self.fields = prev.clone();
        }
        self.apply_fields(Trigger::PopState);
    }

    fn pump(&mut self, ctx: &egui::Context) {
        loop {
            let Some((token, reply)) = self.watcher.channel().try_recv() else { break };
            self.watcher.on_reply(token, reply);
        }

        let now = Instant::now();
        if self.watcher.poll(now) {
            let st = self.watcher.state();
            self.status = if st.last_title.is_empty() {
                s!("Not a title page")
            } else {
                format!("Showing: {}", st.last_title)
            };
        }

        if let Some(at) = self.watcher.next_deadline() {
            ctx.request_repaint_after(at.saturating_duration_since(now));
        }
        if matches!(self.watcher.badge_view(), Some(BadgeView::Loading)) {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            page_panel::draw(ui, self);
            ui.separator();
            badge_panel::draw(ui, self);
        });
    }
}
