//! Native window hosting the explorer.
//!
//! Left: search box and chunk tree. Right: info line and the text or image
//! of the selected chunk. Bottom: log lines.
use std::path::{Path, PathBuf};

use eframe::egui;
use eframe::{CreationContext, Frame, NativeOptions};
use swbfchunk::ContainerKind;
use tracing::{info, warn};

use super::image_panel::ImagePanel;
use super::tree_view::{TreeAction, show_tree};
use crate::config::ViewerConfig;
use crate::explorer::Explorer;
use crate::explorer::display::DisplayMode;
use crate::logging::LogBuffer;

/// Open the main window, optionally loading `initial_file` first.
pub fn run_gui(initial_file: Option<PathBuf>, config: ViewerConfig, log: LogBuffer) -> anyhow::Result<()> {
    let native_options = NativeOptions {
        initial_window_size: Some(egui::vec2(config.window_width, config.window_height)),
        min_window_size: Some(egui::vec2(600.0, 400.0)),
        ..NativeOptions::default()
    };

    eframe::run_native(
        "LVLExplorer",
        native_options,
        Box::new(move |cc: &CreationContext| Box::new(LvlExplorer::new(cc, config, log, initial_file))),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch native window: {}", err))
}

pub struct LvlExplorer {
    explorer: Explorer,
    config: ViewerConfig,
    log: LogBuffer,
    query: String,
    image_panel: ImagePanel,
}

impl LvlExplorer {
    pub fn new(cc: &CreationContext, config: ViewerConfig, log: LogBuffer, initial_file: Option<PathBuf>) -> Self {
        let ctx = &cc.egui_ctx;
        ctx.set_visuals(egui::Visuals::light());
        if config.ui_scale > 0.0 && config.ui_scale != 1.0 {
            let current = ctx.pixels_per_point();
            ctx.set_pixels_per_point(current * config.ui_scale);
        }

        let mut app = Self {
            explorer: Explorer::new(),
            config,
            log,
            query: String::new(),
            image_panel: ImagePanel::default(),
        };
        if let Some(path) = initial_file {
            app.open_path(&path);
        }
        app
    }

    fn pick_file(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Open *.lvl File")
            .add_filter("Battlefront II containers", &ContainerKind::EXTENSIONS);
        if let Some(dir) = &self.config.last_directory {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.open_path(&path);
        }
    }

    fn open_path(&mut self, path: &Path) {
        self.image_panel.clear();
        match self.explorer.open(path) {
            Ok(report) => {
                if let Some(err) = report.error {
                    show_error(&format!(
                        "Errors occurred while opening file '{}'!\n\n{}",
                        path.display(),
                        err
                    ));
                }
                if let Some(dir) = path.parent() {
                    self.config.last_directory = Some(dir.to_path_buf());
                    self.config.save();
                }
            }
            Err(err) => {
                warn!("{}", err);
                show_error(&format!("Cannot open '{}': {}", path.display(), err));
            }
        }
    }

    fn apply(&mut self, actions: Vec<TreeAction>) {
        for action in actions {
            match action {
                TreeAction::Toggle(node) => self.explorer.toggle_expanded(node),
                // Lookup misses are already logged.
                TreeAction::Select(node) => {
                    let _ = self.explorer.select(node);
                }
            }
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui, frame: &mut Frame) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open *.lvl File").clicked() {
                    ui.close_menu();
                    self.pick_file();
                }
                if ui.button("Exit").clicked() {
                    ui.close_menu();
                    frame.close();
                }
            });
        });
    }

    fn tree_panel(&mut self, ui: &mut egui::Ui) {
        let search = ui.add(
            egui::TextEdit::singleline(&mut self.query)
                .hint_text("Search")
                .desired_width(f32::INFINITY),
        );
        if search.changed() {
            self.explorer.search(&self.query);
        }
        ui.separator();

        let actions = egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| show_tree(ui, self.explorer.tree(), self.explorer.selected()))
            .inner;
        self.apply(actions);
    }

    fn display_panel(&mut self, ui: &mut egui::Ui) {
        match self.explorer.info() {
            Some(info) => ui.monospace(info.to_string()),
            None => ui.label(self.explorer.file_name().unwrap_or("No file loaded")),
        };
        ui.separator();

        let display = self.explorer.display();
        match display.mode() {
            DisplayMode::None => {}
            DisplayMode::Text => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let mut text = display.text();
                        ui.add(
                            egui::TextEdit::multiline(&mut text)
                                .code_editor()
                                .desired_width(f32::INFINITY),
                        );
                    });
            }
            DisplayMode::Image => self.image_panel.show(ui, display),
        }
    }
}

impl eframe::App for LvlExplorer {
    fn update(&mut self, ctx: &egui::Context, frame: &mut Frame) {
        let size = frame.info().window_info.size;
        self.config.window_width = size.x;
        self.config.window_height = size.y;

        egui::TopBottomPanel::top("menu").show(ctx, |ui| self.menu_bar(ui, frame));

        let log = self.log.clone();
        egui::TopBottomPanel::bottom("log")
            .resizable(true)
            .default_height(110.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in log.lines() {
                            ui.monospace(line);
                        }
                    });
            });

        egui::SidePanel::left("chunk_tree")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.tree_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.display_panel(ui));
    }

    fn on_close_event(&mut self) -> bool {
        info!("closing, saving settings");
        self.config.save();
        true
    }
}

fn show_error(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Error")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
