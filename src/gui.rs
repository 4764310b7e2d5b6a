//! Desktop window: pick a spreadsheet and an editor, read the report.
//!
//! The sidebar holds the spreadsheet path (typed, or dropped onto the window)
//! and the editor selector; the central panel shows either the instructions
//! or the rendered report. The report text is recomputed only when the loaded
//! table or the selected editor changes.

use crate::config::SchemaConfig;
use crate::report;
use crate::tracker::{ManuscriptTable, load_table};
use eframe::egui;
use std::path::{Path, PathBuf};

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ReportApp {
    pub editor: Option<String>,
    pub report_path: String,

    #[serde(skip)]
    config_dir: PathBuf,
    #[serde(skip)]
    config: Option<SchemaConfig>,
    #[serde(skip)]
    table: Option<ManuscriptTable>,
    #[serde(skip)]
    report_text: String,
    #[serde(skip)]
    status: String,
}

impl Default for ReportApp {
    fn default() -> Self {
        Self {
            editor: None,
            report_path: String::new(),
            config_dir: crate::config::resolve_config_dir(None),
            config: None,
            table: None,
            report_text: String::new(),
            status: String::new(),
        }
    }
}

impl ReportApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config_dir: PathBuf) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.config_dir = config_dir;
        app.reload_config();
        app
    }

    fn reload_config(&mut self) {
        match SchemaConfig::load(&self.config_dir) {
            Ok(config) => {
                if let Some(editor) = &self.editor
                    && config.require_editor(editor).is_err()
                {
                    self.editor = None;
                }
                self.config = Some(config);
                self.status.clear();
            }
            Err(e) => {
                log::error!("Failed to load configuration: {e}");
                self.status = e.to_string();
                self.config = None;
            }
        }
        self.refresh_report();
    }

    fn load_spreadsheet(&mut self, path: &Path) {
        // A new upload always replaces the previous table.
        self.table = None;
        self.report_path = path.display().to_string();

        let Some(config) = &self.config else {
            self.status = "Configuration not loaded".to_owned();
            return;
        };

        match load_table(path, config) {
            Ok(table) => {
                if let Ok(present) = table.editors_present() {
                    for editor in config.editors() {
                        if !present.contains(editor) {
                            log::warn!("Configured editor '{editor}' has no manuscripts in {}", path.display());
                        }
                    }
                }
                self.status = format!("Loaded {} manuscript(s)", table.len());
                self.table = Some(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status = e.to_string();
            }
        }
        self.refresh_report();
    }

    fn refresh_report(&mut self) {
        let Some(config) = &self.config else {
            self.report_text.clear();
            return;
        };

        let result = match (&self.table, &self.editor) {
            (None, _) => report::render(config, None, "", None),
            (Some(_), None) => Ok("Select an Associate Editor in the sidebar.".to_owned()),
            (Some(table), Some(editor)) => report::render(config, Some(table), editor, None),
        };

        match result {
            Ok(text) => self.report_text = text,
            Err(e) => {
                log::error!("Failed to render report: {e}");
                self.report_text.clear();
                self.status = e.into();
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.last() {
            self.load_spreadsheet(path);
        }
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Report");
        ui.add_space(4.0);

        ui.label("Spreadsheet (path, or drop a file on the window)");
        let response = ui.text_edit_singleline(&mut self.report_path);
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.button("Load").clicked() || submitted) && !self.report_path.trim().is_empty() {
            let path = PathBuf::from(self.report_path.trim());
            self.load_spreadsheet(&path);
        }

        ui.separator();

        let editors = self
            .config
            .as_ref()
            .map(|c| c.editors().to_vec())
            .unwrap_or_default();
        let before = self.editor.clone();
        egui::ComboBox::from_label("Associate Editor")
            .selected_text(self.editor.as_deref().unwrap_or("Select..."))
            .show_ui(ui, |ui| {
                for editor in &editors {
                    ui.selectable_value(&mut self.editor, Some(editor.clone()), editor.as_str());
                }
            });
        if self.editor != before {
            self.refresh_report();
        }

        ui.separator();

        ui.label(format!("Configuration: {}", self.config_dir.display()));
        if ui.button("Reload configuration").clicked() {
            self.reload_config();
        }

        if !self.status.is_empty() {
            ui.add_space(8.0);
            ui.label(&self.status);
        }
    }
}

impl eframe::App for ReportApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        egui::SidePanel::left("report_sidebar")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                self.render_sidebar(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Editor Performance Reports");
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(egui::RichText::new(&self.report_text).monospace());
            });
        });
    }
}

/// Opens the report window and blocks until it is closed.
pub fn run(config_dir: PathBuf) -> eframe::Result {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([520.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Editor Performance Reports",
        native_options,
        Box::new(|cc| Ok(Box::new(ReportApp::new(cc, config_dir)))),
    )
}
