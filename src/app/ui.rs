use super::notice::NoticeKind;
use super::{FileEditor, PromptUploader};
use crate::upload::payload::{MODEL_CHOICES, TEMPERATURE_CHOICES};
use crate::upload::{
    extract_variables, scan_placeholders, FileId, PromptType, UploadStatus, SUPPORTED_EXTENSIONS,
};
use crate::utils::file_size::FileSizeUtils;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const DANGER: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);
const WARNING: Color32 = Color32::from_rgb(230, 160, 40);

fn status_icon(status: &UploadStatus) -> (&'static str, Color32) {
    match status {
        UploadStatus::Pending => ("📄", MUTED),
        UploadStatus::Uploading => ("⏳", ACCENT),
        UploadStatus::Success => ("✅", SUCCESS),
        UploadStatus::Error(_) => ("❌", DANGER),
    }
}

fn variable_badge(ui: &mut egui::Ui, name: &str) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .stroke(egui::Stroke::new(1.0, ACCENT.gamma_multiply(0.6)))
        .rounding(4.0)
        .inner_margin(egui::Margin::symmetric(4.0, 1.0))
        .show(ui, |ui| {
            ui.small(name);
        });
}

fn extension_list() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}

impl PromptUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 60.0;
            let footer_margin = 15.0;
            let content_height = total_height - footer_height - footer_margin;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Prompt File Uploader");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Turn local files into Langfuse prompts")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    let submitting = self.state.is_submitting();
                    ui.add_enabled_ui(!submitting, |ui| {
                        self.render_connection(ui);
                        ui.add_space(10.0);
                        self.render_config(ui);
                    });

                    ui.add_space(20.0);
                    self.render_drop_zone(ui);

                    if !self.state.is_empty() {
                        ui.add_space(20.0);
                        self.render_file_list(ui);
                    }

                    ui.add_space(20.0);
                    self.render_submit(ui);

                    if submitting || self.state.last_summary().is_some() {
                        ui.add_space(10.0);
                        ui.group(|ui| {
                            let progress_bar = egui::ProgressBar::new(self.state.progress_fraction())
                                .show_percentage()
                                .animate(submitting)
                                .fill(ACCENT);
                            ui.add(progress_bar);
                            ui.label(self.state.status_text());
                        });
                    }

                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(footer_margin);
                self.render_footer(ui);
            });
        });

        self.render_file_dialog(ctx);
    }

    fn render_connection(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Connection")
            .default_open(false)
            .show(ui, |ui| {
                egui::Grid::new("connection_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Langfuse host");
                        ui.text_edit_singleline(&mut self.connection.host);
                        ui.end_row();

                        ui.label("Public key");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.connection.public_key)
                                .hint_text("pk-lf-..."),
                        );
                        ui.end_row();

                        ui.label("Secret key");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.connection.secret_key)
                                .password(true)
                                .hint_text("sk-lf-..."),
                        );
                        ui.end_row();
                    });

                ui.checkbox(&mut self.connection.force_dry_run, "Dry run");
                if self.connection.is_dry_run() {
                    ui.label(
                        RichText::new("Dry run: prompts are logged, nothing is sent").color(WARNING),
                    );
                } else {
                    ui.label(format!("Prompts are sent to {}", self.connection.host));
                }
            });
    }

    fn render_config(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.strong("Prompt Configuration");
            ui.add_space(8.0);

            egui::Grid::new("prompt_config_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Prompt Name");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.config.name)
                            .hint_text("Enter prompt name"),
                    );
                    ui.end_row();

                    ui.label("Prompt Type");
                    egui::ComboBox::from_id_source("prompt_type")
                        .selected_text(self.config.prompt_type.label())
                        .show_ui(ui, |ui| {
                            for prompt_type in [PromptType::Text, PromptType::Chat] {
                                ui.selectable_value(
                                    &mut self.config.prompt_type,
                                    prompt_type,
                                    prompt_type.label(),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label("Model");
                    let model_label = MODEL_CHOICES
                        .iter()
                        .find(|(value, _)| *value == self.config.model)
                        .map(|(_, label)| label.to_string())
                        .unwrap_or_else(|| self.config.model.clone());
                    egui::ComboBox::from_id_source("model")
                        .selected_text(model_label)
                        .show_ui(ui, |ui| {
                            for (value, label) in MODEL_CHOICES {
                                ui.selectable_value(&mut self.config.model, value.to_string(), label);
                            }
                        });
                    ui.end_row();

                    ui.label("Temperature");
                    let temperature_label = TEMPERATURE_CHOICES
                        .iter()
                        .find(|(value, _)| *value == self.config.temperature)
                        .map(|(_, label)| label.to_string())
                        .unwrap_or_else(|| self.config.temperature.to_string());
                    egui::ComboBox::from_id_source("temperature")
                        .selected_text(temperature_label)
                        .show_ui(ui, |ui| {
                            for (value, label) in TEMPERATURE_CHOICES {
                                ui.selectable_value(&mut self.config.temperature, value, label);
                            }
                        });
                    ui.end_row();

                    ui.label("Labels");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.labels_text)
                            .hint_text("production, staging"),
                    );
                    ui.end_row();

                    ui.label("Languages");
                    ui.add(egui::TextEdit::singleline(&mut self.languages_text).hint_text("en, de"));
                    ui.end_row();
                });
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let stroke_color = if hovering {
            ACCENT
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };

        egui::Frame::none()
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .rounding(8.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("📂").size(28.0));
                    ui.strong("Drop files here or browse");
                    ui.label(
                        RichText::new(format!("Support for {} files", extension_list()))
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                    ui.add_space(10.0);

                    ui.horizontal(|ui| {
                        if ui.button("📄 Select Files").clicked() {
                            if let Some(paths) = FileDialog::new()
                                .add_filter("Prompt files", &SUPPORTED_EXTENSIONS)
                                .pick_files()
                            {
                                self.add_paths(paths);
                            }
                        }
                        if ui.button("📁 Import Folder").clicked() {
                            if let Some(folder) = FileDialog::new().pick_folder() {
                                self.import_folder(folder);
                            }
                        }
                        ui.add(
                            egui::TextEdit::singleline(&mut self.folder_filter)
                                .desired_width(180.0)
                                .hint_text("folder filter, e.g. prompts/*.md"),
                        );
                    });
                    ui.label(
                        RichText::new("Folder import skips files listed in .gitignore")
                            .small()
                            .color(MUTED),
                    );
                });
            });
    }

    fn render_file_list(&mut self, ui: &mut egui::Ui) {
        let mut to_remove: Option<FileId> = None;
        let mut to_open: Option<FileId> = None;

        ui.group(|ui| {
            ui.strong("Selected Files");
            ui.add_space(8.0);

            for item in self.state.items() {
                ui.horizontal(|ui| {
                    let (icon, color) = status_icon(&item.status);
                    ui.colored_label(color, icon);

                    ui.vertical(|ui| {
                        if ui.link(item.file.name.as_str()).clicked() {
                            to_open = Some(item.id);
                        }
                        ui.label(
                            RichText::new(FileSizeUtils::format_size(item.file.size))
                                .small()
                                .color(MUTED),
                        );

                        let variables = item
                            .file
                            .content
                            .as_deref()
                            .map(extract_variables)
                            .unwrap_or_default();
                        if !variables.is_empty() {
                            ui.horizontal_wrapped(|ui| {
                                ui.label(RichText::new("Variables:").small().color(MUTED));
                                for variable in &variables {
                                    variable_badge(ui, variable);
                                }
                            });
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        let removable = item.status != UploadStatus::Uploading;
                        if ui.add_enabled(removable, egui::Button::new("✖")).clicked() {
                            to_remove = Some(item.id);
                        }

                        match &item.status {
                            UploadStatus::Uploading => {
                                ui.add(
                                    egui::ProgressBar::new(item.progress as f32 / 100.0)
                                        .desired_width(96.0)
                                        .fill(ACCENT),
                                );
                            }
                            UploadStatus::Error(message) => {
                                ui.colored_label(DANGER, RichText::new(message.as_str()).small());
                            }
                            _ => {}
                        }
                    });
                });
                ui.add_space(4.0);
            }
        });

        if let Some(id) = to_remove {
            self.remove_file(id);
        }
        if let Some(id) = to_open {
            self.editor = Some(FileEditor { id, draft: None });
        }
    }

    fn render_submit(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            let submitting = self.state.is_submitting();
            let label = if submitting {
                "⏳ Processing Files...".to_string()
            } else {
                format!("📤 Create Prompts ({})", self.state.len())
            };

            ui.add_enabled_ui(!submitting, |ui| {
                let button = egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
                if ui.add(button).clicked() {
                    self.start_submit();
                }
            });
        });
    }

    fn render_file_dialog(&mut self, ctx: &egui::Context) {
        let Some(mut editor) = self.editor.take() else {
            return;
        };
        let Some(item) = self.state.get(editor.id).cloned() else {
            return;
        };

        let editable = item.status == UploadStatus::Pending && item.file.content.is_some();
        let mut open = true;
        let mut saved: Option<String> = None;

        egui::Window::new(format!("📄 {}", item.file.name))
            .id(egui::Id::new(("file_editor", editor.id)))
            .open(&mut open)
            .default_size([640.0, 480.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if editor.draft.is_none() {
                        if ui.add_enabled(editable, egui::Button::new("✏ Edit")).clicked() {
                            editor.draft = item.file.content.clone();
                        }
                    } else {
                        if ui.button("✖ Cancel").clicked() {
                            editor.draft = None;
                        }
                        if ui.button("💾 Save").clicked() {
                            saved = editor.draft.take();
                        }
                    }
                });
                ui.add_space(6.0);

                egui::ScrollArea::vertical()
                    .max_height(360.0)
                    .show(ui, |ui| match (editor.draft.as_mut(), &item.file.content) {
                        (Some(draft), _) => {
                            ui.add(
                                egui::TextEdit::multiline(draft)
                                    .desired_width(f32::INFINITY)
                                    .desired_rows(16)
                                    .font(egui::TextStyle::Monospace)
                                    .hint_text("Enter your prompt content..."),
                            );
                        }
                        (None, Some(content)) => {
                            ui.add(egui::Label::new(RichText::new(content.as_str()).monospace()).wrap(true));
                        }
                        (None, None) => {
                            ui.colored_label(DANGER, "This file could not be read as text");
                        }
                    });

                let text = editor
                    .draft
                    .as_deref()
                    .or(item.file.content.as_deref())
                    .unwrap_or_default();
                let scan = scan_placeholders(text);
                if !scan.variables.is_empty() {
                    ui.separator();
                    ui.strong("Variables found:");
                    ui.horizontal_wrapped(|ui| {
                        for variable in &scan.variables {
                            variable_badge(ui, variable);
                        }
                    });
                }
                if scan.unclosed > 0 {
                    ui.colored_label(
                        WARNING,
                        format!("⚠ {} placeholder(s) opened with {{{{ but never closed", scan.unclosed),
                    );
                }
            });

        if let Some(content) = saved {
            self.save_edit(editor.id, content);
            return;
        }
        if open {
            self.editor = Some(editor);
        }
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.connection.is_dry_run() {
                ui.label(RichText::new("Dry run mode").color(MUTED));
            } else {
                ui.label("Prompts go to");
                if ui
                    .add(
                        egui::Label::new(RichText::new(self.connection.host.as_str()).color(ACCENT))
                            .sense(egui::Sense::click()),
                    )
                    .clicked()
                {
                    if let Err(e) = open::that(&self.connection.host) {
                        tracing::warn!("Failed to open link: {}", e);
                    }
                }
            }
        });

        if !self.notices.is_empty() {
            ui.separator();
        }
        for notice in self.notices.iter() {
            ui.add_space(5.0);
            let color = match notice.kind {
                NoticeKind::Info => SUCCESS,
                NoticeKind::Destructive => DANGER,
            };
            ui.vertical_centered(|ui| {
                ui.colored_label(color, RichText::new(notice.title.as_str()).strong());
                ui.colored_label(color, notice.description.as_str());
            });
        }
    }
}
