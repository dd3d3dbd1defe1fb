mod notice;
mod state;
mod ui;

use crate::config::ConnectionSettings;
use crate::upload::payload::parse_list;
use crate::upload::{scan_folder, FileId, LifecycleEvent, PromptConfig, SelectedFile, Uploader};
use eframe::{egui, App};
use notice::{Notice, Notices};
use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Receiver};
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};

pub use state::{BatchEvent, BatchState};

/// Open file dialog: the file being viewed and, while editing, the draft.
struct FileEditor {
    id: FileId,
    draft: Option<String>,
}

pub struct PromptUploader {
    runtime: Runtime,
    state: BatchState,
    config: PromptConfig,
    labels_text: String,
    languages_text: String,
    connection: ConnectionSettings,
    folder_filter: String,
    editor: Option<FileEditor>,
    notices: Notices,
    status_receiver: Option<Receiver<LifecycleEvent>>,
}

impl PromptUploader {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        runtime: Runtime,
        connection: ConnectionSettings,
    ) -> Self {
        info!(?connection, "Initializing prompt uploader");
        let config = PromptConfig::default();
        Self {
            runtime,
            state: BatchState::default(),
            labels_text: config.labels.join(", "),
            languages_text: config.supported_languages.join(", "),
            config,
            connection,
            folder_filter: String::new(),
            editor: None,
            notices: Notices::default(),
            status_receiver: None,
        }
    }

    fn dispatch(&mut self, event: BatchEvent) {
        self.state = std::mem::take(&mut self.state).apply(event);
    }

    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        info!("Adding {} file(s)", paths.len());
        let files = paths.into_iter().map(SelectedFile::from_path).collect();
        self.dispatch(BatchEvent::FilesAdded(files));
    }

    pub fn import_folder(&mut self, folder: PathBuf) {
        let filter = Some(self.folder_filter.as_str());
        match scan_folder(&folder, filter) {
            Ok(paths) if paths.is_empty() => {
                self.notices.push(Notice::destructive(
                    "No files found",
                    format!("No supported files in {}", folder.display()),
                ));
            }
            Ok(paths) => self.add_paths(paths),
            Err(e) => {
                warn!("Folder import failed: {}", e);
                self.notices.push(Notice::destructive("Folder import failed", e.to_string()));
            }
        }
    }

    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut files = Vec::new();
        for file in dropped {
            if let Some(path) = file.path {
                files.push(SelectedFile::from_path(path));
            } else if let Some(bytes) = file.bytes {
                files.push(SelectedFile::from_bytes(file.name, &bytes));
            }
        }
        debug!("Dropped {} file(s)", files.len());
        self.dispatch(BatchEvent::FilesAdded(files));
    }

    pub fn remove_file(&mut self, id: FileId) {
        if !self.state.can_remove(id) {
            debug!(file = %id, "Ignoring removal of file that is uploading");
            return;
        }
        if self.editor.as_ref().is_some_and(|editor| editor.id == id) {
            self.editor = None;
        }
        self.dispatch(BatchEvent::Removed(id));
    }

    pub fn save_edit(&mut self, id: FileId, content: String) {
        self.dispatch(BatchEvent::ContentEdited(id, content));
    }

    fn sync_config_lists(&mut self) {
        self.config.labels = parse_list(&self.labels_text);
        self.config.supported_languages = parse_list(&self.languages_text);
    }

    pub fn start_submit(&mut self) {
        if self.state.is_submitting() {
            return;
        }
        self.sync_config_lists();

        let jobs = match self.state.prepare_submit(&self.config) {
            Ok(jobs) => jobs,
            Err(e) => {
                info!("Submit refused: {}", e);
                self.notices.push(Notice::from_validation(&e));
                return;
            }
        };
        if jobs.is_empty() {
            self.notices.push(Notice::info(
                "Nothing to upload",
                "Every selected file has already been processed",
            ));
            return;
        }

        let transport = match self.connection.build_transport() {
            Ok(transport) => transport,
            Err(e) => {
                error!("Could not prepare transport: {}", e);
                self.notices.push(Notice::destructive("Connection error", e.to_string()));
                return;
            }
        };

        let (status_sender, status_receiver) = std_mpsc::channel();
        self.status_receiver = Some(status_receiver);
        self.dispatch(BatchEvent::SubmitStarted(
            jobs.iter().map(|job| job.id).collect(),
        ));

        let uploader = Uploader::new(transport, self.config.clone());
        self.runtime.spawn(async move {
            uploader.run_batch(jobs, status_sender).await;
        });
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        ctx.request_repaint();

        let mut events = Vec::new();
        if let Some(receiver) = &self.status_receiver {
            events.extend(receiver.try_iter());
        }

        for event in events {
            if let LifecycleEvent::BatchSettled(summary) = &event {
                self.notices.push(Notice::from_summary(summary));
                self.status_receiver = None;
            }
            self.dispatch(BatchEvent::Lifecycle(event));
        }

        self.notices.prune(Instant::now());
    }
}

impl App for PromptUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_dropped_files(ctx);
        self.update_state(ctx);
        self.render(ctx);
    }
}
