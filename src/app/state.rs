use crate::error::ValidationError;
use crate::upload::payload::prompt_names;
use crate::upload::{
    BatchSummary, FileId, LifecycleEvent, PromptConfig, SelectedFile, TrackedFile, UploadJob,
    UploadStatus,
};
use std::collections::BTreeMap;

/// Everything that can change the tracked files.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    FilesAdded(Vec<SelectedFile>),
    Removed(FileId),
    ContentEdited(FileId, String),
    SubmitStarted(Vec<FileId>),
    Lifecycle(LifecycleEvent),
}

/// Tracked files keyed by id. Ids only grow, so iteration follows the order
/// in which files were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchState {
    items: BTreeMap<FileId, TrackedFile>,
    next_id: u64,
    submitting: bool,
    last_summary: Option<BatchSummary>,
}

impl BatchState {
    pub fn apply(mut self, event: BatchEvent) -> Self {
        match event {
            BatchEvent::FilesAdded(files) => {
                for file in files {
                    let id = FileId(self.next_id);
                    self.next_id += 1;
                    self.items.insert(
                        id,
                        TrackedFile {
                            id,
                            file,
                            status: UploadStatus::Pending,
                            progress: 0,
                        },
                    );
                }
            }
            BatchEvent::Removed(id) => {
                if self.can_remove(id) {
                    self.items.remove(&id);
                }
            }
            BatchEvent::ContentEdited(id, content) => {
                if let Some(item) = self.items.get_mut(&id) {
                    if item.status == UploadStatus::Pending {
                        item.file.size = content.len() as u64;
                        item.file.content = Some(content);
                        item.file.edited = true;
                    }
                }
            }
            BatchEvent::SubmitStarted(ids) => {
                for id in ids {
                    if let Some(item) = self.items.get_mut(&id) {
                        if item.status == UploadStatus::Pending {
                            item.status = UploadStatus::Uploading;
                            item.progress = 0;
                        }
                    }
                }
                self.submitting = true;
                self.last_summary = None;
            }
            BatchEvent::Lifecycle(event) => self.apply_lifecycle(event),
        }
        self
    }

    fn apply_lifecycle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Progress(id, percent) => {
                if let Some(item) = self.uploading_mut(id) {
                    item.progress = item.progress.max(percent.min(100));
                }
            }
            LifecycleEvent::Succeeded(id) => {
                if let Some(item) = self.uploading_mut(id) {
                    item.status = UploadStatus::Success;
                    item.progress = 100;
                }
            }
            LifecycleEvent::Failed(id, message) => {
                if let Some(item) = self.uploading_mut(id) {
                    item.status = UploadStatus::Error(message);
                }
            }
            LifecycleEvent::BatchSettled(summary) => {
                self.submitting = false;
                self.last_summary = Some(summary);
            }
        }
    }

    fn uploading_mut(&mut self, id: FileId) -> Option<&mut TrackedFile> {
        self.items
            .get_mut(&id)
            .filter(|item| item.status == UploadStatus::Uploading)
    }

    /// Checks the submit preconditions and returns one job per pending file.
    /// Nothing is modified; the caller applies `SubmitStarted` once the jobs
    /// are handed off.
    pub fn prepare_submit(&self, config: &PromptConfig) -> Result<Vec<UploadJob>, ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::NoFiles);
        }
        if !config.has_name() {
            return Err(ValidationError::BlankName);
        }

        let pending: Vec<&TrackedFile> = self
            .items
            .values()
            .filter(|item| item.status == UploadStatus::Pending)
            .collect();
        let names = prompt_names(&config.name, pending.iter().map(|item| item.file.name.as_str()));

        Ok(pending
            .into_iter()
            .zip(names)
            .map(|(item, prompt_name)| UploadJob {
                id: item.id,
                prompt_name,
                file: item.file.clone(),
            })
            .collect())
    }

    pub fn can_remove(&self, id: FileId) -> bool {
        self.items
            .get(&id)
            .map(|item| item.status != UploadStatus::Uploading)
            .unwrap_or(false)
    }

    pub fn get(&self, id: FileId) -> Option<&TrackedFile> {
        self.items.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &TrackedFile> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_summary(&self) -> Option<BatchSummary> {
        self.last_summary
    }

    fn count(&self, predicate: impl Fn(&UploadStatus) -> bool) -> usize {
        self.items.values().filter(|item| predicate(&item.status)).count()
    }

    /// Mean progress over the files of the running batch, 0.0 to 1.0.
    pub fn progress_fraction(&self) -> f32 {
        let active: Vec<u8> = self
            .items
            .values()
            .filter(|item| item.status != UploadStatus::Pending)
            .map(|item| item.progress)
            .collect();
        if active.is_empty() {
            return 0.0;
        }
        let sum: u32 = active.iter().map(|p| *p as u32).sum();
        sum as f32 / (active.len() as f32 * 100.0)
    }

    pub fn status_text(&self) -> String {
        format!(
            "Files: {} | ⏳ Pending: {} | 📤 Uploading: {} | ✅ Success: {} | ❌ Failed: {}",
            self.items.len(),
            self.count(|s| *s == UploadStatus::Pending),
            self.count(|s| *s == UploadStatus::Uploading),
            self.count(|s| *s == UploadStatus::Success),
            self.count(|s| matches!(s, UploadStatus::Error(_))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_file(name: &str, content: &str) -> SelectedFile {
        SelectedFile {
            name: name.to_string(),
            path: None,
            size: content.len() as u64,
            content: Some(content.to_string()),
            edited: false,
        }
    }

    fn named_config(name: &str) -> PromptConfig {
        PromptConfig {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn with_files(names: &[&str]) -> BatchState {
        let files = names.iter().map(|n| text_file(n, "body")).collect();
        BatchState::default().apply(BatchEvent::FilesAdded(files))
    }

    fn ids(state: &BatchState) -> Vec<FileId> {
        state.items().map(|item| item.id).collect()
    }

    fn submit(state: BatchState) -> BatchState {
        let jobs = state.prepare_submit(&named_config("batch")).unwrap();
        state.apply(BatchEvent::SubmitStarted(jobs.iter().map(|j| j.id).collect()))
    }

    fn lifecycle(state: BatchState, event: LifecycleEvent) -> BatchState {
        state.apply(BatchEvent::Lifecycle(event))
    }

    #[test]
    fn added_files_get_unique_ids_and_start_pending() {
        let state = with_files(&["a.md", "b.md"]);
        let state = state.apply(BatchEvent::FilesAdded(vec![text_file("a.md", "again")]));

        let ids = ids(&state);
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(state
            .items()
            .all(|item| item.status == UploadStatus::Pending && item.progress == 0));
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let state = with_files(&["a.md"]);
        let first = ids(&state)[0];
        let state = state
            .apply(BatchEvent::Removed(first))
            .apply(BatchEvent::FilesAdded(vec![text_file("b.md", "x")]));
        assert_ne!(ids(&state)[0], first);
    }

    #[test]
    fn submit_without_files_is_rejected() {
        let state = BatchState::default();
        assert_eq!(
            state.prepare_submit(&named_config("batch")).unwrap_err(),
            ValidationError::NoFiles
        );
        assert!(state.is_empty());
    }

    #[test]
    fn submit_with_blank_name_is_rejected() {
        let state = with_files(&["a.md"]);
        assert_eq!(
            state.prepare_submit(&named_config("   ")).unwrap_err(),
            ValidationError::BlankName
        );
        assert_eq!(state.items().next().unwrap().status, UploadStatus::Pending);
    }

    #[test]
    fn jobs_cover_only_pending_files() {
        let state = submit(with_files(&["a.md", "b.md"]));
        let [first, second] = ids(&state)[..] else {
            panic!("expected two files")
        };
        let state = lifecycle(state, LifecycleEvent::Succeeded(first));
        let state = lifecycle(state, LifecycleEvent::Failed(second, "boom".into()));
        let state = state.apply(BatchEvent::FilesAdded(vec![text_file("c.txt", "x")]));

        let jobs = state.prepare_submit(&named_config("batch")).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].prompt_name, "batch-c");
    }

    #[test]
    fn job_names_are_deduplicated() {
        let state = with_files(&["intro.md", "intro.txt"]);
        let jobs = state.prepare_submit(&named_config("docs")).unwrap();
        let names: Vec<&str> = jobs.iter().map(|j| j.prompt_name.as_str()).collect();
        assert_eq!(names, vec!["docs-intro", "docs-intro-2"]);
    }

    #[test]
    fn all_files_succeed() {
        let mut state = submit(with_files(&["a.md", "b.md", "c.md"]));
        assert!(state.is_submitting());
        for id in ids(&state) {
            for percent in (0..=100).step_by(10) {
                state = lifecycle(state, LifecycleEvent::Progress(id, percent));
            }
            state = lifecycle(state, LifecycleEvent::Succeeded(id));
        }
        let summary = BatchSummary { succeeded: 3, failed: 0 };
        state = lifecycle(state, LifecycleEvent::BatchSettled(summary));

        assert!(state
            .items()
            .all(|item| item.status == UploadStatus::Success && item.progress == 100));
        assert!(!state.is_submitting());
        assert_eq!(state.last_summary(), Some(summary));
        assert_eq!(state.progress_fraction(), 1.0);
    }

    #[test]
    fn failure_is_isolated_and_freezes_progress() {
        let state = submit(with_files(&["a.md", "b.md"]));
        let [good, bad] = ids(&state)[..] else {
            panic!("expected two files")
        };
        let state = lifecycle(state, LifecycleEvent::Progress(bad, 30));
        let state = lifecycle(state, LifecycleEvent::Failed(bad, "Failed to read file".into()));
        let state = lifecycle(state, LifecycleEvent::Progress(bad, 80));
        let state = lifecycle(state, LifecycleEvent::Succeeded(good));

        let bad_item = state.get(bad).unwrap();
        assert_eq!(bad_item.status, UploadStatus::Error("Failed to read file".into()));
        assert_eq!(bad_item.progress, 30);
        assert_eq!(state.get(good).unwrap().status, UploadStatus::Success);
    }

    #[test]
    fn progress_never_goes_backwards() {
        let state = submit(with_files(&["a.md"]));
        let id = ids(&state)[0];
        let state = lifecycle(state, LifecycleEvent::Progress(id, 60));
        let state = lifecycle(state, LifecycleEvent::Progress(id, 20));
        assert_eq!(state.get(id).unwrap().progress, 60);
        let state = lifecycle(state, LifecycleEvent::Progress(id, 250));
        assert_eq!(state.get(id).unwrap().progress, 100);
    }

    #[test]
    fn terminal_states_ignore_later_events() {
        let state = submit(with_files(&["a.md"]));
        let id = ids(&state)[0];
        let state = lifecycle(state, LifecycleEvent::Succeeded(id));
        let state = lifecycle(state, LifecycleEvent::Failed(id, "late".into()));
        assert_eq!(state.get(id).unwrap().status, UploadStatus::Success);
        assert_eq!(state.get(id).unwrap().progress, 100);
    }

    #[test]
    fn pending_files_ignore_progress() {
        let state = with_files(&["a.md"]);
        let id = ids(&state)[0];
        let state = lifecycle(state, LifecycleEvent::Progress(id, 50));
        let state = lifecycle(state, LifecycleEvent::Succeeded(id));
        assert_eq!(state.get(id).unwrap().status, UploadStatus::Pending);
        assert_eq!(state.get(id).unwrap().progress, 0);
    }

    #[test]
    fn uploading_file_cannot_be_removed() {
        let state = submit(with_files(&["a.md"]));
        let id = ids(&state)[0];
        assert!(!state.can_remove(id));
        let state = state.apply(BatchEvent::Removed(id));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn settled_and_pending_files_can_be_removed() {
        let state = with_files(&["pending.md", "ok.md", "bad.md"]);
        let [pending, ok, bad] = ids(&state)[..] else {
            panic!("expected three files")
        };
        let state = state.apply(BatchEvent::SubmitStarted(vec![ok, bad]));
        let state = lifecycle(state, LifecycleEvent::Succeeded(ok));
        let state = lifecycle(state, LifecycleEvent::Failed(bad, "nope".into()));

        let state = state.apply(BatchEvent::Removed(ok));
        assert_eq!(ids(&state), vec![pending, bad]);
        let state = state.apply(BatchEvent::Removed(bad));
        assert_eq!(ids(&state), vec![pending]);
        let state = state.apply(BatchEvent::Removed(pending));
        assert!(state.is_empty());
    }

    #[test]
    fn edits_apply_to_pending_files_only() {
        let state = with_files(&["a.md", "b.md"]);
        let [a, b] = ids(&state)[..] else {
            panic!("expected two files")
        };
        let state = state.apply(BatchEvent::SubmitStarted(vec![b]));
        let state = state.apply(BatchEvent::ContentEdited(a, "Hi {{user}}".into()));
        let state = state.apply(BatchEvent::ContentEdited(b, "ignored".into()));

        let edited = state.get(a).unwrap();
        assert!(edited.file.edited);
        assert_eq!(edited.file.content.as_deref(), Some("Hi {{user}}"));
        assert_eq!(edited.file.size, 11);
        assert_eq!(state.get(b).unwrap().file.content.as_deref(), Some("body"));
    }

    #[test]
    fn status_text_counts_each_state() {
        let state = submit(with_files(&["a.md"]))
            .apply(BatchEvent::FilesAdded(vec![text_file("b.md", "x")]));
        assert_eq!(
            state.status_text(),
            "Files: 2 | ⏳ Pending: 1 | 📤 Uploading: 1 | ✅ Success: 0 | ❌ Failed: 0"
        );
    }
}
