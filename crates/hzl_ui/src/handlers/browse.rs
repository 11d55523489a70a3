//! File browsing handlers.

use std::path::PathBuf;

use iced::Task;

use hzl_core::config::ConfigSection;
use hzl_core::discovery::scan_folder;

use crate::app::{App, Message};

impl App {
    /// Browse for video files to label.
    pub fn browse_videos(&self) -> Task<Message> {
        let extensions = self.video_extensions();

        Task::perform(
            async move {
                let filters: Vec<&str> = extensions.iter().map(|s| s.as_str()).collect();
                rfd::AsyncFileDialog::new()
                    .set_title("Select Video Files")
                    .add_filter("Video Files", &filters)
                    .add_filter("All Files", &["*"])
                    .pick_files()
                    .await
                    .map(|files| {
                        files
                            .into_iter()
                            .map(|f| f.path().to_path_buf())
                            .collect()
                    })
                    .unwrap_or_default()
            },
            Message::FilesSelected,
        )
    }

    /// Browse for a folder to scan for videos.
    pub fn browse_folder(&self) -> Task<Message> {
        let start_dir = {
            let cfg = self.config.lock().unwrap();
            cfg.settings().paths.last_folder.clone()
        };

        Task::perform(
            async move {
                let mut dialog = rfd::AsyncFileDialog::new().set_title("Select Video Folder");
                if !start_dir.is_empty() {
                    dialog = dialog.set_directory(&start_dir);
                }
                dialog.pick_folder().await.map(|f| f.path().to_path_buf())
            },
            Message::FolderSelected,
        )
    }

    /// Handle files picked from the browser.
    pub fn handle_files_selected(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        if paths.is_empty() {
            // User cancelled
            return Task::none();
        }
        self.initialize_session(paths)
    }

    /// Handle a folder picked from the browser.
    pub fn handle_folder_selected(&mut self, folder: Option<PathBuf>) -> Task<Message> {
        let Some(folder) = folder else {
            return Task::none();
        };

        // Remember the folder for the next browse
        {
            let mut cfg = self.config.lock().unwrap();
            cfg.settings_mut().paths.last_folder = folder.display().to_string();
            if let Err(e) = cfg.update_section(ConfigSection::Paths) {
                tracing::warn!("Failed to save last folder: {}", e);
            }
        }

        let extensions = self.video_extensions();
        match scan_folder(&folder, &extensions) {
            Ok(file_list) => self.initialize_session(file_list),
            Err(e) => {
                tracing::warn!("Folder scan failed: {}", e);
                self.status = e.to_string();
                Task::none()
            }
        }
    }

    fn video_extensions(&self) -> Vec<String> {
        let cfg = self.config.lock().unwrap();
        cfg.settings().labelling.video_extensions.clone()
    }
}
