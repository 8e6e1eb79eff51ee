//! Dual-destination run log: terminal mirror plus durable append-only file.
//!
//! Each outcome becomes one line, timestamp-prefixed in the file. The file
//! copy is best effort: if it cannot be opened or written the problem is
//! reported once on stderr and the run keeps going with the terminal mirror.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use indicatif::ProgressBar;

pub struct RunLogger {
    file: Option<File>,
    progress: Option<ProgressBar>,
}

impl RunLogger {
    /// Open the log in append mode. The file stays open for the whole run;
    /// earlier runs' lines are never touched.
    pub fn open(path: &Path) -> Self {
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Some(f),
            Err(err) => {
                eprintln!("Failed to open log file {}: {err}", path.display());
                None
            }
        };
        Self {
            file,
            progress: None,
        }
    }

    /// Route the terminal mirror through an active spinner so log lines
    /// print above it instead of tearing the redraw.
    pub fn attach_progress(&mut self, progress: ProgressBar) {
        self.progress = Some(progress);
    }

    /// Append one timestamped line to the file and mirror it to the terminal.
    pub fn record(&mut self, message: &str) {
        let line = format!(
            "[{}] {message}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        match &self.progress {
            Some(pb) => pb.println(&line),
            None => println!("{line}"),
        }
        if let Some(file) = &mut self.file
            && let Err(err) = writeln!(file, "{line}")
        {
            eprintln!("Failed to write to log file: {err}");
        }
    }
}
