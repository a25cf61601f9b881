use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{render::Framebuffer, Result};

/// Configuration options for the snapshot recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSettings {
    pub output_dir: PathBuf,
    /// Keep one frame out of every `every` presented frames.
    pub every: u32,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("frames"),
            every: 60,
        }
    }
}

/// Dumps presented framebuffers to numbered PNG files.
#[derive(Debug, Default)]
pub struct Recorder {
    settings: RecordingSettings,
    is_recording: bool,
    seen: u64,
    written: u64,
}

impl Recorder {
    pub fn new(settings: RecordingSettings) -> Self {
        Self {
            settings,
            is_recording: false,
            seen: 0,
            written: 0,
        }
    }

    /// Creates the output directory and arms the recorder.
    pub fn start(&mut self) -> Result<()> {
        fs::create_dir_all(&self.settings.output_dir)?;
        tracing::info!(dir = ?self.settings.output_dir, every = self.settings.every, "recording frames");
        self.is_recording = true;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        if self.is_recording {
            tracing::info!(written = self.written, "recording stopped");
        }
        self.is_recording = false;
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Offers a presented frame. Returns the path written, if this frame was
    /// kept.
    pub fn capture(&mut self, frame: &Framebuffer) -> Result<Option<PathBuf>> {
        if !self.is_recording {
            return Ok(None);
        }
        let index = self.seen;
        self.seen += 1;
        if index % u64::from(self.settings.every.max(1)) != 0 {
            return Ok(None);
        }

        let path = self.settings.output_dir.join(format!("frame_{index:06}.png"));
        frame.save_png(&path)?;
        self.written += 1;
        tracing::debug!(?path, "frame written");
        Ok(Some(path))
    }
}
