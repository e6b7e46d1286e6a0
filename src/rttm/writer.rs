// RTTM - Line formatting and per-path writer
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::segments::Interval;

/// Format one speaker turn as an RTTM `SPEAKER` record (newline included)
pub fn rttm_line(interval: &Interval, recording_id: &str) -> String {
    format!(
        "SPEAKER {} 0 {:.3} {:.3} <NA> <NA> {} <NA> <NA>\n",
        recording_id,
        interval.start,
        interval.duration(),
        interval.label
    )
}

/// Format all turns of one recording
pub fn rttm_lines(intervals: &[Interval], recording_id: &str) -> Vec<String> {
    intervals
        .iter()
        .map(|interval| rttm_line(interval, recording_id))
        .collect()
}

/// Write `lines` to `path`, truncating or appending
pub fn lines_to_file<P: AsRef<Path>>(lines: &[String], path: P, append: bool) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Single writer for one RTTM output path.
///
/// The file is truncated when the writer is created and every recording is
/// appended through the same handle. Buffered data is flushed by
/// [`RttmWriter::finish`], or on drop if `finish` was never reached.
pub struct RttmWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines_written: usize,
}

impl RttmWriter {
    /// Create (or truncate) the file, creating parent directories as needed
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&path)?;
        debug!("Opened RTTM output {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            lines_written: 0,
        })
    }

    /// Append the turns of one recording
    pub fn write_recording(&mut self, recording_id: &str, intervals: &[Interval]) -> Result<()> {
        for interval in intervals {
            self.writer
                .write_all(rttm_line(interval, recording_id).as_bytes())?;
        }
        self.lines_written += intervals.len();
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush and close, reporting any I/O error
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.path.clone())
    }
}

impl Drop for RttmWriter {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("Failed to flush {}: {}", self.path.display(), e);
        }
    }
}
