//! Host-embedding height report: JSON-line messages to a sink path, debounced
//! on resize and re-posted after fixed delays so the embedding parent can size
//! its frame once layout settles.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Delays (ms) after a resize at which the height is posted again.
pub const REPOST_DELAYS_MS: [u64; 5] = [300, 1000, 5000, 7500, 15000];

/// Resize bursts within this window collapse into one report cycle.
pub const DEBOUNCE: Duration = Duration::from_millis(50);

/// Posts `{"cro-embed-height": {<id>: <rows>}}` lines to a sink path.
pub struct HeightReporter {
    id: String,
    sink: PathBuf,
    last_cycle: Option<Instant>,
}

impl HeightReporter {
    pub fn new(id: impl Into<String>, sink: PathBuf) -> Self {
        Self {
            id: id.into(),
            sink,
            last_cycle: None,
        }
    }

    /// The message body for a given height, one JSON object per line.
    pub fn message(&self, height: u16) -> String {
        serde_json::json!({ "cro-embed-height": { self.id.as_str(): height } }).to_string()
    }

    /// Append one height message to the sink.
    pub fn post(&self, height: u16) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.sink)
            .map_err(|e| eyre!("opening height sink {}: {}", self.sink.display(), e))?;
        writeln!(f, "{}", self.message(height))?;
        Ok(())
    }

    /// Debounce gate: returns true when enough time has passed since the last
    /// report cycle to start a new one (post now + schedule the re-posts).
    pub fn start_cycle(&mut self) -> bool {
        let now = Instant::now();
        match self.last_cycle {
            Some(prev) if now.duration_since(prev) < DEBOUNCE => false,
            _ => {
                self.last_cycle = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_protocol_key_and_id() {
        let reporter = HeightReporter::new("jmena", PathBuf::from("/dev/null"));
        let msg = reporter.message(42);
        let value: serde_json::Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(value["cro-embed-height"]["jmena"], 42);
    }

    #[test]
    fn post_appends_json_lines() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sink = dir.path().join("height.jsonl");
        let reporter = HeightReporter::new("embed-1", sink.clone());
        reporter.post(30).expect("post");
        reporter.post(44).expect("post");

        let content = std::fs::read_to_string(&sink).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let last: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(last["cro-embed-height"]["embed-1"], 44);
    }

    #[test]
    fn repost_schedule_is_fixed_and_increasing() {
        assert_eq!(REPOST_DELAYS_MS, [300, 1000, 5000, 7500, 15000]);
        // The scheduler sleeps delay deltas, so the delays must ascend.
        assert!(REPOST_DELAYS_MS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn resize_bursts_are_debounced() {
        let mut reporter = HeightReporter::new("x", PathBuf::from("/dev/null"));
        assert!(reporter.start_cycle());
        assert!(!reporter.start_cycle());
        std::thread::sleep(DEBOUNCE + Duration::from_millis(10));
        assert!(reporter.start_cycle());
    }
}
