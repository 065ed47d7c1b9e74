// Best-effort activity logging.
//
// Browse and purchase events from /buy are queued onto a bounded channel and
// drained by a single writer task that appends one CSV line per event to the
// current day's log file. The single writer is what keeps whole lines atomic;
// the filesystem is not trusted for that.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate, Utc};
use tokio::sync::mpsc;

/// Country code stamped on every event. The demo store only ships to one.
const COUNTRY_CODE: &str = "us";

/// One browse or purchase, as it will appear in the day's log file.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    pub user: String,
    pub ad: String,
    pub category: String,
    pub item: String,
    /// Epoch seconds with fractional part
    pub timestamp: f64,
    pub purchase: bool,
}

impl ActivityEvent {
    pub fn purchase(
        user: impl Into<String>,
        ad: impl Into<String>,
        category: impl Into<String>,
        item: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            ad: ad.into(),
            category: category.into(),
            item: item.into(),
            timestamp: epoch_now(),
            purchase: true,
        }
    }

    /// Browse events carry no ad id.
    pub fn browse(
        user: impl Into<String>,
        category: impl Into<String>,
        item: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            ad: String::new(),
            category: category.into(),
            item: item.into(),
            timestamp: epoch_now(),
            purchase: false,
        }
    }

    /// `user,ad,countrycode,category,item,timestamp,flag` plus newline.
    fn line(&self) -> String {
        format!(
            "{},{},{},{},{},{:.4},{}\n",
            self.user,
            self.ad,
            COUNTRY_CODE,
            self.category,
            self.item,
            self.timestamp,
            u8::from(self.purchase)
        )
    }
}

fn epoch_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// `log_<day>.<month>.<year>.txt`, day and month unpadded.
fn log_file_name(date: NaiveDate) -> String {
    format!("log_{}.{}.{}.txt", date.day(), date.month(), date.year())
}

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    #[error("activity queue is full")]
    QueueFull,
    #[error("activity writer has shut down")]
    WriterGone,
}

/// Cloneable handle the web handlers use to queue events.
#[derive(Clone)]
pub struct ActivityLogger {
    tx: mpsc::Sender<ActivityEvent>,
}

impl ActivityLogger {
    /// Queues an event without blocking. Activity is telemetry, so a full
    /// queue or a missing writer drops the event with a warning instead of
    /// failing the request.
    pub fn record(&self, event: ActivityEvent) {
        if let Err(e) = self.try_record(event) {
            tracing::warn!(error = %e, "Dropping activity event");
        }
    }

    fn try_record(&self, event: ActivityEvent) -> Result<(), ActivityError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ActivityError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => ActivityError::WriterGone,
        })
    }
}

/// Owns the receiving end of the queue and the log directory.
pub struct ActivityLogWriter {
    dir: PathBuf,
    rx: mpsc::Receiver<ActivityEvent>,
}

/// Create a logger handle and the writer that drains it.
pub fn channel(dir: impl Into<PathBuf>, capacity: usize) -> (ActivityLogger, ActivityLogWriter) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        ActivityLogger { tx },
        ActivityLogWriter {
            dir: dir.into(),
            rx,
        },
    )
}

impl ActivityLogWriter {
    /// Drains the queue until every logger handle is dropped. The file name
    /// is re-derived per event so writes roll over at midnight.
    pub async fn run(mut self) {
        tracing::info!(dir = %self.dir.display(), "Activity log writer started");

        while let Some(event) = self.rx.recv().await {
            let path = self.dir.join(log_file_name(Local::now().date_naive()));
            if let Err(e) = append_line(&path, &event.line()) {
                tracing::warn!(error = %e, path = %path.display(), "Failed to append activity line");
            }
        }

        tracing::info!("Activity log writer stopped");
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    file.write_all(line.as_bytes())
}
