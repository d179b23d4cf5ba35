//! Timestamped storage names
//!
//! A stored image is named `<YYYYMMDD>-<HHMMSS>-<original name>` in
//! deployment-local wall time. The same name keys both the original and its
//! thumbnail. Two uploads with the same original name inside one second map to
//! the same name, and the later write wins.
//!
//! The original name is used verbatim. A `/` inside it becomes a key path
//! separator, so `a/b.png` is stored under `images/<stamp>-a/b.png`.

use crate::upload::UploadedFile;
use chrono::{Local, NaiveDateTime};

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn generate_filename(clock: &dyn Clock, upload: &UploadedFile) -> String {
    format!(
        "{}-{}",
        clock.now().format("%Y%m%d-%H%M%S"),
        upload.original_name
    )
}
