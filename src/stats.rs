//! Statistics for a copy run

use std::fmt;

/// Counters accumulated by [`crate::copy::Copier::run`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    /// Keys returned by the listing
    pub objects_listed: u64,
    /// Directory marker keys (ending in `/`) that were skipped
    pub markers_skipped: u64,
    /// Files written, or planned in a dry run
    pub files_copied: u64,
    /// Bytes written to disk
    pub bytes_copied: u64,
}

impl CopyStats {
    pub(crate) fn record_marker(&mut self) {
        self.markers_skipped += 1;
    }

    pub(crate) fn record_copy(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied += bytes;
    }
}

impl fmt::Display for CopyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} objects listed, {} files copied ({} bytes), {} directory markers skipped",
            self.objects_listed, self.files_copied, self.bytes_copied, self.markers_skipped
        )
    }
}
