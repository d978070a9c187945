//! Progress-callback trait for submission events.
//!
//! Inject an [`Arc<dyn SubmissionProgressCallback>`] via
//! [`crate::config::ClientConfigBuilder::progress_callback`] to be told when
//! a request is dispatched, when its artifact arrives, and when it fails.
//! The CLI uses this to drive its spinner; a GUI shell would use it to grey
//! out its buttons.
//!
//! # Example
//!
//! ```rust
//! use masterdocs_client::{ClientConfig, Operation, SubmissionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     sent: AtomicUsize,
//! }
//!
//! impl SubmissionProgressCallback for CountingCallback {
//!     fn on_submit_start(&self, operation: Operation, file_count: usize, _total_bytes: u64) {
//!         self.sent.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{operation}: uploading {file_count} file(s)");
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { sent: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::operation::Operation;
use std::sync::Arc;

/// Called by the submission client around each request.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SubmissionProgressCallback: Send + Sync {
    /// Called just before the request is sent.
    ///
    /// # Arguments
    /// * `operation`  : the remote operation
    /// * `file_count` : number of file parts attached
    /// * `total_bytes`: combined declared size of those files
    fn on_submit_start(&self, operation: Operation, file_count: usize, total_bytes: u64) {
        let _ = (operation, file_count, total_bytes);
    }

    /// Called when the service returned a success body.
    ///
    /// # Arguments
    /// * `artifact_len`: byte length of the response body
    fn on_submit_complete(&self, operation: Operation, artifact_len: usize) {
        let _ = (operation, artifact_len);
    }

    /// Called when the request was rejected or could not complete.
    fn on_submit_error(&self, operation: Operation, error: &str) {
        let _ = (operation, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SubmissionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type ProgressCallback = Arc<dyn SubmissionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl SubmissionProgressCallback for TrackingCallback {
        fn on_submit_start(&self, _operation: Operation, _file_count: usize, _total_bytes: u64) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_submit_complete(&self, _operation: Operation, _artifact_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_submit_error(&self, _operation: Operation, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_submit_start(Operation::Merge, 2, 1024);
        cb.on_submit_complete(Operation::Merge, 512);
        cb.on_submit_error(Operation::Compress, "HTTP 500");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_submit_start(Operation::Merge, 2, 10);
        tracker.on_submit_complete(Operation::Merge, 4);
        tracker.on_submit_start(Operation::Compress, 1, 10);
        tracker.on_submit_error(Operation::Compress, "HTTP 500");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_submit_start(Operation::ImagesToPdf, 3, 0);
    }
}
