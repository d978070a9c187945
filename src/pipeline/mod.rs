//! Pipeline stages for staging and submitting a batch.
//!
//! Each submodule implements one step; the tool controllers in
//! [`crate::tools`] only orchestrate.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ validate ──▶ batch ──▶ submit ──▶ download
//! (paths)   (mime/grammar) (order)  (HTTP)     (save)
//! ```
//!
//! 1. [`input`]   : file paths or a drag-and-drop URI list → `StagedFile`s
//! 2. [`validate`]: media-type classification and page-grammar parsing
//! 3. [`batch`]   : ordered working set with append/remove/move/clear
//! 4. [`submit`]  : multipart `POST` to the operation's route; the only
//!    stage with network I/O
//! 5. [`download`]: atomic save of the returned artifact

pub mod batch;
pub mod download;
pub mod input;
pub mod submit;
pub mod validate;
