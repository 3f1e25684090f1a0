//! Search-index push notifications
//!
//! Submits changed-content URLs to an IndexNow-style endpoint in capped
//! batches, proving site ownership through a key file the HTTP layer
//! serves at `/<key>.txt`.

pub mod submitter;

pub use submitter::{BatchFailure, IndexNowSubmitter, SubmitReport};
