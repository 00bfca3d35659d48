//! Conversion submissions.
//!
//! [`SubmissionController`] turns a selected image and block width into a
//! single multipart POST against the conversion service and folds the
//! outcome back into a [`SubmissionStatus`]. At most one submission is in
//! flight at a time; a submit while one is pending is dropped.

mod client;
mod controller;
mod error_body;
mod status;

pub use client::{
    ConvertClient, ConvertError, API_URL_ENV, CONVERT_PATH, DEFAULT_API_URL,
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT, SERVICE_CONVERSION_BUDGET, UNREACHABLE_MESSAGE,
};
pub use controller::{Completion, Submission, SubmissionController};
pub use error_body::{ErrorBody, UNKNOWN_ERROR_MESSAGE};
pub use status::{StatusEvent, SubmissionStatus};
