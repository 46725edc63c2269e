//! HTTP request extractors with JSON error rejections.
//!
//! - [`CurrentSession`] - optional session claims, never rejects
//! - [`AuthSession`] - required session claims, rejects with `401`
//! - [`Json`] - JSON body with descriptive rejections
//! - [`ValidateJson`] - JSON body checked with `validator`
//! - [`Path`] - path parameters with descriptive rejections

mod reject;
mod session;

pub use crate::extract::reject::{Json, Path, ValidateJson};
pub use crate::extract::session::{AuthSession, CurrentSession};
