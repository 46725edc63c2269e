//! Drop-in replacements for axum extractors that reject with [`Error`].
//!
//! [`Error`]: crate::handler::Error

mod enhanced_json;
mod enhanced_path;
mod validated_json;

pub use enhanced_json::Json;
pub use enhanced_path::Path;
pub use validated_json::ValidateJson;

/// Keeps rejection details short enough for a response body.
fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(200).collect()
}
