//! Output formatting for the admin CLI.

pub mod pretty;

use serde::Serialize;

/// Serialize a value as pretty-printed JSON for the `--format json` path.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}
