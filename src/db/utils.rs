//! Database utility functions.

use chrono::Utc;

/// Current UTC time as fixed-width text.
///
/// Microsecond precision and a fixed width keep lexical order equal to
/// chronological order, which `ORDER BY created_at` relies on.
pub fn current_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_has_fixed_width() {
        let ts = current_timestamp();
        assert_eq!(ts.len(), "2025-01-01T00:00:00.000000Z".len());
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let first = current_timestamp();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = current_timestamp();
        assert!(first < second);
    }
}
