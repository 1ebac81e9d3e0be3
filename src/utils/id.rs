//! Submission identifier generation.
//!
//! IDs are prefixed opaque strings: a kind prefix, the last six digits of
//! the epoch-millisecond clock, and a zero-padded three-digit random
//! suffix. Not guaranteed globally unique, which is acceptable for a
//! low-volume event form.

use chrono::Utc;
use rand::Rng;

/// Registration ("team") identifier, e.g. `NXR123456042`.
pub fn generate_team_id() -> String {
    prefixed_id("NXR")
}

/// Contact ("ticket") identifier, e.g. `TKT123456042`.
pub fn generate_ticket_id() -> String {
    prefixed_id("TKT")
}

fn prefixed_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let time_part = &millis[millis.len() - 6..];
    let random_part = rand::rng().random_range(0..1000u32);
    format!("{prefix}{time_part}{random_part:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_shape(id: &str, prefix: &str) {
        assert!(id.starts_with(prefix));
        assert_eq!(id.len(), prefix.len() + 9);
        assert!(id[prefix.len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_id_shapes() {
        assert_shape(&generate_team_id(), "NXR");
        assert_shape(&generate_ticket_id(), "TKT");
    }
}
