//! Cache key builders for all LearnHub cache entries.
//!
//! Keys are relative: the Redis provider prepends its configured
//! namespace (`learnhub:` by default).

use uuid::Uuid;

/// Prefix shared by every presence record key.
pub const PRESENCE_PREFIX: &str = "presence:";

/// Cache key for a user's heartbeat record.
pub fn presence(user_id: Uuid) -> String {
    format!("{PRESENCE_PREFIX}{user_id}")
}

/// Recover the user ID from a presence key.
pub fn parse_presence_key(key: &str) -> Option<Uuid> {
    key.strip_prefix(PRESENCE_PREFIX)
        .and_then(|id| Uuid::parse_str(id).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_key() {
        let id = Uuid::nil();
        assert_eq!(presence(id), "presence:00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_parse_presence_key() {
        let id = Uuid::new_v4();
        assert_eq!(parse_presence_key(&presence(id)), Some(id));
        assert_eq!(parse_presence_key("presence:not-a-uuid"), None);
        assert_eq!(parse_presence_key("session:abc"), None);
    }
}
