//! Identifier generation for posts and comments.

use agora_core::ports::IdGenerator;
use uuid::Uuid;

/// Random (v4) UUIDs in their hyphenated text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ids_are_distinct_and_parseable() {
        let ids: HashSet<String> = (0..1000).map(|_| UuidIdGenerator.new_id()).collect();

        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| Uuid::parse_str(id).is_ok()));
    }
}
