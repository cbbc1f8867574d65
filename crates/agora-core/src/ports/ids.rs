/// Source of opaque identifiers for posts and comments.
///
/// Ids must be collision-free with overwhelming probability.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}
