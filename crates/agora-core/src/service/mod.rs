//! Services - orchestration of domain logic over the ports.

mod posts;

pub use posts::PostService;
