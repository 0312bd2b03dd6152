// Application tracking over a swappable key-value persistence layer.

pub mod handlers;
pub mod store;

mod applications;
pub use applications::{ApplicationTracker, MISSIONS_KEY_PREFIX, RESUME_KEY_PREFIX};
