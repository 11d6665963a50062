pub mod outline;

pub use outline::{ErrorEnvelope, OutlineRequest};
