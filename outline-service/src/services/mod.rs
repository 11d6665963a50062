pub mod gateway;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod schema;

pub use gateway::OutlineGateway;
pub use metrics::{get_metrics, init_metrics};
pub use prompt::PromptTemplate;
