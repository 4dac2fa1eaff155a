pub mod app;
pub mod pipeline;

pub use app::ContavozApp;
pub use pipeline::{PipelineMetrics, QueryPipeline, UNRECOGNIZED_REPLY};
