//! Pipeline components: job discovery, worker pool, aggregation, status delivery.

pub mod aggregator;
pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod status;
pub mod transform;
pub mod walk;
pub mod workers;

pub use aggregator::ProgressAggregator;
pub use context::{BatchHandle, BatchReport, FailureSink};
pub use error_handler::{panic_message, run_guarded};
pub use orchestrator::{
    check_output_paths, enumerate_for, observe_batch, start_batch, start_batch_with,
};
pub use status::{DrainState, Observer, StatusReceiver, StatusSender, status_channel};
pub use transform::Transform;
pub use walk::{JobSource, WalkOutcome, to_outcome_walkdir};
pub use workers::WorkerPool;
