//! Business logic services

pub mod execution_gateway;
pub mod history_service;
pub mod orchestrator;
pub mod validation_service;

pub use execution_gateway::ExecutionGateway;
pub use history_service::{HistoryService, SubmissionRecorder};
pub use orchestrator::Orchestrator;
pub use validation_service::ValidationPipeline;
