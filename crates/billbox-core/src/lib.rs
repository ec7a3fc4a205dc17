//! billbox-core: shared types, config schema, and the fee report model

pub mod config;
pub mod report;
pub mod types;

pub use config::{BillboxConfig, DEFAULT_KDF_ITERATIONS};
pub use report::{DetectedFee, FeeReport, ReportSummary};
pub use types::{ContainerFormat, DocumentId};
