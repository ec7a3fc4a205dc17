//! billbox-pipeline: the document lifecycle around the at-rest codecs
//!
//! Pipeline: upload bytes → encrypt → persist container → (on request)
//! decrypt → extract text → analyze via bounded pool → purge plaintext
//!
//! Lifecycle guarantees:
//!   - plaintext never remains on durable storage once a container exists
//!   - the decrypted artifact is deleted right after extraction is
//!     attempted, success or failure, including mid-request cancellation
//!   - at most pool-size analysis calls are in flight at any instant
//!   - a purge failure is logged at error level even when the request
//!     already succeeded; residual plaintext is an operator alert

pub mod analyze;
pub mod error;
pub mod extract;
pub mod lifecycle;
pub mod scratch;
pub mod store;

pub use analyze::{AnalysisPool, FeeAnalyzer};
pub use error::{AnalysisFailure, ExtractionFailure, PipelineError};
pub use extract::{TextExtractor, Utf8Extractor};
pub use lifecycle::{DocumentPipeline, ScanReport};
pub use scratch::{PlaintextGuard, ScratchDir};
pub use store::ContainerStore;
