pub mod extraction;
pub mod pages;
pub mod registry;
pub mod submission;

pub use extraction::{ExtractionError, ExtractionService};
pub use pages::{PageDownloader, PagesError};
pub use registry::{RegistryClient, RegistryError, SubmissionOutcome, ToolSubmitter};
pub use submission::{SubmissionError, SubmissionService, SubmissionSummary};
