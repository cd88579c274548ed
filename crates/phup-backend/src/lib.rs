mod error;
mod traits;
mod types;

pub use error::BackendError;
pub use traits::{OperationHandle, RuntimeManager};
pub use types::{
    CommandFailure, OperationEvent, OperationOutcome, OperationRequest, PhpVersion,
    SequencingPolicy, VersionSource,
};
