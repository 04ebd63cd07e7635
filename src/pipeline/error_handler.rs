use log::{error, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::pipeline::Transform;
use crate::{FailureReason, JobResult, WorkItem};

/// Run `transform` on `item` and turn every outcome into exactly one [`JobResult`].
///
/// An `Err` from the transform is an expected job failure. A panic is caught here, and only
/// here, and recorded as [`FailureReason::Fault`] so it can be told apart in logs and in the
/// failure list.
pub fn run_guarded<T: Transform + ?Sized>(transform: &T, item: WorkItem) -> JobResult {
    match panic::catch_unwind(AssertUnwindSafe(|| transform.apply(&item))) {
        Ok(Ok(outputs)) => JobResult::Success { item, outputs },
        Ok(Err(err)) => {
            warn!("{}: {}", item.input.display(), err);
            JobResult::Failure {
                item,
                reason: FailureReason::Transform(err.to_string()),
            }
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            error!(
                "unexpected fault while processing {}: {}",
                item.input.display(),
                msg
            );
            JobResult::Failure {
                item,
                reason: FailureReason::Fault(msg),
            }
        }
    }
}

/// Text of a panic payload (`&str` or `String`), or a placeholder.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
