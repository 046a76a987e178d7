//! Internal macros for groundwork-memory

/// Check a caller precondition; on violation, report and panic.
///
/// ```text
/// ensure!(is_valid_alignment(align), "Arena::alloc", "alignment must be a power of two");
/// ```
///
/// The message is logged at `error` level together with the operation name
/// and the caller's location (enclosing functions carry `#[track_caller]`),
/// then the thread panics. Release builds set `panic = "abort"`, so a
/// violation ends the process there.
macro_rules! ensure {
    ($cond:expr, $operation:expr, $message:expr $(,)?) => {
        if !$cond {
            $crate::utils::precondition_failed($operation, $message)
        }
    };
}

pub(crate) use ensure;
