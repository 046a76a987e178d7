//! Alignment arithmetic and precondition reporting

use core::panic::Location;
use core::ptr::{self, NonNull};

use crate::macros::ensure;

/// Checks that `align` is a power of two greater than zero
///
/// # Examples
/// ```
/// use groundwork_memory::utils::is_valid_alignment;
///
/// assert!(is_valid_alignment(1));
/// assert!(is_valid_alignment(64));
/// assert!(!is_valid_alignment(0));
/// assert!(!is_valid_alignment(12));
/// ```
#[inline]
pub const fn is_valid_alignment(align: usize) -> bool {
    align.is_power_of_two()
}

/// Aligns a value up to the nearest multiple of alignment
///
/// `value + alignment - 1` must fit in `usize`; use [`checked_align_up`]
/// when it might not.
///
/// # Examples
/// ```
/// use groundwork_memory::utils::align_up;
///
/// assert_eq!(align_up(7, 8), 8);
/// assert_eq!(align_up(8, 8), 8);
/// assert_eq!(align_up(9, 8), 16);
/// ```
#[inline]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (value + alignment - 1) & !(alignment - 1)
}

/// Like [`align_up`], but returns `None` instead of wrapping past `usize::MAX`
#[inline]
pub const fn checked_align_up(value: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    match value.checked_add(alignment - 1) {
        Some(bumped) => Some(bumped & !(alignment - 1)),
        None => None,
    }
}

/// Checks if a value is aligned to the given alignment
#[inline]
pub const fn is_aligned(value: usize, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    value & (alignment - 1) == 0
}

/// Calculates padding needed to align a value
///
/// # Examples
/// ```
/// use groundwork_memory::utils::padding_needed;
///
/// assert_eq!(padding_needed(7, 8), 1);
/// assert_eq!(padding_needed(8, 8), 0);
/// ```
#[inline]
pub const fn padding_needed(value: usize, alignment: usize) -> usize {
    align_up(value, alignment) - value
}

/// Moves an address forward to the next multiple of `align`
///
/// An invalid alignment is a caller bug and is fatal, as is an address so
/// close to `usize::MAX` that the aligned result does not fit.
#[track_caller]
pub fn align_forward_addr(addr: usize, align: usize) -> usize {
    ensure!(
        is_valid_alignment(align),
        "align_forward_addr",
        "alignment must be a power of two greater than zero"
    );
    match checked_align_up(addr, align) {
        Some(aligned) => aligned,
        None => precondition_failed("align_forward_addr", "aligned address overflows usize"),
    }
}

/// Well-aligned, non-null pointer that owns no memory; used for empty blocks
#[inline]
pub(crate) fn dangling_aligned(align: usize) -> NonNull<u8> {
    NonNull::new(ptr::without_provenance_mut::<u8>(align)).unwrap_or(NonNull::dangling())
}

/// Report a violated precondition and panic
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn precondition_failed(operation: &'static str, message: &str) -> ! {
    let location = Location::caller();

    #[cfg(feature = "logging")]
    tracing::error!(
        operation,
        file = location.file(),
        line = location.line(),
        "precondition violated: {message}"
    );

    panic!("{operation}: {message} ({location})");
}
