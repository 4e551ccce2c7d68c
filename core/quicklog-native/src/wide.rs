//! UTF-16 string marshalling for the engine ABI.

/// Encodes `s` as a NUL-terminated UTF-16 buffer.
///
/// An interior NUL ends the string as the engine sees it.
#[must_use]
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Copies a NUL-terminated UTF-16 string into an owned `String`.
///
/// A null pointer reads as the empty string. Unpaired surrogates are
/// replaced with U+FFFD.
///
/// # Safety
/// `ptr` must be null or point to a readable NUL-terminated UTF-16 buffer.
pub unsafe fn from_wide_ptr(ptr: *const u16) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let mut len = 0usize;
    // SAFETY: the caller guarantees a terminator within the buffer.
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
    }
}
