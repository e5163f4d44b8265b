// ── UTF-8 ↔ UTF-16 codec ──────────────────────────────────────────────────────
//
// Every conversion is two-pass: ask the codepage backend how many units the
// destination needs (terminator included), allocate exactly that, then
// convert.  No "2 bytes per char" guesses.
//
// Buffers live on the C runtime heap (calloc / free) rather than the Rust
// allocator, because some of them are handed to C callers who release them
// with `free()`.
//
// Unsafe is permitted here per crate policy: raw C-heap ownership.

#![allow(unsafe_code)]

use std::{
    ffi::{c_char, CStr, CString},
    fmt, mem,
    ptr::NonNull,
    slice,
};

use crate::{
    error::{Direction, Result, ShimError},
    platform::codepage,
};

// ── Code units ────────────────────────────────────────────────────────────────

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// A character unit of a NUL-terminated C string: `u8` (UTF-8) or `u16`
/// (UTF-16).  Zero is the terminator.
pub trait CodeUnit: sealed::Sealed + Copy + Default + PartialEq + 'static {}

impl CodeUnit for u8 {}
impl CodeUnit for u16 {}

/// Count the units before the terminator.
///
/// # Safety
/// `ptr` must point to a readable, NUL-terminated sequence of `T`.
unsafe fn terminated_len<T: CodeUnit>(ptr: *const T) -> usize {
    let mut n = 0;
    // SAFETY: the caller guarantees a terminator exists, so every read up to
    // and including it is in bounds.
    while unsafe { *ptr.add(n) } != T::default() {
        n += 1;
    }
    n
}

// ── CBuf ──────────────────────────────────────────────────────────────────────

/// An owned, NUL-terminated string on the C runtime heap.
///
/// Released with `free` on `Drop`, exactly once.  [`CBuf::into_raw`] hands
/// ownership to C code instead, which must then `free` it.
pub struct CBuf<T: CodeUnit> {
    ptr: NonNull<T>,
    /// Allocated units, terminator included.  Always ≥ 1.
    len: usize,
}

/// UTF-16 string, as taken by the `_w*` CRT functions and `*W` Win32 APIs.
pub type WideBuf = CBuf<u16>;

/// UTF-8 string, as taken and returned by the exported `utf8_*` functions.
pub type NarrowBuf = CBuf<u8>;

impl<T: CodeUnit> CBuf<T> {
    /// Allocate `len` zeroed units.  `None` if `len` is zero or the heap is
    /// exhausted.
    pub(crate) fn zeroed(len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        // SAFETY: calloc has no preconditions; it checks `len * size` for
        // overflow itself and returns null on failure.
        let raw = unsafe { libc::calloc(len, mem::size_of::<T>()) }.cast::<T>();
        let ptr = NonNull::new(raw)?;
        tally::acquire();
        Some(Self { ptr, len })
    }

    /// Adopt a NUL-terminated string that C code allocated with
    /// `malloc`/`calloc` (e.g. the result of `_wgetcwd(NULL, 0)`).
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    /// `raw` must be null, or a NUL-terminated C-heap allocation that no one
    /// else will free.
    pub unsafe fn from_raw(raw: *mut T) -> Option<Self> {
        let ptr = NonNull::new(raw)?;
        // SAFETY: the caller guarantees a NUL-terminated sequence.
        let len = unsafe { terminated_len(ptr.as_ptr()) } + 1;
        tally::acquire();
        Some(Self { ptr, len })
    }

    /// Pointer to the first unit; valid while `self` is alive.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Every allocated unit, terminator included.
    pub fn units_with_nul(&self) -> &[T] {
        // SAFETY: `len` units were allocated (and zero-initialised by calloc,
        // or scanned up to the terminator by from_raw) and are owned by self.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The string's units, up to the first terminator.
    pub fn units(&self) -> &[T] {
        let all = self.units_with_nul();
        let end = all
            .iter()
            .position(|&u| u == T::default())
            .unwrap_or(all.len());
        &all[..end]
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in units_with_nul; &mut self gives exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Give up ownership.  The caller must eventually `free` the pointer.
    pub fn into_raw(self) -> *mut T {
        let me = mem::ManuallyDrop::new(self);
        tally::transfer();
        me.ptr.as_ptr()
    }
}

impl<T: CodeUnit> Drop for CBuf<T> {
    fn drop(&mut self) {
        // SAFETY: ptr came from calloc (zeroed) or was adopted from the C heap
        // (from_raw), and into_raw skips this destructor, so it is freed once.
        unsafe { libc::free(self.ptr.as_ptr().cast()) };
        tally::release();
    }
}

impl<T: CodeUnit + fmt::Debug> fmt::Debug for CBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CBuf")
            .field("len", &self.len)
            .field("units", &self.units())
            .finish()
    }
}

impl WideBuf {
    /// Encode Rust text for a wide-character API.
    pub fn encode(text: &str) -> Result<Self> {
        let c = CString::new(text)?;
        encode_cstr(&c).ok_or(ShimError::Conversion {
            direction: Direction::ToWide,
        })
    }

    /// Decode back to a UTF-8 buffer.
    pub fn decode(&self) -> Result<NarrowBuf> {
        decode_units(self.units_with_nul()).ok_or(ShimError::Conversion {
            direction: Direction::ToNarrow,
        })
    }
}

impl NarrowBuf {
    /// View the buffer as `&str`.
    pub fn to_str(&self) -> Result<&str> {
        Ok(std::str::from_utf8(self.units())?)
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

/// UTF-8 → UTF-16.  `None` when `text` is null or the conversion is
/// unavailable (zero-length query, heap exhausted).
///
/// # Safety
/// `text` must be null or point to a NUL-terminated byte string.
pub unsafe fn encode_utf16(text: *const c_char) -> Option<WideBuf> {
    if text.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    encode_cstr(unsafe { CStr::from_ptr(text) })
}

/// UTF-8 → UTF-16 for a string already known to be terminated.
pub fn encode_cstr(text: &CStr) -> Option<WideBuf> {
    let src = text.to_bytes_with_nul();
    let len = codepage::wide_len(src);
    let mut buf = WideBuf::zeroed(len)?;
    if codepage::to_wide(src, buf.as_mut_slice()) == 0 {
        trace!("to_wide failed for {} bytes", src.len());
        return None;
    }
    Some(buf)
}

/// UTF-16 → UTF-8.  `None` when `text` is null or the conversion is
/// unavailable.
///
/// # Safety
/// `text` must be null or point to a NUL-terminated UTF-16 sequence.
pub unsafe fn decode_utf8(text: *const u16) -> Option<NarrowBuf> {
    if text.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the caller contract; the slice
    // covers the string and its terminator only.
    let src = unsafe { slice::from_raw_parts(text, terminated_len(text) + 1) };
    decode_units(src)
}

/// UTF-16 → UTF-8 for units that end with their terminator.
pub(crate) fn decode_units(src: &[u16]) -> Option<NarrowBuf> {
    debug_assert_eq!(src.last(), Some(&0), "source must carry its terminator");
    let len = codepage::narrow_len(src);
    let mut buf = NarrowBuf::zeroed(len)?;
    if codepage::to_narrow(src, buf.as_mut_slice()) == 0 {
        trace!("to_narrow failed for {} units", src.len());
        return None;
    }
    Some(buf)
}

// ── Allocation tally ──────────────────────────────────────────────────────────
//
// Test builds count every buffer acquired, released and handed to a caller
// on the current thread, so wrapper tests can check that nothing leaks and
// nothing is freed twice.  Release builds compile these to nothing.

#[cfg(test)]
pub(crate) mod tally {
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub(crate) struct Counts {
        pub(crate) acquired: usize,
        pub(crate) released: usize,
        pub(crate) transferred: usize,
    }

    impl Counts {
        /// Every acquisition was either released or handed off.
        pub(crate) fn balanced(self) -> bool {
            self.acquired == self.released + self.transferred
        }
    }

    thread_local! {
        static COUNTS: Cell<Counts> = Cell::new(Counts::default());
    }

    fn bump(f: impl FnOnce(&mut Counts)) {
        COUNTS.with(|c| {
            let mut v = c.get();
            f(&mut v);
            c.set(v);
        });
    }

    pub(crate) fn acquire() {
        bump(|c| c.acquired += 1);
    }

    pub(crate) fn release() {
        bump(|c| c.released += 1);
    }

    pub(crate) fn transfer() {
        bump(|c| c.transferred += 1);
    }

    pub(crate) fn reset() {
        COUNTS.with(|c| c.set(Counts::default()));
    }

    pub(crate) fn snapshot() -> Counts {
        COUNTS.with(Cell::get)
    }
}

#[cfg(not(test))]
mod tally {
    #[inline(always)]
    pub(crate) fn acquire() {}
    #[inline(always)]
    pub(crate) fn release() {}
    #[inline(always)]
    pub(crate) fn transfer() {}
}

// ── Tests ─────────────────────────────────────────────────────────────────────
