// ── Wrapper set ───────────────────────────────────────────────────────────────
//
// One function per wrapped primitive.  Each one:
//   1. encodes every string argument with `codec` (null on failure),
//   2. calls the wide primitive through `WidePrimitives`,
//   3. decodes a wide-string result, or returns the native result untouched.
//
// The wrappers never invent an error: a failed conversion reaches the native
// call as a null pointer and fails there.  Every intermediate buffer is a
// `CBuf`, so it is freed on every return path.
//
// Unsafe is permitted here per crate policy: callers hand us raw C strings.

#![allow(unsafe_code)]

use std::{
    ffi::{c_char, c_int},
    ops::BitOr,
    ptr,
};

use crate::codec::{self, WideBuf};

// ── CRT constants ─────────────────────────────────────────────────────────────

/// `_O_CREAT` in the Microsoft CRT's `<fcntl.h>`.
pub const O_CREAT: c_int = 0x0100;

/// Permission bits used when `open_fd` creates a file and the caller gave
/// none.
pub const DEFAULT_CREATION_MODE: c_int = 0o777;

/// `errno` values set by `get_cwd` for a bad caller buffer.
pub const EINVAL: c_int = 22;
pub const ERANGE: c_int = 34;

// ── Creation mode ─────────────────────────────────────────────────────────────

/// The optional third argument of `open()`.
///
/// C callers pass it variadically and it is only meaningful with `O_CREAT`;
/// otherwise whatever sits in that slot is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationMode {
    /// No creation flag: use [`DEFAULT_CREATION_MODE`].
    Default,
    /// `O_CREAT` was set; the caller's permission bits.
    Explicit(c_int),
}

impl CreationMode {
    pub fn select(flags: c_int, supplied: c_int) -> Self {
        if flags & O_CREAT != 0 {
            Self::Explicit(supplied)
        } else {
            Self::Default
        }
    }

    pub fn bits(self) -> c_int {
        match self {
            Self::Default => DEFAULT_CREATION_MODE,
            Self::Explicit(mode) => mode,
        }
    }
}

// ── Library search policy ─────────────────────────────────────────────────────

/// `LOAD_LIBRARY_SEARCH_*` flags for `LoadLibraryExW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibrarySearch(u32);

impl LibrarySearch {
    /// `LOAD_LIBRARY_SEARCH_USER_DIRS`: directories added with
    /// `AddDllDirectory` / `SetDllDirectory`.
    pub const USER_DIRS: Self = Self(0x0000_0400);
    /// `LOAD_LIBRARY_SEARCH_DEFAULT_DIRS`: application directory, System32
    /// and user directories.  Excludes the current directory and `PATH`.
    pub const DEFAULT_DIRS: Self = Self(0x0000_1000);
    /// What `load_library` always uses.
    pub const RESTRICTED: Self = Self(Self::DEFAULT_DIRS.0 | Self::USER_DIRS.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for LibrarySearch {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ── Native primitives ─────────────────────────────────────────────────────────

/// The wide-character primitives the wrappers forward to.
///
/// Implemented by `Native` (the Windows CRT and loader) and by recording
/// doubles in tests.  String arguments are NUL-terminated UTF-16 or null;
/// implementations pass null straight to the OS and let it fail.
pub trait WidePrimitives {
    /// Stream handle (`FILE *`).
    type Stream;
    /// Metadata record filled by `wstat`.
    type Stat;
    /// Loaded module handle (`HMODULE`).
    type Module;

    /// `_wfopen`.
    ///
    /// # Safety
    /// Pointers are null or NUL-terminated.
    unsafe fn wfopen(&self, path: *const u16, mode: *const u16) -> Self::Stream;

    /// `_wfreopen`.
    ///
    /// # Safety
    /// Pointers are null or NUL-terminated; `stream` is whatever the caller
    /// passed.
    unsafe fn wfreopen(
        &self,
        path: *const u16,
        mode: *const u16,
        stream: Self::Stream,
    ) -> Self::Stream;

    /// `_wstat64`.
    ///
    /// # Safety
    /// `path` is null or NUL-terminated; `out` is whatever the caller passed.
    unsafe fn wstat(&self, path: *const u16, out: *mut Self::Stat) -> c_int;

    /// `_wgetcwd(NULL, 0)`: a C-heap string the caller must free, or null.
    ///
    /// # Safety
    /// No preconditions beyond those of the OS call.
    unsafe fn wgetcwd(&self) -> *mut u16;

    /// `_wgetenv`: a pointer into the environment block, or null.  Not owned
    /// by the caller.
    ///
    /// # Safety
    /// `name` is null or NUL-terminated.
    unsafe fn wgetenv(&self, name: *const u16) -> *const u16;

    /// `_wopen`.
    ///
    /// # Safety
    /// `path` is null or NUL-terminated.
    unsafe fn wopen(&self, path: *const u16, flags: c_int, mode: c_int) -> c_int;

    /// `_wsystem`.
    ///
    /// # Safety
    /// `command` is null or NUL-terminated.
    unsafe fn wsystem(&self, command: *const u16) -> c_int;

    /// `LoadLibraryExW`.  Failure yields a null module with the thread's
    /// last-error value intact.
    ///
    /// # Safety
    /// `name` is null or NUL-terminated.
    unsafe fn load_library(&self, name: *const u16, search: LibrarySearch) -> Self::Module;

    /// Store `code` in the calling thread's `errno`.
    fn set_errno(&self, code: c_int);
}

/// Null when the conversion was unavailable.
fn wide_ptr(buf: &Option<WideBuf>) -> *const u16 {
    buf.as_ref().map_or(ptr::null(), WideBuf::as_ptr)
}

// ── Wrappers ──────────────────────────────────────────────────────────────────
//
// Safety contract shared by every wrapper: each `*const c_char` is null or a
// NUL-terminated string; non-string arguments satisfy the wrapped primitive's
// own contract.

/// `fopen` with a UTF-8 path and mode.
///
/// # Safety
/// See the shared contract above.
pub unsafe fn open_file<P: WidePrimitives + ?Sized>(
    native: &P,
    path: *const c_char,
    mode: *const c_char,
) -> P::Stream {
    // SAFETY: forwarded caller contract.
    let (wpath, wmode) = unsafe { (codec::encode_utf16(path), codec::encode_utf16(mode)) };
    // SAFETY: both pointers are null or point into live, terminated buffers.
    unsafe { native.wfopen(wide_ptr(&wpath), wide_ptr(&wmode)) }
}

/// `freopen` with a UTF-8 path and mode.
///
/// # Safety
/// See the shared contract above.
pub unsafe fn reopen_file<P: WidePrimitives + ?Sized>(
    native: &P,
    path: *const c_char,
    mode: *const c_char,
    stream: P::Stream,
) -> P::Stream {
    // SAFETY: forwarded caller contract.
    let (wpath, wmode) = unsafe { (codec::encode_utf16(path), codec::encode_utf16(mode)) };
    // SAFETY: both pointers are null or point into live, terminated buffers.
    unsafe { native.wfreopen(wide_ptr(&wpath), wide_ptr(&wmode), stream) }
}

/// `stat` with a UTF-8 path.  Metadata goes to `out`.
///
/// # Safety
/// See the shared contract above.
pub unsafe fn stat_path<P: WidePrimitives + ?Sized>(
    native: &P,
    path: *const c_char,
    out: *mut P::Stat,
) -> c_int {
    // SAFETY: forwarded caller contract.
    let wpath = unsafe { codec::encode_utf16(path) };
    // SAFETY: wpath is null or live; out is the caller's.
    unsafe { native.wstat(wide_ptr(&wpath), out) }
}

/// `getcwd` returning UTF-8.
///
/// The directory is always fetched at its full length.  With `buf` null the
/// result is a new C-heap string the caller frees.  With a caller buffer the
/// result is copied in when it fits in `size` bytes (terminator included);
/// otherwise `errno` becomes `ERANGE` (or `EINVAL` for `size <= 0`) and null
/// is returned.
///
/// # Safety
/// `buf` is null or writable for `size` bytes.
pub unsafe fn get_cwd<P: WidePrimitives + ?Sized>(
    native: &P,
    buf: *mut c_char,
    size: c_int,
) -> *mut c_char {
    // SAFETY: wgetcwd returns null or a terminated C-heap string we now own.
    let Some(wide) = (unsafe { WideBuf::from_raw(native.wgetcwd()) }) else {
        return ptr::null_mut();
    };
    let Some(narrow) = codec::decode_units(wide.units_with_nul()) else {
        return ptr::null_mut();
    };

    if buf.is_null() {
        return narrow.into_raw().cast();
    }

    let capacity = match usize::try_from(size) {
        Ok(n) if n > 0 => n,
        _ => {
            native.set_errno(EINVAL);
            return ptr::null_mut();
        }
    };
    let bytes = narrow.units_with_nul();
    if bytes.len() > capacity {
        native.set_errno(ERANGE);
        return ptr::null_mut();
    }
    // SAFETY: buf is writable for `capacity >= bytes.len()` bytes and cannot
    // overlap our own allocation.
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr().cast::<c_char>(), buf, bytes.len()) };
    buf
}

/// `getenv` returning UTF-8.  Null when the variable is unset.
///
/// The returned string is a new C-heap allocation owned by the caller.
///
/// # Safety
/// See the shared contract above.
pub unsafe fn get_env<P: WidePrimitives + ?Sized>(native: &P, name: *const c_char) -> *mut c_char {
    // SAFETY: forwarded caller contract.
    let wname = unsafe { codec::encode_utf16(name) };
    // SAFETY: wname is null or live.  The result belongs to the CRT's
    // environment block and is only read, never freed.
    let value = unsafe { native.wgetenv(wide_ptr(&wname)) };
    // SAFETY: value is null or terminated, and valid until the environment
    // next changes, which cannot happen before this returns.
    match unsafe { codec::decode_utf8(value) } {
        Some(narrow) => narrow.into_raw().cast(),
        None => ptr::null_mut(),
    }
}

/// `open` with a UTF-8 path.  `supplied` is only honoured with `O_CREAT`.
///
/// # Safety
/// See the shared contract above.
pub unsafe fn open_fd<P: WidePrimitives + ?Sized>(
    native: &P,
    path: *const c_char,
    flags: c_int,
    supplied: c_int,
) -> c_int {
    let mode = CreationMode::select(flags, supplied);
    // SAFETY: forwarded caller contract.
    let wpath = unsafe { codec::encode_utf16(path) };
    // SAFETY: wpath is null or live.
    unsafe { native.wopen(wide_ptr(&wpath), flags, mode.bits()) }
}

/// `system` with a UTF-8 command line.
///
/// # Safety
/// See the shared contract above.
pub unsafe fn run_shell<P: WidePrimitives + ?Sized>(native: &P, command: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    let wcommand = unsafe { codec::encode_utf16(command) };
    // SAFETY: wcommand is null or live.  A null command asks whether a
    // command interpreter exists, exactly as with `system(NULL)`.
    unsafe { native.wsystem(wide_ptr(&wcommand)) }
}

/// `LoadLibraryA` with a UTF-8 module name, searching only
/// [`LibrarySearch::RESTRICTED`].
///
/// # Safety
/// See the shared contract above.
pub unsafe fn load_library<P: WidePrimitives + ?Sized>(native: &P, name: *const c_char) -> P::Module {
    // SAFETY: forwarded caller contract.
    let wname = unsafe { codec::encode_utf16(name) };
    // SAFETY: wname is null or live.
    unsafe { native.load_library(wide_ptr(&wname), LibrarySearch::RESTRICTED) }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
