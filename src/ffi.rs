// ── Exported C surface ────────────────────────────────────────────────────────
//
// The symbols a host toolchain links against in place of the ANSI CRT and
// loader functions (see `symbols::SUBSTITUTIONS`).  Each one binds a
// `shim` wrapper to `Native`.
//
// Strings returned by `utf8_getcwd(NULL, …)` and `utf8_getenv` are
// allocated with the CRT heap; callers release them with `free()`.

#![allow(unsafe_code)]

use std::ffi::{c_char, c_int};

use libc::FILE;
use windows::Win32::Foundation::HMODULE;

use crate::{platform::win32::Native, shim};

/// `fopen` taking UTF-8.
///
/// # Safety
/// `path` and `mode` are null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn utf8_fopen(path: *const c_char, mode: *const c_char) -> *mut FILE {
    // SAFETY: forwarded caller contract.
    unsafe { shim::open_file(&Native, path, mode) }
}

/// `freopen` taking UTF-8.
///
/// # Safety
/// `path` and `mode` are null or NUL-terminated; `stream` is an open stream.
#[no_mangle]
pub unsafe extern "C" fn utf8_freopen(
    path: *const c_char,
    mode: *const c_char,
    stream: *mut FILE,
) -> *mut FILE {
    // SAFETY: forwarded caller contract.
    unsafe { shim::reopen_file(&Native, path, mode, stream) }
}

/// `_stat` / `stat` taking UTF-8.  `buff` receives a `struct _stat64`.
///
/// # Safety
/// `path` is null or NUL-terminated; `buff` is writable.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn utf8__stat(path: *const c_char, buff: *mut libc::stat) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { shim::stat_path(&Native, path, buff) }
}

/// `getcwd` returning UTF-8.
///
/// # Safety
/// `buff` is null or writable for `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn utf8_getcwd(buff: *mut c_char, size: c_int) -> *mut c_char {
    // SAFETY: forwarded caller contract.
    unsafe { shim::get_cwd(&Native, buff, size) }
}

/// `getenv` taking and returning UTF-8.
///
/// # Safety
/// `var` is null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn utf8_getenv(var: *const c_char) -> *mut c_char {
    // SAFETY: forwarded caller contract.
    unsafe { shim::get_env(&Native, var) }
}

/// `open(path, flag, ...)` taking UTF-8.
///
/// Declared in C as variadic.  A variadic `int` travels in the same slot as
/// a fixed third `int` on every Windows calling convention, and `mode` is
/// only read when `flag` contains `_O_CREAT`.
///
/// # Safety
/// `path` is null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn utf8_open(path: *const c_char, flag: c_int, mode: c_int) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { shim::open_fd(&Native, path, flag, mode) }
}

/// `system` taking UTF-8.
///
/// # Safety
/// `command` is null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn utf8_system(command: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { shim::run_shell(&Native, command) }
}

/// `LoadLibraryA` taking UTF-8, restricted to the default and user DLL
/// directories.
///
/// # Safety
/// `module` is null or NUL-terminated.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn utf8_LoadLibrary(module: *const c_char) -> HMODULE {
    // SAFETY: forwarded caller contract.
    unsafe { shim::load_library(&Native, module) }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// These hit the real CRT, so they only build on Windows.
