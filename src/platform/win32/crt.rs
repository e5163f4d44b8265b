// ── Microsoft CRT wide-character entry points ─────────────────────────────────
//
// Declared by their exported names.  `_wstat` and `_stat` are header macros
// over the sized variants; `_wstat64` is the one with a 64-bit size and
// 64-bit times, matching `libc::stat` on Windows targets.

#![allow(unsafe_code)]

use std::ffi::c_int;

use libc::FILE;

extern "C" {
    pub(crate) fn _wfopen(filename: *const u16, mode: *const u16) -> *mut FILE;
    pub(crate) fn _wfreopen(path: *const u16, mode: *const u16, stream: *mut FILE) -> *mut FILE;
    pub(crate) fn _wstat64(path: *const u16, buffer: *mut libc::stat) -> c_int;
    pub(crate) fn _wgetcwd(buffer: *mut u16, maxlen: c_int) -> *mut u16;
    pub(crate) fn _wgetenv(varname: *const u16) -> *mut u16;
    pub(crate) fn _wopen(filename: *const u16, oflag: c_int, ...) -> c_int;
    pub(crate) fn _wsystem(command: *const u16) -> c_int;
    pub(crate) fn _errno() -> *mut c_int;
}
