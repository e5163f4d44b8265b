// ── Win32 codepage backend ────────────────────────────────────────────────────
//
// `MultiByteToWideChar` / `WideCharToMultiByte` with `CP_UTF8` and no flags:
// malformed input is replaced with U+FFFD rather than rejected.  Passing no
// destination turns each call into a length query.

#![allow(unsafe_code)]

use windows::{
    core::PCSTR,
    Win32::Globalization::{
        MultiByteToWideChar, WideCharToMultiByte, CP_UTF8, MULTI_BYTE_TO_WIDE_CHAR_FLAGS,
    },
};

/// Both APIs return a positive count on success and 0 on failure.
fn count(n: i32) -> usize {
    usize::try_from(n).unwrap_or(0)
}

pub(crate) fn wide_len(src: &[u8]) -> usize {
    // SAFETY: src is a live slice; with no destination nothing is written.
    count(unsafe { MultiByteToWideChar(CP_UTF8, MULTI_BYTE_TO_WIDE_CHAR_FLAGS(0), src, None) })
}

pub(crate) fn to_wide(src: &[u8], dst: &mut [u16]) -> usize {
    // SAFETY: both slices are live and the API writes at most dst.len() units,
    // failing with ERROR_INSUFFICIENT_BUFFER otherwise.
    count(unsafe {
        MultiByteToWideChar(CP_UTF8, MULTI_BYTE_TO_WIDE_CHAR_FLAGS(0), src, Some(dst))
    })
}

pub(crate) fn narrow_len(src: &[u16]) -> usize {
    // SAFETY: src is a live slice; with no destination nothing is written.
    // CP_UTF8 requires a null default char and no used-default flag.
    count(unsafe { WideCharToMultiByte(CP_UTF8, 0, src, None, PCSTR::null(), None) })
}

pub(crate) fn to_narrow(src: &[u16], dst: &mut [u8]) -> usize {
    // SAFETY: as in to_wide.
    count(unsafe { WideCharToMultiByte(CP_UTF8, 0, src, Some(dst), PCSTR::null(), None) })
}
