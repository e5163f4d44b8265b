// ── Win32 platform implementation ─────────────────────────────────────────────
//
// The only place that talks to the real OS.  Every `unsafe` block MUST carry
// a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod codepage; // MultiByteToWideChar / WideCharToMultiByte
mod crt; // _wfopen, _wstat64, _wgetcwd, …

use std::ffi::c_int;

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{SetLastError, HANDLE, HMODULE, WIN32_ERROR},
        System::LibraryLoader::{LoadLibraryExW, LOAD_LIBRARY_FLAGS},
    },
};

use crate::shim::{LibrarySearch, WidePrimitives};

/// The Microsoft CRT and the Win32 loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct Native;

impl WidePrimitives for Native {
    type Stream = *mut libc::FILE;
    type Stat = libc::stat;
    type Module = HMODULE;

    unsafe fn wfopen(&self, path: *const u16, mode: *const u16) -> *mut libc::FILE {
        // SAFETY: pointers are null or terminated (trait contract); the CRT
        // validates null itself and reports EINVAL.
        unsafe { crt::_wfopen(path, mode) }
    }

    unsafe fn wfreopen(
        &self,
        path: *const u16,
        mode: *const u16,
        stream: *mut libc::FILE,
    ) -> *mut libc::FILE {
        // SAFETY: as in wfopen; stream is the caller's.
        unsafe { crt::_wfreopen(path, mode, stream) }
    }

    unsafe fn wstat(&self, path: *const u16, out: *mut libc::stat) -> c_int {
        // SAFETY: as in wfopen; out is the caller's record.
        unsafe { crt::_wstat64(path, out) }
    }

    unsafe fn wgetcwd(&self) -> *mut u16 {
        // SAFETY: a null buffer with length 0 makes the CRT malloc a buffer of
        // the exact size; ownership passes to us.
        unsafe { crt::_wgetcwd(std::ptr::null_mut(), 0) }
    }

    unsafe fn wgetenv(&self, name: *const u16) -> *const u16 {
        // SAFETY: name is null or terminated.  The result points into the
        // CRT's environment table and is not ours to free.
        unsafe { crt::_wgetenv(name) }
    }

    unsafe fn wopen(&self, path: *const u16, flags: c_int, mode: c_int) -> c_int {
        // SAFETY: path is null or terminated.  The CRT only reads the variadic
        // mode when _O_CREAT is in flags; passing it unconditionally is fine.
        unsafe { crt::_wopen(path, flags, mode) }
    }

    unsafe fn wsystem(&self, command: *const u16) -> c_int {
        // SAFETY: command is null (interpreter query) or terminated.
        unsafe { crt::_wsystem(command) }
    }

    unsafe fn load_library(&self, name: *const u16, search: LibrarySearch) -> HMODULE {
        // SAFETY: name is null or terminated; no file handle is passed (must
        // be null per the LoadLibraryExW contract).
        let loaded = unsafe {
            LoadLibraryExW(PCWSTR(name), HANDLE::default(), LOAD_LIBRARY_FLAGS(search.bits()))
        };
        match loaded {
            Ok(module) => module,
            Err(e) => {
                restore_last_error(&e);
                trace!("{}", crate::error::ShimError::from(e));
                HMODULE::default()
            }
        }
    }

    fn set_errno(&self, code: c_int) {
        // SAFETY: _errno returns the calling thread's errno slot, valid for
        // the thread's lifetime.
        unsafe { *crt::_errno() = code };
    }
}

/// Put the loader's error code back into `GetLastError` so C callers see the
/// same value they would after calling `LoadLibraryExW` themselves.
fn restore_last_error(e: &windows::core::Error) {
    // HRESULT_FROM_WIN32 sets facility 7 and the failure bit.
    let hr = e.code().0 as u32;
    if hr & 0xFFFF_0000 == 0x8007_0000 {
        // SAFETY: SetLastError only writes thread-local state.
        unsafe { SetLastError(WIN32_ERROR(hr & 0xFFFF)) };
    }
}
