// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `codec`     – C-heap buffer ownership (calloc / free)
//   • `shim`      – raw C strings handed in by callers
//   • `platform`  – Win32 / CRT FFI
//   • `ffi`       – the exported `extern "C"` surface
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! UTF-8 entry points for Windows.
//!
//! The Windows CRT and loader only accept arbitrary Unicode through their
//! wide-character (`_w*` / `*W`) functions; the narrow ones go through the
//! active ANSI code page.  This crate exports `utf8_fopen`, `utf8_getenv`,
//! `utf8_LoadLibrary` and friends, which take UTF-8, convert to UTF-16,
//! call the wide primitive, and convert text results back.
//!
//! A host toolchain redirects its ANSI calls to these symbols at build time;
//! see [`symbols::SUBSTITUTIONS`] for the mapping.

#[macro_use]
mod diag;

pub mod codec;
pub mod error;
pub mod shim;
pub mod symbols;

mod platform;

#[cfg(windows)]
pub mod ffi;

#[cfg(windows)]
pub use platform::win32::Native;
