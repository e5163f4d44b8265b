// ── Platform layer ────────────────────────────────────────────────────────────
//
// Two backends behind one set of free functions:
//   • `win32`    – the real thing: Win32 codepage conversion, CRT wide
//                  functions, the loader.
//   • `portable` – a pure-Rust codepage with the same two-pass contract, so
//                  the codec and the wrapper logic build and test on any host.
//
// Codepage contract (both backends):
//   `wide_len(src)`   – UTF-16 units needed for `src`, terminator included;
//                        0 on failure.
//   `to_wide(src, d)` – convert into `d`; units written, or 0 if `d` is too
//                        small.
//   `narrow_len` / `to_narrow` – the same, UTF-16 → UTF-8 bytes.
// `src` always ends with its NUL terminator, so lengths count it too.

#[cfg(windows)]
pub mod win32;

#[cfg(not(windows))]
pub(crate) mod portable;

#[cfg(windows)]
pub(crate) use win32::codepage;

#[cfg(not(windows))]
pub(crate) use portable as codepage;
