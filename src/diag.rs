// ── Diagnostics ───────────────────────────────────────────────────────────────
//
// Off by default: the shim must not add side effects to the calls it wraps.
// Build with `--features trace` to see conversion and loader failures on
// stderr while debugging a host toolchain.

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "trace")]
        {
            eprintln!("[utf8fix] {}", format_args!($($arg)*));
        }
    };
}
