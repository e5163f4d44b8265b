// ── Symbol substitution table ─────────────────────────────────────────────────
//
// Which ANSI names a host toolchain redirects to which exported wrapper.
// Hosts that preprocess C (`#define fopen utf8_fopen`) or relocate symbols at
// link time both consume this table; `manifest_json` renders it for the
// latter.

use serde::Serialize;

/// One redirected entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Substitution {
    /// Name the host code calls.
    pub ansi: &'static str,
    /// Exported `utf8_*` symbol that replaces it.
    pub wrapper: &'static str,
}

const fn sub(ansi: &'static str, wrapper: &'static str) -> Substitution {
    Substitution { ansi, wrapper }
}

pub const SUBSTITUTIONS: &[Substitution] = &[
    sub("fopen", "utf8_fopen"),
    sub("freopen", "utf8_freopen"),
    sub("_stat", "utf8__stat"),
    sub("stat", "utf8__stat"),
    sub("getcwd", "utf8_getcwd"),
    sub("getenv", "utf8_getenv"),
    sub("open", "utf8_open"),
    sub("system", "utf8_system"),
    sub("LoadLibraryA", "utf8_LoadLibrary"),
];

const MANIFEST_VERSION: u32 = 1;

#[derive(Serialize)]
struct Manifest {
    version: u32,
    substitutions: &'static [Substitution],
}

/// The wrapper that replaces `ansi`, if it is redirected.
pub fn wrapper_for(ansi: &str) -> Option<&'static str> {
    SUBSTITUTIONS
        .iter()
        .find(|s| s.ansi == ansi)
        .map(|s| s.wrapper)
}

/// The substitution table as JSON:
/// `{"version":1,"substitutions":[{"ansi":"fopen","wrapper":"utf8_fopen"},…]}`.
pub fn manifest_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Manifest {
        version: MANIFEST_VERSION,
        substitutions: SUBSTITUTIONS,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
