/// utf8fix build script.
///
/// The `utf8_*` C surface and the Win32 backend only exist on Windows.  Other
/// hosts still build the codec and wrapper logic (with the portable codepage)
/// so they can be tested, but the resulting cdylib/staticlib exports nothing
/// useful; say so instead of failing.
fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        println!(
            "cargo:warning=utf8fix: target {target_os:?} is not Windows; \
             the utf8_* C symbols are not exported"
        );
    }

    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
