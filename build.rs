//! Stamps the binary with a build number and compile time.
//!
//! CI can pin the number with PRATO_BUILD_NUMBER; local builds bump a counter
//! kept in build_number.txt next to Cargo.toml.

use std::path::PathBuf;

fn local_counter() -> u64 {
    let Some(dir) = std::env::var_os("CARGO_MANIFEST_DIR") else {
        return 0;
    };
    let path = PathBuf::from(dir).join("build_number.txt");

    let next = std::fs::read_to_string(&path)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0)
        + 1;

    // A read-only checkout still builds; the number just doesn't persist
    if let Err(e) = std::fs::write(&path, next.to_string()) {
        println!("cargo:warning=Could not persist build number: {}", e);
    }
    next
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=PRATO_BUILD_NUMBER");

    let build_number = std::env::var("PRATO_BUILD_NUMBER")
        .ok()
        .and_then(|n| n.trim().parse::<u64>().ok())
        .unwrap_or_else(local_counter);
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    println!("cargo:rustc-env=PRATO_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=PRATO_BUILD_TIMESTAMP={}", timestamp);
}
