//! Build script for pupfeed
//!
//! Stamps the binary with its compile time. The bundled sample chart is
//! compiled in, so edits to it also trigger a rebuild.

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=data/sample_feed.json");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    println!("cargo:rustc-env=PUPFEED_BUILD_TIMESTAMP={}", timestamp);
}
