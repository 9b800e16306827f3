//! Binary entrypoint for the browser-hosted plugin bundle.

#[cfg(all(target_arch = "wasm32", feature = "csr"))]
fn main() {
    site::mount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!(
        "This binary is intended for the browser/WASM workflow. Build the plugin bundle with `cargo xtask build-web` or package it with `cargo xtask package`."
    );
}
