// Build script that copies static assets to `dist/`. The wasm bundle itself
// is produced by `cargo run` (wasm-pack into static/pkg); invoking wasm-pack
// from here would re-enter this build.
use std::{fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    // Copy static/ to dist/
    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    fs::create_dir_all(out_dir).ok();

    let static_dir = Path::new("static");
    if static_dir.exists() {
        let opts = CopyOptions::new().content_only(true).overwrite(true);
        if let Err(e) = copy(static_dir, out_dir, &opts) {
            println!("cargo:warning=copying static/ to dist/ failed: {e}");
        }
    }
}
