//! Pin set for the constrained UWP arm64 cross build.
//!
//! Upstream builds against stable on desktop targets; the UWP target needs
//! `-Z build-std`, so the tree is pinned to nightly before the build:
//! a toolchain descriptor is generated, the build script is repointed at it,
//! the internal zenoh dependency is pinned from a moving branch to the
//! release tag, and two crate pins are injected into the manifest.

use super::PatchOp;
use crate::core::options::CONSTRAINED_CHANNEL;
use crate::core::platform::CROSS_TARGET;
use serde::Serialize;
use std::path::Path;

/// File name of the generated toolchain descriptor.
pub const TOOLCHAIN_FILE: &str = "rust-toolchain-uwp.toml";

#[derive(Serialize)]
struct ToolchainDescriptor {
    toolchain: ToolchainSection,
}

#[derive(Serialize)]
struct ToolchainSection {
    channel: String,
    targets: Vec<String>,
}

/// Render the toolchain descriptor pinning the nightly channel and the
/// cross target.
pub fn render_toolchain_descriptor() -> Result<String, String> {
    let descriptor = ToolchainDescriptor {
        toolchain: ToolchainSection {
            channel: CONSTRAINED_CHANNEL.to_string(),
            targets: vec![CROSS_TARGET.to_string()],
        },
    };
    toml::to_string(&descriptor)
        .map_err(|e| format!("cannot render toolchain descriptor: {}", e))
}

/// Manifest block appended for the cross build: one dependency override and
/// one pinned dependency version. Appended unconditionally (see patch
/// engine notes on idempotency).
fn manifest_pin_block() -> String {
    "\n[patch.crates-io]\n\
     socket2 = { git = \"https://github.com/rust-lang/socket2\", tag = \"v0.5.5\" }\n\
     \n\
     [dependencies.windows-sys]\n\
     version = \"=0.48.0\"\n"
        .to_string()
}

/// Build the ordered pin set applied to the fetched source tree before a
/// constrained cross build. `tag` is the release the internal zenoh
/// dependency gets pinned to.
pub fn pin_ops(source_dir: &Path, tag: &str) -> Result<Vec<PatchOp>, String> {
    Ok(vec![
        PatchOp::Write {
            file: source_dir.join(TOOLCHAIN_FILE),
            contents: render_toolchain_descriptor()?,
        },
        PatchOp::Replace {
            file: source_dir.join("CMakeLists.txt"),
            find: "rust-toolchain.toml".to_string(),
            replace: TOOLCHAIN_FILE.to_string(),
        },
        PatchOp::Replace {
            file: source_dir.join("Cargo.toml"),
            find: "branch = \"main\"".to_string(),
            replace: format!("tag = \"{}\"", tag),
        },
        PatchOp::Append {
            file: source_dir.join("Cargo.toml"),
            text: manifest_pin_block(),
        },
    ])
}
