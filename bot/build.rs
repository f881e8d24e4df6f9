//! Build script for cibot
//! Embeds the git revision and build time reported by `--version`

use std::process::Command;

use chrono::Utc;

fn main() {
    // CI can pin the revision when building outside a git checkout
    let git_hash = std::env::var("CIBOT_GIT_HASH")
        .ok()
        .or_else(short_head)
        .unwrap_or_else(|| "unknown".to_string());
    let build_time = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=GIT_HASH={git_hash}");
    println!("cargo:rustc-env=BUILD_TIME={build_time}");
    println!("cargo:rerun-if-env-changed=CIBOT_GIT_HASH");
    println!("cargo:rerun-if-changed=../.git/HEAD");
}

fn short_head() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string())
}
