use std::env;
use std::process::Command;

fn main() {
    // Prefer values injected by CI, fall back to the local checkout
    let git_hash = env::var("VERGEN_GIT_SHA").unwrap_or_else(|_| {
        Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| String::from_utf8(output.stdout).ok())
            .map(|hash| hash.trim().to_string())
            .filter(|hash| !hash.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    });

    let timestamp = env::var("VERGEN_BUILD_TIMESTAMP")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=VERGEN_GIT_SHA={}", git_hash);
    println!("cargo:rustc-env=VERGEN_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=VERGEN_CARGO_TARGET_TRIPLE={}", target);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=VERGEN_GIT_SHA");
    println!("cargo:rerun-if-env-changed=VERGEN_BUILD_TIMESTAMP");
}
