use std::process::Command;

fn main() {
    // FLOWDECK_BUILD_SHA takes precedence over git (source tarballs have no .git).
    println!("cargo:rerun-if-env-changed=FLOWDECK_BUILD_SHA");
    let sha = std::env::var("FLOWDECK_BUILD_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(git_short_sha)
        .unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=FLOWDECK_GIT_SHA={sha}");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");
}

fn git_short_sha() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    String::from_utf8(out.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
