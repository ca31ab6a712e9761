use std::{env, process::Command};

/// Commit reported in the startup log line. `BEAMCAST_GIT_COMMIT` wins over
/// git so that builds from a source tarball can still be stamped.
fn git_commit() -> String {
    if let Ok(commit) = env::var("BEAMCAST_GIT_COMMIT") {
        return commit;
    }

    Command::new("git")
        .args(["describe", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".into())
}

fn main() {
    println!("cargo:rerun-if-env-changed=BEAMCAST_GIT_COMMIT");
    println!("cargo:rerun-if-changed=.git/HEAD");

    println!("cargo:rustc-env=GIT_COMMIT={}", git_commit());
    println!(
        "cargo:rustc-env=BUILD_TIME={}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
}
