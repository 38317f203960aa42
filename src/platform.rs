//! Platform detection utilities

use std::fs;

/// Detect if running in WSL (Windows Subsystem for Linux)
///
/// espeak-ng under WSL needs the WSLg PulseAudio socket to be audible.
pub fn is_wsl() -> bool {
    if std::env::var("WSL_DISTRO_NAME").is_ok() {
        return true;
    }

    fs::read_to_string("/proc/version")
        .map(|contents| kernel_is_wsl(&contents))
        .unwrap_or(false)
}

/// Does a `/proc/version` string name a WSL kernel?
fn kernel_is_wsl(version: &str) -> bool {
    let lower = version.to_lowercase();
    lower.contains("microsoft") || lower.contains("wsl")
}
