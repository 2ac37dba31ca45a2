//! Canonical package-name handling.
//!
//! Package names compare case-insensitively, and `-`, `_` and `.` are
//! interchangeable separators. Every cross-store comparison (manifest vs
//! lockfile vs installed set) goes through `canonical_name` first.

/// Canonical comparison form of a package name: lowercase, with any run of
/// `-`, `_` or `.` collapsed to a single `-`.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;

    for ch in name.trim().chars() {
        if matches!(ch, '-' | '_' | '.') {
            in_separator = true;
            continue;
        }
        if in_separator && !out.is_empty() {
            out.push('-');
        }
        in_separator = false;
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }

    out
}
