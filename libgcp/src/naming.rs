//! Provider resource naming.
//!
//! Compute Engine resource names must match `[a-z]([-a-z0-9]*[a-z0-9])?` and
//! be at most 63 characters. Engine-assigned instance ids
//! (e.g. `boot_disk_K3sy7T`) are not valid names as-is, so they are
//! sanitized before use.

/// Maximum length of a provider resource name.
const MAX_NAME_LEN: usize = 63;

/// Sanitize an arbitrary identifier into a legal resource name.
///
/// Lowercases, maps every character outside `[a-z0-9-]` to `-`, prefixes a
/// letter when the input starts with anything else, strips trailing hyphens,
/// and truncates to 63 characters.
pub fn gcp_resource_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '-') => c,
            _ => '-',
        })
        .collect();

    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        name.insert(0, 'd');
    }
    name.truncate(MAX_NAME_LEN);
    while name.ends_with('-') {
        name.pop();
    }
    name
}
