/// Characters that may not appear in a directory name on common filesystems.
const CHARS_TO_REMOVE: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const CHARS_TO_TRIM: [char; 2] = ['.', ' '];

/// Make a single path segment safe: drop illegal characters, then trim dots and spaces.
pub fn clean(segment: &str) -> String {
    let kept: String = segment
        .chars()
        .filter(|c| !CHARS_TO_REMOVE.contains(c))
        .collect();
    kept.trim_matches(&CHARS_TO_TRIM[..]).to_string()
}
