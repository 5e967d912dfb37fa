//! Hex dump helper for record diagnostics.

/// Formats up to `max` bytes as space-separated lowercase hex, noting how
/// many bytes were left out.
///
/// # Example
///
/// ```
/// use richtext_cd_buffers::print_octets;
///
/// assert_eq!(print_octets(&[0x6d, 0x04, 0x0a, 0xff], 16), "6d 04 0a ff");
/// assert_eq!(print_octets(&[1, 2, 3], 2), "01 02 ... (1 more)");
/// assert_eq!(print_octets(&[], 16), "");
/// ```
pub fn print_octets(octets: &[u8], max: usize) -> String {
    let shown: Vec<String> = octets
        .iter()
        .take(max)
        .map(|byte| format!("{:02x}", byte))
        .collect();
    let mut result = shown.join(" ");
    if octets.len() > max {
        result.push_str(&format!(" ... ({} more)", octets.len() - max));
    }
    result
}

/// Formats a byte slice with a default limit of 32 bytes, about the size of
/// a small fixed record.
pub fn print_octets_default(octets: &[u8]) -> String {
    print_octets(octets, 32)
}
