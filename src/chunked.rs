//! Chunk-size line of the chunked transfer coding


/// Maximum number of hex digits in a chunk size (64 bits)
pub const MAX_SIZE_DIGITS: usize = 16;

/// Parses chunk size from the line preceding chunk data (without CRLF)
///
/// Parsing is permissive: leading whitespace is skipped and digits are
/// consumed up to the first non-hex character. A line that doesn't start
/// with a hex digit is a zero-sized (i.e. last) chunk, and so is anything
/// that has chunk extensions in front of the size. Values that don't fit
/// into 64 bits saturate.
pub fn parse_size(line: &[u8]) -> u64 {
    let mut size: u64 = 0;
    let digits = line.iter()
        .skip_while(|&&c| c == b' ' || c == b'\t')
        .map_while(|&c| (c as char).to_digit(16));
    for digit in digits {
        size = match size.checked_mul(16)
            .and_then(|x| x.checked_add(digit as u64))
        {
            Some(x) => x,
            None => return u64::max_value(),
        };
    }
    size
}
