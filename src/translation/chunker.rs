//! Sentence-boundary chunking under a fixed character budget.

/// Sentence terminators recognized when searching for a split point.
///
/// Only space-followed Latin terminators are recognized; punctuation without a
/// trailing space and non-Latin sentence delimiters fall back to the hard
/// character split. That trades boundary readability for simplicity and is
/// intentional.
const SENTENCE_TERMINATORS: [&str; 3] = [". ", "? ", "! "];

/// Split `text` into ordered chunks of at most `max_chunk_size` characters.
///
/// Concatenating the returned chunks in order, with no separators, reproduces
/// `text` exactly; trailing characters of each chunk (spaces, newlines) are
/// preserved so paragraph breaks survive reassembly. Oversized input is split
/// preferentially just after the rightmost sentence terminator found in the
/// trailing half of the current window, and at exactly `max_chunk_size`
/// characters otherwise. The result is a pure function of its inputs.
pub fn split_text(text: &str, max_chunk_size: usize) -> Vec<String> {
    // A zero budget is nonsensical; treat it as 1.
    let max = max_chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;
    loop {
        let Some(window_end) = byte_offset(rest, max) else {
            // The remainder fits the budget.
            chunks.push(rest.to_string());
            break;
        };
        let search_start = byte_offset(rest, max / 2).unwrap_or(0);
        let split_at = sentence_split(&rest[..window_end], search_start).unwrap_or(window_end);
        chunks.push(rest[..split_at].to_string());
        rest = &rest[split_at..];
    }
    chunks
}

/// Byte offset of the character at index `chars`, or `None` when the text is shorter.
fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    text.char_indices().nth(chars).map(|(offset, _)| offset)
}

/// Rightmost terminator occurrence at or after byte offset `from`, returning
/// the offset just past the trailing space.
fn sentence_split(window: &str, from: usize) -> Option<usize> {
    SENTENCE_TERMINATORS
        .iter()
        .filter_map(|terminator| {
            window[from..]
                .rfind(terminator)
                .map(|idx| from + idx + terminator.len())
        })
        .max()
}
