//! Splitting text into request-sized pieces.
//!
//! The translate-TTS endpoint rejects long `q` values, so replies are cut
//! into pieces of at most `max_chars` characters.  Cuts prefer sentence
//! punctuation, then word boundaries; a single word longer than the limit
//! is split mid-word.

/// Characters after which a cut sounds natural.
const SENTENCE_ENDS: &[char] = &['.', '!', '?', ';', ':', ','];

/// Split `text` into trimmed, non-empty pieces of at most `max_chars`
/// characters each.  A `max_chars` of zero is treated as one.
pub fn split_for_tts(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();

    for sentence in sentences(text) {
        let mut current = String::new();
        for word in sentence.split_whitespace() {
            for piece in split_long_word(word, max_chars) {
                let needed = if current.is_empty() {
                    piece.chars().count()
                } else {
                    current.chars().count() + 1 + piece.chars().count()
                };
                if needed > max_chars && !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(piece);
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
    }

    merge_short(chunks, max_chars)
}

/// Sentences including their closing punctuation.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if SENTENCE_ENDS.contains(&c) {
            let end = i + c.len_utf8();
            out.push(text[start..end].trim());
            start = end;
        }
    }
    out.push(text[start..].trim());
    out.retain(|s| !s.is_empty());
    out
}

fn split_long_word(word: &str, max_chars: usize) -> Vec<&str> {
    if word.chars().count() <= max_chars {
        return vec![word];
    }
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (i, _) in word.char_indices() {
        if count == max_chars {
            pieces.push(&word[start..i]);
            start = i;
            count = 0;
        }
        count += 1;
    }
    pieces.push(&word[start..]);
    pieces
}

/// Join neighbouring pieces back together while they still fit, so short
/// clauses do not each cost a request.
fn merge_short(chunks: Vec<String>, max_chars: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        match merged.last_mut() {
            Some(last) if last.chars().count() + 1 + chunk.chars().count() <= max_chars => {
                last.push(' ');
                last.push_str(&chunk);
            }
            _ => merged.push(chunk),
        }
    }
    merged
}
