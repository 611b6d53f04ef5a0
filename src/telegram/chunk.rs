//! Message chunking for the Bot API length limit.

use crate::constants::telegram::MAX_MESSAGE_LENGTH;

/// Split `text` into chunks of at most `max_len` characters.
///
/// Lines are packed greedily and rejoined with `\n`. A line longer than
/// `max_len` is cut at character boundaries. Empty chunks are never produced.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if line_len > max_len {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = line.chars().collect();
            let mut pieces = chars.chunks(max_len).map(|piece| piece.iter().collect::<String>());
            // the tail may still share a chunk with the following lines
            let tail = pieces.next_back().unwrap_or_default();
            chunks.extend(pieces);
            current_len = tail.chars().count();
            current = tail;
            continue;
        }

        let needed = if current.is_empty() {
            line_len
        } else {
            current_len + 1 + line_len
        };

        if needed <= max_len {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            current_len = needed;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(line);
            current_len = line_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// [`split_message`] with Telegram's 4096 character limit
pub fn split_for_telegram(text: &str) -> Vec<String> {
    split_message(text, MAX_MESSAGE_LENGTH)
}
