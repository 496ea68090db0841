use std::collections::VecDeque;

use crate::error::Error;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive character text splitter.
///
/// Splits on paragraphs first, then lines, then words, then characters,
/// and merges neighbouring pieces back into chunks of at most `chunk_size`
/// characters. Consecutive chunks share up to `chunk_overlap` characters.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {

    /// Create a splitter; `chunk_overlap` must be smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, Error> {
        if chunk_size == 0 {
            return Err(Error::ConfigError("chunk size must be greater than zero"));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::ConfigError("chunk overlap must be smaller than chunk size"));
        }
        Ok(TextSplitter { chunk_size, chunk_overlap })
    }

    /// Split text into chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split(text, &SEPARATORS)
    }

    fn split(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let idx = separators
            .iter()
            .position(|sep| sep.is_empty() || text.contains(sep))
            .unwrap_or(separators.len() - 1);
        let separator = separators[idx];
        let rest = &separators[idx + 1..];

        let pieces: Vec<&str> = if separator.is_empty() {
            text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect()
        } else {
            text.split(separator).filter(|s| !s.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut short = Vec::new();
        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                short.push(piece);
                continue;
            }

            if !short.is_empty() {
                chunks.extend(self.merge(&short, separator));
                short.clear();
            }
            if rest.is_empty() {
                chunks.push(piece.to_owned());
            } else {
                chunks.extend(self.split(piece, rest));
            }
        }

        if !short.is_empty() {
            chunks.extend(self.merge(&short, separator));
        }

        chunks
    }

    fn merge(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(piece);
            let joined_len = |current: &VecDeque<&str>, total: usize| {
                total + len + if current.is_empty() { 0 } else { sep_len }
            };

            if joined_len(&current, total) > self.chunk_size && !current.is_empty() {
                push_chunk(&mut chunks, &current, separator);

                while total > self.chunk_overlap || (joined_len(&current, total) > self.chunk_size && total > 0) {
                    let Some(first) = current.pop_front() else { break };
                    total -= char_len(first) + if current.is_empty() { 0 } else { sep_len };
                }
            }

            current.push_back(piece);
            total += len + if current.len() > 1 { sep_len } else { 0 };
        }

        push_chunk(&mut chunks, &current, separator);

        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, pieces: &VecDeque<&str>, separator: &str) {
    let chunk = pieces.iter().copied().collect::<Vec<_>>().join(separator);
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_owned());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_split_short_text() {
        let splitter = TextSplitter::new(500, 50).unwrap();
        assert_eq!(splitter.split_text("  Gelbe Tonne\nVerpackungen  "), vec!["Gelbe Tonne\nVerpackungen"]);
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text(" \n\n ").is_empty());
    }

    #[test]
    fn test_split_prefers_paragraphs() {
        let splitter = TextSplitter::new(5, 0).unwrap();
        assert_eq!(splitter.split_text("aaa\n\nbbb"), vec!["aaa", "bbb"]);

        let splitter = TextSplitter::new(10, 0).unwrap();
        assert_eq!(splitter.split_text("abc def\n\nghi"), vec!["abc def", "ghi"]);
    }

    #[test]
    fn test_split_size_and_overlap() {
        let text = (0..200).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let splitter = TextSplitter::new(50, 10).unwrap();

        let chunks = splitter.split_text(&text);
        assert!(chunks.len() > 1);
        for chunk in chunks.iter() {
            assert!(char_len(chunk) <= 50, "chunk too long: {chunk}");
        }
        for pair in chunks.windows(2) {
            let first_word = pair[1].split(' ').next().unwrap();
            assert!(pair[0].split(' ').any(|w| w == first_word), "no overlap between {:?}", pair);
        }
        assert!(chunks[0].starts_with("w0 w1"));
        assert!(chunks.last().unwrap().ends_with("w199"));
    }

    #[test]
    fn test_split_long_word() {
        let splitter = TextSplitter::new(4, 1).unwrap();
        let chunks = splitter.split_text("Verpackungsmüll");
        assert_eq!(chunks, vec!["Verp", "pack", "kung", "gsmü", "üll"]);
    }

    #[test]
    fn test_splitter_params() {
        assert!(TextSplitter::new(0, 0).is_err());
        assert!(TextSplitter::new(50, 50).is_err());
        assert!(TextSplitter::new(50, 49).is_ok());
    }
}
