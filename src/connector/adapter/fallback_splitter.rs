use crate::application::interfaces::Splitter;
use crate::domain::{chunk_id, Chunk, DomainError, Language};

/// Component C4 — the splitter used for files with no tree-sitter grammar,
/// or when the AST splitter found nothing to split. Recursively tries a
/// ladder of separators (paragraph, line, sentence, word, character) until
/// pieces fit under `chunk_size`, then stitches trailing-context overlap
/// between consecutive chunks the same way the AST splitter does.
pub struct FallbackSplitter;

impl FallbackSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FallbackSplitter {
    fn default() -> Self {
        Self::new()
    }
}

const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

impl Splitter for FallbackSplitter {
    fn split(
        &self,
        relative_path: &str,
        content: &str,
        language: Language,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Vec<Chunk>, DomainError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let pieces = recursive_split(content, chunk_size, 0);
        let mut chunks = Vec::with_capacity(pieces.len());
        let mut previous_tail: Option<String> = None;
        let mut search_from = 0usize;

        for piece in pieces {
            if piece.trim().is_empty() {
                continue;
            }

            let byte_offset = content[search_from..]
                .find(piece.as_str())
                .map(|i| search_from + i)
                .unwrap_or(search_from);
            let start_line = content[..byte_offset].matches('\n').count() as u32 + 1;
            let end_line = start_line + piece.matches('\n').count() as u32;
            search_from = byte_offset + piece.len();

            let mut full_content = piece.clone();
            let mut effective_start_line = start_line;
            if let Some(tail) = &previous_tail {
                if chunk_overlap > 0 && !tail.is_empty() {
                    full_content = format!("{tail}\n{piece}");
                    let tail_lines = tail.matches('\n').count() as u32 + 1;
                    effective_start_line = start_line.saturating_sub(tail_lines);
                }
            }

            let tail_start = floor_char_boundary(&full_content, full_content.len().saturating_sub(chunk_overlap));
            previous_tail = Some(full_content[tail_start..].to_string());

            let id = chunk_id(relative_path, effective_start_line, end_line, &full_content);
            chunks.push(Chunk::new(
                id,
                relative_path.to_string(),
                full_content,
                effective_start_line,
                end_line,
                language,
                None,
            ));
        }

        Ok(chunks)
    }
}

/// Splits `text` along the separator ladder until every piece is at most
/// `chunk_size` characters, falling back to a hard character cut once the
/// ladder is exhausted.
fn recursive_split(text: &str, chunk_size: usize, separator_index: usize) -> Vec<String> {
    if text.len() <= chunk_size {
        return vec![text.to_string()];
    }

    if separator_index >= SEPARATORS.len() {
        return hard_split(text, chunk_size);
    }

    let separator = SEPARATORS[separator_index];
    let parts: Vec<&str> = text.split(separator).collect();
    if parts.len() <= 1 {
        return recursive_split(text, chunk_size, separator_index + 1);
    }

    let mut merged = Vec::new();
    let mut current = String::new();
    for (i, part) in parts.iter().enumerate() {
        let with_sep = if i + 1 < parts.len() {
            format!("{part}{separator}")
        } else {
            part.to_string()
        };

        if !current.is_empty() && current.len() + with_sep.len() > chunk_size {
            merged.push(std::mem::take(&mut current));
        }
        current.push_str(&with_sep);
    }
    if !current.is_empty() {
        merged.push(current);
    }

    merged
        .into_iter()
        .flat_map(|piece| {
            if piece.len() > chunk_size {
                recursive_split(&piece, chunk_size, separator_index + 1)
            } else {
                vec![piece]
            }
        })
        .collect()
}

fn hard_split(text: &str, chunk_size: usize) -> Vec<String> {
    text.chars()
        .collect::<Vec<char>>()
        .chunks(chunk_size.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

/// Largest byte index `<= idx` that lands on a UTF-8 char boundary of `s`.
/// `idx` itself may fall inside a multi-byte character; a raw byte offset
/// like `len() - chunk_overlap` gives no such guarantee.
fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_produces_no_chunks() {
        let splitter = FallbackSplitter::new();
        let chunks = splitter.split("a.txt", "   \n  ", Language::Text, 100, 10).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_respects_chunk_size() {
        let splitter = FallbackSplitter::new();
        let content = "word ".repeat(200);
        let chunks = splitter.split("a.txt", &content, Language::Text, 50, 0).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.content().len() <= 50 + 10, "{}", chunk.content().len());
        }
    }

    #[test]
    fn test_overlap_prepends_previous_tail() {
        let splitter = FallbackSplitter::new();
        let content = "aaaaaaaaaa\n\nbbbbbbbbbb\n\ncccccccccc";
        let chunks = splitter.split("a.txt", content, Language::Text, 10, 5).unwrap();
        assert!(chunks.len() > 1);
        assert!(chunks[1].content().starts_with("aaaaa") || chunks[1].content().contains('a'));
    }

    #[test]
    fn test_line_numbers_increase_monotonically() {
        let splitter = FallbackSplitter::new();
        let content = (0..50).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let chunks = splitter.split("a.txt", &content, Language::Text, 40, 0).unwrap();
        for pair in chunks.windows(2) {
            assert!(pair[1].start_line() >= pair[0].start_line());
        }
    }

    #[test]
    fn test_floor_char_boundary_does_not_split_multibyte_char() {
        let s = "a\u{00e9}\u{00e9}\u{00e9}b";
        for idx in 0..=s.len() {
            let floored = floor_char_boundary(s, idx);
            assert!(s.is_char_boundary(floored));
        }
    }

    #[test]
    fn test_overlap_tail_does_not_panic_on_multibyte_boundary() {
        let mut content = "word ".repeat(30);
        content.push_str(&"\u{00e9}".repeat(300));
        let splitter = FallbackSplitter::new();
        let chunks = splitter.split("a.txt", &content, Language::Text, 100, 200).unwrap();
        assert!(!chunks.is_empty());
    }
}
