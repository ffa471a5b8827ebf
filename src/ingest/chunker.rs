/// Configuration for text chunking
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 100,
        }
    }
}

/// Split text into overlapping character windows.
///
/// Windows are measured in characters, not bytes, so multi-byte input
/// never splits inside a code point. Consecutive chunks share `overlap`
/// characters of context.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let total = offsets.len();

    if total <= config.chunk_size {
        return vec![text.to_string()];
    }

    // Guard against a degenerate overlap that would never advance
    let step = config.chunk_size.saturating_sub(config.overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + config.chunk_size).min(total);
        let byte_start = offsets[start];
        let byte_end = if end == total { text.len() } else { offsets[end] };
        chunks.push(text[byte_start..byte_end].to_string());

        if end == total {
            break;
        }
        start += step;
    }

    chunks
}
