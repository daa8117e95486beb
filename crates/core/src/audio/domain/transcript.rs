/// Accumulates recognized fragments into the text written to disk.
///
/// Completed utterances are followed by a single space; the final flush is
/// appended as-is. Surrounding whitespace is trimmed on output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
    segments: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_segment(&mut self, text: &str) {
        self.text.push_str(text);
        self.text.push(' ');
        self.segments += 1;
    }

    pub fn push_final(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Number of completed utterances, excluding the final flush.
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    pub fn as_text(&self) -> &str {
        self.text.trim()
    }

    pub fn into_text(self) -> String {
        self.as_text().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript_is_empty() {
        assert_eq!(Transcript::new().into_text(), "");
    }

    #[test]
    fn test_segments_joined_with_space_then_final() {
        let mut t = Transcript::new();
        t.push_segment("hello");
        t.push_segment("big");
        t.push_final("world");
        assert_eq!(t.segment_count(), 2);
        assert_eq!(t.into_text(), "hello big world");
    }

    #[test]
    fn test_trailing_separator_trimmed_when_final_empty() {
        let mut t = Transcript::new();
        t.push_segment("hello world");
        t.push_final("");
        assert_eq!(t.as_text(), "hello world");
    }

    #[test]
    fn test_final_only() {
        let mut t = Transcript::new();
        t.push_final("  hello world ");
        assert_eq!(t.into_text(), "hello world");
    }

    #[test]
    fn test_empty_segment_keeps_its_separator() {
        let mut t = Transcript::new();
        t.push_segment("one");
        t.push_segment("");
        t.push_final("two");
        assert_eq!(t.into_text(), "one  two");
    }
}
