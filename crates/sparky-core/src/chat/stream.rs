//! Streamed fragment types and the accumulator reducer.
//!
//! A streaming model reply arrives as an ordered sequence of text fragments,
//! some of which carry grounding citations. `StreamAccumulator` folds them
//! into a single growing message and, on completion, detects the lead-form
//! sentinel the model uses to signal it is ready to collect project details.

use super::message::{ChatMessage, Citation, MessageRole};
use std::collections::HashSet;

/// Literal token the model appends when it wants the lead form shown.
///
/// The token is stripped from the stored text and acted on exactly once per
/// message.
pub const SENTINEL: &str = "[SHOW_LEAD_FORM]";

/// One incremental chunk of a streamed model reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamFragment {
    /// Text delta for this chunk (may be empty).
    pub text: String,
    /// Citations attached to this chunk, possibly repeating earlier urls.
    pub citations: Vec<Citation>,
}

impl StreamFragment {
    /// Creates a text-only fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
        }
    }
}

/// The finalized result of a completed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedReply {
    /// The finalized model message, sentinel stripped.
    pub message: ChatMessage,
    /// Whether the sentinel was present in the raw text.
    pub lead_form_requested: bool,
}

/// Folds streamed fragments into a single live-updating model message.
///
/// Guarantees:
/// - the snapshot text is always a prefix of the final text (fragments are
///   applied in arrival order, never dropped or duplicated);
/// - the citation list never shrinks during one stream; urls are
///   deduplicated with the first-seen title winning, in first-appearance
///   order.
#[derive(Debug)]
pub struct StreamAccumulator {
    buffer: String,
    citations: Vec<Citation>,
    seen_urls: HashSet<String>,
    started_at: String,
}

impl StreamAccumulator {
    /// Creates an empty accumulator for one streaming reply.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            citations: Vec::new(),
            seen_urls: HashSet::new(),
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Applies one fragment and returns the updated message snapshot.
    ///
    /// The snapshot replaces the placeholder message in the transcript; its
    /// timestamp stays fixed at the moment the stream started so repeated
    /// replacements do not churn the persisted value.
    pub fn apply(&mut self, fragment: &StreamFragment) -> ChatMessage {
        self.buffer.push_str(&fragment.text);

        for citation in &fragment.citations {
            if self.seen_urls.insert(citation.url.clone()) {
                self.citations.push(citation.clone());
            }
        }

        self.snapshot()
    }

    /// Returns the current message snapshot without consuming the stream.
    pub fn snapshot(&self) -> ChatMessage {
        ChatMessage {
            role: MessageRole::Model,
            text: self.buffer.clone(),
            citations: self.citations.clone(),
            timestamp: self.started_at.clone(),
        }
    }

    /// Returns `true` if no text has been received yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Finalizes the stream: strips the sentinel (and surrounding
    /// whitespace) from the stored text and reports whether it was present.
    pub fn finalize(self) -> FinalizedReply {
        let lead_form_requested = self.buffer.contains(SENTINEL);
        let text = if lead_form_requested {
            self.buffer.replacen(SENTINEL, "", 1).trim().to_string()
        } else {
            self.buffer
        };

        FinalizedReply {
            message: ChatMessage {
                role: MessageRole::Model,
                text,
                citations: self.citations,
                timestamp: self.started_at,
            },
            lead_form_requested,
        }
    }
}

impl Default for StreamAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment_with_citations(text: &str, citations: &[(&str, &str)]) -> StreamFragment {
        StreamFragment {
            text: text.to_string(),
            citations: citations
                .iter()
                .map(|(url, title)| Citation::new(*url, *title))
                .collect(),
        }
    }

    #[test]
    fn test_text_is_concatenated_in_arrival_order() {
        let mut accumulator = StreamAccumulator::new();
        let fragments = ["Hel", "lo ", "wor", "ld"];

        let mut last_snapshot = String::new();
        for text in fragments {
            let snapshot = accumulator.apply(&StreamFragment::text(text));
            // Monotonically growing prefix
            assert!(snapshot.text.starts_with(&last_snapshot));
            last_snapshot = snapshot.text;
        }

        let reply = accumulator.finalize();
        assert_eq!(reply.message.text, "Hello world");
        assert!(!reply.lead_form_requested);
    }

    #[test]
    fn test_citations_deduplicate_by_url_first_title_wins() {
        let mut accumulator = StreamAccumulator::new();
        accumulator.apply(&fragment_with_citations(
            "a",
            &[("https://one.example", "First title")],
        ));
        accumulator.apply(&fragment_with_citations(
            "b",
            &[
                ("https://one.example", "Second title"),
                ("https://two.example", "Other"),
            ],
        ));

        let reply = accumulator.finalize();
        assert_eq!(reply.message.citations.len(), 2);
        assert_eq!(reply.message.citations[0].url, "https://one.example");
        assert_eq!(reply.message.citations[0].title, "First title");
        assert_eq!(reply.message.citations[1].url, "https://two.example");
    }

    #[test]
    fn test_citation_list_never_shrinks() {
        let mut accumulator = StreamAccumulator::new();
        let first = accumulator.apply(&fragment_with_citations(
            "a",
            &[("https://one.example", "One")],
        ));
        let second = accumulator.apply(&StreamFragment::text("b"));
        assert!(second.citations.len() >= first.citations.len());
    }

    #[test]
    fn test_sentinel_on_trailing_line_is_stripped() {
        let mut accumulator = StreamAccumulator::new();
        accumulator.apply(&StreamFragment::text("Great, let's proceed.\n"));
        accumulator.apply(&StreamFragment::text(SENTINEL));

        let reply = accumulator.finalize();
        assert_eq!(reply.message.text, "Great, let's proceed.");
        assert!(reply.lead_form_requested);
    }

    #[test]
    fn test_sentinel_split_across_fragments() {
        let mut accumulator = StreamAccumulator::new();
        accumulator.apply(&StreamFragment::text("All set.\n[SHOW_"));
        accumulator.apply(&StreamFragment::text("LEAD_FORM]"));

        let reply = accumulator.finalize();
        assert_eq!(reply.message.text, "All set.");
        assert!(reply.lead_form_requested);
    }

    #[test]
    fn test_no_sentinel_leaves_text_untouched() {
        let mut accumulator = StreamAccumulator::new();
        accumulator.apply(&StreamFragment::text("  padded text  "));

        let reply = accumulator.finalize();
        // Whitespace is only trimmed when a sentinel was stripped
        assert_eq!(reply.message.text, "  padded text  ");
        assert!(!reply.lead_form_requested);
    }

    #[test]
    fn test_snapshot_timestamp_is_stable_across_fragments() {
        let mut accumulator = StreamAccumulator::new();
        let first = accumulator.apply(&StreamFragment::text("a"));
        let second = accumulator.apply(&StreamFragment::text("b"));
        assert_eq!(first.timestamp, second.timestamp);
    }
}
