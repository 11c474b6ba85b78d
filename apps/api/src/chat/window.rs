//! Conversation windowing — the single place history is trimmed before it
//! reaches the model. Both the proxy and the client call [`window`].

use crate::models::chat::Message;

/// Window used by the career-coach endpoint and by the client before sending.
pub const CAREER_WINDOW: usize = 10;
/// Window used by the voice endpoint; replies are spoken so context is kept short.
pub const VOICE_WINDOW: usize = 6;

/// Returns the last `size` messages of `history` in their original order.
pub fn window(history: &[Message], size: usize) -> &[Message] {
    let start = history.len().saturating_sub(size);
    &history[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<Message> {
        (1..=n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::assistant(format!("m{i}"))
                } else {
                    Message::user(format!("m{i}"))
                }
            })
            .collect()
    }

    fn contents(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.content.as_str()).collect()
    }

    #[test]
    fn test_empty_history_yields_empty_window() {
        assert!(window(&[], CAREER_WINDOW).is_empty());
    }

    #[test]
    fn test_short_history_returned_unchanged() {
        let h = history(4);
        assert_eq!(window(&h, CAREER_WINDOW), h.as_slice());
    }

    #[test]
    fn test_twelve_messages_keeps_three_through_twelve() {
        let h = history(12);
        let w = window(&h, CAREER_WINDOW);
        let expected: Vec<String> = (3..=12).map(|i| format!("m{i}")).collect();
        assert_eq!(contents(w), expected);
    }

    #[test]
    fn test_length_is_min_of_history_and_size() {
        for len in 0..20 {
            let h = history(len);
            for size in [0, 1, VOICE_WINDOW, CAREER_WINDOW, 25] {
                let w = window(&h, size);
                assert_eq!(w.len(), len.min(size), "len={len} size={size}");
                // tail is never dropped
                if let (Some(last), false) = (h.last(), w.is_empty()) {
                    assert_eq!(w.last(), Some(last));
                }
            }
        }
    }

    #[test]
    fn test_voice_window_is_six() {
        let h = history(9);
        assert_eq!(contents(window(&h, VOICE_WINDOW)), vec!["m4", "m5", "m6", "m7", "m8", "m9"]);
    }
}
