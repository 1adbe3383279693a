use draftsmith_application::TokenCounter;
use draftsmith_domain::Model;

/// Character-based token estimate: four ASCII characters or two other
/// characters per token, at least one token for non-empty text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenCounter;

impl TokenCounter for HeuristicTokenCounter {
    fn count_tokens(&self, text: &str, _model: &Model) -> u64 {
        if text.is_empty() {
            return 0;
        }
        let (ascii, other) = text.chars().fold((0u64, 0u64), |(ascii, other), c| {
            if c.is_ascii() {
                (ascii + 1, other)
            } else {
                (ascii, other + 1)
            }
        });
        (ascii / 4 + other / 2).max(1)
    }
}
