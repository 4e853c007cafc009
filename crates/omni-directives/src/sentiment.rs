use omni_core::models::transcript::Sentiment;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "better", "improving", "aligned", "healthy", "easy", "never", "excellent",
    "love", "like", "happy", "positive", "strength", "progress",
];

const NEGATIVE_WORDS: &[&str] = &[
    "worried", "scared", "bad", "worse", "discrepancy", "hard", "bother", "often", "terrible",
    "dislike", "pain", "infection", "concern", "anxiety", "struggle", "low", "decline",
];

/// Keyword heuristic for the tone of a message.
///
/// Counts how many distinct positive and negative words occur anywhere in
/// the lowercased text (substring match, so "dislike" also counts as
/// "like"). The larger count wins; a tie is neutral.
pub fn determine_sentiment(text: &str) -> Sentiment {
    let content = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| content.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| content.contains(*w)).count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_words_win() {
        assert_eq!(determine_sentiment("Great progress, scores are improving"), Sentiment::Positive);
    }

    #[test]
    fn negative_words_win() {
        assert_eq!(determine_sentiment("She is WORRIED about infection"), Sentiment::Negative);
    }

    #[test]
    fn tie_is_neutral() {
        assert_eq!(determine_sentiment("Show Future Health trend"), Sentiment::Neutral);
        assert_eq!(determine_sentiment("good but bad"), Sentiment::Neutral);
    }

    #[test]
    fn repeated_word_counts_once() {
        assert_eq!(determine_sentiment("bad bad bad good great"), Sentiment::Positive);
    }

    #[test]
    fn substrings_count_for_both_lists() {
        // "dislike" hits "dislike" and "like".
        assert_eq!(determine_sentiment("dislike"), Sentiment::Neutral);
    }
}
