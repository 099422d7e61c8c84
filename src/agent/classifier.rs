//! Transcript Classifier
//!
//! Rule-based intent and sentiment detection. Each trigger phrase is matched
//! as a case-insensitive substring and every non-overlapping occurrence counts
//! towards its category.
//!
//! Both classifiers are pure: no I/O and no shared mutable state.

use super::keywords::{INTENT_KEYWORDS, SENTIMENT_KEYWORDS};
use super::types::{IntentCategory, IntentResult, Sentiment, SentimentResult, SentimentScores};
use std::collections::BTreeMap;

/// Confidence reported when no intent phrase matched
pub const FALLBACK_INTENT_CONFIDENCE: f64 = 0.3;

/// Confidence reported when no sentiment phrase matched
pub const FALLBACK_SENTIMENT_CONFIDENCE: f64 = 0.5;

/// Winning score at which intent confidence reaches 1.0
pub const INTENT_SATURATION_SCORE: f64 = 10.0;

fn occurrences(haystack: &str, phrase: &str) -> u32 {
    haystack.matches(phrase).count() as u32
}

/// Classify the primary intent of a transcript
pub fn classify_intent(transcript: &str) -> IntentResult {
    let lowered = transcript.to_lowercase();
    let mut category_scores = BTreeMap::new();
    let mut matched_keywords = BTreeMap::new();
    let mut winner: Option<(IntentCategory, u32)> = None;

    for (category, phrases) in INTENT_KEYWORDS.iter() {
        let mut score = 0;
        let mut found = Vec::new();

        for phrase in phrases {
            let count = occurrences(&lowered, phrase);
            if count > 0 {
                score += count;
                found.push(phrase.to_string());
            }
        }

        if score == 0 {
            continue;
        }

        // Strict comparison keeps the first-declared category on ties
        if winner.map_or(true, |(_, best)| score > best) {
            winner = Some((category, score));
        }
        category_scores.insert(category, score);
        matched_keywords.insert(category, found);
    }

    match winner {
        Some((category, score)) => IntentResult {
            category,
            confidence: (score as f64 / INTENT_SATURATION_SCORE).min(1.0),
            keywords_found: matched_keywords.get(&category).cloned().unwrap_or_default(),
            category_scores,
            matched_keywords,
        },
        None => IntentResult {
            category: IntentCategory::GeneralInquiry,
            confidence: FALLBACK_INTENT_CONFIDENCE,
            keywords_found: Vec::new(),
            category_scores,
            matched_keywords,
        },
    }
}

/// Classify the overall sentiment of a transcript
pub fn classify_sentiment(transcript: &str) -> SentimentResult {
    let lowered = transcript.to_lowercase();
    let mut scores = SentimentScores::default();

    for (sentiment, phrases) in SENTIMENT_KEYWORDS.iter() {
        for phrase in phrases {
            scores.add(sentiment, occurrences(&lowered, phrase));
        }
    }

    let total = scores.total();
    if total == 0 {
        return SentimentResult {
            label: Sentiment::Neutral,
            confidence: FALLBACK_SENTIMENT_CONFIDENCE,
            scores,
        };
    }

    let mut label = Sentiment::Positive;
    for candidate in [Sentiment::Negative, Sentiment::Neutral] {
        if scores.get(candidate) > scores.get(label) {
            label = candidate;
        }
    }

    SentimentResult {
        label,
        confidence: scores.get(label) as f64 / total as f64,
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_intent_keywords_falls_back() {
        let result = classify_intent("Hello, good morning to you.");
        assert_eq!(result.category, IntentCategory::GeneralInquiry);
        assert_eq!(result.confidence, 0.3);
        assert!(result.keywords_found.is_empty());
        assert!(result.category_scores.is_empty());
    }

    #[test]
    fn test_empty_transcript() {
        let intent = classify_intent("");
        assert_eq!(intent.category, IntentCategory::GeneralInquiry);
        let sentiment = classify_sentiment("");
        assert_eq!(sentiment.label, Sentiment::Neutral);
        assert_eq!(sentiment.confidence, 0.5);
    }

    #[test]
    fn test_cancellation_intent() {
        let result = classify_intent("I want to cancel my subscription immediately.");
        assert_eq!(result.category, IntentCategory::Cancellation);
        assert_eq!(result.keywords_found, vec!["cancel".to_string()]);
        assert_eq!(result.confidence, 0.1);
    }

    #[test]
    fn test_billing_intent() {
        let result = classify_intent("Why was I charged twice? I need a refund!");
        assert_eq!(result.category, IntentCategory::Billing);
        assert_eq!(result.category_scores.get(&IntentCategory::Billing), Some(&2));
    }

    #[test]
    fn test_case_insensitive_and_repeated_matches() {
        let result = classify_intent("REFUND refund Refund");
        assert_eq!(result.category, IntentCategory::Billing);
        assert_eq!(result.category_scores[&IntentCategory::Billing], 3);
        // Recorded once even though it occurred three times
        assert_eq!(result.keywords_found, vec!["refund".to_string()]);
    }

    #[test]
    fn test_intent_tie_goes_to_first_declared() {
        // one complaint phrase, one billing phrase
        let result = classify_intent("broken invoice");
        assert_eq!(result.category, IntentCategory::Complaint);
        assert_eq!(result.category_scores.len(), 2);

        let result = classify_intent("sorry about the login");
        assert_eq!(result.category, IntentCategory::AccountAccess);
    }

    #[test]
    fn test_intent_confidence_saturates() {
        let mut previous = 0.0;
        for n in 1..=14 {
            let text = "refund ".repeat(n);
            let result = classify_intent(&text);
            assert!(result.confidence >= previous);
            previous = result.confidence;
            if n >= 10 {
                assert_eq!(result.confidence, 1.0);
            } else {
                assert!(result.confidence < 1.0);
            }
        }
    }

    #[test]
    fn test_substring_matches_inside_words() {
        // "add" inside "address", "stop" inside "nonstop"
        let result = classify_intent("my address, nonstop");
        assert_eq!(result.category_scores[&IntentCategory::Upgrade], 1);
        assert_eq!(result.category_scores[&IntentCategory::Cancellation], 1);
        assert_eq!(result.category, IntentCategory::Cancellation);
    }

    #[test]
    fn test_category_scores_include_losers() {
        let result = classify_intent("The item is broken and damaged, I want a refund");
        assert_eq!(result.category, IntentCategory::Complaint);
        assert_eq!(result.category_scores[&IntentCategory::Complaint], 2);
        assert_eq!(result.category_scores[&IntentCategory::Billing], 1);
        assert_eq!(
            result.matched_keywords[&IntentCategory::Billing],
            vec!["refund".to_string()]
        );
    }

    #[test]
    fn test_positive_sentiment() {
        let result =
            classify_sentiment("Thank you so much! I really appreciate your help. This is amazing!");
        assert_eq!(result.label, Sentiment::Positive);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_negative_sentiment() {
        let result = classify_sentiment("This is terrible! I'm frustrated and angry with your service!");
        assert_eq!(result.label, Sentiment::Negative);
        assert_eq!(result.scores.negative, 3);
    }

    #[test]
    fn test_no_sentiment_keywords() {
        let result = classify_sentiment("The package arrived on Tuesday.");
        assert_eq!(result.label, Sentiment::Neutral);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.scores.total(), 0);
    }

    #[test]
    fn test_sentiment_tie_order() {
        // positive vs negative tie -> positive
        let result = classify_sentiment("great but upset");
        assert_eq!(result.label, Sentiment::Positive);
        assert_eq!(result.confidence, 0.5);

        // negative vs neutral tie -> negative
        let result = classify_sentiment("angry, okay");
        assert_eq!(result.label, Sentiment::Negative);
    }

    #[test]
    fn test_sentiment_confidence_is_proportion() {
        let result = classify_sentiment("thank you, thank you, but I am annoyed. fine.");
        assert_eq!(result.label, Sentiment::Positive);
        assert_eq!(result.confidence, 0.5);

        let shares = result.scores.proportions().unwrap();
        let sum: f64 = shares.iter().map(|(_, share)| share).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
