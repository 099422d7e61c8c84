//! Call Analysis Types
//!
//! Core data structures shared by the classifier, the analyzer
//! and the transcript store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================
// LABELS
// ============================================================

/// Primary purpose of a call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Complaint,
    Cancellation,
    Billing,
    Upgrade,
    AccountAccess,
    Support,
    ComplaintResolution,
    /// Fallback when no trigger phrase matched
    GeneralInquiry,
}

impl IntentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::Complaint => "complaint",
            IntentCategory::Cancellation => "cancellation",
            IntentCategory::Billing => "billing",
            IntentCategory::Upgrade => "upgrade",
            IntentCategory::AccountAccess => "account_access",
            IntentCategory::Support => "support",
            IntentCategory::ComplaintResolution => "complaint_resolution",
            IntentCategory::GeneralInquiry => "general_inquiry",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "complaint" => Some(IntentCategory::Complaint),
            "cancellation" => Some(IntentCategory::Cancellation),
            "billing" => Some(IntentCategory::Billing),
            "upgrade" => Some(IntentCategory::Upgrade),
            "account_access" => Some(IntentCategory::AccountAccess),
            "support" => Some(IntentCategory::Support),
            "complaint_resolution" => Some(IntentCategory::ComplaintResolution),
            "general_inquiry" => Some(IntentCategory::GeneralInquiry),
            _ => None,
        }
    }
}

/// Emotional tone of a call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

// ============================================================
// CLASSIFIER RESULTS
// ============================================================

/// Outcome of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub category: IntentCategory,
    /// 0.0 to 1.0, saturates once the winning score reaches 10
    pub confidence: f64,
    /// Phrases matched for the winning category
    pub keywords_found: Vec<String>,
    /// Scores of every category that matched at least once
    pub category_scores: BTreeMap<IntentCategory, u32>,
    /// Phrases matched for every scored category
    pub matched_keywords: BTreeMap<IntentCategory, Vec<String>>,
}

/// Occurrence totals per sentiment bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

impl SentimentScores {
    pub fn get(&self, sentiment: Sentiment) -> u32 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn add(&mut self, sentiment: Sentiment, count: u32) {
        match sentiment {
            Sentiment::Positive => self.positive += count,
            Sentiment::Negative => self.negative += count,
            Sentiment::Neutral => self.neutral += count,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.negative + self.neutral
    }

    /// Share of each bucket in the total, or `None` when nothing matched
    pub fn proportions(&self) -> Option<[(Sentiment, f64); 3]> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let share = |s: Sentiment| (s, self.get(s) as f64 / total as f64);
        Some([
            share(Sentiment::Positive),
            share(Sentiment::Negative),
            share(Sentiment::Neutral),
        ])
    }
}

/// Outcome of sentiment classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: Sentiment,
    pub confidence: f64,
    pub scores: SentimentScores,
}

// ============================================================
// ANALYSIS RECORD
// ============================================================

/// Diagnostic payload attached to every analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    pub intent_keywords_found: Vec<String>,
    #[serde(alias = "sentiment_indicators")]
    pub intent_scores: BTreeMap<IntentCategory, u32>,
    #[serde(default)]
    pub keywords_by_category: BTreeMap<IntentCategory, Vec<String>>,
}

/// Full result of analyzing one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub intent: IntentCategory,
    pub intent_confidence: f64,
    pub sentiment: Sentiment,
    pub sentiment_confidence: f64,
    overall_confidence: f64,
    pub analysis_details: AnalysisDetails,
}

impl AnalysisRecord {
    pub fn new(intent: IntentResult, sentiment: SentimentResult) -> Self {
        Self {
            intent: intent.category,
            intent_confidence: intent.confidence,
            sentiment: sentiment.label,
            sentiment_confidence: sentiment.confidence,
            overall_confidence: (intent.confidence + sentiment.confidence) / 2.0,
            analysis_details: AnalysisDetails {
                intent_keywords_found: intent.keywords_found,
                intent_scores: intent.category_scores,
                keywords_by_category: intent.matched_keywords,
            },
        }
    }

    /// Mean of the intent and sentiment confidences
    pub fn overall_confidence(&self) -> f64 {
        self.overall_confidence
    }
}

// ============================================================
// TRANSCRIPTS
// ============================================================

/// A stored call transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: i64,
    pub customer_id: String,
    pub customer_name: String,
    pub transcript: String,
    pub call_date: DateTime<Utc>,
    pub duration_seconds: Option<u32>,
    pub phone_number: Option<String>,
}

/// Listing projection of a transcript (no text)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSummary {
    pub id: i64,
    pub customer_id: String,
    pub customer_name: String,
    pub duration_seconds: Option<u32>,
    pub call_date: DateTime<Utc>,
}

/// Minimal projection handed to the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptText {
    pub id: i64,
    pub transcript: String,
}

/// Input for inserting a transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTranscript {
    pub customer_id: String,
    pub customer_name: String,
    pub transcript: String,
    pub duration_seconds: Option<u32>,
    pub phone_number: Option<String>,
}

impl NewTranscript {
    pub fn new(customer_id: &str, customer_name: &str, transcript: &str) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            customer_name: customer_name.to_string(),
            transcript: transcript.to_string(),
            duration_seconds: None,
            phone_number: None,
        }
    }
}

// ============================================================
// PERSISTED ANALYSIS
// ============================================================

/// Input for saving an analysis result
#[derive(Debug, Clone)]
pub struct NewAnalysis<'a> {
    pub transcript_id: i64,
    pub customer_id: &'a str,
    pub intent: IntentCategory,
    pub sentiment: Sentiment,
    pub confidence_score: f64,
    pub raw_analysis: String,
}

/// An analysis result as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: i64,
    pub transcript_id: i64,
    pub customer_id: String,
    pub intent: String,
    pub sentiment: String,
    pub confidence_score: f64,
    pub analysis_date: DateTime<Utc>,
    pub raw_analysis: String,
}

impl StoredAnalysis {
    /// Decode the serialized record saved alongside the row
    pub fn record(&self) -> serde_json::Result<AnalysisRecord> {
        serde_json::from_str(&self.raw_analysis)
    }
}

/// What the store reported for a save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveOutcome {
    pub fn saved(analysis_id: i64, transcript_id: i64) -> Self {
        Self {
            success: true,
            analysis_id: Some(analysis_id),
            message: Some(format!("Analysis saved for transcript {}", transcript_id)),
            error: None,
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            analysis_id: None,
            message: None,
            error: Some(error.to_string()),
        }
    }
}
