//! Call Analyzer
//!
//! Runs both classifiers over a transcript and, when asked, hands the
//! resulting record to a persistence backend. A failed save never discards
//! the analysis: the record is returned together with the save outcome.

use super::classifier::{classify_intent, classify_sentiment};
use super::store::AnalysisPersistence;
use super::types::{AnalysisRecord, NewAnalysis, SaveOutcome};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// An analysis together with what happened when it was saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedAnalysis {
    pub analysis: AnalysisRecord,
    pub database_save: SaveOutcome,
}

/// Analyze a transcript without side effects
pub fn analyze(transcript: &str) -> AnalysisRecord {
    AnalysisRecord::new(classify_intent(transcript), classify_sentiment(transcript))
}

/// Analyze a transcript and save the result. No retries.
pub fn analyze_and_persist<P: AnalysisPersistence + ?Sized>(
    transcript_id: i64,
    customer_id: &str,
    transcript_text: &str,
    persistence: &P,
) -> PersistedAnalysis {
    let analysis = analyze(transcript_text);
    debug!(
        "Transcript {}: intent={} sentiment={} overall={:.3}",
        transcript_id,
        analysis.intent.as_str(),
        analysis.sentiment.as_str(),
        analysis.overall_confidence()
    );

    let database_save = match serde_json::to_string(&analysis) {
        Ok(raw_analysis) => {
            let row = NewAnalysis {
                transcript_id,
                customer_id,
                intent: analysis.intent,
                sentiment: analysis.sentiment,
                confidence_score: analysis.overall_confidence(),
                raw_analysis,
            };
            match persistence.save_analysis(&row) {
                Ok(analysis_id) => SaveOutcome::saved(analysis_id, transcript_id),
                Err(e) => {
                    warn!("Failed to save analysis for transcript {}: {}", transcript_id, e);
                    SaveOutcome::failed(e)
                }
            }
        }
        Err(e) => {
            warn!("Failed to serialize analysis for transcript {}: {}", transcript_id, e);
            SaveOutcome::failed(e)
        }
    };

    PersistedAnalysis {
        analysis,
        database_save,
    }
}
