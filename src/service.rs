//! Service Boundary
//!
//! The operations exposed to the HTTP API and the stdio tool server.
//! Every failure comes back as a [`ServiceError`] value; nothing here panics.

use crate::agent::{
    analyzer::{analyze_and_persist, PersistedAnalysis},
    store::{AnalysisPersistence, StoreError, TranscriptStore},
    types::{AnalysisRecord, SaveOutcome, StoredAnalysis, Transcript, TranscriptSummary},
};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SERVER_NAME: &str = "call-analysis-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool names, in the order they are advertised
pub const AVAILABLE_TOOLS: [&str; 8] = [
    "get_transcript",
    "list_all_transcripts",
    "get_customer_transcripts",
    "analyze_transcript",
    "get_analysis_result",
    "get_customer_analysis_history",
    "batch_analyze_customer",
    "server_health",
];

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ServiceError {
    /// Structured error object handed back to callers
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

// ============================================================
// RESPONSE TYPES
// ============================================================

/// Result of analyzing one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub transcript_id: i64,
    pub customer_id: String,
    pub analysis: AnalysisRecord,
    pub saved_to_database: bool,
    pub database_save: SaveOutcome,
}

impl AnalyzeResponse {
    fn new(transcript_id: i64, customer_id: &str, result: PersistedAnalysis) -> Self {
        Self {
            transcript_id,
            customer_id: customer_id.to_string(),
            saved_to_database: result.database_save.success,
            analysis: result.analysis,
            database_save: result.database_save,
        }
    }
}

/// Result of analyzing every transcript of a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    pub customer_id: String,
    pub transcripts_analyzed: usize,
    pub analyses: Vec<AnalyzeResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub server: String,
    pub version: String,
    pub available_tools: Vec<String>,
}

// ============================================================
// SERVICE
// ============================================================

pub struct CallAnalysisService {
    store: TranscriptStore,
}

impl CallAnalysisService {
    pub fn new(store: TranscriptStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    pub fn get_transcript(&self, transcript_id: i64) -> Result<Transcript, ServiceError> {
        self.store
            .get_transcript(transcript_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Transcript {} not found", transcript_id)))
    }

    pub fn list_transcripts(&self) -> Result<Vec<TranscriptSummary>, ServiceError> {
        Ok(self.store.list_transcripts()?)
    }

    pub fn customer_transcripts(&self, customer_id: &str) -> Result<Vec<Transcript>, ServiceError> {
        Ok(self.store.transcripts_for_customer(customer_id)?)
    }

    /// Analyze one transcript and save the result.
    ///
    /// Without an explicit customer id the transcript's own customer is used.
    pub fn analyze_transcript(
        &self,
        transcript_id: i64,
        customer_id: Option<&str>,
    ) -> Result<AnalyzeResponse, ServiceError> {
        let transcript = self.get_transcript(transcript_id)?;
        let customer_id = match customer_id {
            Some(id) if id.trim().is_empty() => {
                return Err(ServiceError::InvalidArgument("customer_id must not be empty".into()))
            }
            Some(id) => id,
            None => transcript.customer_id.as_str(),
        };

        let result = analyze_and_persist(transcript.id, customer_id, &transcript.transcript, &self.store);
        info!(
            "Analyzed transcript {} for {}: {} / {}",
            transcript.id,
            customer_id,
            result.analysis.intent.as_str(),
            result.analysis.sentiment.as_str()
        );
        Ok(AnalyzeResponse::new(transcript.id, customer_id, result))
    }

    pub fn get_analysis(&self, analysis_id: i64) -> Result<StoredAnalysis, ServiceError> {
        self.store
            .get_analysis(analysis_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Analysis {} not found", analysis_id)))
    }

    pub fn customer_analysis_history(
        &self,
        customer_id: &str,
    ) -> Result<Vec<StoredAnalysis>, ServiceError> {
        Ok(self.store.customer_analysis_history(customer_id)?)
    }

    /// Analyze every transcript owned by a customer, one after another
    pub fn batch_analyze_customer(&self, customer_id: &str) -> Result<BatchAnalysis, ServiceError> {
        let transcripts = self.store.fetch_transcripts_for_customer(customer_id)?;
        if transcripts.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "No transcripts found for customer {}",
                customer_id
            )));
        }

        let analyses: Vec<AnalyzeResponse> = transcripts
            .iter()
            .map(|t| {
                let result = analyze_and_persist(t.id, customer_id, &t.transcript, &self.store);
                AnalyzeResponse::new(t.id, customer_id, result)
            })
            .collect();

        info!("Batch analyzed {} transcripts for {}", analyses.len(), customer_id);
        Ok(BatchAnalysis {
            customer_id: customer_id.to_string(),
            transcripts_analyzed: analyses.len(),
            analyses,
        })
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            server: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            available_tools: AVAILABLE_TOOLS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::seed::seed_sample_data;
    use crate::agent::types::{IntentCategory, NewTranscript, Sentiment};

    fn seeded_service() -> CallAnalysisService {
        let store = TranscriptStore::in_memory().unwrap();
        seed_sample_data(&store).unwrap();
        CallAnalysisService::new(store)
    }

    fn transcript_id_for(service: &CallAnalysisService, customer_id: &str) -> i64 {
        service.customer_transcripts(customer_id).unwrap()[0].id
    }

    #[test]
    fn test_analyze_sample_transcripts() {
        let service = seeded_service();

        let expected = [
            ("CUST002", IntentCategory::Cancellation),
            ("CUST004", IntentCategory::Upgrade),
            ("CUST005", IntentCategory::Billing),
        ];
        for (customer, intent) in expected {
            let id = transcript_id_for(&service, customer);
            let response = service.analyze_transcript(id, None).unwrap();
            assert_eq!(response.analysis.intent, intent, "customer {}", customer);
            assert_eq!(response.customer_id, customer);
            assert!(response.saved_to_database);
        }
    }

    #[test]
    fn test_analyze_unknown_transcript() {
        let service = seeded_service();
        let err = service.analyze_transcript(9999, Some("CUST001")).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.to_json()["error"], "Transcript 9999 not found");
    }

    #[test]
    fn test_analyze_rejects_blank_customer() {
        let service = seeded_service();
        let id = transcript_id_for(&service, "CUST001");
        let err = service.analyze_transcript(id, Some("  ")).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn test_saved_analysis_round_trip() {
        let service = seeded_service();
        let id = transcript_id_for(&service, "CUST003");
        let response = service.analyze_transcript(id, Some("CUST003")).unwrap();
        let analysis_id = response.database_save.analysis_id.unwrap();

        let stored = service.get_analysis(analysis_id).unwrap();
        assert_eq!(stored.intent, response.analysis.intent.as_str());
        assert_eq!(stored.sentiment, response.analysis.sentiment.as_str());
        assert_eq!(stored.confidence_score, response.analysis.overall_confidence());
        assert_eq!(stored.record().unwrap(), response.analysis);
    }

    #[test]
    fn test_batch_analyze_customer() {
        let service = seeded_service();
        service
            .store()
            .insert_transcript(&NewTranscript::new("CUST001", "John Smith", "Thank you, that is perfect"))
            .unwrap();

        let batch = service.batch_analyze_customer("CUST001").unwrap();
        assert_eq!(batch.transcripts_analyzed, 2);
        assert!(batch.analyses.iter().all(|a| a.saved_to_database));
        assert_eq!(batch.analyses[0].analysis.sentiment, Sentiment::Positive);

        let history = service.customer_analysis_history("CUST001").unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_batch_analyze_unknown_customer() {
        let service = seeded_service();
        let err = service.batch_analyze_customer("CUST999").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_health() {
        let service = seeded_service();
        let health = service.health();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.available_tools.len(), 8);
    }
}
