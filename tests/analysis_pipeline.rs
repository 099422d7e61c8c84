use call_analysis::agent::{
    analyze, analyze_and_persist, classify_intent, classify_sentiment, sample_transcripts,
    seed_sample_data, AnalysisPersistence, IntentCategory, Sentiment, TranscriptStore,
};
use call_analysis::service::CallAnalysisService;

#[test]
fn test_reference_call_scenarios() {
    assert_eq!(
        classify_intent("I want to cancel my subscription immediately.").category,
        IntentCategory::Cancellation
    );
    assert_eq!(
        classify_intent("Why was I charged twice? I need a refund!").category,
        IntentCategory::Billing
    );
    assert_eq!(
        classify_sentiment("Thank you so much! I really appreciate your help. This is amazing!").label,
        Sentiment::Positive
    );
    assert_eq!(
        classify_sentiment("This is terrible! I'm frustrated and angry with your service!").label,
        Sentiment::Negative
    );
}

#[test]
fn test_sample_transcripts_classification() {
    // (intent, intent confidence, top keywords, sentiment, sentiment confidence)
    let expected = [
        (IntentCategory::Support, 0.4, vec!["help", "can you"], Sentiment::Positive, 1.0),
        (IntentCategory::Cancellation, 0.2, vec!["cancel"], Sentiment::Neutral, 2.0 / 3.0),
        (
            IntentCategory::AccountAccess,
            0.4,
            vec!["password", "reset"],
            Sentiment::Neutral,
            2.0 / 3.0,
        ),
        (
            IntentCategory::Upgrade,
            0.6,
            vec!["upgrade", "premium", "add"],
            Sentiment::Positive,
            1.0,
        ),
        (
            IntentCategory::Billing,
            0.5,
            vec!["charge", "billing", "refund", "duplicate"],
            Sentiment::Positive,
            0.75,
        ),
    ];

    for (sample, (intent, intent_conf, keywords, sentiment, sentiment_conf)) in
        sample_transcripts().iter().zip(expected)
    {
        let record = analyze(&sample.transcript);
        assert_eq!(record.intent, intent, "{}", sample.customer_id);
        assert_eq!(record.intent_confidence, intent_conf, "{}", sample.customer_id);
        assert_eq!(record.analysis_details.intent_keywords_found, keywords);
        assert_eq!(record.sentiment, sentiment, "{}", sample.customer_id);
        assert_eq!(record.sentiment_confidence, sentiment_conf, "{}", sample.customer_id);
    }
}

#[test]
fn test_damaged_item_call_scores_every_category() {
    let samples = sample_transcripts();
    let intent = classify_intent(&samples[0].transcript);

    assert_eq!(intent.category_scores.len(), 3);
    assert_eq!(intent.category_scores[&IntentCategory::Complaint], 3);
    assert_eq!(intent.category_scores[&IntentCategory::Support], 4);
    assert_eq!(intent.category_scores[&IntentCategory::ComplaintResolution], 2);
}

#[test]
fn test_round_trip_through_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = TranscriptStore::open(dir.path().join("calls.db")).unwrap();
    seed_sample_data(&store).unwrap();

    let transcripts = store.fetch_transcripts_for_customer("CUST003").unwrap();
    assert_eq!(transcripts.len(), 1);
    let transcript = &transcripts[0];

    let result = analyze_and_persist(transcript.id, "CUST003", &transcript.transcript, &store);
    assert!(result.database_save.success);

    let stored = store
        .get_analysis(result.database_save.analysis_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.intent, "account_access");
    assert_eq!(stored.sentiment, "neutral");
    assert_eq!(
        stored.confidence_score.to_bits(),
        result.analysis.overall_confidence().to_bits()
    );

    let record = stored.record().unwrap();
    assert_eq!(record.intent_confidence.to_bits(), result.analysis.intent_confidence.to_bits());
    assert_eq!(
        record.sentiment_confidence.to_bits(),
        result.analysis.sentiment_confidence.to_bits()
    );
    assert_eq!(record, result.analysis);
}

#[test]
fn test_failed_save_is_reported_not_fatal() {
    let store = TranscriptStore::in_memory().unwrap();
    // No transcript 99 exists, so the foreign key rejects the row
    let result = analyze_and_persist(99, "CUST404", "please cancel", &store);

    assert!(!result.database_save.success);
    assert!(result.database_save.error.is_some());
    assert_eq!(result.analysis.intent, IntentCategory::Cancellation);
    assert!(store.customer_analysis_history("CUST404").unwrap().is_empty());
}

#[test]
fn test_history_grows_with_each_analysis() {
    let store = TranscriptStore::in_memory().unwrap();
    seed_sample_data(&store).unwrap();
    let service = CallAnalysisService::new(store);

    service.batch_analyze_customer("CUST004").unwrap();
    service.batch_analyze_customer("CUST004").unwrap();

    let history = service.customer_analysis_history("CUST004").unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].id > history[1].id);
    assert!(history.iter().all(|a| a.intent == "upgrade"));
}
