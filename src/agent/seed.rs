//! Sample call transcripts for demos and local testing.

use super::store::{StoreError, TranscriptStore};
use super::types::NewTranscript;
use log::info;

fn sample(
    customer_id: &str,
    customer_name: &str,
    transcript: &str,
    duration_seconds: u32,
    phone_number: &str,
) -> NewTranscript {
    NewTranscript {
        duration_seconds: Some(duration_seconds),
        phone_number: Some(phone_number.to_string()),
        ..NewTranscript::new(customer_id, customer_name, transcript)
    }
}

/// The five demo calls: damaged item, cancellation, account lockout,
/// premium upgrade and a duplicate charge.
pub fn sample_transcripts() -> Vec<NewTranscript> {
    vec![
        sample(
            "CUST001",
            "John Smith",
            "Agent: Hello, thank you for calling. How can I help you today? Customer: Hi, I'm calling about my recent order. I received it yesterday but one item was damaged. Agent: I'm sorry to hear that. Let me help you with that. Can you tell me which item was damaged? Customer: Yes, the laptop stand was broken. Agent: I apologize for the inconvenience. I can send you a replacement immediately at no cost. Would that work for you? Customer: Yes, that would be great. Thank you so much for your help! Agent: You're welcome. I'll process this right away.",
            180,
            "+1-555-0001",
        ),
        sample(
            "CUST002",
            "Sarah Johnson",
            "Agent: Welcome back! What brings you in today? Customer: I want to cancel my subscription. Agent: Oh no! May I ask why you'd like to cancel? Customer: Your service is too expensive compared to competitors. Agent: I understand. Let me see if I can offer you a better plan. We have a 30% discount available right now. Customer: That would be helpful. How much would that be? Agent: It would be $35 instead of $50 per month. Customer: Okay, I'll keep it then. Thank you!",
            240,
            "+1-555-0002",
        ),
        sample(
            "CUST003",
            "Michael Brown",
            "Agent: Hi there! How can we assist you? Customer: I can't log into my account! This is really frustrating! I've been trying for 20 minutes! Agent: I'm very sorry you're experiencing this issue. Let me help you reset your password. Customer: Yes, please do that. This is unacceptable! Agent: I completely understand your frustration. I'll send a password reset link to your email right now. Customer: Fine. But I expect this to work! Agent: It will work, and I sincerely apologize for the trouble. You should receive the email within a few seconds.",
            300,
            "+1-555-0003",
        ),
        sample(
            "CUST004",
            "Emily Davis",
            "Agent: Hello! Welcome to our support team. Customer: Hi, I'd like to upgrade my plan to the premium version. Agent: Absolutely! That's a great choice. The premium plan includes 24/7 support, unlimited storage, and advanced features. Customer: That sounds perfect. How much extra will that cost? Agent: It's an additional $15 per month. Would you like me to process that upgrade? Customer: Yes, please go ahead. Agent: Done! Your upgrade is now active. You'll see all the new features in your account. Is there anything else I can help you with? Customer: No, that's all. Thank you!",
            150,
            "+1-555-0004",
        ),
        sample(
            "CUST005",
            "David Wilson",
            "Agent: Hi, this is support. What's the issue? Customer: I have a billing question. I was charged twice for last month. Agent: Let me look into that for you. Can you confirm your account email? Customer: It's david.wilson@email.com. Agent: Found it. You're right, there was a duplicate charge. I've initiated a refund for $99.99. It should appear in your account within 3-5 business days. Customer: Thank you! I appreciate you fixing this quickly. Agent: My pleasure! Is there anything else? Customer: No, that's all. Have a good day! Agent: You too, thank you for calling!",
            210,
            "+1-555-0005",
        ),
    ]
}

/// Load the sample transcripts into an empty store.
///
/// Returns how many transcripts were inserted; a store that already holds
/// transcripts is left untouched.
pub fn seed_sample_data(store: &TranscriptStore) -> Result<usize, StoreError> {
    let existing = store.transcript_count()?;
    if existing > 0 {
        info!("Transcript store already holds {} transcripts, skipping seed", existing);
        return Ok(0);
    }

    let samples = sample_transcripts();
    for transcript in &samples {
        store.insert_transcript(transcript)?;
    }
    info!("Seeded {} sample call transcripts", samples.len());
    Ok(samples.len())
}
