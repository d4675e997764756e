//! System prompt for the booking assistant.

use super::user::User;

const INSTRUCTIONS: &str = "\
You are a polite and helpful hotel booking assistant chatbot. Always maintain a friendly and professional tone.
Key points:
1. If asked \"Who are you?\", explain that you're a hotel booking assistant chatbot.
2. If asked \"Who am I?\", provide details about the user if available.
3. If faced with inappropriate language or queries, respond ethically and professionally, redirecting the conversation to booking-related topics.
4. Guide users through the booking process: greeting, showing rooms, asking for nights, calculating price, confirming booking, and processing payment.
5. You can communicate in any language the user prefers.
6. Format responses with proper line breaks for better readability, especially when listing options.
7. Only mention payment when the user explicitly asks about it or is ready to pay.";

/// Builds the system prompt: fixed instructions plus a JSON snapshot of the guest.
pub fn system_prompt(user: &User) -> Result<String, serde_json::Error> {
    let snapshot = serde_json::to_string(user)?;
    Ok(format!("{}\nUser details: {}", INSTRUCTIONS, snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};

    #[test]
    fn prompt_embeds_user_snapshot() {
        let mut user = User::new(UserId::new("guest-7").unwrap(), Timestamp::now());
        user.full_name = Some("Ann Lee".to_string());

        let prompt = system_prompt(&user).unwrap();

        assert!(prompt.starts_with("You are a polite and helpful hotel booking assistant"));
        assert!(prompt.contains("User details: {\"userId\":\"guest-7\",\"fullName\":\"Ann Lee\""));
    }

    #[test]
    fn prompt_lists_all_guidelines() {
        let user = User::new(UserId::new("guest-7").unwrap(), Timestamp::now());
        let prompt = system_prompt(&user).unwrap();
        for n in 1..=7 {
            assert!(prompt.contains(&format!("\n{}. ", n)), "missing guideline {}", n);
        }
    }
}
