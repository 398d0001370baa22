//! Fixed assistant texts: the system persona and the refusal strings

use crate::models::Message;

/// Full apology returned by the gateway when the domain guard refuses.
pub const OUT_OF_SCOPE_MESSAGE: &str = "I'm sorry — I can only answer questions about beauty and health care. Please ask about skincare, haircare, makeup, or related healthy beauty routines.";

/// Short refusal the persona tells the model to use, and the client's
/// fallback when a refusal arrives without a message.
pub const SHORT_REFUSAL: &str = "I'm sorry — I can only answer questions about beauty and health care.";

const PERSONA: &str = "You are a specialist assistant for beauty and health-care topics only. Answer only questions about skincare, haircare, makeup, cosmetic products, and healthy beauty routines. For any question outside this domain, refuse politely with: 'I'm sorry — I can only answer questions about beauty and health care.' Keep answers concise and practical.";

/// System message prepended to every upstream call
pub fn system_persona() -> Message {
    Message::system(PERSONA)
}
