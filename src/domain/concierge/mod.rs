//! Concierge domain.
//!
//! Holds the records the concierge persists (guests and their chat history),
//! the closed set of functions the model may call, and the pure pieces of the
//! booking flow (payment simulation, system prompt construction).

mod booking;
mod conversation;
mod functions;
mod payment;
mod prompt;
mod user;

pub use booking::{BookingConfirmation, BookingRequest, RoomListing};
pub use conversation::{ChatMessage, Conversation, FunctionCall};
pub use functions::{
    function_definitions, ConciergeFunction, FunctionCallError, FunctionDefinition,
    FunctionName, FunctionOutcome,
};
pub use payment::{simulate_payment, PaymentMethod, PaymentReceipt, PaymentRequest, PaymentStatus};
pub use prompt::system_prompt;
pub use user::User;
