//! Runs the functions the model asks for.

use std::sync::Arc;

use crate::domain::concierge::{simulate_payment, ConciergeFunction, FunctionOutcome};
use crate::ports::RoomService;

/// Dispatches a validated [`ConciergeFunction`] to the booking service or the
/// payment simulator.
#[derive(Clone)]
pub struct ConciergeFunctionExecutor {
    rooms: Arc<dyn RoomService>,
}

impl ConciergeFunctionExecutor {
    pub fn new(rooms: Arc<dyn RoomService>) -> Self {
        Self { rooms }
    }

    /// Runs the function. Booking failures surface as empty outcomes, never errors.
    pub async fn execute(&self, function: &ConciergeFunction) -> FunctionOutcome {
        match function {
            ConciergeFunction::GetRooms => FunctionOutcome::Rooms(self.rooms.list_rooms().await),
            ConciergeFunction::BookRoom(request) => {
                FunctionOutcome::Booking(self.rooms.book_room(request).await)
            }
            ConciergeFunction::SimulatePayment(payment) => {
                FunctionOutcome::Payment(simulate_payment(payment.amount, payment.method))
            }
        }
    }
}
