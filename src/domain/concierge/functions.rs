//! Functions the model may call.
//!
//! The set is closed: `get_rooms`, `book_room` and `simulate_payment`.
//! A model-issued [`FunctionCall`] is parsed into a [`ConciergeFunction`]
//! before anything runs, so argument errors never reach the booking service.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::booking::{BookingConfirmation, BookingRequest, RoomListing};
use super::conversation::FunctionCall;
use super::payment::{PaymentMethod, PaymentReceipt, PaymentRequest};

/// Schema and description of a callable function, as advertised to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Unique name of the function (e.g., "get_rooms")
    name: String,

    /// Human-readable description for the model
    description: String,

    /// JSON Schema for the parameters
    parameters: serde_json::Value,
}

impl FunctionDefinition {
    /// Creates a new function definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Returns the function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters schema.
    pub fn parameters(&self) -> &serde_json::Value {
        &self.parameters
    }

    /// Converts to the OpenAI `functions` entry format.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters
        })
    }
}

static DEFINITIONS: Lazy<Vec<FunctionDefinition>> = Lazy::new(|| {
    let methods: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.as_str()).collect();
    vec![
        FunctionDefinition::new(
            FunctionName::GetRooms.as_str(),
            "Get available hotel rooms",
            serde_json::json!({ "type": "object", "properties": {} }),
        ),
        FunctionDefinition::new(
            FunctionName::BookRoom.as_str(),
            "Book a hotel room",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "roomId": { "type": "number" },
                    "fullName": { "type": "string" },
                    "email": { "type": "string" },
                    "nights": { "type": "number" }
                },
                "required": ["roomId", "fullName", "email", "nights"]
            }),
        ),
        FunctionDefinition::new(
            FunctionName::SimulatePayment.as_str(),
            "Simulate payment process",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "amount": { "type": "number" },
                    "method": { "type": "string", "enum": methods }
                },
                "required": ["amount", "method"]
            }),
        ),
    ]
});

/// The three function declarations offered on the planning call.
pub fn function_definitions() -> &'static [FunctionDefinition] {
    &DEFINITIONS
}

/// Identifier of a callable function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionName {
    GetRooms,
    BookRoom,
    SimulatePayment,
}

impl FunctionName {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::GetRooms => "get_rooms",
            FunctionName::BookRoom => "book_room",
            FunctionName::SimulatePayment => "simulate_payment",
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionName {
    type Err = FunctionCallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get_rooms" => Ok(FunctionName::GetRooms),
            "book_room" => Ok(FunctionName::BookRoom),
            "simulate_payment" => Ok(FunctionName::SimulatePayment),
            other => Err(FunctionCallError::UnknownFunction(other.to_string())),
        }
    }
}

/// Errors raised while interpreting a model's function call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionCallError {
    /// The model named a function outside the advertised set.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// The arguments did not match the function's schema.
    #[error("Invalid arguments for {function}: {reason}")]
    InvalidArguments {
        function: FunctionName,
        reason: String,
    },
}

/// A validated function call, ready to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ConciergeFunction {
    GetRooms,
    BookRoom(BookingRequest),
    SimulatePayment(PaymentRequest),
}

impl ConciergeFunction {
    /// Parses a raw model function call.
    ///
    /// `get_rooms` takes no parameters, so its arguments are not inspected.
    pub fn from_call(call: &FunctionCall) -> Result<Self, FunctionCallError> {
        let name: FunctionName = call.name.parse()?;
        match name {
            FunctionName::GetRooms => Ok(ConciergeFunction::GetRooms),
            FunctionName::BookRoom => parse_arguments(name, &call.arguments).map(ConciergeFunction::BookRoom),
            FunctionName::SimulatePayment => {
                parse_arguments(name, &call.arguments).map(ConciergeFunction::SimulatePayment)
            }
        }
    }

    /// Returns the identifier of this function.
    pub fn name(&self) -> FunctionName {
        match self {
            ConciergeFunction::GetRooms => FunctionName::GetRooms,
            ConciergeFunction::BookRoom(_) => FunctionName::BookRoom,
            ConciergeFunction::SimulatePayment(_) => FunctionName::SimulatePayment,
        }
    }
}

fn parse_arguments<T: serde::de::DeserializeOwned>(
    function: FunctionName,
    arguments: &str,
) -> Result<T, FunctionCallError> {
    serde_json::from_str(arguments).map_err(|e| FunctionCallError::InvalidArguments {
        function,
        reason: e.to_string(),
    })
}

/// Result of running a function, serialized into the function-result message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FunctionOutcome {
    /// Room listing as served; `[]` when the booking service failed.
    Rooms(RoomListing),
    /// Confirmation; `None` (serialized as `null`) when booking failed.
    Booking(Option<BookingConfirmation>),
    Payment(PaymentReceipt),
}

impl FunctionOutcome {
    /// Serializes the outcome as the function message content.
    pub fn to_content(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
