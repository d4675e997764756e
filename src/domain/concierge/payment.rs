//! Payment simulation.
//!
//! No money moves: every payment succeeds with a canned receipt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment methods the model may pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
}

impl PaymentMethod {
    /// All methods, in the order they are advertised to the model.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Paypal,
    ];

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Paypal => "paypal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of the `simulate_payment` function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: f64,
    pub method: PaymentMethod,
}

/// Outcome status of a simulated payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
}

/// Receipt returned to the model after a simulated payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub status: PaymentStatus,
    pub message: String,
}

/// Simulates a payment. Always succeeds; the amount is not checked.
pub fn simulate_payment(amount: f64, method: PaymentMethod) -> PaymentReceipt {
    PaymentReceipt {
        status: PaymentStatus::Success,
        message: format!("Payment of ${} processed via {}", amount, method),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paypal_payment_of_100_succeeds() {
        let receipt = simulate_payment(100.0, PaymentMethod::Paypal);
        assert_eq!(
            serde_json::to_string(&receipt).unwrap(),
            r#"{"status":"success","message":"Payment of $100 processed via paypal"}"#
        );
    }

    #[test]
    fn fractional_amounts_keep_their_decimals() {
        let receipt = simulate_payment(99.5, PaymentMethod::CreditCard);
        assert_eq!(receipt.message, "Payment of $99.5 processed via credit_card");
    }

    #[test]
    fn zero_and_negative_amounts_still_succeed() {
        assert_eq!(simulate_payment(0.0, PaymentMethod::DebitCard).status, PaymentStatus::Success);
        let receipt = simulate_payment(-20.0, PaymentMethod::DebitCard);
        assert_eq!(receipt.status, PaymentStatus::Success);
        assert_eq!(receipt.message, "Payment of $-20 processed via debit_card");
    }

    #[test]
    fn payment_request_parses_model_arguments() {
        let request: PaymentRequest =
            serde_json::from_str(r#"{"amount":250,"method":"debit_card"}"#).unwrap();
        assert_eq!(request.amount, 250.0);
        assert_eq!(request.method, PaymentMethod::DebitCard);
    }

    #[test]
    fn unknown_payment_method_is_rejected() {
        let result: Result<PaymentRequest, _> =
            serde_json::from_str(r#"{"amount":10,"method":"bitcoin"}"#);
        assert!(result.is_err());
    }
}
