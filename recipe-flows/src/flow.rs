//! The trait every flow implements.

use async_trait::async_trait;
use recipe_primitives::GenerationResult;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::contracts::FlowContract;
use crate::error::{FlowError, FlowResult};

/// `validate → render → invoke → [postprocess]` for one request type.
#[async_trait]
pub trait Flow: Send + Sync {
    /// Typed request.
    type Input: DeserializeOwned + Send;
    /// Typed result.
    type Output: Into<GenerationResult> + Send;

    /// Input and output contracts of this flow.
    fn contract(&self) -> &'static FlowContract;

    /// Runs the flow on an already decoded request.
    async fn run(&self, input: Self::Input) -> FlowResult<Self::Output>;
}

/// Checks caller JSON against the input contract, then decodes it.
///
/// Top-level `null` members are treated as absent.
///
/// # Errors
///
/// Returns [`FlowError::InvalidInput`] on a contract violation or decode error.
pub fn decode_input<T>(contract: &FlowContract, mut value: Value) -> FlowResult<T>
where
    T: DeserializeOwned,
{
    contract
        .input
        .check(&value)
        .map_err(|violation| FlowError::invalid_input(contract.name, violation.to_string()))?;
    if let Value::Object(members) = &mut value {
        members.retain(|_, member| !member.is_null());
    }
    serde_json::from_value(value)
        .map_err(|err| FlowError::invalid_input(contract.name, err.to_string()))
}

#[cfg(test)]
mod tests {
    use recipe_primitives::EventRequest;
    use serde_json::json;

    use super::*;
    use crate::contracts;

    #[test]
    fn decodes_with_null_members() {
        let request: EventRequest = decode_input(
            &contracts::EVENT,
            json!({
                "eventType": "picnic",
                "numberOfGuests": 6,
                "mealType": "starter",
                "dietaryRestrictions": null
            }),
        )
        .unwrap();
        assert_eq!(request.number_of_guests(), 6);
        assert_eq!(request.dietary_restrictions().count(), 0);
    }

    #[test]
    fn contract_violations_name_the_path() {
        let err = decode_input::<EventRequest>(&contracts::EVENT, json!({"eventType": "picnic"}))
            .expect_err("missing fields");
        match err {
            FlowError::InvalidInput { flow, reason } => {
                assert_eq!(flow, "generate_for_event");
                assert!(reason.contains("$.numberOfGuests"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
