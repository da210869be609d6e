//! Status validation
//!
//! The single place that decides whether a bus event succeeded. Engines
//! never compare status codes themselves.

use crate::error::ProtocolError;
use crate::status::BusStatusCode;

/// Check an observed status against the one the sequence requires
///
/// Succeeds only on an exact match.
pub fn validate(observed: BusStatusCode, expected: BusStatusCode) -> Result<(), ProtocolError> {
    if observed == expected {
        Ok(())
    } else {
        Err(ProtocolError::UnexpectedStatus { expected, observed })
    }
}

/// Decode a raw status register value and validate it
pub fn validate_register(raw: u8, expected: BusStatusCode) -> Result<(), ProtocolError> {
    let observed = decode(raw)?;
    validate(observed, expected)
}

/// Decode a raw status register value
pub fn decode(raw: u8) -> Result<BusStatusCode, ProtocolError> {
    BusStatusCode::from_register(raw).ok_or(ProtocolError::UnknownStatus(raw & crate::STATUS_MASK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(validate(BusStatusCode::Start, BusStatusCode::Start), Ok(()));
    }

    #[test]
    fn test_mismatch_carries_pair() {
        assert_eq!(
            validate(BusStatusCode::AddressWriteNack, BusStatusCode::AddressWriteAck),
            Err(ProtocolError::UnexpectedStatus {
                expected: BusStatusCode::AddressWriteAck,
                observed: BusStatusCode::AddressWriteNack,
            })
        );
    }

    #[test]
    fn test_arbitration_lost_is_a_plain_mismatch() {
        // Refinement into ArbitrationLost is the engine's decision
        assert!(matches!(
            validate(BusStatusCode::ArbitrationLost, BusStatusCode::DataWriteAck),
            Err(ProtocolError::UnexpectedStatus { .. })
        ));
    }

    #[test]
    fn test_register_with_prescaler() {
        assert_eq!(validate_register(0x18 | 0x01, BusStatusCode::AddressWriteAck), Ok(()));
        assert_eq!(
            validate_register(0xD3, BusStatusCode::Start),
            Err(ProtocolError::UnknownStatus(0xD0))
        );
    }

    proptest! {
        #[test]
        fn prop_validate_succeeds_only_on_equality(a in 0usize..27, b in 0usize..27) {
            let observed = BusStatusCode::ALL[a];
            let expected = BusStatusCode::ALL[b];
            prop_assert_eq!(validate(observed, expected).is_ok(), a == b);
        }
    }
}
