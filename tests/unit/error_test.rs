//! Tests for error types

use airfield_scheduler::core::{AirfieldError, AppResult, Category};

#[test]
fn test_error_messages() {
    assert_eq!(AirfieldError::Congestion.to_string(), "tower congested");
    assert_eq!(
        AirfieldError::PolicyDenied {
            category: Category::C,
            status: 2
        }
        .to_string(),
        "category C not permitted under status 2"
    );
    assert_eq!(
        AirfieldError::RetryExhausted { attempts: 6 }.to_string(),
        "retry limit exhausted after 6 attempts"
    );
    assert_eq!(
        AirfieldError::MalformedFeedMessage("abc".into()).to_string(),
        "malformed status message: \"abc\""
    );
    assert_eq!(
        AirfieldError::InvalidConfig("gate_capacity must be greater than 0".into()).to_string(),
        "invalid configuration: gate_capacity must be greater than 0"
    );
}

#[test]
fn test_converts_into_app_result() {
    fn fails() -> AppResult<()> {
        Err::<(), _>(AirfieldError::QueueClosed)?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert_eq!(
        err.downcast_ref::<AirfieldError>(),
        Some(&AirfieldError::QueueClosed)
    );
}
