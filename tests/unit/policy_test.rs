//! Tests for the admission policy and status register

use airfield_scheduler::core::{admit, describe_status, permitted, Category, StatusRegister};

#[test]
fn test_closed_states_deny_everyone() {
    for status in [0, 9] {
        for category in Category::ALL {
            assert!(!permitted(category, status));
        }
    }
}

#[test]
fn test_exclusive_and_priority_states() {
    for (statuses, allowed) in [([1, 4], Category::A), ([2, 5], Category::B), ([3, 6], Category::C)] {
        for status in statuses {
            for category in Category::ALL {
                assert_eq!(permitted(category, status), category == allowed);
            }
        }
    }
}

#[test]
fn test_open_and_unknown_states_admit_everyone() {
    for status in [7, 8, 10, 99, -3] {
        for category in Category::ALL {
            assert!(admit(category, status).is_ok());
        }
    }
}

#[test]
fn test_malformed_message_leaves_register_unchanged() {
    let register = StatusRegister::new();
    register.apply_message("4").unwrap();
    assert!(register.apply_message("abc").is_err());
    assert_eq!(register.get(), 4);
    assert!(register.apply_message("   ").unwrap().is_none());
    assert_eq!(register.get(), 4);
}

#[test]
fn test_change_reported_once_per_value() {
    let register = StatusRegister::new();
    assert!(register.set(0).is_some());
    assert!(register.set(0).is_none());
    let change = register.set(6).unwrap();
    assert_eq!((change.previous, change.current), (0, 6));
    assert_eq!(describe_status(6), "priority for category C");
    assert_eq!(describe_status(42), "undefined status");
}
