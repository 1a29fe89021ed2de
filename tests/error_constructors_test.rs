use cez_hdo::error::HdoError;

#[test]
fn fetch_failure_constructors() {
    assert!(matches!(
        HdoError::transport("x"),
        HdoError::Transport { .. }
    ));
    assert!(matches!(HdoError::timeout("x"), HdoError::Timeout { .. }));
    assert!(matches!(HdoError::decode("x"), HdoError::Decode { .. }));
    assert!(matches!(
        HdoError::signal_not_found("a3b4dp01"),
        HdoError::SignalNotFound { .. }
    ));
    assert!(matches!(
        HdoError::schedule_empty("a3b4dp01"),
        HdoError::ScheduleEmpty { .. }
    ));
}

#[test]
fn ambient_constructors() {
    assert!(matches!(HdoError::config("x"), HdoError::Config { .. }));
    assert!(matches!(HdoError::io("x"), HdoError::Io { .. }));
    assert!(matches!(
        HdoError::validation("f", "m"),
        HdoError::Validation { .. }
    ));
}

#[test]
fn display_messages() {
    assert_eq!(
        HdoError::schedule_empty("a3b4dp06").to_string(),
        "No schedule data for signal 'a3b4dp06'"
    );
    assert!(
        HdoError::transport("API request failed with status 500")
            .to_string()
            .starts_with("Network error")
    );
    assert!(HdoError::timeout("x").is_transport());
    assert!(!HdoError::decode("x").is_transport());
}
