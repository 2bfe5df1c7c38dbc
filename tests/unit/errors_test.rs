use bookmark_sync::types::errors::*;

// === BookmarkError Tests ===

#[test]
fn bookmark_error_validation_display() {
    let err = BookmarkError::Validation("2 ids but 3 update payloads".to_string());
    assert_eq!(
        err.to_string(),
        "Bookmark validation failed: 2 ids but 3 update payloads"
    );
}

#[test]
fn bookmark_error_not_found_display() {
    let err = BookmarkError::NotFound(42);
    assert_eq!(err.to_string(), "Bookmark not found: 42");
}

#[test]
fn bookmark_error_storage_display() {
    let err = BookmarkError::Storage("disk full".to_string());
    assert_eq!(err.to_string(), "Bookmark storage error: disk full");
}

#[test]
fn bookmark_error_from_rusqlite_is_storage() {
    let err: BookmarkError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, BookmarkError::Storage(_)));
}

#[test]
fn bookmark_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(BookmarkError::NotFound(1));
    assert!(err.source().is_none());
}

// === ImportError Tests ===

#[test]
fn import_error_display_variants() {
    assert_eq!(
        ImportError::InvalidJson("expected value at line 1".to_string()).to_string(),
        "Invalid bookmark JSON: expected value at line 1"
    );
    assert_eq!(
        ImportError::InvalidNode("bookmark_bar: unknown variant `separator`".to_string()).to_string(),
        "Invalid bookmark node: bookmark_bar: unknown variant `separator`"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("permission denied".to_string()).to_string(),
        "Settings I/O error: permission denied"
    );
    assert_eq!(
        SettingsError::SerializationError("trailing comma".to_string()).to_string(),
        "Settings serialization error: trailing comma"
    );
    assert_eq!(
        SettingsError::InvalidKey("theme".to_string()).to_string(),
        "Invalid settings key: theme"
    );
    assert_eq!(
        SettingsError::InvalidValue("folder_scope".to_string()).to_string(),
        "Invalid settings value: folder_scope"
    );
}
