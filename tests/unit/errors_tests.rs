/*!
 * Tests for error types
 */

use spreadshred::errors::{AppError, ProviderError, ReconcileError, StoreError};

/// Test that provider errors render their details
#[test]
fn test_providerError_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "slow down".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 429 - slow down");
    assert_eq!(ProviderError::Timeout(1500).to_string(), "Lookup timed out after 1500 ms");
}

/// Test that a store error names the offending log line
#[test]
fn test_storeError_encoding_shouldNameLine() {
    let error = StoreError::Encoding {
        line: 7,
        message: "expected value".to_string(),
    };
    assert!(error.to_string().contains("line 7"));
}

/// Test that store errors nest inside reconcile and app errors
#[test]
fn test_storeError_intoAppError_shouldWrapAsReconcileError() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let app_error: AppError = StoreError::from(io).into();

    match &app_error {
        AppError::Reconcile(ReconcileError::Store(StoreError::Io(_))) => {}
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(app_error.to_string().contains("read-only"));
}

/// Test conversions from io and anyhow errors
#[test]
fn test_appError_conversions_shouldPickVariant() {
    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(from_anyhow, AppError::Unknown(ref m) if m == "boom"));
}

/// Test that a reconcile error converts into anyhow with its message
#[test]
fn test_reconcileError_intoAnyhow_shouldKeepMessage() {
    let error: anyhow::Error = ReconcileError::Tagger("bad sentence".to_string()).into();
    assert_eq!(error.to_string(), "Tagger failed: bad sentence");
}
