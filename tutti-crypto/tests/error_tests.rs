use std::error::Error;
use tutti_crypto::CryptoError;

#[test]
fn error_display_encryption() {
    let err = CryptoError::encryption("bad input");
    assert_eq!(err.to_string(), "encryption failed: bad input");
    assert!(err.is_encryption_failure());
    assert!(err.source().is_none());
}

#[test]
fn error_display_decryption() {
    let err = CryptoError::decryption("tampered");
    assert_eq!(err.to_string(), "decryption failed: tampered");
    assert!(err.is_decryption_failure());
}

#[test]
fn encryption_failure_chains_cause() {
    let cause = CryptoError::KeyDerivation("bad params".into());
    let err = CryptoError::encryption_caused_by("wrapping key", cause);
    let source = err.source().expect("cause is kept");
    assert!(source.to_string().contains("bad params"));
}

#[test]
fn decryption_failure_chains_cause() {
    let cause = std::str::from_utf8(&[0xFF]).unwrap_err();
    let err = CryptoError::decryption_caused_by("not text", cause);
    assert!(err.source().is_some());
    assert!(!err.is_encryption_failure());
}

#[test]
fn error_display_key_derivation() {
    let err = CryptoError::KeyDerivation("bad params".into());
    assert!(err.to_string().contains("key derivation failed"));
    assert!(err.to_string().contains("bad params"));
}

#[test]
fn error_display_invalid_key_length() {
    let err = CryptoError::InvalidKeyLength {
        expected: 32,
        actual: 16,
    };
    let msg = err.to_string();
    assert!(msg.contains("32"));
    assert!(msg.contains("16"));
}

#[test]
fn error_from_serde_json() {
    let serde_err: Result<serde_json::Value, _> = serde_json::from_str("not json");
    let crypto_err: CryptoError = serde_err.unwrap_err().into();
    assert!(crypto_err.to_string().contains("serialization"));
}

#[test]
fn error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<CryptoError>();
}
