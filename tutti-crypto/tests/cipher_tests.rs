use std::error::Error;
use tutti_crypto::{EncryptedData, NONCE_SIZE, SymmetricKey, TAG_SIZE, decrypt, encrypt};

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = SymmetricKey::generate();
    let plaintext = b"db-password=hunter2";
    let encrypted = encrypt(&key, plaintext).unwrap();
    let decrypted = decrypt(&key, &encrypted).unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn encrypt_decrypt_empty() {
    let key = SymmetricKey::generate();
    let encrypted = encrypt(&key, b"").unwrap();
    assert_eq!(encrypted.ciphertext.len(), TAG_SIZE);
    assert_eq!(decrypt(&key, &encrypted).unwrap(), b"");
}

#[test]
fn wrong_key_fails_decryption() {
    let encrypted = encrypt(&SymmetricKey::generate(), b"Secret").unwrap();
    let err = decrypt(&SymmetricKey::generate(), &encrypted).unwrap_err();
    assert!(err.is_decryption_failure());
    let cause = err.source().unwrap();
    assert!(cause.downcast_ref::<chacha20poly1305::aead::Error>().is_some());
}

#[test]
fn tampered_data_fails_decryption() {
    let key = SymmetricKey::generate();
    let mut encrypted = encrypt(&key, b"Secret").unwrap();
    encrypted.ciphertext[0] ^= 0xFF;
    assert!(decrypt(&key, &encrypted).is_err());
}

#[test]
fn same_plaintext_produces_different_ciphertext() {
    let key = SymmetricKey::generate();
    let e1 = encrypt(&key, b"Same").unwrap();
    let e2 = encrypt(&key, b"Same").unwrap();
    assert_ne!(e1.nonce, e2.nonce);
    assert_ne!(e1.ciphertext, e2.ciphertext);
}

// ── EncryptedData ────────────────────────────────────────────────

#[test]
fn encrypted_data_len() {
    let encrypted = encrypt(&SymmetricKey::generate(), b"test").unwrap();
    assert_eq!(encrypted.len(), NONCE_SIZE + encrypted.ciphertext.len());
}

#[test]
fn base64_roundtrip() {
    let encrypted = encrypt(&SymmetricKey::generate(), b"Data").unwrap();
    let decoded = EncryptedData::from_base64(&encrypted.to_base64()).unwrap();
    assert_eq!(decoded, encrypted);
}

#[test]
fn base64_too_short_fails() {
    use base64::{Engine, engine::general_purpose::STANDARD};
    let short = STANDARD.encode([0u8; 10]);
    let err = EncryptedData::from_base64(&short).unwrap_err();
    assert!(err.is_decryption_failure());
}

#[test]
fn base64_invalid_fails() {
    assert!(EncryptedData::from_base64("!!!not-base64!!!").is_err());
}

#[test]
fn base64_output_is_delimiter_free() {
    let encrypted = encrypt(&SymmetricKey::generate(), &[0xFFu8; 64]).unwrap();
    let encoded = encrypted.to_base64();
    assert!(!encoded.contains([':', ';', '|']));
}

#[test]
fn encrypted_data_serde_roundtrip() {
    let encrypted = encrypt(&SymmetricKey::generate(), b"test").unwrap();
    let json = serde_json::to_string(&encrypted).unwrap();
    let parsed: EncryptedData = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, encrypted);
}

#[test]
fn framed_bytes_put_nonce_first() {
    let encrypted = encrypt(&SymmetricKey::generate(), b"frame me").unwrap();
    let framed = encrypted.to_bytes();
    assert_eq!(framed.len(), encrypted.len());
    assert_eq!(&framed[..NONCE_SIZE], &encrypted.nonce[..]);
    assert_eq!(EncryptedData::from_bytes(&framed).unwrap(), encrypted);
}

#[test]
fn framed_bytes_shorter_than_nonce_and_tag_fail() {
    let err = EncryptedData::from_bytes(&[0u8; NONCE_SIZE + TAG_SIZE - 1]).unwrap_err();
    assert!(err.is_decryption_failure());
}
