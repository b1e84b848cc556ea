//! Envelope Serialization Tests

use chrono::{TimeZone, Utc};
use secure_messenger::crypto::{sign_message, verify_message, CryptoError, KeyPair};
use secure_messenger::messaging::Envelope;
use serde_json::Value;

fn envelope_for(pair: &KeyPair, message: &str) -> Envelope {
    let signature = sign_message(message, pair.private_key()).unwrap();
    let timestamp = Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap();
    Envelope::build_at(message, signature, pair.public_key(), timestamp)
}

#[test]
fn test_canonical_json_shape() {
    let pair = KeyPair::generate();
    let envelope = envelope_for(&pair, "Meet at midnight");
    let value: Value = serde_json::from_str(&envelope.to_canonical().unwrap()).unwrap();

    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 4);
    assert_eq!(value["message"], "Meet at midnight");
    assert_eq!(value["timestamp"], "2025-06-30T23:59:59.000Z");
    assert_eq!(value["senderIdentity"], pair.public_key().to_hex());

    let signature = value["signature"].as_str().unwrap();
    assert_eq!(signature.len(), 128);
    assert!(signature.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_parse_preserves_every_field() {
    let pair = KeyPair::generate();
    let messages = ["", "plain", "quotes \" and \\ backslash", "emoji 🔐 and 中文"];

    for message in messages {
        let envelope = envelope_for(&pair, message);
        let parsed = Envelope::parse(&envelope.to_canonical().unwrap()).unwrap();

        assert_eq!(parsed.message(), message);
        assert_eq!(parsed.signature(), envelope.signature());
        assert_eq!(parsed.timestamp(), envelope.timestamp());
        assert_eq!(parsed.sender_identity(), pair.public_key());
        assert!(verify_message(
            parsed.message(),
            parsed.signature().as_bytes(),
            parsed.sender_identity()
        ));
    }
}

#[test]
fn test_parse_accepts_reordered_fields_and_whitespace() {
    let pair = KeyPair::generate();
    let envelope = envelope_for(&pair, "order");

    let text = format!(
        "{{\n  \"senderIdentity\": \"{}\",\n  \"timestamp\": \"{}\",\n  \"signature\": \"{}\",\n  \"message\": \"order\"\n}}",
        pair.public_key().to_hex(),
        envelope.timestamp(),
        envelope.signature().to_hex()
    );

    let parsed = Envelope::parse(&text).unwrap();
    assert_eq!(parsed, envelope);
}

#[test]
fn test_parse_accepts_uncompressed_sender_identity() {
    let pair = KeyPair::generate();
    let envelope = envelope_for(&pair, "uncompressed");

    let mut value: Value = serde_json::from_str(&envelope.to_canonical().unwrap()).unwrap();
    value["senderIdentity"] = Value::String(hex::encode(pair.public_key().to_uncompressed_bytes()));

    let parsed = Envelope::parse(&value.to_string()).unwrap();
    assert_eq!(parsed.sender_identity(), pair.public_key());
}

#[test]
fn test_malformed_inputs_are_malformed_envelope() {
    let pair = KeyPair::generate();
    let envelope = envelope_for(&pair, "hi");
    let good: Value = serde_json::from_str(&envelope.to_canonical().unwrap()).unwrap();

    let mut cases: Vec<String> = vec![
        String::new(),
        "null".to_string(),
        "[]".to_string(),
        "{}".to_string(),
        "{\"message\":\"hi\"".to_string(),
    ];

    for field in ["message", "signature", "timestamp", "senderIdentity"] {
        let mut missing = good.clone();
        missing.as_object_mut().unwrap().remove(field);
        cases.push(missing.to_string());
    }

    let mutations: [(&str, Value); 6] = [
        ("message", Value::from(42)),
        ("signature", Value::String("00".repeat(63))),
        ("signature", Value::String("gg".repeat(64))),
        ("timestamp", Value::String("2025-13-45".to_string())),
        ("senderIdentity", Value::String("02".to_string())),
        ("senderIdentity", Value::String(format!("02{}", "ff".repeat(32)))),
    ];
    for (field, replacement) in mutations {
        let mut mutated = good.clone();
        mutated[field] = replacement;
        cases.push(mutated.to_string());
    }

    for case in cases {
        let result = Envelope::parse(&case);
        assert!(
            matches!(result, Err(CryptoError::MalformedEnvelope { .. })),
            "expected MalformedEnvelope for {:?}, got {:?}",
            case,
            result
        );
    }
}

#[test]
fn test_signature_binds_message_not_envelope() {
    // Swapping in another message keeps the envelope well formed; only
    // signature verification can catch it
    let pair = KeyPair::generate();
    let envelope = envelope_for(&pair, "pay 10");

    let mut value: Value = serde_json::from_str(&envelope.to_canonical().unwrap()).unwrap();
    value["message"] = Value::String("pay 1000".to_string());

    let parsed = Envelope::parse(&value.to_string()).unwrap();
    assert!(!verify_message(
        parsed.message(),
        parsed.signature().as_bytes(),
        parsed.sender_identity()
    ));
}
