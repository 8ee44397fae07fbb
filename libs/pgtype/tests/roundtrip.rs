use bytes::BytesMut;
use plfm_pgtype::{
    encode_uuid, parse_uuid, BinaryDecoder, BinaryEncoder, DriverValue, IsNull, Scanner,
    TextDecoder, TextEncoder, Uuid, Valuer, Value,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parse_inverts_format(bytes in any::<[u8; 16]>()) {
        let text = encode_uuid(&bytes);
        prop_assert_eq!(text.len(), 36);
        prop_assert_eq!(text.to_lowercase(), text.clone());
        prop_assert_eq!(parse_uuid(&text).unwrap(), bytes);
    }

    #[test]
    fn binary_roundtrip(bytes in any::<[u8; 16]>()) {
        let uuid = Uuid::from_bytes(bytes);
        let mut buf = BytesMut::new();
        prop_assert_eq!(uuid.encode_binary(&mut buf).unwrap(), IsNull::No);

        let mut decoded = Uuid::new();
        decoded.decode_binary(Some(&buf[..])).unwrap();
        prop_assert_eq!(decoded, uuid);
    }

    #[test]
    fn text_roundtrip(bytes in any::<[u8; 16]>()) {
        let uuid = Uuid::from_bytes(bytes);
        let mut buf = BytesMut::new();
        prop_assert_eq!(uuid.encode_text(&mut buf).unwrap(), IsNull::No);

        let mut decoded = Uuid::new();
        decoded.decode_text(Some(&buf[..])).unwrap();
        prop_assert_eq!(decoded, uuid);
    }

    #[test]
    fn json_roundtrip(bytes in any::<[u8; 16]>()) {
        let uuid = Uuid::from_bytes(bytes);
        let json = uuid.marshal_json();
        prop_assert_eq!(json.len(), 38);

        let mut decoded = Uuid::new();
        decoded.unmarshal_json(&json).unwrap();
        prop_assert_eq!(decoded, uuid);
    }

    #[test]
    fn driver_roundtrip(bytes in any::<[u8; 16]>()) {
        let uuid = Uuid::from_bytes(bytes);
        let cell = uuid.value().unwrap();

        let mut scanned = Uuid::new();
        scanned.scan(&cell).unwrap();
        prop_assert_eq!(scanned, uuid);
    }

    #[test]
    fn set_get_roundtrip(bytes in any::<[u8; 16]>()) {
        let mut uuid = Uuid::new();
        uuid.set(bytes.to_vec()).unwrap();
        prop_assert_eq!(uuid.get(), Value::Uuid(bytes));

        let mut copy = Uuid::new();
        copy.set(uuid.get()).unwrap();
        prop_assert_eq!(copy, uuid);
    }

    #[test]
    fn wrong_binary_length_rejected(len in 0usize..64) {
        prop_assume!(len != 16);
        let mut uuid = Uuid::new();
        let err = uuid.decode_binary(Some(vec![0u8; len].as_slice())).unwrap_err();
        prop_assert!(err.is_length_mismatch());
    }
}

#[test]
fn null_is_null_everywhere() {
    let mut uuid = Uuid::from_bytes([1; 16]);
    uuid.set(Value::Null).unwrap();
    assert_eq!(uuid.get(), Value::Null);

    let mut buf = BytesMut::new();
    assert_eq!(uuid.encode_text(&mut buf).unwrap(), IsNull::Yes);
    assert_eq!(uuid.encode_binary(&mut buf).unwrap(), IsNull::Yes);
    assert!(buf.is_empty());

    assert_eq!(uuid.marshal_json(), b"null");
    assert_eq!(uuid.value().unwrap(), DriverValue::Null);
    assert_eq!(serde_json::to_string(&uuid).unwrap(), "null");
}

#[test]
fn batches_many_values_into_one_buffer() {
    let values = [Uuid::from_bytes([0xaa; 16]), Uuid::new(), Uuid::from_bytes([0x01; 16])];
    let mut buf = BytesMut::new();
    let nulls: Vec<IsNull> = values
        .iter()
        .map(|v| v.encode_binary(&mut buf).unwrap())
        .collect();

    assert_eq!(nulls, vec![IsNull::No, IsNull::Yes, IsNull::No]);
    assert_eq!(buf.len(), 32);
    assert_eq!(&buf[..16], &[0xaa; 16]);
    assert_eq!(&buf[16..], &[0x01; 16]);
}
