//! Recursive record traversals: encode, decode, and claim detection.
//!
//! All three walks are depth-first, pre-order, and visit mapping and
//! sequence entries through the same (key-or-index, slot) enumeration. The
//! claim check runs before the container check, so a claimed value that
//! happens to be container-shaped is treated as a leaf, not recursed into;
//! the detector agrees with the encoder on this, which is what makes its
//! verdict a faithful predictor of whether encoding will mutate anything.

use less_db_value::{Record, Value};

use crate::codec::{Codec, DecodeError};

/// Applies one codec's encode to every claimed value in the record,
/// replacing each with its tagged string form.
pub(crate) fn encode_record(record: &mut Record, codec: &dyn Codec, tag: &str) {
    for slot in record.values_mut() {
        encode_slot(slot, codec, tag);
    }
}

fn encode_slot(slot: &mut Value, codec: &dyn Codec, tag: &str) {
    if codec.claims(slot) {
        *slot = Value::String(format!("{tag}{}", codec.encode(slot)));
    } else if slot.is_container() {
        for (_, child) in slot.entries_mut() {
            encode_slot(child, codec, tag);
        }
    }
}

/// Restores every string carrying this codec's tag to its decoded value.
/// Non-string scalars are skipped; strings tagged for other codecs are left
/// alone. The first decode failure aborts the walk.
pub(crate) fn decode_record(
    record: &mut Record,
    codec: &dyn Codec,
    tag: &str,
) -> Result<(), DecodeError> {
    for slot in record.values_mut() {
        decode_slot(slot, codec, tag)?;
    }
    Ok(())
}

fn decode_slot(slot: &mut Value, codec: &dyn Codec, tag: &str) -> Result<(), DecodeError> {
    if let Value::String(text) = slot {
        if let Some(body) = text.strip_prefix(tag) {
            let decoded = codec.decode(body)?;
            *slot = decoded;
        }
        return Ok(());
    }
    if slot.is_container() {
        for (_, child) in slot.entries_mut() {
            decode_slot(child, codec, tag)?;
        }
    }
    Ok(())
}

/// Read-only scan with the encoder's visitation order: true as soon as any
/// value in the record is claimed by the codec.
pub(crate) fn record_contains_claimed(record: &Record, codec: &dyn Codec) -> bool {
    record
        .values()
        .any(|slot| slot_contains_claimed(slot, codec))
}

fn slot_contains_claimed(slot: &Value, codec: &dyn Codec) -> bool {
    if codec.claims(slot) {
        return true;
    }
    slot.entries()
        .any(|(_, child)| slot_contains_claimed(child, codec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use less_db_value::Record;

    #[derive(Debug, PartialEq, Clone)]
    struct Flag(u8);

    /// Claims `Flag` leaves; `decode` only accepts what `encode` produced.
    struct FlagCodec;

    impl Codec for FlagCodec {
        fn claims(&self, value: &Value) -> bool {
            value.downcast_opaque::<Flag>().is_some()
        }

        fn encode(&self, value: &Value) -> String {
            match value.downcast_opaque::<Flag>() {
                Some(flag) => flag.0.to_string(),
                None => panic!("FlagCodec::encode called with an unclaimed value"),
            }
        }

        fn decode(&self, text: &str) -> Result<Value, DecodeError> {
            text.parse::<u8>()
                .map(|n| Value::opaque(Flag(n)))
                .map_err(|err| DecodeError::new(format!("invalid flag {text:?}: {err}")))
        }
    }

    /// Claims any `Object`, to exercise container-shaped claimed values.
    struct ObjectCodec;

    impl Codec for ObjectCodec {
        fn claims(&self, value: &Value) -> bool {
            matches!(value, Value::Object(_))
        }

        fn encode(&self, _value: &Value) -> String {
            "obj".to_string()
        }

        fn decode(&self, _text: &str) -> Result<Value, DecodeError> {
            Ok(Value::Object(IndexMap::new()))
        }
    }

    const TAG: &str = "{Flag}:";

    fn record(fields: Vec<(&str, Value)>) -> Record {
        fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn encode_replaces_claimed_leaves_at_any_depth() {
        let mut rec = record(vec![
            ("top", Value::opaque(Flag(1))),
            (
                "nested",
                Value::Array(vec![
                    Value::Int(5),
                    Value::Object(IndexMap::from([(
                        "deep".to_string(),
                        Value::opaque(Flag(2)),
                    )])),
                ]),
            ),
        ]);
        encode_record(&mut rec, &FlagCodec, TAG);

        assert_eq!(rec["top"], Value::from("{Flag}:1"));
        let Value::Array(items) = &rec["nested"] else {
            panic!("nested must stay an array");
        };
        assert_eq!(items[0], Value::Int(5));
        let Value::Object(map) = &items[1] else {
            panic!("inner object must stay an object");
        };
        assert_eq!(map["deep"], Value::from("{Flag}:2"));
    }

    #[test]
    fn encode_leaves_unclaimed_records_untouched() {
        let mut rec = record(vec![
            ("int", Value::Int(2)),
            ("list", Value::Array(vec![Value::from("{Other}:x")])),
        ]);
        let before = rec.clone();
        encode_record(&mut rec, &FlagCodec, TAG);
        assert_eq!(rec, before);
    }

    #[test]
    fn claimed_container_is_encoded_as_a_leaf() {
        let mut rec = record(vec![(
            "cfg",
            Value::Object(IndexMap::from([(
                "inner".to_string(),
                Value::opaque(Flag(3)),
            )])),
        )]);
        encode_record(&mut rec, &ObjectCodec, "{Obj}:");
        // The object itself was claimed, so its contents were never visited.
        assert_eq!(rec["cfg"], Value::from("{Obj}:obj"));
    }

    #[test]
    fn decode_restores_tagged_strings() {
        let mut rec = record(vec![
            ("top", Value::from("{Flag}:1")),
            (
                "nested",
                Value::Array(vec![Value::from("{Flag}:2"), Value::from("plain")]),
            ),
        ]);
        decode_record(&mut rec, &FlagCodec, TAG).unwrap();

        assert_eq!(rec["top"], Value::opaque(Flag(1)));
        assert_eq!(
            rec["nested"],
            Value::Array(vec![Value::opaque(Flag(2)), Value::from("plain")])
        );
    }

    #[test]
    fn decode_skips_non_strings_and_foreign_tags() {
        let mut rec = record(vec![
            ("int", Value::Int(3)),
            ("null", Value::Null),
            ("foreign", Value::from("{Other}:1")),
        ]);
        let before = rec.clone();
        decode_record(&mut rec, &FlagCodec, TAG).unwrap();
        assert_eq!(rec, before);
    }

    #[test]
    fn decode_failure_propagates() {
        let mut rec = record(vec![("bad", Value::from("{Flag}:not-a-number"))]);
        assert!(decode_record(&mut rec, &FlagCodec, TAG).is_err());
    }

    #[test]
    fn detector_finds_claims_at_any_depth() {
        let rec = record(vec![(
            "nested",
            Value::Array(vec![Value::Object(IndexMap::from([(
                "deep".to_string(),
                Value::opaque(Flag(1)),
            )]))]),
        )]);
        assert!(record_contains_claimed(&rec, &FlagCodec));
    }

    #[test]
    fn detector_is_false_without_claims() {
        let rec = record(vec![
            ("int", Value::Int(1)),
            ("list", Value::Array(vec![Value::from("{Flag}:1")])),
        ]);
        // Tagged *strings* are not claimed values; only real Flag leaves are.
        assert!(!record_contains_claimed(&rec, &FlagCodec));
    }
}
