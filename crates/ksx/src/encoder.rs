//! 🔐 Payload Encoder: the customs desk between the caller and the wire.
//!
//! Every record gets its passport checked here. Data too big? Rejected.
//! Partition key empty? Rejected. Explicit hash key spelled like a phone number
//! with dashes? Rejected. A batch with one bad record? The WHOLE batch goes home.
//! We do not partially encode. Half a batch on the wire is a full round trip wasted.
//!
//! 🧠 Knowledge graph:
//! - `encode(Record) -> EncodedRecord`: per-record limits, no I/O.
//! - `encode_batch(stream, records) -> BatchRequest`: per-record limits plus the
//!   500-record / 5 MiB batch ceiling.
//! - Only place that constructs `EncodedRecord` / `BatchRequest`. Holding one is proof of validity.

use crate::common::{BatchRequest, EncodedRecord, Record};
use crate::errors::ValidationError;

pub const MIN_DATA_BYTES: usize = 1;
pub const MAX_DATA_BYTES: usize = 1024 * 1024;
pub const MIN_PARTITION_KEY_CHARS: usize = 1;
pub const MAX_PARTITION_KEY_CHARS: usize = 256;
pub const MAX_BATCH_RECORDS: usize = 500;
pub const MAX_BATCH_BYTES: usize = 5 * 1024 * 1024;

/// 🛂 Validate one record and turn it into its wire-ready form.
pub fn encode(record: Record) -> Result<EncodedRecord, ValidationError> {
    let data_len = record.data.len();
    if !(MIN_DATA_BYTES..=MAX_DATA_BYTES).contains(&data_len) {
        return Err(ValidationError::DataSize {
            actual: data_len,
            min: MIN_DATA_BYTES,
            max: MAX_DATA_BYTES,
        });
    }

    // -- 🔤 characters, not bytes. "ü" is one key character even though UTF-8 spends two bytes on it.
    let key_chars = record.partition_key.chars().count();
    if !(MIN_PARTITION_KEY_CHARS..=MAX_PARTITION_KEY_CHARS).contains(&key_chars) {
        return Err(ValidationError::PartitionKeyLength {
            actual: key_chars,
            min: MIN_PARTITION_KEY_CHARS,
            max: MAX_PARTITION_KEY_CHARS,
        });
    }

    if let Some(ref hash_key) = record.explicit_hash_key {
        validate_explicit_hash_key(hash_key)?;
    }

    let size_bytes = data_len + record.partition_key.len();
    Ok(EncodedRecord {
        data: record.data,
        partition_key: record.partition_key,
        explicit_hash_key: record.explicit_hash_key,
        size_bytes,
    })
}

/// 📦 Validate a whole batch. All or nothing.
///
/// Record-level problems are reported with the offending index. Count and byte
/// ceilings are checked after every record passed, so the byte total is exact.
pub fn encode_batch(
    stream_name: impl Into<String>,
    records: Vec<Record>,
) -> Result<BatchRequest, ValidationError> {
    let stream_name = stream_name.into();
    if stream_name.is_empty() {
        return Err(ValidationError::EmptyStreamName);
    }

    // 🚪 count check first: no point validating record 501 of a batch that can't ship anyway
    if records.is_empty() || records.len() > MAX_BATCH_RECORDS {
        return Err(ValidationError::BatchCount {
            actual: records.len(),
            max: MAX_BATCH_RECORDS,
        });
    }

    let mut encoded = Vec::with_capacity(records.len());
    let mut total_bytes = 0usize;
    for (index, record) in records.into_iter().enumerate() {
        let record = encode(record).map_err(|source| ValidationError::Record {
            index,
            source: Box::new(source),
        })?;
        total_bytes += record.size_bytes;
        encoded.push(record);
    }

    if total_bytes > MAX_BATCH_BYTES {
        return Err(ValidationError::BatchBytes {
            actual: total_bytes,
            max: MAX_BATCH_BYTES,
        });
    }

    Ok(BatchRequest {
        stream_name,
        records: encoded,
        total_bytes,
    })
}

/// 🔢 Decimal digits only, and it has to fit in a u128.
/// `u128::from_str` happily accepts a leading '+', the service does not.
fn validate_explicit_hash_key(hash_key: &str) -> Result<(), ValidationError> {
    let all_digits = !hash_key.is_empty() && hash_key.bytes().all(|b| b.is_ascii_digit());
    if all_digits && hash_key.parse::<u128>().is_ok() {
        Ok(())
    } else {
        Err(ValidationError::ExplicitHashKey(hash_key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a_record(data_len: usize, key: &str) -> Record {
        Record::new(vec![b'x'; data_len], key)
    }

    #[test]
    fn the_one_where_the_boundaries_are_inclusive() {
        assert!(encode(a_record(1, "k")).is_ok());
        assert!(encode(a_record(MAX_DATA_BYTES, "k")).is_ok());
        assert!(encode(a_record(3, &"k".repeat(256))).is_ok());
    }

    #[test]
    fn the_one_where_empty_and_oversized_data_get_bounced() {
        assert_eq!(
            encode(a_record(0, "k")),
            Err(ValidationError::DataSize {
                actual: 0,
                min: 1,
                max: MAX_DATA_BYTES
            })
        );
        assert!(matches!(
            encode(a_record(MAX_DATA_BYTES + 1, "k")),
            Err(ValidationError::DataSize { actual, .. }) if actual == MAX_DATA_BYTES + 1
        ));
    }

    #[test]
    fn the_one_where_partition_keys_are_counted_in_characters() {
        // 🧪 256 two-byte characters: 512 bytes, still a legal key
        let the_umlaut_key = "ü".repeat(256);
        let the_encoded = encode(a_record(10, &the_umlaut_key)).expect("256 chars is legal");
        assert_eq!(the_encoded.size_bytes(), 10 + 512);

        assert!(matches!(
            encode(a_record(10, &"ü".repeat(257))),
            Err(ValidationError::PartitionKeyLength { actual: 257, .. })
        ));
        assert!(matches!(
            encode(a_record(10, "")),
            Err(ValidationError::PartitionKeyLength { actual: 0, .. })
        ));
    }

    #[test]
    fn the_one_where_explicit_hash_keys_must_be_honest_u128s() {
        let max = u128::MAX.to_string();
        assert!(encode(a_record(1, "k").with_explicit_hash_key(max.clone())).is_ok());
        assert!(encode(a_record(1, "k").with_explicit_hash_key("0")).is_ok());

        let too_big = format!("{max}0");
        for nope in [too_big.as_str(), "+5", "-1", "12ab", ""] {
            assert_eq!(
                encode(a_record(1, "k").with_explicit_hash_key(nope)),
                Err(ValidationError::ExplicitHashKey(nope.to_string())),
                "{nope:?} should be rejected"
            );
        }
    }

    #[test]
    fn the_one_where_one_bad_apple_spoils_the_batch() {
        let records = vec![a_record(5, "a"), a_record(MAX_DATA_BYTES + 1, "b"), a_record(5, "c")];
        match encode_batch("orders", records) {
            Err(ValidationError::Record { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, ValidationError::DataSize { .. }));
            }
            other => panic!("💀 expected a record-level rejection, got {other:?}"),
        }
    }

    #[test]
    fn the_one_where_batch_ceilings_are_enforced() {
        assert_eq!(
            encode_batch("orders", vec![]),
            Err(ValidationError::BatchCount { actual: 0, max: 500 })
        );
        assert_eq!(
            encode_batch("orders", vec![a_record(1, "k"); 501]),
            Err(ValidationError::BatchCount { actual: 501, max: 500 })
        );
        assert_eq!(
            encode_batch("", vec![a_record(1, "k")]),
            Err(ValidationError::EmptyStreamName)
        );

        // 📏 six records of 1 MiB minus one byte of data plus a 1-byte key: exactly 6 MiB
        let chunky = vec![a_record(MAX_DATA_BYTES - 1, "k"); 6];
        assert_eq!(
            encode_batch("orders", chunky),
            Err(ValidationError::BatchBytes {
                actual: 6 * MAX_DATA_BYTES,
                max: MAX_BATCH_BYTES
            })
        );
    }

    #[test]
    fn the_one_where_total_bytes_is_the_sum_of_its_parts() {
        let the_batch = encode_batch(
            "orders",
            vec![a_record(3, "ab"), a_record(10, "xyz"), a_record(1, "k")],
        )
        .expect("valid batch");
        assert_eq!(the_batch.len(), 3);
        assert_eq!(the_batch.total_bytes(), (3 + 2) + (10 + 3) + (1 + 1));
        assert_eq!(
            the_batch.total_bytes(),
            the_batch.records().iter().map(|r| r.size_bytes()).sum::<usize>()
        );

        // 📏 exactly 5 MiB is still fine
        let exactly_five = vec![a_record(MAX_DATA_BYTES - 1, "k"); 5];
        assert_eq!(
            encode_batch("orders", exactly_five).map(|b| b.total_bytes()),
            Ok(MAX_BATCH_BYTES)
        );
    }
}
