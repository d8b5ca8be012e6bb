//! Logical-to-physical literal encoding.
//!
//! Encoders form an explicit registry keyed by the column's physical type
//! and logical annotation: [`Encoder::select`] is looked up once per filter
//! leaf, and every combination it does not list is unsupported rather than
//! coerced.

use chrono::{LocalResult, TimeZone};
use chrono_tz::Tz;
use datafusion_common::ScalarValue;
use parquet::{
    basic::{LogicalType, TimeUnit, Type as PhysicalType},
    data_type::ByteArray,
};

use crate::{options::TranslatorOptions, predicate::PhysicalValue, schema::ColumnInfo};

const MICROS_PER_MILLI: i64 = 1_000;
const MICROS_PER_SECOND: i64 = 1_000_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Stored resolution of a timestamp column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimestampUnit {
    Millis,
    Micros,
}

/// One entry of the encoder registry.
///
/// Selection fixes everything the encoding depends on (unit, scale,
/// declared width), so [`encode`](Self::encode) is a pure function of the
/// literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Encoder {
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    Utf8,
    Binary,
    Date,
    Timestamp {
        unit: TimestampUnit,
        adjusted_to_utc: bool,
    },
    DecimalInt32 {
        scale: i32,
    },
    DecimalInt64 {
        scale: i32,
    },
    DecimalFixed {
        scale: i32,
        length: usize,
    },
}

impl Encoder {
    /// Look up the encoder for a column, honoring the pushdown toggles.
    ///
    /// Returns `None` for every combination with no safe physical
    /// encoding; the caller treats that as "no predicate" for the leaf.
    pub(crate) fn select(column: &ColumnInfo, options: &TranslatorOptions) -> Option<Encoder> {
        match (column.physical_type(), column.logical_type()) {
            (PhysicalType::BOOLEAN, None) => Some(Encoder::Boolean),
            (PhysicalType::INT32, None) => Some(Encoder::Int32),
            (
                PhysicalType::INT32,
                Some(LogicalType::Integer {
                    bit_width: 8 | 16 | 32,
                    is_signed: true,
                }),
            ) => Some(Encoder::Int32),
            (PhysicalType::INT64, None) => Some(Encoder::Int64),
            (
                PhysicalType::INT64,
                Some(LogicalType::Integer {
                    bit_width: 64,
                    is_signed: true,
                }),
            ) => Some(Encoder::Int64),
            (PhysicalType::FLOAT, None) => Some(Encoder::Float),
            (PhysicalType::DOUBLE, None) => Some(Encoder::Double),
            (PhysicalType::BYTE_ARRAY, Some(LogicalType::String)) => Some(Encoder::Utf8),
            (PhysicalType::BYTE_ARRAY, None) => Some(Encoder::Binary),
            (PhysicalType::INT32, Some(LogicalType::Date)) if options.push_down_date() => {
                Some(Encoder::Date)
            }
            (
                PhysicalType::INT64,
                Some(LogicalType::Timestamp {
                    is_adjusted_to_u_t_c,
                    unit,
                }),
            ) if options.push_down_timestamp() => {
                let unit = match unit {
                    TimeUnit::MILLIS(_) => TimestampUnit::Millis,
                    TimeUnit::MICROS(_) => TimestampUnit::Micros,
                    _ => return None,
                };
                Some(Encoder::Timestamp {
                    unit,
                    adjusted_to_utc: *is_adjusted_to_u_t_c,
                })
            }
            (PhysicalType::INT32, Some(LogicalType::Decimal { scale, .. }))
                if options.push_down_decimal() =>
            {
                Some(Encoder::DecimalInt32 { scale: *scale })
            }
            (PhysicalType::INT64, Some(LogicalType::Decimal { scale, .. }))
                if options.push_down_decimal() =>
            {
                Some(Encoder::DecimalInt64 { scale: *scale })
            }
            (PhysicalType::FIXED_LEN_BYTE_ARRAY, Some(LogicalType::Decimal { scale, .. }))
                if options.push_down_decimal() && column.type_length() > 0 =>
            {
                Some(Encoder::DecimalFixed {
                    scale: *scale,
                    length: column.type_length() as usize,
                })
            }
            _ => None,
        }
    }

    /// Encode a logical literal into the column's physical representation.
    ///
    /// A null literal of any kind encodes to the typed null marker. A
    /// non-null literal whose runtime kind does not match the column (or
    /// whose decimal scale differs from the declared scale, or whose value
    /// does not fit the physical width) returns `None`.
    pub(crate) fn encode(&self, value: &ScalarValue, session_timezone: Tz) -> Option<PhysicalValue> {
        if value.is_null() {
            return Some(self.null_marker());
        }
        match self {
            Encoder::Boolean => match value {
                ScalarValue::Boolean(Some(v)) => Some(PhysicalValue::Boolean(Some(*v))),
                _ => None,
            },
            Encoder::Int32 => {
                let wide = integral_value(value)?;
                let narrow = i32::try_from(wide).ok()?;
                Some(PhysicalValue::Int32(Some(narrow)))
            }
            Encoder::Int64 => Some(PhysicalValue::Int64(Some(integral_value(value)?))),
            Encoder::Float => match value {
                ScalarValue::Float32(Some(v)) => Some(PhysicalValue::Float(Some(*v))),
                _ => None,
            },
            Encoder::Double => match value {
                ScalarValue::Float64(Some(v)) => Some(PhysicalValue::Double(Some(*v))),
                _ => None,
            },
            Encoder::Utf8 => match value {
                ScalarValue::Utf8(Some(s))
                | ScalarValue::LargeUtf8(Some(s))
                | ScalarValue::Utf8View(Some(s)) => {
                    Some(PhysicalValue::Bytes(Some(ByteArray::from(s.as_str()))))
                }
                _ => None,
            },
            Encoder::Binary => match value {
                ScalarValue::Binary(Some(v))
                | ScalarValue::LargeBinary(Some(v))
                | ScalarValue::BinaryView(Some(v)) => {
                    Some(PhysicalValue::Bytes(Some(ByteArray::from(v.clone()))))
                }
                _ => None,
            },
            Encoder::Date => match value {
                ScalarValue::Date32(Some(days)) => Some(PhysicalValue::Int32(Some(*days))),
                ScalarValue::Date64(Some(millis)) => {
                    let days = i32::try_from(millis.div_euclid(MILLIS_PER_DAY)).ok()?;
                    Some(PhysicalValue::Int32(Some(days)))
                }
                _ => None,
            },
            Encoder::Timestamp {
                unit,
                adjusted_to_utc,
            } => {
                let micros = timestamp_micros(value)?;
                let instant = if *adjusted_to_utc {
                    micros
                } else {
                    local_to_utc_micros(micros, session_timezone)?
                };
                let encoded = match unit {
                    TimestampUnit::Micros => instant,
                    TimestampUnit::Millis => instant.div_euclid(MICROS_PER_MILLI),
                };
                Some(PhysicalValue::Int64(Some(encoded)))
            }
            Encoder::DecimalInt32 { scale } => {
                let unscaled = decimal_unscaled(value, *scale)?;
                let narrow = i32::try_from(unscaled).ok()?;
                Some(PhysicalValue::Int32(Some(narrow)))
            }
            Encoder::DecimalInt64 { scale } => {
                let unscaled = decimal_unscaled(value, *scale)?;
                let wide = i64::try_from(unscaled).ok()?;
                Some(PhysicalValue::Int64(Some(wide)))
            }
            Encoder::DecimalFixed { scale, length } => {
                let unscaled = decimal_unscaled(value, *scale)?;
                let bytes = sign_extend_be(unscaled, *length)?;
                Some(PhysicalValue::Bytes(Some(ByteArray::from(bytes))))
            }
        }
    }

    /// Typed "no value" marker for this encoder's output kind.
    fn null_marker(&self) -> PhysicalValue {
        match self {
            Encoder::Boolean => PhysicalValue::Boolean(None),
            Encoder::Int32 | Encoder::Date | Encoder::DecimalInt32 { .. } => {
                PhysicalValue::Int32(None)
            }
            Encoder::Int64 | Encoder::Timestamp { .. } | Encoder::DecimalInt64 { .. } => {
                PhysicalValue::Int64(None)
            }
            Encoder::Float => PhysicalValue::Float(None),
            Encoder::Double => PhysicalValue::Double(None),
            Encoder::Utf8 | Encoder::Binary | Encoder::DecimalFixed { .. } => {
                PhysicalValue::Bytes(None)
            }
        }
    }
}

fn integral_value(value: &ScalarValue) -> Option<i64> {
    match value {
        ScalarValue::Int8(Some(v)) => Some(i64::from(*v)),
        ScalarValue::Int16(Some(v)) => Some(i64::from(*v)),
        ScalarValue::Int32(Some(v)) => Some(i64::from(*v)),
        ScalarValue::Int64(Some(v)) => Some(*v),
        _ => None,
    }
}

fn timestamp_micros(value: &ScalarValue) -> Option<i64> {
    match value {
        ScalarValue::TimestampSecond(Some(v), _) => v.checked_mul(MICROS_PER_SECOND),
        ScalarValue::TimestampMillisecond(Some(v), _) => v.checked_mul(MICROS_PER_MILLI),
        ScalarValue::TimestampMicrosecond(Some(v), _) => Some(*v),
        // Nanosecond literals would need truncation, which can flip ordered
        // comparisons; refuse instead.
        _ => None,
    }
}

/// Reinterpret a wall-clock reading in the session timezone as a UTC instant.
///
/// Readings inside a DST gap or overlap have zero or two instants; both
/// cases refuse rather than guess an offset.
fn local_to_utc_micros(micros: i64, tz: Tz) -> Option<i64> {
    let wall = chrono::DateTime::from_timestamp_micros(micros)?.naive_utc();
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(instant) => Some(instant.timestamp_micros()),
        LocalResult::Ambiguous(_, _) | LocalResult::None => None,
    }
}

/// Unscaled value of a decimal literal whose scale equals the column's
/// declared scale exactly. Any other scale refuses; rescaling here would
/// corrupt comparisons.
fn decimal_unscaled(value: &ScalarValue, scale: i32) -> Option<i128> {
    match value {
        ScalarValue::Decimal128(Some(v), _, s) if i32::from(*s) == scale => Some(*v),
        ScalarValue::Decimal256(Some(v), _, s) if i32::from(*s) == scale => v.to_i128(),
        _ => None,
    }
}

/// Two's-complement big-endian encoding of `value`, sign-extended to
/// exactly `length` bytes. Values that do not fit return `None`.
fn sign_extend_be(value: i128, length: usize) -> Option<Vec<u8>> {
    if length == 0 {
        return None;
    }
    let wide = value.to_be_bytes();
    let pad = if value < 0 { 0xffu8 } else { 0x00 };
    if length >= wide.len() {
        let mut out = vec![pad; length - wide.len()];
        out.extend_from_slice(&wide);
        return Some(out);
    }
    let (dropped, kept) = wide.split_at(wide.len() - length);
    if dropped.iter().any(|byte| *byte != pad) {
        return None;
    }
    // The kept high bit must still agree with the sign.
    if (kept[0] & 0x80 != 0) != (value < 0) {
        return None;
    }
    Some(kept.to_vec())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parquet::schema::{parser::parse_message_type, types::SchemaDescriptor};

    use super::*;
    use crate::schema::SchemaIndex;

    fn index(message: &str) -> SchemaIndex {
        let schema = SchemaDescriptor::new(Arc::new(parse_message_type(message).unwrap()));
        SchemaIndex::new(&schema, true)
    }

    fn encoder_for(message: &str, column: &str, options: &TranslatorOptions) -> Option<Encoder> {
        let index = index(message);
        Encoder::select(index.resolve(column).unwrap(), options)
    }

    fn encode(encoder: Encoder, value: ScalarValue) -> Option<PhysicalValue> {
        encoder.encode(&value, chrono_tz::UTC)
    }

    #[test]
    fn selects_by_physical_and_logical_type() {
        let options = TranslatorOptions::default();
        let message = "message test {
            required boolean flag;
            required int32 age;
            required int32 small (INTEGER(16,true));
            required int64 count;
            required float ratio;
            required double score;
            required binary name (STRING);
            required binary raw;
            required int32 birthday (DATE);
            required int64 created (TIMESTAMP(MICROS,true));
            required int32 price (DECIMAL(9,2));
            required int96 legacy;
            required binary doc (JSON);
            required int32 elapsed (TIME(MILLIS,true));
        }";
        assert_eq!(encoder_for(message, "flag", &options), Some(Encoder::Boolean));
        assert_eq!(encoder_for(message, "age", &options), Some(Encoder::Int32));
        assert_eq!(encoder_for(message, "small", &options), Some(Encoder::Int32));
        assert_eq!(encoder_for(message, "count", &options), Some(Encoder::Int64));
        assert_eq!(encoder_for(message, "ratio", &options), Some(Encoder::Float));
        assert_eq!(encoder_for(message, "score", &options), Some(Encoder::Double));
        assert_eq!(encoder_for(message, "name", &options), Some(Encoder::Utf8));
        assert_eq!(encoder_for(message, "raw", &options), Some(Encoder::Binary));
        assert_eq!(encoder_for(message, "birthday", &options), Some(Encoder::Date));
        assert_eq!(
            encoder_for(message, "created", &options),
            Some(Encoder::Timestamp {
                unit: TimestampUnit::Micros,
                adjusted_to_utc: true
            })
        );
        assert_eq!(
            encoder_for(message, "price", &options),
            Some(Encoder::DecimalInt32 { scale: 2 })
        );
        assert_eq!(encoder_for(message, "legacy", &options), None);
        assert_eq!(encoder_for(message, "doc", &options), None);
        assert_eq!(encoder_for(message, "elapsed", &options), None);
    }

    #[test]
    fn gated_types_fall_back_to_unsupported() {
        let options = TranslatorOptions::builder()
            .push_down_date(false)
            .push_down_timestamp(false)
            .push_down_decimal(false)
            .build();
        let message = "message test {
            required int32 birthday (DATE);
            required int64 created (TIMESTAMP(MICROS,true));
            required int32 price (DECIMAL(9,2));
        }";
        assert_eq!(encoder_for(message, "birthday", &options), None);
        assert_eq!(encoder_for(message, "created", &options), None);
        assert_eq!(encoder_for(message, "price", &options), None);
    }

    #[test]
    fn nanosecond_storage_is_unsupported() {
        let options = TranslatorOptions::default();
        let message = "message test { required int64 t (TIMESTAMP(NANOS,true)); }";
        assert_eq!(encoder_for(message, "t", &options), None);
    }

    #[test]
    fn integral_widening_is_checked() {
        assert_eq!(
            encode(Encoder::Int32, ScalarValue::Int8(Some(5))),
            Some(PhysicalValue::Int32(Some(5)))
        );
        assert_eq!(
            encode(Encoder::Int32, ScalarValue::Int64(Some(7))),
            Some(PhysicalValue::Int32(Some(7)))
        );
        assert_eq!(encode(Encoder::Int32, ScalarValue::Int64(Some(1 << 40))), None);
        assert_eq!(
            encode(Encoder::Int64, ScalarValue::Int16(Some(-3))),
            Some(PhysicalValue::Int64(Some(-3)))
        );
        assert_eq!(encode(Encoder::Int32, ScalarValue::Utf8(Some("5".into()))), None);
    }

    #[test]
    fn floats_require_exact_kind() {
        assert_eq!(
            encode(Encoder::Float, ScalarValue::Float32(Some(1.5))),
            Some(PhysicalValue::Float(Some(1.5)))
        );
        assert_eq!(encode(Encoder::Float, ScalarValue::Float64(Some(1.5))), None);
        assert_eq!(encode(Encoder::Double, ScalarValue::Float32(Some(1.5))), None);
    }

    #[test]
    fn null_encodes_to_typed_marker_not_zero() {
        assert_eq!(
            encode(Encoder::Int32, ScalarValue::Int32(None)),
            Some(PhysicalValue::Int32(None))
        );
        assert_eq!(
            encode(Encoder::Utf8, ScalarValue::Utf8(None)),
            Some(PhysicalValue::Bytes(None))
        );
        assert_eq!(
            encode(Encoder::Utf8, ScalarValue::Null),
            Some(PhysicalValue::Bytes(None))
        );
        // Empty string is a value, not the null marker.
        assert_eq!(
            encode(Encoder::Utf8, ScalarValue::Utf8(Some(String::new()))),
            Some(PhysicalValue::Bytes(Some(ByteArray::from(Vec::new()))))
        );
    }

    #[test]
    fn date_encodes_day_offsets() {
        assert_eq!(
            encode(Encoder::Date, ScalarValue::Date32(Some(19_000))),
            Some(PhysicalValue::Int32(Some(19_000)))
        );
        assert_eq!(
            encode(Encoder::Date, ScalarValue::Date64(Some(3 * MILLIS_PER_DAY))),
            Some(PhysicalValue::Int32(Some(3)))
        );
        assert_eq!(
            encode(Encoder::Date, ScalarValue::Date64(Some(-1))),
            Some(PhysicalValue::Int32(Some(-1)))
        );
    }

    #[test]
    fn utc_adjusted_timestamps_skip_zone_math() {
        let micros = Encoder::Timestamp {
            unit: TimestampUnit::Micros,
            adjusted_to_utc: true,
        };
        let value = ScalarValue::TimestampMicrosecond(Some(1_650_000_000_123_456), None);
        assert_eq!(
            micros.encode(&value, chrono_tz::America::New_York),
            Some(PhysicalValue::Int64(Some(1_650_000_000_123_456)))
        );

        let millis = Encoder::Timestamp {
            unit: TimestampUnit::Millis,
            adjusted_to_utc: true,
        };
        assert_eq!(
            millis.encode(&value, chrono_tz::America::New_York),
            Some(PhysicalValue::Int64(Some(1_650_000_000_123)))
        );
    }

    #[test]
    fn local_timestamps_normalize_through_session_timezone() {
        // Etc/GMT+5 is five hours behind UTC; midnight wall clock is 05:00Z.
        let tz: Tz = "Etc/GMT+5".parse().unwrap();
        let encoder = Encoder::Timestamp {
            unit: TimestampUnit::Micros,
            adjusted_to_utc: false,
        };
        let wall_midnight = ScalarValue::TimestampMicrosecond(Some(0), None);
        assert_eq!(
            encoder.encode(&wall_midnight, tz),
            Some(PhysicalValue::Int64(Some(5 * 3600 * MICROS_PER_SECOND)))
        );

        let millis = Encoder::Timestamp {
            unit: TimestampUnit::Millis,
            adjusted_to_utc: false,
        };
        assert_eq!(
            millis.encode(&wall_midnight, tz),
            Some(PhysicalValue::Int64(Some(5 * 3600 * MICROS_PER_MILLI)))
        );
    }

    #[test]
    fn wall_clock_in_dst_gap_refuses() {
        // 2021-03-14 02:30 never happened in New York.
        let gap = chrono::NaiveDate::from_ymd_opt(2021, 3, 14)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp_micros();
        let encoder = Encoder::Timestamp {
            unit: TimestampUnit::Micros,
            adjusted_to_utc: false,
        };
        let value = ScalarValue::TimestampMicrosecond(Some(gap), None);
        assert_eq!(encoder.encode(&value, chrono_tz::America::New_York), None);
    }

    #[test]
    fn coarser_timestamp_literals_widen_exactly() {
        let encoder = Encoder::Timestamp {
            unit: TimestampUnit::Micros,
            adjusted_to_utc: true,
        };
        assert_eq!(
            encoder.encode(&ScalarValue::TimestampMillisecond(Some(12), None), chrono_tz::UTC),
            Some(PhysicalValue::Int64(Some(12_000)))
        );
        assert_eq!(
            encoder.encode(&ScalarValue::TimestampSecond(Some(2), None), chrono_tz::UTC),
            Some(PhysicalValue::Int64(Some(2_000_000)))
        );
        assert_eq!(
            encoder.encode(&ScalarValue::TimestampNanosecond(Some(1), None), chrono_tz::UTC),
            None
        );
    }

    #[test]
    fn decimal_scale_must_match_exactly() {
        let encoder = Encoder::DecimalInt32 { scale: 2 };
        assert_eq!(
            encode(encoder, ScalarValue::Decimal128(Some(12_345), 9, 2)),
            Some(PhysicalValue::Int32(Some(12_345)))
        );
        assert_eq!(encode(encoder, ScalarValue::Decimal128(Some(12_345), 9, 3)), None);
    }

    #[test]
    fn decimal_int64_and_overflow() {
        let encoder = Encoder::DecimalInt64 { scale: 2 };
        assert_eq!(
            encode(encoder, ScalarValue::Decimal128(Some(-42), 18, 2)),
            Some(PhysicalValue::Int64(Some(-42)))
        );
        assert_eq!(
            encode(encoder, ScalarValue::Decimal128(Some(i128::from(i64::MAX) + 1), 38, 2)),
            None
        );
        let narrow = Encoder::DecimalInt32 { scale: 2 };
        assert_eq!(
            encode(narrow, ScalarValue::Decimal128(Some(i128::from(i32::MAX) + 1), 18, 2)),
            None
        );
    }

    #[test]
    fn fixed_decimal_sign_extends_to_declared_length() {
        let encoder = Encoder::DecimalFixed { scale: 2, length: 16 };
        let encoded = encode(encoder, ScalarValue::Decimal128(Some(-1), 38, 2)).unwrap();
        assert_eq!(encoded, PhysicalValue::Bytes(Some(ByteArray::from(vec![0xffu8; 16]))));

        let narrow = Encoder::DecimalFixed { scale: 2, length: 2 };
        assert_eq!(
            encode(narrow, ScalarValue::Decimal128(Some(255), 4, 2)),
            Some(PhysicalValue::Bytes(Some(ByteArray::from(vec![0x00u8, 0xff]))))
        );
        assert_eq!(
            encode(narrow, ScalarValue::Decimal128(Some(-256), 4, 2)),
            Some(PhysicalValue::Bytes(Some(ByteArray::from(vec![0xffu8, 0x00]))))
        );
    }

    #[test]
    fn sign_extension_checks_fit() {
        assert_eq!(sign_extend_be(127, 1), Some(vec![0x7f]));
        assert_eq!(sign_extend_be(-128, 1), Some(vec![0x80]));
        assert_eq!(sign_extend_be(128, 1), None);
        assert_eq!(sign_extend_be(-129, 1), None);
        assert_eq!(sign_extend_be(1, 20), {
            let mut wide = vec![0u8; 19];
            wide.push(1);
            Some(wide)
        });
        assert_eq!(sign_extend_be(-1, 20), Some(vec![0xffu8; 20]));
        assert_eq!(sign_extend_be(5, 0), None);
    }
}
