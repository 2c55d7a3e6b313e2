//! Field decoders shared by the record types.
//!
//! The same record is decoded from JSON and from XML (converted to a JSON
//! value first, see `xml`). XML carries every scalar as text and every empty
//! element as `null`, while JSON mixes strings, numbers and nulls for the
//! same field, so these accept either shape.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use rust_decimal::Decimal;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

/// Parse an RFC 2822 timestamp (`Mon, 16 Aug 2010 23:00:23 +0000`), falling
/// back to RFC 3339.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

pub(crate) fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// `null` and `""` become `None`.
pub(crate) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.filter(|s| !s.is_empty()))
}

pub(crate) fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    struct BoolVisitor;

    impl<'de> Visitor<'de> for BoolVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or \"true\"/\"false\"")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v {
                "true" | "True" => Ok(true),
                "false" | "False" | "" => Ok(false),
                other => Err(E::custom(format!("invalid boolean: {other}"))),
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }
    }

    d.deserialize_any(BoolVisitor)
}

/// Unsigned integer given as a number or as a decimal string. Missing or
/// empty is 0.
pub(crate) fn unsigned<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an unsigned integer or numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            if v.is_empty() {
                return Ok(0);
            }
            v.parse().map_err(|_| E::custom(format!("invalid integer: {v}")))
        }

        fn visit_unit<E: de::Error>(self) -> Result<u32, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<u32, E> {
            Ok(0)
        }
    }

    d.deserialize_any(U32Visitor)
}

/// Monetary amount. The server sends it as a string (`"-0.05000"`), and
/// leaves it empty or `null` until it has been computed. The string form is
/// kept digit for digit, scale included.
pub(crate) fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount, numeric string, or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Option<Decimal>, E> {
            self.visit_str(&v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Option<Decimal>, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Option<Decimal>, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Option<Decimal>, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            Decimal::from_str_exact(v)
                .or_else(|_| Decimal::from_scientific(v))
                .map(Some)
                .map_err(|_| E::custom(format!("invalid amount: {v}")))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Option<Decimal>, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Option<Decimal>, E> {
            Ok(None)
        }
    }

    d.deserialize_any(AmountVisitor)
}

/// A collection that XML renders as a single object when it has one entry.
pub(crate) fn one_or_many<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OneOrMany<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrMany<T> {
        type Value = Vec<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a record or a list of records")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Vec<T>, A::Error> {
            Vec::deserialize(SeqAccessDeserializer::new(seq))
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Vec<T>, A::Error> {
            T::deserialize(MapAccessDeserializer::new(map)).map(|item| vec![item])
        }

        fn visit_unit<E: de::Error>(self) -> Result<Vec<T>, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Vec<T>, E> {
            Ok(Vec::new())
        }
    }

    d.deserialize_any(OneOrMany(PhantomData))
}
