//! Raw-JSON-backed discriminated unions.
//!
//! The server speaks in tagged unions: events keyed by `type`, messages keyed by `role`,
//! errors keyed by `name` and so on. Instead of committing to one variant at decode time,
//! a union wrapper keeps two things:
//!
//! - the discriminator, peeked from the payload without parsing the rest of it;
//! - the payload itself, verbatim, as an owned [`RawValue`].
//!
//! Typed accessors (`as_text()`, `as_local()`, ...) re-decode the raw payload on demand.
//! A tag mismatch is reported as [`VariantError::WrongVariant`] without touching the
//! payload; a matching tag with a payload of the wrong shape is reported as
//! [`VariantError::Malformed`]. Callers can treat the first as ordinary control flow.
//!
//! Serializing a wrapper re-emits the stored payload unchanged, so fields this client does
//! not know about survive a round trip. A wrapper that was never decoded serializes as `null`.
//!
//! Wrappers must be decoded by `serde_json` directly (`from_str`, `from_slice`,
//! `from_reader`); decoding from an already-parsed `serde_json::Value` cannot hand out the
//! raw payload.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;
use std::fmt;

/// Error returned by union accessors.
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    /// The discriminator names a different variant (or none at all).
    #[error("{union} is `{actual}`, not `{expected}`")]
    WrongVariant {
        union: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// The discriminator matched but the payload does not fit the variant's shape.
    #[error("malformed {union} `{variant}` payload: {source}")]
    Malformed {
        union: &'static str,
        variant: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl VariantError {
    pub fn is_wrong_variant(&self) -> bool {
        matches!(self, VariantError::WrongVariant { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, VariantError::Malformed { .. })
    }
}

/// A discriminator enum generated for a union.
pub trait Discriminant: Clone + PartialEq + fmt::Debug + Default {
    /// Parses a wire tag; unrecognised tags are kept verbatim.
    fn from_tag(tag: &str) -> Self;
    /// The wire tag. Empty when the payload carried none.
    fn as_str(&self) -> &str;
    /// Whether this client version recognises the tag.
    fn is_known(&self) -> bool;
}

/// Marks `Self` as the payload type of one variant of union `U`.
pub trait VariantOf<U> {
    const TAG: &'static str;
}

/// Owned, immutable JSON payload of a union.
#[derive(Debug, Clone, Default)]
pub struct RawJson(Option<Box<RawValue>>);

impl RawJson {
    /// The stored JSON text, or `None` for a never-decoded wrapper.
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref().map(RawValue::get)
    }

    /// Decodes the payload into `V`. Every call parses afresh.
    pub fn decode<V: de::DeserializeOwned>(
        &self,
        union: &'static str,
        variant: &'static str,
    ) -> Result<V, VariantError> {
        serde_json::from_str(self.get().unwrap_or("null")).map_err(|source| VariantError::Malformed {
            union,
            variant,
            source,
        })
    }

    /// First significant byte of the payload.
    pub fn leading_byte(&self) -> Option<u8> {
        self.get()?
            .bytes()
            .find(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
    }
}

impl From<Box<RawValue>> for RawJson {
    fn from(raw: Box<RawValue>) -> Self {
        RawJson(Some(raw))
    }
}

impl Serialize for RawJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(raw) => raw.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for RawJson {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Box::<RawValue>::deserialize(deserializer).map(RawJson::from)
    }
}

/// JSON token shape, for unions discriminated by shape rather than by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonShape {
    String,
    Array,
    Object,
    /// Numbers, booleans, `null`, or a never-decoded wrapper.
    #[default]
    Other,
}

impl JsonShape {
    pub fn of(raw: &RawJson) -> Self {
        match raw.leading_byte() {
            Some(b'"') => JsonShape::String,
            Some(b'[') => JsonShape::Array,
            Some(b'{') => JsonShape::Object,
            _ => JsonShape::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonShape::String => "string",
            JsonShape::Array => "array",
            JsonShape::Object => "object",
            JsonShape::Other => "",
        }
    }
}

/// Reads the top-level values of `keys` from a JSON document, skipping everything else.
///
/// Non-object documents yield no values. Fails only on invalid JSON.
pub(crate) fn peek_fields(raw: &str, keys: &[&str]) -> Result<Vec<Option<Value>>, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(raw);
    let peeked = de.deserialize_any(PeekVisitor { keys })?;
    de.end()?;
    Ok(peeked)
}

struct PeekVisitor<'a> {
    keys: &'a [&'a str],
}

impl<'a> PeekVisitor<'a> {
    fn empty(&self) -> Vec<Option<Value>> {
        vec![None; self.keys.len()]
    }
}

impl<'de, 'a> Visitor<'de> for PeekVisitor<'a> {
    type Value = Vec<Option<Value>>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut out = self.empty();
        while let Some(key) = map.next_key::<String>()? {
            match self.keys.iter().position(|k| *k == key) {
                Some(idx) => out[idx] = Some(map.next_value::<Value>()?),
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(out)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(self.empty())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(self.empty())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(self.empty())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(self.empty())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(self.empty())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(self.empty())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(self.empty())
    }
}

/// Interprets a peeked discriminator. Absent and `null` both read as the empty tag.
pub(crate) fn tag_string(
    value: Option<Value>,
    union: &'static str,
    field: &'static str,
) -> Result<String, serde_json::Error> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(<serde_json::Error as de::Error>::custom(format!(
            "{}: discriminator `{}` must be a string, got {}",
            union, field, other
        ))),
    }
}

/// Promoted convenience fields never fail the peek; anything but a string reads as empty.
pub(crate) fn lenient_string(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Serializes a variant payload and stamps the discriminator onto it.
pub(crate) fn raw_with_tag<V: Serialize>(
    variant: &V,
    field: &str,
    tag: &str,
) -> Result<Box<RawValue>, serde_json::Error> {
    let mut value = serde_json::to_value(variant)?;
    match &mut value {
        Value::Object(map) => {
            map.insert(field.to_string(), Value::String(tag.to_string()));
        }
        other => {
            return Err(<serde_json::Error as de::Error>::custom(format!(
                "variant `{}` must serialize to a JSON object, got {}",
                tag, other
            )))
        }
    }
    RawValue::from_string(serde_json::to_string(&value)?)
}

/// Declares a field-discriminated union: the discriminator enum, the raw-backed wrapper,
/// one accessor per variant, and the serde glue.
macro_rules! json_union {
    (
        $(#[$union_meta:meta])*
        pub struct $union:ident;
        $(#[$tag_meta:meta])*
        pub enum $tag:ident;
        tag = $field:literal;
        $(promote {
            $( $(#[$pmeta:meta])* $pfield:ident => $pkey:literal ),* $(,)?
        })?
        variants {
            $( $(#[$vmeta:meta])* $variant:ident($wire:literal) => $accessor:ident: $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$tag_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $tag {
            $( $(#[$vmeta])* $variant, )+
            /// A tag this client does not recognise; empty when the payload carried none.
            Unknown(String),
        }

        impl Default for $tag {
            fn default() -> Self {
                $tag::Unknown(String::new())
            }
        }

        impl $tag {
            pub fn from_tag(tag: &str) -> Self {
                match tag {
                    $( $wire => $tag::$variant, )+
                    other => $tag::Unknown(other.to_string()),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $( $tag::$variant => $wire, )+
                    $tag::Unknown(other) => other.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $tag::Unknown(_))
            }
        }

        impl $crate::union::Discriminant for $tag {
            fn from_tag(tag: &str) -> Self {
                $tag::from_tag(tag)
            }

            fn as_str(&self) -> &str {
                $tag::as_str(self)
            }

            fn is_known(&self) -> bool {
                $tag::is_known(self)
            }
        }

        impl ::std::fmt::Display for $tag {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $tag {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $tag {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let tag = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok($tag::from_tag(&tag))
            }
        }

        $(#[$union_meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $union {
            kind: $tag,
            $($( $pfield: String, )*)?
            raw: $crate::union::RawJson,
        }

        impl $union {
            /// Name of the discriminator field on the wire.
            pub const TAG_FIELD: &'static str = $field;

            pub fn kind(&self) -> &$tag {
                &self.kind
            }

            $($(
                $(#[$pmeta])*
                pub fn $pfield(&self) -> &str {
                    &self.$pfield
                }
            )*)?

            /// The payload exactly as received.
            pub fn raw_json(&self) -> Option<&str> {
                self.raw.get()
            }

            pub fn from_raw(raw: Box<::serde_json::value::RawValue>) -> Result<Self, ::serde_json::Error> {
                let keys: &[&str] = &[$field $($(, $pkey)*)?];
                let mut peeked = $crate::union::peek_fields(raw.get(), keys)?.into_iter();
                let kind = $tag::from_tag(&$crate::union::tag_string(
                    peeked.next().flatten(),
                    stringify!($union),
                    $field,
                )?);
                $($(
                    let $pfield = $crate::union::lenient_string(peeked.next().flatten());
                )*)?
                Ok(Self {
                    kind,
                    $($( $pfield, )*)?
                    raw: $crate::union::RawJson::from(raw),
                })
            }

            /// Wraps a variant payload, stamping its discriminator.
            pub fn from_variant<V>(variant: &V) -> Result<Self, ::serde_json::Error>
            where
                V: $crate::union::VariantOf<Self> + ::serde::Serialize,
            {
                Self::from_raw($crate::union::raw_with_tag(variant, $field, V::TAG)?)
            }

            $(
                pub fn $accessor(&self) -> Result<$ty, $crate::union::VariantError> {
                    if self.kind != $tag::$variant {
                        return Err($crate::union::VariantError::WrongVariant {
                            union: stringify!($union),
                            expected: $wire,
                            actual: self.kind.as_str().to_string(),
                        });
                    }
                    self.raw.decode(stringify!($union), $wire)
                }
            )+
        }

        $(
            impl $crate::union::VariantOf<$union> for $ty {
                const TAG: &'static str = $wire;
            }
        )+

        impl ::std::str::FromStr for $union {
            type Err = ::serde_json::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::serde_json::from_str(s)
            }
        }

        impl ::serde::Serialize for $union {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                ::serde::Serialize::serialize(&self.raw, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $union {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <Box<::serde_json::value::RawValue> as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::from_raw(raw).map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    };
}

/// Declares a union discriminated by the JSON shape of its payload (string, array, object).
macro_rules! shape_union {
    (
        $(#[$union_meta:meta])*
        pub struct $union:ident;
        variants {
            $( $(#[$vmeta:meta])* $shape:ident => $accessor:ident: $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$union_meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $union {
            raw: $crate::union::RawJson,
        }

        impl $union {
            pub fn shape(&self) -> $crate::union::JsonShape {
                $crate::union::JsonShape::of(&self.raw)
            }

            /// The payload exactly as received.
            pub fn raw_json(&self) -> Option<&str> {
                self.raw.get()
            }

            pub fn from_raw(raw: Box<::serde_json::value::RawValue>) -> Self {
                Self {
                    raw: $crate::union::RawJson::from(raw),
                }
            }

            /// Wraps any serializable value; its shape picks the variant.
            pub fn from_value<V: ::serde::Serialize + ?Sized>(value: &V) -> Result<Self, ::serde_json::Error> {
                Ok(Self::from_raw(::serde_json::value::to_raw_value(value)?))
            }

            $(
                $(#[$vmeta])*
                pub fn $accessor(&self) -> Result<$ty, $crate::union::VariantError> {
                    let expected = $crate::union::JsonShape::$shape.as_str();
                    let actual = self.shape();
                    if actual != $crate::union::JsonShape::$shape {
                        return Err($crate::union::VariantError::WrongVariant {
                            union: stringify!($union),
                            expected,
                            actual: actual.as_str().to_string(),
                        });
                    }
                    self.raw.decode(stringify!($union), expected)
                }
            )+
        }

        impl ::std::str::FromStr for $union {
            type Err = ::serde_json::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::serde_json::from_str(s)
            }
        }

        impl ::serde::Serialize for $union {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                ::serde::Serialize::serialize(&self.raw, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $union {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <Box<::serde_json::value::RawValue> as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_raw(raw))
            }
        }
    };
}

pub(crate) use json_union;
pub(crate) use shape_union;
