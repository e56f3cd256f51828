//! Count-prefixed arrays of type-discriminated objects.
//!
//! ```text
//! [count:varint][object 0][object 1]...[object count-1]
//! ```
//!
//! An [`ArrayRules`] value attached to a particular array occurrence (for
//! example "transaction inputs") bounds the element count and can require
//! that the encoded elements appear in strictly ascending byte order.

use tracing::debug;

use super::object::{deserialize_object, DeSeriMode, Serializable, SerializableSelector};
use super::varint::{check_canonical_uvarint, put_uvarint, uvarint};
use crate::error::{CodecError, CountBound};

// ---------------------------------------------------------------------------
// ArrayRules
// ---------------------------------------------------------------------------

/// Decode-time policy for one specific array occurrence.
///
/// `min` and `max` at 0 leave that side unbounded. The `name` identifies the
/// occurrence in every error the rules raise, so a violation on the inputs
/// array is distinguishable from the same violation on the outputs array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayRules {
    /// Name of the array occurrence, e.g. `"inputs"`.
    pub name: &'static str,
    /// Minimum element count, 0 for none.
    pub min: u64,
    /// Maximum element count, 0 for none.
    pub max: u64,
    /// Whether encoded elements must be in strictly ascending byte order.
    pub lexical_order: bool,
}

impl ArrayRules {
    /// Checks `count` against the bounds.
    pub fn check_bounds(&self, count: u64) -> Result<(), CodecError> {
        if self.min != 0 && count < self.min {
            return Err(CodecError::CountOutOfBounds {
                array: self.name,
                bound: CountBound::Min,
                limit: self.min,
                count,
            });
        }
        if self.max != 0 && count > self.max {
            return Err(CodecError::CountOutOfBounds {
                array: self.name,
                bound: CountBound::Max,
                limit: self.max,
                count,
            });
        }
        Ok(())
    }

    /// Copy of these rules with different count bounds.
    pub const fn with_bounds(self, min: u64, max: u64) -> Self {
        Self { min, max, ..self }
    }

    /// Returns a fresh order checker for one decode pass.
    pub fn lexical_order_validator<'a>(&self) -> LexicalOrderValidator<'a> {
        LexicalOrderValidator {
            array: self.name,
            previous: None,
        }
    }
}

// ---------------------------------------------------------------------------
// LexicalOrderValidator
// ---------------------------------------------------------------------------

/// Remembers the previous element's encoded bytes within a single array
/// decode and rejects any element that does not sort strictly after it.
/// Equal encodings are rejected too.
#[derive(Debug)]
pub struct LexicalOrderValidator<'a> {
    array: &'static str,
    previous: Option<(usize, &'a [u8])>,
}

impl<'a> LexicalOrderValidator<'a> {
    /// Checks the element at `index`, whose encoding is `next`, against the
    /// previously checked element.
    pub fn check(&mut self, index: usize, next: &'a [u8]) -> Result<(), CodecError> {
        if let Some((previous_index, previous)) = self.previous {
            if next <= previous {
                return Err(CodecError::LexicalOrderViolation {
                    array: self.array,
                    previous: previous_index,
                    current: index,
                });
            }
        }
        self.previous = Some((index, next));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Array codec
// ---------------------------------------------------------------------------

/// Decodes a count-prefixed array of objects from the start of `data`.
///
/// The count is checked against `rules` before any element is decoded. Each
/// element goes through [`deserialize_object`] and, if the rules demand it,
/// the lexical order check. Any failure discards everything decoded so far.
/// Returns the elements and the bytes consumed (count prefix included).
pub fn deserialize_array_of_objects<T: Serializable>(
    data: &[u8],
    mode: DeSeriMode,
    selector: SerializableSelector<T>,
    rules: Option<&ArrayRules>,
) -> Result<(Vec<T>, usize), CodecError> {
    let (count, count_len) = uvarint(data)?;
    if mode.validates() {
        check_canonical_uvarint(count, count_len, "array count")?;
    }

    if let Some(rules) = rules {
        rules.check_bounds(count)?;
    }

    let elements = &data[count_len..];
    let mut order_validator = rules
        .filter(|r| r.lexical_order)
        .map(|r| r.lexical_order_validator());

    let mut seris = Vec::with_capacity(initial_capacity(count, elements.len()));

    let mut offset = 0;
    for index in 0..count {
        let index = usize::try_from(index).map_err(|_| CodecError::IntegerOverflow {
            context: "indexing array elements",
        })?;
        let (seri, consumed) = deserialize_object(&elements[offset..], mode, selector)?;
        if let Some(validator) = order_validator.as_mut() {
            validator.check(index, &elements[offset..offset + consumed])?;
        }
        seris.push(seri);
        offset += consumed;
    }

    debug!(
        array = rules.map(|r| r.name).unwrap_or("unnamed"),
        count,
        bytes = count_len + offset,
        "deserialized array"
    );
    Ok((seris, count_len + offset))
}

/// Upper bound on elements reserved before any of them has been decoded.
const MAX_PREALLOCATED_ELEMENTS: usize = 128;

/// Capacity to reserve for an array announcing `count` elements with
/// `remaining` bytes left. Every element takes at least one byte.
fn initial_capacity(count: u64, remaining: usize) -> usize {
    usize::try_from(count)
        .unwrap_or(usize::MAX)
        .min(remaining)
        .min(MAX_PREALLOCATED_ELEMENTS)
}

/// Encodes `seris` as a count-prefixed array, in the order given.
///
/// The codec never re-sorts. Callers that will be read back under lexical
/// order rules must pass an already ordered slice, see
/// [`sort_by_serialized_bytes`].
pub fn serialize_array_of_objects<T: Serializable>(
    seris: &[T],
    mode: DeSeriMode,
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    write_array_of_objects(&mut buf, seris, mode)?;
    Ok(buf)
}

/// Appends the count-prefixed encoding of `seris` to `buf`.
pub fn write_array_of_objects<T: Serializable>(
    buf: &mut Vec<u8>,
    seris: &[T],
    mode: DeSeriMode,
) -> Result<(), CodecError> {
    put_uvarint(buf, seris.len() as u64);
    for seri in seris {
        let bytes = seri.encode(mode).map_err(|e| e.in_entity(seri.type_name()))?;
        buf.extend_from_slice(&bytes);
    }
    Ok(())
}

/// Sorts `seris` into ascending order of their encodings, the order
/// lexical array rules expect.
pub fn sort_by_serialized_bytes<T: Serializable>(seris: Vec<T>) -> Result<Vec<T>, CodecError> {
    let mut keyed = seris
        .into_iter()
        .map(|seri| Ok((seri.encode(DeSeriMode::NoValidation)?, seri)))
        .collect::<Result<Vec<_>, CodecError>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, seri)| seri).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::object::{read_type_and_advance, write_type_header};
    use crate::error::TypeFamily;

    /// One-byte payload object: `[0][value]`.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Tiny(u8);

    impl Serializable for Tiny {
        fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
            let (rest, type_len) = read_type_and_advance(data, 0, TypeFamily::Input, mode)?;
            self.0 = *rest.first().ok_or(CodecError::BufferTooShort {
                needed: 1,
                available: 0,
            })?;
            Ok(type_len + 1)
        }

        fn encode(&self, _mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
            let mut buf = write_type_header(0, 2);
            buf.push(self.0);
            Ok(buf)
        }
    }

    fn tiny_selector(ty: u64) -> Result<Tiny, CodecError> {
        match ty {
            0 => Ok(Tiny::default()),
            other => Err(CodecError::UnknownType {
                family: TypeFamily::Input,
                discriminant: other,
            }),
        }
    }

    const ORDERED: ArrayRules = ArrayRules {
        name: "tinies",
        min: 1,
        max: 3,
        lexical_order: true,
    };

    fn encode(values: &[u8]) -> Vec<u8> {
        let tinies: Vec<Tiny> = values.iter().copied().map(Tiny).collect();
        serialize_array_of_objects(&tinies, DeSeriMode::NoValidation).unwrap()
    }

    fn decode_ordered(data: &[u8]) -> Result<(Vec<Tiny>, usize), CodecError> {
        deserialize_array_of_objects(
            data,
            DeSeriMode::PerformValidation,
            tiny_selector,
            Some(&ORDERED),
        )
    }

    #[test]
    fn decodes_ordered_array_and_counts_prefix() {
        let mut data = encode(&[1, 2, 3]);
        data.push(0xee); // not part of the array
        let (tinies, consumed) = decode_ordered(&data).unwrap();
        assert_eq!(tinies, vec![Tiny(1), Tiny(2), Tiny(3)]);
        assert_eq!(consumed, 1 + 3 * 2);
    }

    #[test]
    fn bounds_are_checked_before_elements() {
        // Count of 4 with no element bytes at all: the bound fails first.
        let err = decode_ordered(&[4]).unwrap_err();
        assert_eq!(
            err,
            CodecError::CountOutOfBounds {
                array: "tinies",
                bound: CountBound::Max,
                limit: 3,
                count: 4
            }
        );

        let err = decode_ordered(&[0]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::CountOutOfBounds {
                bound: CountBound::Min,
                ..
            }
        ));
    }

    #[test]
    fn padded_count_rejected_under_validation() {
        let mut data = vec![0x81, 0x00];
        data.extend_from_slice(&encode(&[7])[1..]);
        assert_eq!(
            decode_ordered(&data).unwrap_err(),
            CodecError::NonCanonicalVarint {
                context: "array count",
                value: 1,
                len: 2
            }
        );
        let (tinies, consumed) =
            deserialize_array_of_objects(&data, DeSeriMode::NoValidation, tiny_selector, None)
                .unwrap();
        assert_eq!((tinies, consumed), (vec![Tiny(7)], 4));
    }

    #[test]
    fn out_of_order_elements_name_both_indices() {
        let err = decode_ordered(&encode(&[1, 5, 4])).unwrap_err();
        assert_eq!(
            err,
            CodecError::LexicalOrderViolation {
                array: "tinies",
                previous: 1,
                current: 2
            }
        );
    }

    #[test]
    fn equal_elements_violate_order() {
        let err = decode_ordered(&encode(&[2, 2])).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LexicalOrderViolation {
                previous: 0,
                current: 1,
                ..
            }
        ));
    }

    #[test]
    fn no_rules_means_no_order_or_bounds() {
        let data = encode(&[9, 1, 1, 0]);
        let (tinies, _) =
            deserialize_array_of_objects(&data, DeSeriMode::NoValidation, tiny_selector, None)
                .unwrap();
        assert_eq!(tinies.len(), 4);
    }

    #[test]
    fn truncated_element_aborts_the_whole_array() {
        let mut data = encode(&[1, 2]);
        data.pop();
        let err = decode_ordered(&data).unwrap_err();
        assert!(matches!(err.root_cause(), CodecError::BufferTooShort { .. }));
    }

    #[test]
    fn huge_declared_count_fails_without_allocating() {
        let mut data = Vec::new();
        put_uvarint(&mut data, u64::MAX);
        let err =
            deserialize_array_of_objects(&data, DeSeriMode::NoValidation, tiny_selector, None)
                .unwrap_err();
        assert!(matches!(err, CodecError::BufferTooShort { .. }));
    }

    #[test]
    fn reservation_is_capped_regardless_of_input_size() {
        assert_eq!(initial_capacity(3, 1_000), 3);
        assert_eq!(initial_capacity(1_000, 10), 10);
        assert_eq!(initial_capacity(u64::MAX, 1 << 20), MAX_PREALLOCATED_ELEMENTS);

        // A megabyte of one-byte garbage under an unbounded count.
        let mut data = Vec::new();
        put_uvarint(&mut data, 1 << 20);
        data.resize(data.len() + (1 << 20), 0);
        let err =
            deserialize_array_of_objects(&data, DeSeriMode::NoValidation, tiny_selector, None)
                .unwrap_err();
        assert!(matches!(err, CodecError::BufferTooShort { .. }));
    }

    #[test]
    fn sorting_produces_decodable_order() {
        let sorted = sort_by_serialized_bytes(vec![Tiny(3), Tiny(1), Tiny(2)]).unwrap();
        assert_eq!(sorted, vec![Tiny(1), Tiny(2), Tiny(3)]);
        let data = serialize_array_of_objects(&sorted, DeSeriMode::PerformValidation).unwrap();
        assert!(decode_ordered(&data).is_ok());
    }
}
