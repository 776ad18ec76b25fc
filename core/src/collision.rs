//! Collision resolution (component D): deciding which of two values bound
//! to the same `(name, config)` key wins.
//!
//! Grounded in `original_source/ResourceTable.cpp`'s `resolveValueCollision`,
//! which this module follows closely: weak values always yield to strong
//! ones, two strong non-attribute values never silently merge, and
//! `Attribute` gets a special DECL/USE carve-out since `<attr>` symbols are
//! routinely declared once and then referenced ("used") from many places
//! without repeating the type constraint.

use crate::value::Value;

/// The outcome of comparing an existing value against an incoming one for
/// the same `(name, config)` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResult {
    /// Discard the incoming value; the existing one stands.
    KeepOriginal,
    /// Replace the existing value with the incoming one.
    TakeNew,
    /// Neither value defers to the other; this is an error unless the
    /// caller was told to override (see `ResourceTable::add_resource`'s
    /// `overridable` flag).
    Conflict,
}

/// Resolves a collision between `existing` and `incoming`, mirroring
/// aapt2's `resolveValueCollision` case by case, evaluated top to bottom:
///
/// 1. Incoming is not an Attribute: a weak incoming value never displaces
///    anything (`KeepOriginal`); a weak existing value always yields to a
///    strong incoming one (`TakeNew`); two strong values conflict.
/// 2. Incoming is an Attribute, existing is not: a weak existing value
///    yields (`TakeNew`); otherwise conflict.
/// 3. Both are Attributes: equal `typeMask` means both are full
///    declarations with the same format, so the non-weak one survives
///    (existing weak → `TakeNew`, else `KeepOriginal`); a weak `ANY`-masked
///    existing (a `USE` record) always yields to a real declaration
///    (`TakeNew`); a weak `ANY`-masked incoming likewise yields
///    (`KeepOriginal`); anything else is two DECLs with different formats,
///    a genuine conflict.
pub fn resolve_value_collision(existing: &Value, incoming: &Value) -> CollisionResult {
    let Some(incoming_attr) = incoming.as_attribute() else {
        return if incoming.is_weak() {
            CollisionResult::KeepOriginal
        } else if existing.is_weak() {
            CollisionResult::TakeNew
        } else {
            CollisionResult::Conflict
        };
    };

    let Some(existing_attr) = existing.as_attribute() else {
        return if existing.is_weak() {
            CollisionResult::TakeNew
        } else {
            CollisionResult::Conflict
        };
    };

    if existing_attr.type_mask == incoming_attr.type_mask {
        return if existing_attr.weak {
            CollisionResult::TakeNew
        } else {
            CollisionResult::KeepOriginal
        };
    }
    if existing_attr.weak && existing_attr.is_use_record() {
        return CollisionResult::TakeNew;
    }
    if incoming_attr.weak && incoming_attr.is_use_record() {
        return CollisionResult::KeepOriginal;
    }

    CollisionResult::Conflict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Attribute, AttributeTypeMask, AttributeTypeMaskOpt, BinaryPrimitive, DataType, Item};

    fn weak_attr() -> Value {
        Value::Attribute(Attribute {
            weak: true,
            ..Default::default()
        })
    }

    fn strong_attr(mask: AttributeTypeMask) -> Value {
        Value::Attribute(Attribute {
            type_mask: AttributeTypeMaskOpt(mask),
            ..Default::default()
        })
    }

    /// A `USE` record: a bare attribute reference with no format constraint
    /// of its own, always weak per spec.md's own glossary ("USE records are
    /// weak with typeMask = ANY").
    fn use_record() -> Value {
        Value::Attribute(Attribute {
            type_mask: AttributeTypeMaskOpt(AttributeTypeMask::ANY),
            weak: true,
            ..Default::default()
        })
    }

    fn int_prim(n: u32) -> Value {
        Value::Item(Item::BinaryPrimitive(BinaryPrimitive {
            data_type: DataType::IntDec,
            data: n,
        }))
    }

    #[test]
    fn strong_attribute_colliding_with_strong_item_conflicts() {
        assert_eq!(
            resolve_value_collision(&int_prim(1), &weak_attr()),
            CollisionResult::Conflict
        );
    }

    #[test]
    fn weak_existing_takes_new() {
        let existing = Value::Attribute(Attribute {
            weak: true,
            ..Default::default()
        });
        let incoming = int_prim(5);
        assert_eq!(
            resolve_value_collision(&existing, &incoming),
            CollisionResult::TakeNew
        );
    }

    #[test]
    fn two_strong_non_attributes_conflict() {
        assert_eq!(
            resolve_value_collision(&int_prim(1), &int_prim(2)),
            CollisionResult::Conflict
        );
    }

    #[test]
    fn use_record_always_yields() {
        assert_eq!(
            resolve_value_collision(&use_record(), &strong_attr(AttributeTypeMask::STRING)),
            CollisionResult::TakeNew
        );
        assert_eq!(
            resolve_value_collision(&strong_attr(AttributeTypeMask::STRING), &use_record()),
            CollisionResult::KeepOriginal
        );
    }

    #[test]
    fn matching_decl_masks_keep_original() {
        assert_eq!(
            resolve_value_collision(
                &strong_attr(AttributeTypeMask::STRING),
                &strong_attr(AttributeTypeMask::STRING)
            ),
            CollisionResult::KeepOriginal
        );
    }

    #[test]
    fn matching_masks_with_weak_existing_takes_new() {
        let weak_existing = Value::Attribute(Attribute {
            type_mask: AttributeTypeMaskOpt(AttributeTypeMask::STRING),
            weak: true,
            ..Default::default()
        });
        assert_eq!(
            resolve_value_collision(&weak_existing, &strong_attr(AttributeTypeMask::STRING)),
            CollisionResult::TakeNew
        );
    }

    #[test]
    fn attribute_idempotence_keeps_original() {
        let attr = strong_attr(AttributeTypeMask::REFERENCE | AttributeTypeMask::STRING);
        assert_eq!(resolve_value_collision(&attr, &attr.clone()), CollisionResult::KeepOriginal);
    }

    #[test]
    fn mismatched_decl_masks_conflict() {
        assert_eq!(
            resolve_value_collision(
                &strong_attr(AttributeTypeMask::STRING),
                &strong_attr(AttributeTypeMask::INTEGER)
            ),
            CollisionResult::Conflict
        );
    }
}
