//! Fields declared on a class.

use bitflags::bitflags;

use super::{attribute::Attribute, constant_pool::ConstantValue, descriptor::FieldType, references::FieldRef};

bitflags! {
    /// A field's `access_flags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccessFlags: u16 {
        /// Declared `public`.
        const PUBLIC = 0x0001;
        /// Declared `private`.
        const PRIVATE = 0x0002;
        /// Declared `protected`.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`.
        const FINAL = 0x0010;
        /// Declared `volatile`.
        const VOLATILE = 0x0040;
        /// Declared `transient`.
        const TRANSIENT = 0x0080;
        /// Not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an element of an `enum`.
        const ENUM = 0x4000;
    }
}

/// A field declared on a class.
#[derive(Debug, Clone)]
pub struct Field {
    /// The field's access flags.
    pub access_flags: AccessFlags,
    /// The field's simple name.
    pub name: String,
    /// The field's parsed type.
    pub field_type: FieldType,
    /// The compile-time constant this field is initialized to, if any
    /// (from a `ConstantValue` attribute).
    pub constant_value: Option<ConstantValue>,
    /// Whether this field is marked `Deprecated`.
    pub is_deprecated: bool,
    /// The field's generic signature, if any.
    pub signature: Option<String>,
    /// Attributes not recognized by any named field above.
    pub free_attributes: Vec<Attribute>,
}

impl Field {
    /// A reference naming this field on the given owner.
    #[must_use]
    pub fn as_ref(&self, owner: super::references::ClassRef) -> FieldRef {
        FieldRef {
            owner,
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod proptest_support {
    use super::AccessFlags;
    use proptest::prelude::*;

    pub(crate) fn arb_access_flags() -> impl Strategy<Value = AccessFlags> {
        any::<u16>().prop_map(AccessFlags::from_bits_truncate)
    }

    proptest::proptest! {
        #[test]
        fn decoded_flags_match_bit_test(bits in any::<u16>()) {
            let flags = AccessFlags::from_bits_truncate(bits);
            for flag in AccessFlags::all().iter() {
                let expected = bits & flag.bits() != 0;
                prop_assert_eq!(flags.contains(flag), expected);
            }
        }
    }
}
