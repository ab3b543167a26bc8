//! Lightweight, by-name references to other classes, fields, methods,
//! modules, and packages, as resolved out of the constant pool.

use derive_more::Display;

/// A reference to a class by its binary name (e.g. `java.lang.String`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{binary_name}")]
pub struct ClassRef {
    /// The binary name of the class, with `.` as the package separator.
    pub binary_name: String,
}

impl ClassRef {
    /// Creates a reference to the class with the given binary name.
    pub fn new(binary_name: impl Into<String>) -> Self {
        Self {
            binary_name: binary_name.into(),
        }
    }
}

/// A reference to a field declared on a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{owner}.{name}")]
pub struct FieldRef {
    /// The class declaring the field.
    pub owner: ClassRef,
    /// The field's name.
    pub name: String,
}

/// A reference to a method or constructor declared on a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{owner}.{name}")]
pub struct MethodRef {
    /// The class declaring the method.
    pub owner: ClassRef,
    /// The method's name.
    pub name: String,
}

impl MethodRef {
    /// The name the JVM gives instance initializer methods.
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";
    /// The name the JVM gives static initializer blocks.
    pub const CLASS_INITIALIZER_NAME: &'static str = "<clinit>";

    /// Whether this reference names an instance constructor.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR_NAME
    }

    /// Whether this reference names a static initializer block.
    #[must_use]
    pub fn is_static_initializer_block(&self) -> bool {
        self.name == Self::CLASS_INITIALIZER_NAME
    }
}

/// A reference to a Java Platform Module System module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{name}")]
pub struct ModuleRef {
    /// The module's name.
    pub name: String,
}

/// A reference to a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{binary_name}")]
pub struct PackageRef {
    /// The binary name of the package.
    pub binary_name: String,
}

/// A `name:descriptor` pair, as stored in a `NameAndType` pool entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{name}:{descriptor}")]
pub struct NameAndType {
    /// The referenced name.
    pub name: String,
    /// The referenced descriptor string, not yet parsed.
    pub descriptor: String,
}

#[cfg(test)]
pub(crate) mod proptest_support {
    use super::{ClassRef, FieldRef, MethodRef};
    use proptest::prelude::*;

    pub(crate) fn arb_binary_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,5}(/[a-z][a-z0-9]{0,5}){0,3}"
    }

    pub(crate) fn arb_class_ref() -> impl Strategy<Value = ClassRef> {
        arb_binary_name().prop_map(ClassRef::new)
    }

    pub(crate) fn arb_field_ref() -> impl Strategy<Value = FieldRef> {
        (arb_class_ref(), "[a-zA-Z_][a-zA-Z0-9_]{0,8}")
            .prop_map(|(owner, name)| FieldRef { owner, name })
    }

    pub(crate) fn arb_method_ref() -> impl Strategy<Value = MethodRef> {
        (arb_class_ref(), "[a-zA-Z_][a-zA-Z0-9_]{0,8}")
            .prop_map(|(owner, name)| MethodRef { owner, name })
    }
}
