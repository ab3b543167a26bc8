//! Methods (and constructors) declared on a class.

use bitflags::bitflags;

use super::{
    attribute::Attribute, code::MethodBody, descriptor::MethodDescriptor, references::ClassRef,
};

bitflags! {
    /// A method's `access_flags`.
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
        /// Declared `synchronized`.
        const SYNCHRONIZED = 0x0020;
        /// A compiler-generated bridge method.
        const BRIDGE = 0x0040;
        /// Declared with a variable number of arguments.
        const VARARGS = 0x0080;
        /// Declared `native`.
        const NATIVE = 0x0100;
        /// Declared `abstract`.
        const ABSTRACT = 0x0400;
        /// Declared `strictfp`.
        const STRICT = 0x0800;
        /// Not present in the source code.
        const SYNTHETIC = 0x1000;
    }
}

/// A method or constructor declared on a class.
#[derive(Debug, Clone)]
pub struct Method {
    /// The method's access flags.
    pub access_flags: AccessFlags,
    /// The method's simple name (`<init>`/`<clinit>` for constructors and
    /// static initializer blocks).
    pub name: String,
    /// The method's parsed parameter and return types.
    pub descriptor: MethodDescriptor,
    /// The method's body, if it has one (absent for `abstract` and
    /// `native` methods).
    pub body: Option<MethodBody>,
    /// Checked exception types declared in a `throws` clause.
    pub exceptions: Vec<ClassRef>,
    /// Whether this method is marked `Deprecated`.
    pub is_deprecated: bool,
    /// The method's generic signature, if any.
    pub signature: Option<String>,
    /// Attributes not recognized by any named field above.
    pub free_attributes: Vec<Attribute>,
}

impl Method {
    /// The name the JVM gives instance initializer methods.
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";
    /// The name the JVM gives static initializer blocks.
    pub const CLASS_INITIALIZER_NAME: &'static str = "<clinit>";

    /// Whether this method is an instance constructor.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR_NAME
    }

    /// Whether this method is a static initializer block.
    #[must_use]
    pub fn is_static_initializer_block(&self) -> bool {
        self.name == Self::CLASS_INITIALIZER_NAME
    }
}
