//! Runtime and source-retained annotations.

use super::{
    code::{LocalVariableId, ProgramCounter},
    constant_pool::ConstantValue,
    descriptor::FieldType,
};

/// An annotation: a type plus its named element values.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// The annotation interface's type.
    pub annotation_type: FieldType,
    /// The annotation's `name = value` pairs.
    pub element_value_pairs: Vec<(String, ElementValue)>,
}

/// The value of one annotation element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    /// A primitive or `String` constant.
    Constant(ConstantValue),
    /// An enum constant, by its declaring type and constant name.
    EnumConstant {
        /// The enum type's descriptor.
        enum_type_name: String,
        /// The constant's name.
        const_name: String,
    },
    /// A `Class` literal, by the descriptor of the type it names.
    Class {
        /// The descriptor of the referenced type.
        return_descriptor: FieldType,
    },
    /// A nested annotation.
    AnnotationInterface(Annotation),
    /// An array of element values.
    Array(Vec<ElementValue>),
}

/// What a [`TypeAnnotation`] targets: a generic type parameter, a `throws`
/// clause entry, a local variable's type, and so on.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetInfo {
    /// A type parameter declaration.
    TypeParameter {
        /// The index of the type parameter.
        index: u8,
    },
    /// A class's `extends`/`implements` clause entry.
    SuperType {
        /// `u16::MAX` for `extends`, otherwise the index into
        /// `implements`.
        index: u16,
    },
    /// A bound of a type parameter.
    TypeParameterBound {
        /// The index of the type parameter.
        type_parameter_index: u8,
        /// The index of the bound.
        bound_index: u8,
    },
    /// A field, method return, or receiver type.
    Empty,
    /// A formal parameter declaration.
    FormalParameter {
        /// The index of the formal parameter.
        index: u8,
    },
    /// A `throws` clause entry.
    Throws {
        /// The index into the `Exceptions` attribute.
        index: u16,
    },
    /// A local variable or resource variable declaration.
    LocalVar(Vec<LocalVariableId>),
    /// A `catch` clause's exception type.
    Catch {
        /// The index into the exception table.
        index: u16,
    },
    /// An `instanceof`, `new`, or constructor/method reference expression.
    Offset(ProgramCounter),
    /// A type argument in a cast, `new`, method call, or constructor
    /// reference.
    TypeArgument {
        /// The code offset of the expression.
        offset: ProgramCounter,
        /// The index of the type argument.
        index: u8,
    },
}

/// One step of a [`TypeAnnotation`]'s path to the annotated part of a
/// compound type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePathElement {
    /// Annotation is deeper in an array type.
    Array,
    /// Annotation is deeper in a nested type.
    Nested,
    /// Annotation is on the bound of a wildcard type argument.
    Bound,
    /// Annotation is on a type argument, at the given index.
    TypeArgument(u8),
}

/// An annotation applied to a type use, as opposed to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    /// The annotation interface's type.
    pub annotation_type: FieldType,
    /// What this annotation targets.
    pub target_info: TargetInfo,
    /// The path from the target to the specific nested type annotated.
    pub target_path: Vec<TypePathElement>,
    /// The annotation's `name = value` pairs.
    pub element_value_pairs: Vec<(String, ElementValue)>,
}

