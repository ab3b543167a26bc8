//! The attribute registry: every named, length-prefixed record a class,
//! field, method, or `Code` region may carry.

use super::{
    code::{MethodBody, StackMapFrame},
    constant_pool::{ConstantValue, MethodHandle},
    references::{ClassRef, ModuleRef, PackageRef},
};
use crate::jvm::annotation::{Annotation, TypeAnnotation};

/// A bootstrap method entry, as recorded by the `BootstrapMethods`
/// attribute and referenced by `invokedynamic` instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapMethod {
    /// The bootstrap method handle.
    pub method: MethodHandle,
    /// The static arguments passed to the bootstrap method.
    pub arguments: Vec<ConstantValue>,
}

/// One entry of an `InnerClasses` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerClassInfo {
    /// The inner class itself.
    pub inner_class: ClassRef,
    /// The class or interface it is a member of, or `None` if it is not a
    /// member (e.g. a local or anonymous class).
    pub outer_class: Option<ClassRef>,
    /// The simple name used in source, or `None` for anonymous classes.
    pub inner_name: Option<String>,
    /// The inner class's own access flags, as declared at the point of
    /// use.
    pub access_flags: super::class::NestedClassAccessFlags,
}

/// An `EnclosingMethod` attribute: identifies the method or constructor
/// that immediately encloses a local or anonymous class.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingMethod {
    /// The enclosing class.
    pub class: ClassRef,
    /// The enclosing method's name and descriptor, or `None` if the class
    /// is enclosed directly by an initializer rather than a method body.
    pub method_name_and_descriptor: Option<(String, String)>,
}

/// One component of a `record` class, from the `Record` attribute.
#[derive(Debug, Clone)]
pub struct RecordComponent {
    /// The component's name.
    pub name: String,
    /// The component's parsed type.
    pub component_type: super::descriptor::FieldType,
    /// The component's generic signature, if any.
    pub signature: Option<String>,
    /// Annotations applied to the component's type.
    pub type_annotations: Vec<TypeAnnotation>,
    /// Attributes not recognized by any named field above.
    pub free_attributes: Vec<Attribute>,
}

/// A single attribute, tagged by the `Utf8` name it was parsed under.
///
/// Attributes whose name is not in this registry are retained as
/// [`Attribute::Unrecognized`] rather than rejected.
#[derive(Debug, Clone)]
pub enum Attribute {
    /// `ConstantValue`: a field's compile-time constant initializer.
    ConstantValue(ConstantValue),
    /// `Code`: a method's bytecode and related tables.
    Code(MethodBody),
    /// `StackMapTable`: verifier type state snapshots.
    StackMapTable(Vec<StackMapFrame>),
    /// `Exceptions`: a method's checked `throws` clause.
    Exceptions(Vec<ClassRef>),
    /// `InnerClasses`: nested class relationships.
    InnerClasses(Vec<InnerClassInfo>),
    /// `EnclosingMethod`: the method enclosing a local/anonymous class.
    EnclosingMethod(EnclosingMethod),
    /// `Synthetic`: marker for compiler-generated members.
    Synthetic,
    /// `Signature`: a generic type signature.
    Signature(String),
    /// `SourceFile`: the name of the source file this class was compiled
    /// from.
    SourceFile(String),
    /// `SourceDebugExtension`: vendor-specific debugging information.
    SourceDebugExtension(Vec<u8>),
    /// `LineNumberTable`: a method's source line mapping.
    LineNumberTable(Vec<super::code::LineNumberTableEntry>),
    /// `LocalVariableTable`: a method's local variable names and types.
    LocalVariableTable(Vec<super::code::LocalVariableTableEntry>),
    /// `LocalVariableTypeTable`: generic signature counterpart of
    /// `LocalVariableTable`.
    LocalVariableTypeTable(Vec<super::code::LocalVariableTypeTableEntry>),
    /// `Deprecated`: marker for deprecated members.
    Deprecated,
    /// `RuntimeVisibleAnnotations`: annotations visible via reflection.
    RuntimeVisibleAnnotations(Vec<Annotation>),
    /// `RuntimeInvisibleAnnotations`: annotations not visible via
    /// reflection.
    RuntimeInvisibleAnnotations(Vec<Annotation>),
    /// `RuntimeVisibleParameterAnnotations`: per-parameter annotations
    /// visible via reflection.
    RuntimeVisibleParameterAnnotations(Vec<Vec<Annotation>>),
    /// `RuntimeInvisibleParameterAnnotations`: per-parameter annotations
    /// not visible via reflection.
    RuntimeInvisibleParameterAnnotations(Vec<Vec<Annotation>>),
    /// `RuntimeVisibleTypeAnnotations`: type-use annotations visible via
    /// reflection.
    RuntimeVisibleTypeAnnotations(Vec<TypeAnnotation>),
    /// `RuntimeInvisibleTypeAnnotations`: type-use annotations not visible
    /// via reflection.
    RuntimeInvisibleTypeAnnotations(Vec<TypeAnnotation>),
    /// `AnnotationDefault`: an annotation interface element's default
    /// value.
    AnnotationDefault(super::annotation::ElementValue),
    /// `BootstrapMethods`: bootstrap methods referenced by `invokedynamic`.
    BootstrapMethods(Vec<BootstrapMethod>),
    /// `MethodParameters`: formal parameter names and flags.
    MethodParameters(Vec<MethodParameter>),
    /// `Module`: a module descriptor (only on `module-info.class`).
    Module(Box<super::module::Module>),
    /// `ModulePackages`: every package a module's code is organized under.
    ModulePackages(Vec<PackageRef>),
    /// `ModuleMainClass`: a module's default launch entry point.
    ModuleMainClass(ClassRef),
    /// `NestHost`: identifies this class's nest host.
    NestHost(ClassRef),
    /// `NestMembers`: every class belonging to this class's nest.
    NestMembers(Vec<ClassRef>),
    /// `Record`: a `record` class's components.
    Record(Vec<RecordComponent>),
    /// `PermittedSubclasses`: a `sealed` class's permitted direct
    /// subclasses.
    PermittedSubclasses(Vec<ClassRef>),
    /// An attribute whose name is not in this registry; its declared
    /// length and raw bytes are kept as-is.
    Unrecognized {
        /// The attribute's name.
        name: String,
        /// The attribute's undecoded body.
        bytes: Vec<u8>,
    },
}

impl Attribute {
    /// The attribute's name, as it appears in the constant pool.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ConstantValue(_) => "ConstantValue",
            Self::Code(_) => "Code",
            Self::StackMapTable(_) => "StackMapTable",
            Self::Exceptions(_) => "Exceptions",
            Self::InnerClasses(_) => "InnerClasses",
            Self::EnclosingMethod(_) => "EnclosingMethod",
            Self::Synthetic => "Synthetic",
            Self::Signature(_) => "Signature",
            Self::SourceFile(_) => "SourceFile",
            Self::SourceDebugExtension(_) => "SourceDebugExtension",
            Self::LineNumberTable(_) => "LineNumberTable",
            Self::LocalVariableTable(_) => "LocalVariableTable",
            Self::LocalVariableTypeTable(_) => "LocalVariableTypeTable",
            Self::Deprecated => "Deprecated",
            Self::RuntimeVisibleAnnotations(_) => "RuntimeVisibleAnnotations",
            Self::RuntimeInvisibleAnnotations(_) => "RuntimeInvisibleAnnotations",
            Self::RuntimeVisibleParameterAnnotations(_) => "RuntimeVisibleParameterAnnotations",
            Self::RuntimeInvisibleParameterAnnotations(_) => "RuntimeInvisibleParameterAnnotations",
            Self::RuntimeVisibleTypeAnnotations(_) => "RuntimeVisibleTypeAnnotations",
            Self::RuntimeInvisibleTypeAnnotations(_) => "RuntimeInvisibleTypeAnnotations",
            Self::AnnotationDefault(_) => "AnnotationDefault",
            Self::BootstrapMethods(_) => "BootstrapMethods",
            Self::MethodParameters(_) => "MethodParameters",
            Self::Module(_) => "Module",
            Self::ModulePackages(_) => "ModulePackages",
            Self::ModuleMainClass(_) => "ModuleMainClass",
            Self::NestHost(_) => "NestHost",
            Self::NestMembers(_) => "NestMembers",
            Self::Record(_) => "Record",
            Self::PermittedSubclasses(_) => "PermittedSubclasses",
            Self::Unrecognized { name, .. } => name,
        }
    }
}

/// One entry of a `MethodParameters` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodParameter {
    /// The parameter's name, if the class file declares one.
    pub name: Option<String>,
    /// The parameter's flags (`ACC_FINAL`, `ACC_SYNTHETIC`, `ACC_MANDATED`).
    pub access_flags: MethodParameterAccessFlags,
}

bitflags::bitflags! {
    /// A [`MethodParameter`]'s flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodParameterAccessFlags: u16 {
        /// Declared `final`.
        const FINAL = 0x0010;
        /// Not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Implicitly declared by the compiler.
        const MANDATED = 0x8000;
    }
}
