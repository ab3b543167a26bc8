//! The top-level class file model.

use std::io::Read;

use bitflags::bitflags;

use super::{
    attribute::{Attribute, BootstrapMethod, InnerClassInfo, RecordComponent},
    constant_pool::ConstantPool,
    field::Field,
    method::Method,
    module::Module,
    parsing::{ByteReader, Error},
    references::ClassRef,
};

bitflags! {
    /// A class's `access_flags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClassAccessFlags: u16 {
        /// Declared `public`.
        const PUBLIC = 0x0001;
        /// Declared `final`.
        const FINAL = 0x0010;
        /// Treat superclass methods specially when invoked by `invokespecial`.
        /// Set by every compiler targeting a modern class file version.
        const SUPER = 0x0020;
        /// Is an interface, not a class.
        const INTERFACE = 0x0200;
        /// Declared `abstract`; must not be instantiated.
        const ABSTRACT = 0x0400;
        /// Not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Is an annotation interface.
        const ANNOTATION = 0x2000;
        /// Declared as an `enum`.
        const ENUM = 0x4000;
        /// Is a module descriptor (`module-info.class`).
        const MODULE = 0x8000;
    }
}

bitflags! {
    /// The access flags an inner class was declared with, as recorded in
    /// an `InnerClasses` entry (a superset of [`ClassAccessFlags`]).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NestedClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

/// The `minor_version`/`major_version` pair of a class file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClassVersion {
    /// The major version, e.g. `52` for Java 8.
    pub major: u16,
    /// The minor version. Nonzero only for some pre-Java-8 preview builds.
    pub minor: u16,
}

impl ClassVersion {
    /// The class file version floor below which `<clinit>` methods are not
    /// required to be `static` and argument-less.
    pub(crate) const RELAXED_CLINIT_SIGNATURE_FLOOR: u16 = 51;
}

/// A fully resolved JVM class or interface.
#[derive(Debug, Clone)]
pub struct Class {
    /// The class file format version.
    pub version: ClassVersion,
    /// The class's resolved constant pool.
    pub constant_pool: ConstantPool,
    /// The class's access flags.
    pub access_flags: ClassAccessFlags,
    /// This class.
    pub this_class: ClassRef,
    /// The superclass, absent only for `java.lang.Object` and module
    /// descriptors.
    pub super_class: Option<ClassRef>,
    /// Directly implemented interfaces.
    pub interfaces: Vec<ClassRef>,
    /// Declared fields.
    pub fields: Vec<Field>,
    /// Declared methods.
    pub methods: Vec<Method>,
    /// The source file this class was compiled from, if recorded.
    pub source_file: Option<String>,
    /// Nested class relationships recorded in `InnerClasses`.
    pub inner_classes: Vec<InnerClassInfo>,
    /// The method enclosing this class, for local/anonymous classes.
    pub enclosing_method: Option<super::attribute::EnclosingMethod>,
    /// The class's generic signature, if any.
    pub signature: Option<String>,
    /// Whether this class is marked `Deprecated`.
    pub is_deprecated: bool,
    /// Bootstrap methods referenced by this class's `invokedynamic`
    /// instructions.
    pub bootstrap_methods: Vec<BootstrapMethod>,
    /// The JPMS module descriptor, present only on `module-info.class`.
    pub module: Option<Module>,
    /// The nest host, if this class is a nest member of another class.
    pub nest_host: Option<ClassRef>,
    /// Other members of this class's nest, if this class is a nest host.
    pub nest_members: Vec<ClassRef>,
    /// This class's `record` components, if it is a record.
    pub record_components: Option<Vec<RecordComponent>>,
    /// The classes permitted to directly extend/implement this `sealed`
    /// class, if it is sealed.
    pub permitted_subclasses: Option<Vec<ClassRef>>,
    /// `SourceDebugExtension` raw contents, if present.
    pub source_debug_extension: Option<Vec<u8>>,
    /// Attributes not recognized by any named field above.
    pub free_attributes: Vec<Attribute>,
}

impl Class {
    /// Parses a class file from an in-memory byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        Self::from_reader_inner(&mut reader)
    }

    /// Parses a class file from any [`Read`] source, buffering it fully
    /// first (class files are read in a single linear pass and are
    /// typically small).
    pub fn from_reader<R: Read>(mut source: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .map_err(|e| Error::short_read(0, e))?;
        Self::from_bytes(&bytes)
    }

    /// Parses a class file found at `path` on the filesystem.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| Error::short_read(0, e))?;
        Self::from_reader(file)
    }

    fn from_reader_inner(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        super::parsing::parse_class_file(reader)
    }
}
