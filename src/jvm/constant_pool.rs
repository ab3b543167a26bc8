//! The constant pool: a class file's 1-indexed table of literals and
//! symbolic references.

use super::{
    parsing::Error,
    references::{ClassRef, FieldRef, MethodRef, ModuleRef, NameAndType, PackageRef},
};

/// One slot of a [`ConstantPool`]: either a real entry, or the placeholder
/// that follows a two-slot `Long`/`Double` entry (and occupies index 0).
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Entry(Entry),
    Padding,
}

/// The kind of a method handle, as encoded by `reference_kind` in a
/// `MethodHandle` pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodHandleKind {
    /// `REF_getField`
    GetField,
    /// `REF_getStatic`
    GetStatic,
    /// `REF_putField`
    PutField,
    /// `REF_putStatic`
    PutStatic,
    /// `REF_invokeVirtual`
    InvokeVirtual,
    /// `REF_invokeStatic`
    InvokeStatic,
    /// `REF_invokeSpecial`
    InvokeSpecial,
    /// `REF_newInvokeSpecial`
    NewInvokeSpecial,
    /// `REF_invokeInterface`
    InvokeInterface,
}

/// A method handle constant: a kind plus the field or method it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodHandle {
    /// A handle to a field getter or setter.
    Field {
        /// The kind of field access.
        kind: MethodHandleKind,
        /// The referenced field.
        field: FieldRef,
    },
    /// A handle to a method, including constructors.
    Method {
        /// The kind of method invocation.
        kind: MethodHandleKind,
        /// The referenced method.
        method: MethodRef,
    },
}

/// A constant pool entry. Exactly the fourteen tagged variants the JVM
/// class file format defines.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A modified-UTF-8 string.
    Utf8(String),
    /// A 32-bit signed integer constant.
    Integer(i32),
    /// A 32-bit IEEE 754 float constant.
    Float(f32),
    /// A 64-bit signed integer constant. Occupies two pool slots.
    Long(i64),
    /// A 64-bit IEEE 754 double constant. Occupies two pool slots.
    Double(f64),
    /// A reference to a class or interface, by its `Utf8` binary name.
    Class { name_index: u16 },
    /// A `String` literal, by its `Utf8` contents.
    String { value_index: u16 },
    /// A reference to a field.
    Fieldref {
        class_index: u16,
        name_and_type_index: u16,
    },
    /// A reference to a method on a class.
    Methodref {
        class_index: u16,
        name_and_type_index: u16,
    },
    /// A reference to a method on an interface.
    InterfaceMethodref {
        class_index: u16,
        name_and_type_index: u16,
    },
    /// A `name:descriptor` pair.
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
    /// A method handle.
    MethodHandle {
        reference_kind: u8,
        reference_index: u16,
    },
    /// A method type, by its `Utf8` descriptor.
    MethodType { descriptor_index: u16 },
    /// A dynamically computed call site, as produced by an `invokedynamic`
    /// instruction.
    InvokeDynamic {
        bootstrap_method_attr_index: u16,
        name_and_type_index: u16,
    },
}

impl Entry {
    pub(crate) fn constant_kind(&self) -> &'static str {
        match self {
            Self::Utf8(_) => "Utf8",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Long(_) => "Long",
            Self::Double(_) => "Double",
            Self::Class { .. } => "Class",
            Self::String { .. } => "String",
            Self::Fieldref { .. } => "Fieldref",
            Self::Methodref { .. } => "Methodref",
            Self::InterfaceMethodref { .. } => "InterfaceMethodref",
            Self::NameAndType { .. } => "NameAndType",
            Self::MethodHandle { .. } => "MethodHandle",
            Self::MethodType { .. } => "MethodType",
            Self::InvokeDynamic { .. } => "InvokeDynamic",
        }
    }

    /// Whether this entry occupies two pool slots.
    pub(crate) fn is_wide(&self) -> bool {
        matches!(self, Self::Long(_) | Self::Double(_))
    }
}

/// A resolved constant value usable as e.g. a field's `ConstantValue` or an
/// `ldc` operand.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// A 32-bit signed integer.
    Integer(i32),
    /// A 32-bit IEEE 754 float.
    Float(f32),
    /// A 64-bit signed integer.
    Long(i64),
    /// A 64-bit IEEE 754 double.
    Double(f64),
    /// A string literal.
    String(String),
    /// A class literal (as used by `ldc` on a `Class` entry).
    Class(ClassRef),
    /// A method type literal.
    MethodType(String),
    /// A method handle literal.
    MethodHandle(MethodHandle),
}

/// The 1-indexed table of pool entries for one class file.
///
/// Index 0, and the slot immediately following each `Long`/`Double` entry,
/// hold [`Slot::Padding`] and resolve to nothing.
#[derive(Debug, Clone)]
pub struct ConstantPool {
    slots: Vec<Slot>,
}

impl ConstantPool {
    pub(crate) fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    /// The number of slots in the pool, including slot 0 and any padding
    /// slots. Equal to the class file's declared `constant_pool_count`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool has no real entries (impossible for a valid class
    /// file, since slot 0 always exists).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over the pool's real entries, alongside their 1-based
    /// indices. Padding slots are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Entry)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            #[allow(clippy::cast_possible_truncation)]
            match slot {
                Slot::Entry(entry) => Some((i as u16, entry)),
                Slot::Padding => None,
            }
        })
    }

    fn slot(&self, index: u16) -> Result<&Slot, Error> {
        self.slots.get(index as usize).ok_or(Error::PoolIndexOutOfRange {
            index,
            #[allow(clippy::cast_possible_truncation)]
            pool_count: self.slots.len() as u16,
        })
    }

    /// Resolves `index` to its entry, checking it is not zero, out of
    /// range, or a `Long`/`Double` padding slot.
    pub(crate) fn get_entry(&self, index: u16) -> Result<&Entry, Error> {
        if index == 0 {
            return Err(Error::PoolIndexOutOfRange {
                index,
                #[allow(clippy::cast_possible_truncation)]
                pool_count: self.slots.len() as u16,
            });
        }
        match self.slot(index)? {
            Slot::Entry(entry) => Ok(entry),
            Slot::Padding => Err(Error::PoolIndexOutOfRange {
                index,
                #[allow(clippy::cast_possible_truncation)]
                pool_count: self.slots.len() as u16,
            }),
        }
    }

    /// Resolves an index that is permitted to be zero, in which case
    /// `Ok(None)` is returned without an error.
    pub(crate) fn get_entry_optional(&self, index: u16) -> Result<Option<&Entry>, Error> {
        if index == 0 {
            return Ok(None);
        }
        self.get_entry(index).map(Some)
    }

    pub(crate) fn get_str(&self, index: u16) -> Result<&str, Error> {
        match self.get_entry(index)? {
            Entry::Utf8(s) => Ok(s.as_str()),
            _ => Err(Error::PoolTypeMismatch {
                index,
                expected: "Utf8",
            }),
        }
    }

    pub(crate) fn get_class_ref(&self, index: u16) -> Result<ClassRef, Error> {
        match self.get_entry(index)? {
            Entry::Class { name_index } => {
                let name = self.get_str(*name_index)?;
                Ok(ClassRef::new(name.replace('/', ".")))
            }
            _ => Err(Error::PoolTypeMismatch {
                index,
                expected: "Class",
            }),
        }
    }

    pub(crate) fn get_class_ref_optional(&self, index: u16) -> Result<Option<ClassRef>, Error> {
        if index == 0 {
            return Ok(None);
        }
        self.get_class_ref(index).map(Some)
    }

    pub(crate) fn get_name_and_type(&self, index: u16) -> Result<NameAndType, Error> {
        match self.get_entry(index)? {
            Entry::NameAndType {
                name_index,
                descriptor_index,
            } => Ok(NameAndType {
                name: self.get_str(*name_index)?.to_owned(),
                descriptor: self.get_str(*descriptor_index)?.to_owned(),
            }),
            _ => Err(Error::PoolTypeMismatch {
                index,
                expected: "NameAndType",
            }),
        }
    }

    pub(crate) fn get_field_ref(&self, index: u16) -> Result<FieldRef, Error> {
        match self.get_entry(index)? {
            Entry::Fieldref {
                class_index,
                name_and_type_index,
            } => {
                let owner = self.get_class_ref(*class_index)?;
                let NameAndType { name, .. } = self.get_name_and_type(*name_and_type_index)?;
                Ok(FieldRef { owner, name })
            }
            _ => Err(Error::PoolTypeMismatch {
                index,
                expected: "Fieldref",
            }),
        }
    }

    fn get_method_ref_like(&self, index: u16, expected: &'static str) -> Result<MethodRef, Error> {
        let (class_index, name_and_type_index) = match self.get_entry(index)? {
            Entry::Methodref {
                class_index,
                name_and_type_index,
            } if expected == "Methodref" => (*class_index, *name_and_type_index),
            Entry::InterfaceMethodref {
                class_index,
                name_and_type_index,
            } if expected == "InterfaceMethodref" => (*class_index, *name_and_type_index),
            _ => return Err(Error::PoolTypeMismatch { index, expected }),
        };
        let owner = self.get_class_ref(class_index)?;
        let NameAndType { name, .. } = self.get_name_and_type(name_and_type_index)?;
        Ok(MethodRef { owner, name })
    }

    pub(crate) fn get_method_ref(&self, index: u16) -> Result<MethodRef, Error> {
        self.get_method_ref_like(index, "Methodref")
    }

    pub(crate) fn get_interface_method_ref(&self, index: u16) -> Result<MethodRef, Error> {
        self.get_method_ref_like(index, "InterfaceMethodref")
    }

    /// Resolves a `Methodref` or `InterfaceMethodref` entry, whichever it
    /// is. Used where the JVM spec permits either (e.g. `invokespecial`).
    pub(crate) fn get_any_method_ref(&self, index: u16) -> Result<MethodRef, Error> {
        match self.get_entry(index)? {
            Entry::Methodref { .. } => self.get_method_ref(index),
            Entry::InterfaceMethodref { .. } => self.get_interface_method_ref(index),
            _ => Err(Error::PoolTypeMismatch {
                index,
                expected: "Methodref|InterfaceMethodref",
            }),
        }
    }

    pub(crate) fn get_constant_value(&self, index: u16) -> Result<ConstantValue, Error> {
        match self.get_entry(index)? {
            Entry::Integer(v) => Ok(ConstantValue::Integer(*v)),
            Entry::Float(v) => Ok(ConstantValue::Float(*v)),
            Entry::Long(v) => Ok(ConstantValue::Long(*v)),
            Entry::Double(v) => Ok(ConstantValue::Double(*v)),
            Entry::String { value_index } => {
                Ok(ConstantValue::String(self.get_str(*value_index)?.to_owned()))
            }
            Entry::Class { .. } => Ok(ConstantValue::Class(self.get_class_ref(index)?)),
            Entry::MethodType { descriptor_index } => Ok(ConstantValue::MethodType(
                self.get_str(*descriptor_index)?.to_owned(),
            )),
            Entry::MethodHandle { .. } => {
                Ok(ConstantValue::MethodHandle(self.get_method_handle(index)?))
            }
            _ => Err(Error::PoolTypeMismatch {
                index,
                expected: "constant value",
            }),
        }
    }

    pub(crate) fn get_method_handle(&self, index: u16) -> Result<MethodHandle, Error> {
        match self.get_entry(index)? {
            Entry::MethodHandle {
                reference_kind,
                reference_index,
            } => {
                let kind = match reference_kind {
                    1 => MethodHandleKind::GetField,
                    2 => MethodHandleKind::GetStatic,
                    3 => MethodHandleKind::PutField,
                    4 => MethodHandleKind::PutStatic,
                    5 => MethodHandleKind::InvokeVirtual,
                    6 => MethodHandleKind::InvokeStatic,
                    7 => MethodHandleKind::InvokeSpecial,
                    8 => MethodHandleKind::NewInvokeSpecial,
                    9 => MethodHandleKind::InvokeInterface,
                    tag => {
                        return Err(Error::UnknownTag {
                            kind: "method handle reference",
                            tag: u32::from(*tag),
                            offset: 0,
                        })
                    }
                };
                match reference_kind {
                    1..=4 => Ok(MethodHandle::Field {
                        kind,
                        field: self.get_field_ref(*reference_index)?,
                    }),
                    5..=8 => Ok(MethodHandle::Method {
                        kind,
                        method: self.get_method_ref(*reference_index)?,
                    }),
                    9 => Ok(MethodHandle::Method {
                        kind,
                        method: self.get_interface_method_ref(*reference_index)?,
                    }),
                    _ => unreachable!("checked above"),
                }
            }
            _ => Err(Error::PoolTypeMismatch {
                index,
                expected: "MethodHandle",
            }),
        }
    }

    /// Resolves a module name directly from a `Utf8` entry. Module-related
    /// constant pool tags (`Module`, `Package`) postdate the fourteen
    /// entries modeled here, so module and package names are looked up as
    /// plain strings instead.
    pub(crate) fn get_module_ref(&self, index: u16) -> Result<ModuleRef, Error> {
        Ok(ModuleRef {
            name: self.get_str(index)?.to_owned(),
        })
    }

    pub(crate) fn get_package_ref(&self, index: u16) -> Result<PackageRef, Error> {
        Ok(PackageRef {
            binary_name: self.get_str(index)?.replace('/', "."),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pool(entries: Vec<Slot>) -> ConstantPool {
        ConstantPool::new(entries)
    }

    #[test]
    fn index_zero_is_out_of_range() {
        let cp = pool(vec![Slot::Padding, Slot::Entry(Entry::Utf8("x".into()))]);
        assert!(matches!(
            cp.get_entry(0),
            Err(Error::PoolIndexOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn long_occupies_two_slots() {
        let cp = pool(vec![
            Slot::Padding,
            Slot::Entry(Entry::Utf8("x".into())),
            Slot::Entry(Entry::Long(42)),
            Slot::Padding,
            Slot::Entry(Entry::Utf8("y".into())),
        ]);
        assert_eq!(cp.len(), 5);
        assert!(matches!(
            cp.get_entry(3),
            Err(Error::PoolIndexOutOfRange { index: 3, .. })
        ));
        assert_eq!(cp.get_str(4).unwrap(), "y");
    }

    #[test]
    fn type_mismatch_on_wrong_variant() {
        let cp = pool(vec![Slot::Padding, Slot::Entry(Entry::Integer(1))]);
        assert!(matches!(
            cp.get_str(1),
            Err(Error::PoolTypeMismatch { index: 1, .. })
        ));
    }
}
