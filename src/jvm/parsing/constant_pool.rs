use crate::jvm::constant_pool::{ConstantPool, Entry, Slot};

use super::{reader::FromReader, ByteReader, Error};

impl FromReader for ConstantPool {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let pool_count = reader.u2()?;
        let mut slots = Vec::with_capacity(pool_count as usize);
        slots.push(Slot::Padding);
        while slots.len() < pool_count as usize {
            let entry = Entry::from_reader(reader)?;
            let is_wide = entry.is_wide();
            slots.push(Slot::Entry(entry));
            if is_wide {
                slots.push(Slot::Padding);
            }
        }
        Ok(ConstantPool::new(slots))
    }
}

/// Tag values for each pool entry variant, per the JVM specification. The
/// modern additions `Dynamic` (17), `Module` (19), and `Package` (20) are
/// intentionally not modeled here.
mod tag {
    pub(super) const UTF8: u8 = 1;
    pub(super) const INTEGER: u8 = 3;
    pub(super) const FLOAT: u8 = 4;
    pub(super) const LONG: u8 = 5;
    pub(super) const DOUBLE: u8 = 6;
    pub(super) const CLASS: u8 = 7;
    pub(super) const STRING: u8 = 8;
    pub(super) const FIELDREF: u8 = 9;
    pub(super) const METHODREF: u8 = 10;
    pub(super) const INTERFACE_METHODREF: u8 = 11;
    pub(super) const NAME_AND_TYPE: u8 = 12;
    pub(super) const METHOD_HANDLE: u8 = 15;
    pub(super) const METHOD_TYPE: u8 = 16;
    pub(super) const INVOKE_DYNAMIC: u8 = 18;
}

impl FromReader for Entry {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let offset = reader.offset();
        let entry_tag = reader.u1()?;
        match entry_tag {
            tag::UTF8 => {
                let length = reader.u2()?;
                let bytes = reader.read(length as usize)?;
                let decoded = cesu8::from_java_cesu8(bytes)
                    .map_err(|_| Error::MalformedClassFile("Utf8 entry is not valid CESU-8"))?;
                Ok(Self::Utf8(decoded.into_owned()))
            }
            tag::INTEGER => Ok(Self::Integer(reader.i4()?)),
            tag::FLOAT => Ok(Self::Float(f32::from_bits(reader.u4()?))),
            tag::LONG => Ok(Self::Long(i64::from(reader.i4()?) << 32 | i64::from(reader.u4()?))),
            tag::DOUBLE => Ok(Self::Double(f64::from_bits(reader.u8()?))),
            tag::CLASS => Ok(Self::Class {
                name_index: reader.u2()?,
            }),
            tag::STRING => Ok(Self::String {
                value_index: reader.u2()?,
            }),
            tag::FIELDREF => Ok(Self::Fieldref {
                class_index: reader.u2()?,
                name_and_type_index: reader.u2()?,
            }),
            tag::METHODREF => Ok(Self::Methodref {
                class_index: reader.u2()?,
                name_and_type_index: reader.u2()?,
            }),
            tag::INTERFACE_METHODREF => Ok(Self::InterfaceMethodref {
                class_index: reader.u2()?,
                name_and_type_index: reader.u2()?,
            }),
            tag::NAME_AND_TYPE => Ok(Self::NameAndType {
                name_index: reader.u2()?,
                descriptor_index: reader.u2()?,
            }),
            tag::METHOD_HANDLE => Ok(Self::MethodHandle {
                reference_kind: reader.u1()?,
                reference_index: reader.u2()?,
            }),
            tag::METHOD_TYPE => Ok(Self::MethodType {
                descriptor_index: reader.u2()?,
            }),
            tag::INVOKE_DYNAMIC => Ok(Self::InvokeDynamic {
                bootstrap_method_attr_index: reader.u2()?,
                name_and_type_index: reader.u2()?,
            }),
            other => Err(Error::UnknownTag {
                kind: "constant pool",
                tag: u32::from(other),
                offset,
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_utf8_entry() {
        let data = [tag::UTF8, 0x00, 0x03, b'f', b'o', b'o'];
        let mut reader = ByteReader::new(&data);
        assert_eq!(Entry::from_reader(&mut reader).unwrap(), Entry::Utf8("foo".into()));
    }

    #[test]
    fn parses_long_as_two_slots() {
        // pool_count=5 declares 4 usable slots: Utf8("x"), Long(42), <pad>, Utf8("y")
        let data = [
            0x00, 0x05, // pool_count
            tag::UTF8, 0x00, 0x01, b'x', //
            tag::LONG, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A, //
            tag::UTF8, 0x00, 0x01, b'y', //
        ];
        let mut reader = ByteReader::new(&data);
        let pool = ConstantPool::from_reader(&mut reader).unwrap();
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.get_str(1).unwrap(), "x");
        assert_eq!(pool.get_entry(2).unwrap(), &Entry::Long(42));
        assert_eq!(pool.get_str(4).unwrap(), "y");
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let data = [0xFF];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            Entry::from_reader(&mut reader),
            Err(Error::UnknownTag { kind: "constant pool", .. })
        ));
    }
}
