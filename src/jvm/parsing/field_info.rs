use crate::jvm::{attribute::Attribute, field::{AccessFlags, Field}};

use super::{attribute::parse_attribute_list, take_attribute, take_marker, ByteReader, ClassElement, Context, Error};

pub(crate) struct RawFieldInfo {
    access_flags: u16,
    name_index: u16,
    descriptor_index: u16,
    attributes: Vec<Attribute>,
}

impl RawFieldInfo {
    pub(crate) fn from_reader(reader: &mut ByteReader<'_>, ctx: &Context) -> Result<Self, Error> {
        let access_flags = reader.u2()?;
        let name_index = reader.u2()?;
        let descriptor_index = reader.u2()?;
        let attributes = parse_attribute_list(reader, ctx)?;
        Ok(Self {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }
}

impl ClassElement for Field {
    type Raw = RawFieldInfo;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        let mut attributes = raw.attributes;

        let constant_value = take_attribute(&mut attributes, "duplicate ConstantValue", |a| {
            match a {
                Attribute::ConstantValue(v) => Ok(v),
                other => Err(other),
            }
        })?;
        let signature = take_attribute(&mut attributes, "duplicate Signature", |a| match a {
            Attribute::Signature(s) => Ok(s),
            other => Err(other),
        })?;
        let is_deprecated = take_marker(&mut attributes, |a| matches!(a, Attribute::Deprecated));
        take_marker(&mut attributes, |a| matches!(a, Attribute::Synthetic));

        Ok(Self {
            access_flags: AccessFlags::from_bits_truncate(raw.access_flags),
            name: ctx.constant_pool.get_str(raw.name_index)?.to_owned(),
            field_type: ctx.constant_pool.get_str(raw.descriptor_index)?.parse()?,
            constant_value,
            is_deprecated,
            signature,
            free_attributes: attributes,
        })
    }
}
