use crate::jvm::{attribute::Attribute, method::{AccessFlags, Method}};

use super::{attribute::parse_attribute_list, take_attribute, take_marker, ByteReader, ClassElement, Context, Error};

pub(crate) struct RawMethodInfo {
    access_flags: u16,
    name_index: u16,
    descriptor_index: u16,
    attributes: Vec<Attribute>,
}

impl RawMethodInfo {
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

impl ClassElement for Method {
    type Raw = RawMethodInfo;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        let mut attributes = raw.attributes;

        let body = take_attribute(&mut attributes, "duplicate Code", |a| match a {
            Attribute::Code(body) => Ok(body),
            other => Err(other),
        })?;
        let exceptions = take_attribute(&mut attributes, "duplicate Exceptions", |a| match a {
            Attribute::Exceptions(e) => Ok(e),
            other => Err(other),
        })?
        .unwrap_or_default();
        let signature = take_attribute(&mut attributes, "duplicate Signature", |a| match a {
            Attribute::Signature(s) => Ok(s),
            other => Err(other),
        })?;
        let is_deprecated = take_marker(&mut attributes, |a| matches!(a, Attribute::Deprecated));
        take_marker(&mut attributes, |a| matches!(a, Attribute::Synthetic));

        let name = ctx.constant_pool.get_str(raw.name_index)?.to_owned();
        let access_flags = AccessFlags::from_bits_truncate(raw.access_flags);
        let descriptor = ctx.constant_pool.get_str(raw.descriptor_index)?.parse()?;

        if name == Method::CLASS_INITIALIZER_NAME
            && ctx.class_version.major > crate::jvm::class::ClassVersion::RELAXED_CLINIT_SIGNATURE_FLOOR
            && !access_flags.contains(AccessFlags::STATIC)
        {
            return Err(Error::MalformedClassFile(
                "<clinit> must be static in class files newer than version 51",
            ));
        }

        Ok(Self {
            access_flags,
            name,
            descriptor,
            body,
            exceptions,
            is_deprecated,
            signature,
            free_attributes: attributes,
        })
    }
}
