//! The top-level class file parser: ties the magic check, version, constant
//! pool, and every attribute-bearing section together into a [`Class`].

use crate::jvm::{
    attribute::Attribute,
    class::{Class, ClassAccessFlags, ClassVersion},
    constant_pool::ConstantPool,
};

use super::{
    attribute::parse_attribute_list, field_info::RawFieldInfo, method_info::RawMethodInfo,
    reader::FromReader, take_attribute, take_marker, ByteReader, ClassElement, Context, Error,
};

const JAVA_CLASS_MAGIC: u32 = 0xCAFE_BABE;

pub(crate) fn parse(reader: &mut ByteReader<'_>) -> Result<Class, Error> {
    let magic = reader.u4()?;
    if magic != JAVA_CLASS_MAGIC {
        return Err(Error::BadMagic { found: magic });
    }

    let minor = reader.u2()?;
    let major = reader.u2()?;
    let class_version = ClassVersion { major, minor };

    let constant_pool = ConstantPool::from_reader(reader)?;

    let access_flags = ClassAccessFlags::from_bits_truncate(reader.u2()?);

    let this_class_index = reader.u2()?;
    let this_class = constant_pool.get_class_ref(this_class_index)?;

    let super_class_index = reader.u2()?;
    let super_class = if super_class_index == 0 {
        if this_class.binary_name != "java.lang.Object" && !access_flags.contains(ClassAccessFlags::MODULE) {
            return Err(Error::MalformedClassFile(
                "super_class may only be zero for java/lang/Object or a module descriptor",
            ));
        }
        None
    } else {
        Some(constant_pool.get_class_ref(super_class_index)?)
    };

    let ctx = Context {
        constant_pool: &constant_pool,
        class_version,
        current_class_binary_name: &this_class.binary_name,
    };

    let interfaces_count = reader.u2()? as usize;
    let interface_indices: Vec<u16> = reader.many(interfaces_count)?;
    let interfaces = interface_indices
        .into_iter()
        .map(|idx| constant_pool.get_class_ref(idx))
        .collect::<Result<_, Error>>()?;

    let fields_count = reader.u2()? as usize;
    let fields = (0..fields_count)
        .map(|_| {
            let raw = RawFieldInfo::from_reader(reader, &ctx)?;
            crate::jvm::field::Field::from_raw(raw, &ctx)
        })
        .collect::<Result<_, Error>>()?;

    let methods_count = reader.u2()? as usize;
    let methods = (0..methods_count)
        .map(|_| {
            let raw = RawMethodInfo::from_reader(reader, &ctx)?;
            crate::jvm::method::Method::from_raw(raw, &ctx)
        })
        .collect::<Result<_, Error>>()?;

    let mut attributes = parse_attribute_list(reader, &ctx)?;

    if !reader.is_exhausted() {
        return Err(Error::MalformedClassFile(
            "trailing bytes after the last class attribute",
        ));
    }

    let source_file = take_attribute(&mut attributes, "duplicate SourceFile", |a| match a {
        Attribute::SourceFile(s) => Ok(s),
        other => Err(other),
    })?;
    let inner_classes = take_attribute(&mut attributes, "duplicate InnerClasses", |a| match a {
        Attribute::InnerClasses(v) => Ok(v),
        other => Err(other),
    })?
    .unwrap_or_default();
    let enclosing_method = take_attribute(&mut attributes, "duplicate EnclosingMethod", |a| {
        match a {
            Attribute::EnclosingMethod(e) => Ok(e),
            other => Err(other),
        }
    })?;
    let signature = take_attribute(&mut attributes, "duplicate Signature", |a| match a {
        Attribute::Signature(s) => Ok(s),
        other => Err(other),
    })?;
    let is_deprecated = take_marker(&mut attributes, |a| matches!(a, Attribute::Deprecated));
    take_marker(&mut attributes, |a| matches!(a, Attribute::Synthetic));
    let bootstrap_methods = take_attribute(&mut attributes, "duplicate BootstrapMethods", |a| {
        match a {
            Attribute::BootstrapMethods(m) => Ok(m),
            other => Err(other),
        }
    })?
    .unwrap_or_default();
    let module = take_attribute(&mut attributes, "duplicate Module", |a| match a {
        Attribute::Module(m) => Ok(*m),
        other => Err(other),
    })?;
    // `ModulePackages` is redundant with `Module`'s own `exports`/`opens`
    // package list and is only kept as a free attribute.
    let nest_host = take_attribute(&mut attributes, "duplicate NestHost", |a| match a {
        Attribute::NestHost(c) => Ok(c),
        other => Err(other),
    })?;
    let nest_members = take_attribute(&mut attributes, "duplicate NestMembers", |a| match a {
        Attribute::NestMembers(v) => Ok(v),
        other => Err(other),
    })?
    .unwrap_or_default();
    let record_components = take_attribute(&mut attributes, "duplicate Record", |a| match a {
        Attribute::Record(v) => Ok(v),
        other => Err(other),
    })?;
    let permitted_subclasses =
        take_attribute(&mut attributes, "duplicate PermittedSubclasses", |a| {
            match a {
                Attribute::PermittedSubclasses(v) => Ok(v),
                other => Err(other),
            }
        })?;
    let source_debug_extension = take_attribute(
        &mut attributes,
        "duplicate SourceDebugExtension",
        |a| match a {
            Attribute::SourceDebugExtension(b) => Ok(b),
            other => Err(other),
        },
    )?;

    Ok(Class {
        version: class_version,
        constant_pool,
        access_flags,
        this_class,
        super_class,
        interfaces,
        fields,
        methods,
        source_file,
        inner_classes,
        enclosing_method,
        signature,
        is_deprecated,
        bootstrap_methods,
        module,
        nest_host,
        nest_members,
        record_components,
        permitted_subclasses,
        source_debug_extension,
        free_attributes: attributes,
    })
}
