//! The attribute dispatch table: converts a name-tagged, length-prefixed
//! byte blob into the matching [`Attribute`] variant, or leaves it as
//! [`Attribute::Unrecognized`] if the name isn't registered.

use crate::jvm::{
    attribute::{
        Attribute, BootstrapMethod, EnclosingMethod, InnerClassInfo, MethodParameter,
        MethodParameterAccessFlags, RecordComponent,
    },
    class::NestedClassAccessFlags,
    module::Module,
};

use super::{
    annotation::{self, RawElementValue},
    code,
    module::RawModule,
    reader::FromReader,
    take_attribute, ByteReader, ClassElement, Context, Error,
};

/// An attribute before its name has been resolved or its body interpreted:
/// just the `Utf8` name index and the raw bytes of its declared length.
pub(crate) struct RawAttributeInfo {
    name_index: u16,
    bytes: Vec<u8>,
}

impl FromReader for RawAttributeInfo {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let name_index = reader.u2()?;
        let length = reader.u4()?;
        let bytes = reader.read(length as usize)?.to_vec();
        Ok(Self { name_index, bytes })
    }
}

/// Converts every raw attribute in `raws` into its cooked form.
pub(crate) fn cook_attributes(
    raws: Vec<RawAttributeInfo>,
    ctx: &Context,
) -> Result<Vec<Attribute>, Error> {
    raws.into_iter().map(|raw| cook_one(raw, ctx)).collect()
}

/// Reads an attribute count followed by that many attributes, then cooks
/// them. The shape every attribute-bearing structure (class, field, method,
/// `Code`, `Record` component) uses to store its attribute list.
pub(crate) fn parse_attribute_list(
    reader: &mut ByteReader<'_>,
    ctx: &Context,
) -> Result<Vec<Attribute>, Error> {
    let count = reader.u2()? as usize;
    let raws: Vec<RawAttributeInfo> = reader.many(count)?;
    cook_attributes(raws, ctx)
}

fn cook_one(raw: RawAttributeInfo, ctx: &Context) -> Result<Attribute, Error> {
    let name = ctx.constant_pool.get_str(raw.name_index)?.to_owned();
    let declared = raw.bytes.len() as u32;
    let mut reader = ByteReader::new(&raw.bytes);
    let cp = ctx.constant_pool;

    let attribute = match name.as_str() {
        "ConstantValue" => Attribute::ConstantValue(cp.get_constant_value(reader.u2()?)?),
        "Code" => Attribute::Code(code::parse_code(&mut reader, ctx)?),
        "StackMapTable" => Attribute::StackMapTable(code::parse_stack_map_table(&mut reader, ctx)?),
        "Exceptions" => Attribute::Exceptions(code::parse_exceptions(&mut reader, ctx)?),
        "InnerClasses" => {
            let count = reader.u2()? as usize;
            let entries = (0..count)
                .map(|_| {
                    let inner_class_index = reader.u2()?;
                    let outer_class_index = reader.u2()?;
                    let inner_name_index = reader.u2()?;
                    let access_flags = reader.u2()?;
                    Ok(InnerClassInfo {
                        inner_class: cp.get_class_ref(inner_class_index)?,
                        outer_class: cp.get_class_ref_optional(outer_class_index)?,
                        inner_name: (inner_name_index != 0)
                            .then(|| cp.get_str(inner_name_index))
                            .transpose()?
                            .map(str::to_owned),
                        access_flags: NestedClassAccessFlags::from_bits_truncate(access_flags),
                    })
                })
                .collect::<Result<_, Error>>()?;
            Attribute::InnerClasses(entries)
        }
        "EnclosingMethod" => {
            let class_index = reader.u2()?;
            let method_index = reader.u2()?;
            Attribute::EnclosingMethod(EnclosingMethod {
                class: cp.get_class_ref(class_index)?,
                method_name_and_descriptor: (method_index != 0)
                    .then(|| cp.get_name_and_type(method_index))
                    .transpose()?
                    .map(|nat| (nat.name, nat.descriptor)),
            })
        }
        "Synthetic" => Attribute::Synthetic,
        "Signature" => Attribute::Signature(cp.get_str(reader.u2()?)?.to_owned()),
        "SourceFile" => Attribute::SourceFile(cp.get_str(reader.u2()?)?.to_owned()),
        "SourceDebugExtension" => Attribute::SourceDebugExtension(reader.read_to_end()?.to_vec()),
        "LineNumberTable" => Attribute::LineNumberTable(code::parse_line_number_table(&mut reader)?),
        "LocalVariableTable" => {
            Attribute::LocalVariableTable(code::parse_local_variable_table(&mut reader, ctx)?)
        }
        "LocalVariableTypeTable" => Attribute::LocalVariableTypeTable(
            code::parse_local_variable_type_table(&mut reader, ctx)?,
        ),
        "Deprecated" => Attribute::Deprecated,
        "RuntimeVisibleAnnotations" => {
            Attribute::RuntimeVisibleAnnotations(annotation::parse_annotations(&mut reader, ctx)?)
        }
        "RuntimeInvisibleAnnotations" => Attribute::RuntimeInvisibleAnnotations(
            annotation::parse_annotations(&mut reader, ctx)?,
        ),
        "RuntimeVisibleParameterAnnotations" => Attribute::RuntimeVisibleParameterAnnotations(
            annotation::parse_parameter_annotations(&mut reader, ctx)?,
        ),
        "RuntimeInvisibleParameterAnnotations" => {
            Attribute::RuntimeInvisibleParameterAnnotations(
                annotation::parse_parameter_annotations(&mut reader, ctx)?,
            )
        }
        "RuntimeVisibleTypeAnnotations" => Attribute::RuntimeVisibleTypeAnnotations(
            annotation::parse_type_annotations(&mut reader, ctx)?,
        ),
        "RuntimeInvisibleTypeAnnotations" => Attribute::RuntimeInvisibleTypeAnnotations(
            annotation::parse_type_annotations(&mut reader, ctx)?,
        ),
        "AnnotationDefault" => {
            let raw_value = RawElementValue::from_reader(&mut reader)?;
            Attribute::AnnotationDefault(crate::jvm::annotation::ElementValue::from_raw(
                raw_value, ctx,
            )?)
        }
        "BootstrapMethods" => {
            let count = reader.u2()? as usize;
            let methods = (0..count)
                .map(|_| {
                    let method_ref_index = reader.u2()?;
                    let args_count = reader.u2()? as usize;
                    let arg_indices: Vec<u16> = reader.many(args_count)?;
                    Ok(BootstrapMethod {
                        method: cp.get_method_handle(method_ref_index)?,
                        arguments: arg_indices
                            .into_iter()
                            .map(|idx| cp.get_constant_value(idx))
                            .collect::<Result<_, Error>>()?,
                    })
                })
                .collect::<Result<_, Error>>()?;
            Attribute::BootstrapMethods(methods)
        }
        "MethodParameters" => {
            let count = reader.u1()? as usize;
            let parameters = (0..count)
                .map(|_| {
                    let name_index = reader.u2()?;
                    let access_flags = reader.u2()?;
                    Ok(MethodParameter {
                        name: (name_index != 0)
                            .then(|| cp.get_str(name_index))
                            .transpose()?
                            .map(str::to_owned),
                        access_flags: MethodParameterAccessFlags::from_bits_truncate(access_flags),
                    })
                })
                .collect::<Result<_, Error>>()?;
            Attribute::MethodParameters(parameters)
        }
        "Module" => {
            let raw_module = RawModule::from_reader(&mut reader)?;
            Attribute::Module(Box::new(Module::from_raw(raw_module, ctx)?))
        }
        "ModulePackages" => {
            let count = reader.u2()? as usize;
            let indices: Vec<u16> = reader.many(count)?;
            Attribute::ModulePackages(
                indices
                    .into_iter()
                    .map(|idx| cp.get_package_ref(idx))
                    .collect::<Result<_, Error>>()?,
            )
        }
        "ModuleMainClass" => Attribute::ModuleMainClass(cp.get_class_ref(reader.u2()?)?),
        "NestHost" => Attribute::NestHost(cp.get_class_ref(reader.u2()?)?),
        "NestMembers" => {
            let count = reader.u2()? as usize;
            let indices: Vec<u16> = reader.many(count)?;
            Attribute::NestMembers(
                indices
                    .into_iter()
                    .map(|idx| cp.get_class_ref(idx))
                    .collect::<Result<_, Error>>()?,
            )
        }
        "Record" => {
            let count = reader.u2()? as usize;
            let components = (0..count)
                .map(|_| {
                    let name_index = reader.u2()?;
                    let descriptor_index = reader.u2()?;
                    let mut attrs = parse_attribute_list(&mut reader, ctx)?;
                    let signature =
                        take_attribute(&mut attrs, "duplicate Signature", |a| match a {
                            Attribute::Signature(s) => Ok(s),
                            other => Err(other),
                        })?;
                    let visible = take_attribute(
                        &mut attrs,
                        "duplicate RuntimeVisibleTypeAnnotations",
                        |a| match a {
                            Attribute::RuntimeVisibleTypeAnnotations(v) => Ok(v),
                            other => Err(other),
                        },
                    )?
                    .unwrap_or_default();
                    let invisible = take_attribute(
                        &mut attrs,
                        "duplicate RuntimeInvisibleTypeAnnotations",
                        |a| match a {
                            Attribute::RuntimeInvisibleTypeAnnotations(v) => Ok(v),
                            other => Err(other),
                        },
                    )?
                    .unwrap_or_default();
                    let mut type_annotations = visible;
                    type_annotations.extend(invisible);
                    Ok(RecordComponent {
                        name: cp.get_str(name_index)?.to_owned(),
                        component_type: cp.get_str(descriptor_index)?.parse()?,
                        signature,
                        type_annotations,
                        free_attributes: attrs,
                    })
                })
                .collect::<Result<_, Error>>()?;
            Attribute::Record(components)
        }
        "PermittedSubclasses" => {
            let count = reader.u2()? as usize;
            let indices: Vec<u16> = reader.many(count)?;
            Attribute::PermittedSubclasses(
                indices
                    .into_iter()
                    .map(|idx| cp.get_class_ref(idx))
                    .collect::<Result<_, Error>>()?,
            )
        }
        _ => {
            return Ok(Attribute::Unrecognized {
                name,
                bytes: raw.bytes,
            })
        }
    };

    if !reader.is_exhausted() {
        #[allow(clippy::cast_possible_truncation)]
        return Err(Error::AttributeLengthMismatch {
            name,
            declared,
            consumed: reader.offset() as u32,
        });
    }
    Ok(attribute)
}
