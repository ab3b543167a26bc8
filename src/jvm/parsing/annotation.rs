use crate::jvm::{
    annotation::{Annotation, ElementValue, TargetInfo, TypeAnnotation, TypePathElement},
    code::{LocalVariableId, ProgramCounter},
};

use super::{reader::FromReader, ByteReader, ClassElement, Context, Error};

pub(crate) struct RawAnnotation {
    type_index: u16,
    pairs: Vec<(u16, RawElementValue)>,
}

impl FromReader for RawAnnotation {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let type_index = reader.u2()?;
        let count = reader.u2()? as usize;
        let pairs = (0..count)
            .map(|_| Ok((reader.u2()?, RawElementValue::from_reader(reader)?)))
            .collect::<Result<_, Error>>()?;
        Ok(Self { type_index, pairs })
    }
}

impl ClassElement for Annotation {
    type Raw = RawAnnotation;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        Ok(Self {
            annotation_type: ctx.constant_pool.get_str(raw.type_index)?.parse()?,
            element_value_pairs: raw
                .pairs
                .into_iter()
                .map(|(name_index, value)| {
                    Ok((
                        ctx.constant_pool.get_str(name_index)?.to_owned(),
                        ElementValue::from_raw(value, ctx)?,
                    ))
                })
                .collect::<Result<_, Error>>()?,
        })
    }
}

pub(crate) enum RawElementValue {
    Const { tag: u8, const_value_index: u16 },
    Enum { type_name_index: u16, const_name_index: u16 },
    Class { class_info_index: u16 },
    AnnotationInterface(RawAnnotation),
    Array(Vec<RawElementValue>),
}

impl FromReader for RawElementValue {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let offset = reader.offset();
        let tag = reader.u1()?;
        match tag {
            b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' => Ok(Self::Const {
                tag,
                const_value_index: reader.u2()?,
            }),
            b'e' => Ok(Self::Enum {
                type_name_index: reader.u2()?,
                const_name_index: reader.u2()?,
            }),
            b'c' => Ok(Self::Class {
                class_info_index: reader.u2()?,
            }),
            b'@' => Ok(Self::AnnotationInterface(RawAnnotation::from_reader(
                reader,
            )?)),
            b'[' => {
                let count = reader.u2()? as usize;
                Ok(Self::Array(reader.many(count)?))
            }
            other => Err(Error::UnknownTag {
                kind: "element value",
                tag: u32::from(other),
                offset,
            }),
        }
    }
}

impl ClassElement for ElementValue {
    type Raw = RawElementValue;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        let cp = ctx.constant_pool;
        Ok(match raw {
            RawElementValue::Const {
                tag,
                const_value_index,
            } if tag == b's' => Self::Constant(crate::jvm::constant_pool::ConstantValue::String(
                cp.get_str(const_value_index)?.to_owned(),
            )),
            RawElementValue::Const {
                const_value_index, ..
            } => Self::Constant(cp.get_constant_value(const_value_index)?),
            RawElementValue::Enum {
                type_name_index,
                const_name_index,
            } => Self::EnumConstant {
                enum_type_name: cp.get_str(type_name_index)?.to_owned(),
                const_name: cp.get_str(const_name_index)?.to_owned(),
            },
            RawElementValue::Class { class_info_index } => Self::Class {
                return_descriptor: cp.get_str(class_info_index)?.parse()?,
            },
            RawElementValue::AnnotationInterface(inner) => {
                Self::AnnotationInterface(Annotation::from_raw(inner, ctx)?)
            }
            RawElementValue::Array(values) => Self::Array(
                values
                    .into_iter()
                    .map(|v| ElementValue::from_raw(v, ctx))
                    .collect::<Result<_, Error>>()?,
            ),
        })
    }
}

pub(crate) struct RawTypePathElement {
    kind: u8,
    type_argument_index: u8,
}

impl FromReader for RawTypePathElement {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            kind: reader.u1()?,
            type_argument_index: reader.u1()?,
        })
    }
}

impl ClassElement for TypePathElement {
    type Raw = RawTypePathElement;

    fn from_raw(raw: Self::Raw, _ctx: &Context) -> Result<Self, Error> {
        match raw.kind {
            0 => Ok(Self::Array),
            1 => Ok(Self::Nested),
            2 => Ok(Self::Bound),
            3 => Ok(Self::TypeArgument(raw.type_argument_index)),
            other => Err(Error::UnknownTag {
                kind: "type path",
                tag: u32::from(other),
                offset: 0,
            }),
        }
    }
}

struct RawLocalVarTargetEntry {
    start_pc: u16,
    length: u16,
    index: u16,
}

impl FromReader for RawLocalVarTargetEntry {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            start_pc: reader.u2()?,
            length: reader.u2()?,
            index: reader.u2()?,
        })
    }
}

pub(crate) enum RawTargetInfo {
    TypeParameter {
        index: u8,
    },
    SuperType {
        index: u16,
    },
    TypeParameterBound {
        type_parameter_index: u8,
        bound_index: u8,
    },
    Empty,
    FormalParameter {
        index: u8,
    },
    Throws {
        index: u16,
    },
    LocalVar(Vec<RawLocalVarTargetEntry>),
    Catch {
        index: u16,
    },
    Offset(u16),
    TypeArgument {
        offset: u16,
        index: u8,
    },
}

impl RawTargetInfo {
    fn from_reader(reader: &mut ByteReader<'_>, target_type: u8) -> Result<Self, Error> {
        match target_type {
            0x00 | 0x01 => Ok(Self::TypeParameter {
                index: reader.u1()?,
            }),
            0x10 => Ok(Self::SuperType {
                index: reader.u2()?,
            }),
            0x11 | 0x12 => Ok(Self::TypeParameterBound {
                type_parameter_index: reader.u1()?,
                bound_index: reader.u1()?,
            }),
            0x13..=0x15 => Ok(Self::Empty),
            0x16 => Ok(Self::FormalParameter {
                index: reader.u1()?,
            }),
            0x17 => Ok(Self::Throws {
                index: reader.u2()?,
            }),
            0x40 | 0x41 => {
                let count = reader.u2()? as usize;
                Ok(Self::LocalVar(reader.many(count)?))
            }
            0x42 => Ok(Self::Catch {
                index: reader.u2()?,
            }),
            0x43..=0x46 => Ok(Self::Offset(reader.u2()?)),
            0x47..=0x4B => Ok(Self::TypeArgument {
                offset: reader.u2()?,
                index: reader.u1()?,
            }),
            other => Err(Error::UnknownTag {
                kind: "type annotation target",
                tag: u32::from(other),
                offset: reader.offset(),
            }),
        }
    }
}

impl ClassElement for TargetInfo {
    type Raw = RawTargetInfo;

    fn from_raw(raw: Self::Raw, _ctx: &Context) -> Result<Self, Error> {
        Ok(match raw {
            RawTargetInfo::TypeParameter { index } => Self::TypeParameter { index },
            RawTargetInfo::SuperType { index } => Self::SuperType { index },
            RawTargetInfo::TypeParameterBound {
                type_parameter_index,
                bound_index,
            } => Self::TypeParameterBound {
                type_parameter_index,
                bound_index,
            },
            RawTargetInfo::Empty => Self::Empty,
            RawTargetInfo::FormalParameter { index } => Self::FormalParameter { index },
            RawTargetInfo::Throws { index } => Self::Throws { index },
            RawTargetInfo::LocalVar(entries) => Self::LocalVar(
                entries
                    .into_iter()
                    .map(|e| {
                        let start = ProgramCounter::from(e.start_pc);
                        let end = start.offset(i32::from(e.length)).map_err(|_| {
                            Error::MalformedClassFile("local var target range overflowed")
                        })?;
                        Ok(LocalVariableId {
                            effective_range: start..end,
                            index: e.index,
                        })
                    })
                    .collect::<Result<_, Error>>()?,
            ),
            RawTargetInfo::Catch { index } => Self::Catch { index },
            RawTargetInfo::Offset(offset) => Self::Offset(offset.into()),
            RawTargetInfo::TypeArgument { offset, index } => Self::TypeArgument {
                offset: offset.into(),
                index,
            },
        })
    }
}

pub(crate) struct RawTypeAnnotation {
    target_info: RawTargetInfo,
    type_path: Vec<RawTypePathElement>,
    annotation: RawAnnotation,
}

impl FromReader for RawTypeAnnotation {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let target_type = reader.u1()?;
        let target_info = RawTargetInfo::from_reader(reader, target_type)?;
        let path_length = reader.u1()? as usize;
        let type_path = reader.many(path_length)?;
        let type_index = reader.u2()?;
        let count = reader.u2()? as usize;
        let pairs = (0..count)
            .map(|_| Ok((reader.u2()?, RawElementValue::from_reader(reader)?)))
            .collect::<Result<_, Error>>()?;
        Ok(Self {
            target_info,
            type_path,
            annotation: RawAnnotation { type_index, pairs },
        })
    }
}

impl ClassElement for TypeAnnotation {
    type Raw = RawTypeAnnotation;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        Ok(Self {
            annotation_type: ctx
                .constant_pool
                .get_str(raw.annotation.type_index)?
                .parse()?,
            target_info: TargetInfo::from_raw(raw.target_info, ctx)?,
            target_path: raw
                .type_path
                .into_iter()
                .map(|it| TypePathElement::from_raw(it, ctx))
                .collect::<Result<_, Error>>()?,
            element_value_pairs: raw
                .annotation
                .pairs
                .into_iter()
                .map(|(name_index, value)| {
                    Ok((
                        ctx.constant_pool.get_str(name_index)?.to_owned(),
                        ElementValue::from_raw(value, ctx)?,
                    ))
                })
                .collect::<Result<_, Error>>()?,
        })
    }
}

pub(crate) fn parse_annotations(reader: &mut ByteReader<'_>, ctx: &Context) -> Result<Vec<Annotation>, Error> {
    let count = reader.u2()? as usize;
    let raw: Vec<RawAnnotation> = reader.many(count)?;
    raw.into_iter()
        .map(|it| Annotation::from_raw(it, ctx))
        .collect()
}

pub(crate) fn parse_parameter_annotations(
    reader: &mut ByteReader<'_>,
    ctx: &Context,
) -> Result<Vec<Vec<Annotation>>, Error> {
    let count = reader.u1()? as usize;
    (0..count).map(|_| parse_annotations(reader, ctx)).collect()
}

pub(crate) fn parse_type_annotations(
    reader: &mut ByteReader<'_>,
    ctx: &Context,
) -> Result<Vec<TypeAnnotation>, Error> {
    let count = reader.u2()? as usize;
    let raw: Vec<RawTypeAnnotation> = reader.many(count)?;
    raw.into_iter()
        .map(|it| TypeAnnotation::from_raw(it, ctx))
        .collect()
}
