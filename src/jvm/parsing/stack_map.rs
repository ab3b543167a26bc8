use crate::jvm::code::{StackMapFrame, VerificationTypeInfo};

use super::{reader::FromReader, ByteReader, ClassElement, Context, Error};

pub(crate) enum RawVerificationTypeInfo {
    Top,
    Integer,
    Float,
    Double,
    Long,
    Null,
    UninitializedThis,
    Object { class_index: u16 },
    Uninitialized { offset: u16 },
}

impl FromReader for RawVerificationTypeInfo {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let offset = reader.offset();
        match reader.u1()? {
            0 => Ok(Self::Top),
            1 => Ok(Self::Integer),
            2 => Ok(Self::Float),
            3 => Ok(Self::Double),
            4 => Ok(Self::Long),
            5 => Ok(Self::Null),
            6 => Ok(Self::UninitializedThis),
            7 => Ok(Self::Object {
                class_index: reader.u2()?,
            }),
            8 => Ok(Self::Uninitialized {
                offset: reader.u2()?,
            }),
            tag => Err(Error::UnknownTag {
                kind: "verification type",
                tag: u32::from(tag),
                offset,
            }),
        }
    }
}

impl ClassElement for VerificationTypeInfo {
    type Raw = RawVerificationTypeInfo;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        match raw {
            RawVerificationTypeInfo::Top => Ok(Self::Top),
            RawVerificationTypeInfo::Integer => Ok(Self::Integer),
            RawVerificationTypeInfo::Float => Ok(Self::Float),
            RawVerificationTypeInfo::Double => Ok(Self::Double),
            RawVerificationTypeInfo::Long => Ok(Self::Long),
            RawVerificationTypeInfo::Null => Ok(Self::Null),
            RawVerificationTypeInfo::UninitializedThis => Ok(Self::UninitializedThis),
            RawVerificationTypeInfo::Object { class_index } => {
                Ok(Self::Object(ctx.constant_pool.get_class_ref(class_index)?))
            }
            RawVerificationTypeInfo::Uninitialized { offset } => {
                Ok(Self::Uninitialized(offset.into()))
            }
        }
    }
}

pub(crate) enum RawStackMapFrame {
    SameFrame {
        offset_delta: u16,
    },
    SameLocals1StackItemFrame {
        offset_delta: u16,
        stack: RawVerificationTypeInfo,
    },
    SameLocals1StackItemFrameExtended {
        offset_delta: u16,
        stack: RawVerificationTypeInfo,
    },
    ChopFrame {
        offset_delta: u16,
        chopped_locals: u8,
    },
    SameFrameExtended {
        offset_delta: u16,
    },
    AppendFrame {
        offset_delta: u16,
        new_locals: Vec<RawVerificationTypeInfo>,
    },
    FullFrame {
        offset_delta: u16,
        locals: Vec<RawVerificationTypeInfo>,
        stack: Vec<RawVerificationTypeInfo>,
    },
}

impl FromReader for RawStackMapFrame {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let offset = reader.offset();
        let frame_type = reader.u1()?;
        match frame_type {
            0..=63 => Ok(Self::SameFrame {
                offset_delta: u16::from(frame_type),
            }),
            64..=127 => Ok(Self::SameLocals1StackItemFrame {
                offset_delta: u16::from(frame_type - 64),
                stack: RawVerificationTypeInfo::from_reader(reader)?,
            }),
            128..=246 => Err(Error::UnknownTag {
                kind: "stack map frame",
                tag: u32::from(frame_type),
                offset,
            }),
            247 => Ok(Self::SameLocals1StackItemFrameExtended {
                offset_delta: reader.u2()?,
                stack: RawVerificationTypeInfo::from_reader(reader)?,
            }),
            248..=250 => Ok(Self::ChopFrame {
                offset_delta: reader.u2()?,
                chopped_locals: 251 - frame_type,
            }),
            251 => Ok(Self::SameFrameExtended {
                offset_delta: reader.u2()?,
            }),
            252..=254 => {
                let offset_delta = reader.u2()?;
                let count = usize::from(frame_type - 251);
                let new_locals = reader.many(count)?;
                Ok(Self::AppendFrame {
                    offset_delta,
                    new_locals,
                })
            }
            255 => {
                let offset_delta = reader.u2()?;
                let locals_count = reader.u2()? as usize;
                let locals = reader.many(locals_count)?;
                let stack_count = reader.u2()? as usize;
                let stack = reader.many(stack_count)?;
                Ok(Self::FullFrame {
                    offset_delta,
                    locals,
                    stack,
                })
            }
        }
    }
}

impl ClassElement for StackMapFrame {
    type Raw = RawStackMapFrame;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        Ok(match raw {
            RawStackMapFrame::SameFrame { offset_delta } => Self::SameFrame { offset_delta },
            RawStackMapFrame::SameLocals1StackItemFrame {
                offset_delta,
                stack,
            } => Self::SameLocals1StackItemFrame {
                offset_delta,
                stack: VerificationTypeInfo::from_raw(stack, ctx)?,
            },
            RawStackMapFrame::SameLocals1StackItemFrameExtended {
                offset_delta,
                stack,
            } => Self::SameLocals1StackItemFrameExtended {
                offset_delta,
                stack: VerificationTypeInfo::from_raw(stack, ctx)?,
            },
            RawStackMapFrame::ChopFrame {
                offset_delta,
                chopped_locals,
            } => Self::ChopFrame {
                offset_delta,
                chopped_locals,
            },
            RawStackMapFrame::SameFrameExtended { offset_delta } => {
                Self::SameFrameExtended { offset_delta }
            }
            RawStackMapFrame::AppendFrame {
                offset_delta,
                new_locals,
            } => Self::AppendFrame {
                offset_delta,
                new_locals: new_locals
                    .into_iter()
                    .map(|it| VerificationTypeInfo::from_raw(it, ctx))
                    .collect::<Result<_, _>>()?,
            },
            RawStackMapFrame::FullFrame {
                offset_delta,
                locals,
                stack,
            } => Self::FullFrame {
                offset_delta,
                locals: locals
                    .into_iter()
                    .map(|it| VerificationTypeInfo::from_raw(it, ctx))
                    .collect::<Result<_, _>>()?,
                stack: stack
                    .into_iter()
                    .map(|it| VerificationTypeInfo::from_raw(it, ctx))
                    .collect::<Result<_, _>>()?,
            },
        })
    }
}
