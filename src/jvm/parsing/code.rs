use crate::jvm::{
    code::{
        ArrayType, ExceptionTableEntry, Instruction, InstructionList, LineNumberTableEntry,
        LocalVariableId, LocalVariableTableEntry, LocalVariableTypeTableEntry, MethodBody,
        ProgramCounter, StackMapFrame,
    },
    references::ClassRef,
};

use super::{
    attribute::{cook_attributes, RawAttributeInfo},
    reader::FromReader,
    stack_map::RawStackMapFrame,
    take_attribute, ByteReader, ClassElement, Context, Error,
};
use crate::jvm::attribute::Attribute;

/// A decoded instruction without constant-pool or branch-target
/// resolution.
#[allow(missing_docs)]
pub(crate) enum RawInstruction {
    Nop,
    AConstNull,
    IConst(i32),
    LConst(i64),
    FConst(f32),
    DConst(f64),
    BiPush(i8),
    SiPush(i16),
    Ldc(u8),
    LdcW(u16),
    Ldc2W(u16),
    ILoad(u8),
    LLoad(u8),
    FLoad(u8),
    DLoad(u8),
    ALoad(u8),
    IALoad,
    LALoad,
    FALoad,
    DALoad,
    AALoad,
    BALoad,
    CALoad,
    SALoad,
    IStore(u8),
    LStore(u8),
    FStore(u8),
    DStore(u8),
    AStore(u8),
    IAStore,
    LAStore,
    FAStore,
    DAStore,
    AAStore,
    BAStore,
    CAStore,
    SAStore,
    Pop,
    Pop2,
    Dup,
    DupX1,
    DupX2,
    Dup2,
    Dup2X1,
    Dup2X2,
    Swap,
    IAdd,
    LAdd,
    FAdd,
    DAdd,
    ISub,
    LSub,
    FSub,
    DSub,
    IMul,
    LMul,
    FMul,
    DMul,
    IDiv,
    LDiv,
    FDiv,
    DDiv,
    IRem,
    LRem,
    FRem,
    DRem,
    INeg,
    LNeg,
    FNeg,
    DNeg,
    IShl,
    LShl,
    IShr,
    LShr,
    IUShr,
    LUShr,
    IAnd,
    LAnd,
    IOr,
    LOr,
    IXor,
    LXor,
    IInc { index: u8, constant: i8 },
    I2L,
    I2F,
    I2D,
    L2I,
    L2F,
    L2D,
    F2I,
    F2L,
    F2D,
    D2I,
    D2L,
    D2F,
    I2B,
    I2C,
    I2S,
    LCmp,
    FCmpL,
    FCmpG,
    DCmpL,
    DCmpG,
    IfEq(i16),
    IfNe(i16),
    IfLt(i16),
    IfGe(i16),
    IfGt(i16),
    IfLe(i16),
    IfICmpEq(i16),
    IfICmpNe(i16),
    IfICmpLt(i16),
    IfICmpGe(i16),
    IfICmpGt(i16),
    IfICmpLe(i16),
    IfACmpEq(i16),
    IfACmpNe(i16),
    Goto(i16),
    Jsr(i16),
    Ret(u8),
    TableSwitch {
        default: i32,
        low: i32,
        high: i32,
        jump_offsets: Vec<i32>,
    },
    LookupSwitch {
        default: i32,
        match_offsets: Vec<(i32, i32)>,
    },
    IReturn,
    LReturn,
    FReturn,
    DReturn,
    AReturn,
    Return,
    GetStatic(u16),
    PutStatic(u16),
    GetField(u16),
    PutField(u16),
    InvokeVirtual(u16),
    InvokeSpecial(u16),
    InvokeStatic(u16),
    InvokeInterface { method_index: u16, count: u8 },
    InvokeDynamic(u16),
    New(u16),
    NewArray(u8),
    ANewArray(u16),
    ArrayLength,
    AThrow,
    CheckCast(u16),
    InstanceOf(u16),
    MonitorEnter,
    MonitorExit,
    Wide(RawWideInstruction),
    MultiANewArray { index: u16, dimensions: u8 },
    IfNull(i16),
    IfNonNull(i16),
    GotoW(i32),
    JsrW(i32),
}

pub(crate) enum RawWideInstruction {
    ILoad(u16),
    LLoad(u16),
    FLoad(u16),
    DLoad(u16),
    ALoad(u16),
    IStore(u16),
    LStore(u16),
    FStore(u16),
    DStore(u16),
    AStore(u16),
    Ret(u16),
    IInc { index: u16, increment: i16 },
}

impl FromReader for RawInstruction {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let offset = reader.offset();
        let opcode = reader.u1()?;
        match opcode {
            0x00 => Ok(Self::Nop),
            0x01 => Ok(Self::AConstNull),
            0x02 => Ok(Self::IConst(-1)),
            0x03..=0x08 => Ok(Self::IConst(i32::from(opcode) - 0x03)),
            0x09 => Ok(Self::LConst(0)),
            0x0A => Ok(Self::LConst(1)),
            0x0B => Ok(Self::FConst(0.0)),
            0x0C => Ok(Self::FConst(1.0)),
            0x0D => Ok(Self::FConst(2.0)),
            0x0E => Ok(Self::DConst(0.0)),
            0x0F => Ok(Self::DConst(1.0)),
            0x10 => Ok(Self::BiPush(reader.i1()?)),
            0x11 => Ok(Self::SiPush(reader.i2()?)),
            0x12 => Ok(Self::Ldc(reader.u1()?)),
            0x13 => Ok(Self::LdcW(reader.u2()?)),
            0x14 => Ok(Self::Ldc2W(reader.u2()?)),
            0x15 => Ok(Self::ILoad(reader.u1()?)),
            0x16 => Ok(Self::LLoad(reader.u1()?)),
            0x17 => Ok(Self::FLoad(reader.u1()?)),
            0x18 => Ok(Self::DLoad(reader.u1()?)),
            0x19 => Ok(Self::ALoad(reader.u1()?)),
            0x1A..=0x1D => Ok(Self::ILoad(opcode - 0x1A)),
            0x1E..=0x21 => Ok(Self::LLoad(opcode - 0x1E)),
            0x22..=0x25 => Ok(Self::FLoad(opcode - 0x22)),
            0x26..=0x29 => Ok(Self::DLoad(opcode - 0x26)),
            0x2A..=0x2D => Ok(Self::ALoad(opcode - 0x2A)),
            0x2E => Ok(Self::IALoad),
            0x2F => Ok(Self::LALoad),
            0x30 => Ok(Self::FALoad),
            0x31 => Ok(Self::DALoad),
            0x32 => Ok(Self::AALoad),
            0x33 => Ok(Self::BALoad),
            0x34 => Ok(Self::CALoad),
            0x35 => Ok(Self::SALoad),
            0x36 => Ok(Self::IStore(reader.u1()?)),
            0x37 => Ok(Self::LStore(reader.u1()?)),
            0x38 => Ok(Self::FStore(reader.u1()?)),
            0x39 => Ok(Self::DStore(reader.u1()?)),
            0x3A => Ok(Self::AStore(reader.u1()?)),
            0x3B..=0x3E => Ok(Self::IStore(opcode - 0x3B)),
            0x3F..=0x42 => Ok(Self::LStore(opcode - 0x3F)),
            0x43..=0x46 => Ok(Self::FStore(opcode - 0x43)),
            0x47..=0x4A => Ok(Self::DStore(opcode - 0x47)),
            0x4B..=0x4E => Ok(Self::AStore(opcode - 0x4B)),
            0x4F => Ok(Self::IAStore),
            0x50 => Ok(Self::LAStore),
            0x51 => Ok(Self::FAStore),
            0x52 => Ok(Self::DAStore),
            0x53 => Ok(Self::AAStore),
            0x54 => Ok(Self::BAStore),
            0x55 => Ok(Self::CAStore),
            0x56 => Ok(Self::SAStore),
            0x57 => Ok(Self::Pop),
            0x58 => Ok(Self::Pop2),
            0x59 => Ok(Self::Dup),
            0x5A => Ok(Self::DupX1),
            0x5B => Ok(Self::DupX2),
            0x5C => Ok(Self::Dup2),
            0x5D => Ok(Self::Dup2X1),
            0x5E => Ok(Self::Dup2X2),
            0x5F => Ok(Self::Swap),
            0x60 => Ok(Self::IAdd),
            0x61 => Ok(Self::LAdd),
            0x62 => Ok(Self::FAdd),
            0x63 => Ok(Self::DAdd),
            0x64 => Ok(Self::ISub),
            0x65 => Ok(Self::LSub),
            0x66 => Ok(Self::FSub),
            0x67 => Ok(Self::DSub),
            0x68 => Ok(Self::IMul),
            0x69 => Ok(Self::LMul),
            0x6A => Ok(Self::FMul),
            0x6B => Ok(Self::DMul),
            0x6C => Ok(Self::IDiv),
            0x6D => Ok(Self::LDiv),
            0x6E => Ok(Self::FDiv),
            0x6F => Ok(Self::DDiv),
            0x70 => Ok(Self::IRem),
            0x71 => Ok(Self::LRem),
            0x72 => Ok(Self::FRem),
            0x73 => Ok(Self::DRem),
            0x74 => Ok(Self::INeg),
            0x75 => Ok(Self::LNeg),
            0x76 => Ok(Self::FNeg),
            0x77 => Ok(Self::DNeg),
            0x78 => Ok(Self::IShl),
            0x79 => Ok(Self::LShl),
            0x7A => Ok(Self::IShr),
            0x7B => Ok(Self::LShr),
            0x7C => Ok(Self::IUShr),
            0x7D => Ok(Self::LUShr),
            0x7E => Ok(Self::IAnd),
            0x7F => Ok(Self::LAnd),
            0x80 => Ok(Self::IOr),
            0x81 => Ok(Self::LOr),
            0x82 => Ok(Self::IXor),
            0x83 => Ok(Self::LXor),
            0x84 => Ok(Self::IInc {
                index: reader.u1()?,
                constant: reader.i1()?,
            }),
            0x85 => Ok(Self::I2L),
            0x86 => Ok(Self::I2F),
            0x87 => Ok(Self::I2D),
            0x88 => Ok(Self::L2I),
            0x89 => Ok(Self::L2F),
            0x8A => Ok(Self::L2D),
            0x8B => Ok(Self::F2I),
            0x8C => Ok(Self::F2L),
            0x8D => Ok(Self::F2D),
            0x8E => Ok(Self::D2I),
            0x8F => Ok(Self::D2L),
            0x90 => Ok(Self::D2F),
            0x91 => Ok(Self::I2B),
            0x92 => Ok(Self::I2C),
            0x93 => Ok(Self::I2S),
            0x94 => Ok(Self::LCmp),
            0x95 => Ok(Self::FCmpL),
            0x96 => Ok(Self::FCmpG),
            0x97 => Ok(Self::DCmpL),
            0x98 => Ok(Self::DCmpG),
            0x99 => Ok(Self::IfEq(reader.i2()?)),
            0x9A => Ok(Self::IfNe(reader.i2()?)),
            0x9B => Ok(Self::IfLt(reader.i2()?)),
            0x9C => Ok(Self::IfGe(reader.i2()?)),
            0x9D => Ok(Self::IfGt(reader.i2()?)),
            0x9E => Ok(Self::IfLe(reader.i2()?)),
            0x9F => Ok(Self::IfICmpEq(reader.i2()?)),
            0xA0 => Ok(Self::IfICmpNe(reader.i2()?)),
            0xA1 => Ok(Self::IfICmpLt(reader.i2()?)),
            0xA2 => Ok(Self::IfICmpGe(reader.i2()?)),
            0xA3 => Ok(Self::IfICmpGt(reader.i2()?)),
            0xA4 => Ok(Self::IfICmpLe(reader.i2()?)),
            0xA5 => Ok(Self::IfACmpEq(reader.i2()?)),
            0xA6 => Ok(Self::IfACmpNe(reader.i2()?)),
            0xA7 => Ok(Self::Goto(reader.i2()?)),
            0xA8 => Ok(Self::Jsr(reader.i2()?)),
            0xA9 => Ok(Self::Ret(reader.u1()?)),
            0xAA => {
                reader.align(4)?;
                let default = reader.i4()?;
                let low = reader.i4()?;
                let high = reader.i4()?;
                let count = usize::try_from(high - low + 1).map_err(|_| {
                    Error::MalformedClassFile("tableswitch high < low")
                })?;
                let jump_offsets = (0..count).map(|_| reader.i4()).collect::<Result<_, _>>()?;
                Ok(Self::TableSwitch {
                    default,
                    low,
                    high,
                    jump_offsets,
                })
            }
            0xAB => {
                reader.align(4)?;
                let default = reader.i4()?;
                let npairs = reader.i4()?;
                let count = usize::try_from(npairs)
                    .map_err(|_| Error::MalformedClassFile("lookupswitch npairs < 0"))?;
                let match_offsets = (0..count)
                    .map(|_| Ok((reader.i4()?, reader.i4()?)))
                    .collect::<Result<_, Error>>()?;
                Ok(Self::LookupSwitch {
                    default,
                    match_offsets,
                })
            }
            0xAC => Ok(Self::IReturn),
            0xAD => Ok(Self::LReturn),
            0xAE => Ok(Self::FReturn),
            0xAF => Ok(Self::DReturn),
            0xB0 => Ok(Self::AReturn),
            0xB1 => Ok(Self::Return),
            0xB2 => Ok(Self::GetStatic(reader.u2()?)),
            0xB3 => Ok(Self::PutStatic(reader.u2()?)),
            0xB4 => Ok(Self::GetField(reader.u2()?)),
            0xB5 => Ok(Self::PutField(reader.u2()?)),
            0xB6 => Ok(Self::InvokeVirtual(reader.u2()?)),
            0xB7 => Ok(Self::InvokeSpecial(reader.u2()?)),
            0xB8 => Ok(Self::InvokeStatic(reader.u2()?)),
            0xB9 => {
                let method_index = reader.u2()?;
                let count = reader.u1()?;
                reader.expect(&[0x00])?;
                Ok(Self::InvokeInterface { method_index, count })
            }
            0xBA => {
                let dynamic_index = reader.u2()?;
                reader.expect(&[0x00, 0x00])?;
                Ok(Self::InvokeDynamic(dynamic_index))
            }
            0xBB => Ok(Self::New(reader.u2()?)),
            0xBC => Ok(Self::NewArray(reader.u1()?)),
            0xBD => Ok(Self::ANewArray(reader.u2()?)),
            0xBE => Ok(Self::ArrayLength),
            0xBF => Ok(Self::AThrow),
            0xC0 => Ok(Self::CheckCast(reader.u2()?)),
            0xC1 => Ok(Self::InstanceOf(reader.u2()?)),
            0xC2 => Ok(Self::MonitorEnter),
            0xC3 => Ok(Self::MonitorExit),
            0xC4 => {
                let wide_opcode = reader.u1()?;
                let wide = match wide_opcode {
                    0x15 => RawWideInstruction::ILoad(reader.u2()?),
                    0x16 => RawWideInstruction::LLoad(reader.u2()?),
                    0x17 => RawWideInstruction::FLoad(reader.u2()?),
                    0x18 => RawWideInstruction::DLoad(reader.u2()?),
                    0x19 => RawWideInstruction::ALoad(reader.u2()?),
                    0x36 => RawWideInstruction::IStore(reader.u2()?),
                    0x37 => RawWideInstruction::LStore(reader.u2()?),
                    0x38 => RawWideInstruction::FStore(reader.u2()?),
                    0x39 => RawWideInstruction::DStore(reader.u2()?),
                    0x3A => RawWideInstruction::AStore(reader.u2()?),
                    0xA9 => RawWideInstruction::Ret(reader.u2()?),
                    0x84 => RawWideInstruction::IInc {
                        index: reader.u2()?,
                        increment: reader.i2()?,
                    },
                    other => {
                        return Err(Error::UnknownTag {
                            kind: "wide opcode",
                            tag: u32::from(other),
                            offset,
                        })
                    }
                };
                Ok(Self::Wide(wide))
            }
            0xC5 => Ok(Self::MultiANewArray {
                index: reader.u2()?,
                dimensions: reader.u1()?,
            }),
            0xC6 => Ok(Self::IfNull(reader.i2()?)),
            0xC7 => Ok(Self::IfNonNull(reader.i2()?)),
            0xC8 => Ok(Self::GotoW(reader.i4()?)),
            0xC9 => Ok(Self::JsrW(reader.i4()?)),
            other => Err(Error::UnknownTag {
                kind: "opcode",
                tag: u32::from(other),
                offset,
            }),
        }
    }
}

/// An exception handler entry as it appears in the `Code` attribute body.
pub(crate) struct RawExceptionTableEntry {
    start_pc: u16,
    end_pc: u16,
    handler_pc: u16,
    catch_type: u16,
}

impl FromReader for RawExceptionTableEntry {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            start_pc: reader.u2()?,
            end_pc: reader.u2()?,
            handler_pc: reader.u2()?,
            catch_type: reader.u2()?,
        })
    }
}

impl ClassElement for ExceptionTableEntry {
    type Raw = RawExceptionTableEntry;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        Ok(Self {
            covered_from: raw.start_pc.into(),
            covered_to: raw.end_pc.into(),
            handler_pc: raw.handler_pc.into(),
            catch_type: ctx.constant_pool.get_class_ref_optional(raw.catch_type)?,
        })
    }
}

pub(crate) struct RawLineNumberTableEntry {
    start_pc: u16,
    line_number: u16,
}

impl FromReader for RawLineNumberTableEntry {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            start_pc: reader.u2()?,
            line_number: reader.u2()?,
        })
    }
}

pub(crate) struct RawLocalVariableTableEntry {
    start_pc: u16,
    length: u16,
    name_index: u16,
    descriptor_or_signature_index: u16,
    index: u16,
}

impl FromReader for RawLocalVariableTableEntry {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            start_pc: reader.u2()?,
            length: reader.u2()?,
            name_index: reader.u2()?,
            descriptor_or_signature_index: reader.u2()?,
            index: reader.u2()?,
        })
    }
}

fn local_variable_id(raw: &RawLocalVariableTableEntry) -> Result<LocalVariableId, Error> {
    let start = ProgramCounter::from(raw.start_pc);
    let end = start
        .offset(i32::from(raw.length))
        .map_err(|_| Error::MalformedClassFile("local variable range overflowed"))?;
    Ok(LocalVariableId {
        effective_range: start..end,
        index: raw.index,
    })
}

/// The raw body of a `Code` attribute.
pub(crate) struct RawCode {
    max_stack: u16,
    max_locals: u16,
    instructions: Vec<(u16, RawInstruction)>,
    exception_table: Vec<RawExceptionTableEntry>,
    attributes: Vec<RawAttributeInfo>,
}

impl FromReader for RawCode {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let max_stack = reader.u2()?;
        let max_locals = reader.u2()?;
        let code_length = reader.u4()?;
        let mut code_reader = reader.windowed(code_length as usize)?;
        let mut instructions = Vec::new();
        while !code_reader.is_exhausted() {
            #[allow(clippy::cast_possible_truncation)]
            let pc = code_reader.offset() as u16;
            let instruction = RawInstruction::from_reader(&mut code_reader)?;
            instructions.push((pc, instruction));
        }
        let exception_table_length = reader.u2()? as usize;
        let exception_table = reader.many(exception_table_length)?;
        let attributes_count = reader.u2()? as usize;
        let attributes = reader.many(attributes_count)?;
        Ok(Self {
            max_stack,
            max_locals,
            instructions,
            exception_table,
            attributes,
        })
    }
}

fn array_type(atype: u8, offset: u64) -> Result<ArrayType, Error> {
    match atype {
        4 => Ok(ArrayType::Boolean),
        5 => Ok(ArrayType::Char),
        6 => Ok(ArrayType::Float),
        7 => Ok(ArrayType::Double),
        8 => Ok(ArrayType::Byte),
        9 => Ok(ArrayType::Short),
        10 => Ok(ArrayType::Int),
        11 => Ok(ArrayType::Long),
        other => Err(Error::UnknownTag {
            kind: "array type",
            tag: u32::from(other),
            offset,
        }),
    }
}

fn lift_instruction(
    pc: ProgramCounter,
    raw: RawInstruction,
    ctx: &Context,
) -> Result<Instruction, Error> {
    let branch = |displacement: i16| pc.offset_i16(displacement).map_err(|_| branch_error());
    let branch_i4 = |displacement: i32| pc.offset(displacement).map_err(|_| branch_error());
    fn branch_error() -> Error {
        Error::MalformedClassFile("branch target outside the code region")
    }
    let cp = ctx.constant_pool;
    Ok(match raw {
        RawInstruction::Nop => Instruction::Nop,
        RawInstruction::AConstNull => Instruction::AConstNull,
        RawInstruction::IConst(v) => Instruction::IConst(v),
        RawInstruction::LConst(v) => Instruction::LConst(v),
        RawInstruction::FConst(v) => Instruction::FConst(v),
        RawInstruction::DConst(v) => Instruction::DConst(v),
        RawInstruction::BiPush(v) => Instruction::BiPush(v),
        RawInstruction::SiPush(v) => Instruction::SiPush(v),
        RawInstruction::Ldc(idx) => Instruction::Ldc(cp.get_constant_value(u16::from(idx))?),
        RawInstruction::LdcW(idx) | RawInstruction::Ldc2W(idx) => {
            Instruction::Ldc(cp.get_constant_value(idx)?)
        }
        RawInstruction::ILoad(i) => Instruction::ILoad(u16::from(i)),
        RawInstruction::LLoad(i) => Instruction::LLoad(u16::from(i)),
        RawInstruction::FLoad(i) => Instruction::FLoad(u16::from(i)),
        RawInstruction::DLoad(i) => Instruction::DLoad(u16::from(i)),
        RawInstruction::ALoad(i) => Instruction::ALoad(u16::from(i)),
        RawInstruction::IALoad => Instruction::IALoad,
        RawInstruction::LALoad => Instruction::LALoad,
        RawInstruction::FALoad => Instruction::FALoad,
        RawInstruction::DALoad => Instruction::DALoad,
        RawInstruction::AALoad => Instruction::AALoad,
        RawInstruction::BALoad => Instruction::BALoad,
        RawInstruction::CALoad => Instruction::CALoad,
        RawInstruction::SALoad => Instruction::SALoad,
        RawInstruction::IStore(i) => Instruction::IStore(u16::from(i)),
        RawInstruction::LStore(i) => Instruction::LStore(u16::from(i)),
        RawInstruction::FStore(i) => Instruction::FStore(u16::from(i)),
        RawInstruction::DStore(i) => Instruction::DStore(u16::from(i)),
        RawInstruction::AStore(i) => Instruction::AStore(u16::from(i)),
        RawInstruction::IAStore => Instruction::IAStore,
        RawInstruction::LAStore => Instruction::LAStore,
        RawInstruction::FAStore => Instruction::FAStore,
        RawInstruction::DAStore => Instruction::DAStore,
        RawInstruction::AAStore => Instruction::AAStore,
        RawInstruction::BAStore => Instruction::BAStore,
        RawInstruction::CAStore => Instruction::CAStore,
        RawInstruction::SAStore => Instruction::SAStore,
        RawInstruction::Pop => Instruction::Pop,
        RawInstruction::Pop2 => Instruction::Pop2,
        RawInstruction::Dup => Instruction::Dup,
        RawInstruction::DupX1 => Instruction::DupX1,
        RawInstruction::DupX2 => Instruction::DupX2,
        RawInstruction::Dup2 => Instruction::Dup2,
        RawInstruction::Dup2X1 => Instruction::Dup2X1,
        RawInstruction::Dup2X2 => Instruction::Dup2X2,
        RawInstruction::Swap => Instruction::Swap,
        RawInstruction::IAdd => Instruction::IAdd,
        RawInstruction::LAdd => Instruction::LAdd,
        RawInstruction::FAdd => Instruction::FAdd,
        RawInstruction::DAdd => Instruction::DAdd,
        RawInstruction::ISub => Instruction::ISub,
        RawInstruction::LSub => Instruction::LSub,
        RawInstruction::FSub => Instruction::FSub,
        RawInstruction::DSub => Instruction::DSub,
        RawInstruction::IMul => Instruction::IMul,
        RawInstruction::LMul => Instruction::LMul,
        RawInstruction::FMul => Instruction::FMul,
        RawInstruction::DMul => Instruction::DMul,
        RawInstruction::IDiv => Instruction::IDiv,
        RawInstruction::LDiv => Instruction::LDiv,
        RawInstruction::FDiv => Instruction::FDiv,
        RawInstruction::DDiv => Instruction::DDiv,
        RawInstruction::IRem => Instruction::IRem,
        RawInstruction::LRem => Instruction::LRem,
        RawInstruction::FRem => Instruction::FRem,
        RawInstruction::DRem => Instruction::DRem,
        RawInstruction::INeg => Instruction::INeg,
        RawInstruction::LNeg => Instruction::LNeg,
        RawInstruction::FNeg => Instruction::FNeg,
        RawInstruction::DNeg => Instruction::DNeg,
        RawInstruction::IShl => Instruction::IShl,
        RawInstruction::LShl => Instruction::LShl,
        RawInstruction::IShr => Instruction::IShr,
        RawInstruction::LShr => Instruction::LShr,
        RawInstruction::IUShr => Instruction::IUShr,
        RawInstruction::LUShr => Instruction::LUShr,
        RawInstruction::IAnd => Instruction::IAnd,
        RawInstruction::LAnd => Instruction::LAnd,
        RawInstruction::IOr => Instruction::IOr,
        RawInstruction::LOr => Instruction::LOr,
        RawInstruction::IXor => Instruction::IXor,
        RawInstruction::LXor => Instruction::LXor,
        RawInstruction::IInc { index, constant } => Instruction::IInc {
            index: u16::from(index),
            constant: i32::from(constant),
        },
        RawInstruction::I2L => Instruction::I2L,
        RawInstruction::I2F => Instruction::I2F,
        RawInstruction::I2D => Instruction::I2D,
        RawInstruction::L2I => Instruction::L2I,
        RawInstruction::L2F => Instruction::L2F,
        RawInstruction::L2D => Instruction::L2D,
        RawInstruction::F2I => Instruction::F2I,
        RawInstruction::F2L => Instruction::F2L,
        RawInstruction::F2D => Instruction::F2D,
        RawInstruction::D2I => Instruction::D2I,
        RawInstruction::D2L => Instruction::D2L,
        RawInstruction::D2F => Instruction::D2F,
        RawInstruction::I2B => Instruction::I2B,
        RawInstruction::I2C => Instruction::I2C,
        RawInstruction::I2S => Instruction::I2S,
        RawInstruction::LCmp => Instruction::LCmp,
        RawInstruction::FCmpL => Instruction::FCmpL,
        RawInstruction::FCmpG => Instruction::FCmpG,
        RawInstruction::DCmpL => Instruction::DCmpL,
        RawInstruction::DCmpG => Instruction::DCmpG,
        RawInstruction::IfEq(d) => Instruction::IfEq(branch(d)?),
        RawInstruction::IfNe(d) => Instruction::IfNe(branch(d)?),
        RawInstruction::IfLt(d) => Instruction::IfLt(branch(d)?),
        RawInstruction::IfGe(d) => Instruction::IfGe(branch(d)?),
        RawInstruction::IfGt(d) => Instruction::IfGt(branch(d)?),
        RawInstruction::IfLe(d) => Instruction::IfLe(branch(d)?),
        RawInstruction::IfICmpEq(d) => Instruction::IfICmpEq(branch(d)?),
        RawInstruction::IfICmpNe(d) => Instruction::IfICmpNe(branch(d)?),
        RawInstruction::IfICmpLt(d) => Instruction::IfICmpLt(branch(d)?),
        RawInstruction::IfICmpGe(d) => Instruction::IfICmpGe(branch(d)?),
        RawInstruction::IfICmpGt(d) => Instruction::IfICmpGt(branch(d)?),
        RawInstruction::IfICmpLe(d) => Instruction::IfICmpLe(branch(d)?),
        RawInstruction::IfACmpEq(d) => Instruction::IfACmpEq(branch(d)?),
        RawInstruction::IfACmpNe(d) => Instruction::IfACmpNe(branch(d)?),
        RawInstruction::Goto(d) => Instruction::Goto(branch(d)?),
        RawInstruction::Jsr(d) => Instruction::Jsr(branch(d)?),
        RawInstruction::Ret(i) => Instruction::Ret(u16::from(i)),
        RawInstruction::TableSwitch {
            default,
            low,
            high,
            jump_offsets,
        } => Instruction::TableSwitch {
            default: branch_i4(default)?,
            low,
            high,
            jump_targets: jump_offsets
                .into_iter()
                .map(branch_i4)
                .collect::<Result<_, _>>()?,
        },
        RawInstruction::LookupSwitch {
            default,
            match_offsets,
        } => Instruction::LookupSwitch {
            default: branch_i4(default)?,
            match_targets: match_offsets
                .into_iter()
                .map(|(m, o)| branch_i4(o).map(|t| (m, t)))
                .collect::<Result<_, _>>()?,
        },
        RawInstruction::IReturn => Instruction::IReturn,
        RawInstruction::LReturn => Instruction::LReturn,
        RawInstruction::FReturn => Instruction::FReturn,
        RawInstruction::DReturn => Instruction::DReturn,
        RawInstruction::AReturn => Instruction::AReturn,
        RawInstruction::Return => Instruction::Return,
        RawInstruction::GetStatic(i) => Instruction::GetStatic(cp.get_field_ref(i)?),
        RawInstruction::PutStatic(i) => Instruction::PutStatic(cp.get_field_ref(i)?),
        RawInstruction::GetField(i) => Instruction::GetField(cp.get_field_ref(i)?),
        RawInstruction::PutField(i) => Instruction::PutField(cp.get_field_ref(i)?),
        RawInstruction::InvokeVirtual(i) => Instruction::InvokeVirtual(cp.get_method_ref(i)?),
        RawInstruction::InvokeSpecial(i) => Instruction::InvokeSpecial(cp.get_any_method_ref(i)?),
        RawInstruction::InvokeStatic(i) => Instruction::InvokeStatic(cp.get_any_method_ref(i)?),
        RawInstruction::InvokeInterface {
            method_index,
            count,
        } => Instruction::InvokeInterface {
            method: cp.get_interface_method_ref(method_index)?,
            count,
        },
        RawInstruction::InvokeDynamic(i) => {
            let crate::jvm::constant_pool::Entry::InvokeDynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            } = cp.get_entry(i)?
            else {
                return Err(Error::PoolTypeMismatch {
                    index: i,
                    expected: "InvokeDynamic",
                });
            };
            let nat = cp.get_name_and_type(*name_and_type_index)?;
            Instruction::InvokeDynamic {
                bootstrap_method_attr_index: *bootstrap_method_attr_index,
                name: nat.name,
                descriptor: nat.descriptor,
            }
        }
        RawInstruction::New(i) => Instruction::New(cp.get_class_ref(i)?),
        RawInstruction::NewArray(t) => Instruction::NewArray(array_type(t, pc.value().into())?),
        RawInstruction::ANewArray(i) => Instruction::ANewArray(cp.get_class_ref(i)?),
        RawInstruction::ArrayLength => Instruction::ArrayLength,
        RawInstruction::AThrow => Instruction::AThrow,
        RawInstruction::CheckCast(i) => Instruction::CheckCast(cp.get_class_ref(i)?),
        RawInstruction::InstanceOf(i) => Instruction::InstanceOf(cp.get_class_ref(i)?),
        RawInstruction::MonitorEnter => Instruction::MonitorEnter,
        RawInstruction::MonitorExit => Instruction::MonitorExit,
        RawInstruction::Wide(wide) => match wide {
            RawWideInstruction::ILoad(i) => Instruction::ILoad(i),
            RawWideInstruction::LLoad(i) => Instruction::LLoad(i),
            RawWideInstruction::FLoad(i) => Instruction::FLoad(i),
            RawWideInstruction::DLoad(i) => Instruction::DLoad(i),
            RawWideInstruction::ALoad(i) => Instruction::ALoad(i),
            RawWideInstruction::IStore(i) => Instruction::IStore(i),
            RawWideInstruction::LStore(i) => Instruction::LStore(i),
            RawWideInstruction::FStore(i) => Instruction::FStore(i),
            RawWideInstruction::DStore(i) => Instruction::DStore(i),
            RawWideInstruction::AStore(i) => Instruction::AStore(i),
            RawWideInstruction::Ret(i) => Instruction::Ret(i),
            RawWideInstruction::IInc { index, increment } => Instruction::IInc {
                index,
                constant: i32::from(increment),
            },
        },
        RawInstruction::MultiANewArray { index, dimensions } => Instruction::MultiANewArray {
            array_type: cp.get_class_ref(index)?,
            dimensions,
        },
        RawInstruction::IfNull(d) => Instruction::IfNull(branch(d)?),
        RawInstruction::IfNonNull(d) => Instruction::IfNonNull(branch(d)?),
        RawInstruction::GotoW(d) => Instruction::Goto(branch_i4(d)?),
        RawInstruction::JsrW(d) => Instruction::Jsr(branch_i4(d)?),
    })
}

impl ClassElement for MethodBody {
    type Raw = RawCode;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        let instructions: InstructionList = raw
            .instructions
            .into_iter()
            .map(|(pc, raw_instr)| {
                let pc = ProgramCounter::from(pc);
                lift_instruction(pc, raw_instr, ctx).map(|instr| (pc, instr))
            })
            .collect::<Result<_, _>>()?;
        let exception_table = raw
            .exception_table
            .into_iter()
            .map(|it| ExceptionTableEntry::from_raw(it, ctx))
            .collect::<Result<_, _>>()?;

        let mut attributes = cook_attributes(raw.attributes, ctx)?;
        let line_number_table = take_attribute(&mut attributes, "duplicate LineNumberTable", |a| {
            match a {
                Attribute::LineNumberTable(t) => Ok(t),
                other => Err(other),
            }
        })?;
        let local_variable_table =
            take_attribute(&mut attributes, "duplicate LocalVariableTable", |a| match a {
                Attribute::LocalVariableTable(t) => Ok(t),
                other => Err(other),
            })?;
        let local_variable_type_table = take_attribute(
            &mut attributes,
            "duplicate LocalVariableTypeTable",
            |a| match a {
                Attribute::LocalVariableTypeTable(t) => Ok(t),
                other => Err(other),
            },
        )?;
        let stack_map_table =
            take_attribute(&mut attributes, "duplicate StackMapTable", |a| match a {
                Attribute::StackMapTable(t) => Ok(t),
                other => Err(other),
            })?;

        Ok(Self {
            max_stack: raw.max_stack,
            max_locals: raw.max_locals,
            instructions,
            exception_table,
            line_number_table,
            local_variable_table,
            local_variable_type_table,
            stack_map_table,
        })
    }
}

pub(crate) fn parse_line_number_table(reader: &mut ByteReader<'_>) -> Result<Vec<LineNumberTableEntry>, Error> {
    let count = reader.u2()? as usize;
    let raw: Vec<RawLineNumberTableEntry> = reader.many(count)?;
    Ok(raw
        .into_iter()
        .map(|it| LineNumberTableEntry {
            start_pc: it.start_pc.into(),
            line_number: it.line_number,
        })
        .collect())
}

pub(crate) fn parse_local_variable_table(
    reader: &mut ByteReader<'_>,
    ctx: &Context,
) -> Result<Vec<LocalVariableTableEntry>, Error> {
    let count = reader.u2()? as usize;
    let raw: Vec<RawLocalVariableTableEntry> = reader.many(count)?;
    raw.iter()
        .map(|it| {
            Ok(LocalVariableTableEntry {
                id: local_variable_id(it)?,
                name: ctx.constant_pool.get_str(it.name_index)?.to_owned(),
                var_type: ctx
                    .constant_pool
                    .get_str(it.descriptor_or_signature_index)?
                    .parse()?,
            })
        })
        .collect()
}

pub(crate) fn parse_local_variable_type_table(
    reader: &mut ByteReader<'_>,
    ctx: &Context,
) -> Result<Vec<LocalVariableTypeTableEntry>, Error> {
    let count = reader.u2()? as usize;
    let raw: Vec<RawLocalVariableTableEntry> = reader.many(count)?;
    raw.iter()
        .map(|it| {
            Ok(LocalVariableTypeTableEntry {
                id: local_variable_id(it)?,
                name: ctx.constant_pool.get_str(it.name_index)?.to_owned(),
                signature: ctx
                    .constant_pool
                    .get_str(it.descriptor_or_signature_index)?
                    .to_owned(),
            })
        })
        .collect()
}

pub(crate) fn parse_stack_map_table(
    reader: &mut ByteReader<'_>,
    ctx: &Context,
) -> Result<Vec<StackMapFrame>, Error> {
    let count = reader.u2()? as usize;
    let raw: Vec<RawStackMapFrame> = reader.many(count)?;
    raw.into_iter()
        .map(|it| StackMapFrame::from_raw(it, ctx))
        .collect()
}

pub(crate) fn parse_exceptions(
    reader: &mut ByteReader<'_>,
    ctx: &Context,
) -> Result<Vec<ClassRef>, Error> {
    let count = reader.u2()? as usize;
    let indices: Vec<u16> = reader.many(count)?;
    indices
        .into_iter()
        .map(|idx| ctx.constant_pool.get_class_ref(idx))
        .collect()
}

pub(crate) fn parse_code(reader: &mut ByteReader<'_>, ctx: &Context) -> Result<MethodBody, Error> {
    let raw = RawCode::from_reader(reader)?;
    MethodBody::from_raw(raw, ctx)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::{class::ClassVersion, constant_pool::{ConstantPool, Slot}};

    fn empty_pool_ctx() -> (ConstantPool, ClassVersion) {
        (ConstantPool::new(vec![Slot::Padding]), ClassVersion { major: 52, minor: 0 })
    }

    #[test]
    fn tableswitch_pads_to_four_byte_boundary() {
        // nop(0), nop(1), tableswitch(2), 1 pad byte, default=10, low=0, high=0, offsets=[20]
        let code: Vec<u8> = vec![
            0x00, 0x00, 0xAA, 0x00, //
            0x00, 0x00, 0x00, 0x0A, // default = 10
            0x00, 0x00, 0x00, 0x00, // low = 0
            0x00, 0x00, 0x00, 0x00, // high = 0
            0x00, 0x00, 0x00, 0x14, // offsets[0] = 20
        ];
        let mut reader = ByteReader::new(&code);
        reader.read(2).unwrap();
        assert_eq!(reader.offset(), 2);
        let raw = RawInstruction::from_reader(&mut reader).unwrap();
        // The four-byte operand block must start at the smallest offset >= 3
        // that is a multiple of 4, i.e. offset 4: one padding byte after the
        // opcode at offset 2.
        assert_eq!(reader.offset(), 4 + 16);
        let RawInstruction::TableSwitch { default, low, high, jump_offsets } = raw else {
            panic!("expected a tableswitch instruction");
        };
        assert_eq!((default, low, high, jump_offsets), (10, 0, 0, vec![20]));
        assert!(reader.is_exhausted());
    }

    #[test]
    fn wide_iinc_widens_index_and_increment() {
        let code = [0xC4, 0x84, 0x01, 0x00, 0x00, 0x05];
        let mut reader = ByteReader::new(&code);
        let raw = RawInstruction::from_reader(&mut reader).unwrap();
        let RawInstruction::Wide(RawWideInstruction::IInc { index, increment }) = raw else {
            panic!("expected a wide iinc instruction");
        };
        assert_eq!(index, 256);
        assert_eq!(increment, 5);

        let (pool, class_version) = empty_pool_ctx();
        let ctx = Context {
            constant_pool: &pool,
            class_version,
            current_class_binary_name: "Example",
        };
        let lifted = lift_instruction(ProgramCounter::from(0u16), raw, &ctx).unwrap();
        assert_eq!(
            lifted,
            Instruction::IInc { index: 256, constant: 5 }
        );
    }
}
