//! The `Code` attribute: a method's bytecode instructions and the tables
//! that accompany them.

mod instruction;
mod method_body;
mod pc;

pub use instruction::{ArrayType, Instruction};
pub use method_body::{
    ExceptionTableEntry, InstructionList, LineNumberTableEntry, LocalVariableId,
    LocalVariableTableEntry, LocalVariableTypeTableEntry, MethodBody, StackMapFrame,
    VerificationTypeInfo,
};
pub use pc::{InvalidOffset, ProgramCounter};
