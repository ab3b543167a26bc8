//! A method's `Code` attribute: the instruction stream plus the tables that
//! accompany it.

use std::collections::BTreeMap;
use std::ops::Range;

use super::{Instruction, ProgramCounter};
use crate::jvm::references::ClassRef;

/// The decoded instruction stream of a `Code` attribute, keyed by the
/// byte offset of each instruction from the start of the code region.
pub type InstructionList = BTreeMap<ProgramCounter, Instruction>;

/// One entry of a `Code` attribute's exception table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionTableEntry {
    /// Start of the range (inclusive) this handler covers.
    pub covered_from: ProgramCounter,
    /// End of the range (exclusive) this handler covers.
    pub covered_to: ProgramCounter,
    /// Where control transfers to on a matching exception.
    pub handler_pc: ProgramCounter,
    /// The exception type this handler catches, or `None` for `finally`
    /// blocks (`catch_type == 0`).
    pub catch_type: Option<ClassRef>,
}

/// One entry of a `LineNumberTable` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberTableEntry {
    /// The code offset this line begins at.
    pub start_pc: ProgramCounter,
    /// The corresponding source line number.
    pub line_number: u16,
}

/// A local variable slot index together with the `Code` offsets over which
/// it holds the variable described by a `LocalVariableTable` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariableId {
    /// The range of code offsets this entry is valid for.
    pub effective_range: Range<ProgramCounter>,
    /// The local variable slot index.
    pub index: u16,
}

/// One entry of a `LocalVariableTable` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableTableEntry {
    /// The slot and range this entry describes.
    pub id: LocalVariableId,
    /// The variable's name.
    pub name: String,
    /// The variable's parsed type.
    pub var_type: crate::jvm::descriptor::FieldType,
}

/// One entry of a `LocalVariableTypeTable` attribute (generic signature
/// counterpart of [`LocalVariableTableEntry`]).
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableTypeTableEntry {
    /// The slot and range this entry describes.
    pub id: LocalVariableId,
    /// The variable's name.
    pub name: String,
    /// The variable's generic signature.
    pub signature: String,
}

/// A verifier abstract value, as carried by a [`StackMapFrame`].
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationTypeInfo {
    /// No meaningful value (unused local/stack slot).
    Top,
    /// A value of type `int`.
    Integer,
    /// A value of type `float`.
    Float,
    /// A value of type `double`.
    Double,
    /// A value of type `long`.
    Long,
    /// `null`.
    Null,
    /// `this`, before the constructor has called `super`.
    UninitializedThis,
    /// An object of the referenced class.
    Object(ClassRef),
    /// The result of a `new` at the given offset, before its constructor
    /// has run.
    Uninitialized(ProgramCounter),
}

/// One entry of a `StackMapTable` attribute, describing the verifier's
/// abstract state at a bytecode offset.
#[derive(Debug, Clone, PartialEq)]
pub enum StackMapFrame {
    /// Same locals, empty stack. `frame_type` 0-63.
    SameFrame {
        /// Bytecode offset this frame applies to.
        offset_delta: u16,
    },
    /// Same locals, one stack item. `frame_type` 64-127.
    SameLocals1StackItemFrame {
        /// Bytecode offset this frame applies to.
        offset_delta: u16,
        /// The lone stack item's type.
        stack: VerificationTypeInfo,
    },
    /// Same locals, one stack item, explicit offset delta. `frame_type` 247.
    SameLocals1StackItemFrameExtended {
        /// Bytecode offset this frame applies to.
        offset_delta: u16,
        /// The lone stack item's type.
        stack: VerificationTypeInfo,
    },
    /// Same as the previous frame, but the last `k` locals are absent.
    /// `frame_type` 248-250.
    ChopFrame {
        /// Bytecode offset this frame applies to.
        offset_delta: u16,
        /// How many trailing locals are dropped (`251 - frame_type`).
        chopped_locals: u8,
    },
    /// Same locals, empty stack, explicit offset delta. `frame_type` 251.
    SameFrameExtended {
        /// Bytecode offset this frame applies to.
        offset_delta: u16,
    },
    /// Same as the previous frame, with `k` additional locals. `frame_type`
    /// 252-254.
    AppendFrame {
        /// Bytecode offset this frame applies to.
        offset_delta: u16,
        /// The types of the additional locals.
        new_locals: Vec<VerificationTypeInfo>,
    },
    /// Full explicit frame. `frame_type` 255.
    FullFrame {
        /// Bytecode offset this frame applies to.
        offset_delta: u16,
        /// The types of every local variable slot.
        locals: Vec<VerificationTypeInfo>,
        /// The types of every stack slot, bottom to top.
        stack: Vec<VerificationTypeInfo>,
    },
}

/// The body of a method with code: its instructions and the metadata
/// needed to execute and debug them.
#[derive(Debug, Clone)]
pub struct MethodBody {
    /// The maximum depth of the operand stack at any point during
    /// execution.
    pub max_stack: u16,
    /// The number of local variable slots, including `this` and
    /// parameters.
    pub max_locals: u16,
    /// The decoded instructions, keyed by code offset.
    pub instructions: InstructionList,
    /// Exception handlers, in the order they should be checked.
    pub exception_table: Vec<ExceptionTableEntry>,
    /// Source line mapping, if compiled with debug info.
    pub line_number_table: Option<Vec<LineNumberTableEntry>>,
    /// Local variable names and types, if compiled with debug info.
    pub local_variable_table: Option<Vec<LocalVariableTableEntry>>,
    /// Local variable generic signatures, if compiled with debug info.
    pub local_variable_type_table: Option<Vec<LocalVariableTypeTableEntry>>,
    /// Verifier type state snapshots, used by the class file verifier.
    pub stack_map_table: Option<Vec<StackMapFrame>>,
}
