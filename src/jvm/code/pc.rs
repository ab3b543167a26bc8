use std::fmt::Display;

/// An offset, in bytes, from the start of a `Code` attribute's instruction
/// stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct ProgramCounter(u16);

/// A computed branch target fell outside the range addressable by a
/// `ProgramCounter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("program counter offset out of range")]
pub struct InvalidOffset;

impl ProgramCounter {
    /// The program counter at the start of the instruction stream.
    pub const ZERO: Self = Self(0);

    /// The raw byte offset.
    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Computes `self + displacement`, as used to resolve a branch target
    /// from a signed operand.
    pub fn offset(self, displacement: i32) -> Result<Self, InvalidOffset> {
        i32::from(self.0)
            .checked_add(displacement)
            .and_then(|it| u16::try_from(it).ok())
            .map(Self)
            .ok_or(InvalidOffset)
    }

    /// Convenience for the common case of a 16-bit signed branch operand.
    pub fn offset_i16(self, displacement: i16) -> Result<Self, InvalidOffset> {
        self.offset(i32::from(displacement))
    }
}

impl From<u16> for ProgramCounter {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl Display for ProgramCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:05}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn offset_adds_displacement() {
        let pc = ProgramCounter::from(10);
        assert_eq!(pc.offset(5).unwrap().value(), 15);
        assert_eq!(pc.offset(-5).unwrap().value(), 5);
    }

    #[test]
    fn offset_rejects_negative_result() {
        let pc = ProgramCounter::from(2);
        assert_eq!(pc.offset(-5), Err(InvalidOffset));
    }

    #[test]
    fn displays_as_fixed_width_hash() {
        assert_eq!(ProgramCounter::from(7).to_string(), "#00007");
    }
}
