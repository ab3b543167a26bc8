use super::Error;

/// A positional, big-endian reader over an in-memory byte source.
///
/// Tracks the current offset and an independent alignment reference point
/// so that [`ByteReader::align`] can pad to a boundary measured relative to
/// wherever [`ByteReader::start_align`] was last called, rather than to the
/// start of the underlying source.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
    align_from: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            align_from: 0,
        }
    }

    /// Current byte position within the source.
    pub(crate) fn offset(&self) -> u64 {
        self.position as u64
    }

    /// Records the current position as the alignment reference point.
    pub(crate) fn start_align(&mut self) {
        self.align_from = self.position;
    }

    /// Offset relative to the last [`ByteReader::start_align`] call.
    pub(crate) fn aligned_offset(&self) -> usize {
        self.position - self.align_from
    }

    /// Consumes `(-aligned_offset) mod multiple` bytes of padding.
    pub(crate) fn align(&mut self, multiple: usize) -> Result<(), Error> {
        let offset = self.aligned_offset();
        let padded = offset.div_ceil(multiple) * multiple;
        self.read(padded - offset).map(|_| ())
    }

    /// Reads `n` raw bytes.
    pub(crate) fn read(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.data.len() - self.position < n {
            return Err(Error::short_read(
                self.offset(),
                std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
            ));
        }
        let slice = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    /// Reads `len(expected)` bytes and fails with [`Error::UnexpectedBytes`]
    /// if they do not match.
    pub(crate) fn expect(&mut self, expected: &[u8]) -> Result<(), Error> {
        let offset = self.offset();
        let found = self.read(expected.len())?;
        if found == expected {
            Ok(())
        } else {
            Err(Error::UnexpectedBytes {
                offset,
                expected: expected.to_vec(),
                found: found.to_vec(),
            })
        }
    }

    /// Parses `n` items of `T` in sequence.
    pub(crate) fn many<T: FromReader>(&mut self, n: usize) -> Result<Vec<T>, Error> {
        (0..n).map(|_| T::from_reader(self)).collect()
    }

    pub(crate) fn u1(&mut self) -> Result<u8, Error> {
        u8::from_reader(self)
    }

    pub(crate) fn u2(&mut self) -> Result<u16, Error> {
        u16::from_reader(self)
    }

    pub(crate) fn u4(&mut self) -> Result<u32, Error> {
        u32::from_reader(self)
    }

    pub(crate) fn u8(&mut self) -> Result<u64, Error> {
        u64::from_reader(self)
    }

    pub(crate) fn i1(&mut self) -> Result<i8, Error> {
        i8::from_reader(self)
    }

    pub(crate) fn i2(&mut self) -> Result<i16, Error> {
        i16::from_reader(self)
    }

    pub(crate) fn i4(&mut self) -> Result<i32, Error> {
        i32::from_reader(self)
    }

    /// Returns a sub-reader over the next `len` bytes and advances past
    /// them, regardless of how much of that window the sub-reader ends up
    /// consuming.
    pub(crate) fn windowed(&mut self, len: usize) -> Result<ByteReader<'a>, Error> {
        self.read(len).map(ByteReader::new)
    }
}

/// Decodes a value from the front of a [`ByteReader`].
///
/// This is the "Parsed framework": every wire-shaped type implements this
/// trait with an ordered sequence of reads, and composite types simply
/// call through to the `FromReader` impls of their fields.
pub(crate) trait FromReader: Sized {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error>;
}

#[trait_gen::trait_gen(T -> u8, i8)]
impl FromReader for T {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let offset = reader.offset();
        let mut buf = [0u8; 1];
        buf.copy_from_slice(
            reader
                .data
                .get(reader.position..reader.position + 1)
                .ok_or_else(|| {
                    Error::short_read(
                        offset,
                        std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
                    )
                })?,
        );
        reader.position += 1;
        Ok(T::from_be_bytes(buf))
    }
}

#[trait_gen::trait_gen(T -> u16, i16, u32, i32, u64, i64, f32, f64)]
impl FromReader for T {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        const N: usize = std::mem::size_of::<T>();
        let offset = reader.offset();
        let bytes = reader.data.get(reader.position..reader.position + N);
        let Some(bytes) = bytes else {
            return Err(Error::short_read(
                offset,
                std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
            ));
        };
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        reader.position += N;
        Ok(T::from_be_bytes(buf))
    }
}

impl<const N: usize> FromReader for [u8; N] {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let bytes = reader.read(N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        Ok(buf)
    }
}

impl<'a> ByteReader<'a> {
    /// Reads the whole remainder of the source as raw bytes.
    pub(crate) fn read_to_end(&mut self) -> Result<&'a [u8], Error> {
        let remaining = self.data.len() - self.position;
        self.read(remaining)
    }

    /// `true` once every byte of the source has been consumed.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.position == self.data.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_u2_big_endian() {
        let data = [0x01, 0x02];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.u2().unwrap(), 0x0102);
    }

    #[test]
    fn short_read_on_truncated_input() {
        let data = [0x01];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(reader.u2(), Err(Error::ShortRead { .. })));
    }

    #[test]
    fn expect_matches_literal() {
        let data = [0xCA, 0xFE, 0xBA, 0xBE];
        let mut reader = ByteReader::new(&data);
        reader.expect(&[0xCA, 0xFE, 0xBA, 0xBE]).unwrap();
    }

    #[test]
    fn expect_rejects_mismatch() {
        let data = [0xCA, 0xFE, 0x00, 0x00];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            reader.expect(&[0xCA, 0xFE, 0xBA, 0xBE]),
            Err(Error::UnexpectedBytes { .. })
        ));
    }

    #[test]
    fn align_pads_to_multiple() {
        let data = [0u8; 8];
        let mut reader = ByteReader::new(&data);
        reader.read(3).unwrap();
        reader.start_align();
        reader.read(1).unwrap();
        reader.align(4).unwrap();
        assert_eq!(reader.aligned_offset(), 4);
    }
}
