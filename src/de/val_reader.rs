use std::io::{self, Read};
use std::marker::PhantomData;

use byteorder::ByteOrder;
use byteorder::ReadBytesExt;

use crate::PlyError;

/// Reads fixed-width scalars for one record at a time.
///
/// Any EOF is reported as [`PlyError::TruncatedStream`] for the record set by
/// [`BinValReader::begin_record`].
pub struct BinValReader<R: Read, E: ByteOrder> {
    reader: R,
    element: &'static str,
    index: usize,
    _endian: PhantomData<E>,
}

impl<R: Read, E: ByteOrder> BinValReader<R, E> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            element: "vertex",
            index: 0,
            _endian: PhantomData,
        }
    }

    pub(crate) fn begin_record(&mut self, element: &'static str, index: usize) {
        self.element = element;
        self.index = index;
    }

    fn map_err(&self, err: io::Error) -> PlyError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            PlyError::TruncatedStream {
                element: self.element,
                index: self.index,
            }
        } else {
            PlyError::Io(err)
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, PlyError> {
        self.reader.read_u8().map_err(|e| self.map_err(e))
    }

    pub fn read_u16(&mut self) -> Result<u16, PlyError> {
        self.reader.read_u16::<E>().map_err(|e| self.map_err(e))
    }

    pub fn read_i32(&mut self) -> Result<i32, PlyError> {
        self.reader.read_i32::<E>().map_err(|e| self.map_err(e))
    }

    pub fn read_f32(&mut self) -> Result<f32, PlyError> {
        self.reader.read_f32::<E>().map_err(|e| self.map_err(e))
    }

    pub fn read_f64(&mut self) -> Result<f64, PlyError> {
        self.reader.read_f64::<E>().map_err(|e| self.map_err(e))
    }

    /// Advance past `len` bytes without interpreting them.
    pub fn skip(&mut self, len: usize) -> Result<(), PlyError> {
        let mut buf = [0u8; 8];
        self.reader
            .read_exact(&mut buf[..len])
            .map_err(|e| self.map_err(e))
    }
}
