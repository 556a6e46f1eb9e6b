use buffer::with_buffer;
use buffer::Buffer;
use buffer::BufferRef;
use buffer::CapacityError;
use log::debug;
use std::fmt;
use thiserror::Error;

use crate::code::Code;
use crate::code::CodeTable;
use crate::code::MissingSymbol;

#[derive(Debug, Error)]
pub enum PackError {
    #[error(transparent)]
    MissingSymbol(#[from] MissingSymbol),
    #[error("buffer too small for the packed output")]
    Capacity(CapacityError),
}

impl From<CapacityError> for PackError {
    fn from(e: CapacityError) -> PackError {
        PackError::Capacity(e)
    }
}

/// Collects single bits and hands out full bytes, MSB first.
///
/// The bytes are passed to a callback as soon as they are complete, the last
/// partial byte is zero-padded by `finish`.
pub struct BitWriter<F> {
    byte: u8,
    num_bits: u8,
    total_bits: u64,
    f: F,
}

impl<E, F: FnMut(u8) -> Result<(), E>> BitWriter<F> {
    pub fn new(f: F) -> BitWriter<F> {
        BitWriter {
            byte: 0,
            num_bits: 0,
            total_bits: 0,
            f: f,
        }
    }
    pub fn write_bit(&mut self, bit: bool) -> Result<(), E> {
        if bit {
            self.byte |= 1 << (7 - self.num_bits);
        }
        self.num_bits += 1;
        self.total_bits += 1;
        if self.num_bits == 8 {
            let byte = self.byte;
            self.byte = 0;
            self.num_bits = 0;
            (self.f)(byte)?;
        }
        Ok(())
    }
    pub fn write_code(&mut self, code: Code) -> Result<(), E> {
        for bit in code.bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }
    /// Number of bits written so far, excluding padding.
    pub fn total_bits(&self) -> u64 {
        self.total_bits
    }
    /// Flushes the last partial byte, padding it with zero bits.
    ///
    /// Returns the number of bits written, excluding padding.
    pub fn finish(mut self) -> Result<u64, E> {
        if self.num_bits != 0 {
            (self.f)(self.byte)?;
        }
        Ok(self.total_bits)
    }
}

impl<F> fmt::Debug for BitWriter<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BitWriter")
            .field("byte", &self.byte)
            .field("num_bits", &self.num_bits)
            .field("total_bits", &self.total_bits)
            .finish()
    }
}

fn pack_impl<E, F>(input: &[u8], table: &CodeTable, f: F) -> Result<u64, E>
where
    E: From<MissingSymbol>,
    F: FnMut(u8) -> Result<(), E>,
{
    let mut writer = BitWriter::new(f);
    for &byte in input {
        let code = *table.get(byte).ok_or(MissingSymbol(byte))?;
        writer.write_code(code)?;
    }
    writer.finish()
}

/// Encodes `input` with the codes from `table` and packs the resulting bits
/// into bytes.
///
/// Fails if a byte of the input has no code.
pub fn pack(input: &[u8], table: &CodeTable) -> Result<Vec<u8>, MissingSymbol> {
    let mut result = Vec::with_capacity(table.packed_len(input)?);
    let bits = pack_impl(input, table, |b| -> Result<(), MissingSymbol> {
        result.push(b);
        Ok(())
    })?;
    debug!("packed {} bytes into {} bits, {} bytes", input.len(), bits, result.len());
    Ok(result)
}

/// Like `pack`, but writes into a caller supplied buffer.
pub fn pack_into<'a, B: Buffer<'a>>(input: &[u8], table: &CodeTable, buffer: B)
    -> Result<&'a [u8], PackError>
{
    with_buffer(buffer, |b| pack_into_impl(input, table, b))
}

fn pack_into_impl<'d, 's>(input: &[u8], table: &CodeTable, mut buffer: BufferRef<'d, 's>)
    -> Result<&'d [u8], PackError>
{
    let bits = pack_impl(input, table, |b| -> Result<(), PackError> {
        buffer.write(&[b])?;
        Ok(())
    })?;
    debug!("packed {} bytes into {} bits", input.len(), bits);
    Ok(buffer.initialized())
}
