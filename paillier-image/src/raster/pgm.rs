//! Binary PGM reader and writer.
//!
//! Layout:
//!
//! ```text
//! P5
//! [# comment lines]
//! <width> <height>
//! <max value>
//! <body>
//! ```
//!
//! The compressed variant adds the original `<width> <height>` on its own line right
//! after the magic. Header fields are separated by whitespace, `#` starts a comment
//! running to the end of the line, and exactly one whitespace byte separates the max
//! value from the body. The body holds `width * height` samples in row-major order,
//! each stored in host-native byte order at the smallest width able to hold the max
//! value (one byte up to 255).

use crate::cipher::SampleWidth;
use crate::errors::{PaillierError, Result};
use crate::raster::{CompressedRaster, Dimensions, Raster};

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use std::io::{Read, Write};

const MAGIC: &str = "P5";

/// Reads the magic and the dimension line, leaving the reader at the max value field.
pub fn read_dimensions<R: Read>(reader: &mut R) -> Result<Dimensions> {
    let mut header = HeaderReader::new(reader);
    header.expect_magic()?;
    header.dimensions()
}

/// Reads a raster, storing samples at the width implied by the max value.
pub fn read<R: Read>(reader: &mut R) -> Result<Raster> {
    let mut header = HeaderReader::new(reader);
    header.expect_magic()?;
    let dims = header.dimensions()?;
    let max_value = header.number("max value")?;
    read_body(header.into_inner(), dims, max_value, None)
}

/// Like [`read`] but stores samples at `sample_width` whatever the max value.
pub fn read_with_width<R: Read>(reader: &mut R, sample_width: SampleWidth) -> Result<Raster> {
    let mut header = HeaderReader::new(reader);
    header.expect_magic()?;
    let dims = header.dimensions()?;
    let max_value = header.number("max value")?;
    read_body(header.into_inner(), dims, max_value, Some(sample_width))
}

pub fn write<W: Write>(writer: &mut W, raster: &Raster) -> Result<()> {
    let dims = raster.dims();
    writeln!(writer, "{}", MAGIC)?;
    writeln!(writer, "{} {}", dims.width, dims.height)?;
    writeln!(writer, "{}", raster.max_value())?;
    write_body(writer, raster)
}

pub fn read_compressed<R: Read>(reader: &mut R) -> Result<CompressedRaster> {
    let mut header = HeaderReader::new(reader);
    header.expect_magic()?;
    let original = header.dimensions()?;
    let dims = header.dimensions()?;
    let max_value = header.number("max value")?;
    let raster = read_body(header.into_inner(), dims, max_value, None)?;

    Ok(CompressedRaster { original, raster })
}

pub fn write_compressed<W: Write>(writer: &mut W, compressed: &CompressedRaster) -> Result<()> {
    let dims = compressed.raster.dims();
    writeln!(writer, "{}", MAGIC)?;
    writeln!(
        writer,
        "{} {}",
        compressed.original.width, compressed.original.height
    )?;
    writeln!(writer, "{} {}", dims.width, dims.height)?;
    writeln!(writer, "{}", compressed.raster.max_value())?;
    write_body(writer, &compressed.raster)
}

fn read_body<R: Read>(
    reader: &mut R,
    dims: Dimensions,
    max_value: u64,
    sample_width: Option<SampleWidth>,
) -> Result<Raster> {
    let stored_width = SampleWidth::smallest_for(max_value);
    let sample_width = sample_width.unwrap_or(stored_width);
    if stored_width.bits() > sample_width.bits() {
        return Err(PaillierError::MalformedRaster(format!(
            "max value {} does not fit {}",
            max_value, sample_width
        )));
    }

    let count = dims.sample_count()?;
    let byte_len = count.checked_mul(stored_width.bytes()).ok_or_else(|| {
        PaillierError::CalculationOverflow(format!("{} samples of {}", count, stored_width))
    })?;

    // Sized by the bytes actually read, never by the header's claim.
    let mut body = Vec::new();
    reader.take(byte_len as u64).read_to_end(&mut body)?;
    if body.len() != byte_len {
        return Err(PaillierError::MalformedRaster(format!(
            "body of a {} raster is shorter than {} bytes",
            dims, byte_len
        )));
    }

    let mut cursor = body.as_slice();
    let samples = (0..count)
        .map(|_| read_sample(&mut cursor, stored_width))
        .collect::<std::io::Result<Vec<_>>>()?;

    Raster::try_with(dims, max_value, sample_width, samples)
}

fn write_body<W: Write>(writer: &mut W, raster: &Raster) -> Result<()> {
    let stored_width = SampleWidth::smallest_for(raster.max_value());
    let mut body = Vec::with_capacity(raster.samples().len() * stored_width.bytes());
    for &sample in raster.samples() {
        match stored_width {
            SampleWidth::Bits8 => body.write_u8(sample as u8)?,
            SampleWidth::Bits16 => body.write_u16::<NativeEndian>(sample as u16)?,
            SampleWidth::Bits32 => body.write_u32::<NativeEndian>(sample as u32)?,
            SampleWidth::Bits64 => body.write_u64::<NativeEndian>(sample)?,
        }
    }
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

fn read_sample<R: Read>(reader: &mut R, width: SampleWidth) -> std::io::Result<u64> {
    Ok(match width {
        SampleWidth::Bits8 => reader.read_u8()? as u64,
        SampleWidth::Bits16 => reader.read_u16::<NativeEndian>()? as u64,
        SampleWidth::Bits32 => reader.read_u32::<NativeEndian>()? as u64,
        SampleWidth::Bits64 => reader.read_u64::<NativeEndian>()?,
    })
}

/// Byte-at-a-time header tokenizer, so nothing past the header is consumed.
struct HeaderReader<'a, R> {
    reader: &'a mut R,
}

impl<'a, R: Read> HeaderReader<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Self { reader }
    }

    fn into_inner(self) -> &'a mut R {
        self.reader
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Next whitespace-delimited token; its single terminating byte is consumed.
    fn token(&mut self, what: &str) -> Result<String> {
        let mut token = String::new();
        loop {
            let Some(byte) = self.next_byte()? else {
                break;
            };

            if byte == b'#' && token.is_empty() {
                while !matches!(self.next_byte()?, Some(b'\n') | None) {}
                continue;
            }
            if byte.is_ascii_whitespace() {
                if token.is_empty() {
                    continue;
                }
                break;
            }
            token.push(byte as char);
        }

        if token.is_empty() {
            return Err(PaillierError::MalformedRaster(format!(
                "header ends before the {}",
                what
            )));
        }
        Ok(token)
    }

    fn number(&mut self, what: &str) -> Result<u64> {
        let token = self.token(what)?;
        token.parse::<u64>().map_err(|_| {
            PaillierError::MalformedRaster(format!("{} must be a number, got {:?}", what, token))
        })
    }

    fn expect_magic(&mut self) -> Result<()> {
        let magic = self.token("magic")?;
        if magic != MAGIC {
            return Err(PaillierError::MalformedRaster(format!(
                "expected {} magic, got {:?}",
                MAGIC, magic
            )));
        }
        Ok(())
    }

    fn dimensions(&mut self) -> Result<Dimensions> {
        let width = self.number("width")?;
        let height = self.number("height")?;
        Ok(Dimensions::new(width, height))
    }
}
