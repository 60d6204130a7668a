//! Little-endian binary layout of contexts and polynomials.
//!
//! Every integer field is a u64:
//! - [Context]: `n || limbs || q_0 .. q_{limbs-1}`.
//! - [PolyRNS]: `limbs || n || limb 0 coefficients || ... || limb limbs-1 coefficients`.
//!
//! A context is rebuilt from its moduli on read, rerunning the derivation of
//! every table. A polynomial is read against a receiver (or a [Context]) that
//! fixes the expected header.

use crate::error::{Error, Result};
use crate::poly::{Poly, PolyRNS, Representation};
use crate::ring::{is_valid_degree, Context};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{ErrorKind, Read, Write};

const WORD: usize = 8;

pub trait WriterTo {
    /// Writes self and returns the number of bytes written, always equal to
    /// [WriterTo::binary_size].
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize>;

    fn binary_size(&self) -> usize;

    fn marshal(&self) -> Result<Vec<u8>> {
        let mut buf: Vec<u8> = Vec::with_capacity(self.binary_size());
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

pub trait ReaderFrom {
    /// Overwrites self from reader and returns the number of bytes consumed.
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<usize>;
}

/// Counts the bytes consumed and turns an early end of stream into
/// [Error::Truncated].
struct Counted<'a, R: Read> {
    reader: &'a mut R,
    consumed: usize,
    expected: usize,
}

impl<'a, R: Read> Counted<'a, R> {
    fn new(reader: &'a mut R, expected: usize) -> Self {
        Self {
            reader,
            consumed: 0,
            expected,
        }
    }

    fn map_err(&self, err: std::io::Error) -> Error {
        if err.kind() == ErrorKind::UnexpectedEof {
            Error::Truncated {
                consumed: self.consumed,
                expected: self.expected,
            }
        } else {
            Error::Io(err)
        }
    }

    fn read_u64(&mut self) -> Result<u64> {
        match self.reader.read_u64::<LittleEndian>() {
            Ok(v) => {
                self.consumed += WORD;
                Ok(v)
            }
            Err(err) => Err(self.map_err(err)),
        }
    }

    fn read_u64_into(&mut self, dst: &mut [u64]) -> Result<()> {
        match self.reader.read_u64_into::<LittleEndian>(dst) {
            Ok(()) => {
                self.consumed += WORD * dst.len();
                Ok(())
            }
            Err(err) => Err(self.map_err(err)),
        }
    }
}

fn expect_header(field: &'static str, expected: usize, got: u64) -> Result<()> {
    if got != expected as u64 {
        return Err(Error::UnexpectedHeader {
            field,
            expected: expected as u64,
            got,
        });
    }
    Ok(())
}

fn expect_consumed(data: &[u8], consumed: usize) -> Result<()> {
    if consumed != data.len() {
        return Err(Error::InvalidArgument(format!(
            "{} trailing bytes after {} bytes",
            data.len() - consumed,
            consumed
        )));
    }
    Ok(())
}

impl WriterTo for Context {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize> {
        writer.write_u64::<LittleEndian>(self.n() as u64)?;
        writer.write_u64::<LittleEndian>(self.limbs() as u64)?;
        for q in self.moduli() {
            writer.write_u64::<LittleEndian>(q)?;
        }
        Ok(self.binary_size())
    }

    fn binary_size(&self) -> usize {
        WORD * (2 + self.limbs())
    }
}

impl ReaderFrom for Context {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        let (context, consumed) = Context::read(reader)?;
        *self = context;
        Ok(consumed)
    }
}

impl Context {
    /// Reads a context and rebuilds its tables. Returns the context and the
    /// number of bytes consumed.
    pub fn read<R: Read>(reader: &mut R) -> Result<(Context, usize)> {
        let mut counted: Counted<'_, R> = Counted::new(reader, 2 * WORD);
        let n: u64 = counted.read_u64()?;
        let limbs: u64 = counted.read_u64()?;
        if usize::try_from(n).map_or(true, |n| !is_valid_degree(n)) {
            return Err(Error::InvalidRingDegree { n: n as usize });
        }
        counted.expected = (limbs as usize)
            .checked_add(2)
            .and_then(|w| w.checked_mul(WORD))
            .unwrap_or(usize::MAX);
        let mut moduli: Vec<u64> = Vec::new();
        for _ in 0..limbs {
            moduli.push(counted.read_u64()?);
        }
        let context: Context = Context::new(n as usize, &moduli)?;
        Ok((context, counted.consumed))
    }

    /// Decodes a context from exactly data.
    pub fn unmarshal(data: &[u8]) -> Result<Context> {
        let mut reader: &[u8] = data;
        let (context, consumed) = Context::read(&mut reader)?;
        expect_consumed(data, consumed)?;
        Ok(context)
    }

    /// Reads a polynomial whose header must match self, with every
    /// coefficient reduced modulo its limb.
    pub fn read_poly<R: Read>(&self, reader: &mut R) -> Result<PolyRNS<u64>> {
        let mut a: PolyRNS<u64> = self.new_poly();
        a.read_from(reader)?;
        for (ring, p) in self.rings.iter().zip(a.iter()) {
            let q: u64 = ring.modulus.q;
            if let Some(x) = p.0.iter().find(|&&x| x >= q) {
                return Err(Error::InvalidArgument(format!(
                    "coefficient {} is not reduced modulo {}",
                    x, q
                )));
            }
        }
        Ok(a)
    }

    /// Decodes a polynomial over self from exactly data.
    pub fn unmarshal_poly(&self, data: &[u8]) -> Result<PolyRNS<u64>> {
        let mut reader: &[u8] = data;
        let a: PolyRNS<u64> = self.read_poly(&mut reader)?;
        expect_consumed(data, a.binary_size())?;
        Ok(a)
    }
}

impl WriterTo for PolyRNS<u64> {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize> {
        writer.write_u64::<LittleEndian>(self.limbs() as u64)?;
        writer.write_u64::<LittleEndian>(self.n() as u64)?;
        for p in self.iter() {
            for &x in p.0.iter() {
                writer.write_u64::<LittleEndian>(x)?;
            }
        }
        Ok(self.binary_size())
    }

    fn binary_size(&self) -> usize {
        WORD * (2 + self.limbs() * self.n())
    }
}

impl ReaderFrom for PolyRNS<u64> {
    /// The header must match the shape of self. On error self is left
    /// unchanged.
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        let expected: usize = self.binary_size();
        let mut counted: Counted<'_, R> = Counted::new(reader, expected);
        expect_header("limbs", self.limbs(), counted.read_u64()?)?;
        expect_header("n", self.n(), counted.read_u64()?)?;
        let mut limbs: Vec<Poly<u64>> = (0..self.limbs()).map(|_| Poly::new(self.n())).collect();
        for p in limbs.iter_mut() {
            counted.read_u64_into(&mut p.0)?;
        }
        self.limbs = limbs;
        self.repr = Representation::COEFFS;
        Ok(counted.consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling::source::Source;

    const MODULI: [u64; 2] = [0x1fffffffffe00001, 0x1fffffffffc80001];

    #[test]
    fn context_layout() {
        let context = Context::new(16, &MODULI).unwrap();
        let data = context.marshal().unwrap();
        assert_eq!(data.len(), 32);
        assert_eq!(&data[..8], &16u64.to_le_bytes());
        assert_eq!(&data[8..16], &2u64.to_le_bytes());
        assert_eq!(&data[16..24], &MODULI[0].to_le_bytes());
        let decoded = Context::unmarshal(&data).unwrap();
        assert_eq!(decoded.moduli(), context.moduli());
        assert_eq!(decoded.n(), 16);
    }

    #[test]
    fn poly_round_trip() {
        let context = Context::new(16, &MODULI).unwrap();
        let a = context
            .new_uniform_poly_from(&mut Source::new([0u8; 32]))
            .unwrap();
        let mut buf: Vec<u8> = Vec::new();
        assert_eq!(a.write_to(&mut buf).unwrap(), a.binary_size());
        assert_eq!(buf.len(), 8 * (2 + 2 * 16));
        let b = context.unmarshal_poly(&buf).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn truncated_and_mismatched_streams() {
        let context = Context::new(16, &MODULI).unwrap();
        let a = context.new_poly();
        let data = a.marshal().unwrap();

        match context.unmarshal_poly(&data[..data.len() - 3]) {
            Err(Error::Truncated { consumed, expected }) => {
                assert_eq!(consumed, 8 * (2 + 16));
                assert_eq!(expected, data.len());
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let lower = context.at_level(0).unwrap();
        assert!(matches!(
            lower.unmarshal_poly(&data),
            Err(Error::UnexpectedHeader { field: "limbs", expected: 1, got: 2 })
        ));

        let context_data = context.marshal().unwrap();
        assert!(matches!(
            Context::unmarshal(&context_data[..20]),
            Err(Error::Truncated { consumed: 16, expected: 32 })
        ));
    }

    #[test]
    fn oversized_degree_is_rejected_before_building_tables() {
        let mut data: Vec<u8> = Vec::new();
        data.write_u64::<LittleEndian>(1 << 40).unwrap();
        data.write_u64::<LittleEndian>(1).unwrap();
        data.write_u64::<LittleEndian>(MODULI[0]).unwrap();
        assert!(matches!(
            Context::unmarshal(&data),
            Err(Error::InvalidRingDegree { n: 1099511627776 })
        ));
    }
}
