//! Binary dumps of single diagrams.
//!
//! All integers are little-endian.  The layout is: magic, arithmetic code,
//! name, rank, uniqueness flag, irrep, the qparts/valence/t3/order strings,
//! the block count, and then for every block its spinor-block tuple, its
//! shape, its uniqueness flag and (for unique blocks only) its elements.
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use super::super::diagram::Diagram;
use super::super::error::{Error, Result, format_error, shape_mismatch};
use super::super::linalg::{Arith, Scalar};
use super::super::spinors::SpinorSpace;
use super::super::utils::cast;
use super::{create_compressed, invalid_data, open_compressed};

pub const MAGIC: u32 = 0x6f6c6579;

fn write_u32<W: Write>(w: &mut W, x: usize) -> io::Result<()> {
    w.write_u32::<LittleEndian>(cast(x))
}

fn read_u32<R: Read>(r: &mut R) -> io::Result<usize> {
    Ok(cast(r.read_u32::<LittleEndian>()?))
}

fn write_str<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    write_u32(w, s.len())?;
    w.write_all(s.as_bytes())
}

fn read_string<R: Read>(r: &mut R) -> io::Result<String> {
    let len = read_u32(r)?;
    let mut buf = Vec::new();
    r.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof,
                                  "truncated string in diagram file"));
    }
    String::from_utf8(buf).map_err(invalid_data)
}

fn write_scalar<T: Scalar, W: Write>(w: &mut W, x: T) -> io::Result<()> {
    w.write_f64::<LittleEndian>(x.re())?;
    if T::ARITH == Arith::Complex {
        w.write_f64::<LittleEndian>(x.im())?;
    }
    Ok(())
}

fn read_scalar<T: Scalar, R: Read>(r: &mut R) -> io::Result<T> {
    let re = r.read_f64::<LittleEndian>()?;
    let im = match T::ARITH {
        Arith::Complex => r.read_f64::<LittleEndian>()?,
        Arith::Real => 0.0,
    };
    Ok(T::from_re_im(re, im))
}

pub fn write_diagram<T: Scalar, W: Write>(w: &mut W, d: &Diagram<T>)
                                          -> Result<()> {
    w.write_u32::<LittleEndian>(MAGIC)?;
    w.write_u8(T::ARITH.code())?;
    write_str(w, d.name())?;
    write_u32(w, d.rank())?;
    w.write_u8(d.only_unique() as u8)?;
    write_u32(w, d.irrep())?;
    write_str(w, &d.qparts_string())?;
    write_str(w, &d.valence_string())?;
    write_str(w, &d.t3space_string())?;
    write_str(w, &d.order_string())?;
    write_u32(w, d.blocks().len())?;
    for block in d.blocks() {
        for &b in &block.spinor_blocks {
            write_u32(w, b)?;
        }
        for &n in &block.shape {
            write_u32(w, n)?;
        }
        w.write_u8(block.is_unique as u8)?;
        for &x in &block.buf {
            write_scalar(w, x)?;
        }
    }
    Ok(())
}

/// Read a diagram and rebuild its block structure over `space`.  The
/// stored structure must agree with the rebuilt one.
pub fn read_diagram<T: Scalar, R: Read>(
    r: &mut R,
    space: Arc<SpinorSpace>,
) -> Result<Diagram<T>> {
    let magic = r.read_u32::<LittleEndian>()?;
    if magic != MAGIC {
        return Err(format_error(format!(
            "bad magic number {:#x} in diagram file", magic)));
    }
    let arith = Arith::from_code(r.read_u8()?)?;
    if arith != T::ARITH {
        return Err(Error::UnsupportedKind(format!(
            "diagram file holds {} data, expected {}", arith, T::ARITH)));
    }
    let name = read_string(r)?;
    let rank = read_u32(r)?;
    let only_unique = r.read_u8()? != 0;
    let irrep = read_u32(r)?;
    let qparts = read_string(r)?;
    let valence = read_string(r)?;
    let t3space = read_string(r)?;
    let order = read_string(r)?;
    let t3space = super::super::diagram::parse_flags(&t3space, "t3")?;
    let mut d = Diagram::new(space, &name, &qparts, &valence, &t3space,
                             &order, only_unique, irrep)?;
    if d.rank() != rank {
        return Err(format_error(format!(
            "'{}' stored with rank {} but qparts {:?}", name, rank, qparts)));
    }
    let n_blocks = read_u32(r)?;
    if n_blocks != d.blocks().len() {
        return Err(shape_mismatch(format!(
            "'{}' stored with {} blocks, the spinor space gives {}",
            name, n_blocks, d.blocks().len())));
    }
    for block in d.blocks_mut() {
        let mut spinor_blocks = Vec::with_capacity(rank);
        for _ in 0 .. rank {
            spinor_blocks.push(read_u32(r)?);
        }
        let mut shape = Vec::with_capacity(rank);
        for _ in 0 .. rank {
            shape.push(read_u32(r)?);
        }
        let is_unique = r.read_u8()? != 0;
        if spinor_blocks != block.spinor_blocks || shape != block.shape
            || is_unique != block.is_unique
        {
            return Err(shape_mismatch(format!(
                "'{}': stored block {:?} {:?} does not match {:?} {:?}",
                name, spinor_blocks, shape,
                block.spinor_blocks, block.shape)));
        }
        for x in &mut block.buf {
            *x = read_scalar(r)?;
        }
    }
    Ok(d)
}

/// Write a diagram to a file, compressed if the name ends in `.gz`/`.xz`.
pub fn save<T: Scalar>(path: &Path, d: &Diagram<T>) -> Result<()> {
    let mut w = create_compressed(path)?;
    write_diagram(&mut w, d)?;
    w.finish()?;
    Ok(())
}

pub fn load<T: Scalar>(path: &Path, space: Arc<SpinorSpace>)
                       -> Result<Diagram<T>> {
    let mut r = io::BufReader::new(open_compressed(path)?);
    read_diagram(&mut r, space)
}

#[cfg(test)]
mod tests {
    use num::complex::Complex64;
    use super::*;
    use super::super::super::diagram::t3_mask;
    use super::super::super::spinors::tests::small_space;

    #[test]
    fn test_roundtrip() {
        let space = Arc::new(small_space());
        let mut d = Diagram::<Complex64>::new(
            space.clone(), "t2", "hhpp", "0000", &t3_mask(4, false), "1234",
            true, 0).unwrap();
        d.set(&[0, 4, 2, 6], Complex64::new(1.0, -0.5)).unwrap();
        d.set(&[1, 5, 3, 7], Complex64::new(-2.0, 0.0)).unwrap();
        let mut buf = Vec::new();
        write_diagram(&mut buf, &d).unwrap();
        let e: Diagram<Complex64> =
            read_diagram(&mut &buf[..], space.clone()).unwrap();
        assert_eq!(e.name(), "t2");
        assert!(e.only_unique());
        assert!(e.same_structure(&d));
        assert_eq!(e.get(&[4, 0, 2, 6]).unwrap(), Complex64::new(-1.0, 0.5));
        assert_eq!(e.get(&[1, 5, 3, 7]).unwrap(), Complex64::new(-2.0, 0.0));

        match read_diagram::<f64, _>(&mut &buf[..], space.clone()) {
            Err(Error::UnsupportedKind(_)) => {}
            r => panic!("unexpected: {:?}", r.map(|_| ())),
        }
        let mut bad = buf.clone();
        bad[0] ^= 0xff;
        match read_diagram::<Complex64, _>(&mut &bad[..], space) {
            Err(Error::Format(_)) => {}
            r => panic!("unexpected: {:?}", r.map(|_| ())),
        }
    }

    #[test]
    fn test_truncated_name() {
        let space = Arc::new(small_space());
        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(MAGIC).unwrap();
        buf.write_u8(Arith::Real.code()).unwrap();
        buf.write_u32::<LittleEndian>(0xffff_fff0).unwrap();
        buf.extend_from_slice(b"t2");
        match read_diagram::<f64, _>(&mut &buf[..], space) {
            Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof => {}
            r => panic!("unexpected: {:?}", r.map(|_| ())),
        }
    }

    #[test]
    fn test_save_load_gz() {
        let space = Arc::new(small_space());
        let mut d = Diagram::<f64>::new(
            space.clone(), "h1", "hp", "00", &t3_mask(2, false), "12",
            false, 0).unwrap();
        d.set(&[5, 6], 0.125).unwrap();
        let path = std::env::temp_dir().join(format!(
            "ccdiag_dgfile_{}.dg.gz", std::process::id()));
        save(&path, &d).unwrap();
        let e: Diagram<f64> = load(&path, space).unwrap();
        assert_eq!(e.get(&[5, 6]).unwrap(), 0.125);
        assert_eq!(e.qparts_string(), "hp");
        std::fs::remove_file(&path).unwrap();
    }
}
