//! Formatted effective-Hamiltonian files.
//!
//! ```text
//! 1h1p         # sector
//! complex   1     2   # arithmetic, rep No & heff size
//!   1.000000000000E+00  0.000000000000E+00 -2.500000000000E-01 ...
//! ```
//!
//! Each record is a `dim × dim` block in row-major order, written with C
//! `%21.12E` formatting: four numbers per line for real blocks, two
//! (re, im) pairs per line for complex blocks.
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use num::complex::Complex64;
use regex::Regex;
use super::super::error::{Error, Result, format_error, shape_mismatch};
use super::super::linalg::{Arith, Scalar};

/// `HEFF_<h>h<p>p` or `HEFF_<h>h<p>p_<label>`.
pub fn heff_file_name(sect_h: usize, sect_p: usize, label: Option<&str>)
                      -> String {
    match label {
        None => format!("HEFF_{}h{}p", sect_h, sect_p),
        Some(label) => format!("HEFF_{}h{}p_{}", sect_h, sect_p, label),
    }
}

/// Index of the first nonzero entry, or `block_dims.len()` if there is
/// none.
pub fn first_nonzero_irrep(block_dims: &[usize]) -> usize {
    block_dims.iter().position(|&d| d != 0).unwrap_or(block_dims.len())
}

/// Format like C's `%21.12E`.
pub fn fmt_e21(x: f64) -> String {
    let s = if x.is_nan() {
        "NAN".to_owned()
    } else if x.is_infinite() {
        if x < 0.0 { "-INF".to_owned() } else { "INF".to_owned() }
    } else {
        let s = format!("{:.12E}", x);
        match s.find('E') {
            None => s,
            Some(i) => {
                let exp: i32 = s[i + 1 ..].parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}E{}{:02}", &s[.. i], sign, exp.abs())
            }
        }
    };
    format!("{:>21}", s)
}

/// An open formatted Heff file.  Dropping it without `close` still
/// releases the file but may lose buffered output silently.
#[derive(Debug)]
pub struct HeffFile {
    path: PathBuf,
    writer: io::BufWriter<File>,
}

impl HeffFile {
    /// Create (or truncate) the file for the given sector in `dir` and
    /// write the sector line.
    pub fn open(
        dir: &Path,
        sect_h: usize,
        sect_p: usize,
        label: Option<&str>,
    ) -> Result<Self> {
        let path = dir.join(heff_file_name(sect_h, sect_p, label));
        let mut writer = io::BufWriter::new(File::create(&path)?);
        let sector = match label {
            None => format!("{}h{}p", sect_h, sect_p),
            Some(label) => label.to_owned(),
        };
        writeln!(writer, "{}         # sector", sector)?;
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `dim × dim` block.  A zero-dimension block writes only
    /// the record header.
    pub fn write_block<T: Scalar>(
        &mut self,
        arith: Arith,
        rep_no: usize,
        dim: usize,
        data: &[T],
    ) -> Result<()> {
        if data.len() != dim * dim {
            return Err(shape_mismatch(format!(
                "Heff block {} of size {} needs {} values, got {}",
                rep_no, dim, dim * dim, data.len())));
        }
        let w = &mut self.writer;
        writeln!(w, "{:<7}{:4}{:6}   # arithmetic, rep No & heff size",
                 arith.tag(), rep_no, dim)?;
        let per_line = match arith {
            Arith::Real => 4,
            Arith::Complex => 2,
        };
        for (i, x) in data.iter().enumerate() {
            match arith {
                Arith::Real => write!(w, "{}", fmt_e21(x.re()))?,
                Arith::Complex => write!(w, "{}{}", fmt_e21(x.re()),
                                         fmt_e21(x.im()))?,
            }
            if (i + 1) % per_line == 0 {
                writeln!(w)?;
            }
        }
        if data.len() % per_line != 0 {
            writeln!(w)?;
        }
        Ok(())
    }

    /// Flush and release the file.
    pub fn close(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write every nonzero block of a sector.  Blocks are numbered from 1
/// starting at the first irrep with a nonzero dimension.
pub fn write_formatted_heff<T: Scalar>(
    dir: &Path,
    sect_h: usize,
    sect_p: usize,
    label: Option<&str>,
    arith: Arith,
    block_dims: &[usize],
    blocks: &[Vec<T>],
) -> Result<PathBuf> {
    if block_dims.len() != blocks.len() {
        return Err(shape_mismatch(format!(
            "{} block dimensions for {} blocks",
            block_dims.len(), blocks.len())));
    }
    for (irrep, (&dim, block)) in block_dims.iter().zip(blocks).enumerate() {
        if dim.checked_mul(dim) != Some(block.len()) {
            return Err(shape_mismatch(format!(
                "Heff block of irrep {} with size {} has {} values",
                irrep, dim, block.len())));
        }
    }
    let first = first_nonzero_irrep(block_dims);
    let mut file = HeffFile::open(dir, sect_h, sect_p, label)?;
    for (irrep, (&dim, block)) in block_dims.iter().zip(blocks).enumerate() {
        if dim == 0 {
            continue;
        }
        file.write_block(arith, irrep - first + 1, dim, block)?;
    }
    let path = file.path().to_owned();
    file.close()?;
    Ok(path)
}

/// Write the vacuum-sector file holding only the total energy.
pub fn write_formatted_heff_0h0p(dir: &Path, arith: Arith, energy: f64)
                                 -> Result<PathBuf> {
    let path = dir.join(heff_file_name(0, 0, None));
    let mut w = io::BufWriter::new(File::create(&path)?);
    writeln!(w, "{:<13}# arithmetic", arith.tag())?;
    writeln!(w, "0h0p         # sector")?;
    writeln!(w, "   1     1   # rep No & heff size")?;
    match arith {
        Arith::Real => writeln!(w, "{}", fmt_e21(energy))?,
        Arith::Complex => writeln!(w, "{}{}", fmt_e21(energy), fmt_e21(0.0))?,
    }
    w.flush()?;
    Ok(path)
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeffRecord {
    pub arith: Arith,
    pub rep_no: usize,
    pub dim: usize,
    /// Row-major; imaginary parts are zero for real records.
    pub data: Vec<Complex64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeffContents {
    pub sector: String,
    pub records: Vec<HeffRecord>,
}

fn strip_comment(line: &str) -> &str {
    let content = match line.find('#') {
        Some(i) => &line[.. i],
        None => line,
    };
    content.trim()
}

fn parse_usize(s: &str) -> Result<usize> {
    s.parse().map_err(|_| format_error(format!("{:?} is not an integer", s)))
}

/// Parse a file written by `HeffFile` or `write_formatted_heff_0h0p`.
pub fn read_formatted_heff(path: &Path) -> Result<HeffContents> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let content = strip_comment(&line);
        if !content.is_empty() {
            lines.push(content.to_owned());
        }
    }
    let mut lines = lines.into_iter();

    // optional file-wide arithmetic line, then the sector
    let mut default_arith = None;
    let mut sector = lines.next()
        .ok_or_else(|| format_error("empty Heff file"))?;
    if let Ok(arith) = Arith::from_tag(&sector) {
        default_arith = Some(arith);
        sector = lines.next()
            .ok_or_else(|| format_error("missing sector line"))?;
    }

    let mut records = Vec::new();
    while let Some(header) = lines.next() {
        let header_re: &Regex = re!(r"^(?:([A-Za-z]\w*)\s+)?(\d+)\s+(\d+)$");
        let caps = header_re.captures(&header).ok_or_else(|| format_error(
            format!("bad record header {:?}", header)))?;
        let arith = match caps.get(1) {
            Some(tag) => Arith::from_tag(tag.as_str())?,
            None => default_arith.ok_or_else(|| format_error(
                "record without arithmetic tag"))?,
        };
        let rep_no = parse_usize(&caps[2])?;
        let dim = parse_usize(&caps[3])?;
        let width = match arith {
            Arith::Real => 1,
            Arith::Complex => 2,
        };
        let needed = dim.checked_mul(dim)
            .and_then(|n| n.checked_mul(width))
            .ok_or_else(|| format_error(format!(
                "record {} has an impossible size {}", rep_no, dim)))?;
        let mut numbers = Vec::new();
        while numbers.len() < needed {
            let line = lines.next().ok_or_else(|| format_error(format!(
                "record {} ends after {} of {} values",
                rep_no, numbers.len(), needed)))?;
            for tok in line.split_whitespace() {
                let x: f64 = tok.parse().map_err(|_| format_error(
                    format!("{:?} is not a number", tok)))?;
                numbers.push(x);
            }
        }
        if numbers.len() != needed {
            return Err(format_error(format!(
                "record {} has {} values, expected {}",
                rep_no, numbers.len(), needed)));
        }
        let data = numbers.chunks(width).map(|c| {
            Complex64::new(c[0], if width == 2 { c[1] } else { 0.0 })
        }).collect();
        records.push(HeffRecord { arith, rep_no, dim, data });
    }
    Ok(HeffContents { sector, records })
}

impl HeffContents {
    /// Record for the given block number.
    pub fn record(&self, rep_no: usize) -> Result<&HeffRecord> {
        self.records.iter().find(|r| r.rep_no == rep_no)
            .ok_or_else(|| Error::NotFound(format!("Heff block {}", rep_no)))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ccdiag_heff_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_first_nonzero_irrep() {
        assert_eq!(first_nonzero_irrep(&[0, 0, 3, 5, 0]), 2);
        assert_eq!(first_nonzero_irrep(&[0, 0, 0]), 3);
        assert_eq!(first_nonzero_irrep(&[]), 0);
        assert_eq!(first_nonzero_irrep(&[1]), 0);
    }

    #[test]
    fn test_fmt_e21() {
        assert_eq!(fmt_e21(1.5), "   1.500000000000E+00");
        assert_eq!(fmt_e21(-0.00025), "  -2.500000000000E-04");
        assert_eq!(fmt_e21(0.0), "   0.000000000000E+00");
        assert_eq!(fmt_e21(6.02e123), "  6.020000000000E+123");
        assert_eq!(fmt_e21(1.5).len(), 21);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(heff_file_name(1, 1, None), "HEFF_1h1p");
        assert_eq!(heff_file_name(0, 2, Some("ip")), "HEFF_0h2p_ip");
    }

    #[test]
    fn test_write_read() {
        let dir = scratch_dir("rw");
        let mut f = HeffFile::open(&dir, 1, 1, None).unwrap();
        f.write_block(Arith::Real, 1, 0, &Vec::<f64>::new()).unwrap();
        f.write_block(Arith::Real, 2, 2, &[1.0, -2.0, 3.0, 0.25]).unwrap();
        let z = [Complex64::new(1.0, -1.0)];
        f.write_block(Arith::Complex, 3, 1, &z).unwrap();
        assert!(f.write_block(Arith::Real, 4, 2, &[1.0]).is_err());
        let path = f.path().to_owned();
        f.close().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("1h1p         # sector\n"));
        assert!(text.ends_with("\n"));

        let heff = read_formatted_heff(&path).unwrap();
        assert_eq!(heff.sector, "1h1p");
        assert_eq!(heff.records.len(), 3);
        let empty = heff.record(1).unwrap();
        assert_eq!(empty.dim, 0);
        assert!(empty.data.is_empty());
        let real = heff.record(2).unwrap();
        assert_eq!(real.arith, Arith::Real);
        assert_eq!(real.data[3], Complex64::new(0.25, 0.0));
        assert_eq!(heff.record(3).unwrap().data, z.to_vec());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_formatted_heff() {
        let dir = scratch_dir("sector");
        let blocks = vec![
            vec![],
            vec![Complex64::new(2.0, 0.5)],
            vec![],
            vec![Complex64::new(1.0, 0.0); 4],
        ];
        let path = write_formatted_heff(
            &dir, 0, 1, Some("ea"), Arith::Complex, &[0, 1, 0, 2], &blocks)
            .unwrap();
        assert!(path.ends_with("HEFF_0h1p_ea"));
        let heff = read_formatted_heff(&path).unwrap();
        assert_eq!(heff.sector, "ea");
        let reps: Vec<_> = heff.records.iter().map(|r| r.rep_no).collect();
        assert_eq!(reps, vec![1, 3]);
        assert_eq!(heff.records[0].data, vec![Complex64::new(2.0, 0.5)]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_0h0p() {
        let dir = scratch_dir("vac");
        let path = write_formatted_heff_0h0p(&dir, Arith::Real, -76.25)
            .unwrap();
        let heff = read_formatted_heff(&path).unwrap();
        assert_eq!(heff.sector, "0h0p");
        assert_eq!(heff.records[0].arith, Arith::Real);
        assert_eq!(heff.records[0].data, vec![Complex64::new(-76.25, 0.0)]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bad_files() {
        let dir = scratch_dir("bad");
        let path = dir.join("HEFF_bad");
        fs::write(&path, "1h0p # sector\nquaternion 1 1\n1.0\n").unwrap();
        match read_formatted_heff(&path) {
            Err(Error::UnsupportedKind(_)) => {}
            r => panic!("unexpected: {:?}", r),
        }
        fs::write(&path, "1h0p # sector\n1 1\n1.0\n").unwrap();
        assert!(read_formatted_heff(&path).is_err());
        fs::write(&path, "1h0p # sector\nreal 1 2\n1.0 2.0\n").unwrap();
        assert!(read_formatted_heff(&path).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_huge_record_header() {
        let dir = scratch_dir("huge");
        let path = dir.join("HEFF_huge");
        for header in &["real 1 4294967296", "complex 1 3000000000",
                        "real 1 18446744073709551615"] {
            fs::write(&path, format!("1h0p # sector\n{}\n1.0\n", header))
                .unwrap();
            match read_formatted_heff(&path) {
                Err(Error::Format(_)) => {}
                r => panic!("unexpected for {:?}: {:?}", header, r),
            }
        }
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bad_block_leaves_no_file() {
        let dir = scratch_dir("short");
        let blocks = vec![vec![1.0], vec![1.0, 2.0, 3.0]];
        match write_formatted_heff(&dir, 2, 0, None, Arith::Real,
                                   &[1, 2], &blocks) {
            Err(Error::ShapeMismatch(_)) => {}
            r => panic!("unexpected: {:?}", r),
        }
        assert!(!dir.join(heff_file_name(2, 0, None)).exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
