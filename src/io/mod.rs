//! Input and output utility.
use std::io::{self, Write};
use std::error::Error;
use std::fs::File;
use std::path::{self, Path};
use flate2;
use xz2;

pub mod dgfile;
pub mod heff;

/// Helper function for creating `io::Error` with
/// `io::ErrorKind::InvalidData`.
pub fn invalid_data<E: Into<Box<dyn Error + Send + Sync>>>(error: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, error)
}

/// Works just like Python's `os.path.splitext`.  Note that the returned
/// extension includes the dot.  If there is no extension, returns an empty
/// string as the extension.  Only works on UTF-8 strings due to limitations
/// of the `std::path::Path` API.
pub fn split_extension(path: &Path) -> io::Result<(&str, &str)> {
    let path = path.to_str()
        .ok_or_else(|| invalid_data("path is not UTF-8"))?;
    match path.rfind('.') {
        None => Ok((path, "")),
        Some(i) => {
            let ext = &path[i ..];
            if ext.chars().any(|c| path::is_separator(c)) {
                Ok((path, ""))
            } else {
                Ok((&path[.. i], ext))
            }
        }
    }
}

fn compression_of(path: &Path) -> io::Result<&'static str> {
    let (_, ext) = split_extension(path)?;
    Ok(match ext {
        ".gz" => ".gz",
        ".xz" => ".xz",
        ext if ext.ends_with("z") => return Err(invalid_data(
            format!("unrecognized compression format: {}", ext),
        )),
        _ => "",
    })
}

/// Open a compressed file and decode based on the file extension.
/// If the extension does not end in "z", the file is read as-is.
pub fn open_compressed(path: &Path) -> io::Result<Box<dyn io::Read>> {
    let kind = compression_of(path)?;
    let file = File::open(path)?;
    Ok(match kind {
        ".gz" => Box::new(flate2::read::GzDecoder::new(file)),
        ".xz" => Box::new(xz2::read::XzDecoder::new(file)),
        _ => Box::new(file),
    })
}

/// Writer counterpart of `open_compressed`.  Call `finish` so that
/// trailing compression errors are not lost.
pub enum CompressedWriter {
    Plain(io::BufWriter<File>),
    Gz(flate2::write::GzEncoder<File>),
    Xz(xz2::write::XzEncoder<File>),
}

impl CompressedWriter {
    pub fn finish(self) -> io::Result<()> {
        match self {
            CompressedWriter::Plain(mut w) => w.flush(),
            CompressedWriter::Gz(w) => w.finish().map(|_| ()),
            CompressedWriter::Xz(w) => w.finish().map(|_| ()),
        }
    }
}

impl io::Write for CompressedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match *self {
            CompressedWriter::Plain(ref mut w) => w.write(buf),
            CompressedWriter::Gz(ref mut w) => w.write(buf),
            CompressedWriter::Xz(ref mut w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match *self {
            CompressedWriter::Plain(ref mut w) => w.flush(),
            CompressedWriter::Gz(ref mut w) => w.flush(),
            CompressedWriter::Xz(ref mut w) => w.flush(),
        }
    }
}

/// Create (or truncate) a file, compressing based on the file extension.
pub fn create_compressed(path: &Path) -> io::Result<CompressedWriter> {
    let kind = compression_of(path)?;
    let file = File::create(path)?;
    Ok(match kind {
        ".gz" => CompressedWriter::Gz(flate2::write::GzEncoder::new(
            file, flate2::Compression::default())),
        ".xz" => CompressedWriter::Xz(xz2::write::XzEncoder::new(file, 6)),
        _ => CompressedWriter::Plain(io::BufWriter::new(file)),
    })
}
