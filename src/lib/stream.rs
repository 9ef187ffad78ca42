//! Byte-oriented input stream over plain and gzip-compressed read files.
//!
//! Every format parser consumes its input one byte at a time through
//! [`ByteStream`], which offers a guaranteed single-slot pushback so parsers
//! can peek at record delimiters. Whether a file is decompressed is decided
//! once at open time; the hot path is a single match on a two-variant enum.
//!
//! A file is treated as potentially compressed when its name ends in `.gz` or
//! `.Z`, or when the path refers to a FIFO (a pipe's name carries no useful
//! suffix). Because data arriving on a pipe may well be uncompressed, the
//! first two bytes are sniffed for the gzip magic and the stream silently
//! degrades to plain passthrough when they don't match.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

/// Buffer size for file reads.
const FILE_BUF_SIZE: usize = 64 * 1024;

/// First two bytes of every gzip member.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The sniffed header bytes glued back in front of the file.
type SniffedFile = io::Chain<Cursor<Vec<u8>>, File>;

enum StreamKind {
    Plain(BufReader<SniffedFile>),
    Gzip(BufReader<MultiGzDecoder<SniffedFile>>),
}

impl StreamKind {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        match self {
            StreamKind::Plain(reader) => read_one(reader),
            StreamKind::Gzip(reader) => read_one(reader),
        }
    }
}

fn read_one<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    let buf = reader.fill_buf()?;
    if buf.is_empty() {
        return Ok(None);
    }
    let byte = buf[0];
    reader.consume(1);
    Ok(Some(byte))
}

/// A byte stream with one-slot pushback over a plain or gzip file.
///
/// Not thread-safe; callers hold the owning source's mutex for the duration
/// of every call.
pub struct ByteStream {
    inner: StreamKind,
    pushback: Option<u8>,
    hit_eof: bool,
}

impl ByteStream {
    /// Opens `path`, deciding the decompression mode as described in the
    /// module docs.
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let inner = if looks_compressed(path) {
            let mut magic = [0u8; 2];
            let n = read_upto(&mut file, &mut magic)?;
            let sniffed = Cursor::new(magic[..n].to_vec()).chain(file);
            if n == 2 && magic == GZIP_MAGIC {
                StreamKind::Gzip(BufReader::with_capacity(
                    FILE_BUF_SIZE,
                    MultiGzDecoder::new(sniffed),
                ))
            } else {
                StreamKind::Plain(BufReader::with_capacity(FILE_BUF_SIZE, sniffed))
            }
        } else {
            let sniffed = Cursor::new(Vec::new()).chain(file);
            StreamKind::Plain(BufReader::with_capacity(FILE_BUF_SIZE, sniffed))
        };
        Ok(Self { inner, pushback: None, hit_eof: false })
    }

    /// Returns the next byte, or `None` at end of stream.
    pub fn get(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushback.take() {
            return Ok(Some(byte));
        }
        match self.inner.next_byte()? {
            Some(byte) => Ok(Some(byte)),
            None => {
                self.hit_eof = true;
                Ok(None)
            }
        }
    }

    /// Pushes one byte back; the next [`ByteStream::get`] returns it.
    ///
    /// Only a single slot is available; pushing while a byte is already
    /// pending is a logic error.
    pub fn unget(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none(), "pushback slot already occupied");
        self.pushback = Some(byte);
    }

    /// True once a read has returned end-of-stream and no pushback pends.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.pushback.is_none() && self.hit_eof
    }
}

/// Reads up to `buf.len()` bytes, short only at end of file.
fn read_upto(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Whether the path should be routed through gzip sniffing.
fn looks_compressed(path: &Path) -> bool {
    if is_fifo(path) {
        return true;
    }
    matches!(path.extension().and_then(|e| e.to_str()), Some("gz") | Some("Z"))
}

#[cfg(unix)]
fn is_fifo(path: &Path) -> bool {
    use std::os::unix::fs::FileTypeExt;
    std::fs::metadata(path).map(|m| m.file_type().is_fifo()).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_fifo(_path: &Path) -> bool {
    false
}
