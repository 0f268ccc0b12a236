// src/packages/cpio.rs

//! Reader for the cpio "new ASCII" stream produced by rpm2cpio

use std::io::{self, Read};

/// CPIO New ASCII Format (newc) header size
const HEADER_SIZE: usize = 110;
/// Magic string for newc format
const MAGIC_NEWC: &[u8] = b"070701";
/// Magic string for CRC format
const MAGIC_CRC: &[u8] = b"070702";
/// Name of the record that terminates an archive
const TRAILER: &str = "TRAILER!!!";

const S_IFMT: u32 = 0o170000;
const S_IFREG: u32 = 0o100000;

/// Extracted CPIO entry metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpioEntry {
    pub name: String,
    pub size: u64,
    pub mode: u32,
    pub mtime: u64,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u32,
}

impl CpioEntry {
    /// Check if this member is a regular file
    pub fn is_regular_file(&self) -> bool {
        (self.mode & S_IFMT) == S_IFREG
    }
}

/// A reader for CPIO (New ASCII) archives
pub struct CpioReader<R: Read> {
    reader: R,
    finished: bool,
    /// Bytes left in the stream, when its length is known up front
    remaining: Option<u64>,
}

impl<R: Read> CpioReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            finished: false,
            remaining: None,
        }
    }

    /// Reader over a stream of exactly `len` bytes
    ///
    /// Name and body sizes larger than what is left are rejected before
    /// any buffer is allocated for them.
    pub fn with_len(reader: R, len: u64) -> Self {
        Self {
            remaining: Some(len),
            ..Self::new(reader)
        }
    }

    /// Read the next entry from the CPIO archive
    ///
    /// Returns `Ok(None)` at the `TRAILER!!!` record or when the stream ends
    /// exactly on a header boundary. A stream that stops part-way through a
    /// header, name or body is an `UnexpectedEof` error.
    pub fn next_entry(&mut self) -> io::Result<Option<(CpioEntry, Vec<u8>)>> {
        if self.finished {
            return Ok(None);
        }

        let mut header_buf = [0u8; HEADER_SIZE];
        if !self.read_header(&mut header_buf)? {
            self.finished = true;
            return Ok(None);
        }

        let magic = &header_buf[0..6];
        if magic != MAGIC_NEWC && magic != MAGIC_CRC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid CPIO magic: {:?}", String::from_utf8_lossy(magic)),
            ));
        }

        let parse_hex = |start: usize, len: usize| -> io::Result<u32> {
            let s = std::str::from_utf8(&header_buf[start..start + len])
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            u32::from_str_radix(s, 16).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        };

        let mode = parse_hex(14, 8)?;
        let uid = parse_hex(22, 8)?;
        let gid = parse_hex(30, 8)?;
        let nlink = parse_hex(38, 8)?;
        let mtime = parse_hex(46, 8)? as u64;
        let filesize = parse_hex(54, 8)? as u64;
        let namesize = parse_hex(94, 8)? as usize;
        self.consume(HEADER_SIZE as u64, "header")?;

        // Name includes its trailing NUL
        self.consume(namesize as u64, "name")?;
        let mut name_buf = vec![0u8; namesize];
        self.reader.read_exact(&mut name_buf)?;
        if name_buf.last() == Some(&0) {
            name_buf.pop();
        }
        let name = String::from_utf8_lossy(&name_buf).to_string();

        self.skip_padding(HEADER_SIZE + namesize)?;

        if name == TRAILER {
            self.finished = true;
            return Ok(None);
        }

        self.consume(filesize, "body")?;
        let mut content = vec![0u8; filesize as usize];
        self.reader.read_exact(&mut content)?;
        self.skip_padding(filesize as usize)?;

        Ok(Some((
            CpioEntry {
                name,
                size: filesize,
                mode,
                mtime,
                uid,
                gid,
                nlink,
            },
            content,
        )))
    }

    /// Fill the header buffer; `false` means a clean end of stream
    fn read_header(&mut self, buf: &mut [u8]) -> io::Result<bool> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(false),
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("truncated CPIO header ({} of {} bytes)", filled, buf.len()),
                    ));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }

    /// Account for `size` bytes about to be read from a length-bounded stream
    fn consume(&mut self, size: u64, what: &str) -> io::Result<()> {
        let Some(remaining) = self.remaining else {
            return Ok(());
        };
        if size > remaining {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("CPIO {} size {} exceeds the {} bytes left in the archive", what, size, remaining),
            ));
        }
        self.remaining = Some(remaining - size);
        Ok(())
    }

    /// Skip padding so the next record starts on a 4-byte boundary
    fn skip_padding(&mut self, consumed: usize) -> io::Result<()> {
        let pad = (4 - (consumed % 4)) % 4;
        if pad > 0 {
            self.consume(pad as u64, "padding")?;
            let mut skip = [0u8; 3];
            self.reader.read_exact(&mut skip[..pad])?;
        }
        Ok(())
    }
}

impl<R: Read> Iterator for CpioReader<R> {
    type Item = io::Result<(CpioEntry, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
