//! Sequential file transports, matching `MEL::FileWrite`/`FileRead`
//! semantics: the same byte stream a direct transport would produce, just
//! backed by a file instead of a socket.

use super::{SinkTransport, SourceTransport};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

pub struct FileWrite {
    writer: BufWriter<File>,
}

impl FileWrite {
    pub fn create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!("opened {} for writing", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Flush any buffered bytes to disk. Called automatically on drop, but
    /// exposed so callers can observe I/O errors instead of silently
    /// swallowing them.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl SourceTransport for FileWrite {
    fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }
}

pub struct FileRead {
    reader: BufReader<File>,
}

impl FileRead {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("opened {} for reading", path.display());
        Ok(Self {
            reader: BufReader::new(file),
        })
    }
}

impl SinkTransport for FileRead {
    fn read_bytes(&mut self, buf: &mut [u8]) -> anyhow::Result<()> {
        self.reader.read_exact(buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn write_then_read_round_trips() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let mut w = FileWrite::create(tmp.path()).unwrap();
            w.write_bytes(&[9, 8, 7]).unwrap();
            w.flush().unwrap();
        }
        let mut r = FileRead::open(tmp.path()).unwrap();
        let mut buf = [0u8; 3];
        r.read_bytes(&mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7]);
    }
}
