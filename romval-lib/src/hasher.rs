use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use romval_core::HashKind;
use sha1::Digest;

/// Files strictly larger than this are treated as large.
pub const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

const LARGE_CHUNK_SIZE: usize = 64 * 1024; // 64 KB
const SMALL_CHUNK_SIZE: usize = 8 * 1024; // 8 KB

/// Read size used when streaming a file of `file_size` bytes.
pub fn chunk_size(file_size: u64) -> usize {
    if file_size > LARGE_FILE_THRESHOLD {
        LARGE_CHUNK_SIZE
    } else {
        SMALL_CHUNK_SIZE
    }
}

enum Digester {
    Sha1(sha1::Sha1),
    Md5(md5::Context),
    Crc32(crc32fast::Hasher),
}

impl Digester {
    fn new(kind: HashKind) -> Self {
        match kind {
            HashKind::Sha1 => Digester::Sha1(sha1::Sha1::new()),
            HashKind::Md5 => Digester::Md5(md5::Context::new()),
            HashKind::Crc32 => Digester::Crc32(crc32fast::Hasher::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Digester::Sha1(h) => h.update(data),
            Digester::Md5(h) => h.consume(data),
            Digester::Crc32(h) => h.update(data),
        }
    }

    fn finish(self) -> String {
        match self {
            Digester::Sha1(h) => format!("{:x}", h.finalize()),
            Digester::Md5(h) => format!("{:x}", h.compute()),
            Digester::Crc32(h) => format!("{:08x}", h.finalize()),
        }
    }
}

/// Stream `reader` to the end and return its lowercase hex digest.
pub fn hash_reader<R: Read>(reader: &mut R, kind: HashKind, chunk: usize) -> io::Result<String> {
    let mut digester = Digester::new(kind);
    let mut buf = vec![0u8; chunk.max(1)];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        digester.update(&buf[..n]);
    }

    Ok(digester.finish())
}

/// Hash a file whose size is already known.
pub fn hash_file_sized(path: &Path, kind: HashKind, file_size: u64) -> io::Result<String> {
    let mut file = File::open(path)?;
    hash_reader(&mut file, kind, chunk_size(file_size))
}

/// Hash a file, picking the read size from its length.
pub fn hash_file(path: &Path, kind: HashKind) -> io::Result<String> {
    let size = std::fs::metadata(path)?.len();
    hash_file_sized(path, kind, size)
}

#[cfg(test)]
#[path = "tests/hasher_tests.rs"]
mod tests;
