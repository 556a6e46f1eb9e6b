use huffcode_huffman as huffman;
use huffman::CodeTable;
use huffman::Encoded;
use itertools::Itertools;
use log::debug;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub enum Error {
    Io(#[from] io::Error),
    Huffman(#[from] huffman::Error),
}

/// A byte as shown in code tables.
///
/// Printable ASCII characters are shown as they are, everything else in
/// hexadecimal.
#[derive(Clone, Copy)]
pub struct Symbol(pub u8);

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Symbol(inner) = *self;
        match inner {
            0x21..=0x7e => write!(f, "{}", inner as char),
            _ => write!(f, "0x{:02x}", inner),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Default destination for the packed output of `input`.
///
/// `text.txt` becomes `text_coded.bin`.
pub fn output_path(input: &Path) -> PathBuf {
    let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push("_coded.bin");
    input.with_file_name(name)
}

pub fn write_code_table<W: io::Write>(mut w: W, codes: &CodeTable) -> io::Result<()> {
    writeln!(w, "Huffman codes:")?;
    for (symbol, code) in codes {
        writeln!(w, "{}: {}", Symbol(symbol), code)?;
    }
    Ok(())
}

/// Encodes the file `input` and writes the packed bytes to `output`.
///
/// Returns the encoding result and the time spent encoding, not counting
/// file I/O.
pub fn encode_file(input: &Path, output: &Path) -> Result<(Encoded, Duration), Error> {
    let data = fs::read(input)?;
    let start = Instant::now();
    let encoded = huffman::encode(&data)?;
    let elapsed = start.elapsed();
    debug!(
        "{}: {} bytes, alphabet {}",
        input.display(),
        data.len(),
        encoded.codes.iter().map(|(s, _)| Symbol(s)).join(" ")
    );
    fs::write(output, &encoded.packed)?;
    Ok((encoded, elapsed))
}

#[cfg(test)]
mod test {
    use super::encode_file;
    use super::output_path;
    use super::write_code_table;
    use super::Symbol;
    use huffcode_huffman::encode;
    use std::fs;
    use std::path::Path;
    use std::path::PathBuf;

    #[test]
    fn output_paths() {
        assert_eq!(output_path(Path::new("text.txt")), PathBuf::from("text_coded.bin"));
        assert_eq!(output_path(Path::new("dir/notes")), PathBuf::from("dir/notes_coded.bin"));
        assert_eq!(output_path(Path::new("a.tar.gz")), PathBuf::from("a.tar_coded.bin"));
    }

    #[test]
    fn symbols() {
        assert_eq!(Symbol(b'A').to_string(), "A");
        assert_eq!(Symbol(b' ').to_string(), "0x20");
        assert_eq!(Symbol(b'\n').to_string(), "0x0a");
        assert_eq!(Symbol(0xff).to_string(), "0xff");
    }

    #[test]
    fn code_table() {
        let mut out = Vec::new();
        write_code_table(&mut out, &encode(b"AAABBC").unwrap().codes).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Huffman codes:\nA: 0\nB: 11\nC: 10\n");
    }

    #[test]
    fn file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        fs::write(&input, b"AAABBC").unwrap();
        let output = output_path(&input);
        let (encoded, _) = encode_file(&input, &output).unwrap();
        assert_eq!(encoded.bit_len, 9);
        assert_eq!(fs::read(&output).unwrap(), [0x1f, 0x00]);
    }

    #[test]
    fn empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        fs::write(&input, b"").unwrap();
        let output = dir.path().join("out.bin");
        let (encoded, _) = encode_file(&input, &output).unwrap();
        assert!(encoded.codes.is_empty());
        assert!(fs::read(&output).unwrap().is_empty());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.txt");
        assert!(encode_file(&input, &dir.path().join("out.bin")).is_err());
    }
}
