//! Huffman coding of byte strings.
//!
//! The input is counted, a Huffman tree is built from the symbol frequencies,
//! the codes are read off the tree and the input is packed into bytes using
//! these codes:
//!
//! ```
//! use huffcode_huffman::CodeTable;
//! use huffcode_huffman::Frequencies;
//! use huffcode_huffman::Tree;
//!
//! let input = b"AAABBC";
//! let tree = Tree::from_frequencies(&Frequencies::count(input)).unwrap();
//! let codes = CodeTable::from_tree(&tree);
//! assert_eq!(codes.get(b'A').unwrap().to_string(), "0");
//! assert_eq!(huffcode_huffman::pack(input, &codes).unwrap(), [0x1f, 0x00]);
//! ```
//!
//! The packed output carries neither the code table nor its own bit length.

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

pub mod code;
pub mod frequency;
pub mod pack;
pub mod tree;

pub use code::Code;
pub use code::CodeTable;
pub use code::MissingSymbol;
pub use frequency::Frequencies;
pub use pack::pack;
pub use pack::pack_into;
pub use pack::PackError;
pub use tree::EmptyAlphabet;
pub use tree::Node;
pub use tree::Tree;

use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error(transparent)]
pub enum Error {
    EmptyAlphabet(#[from] EmptyAlphabet),
    MissingSymbol(#[from] MissingSymbol),
}

/// Result of encoding an input with its own Huffman code.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Encoded {
    pub codes: CodeTable,
    pub packed: Vec<u8>,
    /// Number of meaningful bits in `packed`, the rest is padding.
    pub bit_len: u64,
}

/// Counts `input`, builds its Huffman code and packs `input` with it.
///
/// An empty input yields an empty code table and an empty output.
pub fn encode(input: &[u8]) -> Result<Encoded, Error> {
    let frequencies = Frequencies::count(input);
    if frequencies.is_empty() {
        return Ok(Encoded::default());
    }
    let codes = CodeTable::from_tree(&Tree::from_frequencies(&frequencies)?);
    let bit_len = codes.bit_len(input)?;
    let packed = pack(input, &codes)?;
    Ok(Encoded {
        codes: codes,
        packed: packed,
        bit_len: bit_len,
    })
}
