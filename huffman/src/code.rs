use arrayvec::ArrayVec;
use log::trace;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::frequency::Frequencies;
use crate::tree::Node;
use crate::tree::Tree;

/// Longest possible code, the depth of a maximally skewed tree over all 256
/// symbols.
pub const MAX_CODE_BITS: u32 = 255;

/// Returned when a byte of the input has no code in the table.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
#[error("byte {0:#04x} has no code in the table")]
pub struct MissingSymbol(pub u8);

#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
#[error("invalid code string")]
pub struct InvalidCode;

/// Bit string describing a root-to-leaf path, `0` for left, `1` for right.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Code {
    // MSB-first, unused bits are zero.
    bits: [u8; 32],
    num_bits: u8,
}

impl Code {
    pub fn empty() -> Code {
        Code {
            bits: [0; 32],
            num_bits: 0,
        }
    }
    /// Returns the code extended by one bit.
    pub fn push(self, bit: bool) -> Code {
        assert!(self.num_bits() < MAX_CODE_BITS, "code too long");
        let mut result = self;
        let idx = self.num_bits as usize;
        if bit {
            result.bits[idx / 8] |= 1 << (7 - idx % 8);
        }
        result.num_bits += 1;
        result
    }
    pub fn num_bits(self) -> u32 {
        self.num_bits as u32
    }
    pub fn is_empty(self) -> bool {
        self.num_bits == 0
    }
    pub fn bit(self, idx: u32) -> bool {
        assert!(idx < self.num_bits());
        let idx = idx as usize;
        (self.bits[idx / 8] >> (7 - idx % 8)) & 1 != 0
    }
    pub fn bits(self) -> Bits {
        Bits {
            code: self,
            next: 0,
        }
    }
    pub fn is_prefix_of(self, other: Code) -> bool {
        self.num_bits <= other.num_bits
            && (0..self.num_bits()).all(|i| self.bit(i) == other.bit(i))
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for bit in self.bits() {
            f.write_char(if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Code {
    type Err = InvalidCode;
    fn from_str(s: &str) -> Result<Code, InvalidCode> {
        if s.len() > MAX_CODE_BITS as usize {
            return Err(InvalidCode);
        }
        let mut result = Code::empty();
        for c in s.chars() {
            result = match c {
                '0' => result.push(false),
                '1' => result.push(true),
                _ => return Err(InvalidCode),
            };
        }
        Ok(result)
    }
}

/// Iterator over the bits of a code, first bit of the path first.
pub struct Bits {
    code: Code,
    next: u32,
}

impl Iterator for Bits {
    type Item = bool;
    fn next(&mut self) -> Option<bool> {
        if self.next == self.code.num_bits() {
            return None;
        }
        let result = self.code.bit(self.next);
        self.next += 1;
        Some(result)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl ExactSizeIterator for Bits {
    fn len(&self) -> usize {
        (self.code.num_bits() - self.next) as usize
    }
}

/// Mapping from symbols to their codes.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    pub fn new() -> CodeTable {
        CodeTable {
            codes: BTreeMap::new(),
        }
    }
    /// Derives the code of each leaf from its position in the tree.
    ///
    /// If the root is a leaf, its symbol gets the code `0`.
    pub fn from_tree(tree: &Tree) -> CodeTable {
        let mut result = CodeTable::new();
        if let Node::Leaf { symbol, .. } = *tree.root() {
            result.insert(symbol, Code::empty().push(false));
            return result;
        }

        // Depth-first, left children first. At most one pending right child
        // per level plus the current node.
        let mut stack: ArrayVec<[(&Node, Code); 256]> = ArrayVec::new();
        stack.push((tree.root(), Code::empty()));
        while let Some((node, code)) = stack.pop() {
            match *node {
                Node::Leaf { symbol, .. } => result.insert(symbol, code),
                Node::Internal { ref left, ref right, .. } => {
                    stack.push((&**right, code.push(true)));
                    stack.push((&**left, code.push(false)));
                }
            }
        }
        result
    }
    fn insert(&mut self, symbol: u8, code: Code) {
        trace!("code {:#04x}: {}", symbol, code);
        self.codes.insert(symbol, code);
    }
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }
    pub fn len(&self) -> usize {
        self.codes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
    /// Iterates over all symbols and their codes in ascending symbol order.
    pub fn iter(&self) -> Iter {
        Iter {
            iter: self.codes.iter(),
        }
    }
    pub fn is_prefix_free(&self) -> bool {
        self.codes.iter().all(|(&a, &ca)| {
            self.codes.iter().all(|(&b, &cb)| a == b || !ca.is_prefix_of(cb))
        })
    }
    /// Number of bits `input` occupies once encoded.
    pub fn bit_len(&self, input: &[u8]) -> Result<u64, MissingSymbol> {
        let mut result: u64 = 0;
        for &byte in input {
            let code = self.get(byte).ok_or(MissingSymbol(byte))?;
            result += code.num_bits() as u64;
        }
        Ok(result)
    }
    /// Number of bytes `input` occupies once packed.
    pub fn packed_len(&self, input: &[u8]) -> Result<usize, MissingSymbol> {
        Ok(((self.bit_len(input)? + 7) / 8) as usize)
    }
    /// Number of bits an input with these frequencies occupies once encoded.
    pub fn weighted_bit_len(&self, frequencies: &Frequencies) -> Result<u64, MissingSymbol> {
        let mut result: u64 = 0;
        for (symbol, count) in frequencies {
            let code = self.get(symbol).ok_or(MissingSymbol(symbol))?;
            result = result.saturating_add(count.saturating_mul(code.num_bits() as u64));
        }
        Ok(result)
    }
}

impl fmt::Debug for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.codes.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a CodeTable {
    type Item = (u8, &'a Code);
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

pub struct Iter<'a> {
    iter: btree_map::Iter<'a, u8, Code>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (u8, &'a Code);
    fn next(&mut self) -> Option<(u8, &'a Code)> {
        self.iter.next().map(|(&s, c)| (s, c))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

#[cfg(test)]
mod test {
    use super::Code;
    use super::CodeTable;
    use super::InvalidCode;
    use super::MissingSymbol;
    use crate::frequency::Frequencies;
    use crate::tree::Tree;

    fn table(input: &[u8]) -> CodeTable {
        CodeTable::from_tree(&Tree::from_frequencies(&Frequencies::count(input)).unwrap())
    }

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    #[test]
    fn code_display() {
        let c = Code::empty().push(true).push(false).push(true);
        assert_eq!(c.to_string(), "101");
        assert_eq!(format!("{:?}", Code::empty()), "");
    }

    #[test]
    fn code_parse() {
        assert_eq!(code("0110").bits().collect::<Vec<_>>(), [false, true, true, false]);
        assert_eq!("012".parse::<Code>(), Err(InvalidCode));
        assert_eq!("".parse::<Code>(), Ok(Code::empty()));
    }

    #[test]
    fn code_max_len() {
        let long = "1".repeat(255);
        assert_eq!(code(&long).num_bits(), 255);
        assert_eq!(code(&long).to_string(), long);
        assert_eq!("0".repeat(256).parse::<Code>(), Err(InvalidCode));
    }

    #[test]
    fn prefix() {
        assert!(code("10").is_prefix_of(code("101")));
        assert!(code("10").is_prefix_of(code("10")));
        assert!(!code("11").is_prefix_of(code("101")));
        assert!(!code("101").is_prefix_of(code("10")));
    }

    #[test]
    fn simple() {
        let t = table(b"AAABBC");
        assert_eq!(t.get(b'A'), Some(&code("0")));
        assert_eq!(t.get(b'C'), Some(&code("10")));
        assert_eq!(t.get(b'B'), Some(&code("11")));
        assert_eq!(t.len(), 3);
        assert_eq!(t.bit_len(b"AAABBC"), Ok(9));
        assert_eq!(t.packed_len(b"AAABBC"), Ok(2));
        assert_eq!(t.weighted_bit_len(&Frequencies::count(b"AAABBC")), Ok(9));
    }

    #[test]
    fn single_symbol() {
        let t = table(&[0x41; 1000]);
        assert_eq!(t.iter().collect::<Vec<_>>(), [(0x41, &code("0"))]);
        assert_eq!(t.packed_len(&[0x41; 1000]), Ok(125));
    }

    #[test]
    fn missing_symbol() {
        let t = table(b"AB");
        assert_eq!(t.bit_len(b"ABC"), Err(MissingSymbol(b'C')));
        assert_eq!(CodeTable::new().packed_len(b"x"), Err(MissingSymbol(b'x')));
        assert_eq!(CodeTable::new().packed_len(b""), Ok(0));
    }

    #[test]
    fn skewed() {
        // Fibonacci weights produce the deepest possible tree.
        let mut counts = [0; 256];
        let (mut a, mut b) = (1u64, 1u64);
        for c in counts.iter_mut().take(40) {
            *c = a;
            let next = a + b;
            a = b;
            b = next;
        }
        let tree = Tree::from_frequencies(&Frequencies::from(counts)).unwrap();
        let t = CodeTable::from_tree(&tree);
        assert_eq!(tree.depth(), 39);
        assert_eq!(t.iter().map(|(_, c)| c.num_bits()).max(), Some(39));
        assert!(t.is_prefix_free());
    }

    #[test]
    fn all_symbols() {
        let input: Vec<u8> = (0..=255).collect();
        let t = table(&input);
        assert_eq!(t.len(), 256);
        assert!(t.iter().all(|(_, c)| c.num_bits() == 8));
        assert!(t.is_prefix_free());
    }

    quickcheck! {
        fn prefix_free(input: Vec<u8>) -> bool {
            input.is_empty() || table(&input).is_prefix_free()
        }

        fn every_symbol_has_code(input: Vec<u8>) -> bool {
            if input.is_empty() {
                return true;
            }
            let t = table(&input);
            input.iter().all(|&b| t.get(b).map(|c| !c.is_empty()).unwrap_or(false))
                && t.len() == Frequencies::count(&input).len()
        }

        fn deterministic(input: Vec<u8>) -> bool {
            input.is_empty() || table(&input) == table(&input)
        }

        fn code_string_roundtrip(bits: Vec<bool>) -> bool {
            let bits: Vec<bool> = bits.into_iter().take(255).collect();
            let s: String = bits.iter().map(|&b| if b { '1' } else { '0' }).collect();
            let c: Code = s.parse().unwrap();
            c.to_string() == s && c.bits().collect::<Vec<_>>() == bits
        }
    }
}
