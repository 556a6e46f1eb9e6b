use std::fmt;
use std::iter;
use std::ops;
use std::slice;

pub const NUM_SYMBOLS: usize = 256;

/// Occurrence count of every byte value in some input.
///
/// Symbols with a count of zero are considered absent.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Frequencies {
    counts: [u64; NUM_SYMBOLS],
}

impl Frequencies {
    pub fn new() -> Frequencies {
        Frequencies {
            counts: [0; NUM_SYMBOLS],
        }
    }
    pub fn count(input: &[u8]) -> Frequencies {
        let mut result = Frequencies::new();
        result.add(input);
        result
    }
    pub fn add(&mut self, input: &[u8]) {
        for &byte in input {
            self.counts[byte as usize] += 1;
        }
    }
    /// Adds the counts of `other` to `self`.
    ///
    /// Counting two halves of an input and merging them gives the same result
    /// as counting the whole input.
    pub fn merge(&mut self, other: &Frequencies) {
        for (count, &o) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count = count.saturating_add(o);
        }
    }
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }
    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c != 0).count()
    }
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0, |s, &c| s.saturating_add(c))
    }
    pub fn iter(&self) -> Iter {
        Iter {
            iter: (0..=u8::MAX).zip(self.counts.iter()),
        }
    }
}

impl Default for Frequencies {
    fn default() -> Frequencies {
        Frequencies::new()
    }
}

impl From<[u64; NUM_SYMBOLS]> for Frequencies {
    fn from(counts: [u64; NUM_SYMBOLS]) -> Frequencies {
        Frequencies { counts: counts }
    }
}

impl fmt::Debug for Frequencies {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Frequencies {
    type Item = (u8, u64);
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over the present symbols and their counts, in ascending symbol
/// order.
pub struct Iter<'a> {
    iter: iter::Zip<ops::RangeInclusive<u8>, slice::Iter<'a, u64>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (u8, u64);
    fn next(&mut self) -> Option<(u8, u64)> {
        self.iter.by_ref().map(|(s, &c)| (s, c)).find(|&(_, c)| c != 0)
    }
}
