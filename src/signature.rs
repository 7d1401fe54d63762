use crate::types::*;

///Trait for objects that can be given a signature (string-like)
pub trait Signable {
    fn signature(&self) -> Signature;
}

impl Signable for str {
    ///Compute the signature for a given string: its characters in sorted order
    fn signature(&self) -> Signature {
        let mut chars: Vec<char> = self.chars().collect();
        chars.sort_unstable();
        Signature::from_sorted(chars.into_iter().collect())
    }
}

impl Signable for String {
    fn signature(&self) -> Signature {
        self.as_str().signature()
    }
}

/// Builds a signature one character at a time.
///
/// Each `push()` inserts the character at its sorted position, so extending a
/// substring by one character costs a single insertion rather than a full re-sort.
///
/// # Examples
///
/// ```
/// # use anajumble::*;
/// let mut builder = SignatureBuilder::new();
/// for c in "cat".chars() {
///     builder.push(c);
/// }
/// assert_eq!(builder.signature(), "act".signature());
/// ```
#[derive(Clone,Debug,Default)]
pub struct SignatureBuilder {
    chars: Vec<char>,
}

impl SignatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chars: Vec::with_capacity(capacity)
        }
    }

    /// Insert a character, keeping the characters sorted
    pub fn push(&mut self, c: char) {
        //insert after any equal characters, so runs of the same character only ever append
        let pos = self.chars.partition_point(|x| *x <= c);
        self.chars.insert(pos, c);
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    /// Snapshot of the signature for everything pushed so far
    pub fn signature(&self) -> Signature {
        Signature::from_sorted(self.chars.iter().collect())
    }
}
