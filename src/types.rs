use serde::Serialize;
use simple_error::SimpleError;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

///Each word in the lexicon gets assigned an ID integer (its position), carries no further meaning
pub type VocabId = u64;

///Length of a word or signature, in chars. Never narrowed, the length pruning in the
///query matcher relies on exact counts
pub type CharCount = usize;

///The signature of a word: all of its characters sorted in codepoint order.
///Two strings share a signature if and only if they are anagrams of each other.
#[derive(Clone,Debug,PartialEq,Eq,PartialOrd,Ord,Hash,Default,Serialize)]
pub struct Signature(String);

impl Signature {
    ///Wraps a string that is already sorted, callers are responsible for the ordering
    pub(crate) fn from_sorted(sorted: String) -> Self {
        Signature(sorted)
    }

    /// Computes the number of characters in this signature
    pub fn char_count(&self) -> CharCount {
        self.0.chars().count()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Signature {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///Determines the order in which matches are returned
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum OutputOrder {
    /// Buckets in the order their signature was first produced by the substring enumeration
    /// (start offset ascending, then length ascending), lexicon order within a bucket
    Discovery,

    /// Sorted by text
    Alphabetical,

    /// Longest matches first, ties sorted by text
    Length,
}

impl Default for OutputOrder {
    fn default() -> Self {
        OutputOrder::Discovery
    }
}

impl FromStr for OutputOrder {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discovery" => Ok(Self::Discovery),
            "alphabetical" | "alpha" => Ok(Self::Alphabetical),
            "length" => Ok(Self::Length),
            _ => Err(SimpleError::new(format!("Invalid output order: {} (expected discovery, alphabetical or length)", s)))
        }
    }
}

#[derive(Clone,Debug)]
pub struct SearchParameters {
    /// Substrings shorter than this (in chars) are not considered. Defaults to 1, i.e. every proper substring
    pub min_length: CharCount,

    /// Number of matches to return per input (set to 0 for unlimited)
    pub max_matches: usize,

    /// Order of the returned matches
    pub order: OutputOrder,

    /// Use only a single-thread instead of leveraging multiple cores when processing batches
    pub single_thread: bool,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_matches: 0,
            order: OutputOrder::Discovery,
            single_thread: false,
        }
    }
}

impl SearchParameters {
    pub fn with_min_length(mut self, length: CharCount) -> Self {
        self.min_length = length;
        self
    }
    pub fn with_max_matches(mut self, matches: usize) -> Self {
        self.max_matches = matches;
        self
    }
    pub fn with_order(mut self, order: OutputOrder) -> Self {
        self.order = order;
        self
    }
    pub fn with_single_thread(mut self) -> Self {
        self.single_thread = true;
        self
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_order_parse() {
        assert_eq!("alpha".parse::<OutputOrder>().ok(), Some(OutputOrder::Alphabetical));
        assert_eq!("length".parse::<OutputOrder>().ok(), Some(OutputOrder::Length));
        assert!("random".parse::<OutputOrder>().is_err());
    }

    #[test]
    fn signature_char_count() {
        use crate::signature::*;
        assert_eq!("".signature().char_count(), 0);
        assert_eq!("tac".signature().char_count(), 3);
        //counts chars, not bytes
        assert_eq!("ünï".signature().char_count(), 3);
    }

    #[test]
    fn search_parameters_builder() {
        let params = SearchParameters::default().with_min_length(2).with_max_matches(5).with_single_thread();
        assert_eq!(params.min_length, 2);
        assert_eq!(params.max_matches, 5);
        assert_eq!(params.order, OutputOrder::Discovery);
        assert!(params.single_thread);
    }
}
