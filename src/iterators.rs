use std::io::{self, BufRead};

use crate::types::*;
use crate::signature::*;

///////////////////////////////////////////////////////////////////////////////////////

/// A contiguous substring of a query, with its signature.
/// Offsets are in chars, `end` is exclusive.
#[derive(Clone,Debug,PartialEq)]
pub struct SubstringSignature {
    pub signature: Signature,
    pub begin: usize,
    pub end: usize,
}

impl SubstringSignature {
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// Iterates over all proper contiguous substrings of a text (so never the text
/// itself), yielding the signature of each.
///
/// The iterator yields substrings ordered by start offset, then by length.
/// Signatures are built incrementally: for each start offset the substring is
/// extended one character at a time.
///
/// So given "abc" it will yield the signatures of a, ab, b, bc, c
pub struct SubstringIterator {
    chars: Vec<char>,
    min_length: usize,
    max_length: usize,
    begin: usize,
    end: usize,
    builder: SignatureBuilder,
}

impl SubstringIterator {
    pub fn new(text: &str) -> SubstringIterator {
        Self::with_bounds(text, 1, None)
    }

    /// Only yield substrings with a length (in chars) between `min_length` and `max_length`
    /// (inclusive). The upper bound is always capped to exclude the full text.
    pub fn with_bounds(text: &str, min_length: usize, max_length: Option<usize>) -> SubstringIterator {
        let chars: Vec<char> = text.chars().collect();
        let proper_max = chars.len().saturating_sub(1);
        let max_length = match max_length {
            Some(max_length) if max_length < proper_max => max_length,
            _ => proper_max
        };
        SubstringIterator {
            builder: SignatureBuilder::with_capacity(max_length),
            chars,
            min_length: min_length.max(1),
            max_length,
            begin: 0,
            end: 0,
        }
    }
}

impl Iterator for SubstringIterator {
    type Item = SubstringSignature;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            //remaining start offsets can not yield anything long enough
            if self.begin + self.min_length > self.chars.len() || self.max_length < self.min_length {
                return None;
            }
            if self.end == self.chars.len() || self.end - self.begin >= self.max_length {
                //move on to the next start offset
                self.begin += 1;
                self.end = self.begin;
                self.builder.clear();
                continue;
            }
            self.builder.push(self.chars[self.end]);
            self.end += 1;
            if self.end - self.begin >= self.min_length {
                return Some(SubstringSignature {
                    signature: self.builder.signature(),
                    begin: self.begin,
                    end: self.end,
                });
            }
        }
    }
}


///////////////////////////////////////////////////////////////////////////////////////

/// Reads non-empty lines from a buffered reader in batches of at most `batchsize` lines.
/// Lines are only read when the next batch is requested, so a batch is available as soon as
/// its lines are, without waiting for the end of the input. Line terminators are stripped.
pub struct LineBatches<R: BufRead> {
    reader: R,
    batchsize: usize,
    done: bool,
}

impl<R: BufRead> LineBatches<R> {
    pub fn new(reader: R, batchsize: usize) -> Self {
        LineBatches {
            reader,
            batchsize: batchsize.max(1),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LineBatches<R> {
    type Item = io::Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut batch: Vec<String> = Vec::with_capacity(self.batchsize);
        while batch.len() < self.batchsize {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    break;
                },
                Ok(_) => {
                    let line = line.trim_end_matches(&['\n', '\r'][..]);
                    if !line.is_empty() {
                        batch.push(line.to_string());
                    }
                },
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}
