extern crate log;
extern crate rayon;
extern crate simple_error;

use std::fs::File;
use std::io::{self, BufReader, BufRead, Read};
use std::collections::BTreeMap;
use std::time::SystemTime;
use log::{debug, info, log_enabled, Level};
use rayon::prelude::*;
use serde::Serialize;
use simple_error::SimpleError;

pub mod types;
pub mod signature;
pub mod iterators;
pub mod vocab;
pub mod index;
pub mod jumble;


pub use crate::types::*;
pub use crate::signature::*;
pub use crate::iterators::*;
pub use crate::vocab::*;
pub use crate::index::*;
pub use crate::jumble::*;


#[derive(Default)]
pub struct JumbleModel {
    pub decoder: VocabDecoder,

    ///The main index, mapping signatures to instances
    pub index: SignatureIndex,

    ///A secondary sorted index, mapping the length of a signature (in chars)
    ///to all signatures of that length. Inner vector is always sorted
    pub sortedindex: BTreeMap<CharCount,Vec<Signature>>,

    ///Length of the longest entry in the index, longer substrings of a query can never match
    pub max_charcount: CharCount,

    /// Stores the names of the loaded lexicons, they will be referenced by index from individual
    /// items for provenance reasons
    pub lexicons: Vec<String>,
}

/// A query along with the texts of its matches, as serialised in JSON output
#[derive(Serialize,Debug,PartialEq)]
pub struct JumbleResult<'a> {
    pub input: &'a str,
    pub matches: Vec<&'a str>,
}

impl JumbleModel {
    pub fn new() -> JumbleModel {
        JumbleModel::default()
    }

    /// Build the index from everything added to the vocabulary so far.
    /// Must be called again after adding more vocabulary; building is deterministic
    /// so rebuilding an unchanged vocabulary yields an identical index.
    pub fn build(&mut self) {
        info!("Computing signatures for all {} items in the lexicon...", self.decoder.len());
        self.index = build_index(&self.decoder);
        info!(" - Found {} distinct signatures", self.index.len());

        info!("Creating sorted secondary index...");
        self.sortedindex.clear();
        for (signature, node) in self.index.iter() {
            self.sortedindex.entry(node.charcount).or_default().push(signature.clone());
        }
        for (size, keys) in self.sortedindex.iter_mut() {
            keys.sort_unstable();
            debug!(" - Found {} signatures of length {}", keys.len(), size);
        }
        self.max_charcount = self.sortedindex.keys().next_back().copied().unwrap_or(0);
        info!(" - Longest entry has {} characters", self.max_charcount);
    }

    pub fn contains_key(&self, key: &Signature) -> bool {
        self.index.contains_key(key)
    }

    ///Get all anagram instances for a specific entry
    pub fn get_anagram_instances(&self, text: &str) -> Vec<&VocabValue> {
        let signature = text.signature();
        let mut instances: Vec<&VocabValue> = Vec::new();
        if let Some(node) = self.index.get(&signature) {
            for vocab_id in node.instances.iter() {
                if let Some(value) = self.decoder.get(*vocab_id as usize) {
                    instances.push(value);
                }
            }
        }
        instances
    }

    ///Get an exact item in the lexicon (if it exists), returns the first one if there are duplicates
    pub fn get(&self, text: &str) -> Option<&VocabValue> {
        self.get_anagram_instances(text).into_iter().find(|instance| instance.text == text)
    }

    ///Tests if the lexicon has a specific entry, by text
    pub fn has(&self, text: &str) -> bool {
        self.get(text).is_some()
    }

    ///Resolves a vocabulary ID
    pub fn get_vocab(&self, vocab_id: VocabId) -> Option<&VocabValue> {
        self.decoder.get(vocab_id as usize)
    }

    ///Read vocabulary (a word list) from file, see `read_vocabulary_from()`
    pub fn read_vocabulary(&mut self, filename: &str, params: &VocabParams) -> Result<(), io::Error> {
        debug!("Reading vocabulary from {}...", filename);
        let f = File::open(filename)?;
        self.read_vocabulary_from(f, filename, params)
    }

    ///Read vocabulary from any reader.
    ///By default every whitespace-separated token is an entry, in order of appearance.
    ///If the parameters set a text column, the input is read as TSV and only that column is used.
    ///Duplicates are kept as separate entries.
    pub fn read_vocabulary_from(&mut self, reader: impl Read, name: &str, params: &VocabParams) -> Result<(), io::Error> {
        if self.lexicons.len() > u8::MAX as usize {
            return Err(io::Error::new(io::ErrorKind::Other, SimpleError::new(format!("Unable to load lexicon {}, too many lexicons loaded", name))));
        }
        let lexindex = self.lexicons.len() as u8;
        let before = self.decoder.len();
        let f_buffer = BufReader::new(reader);
        for (linenr, line) in f_buffer.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            if let Some(text_column) = params.text_column {
                let text = line.split('\t').nth(text_column as usize).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidData, SimpleError::new(format!("Expected text column {} not found in {} line {}", text_column, name, linenr + 1)))
                })?;
                if !text.is_empty() {
                    self.add_to_vocabulary(text, lexindex);
                }
            } else {
                for text in line.split_whitespace() {
                    self.add_to_vocabulary(text, lexindex);
                }
            }
        }
        debug!(" - Read {} entries from {}, vocabulary size is now {}", self.decoder.len() - before, name, self.decoder.len());
        self.lexicons.push(name.to_string());
        Ok(())
    }

    ///Adds an entry to the vocabulary. The index is not updated until `build()` is called.
    pub fn add_to_vocabulary(&mut self, text: &str, lexindex: u8) -> VocabId {
        self.decoder.push(VocabValue {
            text: text.to_string(),
            charcount: text.chars().count(),
            lexindex,
        });
        (self.decoder.len() - 1) as VocabId
    }

    /// Find all entries in the lexicon that are an anagram of a proper contiguous substring of the input.
    /// Returns a vector of vocabulary IDs, resolvable through `get_vocab()`
    pub fn find_jumbled(&self, input: &str, params: &SearchParameters) -> Vec<VocabId> {
        let begintime = if log_enabled!(Level::Debug) {
            debug!("(finding jumbled matches for {})", input);
            Some(SystemTime::now())
        } else {
            None
        };

        let matches = find_matches_bounded(input, &self.index, &self.decoder, params, Some(self.max_charcount));

        if let Some(begintime) = begintime {
            let duration = SystemTime::now().duration_since(begintime).map(|d| d.as_micros()).unwrap_or(0);
            debug!("(found {} matches for {} in {} μs)", matches.len(), input, duration);
        }
        matches
    }

    /// Find jumbled matches for multiple inputs at once. Will use parallellisation under the hood
    /// unless the parameters ask for a single thread. Results are in input order.
    pub fn find_jumbled_par<'a>(&self, inputs: &[&'a str], params: &SearchParameters) -> Vec<(&'a str, Vec<VocabId>)> {
        if params.single_thread {
            inputs.iter().map(|input| (*input, self.find_jumbled(input, params))).collect()
        } else {
            inputs.par_iter().map(|input| (*input, self.find_jumbled(input, params))).collect()
        }
    }

    /// Find jumbled matches with default parameters, returning the matching texts
    pub fn jumble(&self, input: &str) -> Vec<&str> {
        self.find_jumbled(input, &SearchParameters::default())
            .into_iter()
            .filter_map(|vocab_id| self.get_vocab(vocab_id))
            .map(|value| value.text.as_str())
            .collect()
    }

    /// Resolve the vocabulary IDs of a result to their texts
    pub fn resolve<'a>(&'a self, input: &'a str, matches: &[VocabId]) -> JumbleResult<'a> {
        JumbleResult {
            input,
            matches: matches.iter()
                .filter_map(|vocab_id| self.get_vocab(*vocab_id))
                .map(|value| value.text.as_str())
                .collect(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::*;

    #[test]
    fn build_secondary_index() {
        let model = get_test_model(TEST_LEXICON_LARGE);
        assert_eq!(model.max_charcount, 8);
        let keys = model.sortedindex.get(&4).expect("signatures of length 4");
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, &sorted);
        assert!(keys.contains(&"arts".signature()));
    }

    #[test]
    fn very_long_entry_is_not_pruned() {
        //longer than any 16-bit count can hold
        let word = "a".repeat(65537);
        let model = get_test_model(&[word.as_str()]);
        assert_eq!(model.max_charcount, 65537);
        assert_eq!(model.decoder[0].charcount, 65537);
        let query = format!("{}b", word);
        //the minimum length keeps the enumeration to the two longest substrings
        let params = get_test_searchparams().with_min_length(65537);
        assert_eq!(model.find_jumbled(&query, &params), vec!(0));
    }

    #[test]
    fn contains_key() {
        let model = get_test_model(TEST_LEXICON);
        assert!(model.contains_key(&"tac".signature()));
        assert!(model.contains_key(&"ta".signature()));
        assert!(!model.contains_key(&"cats".signature()));
    }

    #[test]
    fn empty_model() {
        let mut model = JumbleModel::new();
        model.build();
        assert!(model.index.is_empty());
        assert_eq!(model.max_charcount, 0);
        assert!(model.jumble("anything").is_empty());
    }

    #[test]
    fn read_whitespace_separated() {
        let mut model = JumbleModel::new();
        model.read_vocabulary_from("cat act\n\nat  ta\ttac\n".as_bytes(), "inline", &VocabParams::default()).expect("reading vocabulary");
        model.build();
        let texts: Vec<&str> = model.decoder.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(texts, TEST_LEXICON);
        assert_eq!(model.lexicons, vec!("inline"));
    }

    #[test]
    fn read_tsv_column() {
        let mut model = JumbleModel::new();
        model.read_vocabulary_from("1\tcat\n2\tdog\n".as_bytes(), "first", &VocabParams::default().with_text_column(1)).expect("reading vocabulary");
        model.read_vocabulary_from("god\n".as_bytes(), "second", &VocabParams::default()).expect("reading vocabulary");
        model.build();
        assert_eq!(model.get("dog").map(|v| v.lexindex), Some(0));
        assert_eq!(model.get("god").map(|v| v.lexindex), Some(1));
        assert_eq!(model.get_anagram_instances("odg").len(), 2);
    }

    #[test]
    fn read_tsv_missing_column() {
        let mut model = JumbleModel::new();
        let result = model.read_vocabulary_from("cat\n".as_bytes(), "broken", &VocabParams::default().with_text_column(1));
        let err = result.expect_err("missing column should fail");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_missing_file() {
        let mut model = JumbleModel::new();
        assert!(model.read_vocabulary("/nonexistent/words_alpha.txt", &VocabParams::default()).is_err());
    }

    #[test]
    fn batch_in_input_order() {
        let model = get_test_model(TEST_LEXICON);
        let params = get_test_searchparams();
        let inputs = vec!("cats", "a", "tacs");
        for params in [params.clone(), SearchParameters { single_thread: false, ..params }] {
            let results = model.find_jumbled_par(&inputs, &params);
            assert_eq!(results.len(), 3);
            assert_eq!(results[0].0, "cats");
            assert_eq!(results[0].1.len(), 5);
            assert!(results[1].1.is_empty());
            assert_eq!(results[2].0, "tacs");
        }
    }
}
