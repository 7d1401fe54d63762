use std::collections::HashMap;

use crate::types::*;
use crate::vocab::*;
use crate::signature::*;

#[derive(Clone,Debug,PartialEq)]
pub struct IndexNode {
    ///All lexicon entries with this signature, in lexicon order
    pub instances: Vec<VocabId>,
    pub charcount: CharCount,
}

///The main index, mapping signatures to instances
pub type SignatureIndex = HashMap<Signature,IndexNode>;

///Group all entries in the vocabulary by their signature.
///An empty vocabulary gives an empty index.
pub fn build_index(decoder: &VocabDecoder) -> SignatureIndex {
    let mut index = SignatureIndex::new();
    for (id, value) in decoder.iter().enumerate() {
        let signature = value.text.signature();
        let charcount = value.charcount;
        index.entry(signature)
            .or_insert_with(|| IndexNode {
                instances: Vec::new(),
                charcount,
            })
            .instances.push(id as VocabId);
    }
    index
}


#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(words: &[&str]) -> VocabDecoder {
        words.iter().map(|w| VocabValue {
            text: w.to_string(),
            charcount: w.chars().count(),
            lexindex: 0,
        }).collect()
    }

    #[test]
    fn groups_anagrams_in_lexicon_order() {
        let index = build_index(&decoder(&["cat","at","act","ta","tac"]));
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&"cat".signature()).expect("bucket").instances, vec!(0,2,4));
        assert_eq!(index.get(&"at".signature()).expect("bucket").instances, vec!(1,3));
        assert_eq!(index.get(&"cat".signature()).expect("bucket").charcount, 3);
    }

    #[test]
    fn keeps_duplicates() {
        let index = build_index(&decoder(&["dog","god","dog"]));
        assert_eq!(index.get(&"dog".signature()).expect("bucket").instances, vec!(0,1,2));
    }

    #[test]
    fn empty_vocabulary() {
        assert!(build_index(&VocabDecoder::new()).is_empty());
    }
}
