use crate::types::*;

#[derive(Clone,Debug,PartialEq)]
pub struct VocabValue {
    pub text: String,

    /// The length of the text in chars
    pub charcount: CharCount,

    /// The index of the lexicon this entry was read from
    pub lexindex: u8
}

///Map integers (indices correspond to VocabId) to string values.
///Duplicates are not merged, the same text may occur under several IDs
pub type VocabDecoder = Vec<VocabValue>;

pub struct VocabParams {
    ///Column containing the Text (0-indexed) if the lexicon is a TSV file,
    ///if unset, every whitespace-separated token is an entry
    pub text_column: Option<u8>,
}

impl Default for VocabParams {
    fn default() -> Self {
        Self {
            text_column: None,
        }
    }
}

impl VocabParams {
    pub fn with_text_column(mut self, column: u8) -> Self {
        self.text_column = Some(column);
        self
    }
}
