use std::collections::HashSet;

use crate::types::*;
use crate::vocab::*;
use crate::index::*;
use crate::iterators::*;

/// Collect the unique signatures of all proper contiguous substrings of the query,
/// in the order in which they are first encountered (start offset ascending, then length ascending).
/// Substrings longer than `max_length` (if set) are not generated at all.
pub fn proper_substring_signatures(query: &str, params: &SearchParameters, max_length: Option<usize>) -> Vec<Signature> {
    let mut seen: HashSet<Signature> = HashSet::new();
    let mut signatures: Vec<Signature> = Vec::new();
    for substring in SubstringIterator::with_bounds(query, params.min_length, max_length) {
        if !seen.contains(&substring.signature) {
            seen.insert(substring.signature.clone());
            signatures.push(substring.signature);
        }
    }
    signatures
}

/// Find all lexicon entries that are an anagram of a proper contiguous substring of the query.
/// Returns vocabulary IDs, resolvable through the decoder.
///
/// The query as a whole is never considered, so neither the query nor any of its full-length
/// anagrams can match.
pub fn find_matches(query: &str, index: &SignatureIndex, decoder: &VocabDecoder, params: &SearchParameters) -> Vec<VocabId> {
    find_matches_bounded(query, index, decoder, params, None)
}

/// As `find_matches()`, but substrings longer than `max_charcount` are skipped. Passing the length
/// of the longest entry in the index prunes the enumeration without changing the result.
pub fn find_matches_bounded(query: &str, index: &SignatureIndex, decoder: &VocabDecoder, params: &SearchParameters, max_charcount: Option<CharCount>) -> Vec<VocabId> {
    let signatures = proper_substring_signatures(query, params, max_charcount);
    let mut matches: Vec<VocabId> = Vec::new();
    for signature in signatures.iter() {
        if let Some(node) = index.get(signature) {
            matches.extend(node.instances.iter().copied());
        }
    }

    match params.order {
        OutputOrder::Discovery => {},
        OutputOrder::Alphabetical => {
            matches.sort_by(|a, b| text_of(decoder, *a).cmp(text_of(decoder, *b)));
        },
        OutputOrder::Length => {
            matches.sort_by(|a, b| {
                let (a, b) = (decoder.get(*a as usize), decoder.get(*b as usize));
                let a_key = a.map(|v| (v.charcount, v.text.as_str())).unwrap_or((0, ""));
                let b_key = b.map(|v| (v.charcount, v.text.as_str())).unwrap_or((0, ""));
                b_key.0.cmp(&a_key.0).then(a_key.1.cmp(b_key.1))
            });
        }
    }

    if params.max_matches > 0 {
        matches.truncate(params.max_matches);
    }
    matches
}

/// Convenience wrapper around `find_matches()` using default parameters that returns the texts
/// rather than the IDs.
pub fn jumble<'a>(query: &str, index: &SignatureIndex, decoder: &'a VocabDecoder) -> Vec<&'a str> {
    find_matches(query, index, decoder, &SearchParameters::default())
        .into_iter()
        .filter_map(|vocab_id| decoder.get(vocab_id as usize))
        .map(|value| value.text.as_str())
        .collect()
}

fn text_of(decoder: &VocabDecoder, vocab_id: VocabId) -> &str {
    decoder.get(vocab_id as usize).map(|value| value.text.as_str()).unwrap_or("")
}
