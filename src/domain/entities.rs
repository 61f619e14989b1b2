//! Domain entities: core data structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Ordered translations of one word, in the order the user supplied them.
/// Duplicates are kept as-is.
pub type Translations = Vec<String>;

/// A named word list: word → ordered translations.
///
/// Serializes as a plain JSON object (`{"cat": ["chat"]}`), which is also
/// the export format for a single dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: BTreeMap<String, Translations>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a word. Returns the previous translations, if any.
    pub fn insert(&mut self, word: impl Into<String>, translations: Translations) -> Option<Translations> {
        self.entries.insert(word.into(), translations)
    }

    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn remove(&mut self, word: &str) -> Option<Translations> {
        self.entries.remove(word)
    }

    /// Words with their translations, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(word, translations)| (word.as_str(), translations.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<W: Into<String>> FromIterator<(W, Translations)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (W, Translations)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(w, t)| (w.into(), t)).collect(),
        }
    }
}

/// All dictionaries managed by one store, keyed by name.
///
/// Serializes as `{"<dictionary>": {"<word>": ["<translation>", ...]}}`,
/// the snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    dictionaries: BTreeMap<String, Dictionary>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dictionary, silently replacing any existing one of the
    /// same name. Returns true if an existing dictionary was replaced.
    pub fn create_dictionary(&mut self, name: impl Into<String>) -> bool {
        self.dictionaries
            .insert(name.into(), Dictionary::new())
            .is_some()
    }

    pub fn dictionary(&self, name: &str) -> Result<&Dictionary, DomainError> {
        self.dictionaries
            .get(name)
            .ok_or_else(|| DomainError::DictionaryNotFound(name.to_string()))
    }

    fn dictionary_mut(&mut self, name: &str) -> Result<&mut Dictionary, DomainError> {
        self.dictionaries
            .get_mut(name)
            .ok_or_else(|| DomainError::DictionaryNotFound(name.to_string()))
    }

    /// Mutable access to an existing word in an existing dictionary.
    /// Either one missing is reported as `WordNotFound`.
    fn entry_mut(&mut self, dictionary: &str, word: &str) -> Result<&mut Dictionary, DomainError> {
        match self.dictionaries.get_mut(dictionary) {
            Some(dict) if dict.contains(word) => Ok(dict),
            _ => Err(word_not_found(dictionary, word)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dictionaries.contains_key(name)
    }

    /// Insert or overwrite a word in an existing dictionary.
    pub fn add_word(
        &mut self,
        dictionary: &str,
        word: impl Into<String>,
        translations: Translations,
    ) -> Result<Option<Translations>, DomainError> {
        Ok(self.dictionary_mut(dictionary)?.insert(word, translations))
    }

    /// Overwrite the translations of an existing word. Returns the old ones.
    pub fn replace_word(
        &mut self,
        dictionary: &str,
        word: &str,
        translations: Translations,
    ) -> Result<Translations, DomainError> {
        let dict = self.entry_mut(dictionary, word)?;
        dict.insert(word, translations)
            .ok_or_else(|| word_not_found(dictionary, word))
    }

    /// Remove an existing word. Returns its translations.
    pub fn delete_word(&mut self, dictionary: &str, word: &str) -> Result<Translations, DomainError> {
        let dict = self.entry_mut(dictionary, word)?;
        dict.remove(word)
            .ok_or_else(|| word_not_found(dictionary, word))
    }

    pub fn translations(&self, dictionary: &str, word: &str) -> Result<&[String], DomainError> {
        self.dictionaries
            .get(dictionary)
            .and_then(|dict| dict.get(word))
            .ok_or_else(|| word_not_found(dictionary, word))
    }

    /// Dictionary names in key order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dictionaries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}

fn word_not_found(dictionary: &str, word: &str) -> DomainError {
    DomainError::WordNotFound {
        dictionary: dictionary.to_string(),
        word: word.to_string(),
    }
}

/// Split comma-separated user input into translations.
///
/// Each piece is trimmed; empty pieces are kept (`"a,,b"` → `["a", "", "b"]`),
/// so any input yields at least one translation.
pub fn parse_translations(input: &str) -> Translations {
    input.split(',').map(|t| t.trim().to_string()).collect()
}

/// Expand environment variables in a path string.
///
/// Supports:
/// - `$VAR` syntax
/// - `${VAR}` syntax
/// - `~` for home directory
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en_fr() -> Collection {
        let mut collection = Collection::new();
        collection.create_dictionary("en-fr");
        collection
            .add_word("en-fr", "cat", vec!["chat".into()])
            .unwrap();
        collection
    }

    #[test]
    fn given_existing_dictionary_when_created_again_then_replaced_with_empty() {
        let mut collection = en_fr();

        let replaced = collection.create_dictionary("en-fr");

        assert!(replaced);
        assert!(collection.dictionary("en-fr").unwrap().is_empty());
    }

    #[test]
    fn given_missing_dictionary_when_adding_word_then_dictionary_not_found() {
        let mut collection = Collection::new();

        let err = collection
            .add_word("nope", "x", vec!["y".into()])
            .unwrap_err();

        assert_eq!(err, DomainError::DictionaryNotFound("nope".into()));
        assert!(!collection.contains("nope"));
    }

    #[test]
    fn given_missing_dictionary_when_replacing_then_word_not_found() {
        let mut collection = en_fr();

        let err = collection
            .replace_word("de-fr", "cat", vec!["Katze".into()])
            .unwrap_err();

        assert!(matches!(err, DomainError::WordNotFound { .. }));
    }

    #[test]
    fn given_duplicate_translations_when_adding_then_kept_in_order() {
        let mut collection = en_fr();
        let translations = vec!["b".to_string(), "a".into(), "b".into()];

        collection
            .add_word("en-fr", "dup", translations.clone())
            .unwrap();

        assert_eq!(collection.translations("en-fr", "dup").unwrap(), translations);
    }

    #[test]
    fn given_word_when_deleted_then_returns_old_translations() {
        let mut collection = en_fr();

        let removed = collection.delete_word("en-fr", "cat").unwrap();

        assert_eq!(removed, vec!["chat".to_string()]);
        assert!(collection.translations("en-fr", "cat").is_err());
    }

    #[test]
    fn test_parse_translations() {
        assert_eq!(parse_translations(" chat , minou"), vec!["chat", "minou"]);
        assert_eq!(parse_translations("a,,b"), vec!["a", "", "b"]);
        assert_eq!(parse_translations(""), vec![""]);
    }

    #[test]
    fn test_collection_serializes_as_nested_objects() {
        let json = serde_json::to_string(&en_fr()).unwrap();
        assert_eq!(json, r#"{"en-fr":{"cat":["chat"]}}"#);
    }
}
