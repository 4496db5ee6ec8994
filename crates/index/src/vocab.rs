//! Bidirectional mapping between external track identifiers and the dense
//! row indices of the embedding table.

use hashbrown::HashMap;

use crate::IndexError;

/// Track identifier ⇄ internal index lookup.
///
/// Both directions are kept as exact inverses: for every identifier `t`,
/// `reverse(resolve(t)) == t`, and indices cover `0..len()` without gaps.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    forward: HashMap<String, usize>,
    inverse: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from the index-ordered list of identifiers.
    pub fn from_ordered<I, S>(ids: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inverse: Vec<String> = ids.into_iter().map(Into::into).collect();
        let mut forward = HashMap::with_capacity(inverse.len());
        for (idx, id) in inverse.iter().enumerate() {
            if forward.insert(id.clone(), idx).is_some() {
                return Err(IndexError::VocabularyMismatch(format!(
                    "track id {id:?} appears more than once"
                )));
            }
        }
        Ok(Self { forward, inverse })
    }

    /// Build both directions from a forward `id -> index` map.
    pub fn from_forward<I>(forward: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let forward: HashMap<String, usize> = forward.into_iter().collect();
        let mut slots: Vec<Option<String>> = vec![None; forward.len()];
        for (id, &idx) in &forward {
            let slot = slots.get_mut(idx).ok_or_else(|| {
                IndexError::VocabularyMismatch(format!(
                    "index {idx} for {id:?} is outside 0..{}",
                    forward.len()
                ))
            })?;
            if slot.is_some() {
                return Err(IndexError::VocabularyMismatch(format!(
                    "index {idx} is assigned to more than one track"
                )));
            }
            *slot = Some(id.clone());
        }
        // Injective into 0..len, so every slot is filled.
        let inverse = slots.into_iter().flatten().collect();
        Ok(Self { forward, inverse })
    }

    /// Assemble a vocabulary from separately persisted directions, checking
    /// that they are inverses of each other.
    pub fn from_parts<I>(forward: I, inverse: Vec<String>) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let vocab = Self::from_forward(forward)?;
        if vocab.inverse.len() != inverse.len() {
            return Err(IndexError::VocabularyMismatch(format!(
                "forward map has {} tracks, inverse has {}",
                vocab.inverse.len(),
                inverse.len()
            )));
        }
        if let Some((idx, _)) = vocab
            .inverse
            .iter()
            .zip(&inverse)
            .enumerate()
            .find(|(_, (a, b))| a != b)
        {
            return Err(IndexError::VocabularyMismatch(format!(
                "index {idx} maps to {:?} forward but {:?} inverse",
                vocab.inverse[idx], inverse[idx]
            )));
        }
        Ok(vocab)
    }

    /// Internal index for `id`, or `None` when the track is unknown.
    pub fn resolve(&self, id: &str) -> Option<usize> {
        self.forward.get(id).copied()
    }

    /// Track identifier stored at `index`.
    pub fn reverse(&self, index: usize) -> Option<&str> {
        self.inverse.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inverse.is_empty()
    }

    /// Identifiers in index order.
    pub fn ids(&self) -> &[String] {
        &self.inverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_and_reverse_are_inverses() {
        let vocab = Vocabulary::from_ordered(["a", "b", "c"]).unwrap();
        for id in ["a", "b", "c"] {
            let idx = vocab.resolve(id).unwrap();
            assert_eq!(vocab.reverse(idx), Some(id));
        }
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn unknown_track_resolves_to_none() {
        let vocab = Vocabulary::from_ordered(["a"]).unwrap();
        assert_eq!(vocab.resolve("zzz"), None);
        assert_eq!(vocab.reverse(7), None);
    }

    #[test]
    fn from_forward_fills_inverse() {
        let vocab =
            Vocabulary::from_forward([("y".to_string(), 1), ("x".to_string(), 0)]).unwrap();
        assert_eq!(vocab.ids(), &["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn from_forward_rejects_gaps() {
        let err = Vocabulary::from_forward([("x".to_string(), 0), ("y".to_string(), 2)])
            .unwrap_err();
        assert!(matches!(err, IndexError::VocabularyMismatch(_)));
    }

    #[test]
    fn from_forward_rejects_shared_index() {
        let err = Vocabulary::from_forward([("x".to_string(), 0), ("y".to_string(), 0)])
            .unwrap_err();
        assert!(matches!(err, IndexError::VocabularyMismatch(_)));
    }

    #[test]
    fn from_ordered_rejects_duplicates() {
        assert!(Vocabulary::from_ordered(["a", "a"]).is_err());
    }

    #[test]
    fn from_parts_detects_disagreement() {
        let forward = [("a".to_string(), 0), ("b".to_string(), 1)];
        let ok = Vocabulary::from_parts(forward.clone(), vec!["a".into(), "b".into()]);
        assert!(ok.is_ok());

        let swapped = Vocabulary::from_parts(forward.clone(), vec!["b".into(), "a".into()]);
        assert!(matches!(swapped, Err(IndexError::VocabularyMismatch(_))));

        let short = Vocabulary::from_parts(forward, vec!["a".into()]);
        assert!(matches!(short, Err(IndexError::VocabularyMismatch(_))));
    }
}
