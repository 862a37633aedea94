use super::loader::{self, ModelFormat};
use super::semantic::SemanticModel;
use crate::error::{ModelError, ModelLoadError, ModelResult};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// In-memory word2vec keyed vectors.
///
/// Vectors are L2-normalized at load time, so cosine similarity is a plain
/// dot product.
#[derive(Debug)]
pub struct Word2Vec {
    words: Vec<String>,
    lookup: HashMap<String, usize>,
    vectors: Vec<f32>,
    dimension: usize,
}

impl Word2Vec {
    /// Load a model file, decompressing `.gz` files transparently.
    pub fn load(path: impl AsRef<Path>, format: ModelFormat) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        info!("Loading {:?} word2vec model from {}", format, path.display());

        let raw = loader::read(loader::open(path)?, format)?;
        let model = Self::from_parts(raw.words, raw.vectors, raw.dimension)?;

        info!("Loaded {}", model.describe());
        Ok(model)
    }

    /// Build a model from a vocabulary and its row-major vector matrix.
    ///
    /// When a word appears more than once, lookups resolve to its first row.
    pub fn from_parts(
        words: Vec<String>,
        mut vectors: Vec<f32>,
        dimension: usize,
    ) -> Result<Self, ModelLoadError> {
        if dimension == 0 || vectors.len() != words.len().saturating_mul(dimension) {
            return Err(ModelLoadError::Header(format!(
                "{} words do not fit {} components of dimension {}",
                words.len(),
                vectors.len(),
                dimension
            )));
        }

        let mut lookup = HashMap::with_capacity(words.len());
        for (position, word) in words.iter().enumerate() {
            lookup.entry(word.clone()).or_insert(position);
        }
        if lookup.len() != words.len() {
            warn!(
                duplicates = words.len() - lookup.len(),
                "Model vocabulary contains duplicate words"
            );
        }

        for row in vectors.chunks_exact_mut(dimension) {
            normalize(row);
        }

        Ok(Self {
            words,
            lookup,
            vectors,
            dimension,
        })
    }

    /// Vocabulary in file order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn vector(&self, position: usize) -> &[f32] {
        &self.vectors[position * self.dimension..(position + 1) * self.dimension]
    }

    fn position(&self, word: &str) -> ModelResult<usize> {
        self.lookup
            .get(word)
            .copied()
            .ok_or_else(|| ModelError::NotInVocabulary(word.to_string()))
    }

    /// Unit-length mean of the given rows, each scaled by its weight.
    fn unit_mean(&self, weighted: &[(usize, f32)]) -> Vec<f32> {
        let mut mean = vec![0.0f32; self.dimension];
        for &(position, weight) in weighted {
            for (acc, component) in mean.iter_mut().zip(self.vector(position)) {
                *acc += weight * component;
            }
        }
        normalize(&mut mean);
        mean
    }
}

impl SemanticModel for Word2Vec {
    fn most_similar(
        &self,
        positive: &[String],
        negative: &[String],
        top_n: usize,
    ) -> ModelResult<Vec<(String, f64)>> {
        if positive.is_empty() && negative.is_empty() {
            return Err(ModelError::EmptyQuery("most_similar"));
        }

        let weighted = positive
            .iter()
            .map(|word| -> ModelResult<(usize, f32)> { Ok((self.position(word)?, 1.0)) })
            .chain(negative.iter().map(|word| -> ModelResult<(usize, f32)> {
                Ok((self.position(word)?, -1.0))
            }))
            .collect::<ModelResult<Vec<_>>>()?;
        let mean = self.unit_mean(&weighted);

        let mut scored: Vec<(usize, f32)> = (0..self.words.len())
            .filter(|position| !weighted.iter().any(|(used, _)| used == position))
            .map(|position| (position, dot(self.vector(position), &mean)))
            .collect();

        // best score first, earlier vocabulary position on ties
        let order = |a: &(usize, f32), b: &(usize, f32)| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0));
        if top_n < scored.len() {
            scored.select_nth_unstable_by(top_n, order);
            scored.truncate(top_n);
        }
        scored.sort_unstable_by(order);

        Ok(scored
            .into_iter()
            .map(|(position, score)| (self.words[position].clone(), f64::from(score)))
            .collect())
    }

    fn does_not_match(&self, words: &[String]) -> ModelResult<String> {
        let known: Vec<(&String, usize)> = words
            .iter()
            .filter_map(|word| match self.lookup.get(word) {
                Some(&position) => Some((word, position)),
                None => {
                    warn!("Ignoring word {:?} not in vocabulary", word);
                    None
                }
            })
            .collect();
        if known.is_empty() {
            return Err(ModelError::EmptyQuery("does_not_match"));
        }

        let weighted: Vec<(usize, f32)> = known.iter().map(|&(_, position)| (position, 1.0)).collect();
        let mean = self.unit_mean(&weighted);

        known
            .into_iter()
            .map(|(word, position)| (dot(self.vector(position), &mean), word))
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)))
            .map(|(_, word)| word.clone())
            .ok_or(ModelError::EmptyQuery("does_not_match"))
    }

    fn describe(&self) -> String {
        format!("Word2Vec(vocab={}, size={})", self.words.len(), self.dimension)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn normalize(vector: &mut [f32]) {
    let norm = dot(vector, vector).sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|component| *component /= norm);
    }
}
