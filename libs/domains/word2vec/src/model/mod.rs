mod loader;
mod semantic;
mod word2vec;

pub use loader::ModelFormat;
pub use semantic::SemanticModel;
pub use word2vec::Word2Vec;

#[cfg(test)]
pub use semantic::MockSemanticModel;
