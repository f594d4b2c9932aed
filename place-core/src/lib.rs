//! # place-core — Identificação de Nomes de Lugares em Texto Livre
//!
//! Este crate encontra menções a países, estados/províncias e cidades em um texto,
//! combinando etiquetagem morfossintática (POS tagging) com busca fuzzy em um
//! gazetteer de referência, e devolve o texto com as menções destacadas.
//!
//! ## Arquitetura do Sistema
//!
//! O sistema segue uma arquitetura de pipeline linear:
//!
//! 1.  **Entrada**: Texto bruto (String).
//! 2.  **Tokenização + POS** ([`tokenizer`], [`tagger`]): tokens com offsets e tags Penn.
//!     Apenas nomes próprios (`NNP`) seguem adiante.
//! 3.  **Busca Fuzzy** ([`matcher`], [`similarity`]): melhor nome por categoria
//!     (Country → State → City) no [`gazetteer`], mais o candidato de múltiplas palavras.
//! 4.  **Classificação** ([`classifier`]): limiar 92; qualidade `exact` (100) ou `fuzzy`.
//! 5.  **Destaque** ([`highlight`]): marcação verde/vermelha dos lugares aceitos.
//! 6.  **Saída**: [`HighlightedText`] + lista ordenada de [`IdentifiedPlace`].
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::sync::Arc;
//! use place_core::{EngineConfig, Gazetteer, GazetteerRow, PlaceEngine};
//!
//! // 1. Gazetteer construído uma vez e compartilhado
//! let gazetteer = Arc::new(Gazetteer::from_rows(vec![
//!     GazetteerRow::new("France", "Ile-de-france", "Paris"),
//! ]));
//!
//! // 2. Motor com o tagger padrão
//! let engine = PlaceEngine::new(gazetteer, EngineConfig::default());
//!
//! // 3. Identificação
//! let (highlighted, places) = engine.identify_places("I love Paris in the spring.");
//!
//! assert_eq!(places[0].canonical_name, "Paris");
//! assert_eq!(
//!     highlighted.to_string(),
//!     "I love <span style=\"color: green\">Paris</span> in the spring."
//! );
//! ```

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod gazetteer;
pub mod highlight;
pub mod matcher;
pub mod pipeline;
pub mod similarity;
pub mod tagger;
pub mod text;
pub mod tokenizer;

pub use classifier::{IdentifiedPlace, MatchQuality};
pub use config::EngineConfig;
pub use error::{PlaceError, Result};
pub use gazetteer::{Gazetteer, GazetteerRow, PlaceCategory};
pub use highlight::{HighlightMode, HighlightedText, Segment};
pub use matcher::{MatchCandidate, MatchCategory};
pub use pipeline::{PipelineEvent, PlaceEngine};
pub use similarity::{similarity, Scorer};
pub use tagger::{LexiconTagger, PosTag, PosTagger, TaggedToken};
pub use tokenizer::{Token, TokenizerMode};
