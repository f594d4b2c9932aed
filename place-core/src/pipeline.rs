//! # Pipeline de Identificação — Orquestrador com Eventos Observáveis
//!
//! O pipeline coordena todos os módulos (tagger, matcher, classificador, destaque)
//! e emite eventos em cada passo via um canal Rust (`mpsc`), permitindo que
//! o servidor WebSocket transmita o progresso em tempo real para o cliente.
//!
//! ## Fluxo
//!
//! ```text
//! texto → PosTagger → tokens NNP → CandidateMatcher (Gazetteer) → classify → destaque
//! ```
//!
//! O processamento é síncrono e puro dado `(texto, gazetteer)`: o motor não
//! guarda estado entre requisições e pode ser compartilhado entre threads.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::{classify, IdentifiedPlace, MatchQuality};
use crate::config::EngineConfig;
use crate::gazetteer::Gazetteer;
use crate::highlight::HighlightedText;
use crate::matcher::{select_best, CandidateMatcher, MatchCandidate};
use crate::tagger::{LexiconTagger, PosTagger, TaggedToken};

/// Eventos emitidos pelo pipeline durante o processamento.
///
/// Permitem que a UI visualize cada decisão: quais tokens viraram candidatos,
/// a pontuação por categoria e o motivo da aceitação ou rejeição.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: Tokenização e POS tagging concluídos.
    TaggingDone {
        tokens: Vec<TaggedToken>,
        total: usize,
        proper_nouns: usize,
    },
    /// **Passo 2**: Um nome próprio foi pontuado contra cada categoria.
    CandidateScored {
        token_index: usize,
        token_text: String,
        candidates: Vec<MatchCandidate>,
        best: MatchCandidate,
    },
    /// **Passo 3a**: O melhor candidato passou do limiar.
    PlaceAccepted {
        token_index: usize,
        place: IdentifiedPlace,
        quality: Option<MatchQuality>,
        /// Quantos trechos do texto foram marcados por esta aceitação
        highlighted: usize,
    },
    /// **Passo 3b**: O melhor candidato ficou abaixo do limiar.
    CandidateRejected {
        token_index: usize,
        token_text: String,
        best_score: u8,
    },
    /// **Conclusão**: Texto destacado e lugares em ordem de ocorrência.
    Done {
        highlighted: HighlightedText,
        places: Vec<IdentifiedPlace>,
        total_tokens: usize,
        processing_ms: u64,
    },
}

/// O motor de identificação de lugares.
///
/// Atua como o **controlador** do sistema, orquestrando:
/// 1. Tokenização e POS tagging do texto bruto.
/// 2. Busca fuzzy de cada nome próprio no gazetteer.
/// 3. Classificação pelo limiar de aceitação.
/// 4. Destaque progressivo do texto e montagem da lista de lugares.
///
/// # Modos de Uso
/// - **Sync**: Método `identify_places` para scripts e chamadas diretas.
/// - **Streaming**: Método `identify_streaming` para UIs reativas (via WebSocket).
pub struct PlaceEngine {
    gazetteer: Arc<Gazetteer>,
    tagger: Box<dyn PosTagger>,
    config: EngineConfig,
}

impl PlaceEngine {
    /// Cria o motor com o [`LexiconTagger`] configurado a partir de `config`.
    pub fn new(gazetteer: Arc<Gazetteer>, config: EngineConfig) -> Self {
        let tagger = LexiconTagger::new()
            .with_compounds(config.tokenizer_mode, gazetteer.compounds().to_vec())
            .with_capitalized_tokens(config.capitalize_tokens);
        Self::with_tagger(gazetteer, Box::new(tagger), config)
    }

    /// Cria o motor com um tagger externo.
    pub fn with_tagger(
        gazetteer: Arc<Gazetteer>,
        tagger: Box<dyn PosTagger>,
        config: EngineConfig,
    ) -> Self {
        Self {
            gazetteer,
            tagger,
            config,
        }
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Identifica os lugares de forma síncrona.
    ///
    /// Retorna o texto destacado e os lugares aceitos na ordem em que aparecem.
    pub fn identify_places(&self, text: &str) -> (HighlightedText, Vec<IdentifiedPlace>) {
        let (tx, rx) = mpsc::channel();
        self.identify_streaming(text, tx);

        let mut highlighted = HighlightedText::new(text);
        let mut places = vec![];

        // Consome todos os eventos até o fim
        while let Ok(event) = rx.recv() {
            if let PipelineEvent::Done {
                highlighted: h,
                places: p,
                ..
            } = event
            {
                highlighted = h;
                places = p;
            }
        }
        (highlighted, places)
    }

    /// Executa o pipeline enviando eventos de progresso em tempo real.
    ///
    /// # Fluxo de Eventos
    /// 1. `TaggingDone`: Tokens e tags gerados.
    /// 2. `CandidateScored` (Loop): Pontuações de cada nome próprio.
    /// 3. `PlaceAccepted` / `CandidateRejected` (Loop): Decisão do classificador.
    /// 4. `Done`: Resultado final consolidado.
    pub fn identify_streaming(&self, text: &str, tx: mpsc::Sender<PipelineEvent>) {
        let start = Instant::now();

        // === Passo 1: Tokenização + POS ===
        let tagged = self.tagger.tag(text);
        let total_tokens = tagged.len();
        let proper_nouns = tagged.iter().filter(|t| t.tag.is_proper_noun()).count();
        let _ = tx.send(PipelineEvent::TaggingDone {
            tokens: tagged.clone(),
            total: total_tokens,
            proper_nouns,
        });

        let matcher = CandidateMatcher::new(&self.gazetteer, self.config.scorer);
        let mut highlighted = HighlightedText::new(text);
        let mut places = Vec::new();

        for tagged_token in tagged.iter().filter(|t| t.tag.is_proper_noun()) {
            let token = &tagged_token.token;

            // === Passo 2: Candidatos por categoria ===
            let candidates = matcher.candidates(&token.text);
            let best = select_best(candidates.clone());
            let _ = tx.send(PipelineEvent::CandidateScored {
                token_index: token.index,
                token_text: token.text.clone(),
                candidates,
                best: best.clone(),
            });

            // === Passo 3: Classificação + destaque ===
            let Some(classification) = classify(&best) else {
                debug!(token = %token.text, score = best.score, "candidato rejeitado");
                let _ = tx.send(PipelineEvent::CandidateRejected {
                    token_index: token.index,
                    token_text: token.text.clone(),
                    best_score: best.score,
                });
                continue;
            };

            let marked = match classification.quality {
                Some(quality) => highlighted.apply(self.config.highlight_mode, token, quality),
                None => 0,
            };
            debug!(
                token = %token.text,
                canonical = %classification.place.canonical_name,
                place_type = %classification.place.place_type,
                score = classification.place.score,
                marked,
                "lugar identificado"
            );

            let _ = tx.send(PipelineEvent::PlaceAccepted {
                token_index: token.index,
                place: classification.place.clone(),
                quality: classification.quality,
                highlighted: marked,
            });
            places.push(classification.place);
        }

        let _ = tx.send(PipelineEvent::Done {
            highlighted,
            places,
            total_tokens,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }
}
