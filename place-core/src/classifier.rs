//! # Classificador — Aceitar ou Rejeitar um Candidato
//!
//! Regra rígida, não probabilística:
//!
//! | Pontuação | Decisão  | Qualidade | Cor no destaque |
//! |-----------|----------|-----------|-----------------|
//! | 100       | aceito   | exact     | verde           |
//! | 92..=99   | aceito   | fuzzy     | vermelho        |
//! | < 92      | rejeitado| —         | —               |
//!
//! Candidatos `MultiWord` são aceitos (pontuação 100) mas não recebem
//! qualidade: não são destacados no texto.

use serde::{Deserialize, Serialize};

use crate::matcher::{MatchCandidate, MatchCategory};
use crate::text::title_case;

/// Pontuação mínima para um candidato ser reportado como lugar.
pub const ACCEPT_THRESHOLD: u8 = 92;

/// Pontuação de uma correspondência exata.
pub const EXACT_SCORE: u8 = 100;

/// Qualidade da correspondência, usada para escolher o marcador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    Exact,
    Fuzzy,
}

impl MatchQuality {
    pub fn from_score(score: u8) -> Self {
        if score >= EXACT_SCORE {
            MatchQuality::Exact
        } else {
            MatchQuality::Fuzzy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchQuality::Exact => "exact",
            MatchQuality::Fuzzy => "fuzzy",
        }
    }

    /// Cor CSS do marcador
    pub fn color(&self) -> &'static str {
        match self {
            MatchQuality::Exact => "green",
            MatchQuality::Fuzzy => "red",
        }
    }
}

/// Um lugar identificado no texto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedPlace {
    /// Token como produzido pelo tagger
    pub token: String,
    /// Nome do gazetteer em title case (ex: "New York")
    pub canonical_name: String,
    pub place_type: MatchCategory,
    pub score: u8,
}

/// Resultado de um candidato aceito.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub place: IdentifiedPlace,
    /// `None` para `MultiWord`, que não é destacado
    pub quality: Option<MatchQuality>,
}

/// Aplica o limiar de aceitação. `None` significa rejeitado.
pub fn classify(candidate: &MatchCandidate) -> Option<Classification> {
    if candidate.score < ACCEPT_THRESHOLD {
        return None;
    }

    let quality = match candidate.category {
        MatchCategory::MultiWord => None,
        _ => Some(MatchQuality::from_score(candidate.score)),
    };

    Some(Classification {
        place: IdentifiedPlace {
            token: candidate.query_token.clone(),
            canonical_name: title_case(&candidate.best_name),
            place_type: candidate.category,
            score: candidate.score,
        },
        quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, score: u8, category: MatchCategory) -> MatchCandidate {
        MatchCandidate {
            query_token: name.to_string(),
            best_name: name.to_lowercase(),
            score,
            category,
        }
    }

    #[test]
    fn test_threshold_boundary() {
        assert!(classify(&candidate("Germny", 92, MatchCategory::Country)).is_some());
        assert!(classify(&candidate("Pariss", 91, MatchCategory::City)).is_none());
        assert!(classify(&candidate("Xyz", 0, MatchCategory::State)).is_none());
    }

    #[test]
    fn test_exact_and_fuzzy_labels() {
        let exact = classify(&candidate("Paris", 100, MatchCategory::City)).unwrap();
        assert_eq!(exact.quality, Some(MatchQuality::Exact));
        assert_eq!(exact.quality.map(|q| q.color()), Some("green"));

        for score in 92..=99 {
            let fuzzy = classify(&candidate("Germny", score, MatchCategory::Country)).unwrap();
            assert_eq!(fuzzy.quality, Some(MatchQuality::Fuzzy));
            assert_eq!(fuzzy.quality.map(|q| q.label()), Some("fuzzy"));
        }
    }

    #[test]
    fn test_place_record() {
        let accepted = classify(&MatchCandidate {
            query_token: "Rio-de-Janeiro".to_string(),
            best_name: "Rio-de-janeiro".to_string(),
            score: 100,
            category: MatchCategory::City,
        })
        .unwrap();

        assert_eq!(
            accepted.place,
            IdentifiedPlace {
                token: "Rio-de-Janeiro".to_string(),
                canonical_name: "Rio-De-Janeiro".to_string(),
                place_type: MatchCategory::City,
                score: 100,
            }
        );
    }

    #[test]
    fn test_multi_word_has_no_quality() {
        let accepted = classify(&candidate("New York", 100, MatchCategory::MultiWord)).unwrap();
        assert_eq!(accepted.quality, None);
        assert_eq!(accepted.place.canonical_name, "New York");
        assert_eq!(accepted.place.place_type.name(), "MultiWord");
    }
}
