//! # Candidate Matcher — Melhor Entrada do Gazetteer por Token
//!
//! Para cada token marcado como nome próprio:
//!
//! 1. Pontua o token (em minúsculas) contra **todos** os nomes de cada categoria,
//!    na ordem fixa `Country → State → City`, guardando o melhor de cada uma.
//! 2. Se o token tem espaço interno (ex: "New York"), acrescenta um quarto
//!    candidato sintético `MultiWord` com pontuação 100, sem consulta.
//! 3. Escolhe o candidato de maior pontuação. Empates são decididos pela
//!    posição: o primeiro na ordem acima vence.
//!
//! Não há caminho de falha: uma categoria vazia produz `("", 0)` e o
//! classificador rejeita.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::gazetteer::{Gazetteer, PlaceCategory};
use crate::similarity::Scorer;

/// Categoria de um candidato: uma das tabelas ou o candidato sintético de múltiplas palavras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchCategory {
    Country,
    State,
    City,
    MultiWord,
}

impl MatchCategory {
    pub fn name(&self) -> &'static str {
        match self {
            MatchCategory::Country => "Country",
            MatchCategory::State => "State",
            MatchCategory::City => "City",
            MatchCategory::MultiWord => "MultiWord",
        }
    }
}

impl From<PlaceCategory> for MatchCategory {
    fn from(category: PlaceCategory) -> Self {
        match category {
            PlaceCategory::Country => MatchCategory::Country,
            PlaceCategory::State => MatchCategory::State,
            PlaceCategory::City => MatchCategory::City,
        }
    }
}

impl std::fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Melhor correspondência de um token em uma categoria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Token como recebido do tagger
    pub query_token: String,
    /// Nome do gazetteer (ou o próprio token em minúsculas, para `MultiWord`)
    pub best_name: String,
    /// Similaridade 0..=100
    pub score: u8,
    pub category: MatchCategory,
}

/// Busca fuzzy sobre um gazetteer compartilhado.
pub struct CandidateMatcher<'g> {
    gazetteer: &'g Gazetteer,
    scorer: Scorer,
}

impl<'g> CandidateMatcher<'g> {
    pub fn new(gazetteer: &'g Gazetteer, scorer: Scorer) -> Self {
        Self { gazetteer, scorer }
    }

    /// Um candidato por categoria (3), mais o `MultiWord` quando o token tem espaço (4).
    pub fn candidates(&self, token: &str) -> Vec<MatchCandidate> {
        let query = token.to_lowercase();

        let mut candidates: Vec<MatchCandidate> = PlaceCategory::ALL
            .iter()
            .map(|&category| {
                let (best_name, score) = self.best_in_category(&query, category);
                MatchCandidate {
                    query_token: token.to_string(),
                    best_name,
                    score,
                    category: category.into(),
                }
            })
            .collect();

        if token.contains(char::is_whitespace) {
            candidates.push(MatchCandidate {
                query_token: token.to_string(),
                best_name: query,
                score: 100,
                category: MatchCategory::MultiWord,
            });
        }
        candidates
    }

    /// O candidato de maior pontuação; em empate, o primeiro na ordem de avaliação.
    pub fn best_match(&self, token: &str) -> MatchCandidate {
        select_best(self.candidates(token))
    }

    fn best_in_category(&self, query: &str, category: PlaceCategory) -> (String, u8) {
        let names = self.gazetteer.names_in_category(category);

        // (índice, score): maior score vence, empate fica com o menor índice
        let best = names
            .par_iter()
            .enumerate()
            .map(|(i, name)| (i, self.scorer.score(query, name)))
            .reduce_with(|a, b| {
                if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
                    b
                } else {
                    a
                }
            });

        match best {
            Some((i, score)) => (names[i].clone(), score),
            None => (String::new(), 0),
        }
    }
}

/// Primeiro máximo da sequência. A sequência nunca é vazia quando vem de
/// [`CandidateMatcher::candidates`].
pub fn select_best(candidates: Vec<MatchCandidate>) -> MatchCandidate {
    let mut iter = candidates.into_iter();
    let mut best = iter.next().unwrap_or_else(|| MatchCandidate {
        query_token: String::new(),
        best_name: String::new(),
        score: 0,
        category: MatchCategory::Country,
    });
    for candidate in iter {
        if candidate.score > best.score {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::GazetteerRow;

    fn gazetteer() -> Gazetteer {
        Gazetteer::from_rows(vec![
            GazetteerRow::new("France", "Ile-de-france", "Paris"),
            GazetteerRow::new("Germany", "Bavaria", "Munich"),
            GazetteerRow::new("Georgia", "Tbilisi", "Tbilisi"),
            GazetteerRow::new("United States", "Georgia", "Atlanta"),
        ])
    }

    #[test]
    fn test_exact_city() {
        let gazetteer = gazetteer();
        let matcher = CandidateMatcher::new(&gazetteer, Scorer::Ratio);
        let best = matcher.best_match("Paris");
        assert_eq!(best.category, MatchCategory::City);
        assert_eq!(best.best_name, "Paris");
        assert_eq!(best.score, 100);
        assert_eq!(best.query_token, "Paris");
    }

    #[test]
    fn test_one_candidate_per_category() {
        let gazetteer = gazetteer();
        let matcher = CandidateMatcher::new(&gazetteer, Scorer::Ratio);
        let candidates = matcher.candidates("Munich");
        let categories: Vec<MatchCategory> = candidates.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            vec![MatchCategory::Country, MatchCategory::State, MatchCategory::City]
        );
    }

    #[test]
    fn test_tie_prefers_country() {
        // "Georgia" é país e estado com a mesma pontuação
        let gazetteer = gazetteer();
        let matcher = CandidateMatcher::new(&gazetteer, Scorer::Ratio);
        let best = matcher.best_match("Georgia");
        assert_eq!(best.score, 100);
        assert_eq!(best.category, MatchCategory::Country);
    }

    #[test]
    fn test_tie_within_category_keeps_first_name() {
        let gazetteer = Gazetteer::from_rows(vec![
            GazetteerRow::new("Mali", "", "Bali"),
            GazetteerRow::new("Chile", "", "Cali"),
        ]);
        let matcher = CandidateMatcher::new(&gazetteer, Scorer::Ratio);
        // "Xali" pontua 75 contra Bali e Cali
        let candidates = matcher.candidates("Xali");
        assert_eq!(candidates[2].best_name, "Bali");
        assert_eq!(candidates[2].score, 75);
    }

    #[test]
    fn test_multi_word_override() {
        let matcher_gazetteer = Gazetteer::default();
        let matcher = CandidateMatcher::new(&matcher_gazetteer, Scorer::Ratio);
        let candidates = matcher.candidates("New York");
        assert_eq!(candidates.len(), 4);

        let best = select_best(candidates);
        assert_eq!(best.category, MatchCategory::MultiWord);
        assert_eq!(best.score, 100);
        assert_eq!(best.best_name, "new york");
    }

    #[test]
    fn test_exact_match_beats_multi_word_on_tie() {
        let gazetteer = Gazetteer::from_rows(vec![GazetteerRow::new(
            "United States",
            "New York",
            "New York",
        )]);
        let matcher = CandidateMatcher::new(&gazetteer, Scorer::Ratio);
        let best = matcher.best_match("New York");
        assert_eq!(best.category, MatchCategory::State);
        assert_eq!(best.best_name, "New york");
    }

    #[test]
    fn test_empty_gazetteer_scores_zero() {
        let gazetteer = Gazetteer::default();
        let matcher = CandidateMatcher::new(&gazetteer, Scorer::Ratio);
        let best = matcher.best_match("Paris");
        assert_eq!(best.score, 0);
        assert_eq!(best.best_name, "");
        assert_eq!(best.category, MatchCategory::Country);
    }

    #[test]
    fn test_fuzzy_match() {
        let gazetteer = gazetteer();
        let matcher = CandidateMatcher::new(&gazetteer, Scorer::Ratio);
        let best = matcher.best_match("Germny");
        assert_eq!(best.category, MatchCategory::Country);
        assert_eq!(best.best_name, "Germany");
        assert_eq!(best.score, 92);
    }
}
