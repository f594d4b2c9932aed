//! # Similaridade Fuzzy (0–100)
//!
//! Mede a proximidade entre duas strings tolerando erros de digitação.
//! Todas as medidas comparam as strings em minúsculas e garantem:
//!
//! - `score(x, x) == 100`
//! - `score(a, b) == score(b, a)`
//! - o valor não cresce quando a distância de edição aumenta em relação ao tamanho.
//!
//! ## Ratio (padrão)
//!
//! Distância de inserção/remoção normalizada, a razão "fuzzy" clássica:
//!
//! $$ \text{ratio} = \frac{2 \cdot LCS(a, b)}{|a| + |b|} $$
//!
//! onde `LCS` é a maior subsequência comum. Ex: `"germany"` × `"germny"` →
//! `2·6 / 13 = 0.923` → **92**.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Medida de similaridade usada pelo matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    /// Razão de inserção/remoção (LCS). Ver [`similarity`].
    #[default]
    Ratio,
    /// Levenshtein normalizado pelo maior comprimento (`strsim`).
    Levenshtein,
    /// Jaro-Winkler (`strsim`); favorece prefixos em comum.
    JaroWinkler,
}

impl Scorer {
    /// Pontua `a` contra `b` em 0..=100.
    pub fn score(&self, a: &str, b: &str) -> u8 {
        match self {
            Scorer::Ratio => similarity(a, b),
            Scorer::Levenshtein => {
                to_percent(strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()))
            }
            Scorer::JaroWinkler => {
                to_percent(strsim::jaro_winkler(&a.to_lowercase(), &b.to_lowercase()))
            }
        }
    }
}

impl FromStr for Scorer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ratio" => Ok(Scorer::Ratio),
            "levenshtein" => Ok(Scorer::Levenshtein),
            "jaro_winkler" => Ok(Scorer::JaroWinkler),
            other => Err(format!("medida de similaridade desconhecida: {other}")),
        }
    }
}

/// Razão fuzzy insensível a caixa, arredondada para o inteiro mais próximo.
///
/// Duas strings vazias são idênticas (100); apenas uma vazia pontua 0.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let b: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let lcs = longest_common_subsequence(&a, &b);
    to_percent(2.0 * lcs as f64 / total as f64)
}

fn to_percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Comprimento da maior subsequência comum (programação dinâmica, duas linhas).
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_100() {
        assert_eq!(similarity("Paris", "paris"), 100);
        assert_eq!(similarity("", ""), 100);
        for scorer in [Scorer::Ratio, Scorer::Levenshtein, Scorer::JaroWinkler] {
            assert_eq!(scorer.score("Lisbon", "LISBON"), 100);
        }
    }

    #[test]
    fn test_known_ratios() {
        // 2·6 / 13 = 0.923
        assert_eq!(similarity("germany", "germny"), 92);
        // 2·5 / 11 = 0.909
        assert_eq!(similarity("paris", "pariss"), 91);
        // 2·7 / 15 = 0.933
        assert_eq!(similarity("pakistan", "pakistn"), 93);
        assert_eq!(similarity("paris", "tokyo"), 0);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [("brasil", "brazil"), ("new york", "newark"), ("oslo", "")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
            assert_eq!(Scorer::Levenshtein.score(a, b), Scorer::Levenshtein.score(b, a));
        }
    }

    #[test]
    fn test_monotonic_with_edits() {
        let base = "australia";
        let one = similarity(base, "australi");
        let two = similarity(base, "austral");
        let three = similarity(base, "austra");
        assert!(one >= two && two >= three);
        assert!(one < 100);
    }

    #[test]
    fn test_scorer_from_str() {
        assert_eq!("jaro_winkler".parse::<Scorer>(), Ok(Scorer::JaroWinkler));
        assert!("cosine".parse::<Scorer>().is_err());
    }
}
