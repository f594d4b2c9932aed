//! # Tokenizador para Inglês
//!
//! Responsável por dividir o texto bruto em tokens individuais (palavras, pontuações).
//! Cada token preserva sua posição original no texto (offset) para permitir
//! destacar os lugares encontrados sem alterar o restante do texto.
//!
//! ## Esquema de Tokenização
//!
//! - **Standard**: Fronteiras de palavra Unicode (UAX #29). Preserva abreviações
//!   comuns ("St.", "Mt.", "Dr.") e nomes hifenizados ("Ile-de-France"), e separa
//!   o possessivo ("Paris's" → "Paris", "'s").
//! - **Conservative**: Além do Standard, une em um único token os nomes compostos
//!   conhecidos pelo gazetteer (ex: "New York", "United States").
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use place_core::tokenizer::{tokenize_with_mode, TokenizerMode};
//!
//! let compounds = vec![vec!["new".to_string(), "york".to_string()]];
//!
//! // Modo Standard: "I", "left", "New", "York", "."
//! let tokens = tokenize_with_mode("I left New York.", TokenizerMode::Standard, &compounds);
//! assert_eq!(tokens.len(), 5);
//!
//! // Modo Conservative: "I", "left", "New York", "."
//! let tokens = tokenize_with_mode("I left New York.", TokenizerMode::Conservative, &compounds);
//! assert_eq!(tokens[2].text, "New York");
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto original.
///
/// Mantém a referência exata de sua posição no texto original (`start` e `end`),
/// o que permite destacar exatamente a ocorrência marcada pelo tagger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "Paris", ",", "New York").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Estratégias de Tokenização disponíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// **Padrão**: Separa por espaços e pontuações, mas preserva abreviações comuns.
    #[default]
    Standard,
    /// **Conservador**: Mantém nomes compostos conhecidos juntos (ex: "New York" vira
    /// um único token), que o matcher trata como lugar de múltiplas palavras.
    Conservative,
}

impl FromStr for TokenizerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(TokenizerMode::Standard),
            "conservative" => Ok(TokenizerMode::Conservative),
            other => Err(format!("modo de tokenização desconhecido: {other}")),
        }
    }
}

/// Abreviações comuns em inglês cujo ponto não encerra a sentença
const ABBREVIATIONS: &[&str] = &[
    "Mr", "Mrs", "Ms", "Dr", "Prof", "St", "Mt", "Ft", "Jr", "Sr", "Gen", "Gov",
    "Sen", "Rep", "Capt", "Col", "Lt", "Sgt", "Ave", "Blvd", "Rd", "Co", "Corp",
    "Inc", "Ltd", "vs", "approx", "dept",
];

/// Maior número de palavras de um nome composto
const MAX_COMPOUND_WORDS: usize = 5;

/// Tokeniza um texto usando o algoritmo padrão.
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with_mode(text, TokenizerMode::Standard, &[])
}

/// Tokeniza um texto com o modo especificado.
///
/// `compounds` só é consultado no modo `Conservative`: cada entrada é um nome
/// composto em minúsculas, já dividido em palavras.
pub fn tokenize_with_mode(
    text: &str,
    mode: TokenizerMode,
    compounds: &[Vec<String>],
) -> Vec<Token> {
    let mut tokens = match mode {
        TokenizerMode::Standard => tokenize_standard(text),
        TokenizerMode::Conservative => tokenize_conservative(text, compounds),
    };

    // Re-indexa os tokens
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

fn tokenize_standard(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for (start, segment) in text.split_word_bound_indices() {
        if segment.chars().all(char::is_whitespace) {
            continue;
        }
        let end = start + segment.len();

        // "St" + "." adjacentes → "St."
        if segment == "." {
            if let Some(prev) = tokens.last_mut() {
                if prev.end == start && ABBREVIATIONS.contains(&prev.text.as_str()) {
                    prev.text.push('.');
                    prev.end = end;
                    continue;
                }
            }
        }

        // "Paris's" → "Paris" + "'s"
        match possessive_split(segment) {
            Some(at) => {
                push_word(&mut tokens, &segment[..at], start);
                tokens.push(Token {
                    text: segment[at..].to_string(),
                    start: start + at,
                    end,
                    index: 0,
                });
            }
            None => push_word(&mut tokens, segment, start),
        }
    }

    tokens
}

/// Offset do `'s` final de um segmento com letras antes dele.
fn possessive_split(segment: &str) -> Option<usize> {
    ["'s", "'S", "\u{2019}s", "\u{2019}S"].iter().find_map(|suffix| {
        let at = segment.strip_suffix(suffix)?.len();
        segment[..at].chars().any(char::is_alphabetic).then_some(at)
    })
}

/// Empilha um segmento, unindo palavras ligadas por hífen sem espaço
/// ("Ile" "-" "de" → "Ile-de").
fn push_word(tokens: &mut Vec<Token>, segment: &str, start: usize) {
    let end = start + segment.len();
    let is_word = segment.chars().any(char::is_alphabetic);

    if is_word && tokens.len() >= 2 {
        let n = tokens.len();
        let (left, hyphen) = (&tokens[n - 2], &tokens[n - 1]);
        let joined = hyphen.text == "-"
            && hyphen.end == start
            && left.end == hyphen.start
            && left.text.chars().last().is_some_and(char::is_alphabetic);
        if joined {
            tokens.pop();
            if let Some(left) = tokens.last_mut() {
                left.text.push('-');
                left.text.push_str(segment);
                left.end = end;
            }
            return;
        }
    }

    tokens.push(Token {
        text: segment.to_string(),
        start,
        end,
        index: 0, // será atribuído depois
    });
}

fn tokenize_conservative(text: &str, compounds: &[Vec<String>]) -> Vec<Token> {
    let standard = tokenize_standard(text);
    if standard.is_empty() || compounds.is_empty() {
        return standard;
    }

    let mut merged = Vec::new();
    let mut i = 0;

    while i < standard.len() {
        // Tenta encontrar o maior nome composto começando em i
        let mut best_match_len = 0;

        for window in 2..=MAX_COMPOUND_WORDS {
            if i + window > standard.len() {
                break;
            }

            let candidate_slice = &standard[i..i + window];
            // Apenas espaços entre os tokens no texto original
            let is_adjacent = candidate_slice
                .windows(2)
                .all(|w| w[1].start > w[0].end && text[w[0].end..w[1].start].trim().is_empty());
            if !is_adjacent {
                break;
            }

            let matches = compounds.iter().any(|parts| {
                parts.len() == window
                    && parts
                        .iter()
                        .zip(candidate_slice)
                        .all(|(part, token)| token.text.to_lowercase() == *part)
            });
            if matches {
                best_match_len = window;
            }
        }

        if best_match_len > 0 {
            // Cria token mergeado
            let first = &standard[i];
            let last = &standard[i + best_match_len - 1];
            merged.push(Token {
                text: text[first.start..last.end].to_string(),
                start: first.start,
                end: last.end,
                index: 0,
            });
            i += best_match_len;
        } else {
            merged.push(standard[i].clone());
            i += 1;
        }
    }

    merged
}
