//! # Etiquetagem Morfossintática (POS Tagging)
//!
//! O motor só tenta casar com o gazetteer os tokens marcados como **nome próprio**.
//! Este módulo define o vocabulário de tags (subconjunto do Penn Treebank), o
//! contrato [`PosTagger`] consumido pelo pipeline e um tagger padrão baseado em
//! léxico e heurísticas ortográficas.
//!
//! ## Tags
//!
//! | Tag   | Significado          | Exemplos                    |
//! |-------|----------------------|-----------------------------|
//! | NNP   | Nome próprio         | Paris, Brazil, New York     |
//! | NN    | Substantivo comum    | spring, city                |
//! | NNS   | Substantivo plural   | cities                      |
//! | PRP   | Pronome              | I, they                     |
//! | POS   | Possessivo           | 's                          |
//! | DT    | Determinante         | the, a                      |
//! | IN    | Preposição           | in, from                    |
//! | CD    | Número               | 1999, 3.5                   |
//! | .     | Pontuação            | . , !                       |
//!
//! Apenas `NNP` dispara a busca por lugares.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::{capitalize, starts_uppercase};
use crate::tokenizer::{tokenize_with_mode, Token, TokenizerMode};

/// Categoria gramatical atribuída a um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    /// **NNP**: único valor que dispara a busca no gazetteer.
    ProperNoun,
    Noun,
    PluralNoun,
    Verb,
    PastVerb,
    Gerund,
    Modal,
    Adjective,
    Adverb,
    Determiner,
    Preposition,
    Pronoun,
    PossessivePronoun,
    /// **POS**: o `'s` separado pelo tokenizador
    PossessiveEnding,
    Conjunction,
    WhWord,
    Number,
    Punctuation,
}

impl PosTag {
    /// Representação Penn Treebank (ex: "NNP", "DT", ".")
    pub fn label(&self) -> &'static str {
        match self {
            PosTag::ProperNoun => "NNP",
            PosTag::Noun => "NN",
            PosTag::PluralNoun => "NNS",
            PosTag::Verb => "VB",
            PosTag::PastVerb => "VBD",
            PosTag::Gerund => "VBG",
            PosTag::Modal => "MD",
            PosTag::Adjective => "JJ",
            PosTag::Adverb => "RB",
            PosTag::Determiner => "DT",
            PosTag::Preposition => "IN",
            PosTag::Pronoun => "PRP",
            PosTag::PossessivePronoun => "PRP$",
            PosTag::PossessiveEnding => "POS",
            PosTag::Conjunction => "CC",
            PosTag::WhWord => "WRB",
            PosTag::Number => "CD",
            PosTag::Punctuation => ".",
        }
    }

    /// Parseia a partir do rótulo Penn (ex: "NNP" → Some(ProperNoun))
    pub fn from_label(s: &str) -> Option<Self> {
        let tag = match s {
            "NNP" => PosTag::ProperNoun,
            "NN" => PosTag::Noun,
            "NNS" => PosTag::PluralNoun,
            "VB" => PosTag::Verb,
            "VBD" => PosTag::PastVerb,
            "VBG" => PosTag::Gerund,
            "MD" => PosTag::Modal,
            "JJ" => PosTag::Adjective,
            "RB" => PosTag::Adverb,
            "DT" => PosTag::Determiner,
            "IN" => PosTag::Preposition,
            "PRP" => PosTag::Pronoun,
            "PRP$" => PosTag::PossessivePronoun,
            "POS" => PosTag::PossessiveEnding,
            "CC" => PosTag::Conjunction,
            "WRB" => PosTag::WhWord,
            "CD" => PosTag::Number,
            "." => PosTag::Punctuation,
            _ => return None,
        };
        Some(tag)
    }

    pub fn is_proper_noun(&self) -> bool {
        matches!(self, PosTag::ProperNoun)
    }
}

impl std::fmt::Display for PosTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Um token com sua categoria gramatical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: Token,
    pub tag: PosTag,
}

impl TaggedToken {
    pub fn new(text: &str, start: usize, index: usize, tag: PosTag) -> Self {
        Self {
            token: Token {
                text: text.to_string(),
                start,
                end: start + text.len(),
                index,
            },
            tag,
        }
    }
}

/// Capacidade de tokenizar e etiquetar um texto.
///
/// O pipeline depende apenas deste contrato; testes podem fornecer sequências
/// de tokens montadas à mão.
pub trait PosTagger: Send + Sync {
    /// Tokens em ordem, cada um com sua tag. `start`/`end` apontam para o texto recebido.
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\d+([.,]\d+)*(st|nd|rd|th|s)?$").expect("regex de número válida")
});

/// Palavras de classe fechada (consultadas em minúsculas)
#[rustfmt::skip]
const CLOSED_CLASS: &[(&str, PosTag)] = &[
    ("the", PosTag::Determiner), ("a", PosTag::Determiner), ("an", PosTag::Determiner),
    ("this", PosTag::Determiner), ("that", PosTag::Determiner), ("these", PosTag::Determiner),
    ("those", PosTag::Determiner), ("every", PosTag::Determiner), ("each", PosTag::Determiner),
    ("some", PosTag::Determiner), ("any", PosTag::Determiner), ("no", PosTag::Determiner),
    ("all", PosTag::Determiner), ("both", PosTag::Determiner),
    ("i", PosTag::Pronoun), ("you", PosTag::Pronoun), ("he", PosTag::Pronoun),
    ("she", PosTag::Pronoun), ("it", PosTag::Pronoun), ("we", PosTag::Pronoun),
    ("they", PosTag::Pronoun), ("me", PosTag::Pronoun), ("him", PosTag::Pronoun),
    ("us", PosTag::Pronoun), ("them", PosTag::Pronoun),
    ("my", PosTag::PossessivePronoun), ("your", PosTag::PossessivePronoun),
    ("his", PosTag::PossessivePronoun), ("her", PosTag::PossessivePronoun),
    ("its", PosTag::PossessivePronoun), ("our", PosTag::PossessivePronoun),
    ("their", PosTag::PossessivePronoun),
    ("'s", PosTag::PossessiveEnding), ("\u{2019}s", PosTag::PossessiveEnding),
    ("in", PosTag::Preposition), ("on", PosTag::Preposition), ("at", PosTag::Preposition),
    ("to", PosTag::Preposition), ("from", PosTag::Preposition), ("of", PosTag::Preposition),
    ("with", PosTag::Preposition), ("by", PosTag::Preposition), ("for", PosTag::Preposition),
    ("about", PosTag::Preposition), ("into", PosTag::Preposition), ("over", PosTag::Preposition),
    ("under", PosTag::Preposition), ("through", PosTag::Preposition), ("during", PosTag::Preposition),
    ("near", PosTag::Preposition), ("across", PosTag::Preposition), ("between", PosTag::Preposition),
    ("after", PosTag::Preposition), ("before", PosTag::Preposition), ("since", PosTag::Preposition),
    ("via", PosTag::Preposition), ("toward", PosTag::Preposition), ("towards", PosTag::Preposition),
    ("and", PosTag::Conjunction), ("or", PosTag::Conjunction), ("but", PosTag::Conjunction),
    ("nor", PosTag::Conjunction), ("so", PosTag::Conjunction), ("yet", PosTag::Conjunction),
    ("is", PosTag::Verb), ("are", PosTag::Verb), ("was", PosTag::PastVerb),
    ("were", PosTag::PastVerb), ("be", PosTag::Verb), ("been", PosTag::Verb),
    ("am", PosTag::Verb), ("do", PosTag::Verb), ("does", PosTag::Verb),
    ("did", PosTag::PastVerb), ("have", PosTag::Verb), ("has", PosTag::Verb),
    ("had", PosTag::PastVerb), ("go", PosTag::Verb), ("went", PosTag::PastVerb),
    ("love", PosTag::Verb), ("visit", PosTag::Verb), ("live", PosTag::Verb),
    ("will", PosTag::Modal), ("would", PosTag::Modal), ("can", PosTag::Modal),
    ("could", PosTag::Modal), ("should", PosTag::Modal), ("may", PosTag::Modal),
    ("might", PosTag::Modal), ("must", PosTag::Modal), ("shall", PosTag::Modal),
    ("very", PosTag::Adverb), ("also", PosTag::Adverb), ("not", PosTag::Adverb),
    ("too", PosTag::Adverb), ("here", PosTag::Adverb), ("there", PosTag::Adverb),
    ("then", PosTag::Adverb), ("now", PosTag::Adverb), ("never", PosTag::Adverb),
    ("always", PosTag::Adverb), ("yesterday", PosTag::Adverb), ("today", PosTag::Adverb),
    ("tomorrow", PosTag::Adverb),
    ("what", PosTag::WhWord), ("where", PosTag::WhWord), ("when", PosTag::WhWord),
    ("who", PosTag::WhWord), ("which", PosTag::WhWord), ("why", PosTag::WhWord),
    ("how", PosTag::WhWord),
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "ic", "less", "ish"];

/// Tagger padrão: léxico de classe fechada + capitalização + sufixos.
///
/// Regras, na ordem:
/// 1. Token sem letras nem dígitos → pontuação.
/// 2. Token com espaço interno (nome composto do modo conservador) → `NNP` se capitalizado.
/// 3. Padrão numérico → `CD`.
/// 4. Siglas em maiúsculas com 2+ letras (ex: "US", "UK") → `NNP`.
/// 5. Léxico de classe fechada.
/// 6. Inicia com maiúscula → `NNP`, exceto no início de sentença quando o sufixo
///    indica advérbio/verbo (ex: "Finally", "Walking").
/// 7. Sufixos: `-ly` RB, `-ing` VBG, `-ed` VBD, adjetivais JJ, `-s` NNS, senão NN.
pub struct LexiconTagger {
    mode: TokenizerMode,
    compounds: Vec<Vec<String>>,
    capitalize_tokens: bool,
    lexicon: HashMap<&'static str, PosTag>,
}

impl LexiconTagger {
    pub fn new() -> Self {
        Self {
            mode: TokenizerMode::Standard,
            compounds: Vec::new(),
            capitalize_tokens: false,
            lexicon: CLOSED_CLASS.iter().copied().collect(),
        }
    }

    /// Ativa o modo de tokenização conservador com os nomes compostos dados.
    pub fn with_compounds(mut self, mode: TokenizerMode, compounds: Vec<Vec<String>>) -> Self {
        self.mode = mode;
        self.compounds = compounds;
        self
    }

    /// Capitaliza cada token antes de etiquetar (a posição no texto não muda).
    pub fn with_capitalized_tokens(mut self, capitalize_tokens: bool) -> Self {
        self.capitalize_tokens = capitalize_tokens;
        self
    }

    fn tag_word(&self, word: &str, sentence_start: bool) -> PosTag {
        if !word.chars().any(char::is_alphanumeric) {
            return PosTag::Punctuation;
        }
        if word.contains(char::is_whitespace) {
            return if starts_uppercase(word) {
                PosTag::ProperNoun
            } else {
                PosTag::Noun
            };
        }
        if NUMBER.is_match(word) {
            return PosTag::Number;
        }

        let letters = word.chars().filter(|c| c.is_alphabetic()).count();
        if letters >= 2 && word.chars().all(|c| !c.is_lowercase()) {
            return PosTag::ProperNoun;
        }

        let lower = word.to_lowercase();
        if let Some(tag) = self.lexicon.get(lower.as_str()) {
            return *tag;
        }

        let by_suffix = suffix_tag(&lower);
        if starts_uppercase(word) {
            let non_noun_suffix = matches!(
                by_suffix,
                PosTag::Adverb | PosTag::Gerund | PosTag::PastVerb
            );
            if sentence_start && non_noun_suffix {
                return by_suffix;
            }
            return PosTag::ProperNoun;
        }
        by_suffix
    }
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let tokens = tokenize_with_mode(text, self.mode, &self.compounds);
        let mut tagged = Vec::with_capacity(tokens.len());
        let mut sentence_start = true;

        for mut token in tokens {
            if self.capitalize_tokens {
                token.text = capitalize(&token.text);
            }
            let tag = self.tag_word(&token.text, sentence_start);
            sentence_start = matches!(token.text.as_str(), "." | "!" | "?");
            tagged.push(TaggedToken { token, tag });
        }
        tagged
    }
}

fn suffix_tag(lower: &str) -> PosTag {
    if lower.len() > 4 && lower.ends_with("ly") {
        PosTag::Adverb
    } else if lower.len() > 6 && lower.ends_with("ing") {
        PosTag::Gerund
    } else if lower.len() > 4 && lower.ends_with("ed") {
        PosTag::PastVerb
    } else if ADJECTIVE_SUFFIXES
        .iter()
        .any(|suffix| lower.len() > suffix.len() + 2 && lower.ends_with(suffix))
    {
        PosTag::Adjective
    } else if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
        PosTag::PluralNoun
    } else {
        PosTag::Noun
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(tagged: &[TaggedToken]) -> Vec<(&str, &str)> {
        tagged
            .iter()
            .map(|t| (t.token.text.as_str(), t.tag.label()))
            .collect()
    }

    #[test]
    fn test_tag_labels_roundtrip() {
        assert_eq!(PosTag::ProperNoun.label(), "NNP");
        assert_eq!(PosTag::from_label("NNP"), Some(PosTag::ProperNoun));
        assert_eq!(PosTag::from_label("PRP$"), Some(PosTag::PossessivePronoun));
        assert_eq!(PosTag::from_label("XYZ"), None);
        assert!(!PosTag::Noun.is_proper_noun());
    }

    #[test]
    fn test_simple_sentence() {
        let tagger = LexiconTagger::new();
        let tagged = tagger.tag("I love Paris in the spring.");
        assert_eq!(
            tags(&tagged),
            vec![
                ("I", "PRP"),
                ("love", "VB"),
                ("Paris", "NNP"),
                ("in", "IN"),
                ("the", "DT"),
                ("spring", "NN"),
                (".", "."),
            ]
        );
    }

    #[test]
    fn test_sentence_initial_proper_noun() {
        let tagger = LexiconTagger::new();
        let tagged = tagger.tag("Paris is lovely. Paris is also historic.");
        let proper: Vec<usize> = tagged
            .iter()
            .filter(|t| t.tag.is_proper_noun())
            .map(|t| t.token.index)
            .collect();
        assert_eq!(proper, vec![0, 4]);
        assert_eq!(tagged[2].tag, PosTag::Adverb);
        assert_eq!(tagged[7].tag, PosTag::Adjective);
    }

    #[test]
    fn test_sentence_initial_adverb_is_not_proper() {
        let tagger = LexiconTagger::new();
        let tagged = tagger.tag("Finally we reached Lisbon.");
        assert_eq!(tagged[0].tag, PosTag::Adverb);
        assert_eq!(tagged[3].tag, PosTag::ProperNoun);
    }

    #[test]
    fn test_possessive_and_sentence_end_after_no() {
        let tagger = LexiconTagger::new();
        let tagged = tagger.tag("She said no. Finally we saw Paris's river.");
        assert_eq!(
            tags(&tagged),
            vec![
                ("She", "PRP"),
                ("said", "NN"),
                ("no", "DT"),
                (".", "."),
                ("Finally", "RB"),
                ("we", "PRP"),
                ("saw", "NN"),
                ("Paris", "NNP"),
                ("'s", "POS"),
                ("river", "NN"),
                (".", "."),
            ]
        );
    }

    #[test]
    fn test_acronyms_and_numbers() {
        let tagger = LexiconTagger::new();
        let tagged = tagger.tag("The US had 330 states in 1999s");
        assert_eq!(tagged[1].tag, PosTag::ProperNoun);
        assert_eq!(tagged[3].tag, PosTag::Number);
        assert_eq!(tagged[6].tag, PosTag::Number);
    }

    #[test]
    fn test_capitalized_tokens_keep_offsets() {
        let tagger = LexiconTagger::new().with_capitalized_tokens(true);
        let text = "we flew to tokyo";
        let tagged = tagger.tag(text);
        let tokyo = &tagged[3];
        assert_eq!(tokyo.token.text, "Tokyo");
        assert_eq!(tokyo.tag, PosTag::ProperNoun);
        assert_eq!(&text[tokyo.token.start..tokyo.token.end], "tokyo");
        // Palavras de classe fechada continuam reconhecidas mesmo capitalizadas
        assert_eq!(tagged[0].tag, PosTag::Pronoun);
    }

    #[test]
    fn test_compound_token_is_proper_noun() {
        let tagger = LexiconTagger::new().with_compounds(
            TokenizerMode::Conservative,
            vec![vec!["new".to_string(), "york".to_string()]],
        );
        let tagged = tagger.tag("They live in New York.");
        assert_eq!(tagged[3].token.text, "New York");
        assert_eq!(tagged[3].tag, PosTag::ProperNoun);
    }

    #[test]
    fn test_empty_text() {
        assert!(LexiconTagger::new().tag("").is_empty());
    }
}
