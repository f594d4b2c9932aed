//! # Destaque de Lugares no Texto
//!
//! Produz uma cópia do texto de entrada com os lugares aceitos (de uma única
//! palavra) marcados pela qualidade da correspondência:
//!
//! ```text
//! I love <span style="color: green">Paris</span> in the spring.
//! ```
//!
//! O texto é mantido como uma sequência de [`Segment`]s (trechos simples ou
//! marcados) com seus offsets no texto original, de modo que a interface possa
//! renderizar com escape de HTML e a API possa devolver a versão bruta.
//!
//! ## Modos
//!
//! - **Spans** (padrão): marca exatamente a ocorrência produzida pelo tagger,
//!   pelos offsets de byte do token.
//! - **ReplaceAll**: marca toda ocorrência literal da string do token no texto
//!   ainda não marcado, já na primeira classificação. Se o tagger alterou a
//!   caixa do token (ex: tokens capitalizados), a string pode não existir no
//!   texto original e nada é marcado.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classifier::MatchQuality;
use crate::tokenizer::Token;

/// Estratégia de localização das ocorrências a marcar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMode {
    #[default]
    Spans,
    ReplaceAll,
}

impl FromStr for HighlightMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spans" => Ok(HighlightMode::Spans),
            "replace_all" => Ok(HighlightMode::ReplaceAll),
            other => Err(format!("modo de destaque desconhecido: {other}")),
        }
    }
}

/// Trecho contíguo do texto original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    /// Offset de byte no texto original
    pub start: usize,
    /// `Some` quando o trecho é um lugar marcado
    pub quality: Option<MatchQuality>,
}

impl Segment {
    fn plain(text: &str, start: usize) -> Self {
        Self {
            text: text.to_string(),
            start,
            quality: None,
        }
    }

    fn marked(text: &str, start: usize, quality: MatchQuality) -> Self {
        Self {
            text: text.to_string(),
            start,
            quality: Some(quality),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn is_marked(&self) -> bool {
        self.quality.is_some()
    }

    /// Cor do marcador; vazio para trechos simples
    pub fn color(&self) -> &'static str {
        self.quality.map(|q| q.color()).unwrap_or("")
    }
}

/// Texto de entrada com zero ou mais trechos marcados.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightedText {
    segments: Vec<Segment>,
}

impl HighlightedText {
    /// Texto sem nenhuma marcação.
    pub fn new(text: &str) -> Self {
        let segments = if text.is_empty() {
            vec![]
        } else {
            vec![Segment::plain(text, 0)]
        };
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Trechos marcados, em ordem de posição
    pub fn marked(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_marked())
    }

    /// O texto original, sem marcadores.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Marca um token aceito segundo o modo. Retorna quantos trechos foram marcados.
    pub fn apply(&mut self, mode: HighlightMode, token: &Token, quality: MatchQuality) -> usize {
        match mode {
            HighlightMode::Spans => usize::from(self.mark_span(token.start, token.end, quality)),
            HighlightMode::ReplaceAll => self.mark_all(&token.text, quality),
        }
    }

    /// Marca `[start, end)` se o intervalo estiver inteiro dentro de um trecho
    /// ainda não marcado. Intervalos sobrepostos a marcações existentes são ignorados.
    pub fn mark_span(&mut self, start: usize, end: usize, quality: MatchQuality) -> bool {
        if start >= end {
            return false;
        }
        let Some(i) = self
            .segments
            .iter()
            .position(|s| !s.is_marked() && s.start <= start && end <= s.end())
        else {
            return false;
        };

        let segment = &self.segments[i];
        let (from, to) = (start - segment.start, end - segment.start);
        if !segment.text.is_char_boundary(from) || !segment.text.is_char_boundary(to) {
            return false;
        }

        let mut replacement = Vec::with_capacity(3);
        if from > 0 {
            replacement.push(Segment::plain(&segment.text[..from], segment.start));
        }
        replacement.push(Segment::marked(&segment.text[from..to], start, quality));
        if to < segment.text.len() {
            replacement.push(Segment::plain(&segment.text[to..], end));
        }

        self.segments.splice(i..=i, replacement);
        true
    }

    /// Marca toda ocorrência de `needle` nos trechos ainda não marcados.
    pub fn mark_all(&mut self, needle: &str, quality: MatchQuality) -> usize {
        if needle.is_empty() {
            return 0;
        }

        let mut marked = 0;
        let mut segments = Vec::with_capacity(self.segments.len());
        for segment in self.segments.drain(..) {
            if segment.is_marked() {
                segments.push(segment);
                continue;
            }

            let mut cursor = 0;
            for (offset, found) in segment.text.match_indices(needle) {
                if offset > cursor {
                    segments.push(Segment::plain(
                        &segment.text[cursor..offset],
                        segment.start + cursor,
                    ));
                }
                segments.push(Segment::marked(found, segment.start + offset, quality));
                marked += 1;
                cursor = offset + found.len();
            }
            if cursor < segment.text.len() {
                segments.push(Segment::plain(&segment.text[cursor..], segment.start + cursor));
            }
        }
        self.segments = segments;
        marked
    }
}

impl std::fmt::Display for HighlightedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            match segment.quality {
                Some(quality) => write!(
                    f,
                    "<span style=\"color: {}\">{}</span>",
                    quality.color(),
                    segment.text
                )?,
                None => f.write_str(&segment.text)?,
            }
        }
        Ok(())
    }
}
