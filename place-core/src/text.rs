//! # Normalização de Caixa
//!
//! Funções puras de normalização usadas pelo gazetteer (armazenamento),
//! pelo tagger (tokens capitalizados) e pelo classificador (nome canônico).

/// Primeira letra maiúscula, restante minúsculo.
///
/// `"NEW york"` → `"New york"`. Diferente de [`title_case`], apenas o
/// primeiro caractere da string inteira é promovido.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Cada palavra com a primeira letra maiúscula.
///
/// Uma "palavra" é qualquer sequência de letras: o caractere após algo que
/// não é letra (espaço, hífen, apóstrofo) é promovido.
/// `"rio-de-janeiro"` → `"Rio-De-Janeiro"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// Verdadeiro se o primeiro caractere é maiúsculo.
pub fn starts_uppercase(s: &str) -> bool {
    s.chars().next().map(char::is_uppercase).unwrap_or(false)
}
