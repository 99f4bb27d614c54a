//! Bundled polarity lexicon.
//!
//! A small Spanish/English word list with valences in `[-1, 1]`, plus
//! negators and intensifiers. The polarity engines in
//! [`sentiment`](super::sentiment) read from it; they differ only in how the
//! matched scores are combined.

use std::collections::HashMap;

/// How many tokens after a negator still get their sign flipped.
const NEGATION_WINDOW: usize = 3;

/// Word valences, negators and intensifiers.
pub struct SentimentLexicon {
    words: HashMap<String, f64>,
    negations: Vec<String>,
    intensifiers: HashMap<String, f64>,
}

/// Scores matched in one text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexiconMatch {
    /// Adjusted score of every matched word, in text order.
    pub scores: Vec<f64>,
    /// The matched words themselves.
    pub words: Vec<String>,
}

impl LexiconMatch {
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.scores.iter().sum()
    }
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentLexicon {
    /// Creates the bundled lexicon.
    pub fn new() -> Self {
        let entries: &[(&str, f64)] = &[
            // Spanish, positive
            ("gracias", 0.5),
            ("agradezco", 0.5),
            ("agradecido", 0.5),
            ("agradecida", 0.5),
            ("excelente", 0.8),
            ("bueno", 0.5),
            ("buena", 0.5),
            ("buen", 0.5),
            ("genial", 0.7),
            ("perfecto", 0.7),
            ("feliz", 0.7),
            ("felicitaciones", 0.8),
            ("felicidades", 0.8),
            ("éxito", 0.7),
            ("logro", 0.6),
            ("aprobado", 0.5),
            ("contento", 0.6),
            ("encantado", 0.6),
            ("estupendo", 0.7),
            ("magnífico", 0.8),
            ("fantástico", 0.8),
            ("correcto", 0.3),
            ("mejor", 0.4),
            ("satisfecho", 0.5),
            ("favorable", 0.5),
            ("amable", 0.5),
            // Spanish, negative
            ("problema", -0.5),
            ("problemas", -0.5),
            ("error", -0.5),
            ("errores", -0.5),
            ("falla", -0.6),
            ("fallo", -0.6),
            ("mal", -0.5),
            ("malo", -0.6),
            ("mala", -0.6),
            ("pésimo", -0.9),
            ("terrible", -0.8),
            ("retraso", -0.5),
            ("atrasado", -0.5),
            ("queja", -0.6),
            ("reclamo", -0.5),
            ("molesto", -0.6),
            ("lamentablemente", -0.5),
            ("preocupa", -0.5),
            ("preocupación", -0.5),
            ("grave", -0.6),
            ("incumplimiento", -0.7),
            ("cancelado", -0.4),
            ("rechazado", -0.5),
            ("inaceptable", -0.8),
            ("decepcionado", -0.7),
            ("multa", -0.5),
            ("sanción", -0.6),
            // English
            ("thanks", 0.5),
            ("thank", 0.5),
            ("great", 0.7),
            ("good", 0.5),
            ("excellent", 0.8),
            ("happy", 0.7),
            ("perfect", 0.7),
            ("appreciate", 0.5),
            ("congratulations", 0.8),
            ("success", 0.7),
            ("bad", -0.6),
            ("problem", -0.5),
            ("issue", -0.4),
            ("failed", -0.6),
            ("fail", -0.6),
            ("delay", -0.5),
            ("late", -0.4),
            ("complaint", -0.6),
            ("angry", -0.7),
            ("unfortunately", -0.5),
            ("unacceptable", -0.8),
            ("disappointed", -0.7),
        ];

        let words = entries
            .iter()
            .map(|(word, score)| (word.to_string(), *score))
            .collect();

        let negations = [
            "no", "nunca", "jamás", "ni", "tampoco", "sin", "nada", "not", "never", "without",
            "cannot",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let intensifiers = [
            ("muy", 1.5),
            ("mucho", 1.3),
            ("muchas", 1.3),
            ("muchísimas", 1.6),
            ("extremadamente", 2.0),
            ("bastante", 1.3),
            ("super", 1.5),
            ("súper", 1.5),
            ("totalmente", 1.5),
            ("poco", 0.5),
            ("algo", 0.7),
            ("very", 1.5),
            ("extremely", 2.0),
            ("really", 1.3),
            ("slightly", 0.5),
            ("somewhat", 0.7),
        ]
        .into_iter()
        .map(|(word, mult)| (word.to_string(), mult))
        .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Valence of a single word.
    pub fn get_score(&self, word: &str) -> Option<f64> {
        self.words.get(&word.to_lowercase()).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n == word)
    }

    pub fn get_intensifier(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    /// Scores every lexicon word in `text`.
    ///
    /// A negator flips the sign of the next scored word within
    /// `NEGATION_WINDOW` tokens; an intensifier scales the next scored word.
    /// Scaled scores are clamped back into `[-1, 1]`.
    pub fn analyze(&self, text: &str) -> LexiconMatch {
        let mut result = LexiconMatch::default();
        let mut negation_left = 0usize;
        let mut intensifier = 1.0;

        for token in tokenize(text) {
            let token = token.to_lowercase();

            if self.is_negation(&token) {
                negation_left = NEGATION_WINDOW;
                continue;
            }

            if let Some(mult) = self.get_intensifier(&token) {
                intensifier = mult;
                continue;
            }

            if let Some(mut score) = self.get_score(&token) {
                if negation_left > 0 {
                    score = -score;
                    negation_left = 0;
                }
                score = (score * intensifier).clamp(-1.0, 1.0);
                intensifier = 1.0;

                result.scores.push(score);
                result.words.push(token);
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
        }

        result
    }
}

/// Splits on anything that is not a letter or digit; accents stay attached.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
}
