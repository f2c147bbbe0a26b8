//! logos-based path tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `"a.b"` as QuotedKey beats `"` as an error)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Our ordering ensures:
//! - `"odd key"` matches [`Token::QuotedKey`] as a whole, dots included
//! - `12` inside brackets matches [`Token::Integer`], never an ident

use logos::Logos;

/// Path token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// Double-quoted key: `"any key with . or [ inside"`.
    #[regex(r#""[^"]*""#)]
    QuotedKey,

    /// Unsigned array index: `0`, `12`.
    #[regex(r"[0-9]+")]
    Integer,

    /// Bare key: `name`, `max_value`, `my-field`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    // ── Single-character punctuation ─────────────────────────────────

    /// `.`
    #[token(".")]
    Dot,

    /// `[`
    #[token("[")]
    BracketOpen,

    /// `]`
    #[token("]")]
    BracketClose,
}

/// Tokenize a path string into a vector of `(Token, String)` pairs.
///
/// Characters that fail to lex are skipped; the parser rejects the
/// ill-formed token sequence that results (two adjacent keys with no dot
/// between them), so a lex error still surfaces as a parse error.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    let lexer = Token::lexer(input);
    lexer
        .spanned()
        .filter_map(|(result, span)| {
            result.ok().map(|token| (token, input[span].to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: tokenize and return just the token variants.
    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).into_iter().map(|(t, _)| t).collect()
    }

    // ── Keys ─────────────────────────────────────────────────────────

    #[test]
    fn test_bare_keys() {
        let result = tokenize("name max_value my-field _private");
        assert_eq!(result[0], (Token::Ident, "name".into()));
        assert_eq!(result[1], (Token::Ident, "max_value".into()));
        assert_eq!(result[2], (Token::Ident, "my-field".into()));
        assert_eq!(result[3], (Token::Ident, "_private".into()));
    }

    #[test]
    fn test_quoted_key() {
        let result = tokenize(r#""a key.with[odd] chars""#);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].0, Token::QuotedKey);
        assert_eq!(result[0].1, r#""a key.with[odd] chars""#);
    }

    #[test]
    fn test_quoted_key_beats_punctuation() {
        // The whole quoted span is one token; the dot inside never lexes.
        assert_eq!(tokens(r#""a.b""#), vec![Token::QuotedKey]);
    }

    // ── Indices ──────────────────────────────────────────────────────

    #[test]
    fn test_integer() {
        let result = tokenize("0 12 345");
        assert_eq!(result[0], (Token::Integer, "0".into()));
        assert_eq!(result[1], (Token::Integer, "12".into()));
        assert_eq!(result[2], (Token::Integer, "345".into()));
    }

    // ── Punctuation ──────────────────────────────────────────────────

    #[test]
    fn test_punctuation() {
        assert_eq!(
            tokens(". [ ]"),
            vec![Token::Dot, Token::BracketOpen, Token::BracketClose]
        );
    }

    // ── Full paths ───────────────────────────────────────────────────

    #[test]
    fn test_dotted_path() {
        assert_eq!(
            tokens("user.address.street"),
            vec![
                Token::Ident,
                Token::Dot,
                Token::Ident,
                Token::Dot,
                Token::Ident,
            ]
        );
    }

    #[test]
    fn test_indexed_path() {
        assert_eq!(
            tokens("items[0].name"),
            vec![
                Token::Ident,
                Token::BracketOpen,
                Token::Integer,
                Token::BracketClose,
                Token::Dot,
                Token::Ident,
            ]
        );
    }

    #[test]
    fn test_leading_digit_key_is_not_ident() {
        // `1abc` lexes as Integer + Ident; the parser rejects the sequence.
        assert_eq!(tokens("1abc"), vec![Token::Integer, Token::Ident]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }
}
