//! Scanner integration tests.
//!
//! Verifies that the scanner correctly tokenizes IDL constructs.

use ridl_ast::syntax_kind::SyntaxKind;
use ridl_scanner::{tokenize, CharSource, LexErrorKind, Scanner};

/// Helper: scan all tokens from source and return as (kind, text) pairs,
/// without the trailing end-of-file token.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token().expect("lexical error");
        if token.kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((token.kind, token.text));
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

fn scan_error(source: &str) -> LexErrorKind {
    tokenize(source).expect_err("expected a lexical error").kind
}

// ============================================================================
// Trivia
// ============================================================================

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_and_comments_only() {
    let tokens = scan_all("   \n\t // line comment\n /* block\n comment */ \r\n");
    assert!(tokens.is_empty());
}

#[test]
fn test_directive_lines_are_skipped() {
    let source = "# 1 \"a.idl\"\n#pragma prefix \"omg.org\"\n  #include <orb.idl>\nmodule";
    assert_eq!(scan_kinds(source), vec![SyntaxKind::ModuleKeyword]);
}

#[test]
fn test_block_comments_do_not_nest() {
    assert_eq!(
        scan_kinds("/* outer /* inner */ x */"),
        vec![SyntaxKind::Identifier, SyntaxKind::AsteriskToken, SyntaxKind::SlashToken]
    );
}

#[test]
fn test_unterminated_block_comment() {
    assert_eq!(scan_error("module /* never closed"), LexErrorKind::UnterminatedComment);
}

// ============================================================================
// Identifiers and keywords
// ============================================================================

#[test]
fn test_identifier_run_is_not_split_at_keyword() {
    assert_eq!(scan_all("constx"), vec![(SyntaxKind::Identifier, "constx".to_string())]);
    assert_eq!(scan_kinds("const x"), vec![SyntaxKind::ConstKeyword, SyntaxKind::Identifier]);
    assert_eq!(scan_kinds("interface_1"), vec![SyntaxKind::Identifier]);
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(
        scan_kinds("TRUE true FALSE Object object ValueBase valuebase"),
        vec![
            SyntaxKind::TrueKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::FalseKeyword,
            SyntaxKind::ObjectKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::ValueBaseKeyword,
            SyntaxKind::Identifier,
        ]
    );
}

const KEYWORDS: [&str; 48] = [
    "abstract", "any", "attribute", "boolean", "case", "char", "const", "context", "custom",
    "default", "double", "enum", "exception", "factory", "FALSE", "fixed", "float", "in",
    "inout", "interface", "local", "long", "module", "native", "Object", "octet", "oneway",
    "out", "private", "public", "raises", "readonly", "sequence", "short", "string", "struct",
    "supports", "switch", "TRUE", "truncatable", "typedef", "union", "unsigned", "ValueBase",
    "valuetype", "void", "wchar", "wstring",
];

#[test]
fn test_all_keywords_scan() {
    for text in KEYWORDS {
        let kinds = scan_kinds(text);
        assert_eq!(kinds.len(), 1, "{text}");
        assert!(kinds[0].is_keyword(), "{text}");
        assert_eq!(kinds[0].keyword_text(), Some(text));
    }
}

#[test]
fn test_leading_underscore_is_invalid() {
    assert_eq!(scan_error("_x"), LexErrorKind::InvalidCharacter('_'));
}

// ============================================================================
// Punctuation
// ============================================================================

#[test]
fn test_longest_match_punctuation() {
    assert_eq!(
        scan_kinds(">> > > :: : << <"),
        vec![
            SyntaxKind::GreaterThanGreaterThanToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::ColonColonToken,
            SyntaxKind::ColonToken,
            SyntaxKind::LessThanLessThanToken,
            SyntaxKind::LessThanToken,
        ]
    );
}

#[test]
fn test_single_character_punctuation() {
    assert_eq!(
        scan_kinds("; { } , ( ) = | ^ & + - * / % ~ [ ]"),
        vec![
            SyntaxKind::SemicolonToken,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
            SyntaxKind::CommaToken,
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
            SyntaxKind::EqualsToken,
            SyntaxKind::BarToken,
            SyntaxKind::CaretToken,
            SyntaxKind::AmpersandToken,
            SyntaxKind::PlusToken,
            SyntaxKind::MinusToken,
            SyntaxKind::AsteriskToken,
            SyntaxKind::SlashToken,
            SyntaxKind::PercentToken,
            SyntaxKind::TildeToken,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
        ]
    );
}

#[test]
fn test_scoped_name_tokens() {
    assert_eq!(
        scan_kinds("::CORBA::Object"),
        vec![
            SyntaxKind::ColonColonToken,
            SyntaxKind::Identifier,
            SyntaxKind::ColonColonToken,
            SyntaxKind::ObjectKeyword,
        ]
    );
}

#[test]
fn test_invalid_character() {
    let err = tokenize("module M { @ }").expect_err("error");
    assert_eq!(err.kind, LexErrorKind::InvalidCharacter('@'));
    assert_eq!((err.position.line, err.position.column), (1, 12));
    assert_eq!(err.span.start, 11);
}

// ============================================================================
// Numeric literals
// ============================================================================

#[test]
fn test_integer_literals() {
    assert_eq!(scan_all("42"), vec![(SyntaxKind::DecimalLiteral, "42".to_string())]);
    assert_eq!(scan_all("0"), vec![(SyntaxKind::OctalLiteral, "0".to_string())]);
    assert_eq!(scan_all("017"), vec![(SyntaxKind::OctalLiteral, "017".to_string())]);
    assert_eq!(scan_all("0x1F"), vec![(SyntaxKind::HexLiteral, "0x1F".to_string())]);
    assert_eq!(scan_all("0XaB"), vec![(SyntaxKind::HexLiteral, "0XaB".to_string())]);
}

#[test]
fn test_octal_maximal_munch() {
    assert_eq!(
        scan_all("09"),
        vec![
            (SyntaxKind::OctalLiteral, "0".to_string()),
            (SyntaxKind::DecimalLiteral, "9".to_string()),
        ]
    );
}

#[test]
fn test_hex_requires_digit() {
    assert_eq!(scan_error("0x;"), LexErrorKind::HexDigitExpected);
}

#[test]
fn test_floating_point_literals() {
    assert_eq!(scan_kinds("3.14"), vec![SyntaxKind::FloatLiteral]);
    assert_eq!(scan_kinds("1."), vec![SyntaxKind::FloatLiteral]);
    assert_eq!(scan_kinds(".5"), vec![SyntaxKind::FloatLiteral]);
    assert_eq!(scan_kinds("1.5e10"), vec![SyntaxKind::FloatLiteral]);
    assert_eq!(scan_kinds(".5E-3"), vec![SyntaxKind::FloatLiteral]);
    assert_eq!(scan_kinds("1e10"), vec![SyntaxKind::ExponentFloatLiteral]);
    assert_eq!(scan_kinds("2E+4"), vec![SyntaxKind::ExponentFloatLiteral]);
    assert_eq!(scan_kinds("0.0"), vec![SyntaxKind::FloatLiteral]);
}

#[test]
fn test_exponent_requires_digit() {
    assert_eq!(scan_error("1e+"), LexErrorKind::ExponentDigitExpected);
}

#[test]
fn test_fixed_point_literals() {
    assert_eq!(scan_all("12.50d"), vec![(SyntaxKind::FixedPtLiteral, "12.50d".to_string())]);
    assert_eq!(scan_kinds("3D"), vec![SyntaxKind::FixedPtLiteral]);
    assert_eq!(scan_kinds("1.d"), vec![SyntaxKind::FixedPtLiteral]);
    assert_eq!(scan_kinds(".25d"), vec![SyntaxKind::FixedPtLiteral]);
}

// ============================================================================
// Quoted literals
// ============================================================================

#[test]
fn test_char_literals() {
    let tokens = tokenize("'a' '\\n' L'x' '\\101' '\\x41'").expect("scan");
    let values: Vec<(SyntaxKind, &str)> = tokens[..5].iter().map(|t| (t.kind, t.value.as_str())).collect();
    assert_eq!(
        values,
        vec![
            (SyntaxKind::CharLiteral, "a"),
            (SyntaxKind::CharLiteral, "\n"),
            (SyntaxKind::WideCharLiteral, "x"),
            (SyntaxKind::CharLiteral, "A"),
            (SyntaxKind::CharLiteral, "A"),
        ]
    );
    assert_eq!(tokens[2].text, "L'x'");
}

#[test]
fn test_string_literals_decode_escapes() {
    let tokens = tokenize(r#""a\tb\"c\\" L"wé""#).expect("scan");
    assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
    assert_eq!(tokens[0].value, "a\tb\"c\\");
    assert_eq!(tokens[0].text, r#""a\tb\"c\\""#);
    assert_eq!(tokens[1].kind, SyntaxKind::WideStringLiteral);
    assert_eq!(tokens[1].value, "w\u{e9}");
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("const string s = \"abc").expect_err("error");
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.position.column, 18);
    assert_eq!(scan_error("\"abc\n\";"), LexErrorKind::UnterminatedString);
}

#[test]
fn test_bad_char_literals() {
    assert_eq!(scan_error("''"), LexErrorKind::BadCharLiteral);
    assert_eq!(scan_error("'ab'"), LexErrorKind::BadCharLiteral);
    assert_eq!(scan_error("'a"), LexErrorKind::UnterminatedChar);
}

#[test]
fn test_malformed_escapes() {
    assert_eq!(scan_error(r#""\q""#), LexErrorKind::InvalidEscape("\\\\q".to_string()));
    assert_eq!(scan_error(r#""\xg""#), LexErrorKind::HexDigitExpected);
    assert!(matches!(scan_error(r#""\u0041""#), LexErrorKind::InvalidEscape(_)));
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_token_positions() {
    let tokens = tokenize("module M {\r\n  long x;\n};").expect("scan");
    let long = &tokens[3];
    assert_eq!(long.kind, SyntaxKind::LongKeyword);
    assert_eq!((long.line, long.column), (2, 3));
    assert_eq!(long.span.start, 14);
    assert_eq!(long.span.length, 4);
    let close = &tokens[6];
    assert_eq!(close.kind, SyntaxKind::CloseBraceToken);
    assert_eq!((close.line, close.column), (3, 1));
}

#[test]
fn test_scanner_from_reader_source() {
    let source = CharSource::from_reader(&b"interface I;"[..]).expect("read");
    let mut scanner = Scanner::from_source(source);
    assert_eq!(scanner.next_token().expect("token").kind, SyntaxKind::InterfaceKeyword);
    assert_eq!(scanner.next_token().expect("token").text, "I");
}
