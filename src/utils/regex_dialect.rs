//! Regex dialect bridge
//!
//! Rule regexes are evaluated twice: by the `regex` crate in-process and by
//! `RegExp` (no `u` flag) inside the PAC script. Only syntax both engines
//! parse is accepted. Constructs the two engines read differently are
//! rewritten on the Rust side so that they keep their JavaScript meaning.

use regex_syntax::ast::parse::Parser;
use regex_syntax::ast::{
    self, Ast, AssertionKind, ClassPerlKind, ClassSetBinaryOp, ClassSetItem, GroupKind,
    HexLiteralKind, LiteralKind, RepetitionKind, SpecialLiteralKind, Visitor,
};

use crate::error::CompileError;

/// `.` in JavaScript stops at every line terminator, not only `\n`.
const JS_DOT: &str = r"[^\n\r\x{2028}\x{2029}]";
const JS_DIGIT: &str = "0-9";
const JS_WORD: &str = "0-9A-Za-z_";
const JS_SPACE: &str = r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";
const ASCII_WORD_BOUNDARY: &str = r"(?-u:\b)";
const ASCII_NOT_WORD_BOUNDARY: &str = r"(?-u:\B)";

fn perl_class(kind: &ClassPerlKind, negated: bool) -> String {
    let set = match kind {
        ClassPerlKind::Digit => JS_DIGIT,
        ClassPerlKind::Word => JS_WORD,
        ClassPerlKind::Space => JS_SPACE,
    };
    format!("[{}{}]", if negated { "^" } else { "" }, set)
}

fn swap_case(c: char) -> char {
    if c.is_ascii_lowercase() {
        c.to_ascii_uppercase()
    } else {
        c.to_ascii_lowercase()
    }
}

fn other_case(c: char) -> Option<char> {
    c.is_ascii_alphabetic().then(|| swap_case(c))
}

/// Letter ranges covering the other case of the letters in `start..=end`.
fn case_counterparts(start: char, end: char) -> String {
    let mut extra = String::new();
    for (first, last) in [('a', 'z'), ('A', 'Z')] {
        let low = start.max(first);
        let high = end.min(last);
        if low <= high {
            extra.push(swap_case(low));
            extra.push('-');
            extra.push(swap_case(high));
        }
    }
    extra
}

struct DialectCheck<'p> {
    pattern: &'p str,
    ignore_case: bool,
    rewrites: Vec<(usize, usize, String)>,
}

impl<'p> DialectCheck<'p> {
    fn unportable(&self, construct: &str) -> CompileError {
        CompileError::UnportableRegex {
            pattern: self.pattern.to_string(),
            construct: construct.to_string(),
        }
    }

    fn text(&self, span: &ast::Span) -> &'p str {
        &self.pattern[span.start.offset..span.end.offset]
    }

    fn rewrite(&mut self, span: &ast::Span, replacement: String) {
        self.rewrites
            .push((span.start.offset, span.end.offset, replacement));
    }

    fn check_literal(&self, literal: &ast::Literal) -> Result<(), CompileError> {
        match &literal.kind {
            LiteralKind::Verbatim | LiteralKind::Meta | LiteralKind::Superfluous => {}
            LiteralKind::HexFixed(HexLiteralKind::X) => {}
            LiteralKind::HexFixed(_) | LiteralKind::HexBrace(_) => {
                return Err(self.unportable("\\u, \\U or braced escape"))
            }
            LiteralKind::Octal => return Err(self.unportable("octal escape")),
            LiteralKind::Special(SpecialLiteralKind::Bell) => {
                return Err(self.unportable("\\a escape"))
            }
            LiteralKind::Special(SpecialLiteralKind::Space) => {
                return Err(self.unportable("escaped space"))
            }
            LiteralKind::Special(_) => {}
        }
        if self.ignore_case && !literal.c.is_ascii() {
            return Err(self.unportable("non-ASCII character under the i flag"));
        }
        Ok(())
    }

    fn check_repetition(&self, repetition: &ast::Repetition) -> Result<(), CompileError> {
        match repetition.ast.as_ref() {
            Ast::Assertion(_) | Ast::Repetition(_) | Ast::Empty(_) | Ast::Flags(_) => {
                return Err(self.unportable("quantifier without a repeatable atom"))
            }
            _ => {}
        }
        if let RepetitionKind::Range(_) = repetition.op.kind {
            let counts = self
                .text(&repetition.op.span)
                .trim_end_matches('?')
                .trim_start_matches('{')
                .trim_end_matches('}');
            let well_formed = !counts.starts_with(',')
                && counts.chars().all(|c| c.is_ascii_digit() || c == ',');
            if !well_formed {
                return Err(self.unportable("counted repetition"));
            }
        }
        Ok(())
    }

    fn check_group(&self, group: &ast::Group) -> Result<(), CompileError> {
        match &group.kind {
            GroupKind::CaptureIndex(_) => Ok(()),
            GroupKind::CaptureName {
                starts_with_p: true,
                ..
            } => Err(self.unportable("(?P<name>) group")),
            GroupKind::CaptureName { name, .. } => {
                let mut chars = name.name.chars();
                let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
                if valid {
                    Ok(())
                } else {
                    Err(self.unportable("group name"))
                }
            }
            GroupKind::NonCapturing(flags) if flags.items.is_empty() => Ok(()),
            GroupKind::NonCapturing(_) => Err(self.unportable("inline flags")),
        }
    }
}

impl<'p> Visitor for DialectCheck<'p> {
    type Output = String;
    type Err = CompileError;

    fn finish(mut self) -> Result<String, CompileError> {
        self.rewrites.sort_by_key(|(start, _, _)| *start);

        let mut translated = String::with_capacity(self.pattern.len());
        let mut cursor = 0;
        for (start, end, replacement) in self.rewrites {
            translated.push_str(&self.pattern[cursor..start]);
            translated.push_str(&replacement);
            cursor = end;
        }
        translated.push_str(&self.pattern[cursor..]);
        Ok(translated)
    }

    fn visit_pre(&mut self, ast: &Ast) -> Result<(), CompileError> {
        match ast {
            Ast::Empty(_) | Ast::Alternation(_) | Ast::Concat(_) => {}
            Ast::Flags(_) => return Err(self.unportable("inline flags")),
            Ast::Dot(span) => self.rewrite(span, JS_DOT.to_string()),
            Ast::Literal(literal) => {
                self.check_literal(literal)?;
                if self.ignore_case {
                    if let Some(other) = other_case(literal.c) {
                        let replacement = format!("[{}{}]", self.text(&literal.span), other);
                        self.rewrite(&literal.span, replacement);
                    }
                }
            }
            Ast::Assertion(assertion) => match assertion.kind {
                AssertionKind::StartLine | AssertionKind::EndLine => {}
                AssertionKind::WordBoundary => {
                    self.rewrite(&assertion.span, ASCII_WORD_BOUNDARY.to_string())
                }
                AssertionKind::NotWordBoundary => {
                    self.rewrite(&assertion.span, ASCII_NOT_WORD_BOUNDARY.to_string())
                }
                AssertionKind::StartText | AssertionKind::EndText => {
                    return Err(self.unportable("\\A or \\z anchor"))
                }
                _ => return Err(self.unportable("special word boundary")),
            },
            Ast::ClassUnicode(_) => return Err(self.unportable("Unicode class")),
            Ast::ClassPerl(class) => {
                self.rewrite(&class.span, perl_class(&class.kind, class.negated))
            }
            Ast::ClassBracketed(class) => {
                let text = self.text(&class.span);
                if text.starts_with("[]") || text.starts_with("[^]") {
                    return Err(self.unportable("] as first class member"));
                }
            }
            Ast::Repetition(repetition) => self.check_repetition(repetition)?,
            Ast::Group(group) => self.check_group(group)?,
        }
        Ok(())
    }

    fn visit_class_set_item_pre(&mut self, item: &ClassSetItem) -> Result<(), CompileError> {
        match item {
            ClassSetItem::Empty(_) | ClassSetItem::Union(_) => {}
            ClassSetItem::Literal(literal) => {
                self.check_literal(literal)?;
                if self.ignore_case {
                    if let Some(other) = other_case(literal.c) {
                        let replacement = format!("{}{}", self.text(&literal.span), other);
                        self.rewrite(&literal.span, replacement);
                    }
                }
            }
            ClassSetItem::Range(range) => {
                self.check_literal(&range.start)?;
                self.check_literal(&range.end)?;
                if self.ignore_case {
                    let extra = case_counterparts(range.start.c, range.end.c);
                    if !extra.is_empty() {
                        let replacement = format!("{}{}", self.text(&range.span), extra);
                        self.rewrite(&range.span, replacement);
                    }
                }
            }
            ClassSetItem::Ascii(_) => return Err(self.unportable("POSIX class")),
            ClassSetItem::Unicode(_) => return Err(self.unportable("Unicode class")),
            ClassSetItem::Perl(class) => {
                self.rewrite(&class.span, perl_class(&class.kind, class.negated))
            }
            ClassSetItem::Bracketed(_) => return Err(self.unportable("nested class")),
        }
        Ok(())
    }

    fn visit_class_set_binary_op_pre(&mut self, _op: &ClassSetBinaryOp) -> Result<(), CompileError> {
        Err(self.unportable("class set operation"))
    }
}

/// Check a PAC regex and translate it into an equivalent `regex` crate source.
///
/// `flags` may be empty or `i`. Under `i`, letters are matched
/// case-insensitively in the ASCII range only, which is what `RegExp` does for
/// ASCII patterns; non-ASCII characters are rejected in that mode.
///
/// # Examples
/// ```
/// use smartpac::utils::regex_dialect::to_rust_dialect;
///
/// assert_eq!(to_rust_dialect(r"^\d+$", "").unwrap(), "^[0-9]+$");
/// assert_eq!(to_rust_dialect("^ab$", "i").unwrap(), "^[aA][bB]$");
/// assert!(to_rust_dialect(r"\pL", "").is_err());
/// ```
pub fn to_rust_dialect(source: &str, flags: &str) -> Result<String, CompileError> {
    let ignore_case = match flags {
        "" => false,
        "i" => true,
        other => {
            return Err(CompileError::UnportableRegex {
                pattern: source.to_string(),
                construct: format!("flags '{}'", other),
            })
        }
    };
    if source.chars().any(|c| u32::from(c) > 0xFFFF) {
        return Err(CompileError::UnportableRegex {
            pattern: source.to_string(),
            construct: "character outside the Basic Multilingual Plane".to_string(),
        });
    }

    let ast = Parser::new()
        .parse(source)
        .map_err(|e| CompileError::InvalidRegex {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;

    ast::visit(
        &ast,
        DialectCheck {
            pattern: source,
            ignore_case,
            rewrites: Vec::new(),
        },
    )
}
