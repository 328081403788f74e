//  READER.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 12:03:18
//  Last edited:
//    19 Oct 2026, 17:12:40
//  Auto updated?
//    Yes
//
//  Description:
//!   Reads a [`Tree`] from the exchange format.
//!
//!   Reading happens in two steps: the text is first scanned to lexemes
//!   with `nom`, after which the groups are built into a tree by a small
//!   recursive reader.
//

use std::str::FromStr as _;

use nom::IResult;
use nom::{branch, bytes::complete as bc, character::complete as cc, combinator as comb, multi, sequence as seq};
use nom_locate::LocatedSpan;
use tracing::trace;

use super::errors::FormatError;
use crate::ops::Op;
use crate::pool::StringPool;
use crate::spec::TextPos;
use crate::tree::{NodeId, Tree, Value};


/***** TYPES *****/
/// The input to the lexeme scanner.
type Input<'s> = LocatedSpan<&'s str, ()>;

/// A single lexeme of the exchange format.
#[derive(Clone, Copy, Debug)]
enum Lexeme<'s> {
    /// `{`
    Open(Input<'s>),
    /// `}`
    Close(Input<'s>),
    /// A name, without its double quotes.
    Name(Input<'s>),
    /// A string, without its single quotes but still escaped.
    Str(Input<'s>),
    /// An annotation, including its dollar signs.
    Annotation(Input<'s>),
    /// A tag, number or `NIL`.
    Atom(Input<'s>),
}

impl<'s> Lexeme<'s> {
    /// Returns the span of this lexeme.
    #[inline]
    fn span(&self) -> &Input<'s> {
        match self {
            Self::Open(span) | Self::Close(span) | Self::Name(span) | Self::Str(span) | Self::Annotation(span) | Self::Atom(span) => span,
        }
    }

    /// Returns where this lexeme starts.
    #[inline]
    fn pos(&self) -> TextPos { TextPos::start_of(self.span()) }

    /// Returns the text of this lexeme as it appeared.
    #[inline]
    fn text(&self) -> String {
        match self {
            Self::Name(span) => format!("\"{}\"", span.fragment()),
            Self::Str(span) => format!("'{}'", span.fragment()),
            _ => self.span().fragment().to_string(),
        }
    }

    /// Returns whether this lexeme is the `NIL` atom.
    #[inline]
    fn is_nil(&self) -> bool { matches!(self, Self::Atom(span) if span.fragment().eq_ignore_ascii_case("NIL")) }
}





/***** SCANNING FUNCTIONS *****/
/// Scans a quoted name.
fn name(input: Input) -> IResult<Input, Lexeme> {
    comb::map(seq::delimited(cc::char('"'), bc::is_not("\"\n"), cc::char('"')), Lexeme::Name)(input)
}

/// Scans a quoted string, which may contain escaped quotes and backslashes.
fn string(input: Input) -> IResult<Input, Lexeme> {
    comb::map(
        seq::delimited(
            cc::char('\''),
            comb::recognize(multi::many0(branch::alt((comb::recognize(bc::is_not("\\'")), comb::recognize(seq::pair(cc::char('\\'), cc::one_of("\\'"))))))),
            cc::char('\''),
        ),
        Lexeme::Str,
    )(input)
}

/// Scans a single lexeme.
fn lexeme(input: Input) -> IResult<Input, Lexeme> {
    seq::preceded(
        cc::multispace0,
        branch::alt((
            comb::map(comb::recognize(cc::char('{')), Lexeme::Open),
            comb::map(comb::recognize(cc::char('}')), Lexeme::Close),
            name,
            string,
            comb::map(comb::recognize(seq::tuple((cc::char('$'), bc::is_not("$"), cc::char('$')))), Lexeme::Annotation),
            comb::map(bc::is_not(" \t\r\n{}$\"'"), Lexeme::Atom),
        )),
    )(input)
}

/// Scans all lexemes in the given text.
///
/// # Errors
/// This function errors if some part of the text is not a lexeme.
fn scan(text: &str) -> Result<Vec<Lexeme>, FormatError> {
    let (rem, lexemes): (Input, Vec<Lexeme>) = match multi::many0(lexeme)(Input::new(text)) {
        Ok(res) => res,
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => {
            return Err(FormatError::UnexpectedCharacter { ch: err.input.fragment().chars().next().unwrap_or(' '), pos: TextPos::start_of(&err.input) });
        },
        Err(nom::Err::Incomplete(_)) => return Err(FormatError::UnexpectedEnd { expected: "a lexeme", pos: TextPos::default() }),
    };

    // Anything left over that is not whitespace could not be scanned
    let rem: Input = match cc::multispace0::<Input, nom::error::Error<Input>>(rem) {
        Ok((rem, _)) => rem,
        Err(_) => rem,
    };
    if let Some(ch) = rem.fragment().chars().next() {
        let pos: TextPos = TextPos::start_of(&rem);
        return Err(match ch {
            '"' => FormatError::Unterminated { what: "name", pos },
            '\'' => FormatError::Unterminated { what: "string", pos },
            '$' => FormatError::Unterminated { what: "annotation", pos },
            ch => FormatError::UnexpectedCharacter { ch, pos },
        });
    }
    Ok(lexemes)
}

/// Removes the escapes from a scanned string.
fn unescape(raw: &str) -> String {
    let mut res: String = String::with_capacity(raw.len());
    let mut escaped: bool = false;
    for c in raw.chars() {
        if !escaped && c == '\\' {
            escaped = true;
            continue;
        }
        escaped = false;
        res.push(c);
    }
    res
}





/***** READER *****/
/// Builds a tree from a list of lexemes.
struct Reader<'l, 's, 'p> {
    /// The lexemes to read.
    lexemes : &'l [Lexeme<'s>],
    /// The next lexeme to read.
    cursor  : usize,
    /// The tree we are building.
    tree    : Tree,
    /// The pool in which to intern names and strings.
    pool    : &'p mut StringPool,
    /// Where the text ends, for errors.
    end     : TextPos,
}

impl<'l, 's, 'p> Reader<'l, 's, 'p> {
    /// Returns the next lexeme without consuming it, skipping any annotations.
    fn peek(&mut self) -> Option<Lexeme<'s>> {
        while let Some(Lexeme::Annotation(span)) = self.lexemes.get(self.cursor) {
            trace!("Skipping annotation '{}' at {}", span.fragment(), TextPos::start_of(span));
            self.cursor += 1;
        }
        self.lexemes.get(self.cursor).copied()
    }

    /// Consumes the next lexeme, failing if there is none.
    fn next(&mut self, expected: &'static str) -> Result<Lexeme<'s>, FormatError> {
        let lexeme: Lexeme = self.peek().ok_or(FormatError::UnexpectedEnd { expected, pos: self.end })?;
        self.cursor += 1;
        Ok(lexeme)
    }

    /// Consumes the closing brace of a group.
    fn close(&mut self) -> Result<(), FormatError> {
        match self.next("'}'")? {
            Lexeme::Close(_) => Ok(()),
            other => Err(FormatError::UnexpectedToken { expected: "'}'", found: other.text(), pos: other.pos() }),
        }
    }

    /// Reads a child position, which is either `NIL` or a group.
    fn child(&mut self) -> Result<Option<NodeId>, FormatError> {
        match self.peek() {
            Some(lexeme) if lexeme.is_nil() => {
                self.cursor += 1;
                Ok(None)
            },
            _ => self.group(),
        }
    }

    /// Reads a group, which may be `{ NIL }`.
    fn group(&mut self) -> Result<Option<NodeId>, FormatError> {
        match self.next("'{'")? {
            Lexeme::Open(_) => {},
            other => return Err(FormatError::UnexpectedToken { expected: "'{' or 'NIL'", found: other.text(), pos: other.pos() }),
        }

        // Read the head
        let head: Lexeme = self.next("a tag, number, name or string")?;
        let pos: TextPos = head.pos();
        let value: Value = match head {
            Lexeme::Atom(_) if head.is_nil() => {
                self.close()?;
                return Ok(None);
            },
            Lexeme::Atom(span) => match Op::from_str(span.fragment()) {
                Ok(op) => Value::Statement(op),
                Err(_) => match span.fragment().parse::<f64>() {
                    Ok(num) => Value::Number(num),
                    Err(_) => return Err(FormatError::UnknownTag { tag: span.fragment().to_string(), pos }),
                },
            },
            Lexeme::Name(span) => Value::Name(self.pool.intern(span.fragment())),
            Lexeme::Str(span) => Value::String(self.pool.intern(&unescape(span.fragment()))),
            other => return Err(FormatError::UnexpectedToken { expected: "a tag, number, name or string", found: other.text(), pos }),
        };

        // Read the children, which may be omitted altogether
        let (mut left, mut right): (Option<NodeId>, Option<NodeId>) = (None, None);
        if !matches!(self.peek(), Some(Lexeme::Close(_))) {
            left = self.child()?;
            if !matches!(self.peek(), Some(Lexeme::Close(_))) {
                right = self.child()?;
            }
        }
        self.close()?;
        Ok(Some(self.tree.add(value, pos, left, right)))
    }
}





/***** LIBRARY *****/
/// Reads a tree from exchange-format text.
///
/// Positions of the nodes in the returned tree refer to the exchange text, since the original source positions are not persisted.
///
/// # Arguments
/// - `text`: The text to read.
/// - `pool`: The [`StringPool`] in which names and strings are interned.
///
/// # Returns
/// The tree described by the text.
///
/// # Errors
/// This function errors if the text is not valid exchange format.
pub fn read_tree(text: &str, pool: &mut StringPool) -> Result<Tree, FormatError> {
    let lexemes: Vec<Lexeme> = scan(text)?;
    let end: TextPos = {
        let lines: Vec<&str> = text.split('\n').collect();
        TextPos::new0(lines.len().saturating_sub(1), lines.last().map(|l| l.chars().count()).unwrap_or(0))
    };
    trace!("Scanned {} exchange lexemes", lexemes.len());

    let mut reader: Reader = Reader { lexemes: &lexemes, cursor: 0, tree: Tree::new(), pool, end };
    let root: Option<NodeId> = reader.child()?;
    if let Some(extra) = reader.peek() {
        return Err(FormatError::TrailingInput { found: extra.text(), pos: extra.pos() });
    }

    let mut tree: Tree = reader.tree;
    tree.set_root(root);
    Ok(tree)
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::write_tree;

    #[test]
    fn test_read_lenient_forms() {
        let mut pool: StringPool = StringPool::new();
        let tree: Tree = read_tree("$kite::relation$ { is_bt { \"x\" } { 1.5 NIL NIL } }  $future::thing$ ", &mut pool).unwrap();
        let root: NodeId = tree.root().unwrap();
        assert_eq!(tree.op(root), Some(Op::Less));
        assert_eq!(tree.value(tree.left(root).unwrap()), &Value::Name("x".into()));
        assert_eq!(tree.number_of(tree.right(root).unwrap()), Some(1.5));

        // `{ NIL }` works as well as `NIL`
        let tree: Tree = read_tree("{ OUT { NIL } NIL }", &mut pool).unwrap();
        assert_eq!(tree.count_reachable(), 1);
    }

    #[test]
    fn test_read_what_was_written() {
        let mut pool: StringPool = StringPool::new();
        let text: &str = "{ ST\n  { OUT\n    { PARAM\n      { 'a \\'quoted\\' \\\\ string' }\n      NIL\n    }\n    NIL\n  }\n  NIL\n}\n";
        let tree: Tree = read_tree(text, &mut pool).unwrap();
        assert_eq!(write_tree(&tree, false), text);
    }

    #[test]
    fn test_read_errors() {
        let mut pool: StringPool = StringPool::new();
        assert!(matches!(read_tree("{ FOO }", &mut pool), Err(FormatError::UnknownTag { tag, .. }) if tag == "FOO"));
        assert!(matches!(read_tree("{ ADD { 1 }", &mut pool), Err(FormatError::UnexpectedEnd { .. })));
        assert!(matches!(read_tree("{ ADD { 1 } } }", &mut pool), Err(FormatError::TrailingInput { .. })));
        assert!(matches!(read_tree("{ \"x }", &mut pool), Err(FormatError::Unterminated { what: "name", .. })));
        assert!(matches!(read_tree("{ ADD { 1 } { 2 } { 3 } }", &mut pool), Err(FormatError::UnexpectedToken { .. })));
        assert!(matches!(read_tree("\n  { ADD { ( } }", &mut pool), Err(FormatError::UnknownTag { pos, .. }) if pos == TextPos::new1(2, 11)));
    }
}
