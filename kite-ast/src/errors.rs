//  ERRORS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 11:15:30
//  Last edited:
//    19 Oct 2026, 17:40:12
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the [`PrettyError`] trait, which lets errors that concern a
//!   piece of source text print themselves with that piece of text as
//!   context.
//

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FResult};

use console::{Style, style};

use crate::spec::TextRange;


/***** HELPER FUNCTIONS *****/
/// Computes the number of digits in the given number.
#[inline]
fn num_len(n: usize) -> usize { n.to_string().len() }

/// Finds the given (zero-indexed) line in the source text.
///
/// # Returns
/// The line without its newline, or [`None`] if the source has fewer lines.
#[inline]
fn find_line(source: &str, line: usize) -> Option<&str> { source.split('\n').nth(line).map(|l| l.strip_suffix('\r').unwrap_or(l)) }

/// Writes the given range of the given source to the given formatter.
///
/// # Arguments
/// - `f`: The Formatter to write to.
/// - `range`: The TextRange to print in the given source text.
/// - `source`: The source text to print.
/// - `colour`: The Style to print the markers with.
///
/// # Errors
/// This function errors if we failed to write to the given writer.
fn print_range(f: &mut Formatter<'_>, range: TextRange, source: &str, colour: Style) -> FResult {
    // Out-of-bounds ranges (e.g., the end of the input) are shown without context
    let Some(line) = find_line(source, range.start.line0()) else { return Ok(()) };
    let chars: Vec<char> = line.chars().collect();

    // Split the line in before, marked and after
    let red_start: usize = range.start.col0().min(chars.len());
    let red_end: usize = if range.start.line == range.end.line { (range.end.col1()).clamp(red_start, chars.len()) } else { chars.len() };
    let before: String = chars[..red_start].iter().collect();
    let marked: String = chars[red_start..red_end].iter().collect();
    let after: String = chars[red_end..].iter().collect();

    // Print the line with the range highlighted
    let width: usize = num_len(range.start.line1());
    writeln!(f, "{} {}{}{}", style(format!(" {} |", range.start.line1())).blue().bright(), before, colour.apply_to(marked), after)?;

    // Print the markers below it; empty ranges still get one
    let markers: String = (0..(red_end - red_start).max(1)).map(|_| '^').collect();
    writeln!(f, " {} {} {}{}", " ".repeat(width), style("|").blue().bright(), " ".repeat(red_start), colour.apply_to(markers))?;
    Ok(())
}





/***** AUXILLARY *****/
/// The pretty formatter for any [`PrettyError`].
#[derive(Debug)]
pub struct PrettyErrorFormatter<'e, 'f, 's> {
    /// The error to format.
    err    : &'e dyn PrettyError,
    /// The name of the file we are compiling.
    file   : &'f str,
    /// The source text to use as context.
    source : &'s str,
}
impl Display for PrettyErrorFormatter<'_, '_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        let ((msg, range), notes): ((String, Option<TextRange>), Vec<(String, TextRange)>) = self.err.ranges();

        // Print the main error
        match range {
            Some(range) => {
                writeln!(f, "{}: {}: {}", style(format!("{}:{}", self.file, range.start)).bold(), style("error").red().bold(), msg)?;
                print_range(f, range, self.source, Style::new().red().bold())?;
            },
            None => writeln!(f, "{}: {}: {}", style(self.file).bold(), style("error").red().bold(), msg)?,
        }

        // Print any additional notes
        for (msg, range) in notes {
            writeln!(f, "{}: {}: {}", style(format!("{}:{}", self.file, range.start)).bold(), style("note").green().bold(), msg)?;
            print_range(f, range, self.source, Style::new().green().bold())?;
        }
        Ok(())
    }
}





/***** LIBRARY *****/
/// Trait for an error that can print itself very prettily from some source text.
pub trait PrettyError: Error {
    // Child-implemented
    /// Returns the ranges that this error concerns itself with.
    ///
    /// Specifically, it can return one "main error range", and then zero or more "note ranges" that provide additional context.
    ///
    /// # Returns
    /// A tuple with the main error message and range (if any), and a vector with note texts and note ranges.
    ///
    /// Note that an empty main error range implies this error variant does not relate to source.
    fn ranges(&self) -> ((String, Option<TextRange>), Vec<(String, TextRange)>);


    // Globally provided
    /// Returns a formatter that writes this error with the relevant source line(s) attached to it.
    ///
    /// # Arguments
    /// - `file`: Some name that represents the source. Typically the filename for a file, or something like "<stdin>" for stdin.
    /// - `source`: The source text to use for context. We assume that the positions in this error match that of the given source text.
    ///
    /// # Returns
    /// A [`PrettyErrorFormatter`] that implements Display.
    #[inline]
    fn display_with_source<'e, 'f, 's>(&'e self, file: &'f str, source: &'s str) -> PrettyErrorFormatter<'e, 'f, 's>
    where
        Self: Sized,
    {
        PrettyErrorFormatter { err: self, file, source }
    }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use thiserror::Error;

    use super::*;
    use crate::spec::TextPos;

    #[derive(Debug, Error)]
    #[error("Unknown variable 'y'")]
    struct UnknownVar(TextPos);
    impl PrettyError for UnknownVar {
        fn ranges(&self) -> ((String, Option<TextRange>), Vec<(String, TextRange)>) { ((self.to_string(), Some(TextRange::single(self.0))), vec![]) }
    }

    #[test]
    fn test_pretty_print_marks_range() {
        console::set_colors_enabled(false);
        let source: &str = "fun main(): Void {\n    out << y;\n}\n";
        let text: String = UnknownVar(TextPos::new1(2, 12)).display_with_source("test.kite", source).to_string();
        assert!(text.starts_with("test.kite:2:12: error: Unknown variable 'y'"), "{text}");
        assert!(text.contains(" 2 |     out << y;"), "{text}");
        assert!(text.contains("           ^"), "{text}");

        // Positions past the end of the source only print the message
        let text: String = UnknownVar(TextPos::new1(9, 1)).display_with_source("test.kite", source).to_string();
        assert_eq!(text.lines().count(), 1);
    }
}
