// ttsclean/src/ui/output_format.rs
//! Formatting of error messages and rule traces for the terminal.
//!
//! Colour is applied only when the caller says the target supports it,
//! which the commands decide with `is_terminal`.

use owo_colors::{AnsiColors, OwoColorize};
use std::io::{self, Write};

use ttsclean_core::{TraceEntry, Transformation};

/// The logical parts of the output that get their own colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Error,
    RuleName,
    Params,
    EarlyExit,
}

impl Style {
    fn color(self) -> AnsiColors {
        match self {
            Style::Error => AnsiColors::Red,
            Style::RuleName => AnsiColors::Green,
            Style::Params => AnsiColors::BrightBlack,
            Style::EarlyExit => AnsiColors::Magenta,
        }
    }
}

/// Returns `text` coloured for `style`, or unchanged when colour is off.
pub fn paint(text: &str, style: Style, supports_color: bool) -> String {
    if supports_color {
        text.color(style.color()).to_string()
    } else {
        text.to_string()
    }
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    writeln!(writer, "{} {}", paint("[error]", Style::Error, supports_color), msg)
}

/// Writes one line per trace entry, numbered from 1, then the summary line.
pub fn print_trace<W: Write>(writer: &mut W, transformation: &Transformation, supports_color: bool) -> io::Result<()> {
    for (n, step) in transformation.steps.iter().enumerate() {
        match step {
            TraceEntry::Applied { rule, params, output } => {
                let params = params
                    .as_deref()
                    .map(|p| paint(&format!("({})", p), Style::Params, supports_color))
                    .unwrap_or_default();
                writeln!(
                    writer,
                    "{:>3}. {}{} => {:?}",
                    n + 1,
                    paint(rule.as_str(), Style::RuleName, supports_color),
                    params,
                    output
                )?;
            }
            TraceEntry::EarlyExit => {
                writeln!(writer, "{:>3}. {}", n + 1, paint("early exit", Style::EarlyExit, supports_color))?;
            }
        }
    }
    writeln!(writer, "{}", transformation.summary_line())
}
