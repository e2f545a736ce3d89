//! # Input Parsing
//!
//! Turns one line of keypad tokens into commands.
//!
//! ## Token Language
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Token                         Command                                  │
//! │  ─────                         ───────                                  │
//! │  7   12.5   .                  digits / decimal point, key by key       │
//! │  +  -  *  /  %  ^   x  mod     binary operator                          │
//! │  =                             equals                                   │
//! │  sqrt sin cos tan log ln       scientific function                      │
//! │  tax discount tip markup       business formula                         │
//! │  c   back                      clear / backspace                        │
//! │  recall <n|id>                 recall history entry                     │
//! │  history   clear-history       list / empty history                     │
//! │  rates   rate <name> <value>   show / change a rate                     │
//! │  show   help   quit                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tokens may be glued together: `2+3*4=` is the same as `2 + 3 * 4 =`.
//! A whitespace-separated chunk that starts with a letter is always read
//! as one word, so `clear-history` is not split on its `-`.

use tally_core::validation::validate_number_literal;
use tally_core::{BusinessFormula, OperationKind, ScientificFunction};

use crate::error::ApiError;

/// One parsed input action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A validated number literal, entered one key at a time.
    Number(String),
    Decimal,
    Operator(OperationKind),
    Equals,
    Function(ScientificFunction),
    Formula(BusinessFormula),
    Clear,
    Backspace,
    /// History id or 1-based position.
    Recall(String),
    History,
    ClearHistory,
    Rates,
    SetRate(BusinessFormula, f64),
    Show,
    Help,
    Quit,
}

/// Parses one input line.
///
/// Fails on the first token that is not part of the language; nothing
/// from a failing line is executed.
pub fn parse_line(line: &str) -> Result<Vec<Command>, ApiError> {
    let mut chunks = line.split_whitespace();
    let mut commands = Vec::new();

    while let Some(chunk) = chunks.next() {
        match chunk.to_lowercase().as_str() {
            "recall" => {
                let target = chunks
                    .next()
                    .ok_or_else(|| ApiError::validation("recall needs a history position or id"))?;
                commands.push(Command::Recall(target.to_string()));
            }
            "rate" => {
                let (Some(name), Some(value)) = (chunks.next(), chunks.next()) else {
                    return Err(ApiError::validation(
                        "usage: rate <tax|discount|tip|markup> <percent>",
                    ));
                };
                let formula: BusinessFormula = name.parse()?;
                let rate = value
                    .parse::<f64>()
                    .map_err(|_| ApiError::validation(format!("'{}' is not a valid rate", value)))?;
                commands.push(Command::SetRate(formula, rate));
            }
            _ => {
                for token in split_chunk(chunk) {
                    commands.push(parse_token(token)?);
                }
            }
        }
    }

    Ok(commands)
}

/// Splits a glued chunk into number runs, letter runs and single symbols.
fn split_chunk(chunk: &str) -> Vec<&str> {
    if chunk.starts_with(|c: char| c.is_alphabetic()) {
        return vec![chunk];
    }

    #[derive(PartialEq, Clone, Copy)]
    enum Class {
        Number,
        Word,
        Symbol,
    }

    let classify = |c: char| {
        if c.is_ascii_digit() || c == '.' {
            Class::Number
        } else if c.is_alphabetic() {
            Class::Word
        } else {
            Class::Symbol
        }
    };

    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<Class> = None;

    for (i, c) in chunk.char_indices() {
        let class = classify(c);
        // Symbols never merge, so `**` is two multiplications
        let continues = current == Some(class) && class != Class::Symbol;
        if !continues {
            if i > start {
                tokens.push(&chunk[start..i]);
            }
            start = i;
            current = Some(class);
        }
    }
    if start < chunk.len() {
        tokens.push(&chunk[start..]);
    }

    tokens
}

fn parse_token(token: &str) -> Result<Command, ApiError> {
    if token == "." {
        return Ok(Command::Decimal);
    }
    if token.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        validate_number_literal(token)?;
        return Ok(Command::Number(token.to_string()));
    }

    let word = token.to_lowercase();
    let command = match word.as_str() {
        "=" | "equals" => Command::Equals,
        "c" | "ac" | "clear" => Command::Clear,
        "back" | "bs" | "del" => Command::Backspace,
        "history" | "hist" => Command::History,
        "clear-history" => Command::ClearHistory,
        "rates" => Command::Rates,
        "show" | "display" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => {
            if let Ok(op) = word.parse::<OperationKind>() {
                Command::Operator(op)
            } else if let Ok(function) = word.parse::<ScientificFunction>() {
                Command::Function(function)
            } else if let Ok(formula) = word.parse::<BusinessFormula>() {
                Command::Formula(formula)
            } else {
                return Err(ApiError::unknown_command(token));
            }
        }
    };

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn num(s: &str) -> Command {
        Command::Number(s.to_string())
    }

    #[test]
    fn test_spaced_tokens() {
        let commands = parse_line("12.5 + 3 =").unwrap();
        assert_eq!(
            commands,
            vec![
                num("12.5"),
                Command::Operator(OperationKind::Add),
                num("3"),
                Command::Equals,
            ]
        );
    }

    #[test]
    fn test_glued_tokens() {
        let commands = parse_line("2+3*4=").unwrap();
        assert_eq!(
            commands,
            vec![
                num("2"),
                Command::Operator(OperationKind::Add),
                num("3"),
                Command::Operator(OperationKind::Multiply),
                num("4"),
                Command::Equals,
            ]
        );

        assert_eq!(
            parse_line("9sqrt").unwrap(),
            vec![num("9"), Command::Function(ScientificFunction::Sqrt)]
        );
        assert_eq!(
            parse_line("6x7").unwrap(),
            vec![num("6"), Command::Operator(OperationKind::Multiply), num("7")]
        );
    }

    #[test]
    fn test_words() {
        let commands = parse_line("c back history clear-history rates show help quit").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Clear,
                Command::Backspace,
                Command::History,
                Command::ClearHistory,
                Command::Rates,
                Command::Show,
                Command::Help,
                Command::Quit,
            ]
        );
    }

    #[test]
    fn test_functions_and_formulas() {
        let commands = parse_line("LOG ln tan tip Markup mod").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Function(ScientificFunction::Log10),
                Command::Function(ScientificFunction::Ln),
                Command::Function(ScientificFunction::Tan),
                Command::Formula(BusinessFormula::Tip),
                Command::Formula(BusinessFormula::Markup),
                Command::Operator(OperationKind::Modulo),
            ]
        );
    }

    #[test]
    fn test_lone_decimal_point() {
        assert_eq!(parse_line(". 5").unwrap(), vec![Command::Decimal, num("5")]);
        assert_eq!(parse_line(".5").unwrap(), vec![num(".5")]);
    }

    #[test]
    fn test_recall_takes_raw_argument() {
        let id = "3f0c2a1e-8d7b-4c5a-9e6f-0a1b2c3d4e5f";
        assert_eq!(
            parse_line(&format!("recall {}", id)).unwrap(),
            vec![Command::Recall(id.to_string())]
        );
        assert_eq!(
            parse_line("recall 2 +").unwrap(),
            vec![
                Command::Recall("2".to_string()),
                Command::Operator(OperationKind::Add),
            ]
        );

        let err = parse_line("recall").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_set_rate() {
        assert_eq!(
            parse_line("rate tip 20").unwrap(),
            vec![Command::SetRate(BusinessFormula::Tip, 20.0)]
        );

        assert_eq!(
            parse_line("rate vat 20").unwrap_err().code,
            ErrorCode::UnknownCommand
        );
        assert_eq!(
            parse_line("rate tip twenty").unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert_eq!(parse_line("rate tip").unwrap_err().code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_rejects_unknown_tokens() {
        let err = parse_line("2 & 3").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownCommand);
        assert!(err.message.contains("'&'"));

        assert_eq!(parse_line("sinh").unwrap_err().code, ErrorCode::UnknownCommand);
        assert_eq!(parse_line("1.2.3").unwrap_err().code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_blank_line() {
        assert!(parse_line("   ").unwrap().is_empty());
    }
}
