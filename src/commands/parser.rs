//! Slash-command parser for the input line.
//!
//! # Syntax
//!
//! ```text
//! command := "/" name (argument)*
//! argument := word | "quoted words"
//! ```
//!
//! Names are case-insensitive. `/open` takes the rest of the line as the path
//! when it is not quoted, so unquoted paths with spaces still work.
//!
//! ```
//! # use briefly::commands::{Command, parse_command};
//! # use briefly::models::SummaryMode;
//! assert_eq!(parse_command("/mode long").unwrap(), Some(Command::Mode(SummaryMode::Long)));
//! assert_eq!(parse_command("plain text").unwrap(), None);
//! ```

use std::iter::Peekable;
use std::str::Chars;

use anyhow::{Result, anyhow, bail};

use super::ast::Command;
use crate::utils::expand_tilde;

/// Split arguments on whitespace, keeping double-quoted runs together
fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch == '"' {
            chars.next();
            tokens.push(read_quoted(&mut chars)?);
        } else {
            tokens.push(read_word(&mut chars));
        }
    }
    Ok(tokens)
}

fn read_word(chars: &mut Peekable<Chars>) -> String {
    let mut word = String::new();
    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            break;
        }
        word.push(ch);
        chars.next();
    }
    word
}

/// Read up to the closing quote; `\"` and `\\` are escapes
fn read_quoted(chars: &mut Peekable<Chars>) -> Result<String> {
    let mut value = String::new();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => return Ok(value),
            '\\' => match chars.next() {
                Some(escaped @ ('"' | '\\')) => value.push(escaped),
                Some(other) => {
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            },
            _ => value.push(ch),
        }
    }
    Err(anyhow!("Unclosed quote"))
}

fn single_arg<'a>(name: &str, args: &'a [String]) -> Result<&'a str> {
    match args {
        [arg] => Ok(arg.as_str()),
        [] => bail!("/{name} needs an argument"),
        _ => bail!("/{name} takes a single argument"),
    }
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => bail!("Expected on or off, got '{other}'"),
    }
}

/// Parse `input` as a slash command. Text not starting with `/` is `Ok(None)`.
pub fn parse_command(input: &str) -> Result<Option<Command>> {
    let trimmed = input.trim();
    let Some(body) = trimmed.strip_prefix('/') else {
        return Ok(None);
    };

    let (name, rest) = match body.find(char::is_whitespace) {
        Some(pos) => (&body[..pos], body[pos..].trim()),
        None => (body, ""),
    };
    let name = name.to_lowercase();

    if name == "open" {
        if rest.is_empty() {
            bail!("/open needs a file path");
        }
        let path = if rest.starts_with('"') { single_arg("open", &tokenize(rest)?)?.to_string() } else { rest.to_string() };
        return Ok(Some(Command::Open(expand_tilde(&path))));
    }

    let args = tokenize(rest)?;
    let command = match name.as_str() {
        "lang" | "language" => Command::Language(single_arg(&name, &args)?.to_string()),
        "mode" => Command::Mode(single_arg(&name, &args)?.parse()?),
        "memory" => match args.as_slice() {
            [] => Command::Memory(None),
            _ => Command::Memory(Some(parse_switch(single_arg(&name, &args)?)?)),
        },
        "theme" => Command::Theme(single_arg(&name, &args)?.parse()?),
        "effect" | "bg" => Command::Effect(single_arg(&name, &args)?.parse()?),
        "voice" => {
            let voice = single_arg(&name, &args)?;
            Command::Voice((!voice.eq_ignore_ascii_case("default")).then(|| voice.to_string()))
        }
        "clear-history" => Command::ClearHistory,
        "help" | "?" => Command::Help,
        "" => bail!("Empty command. {}", Command::USAGE),
        other => bail!("Unknown command '/{other}'. {}", Command::USAGE),
    };
    Ok(Some(command))
}
