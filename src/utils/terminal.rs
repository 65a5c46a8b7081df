//! Sanitizing text before it reaches the terminal.
//!
//! Summaries come from the network and imports come from arbitrary files.
//! Either may carry escape sequences that would move the cursor or recolour
//! the UI, so both pass through [`strip_ansi_codes`] before being shown.

/// Strips ANSI escape sequences and stray control characters.
///
/// Handles CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL` or `ESC \`) and
/// two-byte escapes. Tabs, newlines and carriage returns are kept.
///
/// ```
/// use briefly::utils::terminal::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[31mRed summary\x1b[0m"), "Red summary");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.next() {
                Some('[') => {
                    // Parameters and intermediates up to the final byte
                    for next in chars.by_ref() {
                        if ('@'..='~').contains(&next) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }
        result.push(ch);
    }

    result
}
