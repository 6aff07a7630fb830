//! Interactive URL prompt used when no URL argument is given.

use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter the video URL: ";

/// Prints the prompt and reads one line. EOF yields an empty string, which
/// URL validation then reports.
pub fn read_url<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<String> {
    write!(out, "{PROMPT}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
