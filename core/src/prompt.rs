//! Interactive input for prompt-style arguments.

use std::io::{self, BufRead, Write};

/// Supplies values for arguments declared with [`Arg::prompt`](crate::Arg::prompt).
///
/// Closures implement it too, which keeps tests free of real terminals:
///
/// ```
/// use argdecl_core::{Arg, Specification};
///
/// let mut spec = Specification::builder()
///     .arg("token", Arg::prompt::<String>(&["--token"], "Token: "))
///     .build()
///     .unwrap();
///
/// let mut answer = |_: &str| Ok::<_, std::io::Error>("s3cret\n".to_string());
/// spec.parse_with(&["--token"], "tool", &mut answer).unwrap();
/// assert_eq!(spec.get("token").unwrap().value::<String>().unwrap(), "s3cret");
/// ```
pub trait Prompter {
    /// Shows `message` and returns one line of input.
    fn prompt(&mut self, message: &str) -> io::Result<String>;
}

impl<F> Prompter for F
where
    F: FnMut(&str) -> io::Result<String>,
{
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        self(message)
    }
}

/// Writes the prompt to stderr and reads a line from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        let mut stderr = io::stderr();
        stderr.write_all(message.as_bytes())?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input"));
        }
        Ok(line)
    }
}
