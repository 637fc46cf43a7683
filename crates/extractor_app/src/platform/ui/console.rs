use std::io::{self, Write};

use super::render::{ConsoleCommand, Severity};

/// Terminal sink for rendered commands.
///
/// Each render is a full snapshot of the view; only lines absent from the
/// previous snapshot are written. Payloads go to `out`, everything else to `err`.
pub struct Console<O: Write, E: Write> {
    out: O,
    err: E,
    quiet: bool,
    shown: Vec<ConsoleCommand>,
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E, quiet: bool) -> Self {
        Self {
            out,
            err,
            quiet,
            shown: Vec::new(),
        }
    }

    pub fn apply(&mut self, commands: Vec<ConsoleCommand>) -> io::Result<()> {
        for command in &commands {
            if !self.shown.contains(command) {
                self.write(command)?;
            }
        }
        self.shown = commands;
        self.out.flush()?;
        self.err.flush()
    }

    /// Writes a one-off line that is not part of the view.
    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.err, "{text}")
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn write(&mut self, command: &ConsoleCommand) -> io::Result<()> {
        match command {
            ConsoleCommand::Payload(text) => writeln!(self.out, "{text}"),
            ConsoleCommand::Status { text, severity } => {
                if self.quiet && *severity != Severity::Error {
                    return Ok(());
                }
                writeln!(self.err, "{text}")
            }
            ConsoleCommand::Detail(text) => {
                if self.quiet {
                    return Ok(());
                }
                writeln!(self.err, "{text}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(text: &str, severity: Severity) -> ConsoleCommand {
        ConsoleCommand::Status {
            text: text.to_string(),
            severity,
        }
    }

    #[test]
    fn repeated_lines_are_written_once() {
        let mut console = Console::new(Vec::new(), Vec::new(), false);
        console
            .apply(vec![status("Files: 1 file(s) selected", Severity::Information)])
            .unwrap();
        console
            .apply(vec![
                status("Files: 1 file(s) selected", Severity::Information),
                status("Processing... (uploading)", Severity::Information),
            ])
            .unwrap();

        let (out, err) = console.into_inner();
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Files: 1 file(s) selected\nProcessing... (uploading)\n"
        );
    }

    #[test]
    fn quiet_keeps_payload_and_errors() {
        let mut console = Console::new(Vec::new(), Vec::new(), true);
        console
            .apply(vec![
                status("Files: 1 file(s) selected", Severity::Information),
                ConsoleCommand::Detail("  a.pdf - 0.00 MB".to_string()),
                status("Error: boom", Severity::Error),
                ConsoleCommand::Payload("{}".to_string()),
            ])
            .unwrap();

        let (out, err) = console.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "{}\n");
        assert_eq!(String::from_utf8(err).unwrap(), "Error: boom\n");
    }
}
