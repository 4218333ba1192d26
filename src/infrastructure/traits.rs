//! I/O boundary traits for testability
//!
//! These traits abstract the user dialogue and file access, allowing the game
//! and the tree store to be tested with scripted implementations.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use colored::Colorize;

/// User dialogue abstraction.
///
/// Every call blocks until the user has answered.
pub trait Interaction: Send + Sync {
    /// Emit a line of text.
    fn say(&self, message: &str) -> io::Result<()>;

    /// Show `prompt` and read a yes/no answer.
    fn ask_yes_no(&self, prompt: &str) -> io::Result<bool>;

    /// Show `prompt` and read a line of free text.
    fn ask_line(&self, prompt: &str) -> io::Result<String>;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Open a file for buffered line reading.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn BufRead>>;

    /// Create or truncate a file for buffered writing.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Rename/move a file, replacing `to` if it exists.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn BufRead>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Real dialogue on stdin/stdout.
///
/// Prompts are printed in cyan. Yes/no questions accept `y`, `yes`, `n`, `no`
/// in any case and ask again on anything else. End of input is reported as
/// `UnexpectedEof`.
#[derive(Debug, Default)]
pub struct ConsoleInteraction;

impl ConsoleInteraction {
    fn read_line(&self) -> io::Result<String> {
        let mut buf = String::new();
        if io::stdin().lock().read_line(&mut buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(buf.trim().to_string())
    }

    fn prompt(&self, prompt: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        write!(out, "{} ", prompt.cyan())?;
        out.flush()
    }
}

/// Interpret a yes/no reply. `None` if the reply is neither.
pub fn parse_yes_no(reply: &str) -> Option<bool> {
    match reply.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

impl Interaction for ConsoleInteraction {
    fn say(&self, message: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{message}")
    }

    fn ask_yes_no(&self, prompt: &str) -> io::Result<bool> {
        loop {
            self.prompt(&format!("{prompt} (y/n)"))?;
            let reply = self.read_line()?;
            match parse_yes_no(&reply) {
                Some(answer) => return Ok(answer),
                None => self.say("Please answer yes or no.")?,
            }
        }
    }

    fn ask_line(&self, prompt: &str) -> io::Result<String> {
        self.prompt(prompt)?;
        self.read_line()
    }
}
