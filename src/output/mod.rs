//! User-facing output: status lines and final file placement
//!
//! Status lines are separate from tracing output. Successes go to stdout,
//! errors to stderr, each with a distinct prefix.

pub mod writer;

pub use writer::OutputWriter;

const SUCCESS_PREFIX: &str = "✔ ";
const ERROR_PREFIX: &str = "✘ Error: ";

pub fn success_line(message: &str) -> String {
    format!("{}{}", SUCCESS_PREFIX, message)
}

pub fn error_line(message: &str) -> String {
    format!("{}{}", ERROR_PREFIX, message)
}

/// Print a checkmark-prefixed line to stdout
pub fn success(message: &str) {
    println!("{}", success_line(message));
}

/// Print a single-line error to stderr
pub fn error(message: &str) {
    eprintln!("{}", error_line(message));
}

/// Print a command that a dry run would have executed
pub fn dry_run(command: &str) {
    println!("DRYRUN: {}", command);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_distinct() {
        assert_eq!(success_line("/out/Movie.mkv"), "✔ /out/Movie.mkv");
        assert_eq!(error_line("No audio streams found"), "✘ Error: No audio streams found");
    }
}
