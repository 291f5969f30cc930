use clap::Parser;
use shimcc_rewriter::Prologue;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shimcc",
    version,
    about = "Prepends stand-in libc declarations and rewrites C sources for a minimal C compiler",
    after_help = "The prologue and all rewritten FILES are written as one translation unit."
)]
pub struct CliOptions {
    /// C source files to rewrite, emitted in the order given
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Specifies the output-file to write to instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Leaves out globbing, path, process and environment declarations
    #[arg(long, conflicts_with = "no_prologue")]
    pub minimal: bool,

    /// Only prints the rewritten files
    #[arg(long)]
    pub no_prologue: bool,

    /// Prints the rewrite rules in the order they are applied
    #[arg(long)]
    pub list_rules: bool,
}

impl CliOptions {
    // the prologue selected by the options, `None` if it should be skipped
    pub fn prologue(&self) -> Option<Prologue> {
        match (self.no_prologue, self.minimal) {
            (true, _) => None,
            (false, true) => Some(Prologue::minimal()),
            (false, false) => Some(Prologue::hosted()),
        }
    }
}
