mod cli_options;

use cli_options::CliOptions;
use shimcc_rewriter::*;

use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn run(options: CliOptions) -> Result<(), ShimError> {
    if options.list_rules {
        let mut stdout = io::stdout().lock();
        for (i, rule) in Pipeline::standard().rules().enumerate() {
            writeln!(stdout, "{:>2}. {:<18} {}", i + 1, rule.name(), rule.description())?;
        }
        return Ok(());
    }

    let prologue = options.prologue();
    log::debug!(
        "prologue: {}, {} input file(s)",
        match prologue {
            Some(p) if p.is_hosted() => "hosted",
            Some(_) => "minimal",
            None => "none",
        },
        options.files.len()
    );

    match &options.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|source| ShimError::Create { path: path.clone(), source })?;
            let mut out = BufWriter::new(file);

            emit(&mut out, prologue.as_ref(), &options.files)
        }
        None => emit(&mut io::stdout().lock(), prologue.as_ref(), &options.files),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = CliOptions::parse();

    if let Err(e) = run(options) {
        e.print();
        std::process::exit(1);
    }
}
