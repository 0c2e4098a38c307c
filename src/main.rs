use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use clap::Parser;
use hardwrap::{
    Document,
    HardLineWrap,
    PendingEdit,
    ReflowConfig,
    WrapMode,
    apply_keystroke,
    config::{DEFAULT_LINE_WIDTH, DEFAULT_TAB_WIDTH},
    reflow_text,
};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Hard-wrap paragraphs and list items of structured text")]
struct Cli {
    /// Rewrite files in place
    #[arg(long = "in-place", requires = "files")]
    in_place: bool,
    #[command(flatten)]
    opts: WrapOpts,
    #[command(flatten)]
    edit: EditOpts,
    /// Files to rewrap; standard input is read when none are given
    files: Vec<PathBuf>,
}

#[derive(clap::Args, Clone, Copy)]
struct WrapOpts {
    /// Maximum line width in columns
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    width: usize,
    /// Wrapping mode; only `hard` rewrites text
    #[arg(long, value_enum, default_value_t = WrapMode::Hard)]
    mode: WrapMode,
    /// Columns a tab occupies in indentation
    #[arg(long = "tab-width", default_value_t = DEFAULT_TAB_WIDTH)]
    tab_width: usize,
}

impl WrapOpts {
    fn config(self) -> ReflowConfig {
        ReflowConfig {
            max_line_width: self.width,
            wrap_mode: self.mode,
            tab_width: self.tab_width,
        }
    }
}

/// Simulate a single keystroke instead of rewrapping everything.
#[derive(clap::Args, Clone)]
struct EditOpts {
    /// Byte offset of the edit
    #[arg(long)]
    at: Option<usize>,
    /// Number of bytes the edit deletes
    #[arg(long, requires = "at")]
    delete: Option<usize>,
    /// Text the edit inserts
    #[arg(long, requires = "at")]
    insert: Option<String>,
}

impl EditOpts {
    fn pending(&self) -> Option<PendingEdit> {
        let offset = self.at?;
        Some(PendingEdit::new(
            offset,
            self.delete.unwrap_or(0),
            self.insert.clone().unwrap_or_default(),
        ))
    }
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read standard input")?;
            Ok(input)
        }
    }
}

fn write_output(path: &Path, text: &str) -> anyhow::Result<()> {
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Apply one edit to a single input and report the caret on stderr.
fn run_edit(cli: &Cli, config: ReflowConfig, edit: &PendingEdit) -> anyhow::Result<()> {
    if cli.files.len() > 1 {
        bail!("an edit applies to a single input, got {} files", cli.files.len());
    }
    let path = cli.files.first().map(PathBuf::as_path);
    let input = read_input(path)?;
    let engine = HardLineWrap::new(config);
    let mut document = Document::new(&input);
    let outcome = apply_keystroke(&engine, &mut document, edit, config.max_line_width)
        .with_context(|| format!("edit at offset {} does not fit the input", edit.offset))?;

    let text = document.text();
    match path {
        Some(path) if cli.in_place => write_output(path, &text)?,
        _ => print!("{text}"),
    }
    eprintln!("caret: {}", outcome.caret);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Entry point for the command-line rewrapper.
///
/// Without files the text is read from standard input and written to
/// standard output. Several files are rewrapped in parallel and printed in
/// the order given, or rewritten with `--in-place`. `--at` switches to edit
/// simulation: the edit is applied to the single input as if typed, and the
/// resulting caret offset is printed to standard error.
///
/// # Examples
///
/// ```sh
/// # Rewrap a file to 72 columns
/// hardwrap --width 72 notes.rst
///
/// # Type "x" at byte 120 and see where the caret lands
/// hardwrap --at 120 --insert x notes.rst
/// ```
fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.opts.config();

    if let Some(edit) = cli.edit.pending() {
        return run_edit(&cli, config, &edit);
    }

    if cli.files.is_empty() {
        let input = read_input(None)?;
        print!("{}", reflow_text(&input, &config));
        return Ok(());
    }

    let outputs = cli
        .files
        .par_iter()
        .map(|path| read_input(Some(path.as_path())).map(|text| reflow_text(&text, &config)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    for (path, text) in cli.files.iter().zip(outputs) {
        if cli.in_place {
            write_output(path, &text)?;
        } else {
            print!("{text}");
        }
    }
    Ok(())
}
