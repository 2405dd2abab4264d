use clap::Parser;
use env_logger::Env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use gutterdiff::git;
use gutterdiff::terminal::TerminalHost;
use gutterdiff::theme::Theme;
use gutterdiff::{Direction, GutterConfig, LineRange, Session, Side};

/// Show which lines of a file changed, as a gutter next to the text.
#[derive(Debug, Parser)]
#[command(name = "gutterdiff", version)]
struct Cli {
    /// File to annotate
    file: PathBuf,

    /// Compare against this file instead of the version in git HEAD
    #[arg(long)]
    orig: Option<PathBuf>,

    /// First line to show (0-based)
    #[arg(long, default_value_t = 0)]
    from: usize,

    /// Number of lines to show (defaults to the terminal height)
    #[arg(long)]
    height: Option<usize>,

    /// TOML file with debounce and viewport settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the first line of the next change after LINE and exit
    #[arg(long, value_name = "LINE", conflicts_with = "prev")]
    next: Option<usize>,

    /// Print the last line of the previous change before LINE and exit
    #[arg(long, value_name = "LINE")]
    prev: Option<usize>,

    /// List changed regions instead of rendering the file
    #[arg(long)]
    chunks: bool,

    #[arg(long)]
    light: bool,
}

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));
    let cli = Cli::parse();

    if let Err(msg) = run(&cli) {
        eprintln!("Error: {}", msg);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => GutterConfig::load(path).map_err(|e| e.to_string())?,
        None => GutterConfig::default(),
    };

    let edited = fs::read_to_string(&cli.file)
        .map_err(|e| format!("cannot read '{}': {}", cli.file.display(), e))?;
    let original = match &cli.orig {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?,
        None => head_original(&cli.file)?,
    };

    let (term_width, term_height) = crossterm::terminal::size().unwrap_or((80, 24));
    let height = cli.height.unwrap_or(term_height as usize);
    let viewport = LineRange::new(cli.from, cli.from + height);

    let host = TerminalHost::new(edited, viewport);
    let mut session = Session::new(original, host, config).map_err(|e| e.to_string())?;

    let jump = match (cli.next, cli.prev) {
        (Some(line), _) => Some((line, Direction::Next)),
        (None, Some(line)) => Some((line, Direction::Previous)),
        (None, None) => None,
    };
    if let Some((line, direction)) = jump {
        let found = session
            .find_chunk_boundary(line, Side::Edited, direction)
            .map_err(|e| e.to_string())?;
        match found {
            Some(target) => println!("{}", target),
            None => return Err("no change in that direction".to_string()),
        }
        return Ok(());
    }

    if cli.chunks {
        for chunk in session.chunks().map_err(|e| e.to_string())? {
            println!(
                "original {}..{} -> edited {}..{}",
                chunk.orig_from, chunk.orig_to, chunk.edit_from, chunk.edit_to
            );
        }
        return Ok(());
    }

    let theme = if cli.light { Theme::Light } else { Theme::Dark };
    let host = session.end();
    host.render(&mut io::stdout(), theme, term_width)
        .map_err(|e| e.to_string())
}

/// Committed version of `path`, with a hint to use --orig when there is none.
fn head_original(path: &Path) -> Result<String, String> {
    if !git::is_git_available(path) {
        return Err(format!(
            "'{}' is not in a git repository, pass --orig to compare against a file",
            path.display()
        ));
    }
    if !git::is_file_tracked(path) {
        return Err(format!(
            "'{}' has no committed version in HEAD, pass --orig to compare against a file",
            path.display()
        ));
    }
    git::get_head_content(path).map_err(|e| e.to_string())
}
