//! Decorates an authored page: reads HTML from a file or stdin and writes the
//! decorated HTML to stdout.
//!
//! Log output goes to stderr and is controlled with `RUST_LOG`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use express_decorate::{decorate_bytes, DirectoryFetcher, Options};

#[derive(Parser)]
#[command(name = "express-decorate", version, about = "Decorate an Adobe Express page")]
struct Cli {
    /// HTML file to decorate (stdin when omitted)
    input: Option<PathBuf>,

    /// URL the page is served at, including query and hash
    #[arg(long, default_value = "https://www.adobe.com/express/")]
    url: String,

    /// User agent of the requesting client
    #[arg(long, default_value = "")]
    user_agent: String,

    /// Directory that site paths such as /blog-index.json resolve against
    #[arg(long, default_value = ".")]
    content_root: PathBuf,

    /// Seed for A/B test sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Tutorial tag to render as selected (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Filter text for the migrated-pages listing
    #[arg(long, default_value = "")]
    filter: String,

    /// Print the decoration report as JSON to stderr
    #[arg(long)]
    report: bool,
}

fn read_input(input: Option<&PathBuf>) -> io::Result<Vec<u8>> {
    match input {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let html = match read_input(cli.input.as_ref()) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("failed to read input: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = Options {
        url: cli.url,
        user_agent: cli.user_agent,
        ab_seed: cli.seed,
        selected_tags: cli.tags,
        page_filter: cli.filter,
        ..Options::default()
    };
    let fetcher = DirectoryFetcher::new(cli.content_root);

    let result = match decorate_bytes(&html, &options, &fetcher) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.report {
        match serde_json::to_string_pretty(&result.report) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => eprintln!("failed to serialise report: {e}"),
        }
    }

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(result.html.as_bytes()) {
        eprintln!("failed to write output: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
