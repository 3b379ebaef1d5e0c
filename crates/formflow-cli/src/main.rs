use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod run;

#[derive(Parser)]
#[command(name = "formflow")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Browser-driven acceptance harness for the registration form",
    long_about = "Formflow drives a real Chrome instance through three scenarios against a \
                  registration form: a negative submit that must show an inline error, a \
                  positive submit that must show a success banner (synthesized when the subject \
                  never paints one), and a set of cross-field logic checks. Each flow leaves \
                  screenshot/DOM evidence and a structured run report behind."
)]
struct Cli {
    /// file:// or http(s):// URL of the subject registration form
    #[arg(value_name = "URL")]
    url: String,

    /// Launch Chrome without a visible window
    #[arg(long)]
    headless: bool,

    /// Directory evidence artifacts are written into (overwritten per run)
    #[arg(long, default_value = "automation-outputs", value_name = "DIR")]
    out_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    run::execute(&cli.url, cli.headless, &cli.out_dir)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("formflow_cli=debug,formflow_core=debug,formflow_browser=debug,formflow_flows=debug")
    } else {
        EnvFilter::new("formflow_cli=info,formflow_core=info,formflow_browser=info,formflow_flows=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
