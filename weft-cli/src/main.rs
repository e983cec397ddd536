use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use weft_cli::{BuildOptions, LoggingConfig, build_cmd, build_dir, init_logging};

#[derive(Parser)]
#[command(name = "weft", version, about = "Compile component templates into Rust")]
struct Cli {
    /// Increase log output (-v debug, -vv trace). RUST_LOG applies otherwise.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a template, or every .html template in a directory, into Rust.
    Build {
        /// Path to a template file or a directory of templates
        input: PathBuf,
        /// Output directory (default: next to the template)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Output file name (default: <stem>_vdom.rs)
        #[arg(long)]
        out_file: Option<String>,
        /// Component type receiving the generated impl (default: from the file stem)
        #[arg(long)]
        component: Option<String>,
        /// Data type the build data is downcast to (default: <Component>Data)
        #[arg(long)]
        data: Option<String>,
        /// `type` attribute marking the embedded Rust <script>
        #[arg(long)]
        script_type: Option<String>,
        /// Skip rustfmt and only check the output parses
        #[arg(long)]
        no_rustfmt: bool,
        /// rustfmt executable (default: $RUSTFMT or rustfmt)
        #[arg(long)]
        rustfmt: Option<PathBuf>,
        /// Edition passed to rustfmt
        #[arg(long)]
        edition: Option<String>,
        /// Seconds to wait for rustfmt
        #[arg(long)]
        format_timeout: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose));

    match cli.command {
        Commands::Build {
            input,
            out_dir,
            out_file,
            component,
            data,
            script_type,
            no_rustfmt,
            rustfmt,
            edition,
            format_timeout,
        } => {
            let opts = BuildOptions {
                out_dir,
                out_file,
                component_type: component,
                data_type: data,
                script_type,
                no_rustfmt,
                rustfmt,
                edition,
                format_timeout: format_timeout.map(Duration::from_secs),
            };
            let outputs = if input.is_dir() {
                build_dir(&input, &opts)?
            } else {
                vec![build_cmd(&input, &opts)?]
            };
            for out in outputs {
                println!("Generated: {}", out.display());
            }
        }
    }
    Ok(())
}
