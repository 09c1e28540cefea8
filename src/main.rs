use anyhow::Context;
use clap::Parser;
use img_shrink::cli::Args;
use img_shrink::{logger, optimize_directory};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::set_quiet_mode(args.quiet);
    logger::set_verbose_mode(args.verbose);

    let options = args.options()?;
    optimize_directory(&args.root, &options)
        .with_context(|| format!("Failed to optimize {}", args.root.display()))?;

    Ok(())
}
