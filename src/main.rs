use anyhow::{Context, Result};
use bucketcp::cli::Args;
use bucketcp::copy::Copier;
use bucketcp::path::SafetyGuard;
use bucketcp::storage::S3Store;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    tracing_subscriber::fmt()
        .with_max_level(args.output.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let guard = SafetyGuard::new(args.safety.protected_directories()?);
    tracing::debug!(
        "protected directories: {:?}",
        guard.protected().iter().collect::<Vec<_>>()
    );
    let store = S3Store::connect(&args.storage.s3_config())
        .context("Failed to initialize storage client")?;

    let progress = if args.output.progress && !args.output.quiet {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {wide_msg}")
                .context("Invalid progress template")?
                .progress_chars("=> "),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    if args.output.dry_run {
        tracing::info!("dry run: nothing will be fetched or written");
    }

    let stats = Copier::new(&store, &guard)
        .with_options(args.copy_options())
        .with_progress(progress)
        .run(&args.paths.input, &args.paths.output)
        .with_context(|| {
            format!(
                "Failed to copy {} to {}",
                args.paths.input, args.paths.output
            )
        })?;

    tracing::info!("{}", stats);
    Ok(())
}
