use std::path::Path;

use clap::Parser;
use tracing::info;

use dirdigest::cli::{Cli, Commands, ScanArgs, TreeArgs};
use dirdigest::config::{ExclusionRules, JobRequest, ScanJob, Settings, SettingsStore, project_name};
use dirdigest::output::TreeRenderer;
use dirdigest::progress::ScanProgress;
use dirdigest::scanner::ExclusionFilter;
use dirdigest::{DirDigestError, EXIT_SUCCESS, ScanOrchestrator, ScanOutcome, ScanStatus, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Scan(args) => run_scan(args, &cli),
        Commands::Tree(args) => run_tree(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

fn run_scan(args: &ScanArgs, cli: &Cli) -> dirdigest::Result<i32> {
    // 1. Defaults, then saved settings, then flags
    let store = SettingsStore::new(args.settings.clone());
    let mut request = JobRequest::default();
    if !args.no_settings {
        store.load()?.apply_to(&mut request);
    }
    args.apply_to(&mut request);

    // 2. Validate before touching the destination
    let job = ScanJob::from_request(&request)?;

    // 3. Persist what was actually used
    if args.save_settings {
        let path = store.save(&Settings::from_request(&request))?;
        info!(path = %path.display(), "saved settings");
    }

    // 4. Run on the worker while the bar follows progress
    let progress = ScanProgress::new(cli.quiet);
    let handle = ScanOrchestrator::new(job).spawn(progress.clone())?;
    let result = handle.join();
    progress.finish();
    let outcome = result?;

    if !cli.quiet {
        println!("{}", summary_line(&outcome));
    }
    Ok(EXIT_SUCCESS)
}

fn summary_line(outcome: &ScanOutcome) -> String {
    let base = format!(
        "Saved {} ({} files, {}/{} items)",
        outcome.output.display(),
        outcome.files,
        outcome.processed,
        outcome.total
    );
    match outcome.status() {
        ScanStatus::Success => base,
        ScanStatus::PartialSuccess => {
            format!("{base}; {} unreadable items recorded inline", outcome.inline_errors)
        }
    }
}

fn run_tree(args: &TreeArgs) -> dirdigest::Result<i32> {
    let mut request = JobRequest::default();
    args.exclusions.apply_to(&mut request);

    let root: &Path = &args.root;
    if !root.is_dir() {
        return Err(DirDigestError::Config(format!(
            "source folder is not a directory: {}",
            root.display()
        )));
    }

    let filter = ExclusionFilter::new(ExclusionRules::new(
        &request.exclude_extensions,
        &request.exclude_folders,
        &request.exclude_files,
    ));
    println!("{}/", project_name(root));
    for line in TreeRenderer::new(&filter, args.max_depth).render(root) {
        println!("{line}");
    }
    Ok(EXIT_SUCCESS)
}
