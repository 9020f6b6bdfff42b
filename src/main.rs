use anyhow::{bail, ensure, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::{env, fs, path::PathBuf};

use msgpack_tags::{
    file_store::LocalFileStore,
    scanner::{scan, FileReport, FileStatus, ScanObserver, ScanOptions, Traversal},
};

struct Args {
    root: PathBuf,
    report_path: Option<String>,
    quiet: bool,
    options: ScanOptions,
}

fn usage(program: &str, opts: &getopts::Options) -> String {
    opts.usage(&format!("Usage: {} [options] [ROOT]", program))
}

fn get_args() -> Result<Option<Args>> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "msgpack-tags".to_string());
    let args: Vec<String> = args.collect();

    let mut opts = getopts::Options::new();
    opts.optflag("n", "dry-run", "print rewrites without writing files");
    opts.optflag("q", "quiet", "do not print each rewrite");
    opts.optopt("r", "report", "write the scan report as JSON", "FILE");
    opts.optmulti("s", "skip", "skip directories whose name contains MARKER", "MARKER");
    opts.optflag("h", "help", "print this help");

    let matches = match opts.parse(&args) {
        Ok(m) => m,
        Err(f) => bail!(f),
    };

    if matches.opt_present("h") {
        println!("{}", usage(&program, &opts));
        return Ok(None);
    }

    ensure!(
        matches.free.len() <= 1,
        "Too many arguments\n{}",
        usage(&program, &opts)
    );

    let root = match matches.free.get(0) {
        Some(root) => PathBuf::from(root),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    let mut options = ScanOptions::default();
    options.dry_run = matches.opt_present("n");
    options.skip_markers.extend(matches.opt_strs("s"));

    Ok(Some(Args {
        root,
        report_path: matches.opt_str("r"),
        quiet: matches.opt_present("q"),
        options,
    }))
}

struct ConsoleObserver {
    pb: ProgressBar,
    quiet: bool,
    dry_run: bool,
}

impl ScanObserver for ConsoleObserver {
    fn collected(&mut self, traversal: &Traversal) {
        for dir in &traversal.unlistable {
            self.pb
                .println(format!("skipped {}: {}", dir.path.display(), dir.message));
        }

        self.pb
            .println(format!("Finished. {} files found.", traversal.files.len()));

        if self.dry_run {
            self.pb.println("Mirroring tags (dry run)...");
        } else {
            self.pb.println("Mirroring tags...");
        }

        self.pb.set_length(traversal.files.len() as u64);
    }

    fn processed(&mut self, report: &FileReport) {
        if !self.quiet {
            for rewrite in &report.rewrites {
                self.pb
                    .println(format!("{} => {}", rewrite.original, rewrite.rewritten));
            }
        }

        if report.is_failed() {
            if let Some(message) = &report.message {
                self.pb
                    .println(format!("{}: {}", report.path.display(), message));
            }
        }

        self.pb.inc(1);
    }
}

fn main() -> Result<()> {
    let Some(args) = get_args()? else {
        return Ok(());
    };

    ensure!(
        args.root.is_dir(),
        "Directory not found: {}",
        args.root.display()
    );

    println!("Scanning {}...", args.root.display());

    let mut observer = ConsoleObserver {
        pb: create_progress_bar(0)?,
        quiet: args.quiet,
        dry_run: args.options.dry_run,
    };
    let report = scan(&LocalFileStore, &args.root, &args.options, &mut observer)?;
    observer.pb.finish_and_clear();

    println!(
        "Finished. {} rewrites in {} files ({} unchanged, {} malformed, {} unreadable, {} unwritable).",
        report.rewrite_count(),
        report.count(FileStatus::Rewritten),
        report.count(FileStatus::Unchanged),
        report.count(FileStatus::Malformed),
        report.count(FileStatus::Unreadable),
        report.count(FileStatus::Unwritable),
    );

    if let Some(report_path) = &args.report_path {
        fs::write(report_path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Failed to write report: {}", report_path))?;
    }

    Ok(())
}

fn create_progress_bar(len: u64) -> Result<ProgressBar> {
    let style = ProgressStyle::with_template(
        "{percent:>3}% [{wide_bar:.cyan/blue}] {pos}/{len} [{elapsed_precise} < {eta_precise}]",
    )
    .context("Invalid progress bar template")?
    .progress_chars("#-");

    Ok(ProgressBar::new(len).with_style(style))
}
