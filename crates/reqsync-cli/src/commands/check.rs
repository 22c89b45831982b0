use super::{json_pretty, render_report, EXIT_MISMATCH, EXIT_SUCCESS};
use reqsync_core::{CheckOptions, Checker, Config};
use std::path::PathBuf;

/// Command-line overrides for the configured paths and sections.
#[derive(Debug, Default)]
pub struct CheckArgs {
    pub lock: Option<PathBuf>,
    pub requirements: Option<PathBuf>,
    pub dev: bool,
}

pub fn run(config: Config, args: CheckArgs, json: bool) -> Result<u8, String> {
    let mut options = CheckOptions::from(config);
    if let Some(lock) = args.lock {
        options.lock = lock;
    }
    if let Some(requirements) = args.requirements {
        options.requirements = requirements;
    }
    if args.dev {
        options = options.with_develop();
    }

    let report = Checker::new(options).run().map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&report)?);
    } else if !report.matches {
        eprint!("{}", render_report(&report));
    }

    if report.matches {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_MISMATCH)
    }
}
