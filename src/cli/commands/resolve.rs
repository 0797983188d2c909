//! Resolve command - materialize a script into the cache

use crate::cli::args::ResolveArgs;
use crate::config::Config;
use crate::error::{MarathonError, MarathonResult};
use crate::package::SwiftPackageManager;
use crate::remote::{NetworkFetcher, ProcessRunner, SystemProcessRunner};
use crate::script::{CacheStore, ClassifyOptions, ScriptResolver};
use crate::ui::{self, SpinnerReporter, UiContext};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config, root: &Path) -> MarathonResult<()> {
    let ctx = UiContext::detect();
    let cwd = std::env::current_dir()
        .map_err(|e| MarathonError::io("getting current directory", e))?;

    let options = ClassifyOptions {
        cwd,
        allow_remote: config.remote.allow && !args.no_remote,
        git_host: config.remote.git_host.clone(),
    };
    debug!(
        "Resolving '{}' under {} (remote: {})",
        args.reference,
        root.display(),
        options.allow_remote
    );

    let runner: Arc<dyn ProcessRunner> = Arc::new(SystemProcessRunner);
    let packages = Arc::new(SwiftPackageManager::new(
        root,
        config.swift.tools_version.clone(),
        runner.clone(),
    ));
    let fetcher = Arc::new(NetworkFetcher::new(runner));
    let reporter = Arc::new(SpinnerReporter::new(&ctx));

    let resolver = ScriptResolver::new(CacheStore::new(root), packages, fetcher, options)
        .with_reporter(reporter.clone());

    let resolved = match resolver.resolve(&args.reference).await {
        Ok(resolved) => resolved,
        Err(e) => {
            reporter.fail(&format!("Could not resolve {}", args.reference));
            return Err(e);
        }
    };

    reporter.finish(&format!("Resolved {}", resolved.name));
    if resolved.is_transient() {
        ui::remark(
            &ctx,
            "The repository is a package on its own; its checkout is not kept in the cache",
        );
    } else {
        ui::key_value(&ctx, "Folder", &resolved.folder.display().to_string());
    }

    Ok(())
}
