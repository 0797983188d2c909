//! Script resolution
//!
//! [`ScriptResolver`] turns a reference into a ready-to-build script project:
//!
//! 1. Classify the reference ([`classify`])
//! 2. Stage remote content under `Scripts/Temp` when needed
//! 3. Get or create the cache entry and write `Sources/<Module>/main.swift`
//! 4. Discover dependencies and hand package URLs to the package manager
//! 5. Copy dependency scripts and write `Package.swift`

use crate::error::{MarathonError, MarathonResult};
use crate::package::PackageManager;
use crate::remote::Fetcher;
use crate::script::dependencies::{copy_dependency_scripts, DependencySet};
use crate::script::identifier::{derive_identifier, display_name, SCRIPT_EXTENSION};
use crate::script::marathonfile::MARATHONFILE;
use crate::script::materialize::{write_package_file, PACKAGE_FILE};
use crate::script::reference::{classify, raw_download_url, ClassifyOptions, ScriptSource};
use crate::script::staging::StagingDir;
use crate::script::store::{CacheStore, ENTRY_POINT, SOURCES_DIR};
use crate::script::{ProgressReporter, SilentReporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// Module name used when an identifier has no usable last segment
const FALLBACK_MODULE: &str = "Script";

/// A script project ready to be built
#[derive(Debug)]
pub struct ResolvedScript {
    /// Module / package name
    pub name: String,

    /// Project folder (cache entry, or a cloned repository)
    pub folder: PathBuf,

    staging: Option<StagingDir>,
}

impl ResolvedScript {
    fn cached(name: String, folder: PathBuf) -> Self {
        Self {
            name,
            folder,
            staging: None,
        }
    }

    /// Whether the folder is a staged clone deleted when this handle drops
    pub fn is_transient(&self) -> bool {
        self.staging.is_some()
    }
}

/// Resolves references into cached script projects
pub struct ScriptResolver {
    store: CacheStore,
    packages: Arc<dyn PackageManager>,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn ProgressReporter>,
    options: ClassifyOptions,
}

impl ScriptResolver {
    pub fn new(
        store: CacheStore,
        packages: Arc<dyn PackageManager>,
        fetcher: Arc<dyn Fetcher>,
        options: ClassifyOptions,
    ) -> Self {
        Self {
            store,
            packages,
            fetcher,
            reporter: Arc::new(SilentReporter),
            options,
        }
    }

    /// Report progress through `reporter`
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Resolve any kind of reference
    pub async fn resolve(&self, reference: &str) -> MarathonResult<ResolvedScript> {
        match classify(reference, &self.options)? {
            ScriptSource::LocalFile { path } => self.resolve_local_file(&path).await,
            ScriptSource::DirectUrl { url } => self.resolve_direct_url(&url).await,
            ScriptSource::Repository { url, branch } => {
                self.resolve_repository(&url, branch.as_deref()).await
            }
        }
    }

    /// Resolve a script file on disk into its cache entry
    pub async fn resolve_local_file(&self, path: &Path) -> MarathonResult<ResolvedScript> {
        let source = match fs::read_to_string(path).await {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MarathonError::ScriptNotFound(path.display().to_string()))
            }
            Err(e) => return Err(MarathonError::io(format!("reading {}", path.display()), e)),
        };

        let identifier = derive_identifier(&path.to_string_lossy());
        let name = module_name(&identifier);
        self.reporter.report(&format!("Resolving {}", name));

        let folder = self.store.entry(&identifier).await?;
        let module_dir = self.store.materialize_source(&folder, path, &name).await?;

        let dependencies = DependencySet::discover(path, &source).await?;
        let package_urls = dependencies.package_urls();
        if !package_urls.is_empty() {
            self.reporter
                .report(&format!("Adding {} package(s)", package_urls.len()));
        }
        self.packages.add_packages_if_needed(&package_urls).await?;

        if !dependencies.scripts().is_empty() {
            self.reporter.report("Copying dependency scripts");
        }
        copy_dependency_scripts(dependencies.scripts(), &module_dir, self.fetcher.as_ref())
            .await?;

        write_package_file(self.packages.as_ref(), &folder, &name, &package_urls).await?;
        self.packages.symlink_packages(&folder).await?;

        info!("Resolved {} into {}", path.display(), folder.display());
        Ok(ResolvedScript::cached(name, folder))
    }

    /// Download a single script file and resolve it
    pub async fn resolve_direct_url(&self, url: &str) -> MarathonResult<ResolvedScript> {
        let download_url = raw_download_url(url);
        let staging = self
            .store
            .staging(&derive_identifier(url))
            .await
            .map_err(|e| download_failure(url, e))?;

        self.reporter.report(&format!("Downloading {}", url));
        let content = self
            .fetcher
            .download(&download_url)
            .await
            .map_err(|e| download_failure(url, e))?;

        let file = staging.path().join(staged_file_name(url));
        fs::write(&file, content)
            .await
            .map_err(|e| download_failure(url, MarathonError::io("writing downloaded script", e)))?;

        if let Some(marathonfile) = self.fetch_sibling_marathonfile(&download_url).await {
            if let Err(e) = fs::write(staging.path().join(MARATHONFILE), marathonfile).await {
                debug!("Could not stage Marathonfile for {}: {}", url, e);
            }
        }

        self.resolve_local_file(&file).await
    }

    /// Clone a repository and resolve the script project it contains
    pub async fn resolve_repository(
        &self,
        url: &str,
        branch: Option<&str>,
    ) -> MarathonResult<ResolvedScript> {
        let staging = self
            .store
            .staging(&derive_identifier(url))
            .await
            .map_err(|e| download_failure(url, e))?;

        match branch {
            Some(branch) => self
                .reporter
                .report(&format!("Cloning {} ({})", url, branch)),
            None => self.reporter.report(&format!("Cloning {}", url)),
        }
        self.fetcher
            .clone_repository(url, branch, staging.path())
            .await
            .map_err(|e| download_failure(url, e))?;

        let clone = staging.path().to_path_buf();
        let files = swift_files(&clone).await?;

        if let Some(name) = self.packages.name_of_package(&clone).await? {
            if files.iter().any(|f| is_entry_point(f)) {
                debug!("{} is a package named {}", url, name);
                return Ok(ResolvedScript {
                    name,
                    folder: clone,
                    staging: Some(staging),
                });
            }
        }

        match files.as_slice() {
            [] => Err(MarathonError::NoSwiftFilesInRepository(url.to_string())),
            [only] => self.resolve_local_file(&clone.join(only)).await,
            _ => Err(MarathonError::MultipleSwiftFilesInRepository {
                url: url.to_string(),
                branch: branch.map(str::to_string),
                files: files.iter().map(|f| display_relative(f)).collect(),
            }),
        }
    }

    /// Best-effort download of a `Marathonfile` next to a script URL
    async fn fetch_sibling_marathonfile(&self, url: &str) -> Option<Vec<u8>> {
        let (parent, _) = url.rsplit_once('/')?;
        let sibling = format!("{}/{}", parent, MARATHONFILE);

        match self.fetcher.download(&sibling).await {
            Ok(content) => {
                debug!("Found Marathonfile at {}", sibling);
                Some(content)
            }
            Err(e) => {
                debug!("No Marathonfile at {}: {}", sibling, e);
                None
            }
        }
    }
}

fn module_name(identifier: &str) -> String {
    let name = display_name(identifier);
    if name.is_empty() {
        FALLBACK_MODULE.to_string()
    } else {
        name
    }
}

/// Keep download errors as they are, wrap everything else
fn download_failure(url: &str, error: MarathonError) -> MarathonError {
    match error {
        e @ MarathonError::FailedToDownloadScript { .. } => e,
        other => MarathonError::FailedToDownloadScript {
            url: url.to_string(),
            reason: other.to_string(),
        },
    }
}

/// File name for a downloaded script, always ending in `.swift`
fn staged_file_name(url: &str) -> String {
    let last = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .rsplit('/')
        .next()
        .unwrap_or_default();

    match last {
        "" => format!("{}{}", FALLBACK_MODULE.to_lowercase(), SCRIPT_EXTENSION),
        name if name.ends_with(SCRIPT_EXTENSION) => name.to_string(),
        name => format!("{}{}", name, SCRIPT_EXTENSION),
    }
}

fn is_entry_point(relative: &Path) -> bool {
    relative.starts_with(SOURCES_DIR)
        && relative.file_name().is_some_and(|n| n == ENTRY_POINT)
}

fn display_relative(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// `.swift` files under `root`, relative and sorted.
///
/// Skips the package manifest, hidden folders (`.git`, `.build`, ...).
async fn swift_files(root: &Path) -> MarathonResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| MarathonError::io(format!("reading {}", dir.display()), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| MarathonError::io(format!("reading {}", dir.display()), e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            let file_type = entry
                .file_type()
                .await
                .map_err(|e| MarathonError::io(format!("inspecting {}", name), e))?;
            let path = entry.path();

            if file_type.is_dir() {
                pending.push(path);
            } else if name.ends_with(SCRIPT_EXTENSION) && name != PACKAGE_FILE {
                if let Ok(relative) = path.strip_prefix(root) {
                    found.push(relative.to_path_buf());
                }
            }
        }
    }

    found.sort();
    Ok(found)
}
