//! Package aggregation across a group tree
//!
//! Only projects with a `poetry.lock` take part. For each of them the
//! dependency set is either every locked package (transitive mode) or the
//! dependencies declared in `pyproject.toml`. A Dockerfile, when present,
//! contributes a `python` entry with the version of its base image.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::{debug, info};

use crate::config::{DOCKERFILE_PATH, LOCK_FILE_PATH, MANIFEST_PATH};
use crate::error::PackageError;
use crate::packages::files::FileFetcher;
use crate::packages::projects::ProjectResolver;
use crate::packages::subgroups::SubgroupResolver;
use crate::packages::types::{GroupPackage, PackageEntry, Project, ProjectRef};
use crate::packages::version::{VERSION_UNKNOWN, resolve_version, version_key};
use crate::parser::{
    DockerfileParser, Parser, PoetryLockParser, PyprojectTomlParser, decode_content,
};

/// Package name under which Dockerfile python versions are reported
const PYTHON_PACKAGE: &str = "python";

/// package name -> version -> projects
type PackageIndex = BTreeMap<String, BTreeMap<String, Vec<ProjectRef>>>;

/// Trait for listing the packages used across a group tree
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GroupPackageGetter: Send + Sync {
    /// Returns every package version used below `group_id`, sorted by
    /// package name, then version, then project name
    async fn get_group_packages(
        &self,
        group_id: u64,
        include_transitive: bool,
        use_cache: bool,
    ) -> Result<Vec<GroupPackage>, PackageError>;
}

/// Base64 encoded dependency files of one project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ProjectFiles {
    lock_file: String,
    dockerfile: Option<String>,
    manifest: Option<String>,
}

pub struct PackageAggregator {
    subgroups: Arc<dyn SubgroupResolver>,
    projects: Arc<dyn ProjectResolver>,
    files: Arc<dyn FileFetcher>,
    lock_parser: PoetryLockParser,
    manifest_parser: PyprojectTomlParser,
    dockerfile_parser: DockerfileParser,
}

impl PackageAggregator {
    pub fn new(
        subgroups: Arc<dyn SubgroupResolver>,
        projects: Arc<dyn ProjectResolver>,
        files: Arc<dyn FileFetcher>,
    ) -> Self {
        Self {
            subgroups,
            projects,
            files,
            lock_parser: PoetryLockParser::new(),
            manifest_parser: PyprojectTomlParser::new(),
            dockerfile_parser: DockerfileParser::new(),
        }
    }

    /// Fetch the lock file of every project, then the Dockerfile and (outside
    /// transitive mode) the manifest of the projects that have one
    async fn fetch_project_files(
        &self,
        projects: &[Project],
        include_transitive: bool,
        use_cache: bool,
    ) -> Result<HashMap<Project, ProjectFiles>, PackageError> {
        let lock_files = self
            .files
            .batch_get_files(projects, LOCK_FILE_PATH, use_cache)
            .await?;

        let mut projects_with_lock = Vec::new();
        let mut files = HashMap::new();
        for (project, file) in lock_files {
            if let Some(file) = file {
                projects_with_lock.push(project.clone());
                files.insert(
                    project,
                    ProjectFiles {
                        lock_file: file.content,
                        ..Default::default()
                    },
                );
            }
        }
        debug!(
            "{} of {} projects have a {}",
            projects_with_lock.len(),
            projects.len(),
            LOCK_FILE_PATH
        );

        let dockerfiles = self
            .files
            .batch_get_files(&projects_with_lock, DOCKERFILE_PATH, use_cache)
            .await?;
        for (project, file) in dockerfiles {
            if let Some(entry) = files.get_mut(&project) {
                entry.dockerfile = file.map(|f| f.content);
            }
        }

        if !include_transitive {
            let manifests = self
                .files
                .batch_get_files(&projects_with_lock, MANIFEST_PATH, use_cache)
                .await?;
            for (project, file) in manifests {
                if let Some(entry) = files.get_mut(&project) {
                    entry.manifest = file.map(|f| f.content);
                }
            }
        }

        Ok(files)
    }

    /// Decode and parse one file, attributing failures to the project
    fn parse_file<P: Parser>(
        parser: &P,
        project: &Project,
        file_path: &str,
        content: &str,
    ) -> Result<P::Output, PackageError> {
        decode_content(content)
            .and_then(|text| parser.parse(&text))
            .map_err(|source| PackageError::MalformedFile {
                project: project.name.clone(),
                file_path: file_path.to_string(),
                source,
            })
    }

    fn project_entries(
        &self,
        project: &Project,
        files: &ProjectFiles,
        include_transitive: bool,
    ) -> Result<Vec<PackageEntry>, PackageError> {
        let locked =
            Self::parse_file(&self.lock_parser, project, LOCK_FILE_PATH, &files.lock_file)?;

        let dependencies: BTreeSet<String> = if include_transitive {
            locked.keys().cloned().collect()
        } else {
            match &files.manifest {
                Some(manifest) => {
                    Self::parse_file(&self.manifest_parser, project, MANIFEST_PATH, manifest)?
                }
                None => BTreeSet::new(),
            }
        };

        let mut entries = Vec::with_capacity(dependencies.len() + 1);

        if let Some(dockerfile) = &files.dockerfile {
            let python_version =
                Self::parse_file(&self.dockerfile_parser, project, DOCKERFILE_PATH, dockerfile)?
                    .unwrap_or_else(|| VERSION_UNKNOWN.to_string());
            entries.push(PackageEntry {
                name: PYTHON_PACKAGE.to_string(),
                version: python_version,
                project: ProjectRef::from(project),
            });
        }

        for name in dependencies {
            let version = resolve_version(&name, &locked);
            entries.push(PackageEntry {
                name,
                version,
                project: ProjectRef::from(project),
            });
        }

        Ok(entries)
    }
}

/// Keep the first occurrence of every project id
fn dedup_projects(projects: Vec<Project>) -> Vec<Project> {
    let mut seen = HashSet::new();
    projects
        .into_iter()
        .filter(|project| seen.insert(project.id))
        .collect()
}

fn fold_entries(entries: impl IntoIterator<Item = PackageEntry>) -> PackageIndex {
    let mut index = PackageIndex::new();
    for entry in entries {
        index
            .entry(entry.name)
            .or_default()
            .entry(entry.version)
            .or_default()
            .push(entry.project);
    }
    index
}

/// Flatten the index into the response order
fn sorted_group_packages(index: PackageIndex) -> Vec<GroupPackage> {
    let mut group_packages = Vec::new();

    for (package_name, versions) in index {
        let mut versions: Vec<_> = versions
            .into_iter()
            .map(|(version, projects)| (version_key(&version), version, projects))
            .collect();
        versions.sort_by(|a, b| a.0.cmp(&b.0));

        for (_, package_version, mut projects) in versions {
            projects.sort_by(|a, b| {
                a.project_name
                    .to_lowercase()
                    .cmp(&b.project_name.to_lowercase())
                    .then_with(|| a.project_url.cmp(&b.project_url))
            });
            group_packages.push(GroupPackage {
                package_name: package_name.clone(),
                package_version,
                projects,
            });
        }
    }

    group_packages
}

#[async_trait]
impl GroupPackageGetter for PackageAggregator {
    async fn get_group_packages(
        &self,
        group_id: u64,
        include_transitive: bool,
        use_cache: bool,
    ) -> Result<Vec<GroupPackage>, PackageError> {
        let mut group_ids = self.subgroups.get_subgroup_ids(group_id).await?;
        group_ids.insert(group_id);

        let projects = dedup_projects(self.projects.batch_get_projects(&group_ids).await?);
        debug!(
            "Found {} projects in {} groups below group {}",
            projects.len(),
            group_ids.len(),
            group_id
        );

        let files = self
            .fetch_project_files(&projects, include_transitive, use_cache)
            .await?;

        let mut entries = Vec::new();
        for (project, project_files) in &files {
            entries.extend(self.project_entries(project, project_files, include_transitive)?);
        }

        let group_packages = sorted_group_packages(fold_entries(entries));
        info!(
            "Aggregated {} package versions from {} projects for group {}",
            group_packages.len(),
            files.len(),
            group_id
        );

        Ok(group_packages)
    }
}
