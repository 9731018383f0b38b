use anyhow::{Context, Result};
use git2::{Repository, Signature, Time};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Git operations for versioning the data directory
pub struct GitOps {
    repo: Option<Mutex<Repository>>,
}

impl GitOps {
    /// Detect the git repository containing `data_dir`, if any
    pub fn new(data_dir: &Path) -> Self {
        let repo = Repository::discover(data_dir).ok().map(Mutex::new);
        if repo.is_some() {
            debug!(dir = %data_dir.display(), "data directory is under git");
        }
        Self { repo }
    }

    /// Check if the data directory is under git version control
    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Repository) -> Result<T>) -> Result<Option<T>> {
        match &self.repo {
            Some(repo) => {
                let repo = repo.lock().unwrap_or_else(PoisonError::into_inner);
                f(&*repo).map(Some)
            }
            None => Ok(None),
        }
    }

    fn current_branch(repo: &Repository) -> Result<String> {
        let head = repo.head().context("Failed to get HEAD")?;
        Ok(head
            .shorthand()
            .context("Failed to get branch name")?
            .to_string())
    }

    /// Fast-forward the current branch from `origin`
    pub fn pull(&self) -> Result<()> {
        self.with_repo(|repo| {
            let Ok(mut remote) = repo.find_remote("origin") else {
                debug!("no remote 'origin', skipping pull");
                return Ok(());
            };
            // an unborn branch has nothing to fast-forward
            let Ok(branch_name) = Self::current_branch(repo) else {
                return Ok(());
            };
            remote
                .fetch(&[&branch_name], None, None)
                .context("Failed to fetch from origin")?;

            let fetch_head = repo.find_reference("FETCH_HEAD")?;
            let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
            let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

            if analysis.is_up_to_date() {
                return Ok(());
            }

            if analysis.is_fast_forward() {
                let refname = format!("refs/heads/{}", branch_name);
                let mut reference = repo.find_reference(&refname)?;
                reference.set_target(fetch_commit.id(), "Fast-forward")?;
                repo.set_head(&refname)?;
                repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
            } else if analysis.is_normal() {
                anyhow::bail!(
                    "Merge required but automatic merge is not supported. Please resolve manually."
                );
            }
            Ok(())
        })
        .map(|_| ())
    }

    /// Commit the given files with `message`
    ///
    /// Files that do not exist yet are skipped.
    pub fn commit(&self, files: &[&Path], message: &str) -> Result<()> {
        self.with_repo(|repo| {
            let workdir = repo
                .workdir()
                .context("Repository has no working directory")?;
            // discover() reports a canonical workdir, so compare canonical paths
            let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());

            let mut index = repo.index()?;
            for file in files.iter().filter(|f| f.exists()) {
                let file = file.canonicalize()?;
                let relative = file
                    .strip_prefix(&workdir)
                    .context("File is not in repository")?;
                index.add_path(relative)?;
            }
            index.write()?;

            let tree_id = index.write_tree()?;
            let tree = repo.find_tree(tree_id)?;

            let parent_commit = match repo.head() {
                Ok(head) => {
                    let oid = head.target().context("HEAD has no target")?;
                    Some(repo.find_commit(oid)?)
                }
                Err(_) => None,
            };

            let signature = Self::get_signature(repo)?;
            let parents: Vec<_> = parent_commit.iter().collect();
            repo.commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )?;
            debug!(commit_message = message, "committed data files");
            Ok(())
        })
        .map(|_| ())
    }

    /// Push the current branch to `origin`
    pub fn push(&self) -> Result<()> {
        self.with_repo(|repo| {
            let Ok(mut remote) = repo.find_remote("origin") else {
                debug!("no remote 'origin', skipping push");
                return Ok(());
            };
            let branch_name = Self::current_branch(repo)?;
            let refspec = format!("refs/heads/{}", branch_name);
            remote.push(&[&refspec], None)?;
            Ok(())
        })
        .map(|_| ())
    }

    /// Signature from the repository config, with a fallback identity
    fn get_signature(repo: &Repository) -> Result<Signature<'static>> {
        let config = repo.config()?;

        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| "Productivity Tracker".to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| "productivity-mcp@localhost".to_string());

        match Signature::now(&name, &email) {
            Ok(sig) => Ok(sig),
            Err(_) => {
                let time = Time::new(1_700_000_000, 0);
                Signature::new(&name, &email, &time)
                    .context("Failed to create signature with fixed time")
            }
        }
    }

    /// Pull, commit `files`, then push
    pub fn sync(&self, files: &[&Path], commit_message: &str) -> Result<()> {
        if !self.is_git_managed() {
            return Ok(());
        }

        self.pull().context("Failed to pull changes")?;
        self.commit(files, commit_message)
            .context("Failed to commit changes")?;
        self.push().context("Failed to push changes")?;
        Ok(())
    }
}
