use std::path::Path;

use git2::{Commit, Oid, Repository, Status, StatusOptions};

use crate::error::{AutoCommitError, Result};

/// Wrapper around git2::Repository for the commit workflow.
///
/// Provides the high-level operations git-autocommit needs: syncing with the
/// remote, staging, inspecting the index, committing, tagging and pushing.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discover the git repository in the current directory or its parents.
    pub fn open() -> Result<Self> {
        Self::open_at(".")
    }

    /// Discover the git repository containing `path`.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            AutoCommitError::config(format!("Not in a git repository: {}", e))
        })?;
        Ok(GitRepo { repo })
    }

    /// Absolute path of the working directory.
    ///
    /// Paths from the configuration are resolved against this, not against
    /// the process cwd, so running from a subdirectory targets the same file
    /// the index does.
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| AutoCommitError::config("Repository has no working directory"))
    }

    /// The committer identity from git configuration.
    ///
    /// Fails when user.name / user.email are not configured, which must be
    /// caught before any workflow step mutates state.
    pub fn identity(&self) -> Result<(String, String)> {
        let signature = self.repo.signature().map_err(|e| {
            AutoCommitError::config(format!(
                "Git identity is not configured (set user.name and user.email): {}",
                e
            ))
        })?;

        let name = signature.name().unwrap_or("").to_string();
        let email = signature.email().unwrap_or("").to_string();

        if name.is_empty() || email.is_empty() {
            return Err(AutoCommitError::config(
                "Git identity is not configured (set user.name and user.email)",
            ));
        }

        Ok((name, email))
    }

    /// Name of the branch HEAD points at.
    pub fn current_branch(&self) -> Result<String> {
        let head_ref = self.repo.find_reference("HEAD")?;
        head_ref
            .symbolic_target()
            .map(|target| target.trim_start_matches("refs/heads/").to_string())
            .ok_or_else(|| {
                AutoCommitError::config("HEAD is detached; check out a branch first")
            })
    }

    /// Fetch branches and tags from the remote, then fast-forward the current
    /// branch to its remote counterpart when possible (`git pull --ff-only`).
    ///
    /// Diverged branches are left untouched; the later push surfaces the
    /// conflict instead.
    pub fn pull(&self, remote_name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            AutoCommitError::remote(format!("Remote '{}' not found", remote_name))
        })?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(credential_callbacks());

        // Fetch all remote branches plus tags so version discovery sees
        // everything published so far.
        let refspec_heads = format!("+refs/heads/*:refs/remotes/{}/*", remote_name);
        let refspecs = &[refspec_heads.as_str(), "+refs/tags/*:refs/tags/*"];
        remote
            .fetch(refspecs, Some(&mut fetch_options), None)
            .map_err(|e| {
                AutoCommitError::remote(format!(
                    "Failed to fetch from remote '{}': {}",
                    remote_name, e
                ))
            })?;

        let branch = self.current_branch()?;
        self.fast_forward_branch(&branch, remote_name)
    }

    fn fast_forward_branch(&self, branch_name: &str, remote_name: &str) -> Result<()> {
        let remote_ref_name = format!("refs/remotes/{}/{}", remote_name, branch_name);
        let remote_ref = match self.repo.find_reference(&remote_ref_name) {
            Ok(r) => r,
            // Remote branch doesn't exist, nothing to update
            Err(_) => return Ok(()),
        };

        let remote_oid = match remote_ref.target() {
            Some(oid) => oid,
            None => return Ok(()),
        };

        let local_ref_name = format!("refs/heads/{}", branch_name);
        let local_oid = match self.repo.find_reference(&local_ref_name) {
            Ok(r) => match r.target() {
                Some(oid) => oid,
                None => return Ok(()),
            },
            // Unborn branch; the first commit will create it
            Err(_) => return Ok(()),
        };

        if local_oid == remote_oid {
            return Ok(());
        }

        let can_fast_forward = self.repo.graph_descendant_of(remote_oid, local_oid)?;
        if !can_fast_forward {
            // Local is ahead or diverged; leave it alone
            return Ok(());
        }

        let mut reference = self.repo.find_reference(&local_ref_name)?;
        reference.set_target(
            remote_oid,
            &format!("fast-forward from {}/{}", remote_name, branch_name),
        )?;
        // Safe checkout: refuses to overwrite local modifications, which
        // surfaces a pull conflict as an error instead of losing work
        self.repo
            .checkout_head(Some(&mut git2::build::CheckoutBuilder::new()))?;

        Ok(())
    }

    /// Stage every change in the working tree (`git add .`).
    pub fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;
        Ok(())
    }

    /// Stage a single file by path.
    pub fn stage_path(&self, path: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_path(Path::new(path))?;
        index.write()?;
        Ok(())
    }

    /// Paths with changes recorded in the index.
    pub fn staged_files(&self) -> Result<Vec<String>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false);

        let staged = Status::INDEX_NEW
            | Status::INDEX_MODIFIED
            | Status::INDEX_DELETED
            | Status::INDEX_RENAMED
            | Status::INDEX_TYPECHANGE;

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut files = Vec::new();
        for entry in statuses.iter() {
            if entry.status().intersects(staged) {
                if let Some(path) = entry.path() {
                    files.push(path.to_string());
                }
            }
        }

        Ok(files)
    }

    /// Textual patch of the staged changes (HEAD tree vs index).
    ///
    /// Empty on an unborn branch; the rewrite collaborator copes with an
    /// empty diff.
    pub fn staged_diff(&self) -> Result<String> {
        let head_tree = match self.head_commit()? {
            Some(commit) => Some(commit.tree()?),
            None => None,
        };

        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, None)?;

        let mut patch = String::new();
        diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
            let origin = line.origin();
            if matches!(origin, '+' | '-' | ' ') {
                patch.push(origin);
            }
            patch.push_str(std::str::from_utf8(line.content()).unwrap_or(""));
            true
        })?;

        Ok(patch)
    }

    /// Most recent tag reachable from HEAD.
    ///
    /// Walks the history backwards and returns the first commit carrying a
    /// tag. Handles both lightweight and annotated tags. `None` when the
    /// repository has no tags (or no commits yet).
    pub fn latest_tag(&self) -> Result<Option<String>> {
        let head_oid = match self.head_commit()? {
            Some(commit) => commit.id(),
            None => return Ok(None),
        };

        let mut tag_oids = std::collections::HashMap::new();
        let tags = self.repo.tag_names(None)?;
        for tag_name in tags.iter().flatten() {
            if let Ok(tag_ref) = self.repo.find_reference(&format!("refs/tags/{}", tag_name)) {
                if let Ok(tag_obj) = tag_ref.peel(git2::ObjectType::Any) {
                    tag_oids.insert(tag_obj.id(), tag_name.to_string());
                }
            }
        }

        if tag_oids.is_empty() {
            return Ok(None);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head_oid)?;
        for oid in revwalk.flatten() {
            if let Some(tag_name) = tag_oids.get(&oid) {
                return Ok(Some(tag_name.clone()));
            }
        }

        Ok(None)
    }

    /// Commit the index with the two-part title/body message shape.
    ///
    /// A commit with no body gets the title only; with a body, title and body
    /// are separated by a blank line, which downstream changelog tooling
    /// depends on.
    pub fn commit(&self, title: &str, body: Option<&str>) -> Result<Oid> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;

        let message = match body {
            Some(body) => format!("{}\n\n{}", title, body),
            None => title.to_string(),
        };

        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &message,
            &tree,
            &parents,
        )?;

        Ok(oid)
    }

    /// Push the current branch to the remote.
    pub fn push(&self, remote_name: &str) -> Result<()> {
        let branch = self.current_branch()?;
        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        self.push_refspec(remote_name, &refspec)
            .map_err(|e| match e {
                AutoCommitError::Remote(msg) => AutoCommitError::remote(format!(
                    "Failed to push branch '{}': {}",
                    branch, msg
                )),
                other => other,
            })
    }

    /// Create an annotated tag on the current HEAD commit.
    pub fn create_tag(&self, tag_name: &str, message: &str) -> Result<()> {
        let head = self
            .head_commit()?
            .ok_or_else(|| AutoCommitError::remote("Cannot tag: repository has no commits"))?;
        let signature = self.repo.signature()?;
        self.repo
            .tag(tag_name, head.as_object(), &signature, message, false)?;
        Ok(())
    }

    /// Push a tag to the remote.
    pub fn push_tag(&self, tag_name: &str, remote_name: &str) -> Result<()> {
        let refspec = format!("refs/tags/{}:refs/tags/{}", tag_name, tag_name);
        self.push_refspec(remote_name, &refspec)
            .map_err(|e| match e {
                AutoCommitError::Remote(msg) => AutoCommitError::remote(format!(
                    "Failed to push tag '{}': {}",
                    tag_name, msg
                )),
                other => other,
            })
    }

    /// Reset the index back to HEAD, discarding everything staged.
    ///
    /// Used by the cancellation path only; the working tree is untouched.
    pub fn unstage_all(&self) -> Result<()> {
        match self.head_commit()? {
            Some(commit) => {
                let object = commit.as_object().clone();
                self.repo.reset_default(Some(&object), ["*"].iter())?;
            }
            None => {
                // Unborn branch: there is no HEAD to reset to, so clear the index
                let mut index = self.repo.index()?;
                index.clear()?;
                index.write()?;
            }
        }
        Ok(())
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn push_refspec(&self, remote_name: &str, refspec: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            AutoCommitError::remote(format!("No remote named '{}' found", remote_name))
        })?;

        let mut callbacks = credential_callbacks();
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                eprintln!(
                    "Warning: Could not update reference {}: {}",
                    refname, status
                );
                Err(git2::Error::from_str(&format!(
                    "Push failed for {}",
                    refname
                )))
            } else {
                Ok(())
            }
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    AutoCommitError::remote(format!("Network error during push: {}", e))
                } else {
                    AutoCommitError::remote(e.to_string())
                }
            })
    }
}

/// Credential callbacks shared by fetch and push.
///
/// Tries SSH keys from ~/.ssh in order of preference, then the SSH agent,
/// then whatever default credential helper is configured.
fn credential_callbacks() -> git2::RemoteCallbacks<'static> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            let key_paths = vec![
                format!("{}/.ssh/id_ed25519", home),
                format!("{}/.ssh/id_rsa", home),
                format!("{}/.ssh/id_ecdsa", home),
            ];

            for key_path in key_paths {
                let path = std::path::Path::new(&key_path);
                if path.exists() {
                    if let Ok(cred) =
                        git2::Cred::ssh_key(username_from_url.unwrap_or("git"), None, path, None)
                    {
                        return Ok(cred);
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });
    callbacks
}
