//! Ticket-scoped fetch and push.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::exec::{CommandExecutor, CommandSpec};
use crate::manifest::{base_name, ManifestError, TicketEntry};

use super::error::TransferError;
use super::types::{StagedFile, StagedFileSet, TransferStep};

/// Fetches a data object or collection using a ticket.
pub const FETCH_PROGRAM: &str = "iget";
/// Pushes a file or directory using a ticket.
pub const PUSH_PROGRAM: &str = "iput";
/// Changes ownership and permissions on remote paths.
pub const CHMOD_PROGRAM: &str = "ichmod";
/// Principal used for ticket transfers; stripped from uploads.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Client for capability-scoped transfers.
///
/// All commands run with the scratch directory as their working directory,
/// so fetched inputs land there under their base names and outputs are
/// pushed from there.
pub struct TransferClient {
    executor: Arc<dyn CommandExecutor>,
    scratch_dir: PathBuf,
}

impl TransferClient {
    pub fn new(executor: Arc<dyn CommandExecutor>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Runs one transfer command and judges it by its exit code.
    async fn run_step(
        &self,
        step: TransferStep,
        path: &str,
        spec: CommandSpec,
    ) -> Result<(), TransferError> {
        let spec = spec.current_dir(&self.scratch_dir);
        let outcome = self
            .executor
            .run(&spec)
            .await
            .map_err(|source| TransferError::Exec {
                step,
                path: path.to_string(),
                source,
            })?;

        if !outcome.success() {
            warn!("{} {} failed with {}", step, path, outcome);
            return Err(TransferError::Failed {
                step,
                path: path.to_string(),
                outcome,
            });
        }
        Ok(())
    }

    /// Recursively fetches `remote_path` into the scratch directory.
    pub async fn download(
        &self,
        ticket: &str,
        remote_path: &str,
    ) -> Result<StagedFile, TransferError> {
        let name = base_name(remote_path).ok_or_else(|| TransferError::InvalidRemotePath {
            path: remote_path.to_string(),
        })?;

        info!("Downloading {}", remote_path);
        let spec = CommandSpec::new(FETCH_PROGRAM).args(["-rt", ticket, remote_path]);
        self.run_step(TransferStep::Fetch, remote_path, spec).await?;

        Ok(StagedFile {
            name: name.to_string(),
            local_path: self.scratch_dir.join(name),
            remote_path: remote_path.to_string(),
        })
    }

    /// Downloads every manifest entry, in order.
    ///
    /// Stops at the first failure, including a manifest read error or a
    /// second input with an already staged base name. Nothing is retried.
    pub async fn download_all<I>(&self, entries: I) -> Result<StagedFileSet, TransferError>
    where
        I: IntoIterator<Item = Result<TicketEntry, ManifestError>>,
    {
        let mut staged = StagedFileSet::new();

        for entry in entries {
            let entry = entry?;
            let name = entry
                .base_name()
                .ok_or_else(|| TransferError::InvalidRemotePath {
                    path: entry.path.clone(),
                })?;
            // Checked before fetching so the first input is never clobbered.
            staged.check_available(name, &entry.path)?;

            let file = self.download(&entry.ticket, &entry.path).await?;
            staged.insert(file)?;
        }

        info!("Downloaded {} input(s)", staged.len());
        Ok(staged)
    }

    /// Pushes `local_src` into the remote collection `remote_dest`, then
    /// gives the uploaded path to `owner` and revokes anonymous access.
    ///
    /// The three steps are judged independently. A failure stops the
    /// sequence without undoing earlier steps.
    pub async fn upload(
        &self,
        ticket: &str,
        owner: &str,
        local_src: &Path,
        remote_dest: &str,
    ) -> Result<(), TransferError> {
        let file_name = local_src
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| TransferError::InvalidLocalPath {
                path: local_src.to_path_buf(),
            })?;
        let src = local_src.to_string_lossy().into_owned();
        let remote_path = remote_child(remote_dest, &file_name);

        info!("Uploading {} to {}", src, remote_dest);
        let push =
            CommandSpec::new(PUSH_PROGRAM).args(["-rt", ticket, src.as_str(), remote_dest]);
        self.run_step(TransferStep::Push, &remote_path, push).await?;

        let chown =
            CommandSpec::new(CHMOD_PROGRAM).args(["own", owner, remote_path.as_str()]);
        self.run_step(TransferStep::ChangeOwner, &remote_path, chown)
            .await?;

        let revoke = CommandSpec::new(CHMOD_PROGRAM).args([
            "null",
            ANONYMOUS_USER,
            remote_path.as_str(),
        ]);
        self.run_step(TransferStep::RevokeAnonymous, &remote_path, revoke)
            .await?;

        debug!("Uploaded {} owned by {}", remote_path, owner);
        Ok(())
    }

    /// Uploads every file to every manifest destination.
    ///
    /// Destinations are the outer loop and files the inner loop. Stops at the
    /// first failure. Returns the number of completed uploads.
    pub async fn upload_all<I>(
        &self,
        entries: I,
        owner: &str,
        files: &[PathBuf],
    ) -> Result<usize, TransferError>
    where
        I: IntoIterator<Item = Result<TicketEntry, ManifestError>>,
    {
        let mut uploaded = 0;

        for entry in entries {
            let entry = entry?;
            for file in files {
                self.upload(&entry.ticket, owner, file, &entry.path).await?;
                uploaded += 1;
            }
        }

        info!("Uploaded {} output(s)", uploaded);
        Ok(uploaded)
    }
}

/// Remote path of `name` inside the collection `dest`.
fn remote_child(dest: &str, name: &str) -> String {
    let trimmed = dest.trim_end_matches('/');
    if trimmed.is_empty() {
        if dest.starts_with('/') {
            return format!("/{}", name);
        }
        return name.to_string();
    }
    format!("{}/{}", trimmed, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ExitOutcome, Redirect};
    use crate::testing::MockExecutor;
    use crate::transfer::TransferDirection;

    fn client(executor: &MockExecutor) -> TransferClient {
        TransferClient::new(Arc::new(executor.clone()), "/scratch")
    }

    fn entries(pairs: &[(&str, &str)]) -> Vec<Result<TicketEntry, ManifestError>> {
        pairs
            .iter()
            .map(|(ticket, path)| Ok(TicketEntry::new(*ticket, *path)))
            .collect()
    }

    #[test]
    fn test_remote_child() {
        assert_eq!(remote_child("/zone/results", "out.txt"), "/zone/results/out.txt");
        assert_eq!(remote_child("/zone/results/", "out.txt"), "/zone/results/out.txt");
        assert_eq!(remote_child("/", "out.txt"), "/out.txt");
        assert_eq!(remote_child("", "out.txt"), "out.txt");
    }

    #[tokio::test]
    async fn test_download_runs_iget_in_scratch_dir() {
        let executor = MockExecutor::new();
        let staged = client(&executor)
            .download("capA", "/zone/home/alice/fileA")
            .await
            .unwrap();

        assert_eq!(staged.name, "fileA");
        assert_eq!(staged.local_path, PathBuf::from("/scratch/fileA"));

        let commands = executor.commands().await;
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].program, "iget");
        assert_eq!(commands[0].args, vec!["-rt", "capA", "/zone/home/alice/fileA"]);
        assert_eq!(commands[0].current_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(commands[0].stdout, Redirect::Inherit);
    }

    #[tokio::test]
    async fn test_download_failure_is_inbound() {
        let executor = MockExecutor::new();
        executor.set_exit_code("iget", 3).await;

        let err = client(&executor)
            .download("capA", "/zone/fileA")
            .await
            .unwrap_err();
        match err {
            TransferError::Failed {
                step,
                ref path,
                outcome,
            } => {
                assert_eq!(step, TransferStep::Fetch);
                assert_eq!(path, "/zone/fileA");
                assert_eq!(outcome, ExitOutcome::from_code(3));
            }
            ref other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(err.direction(), Some(TransferDirection::In));
    }

    #[tokio::test]
    async fn test_download_missing_tool() {
        let executor = MockExecutor::new();
        executor.set_not_found("iget").await;

        let err = client(&executor)
            .download("capA", "/zone/fileA")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::Exec {
                step: TransferStep::Fetch,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_download_all_preserves_manifest_order() {
        let executor = MockExecutor::new();
        let staged = client(&executor)
            .download_all(entries(&[
                ("capB", "/zone/b/fileB"),
                ("capA", "/zone/a/fileA"),
                ("capC", "/zone/c/fileC"),
            ]))
            .await
            .unwrap();

        assert_eq!(staged.names(), vec!["fileB", "fileA", "fileC"]);

        let fetched: Vec<String> = executor
            .commands()
            .await
            .into_iter()
            .map(|c| c.args[2].clone())
            .collect();
        assert_eq!(fetched, vec!["/zone/b/fileB", "/zone/a/fileA", "/zone/c/fileC"]);
    }

    #[tokio::test]
    async fn test_download_all_stops_at_first_failure() {
        let executor = MockExecutor::new();
        executor
            .set_exit_code_matching("iget", &["/zone/b/fileB"], 1)
            .await;

        let err = client(&executor)
            .download_all(entries(&[
                ("capA", "/zone/a/fileA"),
                ("capB", "/zone/b/fileB"),
                ("capC", "/zone/c/fileC"),
            ]))
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(TransferStep::Fetch));
        assert_eq!(executor.command_count().await, 2);
    }

    #[tokio::test]
    async fn test_download_all_rejects_name_collision_before_fetch() {
        let executor = MockExecutor::new();
        let err = client(&executor)
            .download_all(entries(&[
                ("capA", "/zone/run1/data.csv"),
                ("capB", "/zone/run2/data.csv"),
            ]))
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::NameCollision { ref name, .. } if name == "data.csv"));
        assert_eq!(executor.command_count().await, 1);
    }

    #[tokio::test]
    async fn test_download_all_propagates_manifest_error() {
        let executor = MockExecutor::new();
        let input = vec![
            Ok(TicketEntry::new("capA", "/zone/fileA")),
            Err(ManifestError::MalformedRecord {
                line: 2,
                reason: "expected 2 fields, found 1".to_string(),
            }),
            Ok(TicketEntry::new("capC", "/zone/fileC")),
        ];

        let err = client(&executor).download_all(input).await.unwrap_err();
        assert!(matches!(err, TransferError::Manifest(_)));
        assert_eq!(executor.command_count().await, 1);
    }

    #[tokio::test]
    async fn test_download_all_empty_manifest() {
        let executor = MockExecutor::new();
        let staged = client(&executor).download_all(entries(&[])).await.unwrap();
        assert!(staged.is_empty());
        assert_eq!(executor.command_count().await, 0);
    }

    #[tokio::test]
    async fn test_upload_runs_push_chown_revoke() {
        let executor = MockExecutor::new();
        client(&executor)
            .upload("capOut", "alice", Path::new("out.txt"), "/zone/results")
            .await
            .unwrap();

        let lines = executor.command_lines().await;
        assert_eq!(
            lines,
            vec![
                "iput -rt capOut out.txt /zone/results",
                "ichmod own alice /zone/results/out.txt",
                "ichmod null anonymous /zone/results/out.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_upload_push_failure_skips_fixups() {
        let executor = MockExecutor::new();
        executor.set_exit_code("iput", 4).await;

        let err = client(&executor)
            .upload("capOut", "alice", Path::new("out.txt"), "/zone/results")
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(TransferStep::Push));
        assert_eq!(executor.command_count().await, 1);
    }

    #[tokio::test]
    async fn test_upload_chown_failure_keeps_push() {
        let executor = MockExecutor::new();
        executor.set_exit_code_matching("ichmod", &["own"], 1).await;

        let err = client(&executor)
            .upload("capOut", "alice", Path::new("out.txt"), "/zone/results")
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(TransferStep::ChangeOwner));
        assert_eq!(err.direction(), Some(TransferDirection::Out));
        // The push stays; anonymous access is never revoked.
        let commands = executor.commands().await;
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].program, "iput");
        assert_eq!(commands[1].args[0], "own");
    }

    #[tokio::test]
    async fn test_upload_revoke_failure() {
        let executor = MockExecutor::new();
        executor.set_exit_code_matching("ichmod", &["null"], 1).await;

        let err = client(&executor)
            .upload("capOut", "alice", Path::new("err.txt"), "/zone/results")
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(TransferStep::RevokeAnonymous));
        assert_eq!(executor.command_count().await, 3);
    }

    #[tokio::test]
    async fn test_upload_all_cross_product_order() {
        let executor = MockExecutor::new();
        let files = vec![PathBuf::from("out.txt"), PathBuf::from("err.txt")];

        let uploaded = client(&executor)
            .upload_all(
                entries(&[("cap1", "/zone/d1"), ("cap2", "/zone/d2")]),
                "alice",
                &files,
            )
            .await
            .unwrap();
        assert_eq!(uploaded, 4);

        let pushes: Vec<String> = executor
            .commands_for("iput")
            .await
            .into_iter()
            .map(|c| c.describe())
            .collect();
        assert_eq!(
            pushes,
            vec![
                "iput -rt cap1 out.txt /zone/d1",
                "iput -rt cap1 err.txt /zone/d1",
                "iput -rt cap2 out.txt /zone/d2",
                "iput -rt cap2 err.txt /zone/d2",
            ]
        );
    }

    #[tokio::test]
    async fn test_upload_all_stops_at_first_failure() {
        let executor = MockExecutor::new();
        executor.set_exit_code_matching("iput", &["err.txt"], 1).await;
        let files = vec![PathBuf::from("out.txt"), PathBuf::from("err.txt")];

        let err = client(&executor)
            .upload_all(
                entries(&[("cap1", "/zone/d1"), ("cap2", "/zone/d2")]),
                "alice",
                &files,
            )
            .await
            .unwrap_err();

        assert_eq!(err.step(), Some(TransferStep::Push));
        // out.txt to d1 (3 commands) then the failing push; d2 never touched.
        assert_eq!(executor.command_count().await, 4);
        assert!(executor
            .command_lines()
            .await
            .iter()
            .all(|line| !line.contains("/zone/d2")));
    }
}
