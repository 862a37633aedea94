//! Daemon housekeeping: PID file and privilege drop.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::RunAs;

/// A PID file removed again by [`PidFile::remove`].
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Write the current process id to `path`, replacing any stale file.
    pub fn create(path: &Path) -> io::Result<Self> {
        fs::write(path, format!("{}\n", std::process::id()))?;
        info!("Wrote PID file {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remove(self) {
        match fs::remove_file(&self.path) {
            Ok(()) => info!("Removed PID file {}", self.path.display()),
            Err(e) => warn!("Failed to remove PID file {}: {}", self.path.display(), e),
        }
    }
}

/// Switch to `run_as`: supplementary groups, then group, then user.
#[cfg(unix)]
pub fn drop_privileges(run_as: &RunAs) -> eyre::Result<()> {
    use eyre::{WrapErr, eyre};
    use nix::unistd::{Group, User, setgid, setuid};

    let group = Group::from_name(&run_as.group)
        .wrap_err_with(|| format!("Failed to look up group '{}'", run_as.group))?
        .ok_or_else(|| eyre!("Unknown group '{}'", run_as.group))?;
    let user = User::from_name(&run_as.user)
        .wrap_err_with(|| format!("Failed to look up user '{}'", run_as.user))?
        .ok_or_else(|| eyre!("Unknown user '{}'", run_as.user))?;

    clear_supplementary_groups(group.gid)?;
    setgid(group.gid).wrap_err_with(|| format!("setgid({}) failed", group.gid))?;
    setuid(user.uid).wrap_err_with(|| format!("setuid({}) failed", user.uid))?;

    info!(
        "Dropped privileges to {}:{} ({}:{})",
        run_as.user, run_as.group, user.uid, group.gid
    );
    Ok(())
}

/// Leave `gid` as the only supplementary group, so nothing inherited from root survives.
#[cfg(all(unix, not(any(target_vendor = "apple", target_os = "redox", target_os = "haiku"))))]
fn clear_supplementary_groups(gid: nix::unistd::Gid) -> eyre::Result<()> {
    use eyre::WrapErr;

    nix::unistd::setgroups(&[gid]).wrap_err_with(|| format!("setgroups([{gid}]) failed"))
}

// No setgroups(2) binding here; the account's own groups are left in place.
#[cfg(all(unix, any(target_vendor = "apple", target_os = "redox", target_os = "haiku")))]
fn clear_supplementary_groups(_gid: nix::unistd::Gid) -> eyre::Result<()> {
    warn!("Supplementary groups are not reset on this platform");
    Ok(())
}

#[cfg(not(unix))]
pub fn drop_privileges(run_as: &RunAs) -> eyre::Result<()> {
    warn!(
        "Ignoring run_user/run_group {}:{}: not supported on this platform",
        run_as.user, run_as.group
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w2v.pid");

        let pid_file = PidFile::create(&path).unwrap();
        let written = fs::read_to_string(pid_file.path()).unwrap();
        assert_eq!(written.trim(), std::process::id().to_string());

        pid_file.remove();
        assert!(!path.exists());
    }

    #[test]
    fn test_pid_file_in_missing_directory() {
        assert!(PidFile::create(Path::new("/nonexistent/dir/w2v.pid")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_drop_privileges_unknown_user() {
        let run_as = RunAs {
            user: "no-such-user-w2v".to_string(),
            group: "no-such-group-w2v".to_string(),
        };
        assert!(drop_privileges(&run_as).is_err());
    }

    /// Runs in a re-executed copy of the test binary, since dropping
    /// privileges cannot be undone. Needs root; skipped otherwise.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_drop_privileges_clears_supplementary_groups() {
        use nix::unistd::{Gid, Group, Uid, User, getgroups, setgroups};
        use std::process::Command;

        const CHILD_USER: &str = "W2V_DROP_CHILD_USER";
        const CHILD_GROUP: &str = "W2V_DROP_CHILD_GROUP";
        const TEST_NAME: &str = "lifecycle::tests::test_drop_privileges_clears_supplementary_groups";

        if let (Ok(user), Ok(group)) = (std::env::var(CHILD_USER), std::env::var(CHILD_GROUP)) {
            setgroups(&[Gid::from_raw(0), Gid::from_raw(42)]).unwrap();

            drop_privileges(&RunAs { user, group: group.clone() }).unwrap();

            let expected = Group::from_name(&group).unwrap().unwrap().gid;
            assert_eq!(getgroups().unwrap(), vec![expected]);
            return;
        }

        if !Uid::effective().is_root() {
            eprintln!("skipping: privilege drop needs root");
            return;
        }
        let Some(user) = User::from_name("nobody").unwrap() else {
            eprintln!("skipping: no 'nobody' account");
            return;
        };
        let Some(group) = ["nogroup", "nobody"]
            .into_iter()
            .find(|name| Group::from_name(name).ok().flatten().is_some())
        else {
            eprintln!("skipping: no unprivileged group");
            return;
        };

        let status = Command::new(std::env::current_exe().unwrap())
            .args([TEST_NAME, "--exact", "--nocapture", "--test-threads=1"])
            .env(CHILD_USER, &user.name)
            .env(CHILD_GROUP, group)
            .status()
            .unwrap();
        assert!(status.success(), "child exited with {status}");
    }
}
