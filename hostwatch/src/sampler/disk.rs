use std::path::{Path, PathBuf};

use hostwatch_types::{bytes_to_mb, DiskInfo};
use sysinfo::Disks;

use crate::error::{SamplerError, SamplerResult};

/// Source of capacity figures for the filesystem the agent runs from.
pub trait DiskProvider: Send + Sync {
    fn disk_info(&self) -> SamplerResult<DiskInfo>;
}

/// Reads capacity through `sysinfo` for the filesystem containing `path`,
/// the running executable by default.
#[derive(Debug, Clone, Default)]
pub struct SystemDiskProvider {
    path: Option<PathBuf>,
}

impl SystemDiskProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the filesystem containing `path` instead of the executable.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn target(&self) -> SamplerResult<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => std::env::current_exe().map_err(|e| {
                SamplerError::Disk(format!("unable to resolve executable path: {e}"))
            }),
        }
    }
}

impl DiskProvider for SystemDiskProvider {
    fn disk_info(&self) -> SamplerResult<DiskInfo> {
        let target = self.target()?;
        let disks = Disks::new_with_refreshed_list();

        let mount_points: Vec<&Path> = disks.list().iter().map(|d| d.mount_point()).collect();
        let index = longest_mount_prefix(&target, &mount_points).ok_or_else(|| {
            SamplerError::Disk(format!("no filesystem found for '{}'", target.display()))
        })?;
        let disk = &disks.list()[index];

        let info = DiskInfo::new(
            bytes_to_mb(disk.total_space()),
            bytes_to_mb(disk.available_space()),
        );

        if cfg!(windows) {
            Ok(info.with_volume_label(format!(
                "{} {}",
                disk.mount_point().display(),
                disk.name().to_string_lossy()
            )))
        } else {
            Ok(info)
        }
    }
}

/// Index of the mount point that contains `target` with the most path
/// components, i.e. the filesystem root `target` lives on.
pub fn longest_mount_prefix(target: &Path, mount_points: &[&Path]) -> Option<usize> {
    mount_points
        .iter()
        .enumerate()
        .filter(|(_, mount)| target.starts_with(mount))
        .max_by_key(|(_, mount)| mount.components().count())
        .map(|(index, _)| index)
}
