use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::domain::{AdminKey, CredentialStore, CredentialStoreError};

/// Fixed name of the persisted admin key entry inside the state directory.
pub const CREDENTIAL_ENTRY: &str = "demo_admin_key";

/// Admin key persisted as a single file holding the raw key.
///
/// The parent directory is created on first save. On Unix the file is
/// restricted to owner read/write.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store the entry under `state_dir/demo_admin_key`.
    pub fn in_dir(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(CREDENTIAL_ENTRY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<AdminKey>, CredentialStoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Editors like to append a newline; the key itself is used verbatim.
        let raw = contents.trim_end_matches(['\r', '\n']);
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(AdminKey::new(raw)))
    }

    fn save(&self, key: &AdminKey) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            // Owner-only from the moment the file exists.
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on creation; tighten an entry left by an older run.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(key.as_str().as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
