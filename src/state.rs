//! Local checkout state kept as flat JSON files in the state directory.
//!
//! Every save overwrites the target file in place. There is no temp-file and
//! rename step and no file locking: a crash mid-write can leave a torn
//! `checkout.json` (which [`StateStore::load_checkout`] then treats as empty),
//! and two concurrent invocations race with the last writer winning.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FbError, Result};

const CHECKOUT_FILE: &str = "checkout.json";
const BIN_CONTEXT_FILE: &str = "bin_context.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRecord {
    pub ticket_id: String,
    pub ticket_name: String,
    #[serde(default)]
    pub bin_id: String,
    #[serde(default)]
    pub bin_name: String,
    pub checked_out_at: String,
}

/// The last bin used for a bin-scoped checkout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BinContext {
    pub bin_id: String,
    pub bin_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    Empty,
    CheckedOut(CheckoutRecord),
}

impl Checkout {
    pub fn record(&self) -> Option<&CheckoutRecord> {
        match self {
            Checkout::Empty => None,
            Checkout::CheckedOut(record) => Some(record),
        }
    }
}

pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn checkout_path(&self) -> PathBuf {
        self.dir.join(CHECKOUT_FILE)
    }

    pub fn bin_context_path(&self) -> PathBuf {
        self.dir.join(BIN_CONTEXT_FILE)
    }

    /// Reads the checkout record. A missing, unreadable or corrupt file is
    /// reported as [`Checkout::Empty`] so a damaged record never blocks the
    /// next checkout.
    pub fn load_checkout(&self) -> Checkout {
        let path = self.checkout_path();
        match read_json::<CheckoutRecord>(&path) {
            Ok(Some(record)) => Checkout::CheckedOut(record),
            Ok(None) => Checkout::Empty,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unusable checkout file");
                Checkout::Empty
            }
        }
    }

    pub fn save_checkout(&self, record: &CheckoutRecord) -> Result<()> {
        self.save_json(&self.checkout_path(), record)
    }

    /// Deletes the checkout record. Returns whether a record was present;
    /// clearing an empty state is not an error.
    pub fn clear_checkout(&self) -> Result<bool> {
        let path = self.checkout_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FbError::StateClear { path, source: e }),
        }
    }

    pub fn load_bin_context(&self) -> Option<BinContext> {
        let path = self.bin_context_path();
        match read_json::<BinContext>(&path) {
            Ok(context) => context,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unusable bin context file");
                None
            }
        }
    }

    pub fn save_bin_context(&self, context: &BinContext) -> Result<()> {
        self.save_json(&self.bin_context_path(), context)
    }

    fn save_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let write_err = |source| FbError::StateWrite {
            path: path.to_path_buf(),
            source,
        };

        ensure_private_dir(&self.dir).map_err(write_err)?;
        let contents = serde_json::to_string_pretty(value).map_err(io::Error::other).map_err(write_err)?;
        write_private_file(path, contents.as_bytes()).map_err(write_err)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> io::Result<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Creates `dir` (user-only on Unix) if it does not exist. Existing
/// directories are left untouched.
pub fn ensure_private_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

/// Truncates and rewrites `path`, readable by the owner only on Unix.
pub fn write_private_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)
}
