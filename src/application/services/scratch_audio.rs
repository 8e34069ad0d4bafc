use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// An uploaded audio payload staged on disk for the duration of one
/// transcription. The file is removed when the value is closed or dropped.
pub struct ScratchAudio {
    file: NamedTempFile,
}

impl ScratchAudio {
    pub fn stage(dir: Option<&Path>, data: &[u8]) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("dictation-").suffix(".wav");
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(data)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.file.path()).await
    }

    /// Removes the file now, reporting failures the drop path would swallow.
    pub fn close(self) -> io::Result<PathBuf> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        Ok(path)
    }
}
