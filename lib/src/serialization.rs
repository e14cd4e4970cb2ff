//! Serialization of fitted parameters.
//!
//! Fitted components expose a plain parameter struct (vocabulary terms, weight
//! vectors, scalars) that is written to and read from bytes. The byte format is
//! bincode; callers only rely on `from_bytes(to_bytes(x))` reconstructing `x`.

use std::error::Error;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, SentimentError};

/// A parameter representation that can be serialized to and from bytes.
///
/// Implementors should contain only plain data (e.g. `Vec<f32>`, `Vec<String>`),
/// never lookup tables that can be rebuilt from that data.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> std::result::Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> std::result::Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Write serialized parameters to `path`.
///
/// The bytes go to a temporary file in the same directory, which is then renamed
/// over `path`. A failed write leaves any previous file untouched and never
/// leaves a truncated one behind.
pub fn write_params<P: SerializableParams, Q: AsRef<Path>>(params: &P, path: Q) -> Result<()> {
    let path = path.as_ref();
    let bytes = params
        .to_bytes()
        .map_err(|e| SentimentError::Serialization(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read parameters previously written with [`write_params`].
///
/// Undecodable bytes are reported as [`SentimentError::InvalidArtifact`]: the
/// file exists but does not hold a usable model.
pub fn read_params<P: SerializableParams, Q: AsRef<Path>>(path: Q) -> Result<P> {
    let bytes = std::fs::read(path)?;
    P::from_bytes(&bytes).map_err(|e| SentimentError::InvalidArtifact(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        terms: Vec<String>,
        weights: Vec<f32>,
    }

    #[test]
    fn test_params_file_roundtrip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sample = Sample {
            terms: vec!["good".into(), "bad".into()],
            weights: vec![0.5, -0.5],
        };
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("params.bin");

        write_params(&sample, &path)?;
        let loaded: Sample = read_params(&path)?;

        assert_eq!(sample, loaded);
        Ok(())
    }

    #[test]
    fn test_overwrite_replaces_file_and_leaves_no_temporaries(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("params.bin");
        std::fs::write(&path, b"stale")?;

        let sample = Sample {
            terms: vec!["fresh".into()],
            weights: vec![1.0],
        };
        write_params(&sample, &path)?;

        let loaded: Sample = read_params(&path)?;
        assert_eq!(loaded, sample);
        let entries: Vec<_> = std::fs::read_dir(tmp.path())?.collect::<std::io::Result<_>>()?;
        assert_eq!(entries.len(), 1);
        Ok(())
    }

    #[test]
    fn test_failed_write_keeps_previous_file() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let tmp = tempfile::tempdir()?;
        let first = Sample {
            terms: vec!["good".into()],
            weights: vec![0.25],
        };
        let path = tmp.path().join("params.bin");
        write_params(&first, &path)?;

        // Renaming a file over a non-empty directory fails after the bytes are written.
        let blocked = tmp.path().join("blocked");
        std::fs::create_dir(&blocked)?;
        std::fs::write(blocked.join("keep"), b"x")?;
        assert!(matches!(
            write_params(&first, &blocked).unwrap_err(),
            SentimentError::Io(_)
        ));

        let loaded: Sample = read_params(&path)?;
        assert_eq!(loaded, first);
        let mut names: Vec<_> = std::fs::read_dir(tmp.path())?
            .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<std::io::Result<_>>()?;
        names.sort();
        assert_eq!(names, vec!["blocked", "params.bin"]);
        Ok(())
    }

    #[test]
    fn test_write_into_missing_directory_is_io_error() {
        let sample = Sample {
            terms: vec![],
            weights: vec![],
        };
        let err = write_params(&sample, "/definitely/not/here/params.bin").unwrap_err();
        assert!(matches!(err, SentimentError::Io(_)));
    }

    #[test]
    fn test_read_garbage_is_invalid_artifact() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("garbage.bin");
        std::fs::write(&path, [0xffu8; 3])?;

        let err = read_params::<Sample, _>(&path).unwrap_err();
        assert!(matches!(err, SentimentError::InvalidArtifact(_)));
        Ok(())
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = read_params::<Sample, _>("/definitely/not/here.bin").unwrap_err();
        assert!(matches!(err, SentimentError::Io(_)));
    }
}
