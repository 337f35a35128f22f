//! On-disk snapshot: `vectors.bin` (bincode) plus `metadata.json`
//!
//! Each file is written to a sibling temp path and renamed into place. The
//! metadata file carries a SHA-256 of the vectors, so a save interrupted
//! between the two renames reads back as corrupt instead of pairing new
//! vectors with old texts.

use licita_core::error::{CoreError, Result};
use licita_core::ChunkMetadata;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const VECTORS_FILE: &str = "vectors.bin";
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Serialize, Deserialize)]
struct MetadataFile {
    dimension: usize,
    entry_count: usize,
    vectors_sha256: String,
    texts: Vec<String>,
    metadatas: Vec<ChunkMetadata>,
}

#[derive(Debug)]
pub struct Snapshot {
    pub dimension: usize,
    pub vectors: Vec<Vec<f32>>,
    pub texts: Vec<String>,
    pub metadatas: Vec<ChunkMetadata>,
}

pub fn write(
    dir: &Path,
    dimension: usize,
    vectors: &[Vec<f32>],
    texts: &[String],
    metadatas: &[ChunkMetadata],
) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| CoreError::io(dir, e))?;

    let vectors_path = dir.join(VECTORS_FILE);
    write_atomic(&vectors_path, |writer| {
        bincode::serialize_into(writer, vectors).map_err(|e| corrupt(&vectors_path, e))
    })?;

    let metadata = MetadataFile {
        dimension,
        entry_count: vectors.len(),
        vectors_sha256: vectors_digest(vectors),
        texts: texts.to_vec(),
        metadatas: metadatas.to_vec(),
    };
    let metadata_path = dir.join(METADATA_FILE);
    write_atomic(&metadata_path, |writer| {
        serde_json::to_writer(writer, &metadata).map_err(|e| corrupt(&metadata_path, e))
    })?;

    Ok(())
}

pub fn read(dir: &Path) -> Result<Snapshot> {
    let vectors_path = dir.join(VECTORS_FILE);
    let metadata_path = dir.join(METADATA_FILE);
    if !vectors_path.is_file() || !metadata_path.is_file() {
        return Err(CoreError::IndexNotFound {
            path: dir.to_path_buf(),
        });
    }

    let file = File::open(&vectors_path).map_err(|e| CoreError::io(&vectors_path, e))?;
    let vectors: Vec<Vec<f32>> =
        bincode::deserialize_from(BufReader::new(file)).map_err(|e| corrupt(&vectors_path, e))?;

    let file = File::open(&metadata_path).map_err(|e| CoreError::io(&metadata_path, e))?;
    let metadata: MetadataFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| corrupt(&metadata_path, e))?;

    let count = metadata.entry_count;
    if vectors.len() != count || metadata.texts.len() != count || metadata.metadatas.len() != count
    {
        return Err(CoreError::IndexCorrupt {
            path: dir.to_path_buf(),
            message: format!(
                "entry counts disagree: header {}, vectors {}, texts {}, metadata {}",
                count,
                vectors.len(),
                metadata.texts.len(),
                metadata.metadatas.len()
            ),
        });
    }
    if vectors_digest(&vectors) != metadata.vectors_sha256 {
        return Err(CoreError::IndexCorrupt {
            path: dir.to_path_buf(),
            message: format!("{} does not match {}", VECTORS_FILE, METADATA_FILE),
        });
    }
    if let Some(bad) = vectors.iter().find(|v| v.len() != metadata.dimension) {
        return Err(CoreError::IndexCorrupt {
            path: dir.to_path_buf(),
            message: format!(
                "vector of length {} in a dimension {} index",
                bad.len(),
                metadata.dimension
            ),
        });
    }

    Ok(Snapshot {
        dimension: metadata.dimension,
        vectors,
        texts: metadata.texts,
        metadatas: metadata.metadatas,
    })
}

fn vectors_digest(vectors: &[Vec<f32>]) -> String {
    let mut hasher = Sha256::new();
    for vector in vectors {
        hasher.update((vector.len() as u64).to_le_bytes());
        for x in vector {
            hasher.update(x.to_le_bytes());
        }
    }
    hex::encode(hasher.finalize())
}

fn write_atomic<F>(path: &Path, write_body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp = tmp_path(path);
    let file = File::create(&tmp).map_err(|e| CoreError::io(&tmp, e))?;
    let mut writer = BufWriter::new(file);

    let written = write_body(&mut writer).and_then(|_| {
        writer.flush().map_err(|e| CoreError::io(&tmp, e))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| CoreError::io(&tmp, e))
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    drop(writer);

    fs::rename(&tmp, path).map_err(|e| CoreError::io(path, e))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn corrupt(path: &Path, err: impl std::fmt::Display) -> CoreError {
    CoreError::IndexCorrupt {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
