use std::path::{Path, PathBuf};

use super::{wav, CacheError};

/// Directory of rendered notes, one `<name>.wav` per note.
#[derive(Debug, Clone)]
pub struct SampleCache {
    dir: PathBuf,
    sample_rate: u32,
}

impl SampleCache {
    pub fn new(dir: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            dir: dir.into(),
            sample_rate,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// File that holds the asset for `name`.
    ///
    /// Characters that could escape the cache directory, a leading `.` and
    /// `%` itself are percent-encoded, so distinct names never share a file.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let mut stem = String::with_capacity(name.len());
        for (i, c) in name.chars().enumerate() {
            match c {
                '%' | '/' | '\\' | ':' | '\0' => stem.push_str(&format!("%{:02X}", c as u32)),
                '.' if i == 0 => stem.push_str("%2E"),
                c => stem.push(c),
            }
        }
        self.dir.join(format!("{stem}.wav"))
    }

    pub fn contains(&self, name: &str) -> Result<bool, CacheError> {
        Ok(wav::exists(&self.path_for(name))?)
    }

    pub fn load(&self, name: &str) -> Result<Vec<i16>, CacheError> {
        wav::read_pcm(&self.path_for(name), self.sample_rate)
    }

    /// Persist `pcm` for `name`, creating the directory if needed.
    pub fn store(&self, name: &str, pcm: &[i16]) -> Result<PathBuf, CacheError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        wav::write_pcm(&path, pcm, self.sample_rate)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::test_dir;

    #[test]
    fn names_map_to_wav_files() {
        let cache = SampleCache::new("/tmp/notes", 44_100);
        assert_eq!(cache.path_for("C4"), PathBuf::from("/tmp/notes/C4.wav"));
        assert_eq!(cache.path_for("a/b"), PathBuf::from("/tmp/notes/a%2Fb.wav"));
        assert_eq!(cache.path_for(".."), PathBuf::from("/tmp/notes/%2E..wav"));
        assert_eq!(cache.path_for("C:\\x"), PathBuf::from("/tmp/notes/C%3A%5Cx.wav"));
    }

    #[test]
    fn distinct_names_get_distinct_files() {
        let cache = SampleCache::new("/tmp/notes", 44_100);
        let names = ["a/b", "a_b", "a%2Fb", "a%252Fb", ".x", "%2Ex", "_.x"];
        let mut paths: Vec<PathBuf> = names.iter().map(|n| cache.path_for(n)).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), names.len());
        assert!(paths.iter().all(|p| p.parent() == Some(Path::new("/tmp/notes"))));
    }

    #[test]
    fn store_then_load() {
        let cache = SampleCache::new(test_dir("cache_store").join("nested"), 44_100);
        assert!(!cache.contains("Eb").unwrap());

        let pcm = vec![-3, 0, 12_000, i16::MIN, i16::MAX];
        let path = cache.store("Eb", &pcm).unwrap();

        assert!(path.ends_with("Eb.wav"));
        assert!(cache.contains("Eb").unwrap());
        assert_eq!(cache.load("Eb").unwrap(), pcm);
    }

    #[test]
    fn missing_asset_is_an_error() {
        let cache = SampleCache::new(test_dir("cache_missing"), 44_100);
        assert!(cache.load("G").is_err());
    }
}
