use crate::common::*;

/// The sorted list of image file names that defines dataset indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileManifest {
    filenames: Vec<String>,
}

impl FileManifest {
    /// List the files in `dir` and build the manifest from them.
    ///
    /// The listing is not recursive. Subdirectories and names that are not
    /// valid UTF-8 are skipped.
    pub fn scan<R>(dir: impl AsRef<Path>, subset_size: Option<usize>, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let dir = dir.as_ref();
        let candidates = list_files(dir)?;
        debug!("found {} files in '{}'", candidates.len(), dir.display());
        Self::from_candidates(candidates, subset_size, rng)
    }

    /// Build the manifest from a list of candidate file names.
    ///
    /// If `subset_size` is set, that many distinct names are sampled uniformly
    /// without replacement. The result is sorted in either case.
    pub fn from_candidates<R>(
        candidates: Vec<String>,
        subset_size: Option<usize>,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let mut filenames: Vec<String> = match subset_size {
            Some(subset_size) => {
                if subset_size > candidates.len() {
                    return Err(Error::InvalidArgument(format!(
                        "subset size {} exceeds the number of available files {}",
                        subset_size,
                        candidates.len()
                    )));
                }
                candidates
                    .choose_multiple(rng, subset_size)
                    .cloned()
                    .collect()
            }
            None => candidates,
        };
        filenames.sort_unstable();

        Ok(Self { filenames })
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.filenames.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.filenames
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.filenames.iter().map(String::as_str)
    }
}

fn list_files(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|err| Error::from_io(dir, err))?;

    let mut filenames = vec![];
    for entry in entries {
        let entry = entry.map_err(|err| Error::from_io(dir, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| Error::from_io(entry.path(), err))?;

        // only symlinks need another stat to find the target type
        let is_file = if file_type.is_symlink() {
            fs::metadata(entry.path())
                .map(|metadata| metadata.is_file())
                .unwrap_or(false)
        } else {
            file_type.is_file()
        };
        if !is_file {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(filename) => filenames.push(filename),
            Err(filename) => warn!("skip non-UTF-8 file name {:?}", filename),
        }
    }

    Ok(filenames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(n: usize) -> Vec<String> {
        (0..n).rev().map(|i| format!("{:06}.jpg", i)).collect()
    }

    #[test]
    fn sorted_manifest_test() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let manifest = FileManifest::from_candidates(candidates(5), None, &mut rng)?;

        assert_eq!(manifest.len(), 5);
        assert_eq!(manifest.get(0), Some("000000.jpg"));
        assert_eq!(manifest.get(4), Some("000004.jpg"));
        assert_eq!(manifest.get(5), None);
        assert!(manifest.iter().tuple_windows().all(|(lhs, rhs)| lhs < rhs));
        Ok(())
    }

    #[test]
    fn subset_test() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(1);
        let all = candidates(100);
        let manifest = FileManifest::from_candidates(all.clone(), Some(10), &mut rng)?;

        assert_eq!(manifest.len(), 10);
        assert!(manifest.iter().tuple_windows().all(|(lhs, rhs)| lhs < rhs));
        assert!(manifest
            .iter()
            .all(|filename| all.iter().any(|candidate| candidate == filename)));
        Ok(())
    }

    #[test]
    fn subset_reproducible_with_seed_test() -> Result<()> {
        let lhs = FileManifest::from_candidates(
            candidates(50),
            Some(7),
            &mut StdRng::seed_from_u64(42),
        )?;
        let rhs = FileManifest::from_candidates(
            candidates(50),
            Some(7),
            &mut StdRng::seed_from_u64(42),
        )?;
        assert_eq!(lhs, rhs);
        Ok(())
    }

    #[test]
    fn full_subset_test() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(2);
        let manifest = FileManifest::from_candidates(candidates(4), Some(4), &mut rng)?;
        assert_eq!(manifest.len(), 4);
        Ok(())
    }

    #[test]
    fn oversized_subset_test() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = FileManifest::from_candidates(candidates(3), Some(4), &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn scan_test() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("b.jpg"), b"")?;
        fs::write(dir.path().join("a.jpg"), b"")?;
        fs::create_dir(dir.path().join("nested"))?;
        fs::write(dir.path().join("nested").join("c.jpg"), b"")?;

        let manifest = FileManifest::scan(dir.path(), None, &mut thread_rng())?;
        assert_eq!(manifest.as_slice(), &["a.jpg", "b.jpg"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn scan_symlinks_test() -> anyhow::Result<()> {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir()?;
        let target = tempfile::tempdir()?;
        fs::write(target.path().join("real.jpg"), b"")?;
        fs::write(dir.path().join("a.jpg"), b"")?;
        symlink(target.path().join("real.jpg"), dir.path().join("linked.jpg"))?;
        symlink(target.path().join("missing.jpg"), dir.path().join("dangling.jpg"))?;
        symlink(target.path(), dir.path().join("linked_dir"))?;

        let manifest = FileManifest::scan(dir.path(), None, &mut thread_rng())?;
        assert_eq!(manifest.as_slice(), &["a.jpg", "linked.jpg"]);
        Ok(())
    }

    #[test]
    fn scan_missing_dir_test() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("images");
        let err = FileManifest::scan(&missing, None, &mut thread_rng()).unwrap_err();
        assert!(matches!(err, Error::NotFound { path } if path == missing));
    }
}
