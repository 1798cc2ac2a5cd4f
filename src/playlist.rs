// src/playlist.rs
//! Ordered list of GPX files to replay

use crate::error::{Result, TimelapseError};
use crate::track::{load_gpx_file, Track};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    files: Vec<PathBuf>,
}

impl Playlist {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn add(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    pub fn extend<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
    }

    /// Remove the file at `index` (0-based) and return it.
    pub fn remove(&mut self, index: usize) -> Result<PathBuf> {
        self.check_index(index)?;
        Ok(self.files.remove(index))
    }

    /// Move the file at `from` so that it ends up at position `to`.
    pub fn rearrange(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let file = self.files.remove(from);
            self.files.insert(to, file);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// Load every file in order; the first unreadable file fails the load.
    pub fn load_tracks(&self) -> Result<Vec<Track>> {
        if self.files.is_empty() {
            return Err(TimelapseError::invalid_input("No files to play"));
        }
        self.files.iter().map(|path| load_gpx_file(path)).collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.files.len() {
            Ok(())
        } else {
            Err(TimelapseError::invalid_input(format!(
                "file index {} is out of range (playlist has {} file(s))",
                index + 1,
                self.files.len()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(names: &[&str]) -> Playlist {
        let mut list = Playlist::new();
        list.extend(names.iter().copied());
        list
    }

    fn names(list: &Playlist) -> Vec<String> {
        list.iter().map(|p| p.display().to_string()).collect()
    }

    #[test]
    fn test_add_and_remove() {
        let mut list = playlist(&["a.gpx", "b.gpx"]);
        list.add("c.gpx");
        assert_eq!(list.len(), 3);

        let removed = list.remove(1).unwrap();
        assert_eq!(removed, PathBuf::from("b.gpx"));
        assert_eq!(names(&list), vec!["a.gpx", "c.gpx"]);
    }

    #[test]
    fn test_rearrange() {
        let mut list = playlist(&["a.gpx", "b.gpx", "c.gpx", "d.gpx"]);
        list.rearrange(0, 2).unwrap();
        assert_eq!(names(&list), vec!["b.gpx", "c.gpx", "a.gpx", "d.gpx"]);

        list.rearrange(3, 0).unwrap();
        assert_eq!(names(&list), vec!["d.gpx", "b.gpx", "c.gpx", "a.gpx"]);

        list.rearrange(1, 1).unwrap();
        assert_eq!(names(&list), vec!["d.gpx", "b.gpx", "c.gpx", "a.gpx"]);
    }

    #[test]
    fn test_out_of_range() {
        let mut list = playlist(&["a.gpx"]);
        assert!(matches!(list.remove(3), Err(TimelapseError::InvalidInput(_))));
        assert!(matches!(list.rearrange(0, 1), Err(TimelapseError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_playlist_has_nothing_to_load() {
        let list = Playlist::new();
        assert!(list.is_empty());
        assert!(matches!(list.load_tracks(), Err(TimelapseError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file() {
        let list = playlist(&["/nonexistent/track.gpx"]);
        assert!(list.load_tracks().is_err());
    }
}
