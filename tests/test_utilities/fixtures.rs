use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway site-packages directory populated with metadata entries
pub struct SitePackages {
    dir: TempDir,
    root: PathBuf,
}

impl SitePackages {
    /// Creates `<tmp>/lib/python3.12/site-packages`
    pub fn new() -> Self {
        Self::with_runtime("python3.12")
    }

    pub fn with_runtime(runtime: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("lib").join(runtime).join("site-packages");
        fs::create_dir_all(&root).unwrap();
        Self { dir, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Directory the fixture lives in, handy for cache or output files
    pub fn scratch(&self) -> &Path {
        self.dir.path()
    }

    pub fn dist_info(self, name: &str, version: &str, requires: &[&str]) -> Self {
        let entry = self.root.join(format!(
            "{}-{}.dist-info",
            name.replace('-', "_"),
            version
        ));
        fs::create_dir_all(&entry).unwrap();
        fs::write(entry.join("METADATA"), metadata(name, version, requires)).unwrap();
        self
    }

    /// egg-info directory with dependencies in `requires.txt`
    pub fn egg_info_dir(self, name: &str, version: &str, requires_txt: &str) -> Self {
        let entry = self.root.join(format!("{}-{}-py3.12.egg-info", name, version));
        fs::create_dir_all(&entry).unwrap();
        fs::write(entry.join("PKG-INFO"), metadata(name, version, &[])).unwrap();
        fs::write(entry.join("requires.txt"), requires_txt).unwrap();
        self
    }

    /// Single-file egg-info
    pub fn egg_info_file(self, name: &str, version: &str) -> Self {
        let entry = self.root.join(format!("{}-{}-py3.12.egg-info", name, version));
        fs::write(entry, metadata(name, version, &[])).unwrap();
        self
    }

    /// dist-info directory without its METADATA file
    pub fn broken_dist_info(self, name: &str, version: &str) -> Self {
        let entry = self.root.join(format!("{}-{}.dist-info", name, version));
        fs::create_dir_all(entry).unwrap();
        self
    }
}

pub fn metadata(name: &str, version: &str, requires: &[&str]) -> String {
    let mut text = format!(
        "Metadata-Version: 2.1\nName: {}\nVersion: {}\nSummary: The {} package\n",
        name, version, name
    );
    for requirement in requires {
        text.push_str(&format!("Requires-Dist: {}\n", requirement));
    }
    text.push_str("\nA longer description that is never read.\n");
    text
}
