use crate::inventory::domain::MetadataShape;

const DIST_INFO_SUFFIX: &str = ".dist-info";
const EGG_INFO_SUFFIX: &str = ".egg-info";

/// Recognizes metadata records among the entries of an installation root.
///
/// Detection is by naming convention only; whether the expected metadata file
/// actually exists is the parser's concern.
pub struct MetadataShapeDetector;

impl MetadataShapeDetector {
    /// Returns the shape of a root entry, or `None` if the entry is not a metadata record.
    ///
    /// # Arguments
    /// * `file_name` - Name of the entry inside the root
    /// * `is_dir` - Whether the entry (after resolving one level of symlink) is a directory
    pub fn detect(file_name: &str, is_dir: bool) -> Option<MetadataShape> {
        let has_stem = |suffix: &str| {
            file_name
                .strip_suffix(suffix)
                .is_some_and(|stem| !stem.is_empty())
        };

        if has_stem(DIST_INFO_SUFFIX) {
            return is_dir.then_some(MetadataShape::DistInfo);
        }
        if has_stem(EGG_INFO_SUFFIX) {
            return Some(if is_dir {
                MetadataShape::EggInfoDir
            } else {
                MetadataShape::EggInfoFile
            });
        }
        None
    }
}
