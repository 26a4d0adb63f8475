use crate::inventory::domain::{
    MetadataLocation, PackageName, PackageRecord, Requirement, Version, VersionConstraint,
};
use crate::shared::error::ParseError;

/// Header fields of a METADATA or PKG-INFO file that the inventory uses.
#[derive(Debug, Default, PartialEq, Eq)]
struct HeaderBlock {
    name: Option<String>,
    version: Option<String>,
    summary: Option<String>,
    requires_dist: Vec<String>,
}

/// Turns the text of one metadata record into a [`PackageRecord`].
///
/// Both record shapes go through the same header parsing; they differ only in where
/// requirements come from (`Requires-Dist` headers or a `requires.txt` file).
/// This service performs no I/O: the reader hands it already-decoded text.
pub struct MetadataParser;

impl MetadataParser {
    /// Parses a record.
    ///
    /// # Arguments
    /// * `location` - Where the record was found; copied into the result and into errors
    /// * `header_text` - Content of `METADATA` or `PKG-INFO`
    /// * `requires_txt` - Content of an egg-info `requires.txt`, when present
    ///
    /// # Errors
    /// Returns a `ParseError` when `Name` or `Version` is missing or invalid.
    pub fn parse(
        location: &MetadataLocation,
        header_text: &str,
        requires_txt: Option<&str>,
    ) -> Result<PackageRecord, ParseError> {
        let headers = Self::parse_headers(header_text);

        let raw_name = headers.name.ok_or_else(|| ParseError::MissingField {
            location: location.path.clone(),
            field: "Name".to_string(),
        })?;
        let name = PackageName::new(raw_name).map_err(|e| ParseError::InvalidField {
            location: location.path.clone(),
            field: "Name".to_string(),
            details: e.to_string(),
        })?;

        let raw_version = headers.version.ok_or_else(|| ParseError::MissingField {
            location: location.path.clone(),
            field: "Version".to_string(),
        })?;
        let version = Version::new(raw_version).map_err(|e| ParseError::InvalidField {
            location: location.path.clone(),
            field: "Version".to_string(),
            details: e.to_string(),
        })?;

        let mut requires: Vec<Requirement> = headers
            .requires_dist
            .iter()
            .filter_map(|value| Self::parse_requires_dist(value))
            .collect();
        if let Some(text) = requires_txt {
            requires.extend(Self::parse_requires_txt(text));
        }

        Ok(PackageRecord::new(
            name,
            version,
            headers.summary,
            location.scope,
            location.path.clone(),
            location.runtime_bucket.clone(),
            requires,
        ))
    }

    /// Reads `Key: value` headers up to the first blank line.
    ///
    /// Continuation lines and unknown keys are skipped; the first occurrence of a
    /// single-valued key wins.
    fn parse_headers(text: &str) -> HeaderBlock {
        let mut block = HeaderBlock::default();

        for line in text.lines() {
            if line.trim().is_empty() {
                break;
            }
            if line.starts_with([' ', '\t']) {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("Name") {
                block.name.get_or_insert_with(|| value.to_string());
            } else if key.eq_ignore_ascii_case("Version") {
                block.version.get_or_insert_with(|| value.to_string());
            } else if key.eq_ignore_ascii_case("Summary") {
                if !value.is_empty() && value != "UNKNOWN" {
                    block.summary.get_or_insert_with(|| value.to_string());
                }
            } else if key.eq_ignore_ascii_case("Requires-Dist") && !value.is_empty() {
                block.requires_dist.push(value.to_string());
            }
        }

        block
    }

    /// Parses one `Requires-Dist` value: `name[extras] (constraint) ; qualifier`.
    ///
    /// Returns `None` when no requirement name can be read.
    fn parse_requires_dist(value: &str) -> Option<Requirement> {
        let (spec, qualifier) = match value.split_once(';') {
            Some((spec, qualifier)) => {
                let qualifier = qualifier.trim();
                (spec, (!qualifier.is_empty()).then(|| qualifier.to_string()))
            }
            None => (value, None),
        };

        let (name, extras, rest) = Self::split_name_and_extras(spec.trim())?;

        let rest = rest.trim();
        let rest = rest
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .unwrap_or(rest)
            .trim();
        let constraint = if rest.is_empty() {
            VersionConstraint::Unconstrained
        } else {
            VersionConstraint::Spec(rest.to_string())
        };

        Some(Requirement::new(name, constraint, extras, qualifier))
    }

    /// Parses an egg-info `requires.txt`.
    ///
    /// `[section]` lines set the qualifier of every requirement below them. Requirement
    /// lines keep their name and extras only.
    fn parse_requires_txt(text: &str) -> Vec<Requirement> {
        let mut qualifier: Option<String> = None;
        let mut requires = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let section = section.trim();
                qualifier = (!section.is_empty()).then(|| section.to_string());
                continue;
            }
            if let Some((name, extras, _)) = Self::split_name_and_extras(line) {
                requires.push(Requirement::new(
                    name,
                    VersionConstraint::Unconstrained,
                    extras,
                    qualifier.clone(),
                ));
            }
        }

        requires
    }

    /// Splits `name[extra1,extra2] rest` into its parts.
    fn split_name_and_extras(spec: &str) -> Option<(String, Vec<String>, &str)> {
        let name_len = spec
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
            .unwrap_or(spec.len());
        if name_len == 0 {
            return None;
        }
        let name = spec[..name_len].to_string();
        let rest = spec[name_len..].trim_start();

        if let Some(after_bracket) = rest.strip_prefix('[') {
            if let Some((inside, after)) = after_bracket.split_once(']') {
                let extras = inside
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect();
                return Some((name, extras, after));
            }
        }

        Some((name, Vec::new(), rest))
    }
}
