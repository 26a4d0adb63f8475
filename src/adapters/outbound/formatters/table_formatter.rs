use crate::application::dto::InventoryResponse;
use crate::inventory::domain::{ClassifiedPackage, Scope};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use owo_colors::OwoColorize;
use std::collections::BTreeSet;
use std::fmt::Write;

const UNKNOWN_MARK: char = '?';

/// TableFormatter adapter rendering the aligned terminal report
///
/// In colour mode duplicate names and outdated versions are yellow,
/// vulnerable versions sit on red and user-scope rows are bold. Without
/// colour the same facts are carried by markers around the cell text:
/// `*name*`, `^version^` and `!version!`.
pub struct TableFormatter {
    color: bool,
    details: bool,
}

struct Row<'a> {
    package: &'a ClassifiedPackage,
    name: String,
    version: String,
    runtime: &'a str,
    summary: &'a str,
}

impl TableFormatter {
    pub fn new(color: bool, details: bool) -> Self {
        Self { color, details }
    }

    fn name_cell(&self, package: &ClassifiedPackage) -> String {
        if package.is_duplicate() && !self.color {
            format!("*{}*", package.display_name())
        } else {
            package.display_name().to_string()
        }
    }

    fn version_cell(&self, package: &ClassifiedPackage) -> String {
        let version = package.record().version().as_str();
        let mut cell = if self.color {
            version.to_string()
        } else if package.is_vulnerable() == Some(true) {
            format!("!{}!", version)
        } else if package.is_outdated() == Some(true) {
            format!("^{}^", version)
        } else {
            version.to_string()
        };
        if package.is_latest_unknown() || package.is_vulnerability_unknown() {
            cell.push(UNKNOWN_MARK);
        }
        cell
    }

    fn paint_name(&self, package: &ClassifiedPackage, padded: String) -> String {
        if self.color && package.is_duplicate() {
            padded.yellow().to_string()
        } else {
            padded
        }
    }

    fn paint_version(&self, package: &ClassifiedPackage, padded: String) -> String {
        if !self.color {
            return padded;
        }
        let painted = if package.is_outdated() == Some(true) {
            padded.yellow().to_string()
        } else {
            padded
        };
        if package.is_vulnerable() == Some(true) {
            painted.on_red().to_string()
        } else {
            painted
        }
    }

    fn paint_line(&self, package: &ClassifiedPackage, line: String) -> String {
        if self.color && package.record().scope() == Scope::User {
            line.bold().to_string()
        } else {
            line
        }
    }

    fn render_details(&self, output: &mut String, package: &ClassifiedPackage) -> Result<()> {
        if package.is_outdated() == Some(true) {
            if let Some(latest) = package.latest_version() {
                let line = format!(" => Version {} is available", latest);
                if self.color {
                    writeln!(output, "{}", line.green())?;
                } else {
                    writeln!(output, "{}", line)?;
                }
            }
        }

        for vulnerability in package.vulnerabilities().unwrap_or_default() {
            let mut block = format!(" => {}:\n", vulnerability.display_id());
            if vulnerability.display_id() != vulnerability.id {
                writeln!(block, "      Id: {}", vulnerability.id)?;
            }
            if !vulnerability.aliases.is_empty() {
                writeln!(block, "      Aliases: {}", vulnerability.aliases.join(", "))?;
            }
            if let Some(headline) = vulnerability.headline() {
                writeln!(block, "      Summary: {}", headline)?;
            }
            if !vulnerability.fixed_in.is_empty() {
                writeln!(block, "      Fixed in: {}", vulnerability.fixed_in.join(", "))?;
            }
            if let Some(link) = &vulnerability.link {
                writeln!(block, "      Link: {}", link)?;
            }
            if self.color {
                for line in block.lines() {
                    writeln!(output, "{}", line.red())?;
                }
            } else {
                output.push_str(&block);
            }
        }
        Ok(())
    }

    fn footer(response: &InventoryResponse) -> String {
        let summary = &response.summary;
        let mut footer = format!(
            "{} package{}",
            summary.total,
            if summary.total == 1 { "" } else { "s" }
        );
        let unknown = response
            .packages
            .iter()
            .filter(|p| p.is_latest_unknown() || p.is_vulnerability_unknown())
            .count();
        for (count, label) in [
            (summary.duplicates, "duplicate"),
            (summary.outdated, "outdated"),
            (summary.vulnerable, "vulnerable"),
            (unknown, "unknown"),
        ] {
            if count > 0 {
                footer.push_str(&format!(", {} {}", count, label));
            }
        }
        footer
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|c| c.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

impl ReportFormatter for TableFormatter {
    fn format(&self, response: &InventoryResponse) -> Result<String> {
        let rows: Vec<Row> = response
            .packages
            .iter()
            .map(|package| Row {
                package,
                name: self.name_cell(package),
                version: self.version_cell(package),
                runtime: package.record().runtime_bucket().as_str(),
                summary: package.record().summary(),
            })
            .collect();

        let show_runtime = rows
            .iter()
            .map(|r| r.runtime)
            .collect::<BTreeSet<_>>()
            .len()
            > 1;

        let name_width = width("Package", rows.iter().map(|r| r.name.as_str()));
        let version_width = width("Version", rows.iter().map(|r| r.version.as_str()));
        let runtime_width = width("Runtime", rows.iter().map(|r| r.runtime));
        let summary_width = width("Summary", rows.iter().map(|r| r.summary));

        let mut header = vec![pad("Package", name_width), pad("Version", version_width)];
        let mut rule = vec!["-".repeat(name_width), "-".repeat(version_width)];
        if show_runtime {
            header.push(pad("Runtime", runtime_width));
            rule.push("-".repeat(runtime_width));
        }
        header.push("Summary".to_string());
        rule.push("-".repeat(summary_width));

        let mut output = String::new();
        writeln!(output, "{}", header.join(" ").trim_end())?;
        writeln!(output, "{}", rule.join(" "))?;

        for row in &rows {
            let mut cells = vec![
                self.paint_name(row.package, pad(&row.name, name_width)),
                self.paint_version(row.package, pad(&row.version, version_width)),
            ];
            if show_runtime {
                cells.push(pad(row.runtime, runtime_width));
            }
            cells.push(row.summary.to_string());
            let line = cells.join(" ").trim_end().to_string();
            writeln!(output, "{}", self.paint_line(row.package, line))?;

            if self.details {
                self.render_details(&mut output, row.package)?;
            }
        }

        let total_width = rule.iter().map(String::len).sum::<usize>() + rule.len() - 1;
        writeln!(output, "{}", "=".repeat(total_width))?;
        writeln!(output, "{}", Self::footer(response))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::{
        Fact, PackageName, PackageRecord, RuntimeBucket, Version, Vulnerability,
    };
    use std::path::PathBuf;

    fn version(raw: &str) -> Version {
        Version::new(raw.to_string()).unwrap()
    }

    fn package(
        name: &str,
        scope: Scope,
        duplicate: bool,
        latest: Fact<Version>,
        vulns: Fact<Vec<Vulnerability>>,
    ) -> ClassifiedPackage {
        let record = PackageRecord::new(
            PackageName::new(name.to_string()).unwrap(),
            version("1.0"),
            Some(format!("The {} package", name)),
            scope,
            PathBuf::from(format!("/site/{}-1.0.dist-info", name)),
            RuntimeBucket::new("python3.12"),
            vec![],
        );
        ClassifiedPackage::new(record, name.to_string(), duplicate, false, latest, vulns)
    }

    fn render(color: bool, details: bool, packages: Vec<ClassifiedPackage>) -> String {
        let response = InventoryResponse::new(packages, vec![]);
        TableFormatter::new(color, details).format(&response).unwrap()
    }

    #[test]
    fn test_plain_table_layout() {
        let output = render(
            false,
            false,
            vec![package(
                "six",
                Scope::System,
                false,
                Fact::not_requested(),
                Fact::not_requested(),
            )],
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Package Version Summary");
        assert_eq!(lines[1], "------- ------- ---------------");
        assert_eq!(lines[2], "six     1.0     The six package");
        assert_eq!(lines[3], "=".repeat(31));
        assert_eq!(lines[4], "1 package");
    }

    #[test]
    fn test_no_color_markers() {
        let output = render(
            false,
            false,
            vec![
                package(
                    "attrs",
                    Scope::User,
                    true,
                    Fact::fresh(version("2.0")),
                    Fact::fresh(vec![]),
                ),
                package(
                    "jinja2",
                    Scope::User,
                    false,
                    Fact::fresh(version("2.0")),
                    Fact::fresh(vec![Vulnerability::new("PYSEC-2024-1")]),
                ),
            ],
        );
        assert!(output.contains("*attrs*"));
        assert!(output.contains("^1.0^"));
        assert!(output.contains("!1.0!"));
        assert!(!output.contains("^1.0^ The jinja2"));
        assert!(output.ends_with("2 packages, 1 duplicate, 2 outdated, 1 vulnerable\n"));
    }

    #[test]
    fn test_unknown_facet_marker() {
        let output = render(
            false,
            false,
            vec![package(
                "six",
                Scope::User,
                false,
                Fact::failed(),
                Fact::fresh(vec![]),
            )],
        );
        assert!(output.contains("1.0?"));
        assert!(output.ends_with("1 package, 1 unknown\n"));
    }

    #[test]
    fn test_details() {
        let mut vuln = Vulnerability::new("GHSA-h5c8-rqwp-cp95");
        vuln.aliases = vec!["CVE-2024-22195".to_string()];
        vuln.fixed_in = vec!["3.1.3".to_string()];
        let output = render(
            false,
            true,
            vec![package(
                "jinja2",
                Scope::User,
                false,
                Fact::fresh(version("3.1.4")),
                Fact::fresh(vec![vuln]),
            )],
        );
        assert!(output.contains(" => Version 3.1.4 is available\n"));
        assert!(output.contains(" => CVE-2024-22195:\n"));
        assert!(output.contains("      Id: GHSA-h5c8-rqwp-cp95\n"));
        assert!(output.contains("      Fixed in: 3.1.3\n"));
    }

    #[test]
    fn test_color_mode_uses_ansi_instead_of_markers() {
        let output = render(
            true,
            false,
            vec![package(
                "attrs",
                Scope::User,
                true,
                Fact::fresh(version("2.0")),
                Fact::fresh(vec![Vulnerability::new("PYSEC-2024-1")]),
            )],
        );
        assert!(output.contains('\u{1b}'));
        assert!(!output.contains("*attrs*"));
        assert!(!output.contains("!1.0!"));
    }

    #[test]
    fn test_runtime_column_only_with_several_runtimes() {
        let mut other = package(
            "six",
            Scope::System,
            true,
            Fact::not_requested(),
            Fact::not_requested(),
        );
        let record = PackageRecord::new(
            other.record().name().clone(),
            version("1.0"),
            None,
            Scope::System,
            PathBuf::from("/usr/lib/python3.11/site-packages/six-1.0.dist-info"),
            RuntimeBucket::new("python3.11"),
            vec![],
        );
        other = ClassifiedPackage::new(
            record,
            "six".to_string(),
            true,
            false,
            Fact::not_requested(),
            Fact::not_requested(),
        );
        let output = render(
            false,
            false,
            vec![
                other,
                package(
                    "six",
                    Scope::User,
                    true,
                    Fact::not_requested(),
                    Fact::not_requested(),
                ),
            ],
        );
        assert!(output.starts_with("Package Version Runtime    Summary"));
        assert!(output.contains("python3.11"));
    }

    #[test]
    fn test_empty_inventory() {
        let output = render(false, false, vec![]);
        assert!(output.ends_with("0 packages\n"));
    }
}
