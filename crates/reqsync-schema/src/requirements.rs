//! `requirements.txt` reader.
//!
//! Only two kinds of line are kept: exact pins (`name[extras]==version`, with an
//! optional `; marker`) and git references (`git+<scheme>://<url>@<ref>#egg=<name>`).
//! Everything else is skipped.

use crate::package::PackageSpec;
use regex::Regex;
use std::sync::LazyLock;

static PINNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?P<op>===?)\s*(?P<version>[^\s;,]+)\s*(?:;\s*(?P<markers>.*))?$",
    )
    .expect("valid pinned requirement pattern")
});

static VCS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:-e|--editable)(?:\s+|=))?git\+(?P<url>[A-Za-z][A-Za-z0-9+.-]*://\S+)@(?P<ref>[^@#\s]+)#egg=(?P<name>[A-Za-z0-9._-]+)(?:&\S*)?$",
    )
    .expect("valid vcs requirement pattern")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#.*$").expect("valid comment pattern"));

static HASH_OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*--hash[=\s]+\S+").expect("valid hash option pattern"));

/// Remove the parts of a line pip itself ignores for identity purposes:
/// inline comments, `--hash` options and a trailing continuation backslash.
fn strip_line_noise(line: &str) -> String {
    let line = COMMENT.replace(line, "");
    let line = HASH_OPTION.replace_all(&line, "");
    let line = line.trim();
    line.strip_suffix('\\').unwrap_or(line).trim().to_owned()
}

/// Parse a single requirements line. Returns `None` for lines that are neither
/// an exact pin nor a git reference.
pub fn parse_requirement_line(line: &str) -> Option<PackageSpec> {
    let cleaned = strip_line_noise(line);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = VCS.captures(&cleaned) {
        return Some(PackageSpec::vcs(&caps["name"], &caps["url"], &caps["ref"]));
    }

    if let Some(caps) = PINNED.captures(&cleaned) {
        let version = format!("{}{}", &caps["op"], &caps["version"]);
        let mut spec = PackageSpec::pinned(&caps["name"], &version);
        if let Some(extras) = caps.name("extras") {
            spec = spec.with_extras(extras.as_str().split(','));
        }
        if let Some(markers) = caps.name("markers") {
            spec = spec.with_markers(markers.as_str());
        }
        return Some(spec);
    }

    let without_editable = cleaned
        .strip_prefix("--editable")
        .or_else(|| cleaned.strip_prefix("-e"))
        .map_or(cleaned.as_str(), |rest| rest.trim_start_matches('=').trim_start());
    if without_editable.starts_with("git+") {
        tracing::warn!("skipping git requirement without '@<ref>#egg=<name>': {cleaned}");
    } else {
        tracing::trace!("skipping requirements line: {cleaned}");
    }
    None
}

/// Parse requirements file content into package specifications, in file order.
pub fn parse_requirements_str(input: &str) -> Vec<PackageSpec> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    input.lines().filter_map(parse_requirement_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(line: &str) -> Option<String> {
        parse_requirement_line(line).map(|s| s.to_string())
    }

    #[test]
    fn exact_pin() {
        assert_eq!(canonical("requests==2.25.1").as_deref(), Some("requests==2.25.1"));
    }

    #[test]
    fn arbitrary_equality_pin() {
        assert_eq!(canonical("legacy===1.0-custom").as_deref(), Some("legacy===1.0-custom"));
    }

    #[test]
    fn pin_with_extras_and_markers() {
        assert_eq!(
            canonical("requests[socks, security]==2.25.1; python_version >= '3.6'").as_deref(),
            Some("requests[security,socks]==2.25.1 ; python_version >= '3.6'")
        );
    }

    #[test]
    fn spaces_around_operator_are_ignored() {
        assert_eq!(canonical("  six == 1.16.0  ").as_deref(), Some("six==1.16.0"));
    }

    #[test]
    fn index_url_directive_is_excluded() {
        assert_eq!(canonical("-i https://pypi.org/simple"), None);
        assert_eq!(canonical("--extra-index-url https://example.com/simple"), None);
    }

    #[test]
    fn comments_and_blank_lines_are_excluded() {
        assert_eq!(canonical("# pinned by pipenv"), None);
        assert_eq!(canonical(""), None);
        assert_eq!(canonical("    "), None);
    }

    #[test]
    fn unpinned_requirements_are_excluded() {
        assert_eq!(canonical("requests"), None);
        assert_eq!(canonical("requests>=2.0"), None);
        assert_eq!(canonical("requests==2.25.1,<3"), None);
    }

    #[test]
    fn inline_comment_is_removed() {
        assert_eq!(
            canonical("idna==2.10  # via requests").as_deref(),
            Some("idna==2.10")
        );
    }

    #[test]
    fn hashes_and_continuation_are_removed() {
        assert_eq!(
            canonical("urllib3==1.26.5 --hash=sha256:753a0374df26658f99d826cfe40394a686d05985786d946fbe4165b5148f5a7c \\").as_deref(),
            Some("urllib3==1.26.5")
        );
        assert_eq!(
            canonical("    --hash=sha256:a27d3c2fd5d3b4a2b4c6b4a5b8e0e1e5f9e1c9f2b0a0d2c5e6f7a8b9c0d1e2f3"),
            None
        );
    }

    #[test]
    fn git_reference() {
        assert_eq!(
            canonical("git+https://github.com/org/mylib.git@4f2c1d9#egg=mylib").as_deref(),
            Some("git+https://github.com/org/mylib.git@4f2c1d9#egg=mylib")
        );
    }

    #[test]
    fn editable_git_reference_with_ssh_user() {
        assert_eq!(
            canonical("-e git+ssh://git@github.com/org/mylib.git@main#egg=mylib").as_deref(),
            Some("git+ssh://git@github.com/org/mylib.git@main#egg=mylib")
        );
    }

    #[test]
    fn long_editable_flag_git_reference() {
        assert_eq!(
            canonical("--editable git+https://github.com/org/mylib.git@v2#egg=mylib").as_deref(),
            Some("git+https://github.com/org/mylib.git@v2#egg=mylib")
        );
        assert_eq!(
            canonical("--editable=git+https://github.com/org/mylib.git@v2#egg=mylib").as_deref(),
            Some("git+https://github.com/org/mylib.git@v2#egg=mylib")
        );
    }

    #[test]
    fn leading_byte_order_mark_keeps_first_line() {
        let specs: Vec<String> = parse_requirements_str("\u{feff}certifi==2020.12.5\r\nsix==1.16.0\r\n")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(specs, vec!["certifi==2020.12.5", "six==1.16.0"]);
    }

    #[test]
    fn git_reference_without_ref_is_excluded() {
        assert_eq!(canonical("git+https://github.com/org/mylib.git#egg=mylib"), None);
        assert_eq!(canonical("--editable git+https://github.com/org/mylib.git#egg=mylib"), None);
    }

    #[test]
    fn parses_pipenv_generated_file() {
        let input = "\
-i https://pypi.org/simple
certifi==2020.12.5
chardet==4.0.0; python_version >= '2.7' and python_version not in '3.0, 3.1, 3.2, 3.3, 3.4'
git+https://github.com/org/mylib.git@4f2c1d9#egg=mylib

requests[security]==2.25.1
";
        let specs: Vec<String> = parse_requirements_str(input)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            specs,
            vec![
                "certifi==2020.12.5",
                "chardet==4.0.0 ; python_version >= '2.7' and python_version not in '3.0, 3.1, 3.2, 3.3, 3.4'",
                "git+https://github.com/org/mylib.git@4f2c1d9#egg=mylib",
                "requests[security]==2.25.1",
            ]
        );
    }
}
