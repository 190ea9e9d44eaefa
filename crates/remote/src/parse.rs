//! Parsing of `gh` JSON and line output

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchHit {
    repository: RepositoryRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryRef {
    name: Option<String>,
    name_with_owner: Option<String>,
}

impl RepositoryRef {
    fn short_name(self) -> Option<String> {
        self.name.or_else(|| {
            self.name_with_owner
                .and_then(|full| full.rsplit('/').next().map(str::to_string))
        })
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    name: String,
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.contains(&name) {
        names.push(name);
    }
}

/// Parse `gh search code --json repository` output into repository names.
///
/// Names keep first-seen order without duplicates (one repository can hold
/// several matching paths). `[]` parses to an empty list; anything that is
/// not an array of hits carrying a repository name is an error.
///
/// # Errors
///
/// Returns a description of what was wrong with the payload.
pub fn parse_search_response(stdout: &str) -> Result<Vec<String>, String> {
    if stdout.trim().is_empty() {
        return Err("empty output".to_string());
    }

    let hits: Vec<SearchHit> = serde_json::from_str(stdout).map_err(|e| e.to_string())?;
    let mut names = Vec::new();
    for (index, hit) in hits.into_iter().enumerate() {
        let name = hit
            .repository
            .short_name()
            .ok_or_else(|| format!("result {index} has no repository name"))?;
        push_unique(&mut names, name);
    }
    Ok(names)
}

/// Parse `gh repo list --json name` output.
///
/// # Errors
///
/// Returns a description of what was wrong with the payload.
pub fn parse_repository_list(stdout: &str) -> Result<Vec<String>, String> {
    let entries: Vec<RepositoryEntry> =
        serde_json::from_str(stdout.trim()).map_err(|e| e.to_string())?;
    Ok(entries.into_iter().map(|entry| entry.name).collect())
}

/// One name per non-blank line, as printed by `gh api ... --jq '.[].name'`
#[must_use]
pub fn parse_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_hits_deduplicated_in_order() {
        let json = r#"[
            {"repository": {"name": "core", "nameWithOwner": "org/core"}},
            {"repository": {"name": "tools"}},
            {"repository": {"name": "core"}}
        ]"#;
        assert_eq!(parse_search_response(json).unwrap(), vec!["core", "tools"]);
    }

    #[test]
    fn test_search_empty_array_is_valid() {
        assert!(parse_search_response("[]\n").unwrap().is_empty());
    }

    #[test]
    fn test_search_falls_back_to_name_with_owner() {
        let json = r#"[{"repository": {"nameWithOwner": "org/docs"}}]"#;
        assert_eq!(parse_search_response(json).unwrap(), vec!["docs"]);
    }

    #[test]
    fn test_search_malformed() {
        assert!(parse_search_response("").is_err());
        assert!(parse_search_response("not json").is_err());
        assert!(parse_search_response(r#"{"repository": {"name": "x"}}"#).is_err());
        let err = parse_search_response(r#"[{"repository": {}}]"#).unwrap_err();
        assert!(err.contains("no repository name"));
    }

    #[test]
    fn test_repository_list() {
        let json = r#"[{"name": "a"}, {"name": "b"}]"#;
        assert_eq!(parse_repository_list(json).unwrap(), vec!["a", "b"]);
        assert!(parse_repository_list("oops").is_err());
    }

    #[test]
    fn test_lines() {
        assert_eq!(parse_lines("README.md\n\nsrc \n"), vec!["README.md", "src"]);
        assert!(parse_lines("  \n").is_empty());
    }
}
