use crate::document::FrontmatterRecord;
use serde_json::Value;
use std::borrow::Cow;

/// Front-matter key treated as an implicit link to a parent note.
pub const PARENT_KEY: &str = "parent";

/// Split a leading front-matter block off `input`.
///
/// The first line must be `---` (a UTF-8 BOM is tolerated); the block ends at
/// the next `---` or `...` line. Returns the raw YAML and the remaining body,
/// or `(None, input)` when there is no terminated block.
pub fn split_frontmatter(input: &str) -> (Option<&str>, &str) {
    let mut lines = input.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (None, input);
    };
    if first.trim_start_matches('\u{feff}').trim_end() != "---" {
        return (None, input);
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return (Some(&input[yaml_start..offset]), &input[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, input)
}

/// Extract YAML front matter from markdown content.
///
/// Returns `None` when there is no block, it is blank, or it does not parse
/// to a mapping.
pub fn extract_frontmatter(input: &str) -> Option<FrontmatterRecord> {
    split_frontmatter(input).0.and_then(parse_frontmatter)
}

/// Parse a raw YAML block into a front-matter record.
pub fn parse_frontmatter(yaml: &str) -> Option<FrontmatterRecord> {
    if yaml.trim().is_empty() {
        return None;
    }
    parse_yaml_to_json_map(yaml)
}

fn parse_yaml_to_json_map(yaml: &str) -> Option<FrontmatterRecord> {
    let yaml_value: serde_yaml::Value = match serde_yaml::from_str(yaml) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Ignoring malformed front matter: {}", e);
            return None;
        }
    };
    let json_value: Value = serde_json::to_value(yaml_value).ok()?;

    match json_value {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}

/// Normalize the `parent` entry to an ordered list of strings.
///
/// A scalar string becomes a one-element list. An unquoted `[[Note]]`
/// parses as a nested sequence and is joined back into `[[Note]]`, whether
/// it stands alone or sits inside a list. Other value shapes are ignored.
pub fn parent_links(frontmatter: &FrontmatterRecord) -> Vec<Cow<'_, str>> {
    match frontmatter.get(PARENT_KEY) {
        Some(Value::String(s)) => vec![Cow::Borrowed(s.as_str())],
        Some(Value::Array(items)) => match unquoted_wikilink(items) {
            Some(link) => vec![Cow::Owned(link)],
            None => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(Cow::Borrowed(s.as_str())),
                    Value::Array(inner) => unquoted_wikilink(inner).map(Cow::Owned),
                    _ => None,
                })
                .collect(),
        },
        _ => Vec::new(),
    }
}

/// YAML reads `[[Note]]` as `[["Note"]]`. Given the outer sequence, rebuild
/// the wikilink text.
fn unquoted_wikilink(items: &[Value]) -> Option<String> {
    let [Value::Array(inner)] = items else {
        return None;
    };
    let names: Vec<&str> = inner.iter().map(Value::as_str).collect::<Option<_>>()?;
    if names.is_empty() {
        return None;
    }
    Some(format!("[[{}]]", names.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_frontmatter() {
        let input = "---\nparent: \"[[Index]]\"\ntags: [a]\n---\n# Title\nBody";
        let fm = extract_frontmatter(input).unwrap();
        assert_eq!(fm["parent"], Value::String("[[Index]]".into()));
        assert_eq!(fm["tags"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn frontmatter_with_bom() {
        let input = "\u{feff}---\nparent: Home\n---\n";
        let fm = extract_frontmatter(input).unwrap();
        assert_eq!(fm["parent"], Value::String("Home".into()));
    }

    #[test]
    fn no_frontmatter_without_leading_delimiter() {
        assert!(extract_frontmatter("# Title\n---\nparent: X\n---\n").is_none());
        assert!(extract_frontmatter("").is_none());
    }

    #[test]
    fn unterminated_block_is_ignored() {
        assert!(extract_frontmatter("---\nparent: X\nbody").is_none());
    }

    #[test]
    fn malformed_yaml_is_ignored() {
        assert!(extract_frontmatter("---\nparent: [unclosed\n---\n").is_none());
    }

    #[test]
    fn split_returns_yaml_and_body() {
        let (yaml, body) = split_frontmatter("---\nparent: X\n---\n# Title\n");
        assert_eq!(yaml, Some("parent: X\n"));
        assert_eq!(body, "# Title\n");
    }

    #[test]
    fn split_without_block_keeps_input() {
        let input = "# Title\nbody";
        assert_eq!(split_frontmatter(input), (None, input));
        assert_eq!(split_frontmatter(""), (None, ""));
    }

    #[test]
    fn dots_close_the_block() {
        let (yaml, body) = split_frontmatter("---\na: 1\n...\nrest");
        assert_eq!(yaml, Some("a: 1\n"));
        assert_eq!(body, "rest");
    }

    #[test]
    fn blank_block_has_no_record() {
        assert!(extract_frontmatter("---\n\n---\nbody").is_none());
    }

    #[test]
    fn scalar_and_sequence_parent_normalize_alike() {
        let scalar = extract_frontmatter("---\nparent: TargetDoc\n---\n").unwrap();
        let seq = extract_frontmatter("---\nparent:\n  - TargetDoc\n---\n").unwrap();
        assert_eq!(parent_links(&scalar), vec!["TargetDoc"]);
        assert_eq!(parent_links(&scalar), parent_links(&seq));
    }

    #[test]
    fn parent_sequence_keeps_order_and_skips_non_strings() {
        let fm = extract_frontmatter("---\nparent: [OtherDoc, 3, TargetDoc]\n---\n").unwrap();
        assert_eq!(parent_links(&fm), vec!["OtherDoc", "TargetDoc"]);
    }

    #[test]
    fn unquoted_wikilink_parent_is_rebuilt() {
        let fm = extract_frontmatter("---\nparent: [[Home]]\n---\n").unwrap();
        assert_eq!(parent_links(&fm), vec!["[[Home]]"]);
    }

    #[test]
    fn unquoted_wikilinks_in_parent_list() {
        let fm = extract_frontmatter("---\nparent:\n  - [[Home]]\n  - Other\n---\n").unwrap();
        assert_eq!(parent_links(&fm), vec!["[[Home]]", "Other"]);
    }

    #[test]
    fn missing_parent_is_empty() {
        let fm = extract_frontmatter("---\ntitle: x\n---\n").unwrap();
        assert!(parent_links(&fm).is_empty());
    }
}
