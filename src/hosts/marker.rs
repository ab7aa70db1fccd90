//! Block marker format.
//!
//! A hostop block looks like this inside the hosts file:
//!
//! ```text
//!
//! ###### Hostop Start 0b6f1c9e-5d0e-4f5c-9a43-2f8e1d7c6b10
//! 127.0.0.1 example.com
//! 127.0.0.1 news.example.org
//! ###### Hostop End
//! ```
//!
//! The start marker carries the block identifier and begins with a newline
//! so the block never glues itself onto an unterminated last line. Every
//! block shares the same end marker.

use regex::bytes::Regex;

use super::error::HostsError;

/// Prefix of every start marker line.
pub const START_PREFIX: &str = "###### Hostop Start ";

/// The end marker line shared by all blocks.
pub const END_MARKER: &str = "###### Hostop End\n";

/// Address every blocked hostname is redirected to.
pub const REDIRECT_ADDRESS: &str = "127.0.0.1";

/// A block found in the hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBlock {
    /// Identifier from the start marker.
    pub id: String,
    /// Hostnames redirected by the block, in file order.
    pub hosts: Vec<String>,
}

/// Build the start marker for `id`.
pub fn start_marker(id: &str) -> String {
    format!("\n{START_PREFIX}{id}\n")
}

/// Build the redirection line for a single hostname.
pub fn redirect_line(host: &str) -> String {
    format!("{REDIRECT_ADDRESS} {host}\n")
}

/// Render a complete block: start marker, one line per host, end marker.
pub fn render_block<S: AsRef<str>>(id: &str, hosts: &[S]) -> String {
    let mut block = start_marker(id);
    for host in hosts {
        block.push_str(&redirect_line(host.as_ref()));
    }
    block.push_str(END_MARKER);
    block
}

/// Check that `id` can be embedded in a marker line.
///
/// Whitespace and control characters would either split the marker line
/// or make it ambiguous to read back.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// Build the pattern matching the block for `id`.
///
/// The pattern works on raw bytes, so lines outside hostop blocks may use
/// any encoding. The match runs from the exact start marker through the first end marker
/// after it, so consecutive blocks are matched independently. The trailing
/// newline of the start marker keeps id `1` from matching a block tagged `11`.
pub fn match_block(id: &str) -> Result<Regex, HostsError> {
    let pattern = format!(
        "{}(?s-u:.*?){}",
        regex::escape(&start_marker(id)),
        regex::escape(END_MARKER)
    );
    Regex::new(&pattern).map_err(|source| HostsError::Pattern {
        id: id.to_string(),
        source,
    })
}

/// List every hostop block in `content`, in file order.
///
/// Ids and hostnames are decoded lossily; the rest of the file is never
/// interpreted.
pub fn parse_blocks(content: &[u8]) -> Vec<ActiveBlock> {
    let mut blocks = Vec::new();
    let mut rest = content;

    while let Some(start) = find(rest, START_PREFIX.as_bytes()) {
        let after_prefix = &rest[start + START_PREFIX.len()..];
        let Some(eol) = after_prefix.iter().position(|&b| b == b'\n') else {
            break;
        };
        let id = String::from_utf8_lossy(&after_prefix[..eol]).into_owned();
        let body = &after_prefix[eol + 1..];

        let Some(end) = find(body, END_MARKER.as_bytes()) else {
            break;
        };

        let hosts = body[..end]
            .split(|&b| b == b'\n')
            .filter_map(|line| line.strip_prefix(REDIRECT_ADDRESS.as_bytes()))
            .map(|host| String::from_utf8_lossy(host).trim().to_string())
            .filter(|host| !host.is_empty())
            .collect();

        blocks.push(ActiveBlock { id, hosts });
        rest = &body[end + END_MARKER.len()..];
    }

    blocks
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_marker_format() {
        assert_eq!(start_marker("abc"), "\n###### Hostop Start abc\n");
    }

    #[test]
    fn test_render_block_exact() {
        let block = render_block("id-1", &["a.com", "b.com"]);
        assert_eq!(
            block,
            "\n###### Hostop Start id-1\n127.0.0.1 a.com\n127.0.0.1 b.com\n###### Hostop End\n"
        );
    }

    #[test]
    fn test_match_block_matches_own_block() {
        let content = format!("127.0.0.1 localhost\n{}", render_block("42", &["a.com"]));
        let re = match_block("42").unwrap();
        let m = re.find(content.as_bytes()).unwrap();
        assert_eq!(m.as_bytes(), render_block("42", &["a.com"]).as_bytes());
    }

    #[test]
    fn test_match_block_rejects_partial_ids() {
        let content = format!(
            "{}{}",
            render_block("11", &["a.com"]),
            render_block("10", &["b.com"])
        );
        let re = match_block("1").unwrap();
        assert!(!re.is_match(content.as_bytes()));
    }

    #[test]
    fn test_match_block_stops_at_first_end_marker() {
        let first = render_block("x", &["a.com"]);
        let second = render_block("y", &["b.com"]);
        let content = format!("{first}{second}");

        let re = match_block("x").unwrap();
        let m = re.find(content.as_bytes()).unwrap();
        assert_eq!(m.as_bytes(), first.as_bytes());
    }

    #[test]
    fn test_match_block_escapes_id() {
        // A regex metacharacter in the id must be matched literally
        let content = render_block("a.b", &["x.com"]);
        assert!(match_block("a.b").unwrap().is_match(content.as_bytes()));

        let other = render_block("aXb", &["x.com"]);
        assert!(!match_block("a.b").unwrap().is_match(other.as_bytes()));
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("0b6f1c9e-5d0e-4f5c-9a43-2f8e1d7c6b10"));
        assert!(is_valid_id("1"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("a b"));
        assert!(!is_valid_id("a\nb"));
    }

    #[test]
    fn test_parse_blocks() {
        let content = format!(
            "127.0.0.1 localhost\n::1 localhost\n{}# comment\n{}",
            render_block("one", &["a.com", "b.com"]),
            render_block("two", &["c.com"])
        );

        let blocks = parse_blocks(content.as_bytes());
        assert_eq!(
            blocks,
            vec![
                ActiveBlock {
                    id: "one".to_string(),
                    hosts: vec!["a.com".to_string(), "b.com".to_string()],
                },
                ActiveBlock {
                    id: "two".to_string(),
                    hosts: vec!["c.com".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_parse_blocks_ignores_unterminated_block() {
        let content = b"\n###### Hostop Start dangling\n127.0.0.1 a.com\n";
        assert!(parse_blocks(content).is_empty());
    }

    #[test]
    fn test_parse_blocks_around_latin1_lines() {
        let mut content = b"# caf\xe9 printer\n".to_vec();
        content.extend_from_slice(render_block("ok", &["a.com"]).as_bytes());
        content.extend_from_slice(b"10.0.0.9 b\xfcro\n");

        let blocks = parse_blocks(&content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, "ok");
        assert_eq!(blocks[0].hosts, vec!["a.com"]);
    }

    #[test]
    fn test_match_block_in_non_utf8_content() {
        let mut content = b"# caf\xe9\n".to_vec();
        content.extend_from_slice(render_block("x", &["a.com"]).as_bytes());

        let re = match_block("x").unwrap();
        assert_eq!(re.replace_all(&content, &b""[..]).as_ref(), b"# caf\xe9\n");
    }

    #[test]
    fn test_parse_blocks_empty_file() {
        assert!(parse_blocks(b"").is_empty());
    }
}
