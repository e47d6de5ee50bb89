//! Plain-text documentation rendering.

/// Strip comment delimiters and leading `*` gutters from a `/** ... */` block
pub fn clean_comment(raw: &str) -> String {
    let body = raw.trim();
    let body = body.strip_prefix("/**").or_else(|| body.strip_prefix("/*")).unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim_start).unwrap_or(line)
        })
        .collect();

    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

/// One constructor or method in a type's documentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDoc {
    pub tags: Vec<String>,
    pub signature: String,
    pub comment: Option<String>,
}

/// Render a symbol's documentation
///
/// The symbol's own comment comes first, then one block per member.
pub fn render(own: Option<&str>, members: &[MemberDoc]) -> String {
    let mut sections: Vec<String> = Vec::new();
    if let Some(own) = own {
        let text = clean_comment(own);
        if !text.is_empty() {
            sections.push(text);
        }
    }
    for member in members {
        let mut block = String::new();
        if !member.tags.is_empty() {
            block.push('[');
            block.push_str(&member.tags.join(" "));
            block.push_str("] ");
        }
        block.push_str(&member.signature);
        if let Some(comment) = member.comment.as_deref().map(clean_comment) {
            for line in comment.lines() {
                block.push_str("\n    ");
                block.push_str(line);
            }
        }
        sections.push(block);
    }
    sections.join("\n\n")
}
