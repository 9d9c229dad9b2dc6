//! Splitting multi-document YAML produced by helm

use krmhelm_core::{Error, KubeObject, Result};

/// Split YAML text on `---` separator lines
///
/// A separator is a line that starts with `---` followed only by whitespace
/// or a comment. Documents that are empty or contain only comments are
/// dropped.
pub fn split_documents(text: &str) -> Vec<String> {
    let mut docs = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if is_separator(line) {
            push_document(&mut docs, std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_document(&mut docs, current);

    docs
}

/// Parse every document in helm output
///
/// Fails on the first document that is not a valid YAML mapping; nothing is
/// returned for the documents that did parse.
pub fn parse_documents(text: &str) -> Result<Vec<KubeObject>> {
    split_documents(text)
        .iter()
        .enumerate()
        .map(|(index, doc)| {
            KubeObject::parse(doc).map_err(|e| match e {
                Error::Parse { message, .. } => Error::parse(format!("helm output document {}", index), message),
                other => other,
            })
        })
        .collect()
}

fn is_separator(line: &str) -> bool {
    match line.strip_prefix("---") {
        Some(rest) => {
            let rest = rest.trim();
            rest.is_empty() || rest.starts_with('#')
        }
        None => false,
    }
}

fn push_document(docs: &mut Vec<String>, doc: String) {
    let has_content = doc.lines().any(|l| {
        let l = l.trim();
        !l.is_empty() && !l.starts_with('#')
    });
    if has_content {
        docs.push(doc);
    }
}
