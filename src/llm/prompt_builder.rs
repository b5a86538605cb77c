use std::path::PathBuf;

use crate::llm::prompts;

/// Concatenate every staged file as `path:` followed by its content and a blank line.
pub fn changed_files_block(paths: &[PathBuf], contents: &[String]) -> String {
    let mut out = String::new();
    for (path, content) in paths.iter().zip(contents) {
        out.push_str(&format!("{}:\n", path.display()));
        out.push_str(content);
        out.push_str("\n\n");
    }
    out
}

/// Fill the prompt template with the task, the changed-files block and the diff.
pub fn build_prompt(task: &str, changed_files: &str, diff: &str) -> String {
    let files_fence = fence_for(changed_files);
    let diff_fence = fence_for(diff);

    render(
        prompts::PROMPT_TEMPLATE,
        &[
            ("task", task),
            ("files_fence", &files_fence),
            ("changed_files", changed_files),
            ("diff_fence", &diff_fence),
            ("diff", diff),
        ],
    )
}

/// A backtick fence longer than any backtick run inside `content` (at least three).
fn fence_for(content: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

/// Single-pass `{key}` substitution. Inserted values are never scanned again,
/// and unknown `{...}` sequences in the template are kept as written.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });

        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
