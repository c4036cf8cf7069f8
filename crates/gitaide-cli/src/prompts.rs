//! Prompt builders for each workflow command.
//!
//! Pure functions: everything the assistant needs is passed in, so the text
//! can be tested without a repository or an assistant installed.

use std::fmt::Write as _;

/// Largest diff or log embedded in a prompt, in bytes.
///
/// The prompt travels as a single argv entry, and Linux caps one argument at
/// 128 KiB.
pub const MAX_EMBEDDED_BYTES: usize = 100_000;

/// Tools the assistant may use while opening a pull request.
pub const PR_TOOLS: &[&str] = &["Bash(git:*)", "Bash(gh pr create:*)"];

/// Tools the assistant may use while tagging and publishing a release.
pub const RELEASE_TOOLS: &[&str] = &[
    "Bash(git add:*)",
    "Bash(git commit:*)",
    "Bash(git tag:*)",
    "Bash(git push:*)",
    "Bash(gh release create:*)",
];

/// Cut `text` to [`MAX_EMBEDDED_BYTES`] on a char boundary.
///
/// Returns the kept text and whether anything was dropped.
pub fn truncate_for_prompt(text: &str) -> (&str, bool) {
    if text.len() <= MAX_EMBEDDED_BYTES {
        return (text, false);
    }
    let mut end = MAX_EMBEDDED_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..end], true)
}

fn fenced(out: &mut String, lang: &str, body: &str) {
    let (kept, truncated) = truncate_for_prompt(body);
    let _ = writeln!(out, "```{lang}");
    out.push_str(kept.trim_end());
    out.push('\n');
    out.push_str("```\n");
    if truncated {
        out.push_str(
            "\n(The input above was truncated. Inspect the rest with git if you need it.)\n",
        );
    }
}

/// Code review of a diff.
pub fn review_prompt(diff: &str, target: &str, focus: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "You are reviewing a change to a git repository ({target}).\n\
         Point out bugs, risky behavior, missing tests and unclear code. \
         Reference files and line numbers from the diff. \
         Group findings by severity and keep praise to one line at most. \
         Do not modify any files."
    );
    if let Some(focus) = focus.map(str::trim).filter(|f| !f.is_empty()) {
        let _ = writeln!(out, "Pay particular attention to: {focus}.");
    }
    out.push('\n');
    fenced(&mut out, "diff", diff);
    out
}

/// Pull request authoring through `gh`.
pub fn pr_prompt(branch: &str, base: &str, draft: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Open a GitHub pull request for branch `{branch}` targeting `{base}`.\n\
         \n\
         1. Inspect the change with `git log {base}..HEAD` and `git diff {base}...HEAD`.\n\
         2. Write a concise title in the imperative mood and a description with a \
            short summary, the motivation and how it was tested.\n\
         3. Push the branch if it has no upstream yet.\n\
         4. Create the pull request with `gh pr create --base {base} --head {branch}{draft}`.\n\
         \n\
         Do not change any files. Print the pull request URL when done.",
        draft = if draft { " --draft" } else { "" },
    );
    out
}

/// Tagging and publishing a release after the changelog was updated.
pub fn release_prompt(tag: &str, notes: &str, changelog_file: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Publish release {tag}. `{changelog_file}` has already been updated.\n\
         \n\
         1. Commit `{changelog_file}` with the message `chore: release {tag}`.\n\
         2. Create an annotated tag `{tag}` and push the commit and the tag.\n\
         3. Create a GitHub release for `{tag}` with `gh release create`, using the \
            notes below as the body.\n\
         \n\
         Stop and report the error if any step fails. Do not touch other files.\n\
         \n\
         Release notes:"
    );
    fenced(&mut out, "markdown", notes);
    out
}

/// Standup summary of a commit log.
pub fn standup_prompt(log: &str, period: &str, author: Option<&str>) -> String {
    let mut out = String::new();
    let who = author.map_or_else(|| "the team".to_string(), |a| format!("`{a}`"));
    let _ = writeln!(
        out,
        "Write a standup update for {who} covering {period}, based on the commits below.\n\
         Use short markdown bullet points grouped under \"Done\" and \"Next\". \
         Merge related commits into one bullet and leave out commit hashes. \
         Infer \"Next\" only from unfinished work visible in the log; \
         write \"Nothing noted\" otherwise. Reply with the bullets only."
    );
    out.push('\n');
    fenced(&mut out, "text", log);
    out
}
