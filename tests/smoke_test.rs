mod common;

use common::write_file;
use dokkit::writer::SECTION_SEPARATOR;
use dokkit::{Config, FileSummary, Summarizer, run_dokkit};
use std::path::Path;
use tempfile::tempdir;
use tokio::fs;

/// Summarizes `root` into `root/.instructions/summary.md` and returns the document text.
async fn summarize(root: &Path) -> anyhow::Result<String> {
    let output_path = root.join(".instructions/summary.md");
    Summarizer::new(root, &output_path)?.write().await?;
    Ok(fs::read_to_string(&output_path).await?)
}

#[tokio::test]
async fn it_summarizes_the_example_project() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, "a.txt", "hello");
    write_file(root, ".secret", "token");
    write_file(root, ".gitignore", "b.txt");
    write_file(root, "b.txt", "world");

    let contents = summarize(root).await?;

    assert_eq!(contents, "## File: a.txt\n\n```\nhello\n```\n\n");
    Ok(())
}

#[tokio::test]
async fn it_emits_one_section_per_file_in_listing_order() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, "one.txt", "first file\n");
    write_file(root, "two.txt", "second\n\nfile");
    write_file(root, "three.txt", "");

    let expected: Vec<String> = std::fs::read_dir(root)?
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_file())
        .map(|path| {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            let content = std::fs::read_to_string(&path).unwrap();
            FileSummary::new(name, content).render()
        })
        .collect();

    let contents = summarize(root).await?;

    assert_eq!(expected.len(), 3);
    assert_eq!(contents, expected.join(SECTION_SEPARATOR));
    Ok(())
}

#[tokio::test]
async fn it_keeps_builtin_ignores_over_gitignore() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, "yarn.lock", "lockfile");
    write_file(root, "web/node_modules/left-pad/index.js", "module.exports = 1");
    write_file(root, "web/app.js", "console.log('app')");
    write_file(root, ".gitignore", "# nothing relevant\n*.tmp\n");

    let contents = summarize(root).await?;

    assert!(contents.contains("## File: app.js"));
    assert!(!contents.contains("yarn.lock"));
    assert!(!contents.contains("index.js"));
    Ok(())
}

#[tokio::test]
async fn it_readmits_negated_paths() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, ".gitignore", "*.txt\n!keep.txt\n");
    write_file(root, "drop.txt", "dropped");
    write_file(root, "keep.txt", "kept");

    let contents = summarize(root).await?;

    assert!(contents.contains("## File: keep.txt"));
    assert!(contents.contains("kept"));
    assert!(!contents.contains("drop.txt"));
    Ok(())
}

#[tokio::test]
async fn it_anchors_gitignore_to_the_root() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, ".gitignore", "/generated\nsrc/legacy.rs\n");
    write_file(root, "generated/api.rs", "// top-level generated");
    write_file(root, "src/generated/keep.rs", "// nested generated");
    write_file(root, "src/legacy.rs", "// legacy");
    write_file(root, "src/generated/.gitignore", "keep.rs\n");

    let contents = summarize(root).await?;

    assert!(!contents.contains("api.rs"));
    assert!(!contents.contains("legacy.rs"));
    // A nested ignore file naming its sibling is not read.
    assert!(contents.contains("## File: keep.rs"));
    assert!(contents.contains("// nested generated"));
    Ok(())
}

#[tokio::test]
async fn it_does_not_walk_its_own_output() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, "src/main.rs", "fn main() {}");
    write_file(root, "pkg/.instructions/summary.md", "stale nested summary");

    let first = summarize(root).await?;
    let second = summarize(root).await?;

    assert_eq!(first, second);
    assert!(first.contains("## File: main.rs"));
    assert!(!first.contains("summary.md"));
    assert!(!first.contains("stale nested summary"));
    Ok(())
}

#[tokio::test]
async fn it_writes_nothing_when_a_file_is_unreadable() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, "ok.txt", "fine");
    std::fs::write(root.join("image.png"), [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0xFF])?;

    let output_path = root.join(".instructions/summary.md");
    let result = Summarizer::new(root, &output_path)?.write().await;

    assert!(result.is_err());
    assert!(!output_path.exists());
    Ok(())
}

#[tokio::test]
async fn it_handles_files_with_backticks() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, "README.md", "# Example\n\n```rust\nfn main() {}\n```");

    let contents = summarize(root).await?;

    assert!(contents.starts_with("## File: README.md\n\n````\n# Example"));
    assert!(contents.ends_with("```\n````\n\n"));
    Ok(())
}

#[tokio::test]
async fn it_uses_output_dir_from_config_file() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, ".dokkit.config.json", r#"{ "outputDir": "docs/ai" }"#);
    write_file(root, "lib.rs", "pub fn lib() {}");

    run_dokkit(Config::new(root)).await?;
    run_dokkit(Config::new(root)).await?;

    let contents = fs::read_to_string(root.join("docs/ai/summary.md")).await?;
    assert_eq!(contents, "## File: lib.rs\n\n```\npub fn lib() {}\n```\n\n");
    assert!(!root.join(".instructions").exists());
    Ok(())
}

#[tokio::test]
async fn it_prefers_explicit_output_dir_over_config() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, ".dokkit.config.json", r#"{ "outputDir": "from-config" }"#);
    write_file(root, "a.txt", "a");

    let mut config = Config::new(root);
    config.output_dir = Some("from-cli".into());
    run_dokkit(config).await?;

    assert!(root.join("from-cli/summary.md").exists());
    assert!(!root.join("from-config").exists());
    Ok(())
}

#[tokio::test]
async fn it_survives_a_malformed_config_file() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(root, ".dokkit.config.json", "{ not json");
    write_file(root, "a.txt", "a");

    run_dokkit(Config::new(root)).await?;

    assert!(root.join(".instructions/summary.md").exists());
    Ok(())
}
