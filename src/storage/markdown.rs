//! Markdown encoding for the board index and task files
//!
//! The index is plain markdown:
//!
//! ```text
//! # Project name
//!
//! Project description
//!
//! ## Todo
//!
//! - [task-id](tasks/task-id.md)
//! ```
//!
//! Description lines that would read back as headings (or that already
//! start with a backslash) are written with a leading `\`, which parsing
//! strips again.
//!
//! Task files carry YAML frontmatter followed by a `# name` heading and the
//! description.

use std::borrow::Cow;

use anyhow::{Context, Result};

use crate::domain::{Column, Index, Task, TaskFrontmatter, TaskId};

/// Parses an index file
pub fn parse_index(content: &str) -> Result<Index> {
    let mut name: Option<String> = None;
    let mut description = Vec::new();
    let mut columns: Vec<Column> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim_end();

        if let Some(heading) = trimmed.strip_prefix("## ") {
            columns.push(Column::new(heading.trim()));
        } else if let Some(heading) = trimmed.strip_prefix("# ") {
            if name.is_some() {
                anyhow::bail!("Unexpected second title at line {}", line_num + 1);
            }
            name = Some(heading.trim().to_string());
        } else if let Some(column) = columns.last_mut() {
            if let Some(id) = parse_task_link(trimmed) {
                let id: TaskId = id
                    .parse()
                    .with_context(|| format!("Invalid task reference at line {}", line_num + 1))?;
                column.tasks.push(id);
            }
        } else if name.is_some() {
            description.push(trimmed.strip_prefix('\\').unwrap_or(trimmed));
        }
    }

    let name = name.ok_or_else(|| anyhow::anyhow!("Index is missing a '# name' title"))?;

    Ok(Index {
        name,
        description: description.join("\n").trim().to_string(),
        columns,
    })
}

/// Extracts the task ID from a `- [id](path)` list item
fn parse_task_link(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("- [")?;
    let end = rest.find(']')?;
    Some(rest[..end].trim())
}

/// Renders an index file
pub fn render_index(index: &Index, tasks_folder: &str) -> String {
    let mut content = format!("# {}\n\n", index.name);

    if !index.description.is_empty() {
        for line in index.description.lines() {
            content.push_str(&escape_description_line(line));
            content.push('\n');
        }
        content.push('\n');
    }

    for column in &index.columns {
        content.push_str(&format!("## {}\n\n", column.name));
        for id in &column.tasks {
            content.push_str(&format!("- [{}]({}/{})\n", id, tasks_folder, id.file_name()));
        }
        if !column.tasks.is_empty() {
            content.push('\n');
        }
    }

    content.truncate(content.trim_end().len());
    content.push('\n');
    content
}

fn escape_description_line(line: &str) -> Cow<'_, str> {
    if line.starts_with('#') || line.starts_with('\\') {
        Cow::Owned(format!("\\{}", line))
    } else {
        Cow::Borrowed(line)
    }
}

/// Parses a task file
pub fn parse_task(id: TaskId, content: &str) -> Result<Task> {
    let content = content.trim();

    let rest = content
        .strip_prefix("---")
        .ok_or_else(|| anyhow::anyhow!("Missing frontmatter (must start with ---)"))?;

    let end_pos = rest
        .find("\n---")
        .ok_or_else(|| anyhow::anyhow!("Missing frontmatter end delimiter (---)"))?;

    let yaml_content = rest[..end_pos].trim();
    let body = rest[end_pos + 4..].trim();

    let frontmatter: TaskFrontmatter =
        serde_yaml::from_str(yaml_content).context("Failed to parse frontmatter")?;

    let (name, description) = match body.strip_prefix("# ") {
        Some(rest) => match rest.split_once('\n') {
            Some((name, description)) => (name.trim().to_string(), description.trim().to_string()),
            None => (rest.trim().to_string(), String::new()),
        },
        None => (id.to_string(), body.to_string()),
    };

    Ok(Task::from_parts(id, frontmatter, name, description))
}

/// Renders a task file
pub fn render_task(task: &Task) -> Result<String> {
    let yaml = serde_yaml::to_string(&TaskFrontmatter::from(task))
        .context("Failed to serialize frontmatter")?;

    let mut content = String::new();
    content.push_str("---\n");
    content.push_str(&yaml);
    content.push_str("---\n\n");
    content.push_str(&format!("# {}\n", task.name));

    if !task.description.is_empty() {
        content.push('\n');
        content.push_str(&task.description);
        if !content.ends_with('\n') {
            content.push('\n');
        }
    }

    Ok(content)
}
