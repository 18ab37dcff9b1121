use std::path::Path;

use thiserror::Error;

use super::common::MigrationTask;

#[derive(Debug, Error)]
pub enum WorkListError {
    #[error("could not read work list `{path}`")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected `source_url, destination_name`, got `{content}`")]
    Malformed { line: usize, content: String },
}

/// Reads a work list from disk. Any malformed line rejects the whole file.
pub fn read_work_list(path: &Path, owner: &str) -> Result<Vec<MigrationTask>, WorkListError> {
    let content = std::fs::read_to_string(path).map_err(|source| WorkListError::Read {
        path: path.display().to_string(),
        source,
    })?;

    parse_work_list(&content, owner)
}

pub fn parse_work_list(content: &str, owner: &str) -> Result<Vec<MigrationTask>, WorkListError> {
    let mut tasks = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let task = parse_line(line, owner).ok_or_else(|| WorkListError::Malformed {
            line: index + 1,
            content: line.to_string(),
        })?;
        tasks.push(task);
    }

    Ok(tasks)
}

fn parse_line(line: &str, owner: &str) -> Option<MigrationTask> {
    let mut parts = line.split(',').map(str::trim);

    let source_url = parts.next().filter(|s| !s.is_empty())?;
    let destination_name = parts.next().filter(|s| !s.is_empty())?;
    if parts.next().is_some() {
        return None;
    }

    Some(MigrationTask::new(source_url, owner, destination_name))
}
