//! Reading command input from files or stdin.

use std::fs;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::core::error::{AppError, Result};

fn too_large(source: &str, size: u64, limit: u64) -> AppError {
    AppError::InvalidInput(format!(
        "{source} is {size} bytes, larger than the {limit} byte limit"
    ))
}

/// Reads one file, enforcing the size limit before loading it.
pub fn read_file(path: &Path, max_bytes: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| {
        AppError::InvalidInput(format!("Error reading file '{}': {e}", path.display()))
    })?;
    if !metadata.is_file() {
        return Err(AppError::InvalidInput(format!(
            "Not a file: {}",
            path.display()
        )));
    }
    if metadata.len() > max_bytes {
        return Err(too_large(&path.display().to_string(), metadata.len(), max_bytes));
    }

    fs::read_to_string(path).map_err(|e| {
        AppError::InvalidInput(format!("Error reading file '{}': {e}", path.display()))
    })
}

/// Reads at most `max_bytes`; one byte more means the input is too large.
async fn read_limited<R: AsyncRead + Unpin>(reader: R, max_bytes: u64) -> Result<String> {
    let mut buf = Vec::new();
    reader.take(max_bytes.saturating_add(1)).read_to_end(&mut buf).await?;
    if buf.len() as u64 > max_bytes {
        return Err(AppError::InvalidInput(format!(
            "stdin is larger than the {max_bytes} byte limit"
        )));
    }
    String::from_utf8(buf)
        .map_err(|e| AppError::InvalidInput(format!("stdin is not valid UTF-8: {e}")))
}

/// Contents of `file`, or all of stdin when no file is given.
pub async fn read_input(file: Option<&Path>, max_bytes: u64) -> Result<String> {
    let content = match file {
        Some(path) => read_file(path, max_bytes)?,
        None => {
            tracing::debug!("Reading input from stdin");
            read_limited(tokio::io::stdin(), max_bytes).await?
        }
    };

    if content.trim().is_empty() {
        return Err(AppError::InvalidInput("No input provided".to_string()));
    }
    Ok(content)
}

/// Joins several files, each under a `--- <path> ---` header.
pub fn read_context_files(paths: &[impl AsRef<Path>], max_files: usize, max_bytes: u64) -> Result<String> {
    if paths.len() > max_files {
        return Err(AppError::InvalidInput(format!(
            "Too many context files: {} given, at most {max_files} allowed",
            paths.len()
        )));
    }

    let mut combined = Vec::with_capacity(paths.len() * 3);
    for path in paths {
        let path = path.as_ref();
        let content = read_file(path, max_bytes)?;
        if content.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "File is empty: {}",
                path.display()
            )));
        }
        combined.push(format!("--- {} ---", path.display()));
        combined.push(content);
        combined.push(String::new());
    }
    Ok(combined.join("\n"))
}

/// Language name for a source file, judged by its name or extension.
#[must_use]
pub fn detect_language(path: &Path) -> Option<&'static str> {
    let file_name = path.file_name()?.to_str()?.to_lowercase();
    match file_name.as_str() {
        "dockerfile" => return Some("dockerfile"),
        "makefile" => return Some("makefile"),
        "rakefile" => return Some("rakefile"),
        _ => {}
    }

    let extension = path.extension()?.to_str()?.to_lowercase();
    let language = match extension.as_str() {
        "py" => "python",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "java" => "java",
        "cpp" | "hpp" => "cpp",
        "c" | "h" => "c",
        "cs" => "csharp",
        "php" => "php",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        "swift" => "swift",
        "kt" => "kotlin",
        "scala" => "scala",
        "sh" | "bash" | "zsh" => "bash",
        "fish" => "fish",
        "ps1" => "powershell",
        "r" => "r",
        "sql" => "sql",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "less" => "less",
        "xml" => "xml",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "ini" | "cfg" | "conf" => "ini",
        "md" | "markdown" => "markdown",
        "tex" => "latex",
        "dockerfile" => "dockerfile",
        _ => return None,
    };
    Some(language)
}
