// src/input.rs
// =============================================================================
// This module loads the URL list, either from a file or from stdin.
//
// The format is deliberately dumb: one URL per line, surrounding whitespace
// trimmed, blank lines skipped. No URL validation happens here - a garbage
// line simply becomes a check result with an "invalid url" error.
// =============================================================================

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Loads URLs from `path`, or from stdin when no path is given.
pub fn load_urls(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_urls(BufReader::new(file))
        }
        None => read_urls(io::stdin().lock()),
    }
}

fn read_urls<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line.context("reading url list")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        urls.push(trimmed.to_string());
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    #[test]
    fn skips_blank_lines_and_trims() {
        let input = "https://a.example\n\n  https://b.example  \n\t\n";
        let urls = read_urls(Cursor::new(input)).unwrap();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn empty_input_yields_empty_list() {
        let urls = read_urls(Cursor::new("")).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn loads_from_a_file() {
        let dir = std::env::temp_dir().join(format!("url-warden-input-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("urls.txt");
        fs::write(&path, "https://a.example\n\nhttps://b.example\n").unwrap();

        let urls = load_urls(Some(&path)).unwrap();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_urls(Some(Path::new("/definitely/not/here.txt"))).unwrap_err();
        assert!(err.to_string().contains("opening"), "{err}");
    }
}
