use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Listing URLs from a text file, one per line
pub fn load_urls(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list from {}", path.display()))?;
    Ok(parse_url_list(&contents))
}

/// Blank lines and `#` comments are skipped
pub fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines_and_comments() {
        let contents = "# assignment listings\nhttps://www.airbnb.co.uk/rooms/14531512?s=51\n\n  https://www.airbnb.co.uk/rooms/19278160?s=51  \r\n";

        assert_eq!(
            parse_url_list(contents),
            vec![
                "https://www.airbnb.co.uk/rooms/14531512?s=51",
                "https://www.airbnb.co.uk/rooms/19278160?s=51",
            ]
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_urls(Path::new("does/not/exist.txt")).unwrap_err();

        assert!(err.to_string().contains("does/not/exist.txt"));
    }
}
