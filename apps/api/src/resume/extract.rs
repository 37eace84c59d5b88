//! Resume text extraction.
//!
//! Only PDF is supported; unsupported formats are rejected at upload time
//! rather than failing later inside analysis.

/// Returns true when the file name carries a supported extension.
pub fn is_supported(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Extracts and cleans text from a PDF byte buffer.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| format!("Failed to extract text from resume: {e}"))?;
    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err("Resume contains no extractable text".to_string());
    }
    Ok(text)
}

/// Collapses newlines and runs of whitespace into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extension_supported() {
        assert!(is_supported("resume.pdf"));
        assert!(is_supported("Resume.PDF"));
    }

    #[test]
    fn test_other_extensions_rejected() {
        assert!(!is_supported("resume.docx"));
        assert!(!is_supported("resume.txt"));
        assert!(!is_supported("resume"));
    }

    #[test]
    fn test_whitespace_collapsed() {
        let input = "John  Doe\n\nSoftware   Engineer\t5 years";
        assert_eq!(normalize_whitespace(input), "John Doe Software Engineer 5 years");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(normalize_whitespace("  hello  "), "hello");
        assert_eq!(normalize_whitespace("\n\t "), "");
    }

    #[test]
    fn test_garbage_bytes_fail_extraction() {
        assert!(extract_pdf_text(b"definitely not a pdf").is_err());
    }
}
