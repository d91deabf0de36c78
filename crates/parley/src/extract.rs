// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley extract`: run the vetting extractor over one message.

use std::io::Read;
use std::path::Path;

use parley_core::{ParleyError, QaExtraction};
use parley_vetting::{QaExtractor, dedupe_extraction, extract_addendum};
use serde::Serialize;

/// What the extractor recovered from one message.
#[derive(Debug, Serialize, PartialEq)]
pub struct ExtractReport {
    pub extraction: Option<QaExtraction>,
    pub addendum: Option<String>,
}

pub fn extract_report(text: &str, hint: Option<&str>, extractor: &QaExtractor) -> ExtractReport {
    ExtractReport {
        extraction: extractor.extract(text, hint).map(dedupe_extraction),
        addendum: extract_addendum(text).map(str::to_string),
    }
}

/// Read `path` (or stdin) and print the report as JSON.
pub fn run_extract(
    path: Option<&Path>,
    hint: Option<&str>,
    extractor: &QaExtractor,
) -> Result<(), ParleyError> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let report = extract_report(&text, hint, extractor);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{Counterparty, QaItem};

    #[test]
    fn report_includes_addendum_and_deduplicated_items() {
        let text = "Here are 2 vetting answers from the matched counterparty:\n\
            1. Pets?\nNo\n2. pets?\nOne cat\n\n\
            the counterparty has answered your question: yes, indoor only";
        let report = extract_report(text, Some("tenant"), &QaExtractor::new());

        let extraction = report.extraction.unwrap();
        assert_eq!(extraction.counterparty, Counterparty::Tenant);
        assert_eq!(extraction.items, vec![QaItem::new("Pets?", "One cat")]);
        assert_eq!(
            report.addendum.as_deref(),
            Some("the counterparty has answered your question: yes, indoor only")
        );
    }

    #[test]
    fn plain_text_reports_nothing() {
        let report = extract_report("see you at noon", None, &QaExtractor::new());
        assert_eq!(
            report,
            ExtractReport {
                extraction: None,
                addendum: None
            }
        );
    }

    #[test]
    fn reads_message_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("message.txt");
        std::fs::write(&path, "**1. Q?**\nA").unwrap();
        run_extract(Some(&path), None, &QaExtractor::new()).expect("file should be read");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = run_extract(
            Some(Path::new("/nonexistent/parley/message.txt")),
            None,
            &QaExtractor::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ParleyError::Io(_)));
    }
}
