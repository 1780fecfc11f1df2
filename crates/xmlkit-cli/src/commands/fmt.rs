/*
 * fmt.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `xmlkit fmt`: re-serialize a document.

use anyhow::Result;
use std::path::Path;
use xmlkit::{Document, WriteOptions};

pub fn execute(file: &Path, indent: Option<usize>, output: Option<&Path>) -> Result<()> {
    let doc = Document::load_file(file)?;
    let options = options(indent);
    match output {
        Some(path) => doc.save_file_with_options(path, &options)?,
        None => println!("{}", doc.to_xml_string_with(&options)?),
    }
    Ok(())
}

fn options(indent: Option<usize>) -> WriteOptions {
    match indent {
        Some(width) => WriteOptions::indented(width),
        None => WriteOptions::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indented_and_compact() {
        let doc = Document::parse("<r>\n   <a/>   <b>x</b></r>").unwrap();
        assert_eq!(
            doc.to_xml_string_with(&options(None)).unwrap(),
            "<r><a/><b>x</b></r>"
        );
        assert_eq!(
            doc.to_xml_string_with(&options(Some(1))).unwrap(),
            "<r>\n <a/>\n <b>x</b>\n</r>"
        );
    }
}
