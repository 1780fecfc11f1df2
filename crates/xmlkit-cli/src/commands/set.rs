/*
 * set.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `xmlkit set`: store a value and save the document.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use xmlkit::Document;

use super::{ValueType, resolve};

/// Arguments for the set command
#[derive(Debug)]
pub struct SetArgs {
    pub file: PathBuf,
    pub path: String,
    pub value: String,
    pub attr: Option<String>,
    pub value_type: ValueType,
    pub output: Option<PathBuf>,
}

pub fn execute(args: SetArgs) -> Result<()> {
    let mut doc = Document::load_file(&args.file)?;
    apply(&mut doc, &args)?;
    let target = args.output.as_ref().unwrap_or(&args.file);
    doc.save_file(target)
        .with_context(|| format!("saving {}", target.display()))?;
    info!(file = %target.display(), path = %args.path, "value written");
    Ok(())
}

pub fn apply(doc: &mut Document, args: &SetArgs) -> xmlkit::Result<()> {
    let element = resolve(doc, &args.path)?;
    let value = args.value_type.canonical(&args.value)?;
    match &args.attr {
        Some(name) => element.set_attribute(doc, name, value),
        None => element.set_text(doc, value).map(|_| ()),
    }
}
