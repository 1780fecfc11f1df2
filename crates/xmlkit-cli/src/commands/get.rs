/*
 * get.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `xmlkit get`: print a typed value.

use anyhow::Result;
use std::path::PathBuf;
use xmlkit::{Document, ErrorKind};

use super::{ValueType, resolve};

/// Arguments for the get command
#[derive(Debug)]
pub struct GetArgs {
    pub file: PathBuf,
    pub path: String,
    pub attr: Option<String>,
    pub value_type: ValueType,
    pub default: Option<String>,
}

pub fn execute(args: GetArgs) -> Result<()> {
    let doc = Document::load_file(&args.file)?;
    println!("{}", lookup(&doc, &args)?);
    Ok(())
}

/// The canonical text of the requested value.
pub fn lookup(doc: &Document, args: &GetArgs) -> xmlkit::Result<String> {
    let element = resolve(doc, &args.path)?;
    let raw = match &args.attr {
        Some(name) => element.attribute::<String>(doc, name),
        None => element.text::<String>(doc),
    };
    let raw = match (raw, &args.default) {
        (Ok(raw), _) => raw,
        (Err(err), Some(default)) if err.kind() == ErrorKind::Absence => default.clone(),
        (Err(err), _) => return Err(err),
    };
    args.value_type.canonical(&raw)
}
