//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{DeclarationDocument, Field, TypeDescriptor};
use doc_loader::DocumentLoader;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::{ensure_exists, CliError};

/// Document info for JSON output
#[derive(Serialize)]
struct DocumentInfo {
    namespace: String,
    flags: Vec<FieldInfo>,
    ports: Vec<PortInfo>,
}

#[derive(Serialize)]
struct FieldInfo {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    nullable: bool,
}

#[derive(Serialize)]
struct PortInfo {
    name: String,
    direction: &'static str,
    #[serde(rename = "type")]
    ty: String,
}

impl From<&Field> for FieldInfo {
    fn from(field: &Field) -> Self {
        let (ty, nullable) = field.unwrapped();
        Self {
            name: field.name.to_string(),
            ty: describe(ty),
            nullable,
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(file = %args.file.display(), "Loading document info");

    ensure_exists(&args.file)?;
    let document = DocumentLoader::load_from_path(&args.file)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to load document from {}", args.file.display()))?;

    let info = build_document_info(&document);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize document info")?;
        println!("{}", json);
    } else {
        print_document_info(&info);
    }

    Ok(())
}

fn build_document_info(document: &DeclarationDocument) -> DocumentInfo {
    DocumentInfo {
        namespace: document.namespace.to_string(),
        flags: document.flags.iter().map(FieldInfo::from).collect(),
        ports: document
            .ports
            .iter()
            .map(|port| PortInfo {
                name: port.name.to_string(),
                direction: port.direction.as_str(),
                ty: describe(&port.value),
            })
            .collect(),
    }
}

/// One-line summary of a descriptor
fn describe(ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::Literals { literals } => {
            let quoted: Vec<String> = literals.iter().map(|l| format!("\"{l}\"")).collect();
            format!("one of {}", quoted.join(" | "))
        }
        TypeDescriptor::Object { fields } => {
            let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
            format!("object {{ {} }}", names.join(", "))
        }
        TypeDescriptor::Array { elements } => format!("array of {}", describe(elements)),
        TypeDescriptor::Record { values } => format!("record of {}", describe(values)),
        TypeDescriptor::TaggedUnion {
            discriminator,
            variants,
        } => {
            let tags: Vec<&str> = variants.iter().map(|v| v.tag.as_str()).collect();
            format!("tagged union on `{}`: {}", discriminator, tags.join(" | "))
        }
        TypeDescriptor::Nullable { of } => format!("{} or null", describe(of)),
        other => other.kind_name().to_string(),
    }
}

fn print_document_info(info: &DocumentInfo) {
    println!("Namespace: {}", info.namespace);

    println!("\nFlags ({}):", info.flags.len());
    for flag in &info.flags {
        let nullable = if flag.nullable { " | null" } else { "" };
        println!("  - {}: {}{}", flag.name, flag.ty, nullable);
    }

    println!("\nPorts ({}):", info.ports.len());
    for port in &info.ports {
        println!("  - {} [{}]: {}", port.name, port.direction, port.ty);
    }
}
