//! Declaration file renderer
//!
//! Output is a pure function of the input: object fields, flags, ports and
//! namespaces are emitted sorted by name, so two equal documents always
//! render byte-identical text regardless of who produced them.

use std::collections::BTreeMap;

use contracts::{
    DeclarationBatch, DeclarationDocument, Field, PortDecl, PortDirection, RenderOptions,
    TypeDescriptor, ValidationErrors,
};
use tracing::debug;

use crate::validate::{validate, validate_batch};

const INDENT: &str = "  ";

/// Render one document with default options
///
/// # Errors
/// Every schema violation of an invalid document.
pub fn render(document: &DeclarationDocument) -> Result<String, ValidationErrors> {
    render_with(document, &RenderOptions::default())
}

/// Render one document
pub fn render_with(
    document: &DeclarationDocument,
    options: &RenderOptions,
) -> Result<String, ValidationErrors> {
    validate(document)?;
    Ok(render_tree(NamespaceTree::build([document]), options))
}

/// Render every document of a batch into one file
///
/// Documents sharing a namespace prefix are nested under the same
/// namespace blocks.
pub fn render_batch(
    batch: &DeclarationBatch,
    options: &RenderOptions,
) -> Result<String, ValidationErrors> {
    validate_batch(batch)?;
    Ok(render_tree(NamespaceTree::build(batch), options))
}

fn render_tree(tree: NamespaceTree<'_>, options: &RenderOptions) -> String {
    let mut out = String::new();

    if !options.header.is_empty() {
        out.push_str(&options.header);
        out.push_str("\n\n");
    }

    let body: Vec<String> = tree
        .children
        .iter()
        .map(|(name, node)| render_namespace(name, node, options))
        .collect();
    out.push_str(&block(
        &format!("declare module {}", options.module_name),
        &body.join("\n\n"),
    ));
    out.push('\n');

    debug!(
        module = %options.module_name,
        bytes = out.len(),
        "rendered declaration file"
    );

    out
}

/// Namespaces keyed by segment; a node owns at most one document once the
/// batch has been validated
#[derive(Debug, Default)]
struct NamespaceTree<'a> {
    document: Option<&'a DeclarationDocument>,
    children: BTreeMap<&'a str, NamespaceTree<'a>>,
}

impl<'a> NamespaceTree<'a> {
    fn build(documents: impl IntoIterator<Item = &'a DeclarationDocument>) -> Self {
        let mut root = Self::default();
        for document in documents {
            let mut here = &mut root;
            for segment in document.namespace.segments() {
                here = here.children.entry(segment.as_str()).or_default();
            }
            here.document = Some(document);
        }
        root
    }
}

fn render_namespace(name: &str, node: &NamespaceTree<'_>, options: &RenderOptions) -> String {
    let mut sections = Vec::new();

    if let Some(document) = node.document {
        sections.push(render_flags(&document.flags));
        sections.push(render_ports(&document.ports));
        sections.push(render_init(options));
    }

    for (child_name, child) in &node.children {
        sections.push(render_namespace(child_name, child, options));
    }

    block(&format!("namespace {name}"), &sections.join("\n\n"))
}

fn render_flags(flags: &[Field]) -> String {
    format!("type Flags = {};", render_fields(flags.iter().map(FieldLine::from)))
}

fn render_ports(ports: &[PortDecl]) -> String {
    let mut sorted: Vec<&PortDecl> = ports.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    if sorted.is_empty() {
        return "type Ports = Record<string, never>;".to_string();
    }

    let entries: Vec<String> = sorted
        .into_iter()
        .map(|port| {
            let value = render_type(&port.value);
            let signature = match port.direction {
                PortDirection::Send => format!("send: (value: {value}) => void;"),
                PortDirection::Subscribe => {
                    format!("subscribe: (callback: (value: {value}) => void) => void;")
                }
            };
            format!("{}: {};", port.name, block("", &signature))
        })
        .collect();

    format!("type Ports = {};", block("", &entries.join("\n")))
}

fn render_init(options: &RenderOptions) -> String {
    format!(
        "function init(config: {{ flags: Flags; node: {} }}): {{\n{INDENT}ports: Ports;\n}};",
        options.node_type
    )
}

/// One `name: type;` line inside an object literal type
struct FieldLine<'a> {
    name: &'a str,
    source: String,
}

impl<'a> From<&'a Field> for FieldLine<'a> {
    fn from(field: &'a Field) -> Self {
        let (ty, nullable) = field.unwrapped();
        let mut source = render_type(ty);
        if nullable {
            source.push_str(" | null");
        }
        Self {
            name: field.name.as_str(),
            source,
        }
    }
}

/// Object literal type with fields sorted by name
fn render_fields<'a>(fields: impl Iterator<Item = FieldLine<'a>>) -> String {
    let mut lines: Vec<FieldLine<'a>> = fields.collect();
    if lines.is_empty() {
        return "Record<string, never>".to_string();
    }
    lines.sort_by(|a, b| a.name.cmp(b.name));

    let body: Vec<String> = lines
        .into_iter()
        .map(|line| format!("{}: {};", line.name, line.source))
        .collect();
    block("", &body.join("\n"))
}

fn render_type(ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::String => "string".to_string(),
        TypeDescriptor::Number => "number".to_string(),
        TypeDescriptor::Boolean => "boolean".to_string(),
        TypeDescriptor::Null => "null".to_string(),
        TypeDescriptor::Empty => "Record<string, never>".to_string(),

        TypeDescriptor::Literals { literals } => literals
            .iter()
            .map(|l| quote(l))
            .collect::<Vec<_>>()
            .join(" | "),

        TypeDescriptor::Object { fields } => render_fields(fields.iter().map(FieldLine::from)),

        TypeDescriptor::Array { elements } => {
            let inner = render_type(elements);
            if is_union(elements) {
                format!("({inner})[]")
            } else {
                format!("{inner}[]")
            }
        }

        TypeDescriptor::Record { values } => format!("Record<string, {}>", render_type(values)),

        TypeDescriptor::Nullable { of } => format!("{} | null", render_type(of)),

        TypeDescriptor::TaggedUnion {
            discriminator,
            variants,
        } => {
            let mut sorted: Vec<_> = variants.iter().collect();
            sorted.sort_by(|a, b| a.tag.cmp(&b.tag));

            sorted
                .into_iter()
                .map(|variant| {
                    let tag_line = FieldLine {
                        name: discriminator.as_str(),
                        source: quote(&variant.tag),
                    };
                    render_fields(
                        std::iter::once(tag_line).chain(variant.fields.iter().map(FieldLine::from)),
                    )
                })
                .collect::<Vec<_>>()
                .join(" | ")
        }
    }
}

/// Whether the rendered form has a top-level `|`
fn is_union(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Literals { literals } => literals.len() > 1,
        TypeDescriptor::TaggedUnion { variants, .. } => variants.len() > 1,
        TypeDescriptor::Nullable { .. } => true,
        _ => false,
    }
}

/// Double-quoted string literal
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `head {` + indented body + `}`; an empty head yields a bare `{ ... }`
fn block(head: &str, body: &str) -> String {
    let open = if head.is_empty() {
        "{".to_string()
    } else {
        format!("{head} {{")
    };

    if body.is_empty() {
        format!("{open}\n}}")
    } else {
        format!("{open}\n{}\n}}", indent(body))
    }
}

/// Indent every non-empty line by one level
fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
