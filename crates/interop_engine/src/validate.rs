//! Declaration document validation
//!
//! Rules:
//! - namespace path non-empty, every segment a valid identifier
//! - flag names unique, port names unique
//! - a port name never carries both directions
//! - object / variant field names unique, never the union discriminator
//! - literal values unique, tag values unique and non-empty
//! - literal and tagged unions non-empty
//! - null accepted at most once per node
//!
//! Every rule runs on every node; the result carries all violations found,
//! each distinct (path, reason) pair once.

use std::collections::{HashMap, HashSet};

use contracts::{
    DeclarationBatch, DeclarationDocument, DocPath, Field, Ident, PortDecl, SchemaViolation,
    TypeDescriptor, ValidationErrors, ValidationResult, ViolationReason,
};
use tracing::debug;

/// Validate one document
///
/// Returns every violation found, in document order.
pub fn validate(document: &DeclarationDocument) -> ValidationResult {
    let violations = collect_violations(document);

    debug!(
        namespace = %document.namespace,
        violations = violations.len(),
        "validated declaration document"
    );

    finish(violations)
}

/// Validate every document of a batch plus namespace uniqueness across it
///
/// Violation paths are prefixed with the owning document's namespace.
pub fn validate_batch(batch: &DeclarationBatch) -> ValidationResult {
    let mut violations = Vec::new();

    for document in batch {
        violations.extend(collect_violations(document).into_iter().map(|v| {
            SchemaViolation::new(v.path.under(&document.namespace), v.reason)
        }));
    }

    let mut counts: HashMap<&contracts::NamespacePath, usize> = HashMap::new();
    for document in batch {
        let count = counts.entry(&document.namespace).or_default();
        *count += 1;
        // Reported once, on the first repeat
        if *count == 2 {
            violations.push(SchemaViolation::new(
                DocPath::root().under(&document.namespace),
                ViolationReason::DuplicateNamespace {
                    namespace: document.namespace.to_string(),
                },
            ));
        }
    }

    debug!(
        documents = batch.len(),
        violations = violations.len(),
        "validated declaration batch"
    );

    finish(violations)
}

fn finish(mut violations: Vec<SchemaViolation>) -> ValidationResult {
    // Same-named declarations share a path, so their checks can repeat
    let mut seen = HashSet::new();
    violations.retain(|v| seen.insert(v.clone()));

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(violations))
    }
}

fn collect_violations(document: &DeclarationDocument) -> Vec<SchemaViolation> {
    let mut out = Vec::new();
    let root = DocPath::root();

    check_namespace(document, &root, &mut out);
    check_flags(&document.flags, &root.child("flags"), &mut out);
    check_ports(&document.ports, &root.child("ports"), &mut out);

    out
}

fn check_namespace(document: &DeclarationDocument, root: &DocPath, out: &mut Vec<SchemaViolation>) {
    let path = root.child("namespace");

    if document.namespace.is_empty() {
        out.push(SchemaViolation::new(path, ViolationReason::EmptyNamespace));
        return;
    }

    for segment in document.namespace.segments() {
        if !segment.is_valid() {
            out.push(SchemaViolation::new(
                path.clone(),
                ViolationReason::InvalidIdentifier {
                    name: segment.to_string(),
                },
            ));
        }
    }
}

/// Group items by name, preserving first-appearance order
fn group_by_name<'a, T>(items: &'a [T], name: impl Fn(&T) -> &Ident) -> Vec<(&'a Ident, Vec<&'a T>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&'a Ident, Vec<&'a T>)> = Vec::new();

    for item in items {
        let key = name(item);
        match index.get(key.as_str()) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(key.as_str(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }

    groups
}

fn check_identifier(name: &Ident, path: &DocPath, out: &mut Vec<SchemaViolation>) {
    if !name.is_valid() {
        out.push(SchemaViolation::new(
            path.clone(),
            ViolationReason::InvalidIdentifier {
                name: name.to_string(),
            },
        ));
    }
}

fn check_flags(flags: &[Field], path: &DocPath, out: &mut Vec<SchemaViolation>) {
    for (name, group) in group_by_name(flags, |f| &f.name) {
        let flag_path = path.child(name.clone());
        check_identifier(name, &flag_path, out);

        if group.len() > 1 {
            out.push(SchemaViolation::new(
                flag_path.clone(),
                ViolationReason::DuplicateFlag {
                    name: name.to_string(),
                },
            ));
        }

        for flag in group {
            check_type(&flag.ty, &flag_path, out);
        }
    }
}

fn check_ports(ports: &[PortDecl], path: &DocPath, out: &mut Vec<SchemaViolation>) {
    for (name, group) in group_by_name(ports, |p| &p.name) {
        let port_path = path.child(name.clone());
        check_identifier(name, &port_path, out);

        if group.len() > 1 {
            let first = group[0].direction;
            let reason = if group.iter().any(|p| p.direction != first) {
                ViolationReason::ConflictingPortDirection {
                    name: name.to_string(),
                }
            } else {
                ViolationReason::DuplicatePort {
                    name: name.to_string(),
                }
            };
            out.push(SchemaViolation::new(port_path.clone(), reason));
        }

        let value_path = port_path.child("value");
        for port in group {
            check_type(&port.value, &value_path, out);
        }
    }
}

/// Object or variant fields; `discriminator` is set for variant fields
fn check_fields(
    fields: &[Field],
    path: &DocPath,
    discriminator: Option<&Ident>,
    out: &mut Vec<SchemaViolation>,
) {
    for (name, group) in group_by_name(fields, |f| &f.name) {
        let field_path = path.child(name.clone());
        check_identifier(name, &field_path, out);

        if discriminator.is_some_and(|d| d == name) {
            out.push(SchemaViolation::new(
                field_path.clone(),
                ViolationReason::DiscriminatorCollision {
                    name: name.to_string(),
                },
            ));
        }

        if group.len() > 1 {
            out.push(SchemaViolation::new(
                field_path.clone(),
                ViolationReason::DuplicateField {
                    name: name.to_string(),
                },
            ));
        }

        for field in group {
            if field.nullable && matches!(field.ty, TypeDescriptor::Nullable { .. }) {
                out.push(SchemaViolation::new(
                    field_path.clone(),
                    ViolationReason::RedundantNullable,
                ));
            }
            check_type(&field.ty, &field_path, out);
        }
    }
}

fn check_type(ty: &TypeDescriptor, path: &DocPath, out: &mut Vec<SchemaViolation>) {
    match ty {
        TypeDescriptor::String
        | TypeDescriptor::Number
        | TypeDescriptor::Boolean
        | TypeDescriptor::Null
        | TypeDescriptor::Empty => {}

        TypeDescriptor::Literals { literals } => {
            if literals.is_empty() {
                out.push(SchemaViolation::new(
                    path.clone(),
                    ViolationReason::EmptyLiteralUnion,
                ));
            }

            let mut seen: HashMap<&str, usize> = HashMap::new();
            for literal in literals {
                let count = seen.entry(literal.as_str()).or_default();
                *count += 1;
                if *count == 2 {
                    out.push(SchemaViolation::new(
                        path.clone(),
                        ViolationReason::DuplicateLiteral {
                            value: literal.clone(),
                        },
                    ));
                }
            }
        }

        TypeDescriptor::Object { fields } => check_fields(fields, path, None, out),

        TypeDescriptor::Array { elements } => check_type(elements, &path.elements(), out),

        TypeDescriptor::Record { values } => check_type(values, &path.values(), out),

        TypeDescriptor::Nullable { of } => {
            if matches!(**of, TypeDescriptor::Nullable { .. }) {
                out.push(SchemaViolation::new(
                    path.clone(),
                    ViolationReason::RedundantNullable,
                ));
            }
            check_type(of, path, out);
        }

        TypeDescriptor::TaggedUnion {
            discriminator,
            variants,
        } => {
            check_identifier(discriminator, path, out);

            if variants.is_empty() {
                out.push(SchemaViolation::new(
                    path.clone(),
                    ViolationReason::EmptyTaggedUnion,
                ));
            }

            let mut seen: HashMap<&str, usize> = HashMap::new();
            for (i, variant) in variants.iter().enumerate() {
                // Untagged variants are addressed by position
                let variant_path = if variant.tag.is_empty() {
                    out.push(SchemaViolation::new(path.clone(), ViolationReason::EmptyTag));
                    path.index(i)
                } else {
                    let count = seen.entry(variant.tag.as_str()).or_default();
                    *count += 1;
                    if *count == 2 {
                        out.push(SchemaViolation::new(
                            path.clone(),
                            ViolationReason::DuplicateTag {
                                tag: variant.tag.clone(),
                            },
                        ));
                    }
                    path.child(variant.tag.as_str())
                };

                check_fields(&variant.fields, &variant_path, Some(discriminator), out);
            }
        }
    }
}
