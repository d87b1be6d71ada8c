//! Structural comparison of two declaration documents
//!
//! Walks the expected document pre-order with an explicit work stack, so
//! discrepancies are produced one at a time as the caller pulls them. Within
//! each container the expected children come first (in declared order),
//! followed by children only the actual document has (in their order).

use std::collections::HashSet;
use std::mem;

use contracts::{
    DeclarationDocument, Discrepancy, DiscrepancyKind, DocPath, Field, PortDecl, TypeDescriptor,
};

/// Compare `expected` against `actual`
///
/// The returned value is cheap to copy and can be iterated any number of
/// times; every iteration yields the same sequence.
pub fn diff<'a>(expected: &'a DeclarationDocument, actual: &'a DeclarationDocument) -> Diff<'a> {
    Diff { expected, actual }
}

/// Pending comparison between two documents
#[derive(Debug, Clone, Copy)]
pub struct Diff<'a> {
    expected: &'a DeclarationDocument,
    actual: &'a DeclarationDocument,
}

impl<'a> Diff<'a> {
    /// Fresh iterator from the start of the traversal
    pub fn iter(&self) -> DiffIter<'a> {
        DiffIter {
            stack: vec![Task::Document {
                expected: self.expected,
                actual: self.actual,
            }],
        }
    }

    /// True when the documents are structurally equal
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for Diff<'a> {
    type Item = Discrepancy;
    type IntoIter = DiffIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Diff<'a> {
    type Item = Discrepancy;
    type IntoIter = DiffIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// What a field list belongs to; decides the missing/extra kinds reported
#[derive(Debug, Clone, Copy)]
enum FieldRole {
    Flag,
    Member,
}

impl FieldRole {
    fn missing(self, field: &Field) -> DiscrepancyKind {
        match self {
            Self::Flag => DiscrepancyKind::MissingFlag(field.name.clone()),
            Self::Member => DiscrepancyKind::MissingField(field.name.clone()),
        }
    }

    fn extra(self, field: &Field) -> DiscrepancyKind {
        match self {
            Self::Flag => DiscrepancyKind::ExtraFlag(field.name.clone()),
            Self::Member => DiscrepancyKind::ExtraField(field.name.clone()),
        }
    }
}

#[derive(Debug, Clone)]
enum Task<'a> {
    Emit(Discrepancy),
    Document {
        expected: &'a DeclarationDocument,
        actual: &'a DeclarationDocument,
    },
    Fields {
        path: DocPath,
        role: FieldRole,
        expected: &'a [Field],
        actual: &'a [Field],
    },
    Ports {
        path: DocPath,
        expected: &'a [PortDecl],
        actual: &'a [PortDecl],
    },
    Type {
        path: DocPath,
        expected: &'a TypeDescriptor,
        actual: &'a TypeDescriptor,
    },
}

/// Lazy discrepancy iterator, see [`diff`]
#[derive(Debug, Clone)]
pub struct DiffIter<'a> {
    stack: Vec<Task<'a>>,
}

impl Iterator for DiffIter<'_> {
    type Item = Discrepancy;

    fn next(&mut self) -> Option<Discrepancy> {
        while let Some(task) = self.stack.pop() {
            if let Task::Emit(discrepancy) = task {
                return Some(discrepancy);
            }
            let mut children = expand(task);
            // Stack is LIFO: push in reverse so the first child runs next
            children.reverse();
            self.stack.append(&mut children);
        }
        None
    }
}

fn emit(path: DocPath, kind: DiscrepancyKind) -> Task<'static> {
    Task::Emit(Discrepancy::new(path, kind))
}

/// Replace one task with its children, in traversal order
fn expand(task: Task<'_>) -> Vec<Task<'_>> {
    match task {
        Task::Emit(_) => Vec::new(),
        Task::Document { expected, actual } => expand_document(expected, actual),
        Task::Fields {
            path,
            role,
            expected,
            actual,
        } => expand_fields(&path, role, expected, actual),
        Task::Ports {
            path,
            expected,
            actual,
        } => expand_ports(&path, expected, actual),
        Task::Type {
            path,
            expected,
            actual,
        } => expand_type(path, expected, actual),
    }
}

fn expand_document<'a>(
    expected: &'a DeclarationDocument,
    actual: &'a DeclarationDocument,
) -> Vec<Task<'a>> {
    let root = DocPath::root();
    let mut tasks = Vec::with_capacity(3);

    if expected.namespace != actual.namespace {
        tasks.push(emit(
            root.clone(),
            DiscrepancyKind::NamespaceMismatch {
                expected: expected.namespace.clone(),
                actual: actual.namespace.clone(),
            },
        ));
    }

    tasks.push(Task::Fields {
        path: root.child("flags"),
        role: FieldRole::Flag,
        expected: &expected.flags,
        actual: &actual.flags,
    });
    tasks.push(Task::Ports {
        path: root.child("ports"),
        expected: &expected.ports,
        actual: &actual.ports,
    });

    tasks
}

fn expand_fields<'a>(
    path: &DocPath,
    role: FieldRole,
    expected: &'a [Field],
    actual: &'a [Field],
) -> Vec<Task<'a>> {
    let mut tasks = Vec::new();

    for want in expected {
        let field_path = path.child(want.name.clone());
        match actual.iter().find(|f| f.name == want.name) {
            Some(got) => {
                // Flag and `Nullable` wrapper compare as the same thing
                let (want_ty, want_null) = want.unwrapped();
                let (got_ty, got_null) = got.unwrapped();
                if want_null != got_null {
                    tasks.push(emit(
                        field_path.clone(),
                        DiscrepancyKind::NullabilityMismatch {
                            expected: want_null,
                            actual: got_null,
                        },
                    ));
                }
                tasks.push(Task::Type {
                    path: field_path,
                    expected: want_ty,
                    actual: got_ty,
                });
            }
            None => tasks.push(emit(field_path, role.missing(want))),
        }
    }

    let known: HashSet<&str> = expected.iter().map(|f| f.name.as_str()).collect();
    for got in actual.iter().filter(|f| !known.contains(f.name.as_str())) {
        tasks.push(emit(path.child(got.name.clone()), role.extra(got)));
    }

    tasks
}

fn expand_ports<'a>(path: &DocPath, expected: &'a [PortDecl], actual: &'a [PortDecl]) -> Vec<Task<'a>> {
    let mut tasks = Vec::new();

    for want in expected {
        let port_path = path.child(want.name.clone());
        match actual.iter().find(|p| p.name == want.name) {
            Some(got) => {
                if want.direction != got.direction {
                    tasks.push(emit(
                        port_path.clone(),
                        DiscrepancyKind::DirectionMismatch {
                            expected: want.direction,
                            actual: got.direction,
                        },
                    ));
                }
                tasks.push(Task::Type {
                    path: port_path.child("value"),
                    expected: &want.value,
                    actual: &got.value,
                });
            }
            None => tasks.push(emit(
                port_path,
                DiscrepancyKind::MissingPort(want.name.clone()),
            )),
        }
    }

    let known: HashSet<&str> = expected.iter().map(|p| p.name.as_str()).collect();
    for got in actual.iter().filter(|p| !known.contains(p.name.as_str())) {
        tasks.push(emit(
            path.child(got.name.clone()),
            DiscrepancyKind::ExtraPort(got.name.clone()),
        ));
    }

    tasks
}

/// Members of `expected` absent from `actual`, and the reverse
fn set_difference<'s>(
    expected: impl Iterator<Item = &'s str> + Clone,
    actual: impl Iterator<Item = &'s str> + Clone,
) -> (Vec<String>, Vec<String>) {
    let want: HashSet<&str> = expected.clone().collect();
    let got: HashSet<&str> = actual.clone().collect();

    let missing = expected
        .filter(|v| !got.contains(v))
        .map(str::to_owned)
        .collect();
    let extra = actual
        .filter(|v| !want.contains(v))
        .map(str::to_owned)
        .collect();

    (missing, extra)
}

fn expand_type<'a>(
    path: DocPath,
    expected: &'a TypeDescriptor,
    actual: &'a TypeDescriptor,
) -> Vec<Task<'a>> {
    if let (TypeDescriptor::Nullable { .. }, _) | (_, TypeDescriptor::Nullable { .. }) =
        (expected, actual)
    {
        let (want, want_null) = expected.split_nullable();
        let (got, got_null) = actual.split_nullable();
        let mut tasks = Vec::with_capacity(2);
        if want_null != got_null {
            tasks.push(emit(
                path.clone(),
                DiscrepancyKind::NullabilityMismatch {
                    expected: want_null,
                    actual: got_null,
                },
            ));
        }
        tasks.push(Task::Type {
            path,
            expected: want,
            actual: got,
        });
        return tasks;
    }

    if mem::discriminant(expected) != mem::discriminant(actual) {
        return vec![emit(
            path,
            DiscrepancyKind::KindMismatch {
                expected: expected.kind_name(),
                actual: actual.kind_name(),
            },
        )];
    }

    match (expected, actual) {
        (
            TypeDescriptor::Literals { literals: want },
            TypeDescriptor::Literals { literals: got },
        ) => {
            let (missing, extra) = set_difference(
                want.iter().map(String::as_str),
                got.iter().map(String::as_str),
            );
            if missing.is_empty() && extra.is_empty() {
                Vec::new()
            } else {
                vec![emit(
                    path,
                    DiscrepancyKind::LiteralSetMismatch { missing, extra },
                )]
            }
        }

        (TypeDescriptor::Object { fields: want }, TypeDescriptor::Object { fields: got }) => {
            vec![Task::Fields {
                path,
                role: FieldRole::Member,
                expected: want,
                actual: got,
            }]
        }

        (TypeDescriptor::Array { elements: want }, TypeDescriptor::Array { elements: got }) => {
            vec![Task::Type {
                path: path.elements(),
                expected: want,
                actual: got,
            }]
        }

        (TypeDescriptor::Record { values: want }, TypeDescriptor::Record { values: got }) => {
            vec![Task::Type {
                path: path.values(),
                expected: want,
                actual: got,
            }]
        }

        (
            TypeDescriptor::TaggedUnion {
                discriminator: want_disc,
                variants: want,
            },
            TypeDescriptor::TaggedUnion {
                discriminator: got_disc,
                variants: got,
            },
        ) => {
            let mut tasks = Vec::new();

            if want_disc != got_disc {
                tasks.push(emit(
                    path.clone(),
                    DiscrepancyKind::DiscriminatorMismatch {
                        expected: want_disc.clone(),
                        actual: got_disc.clone(),
                    },
                ));
            }

            let (missing, extra) = set_difference(
                want.iter().map(|v| v.tag.as_str()),
                got.iter().map(|v| v.tag.as_str()),
            );
            if !missing.is_empty() || !extra.is_empty() {
                tasks.push(emit(
                    path.clone(),
                    DiscrepancyKind::TagSetMismatch { missing, extra },
                ));
            }

            for variant in want {
                if let Some(other) = got.iter().find(|v| v.tag == variant.tag) {
                    tasks.push(Task::Fields {
                        path: path.child(variant.tag.as_str()),
                        role: FieldRole::Member,
                        expected: &variant.fields,
                        actual: &other.fields,
                    });
                }
            }

            tasks
        }

        // Same primitive kind, or both empty
        _ => Vec::new(),
    }
}
