//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 夹具文件场景测试（加载 → 校验 → 比较 → 渲染）
//! - golden 文件逐字节比对
//! - 渲染幂等性与 diff 自反性的属性测试

#[cfg(test)]
mod fixtures {
    use std::path::PathBuf;

    use contracts::DeclarationDocument;
    use doc_loader::DocumentLoader;

    pub fn path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name)
    }

    pub fn load(name: &str) -> DeclarationDocument {
        DocumentLoader::load_from_path(&path(name))
            .unwrap_or_else(|e| panic!("fixture {name} failed to load: {e}"))
    }
}

#[cfg(test)]
mod scenario_tests {
    use contracts::{
        DeclarationBatch, DeclarationDocument, DiscrepancyKind, Field, PortDecl, RenderOptions,
        TypeDescriptor, ViolationReason,
    };
    use interop_engine::{diff, render, render_batch, validate, validate_batch};

    use super::fixtures;

    #[test]
    fn test_jwt_renders_golden_file() {
        let document = fixtures::load("jwt.toml");
        let golden = std::fs::read_to_string(fixtures::path("jwt.d.ts")).unwrap();

        let rendered = render(&document).unwrap();
        assert_eq!(rendered, golden);
    }

    #[test]
    fn test_jwt_toml_and_json_agree() {
        let toml = fixtures::load("jwt.toml");
        let json = fixtures::load("jwt.json");
        assert_eq!(toml, json);
        assert!(diff(&toml, &json).is_empty());
    }

    #[test]
    fn test_tinyping_validates() {
        let document = fixtures::load("tinyping.json");
        assert!(validate(&document).is_ok());
        assert_eq!(document.ports.len(), 4);
    }

    #[test]
    fn test_tinyping_missing_index_is_one_discrepancy() {
        let expected = fixtures::load("tinyping.json");
        let mut actual = expected.clone();

        let port = actual
            .ports
            .iter_mut()
            .find(|p| p.name == "changeDocument")
            .unwrap();
        let TypeDescriptor::TaggedUnion { variants, .. } = &mut port.value else {
            panic!("changeDocument should carry a tagged union");
        };
        let variant = variants
            .iter_mut()
            .find(|v| v.tag == "SetTagForPing")
            .unwrap();
        variant.fields.retain(|f| f.name != "index");

        let discrepancies: Vec<_> = diff(&expected, &actual).into_iter().collect();
        assert_eq!(discrepancies.len(), 1, "got: {discrepancies:?}");
        assert_eq!(
            discrepancies[0].path.to_string(),
            "ports.changeDocument.value.SetTagForPing.index"
        );
        assert!(matches!(
            discrepancies[0].kind,
            DiscrepancyKind::MissingField { .. }
        ));
    }

    #[test]
    fn test_tinyping_render_layout() {
        let rendered = render(&fixtures::load("tinyping.json")).unwrap();

        // Variants ordered by tag, discriminator sorted in with the fields
        let add = rendered.find("tag: \"AddNewPingAt\";").unwrap();
        let set_minutes = rendered.find("tag: \"SetMinutesPerPing\";").unwrap();
        let index = rendered.find("index: number;").unwrap();
        let set_tag = rendered.find("tag: \"SetTagForPing\";").unwrap();
        assert!(add < set_minutes && set_minutes < index && index < set_tag);

        assert!(rendered.contains("custom: Record<string, string>;"));
        assert!(rendered.contains("send: (value: \"default\" | \"denied\" | \"granted\") => void;"));
        assert!(rendered.contains(
            "subscribe: (callback: (value: Record<string, never>) => void) => void;"
        ));
        assert!(rendered.contains("}[];"));
    }

    #[test]
    fn test_extra_flag_reported_once() {
        let expected = fixtures::load("jwt.toml");
        let actual = expected
            .clone()
            .with_flag(Field::required("foo", TypeDescriptor::Number));

        let discrepancies: Vec<_> = diff(&expected, &actual).into_iter().collect();
        assert_eq!(discrepancies.len(), 1);
        assert_eq!(discrepancies[0].to_string(), "flags.foo: extra flag: foo");
    }

    #[test]
    fn test_duplicate_port_single_violation() {
        let document = fixtures::load("jwt.toml")
            .with_port(PortDecl::subscribe("newJwt", TypeDescriptor::String));

        let errors = validate(&document).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.violations()[0].path.to_string(), "ports.newJwt");
        assert!(matches!(
            errors.violations()[0].reason,
            ViolationReason::DuplicatePort { .. }
        ));
    }

    #[test]
    fn test_port_both_directions_rejected() {
        let document = fixtures::load("jwt.toml")
            .with_port(PortDecl::send("newJwt", TypeDescriptor::String));

        let errors = validate(&document).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.violations()[0].reason,
            ViolationReason::ConflictingPortDirection { .. }
        ));
        assert!(render(&document).is_err());
    }

    #[test]
    fn test_duplicate_tag_reported_at_union() {
        let mut document = fixtures::load("tinyping.json");
        let port = document
            .ports
            .iter_mut()
            .find(|p| p.name == "changeDocument")
            .unwrap();
        if let TypeDescriptor::TaggedUnion { variants, .. } = &mut port.value {
            let copy = variants[0].clone();
            variants.push(copy);
        }

        let errors = validate(&document).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.violations()[0].path.to_string(),
            "ports.changeDocument.value"
        );
        assert!(matches!(
            errors.violations()[0].reason,
            ViolationReason::DuplicateTag { .. }
        ));
    }

    #[test]
    fn test_nested_namespaces_share_blocks() {
        let main = fixtures::load("notifications.toml");
        let settings = DeclarationDocument::new("Foo.Bar.Settings")
            .with_flag(Field::required("darkMode", TypeDescriptor::Boolean));
        let batch = DeclarationBatch::new(vec![main, settings]);

        assert!(validate_batch(&batch).is_ok());
        let rendered = render_batch(&batch, &RenderOptions::default()).unwrap();

        assert_eq!(rendered.matches("namespace Foo {").count(), 1);
        assert_eq!(rendered.matches("namespace Bar {").count(), 1);
        let main_at = rendered.find("      namespace Main {").unwrap();
        let settings_at = rendered.find("      namespace Settings {").unwrap();
        assert!(main_at < settings_at);
        assert!(rendered.contains("requireInteraction: boolean | null;"));
    }

    #[test]
    fn test_duplicate_namespace_in_batch() {
        let batch = DeclarationBatch::new(vec![
            fixtures::load("jwt.toml"),
            fixtures::load("jwt.json"),
        ]);

        let errors = validate_batch(&batch).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.violations()[0].reason,
            ViolationReason::DuplicateNamespace { .. }
        ));
    }
}

#[cfg(test)]
mod loader_tests {
    use doc_loader::{DocumentFormat, DocumentLoader};

    use super::fixtures;

    #[test]
    fn test_fixture_round_trips_through_toml() {
        let document = fixtures::load("tinyping.json");
        let toml = DocumentLoader::to_toml(&document).unwrap();
        let reparsed = DocumentLoader::load_from_str(&toml, DocumentFormat::Toml).unwrap();
        assert_eq!(document, reparsed);
    }

    #[test]
    fn test_load_batch_renders_like_single() {
        let batch = DocumentLoader::load_batch(&[fixtures::path("jwt.toml")]).unwrap();
        let rendered =
            interop_engine::render_batch(&batch, &contracts::RenderOptions::default()).unwrap();
        let golden = std::fs::read_to_string(fixtures::path("jwt.d.ts")).unwrap();
        assert_eq!(rendered, golden);
    }

    #[test]
    fn test_nullable_in_nested_positions() {
        let content = r#"
namespace = "Main"

[[ports]]
name = "docFromAutomerge"
direction = "send"

[ports.value]
kind = "nullable"
of = { kind = "record", values = { kind = "nullable", of = { kind = "string" } } }

[[ports]]
name = "pings"
direction = "subscribe"
value = { kind = "array", elements = { kind = "nullable", of = { kind = "number" } } }
"#;
        let document = DocumentLoader::load_from_str(content, DocumentFormat::Toml).unwrap();
        let rendered = interop_engine::render(&document).unwrap();
        assert!(
            rendered.contains("send: (value: Record<string, string | null> | null) => void;"),
            "got: {rendered}"
        );
        assert!(
            rendered.contains("subscribe: (callback: (value: (number | null)[]) => void) => void;"),
            "got: {rendered}"
        );
    }

    #[test]
    fn test_all_violations_in_one_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(
            &path,
            r#"{
                "namespace": "Main",
                "flags": [
                    { "name": "a", "type": { "kind": "literals", "literals": [] } },
                    { "name": "a", "type": { "kind": "string" } }
                ],
                "ports": [
                    { "name": "1bad", "direction": "send", "value": { "kind": "string" } }
                ]
            }"#,
        )
        .unwrap();

        let err = DocumentLoader::load_from_path(&path).unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 3, "got: {violations:?}");
    }
}

#[cfg(test)]
mod property_tests {
    use std::collections::BTreeSet;

    use contracts::{
        DeclarationDocument, Field, NamespacePath, PortDecl, PortDirection, TypeDescriptor,
        Variant,
    };
    use interop_engine::{diff, render, validate};
    use proptest::prelude::*;

    fn ident() -> impl Strategy<Value = String> {
        "[a-z][a-zA-Z0-9_]{0,7}"
    }

    fn unique_idents(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set(ident(), 0..max).prop_map(|s| s.into_iter().collect())
    }

    fn fields(ty: BoxedStrategy<TypeDescriptor>, max: usize) -> impl Strategy<Value = Vec<Field>> {
        unique_idents(max).prop_flat_map(move |names| {
            let n = names.len();
            (
                Just(names),
                prop::collection::vec((ty.clone(), any::<bool>()), n),
            )
                .prop_map(|(names, types)| {
                    names
                        .into_iter()
                        .zip(types)
                        .map(|(name, (ty, nullable))| Field {
                            name: name.into(),
                            // Null is accepted at most once
                            nullable: nullable && !matches!(ty, TypeDescriptor::Nullable { .. }),
                            ty,
                        })
                        .collect()
                })
        })
    }

    fn type_descriptor() -> BoxedStrategy<TypeDescriptor> {
        let leaf = prop_oneof![
            Just(TypeDescriptor::String),
            Just(TypeDescriptor::Number),
            Just(TypeDescriptor::Boolean),
            Just(TypeDescriptor::Null),
            Just(TypeDescriptor::Empty),
            prop::collection::btree_set("[a-zA-Z \"]{1,6}", 1..4)
                .prop_map(TypeDescriptor::literals),
        ];

        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                inner.clone().prop_map(|ty| match ty {
                    nullable @ TypeDescriptor::Nullable { .. } => nullable,
                    other => TypeDescriptor::nullable(other),
                }),
                inner.clone().prop_map(TypeDescriptor::array),
                inner.clone().prop_map(TypeDescriptor::record),
                fields(inner.clone(), 4).prop_map(TypeDescriptor::object),
                prop::collection::btree_set("[A-Z][a-zA-Z]{0,8}", 1..4)
                    .prop_flat_map(move |tags: BTreeSet<String>| {
                        let n = tags.len();
                        (
                            Just(tags),
                            prop::collection::vec(fields(inner.clone(), 3), n),
                        )
                    })
                    .prop_map(|(tags, field_sets)| {
                        // Variant fields may not reuse the discriminator
                        let variants = tags
                            .into_iter()
                            .zip(field_sets)
                            .map(|(tag, mut fields)| {
                                fields.retain(|f| f.name != "tag");
                                Variant::new(tag, fields)
                            })
                            .collect();
                        TypeDescriptor::tagged_union(variants)
                    }),
            ]
        })
        .boxed()
    }

    fn document() -> impl Strategy<Value = DeclarationDocument> {
        let namespace = prop::collection::vec("[A-Z][a-zA-Z0-9]{0,6}", 1..4)
            .prop_map(|segments| segments.into_iter().collect::<NamespacePath>());

        let ports = unique_idents(5).prop_flat_map(|names| {
            let n = names.len();
            (
                Just(names),
                prop::collection::vec((type_descriptor(), any::<bool>()), n),
            )
                .prop_map(|(names, values)| {
                    names
                        .into_iter()
                        .zip(values)
                        .map(|(name, (value, send))| PortDecl {
                            name: name.into(),
                            direction: if send {
                                PortDirection::Send
                            } else {
                                PortDirection::Subscribe
                            },
                            value,
                        })
                        .collect::<Vec<_>>()
                })
        });

        (namespace, fields(type_descriptor(), 5), ports).prop_map(|(namespace, flags, ports)| {
            DeclarationDocument {
                namespace,
                flags,
                ports,
            }
        })
    }

    proptest! {
        #[test]
        fn prop_generated_documents_are_valid(doc in document()) {
            let result = validate(&doc);
            prop_assert!(result.is_ok(), "{:?}", result.err());
        }

        #[test]
        fn prop_render_is_idempotent(doc in document()) {
            let first = render(&doc).unwrap();
            let second = render(&doc).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_diff_with_self_is_empty(doc in document()) {
            prop_assert!(diff(&doc, &doc).is_empty());
            prop_assert_eq!(diff(&doc, &doc.clone()).iter().count(), 0);
        }

        #[test]
        fn prop_render_ignores_declaration_order(doc in document()) {
            let mut reversed = doc.clone();
            reversed.flags.reverse();
            reversed.ports.reverse();
            prop_assert_eq!(render(&doc).unwrap(), render(&reversed).unwrap());
            prop_assert!(diff(&doc, &reversed).is_empty());
        }

        #[test]
        fn prop_nullable_flag_matches_wrapper(doc in document()) {
            let mut wrapped = doc.clone();
            for flag in wrapped.flags.iter_mut().filter(|f| f.nullable) {
                flag.nullable = false;
                flag.ty = TypeDescriptor::nullable(flag.ty.clone());
            }
            prop_assert_eq!(render(&doc).unwrap(), render(&wrapped).unwrap());
            prop_assert!(diff(&doc, &wrapped).is_empty());
        }
    }
}
