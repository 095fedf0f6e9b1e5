use attrscan_analyzer::{
    analyze, Analyzer, AnalyzerConfig, AnalyzerError, ManifestRegistry, MemberDescriptor,
    MethodDescriptor, StructuralErrorPolicy, TypeDescriptor,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, body: &str) -> String {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

fn fixture_registry() -> ManifestRegistry {
    ManifestRegistry::new()
        .with_definition("App\\Attribute\\Logged")
        .with_definition("App\\Attribute\\Inject")
        .with_type(
            TypeDescriptor::new("App\\Bar")
                .property(MemberDescriptor::new("field").attribute("App\\Attribute\\Missing"))
                .method(MethodDescriptor::new("run").attribute("App\\Attribute\\Logged")),
        )
        .with_type(
            TypeDescriptor::new("App\\Clean")
                .attribute("App\\Attribute\\Logged")
                .property(MemberDescriptor::new("repo").attribute("App\\Attribute\\Inject")),
        )
}

#[test]
fn unresolvable_class_is_reported_as_not_found() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "src/Foo.php", "<?php\nnamespace App;\n\nclass Foo {}\n");

    let report = analyze(dir.path(), &ManifestRegistry::new()).unwrap();
    assert_eq!(report.not_found_classes().len(), 1);
    assert_eq!(report.not_found_classes()["App\\Foo"], file);
    assert!(report.classes_without_undeclared_attributes().is_empty());
}

#[test]
fn two_classes_make_a_suspect_and_nothing_else() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Pair.php", "<?php class A{} class B{}");

    let report = analyze(dir.path(), &fixture_registry()).unwrap();
    let suspects = report.suspect_classes();
    assert_eq!(suspects.len(), 1);
    assert_eq!(suspects[0].classes, vec!["A", "B"]);
    assert_eq!(suspects[0].total(), 2);
    assert!(report.not_found_classes().is_empty());
    assert!(report.classes_with_undeclared_attributes().is_empty());
    assert!(report.classes_without_undeclared_attributes().is_empty());
    assert!(report.traits().is_empty());
}

#[test]
fn missing_property_attribute_is_the_only_finding() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "src/Bar.php",
        "<?php\nnamespace App;\n\nuse App\\Attribute\\Logged;\n\nclass Bar\n{\n    #[Missing]\n    public $field;\n\n    #[Logged]\n    public function run() {}\n}\n",
    );

    let report = analyze(dir.path(), &fixture_registry()).unwrap();
    let anomalies = report.classes_with_undeclared_attributes();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].fqcn, "App\\Bar");

    let json = serde_json::to_value(&anomalies[0]).unwrap();
    assert_eq!(
        json["propertyAttributes"],
        serde_json::json!({ "App\\Attribute\\Missing": ["field"] })
    );
    assert!(json.get("methodAttributes").is_none());
}

#[test]
fn lone_interface_goes_to_the_interface_registry() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "Greet.php", "<?php\nnamespace App;\ninterface Greet{}\n");

    let report = analyze(dir.path(), &fixture_registry()).unwrap();
    assert_eq!(report.interfaces().len(), 1);
    assert_eq!(report.interfaces()[0].names, vec!["Greet"]);
    assert_eq!(report.interfaces()[0].namespace.as_deref(), Some("App"));
    assert_eq!(report.interfaces()[0].file_name, file);
    assert!(report.not_found_classes().is_empty());
    assert!(report.classes_without_undeclared_attributes().is_empty());
    assert!(report.suspect_classes().is_empty());
}

#[test]
fn abstract_class_is_not_a_class() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Base.php", "<?php abstract class Base{}");

    let report = analyze(dir.path(), &fixture_registry()).unwrap();
    assert_eq!(report.abstracts().len(), 1);
    assert_eq!(report.abstract_names()[0].name, "Base");
    assert!(report.not_found_classes().is_empty());
}

#[test]
fn wrong_extension_fails_before_scanning() {
    let dir = tempdir().unwrap();
    write(dir.path(), "notes.txt", "<?php class A {} namespace Late;");

    let err = analyze(dir.path().join("notes.txt"), &fixture_registry()).unwrap_err();
    assert!(matches!(err, AnalyzerError::InvalidPath(_)));
}

#[test]
fn missing_root_fails() {
    let dir = tempdir().unwrap();
    let err = analyze(dir.path().join("missing"), &fixture_registry()).unwrap_err();
    assert!(matches!(err, AnalyzerError::InvalidPath(_)));
}

#[test]
fn clean_and_anomalous_partition_resolved_classes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/Bar.php", "<?php namespace App; class Bar {}");
    write(dir.path(), "src/Clean.php", "<?php namespace App; final class Clean {}");
    write(dir.path(), "src/Gone.php", "<?php namespace App; class Gone {}");
    write(dir.path(), "src/Loggable.php", "<?php namespace App; trait Loggable {}");

    let report = analyze(dir.path(), &fixture_registry()).unwrap();
    let anomalous: Vec<_> = report
        .classes_with_undeclared_attributes()
        .iter()
        .map(|a| a.fqcn.as_str())
        .collect();
    let clean: Vec<_> = report
        .classes_without_undeclared_attributes()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(anomalous, vec!["App\\Bar"]);
    assert_eq!(clean, vec!["App\\Clean"]);
    assert!(report.not_found_classes().contains_key("App\\Gone"));
    assert_eq!(report.trait_names()[0].name, "Loggable");

    let stats = report.stats();
    assert_eq!(stats.files_discovered, 4);
    assert_eq!(stats.files_scanned, 4);
    assert!(!report.is_clean());
}

#[test]
fn rerunning_yields_the_same_report() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/One.php", "<?php class One {}");
    write(dir.path(), "b/Two.php", "<?php interface Two {}");
    write(dir.path(), "c/Three.php", "<?php class X {} class Y {}");
    write(dir.path(), "d/Bar.php", "<?php namespace App; class Bar {}");

    let registry = fixture_registry();
    let first = analyze(dir.path(), &registry).unwrap();
    let second = analyze(dir.path(), &registry).unwrap();
    assert_eq!(first.snapshot(), second.snapshot());
}

#[test]
fn late_namespace_aborts_or_is_suspect_by_policy() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Ok.php", "<?php class Ok {}");
    write(dir.path(), "Late.php", "<?php class A {} namespace B;");
    let registry = fixture_registry();

    let err = analyze(dir.path(), &registry).unwrap_err();
    assert!(matches!(err, AnalyzerError::DuplicateNamespace { .. }));
    assert!(err.to_string().contains("Late.php"));

    let config = AnalyzerConfig {
        structural_errors: StructuralErrorPolicy::Suspect,
        ..Default::default()
    };
    let report = Analyzer::new(&registry, config)
        .unwrap()
        .analyze(dir.path())
        .unwrap();
    assert_eq!(report.suspect_classes().len(), 1);
    assert!(report.suspect_classes()[0].file_name.ends_with("Late.php"));
    assert!(report.not_found_classes().contains_key("Ok"));
}

#[test]
fn manifest_registry_drives_the_run() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "src/Controller.php",
        "<?php\nnamespace App\\Http;\n\nclass Controller\n{\n    public function show(#[FromRoute] int $id) {}\n}\n",
    );
    let manifest = dir.path().join("registry.json");
    fs::write(
        &manifest,
        r#"{
            "definitions": [],
            "types": [{
                "name": "App\\Http\\Controller",
                "methods": [{
                    "name": "show",
                    "parameters": [{ "name": "id", "attributes": ["App\\Http\\FromRoute"] }]
                }]
            }]
        }"#,
    )
    .unwrap();

    let registry = ManifestRegistry::from_json_file(&manifest).unwrap();
    let report = analyze(dir.path().join("src"), &registry).unwrap();
    let view = serde_json::to_value(report.validation()).unwrap();
    assert_eq!(
        view["classesWithUndeclaredAttributes"][0]["parameterAttributes"],
        serde_json::json!({ "show": { "App\\Http\\FromRoute": ["id"] } })
    );
    assert!(view.get("notFoundClasses").is_none());
}
