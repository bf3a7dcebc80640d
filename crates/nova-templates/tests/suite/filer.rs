use std::io;
use std::path::PathBuf;

use nova_config::{GeneratedSourcesConfig, TemplatesConfig};
use nova_templates::{Filer, FsFiler, GeneratedArtifact, TemplateError, TemplateProcessor};
use nova_test_utils::{openrewrite_types, Fixture};
use nova_types::Diagnostic;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::support::{foo_visitor, opaque_template, VISITOR};

fn artifact(package: &str, simple_name: &str, text: &str) -> GeneratedArtifact {
    GeneratedArtifact {
        qualified_name: format!("{package}.{simple_name}"),
        package: package.to_owned(),
        simple_name: simple_name.to_owned(),
        text: text.to_owned(),
    }
}

#[test]
fn writes_below_package_directories() {
    let dir = tempdir().unwrap();
    let mut filer = FsFiler::new(dir.path());
    let fixture = foo_visitor("\"before\"");

    TemplateProcessor::new(TemplatesConfig::default())
        .process(&fixture.unit, &fixture.resolver, &mut filer, &mut Vec::<Diagnostic>::new())
        .unwrap();

    let written = std::fs::read_to_string(dir.path().join("foo/Foo_before.java")).unwrap();
    assert!(written.starts_with("package foo;\n"));
    assert!(written.contains("public class Foo_before {"));
}

#[test]
fn output_dir_is_resolved_against_project_root() {
    let dir = tempdir().unwrap();
    let config = GeneratedSourcesConfig {
        output_dir: PathBuf::from("build/generated"),
    };
    let mut filer = FsFiler::from_config(&config, dir.path());
    assert_eq!(filer.root(), dir.path().join("build/generated").as_path());

    let a = artifact("com.example", "Foo_t", "class Foo_t {}\n");
    filer.create(&a).unwrap();
    assert_eq!(
        filer.path_for(&a),
        dir.path().join("build/generated/com/example/Foo_t.java")
    );
    assert_eq!(
        std::fs::read_to_string(filer.path_for(&a)).unwrap(),
        "class Foo_t {}\n"
    );
}

#[test]
fn second_artifact_with_same_name_is_refused() {
    let dir = tempdir().unwrap();
    let mut filer = FsFiler::new(dir.path());
    let a = artifact("foo", "Foo_t", "first\n");
    filer.create(&a).unwrap();

    let err = filer.create(&artifact("foo", "Foo_t", "second\n")).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    assert_eq!(
        std::fs::read_to_string(filer.path_for(&a)).unwrap(),
        "first\n"
    );
}

#[test]
fn duplicate_template_name_fails_the_unit() {
    let text = r#"package foo;
class Foo extends JavaVisitor<ExecutionContext> {
    JavaTemplate a = Semantics.statement(this, "t", () -> System.gc()).build();
    JavaTemplate b = Semantics.statement(this, "t", () -> System.exit(0)).build();
}
"#;
    let mut f = Fixture::new(text, openrewrite_types());
    let foo = f.declare_class("foo.Foo", VISITOR);
    let a = opaque_template(&mut f, "t", "System.gc()");
    let b = opaque_template(&mut f, "t", "System.exit(0)");
    let class = f.class_decl("Foo", Some(foo), vec![a, b]);
    let (unit, resolver) = f.finish(Some("foo"), vec![class]);

    let dir = tempdir().unwrap();
    let mut filer = FsFiler::new(dir.path());
    let err = TemplateProcessor::new(TemplatesConfig::default())
        .process(&unit, &resolver, &mut filer, &mut Vec::<Diagnostic>::new())
        .unwrap_err();

    let TemplateError::ArtifactWrite { name, source } = err else {
        panic!("expected a write failure, got {err:?}");
    };
    assert_eq!(name, "foo.Foo_t");
    assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
    let kept = std::fs::read_to_string(dir.path().join("foo/Foo_t.java")).unwrap();
    assert!(kept.contains(".builder(\"System.gc()\");"));
}
