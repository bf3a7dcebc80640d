use nova_config::TemplatesConfig;
use nova_templates::{Literal, MemoryFiler, ProcessSummary, TemplateError, TemplateProcessor};
use nova_test_utils::{openrewrite_types, Fixture};
use nova_types::{ClassDef, Diagnostic, Severity};
use pretty_assertions::assert_eq;

use crate::support::{foo_visitor, opaque_template, template_field, VISITOR};

fn processor() -> TemplateProcessor {
    TemplateProcessor::new(TemplatesConfig::default())
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
    diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn visitor_class_template_end_to_end() {
    let fixture = foo_visitor("\"before\"");
    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let summary = processor()
        .process(&fixture.unit, &fixture.resolver, &mut filer, &mut diagnostics)
        .unwrap();

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(
        summary,
        ProcessSummary {
            candidates: 1,
            generated: vec!["foo.Foo_before".to_owned()],
            skipped: 0,
        }
    );

    let artifact = filer.get("foo.Foo_before").unwrap();
    assert_eq!(artifact.simple_name, "Foo_before");
    assert_eq!(artifact.package, "foo");
    assert_eq!(
        artifact.text,
        r#"package foo;
import org.openrewrite.java.*;
import java.nio.file.Path;

public class Foo_before {
    public static JavaTemplate.Builder getTemplate(JavaVisitor<?> visitor) {
        return JavaTemplate
                .builder("Files.delete(#{any(java.nio.file.Path)})")
                .imports("java.nio.file.Path")
                .imports("java.nio.file.Files");
    }
}
"#
    );
}

#[test]
fn unqualified_static_call_becomes_a_static_import() {
    let text = r#"package foo;

class Foo extends JavaVisitor<ExecutionContext> {
    JavaTemplate write = Semantics.statement(this, "write", (Path p) -> Files.write(p, emptyList())).build();
}
"#;
    let mut f = Fixture::new(text, openrewrite_types());
    let foo = f.declare_class("foo.Foo", VISITOR);

    let param_range = f.find("Path p");
    let (param, p) = f.param(param_range, "java.nio.file.Path", None);
    let body_range = f.find("Files.write(p, emptyList())");
    let files_range = f.find_in(body_range, "Files");
    let files = f.class_ref(files_range, "java.nio.file.Files");
    let p_range = f.find_ident_in(body_range, "p");
    let path = f.class_type("java.nio.file.Path");
    let p_use = f.local_ref(p_range, p, path);
    let empty_range = f.find_in(body_range, "emptyList()");
    let empty = f.static_call(empty_range, "java.util.Collections", vec![]);
    let write = f
        .tree()
        .method_call("write", Some(files), vec![p_use, empty], body_range);
    let lambda_range = f.find("(Path p) -> Files.write(p, emptyList())");
    let lambda = f.tree().lambda(vec![param], write, lambda_range);
    let call_text =
        r#"Semantics.statement(this, "write", (Path p) -> Files.write(p, emptyList()))"#;
    let call_range = f.find(call_text);
    let call = f.template_call(call_range, lambda);
    let field = template_field(&mut f, call, &format!("{call_text}.build()"));
    let class = f.class_decl("Foo", Some(foo), vec![field]);
    let (unit, resolver) = f.finish(Some("foo"), vec![class]);

    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    processor()
        .process(&unit, &resolver, &mut filer, &mut diagnostics)
        .unwrap();

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let artifact = filer.get("foo.Foo_write").unwrap();
    assert_eq!(
        artifact.text,
        r##"package foo;
import org.openrewrite.java.*;
import java.nio.file.Path;

public class Foo_write {
    public static JavaTemplate.Builder getTemplate(JavaVisitor<?> visitor) {
        return JavaTemplate
                .builder("Files.write(#{any(java.nio.file.Path)}, emptyList())")
                .imports("java.nio.file.Path")
                .imports("java.nio.file.Files")
                .staticImports("java.util.Collections.emptyList");
    }
}
"##
    );
}

#[test]
fn null_template_name_is_skipped_with_a_warning() {
    let fixture = foo_visitor("null");
    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let summary = processor()
        .process(&fixture.unit, &fixture.resolver, &mut filer, &mut diagnostics)
        .unwrap();

    assert!(filer.is_empty());
    assert_eq!(summary.candidates, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].code, "template-null-name");
    assert_eq!(
        diagnostics[0].message,
        "Can't compile a template with a null name."
    );
}

#[test]
fn call_site_resolution_failure_is_a_warning() {
    let mut fixture = foo_visitor("\"before\"");
    fixture
        .resolver
        .fail_on(fixture.param_use, "cannot find symbol: p");
    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let summary = processor()
        .process(&fixture.unit, &fixture.resolver, &mut filer, &mut diagnostics)
        .unwrap();

    assert!(filer.is_empty());
    assert_eq!(summary.candidates, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(codes(&diagnostics), vec!["template-resolution"]);
    assert_eq!(
        diagnostics[0].message,
        "Had trouble type attributing the template."
    );
}

#[test]
fn primitive_marker_selects_primitive_placeholder() {
    let text = r#"package foo;

class Foo extends JavaVisitor<ExecutionContext> {
    JavaTemplate plusOne = Semantics.expression(this, "plusOne", (@Primitive Integer i) -> i + 1).build();
}
"#;
    let mut f = Fixture::new(text, openrewrite_types());
    let foo = f.declare_class("foo.Foo", VISITOR);

    let param_range = f.find("@Primitive Integer i");
    let (param, i) = f.param(
        param_range,
        "java.lang.Integer",
        Some("org.openrewrite.java.template.Primitive"),
    );
    let body_range = f.find("i + 1");
    let i_range = f.find_ident_in(body_range, "i");
    let integer = f.class_type("java.lang.Integer");
    let i_use = f.local_ref(i_range, i, integer);
    let one_range = f.find_in(body_range, "1");
    let one = f.tree().literal(Literal::Int(1), one_range);
    let body = f.tree().other("binary", vec![i_use, one], body_range);
    let lambda_range = f.find("(@Primitive Integer i) -> i + 1");
    let lambda = f.tree().lambda(vec![param], body, lambda_range);
    let call_text = r#"Semantics.expression(this, "plusOne", (@Primitive Integer i) -> i + 1)"#;
    let call_range = f.find(call_text);
    let call = f.template_call(call_range, lambda);
    let field = template_field(&mut f, call, &format!("{call_text}.build()"));
    let class = f.class_decl("Foo", Some(foo), vec![field]);
    let (unit, resolver) = f.finish(Some("foo"), vec![class]);

    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    processor()
        .process(&unit, &resolver, &mut filer, &mut diagnostics)
        .unwrap();

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let artifact = filer.get("foo.Foo_plusOne").unwrap();
    assert!(!artifact.text.contains("Primitive"));
    assert_eq!(
        artifact.text,
        r##"package foo;
import org.openrewrite.java.*;

public class Foo_plusOne {
    public static JavaTemplate.Builder getTemplate(JavaVisitor<?> visitor) {
        return JavaTemplate
                .builder("#{any(int)} + 1");
    }
}
"##
    );
}

#[test]
fn anonymous_visitor_in_recipe_uses_flat_name_and_classpath() {
    let text = r#"package foo;

class Recipes {
    class ListsRecipe extends Recipe {
        JavaVisitor<ExecutionContext> getVisitor() {
            return new JavaVisitor<ExecutionContext>() {
                JavaTemplate before = Semantics.expression(this, "before", (Object o) -> Lists.newArrayList(o)).build();
            };
        }
    }
}
"#;
    let mut f = Fixture::new(text, openrewrite_types());
    let recipes = f.declare_class("foo.Recipes", "java.lang.Object");
    let recipe = f.declare_class("foo.Recipes$ListsRecipe", "org.openrewrite.Recipe");
    f.declare_class("foo.Recipes$ListsRecipe$1", VISITOR);

    let param_range = f.find("Object o");
    let (param, o) = f.param(param_range, "java.lang.Object", None);
    let body_range = f.find("Lists.newArrayList(o)");
    let lists_range = f.find_in(body_range, "Lists");
    let lists = f.class_ref(lists_range, "com.google.common.collect.Lists");
    let o_range = f.find_ident_in(body_range, "o");
    let object = f.class_type("java.lang.Object");
    let o_use = f.local_ref(o_range, o, object);
    let new_list = f
        .tree()
        .method_call("newArrayList", Some(lists), vec![o_use], body_range);
    let lambda_range = f.find("(Object o) -> Lists.newArrayList(o)");
    let lambda = f.tree().lambda(vec![param], new_list, lambda_range);
    let call_text =
        r#"Semantics.expression(this, "before", (Object o) -> Lists.newArrayList(o))"#;
    let call_range = f.find(call_text);
    let call = f.template_call(call_range, lambda);
    let field = template_field(&mut f, call, &format!("{call_text}.build()"));

    let new_range = f.braced("new JavaVisitor<ExecutionContext>()");
    let clazz_range = f.find_in(new_range, "JavaVisitor");
    let clazz = f.ident(clazz_range);
    let new_class = f
        .tree()
        .new_class(clazz, vec![], Some(vec![field]), new_range);
    let visitor = f.class_type(VISITOR);
    let constructed = f.class_type("foo.Recipes$ListsRecipe$1");
    f.resolver().set_type(clazz, visitor);
    f.resolver().set_type(new_class, constructed);

    let method_range = f.braced("JavaVisitor<ExecutionContext> getVisitor()");
    let ret = f.tree().other("return", vec![new_class], new_range);
    let method = f.tree().method_decl("getVisitor", vec![ret], method_range);
    let recipe_decl = f.class_decl("ListsRecipe", Some(recipe), vec![method]);
    let recipes_decl = f.class_decl("Recipes", Some(recipes), vec![recipe_decl]);
    let (unit, resolver) = f.finish(Some("foo"), vec![recipes_decl]);

    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let summary = processor()
        .process(&unit, &resolver, &mut filer, &mut diagnostics)
        .unwrap();

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(
        summary.generated,
        vec!["foo.Recipes$ListsRecipe$1_before".to_owned()]
    );
    let artifact = filer.get("foo.Recipes$ListsRecipe$1_before").unwrap();
    assert_eq!(
        artifact.relative_path(),
        std::path::PathBuf::from("foo/Recipes$ListsRecipe$1_before.java")
    );
    assert_eq!(
        artifact.text,
        r#"package foo;
import org.openrewrite.java.*;

public class Recipes$ListsRecipe$1_before {
    public static JavaTemplate.Builder getTemplate(JavaVisitor<?> visitor) {
        return JavaTemplate
                .builder("Lists.newArrayList(#{any(java.lang.Object)})")
                .javaParser(JavaParser.fromJavaVersion().classpath("guava"))
                .imports("com.google.common.collect.Lists");
    }
}
"#
    );
}

#[test]
fn template_outside_visitor_is_skipped() {
    let text = r#"package foo;

class Plain {
    JavaTemplate before = Semantics.statement(this, "before", () -> System.gc()).build();
}
"#;
    let mut f = Fixture::new(text, openrewrite_types());
    let plain = f.declare_class("foo.Plain", "java.lang.Object");
    let field = opaque_template(&mut f, "before", "System.gc()");
    let class = f.class_decl("Plain", Some(plain), vec![field]);
    let (unit, resolver) = f.finish(Some("foo"), vec![class]);

    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let summary = processor()
        .process(&unit, &resolver, &mut filer, &mut diagnostics)
        .unwrap();

    assert!(filer.is_empty());
    assert_eq!(summary.skipped, 1);
    assert_eq!(codes(&diagnostics), vec!["template-outside-visitor"]);
    assert_eq!(
        diagnostics[0].message,
        "Can't compile a template outside of a visitor or recipe."
    );
    // Only the call site itself was attributed: no parameters, no instantiation.
    assert_eq!(resolver.passes(), 1);
}

#[test]
fn interface_only_visitor_is_not_a_host() {
    let text = r#"package foo;

class Foo implements JavaVisitor {
    JavaTemplate before = Semantics.statement(this, "before", () -> System.gc()).build();
}
"#;
    let mut f = Fixture::new(text, openrewrite_types());
    let object = f.class("java.lang.Object");
    let visitor = f.class(VISITOR);
    let foo = f.resolver().types_mut().add_class(
        ClassDef::class("foo.Foo")
            .with_superclass(object)
            .with_interfaces([visitor]),
    );
    let field = opaque_template(&mut f, "before", "System.gc()");
    let class = f.class_decl("Foo", Some(foo), vec![field]);
    let (unit, resolver) = f.finish(Some("foo"), vec![class]);

    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    processor()
        .process(&unit, &resolver, &mut filer, &mut diagnostics)
        .unwrap();

    assert!(filer.is_empty());
    assert_eq!(codes(&diagnostics), vec!["template-outside-visitor"]);
}

#[test]
fn missing_enclosing_class_is_fatal_and_keeps_earlier_artifacts() {
    let text = r#"package foo;

class Foo extends JavaVisitor<ExecutionContext> {
    JavaTemplate first = Semantics.statement(this, "first", () -> System.gc()).build();
}

JavaTemplate second = Semantics.statement(this, "second", () -> System.runFinalization()).build();
"#;
    let mut f = Fixture::new(text, openrewrite_types());
    let foo = f.declare_class("foo.Foo", VISITOR);
    let first = opaque_template(&mut f, "first", "System.gc()");
    let class = f.class_decl("Foo", Some(foo), vec![first]);
    let second = opaque_template(&mut f, "second", "System.runFinalization()");
    let (unit, resolver) = f.finish(Some("foo"), vec![class, second]);

    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let err = processor()
        .process(&unit, &resolver, &mut filer, &mut diagnostics)
        .unwrap_err();

    assert!(matches!(err, TemplateError::MissingEnclosingClass { .. }));
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(filer.len(), 1);
    let artifact = filer.get("foo.Foo_first").unwrap();
    assert!(artifact.text.contains(".builder(\"System.gc()\");"));
}

#[test]
fn unnamed_package_omits_package_line() {
    let text = r#"class Foo extends JavaVisitor<ExecutionContext> {
    JavaTemplate gc = Semantics.statement(this, "gc", () -> System.gc()).build();
}
"#;
    let mut f = Fixture::new(text, openrewrite_types());
    let foo = f.declare_class("Foo", VISITOR);
    let field = opaque_template(&mut f, "gc", "System.gc()");
    let class = f.class_decl("Foo", Some(foo), vec![field]);
    let (unit, resolver) = f.finish(None, vec![class]);

    let mut filer = MemoryFiler::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    processor()
        .process(&unit, &resolver, &mut filer, &mut diagnostics)
        .unwrap();

    let artifact = filer.get("Foo_gc").unwrap();
    assert!(artifact
        .text
        .starts_with("import org.openrewrite.java.*;\n\npublic class Foo_gc {"));
    assert_eq!(artifact.package, "");
}
