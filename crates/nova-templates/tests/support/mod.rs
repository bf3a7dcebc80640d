#![allow(dead_code)]

use nova_core::TextRange;
use nova_templates::{CompilationUnit, MemoryResolver, NodeId};
use nova_test_utils::{openrewrite_types, Fixture};

pub const VISITOR: &str = "org.openrewrite.java.JavaVisitor";

/// `class Foo extends JavaVisitor` holding one `statement` template over a
/// `Path` parameter, with the template-name argument `name_arg`.
pub struct FooVisitor {
    pub unit: CompilationUnit,
    pub resolver: MemoryResolver,
    pub call: NodeId,
    pub lambda: NodeId,
    pub param: NodeId,
    pub param_use: NodeId,
    pub body_range: TextRange,
}

pub fn foo_visitor(name_arg: &str) -> FooVisitor {
    let call_text = format!("Semantics.statement(this, {name_arg}, (Path p) -> Files.delete(p))");
    let text = format!(
        "package foo;\n\
         \n\
         class Foo extends JavaVisitor<ExecutionContext> {{\n    \
             JavaTemplate before = {call_text}.build();\n\
         }}\n"
    );

    let mut f = Fixture::new(text, openrewrite_types());
    let foo = f.declare_class("foo.Foo", VISITOR);

    let param_range = f.find("Path p");
    let (param, p) = f.param(param_range, "java.nio.file.Path", None);

    let body_range = f.find("Files.delete(p)");
    let files_range = f.find_in(body_range, "Files");
    let files = f.class_ref(files_range, "java.nio.file.Files");
    let use_range = f.find_ident_in(body_range, "p");
    let path = f.class_type("java.nio.file.Path");
    let param_use = f.local_ref(use_range, p, path);
    let delete = f
        .tree()
        .method_call("delete", Some(files), vec![param_use], body_range);

    let lambda_range = f.find("(Path p) -> Files.delete(p)");
    let lambda = f.tree().lambda(vec![param], delete, lambda_range);
    let call_range = f.find(&call_text);
    let call = f.template_call(call_range, lambda);

    let field = template_field(&mut f, call, &format!("{call_text}.build()"));
    let class = f.class_decl("Foo", Some(foo), vec![field]);
    let (unit, resolver) = f.finish(Some("foo"), vec![class]);

    FooVisitor {
        unit,
        resolver,
        call,
        lambda,
        param,
        param_use,
        body_range,
    }
}

/// `JavaTemplate x = <call>.build();` as a class member.
pub fn template_field(f: &mut Fixture, call: NodeId, build_text: &str) -> NodeId {
    let build_range = f.find(build_text);
    let build = f.tree().method_call("build", Some(call), vec![], build_range);
    let template = f.class_type("org.openrewrite.java.JavaTemplate");
    f.resolver().set_type(build, template);
    f.tree().other("field", vec![build], build_range)
}

/// A zero-parameter template `Semantics.statement(this, "<name>", () -> <body>)`
/// whose body is opaque.
pub fn opaque_template(f: &mut Fixture, name: &str, body: &str) -> NodeId {
    let call_text = format!("Semantics.statement(this, \"{name}\", () -> {body})");
    let call_range = f.find(&call_text);
    let body_range = f.find_in(call_range, body);
    let body = f.tree().other("call", vec![], body_range);
    let lambda_range = f.find_in(call_range, "() ->");
    let lambda_range = TextRange::new(lambda_range.start(), body_range.end());
    let lambda = f.tree().lambda(vec![], body, lambda_range);
    let call = f.template_call(call_range, lambda);
    template_field(f, call, &format!("{call_text}.build()"))
}
