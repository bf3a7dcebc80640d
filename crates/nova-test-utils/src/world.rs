use nova_types::{ClassDef, ClassKind, ClassOrigin, TypeStore};

pub const REWRITE_JAVA_JAR: &str = "/m2/org/openrewrite/rewrite-java/8.1.2/rewrite-java-8.1.2.jar";
pub const GUAVA_JAR: &str = "/m2/com/google/guava/guava/31.1-jre/guava-31.1-jre.jar";
const REWRITE_CORE_JAR: &str = "/m2/org/openrewrite/rewrite-core/8.1.2/rewrite-core-8.1.2.jar";
const TEMPLATING_JAR: &str =
    "/m2/org/openrewrite/rewrite-templating/1.0.0/rewrite-templating-1.0.0.jar";

/// A class model with the JDK basics, the OpenRewrite visitor and template
/// types, and Guava's `Lists` as a jar-only dependency.
pub fn openrewrite_types() -> TypeStore {
    let mut store = TypeStore::with_minimal_jdk();
    let object = store.class_id("java.lang.Object").expect("minimal jdk has Object");

    for name in ["java.nio.file.Path", "java.util.List"] {
        store.add_class(
            ClassDef::new(name, ClassKind::Interface)
                .with_superclass(object)
                .with_origin(ClassOrigin::Jdk),
        );
    }
    for name in ["java.nio.file.Files", "java.util.Collections"] {
        store.add_class(
            ClassDef::class(name)
                .with_superclass(object)
                .with_origin(ClassOrigin::Jdk),
        );
    }

    let tree_visitor = store.add_class(
        ClassDef::class("org.openrewrite.TreeVisitor")
            .with_superclass(object)
            .with_origin(ClassOrigin::Jar(REWRITE_CORE_JAR.into())),
    );
    store.add_class(
        ClassDef::class("org.openrewrite.Recipe")
            .with_superclass(object)
            .with_origin(ClassOrigin::Jar(REWRITE_CORE_JAR.into())),
    );
    let java_visitor = store.add_class(
        ClassDef::class("org.openrewrite.java.JavaVisitor")
            .with_superclass(tree_visitor)
            .with_origin(ClassOrigin::Jar(REWRITE_JAVA_JAR.into())),
    );
    store.add_class(
        ClassDef::class("org.openrewrite.java.JavaIsoVisitor")
            .with_superclass(java_visitor)
            .with_origin(ClassOrigin::Jar(REWRITE_JAVA_JAR.into())),
    );
    let template = store.add_class(
        ClassDef::class("org.openrewrite.java.JavaTemplate")
            .with_superclass(object)
            .with_origin(ClassOrigin::Jar(REWRITE_JAVA_JAR.into())),
    );
    store.add_class(
        ClassDef::class("org.openrewrite.java.JavaTemplate$Builder")
            .with_superclass(object)
            .nested_in(template),
    );

    store.add_class(
        ClassDef::class("org.openrewrite.java.template.Semantics")
            .with_superclass(object)
            .with_origin(ClassOrigin::Jar(TEMPLATING_JAR.into())),
    );
    store.add_class(
        ClassDef::new("org.openrewrite.java.template.Primitive", ClassKind::Annotation)
            .with_origin(ClassOrigin::Jar(TEMPLATING_JAR.into())),
    );

    store.add_jar_class("com.google.common.collect.Lists", None, GUAVA_JAR);
    store
}
