//! Per-unit driver tying the template passes together.

use std::cell::OnceCell;

use nova_config::TemplatesConfig;
use nova_core::LineIndex;
use nova_types::{Diagnostic, Span};

use crate::deps::collect_dependencies;
use crate::emit::{emit_artifact, parameter_imports, GeneratedArtifact};
use crate::error::TemplateError;
use crate::filer::Filer;
use crate::matcher::{CallSite, CallSites, MatchEvent};
use crate::owner::{resolve_owner, OwnerResolution};
use crate::params::locate_parameters;
use crate::primitives::PrimitiveTable;
use crate::resolve::Resolver;
use crate::rewrite::rewrite_template;
use crate::tree::{CompilationUnit, NodeId, NodeKind};

pub const RESOLUTION_FAILED: &str = "template-resolution";
pub const NULL_TEMPLATE_NAME: &str = "template-null-name";
pub const OUTSIDE_VISITOR: &str = "template-outside-visitor";
pub const REWRITE_FAILED: &str = "template-rewrite";

/// Receives recoverable problems found while processing.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Call sites that matched the template factory shape.
    pub candidates: usize,
    /// Qualified names of the artifacts written, in order.
    pub generated: Vec<String>,
    /// Call sites dropped with a warning.
    pub skipped: usize,
}

#[derive(Clone, Debug)]
pub struct TemplateProcessor {
    config: TemplatesConfig,
    primitives: PrimitiveTable,
}

impl TemplateProcessor {
    pub fn new(config: TemplatesConfig) -> Self {
        Self {
            config,
            primitives: PrimitiveTable::java(),
        }
    }

    pub fn config(&self) -> &TemplatesConfig {
        &self.config
    }

    /// Template call sites of `unit`, discovered lazily in pre-order.
    pub fn call_sites<'a>(
        &'a self,
        unit: &'a CompilationUnit,
        resolver: &'a dyn Resolver,
    ) -> CallSites<'a> {
        CallSites::new(unit, resolver, &self.config)
    }

    /// Build the artifact for one matched call site.
    ///
    /// `Ok(None)` means the call site was skipped and a warning reported to
    /// `sink`.
    pub fn process_call_site(
        &self,
        unit: &CompilationUnit,
        resolver: &dyn Resolver,
        site: &CallSite,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Option<GeneratedArtifact>, TemplateError> {
        self.build_artifact(resolver, site, &mut Warnings::new(unit, sink))
    }

    fn build_artifact(
        &self,
        resolver: &dyn Resolver,
        site: &CallSite,
        warnings: &mut Warnings<'_>,
    ) -> Result<Option<GeneratedArtifact>, TemplateError> {
        let unit = warnings.unit;
        let types = resolver.types();

        let lambda = match locate_parameters(
            unit,
            resolver,
            site.lambda,
            &self.config.primitive_annotation,
        ) {
            Ok(lambda) => lambda,
            Err(error) => {
                tracing::debug!(target: "nova.templates", %error, "parameter attribution failed");
                warnings.warn(
                    RESOLUTION_FAILED,
                    "Had trouble type attributing the template.",
                    site.lambda,
                );
                return Ok(None);
            }
        };

        let template = match rewrite_template(unit, &lambda, types, &self.primitives) {
            Ok(template) => template,
            Err(error) => {
                warnings.warn(
                    REWRITE_FAILED,
                    &format!("Can't rewrite the template body: {error}."),
                    lambda.body,
                );
                return Ok(None);
            }
        };

        let Some(name) = template_name(unit, site.template_name) else {
            warnings.warn(
                NULL_TEMPLATE_NAME,
                "Can't compile a template with a null name.",
                site.template_name,
            );
            return Ok(None);
        };

        let path = unit.ancestor_path(site.lambda);
        let owner = match resolve_owner(unit, resolver, &self.config, &path, &name)? {
            OwnerResolution::Found(owner) => owner,
            OwnerResolution::OutsideVisitor => {
                warnings.warn(
                    OUTSIDE_VISITOR,
                    "Can't compile a template outside of a visitor or recipe.",
                    site.call,
                );
                return Ok(None);
            }
            OwnerResolution::Unresolved(error) => {
                tracing::debug!(target: "nova.templates", %error, "owner attribution failed");
                warnings.warn(
                    RESOLUTION_FAILED,
                    "Had trouble type attributing the template.",
                    site.call,
                );
                return Ok(None);
            }
        };

        let deps = collect_dependencies(
            unit,
            &site.resolution,
            site.lambda,
            &lambda.markers(),
            types,
            &self.config.implicit_package,
        );
        let imports = parameter_imports(&lambda, types, &self.config.implicit_package);

        tracing::debug!(
            target: "nova.templates",
            owner = %owner.qualified_name,
            imports = deps.imports.len(),
            static_imports = deps.static_imports.len(),
            "template extracted"
        );
        Ok(Some(emit_artifact(
            &self.config,
            &owner,
            &template,
            &imports,
            &deps,
        )))
    }

    /// Generate every template of `unit` into `filer`.
    ///
    /// Recoverable problems go to `sink` and processing continues. The first
    /// fatal error stops the unit; artifacts written before it are kept.
    pub fn process(
        &self,
        unit: &CompilationUnit,
        resolver: &dyn Resolver,
        filer: &mut dyn Filer,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ProcessSummary, TemplateError> {
        let span = tracing::debug_span!("template_unit", file = unit.file().to_raw());
        let _guard = span.enter();

        let mut warnings = Warnings::new(unit, sink);
        let mut summary = ProcessSummary::default();
        for event in self.call_sites(unit, resolver) {
            match event {
                MatchEvent::Unresolved { call, error } => {
                    tracing::debug!(target: "nova.templates", %error, "call site attribution failed");
                    warnings.warn(
                        RESOLUTION_FAILED,
                        "Had trouble type attributing the template.",
                        call,
                    );
                    summary.skipped += 1;
                }
                MatchEvent::Candidate(site) => {
                    summary.candidates += 1;
                    tracing::debug!(target: "nova.templates", call = ?site.call, name = %site.name, "template call site");

                    let Some(artifact) = self.build_artifact(resolver, &site, &mut warnings)?
                    else {
                        summary.skipped += 1;
                        continue;
                    };
                    filer
                        .create(&artifact)
                        .map_err(|source| TemplateError::ArtifactWrite {
                            name: artifact.qualified_name.clone(),
                            source,
                        })?;
                    tracing::info!(
                        target: "nova.templates",
                        name = %artifact.qualified_name,
                        bytes = artifact.text.len(),
                        "generated template"
                    );
                    summary.generated.push(artifact.qualified_name);
                }
            }
        }
        Ok(summary)
    }
}

/// Reports recoverable problems for one unit. The line index used for log
/// positions is built on the first warning and shared by the rest.
struct Warnings<'a> {
    unit: &'a CompilationUnit,
    sink: &'a mut dyn DiagnosticSink,
    lines: OnceCell<LineIndex>,
}

impl<'a> Warnings<'a> {
    fn new(unit: &'a CompilationUnit, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            unit,
            sink,
            lines: OnceCell::new(),
        }
    }

    fn lines(&self) -> &LineIndex {
        self.lines.get_or_init(|| LineIndex::new(self.unit.source_bytes()))
    }

    fn warn(&mut self, code: &'static str, message: &str, node: NodeId) {
        let range = self.unit.range(node);
        let pos = self.lines().line_col(range.start());
        tracing::warn!(
            target: "nova.templates",
            file = self.unit.file().to_raw(),
            line = pos.line + 1,
            col = pos.col + 1,
            code,
            "{message}"
        );
        let span = Span::new(u32::from(range.start()) as usize, u32::from(range.end()) as usize);
        self.sink.report(Diagnostic::warning(code, message, Some(span)));
    }
}

/// Constant value of the template-name argument; `None` for `null` or a
/// non-literal argument.
fn template_name(unit: &CompilationUnit, arg: NodeId) -> Option<String> {
    match unit.kind(arg) {
        NodeKind::Literal(literal) => literal.constant_text(),
        _ => None,
    }
}
