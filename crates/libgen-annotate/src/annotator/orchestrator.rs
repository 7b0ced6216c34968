//! Orchestration of one annotation pass over an API model.
//!
//! ## Usage
//!
//! ```ignore
//! let api: Api = serde_json::from_str(&model_json)?;
//! let options = CodecOptions::from_options([("per-service-features", "true")])?;
//!
//! let output = Annotator::new(&api, options).annotate()?;
//! println!("{} messages, {} warnings", output.stats.messages_annotated, output.stats.warnings.len());
//! ```

use petgraph::{algo::toposort, graphmap::DiGraphMap};
use strum::Display;

use super::{
  AnnotationContext,
  annotations::{AnnotatedModel, CrateAnnotation, ExternPackageAnnotation},
  config::CodecOptions,
  enums::annotate_enum,
  errors::AnnotateError,
  features,
  messages::{annotate_basic_message, annotate_message},
  methods::{RetainedService, annotate_service},
  metrics::AnnotationStats,
  naming::identifiers::to_crate_namespace,
};
use crate::model::{Api, ApiIndex};

/// Steps of an annotation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
enum Phase {
  OwnTypes,
  Services,
  ExternalTypes,
  FeatureGates,
}

impl Phase {
  const ALL: [Phase; 4] = [Phase::OwnTypes, Phase::Services, Phase::ExternalTypes, Phase::FeatureGates];

  /// Phases whose annotations must exist before this one runs.
  fn prerequisites(self) -> &'static [Phase] {
    match self {
      Phase::OwnTypes => &[],
      Phase::Services => &[Phase::OwnTypes],
      Phase::ExternalTypes => &[Phase::Services],
      Phase::FeatureGates => &[Phase::OwnTypes, Phase::Services, Phase::ExternalTypes],
    }
  }
}

fn phase_order() -> Result<Vec<Phase>, AnnotateError> {
  let mut graph = DiGraphMap::<Phase, ()>::new();
  for phase in Phase::ALL {
    graph.add_node(phase);
    for prerequisite in phase.prerequisites() {
      graph.add_edge(*prerequisite, phase, ());
    }
  }
  toposort(&graph, None).map_err(|cycle| AnnotateError::PhaseCycle(cycle.node_id().to_string()))
}

/// The annotated model together with pass statistics.
#[derive(Debug)]
pub struct AnnotationOutput {
  pub model: AnnotatedModel,
  pub stats: AnnotationStats,
}

/// Runs the annotation pass for one crate.
pub struct Annotator<'a> {
  api: &'a Api,
  options: CodecOptions,
}

impl<'a> Annotator<'a> {
  pub fn new(api: &'a Api, options: CodecOptions) -> Self {
    Self { api, options }
  }

  /// Annotates every entity of the model exactly once.
  ///
  /// # Errors
  ///
  /// Fails on configuration problems, such as a referenced package without a
  /// `package:` mapping. Model integrity problems are reported as warnings in
  /// the returned stats instead.
  pub fn annotate(&self) -> Result<AnnotationOutput, AnnotateError> {
    let index = ApiIndex::new(self.api);
    let crate_name = self.options.crate_name(&self.api.package_name);
    let ctx = AnnotationContext::new(&index, &self.options, to_crate_namespace(&crate_name));

    let mut model = AnnotatedModel::default();
    let mut stats = AnnotationStats::default();
    let mut retained: Vec<RetainedService<'_>> = vec![];

    for phase in phase_order()? {
      tracing::debug!(%phase, "annotation phase");
      match phase {
        Phase::OwnTypes => self.annotate_own_types(&ctx, &mut model, &mut stats)?,
        Phase::Services => {
          for service in &self.api.services {
            if let Some(kept) = annotate_service(&ctx, service, &mut model, &mut stats)? {
              retained.push(kept);
            }
          }
          features::check_service_count(&ctx, retained.len(), &mut stats);
        }
        Phase::ExternalTypes => self.annotate_external_types(&ctx, &mut model, &mut stats)?,
        Phase::FeatureGates => {
          if self.options.per_service_features {
            features::apply_feature_gates(&ctx, &retained, &mut model);
          }
        }
      }
    }

    let all_features = if self.options.per_service_features {
      features::all_features(&retained)
    } else {
      vec![]
    };
    stats.record_features(all_features.len());
    model.crate_info = CrateAnnotation {
      crate_namespace: ctx.qualifier.crate_namespace().to_string(),
      crate_name,
      module_path: self.options.module_path.clone(),
      title: self.api.title.clone(),
      per_service_features: self.options.per_service_features,
      default_features: features::default_features(&ctx, &all_features),
      all_features,
      generate_setter_samples: self.options.generate_setter_samples,
      generate_rpc_samples: self.options.generate_rpc_samples,
      template_override: self.options.template_override.clone(),
      version: self.options.version.clone(),
      copyright_year: self.options.copyright_year.clone(),
      extern_packages: self
        .options
        .extern_packages
        .iter()
        .map(|pkg| ExternPackageAnnotation {
          alias: pkg.alias.clone(),
          crate_name: pkg.crate_name.clone(),
          sources: pkg.sources.clone(),
          feature: pkg.feature.clone(),
        })
        .collect(),
      services: retained.iter().map(|kept| kept.service.id.clone()).collect(),
    };

    tracing::debug!(
      messages = stats.messages_annotated,
      enums = stats.enums_annotated,
      methods = stats.methods_annotated,
      warnings = stats.warnings.len(),
      "annotation complete"
    );
    Ok(AnnotationOutput { model, stats })
  }

  fn annotate_own_types(
    &self,
    ctx: &AnnotationContext<'_>,
    model: &mut AnnotatedModel,
    stats: &mut AnnotationStats,
  ) -> Result<(), AnnotateError> {
    for enumeration in self.api.enums.iter().filter(|e| ctx.index.is_own_package(&e.package)) {
      annotate_enum(ctx, enumeration, false, model)?;
      stats.record_enum();
    }
    for message in self
      .api
      .messages
      .iter()
      .filter(|m| !m.is_map_entry && ctx.index.is_own_package(&m.package))
    {
      annotate_message(ctx, message, model, stats)?;
      stats.record_message();
    }
    Ok(())
  }

  /// Naming-only annotations for types from other packages.
  fn annotate_external_types(
    &self,
    ctx: &AnnotationContext<'_>,
    model: &mut AnnotatedModel,
    stats: &mut AnnotationStats,
  ) -> Result<(), AnnotateError> {
    for enumeration in self.api.enums.iter().filter(|e| !ctx.index.is_own_package(&e.package)) {
      annotate_enum(ctx, enumeration, true, model)?;
      stats.record_external_type();
    }
    for message in self
      .api
      .messages
      .iter()
      .filter(|m| !m.is_map_entry && !ctx.index.is_own_package(&m.package))
    {
      annotate_basic_message(ctx, message, model)?;
      stats.record_external_type();
    }
    Ok(())
  }
}
