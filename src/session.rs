//! End-to-end generation and merge for one model class.

use crate::codegen::generator::generate_model_code;
use crate::codegen::schema::FieldSource;
use crate::codegen::types::GeneratedModelCode;
use crate::config::GeneratorConfig;
use crate::errors::DbModelResult;
use crate::merge::*;
use crate::source::SourceLocator;
use log::{debug, warn};

/// Generated code together with the plan for merging it.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub code: GeneratedModelCode,
    pub constants: MergePlan,
    pub methods: Vec<MethodPlan>,
}

/// Drives generation, scanning, planning and application.
///
/// Planning only reads the companion locations; nothing is written until
/// [`DbModelSession::apply`] is called with the plan.
#[derive(Debug, Clone, Default)]
pub struct DbModelSession {
    config: GeneratorConfig,
}

impl DbModelSession {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate<S: FieldSource + ?Sized>(&self, source: &S) -> DbModelResult<GeneratedModelCode> {
        generate_model_code(source, &self.config)
    }

    pub fn plan<S, R>(&self, source: &S, locator: &mut R) -> DbModelResult<SessionPlan>
    where
        S: FieldSource + ?Sized,
        R: SourceLocator,
    {
        let code = self.generate(source)?;
        let companions = locator.locate(&code.class_name);
        let declaration = companions.declaration.as_deref();
        let implementation = companions.implementation.as_deref();

        if declaration.is_none() {
            warn!("No interface location for {} - declarations are skipped", code.class_name);
        }
        if implementation.is_none() {
            warn!("No implementation location for {} - definitions are skipped", code.class_name);
        }

        let constants = merge(
            &code.constants,
            &ConstantIndex::scan_location(declaration),
            &ConstantIndex::scan_location(implementation),
            &self.config,
        );
        let methods = plan_methods(
            &code.methods,
            declaration.and_then(|l| ClassBody::locate(l, &code.class_name, Side::Declaration.container_kind())),
            implementation
                .and_then(|l| ClassBody::locate(l, &code.class_name, Side::Implementation.container_kind())),
            &self.config,
        );

        debug!(
            "Planned {}: {} declaration and {} implementation insertions, {} conflicts",
            code.class_name,
            constants.insertions(Side::Declaration),
            constants.insertions(Side::Implementation),
            constants.conflicts().count()
        );

        Ok(SessionPlan {
            code,
            constants,
            methods,
        })
    }

    /// Apply a plan produced by [`DbModelSession::plan`] against the same,
    /// unchanged locations.
    pub fn apply<R: SourceLocator>(&self, plan: &SessionPlan, locator: &mut R) -> DbModelResult<ApplyReport> {
        let class_name = &plan.code.class_name;
        apply_plan(class_name, &plan.constants, &plan.methods, locator.locate(class_name))
    }

    /// Plan and apply in one step.
    pub fn run<S, R>(&self, source: &S, locator: &mut R) -> DbModelResult<(SessionPlan, ApplyReport)>
    where
        S: FieldSource + ?Sized,
        R: SourceLocator,
    {
        let plan = self.plan(source, locator)?;
        let report = self.apply(&plan, locator)?;
        Ok((plan, report))
    }
}
