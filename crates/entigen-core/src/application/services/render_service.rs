//! Render Service - metadata to rendered text.
//!
//! Binds an entity or enum into a [`RenderContext`] and hands it to the
//! template engine together with the matching template. Pure: nothing is
//! written and the input is never mutated.

use tracing::{debug, instrument};

use crate::{
    application::ports::{TemplateEngine, TemplateKind, TemplateSource},
    domain::{EnumCatalog, EnumDefinition, Entity, RenderContext},
    error::EntigenResult,
};

/// Renders entities and enums through the configured templates.
pub struct RenderService {
    templates: Box<dyn TemplateSource>,
    engine: Box<dyn TemplateEngine>,
}

impl RenderService {
    pub fn new(templates: Box<dyn TemplateSource>, engine: Box<dyn TemplateEngine>) -> Self {
        Self { templates, engine }
    }

    /// Render an entity. Its enum references are resolved against `catalog`.
    #[instrument(skip_all, fields(entity = %entity.name))]
    pub fn render_entity(&self, entity: &Entity, catalog: &EnumCatalog<'_>) -> EntigenResult<String> {
        let context = RenderContext::for_entity(entity, catalog)?;
        self.render(TemplateKind::Entity, &context)
    }

    #[instrument(skip_all, fields(enum_name = %enum_def.name))]
    pub fn render_enum(&self, enum_def: &EnumDefinition) -> EntigenResult<String> {
        let context = RenderContext::for_enum(enum_def)?;
        self.render(TemplateKind::Enum, &context)
    }

    fn render(&self, kind: TemplateKind, context: &RenderContext) -> EntigenResult<String> {
        let template = self.templates.load(kind)?;
        let rendered = self
            .engine
            .render(&template.name, &template.content, context)?;

        debug!(template = %template.name, bytes = rendered.len(), "Template rendered");
        Ok(rendered)
    }
}
