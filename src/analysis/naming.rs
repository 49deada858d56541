//! Qualified-name rendering at declaration sites.

use super::resolver::FirstDeclaration;
use crate::model::{DeclContext, DeclarationModel, MethodId, MethodSignature, QualifiedName};

pub struct NameRenderer<'m> {
    model: &'m DeclarationModel,
    system_prefixes: &'m [String],
}

impl<'m> NameRenderer<'m> {
    pub fn new(model: &'m DeclarationModel, system_prefixes: &'m [String]) -> Self {
        Self {
            model,
            system_prefixes,
        }
    }

    /// `-[Class sel]` or `-[Class(Category) sel]` for a signature in a context.
    pub fn render(&self, context: DeclContext, signature: &MethodSignature) -> QualifiedName {
        match context {
            DeclContext::Class(class) => {
                QualifiedName::for_class(&self.model.class(class).name, signature)
            }
            DeclContext::Category(cat) => {
                let category = self.model.category(cat);
                let class_name = &self.model.class(category.class).name;
                QualifiedName::for_category(class_name, &category.name, signature)
            }
        }
    }

    pub fn render_method(&self, context: DeclContext, method: MethodId) -> QualifiedName {
        self.render(context, &self.model.method(method).signature)
    }

    /// Declared outside every configured system prefix.
    pub fn is_user_source(&self, context: DeclContext) -> bool {
        self.model
            .context_location(context)
            .is_user_source(self.system_prefixes)
    }

    /// Name of `method` as seen at its first-declaration site.
    ///
    /// An accessor is named by its property's getter. No name comes back for
    /// sites outside user source, or when the site cannot see the signature.
    pub fn at_first_declaration(
        &self,
        method: MethodId,
        site: Option<FirstDeclaration>,
    ) -> Option<QualifiedName> {
        let site = site?;
        let context = site.context();
        if !self.is_user_source(context) {
            return None;
        }

        let signature = &self.model.method(method).signature;
        let declared = match site {
            FirstDeclaration::Class(class) => self
                .model
                .lookup_in_class(class, signature)
                .or_else(|| self.model.lookup_in_implementation(class, signature)),
            FirstDeclaration::Category(cat) => self.model.lookup_in_category(cat, signature),
        }?;
        self.accessor_aware_name(context, declared)
    }

    /// Render a method, substituting the property's getter for accessors.
    pub fn accessor_aware_name(&self, context: DeclContext, method: MethodId) -> Option<QualifiedName> {
        match self.model.method(method).property {
            Some(property) => {
                let getter = self.model.property(property).getter?;
                Some(self.render_method(context, getter))
            }
            None => Some(self.render_method(context, method)),
        }
    }
}
