//! Per-method eligibility rules for class and category implementations.

use super::naming::NameRenderer;
use super::resolver::{FirstDeclaration, FirstDeclarationResolver};
use super::tracker::{Admission, DirectableEntry, ExclusionTracker};
use crate::model::{
    CategoryId, ClassId, DeclContext, DeclarationModel, MethodId, PropertyId, QualifiedName,
    Selector,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyDirect,
    Teardown,
    /// Category methods flagged as overriding are left alone
    Overriding,
    /// The property has no getter to stand for it
    NoGetter,
}

/// Outcome of classifying one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Skipped(SkipReason),
    NameBlocked(QualifiedName),
    /// Must stay dynamic, but its first-declaration site yields no name
    Unnamed,
    /// A setter; its getter represents the property
    Deferred,
    Candidate(Admission),
}

pub struct Classifier<'m> {
    model: &'m DeclarationModel,
    resolver: FirstDeclarationResolver<'m>,
    names: NameRenderer<'m>,
    teardown_selectors: &'m [String],
}

impl<'m> Classifier<'m> {
    pub fn new(
        model: &'m DeclarationModel,
        system_prefixes: &'m [String],
        teardown_selectors: &'m [String],
    ) -> Self {
        Self {
            model,
            resolver: FirstDeclarationResolver::new(model),
            names: NameRenderer::new(model, system_prefixes),
            teardown_selectors,
        }
    }

    fn is_teardown(&self, selector: &Selector) -> bool {
        self.teardown_selectors
            .iter()
            .any(|teardown| teardown == selector.as_str())
    }

    /// Classify a method visited while walking `class`'s primary implementation.
    pub fn classify_class_method(
        &self,
        class: ClassId,
        method: MethodId,
        tracker: &mut ExclusionTracker,
    ) -> Verdict {
        let decl = self.model.method(method);
        debug!(location = %decl.location, name = %decl.selector(), "visiting method");

        if decl.is_direct {
            return Verdict::Skipped(SkipReason::AlreadyDirect);
        }
        if self.is_teardown(decl.selector()) {
            return Verdict::Skipped(SkipReason::Teardown);
        }

        let site = self.resolver.resolve(method);

        // Overrides need dynamic dispatch to stay polymorphic.
        if decl.is_overriding {
            return self.block(tracker, self.names.at_first_declaration(method, site));
        }
        // Declared higher up without the frontend flagging an override,
        // e.g. a property re-declared over an ancestor's plain method.
        if self.resolver.is_more_ancestral(site, class) {
            return self.block(tracker, self.names.at_first_declaration(method, site));
        }

        let (first_decl, in_header) = self.header_declaration(method, site);
        if in_header {
            if let Some(property) = self.model.method(first_decl).property {
                if let Some(verdict) = self.synchronize_accessors(property, method, tracker) {
                    return verdict;
                }
            }
        }

        let owner = site
            .map(FirstDeclaration::context)
            .unwrap_or_else(|| DeclContext::Class(self.model.method_class(first_decl)));
        self.admit(tracker, owner, first_decl)
    }

    // The declaration that represents `method` at its first-declaration site,
    // and whether that declaration is in a header.
    fn header_declaration(&self, method: MethodId, site: Option<FirstDeclaration>) -> (MethodId, bool) {
        let signature = &self.model.method(method).signature;
        match site {
            Some(FirstDeclaration::Class(class)) => match self.model.lookup_in_class(class, signature) {
                Some(header) => (header, true),
                None => (
                    self.model
                        .lookup_in_implementation(class, signature)
                        .unwrap_or(method),
                    false,
                ),
            },
            Some(FirstDeclaration::Category(cat)) => (
                self.model.lookup_in_category(cat, signature).unwrap_or(method),
                true,
            ),
            None => (method, false),
        }
    }

    /// A getter/setter pair is either direct together or not at all.
    ///
    /// Returns `None` when neither accessor is constrained from above.
    fn synchronize_accessors(
        &self,
        property: PropertyId,
        method: MethodId,
        tracker: &mut ExclusionTracker,
    ) -> Option<Verdict> {
        let prop = self.model.property(property);
        let visited = &self.model.method(method).signature;

        if let Some(setter) = prop.setter {
            let setter_site = self.resolver.resolve(setter);
            let setter_class = self.model.method_class(setter);
            if let Some(getter) = prop.getter {
                if self.resolver.is_more_ancestral(setter_site, setter_class) {
                    if let Some(name) = self.names.at_first_declaration(setter, setter_site) {
                        tracker.block_name(&name);
                    }
                    let getter_name = self
                        .names
                        .at_first_declaration(getter, setter_site)
                        .unwrap_or_else(|| self.names.render_method(prop.owner, getter));
                    return Some(self.block(tracker, Some(getter_name)));
                }
            }
            if &self.model.method(setter).signature == visited {
                return Some(Verdict::Deferred);
            }
        }

        let getter = prop.getter?;
        let getter_site = self.resolver.resolve(getter);
        if self
            .resolver
            .is_more_ancestral(getter_site, self.model.method_class(getter))
        {
            return Some(self.block(tracker, self.names.at_first_declaration(getter, getter_site)));
        }
        None
    }

    /// Classify a method defined in a named category's implementation.
    pub fn classify_category_method(
        &self,
        category: CategoryId,
        method: MethodId,
        tracker: &mut ExclusionTracker,
    ) -> Verdict {
        let decl = self.model.method(method);
        debug!(location = %decl.location, name = %decl.selector(), "visiting category method");

        if decl.is_direct {
            return Verdict::Skipped(SkipReason::AlreadyDirect);
        }
        if decl.is_overriding {
            return Verdict::Skipped(SkipReason::Overriding);
        }

        let class = self.model.category(category).class;

        // Extensions merge into the primary class's surface.
        if let Some(property) = decl.property {
            if self.declared_on_category_or_extension(property, category) {
                return self.admit_property_getter(tracker, DeclContext::Class(class), property);
            }
        }

        // Declared through one category or extension but implemented in another.
        if let Some((property, declaring)) = self.aliased_property(class, category, decl.selector()) {
            let name = self
                .model
                .property(property)
                .getter
                .map(|getter| self.names.render_method(DeclContext::Category(declaring), getter));
            return self.block(tracker, name);
        }

        if let Some(header) = self.model.lookup_in_category(category, &decl.signature) {
            return match self.model.method(header).property {
                Some(property) => {
                    self.admit_property_getter(tracker, DeclContext::Category(category), property)
                }
                None => self.admit(tracker, DeclContext::Category(category), header),
            };
        }

        // Not in this category's header but declared elsewhere in the
        // hierarchy: the category is replacing an inherited hook.
        let site = self.resolver.resolve(method);
        if site.is_some() {
            return self.block(tracker, self.names.at_first_declaration(method, site));
        }

        self.admit(tracker, DeclContext::Category(category), method)
    }

    fn declared_on_category_or_extension(&self, property: PropertyId, category: CategoryId) -> bool {
        match self.model.property(property).owner {
            DeclContext::Category(owner) => {
                owner == category || self.model.category(owner).is_extension()
            }
            DeclContext::Class(_) => false,
        }
    }

    // First property in another visible category or extension whose getter
    // or setter carries this selector.
    fn aliased_property(
        &self,
        class: ClassId,
        implementing: CategoryId,
        selector: &Selector,
    ) -> Option<(PropertyId, CategoryId)> {
        self.model
            .visible_categories(class)
            .iter()
            .copied()
            .filter(|&cat| cat != implementing)
            .find_map(|cat| {
                self.model
                    .category(cat)
                    .properties
                    .iter()
                    .copied()
                    .find(|&prop| self.has_accessor_named(prop, selector))
                    .map(|prop| (prop, cat))
            })
    }

    fn has_accessor_named(&self, property: PropertyId, selector: &Selector) -> bool {
        let prop = self.model.property(property);
        [prop.getter, prop.setter]
            .into_iter()
            .flatten()
            .any(|accessor| self.model.method(accessor).selector() == selector)
    }

    fn block(
        &self,
        tracker: &mut ExclusionTracker,
        name: Option<QualifiedName>,
    ) -> Verdict {
        match name {
            Some(name) => {
                debug!(name = %name, "name blocked");
                tracker.block_name(&name);
                Verdict::NameBlocked(name)
            }
            None => {
                debug!("no user-visible first declaration to block");
                Verdict::Unnamed
            }
        }
    }

    fn admit(&self, tracker: &mut ExclusionTracker, owner: DeclContext, method: MethodId) -> Verdict {
        let decl = self.model.method(method);
        let entry = DirectableEntry {
            name: self.names.render_method(owner, method),
            location: decl.location.clone(),
            is_property_accessor: decl.is_property_accessor(),
        };
        Verdict::Candidate(tracker.admit(entry))
    }

    // The getter stands for the whole property and is located at the @property.
    fn admit_property_getter(
        &self,
        tracker: &mut ExclusionTracker,
        owner: DeclContext,
        property: PropertyId,
    ) -> Verdict {
        let prop = self.model.property(property);
        let Some(getter) = prop.getter else {
            return Verdict::Skipped(SkipReason::NoGetter);
        };
        let entry = DirectableEntry {
            name: self.names.render_method(owner, getter),
            location: prop.location.clone(),
            is_property_accessor: true,
        };
        Verdict::Candidate(tracker.admit(entry))
    }
}
