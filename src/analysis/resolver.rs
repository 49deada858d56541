//! First-declaration resolution across the inheritance and category lattice.
//!
//! A signature re-declared anywhere along a superclass chain marks an
//! override boundary. Only the most-ancestral declaration is the contract
//! other code may reach through dynamic dispatch, so the walk never stops at
//! the first hit.

use crate::model::{
    CategoryId, ClassId, DeclContext, DeclarationModel, MethodId, MethodSignature,
};

/// Where a signature is first declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirstDeclaration {
    /// In a class header, or an ancestor's implementation
    Class(ClassId),
    /// In a category or extension header
    Category(CategoryId),
}

impl FirstDeclaration {
    pub fn context(self) -> DeclContext {
        match self {
            Self::Class(class) => DeclContext::Class(class),
            Self::Category(cat) => DeclContext::Category(cat),
        }
    }

    /// The class this site belongs to; a category answers with its class.
    pub fn class(self, model: &DeclarationModel) -> ClassId {
        model.context_class(self.context())
    }
}

pub struct FirstDeclarationResolver<'m> {
    model: &'m DeclarationModel,
}

impl<'m> FirstDeclarationResolver<'m> {
    pub fn new(model: &'m DeclarationModel) -> Self {
        Self { model }
    }

    /// Resolve the first declaration of a method's signature, starting at its class.
    pub fn resolve(&self, method: MethodId) -> Option<FirstDeclaration> {
        let decl = self.model.method(method);
        let start = self.model.context_class(decl.owner);
        self.resolve_signature(start, &decl.signature)
    }

    /// Walk from `start` to the root; the last match found wins.
    ///
    /// At each level the class header is consulted first, then (for
    /// ancestors only) the class's implementation, and only when neither
    /// declares the signature are the visible categories scanned.
    pub fn resolve_signature(
        &self,
        start: ClassId,
        signature: &MethodSignature,
    ) -> Option<FirstDeclaration> {
        let mut found = None;
        for cursor in self.model.superclass_chain(start) {
            if self.class_declares(cursor, start, signature) {
                found = Some(FirstDeclaration::Class(cursor));
                continue;
            }
            if let Some(cat) = self.category_declaring(cursor, signature) {
                found = Some(FirstDeclaration::Category(cat));
            }
        }
        found
    }

    fn class_declares(&self, cursor: ClassId, start: ClassId, signature: &MethodSignature) -> bool {
        self.model.lookup_in_class(cursor, signature).is_some()
            || (cursor != start
                && self
                    .model
                    .lookup_in_implementation(cursor, signature)
                    .is_some())
    }

    fn category_declaring(&self, class: ClassId, signature: &MethodSignature) -> Option<CategoryId> {
        self.model
            .visible_categories(class)
            .iter()
            .copied()
            .find(|&cat| self.model.lookup_in_category(cat, signature).is_some())
    }

    /// True when the first declaration lives above the class `class`.
    pub fn is_more_ancestral(&self, site: Option<FirstDeclaration>, class: ClassId) -> bool {
        site.is_some_and(|site| site.class(self.model) != class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodSpec, ModelBuilder, SourceLocation};

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("/src/Chain.h", line, 1)
    }

    fn declare(builder: &mut ModelBuilder, owner: DeclContext, selector: &str, line: u32) -> MethodId {
        builder.declare_method(owner, MethodSpec::new(MethodSignature::instance(selector), loc(line)))
    }

    #[test]
    fn test_most_ancestral_class_wins() {
        let mut b = ModelBuilder::new("unit");
        let root = b.class("Root", None, loc(1));
        let mid = b.class("Mid", Some(root), loc(2));
        let leaf = b.class("Leaf", Some(mid), loc(3));
        declare(&mut b, DeclContext::Class(root), "foo", 4);
        let mid_foo = declare(&mut b, DeclContext::Class(mid), "foo", 5);
        let model = b.build().unwrap();
        let resolver = FirstDeclarationResolver::new(&model);

        assert_eq!(resolver.resolve(mid_foo), Some(FirstDeclaration::Class(root)));
        let sig = MethodSignature::instance("foo");
        for class in [root, mid, leaf] {
            assert_eq!(
                resolver.resolve_signature(class, &sig),
                Some(FirstDeclaration::Class(root))
            );
        }
    }

    #[test]
    fn test_ancestral_category_beats_descendant_class() {
        let mut b = ModelBuilder::new("unit");
        let root = b.class("Root", None, loc(1));
        let leaf = b.class("Leaf", Some(root), loc(2));
        let cat = b.category(root, "Hooks", loc(3));
        declare(&mut b, DeclContext::Category(cat), "hook", 4);
        let leaf_hook = declare(&mut b, DeclContext::Class(leaf), "hook", 5);
        let model = b.build().unwrap();

        let resolver = FirstDeclarationResolver::new(&model);
        assert_eq!(resolver.resolve(leaf_hook), Some(FirstDeclaration::Category(cat)));
    }

    #[test]
    fn test_class_header_preferred_over_category_at_same_level() {
        let mut b = ModelBuilder::new("unit");
        let a = b.class("A", None, loc(1));
        let cat = b.category(a, "Extras", loc(2));
        declare(&mut b, DeclContext::Category(cat), "run", 3);
        let run = declare(&mut b, DeclContext::Class(a), "run", 4);
        let model = b.build().unwrap();

        let resolver = FirstDeclarationResolver::new(&model);
        assert_eq!(resolver.resolve(run), Some(FirstDeclaration::Class(a)));
    }

    #[test]
    fn test_starting_class_implementation_is_not_consulted() {
        let mut b = ModelBuilder::new("unit");
        let a = b.class("A", None, loc(1));
        let helper = b.implement_class_method(
            a,
            MethodSpec::new(MethodSignature::instance("helper"), loc(2)),
        );
        let child = b.class("B", Some(a), loc(3));
        let model = b.build().unwrap();

        let resolver = FirstDeclarationResolver::new(&model);
        assert_eq!(resolver.resolve(helper), None);
        assert_eq!(
            resolver.resolve_signature(child, &MethodSignature::instance("helper")),
            Some(FirstDeclaration::Class(a))
        );
    }

    #[test]
    fn test_side_distinguishes_signatures() {
        let mut b = ModelBuilder::new("unit");
        let a = b.class("A", None, loc(1));
        b.declare_method(
            DeclContext::Class(a),
            MethodSpec::new(MethodSignature::class("make"), loc(2)),
        );
        let model = b.build().unwrap();

        let resolver = FirstDeclarationResolver::new(&model);
        assert_eq!(resolver.resolve_signature(a, &MethodSignature::instance("make")), None);
    }
}
