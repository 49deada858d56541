//! Read-only declaration model for one compilation unit.
//!
//! Classes, categories, methods, properties and protocols live in flat
//! vectors owned by [`DeclarationModel`] and refer to each other by id.
//! Nothing in the model is mutated once [`ModelBuilder::build`] returns.

mod builder;
mod location;
mod signature;
pub mod source;

pub use builder::{MethodSpec, ModelBuilder, PropertySpec};
pub use location::SourceLocation;
pub use signature::{MethodSide, MethodSignature, QualifiedName, Selector};
pub use source::UnitSource;

macro_rules! arena_id {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub(crate) usize);
        )*
    };
}

arena_id!(ClassId, CategoryId, MethodId, PropertyId, ProtocolId);

/// The declaration that owns a method or property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclContext {
    Class(ClassId),
    Category(CategoryId),
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub signature: MethodSignature,
    pub owner: DeclContext,
    pub location: SourceLocation,
    /// Already marked `objc_direct`
    pub is_direct: bool,
    /// The frontend found an ancestor or protocol declaration this overrides
    pub is_overriding: bool,
    /// The property this method is an accessor of
    pub property: Option<PropertyId>,
}

impl MethodDecl {
    pub fn selector(&self) -> &Selector {
        &self.signature.selector
    }

    pub fn is_property_accessor(&self) -> bool {
        self.property.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: String,
    pub owner: DeclContext,
    pub location: SourceLocation,
    pub getter: Option<MethodId>,
    pub setter: Option<MethodId>,
}

#[derive(Debug, Clone, Default)]
pub struct Implementation {
    pub location: SourceLocation,
    pub methods: Vec<MethodId>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub superclass: Option<ClassId>,
    pub location: SourceLocation,
    pub methods: Vec<MethodId>,
    pub properties: Vec<PropertyId>,
    /// Visible categories and extensions, in declaration order
    pub categories: Vec<CategoryId>,
    pub implementation: Option<Implementation>,
}

#[derive(Debug, Clone)]
pub struct CategoryDecl {
    /// Empty for an anonymous class extension
    pub name: String,
    pub class: ClassId,
    pub location: SourceLocation,
    pub methods: Vec<MethodId>,
    pub properties: Vec<PropertyId>,
    pub implementation: Option<Implementation>,
}

impl CategoryDecl {
    pub fn is_extension(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ProtocolDecl {
    pub name: String,
    pub location: SourceLocation,
    pub methods: Vec<MethodSignature>,
}

/// Static type of a message receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverKind {
    /// `id` or any unqualified object
    Id,
    /// A bare `Class` value
    Class,
    /// A statically typed receiver
    Typed(String),
}

impl ReceiverKind {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Id | Self::Class)
    }
}

/// One top-level event of the unit, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitItem {
    Implementation(ClassId),
    CategoryImplementation(CategoryId),
    /// `@selector(...)`
    SelectorExpr {
        selector: Selector,
        location: Option<SourceLocation>,
    },
    MessageSend {
        selector: Selector,
        receiver: ReceiverKind,
        location: Option<SourceLocation>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DeclarationModel {
    pub(crate) name: String,
    pub(crate) classes: Vec<ClassDecl>,
    pub(crate) categories: Vec<CategoryDecl>,
    pub(crate) methods: Vec<MethodDecl>,
    pub(crate) properties: Vec<PropertyDecl>,
    pub(crate) protocols: Vec<ProtocolDecl>,
    pub(crate) items: Vec<UnitItem>,
}

impl DeclarationModel {
    /// Name of the compilation unit this model was read from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.0]
    }

    pub fn category(&self, id: CategoryId) -> &CategoryDecl {
        &self.categories[id.0]
    }

    pub fn method(&self, id: MethodId) -> &MethodDecl {
        &self.methods[id.0]
    }

    pub fn property(&self, id: PropertyId) -> &PropertyDecl {
        &self.properties[id.0]
    }

    pub fn protocol(&self, id: ProtocolId) -> &ProtocolDecl {
        &self.protocols[id.0]
    }

    pub fn items(&self) -> &[UnitItem] {
        &self.items
    }

    pub fn protocol_ids(&self) -> impl Iterator<Item = ProtocolId> {
        (0..self.protocols.len()).map(ProtocolId)
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.classes.len()).map(ClassId)
    }

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|class| class.name == name)
            .map(ClassId)
    }

    pub fn category_by_name(&self, class: ClassId, name: &str) -> Option<CategoryId> {
        self.class(class)
            .categories
            .iter()
            .copied()
            .find(|&cat| self.category(cat).name == name)
    }

    pub fn superclass(&self, class: ClassId) -> Option<ClassId> {
        self.class(class).superclass
    }

    /// The class itself followed by each ancestor up to the root.
    ///
    /// Relies on the chain being acyclic, which the loader guarantees.
    pub fn superclass_chain(&self, class: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        std::iter::successors(Some(class), move |&c| self.superclass(c))
    }

    pub fn visible_categories(&self, class: ClassId) -> &[CategoryId] {
        &self.class(class).categories
    }

    /// The class a context belongs to; categories resolve to the class they extend.
    pub fn context_class(&self, context: DeclContext) -> ClassId {
        match context {
            DeclContext::Class(class) => class,
            DeclContext::Category(cat) => self.category(cat).class,
        }
    }

    pub fn method_class(&self, method: MethodId) -> ClassId {
        self.context_class(self.method(method).owner)
    }

    /// Declaration location of a class or category header.
    pub fn context_location(&self, context: DeclContext) -> &SourceLocation {
        match context {
            DeclContext::Class(class) => &self.class(class).location,
            DeclContext::Category(cat) => &self.category(cat).location,
        }
    }

    fn find_in(&self, methods: &[MethodId], signature: &MethodSignature) -> Option<MethodId> {
        methods
            .iter()
            .copied()
            .find(|&m| &self.method(m).signature == signature)
    }

    /// Method declared in the class's own `@interface`.
    pub fn lookup_in_class(&self, class: ClassId, signature: &MethodSignature) -> Option<MethodId> {
        self.find_in(&self.class(class).methods, signature)
    }

    /// Method defined in the class's `@implementation`, if it has one in this unit.
    pub fn lookup_in_implementation(
        &self,
        class: ClassId,
        signature: &MethodSignature,
    ) -> Option<MethodId> {
        self.class(class)
            .implementation
            .as_ref()
            .and_then(|imp| self.find_in(&imp.methods, signature))
    }

    /// Method declared in a category or extension header.
    pub fn lookup_in_category(
        &self,
        category: CategoryId,
        signature: &MethodSignature,
    ) -> Option<MethodId> {
        self.find_in(&self.category(category).methods, signature)
    }

    /// Header-level lookup in either kind of context.
    pub fn lookup_in_context(
        &self,
        context: DeclContext,
        signature: &MethodSignature,
    ) -> Option<MethodId> {
        match context {
            DeclContext::Class(class) => self.lookup_in_class(class, signature),
            DeclContext::Category(cat) => self.lookup_in_category(cat, signature),
        }
    }

    /// Properties declared directly on a context.
    pub fn context_properties(&self, context: DeclContext) -> &[PropertyId] {
        match context {
            DeclContext::Class(class) => &self.class(class).properties,
            DeclContext::Category(cat) => &self.category(cat).properties,
        }
    }
}
