use super::{
    CategoryDecl, CategoryId, ClassDecl, ClassId, DeclContext, DeclarationModel, Implementation,
    MethodDecl, MethodId, MethodSide, MethodSignature, PropertyDecl, PropertyId, ProtocolDecl,
    ProtocolId, Selector, SourceLocation, UnitItem,
};
use crate::core::{Error, Result};
use std::collections::HashSet;

/// A method as handed over by the frontend.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    pub signature: MethodSignature,
    pub location: SourceLocation,
    pub is_direct: bool,
    pub is_overriding: bool,
}

impl MethodSpec {
    pub fn new(signature: MethodSignature, location: SourceLocation) -> Self {
        Self {
            signature,
            location,
            is_direct: false,
            is_overriding: false,
        }
    }

    pub fn direct(mut self) -> Self {
        self.is_direct = true;
        self
    }

    pub fn overriding(mut self) -> Self {
        self.is_overriding = true;
        self
    }
}

/// A `@property` declaration.
#[derive(Debug, Clone)]
pub struct PropertySpec {
    pub name: String,
    pub location: SourceLocation,
    pub getter: Option<Selector>,
    pub setter: Option<Selector>,
    pub readonly: bool,
    pub class_property: bool,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
            getter: None,
            setter: None,
            readonly: false,
            class_property: false,
        }
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn class_property(mut self) -> Self {
        self.class_property = true;
        self
    }

    pub fn getter(mut self, selector: &str) -> Self {
        self.getter = Some(Selector::new(selector));
        self
    }

    pub fn setter(mut self, selector: &str) -> Self {
        self.setter = Some(Selector::new(selector));
        self
    }

    fn side(&self) -> MethodSide {
        if self.class_property {
            MethodSide::Class
        } else {
            MethodSide::Instance
        }
    }

    fn getter_signature(&self) -> MethodSignature {
        let selector = self
            .getter
            .clone()
            .unwrap_or_else(|| Selector::new(self.name.as_str()));
        MethodSignature::new(selector, self.side())
    }

    fn setter_signature(&self) -> Option<MethodSignature> {
        if self.readonly {
            return None;
        }
        let selector = self
            .setter
            .clone()
            .unwrap_or_else(|| Selector::setter_for(&self.name));
        Some(MethodSignature::new(selector, self.side()))
    }
}

/// Incremental construction of a [`DeclarationModel`].
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: DeclarationModel,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            model: DeclarationModel {
                name: name.into(),
                ..DeclarationModel::default()
            },
        }
    }

    /// Read access to what has been built so far.
    pub fn model(&self) -> &DeclarationModel {
        &self.model
    }

    pub fn class(
        &mut self,
        name: impl Into<String>,
        superclass: Option<ClassId>,
        location: SourceLocation,
    ) -> ClassId {
        let id = ClassId(self.model.classes.len());
        self.model.classes.push(ClassDecl {
            name: name.into(),
            superclass,
            location,
            methods: Vec::new(),
            properties: Vec::new(),
            categories: Vec::new(),
            implementation: None,
        });
        id
    }

    pub fn set_superclass(&mut self, class: ClassId, superclass: Option<ClassId>) {
        self.model.classes[class.0].superclass = superclass;
    }

    /// A named category; it becomes visible on `class` in call order.
    pub fn category(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        location: SourceLocation,
    ) -> CategoryId {
        let id = CategoryId(self.model.categories.len());
        self.model.categories.push(CategoryDecl {
            name: name.into(),
            class,
            location,
            methods: Vec::new(),
            properties: Vec::new(),
            implementation: None,
        });
        self.model.classes[class.0].categories.push(id);
        id
    }

    /// An anonymous class extension.
    pub fn extension(&mut self, class: ClassId, location: SourceLocation) -> CategoryId {
        self.category(class, "", location)
    }

    pub fn protocol(
        &mut self,
        name: impl Into<String>,
        location: SourceLocation,
        methods: Vec<MethodSignature>,
    ) -> ProtocolId {
        let id = ProtocolId(self.model.protocols.len());
        self.model.protocols.push(ProtocolDecl {
            name: name.into(),
            location,
            methods,
        });
        id
    }

    fn push_method(&mut self, owner: DeclContext, spec: MethodSpec) -> MethodId {
        let id = MethodId(self.model.methods.len());
        self.model.methods.push(MethodDecl {
            signature: spec.signature,
            owner,
            location: spec.location,
            is_direct: spec.is_direct,
            is_overriding: spec.is_overriding,
            property: None,
        });
        id
    }

    /// A method declared in a class or category header.
    pub fn declare_method(&mut self, owner: DeclContext, spec: MethodSpec) -> MethodId {
        let id = self.push_method(owner, spec);
        match owner {
            DeclContext::Class(class) => self.model.classes[class.0].methods.push(id),
            DeclContext::Category(cat) => self.model.categories[cat.0].methods.push(id),
        }
        id
    }

    /// Make sure the context has an `@implementation`, creating an empty one at `location`.
    pub fn implementation(&mut self, context: DeclContext, location: SourceLocation) {
        let slot = match context {
            DeclContext::Class(class) => &mut self.model.classes[class.0].implementation,
            DeclContext::Category(cat) => &mut self.model.categories[cat.0].implementation,
        };
        slot.get_or_insert_with(|| Implementation {
            location,
            methods: Vec::new(),
        });
    }

    /// A method defined in the class's `@implementation`.
    ///
    /// It is linked to a property of the class header or of one of the
    /// class's extensions when it implements one of that property's accessors.
    pub fn implement_class_method(&mut self, class: ClassId, spec: MethodSpec) -> MethodId {
        let location = spec.location.clone();
        self.implementation(DeclContext::Class(class), location);
        let id = self.push_method(DeclContext::Class(class), spec);
        if let Some(imp) = self.model.classes[class.0].implementation.as_mut() {
            imp.methods.push(id);
        }

        let mut candidates = vec![DeclContext::Class(class)];
        candidates.extend(
            self.model.classes[class.0]
                .categories
                .iter()
                .copied()
                .filter(|&cat| self.model.category(cat).is_extension())
                .map(DeclContext::Category),
        );
        self.model.methods[id.0].property = self.accessor_property(&candidates, id);
        id
    }

    /// A method defined in a category's `@implementation`.
    ///
    /// Only the category's own properties are linked.
    pub fn implement_category_method(&mut self, category: CategoryId, spec: MethodSpec) -> MethodId {
        let location = spec.location.clone();
        self.implementation(DeclContext::Category(category), location);
        let id = self.push_method(DeclContext::Category(category), spec);
        if let Some(imp) = self.model.categories[category.0].implementation.as_mut() {
            imp.methods.push(id);
        }
        self.model.methods[id.0].property =
            self.accessor_property(&[DeclContext::Category(category)], id);
        id
    }

    fn accessor_property(&self, contexts: &[DeclContext], method: MethodId) -> Option<PropertyId> {
        let signature = &self.model.method(method).signature;
        contexts
            .iter()
            .flat_map(|&ctx| self.model.context_properties(ctx).iter().copied())
            .find(|&prop| {
                let decl = self.model.property(prop);
                [decl.getter, decl.setter]
                    .into_iter()
                    .flatten()
                    .any(|accessor| &self.model.method(accessor).signature == signature)
            })
    }

    /// Declare a property, synthesizing accessor declarations the container lacks.
    pub fn property(&mut self, owner: DeclContext, spec: PropertySpec) -> PropertyId {
        let id = PropertyId(self.model.properties.len());
        self.model.properties.push(PropertyDecl {
            name: spec.name.clone(),
            owner,
            location: spec.location.clone(),
            getter: None,
            setter: None,
        });
        match owner {
            DeclContext::Class(class) => self.model.classes[class.0].properties.push(id),
            DeclContext::Category(cat) => self.model.categories[cat.0].properties.push(id),
        }

        let getter = self.accessor(owner, id, spec.getter_signature(), &spec.location);
        self.model.properties[id.0].getter = Some(getter);
        if let Some(signature) = spec.setter_signature() {
            let setter = self.accessor(owner, id, signature, &spec.location);
            self.model.properties[id.0].setter = Some(setter);
        }
        id
    }

    fn accessor(
        &mut self,
        owner: DeclContext,
        property: PropertyId,
        signature: MethodSignature,
        location: &SourceLocation,
    ) -> MethodId {
        let id = match self.model.lookup_in_context(owner, &signature) {
            Some(existing) => existing,
            None => self.declare_method(owner, MethodSpec::new(signature, location.clone())),
        };
        self.model.methods[id.0].property = Some(property);
        id
    }

    /// Point a method at a property explicitly.
    pub fn link_property(&mut self, method: MethodId, property: PropertyId) {
        self.model.methods[method.0].property = Some(property);
    }

    pub fn item(&mut self, item: UnitItem) {
        self.model.items.push(item);
    }

    /// Validate and freeze the model.
    ///
    /// An empty item list defaults to every class implementation, then every
    /// category implementation.
    pub fn build(mut self) -> Result<DeclarationModel> {
        self.check_acyclic()?;
        if self.model.items.is_empty() {
            self.model.items = self.default_items();
        }
        Ok(self.model)
    }

    fn default_items(&self) -> Vec<UnitItem> {
        let classes = self
            .model
            .classes
            .iter()
            .enumerate()
            .filter(|(_, class)| class.implementation.is_some())
            .map(|(i, _)| UnitItem::Implementation(ClassId(i)));
        let categories = self
            .model
            .categories
            .iter()
            .enumerate()
            .filter(|(_, cat)| cat.implementation.is_some())
            .map(|(i, _)| UnitItem::CategoryImplementation(CategoryId(i)));
        classes.chain(categories).collect()
    }

    fn check_acyclic(&self) -> Result<()> {
        for start in self.model.class_ids() {
            let mut seen = HashSet::new();
            let mut cursor = Some(start);
            while let Some(class) = cursor {
                if !seen.insert(class) {
                    return Err(Error::InheritanceCycle(self.model.class(start).name.clone()));
                }
                cursor = self.model.superclass(class);
            }
        }
        Ok(())
    }
}
