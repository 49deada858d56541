//! On-disk description of a compilation unit.
//!
//! A frontend dumps what it saw in one translation unit as JSON or YAML:
//!
//! ```json
//! {
//!   "name": "Widget.m",
//!   "classes": [
//!     { "name": "NSObject", "location": "/Applications/Xcode/SDK/NSObject.h:50:1" },
//!     { "name": "Widget", "superclass": "NSObject", "location": "Widget.h:3:1",
//!       "methods": [{ "selector": "run", "location": "Widget.h:5:1" }],
//!       "implementation": { "methods": [{ "selector": "run", "location": "Widget.m:9:1" }] } }
//!   ],
//!   "items": [
//!     { "kind": "implementation", "class": "Widget" },
//!     { "kind": "message_send", "selector": "reload", "receiver": "id" }
//!   ]
//! }
//! ```
//!
//! Missing locations fall back to `<unit name>:0:0`.

use super::builder::{MethodSpec, PropertySpec};
use super::{
    CategoryId, ClassId, DeclContext, DeclarationModel, MethodId, MethodSide, MethodSignature,
    ModelBuilder, PropertyId, ReceiverKind, Selector, SourceLocation, UnitItem,
};
use crate::core::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitSource {
    pub name: String,
    #[serde(default)]
    pub classes: Vec<ClassSource>,
    #[serde(default)]
    pub categories: Vec<CategorySource>,
    #[serde(default)]
    pub protocols: Vec<ProtocolSource>,
    /// Traversal items in source order. Declared protocols block their
    /// requirements whether or not they appear here.
    #[serde(default)]
    pub items: Vec<ItemSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassSource {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
    #[serde(default)]
    pub methods: Vec<MethodSource>,
    #[serde(default)]
    pub properties: Vec<PropertySource>,
    #[serde(default)]
    pub implementation: Option<ImplementationSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorySource {
    pub class: String,
    /// Empty or absent for a class extension
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Option<SourceLocation>,
    #[serde(default)]
    pub methods: Vec<MethodSource>,
    #[serde(default)]
    pub properties: Vec<PropertySource>,
    #[serde(default)]
    pub implementation: Option<ImplementationSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImplementationSource {
    #[serde(default)]
    pub location: Option<SourceLocation>,
    #[serde(default)]
    pub methods: Vec<MethodSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSource {
    pub selector: Selector,
    #[serde(default)]
    pub side: MethodSide,
    #[serde(default)]
    pub location: Option<SourceLocation>,
    #[serde(default)]
    pub direct: bool,
    #[serde(default)]
    pub overriding: bool,
    /// Name of the property this method is an accessor of
    #[serde(default)]
    pub property: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertySource {
    pub name: String,
    #[serde(default)]
    pub location: Option<SourceLocation>,
    #[serde(default)]
    pub getter: Option<String>,
    #[serde(default)]
    pub setter: Option<String>,
    #[serde(default)]
    pub readonly: bool,
    /// `@property (class)`
    #[serde(default)]
    pub class: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolSource {
    pub name: String,
    #[serde(default)]
    pub location: Option<SourceLocation>,
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemSource {
    Implementation {
        class: String,
    },
    CategoryImplementation {
        class: String,
        #[serde(default)]
        category: String,
    },
    SelectorExpr {
        selector: Selector,
        #[serde(default)]
        location: Option<SourceLocation>,
    },
    MessageSend {
        selector: Selector,
        /// Static receiver type: `id`, `Class` or a class name
        receiver: String,
        #[serde(default)]
        location: Option<SourceLocation>,
    },
}

impl UnitSource {
    /// Read a unit from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let unit = if is_yaml {
            serde_yaml::from_str(&contents)?
        } else {
            serde_json::from_str(&contents)?
        };
        Ok(unit)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Validate references and build the arena.
    pub fn into_model(self) -> Result<DeclarationModel> {
        let name = self.name.clone();
        UnitLoader::new(&self).load().context(format!("loading unit '{name}'"))
    }
}

/// Read a unit file straight into a model.
pub fn load_model(path: &Path) -> Result<DeclarationModel> {
    UnitSource::from_path(path)?.into_model()
}

struct UnitLoader<'a> {
    source: &'a UnitSource,
    builder: ModelBuilder,
    fallback: SourceLocation,
    classes: HashMap<&'a str, ClassId>,
    categories: HashMap<(String, String), CategoryId>,
}

impl<'a> UnitLoader<'a> {
    fn new(source: &'a UnitSource) -> Self {
        Self {
            source,
            builder: ModelBuilder::new(source.name.clone()),
            fallback: SourceLocation::new(source.name.clone(), 0, 0),
            classes: HashMap::new(),
            categories: HashMap::new(),
        }
    }

    fn location(&self, location: &Option<SourceLocation>) -> SourceLocation {
        location.clone().unwrap_or_else(|| self.fallback.clone())
    }

    fn class_id(&self, name: &str) -> Result<ClassId> {
        self.classes
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownClass(name.to_string()))
    }

    fn category_id(&self, class: &str, category: &str) -> Result<CategoryId> {
        self.categories
            .get(&(class.to_string(), category.to_string()))
            .copied()
            .ok_or_else(|| Error::UnknownCategory {
                class: class.to_string(),
                category: category.to_string(),
            })
    }

    fn load(mut self) -> Result<DeclarationModel> {
        self.declare_classes()?;
        self.declare_categories()?;
        self.declare_members()?;
        self.define_implementations()?;
        self.declare_items()?;
        self.builder.build()
    }

    fn declare_classes(&mut self) -> Result<()> {
        let source = self.source;
        for class in &source.classes {
            if self.classes.contains_key(class.name.as_str()) {
                return Err(Error::Duplicate(format!("class {}", class.name)));
            }
            let location = self.location(&class.location);
            let id = self.builder.class(class.name.clone(), None, location);
            self.classes.insert(class.name.as_str(), id);
        }
        for class in &source.classes {
            if let Some(superclass) = &class.superclass {
                let id = self.class_id(&class.name)?;
                let parent = self.class_id(superclass)?;
                self.builder.set_superclass(id, Some(parent));
            }
        }
        Ok(())
    }

    fn declare_categories(&mut self) -> Result<()> {
        let source = self.source;
        for category in &source.categories {
            let class = self.class_id(&category.class)?;
            let key = (category.class.clone(), category.name.clone());
            if self.categories.contains_key(&key) {
                return Err(Error::Duplicate(format!(
                    "category {}({})",
                    category.class, category.name
                )));
            }
            let location = self.location(&category.location);
            let id = self.builder.category(class, category.name.clone(), location);
            self.categories.insert(key, id);
        }
        Ok(())
    }

    fn declare_members(&mut self) -> Result<()> {
        let source = self.source;
        for class in &source.classes {
            let context = DeclContext::Class(self.class_id(&class.name)?);
            self.declare_container(context, &class.methods, &class.properties)?;
        }
        for category in &source.categories {
            let id = self.category_id(&category.class, &category.name)?;
            let context = DeclContext::Category(id);
            self.declare_container(context, &category.methods, &category.properties)?;
        }
        Ok(())
    }

    fn declare_container(
        &mut self,
        context: DeclContext,
        methods: &[MethodSource],
        properties: &[PropertySource],
    ) -> Result<()> {
        let mut declared = Vec::with_capacity(methods.len());
        for method in methods {
            let spec = self.method_spec(method);
            declared.push((self.builder.declare_method(context, spec), method));
        }
        for property in properties {
            let mut spec = PropertySpec::new(property.name.clone(), self.location(&property.location));
            spec.getter = property.getter.as_deref().map(Selector::new);
            spec.setter = property.setter.as_deref().map(Selector::new);
            spec.readonly = property.readonly;
            spec.class_property = property.class;
            self.builder.property(context, spec);
        }
        for (id, method) in declared {
            self.link_explicit_property(context, id, method)?;
        }
        Ok(())
    }

    fn method_spec(&self, method: &MethodSource) -> MethodSpec {
        let signature = MethodSignature::new(method.selector.clone(), method.side);
        MethodSpec {
            signature,
            location: self.location(&method.location),
            is_direct: method.direct,
            is_overriding: method.overriding,
        }
    }

    // Explicit links look in the owning context, then the class's extensions.
    fn link_explicit_property(
        &mut self,
        context: DeclContext,
        method: MethodId,
        source: &MethodSource,
    ) -> Result<()> {
        let Some(name) = &source.property else {
            return Ok(());
        };
        let property = self.find_property(context, name).ok_or_else(|| Error::UnknownProperty {
            property: name.clone(),
            method: source.selector.to_string(),
        })?;
        self.builder.link_property(method, property);
        Ok(())
    }

    fn find_property(&self, context: DeclContext, name: &str) -> Option<PropertyId> {
        let model = self.builder.model();
        let class = model.context_class(context);
        let extensions = model
            .visible_categories(class)
            .iter()
            .copied()
            .filter(|&cat| model.category(cat).is_extension())
            .map(DeclContext::Category);
        std::iter::once(context)
            .chain(extensions)
            .flat_map(|ctx| model.context_properties(ctx).iter().copied())
            .find(|&prop| model.property(prop).name == name)
    }

    fn define_implementations(&mut self) -> Result<()> {
        let source = self.source;
        for class in &source.classes {
            let Some(imp) = &class.implementation else {
                continue;
            };
            let id = self.class_id(&class.name)?;
            let location = self.location(&imp.location);
            self.builder.implementation(DeclContext::Class(id), location);
            for method in &imp.methods {
                let spec = self.method_spec(method);
                let method_id = self.builder.implement_class_method(id, spec);
                self.link_explicit_property(DeclContext::Class(id), method_id, method)?;
            }
        }
        for category in &source.categories {
            let Some(imp) = &category.implementation else {
                continue;
            };
            let id = self.category_id(&category.class, &category.name)?;
            let location = self.location(&imp.location);
            self.builder.implementation(DeclContext::Category(id), location);
            for method in &imp.methods {
                let spec = self.method_spec(method);
                let method_id = self.builder.implement_category_method(id, spec);
                self.link_explicit_property(DeclContext::Category(id), method_id, method)?;
            }
        }
        Ok(())
    }

    fn declare_items(&mut self) -> Result<()> {
        let source = self.source;
        let mut protocols = HashSet::new();
        for protocol in &source.protocols {
            if !protocols.insert(protocol.name.as_str()) {
                return Err(Error::Duplicate(format!("protocol {}", protocol.name)));
            }
            let location = self.location(&protocol.location);
            self.builder
                .protocol(protocol.name.clone(), location, protocol.methods.clone());
        }

        for item in &source.items {
            let item = match item {
                ItemSource::Implementation { class } => {
                    let id = self.class_id(class)?;
                    if self.builder.model().class(id).implementation.is_none() {
                        return Err(Error::Validation(format!(
                            "class {class} is listed as implemented but has no implementation"
                        )));
                    }
                    UnitItem::Implementation(id)
                }
                ItemSource::CategoryImplementation { class, category } => {
                    let id = self.category_id(class, category)?;
                    if self.builder.model().category(id).implementation.is_none() {
                        return Err(Error::Validation(format!(
                            "category {class}({category}) is listed as implemented but has no implementation"
                        )));
                    }
                    UnitItem::CategoryImplementation(id)
                }
                ItemSource::SelectorExpr { selector, location } => UnitItem::SelectorExpr {
                    selector: selector.clone(),
                    location: location.clone(),
                },
                ItemSource::MessageSend {
                    selector,
                    receiver,
                    location,
                } => UnitItem::MessageSend {
                    selector: selector.clone(),
                    receiver: parse_receiver(receiver),
                    location: location.clone(),
                },
            };
            self.builder.item(item);
        }
        Ok(())
    }
}

fn parse_receiver(receiver: &str) -> ReceiverKind {
    match receiver {
        "id" => ReceiverKind::Id,
        "Class" | "class" => ReceiverKind::Class,
        other => ReceiverKind::Typed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_load_unit_with_system_superclass() {
        let unit = UnitSource::from_json(indoc! {r#"
            {
              "name": "Widget.m",
              "classes": [
                { "name": "NSObject", "location": "/Applications/Xcode/SDK/NSObject.h:50:1" },
                { "name": "Widget", "superclass": "NSObject", "location": "Widget.h:3:1",
                  "methods": [{ "selector": "run", "location": "Widget.h:5:1" }],
                  "implementation": { "methods": [{ "selector": "run", "location": "Widget.m:9:1" }] } }
              ],
              "items": [
                { "kind": "implementation", "class": "Widget" },
                { "kind": "message_send", "selector": "reload", "receiver": "id" }
              ]
            }
        "#})
        .unwrap();
        let model = unit.into_model().unwrap();

        let widget = model.class_by_name("Widget").unwrap();
        assert_eq!(model.superclass(widget), model.class_by_name("NSObject"));
        assert_eq!(model.items().len(), 2);
    }

    #[test]
    fn test_load_minimal_unit() {
        let unit = UnitSource::from_json(indoc! {r#"
            {
              "name": "A.m",
              "classes": [
                { "name": "A", "location": "A.h:1:1",
                  "methods": [{ "selector": "run", "location": "A.h:3:1" }],
                  "implementation": { "methods": [{ "selector": "run", "location": "A.m:5:1" }] } }
              ]
            }
        "#})
        .unwrap();
        let model = unit.into_model().unwrap();

        let a = model.class_by_name("A").unwrap();
        assert_eq!(model.class(a).methods.len(), 1);
        assert_eq!(model.items(), &[UnitItem::Implementation(a)]);
    }

    #[test]
    fn test_unknown_superclass_is_rejected() {
        let unit = UnitSource::from_json(
            r#"{ "name": "A.m", "classes": [{ "name": "A", "superclass": "Missing" }] }"#,
        )
        .unwrap();
        let err = unit.into_model().unwrap_err();
        assert!(err.to_string().contains("Unknown class 'Missing'"));
    }

    #[test]
    fn test_missing_location_falls_back_to_unit() {
        let unit = UnitSource::from_json(
            r#"{ "name": "B.m", "classes": [{ "name": "B", "methods": [{ "selector": "go" }] }] }"#,
        )
        .unwrap();
        let model = unit.into_model().unwrap();
        let b = model.class_by_name("B").unwrap();
        let method = model.method(model.class(b).methods[0]);
        assert_eq!(method.location.to_string(), "B.m:0:0");
    }

    #[test]
    fn test_receivers_are_parsed() {
        assert_eq!(parse_receiver("id"), ReceiverKind::Id);
        assert_eq!(parse_receiver("Class"), ReceiverKind::Class);
        assert_eq!(parse_receiver("Widget"), ReceiverKind::Typed("Widget".into()));
    }

    #[test]
    fn test_duplicate_category_is_rejected() {
        let unit = UnitSource::from_json(indoc! {r#"
            {
              "name": "A.m",
              "classes": [{ "name": "A" }],
              "categories": [{ "class": "A", "name": "X" }, { "class": "A", "name": "X" }]
            }
        "#})
        .unwrap();
        assert!(matches!(
            unit.into_model().unwrap_err(),
            Error::WithContext { .. }
        ));
    }

    #[test]
    fn test_explicit_property_link() {
        let unit = UnitSource::from_json(indoc! {r#"
            {
              "name": "C.m",
              "classes": [{ "name": "C" }],
              "categories": [
                { "class": "C", "properties": [{ "name": "name" }] },
                { "class": "C", "name": "Extras",
                  "implementation": { "methods": [{ "selector": "name", "property": "name" }] } }
              ]
            }
        "#})
        .unwrap();
        let model = unit.into_model().unwrap();
        let c = model.class_by_name("C").unwrap();
        let extras = model.category_by_name(c, "Extras").unwrap();
        let imp = model.category(extras).implementation.as_ref().unwrap();
        assert!(model.method(imp.methods[0]).property.is_some());
    }
}
