//! Flattens a unit's items into the ordered steps of the classification pass.

use crate::model::{
    CategoryId, ClassId, DeclContext, DeclarationModel, MethodId, Selector, SourceLocation,
    UnitItem,
};

/// Why a selector is blocked everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicSignal {
    /// Required by the named protocol
    Protocol(String),
    /// Reified with `@selector(...)`
    SelectorExpr,
    /// Sent to an `id` or `Class` receiver
    DynamicSend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// Entering an `@implementation`; it becomes the unit's owner
    Enter(DeclContext),
    ClassMethod {
        class: ClassId,
        method: MethodId,
    },
    CategoryMethod {
        category: CategoryId,
        method: MethodId,
    },
    BlockSelector {
        selector: Selector,
        signal: DynamicSignal,
        location: Option<SourceLocation>,
    },
}

/// The visits of one unit in source order.
///
/// Every protocol declared in the unit blocks its requirements up front;
/// selector blocks hold regardless of where they arrive in the pass. A
/// class implementation then contributes its header's methods first, then
/// the methods its `@implementation` defines. Sends to statically typed
/// receivers produce nothing.
pub fn visits(model: &DeclarationModel) -> Vec<Visit> {
    let mut out: Vec<Visit> = model
        .protocol_ids()
        .flat_map(|id| {
            let protocol = model.protocol(id);
            protocol.methods.iter().map(|sig| Visit::BlockSelector {
                selector: sig.selector.clone(),
                signal: DynamicSignal::Protocol(protocol.name.clone()),
                location: Some(protocol.location.clone()),
            })
        })
        .collect();
    for item in model.items() {
        match item {
            UnitItem::Implementation(class) => {
                out.push(Visit::Enter(DeclContext::Class(*class)));
                let decl = model.class(*class);
                let implemented = decl.implementation.iter().flat_map(|imp| imp.methods.iter());
                out.extend(decl.methods.iter().chain(implemented).map(|&method| {
                    Visit::ClassMethod {
                        class: *class,
                        method,
                    }
                }));
            }
            UnitItem::CategoryImplementation(category) => {
                out.push(Visit::Enter(DeclContext::Category(*category)));
                if let Some(imp) = &model.category(*category).implementation {
                    out.extend(imp.methods.iter().map(|&method| Visit::CategoryMethod {
                        category: *category,
                        method,
                    }));
                }
            }
            UnitItem::SelectorExpr { selector, location } => out.push(Visit::BlockSelector {
                selector: selector.clone(),
                signal: DynamicSignal::SelectorExpr,
                location: location.clone(),
            }),
            UnitItem::MessageSend {
                selector,
                receiver,
                location,
            } if receiver.is_dynamic() => out.push(Visit::BlockSelector {
                selector: selector.clone(),
                signal: DynamicSignal::DynamicSend,
                location: location.clone(),
            }),
            UnitItem::MessageSend { .. } => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodSignature, MethodSpec, ModelBuilder, ReceiverKind};

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("/src/T.m", line, 1)
    }

    #[test]
    fn test_header_methods_precede_implementation() {
        let mut b = ModelBuilder::new("unit");
        let a = b.class("A", None, loc(1));
        let header = b.declare_method(
            DeclContext::Class(a),
            MethodSpec::new(MethodSignature::instance("run"), loc(2)),
        );
        let body = b.implement_class_method(
            a,
            MethodSpec::new(MethodSignature::instance("run"), loc(10)),
        );
        let model = b.build().unwrap();

        assert_eq!(
            visits(&model),
            vec![
                Visit::Enter(DeclContext::Class(a)),
                Visit::ClassMethod { class: a, method: header },
                Visit::ClassMethod { class: a, method: body },
            ]
        );
    }

    #[test]
    fn test_only_dynamic_sends_block() {
        let mut b = ModelBuilder::new("unit");
        b.item(UnitItem::MessageSend {
            selector: Selector::new("typed"),
            receiver: ReceiverKind::Typed("Widget".into()),
            location: None,
        });
        b.item(UnitItem::MessageSend {
            selector: Selector::new("untyped"),
            receiver: ReceiverKind::Id,
            location: None,
        });
        let model = b.build().unwrap();

        let blocked: Vec<_> = visits(&model)
            .into_iter()
            .filter_map(|visit| match visit {
                Visit::BlockSelector { selector, .. } => Some(selector.as_str().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(blocked, vec!["untyped"]);
    }

    #[test]
    fn test_protocol_requirements_block() {
        let mut b = ModelBuilder::new("unit");
        b.protocol(
            "Delegate",
            loc(1),
            vec![MethodSignature::instance("didFinish:"), MethodSignature::class("shared")],
        );
        let model = b.build().unwrap();

        let visits = visits(&model);
        assert_eq!(visits.len(), 2);
        assert!(matches!(
            &visits[0],
            Visit::BlockSelector { signal: DynamicSignal::Protocol(name), .. } if name == "Delegate"
        ));
    }

    #[test]
    fn test_protocols_block_even_when_items_omit_them() {
        let mut b = ModelBuilder::new("unit");
        let c = b.class("C", None, loc(1));
        b.implement_class_method(c, MethodSpec::new(MethodSignature::instance("didFinish:"), loc(2)));
        b.protocol("Delegate", loc(3), vec![MethodSignature::instance("didFinish:")]);
        b.item(UnitItem::Implementation(c));
        let model = b.build().unwrap();

        let visits = visits(&model);
        assert!(matches!(
            &visits[0],
            Visit::BlockSelector { selector, signal: DynamicSignal::Protocol(_), .. }
                if selector.as_str() == "didFinish:"
        ));
    }
}
