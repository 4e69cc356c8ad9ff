//! End-to-end binding scenarios: attribute text in, running binding out.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::rc::Rc;

use pretty_assertions::assert_eq;
use vela_bind::{
    compile_binding, BindingMode, BindingTarget, CompileCx, CompiledBinding, Loadable, LoadableId,
    Scope,
};
use vela_diagnostic::CompileErrorKind;
use vela_emit::Op;
use vela_runtime::{evaluate, BindingInstance, ClassRegistry, HostObject, Value};
use vela_types::{ClassId, MemberFlags, Ty};

/// A `Model` class and a scope with `a: Model` in local 0 and a pending
/// `later: String`.
struct World {
    registry: ClassRegistry,
    model: ClassId,
    scope: Scope,
}

impl World {
    fn new() -> Self {
        let mut registry = ClassRegistry::new();
        let model = registry.define_class("Model", None);
        let observable = MemberFlags::ACCESSIBLE | MemberFlags::OBSERVABLE;
        registry.add_property(model, "b", Ty::INT, observable);
        registry.add_property(model, "on", Ty::BOOLEAN, observable);
        registry.add_property(model, "text", Ty::Str, observable);
        registry.add_property(model, "child", Ty::Class(model), observable);
        registry.add_property(model, "nick", Ty::Str, MemberFlags::ACCESSIBLE);
        let mut scope = Scope::new();
        scope.bind(Loadable::local(LoadableId::from_raw(1), "a", Ty::Class(model), 0));
        scope.declare_pending("later", Ty::Str);
        World {
            registry,
            model,
            scope,
        }
    }

    fn object(&self) -> Rc<HostObject> {
        Rc::new(
            HostObject::new(self.model)
                .with_observable("b", Value::Int(1))
                .with_observable("on", Value::Bool(false))
                .with_observable("text", Value::string("hi"))
                .with_observable("child", Value::Null)
                .with_property("nick", Value::Null),
        )
    }

    fn compile(&self, source: &str, target: Option<&BindingTarget>) -> CompiledBinding {
        compile_binding(source, &self.scope, &CompileCx::new(&self.registry), target).unwrap()
    }

    fn run_static(&self, binding: &CompiledBinding, a: &Rc<HostObject>) -> Value {
        let CompiledBinding::Static(binding) = binding else {
            panic!("expected a static binding, got {binding:?}");
        };
        let routine = binding.routine().unwrap();
        evaluate(&routine, &self.registry, &[Value::Object(Rc::clone(a))]).unwrap()
    }

    fn instantiate(self, binding: CompiledBinding, a: &Rc<HostObject>) -> Rc<BindingInstance> {
        let CompiledBinding::Dynamic(artifact) = binding else {
            panic!("expected a dynamic binding, got {binding:?}");
        };
        BindingInstance::create(
            Rc::new(artifact.image),
            Rc::new(self.registry),
            &[Value::Object(Rc::clone(a))],
        )
        .unwrap()
    }
}

#[test]
fn observable_sum_tracks_its_property() {
    let world = World::new();
    let binding = world.compile("${a.b + 1}", None);
    assert_eq!(binding.mode(), Some(BindingMode::Dynamic));
    let CompiledBinding::Dynamic(artifact) = &binding else {
        unreachable!();
    };
    assert_eq!(artifact.ty, Ty::INT);
    assert_eq!(artifact.image.steps, vec![0, 1]);
    let subscribes = artifact
        .image
        .update
        .ops()
        .iter()
        .filter(|op| matches!(op, Op::Subscribe(_)))
        .count();
    assert_eq!(subscribes, 1);

    let a = world.object();
    a.set("b", Value::Int(2)).unwrap();
    let instance = world.instantiate(binding, &a);
    assert_eq!(instance.value(), Value::Int(3));
    a.set("b", Value::Int(5)).unwrap();
    assert_eq!(instance.value(), Value::Int(6));
    assert_eq!(
        instance.subscriptions_on(&a.observable("b").unwrap()),
        1
    );
}

#[test]
fn decided_short_circuit_is_static() {
    let world = World::new();
    // `x` is not in scope; the right operand is never resolved.
    let binding = world.compile("${true || x.y}", None);
    assert_eq!(binding.mode(), Some(BindingMode::Static));
    assert_eq!(world.run_static(&binding, &world.object()), Value::Bool(true));
}

#[test]
fn fractional_text_does_not_convert_to_int() {
    let world = World::new();
    let cx = CompileCx::new(&world.registry);
    let target = BindingTarget::new("value", Ty::INT).on_element("Slider");
    for source in ["3.5", "${'3.5'}"] {
        let error = compile_binding(source, &world.scope, &cx, Some(&target)).unwrap_err();
        assert_eq!(
            error.kind,
            CompileErrorKind::Unconvertible {
                from: "\"3.5\"".to_owned(),
                to: "int".to_owned(),
            },
            "{source}"
        );
        assert_eq!(error.element.as_deref(), Some("Slider"));
    }

    let binding = world.compile("42", Some(&target));
    assert_eq!(world.run_static(&binding, &world.object()), Value::Int(42));
}

#[test]
fn plain_text_and_escapes_stay_text() {
    let world = World::new();
    let a = world.object();
    let binding = world.compile("hello", None);
    assert_eq!(world.run_static(&binding, &a), Value::string("hello"));
    let binding = world.compile("\\${a.b}", None);
    assert_eq!(world.run_static(&binding, &a), Value::string("${a.b}"));
}

#[test]
fn null_sources_convert_to_defaults() {
    let world = World::new();
    let target = BindingTarget::new("count", Ty::INT);
    let binding = world.compile("${a.nick}", Some(&target));
    assert_eq!(world.run_static(&binding, &world.object()), Value::Int(0));

    let flag = BindingTarget::new("enabled", Ty::BOOLEAN);
    let binding = world.compile("${a.child.text}", Some(&flag));
    let a = world.object();
    let child = world.object();
    child.set("text", Value::Null).unwrap();
    a.set("child", Value::Object(Rc::clone(&child))).unwrap();
    let instance = world.instantiate(binding, &a);
    assert_eq!(instance.value(), Value::Bool(false));
    child.set("text", Value::string("true")).unwrap();
    assert_eq!(instance.value(), Value::Bool(true));
}

#[test]
fn every_assigned_step_terminates() {
    let sources = [
        "${a.b + a.b * 2}",
        "${a.on && a.text.isEmpty()}",
        "${a.on || a.child.on && a.child.b > 1}",
        "${Math.max(a.b, a.child.b) + a.text.length()}",
        "${!a.on && (a.text == null || a.text.startsWith('x'))}",
    ];
    for source in sources {
        let world = World::new();
        let binding = world.compile(source, None);
        let CompiledBinding::Dynamic(artifact) = &binding else {
            panic!("{source} should be dynamic");
        };
        let steps = artifact.image.steps.clone();
        let a = world.object();
        a.set("child", Value::Object(world.object())).unwrap();
        let instance = world.instantiate(binding, &a);
        for step in steps {
            instance
                .update(step)
                .unwrap_or_else(|error| panic!("{source}: step {step}: {error}"));
            assert!(!instance.result().is_locked());
        }
    }
}

#[test]
fn pending_entries_defer_the_binding() {
    let world = World::new();
    let binding = world.compile("${later.length()}", None);
    assert!(matches!(binding, CompiledBinding::Deferred { ty: Ty::INT }));
    assert_eq!(binding.mode(), None);
}

#[test]
fn read_only_targets_accept_static_bindings_only() {
    let world = World::new();
    let cx = CompileCx::new(&world.registry);
    let target = BindingTarget::new("id", Ty::Str).read_only();
    let binding = compile_binding("${'fixed'}", &world.scope, &cx, Some(&target)).unwrap();
    assert_eq!(binding.mode(), Some(BindingMode::Static));

    let error = compile_binding("${a.text}", &world.scope, &cx, Some(&target)).unwrap_err();
    assert!(matches!(error.kind, CompileErrorKind::ReadOnlyTarget { .. }));
}

#[test]
fn bound_results_feed_other_bindings() {
    let world = World::new();
    let producer = world.compile("${a.b * 2}", None);
    let consumer = world.compile("${a.child.b + 1}", None);
    let (CompiledBinding::Dynamic(producer), CompiledBinding::Dynamic(consumer)) =
        (producer, consumer)
    else {
        panic!("both bindings observe properties");
    };

    let a = world.object();
    let child = world.object();
    a.set("child", Value::Object(Rc::clone(&child))).unwrap();
    let frame = [Value::Object(Rc::clone(&a))];
    let registry = Rc::new(world.registry);
    let producer = BindingInstance::create(Rc::new(producer.image), Rc::clone(&registry), &frame)
        .unwrap();
    let consumer =
        BindingInstance::create(Rc::new(consumer.image), registry, &frame).unwrap();
    producer.bind_to(&child, "b").unwrap();
    assert_eq!(consumer.value(), Value::Int(3));

    a.set("b", Value::Int(10)).unwrap();
    assert_eq!(child.get("b"), Some(Value::Int(20)));
    assert_eq!(consumer.value(), Value::Int(21));
}
