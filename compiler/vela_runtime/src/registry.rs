//! The class registry: host classes, members and their implementations.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use vela_ir::literal::{format_double, format_float};
use vela_types::{
    match_enum_constant, ClassId, FieldId, FieldInfo, MemberFlags, MethodId, MethodInfo, Prim,
    PropertyInfo, Ty, TypeModel,
};

use crate::error::{no_such_constant, no_such_member, RuntimeResult};
use crate::{builtins, EnumValue, Value};

/// Implementation of a method or constructor.
///
/// Instance methods receive the (non-null) receiver as `args[0]`.
pub type MethodImpl = Rc<dyn Fn(&ClassRegistry, &[Value]) -> RuntimeResult<Value>>;

struct ClassDef {
    name: Rc<str>,
    superclass: Option<ClassId>,
    properties: Vec<PropertyInfo>,
    constants: Option<Vec<Rc<str>>>,
}

struct MethodDef {
    info: MethodInfo,
    imp: MethodImpl,
}

struct FieldDef {
    info: FieldInfo,
    value: Value,
}

/// Host classes and their members.
///
/// `String`, `Object`, the boxed primitives and `Math` are registered by
/// [`ClassRegistry::new`].
pub struct ClassRegistry {
    classes: Vec<ClassDef>,
    names: FxHashMap<Rc<str>, Ty>,
    methods: Vec<MethodDef>,
    fields: Vec<FieldDef>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        ClassRegistry::new()
    }
}

impl ClassRegistry {
    pub fn new() -> Self {
        let mut registry = ClassRegistry {
            classes: Vec::new(),
            names: FxHashMap::default(),
            methods: Vec::new(),
            fields: Vec::new(),
        };
        registry.names.insert("String".into(), Ty::Str);
        registry.names.insert("Object".into(), Ty::Object);
        for prim in Prim::ALL {
            registry
                .names
                .insert(prim.boxed_name().into(), Ty::Boxed(prim));
        }
        builtins::install(&mut registry);
        registry
    }

    pub fn define_class(&mut self, name: &str, superclass: Option<ClassId>) -> ClassId {
        let id = ClassId::from_raw(u32::try_from(self.classes.len()).unwrap_or(u32::MAX));
        let name: Rc<str> = name.into();
        self.names.insert(Rc::clone(&name), Ty::Class(id));
        self.classes.push(ClassDef {
            name,
            superclass,
            properties: Vec::new(),
            constants: None,
        });
        id
    }

    /// Define an enum; every constant is also a static field.
    pub fn define_enum(&mut self, name: &str, constants: &[&str]) -> ClassId {
        let id = self.define_class(name, None);
        let names: Vec<Rc<str>> = constants.iter().map(|&c| Rc::from(c)).collect();
        for constant in &names {
            let value = Value::Enum(EnumValue {
                class: id,
                name: Rc::clone(constant),
            });
            self.add_static_field(Ty::Class(id), constant, Ty::Class(id), value);
        }
        if let Some(class) = self.classes.get_mut(id.index()) {
            class.constants = Some(names);
        }
        id
    }

    pub fn add_property(&mut self, class: ClassId, name: &str, ty: Ty, flags: MemberFlags) {
        if let Some(def) = self.classes.get_mut(class.index()) {
            def.properties.push(PropertyInfo {
                owner: Ty::Class(class),
                name: name.into(),
                ty,
                flags,
            });
        }
    }

    /// Register any method-like member.
    pub fn add_member(
        &mut self,
        owner: Ty,
        name: &str,
        params: &[Ty],
        ret: Ty,
        flags: MemberFlags,
        imp: MethodImpl,
    ) -> MethodId {
        let id = MethodId::from_raw(u32::try_from(self.methods.len()).unwrap_or(u32::MAX));
        self.methods.push(MethodDef {
            info: MethodInfo {
                id,
                owner,
                name: name.into(),
                params: SmallVec::from_slice(params),
                ret,
                flags,
            },
            imp,
        });
        id
    }

    pub fn add_method(
        &mut self,
        owner: Ty,
        name: &str,
        params: &[Ty],
        ret: Ty,
        imp: impl Fn(&ClassRegistry, &[Value]) -> RuntimeResult<Value> + 'static,
    ) -> MethodId {
        self.add_member(owner, name, params, ret, MemberFlags::ACCESSIBLE, Rc::new(imp))
    }

    pub fn add_static_method(
        &mut self,
        owner: Ty,
        name: &str,
        params: &[Ty],
        ret: Ty,
        imp: impl Fn(&ClassRegistry, &[Value]) -> RuntimeResult<Value> + 'static,
    ) -> MethodId {
        let flags = MemberFlags::ACCESSIBLE | MemberFlags::STATIC;
        self.add_member(owner, name, params, ret, flags, Rc::new(imp))
    }

    pub fn add_constructor(
        &mut self,
        class: ClassId,
        params: &[Ty],
        imp: impl Fn(&ClassRegistry, &[Value]) -> RuntimeResult<Value> + 'static,
    ) -> MethodId {
        let owner = Ty::Class(class);
        let flags = MemberFlags::ACCESSIBLE | MemberFlags::STATIC;
        self.add_member(owner, "<init>", params, owner, flags, Rc::new(imp))
    }

    pub fn add_static_field(&mut self, owner: Ty, name: &str, ty: Ty, value: Value) -> FieldId {
        let id = FieldId::from_raw(u32::try_from(self.fields.len()).unwrap_or(u32::MAX));
        self.fields.push(FieldDef {
            info: FieldInfo {
                id,
                owner,
                name: name.into(),
                ty,
            },
            value,
        });
        id
    }

    /// Invoke a registered member.
    pub fn invoke(&self, method: MethodId, args: &[Value]) -> RuntimeResult<Value> {
        let def = self
            .methods
            .get(method.index())
            .ok_or_else(|| no_such_member(format!("{method:?}")))?;
        (def.imp)(self, args)
    }

    pub fn method_name(&self, method: MethodId) -> Option<&str> {
        self.methods.get(method.index()).map(|m| &*m.info.name)
    }

    pub fn static_value(&self, field: FieldId) -> RuntimeResult<Value> {
        self.fields
            .get(field.index())
            .map(|f| f.value.clone())
            .ok_or_else(|| no_such_member(format!("{field:?}")))
    }

    /// Enum constant named by `text`, with the same fallbacks the
    /// compiler applies to literal text.
    pub fn enum_value_of(&self, class: ClassId, text: &str) -> RuntimeResult<Value> {
        let def = self
            .classes
            .get(class.index())
            .ok_or_else(|| no_such_member(format!("{class:?}")))?;
        let constants = def.constants.as_deref().unwrap_or(&[]);
        match match_enum_constant(constants, text) {
            Some(name) => Ok(Value::Enum(EnumValue {
                class,
                name: Rc::clone(name),
            })),
            None => Err(no_such_constant(text, &def.name)),
        }
    }

    /// The host's string conversion of a value.
    pub fn to_host_string(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_owned(),
            Value::Bool(b) => b.to_string(),
            Value::Char(c) => c.to_string(),
            Value::Byte(v) => v.to_string(),
            Value::Short(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Long(v) => v.to_string(),
            Value::Float(v) => format_float(*v),
            Value::Double(v) => format_double(*v),
            Value::Str(s) => s.to_string(),
            Value::Enum(e) => e.name.to_string(),
            Value::Object(o) => self.class_name(o.class()),
            Value::Cell(cell) => self.to_host_string(&cell.get()),
        }
    }

    /// `owner` followed by its supertypes, ending in `Object`.
    fn lineage(&self, owner: Ty) -> SmallVec<[Ty; 4]> {
        let mut chain = SmallVec::new();
        match owner {
            Ty::Class(class) => {
                let mut current = Some(class);
                while let Some(c) = current {
                    chain.push(Ty::Class(c));
                    current = self.superclass(c);
                }
                chain.push(Ty::Object);
            }
            Ty::Str | Ty::Boxed(_) => {
                chain.push(owner);
                chain.push(Ty::Object);
            }
            Ty::Object => chain.push(Ty::Object),
            Ty::Null | Ty::Void | Ty::Prim(_) => {}
        }
        chain
    }

    fn find_methods(&self, owners: &[Ty], name: &str, arity: usize, want_static: bool) -> Vec<MethodInfo> {
        let mut found: Vec<MethodInfo> = Vec::new();
        for &owner in owners {
            for def in &self.methods {
                let info = &def.info;
                if info.owner != owner
                    || &*info.name != name
                    || info.arity() != arity
                    || info.flags.contains(MemberFlags::STATIC) != want_static
                {
                    continue;
                }
                // Subclass definitions override inherited ones.
                if found.iter().any(|f| f.params == info.params) {
                    continue;
                }
                found.push(info.clone());
            }
        }
        found
    }
}

impl TypeModel for ClassRegistry {
    fn resolve_type(&self, name: &str) -> Option<Ty> {
        self.names.get(name).copied()
    }

    fn class_name(&self, class: ClassId) -> String {
        self.classes
            .get(class.index())
            .map_or_else(|| format!("{class:?}"), |c| c.name.to_string())
    }

    fn superclass(&self, class: ClassId) -> Option<ClassId> {
        self.classes.get(class.index())?.superclass
    }

    fn property(&self, owner: Ty, name: &str) -> Option<PropertyInfo> {
        self.lineage(owner).into_iter().find_map(|ty| match ty {
            Ty::Class(class) => self
                .classes
                .get(class.index())?
                .properties
                .iter()
                .find(|p| &*p.name == name)
                .cloned(),
            _ => None,
        })
    }

    fn methods(&self, owner: Ty, name: &str, arity: usize) -> Vec<MethodInfo> {
        self.find_methods(&self.lineage(owner), name, arity, false)
    }

    fn static_methods(&self, owner: Ty, name: &str, arity: usize) -> Vec<MethodInfo> {
        self.find_methods(&[owner], name, arity, true)
            .into_iter()
            .filter(|m| &*m.name != "<init>")
            .collect()
    }

    fn constructors(&self, owner: Ty, arity: usize) -> Vec<MethodInfo> {
        self.find_methods(&[owner], "<init>", arity, true)
    }

    fn static_field(&self, owner: Ty, name: &str) -> Option<FieldInfo> {
        self.fields
            .iter()
            .find(|f| f.info.owner == owner && &*f.info.name == name)
            .map(|f| f.info.clone())
    }

    fn enum_constants(&self, owner: Ty) -> Option<Vec<Rc<str>>> {
        match owner {
            Ty::Class(class) => self.classes.get(class.index())?.constants.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
