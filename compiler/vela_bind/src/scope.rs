//! Names visible to binding expressions.
//!
//! The markup walker owns the scope and fills it before compiling the
//! attributes of an element. Each name maps to a [`ScopeEntry`]: either a
//! [`Loadable`] whose value can be read in the host frame, or a pending
//! entry whose type is known but whose value does not exist yet (an element
//! declared further down the document).

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use vela_emit::{Op, RenderCommand};
use vela_types::Ty;

/// Identity of a loadable, used to deduplicate captures.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct LoadableId(u32);

impl LoadableId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        LoadableId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LoadableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoadableId({})", self.0)
    }
}

/// An externally supplied value accessor.
///
/// `load` pushes the value in the host frame, the frame that runs static
/// bindings and the `init` routine of dynamic ones.
#[derive(Clone, Debug)]
pub struct Loadable {
    pub id: LoadableId,
    pub name: Rc<str>,
    pub ty: Ty,
    pub load: RenderCommand,
}

impl Loadable {
    pub fn new(id: LoadableId, name: &str, ty: Ty, load: RenderCommand) -> Self {
        Loadable {
            id,
            name: Rc::from(name),
            ty,
            load,
        }
    }

    /// A loadable held in host-frame local `slot`.
    pub fn local(id: LoadableId, name: &str, ty: Ty, slot: u32) -> Self {
        Loadable::new(id, name, ty, RenderCommand::op(Op::LoadLocal(slot)))
    }
}

#[derive(Clone, Debug)]
pub enum ScopeEntry {
    Bound(Loadable),
    /// Declared with a type, not yet loadable.
    Pending(Ty),
}

impl ScopeEntry {
    pub fn ty(&self) -> Ty {
        match self {
            ScopeEntry::Bound(loadable) => loadable.ty,
            ScopeEntry::Pending(ty) => *ty,
        }
    }
}

/// Identifier to entry map. Later bindings of a name replace earlier ones.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    entries: FxHashMap<Rc<str>, ScopeEntry>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, loadable: Loadable) {
        let name = Rc::clone(&loadable.name);
        self.entries.insert(name, ScopeEntry::Bound(loadable));
    }

    pub fn declare_pending(&mut self, name: &str, ty: Ty) {
        self.entries.insert(Rc::from(name), ScopeEntry::Pending(ty));
    }

    pub fn lookup(&self, name: &str) -> Option<&ScopeEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
