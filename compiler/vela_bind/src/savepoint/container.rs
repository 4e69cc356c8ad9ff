//! Save-point containers.
//!
//! The root container covers the whole expression. Every monitored right
//! operand of `&&`/`||` gets a derived container nested in the one that was
//! current when it was opened. A container's steps are contiguous: it is
//! opened at the next free step and closed after its last save point, so
//! the steps of a child lie inside the range of its parent.

use smallvec::SmallVec;

use crate::context::FlagBit;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(super) struct ContainerId(u32);

impl ContainerId {
    pub(super) const ROOT: ContainerId = ContainerId(0);

    pub(super) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One monitoring point.
#[derive(Clone, Debug)]
pub(super) struct SavePoint {
    pub(super) step: u32,
    /// Scratch slot holding the observable handle subscribed to last.
    pub(super) handle: u32,
    /// Counters of every derived container enclosing this point.
    pub(super) counters: SmallVec<[u32; 4]>,
}

/// State a derived container keeps across evaluations.
#[derive(Clone, Debug)]
pub(super) struct Branch {
    /// Set while the right operand took part in the last evaluation.
    pub(super) flag: FlagBit,
    /// Live subscriptions in the container and its descendants.
    pub(super) counter: u32,
}

#[derive(Debug)]
pub(super) struct Container {
    pub(super) parent: Option<ContainerId>,
    pub(super) offset: u32,
    /// One past the last step; known once the container is closed.
    pub(super) end: u32,
    /// `None` for the root.
    pub(super) branch: Option<Branch>,
    pub(super) save_points: Vec<SavePoint>,
    pub(super) children: Vec<ContainerId>,
}

impl Container {
    pub(super) fn contains(&self, step: u32) -> bool {
        (self.offset..self.end).contains(&step)
    }
}

#[derive(Debug)]
pub(super) struct Containers {
    containers: Vec<Container>,
}

impl Containers {
    pub(super) fn new() -> Self {
        Containers {
            containers: vec![Container {
                parent: None,
                offset: 0,
                end: 0,
                branch: None,
                save_points: Vec::new(),
                children: Vec::new(),
            }],
        }
    }

    pub(super) fn get(&self, id: ContainerId) -> &Container {
        &self.containers[id.index()]
    }

    pub(super) fn get_mut(&mut self, id: ContainerId) -> &mut Container {
        &mut self.containers[id.index()]
    }

    /// Open a derived container under `parent` starting at `offset`.
    pub(super) fn open(&mut self, parent: ContainerId, offset: u32, branch: Branch) -> ContainerId {
        let id = ContainerId(u32::try_from(self.containers.len()).unwrap_or(u32::MAX));
        self.containers.push(Container {
            parent: Some(parent),
            offset,
            end: offset,
            branch: Some(branch),
            save_points: Vec::new(),
            children: Vec::new(),
        });
        self.get_mut(parent).children.push(id);
        id
    }

    pub(super) fn close(&mut self, id: ContainerId, end: u32) {
        self.get_mut(id).end = end;
    }

    /// Counters of `id` and every derived ancestor, innermost first.
    pub(super) fn branch_counters(&self, id: ContainerId) -> SmallVec<[u32; 4]> {
        let mut counters = SmallVec::new();
        let mut current = Some(id);
        while let Some(container) = current.map(|id| self.get(id)) {
            if let Some(branch) = &container.branch {
                counters.push(branch.counter);
            }
            current = container.parent;
        }
        counters
    }

    /// Save points of `id` and all of its descendants, in step order.
    pub(super) fn subtree_save_points(&self, id: ContainerId) -> Vec<&SavePoint> {
        let mut points = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let container = self.get(next);
            points.extend(&container.save_points);
            pending.extend(container.children.iter().copied());
        }
        points.sort_by_key(|point| point.step);
        points
    }

    /// Containers in the order they were opened; the root comes first.
    pub(super) fn iter(&self) -> impl Iterator<Item = (ContainerId, &Container)> {
        self.containers
            .iter()
            .enumerate()
            .map(|(index, container)| (ContainerId(u32::try_from(index).unwrap_or(u32::MAX)), container))
    }
}
