//! Dispatch tables: from a step number to its resume label.
//!
//! Every container gets one table covering its step range. An entry is
//! either a step resumed in that container or the range of a child, which
//! forwards to the child's table after testing the child's flag. A clear
//! flag means the notification is stale: the right operand did not run in
//! the last evaluation, so the update exits without publishing.

use vela_emit::{Label, LabelKey, Op, RenderCommand};

use super::container::{ContainerId, Containers};
use crate::context::FlagBit;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(super) enum Entry {
    Resume(u32),
    Child(ContainerId),
    /// No container claims the step.
    Gap,
}

#[derive(Clone, Debug)]
pub(super) struct Table {
    pub(super) offset: u32,
    /// Flag guarding a derived container; `None` for the root.
    pub(super) flag: Option<FlagBit>,
    pub(super) entries: Vec<Entry>,
}

/// One table per container, in container order.
pub(super) fn plan(containers: &Containers) -> Vec<Table> {
    containers
        .iter()
        .map(|(id, container)| {
            let entries = (container.offset..container.end)
                .map(|step| {
                    let from_scratch = step == 0 && id == ContainerId::ROOT;
                    if from_scratch || container.save_points.iter().any(|p| p.step == step) {
                        return Entry::Resume(step);
                    }
                    container
                        .children
                        .iter()
                        .copied()
                        .find(|&child| containers.get(child).contains(step))
                        .map_or(Entry::Gap, Entry::Child)
                })
                .collect();
            Table {
                offset: container.offset,
                flag: container.branch.as_ref().map(|branch| branch.flag.clone()),
                entries,
            }
        })
        .collect()
}

/// Render the tables: the root table first, then every derived table
/// behind its entry label, then the shared fault.
pub(super) fn render(tables: Vec<Table>) -> RenderCommand {
    RenderCommand::new(move |b| {
        let fault = b.new_label();
        let entries: Vec<Option<Label>> = tables
            .iter()
            .map(|table| table.flag.as_ref().map(|_| b.new_label()))
            .collect();

        for (table, entry) in tables.iter().zip(&entries) {
            if let (Some(flag), Some(entry)) = (&table.flag, entry) {
                b.place(*entry);
                flag.test().render(b);
                let exit = b.keyed_label(LabelKey::Exit);
                b.emit(Op::JumpIfFalse(exit));
            }
            let targets = table
                .entries
                .iter()
                .map(|slot| match *slot {
                    Entry::Resume(step) => b.keyed_label(LabelKey::Step(step)),
                    Entry::Child(child) => entries
                        .get(child.index())
                        .copied()
                        .flatten()
                        .unwrap_or(fault),
                    Entry::Gap => fault,
                })
                .collect();
            b.emit(Op::LoadStep);
            b.emit(Op::TableSwitch {
                low: table.offset,
                targets,
                default: fault,
            });
        }

        b.place(fault);
        b.emit(Op::Fault("dispatch step out of range".into()));
    })
}
