use crate::{NodeId, PipeId};

/// Change notification emitted by [`super::NetworkEditor`] after each mutation.
///
/// Observers run synchronously inside the mutating call, so a map widget can
/// redraw markers and paths in the same interaction that caused the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkEvent {
    NodeAdded { node: NodeId },
    NodeMoved { node: NodeId },
    NodeUpdated { node: NodeId },
    PipeAdded { pipe: PipeId },
    PipePathChanged { pipe: PipeId },
}

pub(crate) type Observer = Box<dyn Fn(&NetworkEvent) + Send + Sync>;
