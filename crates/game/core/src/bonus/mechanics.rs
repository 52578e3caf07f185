//! Late-bound dispatch of special mechanics.
//!
//! Set tiers name mechanics by string id. The registry maps ids to handlers
//! explicitly bound to them and, for ids nobody bound, asks each handler in
//! priority order whether it can service the id.

use std::collections::BTreeMap;

use crate::env::{MechanicId, MechanicParams};

/// A pluggable implementation of one or more special mechanics.
pub trait MechanicHandler {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Priority in the fallback scan. Lower values are asked first.
    fn priority(&self) -> i32 {
        0
    }

    /// Returns true if this handler can service `id` without an explicit binding.
    fn can_handle(&self, _id: &MechanicId) -> bool {
        false
    }

    fn activate(&mut self, id: &MechanicId, params: &MechanicParams);

    fn deactivate(&mut self, id: &MechanicId);
}

/// Index of a handler inside a [`MechanicRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(usize);

/// Registry of mechanic handlers, scoped to one bonus engine.
#[derive(Default)]
pub struct MechanicRegistry {
    handlers: Vec<Box<dyn MechanicHandler>>,
    /// Handler indices sorted by priority, then registration order.
    scan_order: Vec<HandlerId>,
    exact: BTreeMap<MechanicId, HandlerId>,
}

impl MechanicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registers a handler that is only reached through the fallback scan
    /// until ids are bound to it.
    pub fn register(&mut self, handler: Box<dyn MechanicHandler>) -> HandlerId {
        let id = HandlerId(self.handlers.len());
        tracing::debug!(handler = handler.name(), "registered mechanic handler");
        self.handlers.push(handler);
        self.scan_order.push(id);
        let handlers = &self.handlers;
        self.scan_order
            .sort_by_key(|handler| (handlers[handler.0].priority(), handler.0));
        id
    }

    /// Registers a handler and binds `mechanic` to it.
    pub fn register_for(
        &mut self,
        mechanic: impl Into<String>,
        handler: Box<dyn MechanicHandler>,
    ) -> HandlerId {
        let id = self.register(handler);
        self.exact.insert(MechanicId::new(mechanic), id);
        id
    }

    /// Binds `mechanic` to an already registered handler. Returns false for
    /// unknown handler ids.
    pub fn bind(&mut self, mechanic: MechanicId, handler: HandlerId) -> bool {
        if handler.0 >= self.handlers.len() {
            return false;
        }
        self.exact.insert(mechanic, handler);
        true
    }

    /// Finds the handler for `mechanic`: the exact binding, else the first
    /// handler (by priority) that claims it.
    pub fn resolve(&self, mechanic: &MechanicId) -> Option<HandlerId> {
        if let Some(handler) = self.exact.get(mechanic) {
            return Some(*handler);
        }
        self.scan_order
            .iter()
            .copied()
            .find(|handler| self.handlers[handler.0].can_handle(mechanic))
    }

    pub fn handler_name(&self, handler: HandlerId) -> Option<&str> {
        self.handlers.get(handler.0).map(|handler| handler.name())
    }

    pub(crate) fn activate(
        &mut self,
        handler: HandlerId,
        mechanic: &MechanicId,
        params: &MechanicParams,
    ) {
        if let Some(handler) = self.handlers.get_mut(handler.0) {
            handler.activate(mechanic, params);
        }
    }

    pub(crate) fn deactivate(&mut self, handler: HandlerId, mechanic: &MechanicId) {
        if let Some(handler) = self.handlers.get_mut(handler.0) {
            handler.deactivate(mechanic);
        }
    }
}

impl std::fmt::Debug for MechanicRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MechanicRegistry")
            .field(
                "handlers",
                &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field("exact", &self.exact)
            .finish()
    }
}
