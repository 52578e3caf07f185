//! Reference collaborators: the world floor, the character sheet and a
//! mechanic handler that only reports what it would do.
use armory_core::{
    ItemDefinition, ItemHandle, MechanicHandler, MechanicId, MechanicParams, Services, Spawner,
    StatLedger, TraitBook,
};

/// Spawner that keeps dropped stacks on the floor.
#[derive(Debug, Default)]
pub struct Floor {
    pub piles: Vec<(ItemHandle, u32)>,
}

impl Spawner for Floor {
    fn drop_into_world(&mut self, definition: &ItemDefinition, quantity: u32, durability: &[f32]) {
        tracing::info!(
            item = %definition.handle,
            name = %definition.name,
            quantity,
            ?durability,
            "stack lands on the floor"
        );
        self.piles.push((definition.handle, quantity));
    }
}

/// Everything the engine talks to on behalf of one character.
#[derive(Debug, Default)]
pub struct Host {
    pub floor: Floor,
    pub stats: StatLedger,
    pub traits: TraitBook,
}

impl Host {
    pub fn services(&mut self) -> Services<'_> {
        Services::new(&mut self.floor, &mut self.stats, &mut self.traits)
    }
}

/// Fallback handler that accepts every mechanic and logs it.
#[derive(Debug, Default)]
pub struct LoggedMechanics;

impl MechanicHandler for LoggedMechanics {
    fn name(&self) -> &str {
        "logged"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn can_handle(&self, _id: &MechanicId) -> bool {
        true
    }

    fn activate(&mut self, id: &MechanicId, params: &MechanicParams) {
        tracing::info!(mechanic = %id, ?params, "mechanic on");
    }

    fn deactivate(&mut self, id: &MechanicId) {
        tracing::info!(mechanic = %id, "mechanic off");
    }
}
