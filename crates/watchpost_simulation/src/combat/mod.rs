//! Combat capabilities (attached to agents as independent components)
//!
//! ECS ответственность: обнаружение контакта, события ContactHit.
//! Health/damage bookkeeping и knockback физика: у consumer'а события.

use bevy::prelude::*;

pub mod contact;

pub use contact::{apply_contact_damage, ContactDamage, ContactHit};

use crate::SimulationSet;

/// Combat Plugin
///
/// apply_contact_damage идёт в React фазе: после движения агентов,
/// чтобы дистанция считалась по позициям этого tick'а.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ContactHit>()
            .register_type::<ContactDamage>()
            .add_systems(FixedUpdate, apply_contact_damage.in_set(SimulationSet::React));
    }
}
