//! Navigation domain: sampling surface + движение агентов
//!
//! Содержит:
//! - NavigationSampler (trait) + NavigationSurface (walkable прямоугольники)
//! - MovementController (trait) + NavAgent (headless движение по прямой)
//! - advance_nav_agents (система движения)

pub mod agent;
pub mod sampler;


pub use agent::{advance_nav_agents, step_nav_agent, MovementController, NavAgent};
pub use sampler::{NavRegion, NavigationSampler, NavigationSurface};

use bevy::prelude::*;

use crate::SimulationSet;

/// Navigation Plugin
///
/// NavigationSurface по умолчанию пустой: хост кладёт свой (`insert_resource`).
/// advance_nav_agents идёт в Move: после AI decisions, до reactions.
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavigationSurface>()
            .register_type::<NavAgent>()
            .add_systems(FixedUpdate, advance_nav_agents.in_set(SimulationSet::Move));
    }
}
