//! Contact damage capability
//!
//! Архитектура:
//! - ContactDamage вешается на любого агента (sentinel, relentless: не важно)
//! - Вход в радиус цели → один ContactHit (урон + направление knockback)
//! - Пока в контакте: повторных hit'ов нет; вышли из радиуса → снова armed
//! - Health/knockback физика: у внешнего consumer'а события

use bevy::prelude::*;

use crate::ai::PerceptionTarget;

/// Урон при касании цели
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ContactDamage {
    /// Урон за одно касание
    pub damage: f32,
    /// Сила отталкивания цели
    pub knockback_force: f32,
    /// Дистанция контакта (метры, между pivot'ами)
    pub radius: f32,
    /// Сейчас касаемся цели (hit уже выдан)
    pub in_contact: bool,
}

impl Default for ContactDamage {
    fn default() -> Self {
        Self {
            damage: 20.0,
            knockback_force: 50.0,
            radius: 1.0,
            in_contact: false,
        }
    }
}

impl ContactDamage {
    /// Обновить контакт по текущей дистанции; true если это новое касание
    pub fn update_contact(&mut self, distance: f32) -> bool {
        let touching = distance <= self.radius;
        let new_hit = touching && !self.in_contact;
        self.in_contact = touching;
        new_hit
    }
}

/// Событие: агент коснулся цели
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ContactHit {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    /// Горизонтальное направление от агента к цели (unit, или ZERO если совпали)
    pub knockback_direction: Vec3,
    pub knockback_force: f32,
}

/// Система: contact damage по цели
pub fn apply_contact_damage(
    mut attackers: Query<(Entity, &Transform, &mut ContactDamage)>,
    targets: Query<(Entity, &Transform), With<PerceptionTarget>>,
    mut hit_events: EventWriter<ContactHit>,
) {
    let Ok((target, target_transform)) = targets.single() else {
        return;
    };

    for (attacker, transform, mut contact) in attackers.iter_mut() {
        let offset = target_transform.translation - transform.translation;
        if !contact.update_contact(offset.length()) {
            continue;
        }

        let knockback_direction = Vec3::new(offset.x, 0.0, offset.z).normalize_or_zero();

        hit_events.write(ContactHit {
            attacker,
            target,
            damage: contact.damage,
            knockback_direction,
            knockback_force: contact.knockback_force,
        });

        crate::logger::log(&format!(
            "💥 {:?} touched {:?} (damage: {}, knockback: {})",
            attacker, target, contact.damage, contact.knockback_force
        ));
    }
}
