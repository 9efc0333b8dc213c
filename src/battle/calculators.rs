use crate::creature::Creature;

/// Chance in `[0, 1]` that an attack lands on a target with the given agility.
/// Agility is the target's dodge chance in percent.
pub fn hit_chance(target_agility: f32) -> f32 {
    1.0 - target_agility / 100.0
}

/// An attack lands unless the draw exceeds the hit chance.
pub fn attack_lands(target_agility: f32, draw: f64) -> bool {
    draw <= f64::from(hit_chance(target_agility))
}

/// Damage of a default attack for a fixed draw. A dodge is a full miss.
pub fn default_attack_damage(strength: f32, element_multiplier: f32, target_agility: f32, draw: f64) -> f32 {
    let raw_damage = strength * element_multiplier;
    if attack_lands(target_agility, draw) {
        raw_damage
    } else {
        0.0
    }
}

/// Outcome of one default attack before it is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    pub element_multiplier: f32,
    pub damage: f32,
}

impl AttackOutcome {
    pub fn resolve(attacker: &Creature, target: &Creature, element_multiplier: f32, draw: f64) -> Self {
        AttackOutcome {
            element_multiplier,
            damage: default_attack_damage(
                attacker.stage().strength,
                element_multiplier,
                target.stage().agility,
                draw,
            ),
        }
    }

    pub fn is_dodge(&self) -> bool {
        self.damage == 0.0
    }
}
