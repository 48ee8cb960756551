// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
mod common;

use common::init_tracing;
use cyclone_core::{
    Handle, Particle, ParticleCable, ParticleCableConstraint, ParticleContact,
    ParticleContactGenerator, ParticleContactResolver, ParticleId, ParticleRod,
    ParticleRodConstraint, ParticleSet, PhysicsError, Vec3,
};

fn particle(set: &mut ParticleSet, position: Vec3, velocity: Vec3) -> ParticleId {
    set.insert(Particle::new(position, 1.0).unwrap().with_velocity(velocity))
}

#[test]
fn separating_velocity_is_negative_while_closing() {
    let mut set = ParticleSet::new();
    let a = particle(&mut set, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
    let b = particle(&mut set, Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
    let closing = ParticleContact::new(a, Some(b), Vec3::new(-1.0, 0.0, 0.0), 0.0, 1.0);
    assert_eq!(closing.separating_velocity(&set), -2.0);

    let single = ParticleContact::new(a, None, Vec3::UP, 0.0, 1.0);
    assert_eq!(single.separating_velocity(&set), 0.0);
    assert!(ParticleContact::default().is_inert());
}

#[test]
fn resolve_velocity_applies_restitution_by_inverse_mass() {
    let mut set = ParticleSet::new();
    let a = particle(&mut set, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
    let b = particle(&mut set, Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
    let mut contact = ParticleContact::new(a, Some(b), Vec3::new(-1.0, 0.0, 0.0), 0.0, 0.5);
    contact.resolve_velocity(&mut set, 0.1);
    assert_eq!(set[a].velocity.to_array(), [-0.5, 0.0, 0.0]);
    assert_eq!(set[b].velocity.to_array(), [0.5, 0.0, 0.0]);
    assert_eq!(contact.separating_velocity(&set), 1.0);
}

#[test]
fn resting_contact_removes_acceleration_build_up() {
    let mut set = ParticleSet::new();
    let p = set.insert(
        Particle::default()
            .with_velocity(Vec3::new(0.0, -1.0, 0.0))
            .with_acceleration(Vec3::new(0.0, -10.0, 0.0)),
    );
    let mut contact = ParticleContact::new(p, None, Vec3::UP, 0.0, 0.5);
    contact.resolve_velocity(&mut set, 0.1);
    // Closing speed equals one step of gravity, so nothing bounces back.
    assert_eq!(set[p].velocity.y, 0.0);
}

#[test]
fn separating_contacts_are_left_alone() {
    let mut set = ParticleSet::new();
    let p = particle(&mut set, Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
    let mut contact = ParticleContact::new(p, None, Vec3::UP, 0.0, 1.0);
    contact.resolve_velocity(&mut set, 0.1);
    assert_eq!(set[p].velocity.to_array(), [0.0, 2.0, 0.0]);
}

#[test]
fn interpenetration_is_split_by_inverse_mass() {
    let mut set = ParticleSet::new();
    let light = particle(&mut set, Vec3::ZERO, Vec3::ZERO);
    let heavy = set.insert(
        Particle::new(Vec3::new(1.0, 0.0, 0.0), 2.0).unwrap(),
    );
    let mut contact = ParticleContact::new(light, Some(heavy), Vec3::new(1.0, 0.0, 0.0), 3.0, 0.0);
    contact.resolve_interpenetration(&mut set);
    assert_eq!(set[light].position.to_array(), [2.0, 0.0, 0.0]);
    assert_eq!(set[heavy].position.to_array(), [0.0, 0.0, 0.0]);
    assert_eq!(contact.particle_movement[0].to_array(), [2.0, 0.0, 0.0]);
    assert_eq!(contact.particle_movement[1].to_array(), [-1.0, 0.0, 0.0]);

    // A pass with nothing to fix clears the recorded movement.
    contact.penetration = 0.0;
    contact.resolve_interpenetration(&mut set);
    assert_eq!(contact.particle_movement, [Vec3::ZERO; 2]);
}

#[test]
fn immovable_pairs_are_never_moved() {
    let mut set = ParticleSet::new();
    let a = set.insert(Particle::immovable(Vec3::ZERO).with_velocity(Vec3::new(0.0, -1.0, 0.0)));
    let mut contact = ParticleContact::new(a, None, Vec3::UP, 1.0, 1.0);
    contact.resolve(&mut set, 0.1);
    assert_eq!(set[a].position, Vec3::ZERO);
    assert_eq!(set[a].velocity.to_array(), [0.0, -1.0, 0.0]);
    assert_eq!(contact.particle_movement, [Vec3::ZERO; 2]);
}

#[test]
fn resolver_picks_the_most_negative_contact_first() {
    init_tracing();
    let mut set = ParticleSet::new();
    let slow = particle(&mut set, Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0));
    let fast = particle(&mut set, Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, -3.0, 0.0));
    let mut contacts = [
        ParticleContact::new(slow, None, Vec3::UP, 0.0, 0.0),
        ParticleContact::new(fast, None, Vec3::UP, 0.0, 0.0),
    ];
    let used = ParticleContactResolver::new(1)
        .resolve_contacts(&mut contacts, &mut set, 0.1)
        .unwrap();
    assert_eq!(used, 1);
    assert_eq!(set[fast].velocity.y, 0.0);
    assert_eq!(set[slow].velocity.y, -1.0);
}

#[test]
fn resolver_stops_once_nothing_qualifies() {
    let mut set = ParticleSet::new();
    let p = particle(&mut set, Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0));
    let mut contacts = [ParticleContact::new(p, None, Vec3::UP, 0.0, 0.0)];
    let resolver = ParticleContactResolver::new(10);
    assert_eq!(resolver.iterations(), 10);
    let used = resolver.resolve_contacts(&mut contacts, &mut set, 0.1).unwrap();
    assert_eq!(used, 1);
    assert_eq!(set[p].velocity.y, 0.0);
}

#[test]
fn resolver_keeps_shared_penetrations_current() {
    let mut set = ParticleSet::new();
    let p = particle(&mut set, Vec3::ZERO, Vec3::ZERO);
    let mut contacts = [
        ParticleContact::new(p, None, Vec3::UP, 1.0, 0.0),
        ParticleContact::new(p, None, Vec3::UP, 1.5, 0.0),
    ];
    let used = ParticleContactResolver::new(10)
        .resolve_contacts(&mut contacts, &mut set, 0.1)
        .unwrap();
    // First pass fixes the first contact (tie on velocity) and leaves 0.5 on
    // the second; the second pass finishes it.
    assert_eq!(used, 2);
    assert_eq!(set[p].position.y, 1.5);
    assert_eq!(contacts[0].penetration, -0.5);
    assert_eq!(contacts[1].penetration, 0.0);
}

#[test]
fn resolver_skips_inert_contacts_and_checks_duration() {
    let mut set = ParticleSet::new();
    let mut contacts = [ParticleContact {
        penetration: 5.0,
        ..ParticleContact::default()
    }];
    let resolver = ParticleContactResolver::new(4);
    assert_eq!(resolver.resolve_contacts(&mut contacts, &mut set, 0.1), Ok(0));
    assert_eq!(
        resolver.resolve_contacts(&mut contacts, &mut set, 0.0),
        Err(PhysicsError::InvalidDuration(0.0))
    );
}

#[test]
fn cable_only_reports_when_taut() {
    let mut set = ParticleSet::new();
    let a = particle(&mut set, Vec3::ZERO, Vec3::ZERO);
    let b = particle(&mut set, Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO);
    let mut slots = [ParticleContact::default(); 2];

    let slack = ParticleCable::new(a, b, 4.0, 0.5);
    assert_eq!(slack.add_contact(&set, &mut slots), 0);

    let taut = ParticleCable::new(a, b, 2.0, 0.5);
    assert_eq!(taut.add_contact(&set, &mut slots), 1);
    assert_eq!(slots[0].particles, [Some(a), Some(b)]);
    assert_eq!(slots[0].contact_normal.to_array(), [1.0, 0.0, 0.0]);
    assert_eq!(slots[0].penetration, 1.0);
    assert_eq!(slots[0].restitution, 0.5);
    assert!(slots[1].is_inert());
}

#[test]
fn rod_pulls_stretched_particles_back_to_length() {
    let mut set = ParticleSet::new();
    let a = particle(&mut set, Vec3::ZERO, Vec3::ZERO);
    let b = particle(&mut set, Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO);
    let rod = ParticleRod::new(a, b, 2.0);
    let mut slots = [ParticleContact::default(); 1];
    assert_eq!(rod.add_contact(&set, &mut slots), 1);
    assert_eq!(slots[0].contact_normal.to_array(), [1.0, 0.0, 0.0]);
    assert_eq!(slots[0].penetration, 1.0);
    assert_eq!(slots[0].restitution, 0.0);

    let used = ParticleContactResolver::new(4)
        .resolve_contacts(&mut slots, &mut set, 0.1)
        .unwrap();
    assert_eq!(used, 1);
    assert_eq!(set[a].position.to_array(), [0.5, 0.0, 0.0]);
    assert_eq!(set[b].position.to_array(), [2.5, 0.0, 0.0]);
    assert_eq!(rod.add_contact(&set, &mut slots), 0);
}

#[test]
fn rod_pushes_compressed_particles_apart() {
    let mut set = ParticleSet::new();
    let a = particle(&mut set, Vec3::ZERO, Vec3::ZERO);
    let b = particle(&mut set, Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
    let mut slots = [ParticleContact::default(); 1];
    assert_eq!(ParticleRod::new(a, b, 2.0).add_contact(&set, &mut slots), 1);
    assert_eq!(slots[0].contact_normal.to_array(), [-1.0, 0.0, 0.0]);
    assert_eq!(slots[0].penetration, 1.0);
}

#[test]
fn anchored_links_use_an_empty_second_slot() {
    let mut set = ParticleSet::new();
    let hanging = particle(&mut set, Vec3::new(0.0, -3.0, 0.0), Vec3::ZERO);
    let close = particle(&mut set, Vec3::new(0.0, -1.0, 0.0), Vec3::ZERO);
    let mut slots = [ParticleContact::default(); 1];

    let cable = ParticleCableConstraint::new(hanging, Vec3::ZERO, 2.0, 0.3);
    assert_eq!(cable.add_contact(&set, &mut slots), 1);
    assert_eq!(slots[0].particles, [Some(hanging), None]);
    assert_eq!(slots[0].contact_normal.to_array(), [0.0, 1.0, 0.0]);
    assert_eq!(slots[0].penetration, 1.0);

    let rod = ParticleRodConstraint::new(close, Vec3::ZERO, 2.0);
    assert_eq!(rod.add_contact(&set, &mut slots), 1);
    assert_eq!(slots[0].contact_normal.to_array(), [0.0, -1.0, 0.0]);
    assert_eq!(slots[0].penetration, 1.0);
    assert_eq!(ParticleRodConstraint::new(close, Vec3::ZERO, 1.0).add_contact(&set, &mut slots), 0);
}

#[test]
fn generators_respect_capacity_and_dangling_handles() {
    let mut set = ParticleSet::new();
    let a = particle(&mut set, Vec3::ZERO, Vec3::ZERO);
    let b = particle(&mut set, Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO);
    let mut none: [ParticleContact; 0] = [];
    assert_eq!(ParticleRod::new(a, b, 2.0).add_contact(&set, &mut none), 0);

    let mut slots = [ParticleContact::default(); 1];
    let dangling = ParticleCable::new(a, Handle::from_raw(7), 1.0, 0.0);
    assert_eq!(dangling.add_contact(&set, &mut slots), 0);
}

#[test]
fn resolver_skips_contacts_it_cannot_move() {
    init_tracing();
    let mut set = ParticleSet::new();
    let a = particle(&mut set, Vec3::ZERO, Vec3::ZERO);
    let b = particle(&mut set, Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
    let repeated = ParticleContact::new(a, Some(a), Vec3::UP, 1.0, 0.5);
    let dangling = ParticleContact::new(Handle::from_raw(9), None, Vec3::UP, 1.0, 0.5);
    let partner_gone = ParticleContact::new(a, Some(Handle::from_raw(9)), Vec3::UP, 1.0, 0.5);
    assert!(!repeated.is_resolvable(&set));
    assert!(!dangling.is_resolvable(&set));
    assert!(!partner_gone.is_resolvable(&set));
    assert!(!ParticleContact::default().is_resolvable(&set));

    let resolver = ParticleContactResolver::new(10);
    let mut contacts = [repeated, dangling, partner_gone];
    assert_eq!(resolver.resolve_contacts(&mut contacts, &mut set, 0.1).unwrap(), 0);
    assert_eq!(contacts[0].penetration, 1.0);

    // A resolvable contact alongside them takes one pass and then the resolver stops.
    let ground = ParticleContact::new(b, None, Vec3::UP, 0.5, 0.0);
    assert!(ground.is_resolvable(&set));
    let mut contacts = [repeated, ground, dangling];
    assert_eq!(resolver.resolve_contacts(&mut contacts, &mut set, 0.1).unwrap(), 1);
    assert_eq!(set[b].velocity, Vec3::ZERO);
    assert_eq!(set[b].position.y, -0.5);
}
