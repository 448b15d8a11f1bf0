//! Radar contact table.
//!
//! Contacts are kept in registration order, keyed by target handle. A target
//! appears at most once.

use hecs::Entity;
use log::{debug, info};

use skylance_core::components::{Radar, RadarContact};
use skylance_core::events::SimEvent;

/// Clear every `seen_this_sweep` flag at the start of a pass.
pub fn reset_flags(radar: &mut Radar) {
    for contact in &mut radar.contacts {
        contact.seen_this_sweep = false;
    }
}

pub fn contains(radar: &Radar, target: Entity) -> bool {
    radar.contacts.iter().any(|c| c.target == target)
}

/// Record an accepted detection.
///
/// A known contact is refreshed once per pass; a new target is appended.
pub fn register(
    radar: &mut Radar,
    target: Entity,
    now: f64,
    range: f64,
    events: &mut Vec<SimEvent>,
) {
    if let Some(contact) = radar.contacts.iter_mut().find(|c| c.target == target) {
        if !contact.seen_this_sweep {
            contact.last_seen = now;
            contact.seen_this_sweep = true;
        }
        return;
    }

    radar.contacts.push(RadarContact {
        target,
        last_seen: now,
        seen_this_sweep: true,
    });
    info!("registered radar contact {target:?} at {range:.0} m");
    events.push(SimEvent::ContactRegistered {
        target: target.to_bits().get(),
        range,
    });
}

/// Drop contacts whose target is gone or that have not been seen for longer
/// than `persistence` seconds. Returns the removed targets.
pub fn expire(
    radar: &mut Radar,
    now: f64,
    persistence: f64,
    is_alive: impl Fn(Entity) -> bool,
    events: &mut Vec<SimEvent>,
) -> Vec<Entity> {
    let mut removed = Vec::new();
    radar.contacts.retain(|contact| {
        let keep = is_alive(contact.target) && now - contact.last_seen <= persistence;
        if !keep {
            removed.push(contact.target);
        }
        keep
    });
    for target in &removed {
        debug!("radar contact {target:?} dropped");
        events.push(SimEvent::ContactDropped {
            target: target.to_bits().get(),
        });
    }
    removed
}

/// Move the selection cursor to the next contact in table order.
pub fn cycle_selection(radar: &mut Radar) {
    if radar.contacts.is_empty() {
        return;
    }
    let index = radar
        .selected
        .and_then(|s| radar.contacts.iter().position(|c| c.target == s))
        .map_or(0, |i| (i + 1) % radar.contacts.len());
    radar.selected = Some(radar.contacts[index].target);
}
