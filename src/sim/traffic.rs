//! Vehicle spawning and movement
//!
//! Two independent cadences drive traffic: spawn (per tier, or fixed under AI
//! mode) and move (16ms). Vehicles only travel left to right.

use glam::Vec2;
use rand::Rng;

use super::state::{GameSession, Heading, Vehicle};
use crate::consts::*;

/// km/h → pixels per move tick.
///
/// A design scale tuned for the 16ms tick, not a physical conversion.
#[inline]
pub fn kmh_to_px_per_tick(kmh: f32) -> f32 {
    (kmh * 0.277778) / 60.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned { id: u32, lane: u32 },
    /// Another vehicle is too close to the spawn point in that lane
    LaneBlocked { lane: u32 },
    AtCapacity,
}

/// Try to add one vehicle in a random lane
pub fn spawn_vehicle(session: &mut GameSession, rng: &mut impl Rng) -> SpawnOutcome {
    if session.vehicles.len() >= MAX_VEHICLES {
        return SpawnOutcome::AtCapacity;
    }

    let lanes = session.lane_count().max(1);
    let lane = rng.random_range(0..lanes);

    let blocked = session
        .vehicles
        .iter()
        .any(|v| v.lane == lane && (v.pos.x - SPAWN_X).abs() < SPAWN_CLEARANCE);
    if blocked {
        return SpawnOutcome::LaneBlocked { lane };
    }

    let id = session.next_entity_id();
    let y = session.viewport.lane_y(lane, lanes);
    let speed = kmh_to_px_per_tick(session.spawn_speed_kmh());
    session.vehicles.push(Vehicle {
        id,
        pos: Vec2::new(SPAWN_X, y),
        lane,
        speed,
        heading: Heading::Right,
    });
    SpawnOutcome::Spawned { id, lane }
}

/// Advance every vehicle one tick and cull the ones that left the viewport.
/// Returns how many were culled.
pub fn move_vehicles(session: &mut GameSession) -> usize {
    let hold_line = session.crosswalk.center_x - STOP_DISTANCE;
    let red = session.light.is_red();

    for vehicle in &mut session.vehicles {
        // On red, anything still before the stop line waits
        if red && vehicle.pos.x < hold_line {
            continue;
        }
        vehicle.pos.x += vehicle.speed;
    }

    let max_x = session.viewport.width + CULL_MARGIN;
    let before = session.vehicles.len();
    session
        .vehicles
        .retain(|v| v.pos.x > -CULL_MARGIN && v.pos.x < max_x);
    before - session.vehicles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::light::LightPhase;
    use crate::sim::state::Viewport;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn session() -> GameSession {
        GameSession::new(
            Viewport {
                width: 1280.0,
                height: 800.0,
            },
            3,
        )
    }

    fn vehicle(id: u32, x: f32, lane: u32) -> Vehicle {
        Vehicle {
            id,
            pos: Vec2::new(x, 400.0),
            lane,
            speed: 2.0,
            heading: Heading::Right,
        }
    }

    #[test]
    fn test_speed_scale() {
        assert!((kmh_to_px_per_tick(60.0) - 0.277778).abs() < 1e-6);
        assert_eq!(kmh_to_px_per_tick(0.0), 0.0);
    }

    #[test]
    fn test_spawn_places_vehicle_at_lane() {
        let mut s = session();
        let mut rng = Pcg32::seed_from_u64(1);
        let SpawnOutcome::Spawned { id, lane } = spawn_vehicle(&mut s, &mut rng) else {
            panic!("empty road must accept a spawn");
        };
        let v = &s.vehicles[0];
        assert_eq!(v.id, id);
        assert_eq!(v.pos.x, SPAWN_X);
        assert_eq!(v.pos.y, s.viewport.lane_y(lane, 2));
        assert!((v.speed - kmh_to_px_per_tick(20.0)).abs() < 1e-6);
        assert_eq!(v.heading, Heading::Right);
    }

    #[test]
    fn test_spawned_traffic_drives_right() {
        let mut s = session();
        s.light.phase = LightPhase::Green;
        let mut rng = Pcg32::seed_from_u64(4);
        assert!(matches!(
            spawn_vehicle(&mut s, &mut rng),
            SpawnOutcome::Spawned { .. }
        ));
        let json = serde_json::to_value(&s.vehicles[0]).unwrap();
        assert_eq!(json["heading"], "right");

        let mut last = s.vehicles[0].pos.x;
        for _ in 0..10 {
            move_vehicles(&mut s);
            assert!(s.vehicles[0].pos.x > last);
            last = s.vehicles[0].pos.x;
        }
    }

    #[test]
    fn test_spawn_rejects_blocked_lane() {
        let mut s = session();
        s.vehicles.push(vehicle(100, 50.0, 0));
        s.vehicles.push(vehicle(101, 0.0, 1));
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..20 {
            assert!(matches!(
                spawn_vehicle(&mut s, &mut rng),
                SpawnOutcome::LaneBlocked { .. }
            ));
        }
        assert_eq!(s.vehicles.len(), 2);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut s = session();
        for i in 0..MAX_VEHICLES as u32 {
            s.vehicles.push(vehicle(i, 1000.0, 0));
        }
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(spawn_vehicle(&mut s, &mut rng), SpawnOutcome::AtCapacity);
    }

    #[test]
    fn test_red_holds_vehicles_before_stop_line() {
        let mut s = session();
        s.light.phase = LightPhase::Red;
        // crosswalk centre 640, hold line 540
        s.vehicles.push(vehicle(1, 300.0, 0));
        s.vehicles.push(vehicle(2, 600.0, 1));
        move_vehicles(&mut s);
        assert_eq!(s.vehicles[0].pos.x, 300.0);
        assert_eq!(s.vehicles[1].pos.x, 602.0);

        s.light.phase = LightPhase::Green;
        move_vehicles(&mut s);
        assert_eq!(s.vehicles[0].pos.x, 302.0);
    }

    #[test]
    fn test_cull_outside_margins() {
        let mut s = session();
        s.light.phase = LightPhase::Green;
        s.vehicles.push(vehicle(1, 1479.0, 0));
        s.vehicles.push(vehicle(2, 1477.0, 1));
        assert_eq!(move_vehicles(&mut s), 1);
        assert_eq!(s.vehicles.len(), 1);
        assert_eq!(s.vehicles[0].id, 2);
    }

    proptest! {
        #[test]
        fn spawns_never_crowd_a_lane(seed in any::<u64>(), rounds in 1usize..200) {
            let mut s = session();
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..rounds {
                let before: Vec<Vehicle> = s.vehicles.clone();
                if let SpawnOutcome::Spawned { id, lane } = spawn_vehicle(&mut s, &mut rng) {
                    let new = s.vehicles.iter().find(|v| v.id == id).unwrap();
                    for v in before.iter().filter(|v| v.lane == lane) {
                        prop_assert!((v.pos.x - new.pos.x).abs() >= SPAWN_CLEARANCE);
                    }
                }
                prop_assert!(s.vehicles.len() <= MAX_VEHICLES);
                // Alternate some movement so lanes free up
                if rng.random_bool(0.5) {
                    s.light.phase = LightPhase::Green;
                    for _ in 0..50 {
                        move_vehicles(&mut s);
                    }
                }
            }
        }
    }
}
